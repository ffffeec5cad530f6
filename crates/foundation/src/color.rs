use serde::{Deserialize, Serialize};

/// 32-bit colour packed as `0xAARRGGBB`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}
