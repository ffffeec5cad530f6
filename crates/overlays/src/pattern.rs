use serde::{Deserialize, Serialize};

/// One segment of a stroke pattern. Lengths are in screen pixels.
///
/// An empty pattern renders as a solid stroke.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternItem {
    Dot,
    Dash { length: f64 },
    Gap { length: f64 },
}
