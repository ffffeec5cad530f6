use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Declarative reference to a stamp image, resolved by an [`ImageResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum StampRef {
    Asset { name: String },
    Bytes { data: Vec<u8> },
}

impl fmt::Display for StampRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StampRef::Asset { name } => write!(f, "asset '{name}'"),
            StampRef::Bytes { data } => write!(f, "{} inline bytes", data.len()),
        }
    }
}

/// Renderable stamp image data.
///
/// The bytes are opaque to the controller (the surface decodes them). A
/// `StampImage` is never empty, so a sink can always render one it is given.
#[derive(Debug, Clone, PartialEq)]
pub struct StampImage {
    bytes: Arc<[u8]>,
}

impl StampImage {
    /// Returns `None` for empty data.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Option<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return None;
        }
        Some(Self { bytes })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Resolves stamp references to image data.
pub trait ImageResolver {
    /// `None` means the reference does not name usable image data.
    fn resolve(&self, stamp: &StampRef) -> Option<StampImage>;
}

/// Asset table held in memory. Inline byte references resolve to themselves.
#[derive(Debug, Default, Clone)]
pub struct StaticImageResolver {
    assets: HashMap<String, StampImage>,
}

impl StaticImageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, image: StampImage) {
        self.assets.insert(name.into(), image);
    }

    pub fn with_asset(mut self, name: impl Into<String>, image: StampImage) -> Self {
        self.insert(name, image);
        self
    }
}

impl ImageResolver for StaticImageResolver {
    fn resolve(&self, stamp: &StampRef) -> Option<StampImage> {
        match stamp {
            StampRef::Asset { name } => self.assets.get(name).cloned(),
            StampRef::Bytes { data } => StampImage::new(data.as_slice()),
        }
    }
}

impl<R: ImageResolver + ?Sized> ImageResolver for &R {
    fn resolve(&self, stamp: &StampRef) -> Option<StampImage> {
        (**self).resolve(stamp)
    }
}
