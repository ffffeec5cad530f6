use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller-supplied overlay identity.
///
/// Unique among live overlays; may be reused once the previous holder is removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayId(String);

impl OverlayId {
    pub fn new(id: impl Into<String>) -> Self {
        OverlayId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for OverlayId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for OverlayId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OverlayId {
    fn from(id: &str) -> Self {
        OverlayId::new(id)
    }
}

impl From<String> for OverlayId {
    fn from(id: String) -> Self {
        OverlayId(id)
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::OverlayId;
    use std::collections::HashMap;

    #[test]
    fn map_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(OverlayId::new("p1"), 1);
        assert_eq!(map.get("p1"), Some(&1));
        assert!(!map.contains_key("p2"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&OverlayId::from("route-7")).unwrap();
        assert_eq!(json, "\"route-7\"");
    }
}
