//! ID types for Tunebox entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier
///
/// Opaque to the player: the catalog server decides its format. Stable and
/// unique within one catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<i64> for TrackId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_render_the_same() {
        assert_eq!(TrackId::from(42), TrackId::new("42"));
        assert_eq!(TrackId::from(7).to_string(), "7");
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&TrackId::new("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }
}
