use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque shape identity.
///
/// Assigned once when a shape is finalized (or taken from a stored record on
/// replay) and never changed afterwards. It joins the rendered feature and its
/// popup overlay.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    pub fn new(id: impl Into<String>) -> Self {
        ShapeId(id.into())
    }

    /// Fresh random id (uuid v4, hyphenated).
    pub fn generate() -> Self {
        ShapeId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(s: &str) -> Self {
        ShapeId::new(s)
    }
}

impl From<String> for ShapeId {
    fn from(s: String) -> Self {
        ShapeId(s)
    }
}
