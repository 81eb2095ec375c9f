//! Hierarchical resource identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// A hierarchical path uniquely addressing a logical data resource.
///
/// Identifiers are opaque slash-separated paths such as `acme/open/data`.
/// They are immutable once declared; equivalent spellings with leading or
/// trailing slashes normalize to the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceIdentifier(String);

impl ResourceIdentifier {
    /// Create an identifier from a path string.
    pub fn new(path: impl Into<String>) -> Self {
        let path: String = path.into();
        Self(path.trim_matches('/').to_owned())
    }

    /// The full path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the non-empty path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Whether the identifier has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceIdentifier {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for ResourceIdentifier {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}
