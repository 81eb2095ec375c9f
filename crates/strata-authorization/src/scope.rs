//! Named capability scopes

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named capability gating one category of access, e.g.
/// `READ_OPEN_DATA`.
///
/// Adapters declare the scope required for reads and for writes; an empty
/// scope marks data that is not exposed to third parties at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    /// Create a scope from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The unexposed scope: resources carrying it never authorize a
    /// third-party caller.
    pub fn none() -> Self {
        Self(String::new())
    }

    /// The scope name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the unexposed scope.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scope {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
