//! Operation kinds dispatched through the gateway

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four operations a caller can request against a resource.
///
/// The kind determines which of the adapter's declared scopes is checked:
/// `Read` is gated by the read scope, the three mutations by the write
/// scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Query records
    Read,
    /// Insert a record
    Insert,
    /// Update matching records
    Update,
    /// Delete matching records
    Delete,
}

impl OperationKind {
    /// Whether this operation mutates the resource.
    pub fn is_mutation(self) -> bool {
        !matches!(self, Self::Read)
    }

    /// Stable lowercase name, used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
