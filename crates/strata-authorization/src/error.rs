//! Error types for the authorization crate

use std::path::PathBuf;
use thiserror::Error;

/// Authorization error types
#[derive(Debug, Error)]
pub enum AuthError {
    /// A policy document could not be read from disk
    #[error("failed to read policy file {path}")]
    ReadError {
        /// The file that could not be read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A policy document could not be parsed
    #[error("failed to parse policy document: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The identity proof for a caller could not be resolved
    #[error("identity lookup failed for `{caller}`: {reason}")]
    IdentityLookup {
        /// The caller whose proof was requested
        caller: String,
        /// Why the lookup failed
        reason: String,
    },
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthError>;

impl AuthError {
    /// Create an identity lookup error
    pub fn identity_lookup(caller: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IdentityLookup {
            caller: caller.into(),
            reason: reason.into(),
        }
    }
}
