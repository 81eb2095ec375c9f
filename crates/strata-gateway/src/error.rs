//! Error types for the gateway crate

use thiserror::Error;

/// Errors raised by adapter implementations.
///
/// These never cross the gateway boundary: the [`crate::Gateway`] catches
/// them, reports them to the observability sink and returns the negative
/// result for the operation kind.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The adapter's backing store failed
    #[error("storage failed: {0}")]
    Storage(String),

    /// The write payload was rejected
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// A stored record could not be encoded or decoded
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl AdapterError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid payload error
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

impl From<strata_core::Error> for AdapterError {
    fn from(error: strata_core::Error) -> Self {
        Self::InvalidPayload(error.to_string())
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result type for adapter operations
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// Errors raised while assembling a [`crate::Gateway`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// A declared route pattern did not parse
    #[error(transparent)]
    InvalidRoute(#[from] strata_core::Error),

    /// No identity resolver was supplied
    #[error("gateway requires an identity resolver")]
    MissingIdentityResolver,

    /// No self identity was supplied
    #[error("gateway requires the hosting process identity")]
    MissingSelfIdentity,
}
