//! Lifecycle and per-call events published by the gateway

use crate::identifier::ResourceIdentifier;
use serde::{Deserialize, Serialize};

/// Information about the gateway published when it attaches to its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachInfo {
    /// The authority under which the gateway's resources are published.
    pub authority: String,
    /// Human-readable description of the gateway, for diagnostics and
    /// consent surfaces.
    pub description: String,
}

impl AttachInfo {
    /// Create attach information.
    pub fn new(authority: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            description: description.into(),
        }
    }
}

/// Events observable on the gateway's event bus.
///
/// `Attach` and `Create` mark the gateway lifecycle; `Read` and `Write`
/// mark authorized calls, published before the adapter executes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// The gateway attached to its host
    Attach(AttachInfo),
    /// The gateway finished construction
    Create,
    /// An authorized read is about to execute
    Read(ResourceIdentifier),
    /// An authorized mutation is about to execute
    Write(ResourceIdentifier),
}
