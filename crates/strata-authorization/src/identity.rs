//! Caller identities and cryptographic fingerprints
//!
//! A caller is named by an opaque identifier (package or process name);
//! its identity is proven by the digest of its signing certificate. The
//! digest is computed from the live proof on every request, so a caller
//! reinstalled under a different signature never inherits a previous
//! verdict.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

/// An application/process identifier, e.g. `com.acme.dashboard`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(String);

impl CallerId {
    /// Create a caller id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CallerId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// A SHA-256 digest of a caller's signing certificate, rendered as
/// uppercase colon-separated hex (`AB:0F:…`).
///
/// Fingerprints compare case-insensitively: construction normalizes to
/// the canonical uppercase form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Create a fingerprint from its colon-hex rendering.
    pub fn new(rendered: impl Into<String>) -> Self {
        let rendered: String = rendered.into();
        Self(rendered.to_uppercase())
    }

    /// Compute the fingerprint of a signing certificate.
    pub fn of_certificate(certificate: &[u8]) -> Self {
        let digest = Sha256::digest(certificate);
        let hex = hex::encode_upper(digest);
        let pairs: Vec<&str> = hex
            .as_bytes()
            .chunks(2)
            // Sha256 output is valid hex, chunks are ASCII pairs.
            .map(|pair| std::str::from_utf8(pair).unwrap_or_default())
            .collect();
        Self(pairs.join(":"))
    }

    /// The canonical colon-hex rendering.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the live fingerprint of a caller.
///
/// Implemented by the host platform (package/signature lookup or an IPC
/// peer credential check). `Ok(None)` means the caller is unknown to the
/// host; an `Err` marks a lookup failure. Both deny authorization; they
/// never crash the gateway.
pub trait IdentityResolver: Send + Sync {
    /// The caller's current fingerprint, if the caller is known.
    fn fingerprint_of(&self, caller: &CallerId) -> Result<Option<Fingerprint>>;
}

/// Adapts a certificate source into an [`IdentityResolver`] by digesting
/// whatever certificate the source returns.
pub struct CertificateResolver<F> {
    source: F,
}

impl<F> CertificateResolver<F>
where
    F: Fn(&CallerId) -> Option<Vec<u8>> + Send + Sync,
{
    /// Wrap a certificate source.
    pub fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F> IdentityResolver for CertificateResolver<F>
where
    F: Fn(&CallerId) -> Option<Vec<u8>> + Send + Sync,
{
    fn fingerprint_of(&self, caller: &CallerId) -> Result<Option<Fingerprint>> {
        Ok((self.source)(caller)
            .as_deref()
            .map(Fingerprint::of_certificate))
    }
}

/// A fixed caller → fingerprint map, for tests and embedders whose
/// platform exposes digests directly.
#[derive(Debug, Default)]
pub struct StaticResolver {
    fingerprints: HashMap<CallerId, Fingerprint>,
}

impl StaticResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of a caller's fingerprint.
    #[must_use]
    pub fn with(mut self, caller: impl Into<CallerId>, fingerprint: Fingerprint) -> Self {
        self.fingerprints.insert(caller.into(), fingerprint);
        self
    }
}

impl IdentityResolver for StaticResolver {
    fn fingerprint_of(&self, caller: &CallerId) -> Result<Option<Fingerprint>> {
        Ok(self.fingerprints.get(caller).cloned())
    }
}
