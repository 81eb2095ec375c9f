//! # Strata Authorization
//!
//! The policy engine of the Strata gateway: caller identities and their
//! cryptographic fingerprints, the two-tier policy tables (privileged and
//! general callers), the runtime consent-grant store, and the
//! [`AccessGate`] that decides whether an operation may reach an adapter.
//!
//! # Two-Tier Policy Model
//!
//! - **Privileged callers** are pre-vetted integrators: a valid
//!   fingerprint plus an allowed scope authorizes them with no user
//!   consent.
//! - **General callers** additionally need a per-scope grant recorded by
//!   an external consent flow in the [`GrantStore`].
//!
//! Fingerprints are computed per-request from the caller's live identity
//! proof, so a reinstalled (re-signed) application never inherits a stale
//! verdict.

pub mod config;
pub mod error;
pub mod gate;
pub mod grants;
pub mod identity;
pub mod scope;

pub use config::{CallerConfiguration, PolicyConfig, PolicyStore};
pub use error::{AuthError, Result};
pub use gate::AccessGate;
pub use grants::{GrantStore, MemoryGrantStore};
pub use identity::{CallerId, CertificateResolver, Fingerprint, IdentityResolver, StaticResolver};
pub use scope::Scope;
