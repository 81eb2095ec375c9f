//! The access gate: caller authentication and scope authorization
//!
//! Decision order, short-circuiting:
//!
//! 1. the hosting process always trusts itself;
//! 2. an empty caller or an unexposed (empty) scope denies;
//! 3. a privileged-table caller with a valid fingerprint and an allowed
//!    scope authorizes with no user consent;
//! 4. a general-table caller needs fingerprint validity, a consent grant
//!    for the scope, and the scope in its allowed set;
//! 5. everything else denies.
//!
//! Fingerprints are verified against the live identity proof on every
//! call: a caller cannot pass by claiming another application's
//! identifier, because its certificate digest will differ. A failed
//! identity lookup denies; it never panics.

use crate::config::{CallerConfiguration, PolicyStore};
use crate::grants::GrantStore;
use crate::identity::{CallerId, IdentityResolver};
use crate::scope::Scope;
use std::fmt;
use std::sync::Arc;
use strata_core::OperationKind;

/// Why an authorization was denied. Logged, never surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DenyReason {
    EmptyCaller,
    UnscopedResource,
    UnknownCaller,
    FingerprintMismatch,
    NotGranted,
    ScopeNotAllowed,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::EmptyCaller => "caller identifier is empty",
            Self::UnscopedResource => "resource declares no scope",
            Self::UnknownCaller => "caller is in neither policy table",
            Self::FingerprintMismatch => "live fingerprint not accepted",
            Self::NotGranted => "scope not granted by user",
            Self::ScopeNotAllowed => "scope not in caller's allowed set",
        };
        f.write_str(reason)
    }
}

/// The policy engine deciding whether an operation may reach an adapter.
pub struct AccessGate {
    policy: PolicyStore,
    grants: Arc<dyn GrantStore>,
    identity: Arc<dyn IdentityResolver>,
    self_id: CallerId,
}

impl AccessGate {
    /// Assemble a gate from its collaborators.
    ///
    /// `self_id` is the hosting process's own identity; requests carrying
    /// it bypass every check.
    pub fn new(
        policy: PolicyStore,
        grants: Arc<dyn GrantStore>,
        identity: Arc<dyn IdentityResolver>,
        self_id: CallerId,
    ) -> Self {
        Self {
            policy,
            grants,
            identity,
            self_id,
        }
    }

    /// Authorize an operation of the given kind against a resource scope.
    pub fn authorize(&self, kind: OperationKind, caller: &CallerId, scope: &Scope) -> bool {
        match self.evaluate(caller, scope) {
            Ok(()) => {
                tracing::debug!(
                    operation = kind.as_str(),
                    caller = %caller,
                    scope = %scope,
                    "authorized"
                );
                true
            }
            Err(reason) => {
                tracing::debug!(
                    operation = kind.as_str(),
                    caller = %caller,
                    scope = %scope,
                    reason = %reason,
                    "denied"
                );
                false
            }
        }
    }

    /// Authorize a query against the resource's read scope.
    pub fn authorize_read(&self, caller: &CallerId, read_scope: &Scope) -> bool {
        self.authorize(OperationKind::Read, caller, read_scope)
    }

    /// Authorize an insert against the resource's write scope.
    pub fn authorize_insert(&self, caller: &CallerId, write_scope: &Scope) -> bool {
        self.authorize(OperationKind::Insert, caller, write_scope)
    }

    /// Authorize an update against the resource's write scope.
    pub fn authorize_update(&self, caller: &CallerId, write_scope: &Scope) -> bool {
        self.authorize(OperationKind::Update, caller, write_scope)
    }

    /// Authorize a delete against the resource's write scope.
    pub fn authorize_delete(&self, caller: &CallerId, write_scope: &Scope) -> bool {
        self.authorize(OperationKind::Delete, caller, write_scope)
    }

    fn evaluate(&self, caller: &CallerId, scope: &Scope) -> Result<(), DenyReason> {
        // A process always trusts itself, for any scope.
        if caller == &self.self_id {
            return Ok(());
        }
        if caller.is_empty() {
            return Err(DenyReason::EmptyCaller);
        }
        if scope.is_empty() {
            return Err(DenyReason::UnscopedResource);
        }

        // Privileged path: pre-vetted integrators, no consent needed. A
        // privileged entry that fails its checks falls through to the
        // general table rather than denying outright.
        if let Some(configuration) = self.policy.privileged(caller) {
            if self.fingerprint_valid(caller, configuration) && configuration.allows(scope) {
                return Ok(());
            }
        }

        let Some(configuration) = self.policy.general(caller) else {
            return Err(DenyReason::UnknownCaller);
        };
        if !self.fingerprint_valid(caller, configuration) {
            return Err(DenyReason::FingerprintMismatch);
        }
        if !self.grants.is_granted(caller, scope) {
            return Err(DenyReason::NotGranted);
        }
        if !configuration.allows(scope) {
            return Err(DenyReason::ScopeNotAllowed);
        }
        Ok(())
    }

    /// Compute the caller's live fingerprint and check it against the
    /// configuration's accepted set. Lookup failures deny.
    fn fingerprint_valid(&self, caller: &CallerId, configuration: &CallerConfiguration) -> bool {
        match self.identity.fingerprint_of(caller) {
            Ok(Some(fingerprint)) => {
                let accepted = configuration.accepts(&fingerprint);
                if !accepted {
                    tracing::warn!(
                        caller = %caller,
                        fingerprint = %fingerprint,
                        "live fingerprint not in accepted set"
                    );
                }
                accepted
            }
            Ok(None) => {
                tracing::warn!(caller = %caller, "no identity proof for caller");
                false
            }
            Err(error) => {
                tracing::warn!(caller = %caller, error = %error, "identity lookup failed");
                false
            }
        }
    }
}
