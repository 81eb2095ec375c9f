//! Runtime consent grants
//!
//! Which scopes a caller has actually been granted by the user. Grants
//! are written by an external consent flow and read on every
//! authorization of a general-table caller; the store must therefore be
//! safe under concurrent reads and writes.

use crate::identity::CallerId;
use crate::scope::Scope;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

/// The grant store consulted by the access gate.
///
/// The gate only reads; `grant` and `revoke` belong to the consent flow.
pub trait GrantStore: Send + Sync {
    /// The scopes currently granted to a caller (empty when none).
    fn granted(&self, caller: &CallerId) -> HashSet<Scope>;

    /// Record scopes the user granted to a caller, merging with any
    /// existing grants.
    fn grant(&self, caller: &CallerId, scopes: HashSet<Scope>);

    /// Withdraw a single granted scope.
    fn revoke(&self, caller: &CallerId, scope: &Scope);

    /// Whether a specific scope is granted to a caller.
    fn is_granted(&self, caller: &CallerId, scope: &Scope) -> bool {
        self.granted(caller).contains(scope)
    }
}

/// In-memory grant store behind a read-write lock.
///
/// Concurrent `grant`/`granted` calls never race; persistence, if wanted,
/// belongs to a store implementation owned by the consent flow.
#[derive(Debug, Default)]
pub struct MemoryGrantStore {
    grants: RwLock<HashMap<CallerId, HashSet<Scope>>>,
}

impl MemoryGrantStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl GrantStore for MemoryGrantStore {
    fn granted(&self, caller: &CallerId) -> HashSet<Scope> {
        self.grants
            .read()
            .get(caller)
            .cloned()
            .unwrap_or_default()
    }

    fn grant(&self, caller: &CallerId, scopes: HashSet<Scope>) {
        tracing::debug!(caller = %caller, count = scopes.len(), "recording consent grant");
        let mut grants = self.grants.write();
        grants.entry(caller.clone()).or_default().extend(scopes);
    }

    fn revoke(&self, caller: &CallerId, scope: &Scope) {
        tracing::debug!(caller = %caller, scope = %scope, "revoking consent grant");
        let mut grants = self.grants.write();
        if let Some(entry) = grants.get_mut(caller) {
            entry.remove(scope);
            if entry.is_empty() {
                grants.remove(caller);
            }
        }
    }
}
