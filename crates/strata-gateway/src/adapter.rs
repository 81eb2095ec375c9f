//! Adapter contract and registry
//!
//! An adapter is the pluggable unit implementing actual data access for
//! one route. It declares the scopes gating its reads and writes; an
//! empty scope marks data that is never exposed to third parties.

use crate::error::AdapterResult;
use std::collections::HashMap;
use std::sync::Arc;
use strata_authorization::Scope;
use strata_core::{Filter, RecordSet, RouteCode, RowValues, SortOrder};

/// The contract every adapter implements.
///
/// Adapters may be invoked concurrently for the same route; an adapter
/// backed by a single physical store serializes its own writes; the
/// gateway imposes no mutual exclusion.
pub trait Adapter: Send + Sync {
    /// Query records. `None` means the resource currently has nothing to
    /// return; filters and ordering are interpreted by the adapter.
    fn query(
        &self,
        projection: Option<&[String]>,
        filter: Option<&Filter>,
        order: Option<&SortOrder>,
    ) -> AdapterResult<Option<RecordSet>>;

    /// Insert a record. Returns whether anything was stored.
    fn insert(&self, values: &RowValues) -> AdapterResult<bool>;

    /// Update matching records. Returns the affected count.
    fn update(&self, values: &RowValues, filter: Option<&Filter>) -> AdapterResult<usize>;

    /// Delete matching records. Returns the affected count.
    fn delete(&self, filter: Option<&Filter>) -> AdapterResult<usize>;

    /// The scope gating queries. Defaults to unexposed.
    fn read_scope(&self) -> Scope {
        Scope::none()
    }

    /// The scope gating insert/update/delete. Defaults to unexposed.
    fn write_scope(&self) -> Scope {
        Scope::none()
    }

    /// Human-readable description of the data, for a consent surface.
    fn description(&self) -> String {
        String::new()
    }
}

/// Maps route codes to the adapter responsible for them.
///
/// Populated during single-threaded composition, read-only afterwards.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<RouteCode, Arc<dyn Adapter>>,
}

impl AdapterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an adapter to a route code.
    ///
    /// The last registration for a code wins, an intentional override
    /// behavior so compositions can replace a default adapter.
    pub fn register(&mut self, code: RouteCode, adapter: Arc<dyn Adapter>) {
        self.adapters.insert(code, adapter);
    }

    /// The adapter bound to a code, if any.
    pub fn resolve(&self, code: RouteCode) -> Option<Arc<dyn Adapter>> {
        self.adapters.get(&code).cloned()
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
