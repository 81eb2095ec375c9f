//! The gateway orchestrator
//!
//! Stateless per request: Resolve → Authorize → Execute → Notify.
//! Routing misses and authorization denials produce the same
//! empty/negative outcome, so a caller cannot probe which resources
//! exist. Adapter failures are caught here, reported to the
//! observability sink, and converted to the same outcome. No error
//! crosses this boundary.

use crate::adapter::{Adapter, AdapterRegistry};
use crate::bus::EventBus;
use crate::error::BuildError;
use crate::notify::{ChangeSink, NullSink};
use std::sync::Arc;
use strata_authorization::{
    AccessGate, CallerId, GrantStore, IdentityResolver, MemoryGrantStore, PolicyStore,
};
use strata_core::{
    AttachInfo, Filter, RecordSet, ResourceIdentifier, RouteCode, RouteTable, RowValues, SortOrder,
};

/// The multi-tenant data-access gateway.
///
/// All routing and policy state is immutable after construction; the
/// gateway is `Send + Sync` and is shared by `Arc` across the host's
/// request-dispatch threads. Every call is synchronous and blocking;
/// cancellation and timeouts belong to the transport in front of it.
pub struct Gateway {
    routes: RouteTable,
    adapters: AdapterRegistry,
    gate: AccessGate,
    bus: Arc<EventBus>,
    sink: Arc<dyn ChangeSink>,
}

impl Gateway {
    /// Start assembling a gateway.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::default()
    }

    /// The event bus observers attach to.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Query a resource.
    ///
    /// Returns `None` when the identifier matches no route, the caller is
    /// not authorized, or the adapter fails; the cases are deliberately
    /// indistinguishable.
    pub fn query(
        &self,
        identifier: &ResourceIdentifier,
        caller: &CallerId,
        projection: Option<&[String]>,
        filter: Option<&Filter>,
        order: Option<&SortOrder>,
    ) -> Option<RecordSet> {
        let (_, adapter) = self.resolve(identifier)?;
        if !self.gate.authorize_read(caller, &adapter.read_scope()) {
            return None;
        }
        // The read event marks the authorized attempt, before the adapter
        // runs and independent of whether it yields data.
        self.bus.publish_read(identifier);
        match adapter.query(projection, filter, order) {
            Ok(result) => result,
            Err(error) => {
                tracing::error!(identifier = %identifier, error = %error, "adapter query failed");
                None
            }
        }
    }

    /// Insert into a resource. Returns whether anything was stored;
    /// `true` fans out one change notification per identifier sharing the
    /// route code.
    pub fn insert(
        &self,
        identifier: &ResourceIdentifier,
        caller: &CallerId,
        values: &RowValues,
    ) -> bool {
        let Some((code, adapter)) = self.resolve(identifier) else {
            return false;
        };
        if !self.gate.authorize_insert(caller, &adapter.write_scope()) {
            return false;
        }
        self.bus.publish_write(identifier);
        match adapter.insert(values) {
            Ok(true) => {
                self.notify_changed(code);
                true
            }
            Ok(false) => false,
            Err(error) => {
                tracing::error!(identifier = %identifier, error = %error, "adapter insert failed");
                false
            }
        }
    }

    /// Update matching records. Returns the affected count; a positive
    /// count fans out change notifications.
    pub fn update(
        &self,
        identifier: &ResourceIdentifier,
        caller: &CallerId,
        values: &RowValues,
        filter: Option<&Filter>,
    ) -> usize {
        let Some((code, adapter)) = self.resolve(identifier) else {
            return 0;
        };
        if !self.gate.authorize_update(caller, &adapter.write_scope()) {
            return 0;
        }
        self.bus.publish_write(identifier);
        match adapter.update(values, filter) {
            Ok(affected) => {
                if affected > 0 {
                    self.notify_changed(code);
                }
                affected
            }
            Err(error) => {
                tracing::error!(identifier = %identifier, error = %error, "adapter update failed");
                0
            }
        }
    }

    /// Delete matching records. Returns the affected count; a positive
    /// count fans out change notifications.
    pub fn delete(
        &self,
        identifier: &ResourceIdentifier,
        caller: &CallerId,
        filter: Option<&Filter>,
    ) -> usize {
        let Some((code, adapter)) = self.resolve(identifier) else {
            return 0;
        };
        if !self.gate.authorize_delete(caller, &adapter.write_scope()) {
            return 0;
        }
        self.bus.publish_write(identifier);
        match adapter.delete(filter) {
            Ok(affected) => {
                if affected > 0 {
                    self.notify_changed(code);
                }
                affected
            }
            Err(error) => {
                tracing::error!(identifier = %identifier, error = %error, "adapter delete failed");
                0
            }
        }
    }

    fn resolve(&self, identifier: &ResourceIdentifier) -> Option<(RouteCode, Arc<dyn Adapter>)> {
        let Some(code) = self.routes.matches(identifier) else {
            tracing::debug!(identifier = %identifier, "no route for identifier");
            return None;
        };
        let Some(adapter) = self.adapters.resolve(code) else {
            tracing::debug!(identifier = %identifier, code = %code, "no adapter for route");
            return None;
        };
        Some((code, adapter))
    }

    fn notify_changed(&self, code: RouteCode) {
        for identifier in self.routes.identifiers_for_code(code) {
            self.sink.notify_changed(identifier);
        }
    }
}

/// Assembles a [`Gateway`] from its collaborators.
///
/// Routes, adapters and policy are fixed at build time; only the grant
/// store and the event-bus subscriber lists stay mutable afterwards.
#[derive(Default)]
pub struct GatewayBuilder {
    routes: Vec<(String, RouteCode)>,
    adapters: AdapterRegistry,
    policy: PolicyStore,
    grants: Option<Arc<dyn GrantStore>>,
    identity: Option<Arc<dyn IdentityResolver>>,
    self_id: Option<CallerId>,
    bus: Option<Arc<EventBus>>,
    sink: Option<Arc<dyn ChangeSink>>,
    attach: Option<AttachInfo>,
}

impl GatewayBuilder {
    /// Declare a route pattern for a code. Patterns are validated at
    /// [`build`](Self::build) time.
    #[must_use]
    pub fn route(mut self, pattern: impl Into<String>, code: RouteCode) -> Self {
        self.routes.push((pattern.into(), code));
        self
    }

    /// Bind an adapter to a route code (last registration wins).
    #[must_use]
    pub fn adapter(mut self, code: RouteCode, adapter: Arc<dyn Adapter>) -> Self {
        self.adapters.register(code, adapter);
        self
    }

    /// The policy tables consulted by the access gate.
    #[must_use]
    pub fn policy(mut self, policy: PolicyStore) -> Self {
        self.policy = policy;
        self
    }

    /// The grant store shared with the consent flow. Defaults to a fresh
    /// [`MemoryGrantStore`].
    #[must_use]
    pub fn grants(mut self, grants: Arc<dyn GrantStore>) -> Self {
        self.grants = Some(grants);
        self
    }

    /// The identity-proof lookup used for fingerprint verification.
    #[must_use]
    pub fn identity(mut self, identity: Arc<dyn IdentityResolver>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// The hosting process's own identity (always authorized).
    #[must_use]
    pub fn self_identity(mut self, self_id: impl Into<CallerId>) -> Self {
        self.self_id = Some(self_id.into());
        self
    }

    /// The event bus to publish on. Defaults to a fresh instance.
    #[must_use]
    pub fn bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// The change-notification sink. Defaults to [`NullSink`].
    #[must_use]
    pub fn change_sink(mut self, sink: Arc<dyn ChangeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Attach information published on the bus at build time.
    #[must_use]
    pub fn attach_info(mut self, info: AttachInfo) -> Self {
        self.attach = Some(info);
        self
    }

    /// Build the gateway, publishing the attach (when provided) and
    /// create lifecycle events in that order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when a route pattern is invalid or the
    /// identity resolver / self identity are missing.
    pub fn build(self) -> Result<Gateway, BuildError> {
        let mut routes = RouteTable::new();
        for (pattern, code) in &self.routes {
            routes.register(pattern, *code)?;
        }

        let identity = self.identity.ok_or(BuildError::MissingIdentityResolver)?;
        let self_id = self.self_id.ok_or(BuildError::MissingSelfIdentity)?;
        let grants = self
            .grants
            .unwrap_or_else(|| Arc::new(MemoryGrantStore::new()));
        let bus = self.bus.unwrap_or_default();
        let sink = self.sink.unwrap_or_else(|| Arc::new(NullSink));

        let gateway = Gateway {
            routes,
            adapters: self.adapters,
            gate: AccessGate::new(self.policy, grants, identity, self_id),
            bus,
            sink,
        };

        if let Some(info) = &self.attach {
            gateway.bus.publish_attach(info);
        }
        gateway.bus.publish_create();
        tracing::debug!(
            routes = gateway.routes.len(),
            adapters = gateway.adapters.len(),
            "gateway assembled"
        );
        Ok(gateway)
    }
}
