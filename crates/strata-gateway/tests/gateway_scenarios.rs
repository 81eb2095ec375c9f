//! End-to-end gateway scenarios
//!
//! These tests compose the full stack (route table, adapter registry,
//! policy store, grant store, event bus, change sink) and drive it the
//! way a host process would.

use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use strata_authorization::{
    AuthError, CallerConfiguration, CallerId, Fingerprint, GrantStore, IdentityResolver,
    MemoryGrantStore, PolicyStore, Scope, StaticResolver,
};
use strata_core::{
    FieldDescriptor, FieldType, Filter, RecordSet, ResourceIdentifier, RouteCode, RowValues,
    Schema, SortOrder,
};
use strata_gateway::{
    Adapter, AdapterResult, ChangeSink, EventBus, Gateway, MemoryStore, RecordAdapter,
};

const SELF_ID: &str = "com.acme.host";
const GENERAL_CALLER: &str = "com.x.y";
const PRIVILEGED_CALLER: &str = "com.acme.hub";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("strata=debug")
        .try_init();
}

fn activity_schema() -> Schema {
    Schema::new(vec![
        FieldDescriptor::new("step", FieldType::Integer),
        FieldDescriptor::new("distance", FieldType::Float),
    ])
}

fn open_data_adapter() -> Arc<RecordAdapter> {
    Arc::new(
        RecordAdapter::new(Arc::new(MemoryStore::new()), "open_data", activity_schema())
            .with_read_scope(Scope::new("READ_OPEN"))
            .with_write_scope(Scope::new("WRITE_OPEN"))
            .with_description("open activity data"),
    )
}

fn policy() -> PolicyStore {
    PolicyStore::builder()
        .privileged(CallerConfiguration::new(
            PRIVILEGED_CALLER,
            [Fingerprint::of_certificate(b"hub certificate")],
            [Scope::new("READ_OPEN"), Scope::new("WRITE_OPEN")],
        ))
        .general(CallerConfiguration::new(
            GENERAL_CALLER,
            [Fingerprint::of_certificate(b"xy certificate")],
            [Scope::new("READ_OPEN"), Scope::new("WRITE_OPEN")],
        ))
        .build()
}

fn resolver() -> StaticResolver {
    StaticResolver::new()
        .with(
            PRIVILEGED_CALLER,
            Fingerprint::of_certificate(b"hub certificate"),
        )
        .with(
            GENERAL_CALLER,
            Fingerprint::of_certificate(b"xy certificate"),
        )
}

/// Counts call events on the bus.
#[derive(Default)]
struct CallCounter {
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl strata_gateway::CallObserver for CallCounter {
    fn on_read(&self, _identifier: &ResourceIdentifier) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }

    fn on_write(&self, _identifier: &ResourceIdentifier) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Collects change notifications.
#[derive(Default)]
struct CollectingSink {
    notified: Mutex<Vec<ResourceIdentifier>>,
}

impl CollectingSink {
    fn notified(&self) -> Vec<ResourceIdentifier> {
        self.notified.lock().unwrap().clone()
    }
}

impl ChangeSink for CollectingSink {
    fn notify_changed(&self, identifier: &ResourceIdentifier) {
        self.notified.lock().unwrap().push(identifier.clone());
    }
}

struct Fixture {
    gateway: Gateway,
    grants: Arc<MemoryGrantStore>,
    sink: Arc<CollectingSink>,
    counter: Arc<CallCounter>,
}

fn fixture_with_adapter(adapter: Arc<dyn Adapter>) -> Fixture {
    let grants = Arc::new(MemoryGrantStore::new());
    let sink = Arc::new(CollectingSink::default());
    let counter = Arc::new(CallCounter::default());
    let bus = Arc::new(EventBus::new());
    bus.subscribe_calls(Arc::clone(&counter) as Arc<dyn strata_gateway::CallObserver>);

    let gateway = Gateway::builder()
        .route("acme/open/data", RouteCode(1))
        .route("acme/open/data-alias", RouteCode(1))
        .adapter(RouteCode(1), adapter)
        .policy(policy())
        .grants(Arc::clone(&grants) as Arc<dyn GrantStore>)
        .identity(Arc::new(resolver()))
        .self_identity(SELF_ID)
        .bus(bus)
        .change_sink(Arc::clone(&sink) as Arc<dyn ChangeSink>)
        .build()
        .unwrap();

    Fixture {
        gateway,
        grants,
        sink,
        counter,
    }
}

fn fixture() -> Fixture {
    fixture_with_adapter(open_data_adapter())
}

fn data_id() -> ResourceIdentifier {
    ResourceIdentifier::new("acme/open/data")
}

#[test]
fn general_caller_denied_until_granted_then_served() {
    init_tracing();
    let f = fixture();
    let caller = CallerId::new(GENERAL_CALLER);

    // No grant yet: denied, and no read event marks the attempt.
    assert!(f.gateway.query(&data_id(), &caller, None, None, None).is_none());
    assert_eq!(f.counter.reads.load(Ordering::SeqCst), 0);

    f.grants
        .grant(&caller, HashSet::from([Scope::new("READ_OPEN")]));

    let set = f
        .gateway
        .query(&data_id(), &caller, None, None, None)
        .unwrap();
    assert_eq!(set.columns(), ["step", "distance"]);
    assert_eq!(set.len(), 1);
    assert_eq!(f.counter.reads.load(Ordering::SeqCst), 1);
}

#[test]
fn privileged_caller_served_without_any_grant() {
    let f = fixture();
    let caller = CallerId::new(PRIVILEGED_CALLER);
    assert!(f.gateway.query(&data_id(), &caller, None, None, None).is_some());
}

#[test]
fn forged_caller_identity_denied() {
    // The impostor claims the general caller's identifier but presents a
    // different certificate.
    let grants = Arc::new(MemoryGrantStore::new());
    grants.grant(
        &CallerId::new(GENERAL_CALLER),
        HashSet::from([Scope::new("READ_OPEN")]),
    );
    let impostor_resolver = StaticResolver::new().with(
        GENERAL_CALLER,
        Fingerprint::of_certificate(b"impostor certificate"),
    );

    let gateway = Gateway::builder()
        .route("acme/open/data", RouteCode(1))
        .adapter(RouteCode(1), open_data_adapter())
        .policy(policy())
        .grants(grants as Arc<dyn GrantStore>)
        .identity(Arc::new(impostor_resolver))
        .self_identity(SELF_ID)
        .build()
        .unwrap();

    let result = gateway.query(&data_id(), &CallerId::new(GENERAL_CALLER), None, None, None);
    assert!(result.is_none());
}

#[test]
fn self_identity_reaches_unexposed_adapter() {
    // An adapter with no scopes at all: third parties can never reach it,
    // the host always can.
    let unexposed = Arc::new(RecordAdapter::new(
        Arc::new(MemoryStore::new()),
        "internal",
        activity_schema(),
    ));
    let f = fixture_with_adapter(unexposed);

    assert!(f
        .gateway
        .query(&data_id(), &CallerId::new(SELF_ID), None, None, None)
        .is_some());
    assert!(f
        .gateway
        .query(&data_id(), &CallerId::new(PRIVILEGED_CALLER), None, None, None)
        .is_none());
}

#[test]
fn routing_miss_is_indistinguishable_from_denial() {
    let f = fixture();
    let caller = CallerId::new(PRIVILEGED_CALLER);

    let miss = f
        .gateway
        .query(&ResourceIdentifier::new("acme/unknown"), &caller, None, None, None);
    assert!(miss.is_none());
    assert!(!f.gateway.insert(
        &ResourceIdentifier::new("acme/unknown"),
        &caller,
        &RowValues::new().with("step", json!(1)),
    ));
    assert_eq!(
        f.gateway
            .delete(&ResourceIdentifier::new("acme/unknown"), &caller, None),
        0
    );
}

#[test]
fn successful_insert_notifies_every_identifier_of_the_route() {
    init_tracing();
    let f = fixture();
    let caller = CallerId::new(PRIVILEGED_CALLER);

    let stored = f
        .gateway
        .insert(&data_id(), &caller, &RowValues::new().with("step", json!(42)));
    assert!(stored);

    // Both identifiers registered for code 1, exactly once each.
    assert_eq!(
        f.sink.notified(),
        vec![
            ResourceIdentifier::new("acme/open/data"),
            ResourceIdentifier::new("acme/open/data-alias"),
        ]
    );
    assert_eq!(f.counter.writes.load(Ordering::SeqCst), 1);
}

#[test]
fn zero_affected_mutation_notifies_nothing() {
    let f = fixture();
    let caller = CallerId::new(PRIVILEGED_CALLER);

    // Deleting an absent record affects nothing.
    assert_eq!(f.gateway.delete(&data_id(), &caller, None), 0);
    // An empty update payload affects nothing.
    assert_eq!(
        f.gateway.update(&data_id(), &caller, &RowValues::new(), None),
        0
    );
    assert!(f.sink.notified().is_empty());
}

#[test]
fn update_and_delete_report_affected_and_notify() {
    let f = fixture();
    let caller = CallerId::new(PRIVILEGED_CALLER);

    assert!(f
        .gateway
        .insert(&data_id(), &caller, &RowValues::new().with("step", json!(1))));
    assert_eq!(
        f.gateway.update(
            &data_id(),
            &caller,
            &RowValues::new().with("step", json!(2)),
            None
        ),
        1
    );
    assert_eq!(f.gateway.delete(&data_id(), &caller, None), 1);

    // insert + update + delete, two identifiers each.
    assert_eq!(f.sink.notified().len(), 6);
}

/// An adapter whose store is broken.
struct FailingAdapter;

impl Adapter for FailingAdapter {
    fn query(
        &self,
        _projection: Option<&[String]>,
        _filter: Option<&Filter>,
        _order: Option<&SortOrder>,
    ) -> AdapterResult<Option<RecordSet>> {
        Err(strata_gateway::AdapterError::storage("disk unavailable"))
    }

    fn insert(&self, _values: &RowValues) -> AdapterResult<bool> {
        Err(strata_gateway::AdapterError::storage("disk unavailable"))
    }

    fn update(&self, _values: &RowValues, _filter: Option<&Filter>) -> AdapterResult<usize> {
        Err(strata_gateway::AdapterError::storage("disk unavailable"))
    }

    fn delete(&self, _filter: Option<&Filter>) -> AdapterResult<usize> {
        Err(strata_gateway::AdapterError::storage("disk unavailable"))
    }

    fn read_scope(&self) -> Scope {
        Scope::new("READ_OPEN")
    }

    fn write_scope(&self) -> Scope {
        Scope::new("WRITE_OPEN")
    }
}

#[test]
fn adapter_failures_become_negative_results() {
    let f = fixture_with_adapter(Arc::new(FailingAdapter));
    let caller = CallerId::new(PRIVILEGED_CALLER);

    assert!(f.gateway.query(&data_id(), &caller, None, None, None).is_none());
    assert!(!f
        .gateway
        .insert(&data_id(), &caller, &RowValues::new().with("step", json!(1))));
    assert_eq!(
        f.gateway
            .update(&data_id(), &caller, &RowValues::new().with("step", json!(1)), None),
        0
    );
    assert_eq!(f.gateway.delete(&data_id(), &caller, None), 0);

    // The write events mark the authorized attempts even though every
    // execution failed; failed mutations notify nothing.
    assert_eq!(f.counter.writes.load(Ordering::SeqCst), 3);
    assert_eq!(f.counter.reads.load(Ordering::SeqCst), 1);
    assert!(f.sink.notified().is_empty());
}

/// A resolver whose platform lookup errors.
struct BrokenResolver;

impl IdentityResolver for BrokenResolver {
    fn fingerprint_of(&self, caller: &CallerId) -> strata_authorization::Result<Option<Fingerprint>> {
        Err(AuthError::identity_lookup(
            caller.as_str(),
            "signature service unreachable",
        ))
    }
}

#[test]
fn identity_lookup_failure_is_a_denial_not_a_fault() {
    let gateway = Gateway::builder()
        .route("acme/open/data", RouteCode(1))
        .adapter(RouteCode(1), open_data_adapter())
        .policy(policy())
        .identity(Arc::new(BrokenResolver))
        .self_identity(SELF_ID)
        .build()
        .unwrap();

    let result = gateway.query(&data_id(), &CallerId::new(PRIVILEGED_CALLER), None, None, None);
    assert!(result.is_none());
}

#[test]
fn lifecycle_events_fire_at_build_in_attach_create_order() {
    #[derive(Default)]
    struct LifecycleRecorder {
        log: Mutex<Vec<String>>,
    }

    impl strata_gateway::LifecycleObserver for LifecycleRecorder {
        fn on_attach(&self, info: &strata_core::AttachInfo) {
            self.log.lock().unwrap().push(format!("attach:{}", info.authority));
        }

        fn on_create(&self) {
            self.log.lock().unwrap().push("create".to_owned());
        }
    }

    let recorder = Arc::new(LifecycleRecorder::default());
    let bus = Arc::new(EventBus::new());
    bus.subscribe_lifecycle(Arc::clone(&recorder) as Arc<dyn strata_gateway::LifecycleObserver>);

    let _gateway = Gateway::builder()
        .route("acme/open/data", RouteCode(1))
        .adapter(RouteCode(1), open_data_adapter())
        .policy(policy())
        .identity(Arc::new(resolver()))
        .self_identity(SELF_ID)
        .bus(bus)
        .attach_info(strata_core::AttachInfo::new("acme", "open data gateway"))
        .build()
        .unwrap();

    assert_eq!(
        *recorder.log.lock().unwrap(),
        vec!["attach:acme".to_owned(), "create".to_owned()]
    );
}

#[test]
fn builder_requires_identity_and_self_id() {
    let missing_identity = Gateway::builder().self_identity(SELF_ID).build();
    assert!(missing_identity.is_err());

    let missing_self = Gateway::builder()
        .identity(Arc::new(resolver()))
        .build();
    assert!(missing_self.is_err());
}
