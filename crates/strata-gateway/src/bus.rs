//! Event bus for lifecycle and per-call observers
//!
//! An explicitly constructed instance owned by the composition root and
//! shared by `Arc`; there is no process-wide singleton. Publication is
//! synchronous, on the calling thread, in subscriber-registration order.
//! A panicking observer is contained and logged so it cannot break the
//! gateway or starve later observers.

use parking_lot::RwLock;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use strata_core::{AttachInfo, ResourceIdentifier};

/// Observes gateway lifecycle transitions.
pub trait LifecycleObserver: Send + Sync {
    /// The gateway attached to its host.
    fn on_attach(&self, info: &AttachInfo);

    /// The gateway finished construction.
    fn on_create(&self);
}

/// Observes authorized calls before they reach the adapter.
pub trait CallObserver: Send + Sync {
    /// An authorized read is about to execute.
    fn on_read(&self, identifier: &ResourceIdentifier);

    /// An authorized mutation is about to execute.
    fn on_write(&self, identifier: &ResourceIdentifier);
}

/// Handle returned by `subscribe_*`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Synchronous publish/subscribe hub for gateway events.
#[derive(Default)]
pub struct EventBus {
    next_id: AtomicU64,
    lifecycle: RwLock<Vec<(SubscriptionId, Arc<dyn LifecycleObserver>)>>,
    calls: RwLock<Vec<(SubscriptionId, Arc<dyn CallObserver>)>>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a lifecycle observer; it is invoked in registration order.
    pub fn subscribe_lifecycle(&self, observer: Arc<dyn LifecycleObserver>) -> SubscriptionId {
        let id = self.next_id();
        self.lifecycle.write().push((id, observer));
        id
    }

    /// Remove a lifecycle observer. Returns whether it was subscribed.
    pub fn unsubscribe_lifecycle(&self, id: SubscriptionId) -> bool {
        let mut observers = self.lifecycle.write();
        let before = observers.len();
        observers.retain(|(entry_id, _)| *entry_id != id);
        observers.len() != before
    }

    /// Register a call observer; it is invoked in registration order.
    pub fn subscribe_calls(&self, observer: Arc<dyn CallObserver>) -> SubscriptionId {
        let id = self.next_id();
        self.calls.write().push((id, observer));
        id
    }

    /// Remove a call observer. Returns whether it was subscribed.
    pub fn unsubscribe_calls(&self, id: SubscriptionId) -> bool {
        let mut observers = self.calls.write();
        let before = observers.len();
        observers.retain(|(entry_id, _)| *entry_id != id);
        observers.len() != before
    }

    /// Publish the attach event.
    pub fn publish_attach(&self, info: &AttachInfo) {
        for observer in self.lifecycle_snapshot() {
            Self::contain("attach", || observer.on_attach(info));
        }
    }

    /// Publish the create event.
    pub fn publish_create(&self) {
        for observer in self.lifecycle_snapshot() {
            Self::contain("create", || observer.on_create());
        }
    }

    /// Publish a read event for an authorized query.
    pub fn publish_read(&self, identifier: &ResourceIdentifier) {
        for observer in self.calls_snapshot() {
            Self::contain("read", || observer.on_read(identifier));
        }
    }

    /// Publish a write event for an authorized mutation.
    pub fn publish_write(&self, identifier: &ResourceIdentifier) {
        for observer in self.calls_snapshot() {
            Self::contain("write", || observer.on_write(identifier));
        }
    }

    /// Snapshot under the read lock, then publish lock-free so observers
    /// may subscribe or unsubscribe reentrantly.
    fn lifecycle_snapshot(&self) -> Vec<Arc<dyn LifecycleObserver>> {
        self.lifecycle
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }

    fn calls_snapshot(&self) -> Vec<Arc<dyn CallObserver>> {
        self.calls
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }

    fn contain(event: &str, deliver: impl FnOnce()) {
        if panic::catch_unwind(AssertUnwindSafe(deliver)).is_err() {
            tracing::error!(event, "observer panicked during publication");
        }
    }
}
