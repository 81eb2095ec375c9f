//! # Strata Gateway
//!
//! The orchestration layer of the Strata data-access gateway: the
//! [`Adapter`] contract and [`AdapterRegistry`], the [`EventBus`] for
//! lifecycle/call observers, the change-notification sink, and the
//! [`Gateway`] that ties routing, access control and adapter execution
//! together.
//!
//! # Request Flow
//!
//! ```text
//! identifier + operation + caller
//!     │
//!     ├─ RouteTable::matches        (strata-core)
//!     ├─ AdapterRegistry::resolve
//!     ├─ AccessGate::authorize_*    (strata-authorization)
//!     ├─ EventBus::publish_read / publish_write
//!     ├─ Adapter::query / insert / update / delete
//!     └─ ChangeSink::notify_changed  (successful mutations, fanned out
//!        to every identifier sharing the route code)
//! ```
//!
//! Routing misses, authorization denials and adapter failures all
//! collapse into the same empty/negative results at this boundary, so a
//! caller cannot distinguish "does not exist" from "not allowed".

pub mod adapter;
pub mod bus;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod store;

pub use adapter::{Adapter, AdapterRegistry};
pub use bus::{CallObserver, EventBus, LifecycleObserver, SubscriptionId};
pub use error::{AdapterError, AdapterResult, BuildError};
pub use gateway::{Gateway, GatewayBuilder};
pub use notify::{ChangeSink, NullSink};
pub use store::{FreshnessPolicy, KeyValueStore, MemoryStore, RecordAdapter};
