//! # Strata Core
//!
//! Core types for the Strata data-access gateway: hierarchical resource
//! identifiers, wildcard route patterns and the route table, operation
//! kinds, the record/value model, the explicit schema descriptor, and the
//! lifecycle/call event types.
//!
//! This crate is pure data and small engines: no I/O, no locking. The
//! orchestration layers (`strata-authorization`, `strata-gateway`) build on
//! top of it.

pub mod error;
pub mod event;
pub mod identifier;
pub mod operation;
pub mod record;
pub mod routing;
pub mod schema;

pub use error::{Error, Result};
pub use event::{AttachInfo, Event};
pub use identifier::ResourceIdentifier;
pub use operation::OperationKind;
pub use record::{Filter, RecordSet, RowValues, SortOrder};
pub use routing::{RouteCode, RoutePattern, RouteTable};
pub use schema::{FieldDescriptor, FieldType, Schema};
