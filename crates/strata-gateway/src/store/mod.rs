//! Reference storage backends
//!
//! A pluggable key-value contract with an in-memory implementation, and
//! [`RecordAdapter`], a single-record adapter storing its record as JSON
//! under a fixed key, validated against an explicit schema.

mod kv;
mod record;

pub use kv::{KeyValueStore, MemoryStore};
pub use record::{FreshnessPolicy, RecordAdapter};
