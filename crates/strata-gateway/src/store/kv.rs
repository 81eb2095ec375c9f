//! Key-value storage contract

use parking_lot::RwLock;
use std::collections::HashMap;

/// A minimal string key-value store backing the reference adapters.
///
/// Individual operations are atomic; read-modify-write sequences are
/// serialized by the adapter on top.
pub trait KeyValueStore: Send + Sync {
    /// The value stored under a key, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value under a key, replacing any previous value.
    fn put(&self, key: &str, value: String);

    /// Remove a key. Returns whether a value was present.
    fn remove(&self, key: &str) -> bool;
}

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: &str, value: String) {
        self.entries.write().insert(key.to_owned(), value);
    }

    fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }
}
