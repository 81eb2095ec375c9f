//! Single-record adapter over a key-value store
//!
//! Stores one record as a JSON object under a fixed key, the pattern for
//! small "latest value" resources like a daily activity summary. Writes
//! are validated against the adapter's schema; the record's shape is
//! defined entirely by the explicit descriptor, never inspected at
//! runtime.

use crate::adapter::Adapter;
use crate::error::AdapterResult;
use crate::store::kv::KeyValueStore;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use strata_authorization::Scope;
use strata_core::{FieldType, Filter, RecordSet, RowValues, Schema, SortOrder};

/// Decides whether a stored record is still current and stamps records at
/// write time.
///
/// The reference use is a daily summary that resets at midnight: `stamp`
/// records the write time into a schema field, `is_fresh` compares it to
/// the current day. Implementations own their clock; the adapter never
/// reads one.
pub trait FreshnessPolicy: Send + Sync {
    /// Whether the stored record is still current.
    fn is_fresh(&self, record: &RowValues) -> bool;

    /// Stamp a record at write (and reset) time.
    fn stamp(&self, record: &mut RowValues);
}

/// A single-record adapter backed by a [`KeyValueStore`].
///
/// Queries return the one record (a default-valued record when nothing is
/// stored); inserts and updates merge the payload into it. Filters and
/// sort order are accepted for contract compatibility and ignored; there
/// is only one record.
pub struct RecordAdapter {
    store: Arc<dyn KeyValueStore>,
    key: String,
    schema: Schema,
    read_scope: Scope,
    write_scope: Scope,
    description: String,
    freshness: Option<Arc<dyn FreshnessPolicy>>,
    // Serializes load-merge-persist sequences; the store's own locking
    // only covers single operations.
    write_lock: Mutex<()>,
}

impl RecordAdapter {
    /// Create an adapter storing its record under `key`.
    ///
    /// Scopes default to unexposed: without
    /// [`with_read_scope`](Self::with_read_scope) /
    /// [`with_write_scope`](Self::with_write_scope) no third party can
    /// reach the data.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, schema: Schema) -> Self {
        Self {
            store,
            key: key.into(),
            schema,
            read_scope: Scope::none(),
            write_scope: Scope::none(),
            description: String::new(),
            freshness: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Expose queries under a scope.
    #[must_use]
    pub fn with_read_scope(mut self, scope: Scope) -> Self {
        self.read_scope = scope;
        self
    }

    /// Expose mutations under a scope.
    #[must_use]
    pub fn with_write_scope(mut self, scope: Scope) -> Self {
        self.write_scope = scope;
        self
    }

    /// Describe the data for consent surfaces.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Apply a freshness policy; stale records reset to defaults when
    /// read.
    #[must_use]
    pub fn with_freshness(mut self, policy: Arc<dyn FreshnessPolicy>) -> Self {
        self.freshness = Some(policy);
        self
    }

    /// A record with every schema field at its default value, stamped.
    fn default_record(&self) -> RowValues {
        let mut record = RowValues::new();
        for field in self.schema.fields() {
            let value = match field.field_type() {
                FieldType::Integer => Value::from(0),
                FieldType::Float => Value::from(0.0),
                FieldType::Boolean => Value::from(false),
                FieldType::Text => Value::from(""),
            };
            record.set(field.name(), value);
        }
        self.stamp(record)
    }

    fn stamp(&self, mut record: RowValues) -> RowValues {
        if let Some(policy) = &self.freshness {
            policy.stamp(&mut record);
        }
        record
    }

    fn load(&self) -> AdapterResult<Option<RowValues>> {
        match self.store.get(&self.key) {
            Some(stored) => Ok(Some(serde_json::from_str(&stored)?)),
            None => Ok(None),
        }
    }

    fn persist(&self, record: &RowValues) -> AdapterResult<()> {
        let encoded = serde_json::to_string(record)?;
        self.store.put(&self.key, encoded);
        Ok(())
    }

    /// The record as a reader should see it: defaults when nothing is
    /// stored, reset (and persisted) when the stored record went stale.
    fn current(&self) -> AdapterResult<RowValues> {
        match self.load()? {
            Some(record) => {
                let fresh = self.freshness.as_ref().map_or(true, |p| p.is_fresh(&record));
                if fresh {
                    Ok(record)
                } else {
                    tracing::debug!(key = %self.key, "stored record went stale, resetting");
                    let record = self.default_record();
                    self.persist(&record)?;
                    Ok(record)
                }
            }
            None => Ok(self.default_record()),
        }
    }

    /// Merge a payload into the stored record under the write lock.
    fn merge(&self, values: &RowValues) -> AdapterResult<()> {
        self.schema.validate(values)?;
        let _guard = self.write_lock.lock();
        let mut record = self.load()?.unwrap_or_else(|| self.default_record());
        for (field, value) in values.iter() {
            record.set(field, value.clone());
        }
        let record = self.stamp(record);
        self.persist(&record)
    }
}

impl Adapter for RecordAdapter {
    fn query(
        &self,
        projection: Option<&[String]>,
        _filter: Option<&Filter>,
        _order: Option<&SortOrder>,
    ) -> AdapterResult<Option<RecordSet>> {
        let record = self.current()?;
        let columns = self.schema.projection(projection)?;
        let row = columns
            .iter()
            .map(|column| record.get(column).cloned().unwrap_or(Value::Null))
            .collect();
        let mut set = RecordSet::new(columns);
        set.push_row(row)?;
        Ok(Some(set))
    }

    fn insert(&self, values: &RowValues) -> AdapterResult<bool> {
        if values.is_empty() {
            return Ok(false);
        }
        self.merge(values)?;
        Ok(true)
    }

    fn update(&self, values: &RowValues, _filter: Option<&Filter>) -> AdapterResult<usize> {
        if values.is_empty() {
            return Ok(0);
        }
        self.merge(values)?;
        Ok(1)
    }

    fn delete(&self, _filter: Option<&Filter>) -> AdapterResult<usize> {
        let _guard = self.write_lock.lock();
        Ok(usize::from(self.store.remove(&self.key)))
    }

    fn read_scope(&self) -> Scope {
        self.read_scope.clone()
    }

    fn write_scope(&self) -> Scope {
        self.write_scope.clone()
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::kv::MemoryStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use strata_core::FieldDescriptor;

    fn schema() -> Schema {
        Schema::new(vec![
            FieldDescriptor::new("step", FieldType::Integer),
            FieldDescriptor::new("distance", FieldType::Float),
            FieldDescriptor::new("label", FieldType::Text),
        ])
    }

    fn adapter() -> RecordAdapter {
        RecordAdapter::new(Arc::new(MemoryStore::new()), "activity", schema())
            .with_read_scope(Scope::new("READ_OPEN_DATA"))
            .with_write_scope(Scope::new("WRITE_OPEN_DATA"))
            .with_description("daily activity summary")
    }

    #[test]
    fn query_without_stored_record_returns_defaults() {
        let adapter = adapter();
        let set = adapter.query(None, None, None).unwrap().unwrap();
        assert_eq!(set.columns(), ["step", "distance", "label"]);
        assert_eq!(set.rows(), [vec![json!(0), json!(0.0), json!("")]]);
    }

    #[test]
    fn insert_then_query_round_trips() {
        let adapter = adapter();
        let stored = adapter
            .insert(&RowValues::new().with("step", json!(120)).with("label", json!("walk")))
            .unwrap();
        assert!(stored);

        let set = adapter.query(None, None, None).unwrap().unwrap();
        assert_eq!(set.rows(), [vec![json!(120), json!(0.0), json!("walk")]]);
    }

    #[test]
    fn projection_limits_and_orders_columns() {
        let adapter = adapter();
        adapter
            .insert(&RowValues::new().with("step", json!(5)))
            .unwrap();

        let requested = vec!["label".to_owned(), "step".to_owned()];
        let set = adapter.query(Some(&requested), None, None).unwrap().unwrap();
        assert_eq!(set.columns(), ["label", "step"]);
        assert_eq!(set.rows(), [vec![json!(""), json!(5)]]);
    }

    #[test]
    fn unknown_projection_field_is_an_error() {
        let adapter = adapter();
        let requested = vec!["bogus".to_owned()];
        assert!(adapter.query(Some(&requested), None, None).is_err());
    }

    #[test]
    fn insert_rejects_payload_outside_schema() {
        let adapter = adapter();
        assert!(adapter
            .insert(&RowValues::new().with("unknown", json!(1)))
            .is_err());
        assert!(adapter
            .insert(&RowValues::new().with("step", json!("text")))
            .is_err());
    }

    #[test]
    fn empty_payloads_store_nothing() {
        let adapter = adapter();
        assert!(!adapter.insert(&RowValues::new()).unwrap());
        assert_eq!(adapter.update(&RowValues::new(), None).unwrap(), 0);
    }

    #[test]
    fn update_merges_and_reports_one_affected() {
        let adapter = adapter();
        adapter
            .insert(&RowValues::new().with("step", json!(1)).with("label", json!("a")))
            .unwrap();
        let affected = adapter
            .update(&RowValues::new().with("step", json!(2)), None)
            .unwrap();
        assert_eq!(affected, 1);

        let set = adapter.query(None, None, None).unwrap().unwrap();
        assert_eq!(set.rows(), [vec![json!(2), json!(0.0), json!("a")]]);
    }

    #[test]
    fn delete_reports_affected_only_when_record_existed() {
        let adapter = adapter();
        assert_eq!(adapter.delete(None).unwrap(), 0);

        adapter
            .insert(&RowValues::new().with("step", json!(1)))
            .unwrap();
        assert_eq!(adapter.delete(None).unwrap(), 1);
        assert_eq!(adapter.delete(None).unwrap(), 0);
    }

    struct ExpirePolicy {
        expired: AtomicBool,
    }

    impl FreshnessPolicy for ExpirePolicy {
        fn is_fresh(&self, record: &RowValues) -> bool {
            !self.expired.load(Ordering::SeqCst) && record.get("label") != Some(&json!(""))
        }

        fn stamp(&self, record: &mut RowValues) {
            if record.get("label").is_none() {
                record.set("label", json!(""));
            }
        }
    }

    #[test]
    fn stale_record_resets_to_defaults_on_read() {
        let policy = Arc::new(ExpirePolicy {
            expired: AtomicBool::new(false),
        });
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let adapter = RecordAdapter::new(Arc::clone(&store), "activity", schema())
            .with_freshness(Arc::clone(&policy) as Arc<dyn FreshnessPolicy>);

        adapter
            .insert(&RowValues::new().with("step", json!(9)).with("label", json!("run")))
            .unwrap();
        policy.expired.store(true, Ordering::SeqCst);

        let set = adapter.query(None, None, None).unwrap().unwrap();
        assert_eq!(set.rows(), [vec![json!(0), json!(0.0), json!("")]]);
        // The reset was persisted.
        assert!(store.get("activity").unwrap().contains("\"step\":0"));
    }

    #[test]
    fn scopes_and_description_are_declared() {
        let adapter = adapter();
        assert_eq!(adapter.read_scope(), Scope::new("READ_OPEN_DATA"));
        assert_eq!(adapter.write_scope(), Scope::new("WRITE_OPEN_DATA"));
        assert_eq!(adapter.description(), "daily activity summary");
    }
}
