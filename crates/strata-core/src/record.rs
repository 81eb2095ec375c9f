//! Record and payload model for adapter operations
//!
//! Write payloads travel as [`RowValues`] (ordered field → value maps),
//! query results come back as a [`RecordSet`]. Selection is an opaque
//! [`Filter`] interpreted by the adapter that owns the resource.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered field-name → value map used as the write payload for
/// insert and update operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowValues {
    values: IndexMap<String, Value>,
}

impl RowValues {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(field.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Look up a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the payload carries no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A query result: column names plus rows of values in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RecordSet {
    /// Create an empty result with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowArity`] if the row length does not match the
    /// declared columns.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::RowArity {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// The column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The rows, each in column order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An opaque selection expression plus its positional arguments.
///
/// The gateway never interprets filters; the adapter owning the resource
/// gives them meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    expr: String,
    args: Vec<String>,
}

impl Filter {
    /// Create a filter from an expression and its arguments.
    pub fn new(expr: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            expr: expr.into(),
            args,
        }
    }

    /// The selection expression.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// The positional arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// An opaque sort-order clause, interpreted by the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortOrder(String);

impl SortOrder {
    /// Create a sort order from a clause string.
    pub fn new(clause: impl Into<String>) -> Self {
        Self(clause.into())
    }

    /// The clause as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
