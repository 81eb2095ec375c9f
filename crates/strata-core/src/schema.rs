//! Explicit schema descriptors for adapter records
//!
//! Adapters declare an ordered list of typed fields at construction time
//! and validate write payloads against it. No runtime type inspection is
//! involved; the descriptor is the single source of truth for field names,
//! order, and admissible values.

use crate::error::{Error, Result};
use crate::record::RowValues;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The primitive types a schema field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Whole numbers
    Integer,
    /// Floating-point numbers (integers are admitted too)
    Float,
    /// Booleans
    Boolean,
    /// UTF-8 text
    Text,
}

impl FieldType {
    /// Whether a value is admissible for this type.
    pub fn admits(self, value: &Value) -> bool {
        match self {
            Self::Integer => value.as_i64().is_some() || value.as_u64().is_some(),
            Self::Float => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Text => value.is_string(),
        }
    }

    /// Stable lowercase name, used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
        }
    }
}

/// One named, typed field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
}

impl FieldDescriptor {
    /// Create a descriptor.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}

/// An ordered list of field descriptors declared by an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Build a schema from descriptors; order is preserved and defines
    /// column order for query results.
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// The descriptors, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// The field names in declaration order.
    pub fn columns(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name().to_owned()).collect()
    }

    /// Validate a write payload: every field must be declared and its
    /// value admissible for the declared type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaViolation`] naming the first offending field.
    pub fn validate(&self, values: &RowValues) -> Result<()> {
        for (name, value) in values.iter() {
            let Some(descriptor) = self.field(name) else {
                return Err(Error::schema_violation(name, "field is not declared"));
            };
            if value.is_null() {
                return Err(Error::schema_violation(name, "null is not admissible"));
            }
            if !descriptor.field_type().admits(value) {
                return Err(Error::schema_violation(
                    name,
                    format!("value is not {}", descriptor.field_type().as_str()),
                ));
            }
        }
        Ok(())
    }

    /// Resolve a projection to column names: `None` selects every declared
    /// field in schema order; unknown projected names are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaViolation`] for a projected field that is
    /// not declared.
    pub fn projection(&self, requested: Option<&[String]>) -> Result<Vec<String>> {
        match requested {
            None => Ok(self.columns()),
            Some(names) => {
                for name in names {
                    if self.field(name).is_none() {
                        return Err(Error::schema_violation(name, "field is not declared"));
                    }
                }
                Ok(names.to_vec())
            }
        }
    }
}
