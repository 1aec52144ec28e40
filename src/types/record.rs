//! Record Types
//!
//! Flat, display-ready projection of remote business objects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field-to-value map sent to create and update calls.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// Scalar field value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Boolean(bool),
}

impl FieldValue {
    /// Text content, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean content, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// One remote record of a given object type.
///
/// Serializes as a flat JSON object of its fields.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    #[serde(skip)]
    object_type: String,
    #[serde(flatten)]
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Create an empty record.
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Object type this record belongs to.
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Insert a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Field value by exact (case-sensitive) name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Text field value by name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    /// Record identifier, when selected.
    pub fn id(&self) -> Option<&str> {
        self.get_str("Id")
    }

    /// All fields, ordered by name.
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Consume the record, keeping its fields.
    pub fn into_fields(self) -> BTreeMap<String, FieldValue> {
        self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Normalized result of a SOQL query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryResult {
    /// Total rows matched by the query.
    pub total_size: u64,
    /// Whether all rows were returned in this page.
    pub done: bool,
    /// Locator for the next page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_records_url: Option<String>,
    /// Normalized rows.
    pub records: Vec<Record>,
}
