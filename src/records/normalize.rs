//! Record Normalization
//!
//! Converts raw JSON rows into flat [`Record`]s of scalar values.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ProtocolError, SalesforceError, SalesforceResult};
use crate::soql::classify_identifier;
use crate::types::{FieldValue, QueryResult, Record};

/// Scalar value of a JSON field, or `None` for null and nested values.
pub fn normalize_value(value: &Value) -> Option<FieldValue> {
    match value {
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        Value::Number(n) => Some(
            n.as_f64()
                .map(FieldValue::Number)
                .unwrap_or_else(|| FieldValue::Text(n.to_string())),
        ),
        Value::Bool(b) => Some(FieldValue::Boolean(*b)),
        Value::Null | Value::Object(_) | Value::Array(_) => None,
    }
}

/// Normalize one JSON object into a record of `object_type`.
///
/// Nested objects (including the `attributes` metadata block), arrays and
/// nulls are dropped.
pub fn normalize_fields(object_type: &str, fields: &Map<String, Value>) -> Record {
    let mut record = Record::new(object_type);
    for (name, value) in fields {
        if let Some(value) = normalize_value(value) {
            record.insert(name.as_str(), value);
        }
    }
    record
}

/// Normalize a JSON row, which must be an object.
pub fn normalize_record(object_type: &str, row: &Value) -> SalesforceResult<Record> {
    match row {
        Value::Object(fields) => Ok(normalize_fields(object_type, fields)),
        other => Err(SalesforceError::Protocol(ProtocolError::InvalidJson {
            message: format!("expected a record object, got {}", json_kind(other)),
        })),
    }
}

/// Object type a query row declares in its `attributes` block, falling back
/// to its identifier prefix.
pub fn row_object_type(row: &Value) -> String {
    row.get("attributes")
        .and_then(|a| a.get("type"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            classify_identifier(row.get("Id").and_then(Value::as_str).unwrap_or_default())
                .to_string()
        })
}

/// Raw query response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub total_size: u64,
    #[serde(default = "default_done")]
    pub done: bool,
    #[serde(default)]
    pub next_records_url: Option<String>,
    #[serde(default)]
    pub records: Vec<Value>,
}

fn default_done() -> bool {
    true
}

impl QueryResponse {
    pub(crate) fn parse(body: &str) -> SalesforceResult<Self> {
        serde_json::from_str(body).map_err(|e| {
            SalesforceError::Protocol(ProtocolError::InvalidJson {
                message: format!("query response: {}", e),
            })
        })
    }

    /// Normalize every row, typing each by its own `attributes`.
    pub(crate) fn into_query_result(self) -> SalesforceResult<QueryResult> {
        let records = self
            .records
            .iter()
            .map(|row| normalize_record(&row_object_type(row), row))
            .collect::<SalesforceResult<Vec<_>>>()?;

        Ok(QueryResult {
            total_size: self.total_size,
            done: self.done,
            next_records_url: self.next_records_url,
            records,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
