//! Query Builder
//!
//! SOQL text for single-record retrieval.

use crate::types::DEFAULT_RETRIEVAL_FIELDS;

/// Escape a value for use inside a single-quoted SOQL string literal.
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build `SELECT <fields> FROM <object_type> WHERE Id = '<id>' LIMIT 1`.
///
/// An empty field list selects `Id, Name`.
pub fn build_retrieval_query<S: AsRef<str>>(object_type: &str, id: &str, fields: &[S]) -> String {
    let field_list = if fields.is_empty() {
        DEFAULT_RETRIEVAL_FIELDS.join(", ")
    } else {
        fields
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "SELECT {} FROM {} WHERE Id = '{}' LIMIT 1",
        field_list,
        object_type,
        escape_literal(id)
    )
}
