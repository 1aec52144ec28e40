//! Identifier Classifier
//!
//! Infers a record's object type from the key prefix of its identifier.

/// Object type assumed for identifiers with an unknown or missing prefix.
pub const DEFAULT_OBJECT_TYPE: &str = "Account";

/// Length of an identifier key prefix, in characters.
pub const KEY_PREFIX_LEN: usize = 3;

/// Known key prefixes. Append only.
pub const KEY_PREFIXES: &[(&str, &str)] = &[
    ("001", "Account"),
    ("003", "Contact"),
    ("005", "User"),
    ("006", "Opportunity"),
    ("00Q", "Lead"),
    ("01t", "Product2"),
    ("00T", "Task"),
    ("00U", "Event"),
    ("500", "Case"),
    ("701", "Campaign"),
    ("800", "Contract"),
    ("00D", "Organization"),
];

/// Key prefix of `id`, if it has at least three characters.
pub fn key_prefix(id: &str) -> Option<&str> {
    let (end, _) = id.char_indices().nth(KEY_PREFIX_LEN - 1)?;
    let end = end + id[end..].chars().next()?.len_utf8();
    Some(&id[..end])
}

/// Object type for a known key prefix.
pub fn object_type_for_prefix(prefix: &str) -> Option<&'static str> {
    KEY_PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, object_type)| *object_type)
}

/// Object type of the record identified by `id`.
///
/// Prefixes are case-sensitive; anything unrecognized maps to
/// [`DEFAULT_OBJECT_TYPE`].
pub fn classify_identifier(id: &str) -> &'static str {
    key_prefix(id)
        .and_then(object_type_for_prefix)
        .unwrap_or(DEFAULT_OBJECT_TYPE)
}
