//! Metadata cleaning before storage.

use crate::types::Metadata;
use serde_json::Value;

/// Drop entries whose value is `null` or the empty string.
///
/// Other values (numbers, booleans, non-empty strings) are kept unchanged.
pub fn clean_metadata(metadata: &Metadata) -> Metadata {
    metadata
        .iter()
        .filter(|(_, value)| !is_blank(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
