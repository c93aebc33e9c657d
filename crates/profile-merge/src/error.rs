//! Errors raised while building or strictly merging fragments.

use serde_json::Value;

/// Returned when a value that is not a map is offered as a fragment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("fragment must be a map, found {found}")]
pub struct NotAMap {
    /// Kind of the rejected value.
    pub found: &'static str,
}

/// A map and a non-map met at the same key during a strict merge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("merge conflict at `{path}`: cannot merge {overlay} over {base}")]
pub struct MergeConflict {
    /// Dotted key path of the offending entry (e.g. `network.plugin`).
    pub path: String,

    /// Kind of the lower-precedence value.
    pub base: &'static str,

    /// Kind of the higher-precedence value.
    pub overlay: &'static str,
}

/// Short human name for the kind of a JSON value.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}
