//! Fragment merge logic
//!
//! Merge semantics, for every key of the higher-precedence operand:
//! - Maps: deep-merge by key (recursive)
//! - Sequences: REPLACE (overlay wins entirely, never concatenated)
//! - Scalars: override (overlay wins, including null)
//!
//! Keys present only in the base are kept as they are.

use serde_json::{Map, Value};

use crate::error::{kind_of, MergeConflict};
use crate::fragment::Fragment;

/// Deep merge two fragments, `overlay` taking precedence.
///
/// Neither input is touched; a new fragment is returned.
pub fn merge(base: &Fragment, overlay: &Fragment) -> Fragment {
    merge_owned(base.clone(), overlay)
}

/// Same as [`merge`] but consumes the base, which avoids a copy when folding.
pub fn merge_owned(base: Fragment, overlay: &Fragment) -> Fragment {
    if overlay.is_empty() {
        return base;
    }
    Fragment::from(merge_maps(base.into_map(), overlay.as_map().clone()))
}

/// Left-fold `layers` over `base`; the last layer has highest precedence.
pub fn merge_all<'a, I>(base: Fragment, layers: I) -> Fragment
where
    I: IntoIterator<Item = &'a Fragment>,
{
    layers.into_iter().fold(base, merge_owned)
}

/// Deep merge two JSON values.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(merge_maps(base_map, overlay_map))
        }

        // Sequences, scalars and mixed kinds: overlay wins
        (_, overlay) => overlay,
    }
}

fn merge_maps(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, overlay_value) in overlay {
        let merged = match base.remove(&key) {
            Some(base_value) => deep_merge(base_value, overlay_value),
            None => overlay_value,
        };
        base.insert(key, merged);
    }
    base
}

/// Strict variant of [`merge`].
///
/// Fails when a map and a non-map meet at the same key. A null on either
/// side is not a conflict: null may clear a map and a map may fill a null.
pub fn try_merge(base: &Fragment, overlay: &Fragment) -> Result<Fragment, MergeConflict> {
    let mut path = Vec::new();
    try_merge_maps(base.as_map().clone(), overlay.as_map(), &mut path).map(Fragment::from)
}

fn try_merge_maps(
    mut base: Map<String, Value>,
    overlay: &Map<String, Value>,
    path: &mut Vec<String>,
) -> Result<Map<String, Value>, MergeConflict> {
    for (key, overlay_value) in overlay {
        path.push(key.clone());
        let merged = match (base.remove(key), overlay_value) {
            (Some(Value::Object(base_map)), Value::Object(overlay_map)) => {
                Value::Object(try_merge_maps(base_map, overlay_map, path)?)
            }
            (Some(base_value), overlay_value) if is_shape_mismatch(&base_value, overlay_value) => {
                return Err(MergeConflict {
                    path: path.join("."),
                    base: kind_of(&base_value),
                    overlay: kind_of(overlay_value),
                });
            }
            (_, overlay_value) => overlay_value.clone(),
        };
        path.pop();
        base.insert(key.clone(), merged);
    }
    Ok(base)
}

fn is_shape_mismatch(base: &Value, overlay: &Value) -> bool {
    if base.is_null() || overlay.is_null() {
        return false;
    }
    base.is_object() != overlay.is_object()
}
