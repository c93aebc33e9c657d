//! Configuration fragments.
//!
//! A fragment is a nested key-value payload: string keys, with scalar,
//! sequence or nested-map values. The top level is always a map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{kind_of, NotAMap};

/// A partial or complete configuration payload.
///
/// Fragments are never edited in place once shared; merging produces a new
/// fragment (see [`crate::merge`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fragment(Map<String, Value>);

impl Fragment {
    /// An empty fragment.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a fragment from a JSON value, rejecting anything but a map.
    pub fn from_value(value: Value) -> Result<Self, NotAMap> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(NotAMap {
                found: kind_of(&other),
            }),
        }
    }

    /// Builder-style insert of a top-level key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over top-level entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Get a value by dot-separated path (`autoscaling.max_count`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    pub fn get_u64(&self, path: &str) -> Option<u64> {
        self.get(path).and_then(|v| v.as_u64())
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.0)
    }
}

impl From<Map<String, Value>> for Fragment {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Fragment {
    type Error = NotAMap;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<Fragment> for Value {
    fn from(fragment: Fragment) -> Self {
        fragment.into_value()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Fragment {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
