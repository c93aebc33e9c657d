//! Catalog files
//!
//! Parses a TOML catalog:
//!
//! ```toml
//! schema_version = 1
//!
//! [cluster_defaults]
//! sku_tier = "Free"
//!
//! [nodepool_defaults]
//! os = "linux"
//!
//! [cluster_features.standard-prod-tier]
//! sku_tier = "Standard"
//!
//! [nodepools.general-purpose]
//! vm_size = "Standard_D8s_v5"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use profile_merge::Fragment;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{Catalog, CatalogError, CatalogSet};

/// Catalog file schema version
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default = "default_schema_version")]
    schema_version: u32,

    #[serde(default)]
    cluster_defaults: toml::Table,

    #[serde(default)]
    nodepool_defaults: toml::Table,

    #[serde(default)]
    cluster_features: BTreeMap<String, toml::Table>,

    #[serde(default)]
    nodepools: BTreeMap<String, toml::Table>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl CatalogSet {
    /// Load a catalog set from a TOML file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let set = Self::parse(&content)?;
        debug!(
            path = %path.display(),
            cluster_features = set.cluster_features.len(),
            nodepools = set.nodepools.len(),
            "loaded catalog file"
        );
        Ok(set)
    }

    /// Parse and verify a catalog set from a TOML string
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;

        if file.schema_version != SCHEMA_VERSION {
            return Err(CatalogError::UnsupportedSchema(file.schema_version));
        }

        let set = CatalogSet {
            cluster_defaults: fragment_from_table(file.cluster_defaults),
            nodepool_defaults: fragment_from_table(file.nodepool_defaults),
            cluster_features: catalog_from_tables(file.cluster_features),
            nodepools: catalog_from_tables(file.nodepools),
        };
        set.verify()?;
        Ok(set)
    }
}

fn catalog_from_tables(tables: BTreeMap<String, toml::Table>) -> Catalog {
    Catalog::new(
        tables
            .into_iter()
            .map(|(name, table)| (name, fragment_from_table(table))),
    )
}

/// Convert a TOML table into a fragment
pub(crate) fn fragment_from_table(table: toml::Table) -> Fragment {
    table
        .into_iter()
        .map(|(k, v)| (k, toml_to_json(v)))
        .collect()
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogKind;
    use serde_json::json;

    #[test]
    fn test_parse_minimal() {
        let set = CatalogSet::parse("").unwrap();
        assert!(set.cluster_features.is_empty());
        assert!(set.nodepools.is_empty());
        assert!(set.nodepool_defaults.is_empty());
    }

    #[test]
    fn test_parse_full() {
        let content = r#"
schema_version = 1

[cluster_defaults]
sku_tier = "Free"

[nodepool_defaults]
os = "linux"
taints = []

[cluster_features.standard-prod-tier]
sku_tier = "Standard"

[nodepools.gpu]
vm_size = "Standard_NC6s_v3"
taints = ["sku=gpu:NoSchedule"]

[nodepools.gpu.autoscaling]
enabled = true
max_count = 4
"#;
        let set = CatalogSet::parse(content).unwrap();

        assert_eq!(set.cluster_defaults.get_str("sku_tier"), Some("Free"));
        assert_eq!(
            set.cluster_features
                .get("standard-prod-tier")
                .and_then(|f| f.get_str("sku_tier")),
            Some("Standard")
        );

        let gpu = set.nodepools.get("gpu").unwrap();
        assert_eq!(gpu.get("taints"), Some(&json!(["sku=gpu:NoSchedule"])));
        assert_eq!(gpu.get_u64("autoscaling.max_count"), Some(4));
    }

    #[test]
    fn test_toml_scalars() {
        let content = r#"
[nodepool_defaults]
ratio = 0.5
created = 2024-01-01T00:00:00Z
"#;
        let set = CatalogSet::parse(content).unwrap();
        assert_eq!(set.nodepool_defaults.get("ratio"), Some(&json!(0.5)));
        assert_eq!(
            set.nodepool_defaults.get_str("created"),
            Some("2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_non_finite_floats_become_null() {
        let content = r#"
[nodepool_defaults]
x = inf
y = nan
z = -inf

[nodepools.burst]
x = 1.5
"#;
        let set = CatalogSet::parse(content).unwrap();
        assert_eq!(set.nodepool_defaults.get("x"), Some(&Value::Null));
        assert_eq!(set.nodepool_defaults.get("y"), Some(&Value::Null));
        assert_eq!(set.nodepool_defaults.get("z"), Some(&Value::Null));
        assert!(set.verify().is_ok());
    }

    #[test]
    fn test_unsupported_schema() {
        let err = CatalogSet::parse("schema_version = 2").unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedSchema(2)));
        assert_eq!(
            err.to_string(),
            format!("Unsupported catalog schema_version 2 (expected {})", SCHEMA_VERSION)
        );
    }

    #[test]
    fn test_unknown_table_rejected() {
        let err = CatalogSet::parse("[pools.a]\nvm_size = \"x\"").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_shape_clash_rejected() {
        let content = r#"
[nodepool_defaults.labels]
pool = "default"

[nodepools.bad]
labels = ["pool=bad"]
"#;
        let err = CatalogSet::parse(content).unwrap_err();
        match err {
            CatalogError::MergeConflict { kind, name, source } => {
                assert_eq!(kind, CatalogKind::Nodepool);
                assert_eq!(name, "bad");
                assert_eq!(source.path, "labels");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = CatalogSet::load(Path::new("/nonexistent/catalog.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }
}
