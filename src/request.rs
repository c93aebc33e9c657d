//! Request and override files
//!
//! A request file selects profiles for one cluster:
//!
//! ```toml
//! features = ["standard-prod-tier", "private-cluster"]
//! nodepools = ["system", "my-custom-batch-pool"]
//!
//! [overrides.my-custom-batch-pool]
//! vm_size = "Standard_F16s_v2"
//! ```
//!
//! An overrides file holds only the override tables, keyed by pool name at
//! the top level.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use profile_merge::merge_owned;
use serde::Deserialize;

use crate::catalog::fragment_from_table;
use crate::nodepool::Overrides;
use crate::resolve::ResolveRequest;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RequestFile {
    #[serde(default)]
    features: Vec<String>,

    #[serde(default)]
    nodepools: Vec<String>,

    #[serde(default)]
    cluster_base: Option<toml::Table>,

    #[serde(default)]
    overrides: BTreeMap<String, toml::Table>,
}

/// Errors that can occur when loading request or override files
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Request file not found: {0}")]
    NotFound(PathBuf),

    #[error("Override '{name}' must be a table, found {found}")]
    InvalidOverride { name: String, found: &'static str },
}

impl ResolveRequest {
    /// Load a request from a TOML file
    pub fn load(path: &Path) -> Result<Self, RequestError> {
        let content = read_existing(path)?;
        Self::parse(&content)
    }

    /// Parse a request from a TOML string
    pub fn parse(content: &str) -> Result<Self, RequestError> {
        let file: RequestFile = toml::from_str(content)?;

        Ok(Self {
            features: file.features,
            cluster_base: file.cluster_base.map(fragment_from_table),
            nodepools: file.nodepools,
            overrides: file
                .overrides
                .into_iter()
                .map(|(name, table)| (name, fragment_from_table(table)))
                .collect(),
        })
    }

    /// Layer `extra` over the request's own overrides, pool by pool.
    ///
    /// Keys set in `extra` win; keys only the request sets are kept.
    pub fn layer_overrides(&mut self, extra: Overrides) {
        for (name, fragment) in extra {
            let layered = match self.overrides.remove(&name) {
                Some(existing) => merge_owned(existing, &fragment),
                None => fragment,
            };
            self.overrides.insert(name, layered);
        }
    }
}

/// Load an overrides file
pub fn load_overrides(path: &Path) -> Result<Overrides, RequestError> {
    let content = read_existing(path)?;
    parse_overrides(&content)
}

/// Parse overrides from a TOML string; every top-level entry must be a table.
pub fn parse_overrides(content: &str) -> Result<Overrides, RequestError> {
    let table: toml::Table = toml::from_str(content)?;

    table
        .into_iter()
        .map(|(name, value)| match value {
            toml::Value::Table(t) => Ok((name, fragment_from_table(t))),
            other => Err(RequestError::InvalidOverride {
                name,
                found: other.type_str(),
            }),
        })
        .collect()
}

fn read_existing(path: &Path) -> Result<String, RequestError> {
    if !path.exists() {
        return Err(RequestError::NotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}
