//! Profile catalogs
//!
//! A catalog is an immutable menu of named fragments. There is one catalog
//! for cluster features and one for node pool profiles; together with the
//! defaults they layer over they form a [`CatalogSet`].
//!
//! Lookups never fail. Whether a missing name is fatal (cluster features) or
//! a custom order (node pools) is decided by the caller.

mod builtin;
mod file;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use profile_merge::{try_merge, Fragment};
use serde::{Deserialize, Serialize};

pub(crate) use file::fragment_from_table;
pub use file::SCHEMA_VERSION;

/// Which catalog a profile belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    ClusterFeature,
    Nodepool,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::ClusterFeature => "cluster feature",
            CatalogKind::Nodepool => "node pool",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a catalog lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a Fragment),
    NotFound,
}

impl<'a> Lookup<'a> {
    pub fn found(self) -> Option<&'a Fragment> {
        match self {
            Lookup::Found(fragment) => Some(fragment),
            Lookup::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Immutable mapping from profile name to fragment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, Fragment>,
}

impl Catalog {
    pub fn new<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Fragment)>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Resolve a profile name to its fragment.
    pub fn lookup(&self, name: &str) -> Lookup<'_> {
        match self.entries.get(name) {
            Some(fragment) => Lookup::Found(fragment),
            None => Lookup::NotFound,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Fragment> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Profile names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fragment)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Free-function form of [`Catalog::lookup`].
pub fn lookup<'a>(catalog: &'a Catalog, name: &str) -> Lookup<'a> {
    catalog.lookup(name)
}

/// Both catalogs plus the defaults their entries layer over
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSet {
    /// Starting point for control plane composition
    pub cluster_defaults: Fragment,

    /// Fallback for every node pool
    pub nodepool_defaults: Fragment,

    pub cluster_features: Catalog,

    pub nodepools: Catalog,
}

impl CatalogSet {
    /// The catalog set compiled into the binary.
    pub fn builtin() -> &'static CatalogSet {
        builtin::catalog_set()
    }

    /// Catalog for the given kind
    pub fn catalog(&self, kind: CatalogKind) -> &Catalog {
        match kind {
            CatalogKind::ClusterFeature => &self.cluster_features,
            CatalogKind::Nodepool => &self.nodepools,
        }
    }

    /// Defaults the given kind layers over
    pub fn defaults(&self, kind: CatalogKind) -> &Fragment {
        match kind {
            CatalogKind::ClusterFeature => &self.cluster_defaults,
            CatalogKind::Nodepool => &self.nodepool_defaults,
        }
    }

    /// Check that every profile name is well formed and that every entry
    /// strictly merges over its defaults (no map/non-map clashes).
    pub fn verify(&self) -> Result<(), CatalogError> {
        for kind in [CatalogKind::ClusterFeature, CatalogKind::Nodepool] {
            let defaults = self.defaults(kind);
            for (name, fragment) in self.catalog(kind).iter() {
                validate_name(kind, name)?;
                try_merge(defaults, fragment).map_err(|source| CatalogError::MergeConflict {
                    kind,
                    name: name.to_string(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}

/// Profile names: non-empty, alphanumerics plus `-`, `_` and `.`
fn validate_name(kind: CatalogKind, name: &str) -> Result<(), CatalogError> {
    if name.is_empty() {
        return Err(CatalogError::InvalidName {
            kind,
            name: name.to_string(),
            reason: "name cannot be empty".to_string(),
        });
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(CatalogError::InvalidName {
            kind,
            name: name.to_string(),
            reason: "name must contain only alphanumeric characters, dashes, underscores and dots"
                .to_string(),
        });
    }

    Ok(())
}

/// Errors that can occur when loading or verifying a catalog set
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Catalog file not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported catalog schema_version {0} (expected {})", SCHEMA_VERSION)]
    UnsupportedSchema(u32),

    #[error("Invalid {kind} profile name '{name}': {reason}")]
    InvalidName {
        kind: CatalogKind,
        name: String,
        reason: String,
    },

    #[error("{kind} profile '{name}' does not layer over its defaults: {source}")]
    MergeConflict {
        kind: CatalogKind,
        name: String,
        source: profile_merge::MergeConflict,
    },
}
