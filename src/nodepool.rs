//! Per-pool node pool resolution
//!
//! Each requested pool name is resolved on its own by layering, lowest to
//! highest precedence:
//! 1. Fallback defaults
//! 2. Catalog entry for the name (if any)
//! 3. Caller override for the name (if any)
//!
//! Unknown names are never an error. A name with only an override is a
//! fully custom pool; a name with neither resolves to the fallback defaults.

use std::collections::BTreeMap;

use profile_merge::{merge_all, Fragment};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Caller-supplied partial overrides keyed by pool name
pub type Overrides = BTreeMap<String, Fragment>;

/// Layer that contributed to a resolved pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerOrigin {
    Fallback,
    Catalog,
    Override,
}

impl LayerOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerOrigin::Fallback => "fallback",
            LayerOrigin::Catalog => "catalog",
            LayerOrigin::Override => "override",
        }
    }
}

/// A resolved node pool with the layers it was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNodepool {
    /// Requested pool name
    pub name: String,

    /// Contributing layers in precedence order
    pub sources: Vec<LayerOrigin>,

    /// The merged configuration
    pub config: Fragment,
}

impl ResolvedNodepool {
    /// True when the name matched no catalog entry
    pub fn is_custom(&self) -> bool {
        !self.sources.contains(&LayerOrigin::Catalog)
    }
}

/// Resolve a single node pool.
pub fn resolve_nodepool(
    name: &str,
    catalog: &Catalog,
    overrides: &Overrides,
    fallback_defaults: &Fragment,
) -> Fragment {
    resolve_nodepool_with_sources(name, catalog, overrides, fallback_defaults).config
}

/// Resolve a single node pool, recording which layers applied.
pub fn resolve_nodepool_with_sources(
    name: &str,
    catalog: &Catalog,
    overrides: &Overrides,
    fallback_defaults: &Fragment,
) -> ResolvedNodepool {
    let applied: Vec<(LayerOrigin, &Fragment)> = [
        (LayerOrigin::Catalog, catalog.get(name)),
        (LayerOrigin::Override, overrides.get(name)),
    ]
    .into_iter()
    .filter_map(|(origin, layer)| layer.map(|fragment| (origin, fragment)))
    .collect();

    let sources = std::iter::once(LayerOrigin::Fallback)
        .chain(applied.iter().map(|(origin, _)| *origin))
        .collect();
    let config = merge_all(
        fallback_defaults.clone(),
        applied.iter().map(|(_, fragment)| *fragment),
    );

    ResolvedNodepool {
        name: name.to_string(),
        sources,
        config,
    }
}
