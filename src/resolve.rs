//! Resolution orchestrator
//!
//! Ties control plane composition and per-pool resolution together:
//! one control plane configuration plus one configuration per requested
//! node pool, or a structured error. Pure apart from log events.

use std::collections::BTreeSet;

use profile_merge::Fragment;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::catalog::CatalogSet;
use crate::compose::compose_cluster_config;
use crate::error::{DigestError, ResolveError};
use crate::nodepool::{resolve_nodepool_with_sources, Overrides, ResolvedNodepool};

/// Everything a caller selects for one cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    /// Cluster feature profiles, in application order
    #[serde(default)]
    pub features: Vec<String>,

    /// Base for composition; the catalog's cluster defaults when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_base: Option<Fragment>,

    /// Node pool names, in output order
    #[serde(default)]
    pub nodepools: Vec<String>,

    /// Partial overrides keyed by pool name
    #[serde(default, skip_serializing_if = "Overrides::is_empty")]
    pub overrides: Overrides,
}

impl ResolveRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_features(mut self, features: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.features.extend(features.into_iter().map(Into::into));
        self
    }

    pub fn with_nodepools(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.nodepools.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_override(mut self, name: impl Into<String>, fragment: Fragment) -> Self {
        self.overrides.insert(name.into(), fragment);
        self
    }

    pub fn with_cluster_base(mut self, base: Fragment) -> Self {
        self.cluster_base = Some(base);
        self
    }
}

/// Fully resolved configurations for one cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSet {
    /// Control plane configuration
    pub cluster_config: Fragment,

    /// One entry per requested pool, in request order
    pub nodepool_configs: Vec<ResolvedNodepool>,
}

impl ResolvedSet {
    /// First resolved pool with the given name
    pub fn nodepool(&self, name: &str) -> Option<&Fragment> {
        self.nodepool_configs
            .iter()
            .find(|pool| pool.name == name)
            .map(|pool| &pool.config)
    }

    pub fn nodepool_names(&self) -> impl Iterator<Item = &str> {
        self.nodepool_configs.iter().map(|pool| pool.name.as_str())
    }

    /// SHA-256 hex digest of the compact JSON serialization.
    ///
    /// Fragment keys serialize in sorted order, so identical sets always
    /// produce the same digest. Integers are hashed exactly as written;
    /// values beyond 2^53 are not collapsed onto their nearest double.
    pub fn digest(&self) -> Result<String, DigestError> {
        let bytes = serde_json::to_vec(self)?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Resolve a request against a catalog set.
///
/// Fails only when a cluster feature is unknown, and then nothing is
/// returned for the node pools either.
pub fn resolve_all(
    request: &ResolveRequest,
    catalogs: &CatalogSet,
) -> Result<ResolvedSet, ResolveError> {
    let base = request
        .cluster_base
        .as_ref()
        .unwrap_or(&catalogs.cluster_defaults);
    let cluster_config =
        compose_cluster_config(&request.features, &catalogs.cluster_features, base)?;

    report_duplicates(&request.nodepools);
    report_unused_overrides(request);

    let nodepool_configs: Vec<ResolvedNodepool> = request
        .nodepools
        .iter()
        .map(|name| {
            let resolved = resolve_nodepool_with_sources(
                name,
                &catalogs.nodepools,
                &request.overrides,
                &catalogs.nodepool_defaults,
            );
            debug!(
                nodepool = %name,
                sources = ?resolved.sources,
                custom = resolved.is_custom(),
                "resolved node pool"
            );
            resolved
        })
        .collect();

    info!(
        features = request.features.len(),
        nodepools = nodepool_configs.len(),
        "resolution complete"
    );

    Ok(ResolvedSet {
        cluster_config,
        nodepool_configs,
    })
}

/// Duplicate pool names are resolved independently; callers must
/// disambiguate downstream.
fn report_duplicates(names: &[String]) {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            warn!(nodepool = %name, "node pool requested more than once");
        }
    }
}

fn report_unused_overrides(request: &ResolveRequest) {
    for name in request.overrides.keys() {
        if !request.nodepools.contains(name) {
            warn!(nodepool = %name, "override names no requested node pool; ignored");
        }
    }
}
