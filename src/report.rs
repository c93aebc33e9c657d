//! Resolution report
//!
//! The artifact handed to provisioning: the resolved set plus schema
//! identification, a content digest and a timestamp.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use profile_merge::Fragment;
use serde::{Deserialize, Serialize};

use crate::error::DigestError;
use crate::nodepool::ResolvedNodepool;
use crate::resolve::{ResolveRequest, ResolvedSet};

/// Schema version for resolution reports
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "cluster-profiles/resolution@1";

/// Resolution report (resolution.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionReport {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When the report was produced
    pub created_at: DateTime<Utc>,

    /// Digest of the resolved set (see [`ResolvedSet::digest`])
    pub digest: String,

    /// Cluster feature profiles applied, in order
    pub features: Vec<String>,

    /// Control plane configuration
    pub cluster: Fragment,

    /// Node pool configurations, in request order
    pub nodepools: Vec<ResolvedNodepool>,
}

impl ResolutionReport {
    /// Build a report for a resolved request
    pub fn new(request: &ResolveRequest, resolved: ResolvedSet) -> Result<Self, DigestError> {
        let digest = resolved.digest()?;

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            digest,
            features: request.features.clone(),
            cluster: resolved.cluster_config,
            nodepools: resolved.nodepool_configs,
        })
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }

    /// Human-readable summary
    pub fn to_human(&self) -> String {
        let mut out = String::new();

        let short: String = self.digest.chars().take(12).collect();
        out.push_str(&format!("Resolution {}\n", short));
        if self.features.is_empty() {
            out.push_str("  Features: (none)\n");
        } else {
            out.push_str(&format!("  Features: {}\n", self.features.join(" -> ")));
        }
        out.push('\n');

        out.push_str("Control plane:\n");
        push_fragment(&mut out, &self.cluster, 2);

        for pool in &self.nodepools {
            let sources: Vec<_> = pool.sources.iter().map(|s| s.as_str()).collect();
            out.push('\n');
            out.push_str(&format!(
                "Node pool {}{} [{}]:\n",
                pool.name,
                if pool.is_custom() { " (custom)" } else { "" },
                sources.join(" < ")
            ));
            push_fragment(&mut out, &pool.config, 2);
        }

        out
    }
}

fn push_fragment(out: &mut String, fragment: &Fragment, indent: usize) {
    for (key, value) in fragment.iter() {
        push_value(out, key, value, indent);
    }
}

fn push_value(out: &mut String, key: &str, value: &serde_json::Value, indent: usize) {
    let pad = " ".repeat(indent);
    match value {
        serde_json::Value::Object(map) if !map.is_empty() => {
            out.push_str(&format!("{}{}:\n", pad, key));
            for (k, v) in map {
                push_value(out, k, v, indent + 2);
            }
        }
        other => out.push_str(&format!("{}{}: {}\n", pad, key, other)),
    }
}
