//! Built-in profile menu
//!
//! Hardcoded catalogs and defaults. Adding a profile means adding an entry
//! here; nothing else changes. The set is built once on first use.

use std::sync::OnceLock;

use profile_merge::Fragment;
use serde_json::{json, Value};

use super::{Catalog, CatalogSet};

static BUILTIN: OnceLock<CatalogSet> = OnceLock::new();

pub(super) fn catalog_set() -> &'static CatalogSet {
    BUILTIN.get_or_init(|| CatalogSet {
        cluster_defaults: cluster_defaults(),
        nodepool_defaults: nodepool_defaults(),
        cluster_features: cluster_features(),
        nodepools: nodepools(),
    })
}

/// Every literal below is a JSON object, so this never falls back.
fn fragment(value: Value) -> Fragment {
    Fragment::from_value(value).unwrap_or_default()
}

fn cluster_defaults() -> Fragment {
    fragment(json!({
        "kubernetes_version": "1.29",
        "sku_tier": "Free",
        "upgrade_channel": "none",
        "network": {
            "plugin": "azure",
            "policy": "none",
            "service_cidr": "10.0.0.0/16",
            "dns_service_ip": "10.0.0.10",
            "outbound_type": "loadBalancer"
        },
        "api_server": {
            "private": false,
            "authorized_ip_ranges": []
        },
        "identity": {
            "type": "SystemAssigned",
            "workload_identity": false,
            "oidc_issuer": false
        },
        "autoscaler_profile": {
            "scan_interval": "10s",
            "scale_down_delay_after_add": "10m",
            "scale_down_unneeded_time": "10m",
            "scale_down_utilization_threshold": "0.5",
            "expander": "random"
        },
        "monitoring": {
            "enabled": false
        }
    }))
}

fn nodepool_defaults() -> Fragment {
    fragment(json!({
        "os": "linux",
        "os_sku": "Ubuntu",
        "vm_size": "Standard_D4s_v5",
        "mode": "User",
        "count": 3,
        "max_pods": 110,
        "os_disk": {
            "size_gb": 128,
            "type": "Managed"
        },
        "taints": [],
        "labels": {},
        "autoscaling": {
            "enabled": false
        }
    }))
}

fn cluster_features() -> Catalog {
    Catalog::new([
        (
            "standard-dev",
            fragment(json!({
                "sku_tier": "Free",
                "upgrade_channel": "rapid",
                "autoscaler_profile": {
                    "scale_down_delay_after_add": "5m",
                    "scale_down_utilization_threshold": "0.3"
                },
                "monitoring": {
                    "enabled": false
                }
            })),
        ),
        (
            "standard-prod-tier",
            fragment(json!({
                "sku_tier": "Standard",
                "upgrade_channel": "stable",
                "autoscaler_profile": {
                    "scale_down_delay_after_add": "15m",
                    "scale_down_utilization_threshold": "0.6",
                    "expander": "least-waste"
                },
                "monitoring": {
                    "enabled": true,
                    "retention_days": 30
                }
            })),
        ),
        (
            "private-cluster",
            fragment(json!({
                "api_server": {
                    "private": true,
                    "authorized_ip_ranges": []
                },
                "network": {
                    "outbound_type": "userDefinedRouting"
                }
            })),
        ),
        (
            "azure-cni-overlay",
            fragment(json!({
                "network": {
                    "plugin": "azure",
                    "plugin_mode": "overlay",
                    "policy": "cilium",
                    "pod_cidr": "192.168.0.0/16"
                }
            })),
        ),
        (
            "kubenet",
            fragment(json!({
                "network": {
                    "plugin": "kubenet",
                    "policy": "calico",
                    "pod_cidr": "10.244.0.0/16"
                }
            })),
        ),
        (
            "workload-identity",
            fragment(json!({
                "identity": {
                    "workload_identity": true,
                    "oidc_issuer": true
                }
            })),
        ),
        (
            "monitoring",
            fragment(json!({
                "monitoring": {
                    "enabled": true,
                    "retention_days": 90,
                    "container_insights": true
                }
            })),
        ),
        (
            "autoscale-aggressive",
            fragment(json!({
                "autoscaler_profile": {
                    "scan_interval": "5s",
                    "scale_down_delay_after_add": "2m",
                    "scale_down_unneeded_time": "2m",
                    "expander": "priority"
                }
            })),
        ),
    ])
}

fn nodepools() -> Catalog {
    Catalog::new([
        (
            "system",
            fragment(json!({
                "mode": "System",
                "vm_size": "Standard_D4s_v5",
                "count": 3,
                "taints": ["CriticalAddonsOnly=true:NoSchedule"],
                "labels": {"pool": "system"}
            })),
        ),
        (
            "general-purpose",
            fragment(json!({
                "vm_size": "Standard_D8s_v5",
                "labels": {"workload": "general"},
                "autoscaling": {
                    "enabled": true,
                    "min_count": 2,
                    "max_count": 10
                }
            })),
        ),
        (
            "general-purpose-xl",
            fragment(json!({
                "vm_size": "Standard_D32s_v5",
                "os_disk": {"size_gb": 256},
                "labels": {"workload": "general"},
                "autoscaling": {
                    "enabled": true,
                    "min_count": 2,
                    "max_count": 20
                }
            })),
        ),
        (
            "memory-optimized",
            fragment(json!({
                "vm_size": "Standard_E16s_v5",
                "taints": ["workload=memory:NoSchedule"],
                "labels": {"workload": "memory"}
            })),
        ),
        (
            "compute-optimized",
            fragment(json!({
                "vm_size": "Standard_F16s_v2",
                "labels": {"workload": "compute"}
            })),
        ),
        (
            "gpu-nc",
            fragment(json!({
                "vm_size": "Standard_NC24ads_A100_v4",
                "count": 1,
                "os_disk": {"size_gb": 512},
                "taints": ["sku=gpu:NoSchedule"],
                "labels": {"accelerator": "nvidia"},
                "autoscaling": {
                    "enabled": true,
                    "min_count": 0,
                    "max_count": 4
                }
            })),
        ),
        (
            "windows",
            fragment(json!({
                "os": "windows",
                "os_sku": "Windows2022",
                "vm_size": "Standard_D8s_v5",
                "max_pods": 30,
                "taints": ["os=windows:NoSchedule"]
            })),
        ),
        (
            "spot-batch",
            fragment(json!({
                "vm_size": "Standard_F16s_v2",
                "priority": "Spot",
                "eviction_policy": "Delete",
                "spot_max_price": -1,
                "taints": ["kubernetes.azure.com/scalesetpriority=spot:NoSchedule"],
                "labels": {"kubernetes.azure.com/scalesetpriority": "spot"},
                "autoscaling": {
                    "enabled": true,
                    "min_count": 0,
                    "max_count": 50
                }
            })),
        ),
    ])
}
