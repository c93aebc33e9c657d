//! End-to-end resolution properties
//!
//! Exercises the public API the way a provisioning caller would:
//! - Deep merge laws on fragments
//! - Control plane composition order and fail-fast behavior
//! - Node pool precedence (override > catalog > fallback)
//! - Orchestrated resolution over fabricated and built-in catalogs

use cluster_profiles::{
    compose_cluster_config, merge, resolve_all, resolve_nodepool, Catalog, CatalogSet, Fragment,
    LayerOrigin, Overrides, ResolveError, ResolveRequest,
};
use serde_json::json;

fn frag(value: serde_json::Value) -> Fragment {
    Fragment::from_value(value).unwrap()
}

// === Deep Merge ===

#[test]
fn test_merge_identity_both_sides() {
    let f = frag(json!({"os": "linux", "autoscaling": {"enabled": true}, "taints": ["a"]}));

    assert_eq!(merge(&f, &Fragment::new()), f);
    assert_eq!(merge(&Fragment::new(), &f), f);
}

#[test]
fn test_merge_idempotent() {
    let f = frag(json!({"network": {"plugin": "azure", "policy": "cilium"}, "count": 3}));
    assert_eq!(merge(&f, &f), f);
}

#[test]
fn test_merge_sequences_replace() {
    let result = merge(&frag(json!({"taints": ["a"]})), &frag(json!({"taints": ["b"]})));
    assert_eq!(result, frag(json!({"taints": ["b"]})));
}

#[test]
fn test_merge_deep_recursion() {
    let result = merge(
        &frag(json!({"a": {"x": 1, "y": 2}})),
        &frag(json!({"a": {"y": 3, "z": 4}})),
    );
    assert_eq!(result, frag(json!({"a": {"x": 1, "y": 3, "z": 4}})));
}

// === Feature Composition ===

#[test]
fn test_composition_order_matters() {
    let features = &CatalogSet::builtin().cluster_features;
    let empty = Fragment::new();

    let a = compose_cluster_config(&["standard-dev", "standard-prod-tier"], features, &empty).unwrap();
    let b = compose_cluster_config(&["standard-prod-tier", "standard-dev"], features, &empty).unwrap();

    assert_ne!(a, b);
    assert_eq!(a.get_str("autoscaler_profile.expander"), Some("least-waste"));
    // dev never sets the expander, so prod's value survives either way
    assert_eq!(b.get_str("autoscaler_profile.expander"), Some("least-waste"));
    assert_eq!(
        b.get_str("autoscaler_profile.scale_down_utilization_threshold"),
        Some("0.3")
    );
}

#[test]
fn test_composition_unknown_feature() {
    let features = &CatalogSet::builtin().cluster_features;
    let result = compose_cluster_config(&["not-a-real-profile"], features, &Fragment::new());

    assert_eq!(
        result,
        Err(ResolveError::UnknownFeature {
            name: "not-a-real-profile".to_string()
        })
    );
}

// === Node Pool Resolution ===

#[test]
fn test_custom_pool_from_override_only() {
    let overrides = Overrides::from([(
        "my-custom-batch-pool".to_string(),
        frag(json!({"vm_size": "F16s_v2"})),
    )]);

    let result = resolve_nodepool(
        "my-custom-batch-pool",
        &Catalog::default(),
        &overrides,
        &frag(json!({"os": "linux"})),
    );

    assert_eq!(result, frag(json!({"os": "linux", "vm_size": "F16s_v2"})));
}

#[test]
fn test_precedence_chain() {
    let catalog = Catalog::new([("p", frag(json!({"os": "windows", "size": "M"})))]);
    let overrides = Overrides::from([("p".to_string(), frag(json!({"size": "L"})))]);

    let result = resolve_nodepool("p", &catalog, &overrides, &frag(json!({"os": "linux"})));

    assert_eq!(result, frag(json!({"os": "windows", "size": "L"})));
}

#[test]
fn test_arbitrary_pool_names_resolve_to_fallback() {
    let fallback = frag(json!({"os": "linux", "count": 3}));
    for name in ["", "x", "general-purpose-xl", "名前", "with spaces and / slashes"] {
        let result = resolve_nodepool(name, &Catalog::default(), &Overrides::new(), &fallback);
        assert_eq!(result, fallback, "pool name {name:?}");
    }
}

// === Orchestrator ===

#[test]
fn test_full_cluster_against_builtin_catalog() {
    let request = ResolveRequest::new()
        .with_features(["standard-prod-tier", "azure-cni-overlay", "workload-identity"])
        .with_nodepools(["system", "gpu-nc", "spot-batch", "my-custom-batch-pool"])
        .with_override("gpu-nc", frag(json!({"taints": [], "autoscaling": {"max_count": 8}})))
        .with_override("my-custom-batch-pool", frag(json!({"vm_size": "Standard_F16s_v2"})));

    let resolved = resolve_all(&request, CatalogSet::builtin()).unwrap();

    let cluster = &resolved.cluster_config;
    assert_eq!(cluster.get_str("sku_tier"), Some("Standard"));
    assert_eq!(cluster.get_str("network.policy"), Some("cilium"));
    assert_eq!(cluster.get_bool("identity.oidc_issuer"), Some(true));
    assert_eq!(cluster.get_str("identity.type"), Some("SystemAssigned"));

    let gpu = resolved.nodepool("gpu-nc").unwrap();
    assert_eq!(gpu.get("taints"), Some(&json!([])));
    assert_eq!(gpu.get_u64("autoscaling.max_count"), Some(8));
    assert_eq!(gpu.get_u64("autoscaling.min_count"), Some(0));
    assert_eq!(gpu.get_str("os"), Some("linux"));

    let spot = resolved.nodepool("spot-batch").unwrap();
    assert_eq!(spot.get_str("priority"), Some("Spot"));

    let custom = &resolved.nodepool_configs[3];
    assert_eq!(custom.name, "my-custom-batch-pool");
    assert!(custom.is_custom());
    assert_eq!(custom.config.get_str("vm_size"), Some("Standard_F16s_v2"));
    assert_eq!(custom.config.get_str("mode"), Some("User"));

    assert_eq!(
        resolved.nodepool_configs[1].sources,
        vec![LayerOrigin::Fallback, LayerOrigin::Catalog, LayerOrigin::Override]
    );
}

#[test]
fn test_failure_returns_no_partial_result() {
    let request = ResolveRequest::new()
        .with_features(["standard-dev", "typo"])
        .with_nodepools(["system"]);

    match resolve_all(&request, CatalogSet::builtin()) {
        Err(ResolveError::UnknownFeature { name }) => assert_eq!(name, "typo"),
        other => panic!("expected UnknownFeature, got {other:?}"),
    }
}

#[test]
fn test_fabricated_catalogs() {
    let catalogs = CatalogSet {
        cluster_defaults: frag(json!({"tier": "basic", "sla": {"uptime": "99.5"}})),
        nodepool_defaults: frag(json!({"os": "linux"})),
        cluster_features: Catalog::new([
            ("ha", frag(json!({"tier": "premium", "sla": {"uptime": "99.95"}}))),
            ("audit", frag(json!({"audit": {"enabled": true}}))),
        ]),
        nodepools: Catalog::new([("big", frag(json!({"size": "XL"})))]),
    };
    let request = ResolveRequest::new()
        .with_features(["audit", "ha"])
        .with_nodepools(["big", "small"]);

    let resolved = resolve_all(&request, &catalogs).unwrap();

    assert_eq!(
        resolved.cluster_config,
        frag(json!({"tier": "premium", "sla": {"uptime": "99.95"}, "audit": {"enabled": true}}))
    );
    assert_eq!(resolved.nodepool("big"), Some(&frag(json!({"os": "linux", "size": "XL"}))));
    assert_eq!(resolved.nodepool("small"), Some(&frag(json!({"os": "linux"}))));
}

#[test]
fn test_concurrent_resolutions_agree() {
    let request = ResolveRequest::new()
        .with_features(["standard-prod-tier", "monitoring"])
        .with_nodepools(["system", "general-purpose", "windows"]);
    let expected = resolve_all(&request, CatalogSet::builtin()).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| resolve_all(&request, CatalogSet::builtin()).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
