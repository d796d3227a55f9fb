use seedforge_config::ClusteringConfig;
use seedforge_core::{SeedForgeError, Store};
use seedforge_test::{identical_stores, sample_features, sample_stores};

use super::*;

#[test]
fn test_auto_k_finds_store_groups() {
    let result = select_clusters(&sample_stores(), &sample_features(), None).unwrap();

    assert_eq!(result.k, 3);
    assert_eq!(result.assignment.len(), 8);
    let members = result.assignment.members();
    assert_eq!(members[&0], vec!["S1", "S3", "S8"]);
    assert_eq!(members[&1], vec!["S2", "S4", "S6"]);
    assert_eq!(members[&2], vec!["S5", "S7"]);
    assert!(result.silhouette.unwrap() > 0.5);
}

#[test]
fn test_auto_k_within_bounds() {
    let stores = sample_stores();
    for seed in 0..5 {
        let config = ClusteringConfig {
            random_seed: seed,
            ..ClusteringConfig::default()
        };
        let result = ClusterSelector::new(config)
            .select(&stores, &sample_features(), None)
            .unwrap();
        assert!(result.k > 1 && result.k < stores.len());
        assert_eq!(result.assignment.cluster_count(), result.k);
    }
}

#[test]
fn test_selection_is_deterministic() {
    let stores = sample_stores();
    let features = sample_features();
    for k in [None, Some(2), Some(4)] {
        let a = select_clusters(&stores, &features, k).unwrap();
        let b = select_clusters(&stores, &features, k).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_assignment_keeps_input_order() {
    let result = select_clusters(&sample_stores(), &sample_features(), Some(2)).unwrap();
    let order: Vec<&str> = result.assignment.iter().map(|(s, _)| s).collect();
    assert_eq!(order, vec!["S1", "S2", "S3", "S4", "S5", "S6", "S7", "S8"]);
    assert_eq!(result.assignment.get("S1"), Some(0));
}

#[test]
fn test_explicit_k_out_of_range() {
    let stores = sample_stores();
    for k in [0, 1, 8, 9] {
        let err = select_clusters(&stores, &sample_features(), Some(k)).unwrap_err();
        assert!(matches!(err, SeedForgeError::InvalidInput(_)), "k = {k}");
    }
}

#[test]
fn test_too_few_stores_for_search() {
    let stores: Vec<Store> = sample_stores().into_iter().take(3).collect();
    let err = select_clusters(&stores, &sample_features(), None).unwrap_err();
    assert!(err.to_string().contains("not enough"));
}

#[test]
fn test_identical_stores_rejected() {
    let err = select_clusters(&identical_stores(6), &sample_features(), None).unwrap_err();
    assert!(err.to_string().contains("identical"));
}

#[test]
fn test_missing_feature_named() {
    let mut stores = sample_stores();
    stores.push(Store::new("S9").with_feature("capacity", 1.0));
    let err = select_clusters(&stores, &sample_features(), Some(3)).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("footfall") && msg.contains("S9"), "{msg}");
}

#[test]
fn test_profiles_report_raw_means() {
    let result = select_clusters(&sample_stores(), &sample_features(), Some(3)).unwrap();
    assert_eq!(result.profiles.len(), 3);

    let small = &result.profiles[2];
    assert_eq!(small.store_count, 2);
    assert!((small.feature_means["capacity"] - 101.0).abs() < 1e-9);
    assert!((small.feature_means["footfall"] - 297.5).abs() < 1e-9);

    let total: usize = result.profiles.iter().map(|p| p.store_count).sum();
    assert_eq!(total, 8);
}
