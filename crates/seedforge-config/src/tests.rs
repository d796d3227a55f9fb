//! Tests for planner configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        features = ["capacity"]

        [clustering]
        min_k = 2
        max_k = 4
        random_seed = 11
        n_init = 1

        [allocation]
        demand_divisor = 3.0

        [validation]
        min_skus_per_store = 2
        max_space_per_store = 12.5

        [export]
        out_dir = "exports"
        identifier = "weekly"
    "#;

    let config = PlannerConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.features, vec!["capacity".to_string()]);
    assert_eq!(config.clustering.random_seed, 11);
    assert_eq!(config.clustering.max_iterations, 300);
    assert_eq!(config.allocation.demand_divisor, 3.0);
    assert_eq!(config.validation.max_space_per_store, Some(12.5));
    assert_eq!(config.validation.space_per_unit, 0.1);
    assert_eq!(config.export.out_dir, PathBuf::from("exports"));
    assert_eq!(config.export.identifier, "weekly");
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        clustering:
          min_k: 3
          max_k: 5
        validation:
          space_per_unit: 0.5
          capacity_csv: data/capacity.csv
    "#;

    let config = PlannerConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.clustering.max_k, 5);
    assert_eq!(config.validation.space_per_unit, 0.5);
    assert_eq!(
        config.validation.capacity_csv,
        Some(PathBuf::from("data/capacity.csv"))
    );
    assert_eq!(config.features, vec!["capacity", "footfall"]);
}

#[test]
fn test_empty_toml_is_default() {
    let config = PlannerConfig::from_toml_str("").unwrap();
    assert_eq!(config, PlannerConfig::default());
}

#[test]
fn test_builder() {
    let config = PlannerConfig::new()
        .with_features(["footfall"])
        .with_random_seed(9)
        .with_k_range(2, 3)
        .with_min_skus_per_store(4)
        .with_out_dir("tmp/out");

    assert_eq!(config.features, vec!["footfall"]);
    assert_eq!(config.clustering.random_seed, 9);
    assert_eq!(config.clustering.candidate_range(10), Some((2, 3)));
    assert_eq!(config.validation.min_skus_per_store, Some(4));
    assert_eq!(config.export.out_dir, PathBuf::from("tmp/out"));
}

#[test]
fn test_candidate_range_clipping() {
    let clustering = ClusteringConfig::default();
    assert_eq!(clustering.candidate_range(100), Some((3, 8)));
    assert_eq!(clustering.candidate_range(6), Some((3, 5)));
    assert_eq!(clustering.candidate_range(4), Some((3, 3)));
    assert_eq!(clustering.candidate_range(3), None);
    assert_eq!(clustering.candidate_range(0), None);
}

#[test]
fn test_invalid_k_range_rejected() {
    let err = PlannerConfig::from_toml_str(
        r#"
        [clustering]
        min_k = 5
        max_k = 3
    "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = PlannerConfig::from_toml_str("[clustering]\nmin_k = 1").unwrap_err();
    assert!(err.to_string().contains("min_k"));
}

#[test]
fn test_invalid_divisor_rejected() {
    let err = PlannerConfig::from_toml_str("[allocation]\ndemand_divisor = 0.0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_from_file_dispatches_on_extension() {
    let dir = tempfile::tempdir().unwrap();

    let yaml_path = dir.path().join("planner.yaml");
    std::fs::write(&yaml_path, "clustering:\n  random_seed: 5\n").unwrap();
    assert_eq!(
        PlannerConfig::from_file(&yaml_path).unwrap().clustering.random_seed,
        5
    );

    let toml_path = dir.path().join("planner.toml");
    std::fs::write(&toml_path, "[clustering]\nrandom_seed = 6\n").unwrap();
    assert_eq!(
        PlannerConfig::from_file(&toml_path).unwrap().clustering.random_seed,
        6
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let err = PlannerConfig::load("/nonexistent/planner.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
