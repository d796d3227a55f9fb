//! Tests for the constraint validator.

use std::collections::HashMap;

use seedforge_config::ValidationConfig;
use seedforge_core::{SeedForgeError, Severity, ViolationKind};
use seedforge_test::{line, lines_totaling};

use super::*;

#[test]
fn test_budget_overrun_by_fifty() {
    let lines = lines_totaling(&["S1", "S2", "S3"], 1_050.0);
    let rules = ValidationRules::new()
        .with_budget(1_000.0)
        .with_max_skus_per_store(5);

    let report = validate(&lines, &rules);

    assert_eq!(report.violations.len(), 1);
    let v = &report.violations[0];
    assert_eq!(v.kind, ViolationKind::BudgetExceeded);
    assert_eq!(v.severity, Severity::Critical);
    assert_eq!(v.suggestion, "Reduce allocation by $50.00");
    assert!(!report.ok());
    assert!(!report.is_valid());
    assert_eq!(report.summary.critical_violations, 1);
}

#[test]
fn test_no_rules_means_no_checks() {
    let lines = lines_totaling(&["S1"], 1e9);
    let report = validate(&lines, &ValidationRules::new());
    assert!(report.ok());
    assert!(report.is_valid());
    assert!(ConstraintValidator::new(&ValidationRules::new())
        .rule_names()
        .is_empty());
}

#[test]
fn test_sku_limit_exceeded_is_critical() {
    let lines = vec![
        line("S1", "A", 1, 1.0),
        line("S1", "B", 1, 1.0),
        line("S1", "C", 1, 1.0),
        line("S2", "A", 1, 1.0),
    ];
    let rules = ValidationRules::new().with_max_skus_per_store(2);

    let report = validate(&lines, &rules);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::SkuLimitExceeded);
    assert_eq!(report.violations[0].suggestion, "Remove 1 SKUs from store S1");
    assert!(!report.is_valid());
}

#[test]
fn test_repeated_sku_lines_count_once() {
    let lines = vec![line("S1", "A", 1, 1.0), line("S1", "A", 4, 1.0)];
    let rules = ValidationRules::new().with_max_skus_per_store(1);
    assert!(validate(&lines, &rules).ok());
}

#[test]
fn test_minimum_not_met_is_warning_only() {
    let lines = vec![line("S1", "A", 1, 1.0)];
    let rules = ValidationRules::new()
        .with_max_skus_per_store(5)
        .with_min_skus_per_store(3);

    let report = validate(&lines, &rules);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::SkuMinimumNotMet);
    assert_eq!(report.violations[0].suggestion, "Add 2 SKUs to store S1");
    assert!(!report.ok());
    assert!(report.is_valid());
    assert_eq!(report.summary.warning_violations, 1);
}

#[test]
fn test_fixture_capacity_exceeded() {
    let lines = vec![line("S1", "A", 30, 1.0), line("S2", "A", 5, 1.0)];
    let capacity = CapacityData::per_store(HashMap::from([
        ("S1".to_string(), 2.0),
        ("S2".to_string(), 2.0),
    ]));
    let rules = ValidationRules::new().with_capacity(capacity, 0.1);

    let report = validate(&lines, &rules);
    assert_eq!(report.violations.len(), 1);
    let v = &report.violations[0];
    assert_eq!(v.kind, ViolationKind::FixtureCapacityExceeded);
    assert_eq!(v.severity, Severity::Warning);
    assert_eq!(v.message, "Store S1 uses 3.0 sq ft, exceeds 2.0 sq ft");
    assert_eq!(v.suggestion, "Reduce quantities at store S1 to free up 1.0 sq ft");
}

#[test]
fn test_per_store_capacity_overrides_uniform() {
    let lines = vec![line("S1", "A", 30, 1.0), line("S2", "A", 30, 1.0)];
    let capacity = CapacityData::Available {
        per_store: HashMap::from([("S1".to_string(), 10.0)]),
        default_max: Some(1.0),
    };
    let rules = ValidationRules::new().with_capacity(capacity, 0.1);

    let report = validate(&lines, &rules);
    assert_eq!(report.violations.len(), 1);
    assert!(report.violations[0].message.starts_with("Store S2"));
}

#[test]
fn test_unavailable_capacity_data_is_reported() {
    let loaded = Err(SeedForgeError::ConstraintData(
        "capacity.csv: no such file".to_string(),
    ));
    let capacity = CapacityData::from_load(loaded, None);
    let rules = ValidationRules::new()
        .with_budget(100.0)
        .with_capacity(capacity, 0.1);

    let report = validate(&[line("S1", "A", 1, 1.0)], &rules);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(
        report.violations[0].kind,
        ViolationKind::CapacityDataUnavailable
    );
    assert!(report.violations[0].message.contains("no such file"));
    assert!(report.is_valid());
    assert!(!report.ok());
}

#[test]
fn test_validation_is_pure_and_idempotent() {
    let lines = lines_totaling(&["S1", "S2"], 80.0);
    let rules = ValidationRules::new()
        .with_budget(100.0)
        .with_max_skus_per_store(3);
    let validator = ConstraintValidator::new(&rules);

    let first = validator.validate(&lines);
    let second = validator.validate(&lines);
    assert!(first.ok());
    assert_eq!(first, second);

    let broken = lines_totaling(&["S1", "S2"], 180.0);
    assert_eq!(validator.validate(&broken), validator.validate(&broken));
}

#[test]
fn test_suggestions_are_aggregated_without_duplicates() {
    let mut lines = lines_totaling(&["S1"], 200.0);
    lines.push(line("S1", "X", 1, 0.0));
    lines.push(line("S1", "Y", 1, 0.0));
    let rules = ValidationRules::new()
        .with_budget(100.0)
        .with_max_skus_per_store(1);

    let report = validate(&lines, &rules);
    assert_eq!(
        report.suggestions,
        vec![
            "Reduce allocation by $100.00",
            "Remove 2 SKUs from store S1",
            "Consider prioritizing higher-forecasted SKUs",
            "Review and reduce quantities for low-confidence recommendations",
            "Rebalance SKU distribution across stores",
            "Consider merging similar clusters to simplify assortment",
        ]
    );
}

#[test]
fn test_rules_for_request_apply_config() {
    let config = ValidationConfig {
        min_skus_per_store: Some(2),
        max_space_per_store: Some(0.5),
        ..ValidationConfig::default()
    };
    let rules = ValidationRules::for_request(50.0, 4, &config);
    assert_eq!(
        ConstraintValidator::new(&rules).rule_names(),
        vec!["budget", "sku_count", "fixture_capacity"]
    );

    let report = validate(&[line("S1", "A", 10, 1.0)], &rules);
    let kinds: Vec<_> = report.violations.iter().map(|v| v.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ViolationKind::SkuMinimumNotMet,
            ViolationKind::FixtureCapacityExceeded
        ]
    );
}

#[test]
fn test_summary_totals() {
    let lines = vec![line("S1", "A", 2, 2.5), line("S2", "B", 1, 5.0)];
    let report = validate(&lines, &ValidationRules::new().with_budget(20.0));
    assert_eq!(report.summary.total_cost, 10.0);
    assert_eq!(report.summary.store_count, 2);
    assert_eq!(report.summary.total_violations, 0);
}
