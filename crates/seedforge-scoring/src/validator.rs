//! The constraint validator.

use tracing::debug;

use seedforge_core::AllocationLine;

use crate::report::ValidationReport;
use crate::rule::{BudgetRule, CapacityRule, Rule, SkuCountRule};
use crate::rules::ValidationRules;
use crate::usage::store_usage;

/// Checks allocations against a fixed set of rules.
///
/// Built once from [`ValidationRules`]; rules absent from the
/// configuration are not instantiated, so their checks are skipped.
#[derive(Debug)]
pub struct ConstraintValidator {
    rules: Vec<Box<dyn Rule>>,
}

impl ConstraintValidator {
    pub fn new(rules: &ValidationRules) -> Self {
        let mut active: Vec<Box<dyn Rule>> = Vec::new();

        if let Some(budget) = rules.budget {
            active.push(Box::new(BudgetRule::new(budget, rules.budget_tolerance)));
        }
        if rules.min_skus_per_store.is_some() || rules.max_skus_per_store.is_some() {
            active.push(Box::new(SkuCountRule::new(
                rules.min_skus_per_store,
                rules.max_skus_per_store,
            )));
        }
        if let Some(capacity) = &rules.capacity {
            active.push(Box::new(CapacityRule::new(
                capacity.clone(),
                rules.budget_tolerance,
            )));
        }

        Self { rules: active }
    }

    /// Creates a validator from explicit rules.
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Names of the rules this validator checks, in order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Validates `lines`. Pure: identical input gives an identical report.
    pub fn validate(&self, lines: &[AllocationLine]) -> ValidationReport {
        let usage = store_usage(lines);
        let mut violations = Vec::new();

        for rule in &self.rules {
            let before = violations.len();
            rule.check(lines, &usage, &mut violations);
            debug!(
                rule = rule.name(),
                violations = (violations.len() - before) as u64,
                "Rule checked"
            );
        }

        let total_cost = lines.iter().map(|l| l.total_cost).sum();
        ValidationReport::new(violations, total_cost, usage.len())
    }
}

/// Validates `lines` against `rules` in one call.
pub fn validate(lines: &[AllocationLine], rules: &ValidationRules) -> ValidationReport {
    ConstraintValidator::new(rules).validate(lines)
}
