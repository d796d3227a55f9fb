//! Validation outcome.

use serde::{Deserialize, Serialize};

use seedforge_core::{Severity, Violation, ViolationKind};

/// Violation counts for a validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_violations: usize,
    pub critical_violations: usize,
    pub warning_violations: usize,
    pub total_cost: f64,
    pub store_count: usize,
}

/// Result of validating an allocation.
///
/// Two distinct validity signals are exposed: [`ok`](Self::ok) is strict
/// (no violations at all) and gates export; [`is_valid`](Self::is_valid)
/// ignores warnings and gates auto-approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
    /// Per-violation remediation followed by general advice, de-duplicated.
    pub suggestions: Vec<String>,
    pub summary: ValidationSummary,
}

impl ValidationReport {
    pub(crate) fn new(violations: Vec<Violation>, total_cost: f64, store_count: usize) -> Self {
        let critical = violations
            .iter()
            .filter(|v| v.severity == Severity::Critical)
            .count();
        let summary = ValidationSummary {
            total_violations: violations.len(),
            critical_violations: critical,
            warning_violations: violations.len() - critical,
            total_cost,
            store_count,
        };
        let suggestions = collect_suggestions(&violations);
        Self {
            violations,
            suggestions,
            summary,
        }
    }

    /// True when there are no violations of any severity.
    pub fn ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// True when there are no critical violations.
    pub fn is_valid(&self) -> bool {
        self.summary.critical_violations == 0
    }

    pub fn critical(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.is_critical())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| !v.is_critical())
    }

    /// Violations of one kind.
    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }
}

fn collect_suggestions(violations: &[Violation]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |s: &str| {
        if !s.is_empty() && !out.iter().any(|existing| existing == s) {
            out.push(s.to_string());
        }
    };

    for v in violations {
        push(&v.suggestion);
    }

    if violations
        .iter()
        .any(|v| v.kind == ViolationKind::BudgetExceeded)
    {
        push("Consider prioritizing higher-forecasted SKUs");
        push("Review and reduce quantities for low-confidence recommendations");
    }

    if violations.iter().any(|v| v.kind.is_sku_count()) {
        push("Rebalance SKU distribution across stores");
        push("Consider merging similar clusters to simplify assortment");
    }

    out
}
