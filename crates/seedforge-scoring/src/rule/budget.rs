//! Total budget rule.

use seedforge_core::{AllocationLine, Violation, ViolationKind};

use super::Rule;
use crate::usage::StoreUsage;

/// Total line cost must not exceed the budget (within a tolerance).
#[derive(Debug, Clone)]
pub struct BudgetRule {
    budget: f64,
    tolerance: f64,
}

impl BudgetRule {
    pub fn new(budget: f64, tolerance: f64) -> Self {
        Self { budget, tolerance }
    }
}

impl Rule for BudgetRule {
    fn name(&self) -> &'static str {
        "budget"
    }

    fn check(&self, lines: &[AllocationLine], _usage: &[StoreUsage<'_>], out: &mut Vec<Violation>) {
        let total: f64 = lines.iter().map(|l| l.total_cost).sum();
        if total > self.budget + self.tolerance {
            out.push(Violation::critical(
                ViolationKind::BudgetExceeded,
                format!(
                    "Total cost ${:.2} exceeds budget ${:.2}",
                    total, self.budget
                ),
                format!("Reduce allocation by ${:.2}", total - self.budget),
            ));
        }
    }
}
