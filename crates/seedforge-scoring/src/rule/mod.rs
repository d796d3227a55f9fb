//! Individual business rules.

mod budget;
mod capacity;
mod sku_count;

use std::fmt::Debug;

use seedforge_core::{AllocationLine, Violation};

use crate::usage::StoreUsage;

pub use budget::BudgetRule;
pub use capacity::CapacityRule;
pub use sku_count::SkuCountRule;

/// A single business rule checked against a finished allocation.
///
/// Rules are pure: the same lines always yield the same violations,
/// in the same order.
pub trait Rule: Send + Sync + Debug {
    /// Short rule name used in logs.
    fn name(&self) -> &'static str;

    /// Appends any violations of this rule to `out`.
    ///
    /// `usage` is the per-store aggregation of `lines`, in first-seen order.
    fn check(&self, lines: &[AllocationLine], usage: &[StoreUsage<'_>], out: &mut Vec<Violation>);
}
