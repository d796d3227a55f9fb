//! Distinct-SKU-per-store rule.

use seedforge_core::{AllocationLine, Violation, ViolationKind};

use super::Rule;
use crate::usage::StoreUsage;

/// Distinct SKUs per store must stay within `[min, max]`.
///
/// Over the maximum is critical; under the minimum is a warning.
#[derive(Debug, Clone)]
pub struct SkuCountRule {
    min: Option<usize>,
    max: Option<usize>,
}

impl SkuCountRule {
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }
}

impl Rule for SkuCountRule {
    fn name(&self) -> &'static str {
        "sku_count"
    }

    fn check(&self, _lines: &[AllocationLine], usage: &[StoreUsage<'_>], out: &mut Vec<Violation>) {
        for store in usage {
            let count = store.distinct_skus;

            if let Some(max) = self.max.filter(|&max| count > max) {
                out.push(Violation::critical(
                    ViolationKind::SkuLimitExceeded,
                    format!(
                        "Store {} has {} SKUs, exceeds limit of {}",
                        store.store_id, count, max
                    ),
                    format!("Remove {} SKUs from store {}", count - max, store.store_id),
                ));
            }

            if let Some(min) = self.min.filter(|&min| count < min) {
                out.push(Violation::warning(
                    ViolationKind::SkuMinimumNotMet,
                    format!(
                        "Store {} has {} SKUs, below minimum of {}",
                        store.store_id, count, min
                    ),
                    format!("Add {} SKUs to store {}", min - count, store.store_id),
                ));
            }
        }
    }
}
