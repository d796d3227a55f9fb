//! Fixture capacity rule.

use seedforge_core::{AllocationLine, Violation, ViolationKind};

use super::Rule;
use crate::rules::{CapacityData, CapacitySettings};
use crate::usage::StoreUsage;

/// Space consumed per store must fit its fixture capacity.
///
/// Consumed space is `units * space_per_unit`. Stores without a known
/// capacity are not checked. Unavailable capacity data yields a single
/// warning so the missing check is visible.
#[derive(Debug, Clone)]
pub struct CapacityRule {
    settings: CapacitySettings,
    tolerance: f64,
}

impl CapacityRule {
    pub fn new(settings: CapacitySettings, tolerance: f64) -> Self {
        Self {
            settings,
            tolerance,
        }
    }
}

impl Rule for CapacityRule {
    fn name(&self) -> &'static str {
        "fixture_capacity"
    }

    fn check(&self, _lines: &[AllocationLine], usage: &[StoreUsage<'_>], out: &mut Vec<Violation>) {
        if let CapacityData::Unavailable(reason) = &self.settings.data {
            out.push(Violation::warning(
                ViolationKind::CapacityDataUnavailable,
                format!("Capacity data unavailable: {}", reason),
                "Fix the capacity data source and re-validate; fixture limits were not checked",
            ));
            return;
        }

        for store in usage {
            let Some(capacity) = self.settings.data.capacity_of(store.store_id) else {
                continue;
            };
            let used = store.units as f64 * self.settings.space_per_unit;
            if used > capacity + self.tolerance {
                out.push(Violation::warning(
                    ViolationKind::FixtureCapacityExceeded,
                    format!(
                        "Store {} uses {:.1} sq ft, exceeds {:.1} sq ft",
                        store.store_id, used, capacity
                    ),
                    format!(
                        "Reduce quantities at store {} to free up {:.1} sq ft",
                        store.store_id,
                        used - capacity
                    ),
                ));
            }
        }
    }
}
