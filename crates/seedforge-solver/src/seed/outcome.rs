use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use seedforge_core::AllocationLine;

/// Lines produced by one allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedOutcome {
    /// In emission order: stores in cluster-map order, SKUs in rank order.
    pub lines: Vec<AllocationLine>,
    pub budget_left: f64,
    pub initial_budget: f64,
}

impl SeedOutcome {
    pub fn total_cost(&self) -> f64 {
        self.lines.iter().map(|l| l.total_cost).sum()
    }

    pub fn total_units(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Distinct SKUs per store.
    pub fn skus_per_store(&self) -> BTreeMap<&str, usize> {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for line in &self.lines {
            if seen.insert((&line.store_id, &line.sku_id)) {
                *counts.entry(line.store_id.as_str()).or_default() += 1;
            }
        }
        counts
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
