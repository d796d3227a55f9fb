//! Per-store aggregation of allocation lines.

use std::collections::{HashMap, HashSet};

use seedforge_core::AllocationLine;

/// What one store receives in a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreUsage<'a> {
    pub store_id: &'a str,
    pub distinct_skus: usize,
    pub units: u64,
    pub cost: f64,
}

/// Aggregates lines per store, in order of each store's first line.
pub fn store_usage(lines: &[AllocationLine]) -> Vec<StoreUsage<'_>> {
    let mut order: Vec<StoreUsage<'_>> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();

    for line in lines {
        let idx = *position.entry(line.store_id.as_str()).or_insert_with(|| {
            order.push(StoreUsage {
                store_id: &line.store_id,
                distinct_skus: 0,
                units: 0,
                cost: 0.0,
            });
            order.len() - 1
        });

        let usage = &mut order[idx];
        if seen.insert((line.store_id.as_str(), line.sku_id.as_str())) {
            usage.distinct_skus += 1;
        }
        usage.units += u64::from(line.quantity);
        usage.cost += line.total_cost;
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedforge_test::line;

    #[test]
    fn test_usage_counts_distinct_skus_once() {
        let lines = vec![
            line("S2", "A", 2, 1.0),
            line("S1", "A", 1, 1.0),
            line("S2", "A", 3, 1.0),
            line("S2", "B", 1, 4.0),
        ];

        let usage = store_usage(&lines);
        assert_eq!(usage.len(), 2);
        assert_eq!(usage[0].store_id, "S2");
        assert_eq!(usage[0].distinct_skus, 2);
        assert_eq!(usage[0].units, 6);
        assert_eq!(usage[0].cost, 9.0);
        assert_eq!(usage[1].store_id, "S1");
        assert_eq!(usage[1].distinct_skus, 1);
    }

    #[test]
    fn test_usage_empty() {
        assert!(store_usage(&[]).is_empty());
    }
}
