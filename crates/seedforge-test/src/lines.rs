//! Allocation line builders.

use seedforge_core::AllocationLine;

/// A single line in cluster 0.
pub fn line(store_id: &str, sku_id: &str, quantity: u32, unit_cost: f64) -> AllocationLine {
    AllocationLine::new(store_id, sku_id, quantity, unit_cost, 0)
}

/// Lines spread over `stores` whose costs add up to exactly `total`.
///
/// Each store gets one distinct SKU; the total is split evenly.
pub fn lines_totaling(stores: &[&str], total: f64) -> Vec<AllocationLine> {
    let share = total / stores.len() as f64;
    stores
        .iter()
        .enumerate()
        .map(|(i, store)| line(store, &format!("SKU-{:02}", i + 1), 1, share))
        .collect()
}
