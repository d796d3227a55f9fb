//! Greedy seed allocation.
//!
//! SKUs are ranked once, then each store (in cluster-map order) takes SKUs in
//! rank order until it reaches the per-store cap or the next SKU no longer
//! fits the shared budget. There is no backtracking.

mod outcome;
mod ranking;

pub use outcome::SeedOutcome;
pub use ranking::RankedSku;

use std::collections::HashSet;

use tracing::{debug, trace};

use seedforge_config::AllocationConfig;
use seedforge_core::{
    AllocationLine, ClusterAssignment, ForecastLookup, Result, SeedForgeError, Sku,
};

use ranking::{rank_skus, seed_quantity};

/// Assigns SKUs to stores under a global budget.
///
/// # Examples
///
/// ```
/// use seedforge_core::{ClusterAssignment, Sku};
/// use seedforge_solver::SeedAllocator;
///
/// let skus = vec![
///     Sku::new("TEE", "apparel", 20.0, 0.9),
///     Sku::new("CAP", "apparel", 15.0, 0.4),
/// ];
/// let mut clusters = ClusterAssignment::new();
/// clusters.insert("S1", 0).unwrap();
/// clusters.insert("S2", 1).unwrap();
///
/// let outcome = SeedAllocator::default()
///     .allocate(&skus, &clusters, 60.0, 5, None)
///     .unwrap();
///
/// // S1 takes both SKUs; S2 affords the tee but not the cap.
/// assert_eq!(outcome.lines.len(), 3);
/// assert_eq!(outcome.budget_left, 5.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SeedAllocator {
    config: AllocationConfig,
}

impl SeedAllocator {
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    /// Ranks `skus` the way [`allocate`](Self::allocate) visits them.
    pub fn rank<'a>(
        &self,
        skus: &'a [Sku],
        forecast: Option<&dyn ForecastLookup>,
    ) -> Result<Vec<RankedSku<'a>>> {
        rank_skus(skus, forecast)
    }

    /// Allocates `skus` across the stores of `clusters`.
    ///
    /// The budget is shared by all stores and decremented as lines are
    /// emitted. The first SKU a store cannot afford ends allocation for that
    /// store; later stores still get their turn.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a negative or non-finite budget, a negative or
    /// non-finite unit cost, or a repeated `sku_id`.
    pub fn allocate(
        &self,
        skus: &[Sku],
        clusters: &ClusterAssignment,
        budget: f64,
        max_skus_per_store: usize,
        forecast: Option<&dyn ForecastLookup>,
    ) -> Result<SeedOutcome> {
        if !budget.is_finite() || budget < 0.0 {
            return Err(SeedForgeError::invalid_input(format!(
                "budget must be a non-negative number, got {}",
                budget
            )));
        }

        let ranked = rank_skus(skus, forecast)?;
        let mut lines = Vec::new();
        let mut budget_left = budget;

        if !ranked.is_empty() && max_skus_per_store > 0 {
            for (store_id, cluster_id) in clusters.iter() {
                let mut held: HashSet<&str> = HashSet::new();

                for entry in &ranked {
                    if held.len() >= max_skus_per_store {
                        break;
                    }

                    let quantity =
                        seed_quantity(entry.forecast.as_ref(), self.config.demand_divisor);
                    let cost = entry.sku.cost * f64::from(quantity);
                    if budget_left - cost < 0.0 {
                        trace!(
                            store_id,
                            sku_id = %entry.sku.sku_id,
                            cost,
                            budget_left,
                            "Budget exhausted for store"
                        );
                        break;
                    }

                    budget_left -= cost;
                    held.insert(entry.sku.sku_id.as_str());

                    let mut line = AllocationLine::new(
                        store_id,
                        entry.sku.sku_id.clone(),
                        quantity,
                        entry.sku.cost,
                        cluster_id,
                    );
                    if let Some(f) = entry.forecast {
                        line = line.with_forecast(f);
                    }
                    trace!(
                        store_id,
                        sku_id = %line.sku_id,
                        quantity,
                        cost,
                        budget_left,
                        "Seeded SKU"
                    );
                    lines.push(line);
                }
            }
        }

        debug!(
            event = "allocation_complete",
            line_count = lines.len(),
            store_count = clusters.len(),
            sku_count = skus.len(),
            budget_left,
        );

        Ok(SeedOutcome {
            lines,
            budget_left,
            initial_budget: budget,
        })
    }
}

/// Allocates with the default [`AllocationConfig`].
pub fn allocate(
    skus: &[Sku],
    clusters: &ClusterAssignment,
    budget: f64,
    max_skus_per_store: usize,
    forecast: Option<&dyn ForecastLookup>,
) -> Result<SeedOutcome> {
    SeedAllocator::default().allocate(skus, clusters, budget, max_skus_per_store, forecast)
}
