//! Traits for the collaborators the planning core consumes.
//!
//! The core never loads files, formats exports or stores plans itself.
//! It talks to these traits; `seedforge-io` provides file-backed
//! implementations and tests use the in-memory ones.

use crate::domain::{AllocationLine, Forecast, PublishedPlan, Sku, Store};
use crate::error::Result;

/// Produces the store records for a clustering run.
///
/// Implementations drop malformed rows before returning.
pub trait StoreSource {
    fn load_stores(&self) -> Result<Vec<Store>>;
}

/// Produces the SKU catalog for an allocation run.
pub trait SkuSource {
    fn load_skus(&self) -> Result<Vec<Sku>>;
}

impl StoreSource for Vec<Store> {
    fn load_stores(&self) -> Result<Vec<Store>> {
        Ok(self.clone())
    }
}

impl SkuSource for Vec<Sku> {
    fn load_skus(&self) -> Result<Vec<Sku>> {
        Ok(self.clone())
    }
}

/// Pure lookup of forecasted demand per SKU.
///
/// A missing entry means "rank by the default category score".
pub trait ForecastLookup: Send + Sync {
    fn forecast(&self, sku_id: &str) -> Option<Forecast>;
}

impl<F> ForecastLookup for F
where
    F: Fn(&str) -> Option<Forecast> + Send + Sync,
{
    fn forecast(&self, sku_id: &str) -> Option<Forecast> {
        self(sku_id)
    }
}

/// Publishes a finished allocation and returns where it was written.
pub trait ExportSink: Send + Sync {
    fn export(&self, identifier: &str, lines: &[AllocationLine]) -> Result<String>;
}

/// Stores published plans and retrieves them by id.
pub trait PlanRepository: Send + Sync {
    fn publish(&self, name: &str, lines: Vec<AllocationLine>) -> Result<PublishedPlan>;

    /// Returns `Ok(None)` when no plan has the given id.
    fn get(&self, plan_id: &str) -> Result<Option<PublishedPlan>>;
}
