//! SKU catalog records.

use serde::{Deserialize, Serialize};

/// A stock-keeping unit from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sku {
    pub sku_id: String,
    pub category: String,
    /// Unit cost, non-negative.
    pub cost: f64,
    /// Ranking score used when no forecast is available.
    pub category_score: f64,
}

impl Sku {
    pub fn new(
        sku_id: impl Into<String>,
        category: impl Into<String>,
        cost: f64,
        category_score: f64,
    ) -> Self {
        Self {
            sku_id: sku_id.into(),
            category: category.into(),
            cost,
            category_score,
        }
    }
}
