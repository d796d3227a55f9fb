//! Demand forecasts consumed by the allocator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::collaborator::ForecastLookup;

/// Forecasted demand for a single SKU.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub predicted_demand: f64,
    pub confidence: f64,
}

impl Forecast {
    pub fn new(predicted_demand: f64, confidence: f64) -> Self {
        Self {
            predicted_demand,
            confidence,
        }
    }
}

/// A precomputed forecast table keyed by SKU id.
///
/// # Examples
///
/// ```
/// use seedforge_core::{Forecast, ForecastLookup, ForecastTable};
///
/// let table = ForecastTable::new().with("SKU-1", Forecast::new(12.0, 0.8));
/// assert_eq!(table.forecast("SKU-1").map(|f| f.predicted_demand), Some(12.0));
/// assert!(table.forecast("SKU-2").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastTable {
    entries: HashMap<String, Forecast>,
}

impl ForecastTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sku_id: impl Into<String>, forecast: Forecast) -> Self {
        self.insert(sku_id, forecast);
        self
    }

    pub fn insert(&mut self, sku_id: impl Into<String>, forecast: Forecast) {
        self.entries.insert(sku_id.into(), forecast);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Forecast)> for ForecastTable {
    fn from_iter<I: IntoIterator<Item = (String, Forecast)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl ForecastLookup for ForecastTable {
    fn forecast(&self, sku_id: &str) -> Option<Forecast> {
        self.entries.get(sku_id).copied()
    }
}
