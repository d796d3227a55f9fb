//! Allocation lines produced by the seed allocator.

use serde::{Deserialize, Serialize};

use crate::domain::Forecast;

/// One (store, SKU, quantity) assignment with its cost.
///
/// This is the single line type shared by the allocator, validator,
/// exporter and plan repository.
///
/// # Examples
///
/// ```
/// use seedforge_core::AllocationLine;
///
/// let line = AllocationLine::new("S1", "SKU-7", 3, 12.5, 0);
/// assert_eq!(line.total_cost, 37.5);
/// assert_eq!(line.rationale, "cluster 0 priority");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub store_id: String,
    pub sku_id: String,
    pub quantity: u32,
    pub unit_cost: f64,
    pub total_cost: f64,
    pub cluster_id: usize,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_demand: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl AllocationLine {
    /// Creates a line ranked by category priority.
    pub fn new(
        store_id: impl Into<String>,
        sku_id: impl Into<String>,
        quantity: u32,
        unit_cost: f64,
        cluster_id: usize,
    ) -> Self {
        Self {
            store_id: store_id.into(),
            sku_id: sku_id.into(),
            quantity,
            unit_cost,
            total_cost: unit_cost * f64::from(quantity),
            cluster_id,
            rationale: format!("cluster {} priority", cluster_id),
            forecast_demand: None,
            confidence: None,
        }
    }

    /// Attaches the forecast that drove this line's ranking and quantity.
    pub fn with_forecast(mut self, forecast: Forecast) -> Self {
        self.rationale = format!(
            "cluster {} forecast demand {:.1}",
            self.cluster_id, forecast.predicted_demand
        );
        self.forecast_demand = Some(forecast.predicted_demand);
        self.confidence = Some(forecast.confidence);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_rationale() {
        let line =
            AllocationLine::new("S2", "SKU-1", 4, 10.0, 2).with_forecast(Forecast::new(7.5, 0.9));
        assert_eq!(line.rationale, "cluster 2 forecast demand 7.5");
        assert_eq!(line.forecast_demand, Some(7.5));
        assert_eq!(line.confidence, Some(0.9));
        assert_eq!(line.total_cost, 40.0);
    }

    #[test]
    fn test_json_omits_missing_forecast() {
        let line = AllocationLine::new("S1", "SKU-1", 1, 5.0, 0);
        let json = serde_json::to_string(&line).unwrap();
        assert!(!json.contains("forecast_demand"));

        let back: AllocationLine = serde_json::from_str(&json).unwrap();
        assert_eq!(back, line);
    }
}
