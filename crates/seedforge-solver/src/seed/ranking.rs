use std::collections::HashSet;

use seedforge_core::{Forecast, ForecastLookup, Result, SeedForgeError, Sku};

/// A catalog entry with the priority it was ranked by.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSku<'a> {
    pub sku: &'a Sku,
    pub priority: f64,
    pub forecast: Option<Forecast>,
}

/// Ranks the catalog by descending priority, keeping catalog order on ties.
///
/// Priority is the forecast demand when `forecast` has an entry for the SKU,
/// otherwise its category score.
pub(crate) fn rank_skus<'a>(
    skus: &'a [Sku],
    forecast: Option<&dyn ForecastLookup>,
) -> Result<Vec<RankedSku<'a>>> {
    let mut seen = HashSet::with_capacity(skus.len());
    let mut ranked = Vec::with_capacity(skus.len());

    for sku in skus {
        if !seen.insert(sku.sku_id.as_str()) {
            return Err(SeedForgeError::invalid_input(format!(
                "sku '{}' appears more than once in the catalog",
                sku.sku_id
            )));
        }
        if !sku.cost.is_finite() || sku.cost < 0.0 {
            return Err(SeedForgeError::invalid_input(format!(
                "sku '{}' has invalid unit cost {}",
                sku.sku_id, sku.cost
            )));
        }

        let forecast = forecast
            .and_then(|f| f.forecast(&sku.sku_id))
            .filter(|f| f.predicted_demand.is_finite());
        let priority = match forecast {
            Some(f) => f.predicted_demand,
            None => sku.category_score,
        };
        ranked.push(RankedSku {
            sku,
            priority,
            forecast,
        });
    }

    ranked.sort_by(|a, b| b.priority.total_cmp(&a.priority));
    Ok(ranked)
}

/// Units to seed: one without a forecast, else `max(1, round(demand / divisor))`.
pub(crate) fn seed_quantity(forecast: Option<&Forecast>, demand_divisor: f64) -> u32 {
    match forecast {
        Some(f) => {
            let units = (f.predicted_demand / demand_divisor).round();
            if units.is_finite() && units >= 1.0 {
                units.min(f64::from(u32::MAX)) as u32
            } else {
                1
            }
        }
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use seedforge_core::ForecastTable;

    use super::*;

    #[test]
    fn test_ties_keep_catalog_order() {
        let skus = vec![
            Sku::new("A", "x", 1.0, 0.5),
            Sku::new("B", "x", 1.0, 0.9),
            Sku::new("C", "x", 1.0, 0.5),
        ];
        let ranked = rank_skus(&skus, None).unwrap();
        let ids: Vec<&str> = ranked.iter().map(|r| r.sku.sku_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_forecast_overrides_score() {
        let skus = vec![Sku::new("A", "x", 1.0, 0.9), Sku::new("B", "x", 1.0, 0.1)];
        let table = ForecastTable::new().with("B", Forecast::new(12.0, 0.8));
        let ranked = rank_skus(&skus, Some(&table)).unwrap();
        assert_eq!(ranked[0].sku.sku_id, "B");
        assert_eq!(ranked[0].priority, 12.0);
        assert!(ranked[1].forecast.is_none());
    }

    #[test]
    fn test_quantity_rounding() {
        assert_eq!(seed_quantity(None, 2.0), 1);
        assert_eq!(seed_quantity(Some(&Forecast::new(0.4, 1.0)), 2.0), 1);
        assert_eq!(seed_quantity(Some(&Forecast::new(7.0, 1.0)), 2.0), 4);
        assert_eq!(seed_quantity(Some(&Forecast::new(10.0, 1.0)), 2.0), 5);
        assert_eq!(seed_quantity(Some(&Forecast::new(-3.0, 1.0)), 2.0), 1);
    }

    #[test]
    fn test_rejects_bad_catalog() {
        let dup = vec![Sku::new("A", "x", 1.0, 0.5), Sku::new("A", "y", 2.0, 0.1)];
        assert!(rank_skus(&dup, None).is_err());

        let negative = vec![Sku::new("A", "x", -1.0, 0.5)];
        assert!(rank_skus(&negative, None).is_err());

        let nan = vec![Sku::new("A", "x", f64::NAN, 0.5)];
        assert!(rank_skus(&nan, None).is_err());
    }
}
