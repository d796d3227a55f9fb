//! Auxiliary tables: fixture capacity and demand forecasts.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use seedforge_core::{Forecast, ForecastTable, Result};

use crate::error::AdapterError;
use crate::sources::{column, open_reader};

#[derive(Debug, Deserialize)]
struct CapacityRow {
    store_id: String,
    capacity: f64,
}

/// Loads per-store fixture capacity from a `store_id, capacity` CSV.
///
/// Any failure, including a malformed row, is a `ConstraintData` error: a
/// partial capacity table would silently skip stores.
pub fn load_capacity_csv(path: impl AsRef<Path>) -> Result<HashMap<String, f64>> {
    read_capacity(path.as_ref()).map_err(AdapterError::into_constraint_data)
}

fn read_capacity(path: &Path) -> std::result::Result<HashMap<String, f64>, AdapterError> {
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .map_err(|e| AdapterError::csv(path, e))?
        .clone();
    column(&headers, path, "store_id")?;
    column(&headers, path, "capacity")?;

    let mut table = HashMap::new();
    for result in reader.deserialize::<CapacityRow>() {
        let row = result.map_err(|e| AdapterError::csv(path, e))?;
        table.insert(row.store_id, row.capacity);
    }

    info!(path = %path.display(), store_count = table.len() as u64, "Loaded capacity table");
    Ok(table)
}

#[derive(Debug, Deserialize)]
struct ForecastRow {
    sku_id: String,
    predicted_demand: Option<f64>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Loads forecasts from a `sku_id, predicted_demand[, confidence]` CSV.
///
/// Confidence defaults to 1.0. Rows without a usable demand are dropped.
pub fn load_forecast_csv(path: impl AsRef<Path>) -> Result<ForecastTable> {
    read_forecast(path.as_ref()).map_err(AdapterError::into_input)
}

fn read_forecast(path: &Path) -> std::result::Result<ForecastTable, AdapterError> {
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .map_err(|e| AdapterError::csv(path, e))?
        .clone();
    column(&headers, path, "sku_id")?;
    column(&headers, path, "predicted_demand")?;

    let mut table = ForecastTable::new();
    for (idx, result) in reader.deserialize::<ForecastRow>().enumerate() {
        match result {
            Ok(ForecastRow {
                sku_id,
                predicted_demand: Some(demand),
                confidence,
            }) if !sku_id.is_empty() && demand.is_finite() => {
                table.insert(sku_id, Forecast::new(demand, confidence.unwrap_or(1.0)));
            }
            Ok(_) => warn!(
                path = %path.display(),
                row = (idx + 1) as u64,
                "Skipping forecast row without demand"
            ),
            Err(e) => warn!(
                path = %path.display(),
                row = (idx + 1) as u64,
                error = %e,
                "Skipping malformed forecast row"
            ),
        }
    }

    info!(path = %path.display(), sku_count = table.len() as u64, "Loaded forecasts");
    Ok(table)
}
