//! Store and SKU catalogs read from CSV files.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use seedforge_core::{Result, Sku, SkuSource, Store, StoreSource};

use crate::error::AdapterError;

pub(crate) fn open_reader(
    path: &Path,
) -> std::result::Result<csv::Reader<std::fs::File>, AdapterError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| AdapterError::csv(path, e))
}

pub(crate) fn column(
    headers: &csv::StringRecord,
    path: &Path,
    name: &str,
) -> std::result::Result<usize, AdapterError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| AdapterError::missing_column(path, name))
}

/// Stores from a CSV with a `store_id` column and numeric feature columns.
///
/// Rows without a store id, with a non-numeric value in a selected feature,
/// or with the wrong number of fields are dropped and logged.
#[derive(Debug, Clone)]
pub struct CsvStoreSource {
    path: PathBuf,
    features: Option<Vec<String>>,
}

impl CsvStoreSource {
    /// Reads every numeric column other than `store_id` as a feature.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            features: None,
        }
    }

    /// Reads only `features`; each must be a column of the file.
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = Some(features.into_iter().map(Into::into).collect());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> std::result::Result<Vec<Store>, AdapterError> {
        let path = self.path.as_path();
        let mut reader = open_reader(path)?;
        let headers = reader
            .headers()
            .map_err(|e| AdapterError::csv(path, e))?
            .clone();
        let id_col = column(&headers, path, "store_id")?;

        let (columns, strict): (Vec<(usize, String)>, bool) = match &self.features {
            Some(features) => (
                features
                    .iter()
                    .map(|f| column(&headers, path, f).map(|idx| (idx, f.clone())))
                    .collect::<std::result::Result<_, _>>()?,
                true,
            ),
            None => (
                headers
                    .iter()
                    .enumerate()
                    .filter(|(idx, _)| *idx != id_col)
                    .map(|(idx, name)| (idx, name.to_string()))
                    .collect(),
                false,
            ),
        };

        let mut stores = Vec::new();
        'rows: for (idx, result) in reader.records().enumerate() {
            let row_number = idx + 1;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        row = row_number as u64,
                        error = %e,
                        "Skipping malformed store row"
                    );
                    continue;
                }
            };

            let store_id = record.get(id_col).unwrap_or("");
            if store_id.is_empty() {
                warn!(
                    path = %path.display(),
                    row = row_number as u64,
                    "Skipping store row without store_id"
                );
                continue;
            }

            let mut store = Store::new(store_id);
            for (col, name) in &columns {
                let raw = record.get(*col).unwrap_or("");
                match raw.parse::<f64>() {
                    Ok(value) if value.is_finite() => {
                        store = store.with_feature(name.clone(), value)
                    }
                    _ if strict => {
                        warn!(
                            path = %path.display(),
                            row = row_number as u64,
                            store_id,
                            feature = name.as_str(),
                            value = raw,
                            "Skipping store row with non-numeric feature"
                        );
                        continue 'rows;
                    }
                    _ => debug!(store_id, column = name.as_str(), "Ignoring non-numeric column"),
                }
            }
            stores.push(store);
        }

        info!(path = %path.display(), store_count = stores.len() as u64, "Loaded stores");
        Ok(stores)
    }
}

impl StoreSource for CsvStoreSource {
    fn load_stores(&self) -> Result<Vec<Store>> {
        self.read().map_err(AdapterError::into_input)
    }
}

#[derive(Debug, Deserialize)]
struct SkuRow {
    sku_id: Option<String>,
    #[serde(default)]
    category: Option<String>,
    cost: Option<f64>,
    category_score: Option<f64>,
}

/// SKUs from a CSV with `sku_id, category, cost, category_score` columns.
///
/// `category` may be absent. Rows missing any other value, or with a
/// negative or non-finite cost, are dropped and logged.
#[derive(Debug, Clone)]
pub struct CsvSkuSource {
    path: PathBuf,
}

impl CsvSkuSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> std::result::Result<Vec<Sku>, AdapterError> {
        let path = self.path.as_path();
        let mut reader = open_reader(path)?;
        let headers = reader
            .headers()
            .map_err(|e| AdapterError::csv(path, e))?
            .clone();
        for required in ["sku_id", "cost", "category_score"] {
            column(&headers, path, required)?;
        }

        let mut skus = Vec::new();
        for (idx, result) in reader.deserialize::<SkuRow>().enumerate() {
            let row_number = idx + 1;
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        row = row_number as u64,
                        error = %e,
                        "Skipping malformed sku row"
                    );
                    continue;
                }
            };

            match row {
                SkuRow {
                    sku_id: Some(sku_id),
                    category,
                    cost: Some(cost),
                    category_score: Some(score),
                } if !sku_id.is_empty() && cost.is_finite() && cost >= 0.0 && score.is_finite() => {
                    skus.push(Sku::new(sku_id, category.unwrap_or_default(), cost, score));
                }
                _ => {
                    warn!(
                        path = %path.display(),
                        row = row_number as u64,
                        "Skipping incomplete sku row"
                    );
                }
            }
        }

        info!(path = %path.display(), sku_count = skus.len() as u64, "Loaded skus");
        Ok(skus)
    }
}

impl SkuSource for CsvSkuSource {
    fn load_skus(&self) -> Result<Vec<Sku>> {
        self.read().map_err(AdapterError::into_input)
    }
}
