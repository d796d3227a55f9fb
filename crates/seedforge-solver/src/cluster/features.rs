//! Feature extraction and standardization.

use std::collections::HashSet;

use seedforge_core::{Result, SeedForgeError, Store};

/// Store features laid out as rows, raw and z-score standardized.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub store_ids: Vec<String>,
    pub features: Vec<String>,
    /// Raw values, one row per store.
    pub raw: Vec<Vec<f64>>,
    /// Standardized values; zero-variance columns are all zero.
    pub scaled: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Extracts `features` from every store.
    ///
    /// # Errors
    ///
    /// Returns [`SeedForgeError::InvalidInput`] naming the offending feature
    /// and store when the input is empty, a store id repeats, a feature is
    /// missing or not finite, or all stores are identical.
    pub fn from_stores(stores: &[Store], features: &[String]) -> Result<Self> {
        if stores.is_empty() {
            return Err(SeedForgeError::invalid_input("store set is empty"));
        }
        if features.is_empty() {
            return Err(SeedForgeError::invalid_input("feature list is empty"));
        }

        let mut seen_features = HashSet::new();
        for f in features {
            if f.trim().is_empty() {
                return Err(SeedForgeError::invalid_input(
                    "feature list contains an empty name",
                ));
            }
            if !seen_features.insert(f.as_str()) {
                return Err(SeedForgeError::invalid_input(format!(
                    "feature '{}' is listed more than once",
                    f
                )));
            }
        }

        let mut seen_stores = HashSet::new();
        let mut raw = Vec::with_capacity(stores.len());
        for (row, store) in stores.iter().enumerate() {
            if !seen_stores.insert(store.store_id.as_str()) {
                return Err(SeedForgeError::invalid_input(format!(
                    "store '{}' (row {}) appears more than once",
                    store.store_id, row
                )));
            }
            let mut values = Vec::with_capacity(features.len());
            for f in features {
                let value = store.feature(f).ok_or_else(|| {
                    SeedForgeError::invalid_input(format!(
                        "feature '{}' is missing on store '{}' (row {})",
                        f, store.store_id, row
                    ))
                })?;
                if !value.is_finite() {
                    return Err(SeedForgeError::invalid_input(format!(
                        "feature '{}' on store '{}' (row {}) is not a finite number",
                        f, store.store_id, row
                    )));
                }
                values.push(value);
            }
            raw.push(values);
        }

        let scaled = standardize(&raw, features.len());
        if scaled.iter().all(|row| row.iter().all(|&v| v == 0.0)) {
            return Err(SeedForgeError::invalid_input(format!(
                "all {} stores are identical over features [{}]",
                stores.len(),
                features.join(", ")
            )));
        }

        Ok(Self {
            store_ids: stores.iter().map(|s| s.store_id.clone()).collect(),
            features: features.to_vec(),
            raw,
            scaled,
        })
    }

    pub fn len(&self) -> usize {
        self.store_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store_ids.is_empty()
    }
}

/// Relative standard deviation below which a column counts as constant.
const ZERO_VARIANCE: f64 = 1e-12;

fn standardize(raw: &[Vec<f64>], dims: usize) -> Vec<Vec<f64>> {
    let n = raw.len() as f64;
    let mut means = vec![0.0; dims];
    for row in raw {
        for (m, v) in means.iter_mut().zip(row) {
            *m += v;
        }
    }
    for m in &mut means {
        *m /= n;
    }

    let mut stds = vec![0.0; dims];
    for row in raw {
        for (d, v) in row.iter().enumerate() {
            stds[d] += (v - means[d]).powi(2);
        }
    }
    for s in &mut stds {
        *s = (*s / n).sqrt();
    }

    raw.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(d, v)| {
                    if stds[d] > ZERO_VARIANCE * means[d].abs().max(1.0) {
                        (v - means[d]) / stds[d]
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}
