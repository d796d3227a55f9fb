//! Store records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A retail store with its numeric clustering features.
///
/// # Examples
///
/// ```
/// use seedforge_core::Store;
///
/// let store = Store::new("S1")
///     .with_feature("capacity", 150.0)
///     .with_feature("footfall", 500.0);
///
/// assert_eq!(store.feature("capacity"), Some(150.0));
/// assert_eq!(store.feature("sqft"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub store_id: String,
    #[serde(default)]
    pub features: BTreeMap<String, f64>,
}

impl Store {
    pub fn new(store_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            features: BTreeMap::new(),
        }
    }

    pub fn with_feature(mut self, name: impl Into<String>, value: f64) -> Self {
        self.features.insert(name.into(), value);
        self
    }

    /// Returns the value of a numeric feature, if present.
    pub fn feature(&self, name: &str) -> Option<f64> {
        self.features.get(name).copied()
    }
}
