//! Configuration system for SeedForge.
//!
//! Load planner configuration from TOML or YAML files to tune clustering,
//! allocation, validation and export without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use seedforge_config::PlannerConfig;
//!
//! let config = PlannerConfig::from_toml_str(r#"
//!     features = ["capacity", "footfall", "income_index"]
//!
//!     [clustering]
//!     min_k = 2
//!     max_k = 6
//!     random_seed = 7
//!
//!     [validation]
//!     min_skus_per_store = 3
//!     space_per_unit = 0.25
//! "#).unwrap();
//!
//! assert_eq!(config.clustering.candidate_range(20), Some((2, 6)));
//! assert_eq!(config.validation.min_skus_per_store, Some(3));
//! assert_eq!(config.features.len(), 3);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use seedforge_config::PlannerConfig;
//!
//! let config = PlannerConfig::load("planner.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! assert_eq!(config.clustering.min_k, 3);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main planner configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlannerConfig {
    /// Store features used for clustering when the caller names none.
    #[serde(default = "default_features")]
    pub features: Vec<String>,

    #[serde(default)]
    pub clustering: ClusteringConfig,

    #[serde(default)]
    pub allocation: AllocationConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

fn default_features() -> Vec<String> {
    vec!["capacity".to_string(), "footfall".to_string()]
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            features: default_features(),
            clustering: ClusteringConfig::default(),
            allocation: AllocationConfig::default(),
            validation: ValidationConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML,
    /// or describes an unusable configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a `.yaml`/`.yml` file as YAML and anything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Sets the clustering features.
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the random seed used by clustering.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.clustering.random_seed = seed;
        self
    }

    /// Sets the candidate range for automatic cluster count selection.
    pub fn with_k_range(mut self, min_k: usize, max_k: usize) -> Self {
        self.clustering.min_k = min_k;
        self.clustering.max_k = max_k;
        self
    }

    /// Sets the minimum distinct SKUs each store should carry.
    pub fn with_min_skus_per_store(mut self, min: usize) -> Self {
        self.validation.min_skus_per_store = Some(min);
        self
    }

    /// Sets the per-store capacity table read by the fixture rule.
    pub fn with_capacity_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.validation.capacity_csv = Some(path.into());
        self
    }

    /// Sets the export output directory.
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.export.out_dir = out_dir.into();
        self
    }

    /// Checks cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.clustering;
        if c.min_k < 2 {
            return Err(ConfigError::Invalid(format!(
                "clustering.min_k must be at least 2, got {}",
                c.min_k
            )));
        }
        if c.max_k < c.min_k {
            return Err(ConfigError::Invalid(format!(
                "clustering.max_k ({}) is below clustering.min_k ({})",
                c.max_k, c.min_k
            )));
        }
        if c.max_iterations == 0 || c.n_init == 0 {
            return Err(ConfigError::Invalid(
                "clustering.max_iterations and clustering.n_init must be positive".to_string(),
            ));
        }
        let divisor = self.allocation.demand_divisor;
        if divisor.is_nan() || divisor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "allocation.demand_divisor must be positive, got {}",
                divisor
            )));
        }
        let space = self.validation.space_per_unit;
        if space.is_nan() || space < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "validation.space_per_unit must be non-negative, got {}",
                space
            )));
        }
        Ok(())
    }
}

/// Store clustering configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ClusteringConfig {
    /// Smallest cluster count tried during automatic selection.
    pub min_k: usize,

    /// Largest cluster count tried during automatic selection.
    pub max_k: usize,

    /// Seed for k-means++ initialization.
    pub random_seed: u64,

    /// Lloyd iteration cap per k-means run.
    pub max_iterations: usize,

    /// Centroid movement below which k-means is considered converged.
    pub tolerance: f64,

    /// Independent k-means restarts per candidate; lowest inertia wins.
    pub n_init: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            min_k: 3,
            max_k: 8,
            random_seed: 42,
            max_iterations: 300,
            tolerance: 1e-4,
            n_init: 4,
        }
    }
}

impl ClusteringConfig {
    /// Returns the inclusive candidate range clipped to `k < store_count`,
    /// or `None` when no candidate is left.
    pub fn candidate_range(&self, store_count: usize) -> Option<(usize, usize)> {
        let upper = self.max_k.min(store_count.saturating_sub(1));
        if upper < self.min_k {
            None
        } else {
            Some((self.min_k, upper))
        }
    }
}

/// Seed allocation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AllocationConfig {
    /// Forecasted demand is divided by this to get the line quantity.
    pub demand_divisor: f64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            demand_divisor: 2.0,
        }
    }
}

/// Constraint validation configuration.
///
/// Budget and maximum SKUs per store come from the planning request;
/// these are the optional extra rules.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ValidationConfig {
    /// Stores below this many distinct SKUs get a warning.
    pub min_skus_per_store: Option<usize>,

    /// Fixture space consumed per allocated unit (sq ft).
    pub space_per_unit: f64,

    /// Uniform fixture capacity applied to stores without their own entry.
    pub max_space_per_store: Option<f64>,

    /// Per-store capacity table (CSV with `store_id,capacity`).
    pub capacity_csv: Option<PathBuf>,

    /// Tolerance for floating-point budget comparison.
    pub budget_tolerance: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_skus_per_store: None,
            space_per_unit: 0.1,
            max_space_per_store: None,
            capacity_csv: None,
            budget_tolerance: 1e-6,
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ExportConfig {
    /// Directory export files are published to.
    pub out_dir: PathBuf,

    /// Identifier used for exports produced by the automatic pipeline.
    pub identifier: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            identifier: "seed_auto".to_string(),
        }
    }
}

#[cfg(test)]
mod tests;
