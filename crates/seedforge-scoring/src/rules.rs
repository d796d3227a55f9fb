//! Rule configuration for a validation run.

use std::collections::HashMap;

use seedforge_config::ValidationConfig;
use seedforge_core::Result;

/// Default tolerance for budget comparisons.
pub const DEFAULT_BUDGET_TOLERANCE: f64 = 1e-6;

/// Capacity information for the fixture rule.
#[derive(Debug, Clone, PartialEq)]
pub enum CapacityData {
    /// Capacity per store, with an optional fallback for unlisted stores.
    Available {
        per_store: HashMap<String, f64>,
        default_max: Option<f64>,
    },
    /// The capacity source failed to load; carries the reason.
    Unavailable(String),
}

impl CapacityData {
    /// The same capacity for every store.
    pub fn uniform(max_space: f64) -> Self {
        CapacityData::Available {
            per_store: HashMap::new(),
            default_max: Some(max_space),
        }
    }

    /// Per-store capacities without a fallback.
    pub fn per_store(per_store: HashMap<String, f64>) -> Self {
        CapacityData::Available {
            per_store,
            default_max: None,
        }
    }

    /// Converts a loader result, turning a load failure into
    /// [`CapacityData::Unavailable`] instead of propagating it.
    pub fn from_load(loaded: Result<HashMap<String, f64>>, default_max: Option<f64>) -> Self {
        match loaded {
            Ok(per_store) => CapacityData::Available {
                per_store,
                default_max,
            },
            Err(e) => CapacityData::Unavailable(e.to_string()),
        }
    }

    /// Capacity that applies to `store_id`, if known.
    pub fn capacity_of(&self, store_id: &str) -> Option<f64> {
        match self {
            CapacityData::Available {
                per_store,
                default_max,
            } => per_store.get(store_id).copied().or(*default_max),
            CapacityData::Unavailable(_) => None,
        }
    }
}

/// Capacity data plus the space each allocated unit consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacitySettings {
    pub data: CapacityData,
    pub space_per_unit: f64,
}

/// The set of rules to check. `None` disables a rule.
///
/// # Examples
///
/// ```
/// use seedforge_scoring::ValidationRules;
///
/// let rules = ValidationRules::new()
///     .with_budget(1_000.0)
///     .with_max_skus_per_store(5)
///     .with_min_skus_per_store(2);
///
/// assert_eq!(rules.budget, Some(1_000.0));
/// assert!(rules.capacity.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRules {
    pub budget: Option<f64>,
    pub max_skus_per_store: Option<usize>,
    pub min_skus_per_store: Option<usize>,
    pub capacity: Option<CapacitySettings>,
    pub budget_tolerance: f64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            budget: None,
            max_skus_per_store: None,
            min_skus_per_store: None,
            capacity: None,
            budget_tolerance: DEFAULT_BUDGET_TOLERANCE,
        }
    }
}

impl ValidationRules {
    /// Creates an empty rule set; every check is skipped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds rules for a planning request.
    ///
    /// Budget and SKU cap come from the request; minimum SKUs, tolerance and
    /// a uniform fixture capacity come from configuration. Per-store capacity
    /// tables must be attached by the caller with [`Self::with_capacity`].
    pub fn for_request(budget: f64, max_skus_per_store: usize, config: &ValidationConfig) -> Self {
        let mut rules = Self::new()
            .with_budget(budget)
            .with_max_skus_per_store(max_skus_per_store);
        rules.min_skus_per_store = config.min_skus_per_store;
        rules.budget_tolerance = config.budget_tolerance;
        if let Some(max_space) = config.max_space_per_store {
            rules = rules.with_capacity(CapacityData::uniform(max_space), config.space_per_unit);
        }
        rules
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_max_skus_per_store(mut self, max: usize) -> Self {
        self.max_skus_per_store = Some(max);
        self
    }

    pub fn with_min_skus_per_store(mut self, min: usize) -> Self {
        self.min_skus_per_store = Some(min);
        self
    }

    pub fn with_capacity(mut self, data: CapacityData, space_per_unit: f64) -> Self {
        self.capacity = Some(CapacitySettings {
            data,
            space_per_unit,
        });
        self
    }

    pub fn with_budget_tolerance(mut self, tolerance: f64) -> Self {
        self.budget_tolerance = tolerance;
        self
    }
}
