//! SeedForge - Store Clustering and Seed Assortment Planning
//!
//! Clusters stores by their features, seeds each store with a budgeted
//! starting assortment, validates the plan and exports it.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use seedforge::prelude::*;
//!
//! let stores: Vec<Store> = (0..6)
//!     .map(|i| {
//!         let big = i % 2 == 0;
//!         Store::new(format!("S{}", i + 1))
//!             .with_feature("capacity", (if big { 200.0 } else { 90.0 }) + i as f64)
//!             .with_feature("footfall", (if big { 800.0 } else { 300.0 }) + i as f64)
//!     })
//!     .collect();
//! let skus = vec![
//!     Sku::new("TEE", "apparel", 12.0, 0.9),
//!     Sku::new("CAP", "apparel", 8.0, 0.6),
//! ];
//!
//! let sink = Arc::new(RecordingExportSink::new());
//! let request = PipelineRequest::new(["capacity", "footfall"], 500.0, 2).with_k(2);
//! let state = Pipeline::new(PlannerConfig::default(), sink.clone())
//!     .run(&stores, &skus, request)
//!     .unwrap();
//!
//! assert_eq!(state.status, PipelineStatus::Exported);
//! assert_eq!(sink.call_count(), 1);
//! ```

pub use seedforge_config::{
    AllocationConfig, ClusteringConfig, ConfigError, ExportConfig, PlannerConfig,
    ValidationConfig,
};
pub use seedforge_core::{
    AllocationLine, ClusterAssignment, ClusterProfile, ClusterResult, ExportSink, Forecast,
    ForecastLookup, ForecastTable, PipelineStage, PlanRepository, PlanStatus, PublishedPlan,
    Result, SeedForgeError, Severity, Sku, SkuSource, Store, StoreSource, Violation,
    ViolationKind,
};
pub use seedforge_io::{
    load_capacity_csv, load_forecast_csv, CsvExportSink, CsvSkuSource, CsvStoreSource,
    InMemoryPlanRepository, JsonFilePlanRepository, RecordingExportSink,
};
pub use seedforge_scoring::{
    validate, CapacityData, ConstraintValidator, ValidationReport, ValidationRules,
};
pub use seedforge_solver::{
    allocate, select_clusters, ClusterSelector, Pipeline, PipelineFailure, PipelineHandle,
    PipelineListener, PipelineManager, PipelineRequest, PipelineResult, PipelineState,
    PipelineStatus, SeedAllocator, SeedOutcome,
};

/// Console output, with the `console` feature.
#[cfg(feature = "console")]
pub use seedforge_console as console;

pub mod prelude {
    pub use super::{
        AllocationLine, ClusterAssignment, ClusterSelector, ConstraintValidator, CsvExportSink,
        CsvSkuSource, CsvStoreSource, ExportSink, Forecast, ForecastTable, Pipeline,
        PipelineRequest, PipelineStatus, PlannerConfig, RecordingExportSink, SeedAllocator,
        SeedForgeError, Sku, Store, ValidationRules,
    };
}
