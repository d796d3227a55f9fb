//! SeedForge Core - Domain types and traits for seed assortment planning
//!
//! This crate provides the fundamental abstractions for SeedForge:
//! - Domain types for stores, SKUs, cluster assignments and allocation lines
//! - Violation types with severity and remediation text
//! - Collaborator traits for sources, forecasts, export sinks and plan storage
//! - The error taxonomy shared by every crate in the workspace

pub mod collaborator;
pub mod domain;
pub mod error;
pub mod stage;

pub use collaborator::{ExportSink, ForecastLookup, PlanRepository, SkuSource, StoreSource};
pub use domain::{
    AllocationLine, ClusterAssignment, ClusterEntry, ClusterProfile, ClusterResult, Forecast,
    ForecastTable, PlanStatus, PublishedPlan, Severity, Sku, Store, Violation, ViolationKind,
};
pub use error::{Result, SeedForgeError};
pub use stage::PipelineStage;
