//! Domain types for seed assortment planning.
//!
//! Data flows through these types in pipeline order:
//! [`Store`] records are grouped into a [`ClusterAssignment`], the allocator
//! turns [`Sku`]s into [`AllocationLine`]s, and validation produces
//! [`Violation`]s.

mod cluster;
mod forecast;
mod line;
mod plan;
mod sku;
mod store;
mod violation;

pub use cluster::{ClusterAssignment, ClusterEntry, ClusterProfile, ClusterResult};
pub use forecast::{Forecast, ForecastTable};
pub use line::AllocationLine;
pub use plan::{PlanStatus, PublishedPlan};
pub use sku::Sku;
pub use store::Store;
pub use violation::{Severity, Violation, ViolationKind};
