//! File-backed collaborators for SeedForge.
//!
//! - [`CsvStoreSource`] / [`CsvSkuSource`]: catalogs read from CSV, dropping
//!   malformed rows with a warning
//! - [`load_capacity_csv`] / [`load_forecast_csv`]: auxiliary tables
//! - [`CsvExportSink`]: writes `{out_dir}/{identifier}_{timestamp_ms}.csv`
//!   atomically; [`RecordingExportSink`] keeps exports in memory
//! - [`InMemoryPlanRepository`] / [`JsonFilePlanRepository`]: published plans

mod error;
mod export;
mod repository;
mod sources;
mod tables;

pub use error::AdapterError;
pub use export::{CsvExportSink, ExportRow, RecordingExportSink};
pub use repository::{InMemoryPlanRepository, JsonFilePlanRepository};
pub use sources::{CsvSkuSource, CsvStoreSource};
pub use tables::{load_capacity_csv, load_forecast_csv};
