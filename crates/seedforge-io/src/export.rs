//! Export sinks.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use seedforge_config::ExportConfig;
use seedforge_core::{AllocationLine, ExportSink, Result, SeedForgeError};

use crate::error::AdapterError;

/// One CSV record of an exported plan.
///
/// Forecast columns are always present and left empty when unused, so every
/// record has the same width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub store_id: String,
    pub sku_id: String,
    pub quantity: u32,
    pub unit_cost: f64,
    pub total_cost: f64,
    pub cluster_id: usize,
    pub rationale: String,
    pub forecast_demand: Option<f64>,
    pub confidence: Option<f64>,
}

impl From<&AllocationLine> for ExportRow {
    fn from(line: &AllocationLine) -> Self {
        Self {
            store_id: line.store_id.clone(),
            sku_id: line.sku_id.clone(),
            quantity: line.quantity,
            unit_cost: line.unit_cost,
            total_cost: line.total_cost,
            cluster_id: line.cluster_id,
            rationale: line.rationale.clone(),
            forecast_demand: line.forecast_demand,
            confidence: line.confidence,
        }
    }
}

/// Writes plans to `{out_dir}/{identifier}_{timestamp_ms}.csv`.
///
/// The file is written to a temporary file in `out_dir` and renamed into
/// place, so a reader never sees a partial export. An existing file is never
/// replaced: a second export in the same millisecond gets a `_1`, `_2`, ...
/// suffix.
#[derive(Debug, Clone)]
pub struct CsvExportSink {
    out_dir: PathBuf,
}

impl CsvExportSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.out_dir.clone())
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn write(
        &self,
        identifier: &str,
        lines: &[AllocationLine],
    ) -> std::result::Result<PathBuf, AdapterError> {
        let stem = format!("{}_{}", identifier, Utc::now().timestamp_millis());
        self.write_stem(&stem, lines)
    }

    fn write_stem(
        &self,
        stem: &str,
        lines: &[AllocationLine],
    ) -> std::result::Result<PathBuf, AdapterError> {
        let dir = self.out_dir.as_path();
        fs::create_dir_all(dir).map_err(|e| AdapterError::io(dir, e))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| AdapterError::io(dir, e))?;
        {
            let tmp_path = tmp.path().to_path_buf();
            let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
            if lines.is_empty() {
                writer
                    .write_record(EXPORT_HEADER)
                    .map_err(|e| AdapterError::csv(&tmp_path, e))?;
            }
            for line in lines {
                writer
                    .serialize(ExportRow::from(line))
                    .map_err(|e| AdapterError::csv(&tmp_path, e))?;
            }
            writer.flush().map_err(|e| AdapterError::io(&tmp_path, e))?;
        }

        let mut attempt = 0;
        loop {
            let target = dir.join(export_file_name(stem, attempt));
            match tmp.persist_noclobber(&target) {
                Ok(_) => return Ok(target),
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists
                    && attempt < MAX_NAME_ATTEMPTS =>
                {
                    tmp = e.file;
                    attempt += 1;
                }
                Err(e) => return Err(AdapterError::io(&target, e.error)),
            }
        }
    }
}

/// Suffixed names tried after the plain one is taken.
const MAX_NAME_ATTEMPTS: u32 = 100;

fn export_file_name(stem: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{}.csv", stem)
    } else {
        format!("{}_{}.csv", stem, attempt)
    }
}

const EXPORT_HEADER: [&str; 9] = [
    "store_id",
    "sku_id",
    "quantity",
    "unit_cost",
    "total_cost",
    "cluster_id",
    "rationale",
    "forecast_demand",
    "confidence",
];

impl ExportSink for CsvExportSink {
    fn export(&self, identifier: &str, lines: &[AllocationLine]) -> Result<String> {
        if identifier.is_empty() || identifier.contains(['/', '\\']) {
            return Err(SeedForgeError::Export(format!(
                "invalid export identifier '{}'",
                identifier
            )));
        }
        let path = self.write(identifier, lines).map_err(AdapterError::into_export)?;
        let path = path.display().to_string();
        info!(event = "plan_exported", path = %path, line_count = lines.len() as u64);
        Ok(path)
    }
}

/// Keeps exports in memory; for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingExportSink {
    exports: Mutex<Vec<(String, Vec<AllocationLine>)>>,
    failure: Option<String>,
}

impl RecordingExportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every export fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            exports: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// The path reported for an export of `identifier`.
    pub fn path_for(&self, identifier: &str) -> String {
        format!("memory://{}", identifier)
    }

    /// Number of successful exports.
    pub fn call_count(&self) -> usize {
        self.lock().len()
    }

    /// Every successful export as `(identifier, lines)`, oldest first.
    pub fn exports(&self) -> Vec<(String, Vec<AllocationLine>)> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, Vec<AllocationLine>)>> {
        self.exports.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ExportSink for RecordingExportSink {
    fn export(&self, identifier: &str, lines: &[AllocationLine]) -> Result<String> {
        if let Some(message) = &self.failure {
            return Err(SeedForgeError::Export(message.clone()));
        }
        self.lock().push((identifier.to_string(), lines.to_vec()));
        Ok(self.path_for(identifier))
    }
}

#[cfg(test)]
mod tests {
    use seedforge_core::Forecast;
    use seedforge_test::line;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_csv_export_layout() {
        let dir = TempDir::new().unwrap();
        let sink = CsvExportSink::new(dir.path().join("out"));
        let lines = vec![
            line("S1", "SKU-01", 2, 10.0),
            AllocationLine::new("S2", "SKU-02", 3, 5.0, 1).with_forecast(Forecast::new(6.0, 0.5)),
        ];

        let path = sink.export("seed_auto", &lines).unwrap();
        let name = Path::new(&path).file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("seed_auto_") && name.ends_with(".csv"), "{name}");

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<&str> = reader.headers().unwrap().iter().collect();
        assert_eq!(headers, EXPORT_HEADER.to_vec());
        let rows: Vec<ExportRow> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].total_cost, 20.0);
        assert_eq!(rows[0].forecast_demand, None);
        assert_eq!(rows[1].forecast_demand, Some(6.0));
        assert_eq!(rows[1].rationale, "cluster 1 forecast demand 6.0");
    }

    #[test]
    fn test_csv_export_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let sink = CsvExportSink::new(dir.path());
        sink.export("plan", &[line("S1", "SKU-01", 1, 1.0)]).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_same_name_export_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let sink = CsvExportSink::new(dir.path());

        let first = sink
            .write_stem("seed_auto_1700000000000", &[line("S1", "SKU-01", 1, 1.0)])
            .unwrap();
        let second = sink
            .write_stem("seed_auto_1700000000000", &[line("S2", "SKU-02", 1, 1.0)])
            .unwrap();

        assert_eq!(first, dir.path().join("seed_auto_1700000000000.csv"));
        assert_eq!(second, dir.path().join("seed_auto_1700000000000_1.csv"));
        assert!(fs::read_to_string(&first).unwrap().contains("SKU-01"));
        assert!(fs::read_to_string(&second).unwrap().contains("SKU-02"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_empty_plan_still_has_header() {
        let dir = TempDir::new().unwrap();
        let path = CsvExportSink::new(dir.path()).export("empty", &[]).unwrap();

        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.starts_with("store_id,sku_id"));
    }

    #[test]
    fn test_rejects_path_like_identifier() {
        let dir = TempDir::new().unwrap();
        let err = CsvExportSink::new(dir.path())
            .export("../escape", &[])
            .unwrap_err();
        assert!(matches!(err, SeedForgeError::Export(_)));
    }

    #[test]
    fn test_recording_sink() {
        let sink = RecordingExportSink::new();
        let path = sink.export("a", &[line("S1", "SKU-01", 1, 1.0)]).unwrap();
        assert_eq!(path, "memory://a");
        assert_eq!(sink.call_count(), 1);
        assert_eq!(sink.exports()[0].1.len(), 1);

        let failing = RecordingExportSink::failing("boom");
        assert!(failing.export("a", &[]).is_err());
        assert_eq!(failing.call_count(), 0);
    }
}
