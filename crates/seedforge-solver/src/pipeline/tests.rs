use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use seedforge_config::PlannerConfig;
use seedforge_core::{
    Forecast, ForecastTable, PipelineStage, SeedForgeError, Sku, Store, ViolationKind,
};
use seedforge_io::RecordingExportSink;
use seedforge_scoring::CapacityData;
use seedforge_test::{priced_catalog, sample_features, sample_stores};

use super::*;

fn pipeline(sink: &Arc<RecordingExportSink>) -> Pipeline {
    Pipeline::new(PlannerConfig::default(), sink.clone())
}

fn request(budget: f64, cap: usize) -> PipelineRequest {
    PipelineRequest::new(sample_features(), budget, cap)
}

#[test]
fn test_full_run_exports_valid_plan() {
    let sink = Arc::new(RecordingExportSink::new());
    let state = pipeline(&sink)
        .run(&sample_stores(), &priced_catalog(20), request(1000.0, 5))
        .unwrap();

    let clusters = state.clusters.as_ref().unwrap();
    assert!(clusters.k > 1 && clusters.k < 8);

    let seed = state.seed.as_ref().unwrap();
    assert!(!seed.lines.is_empty());
    assert!(seed.total_cost() <= 1000.0);
    assert!(seed.skus_per_store().values().all(|&n| n <= 5));

    assert!(state.validation.as_ref().unwrap().ok());
    assert_eq!(state.status, PipelineStatus::Exported);
    assert_eq!(state.completed, PipelineStage::ALL.to_vec());
    assert_eq!(state.timings.len(), 4);

    assert_eq!(sink.call_count(), 1);
    let (identifier, lines) = &sink.exports()[0];
    assert_eq!(identifier, "seed_auto");
    assert_eq!(lines, &seed.lines);
    assert_eq!(state.export_path, Some(sink.path_for(identifier)));
}

#[test]
fn test_zero_budget_gives_empty_plan() {
    let sink = Arc::new(RecordingExportSink::new());
    let state = pipeline(&sink)
        .run(&sample_stores(), &priced_catalog(20), request(0.0, 5))
        .unwrap();

    let seed = state.seed.as_ref().unwrap();
    assert!(seed.lines.is_empty());
    assert_eq!(seed.budget_left, 0.0);
}

#[test]
fn test_violations_skip_export() {
    let sink = Arc::new(RecordingExportSink::new());
    let config = PlannerConfig::default().with_min_skus_per_store(3);

    let state = Pipeline::new(config, sink.clone())
        .run(&sample_stores(), &priced_catalog(20), request(100.0, 5))
        .unwrap();

    let report = state.validation.as_ref().unwrap();
    assert!(!report.ok());
    assert!(report.is_valid());
    assert!(report
        .of_kind(ViolationKind::SkuMinimumNotMet)
        .next()
        .is_some());

    assert_eq!(state.status, PipelineStatus::NeedsReview);
    assert_eq!(state.export_path, None);
    assert!(state.is_completed(PipelineStage::Export));
    assert_eq!(sink.call_count(), 0);
}

#[test]
fn test_unavailable_capacity_needs_review() {
    let sink = Arc::new(RecordingExportSink::new());
    let state = pipeline(&sink)
        .with_capacity(CapacityData::Unavailable("capacity.csv not found".into()))
        .run(&sample_stores(), &priced_catalog(20), request(1000.0, 5))
        .unwrap();

    let report = state.validation.as_ref().unwrap();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(
        report.violations[0].kind,
        ViolationKind::CapacityDataUnavailable
    );
    assert_eq!(state.status, PipelineStatus::NeedsReview);
    assert_eq!(sink.call_count(), 0);
}

#[test]
fn test_unreadable_configured_capacity_needs_review() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = PlannerConfig::default().with_capacity_csv(dir.path().join("capacity.csv"));

    let sink = Arc::new(RecordingExportSink::new());
    let state = Pipeline::new(config, sink.clone())
        .run(&sample_stores(), &priced_catalog(20), request(1000.0, 5))
        .unwrap();

    let report = state.validation.as_ref().unwrap();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(
        report.violations[0].kind,
        ViolationKind::CapacityDataUnavailable
    );
    assert_eq!(state.status, PipelineStatus::NeedsReview);
    assert_eq!(sink.call_count(), 0);
}

#[test]
fn test_configured_capacity_table_is_checked() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("capacity.csv");
    std::fs::write(&path, "store_id,capacity\nS1,0.2\n").unwrap();
    let config = PlannerConfig::default().with_capacity_csv(&path);

    let sink = Arc::new(RecordingExportSink::new());
    let state = Pipeline::new(config, sink.clone())
        .run(&sample_stores(), &priced_catalog(20), request(1000.0, 5))
        .unwrap();

    let report = state.validation.as_ref().unwrap();
    let over: Vec<_> = report
        .of_kind(ViolationKind::FixtureCapacityExceeded)
        .collect();
    assert_eq!(over.len(), 1);
    assert!(over[0].message.starts_with("Store S1 "), "{}", over[0].message);
    assert_eq!(state.status, PipelineStatus::NeedsReview);
    assert_eq!(sink.call_count(), 0);
}

#[test]
fn test_explicit_capacity_overrides_configured_table() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = PlannerConfig::default().with_capacity_csv(dir.path().join("missing.csv"));

    let sink = Arc::new(RecordingExportSink::new());
    let state = Pipeline::new(config, sink.clone())
        .with_capacity(CapacityData::uniform(100.0))
        .run(&sample_stores(), &priced_catalog(20), request(1000.0, 5))
        .unwrap();

    assert!(state.validation.as_ref().unwrap().ok());
    assert_eq!(state.status, PipelineStatus::Exported);
    assert_eq!(sink.call_count(), 1);
}

#[test]
fn test_cluster_failure_names_stage() {
    let mut stores = sample_stores();
    stores.push(Store::new("S9").with_feature("capacity", 90.0));

    let sink = Arc::new(RecordingExportSink::new());
    let failure = pipeline(&sink)
        .run(&stores, &priced_catalog(20), request(1000.0, 5))
        .unwrap_err();

    assert_eq!(failure.stage(), Some(PipelineStage::Cluster));
    assert!(matches!(
        failure.error,
        SeedForgeError::PipelineStage {
            stage: PipelineStage::Cluster,
            ..
        }
    ));
    assert!(failure.to_string().contains("S9"));
    assert_eq!(failure.state.status, PipelineStatus::Failed(PipelineStage::Cluster));
    assert!(failure.state.completed.is_empty());
    assert_eq!(sink.call_count(), 0);
}

#[test]
fn test_generate_failure_keeps_clusters() {
    let sink = Arc::new(RecordingExportSink::new());
    let no_skus: Vec<Sku> = Vec::new();
    let failure = pipeline(&sink)
        .run(&sample_stores(), &no_skus, request(1000.0, 5))
        .unwrap_err();

    assert_eq!(failure.stage(), Some(PipelineStage::Generate));
    assert!(failure.state.clusters.is_some());
    assert!(failure.state.seed.is_none());
    assert_eq!(failure.state.completed, vec![PipelineStage::Cluster]);
}

#[test]
fn test_sink_failure_fails_export_stage() {
    let sink = Arc::new(RecordingExportSink::failing("disk full"));
    let failure = pipeline(&sink)
        .run(&sample_stores(), &priced_catalog(20), request(1000.0, 5))
        .unwrap_err();

    assert_eq!(failure.stage(), Some(PipelineStage::Export));
    assert!(failure.to_string().contains("disk full"));
    assert!(failure.state.validation.is_some());
    assert_eq!(failure.state.export_path, None);
}

#[test]
fn test_cancelled_before_start() {
    let sink = Arc::new(RecordingExportSink::new());
    let cancel = AtomicBool::new(true);
    let failure = pipeline(&sink)
        .run_with_cancel(&sample_stores(), &priced_catalog(20), request(1000.0, 5), &cancel)
        .unwrap_err();

    assert!(matches!(
        failure.error,
        SeedForgeError::Cancelled {
            stage: PipelineStage::Cluster
        }
    ));
    assert_eq!(failure.state.status, PipelineStatus::Cancelled(PipelineStage::Cluster));
    assert_eq!(sink.call_count(), 0);
}

#[derive(Debug)]
struct CancelAfter {
    stage: PipelineStage,
    flag: Arc<AtomicBool>,
}

impl PipelineListener for CancelAfter {
    fn on_stage_ended(&self, stage: PipelineStage, _state: &PipelineState, _duration_ms: u64) {
        if stage == self.stage {
            self.flag.store(true, Ordering::SeqCst);
        }
    }
}

#[test]
fn test_cancelled_before_export_never_reaches_sink() {
    let sink = Arc::new(RecordingExportSink::new());
    let flag = Arc::new(AtomicBool::new(false));
    let failure = pipeline(&sink)
        .with_listener(Arc::new(CancelAfter {
            stage: PipelineStage::Validate,
            flag: flag.clone(),
        }))
        .run_with_cancel(&sample_stores(), &priced_catalog(20), request(1000.0, 5), &flag)
        .unwrap_err();

    assert_eq!(failure.stage(), Some(PipelineStage::Export));
    assert!(failure.state.validation.as_ref().unwrap().ok());
    assert_eq!(sink.call_count(), 0);
}

#[test]
fn test_listener_sees_every_stage() {
    let sink = Arc::new(RecordingExportSink::new());
    let counter = Arc::new(CountingPipelineListener::new());
    pipeline(&sink)
        .with_listener(counter.clone())
        .with_listener(Arc::new(LoggingPipelineListener::with_prefix("test ")))
        .run(&sample_stores(), &priced_catalog(20), request(1000.0, 5))
        .unwrap();

    assert_eq!(counter.stage_started_count(), 4);
    assert_eq!(counter.stage_ended_count(), 4);
    assert_eq!(counter.finished_count(), 1);
}

#[test]
fn test_listener_notified_on_failure() {
    let sink = Arc::new(RecordingExportSink::new());
    let counter = Arc::new(CountingPipelineListener::new());
    let no_skus: Vec<Sku> = Vec::new();
    let _ = pipeline(&sink)
        .with_listener(counter.clone())
        .run(&sample_stores(), &no_skus, request(1000.0, 5));

    assert_eq!(counter.stage_started_count(), 2);
    assert_eq!(counter.stage_ended_count(), 1);
    assert_eq!(counter.finished_count(), 1);
}

#[test]
fn test_runs_are_deterministic() {
    let sink = Arc::new(RecordingExportSink::new());
    let p = pipeline(&sink);
    let a = p
        .run(&sample_stores(), &priced_catalog(20), request(1000.0, 5))
        .unwrap();
    let b = p
        .run(&sample_stores(), &priced_catalog(20), request(1000.0, 5))
        .unwrap();

    assert_eq!(a.clusters, b.clusters);
    assert_eq!(a.seed, b.seed);
    assert_eq!(a.validation, b.validation);
}

#[test]
fn test_forecast_flows_into_lines() {
    let sink = Arc::new(RecordingExportSink::new());
    let table = ForecastTable::new().with("SKU-01", Forecast::new(6.0, 0.8));
    let state = pipeline(&sink)
        .with_forecast(Arc::new(table))
        .run(
            &sample_stores(),
            &priced_catalog(20),
            request(1000.0, 5).with_k(3),
        )
        .unwrap();

    let first = &state.seed.as_ref().unwrap().lines[0];
    assert_eq!(first.sku_id, "SKU-01");
    assert_eq!(first.quantity, 3);
    assert_eq!(first.confidence, Some(0.8));
    assert_eq!(state.clusters.as_ref().unwrap().k, 3);
}
