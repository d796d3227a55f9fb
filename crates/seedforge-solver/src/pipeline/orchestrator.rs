//! The four-stage planning pipeline.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use seedforge_config::PlannerConfig;
use seedforge_core::{
    ExportSink, ForecastLookup, PipelineStage, Result, SeedForgeError, SkuSource, StoreSource,
};
use seedforge_io::load_capacity_csv;
use seedforge_scoring::{CapacityData, ConstraintValidator, ValidationRules};

use super::{PipelineListener, PipelineRequest, PipelineState, PipelineStatus, StageOutput};
use crate::cluster::ClusterSelector;
use crate::seed::SeedAllocator;

/// A failed or cancelled run, with whatever state earlier stages produced.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct PipelineFailure {
    pub state: Box<PipelineState>,
    #[source]
    pub error: SeedForgeError,
}

impl PipelineFailure {
    /// The stage the run stopped at.
    pub fn stage(&self) -> Option<PipelineStage> {
        self.error.stage()
    }
}

/// Result of [`Pipeline::run`].
pub type PipelineResult = std::result::Result<PipelineState, PipelineFailure>;

/// Runs `CLUSTER -> GENERATE -> VALIDATE -> EXPORT` over one request.
///
/// Stages run strictly in order with no retries. A stage error aborts the
/// run and is reported with the stage name. Export only happens when
/// validation found no violations at all.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use seedforge_config::PlannerConfig;
/// use seedforge_core::{AllocationLine, ExportSink, Result, Sku, Store};
/// use seedforge_solver::{Pipeline, PipelineRequest, PipelineStatus};
///
/// struct NullSink;
///
/// impl ExportSink for NullSink {
///     fn export(&self, identifier: &str, _lines: &[AllocationLine]) -> Result<String> {
///         Ok(format!("{identifier}.csv"))
///     }
/// }
///
/// let stores: Vec<Store> = [(10.0, 1.0), (11.0, 1.2), (50.0, 9.0), (52.0, 9.1)]
///     .iter()
///     .enumerate()
///     .map(|(i, &(cap, foot))| {
///         Store::new(format!("S{}", i + 1))
///             .with_feature("capacity", cap)
///             .with_feature("footfall", foot)
///     })
///     .collect();
/// let skus = vec![Sku::new("TEE", "apparel", 10.0, 0.9)];
///
/// let request = PipelineRequest::new(["capacity", "footfall"], 100.0, 1).with_k(2);
/// let state = Pipeline::new(PlannerConfig::default(), Arc::new(NullSink))
///     .run(&stores, &skus, request)
///     .unwrap();
///
/// assert_eq!(state.status, PipelineStatus::Exported);
/// assert_eq!(state.export_path.as_deref(), Some("seed_auto.csv"));
/// ```
pub struct Pipeline {
    config: PlannerConfig,
    sink: Arc<dyn ExportSink>,
    forecast: Option<Arc<dyn ForecastLookup>>,
    capacity: Option<CapacityData>,
    listeners: Vec<Arc<dyn PipelineListener>>,
}

impl Pipeline {
    pub fn new(config: PlannerConfig, sink: Arc<dyn ExportSink>) -> Self {
        Self {
            config,
            sink,
            forecast: None,
            capacity: None,
            listeners: Vec::new(),
        }
    }

    /// Ranks and sizes lines by forecasted demand.
    pub fn with_forecast(mut self, forecast: Arc<dyn ForecastLookup>) -> Self {
        self.forecast = Some(forecast);
        self
    }

    /// Enables the fixture capacity rule with the given data.
    ///
    /// Takes precedence over `validation.capacity_csv`. A configured
    /// `max_space_per_store` still applies to stores missing from a
    /// per-store table.
    pub fn with_capacity(mut self, capacity: CapacityData) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn PipelineListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Runs every stage.
    pub fn run(
        &self,
        stores: &dyn StoreSource,
        skus: &dyn SkuSource,
        request: PipelineRequest,
    ) -> PipelineResult {
        self.run_with_cancel(stores, skus, request, &AtomicBool::new(false))
    }

    /// Runs every stage, checking `cancel` before each one.
    ///
    /// A cancelled run fails with [`SeedForgeError::Cancelled`] naming the
    /// stage that did not start. Cancellation never interrupts a stage, so
    /// the sink is either called once or not at all.
    pub fn run_with_cancel(
        &self,
        stores: &dyn StoreSource,
        skus: &dyn SkuSource,
        request: PipelineRequest,
        cancel: &AtomicBool,
    ) -> PipelineResult {
        let run_start = Instant::now();
        let mut state = PipelineState::new(request);

        info!(
            event = "pipeline_start",
            features = %state.request.features.join(","),
            k = state.request.k.unwrap_or(0) as u64,
            budget = state.request.budget,
            max_skus_per_store = state.request.max_skus_per_store as u64,
        );

        for stage in PipelineStage::ALL {
            if cancel.load(Ordering::SeqCst) {
                state.status = PipelineStatus::Cancelled(stage);
                warn!(event = "pipeline_cancelled", stage = stage.name());
                return Err(self.finish_failed(state, SeedForgeError::Cancelled { stage }));
            }

            state.status = PipelineStatus::Running(stage);
            for listener in &self.listeners {
                listener.on_stage_started(stage, &state);
            }
            info!(event = "stage_start", stage = stage.name());

            let stage_start = Instant::now();
            let output = match self.run_stage(stage, &state, stores, skus) {
                Ok(output) => output,
                Err(e) => {
                    state.status = PipelineStatus::Failed(stage);
                    warn!(event = "stage_failed", stage = stage.name(), error = %e);
                    return Err(self.finish_failed(state, e.at_stage(stage)));
                }
            };

            let duration_ms = stage_start.elapsed().as_millis() as u64;
            state.apply(output);
            state.record_timing(stage, duration_ms);
            info!(event = "stage_end", stage = stage.name(), duration_ms);
            for listener in &self.listeners {
                listener.on_stage_ended(stage, &state, duration_ms);
            }
        }

        info!(
            event = "pipeline_end",
            status = %state.status,
            line_count = state.seed.as_ref().map_or(0, |s| s.lines.len()) as u64,
            total_cost = state.total_cost(),
            export_path = state.export_path.as_deref().unwrap_or(""),
            duration_ms = run_start.elapsed().as_millis() as u64,
        );
        self.notify_finished(&state);
        Ok(state)
    }

    fn run_stage(
        &self,
        stage: PipelineStage,
        state: &PipelineState,
        stores: &dyn StoreSource,
        skus: &dyn SkuSource,
    ) -> Result<StageOutput> {
        match stage {
            PipelineStage::Cluster => self.cluster(state, stores),
            PipelineStage::Generate => self.generate(state, skus),
            PipelineStage::Validate => self.validate(state),
            PipelineStage::Export => self.export(state),
        }
    }

    fn cluster(&self, state: &PipelineState, stores: &dyn StoreSource) -> Result<StageOutput> {
        let stores = stores.load_stores()?;
        if stores.is_empty() {
            return Err(SeedForgeError::invalid_input("store source returned no stores"));
        }
        let result = ClusterSelector::new(self.config.clustering.clone()).select(
            &stores,
            &state.request.features,
            state.request.k,
        )?;
        Ok(StageOutput::Clustered(result))
    }

    fn generate(&self, state: &PipelineState, skus: &dyn SkuSource) -> Result<StageOutput> {
        let clusters = state.clusters.as_ref().ok_or_else(|| {
            SeedForgeError::invalid_input("no cluster assignment to allocate over")
        })?;
        let skus = skus.load_skus()?;
        if skus.is_empty() {
            return Err(SeedForgeError::invalid_input("sku source returned no skus"));
        }

        let outcome = SeedAllocator::new(self.config.allocation.clone()).allocate(
            &skus,
            &clusters.assignment,
            state.request.budget,
            state.request.max_skus_per_store,
            self.forecast.as_deref(),
        )?;
        Ok(StageOutput::Generated(outcome))
    }

    fn validate(&self, state: &PipelineState) -> Result<StageOutput> {
        let seed = state
            .seed
            .as_ref()
            .ok_or_else(|| SeedForgeError::invalid_input("no allocation to validate"))?;

        let report = ConstraintValidator::new(&self.rules(state)).validate(&seed.lines);
        info!(
            event = "validation_complete",
            violations = report.summary.total_violations as u64,
            critical = report.summary.critical_violations as u64,
            ok = report.ok(),
        );
        Ok(StageOutput::Validated(report))
    }

    fn export(&self, state: &PipelineState) -> Result<StageOutput> {
        let report = state
            .validation
            .as_ref()
            .ok_or_else(|| SeedForgeError::invalid_input("plan has not been validated"))?;
        if !report.ok() {
            warn!(
                event = "export_skipped",
                violations = report.summary.total_violations as u64,
            );
            return Ok(StageOutput::Exported(None));
        }

        let lines = state.seed.as_ref().map_or(&[][..], |s| s.lines.as_slice());
        let path = self.sink.export(&state.request.export_identifier, lines)?;
        Ok(StageOutput::Exported(Some(path)))
    }

    fn rules(&self, state: &PipelineState) -> ValidationRules {
        let validation = &self.config.validation;
        let rules = ValidationRules::for_request(
            state.request.budget,
            state.request.max_skus_per_store,
            validation,
        );
        match self.capacity_data() {
            Some(data) => rules.with_capacity(data, validation.space_per_unit),
            None => rules,
        }
    }

    /// Capacity from the builder, else from `validation.capacity_csv`.
    ///
    /// The table is read on every run. A table that fails to load becomes
    /// [`CapacityData::Unavailable`] so the run reports it instead of
    /// skipping the check.
    fn capacity_data(&self) -> Option<CapacityData> {
        let validation = &self.config.validation;
        match &self.capacity {
            Some(CapacityData::Available {
                per_store,
                default_max,
            }) => Some(CapacityData::Available {
                per_store: per_store.clone(),
                default_max: default_max.or(validation.max_space_per_store),
            }),
            Some(unavailable) => Some(unavailable.clone()),
            None => {
                let path = validation.capacity_csv.as_deref()?;
                Some(CapacityData::from_load(
                    load_capacity_csv(path),
                    validation.max_space_per_store,
                ))
            }
        }
    }

    fn finish_failed(&self, state: PipelineState, error: SeedForgeError) -> PipelineFailure {
        self.notify_finished(&state);
        PipelineFailure {
            state: Box::new(state),
            error,
        }
    }

    fn notify_finished(&self, state: &PipelineState) {
        for listener in &self.listeners {
            listener.on_pipeline_finished(state);
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("forecast", &self.forecast.is_some())
            .field("capacity", &self.capacity)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
