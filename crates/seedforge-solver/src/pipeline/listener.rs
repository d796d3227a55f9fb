//! Hooks for observing pipeline runs.

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use seedforge_core::PipelineStage;

use super::PipelineState;

/// Receives pipeline lifecycle events.
///
/// Listeners are called synchronously on the pipeline's thread, in
/// registration order.
pub trait PipelineListener: Send + Sync + Debug {
    /// Called before a stage runs.
    fn on_stage_started(&self, _stage: PipelineStage, _state: &PipelineState) {}

    /// Called after a stage's output has been merged.
    fn on_stage_ended(&self, _stage: PipelineStage, _state: &PipelineState, _duration_ms: u64) {}

    /// Called once per run, whatever the outcome.
    fn on_pipeline_finished(&self, _state: &PipelineState) {}
}

/// Logs every event at INFO with a prefix.
#[derive(Debug, Clone, Default)]
pub struct LoggingPipelineListener {
    prefix: String,
}

impl LoggingPipelineListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl PipelineListener for LoggingPipelineListener {
    fn on_stage_started(&self, stage: PipelineStage, _state: &PipelineState) {
        info!("{}[Pipeline] Stage {} started", self.prefix, stage);
    }

    fn on_stage_ended(&self, stage: PipelineStage, _state: &PipelineState, duration_ms: u64) {
        info!("{}[Pipeline] Stage {} ended in {}ms", self.prefix, stage, duration_ms);
    }

    fn on_pipeline_finished(&self, state: &PipelineState) {
        info!("{}[Pipeline] Finished: {}", self.prefix, state.status);
    }
}

/// Counts events; useful in tests.
#[derive(Debug, Default)]
pub struct CountingPipelineListener {
    stage_started_count: AtomicUsize,
    stage_ended_count: AtomicUsize,
    finished_count: AtomicUsize,
}

impl CountingPipelineListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage_started_count(&self) -> usize {
        self.stage_started_count.load(Ordering::SeqCst)
    }

    pub fn stage_ended_count(&self) -> usize {
        self.stage_ended_count.load(Ordering::SeqCst)
    }

    pub fn finished_count(&self) -> usize {
        self.finished_count.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.stage_started_count.store(0, Ordering::SeqCst);
        self.stage_ended_count.store(0, Ordering::SeqCst);
        self.finished_count.store(0, Ordering::SeqCst);
    }
}

impl PipelineListener for CountingPipelineListener {
    fn on_stage_started(&self, _stage: PipelineStage, _state: &PipelineState) {
        self.stage_started_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_stage_ended(&self, _stage: PipelineStage, _state: &PipelineState, _duration_ms: u64) {
        self.stage_ended_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_pipeline_finished(&self, _state: &PipelineState) {
        self.finished_count.fetch_add(1, Ordering::SeqCst);
    }
}
