//! Pipeline state and the per-stage deltas merged into it.

use std::fmt;

use serde::{Deserialize, Serialize};

use seedforge_core::{ClusterResult, PipelineStage};
use seedforge_scoring::ValidationReport;

use super::PipelineRequest;
use crate::seed::SeedOutcome;

/// Lifecycle of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "stage", rename_all = "snake_case")]
pub enum PipelineStatus {
    Pending,
    Running(PipelineStage),
    /// All stages ran and the plan was exported.
    Exported,
    /// Validation reported violations, so export was skipped.
    NeedsReview,
    Failed(PipelineStage),
    Cancelled(PipelineStage),
}

impl PipelineStatus {
    /// True once the run can make no further progress.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PipelineStatus::Pending | PipelineStatus::Running(_))
    }

    /// True for runs that went through every stage.
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineStatus::Exported | PipelineStatus::NeedsReview)
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStatus::Pending => f.write_str("pending"),
            PipelineStatus::Running(stage) => write!(f, "running ({})", stage),
            PipelineStatus::Exported => f.write_str("exported"),
            PipelineStatus::NeedsReview => f.write_str("needs review"),
            PipelineStatus::Failed(stage) => write!(f, "failed at {}", stage),
            PipelineStatus::Cancelled(stage) => write!(f, "cancelled before {}", stage),
        }
    }
}

/// The slice of state one stage produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutput {
    Clustered(ClusterResult),
    Generated(SeedOutcome),
    Validated(ValidationReport),
    /// Path of the exported plan, `None` when export was skipped.
    Exported(Option<String>),
}

impl StageOutput {
    pub fn stage(&self) -> PipelineStage {
        match self {
            StageOutput::Clustered(_) => PipelineStage::Cluster,
            StageOutput::Generated(_) => PipelineStage::Generate,
            StageOutput::Validated(_) => PipelineStage::Validate,
            StageOutput::Exported(_) => PipelineStage::Export,
        }
    }
}

/// Wall time spent in one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTiming {
    pub stage: PipelineStage,
    pub duration_ms: u64,
}

/// Everything a run has produced so far.
///
/// Each field is written by exactly one stage. A failed run keeps whatever
/// earlier stages wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub request: PipelineRequest,
    pub clusters: Option<ClusterResult>,
    pub seed: Option<SeedOutcome>,
    pub validation: Option<ValidationReport>,
    pub export_path: Option<String>,
    pub status: PipelineStatus,
    pub completed: Vec<PipelineStage>,
    pub timings: Vec<StageTiming>,
}

impl PipelineState {
    pub fn new(request: PipelineRequest) -> Self {
        Self {
            request,
            clusters: None,
            seed: None,
            validation: None,
            export_path: None,
            status: PipelineStatus::Pending,
            completed: Vec::new(),
            timings: Vec::new(),
        }
    }

    /// Merges a stage's output and marks that stage completed.
    pub fn apply(&mut self, output: StageOutput) {
        let stage = output.stage();
        match output {
            StageOutput::Clustered(result) => self.clusters = Some(result),
            StageOutput::Generated(outcome) => self.seed = Some(outcome),
            StageOutput::Validated(report) => self.validation = Some(report),
            StageOutput::Exported(path) => {
                self.status = if path.is_some() {
                    PipelineStatus::Exported
                } else {
                    PipelineStatus::NeedsReview
                };
                self.export_path = path;
            }
        }
        self.completed.push(stage);
    }

    pub fn is_completed(&self, stage: PipelineStage) -> bool {
        self.completed.contains(&stage)
    }

    /// Total cost of the generated plan, zero before generation.
    pub fn total_cost(&self) -> f64 {
        self.seed.as_ref().map_or(0.0, SeedOutcome::total_cost)
    }

    pub(crate) fn record_timing(&mut self, stage: PipelineStage, duration_ms: u64) {
        self.timings.push(StageTiming { stage, duration_ms });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_delta_sets_status() {
        let mut state = PipelineState::new(PipelineRequest::new(["capacity"], 10.0, 1));
        state.apply(StageOutput::Exported(None));
        assert_eq!(state.status, PipelineStatus::NeedsReview);
        assert!(state.status.is_success());

        let mut state = PipelineState::new(PipelineRequest::new(["capacity"], 10.0, 1));
        state.apply(StageOutput::Exported(Some("out/plan.csv".into())));
        assert_eq!(state.status, PipelineStatus::Exported);
        assert_eq!(state.export_path.as_deref(), Some("out/plan.csv"));
        assert_eq!(state.completed, vec![PipelineStage::Export]);
    }

    #[test]
    fn test_status_display_and_json() {
        let status = PipelineStatus::Failed(PipelineStage::Generate);
        assert_eq!(status.to_string(), "failed at generate");
        assert!(status.is_terminal());
        assert!(!PipelineStatus::Running(PipelineStage::Cluster).is_terminal());

        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"status":"failed","stage":"generate"}"#);
    }
}
