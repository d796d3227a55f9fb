//! Error types for SeedForge

use thiserror::Error;

use crate::stage::PipelineStage;

/// Main error type for SeedForge operations
#[derive(Debug, Error)]
pub enum SeedForgeError {
    /// Malformed or missing required fields, empty datasets, out-of-range parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Optional auxiliary data (e.g. a capacity table) could not be loaded
    #[error("Constraint data unavailable: {0}")]
    ConstraintData(String),

    /// A pipeline stage failed; the remaining stages were not run
    #[error("Pipeline stage '{stage}' failed: {source}")]
    PipelineStage {
        stage: PipelineStage,
        #[source]
        source: Box<SeedForgeError>,
    },

    /// The pipeline was cancelled before the given stage started
    #[error("Pipeline cancelled before stage '{stage}'")]
    Cancelled { stage: PipelineStage },

    /// The export sink failed to publish the plan
    #[error("Export error: {0}")]
    Export(String),

    /// The plan repository failed
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SeedForgeError {
    /// Shorthand for [`SeedForgeError::InvalidInput`].
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        SeedForgeError::InvalidInput(msg.into())
    }

    /// Wraps this error as the failure of `stage`.
    ///
    /// Errors that already name a stage are returned unchanged.
    pub fn at_stage(self, stage: PipelineStage) -> Self {
        match self {
            e @ SeedForgeError::PipelineStage { .. } => e,
            e @ SeedForgeError::Cancelled { .. } => e,
            other => SeedForgeError::PipelineStage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Returns the stage this error is attributed to, if any.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            SeedForgeError::PipelineStage { stage, .. } => Some(*stage),
            SeedForgeError::Cancelled { stage } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type alias for SeedForge operations
pub type Result<T> = std::result::Result<T, SeedForgeError>;
