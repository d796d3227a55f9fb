//! Pipeline orchestration.
//!
//! A run is a fixed sequence of stages. Each stage reads the state written
//! by earlier stages and returns a [`StageOutput`] that the orchestrator
//! merges into [`PipelineState`].

mod listener;
mod orchestrator;
mod request;
mod state;

pub use listener::{CountingPipelineListener, LoggingPipelineListener, PipelineListener};
pub use orchestrator::{Pipeline, PipelineFailure, PipelineResult};
pub use request::PipelineRequest;
pub use state::{PipelineState, PipelineStatus, StageOutput, StageTiming};

#[cfg(test)]
mod tests;
