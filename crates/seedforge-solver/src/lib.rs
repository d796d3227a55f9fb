//! SeedForge Solver Engine
//!
//! This crate provides the planning algorithms and their orchestration:
//! - Cluster selection (k-means with silhouette-based choice of k)
//! - Greedy seed allocation under budget and per-store caps
//! - The four-stage planning pipeline (cluster → generate → validate → export)
//! - Background execution of independent pipeline runs

pub mod cluster;
pub mod manager;
pub mod pipeline;
pub mod seed;

pub use cluster::{
    select_clusters, silhouette_score, ClusterSelector, FeatureMatrix, KMeans, KMeansFit,
};
pub use manager::{PipelineHandle, PipelineJobStatus, PipelineManager};
pub use pipeline::{
    CountingPipelineListener, LoggingPipelineListener, Pipeline, PipelineFailure,
    PipelineListener, PipelineRequest, PipelineResult, PipelineState, PipelineStatus,
    StageOutput, StageTiming,
};
pub use seed::{allocate, RankedSku, SeedAllocator, SeedOutcome};
