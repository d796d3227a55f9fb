use serde::{Deserialize, Serialize};

/// Parameters of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequest {
    /// Store features to cluster on.
    pub features: Vec<String>,
    /// Cluster count; `None` selects it automatically.
    pub k: Option<usize>,
    pub budget: f64,
    pub max_skus_per_store: usize,
    /// Base name handed to the export sink.
    pub export_identifier: String,
}

impl PipelineRequest {
    pub fn new<I, S>(features: I, budget: f64, max_skus_per_store: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            features: features.into_iter().map(Into::into).collect(),
            k: None,
            budget,
            max_skus_per_store,
            export_identifier: "seed_auto".to_string(),
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    pub fn with_export_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.export_identifier = identifier.into();
        self
    }
}
