//! Pipeline stage identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four stages of the seed planning pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Cluster,
    Generate,
    Validate,
    Export,
}

impl PipelineStage {
    /// All stages in execution order.
    pub const ALL: [PipelineStage; 4] = [
        PipelineStage::Cluster,
        PipelineStage::Generate,
        PipelineStage::Validate,
        PipelineStage::Export,
    ];

    /// Returns the stage name as used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Cluster => "cluster",
            PipelineStage::Generate => "generate",
            PipelineStage::Validate => "validate",
            PipelineStage::Export => "export",
        }
    }

    /// Returns the stage that follows this one, or `None` for the terminal stage.
    pub fn next(&self) -> Option<PipelineStage> {
        match self {
            PipelineStage::Cluster => Some(PipelineStage::Generate),
            PipelineStage::Generate => Some(PipelineStage::Validate),
            PipelineStage::Validate => Some(PipelineStage::Export),
            PipelineStage::Export => None,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_chain_is_linear() {
        let mut stage = PipelineStage::Cluster;
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            visited.push(next);
            stage = next;
        }
        assert_eq!(visited, PipelineStage::ALL.to_vec());
    }
}
