//! Published plans returned by a plan repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::AllocationLine;

/// Lifecycle status of a stored plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Published,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Published => "published",
        }
    }
}

/// A plan accepted by a [`PlanRepository`](crate::PlanRepository).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedPlan {
    pub plan_id: String,
    pub name: String,
    pub version: u32,
    pub status: PlanStatus,
    pub lines: Vec<AllocationLine>,
    pub published_at: DateTime<Utc>,
}
