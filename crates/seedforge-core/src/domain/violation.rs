//! Business-rule violations reported by the constraint validator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a violation is.
///
/// Critical violations block auto-approval; warnings are informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => f.write_str("critical"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// The business rule a violation breaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    BudgetExceeded,
    SkuLimitExceeded,
    SkuMinimumNotMet,
    FixtureCapacityExceeded,
    CapacityDataUnavailable,
}

impl ViolationKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::BudgetExceeded => "budget_exceeded",
            ViolationKind::SkuLimitExceeded => "sku_limit_exceeded",
            ViolationKind::SkuMinimumNotMet => "sku_minimum_not_met",
            ViolationKind::FixtureCapacityExceeded => "fixture_capacity_exceeded",
            ViolationKind::CapacityDataUnavailable => "capacity_data_unavailable",
        }
    }

    /// Whether this kind belongs to the per-store SKU count rule.
    pub fn is_sku_count(&self) -> bool {
        matches!(
            self,
            ViolationKind::SkuLimitExceeded | ViolationKind::SkuMinimumNotMet
        )
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A detected breach of a business rule with a remediation hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
    pub severity: Severity,
    pub suggestion: String,
}

impl Violation {
    pub fn critical(
        kind: ViolationKind,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            severity: Severity::Critical,
            suggestion: suggestion.into(),
        }
    }

    pub fn warning(
        kind: ViolationKind,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            severity: Severity::Warning,
            suggestion: suggestion.into(),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}
