//! Constraint validation for SeedForge allocation plans.
//!
//! This crate checks a finished allocation against business rules:
//! - Budget: total line cost must stay within the budget
//! - SKU count: distinct SKUs per store within `[min, max]`
//! - Fixture capacity: space consumed per store within its capacity
//!
//! Each rule produces typed [`Violation`](seedforge_core::Violation)s with a
//! severity and a remediation suggestion. A rule that is not configured is
//! skipped, never failed.
//!
//! # Example
//!
//! ```
//! use seedforge_core::AllocationLine;
//! use seedforge_scoring::{ConstraintValidator, ValidationRules};
//!
//! let lines = vec![
//!     AllocationLine::new("S1", "SKU-1", 1, 60.0, 0),
//!     AllocationLine::new("S1", "SKU-2", 1, 60.0, 0),
//! ];
//! let rules = ValidationRules::new().with_budget(100.0).with_max_skus_per_store(5);
//!
//! let report = ConstraintValidator::new(&rules).validate(&lines);
//! assert!(!report.ok());
//! assert!(!report.is_valid());
//! assert_eq!(report.violations[0].suggestion, "Reduce allocation by $20.00");
//! ```

mod report;
pub mod rule;
mod rules;
mod usage;
mod validator;

pub use report::{ValidationReport, ValidationSummary};
pub use rule::{BudgetRule, CapacityRule, Rule, SkuCountRule};
pub use rules::{CapacityData, CapacitySettings, ValidationRules};
pub use usage::{store_usage, StoreUsage};
pub use validator::{validate, ConstraintValidator};

#[cfg(test)]
mod tests;
