//! Result/Problem model used at every public engine boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a [`Problem`], mirroring the three buckets any
/// caller needs to decide how to react: does this mean "not found", "the
/// workflow/business rule rejected it", or "something internal broke".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemCategory {
    NotFound,
    Business,
    Technical,
}

/// Severity of a [`Problem`], independent of its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A structured, serializable failure returned from every public engine
/// operation in place of a panicking or exception-based failure path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub code: String,
    pub category: ProblemCategory,
    pub severity: Severity,
    pub message: String,
}

impl Problem {
    pub fn new(
        code: impl Into<String>,
        category: ProblemCategory,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            category,
            severity,
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, ProblemCategory::NotFound, Severity::Warning, message)
    }

    pub fn business(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, ProblemCategory::Business, Severity::Warning, message)
    }

    pub fn technical(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, ProblemCategory::Technical, Severity::Error, message)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for Problem {}

/// Stable dotted error codes. Grouped by the component that raises them so
/// the set can grow without risk of collision.
pub mod codes {
    pub const DEFINITION_NOT_FOUND: &str = "WORKFLOW.DEFINITION_NOT_FOUND";
    pub const DEFINITION_INVALID: &str = "WORKFLOW.DEFINITION_INVALID";

    pub const INSTANCE_NOT_FOUND: &str = "WORKFLOW.INSTANCE_NOT_FOUND";
    pub const STATE_NOT_FOUND: &str = "WORKFLOW.STATE_NOT_FOUND";

    pub const NO_TRANSITION: &str = "WORKFLOW.NO_TRANSITION";
    pub const ALREADY_TERMINAL: &str = "WORKFLOW.ALREADY_TERMINAL";

    pub const ACTION_EXECUTOR_NOT_REGISTERED: &str = "WORKFLOW.ACTION_EXECUTOR_NOT_REGISTERED";

    pub const HISTORY_LIMIT_EXCEEDED: &str = "WORKFLOW.HISTORY_LIMIT_EXCEEDED";
    pub const STORE_ERROR: &str = "WORKFLOW.STORE_ERROR";
}
