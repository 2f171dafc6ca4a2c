//! Instance status.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a [`super::WorkflowInstance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    /// Created but not yet handed to the interpreter. The in-process engine
    /// never produces this status itself (instances run their initial state
    /// synchronously on creation) but it is part of the documented status
    /// set for stores that queue instances before dispatch.
    Pending,
    Running,
    Succeeded,
    Failed,
    Compensating,
    Compensated,
    TimedOut,
}

impl InstanceStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            InstanceStatus::Succeeded
                | InstanceStatus::Failed
                | InstanceStatus::Compensated
                | InstanceStatus::TimedOut
        )
    }

    /// True for a status that represents work actively in flight — i.e. one
    /// the engine can still transition out of on its own, as opposed to one
    /// that is either not yet started or already settled.
    pub fn is_active(self) -> bool {
        matches!(self, InstanceStatus::Running | InstanceStatus::Compensating)
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InstanceStatus::Pending => "PENDING",
            InstanceStatus::Running => "RUNNING",
            InstanceStatus::Succeeded => "SUCCEEDED",
            InstanceStatus::Failed => "FAILED",
            InstanceStatus::Compensating => "COMPENSATING",
            InstanceStatus::Compensated => "COMPENSATED",
            InstanceStatus::TimedOut => "TIMED_OUT",
        };
        write!(f, "{s}")
    }
}
