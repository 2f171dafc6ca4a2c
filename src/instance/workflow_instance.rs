//! Workflow instance entity: the mutable runtime state tracked per running
//! (or completed) workflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::status::InstanceStatus;

/// Free-form key/value bag threaded through a workflow's lifetime. Reuses
/// `serde_json::Value` as the tagged variant type rather than hand-rolling
/// one, since every action executor already speaks JSON at its boundary.
pub type Context = Map<String, Value>;

/// One entry in an instance's execution history: a state that was actually
/// entered, in the order it was entered. The compensation walk iterates
/// this list in reverse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub state: String,
    pub entered_at: DateTime<Utc>,
}

/// A running (or completed) instance of a [`crate::definition::WorkflowDefinition`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowInstance {
    pub id: Uuid,
    pub workflow_type: String,
    pub current_state: String,
    pub status: InstanceStatus,
    pub context: Context,
    pub history: Vec<HistoryEntry>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set the moment the instance first enters a terminal status. `None`
    /// while the instance is still active.
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkflowInstance {
    pub fn new(
        id: Uuid,
        workflow_type: impl Into<String>,
        initial_state: impl Into<String>,
        context: Context,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            workflow_type: workflow_type.into(),
            current_state: initial_state.into(),
            status: InstanceStatus::Running,
            context,
            history: Vec::new(),
            failure_reason: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// States that were actually entered, in the order the compensation
    /// walk must undo them (most-recently-entered first).
    pub fn compensable_states_reverse(&self) -> impl Iterator<Item = &str> {
        self.history.iter().rev().map(|h| h.state.as_str())
    }
}

/// Merges `incoming` into `base` using last-write-wins semantics: keys
/// present in `incoming` overwrite `base`, keys absent from `incoming` are
/// left untouched.
pub fn merge_context(base: &mut Context, incoming: Context) {
    for (k, v) in incoming {
        base.insert(k, v);
    }
}
