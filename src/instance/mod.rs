//! Workflow instance model: runtime state for a single execution of a
//! workflow definition.

mod status;
mod workflow_instance;

pub use status::InstanceStatus;
pub use workflow_instance::{merge_context, Context, HistoryEntry, WorkflowInstance};
