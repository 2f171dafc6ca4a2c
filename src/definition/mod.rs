//! Workflow definition model: states, transitions and the validating
//! builder that assembles them into a [`WorkflowDefinition`].

mod state;
mod transition;
mod workflow_definition;

pub use state::{State, StateKind};
pub use transition::Transition;
pub use workflow_definition::{DefinitionError, WorkflowDefinition, WorkflowDefinitionBuilder};
