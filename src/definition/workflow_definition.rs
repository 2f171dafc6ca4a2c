//! Workflow definition entity and its validating builder.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::state::State;
use super::transition::Transition;

/// Errors raised while building a [`WorkflowDefinition`]. These never reach
/// a caller of the engine's public operations directly; the engine wraps
/// them into a [`crate::problem::Problem`] at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("workflow definition must declare at least one state")]
    NoStates,

    #[error("duplicate state name: {0}")]
    DuplicateState(String),

    #[error("initial state {0:?} is not declared among this definition's states")]
    UnknownInitialState(String),

    #[error("transition {0:?} -> {1:?} references an unknown state")]
    UnknownTransitionEndpoint(String, String),

    #[error("workflow type must not be empty")]
    EmptyWorkflowType,
}

/// A complete, validated workflow definition: a named set of states and
/// transitions plus a designated initial state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub workflow_type: String,
    pub initial_state: String,
    pub states: Vec<State>,
    pub transitions: Vec<Transition>,
}

impl WorkflowDefinition {
    pub fn builder(workflow_type: impl Into<String>) -> WorkflowDefinitionBuilder {
        WorkflowDefinitionBuilder::new(workflow_type)
    }

    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|s| s.name == name)
    }

    /// Transitions declared with `from == name`, in declaration order. The
    /// interpreter picks the first whose event matches and whose condition
    /// evaluates true; overlapping `(from, event)` pairs are not rejected at
    /// build time, matching the documented source behavior.
    pub fn transitions_from<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Transition> {
        self.transitions.iter().filter(move |t| t.from == name)
    }
}

/// Builder that accumulates states and transitions and validates the result
/// on [`WorkflowDefinitionBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct WorkflowDefinitionBuilder {
    workflow_type: String,
    initial_state: Option<String>,
    states: Vec<State>,
    transitions: Vec<Transition>,
}

impl WorkflowDefinitionBuilder {
    pub fn new(workflow_type: impl Into<String>) -> Self {
        Self {
            workflow_type: workflow_type.into(),
            initial_state: None,
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn initial_state(mut self, name: impl Into<String>) -> Self {
        self.initial_state = Some(name.into());
        self
    }

    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn build(self) -> Result<WorkflowDefinition, DefinitionError> {
        if self.workflow_type.trim().is_empty() {
            return Err(DefinitionError::EmptyWorkflowType);
        }
        if self.states.is_empty() {
            return Err(DefinitionError::NoStates);
        }

        let mut seen = HashSet::new();
        for s in &self.states {
            if !seen.insert(s.name.clone()) {
                return Err(DefinitionError::DuplicateState(s.name.clone()));
            }
        }

        let initial_state = self
            .initial_state
            .unwrap_or_else(|| self.states[0].name.clone());
        if !seen.contains(&initial_state) {
            return Err(DefinitionError::UnknownInitialState(initial_state));
        }

        let known: HashMap<&str, &State> = self.states.iter().map(|s| (s.name.as_str(), s)).collect();
        for t in &self.transitions {
            if !known.contains_key(t.from.as_str()) {
                return Err(DefinitionError::UnknownTransitionEndpoint(
                    t.from.clone(),
                    t.to.clone(),
                ));
            }
            if !known.contains_key(t.to.as_str()) {
                return Err(DefinitionError::UnknownTransitionEndpoint(
                    t.from.clone(),
                    t.to.clone(),
                ));
            }
        }

        Ok(WorkflowDefinition {
            workflow_type: self.workflow_type,
            initial_state,
            states: self.states,
            transitions: self.transitions,
        })
    }
}
