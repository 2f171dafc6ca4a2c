//! Transition entity.

use serde::{Deserialize, Serialize};

/// An edge from one state to another, taken when `event` matches the event
/// name sent to [`crate::engine::Engine::send_event`] and `condition`
/// evaluates to true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub event: String,
    pub to: String,
    /// Opaque condition string handed to the registered
    /// [`crate::executors::ConditionEvaluator`]. `None`/empty always matches.
    pub condition: Option<String>,
}

impl Transition {
    pub fn new(from: impl Into<String>, event: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            event: event.into(),
            to: to.into(),
            condition: None,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}
