//! State entity.

use serde::{Deserialize, Serialize};

/// The kind of a [`State`], determining how the interpreter treats it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateKind {
    /// The designated entry point of a definition. Declarable for shape
    /// parity with the source state machine; the interpreter runs it
    /// exactly like `Task` (action, then wait for a matching transition).
    Start,
    /// An ordinary state: runs its action (if any), then waits for an event
    /// unless a transition with an empty/matching condition fires immediately.
    Task,
    /// A branch point. Declarable so workflow authors can model branching
    /// shapes; the interpreter runs it exactly like `Task` — branching is
    /// expressed by the transitions leaving the state, not by this kind.
    Choice,
    /// A fan-out/fan-in point. Declarable for the same reason as `Choice`;
    /// the interpreter runs it exactly like `Task` with no concurrent
    /// execution of its own.
    Parallel,
    /// Terminal success state. No action, no further transitions.
    End,
    /// Terminal failure state. Triggers the compensation walk over every
    /// previously-visited compensable state, in reverse order.
    Fail,
}

/// A single state in a [`super::WorkflowDefinition`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    pub kind: StateKind,
    /// Name of the action executor to invoke on entry, looked up in the
    /// engine's action registry. `None` means "no action, just transitions".
    pub action: Option<String>,
    /// Name of the compensation executor to invoke (in reverse order) if a
    /// later state fails. `None` means this state has nothing to undo.
    pub compensation: Option<String>,
}

impl State {
    pub fn start(name: impl Into<String>) -> Self {
        Self::of_kind(name, StateKind::Start)
    }

    pub fn task(name: impl Into<String>) -> Self {
        Self::of_kind(name, StateKind::Task)
    }

    pub fn choice(name: impl Into<String>) -> Self {
        Self::of_kind(name, StateKind::Choice)
    }

    pub fn parallel(name: impl Into<String>) -> Self {
        Self::of_kind(name, StateKind::Parallel)
    }

    pub fn end(name: impl Into<String>) -> Self {
        Self::of_kind(name, StateKind::End)
    }

    pub fn fail(name: impl Into<String>) -> Self {
        Self::of_kind(name, StateKind::Fail)
    }

    fn of_kind(name: impl Into<String>, kind: StateKind) -> Self {
        Self {
            name: name.into(),
            kind,
            action: None,
            compensation: None,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_compensation(mut self, compensation: impl Into<String>) -> Self {
        self.compensation = Some(compensation.into());
        self
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, StateKind::End | StateKind::Fail)
    }
}
