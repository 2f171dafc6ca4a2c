//! # Saga Workflow Engine
//!
//! A finite-state-machine workflow runtime with first-class support for the
//! Saga compensation pattern.
//!
//! Given a declarative [`WorkflowDefinition`] (states, transitions, actions
//! and compensations), the engine creates instances, advances them on
//! external events, executes user-supplied actions at each state, and — if
//! an action fails or the instance enters a FAIL state — runs compensation
//! actions in reverse execution order to undo prior side effects.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Engine                               │
//! │  (drives the state machine, runs actions, walks compensation)│
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      InstanceStore                           │
//! │  (in-memory by default; pluggable for durable backends)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use saga_workflow_engine::prelude::*;
//!
//! let engine = Engine::new();
//! engine
//!     .register_definition(
//!         WorkflowDefinition::builder("order")
//!             .state(State::task("reserve").with_action("reserve_inventory"))
//!             .state(State::end("done"))
//!             .transition(Transition::new("reserve", "reserved", "done"))
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//! engine
//!     .register_action_executor(
//!         "reserve_inventory",
//!         FnActionExecutor(|_id, _state, ctx: &Context| Ok(ctx.clone())),
//!     )
//!     .unwrap();
//!
//! let instance = engine.start_workflow("order", Context::new()).unwrap();
//! let instance = engine.send_event(instance.id, "reserved", Context::new()).unwrap();
//! assert_eq!(instance.status, InstanceStatus::Succeeded);
//! ```

pub mod definition;
pub mod engine;
pub mod events;
pub mod executors;
pub mod instance;
pub mod problem;
pub mod support;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::definition::{DefinitionError, State, StateKind, Transition, WorkflowDefinition};
    pub use crate::engine::{Engine, EngineConfig, InMemoryInstanceStore, InstanceStore, StoreError};
    pub use crate::events::{EngineEvent, EventSink, NoopEventSink, TracingEventSink};
    pub use crate::executors::{
        ActionExecutor, ActionRegistry, ConditionEvaluator, DefaultConditionEvaluator,
        FnActionExecutor,
    };
    pub use crate::instance::{Context, InstanceStatus, WorkflowInstance};
    pub use crate::problem::{codes, Problem, ProblemCategory, Severity};
    pub use crate::support::{Clock, IdGenerator, SystemClock, UuidGenerator};
}

pub use definition::{DefinitionError, State, StateKind, Transition, WorkflowDefinition};
pub use engine::{Engine, EngineConfig, InMemoryInstanceStore, InstanceStore, StoreError};
pub use events::{EngineEvent, EventSink, NoopEventSink, TracingEventSink};
pub use executors::{
    ActionExecutor, ActionRegistry, ConditionEvaluator, DefaultConditionEvaluator,
    FnActionExecutor,
};
pub use instance::{Context, InstanceStatus, WorkflowInstance};
pub use problem::{codes, Problem, ProblemCategory, Severity};
pub use support::{Clock, IdGenerator, SystemClock, UuidGenerator};
