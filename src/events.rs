//! Observational event sink.
//!
//! Purely a side channel for observability: nothing in the interpreter's
//! control flow depends on whether a sink is attached or what it does with
//! the events it receives.

use uuid::Uuid;

/// A notable occurrence during an instance's execution, handed to whatever
/// [`EventSink`] the engine is configured with.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    StateEntered { instance_id: Uuid, state: String },
    ActionInvoked { instance_id: Uuid, state: String, action: String },
    ActionFailed { instance_id: Uuid, state: String, action: String, reason: String },
    CompensationStep { instance_id: Uuid, state: String, compensation: String },
    CompensationStepFailed { instance_id: Uuid, state: String, compensation: String, reason: String },
    TerminalTransition { instance_id: Uuid, state: String, status: crate::instance::InstanceStatus },
}

/// Receives [`EngineEvent`]s as the engine processes instances.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &EngineEvent);
}

/// Discards every event. The engine's default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn on_event(&self, _event: &EngineEvent) {}
}

/// Forwards every event to `tracing` at a granularity matching the
/// reference engine's own instrumentation: state transitions at `info`,
/// action invocation at `debug`, failures at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn on_event(&self, event: &EngineEvent) {
        match event {
            EngineEvent::StateEntered { instance_id, state } => {
                tracing::info!(%instance_id, state, "state entered");
            }
            EngineEvent::ActionInvoked { instance_id, state, action } => {
                tracing::debug!(%instance_id, state, action, "action invoked");
            }
            EngineEvent::ActionFailed { instance_id, state, action, reason } => {
                tracing::warn!(%instance_id, state, action, reason, "action failed");
            }
            EngineEvent::CompensationStep { instance_id, state, compensation } => {
                tracing::info!(%instance_id, state, compensation, "compensation step");
            }
            EngineEvent::CompensationStepFailed { instance_id, state, compensation, reason } => {
                tracing::warn!(%instance_id, state, compensation, reason, "compensation step failed");
            }
            EngineEvent::TerminalTransition { instance_id, state, status } => {
                tracing::info!(%instance_id, state, %status, "terminal transition");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_accepts_any_event() {
        let sink = NoopEventSink;
        sink.on_event(&EngineEvent::StateEntered { instance_id: Uuid::now_v7(), state: "a".into() });
    }
}
