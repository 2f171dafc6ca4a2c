//! The engine: definition/action registries plus the state-machine and
//! saga-compensation interpreter.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::definition::{StateKind, WorkflowDefinition};
use crate::events::{EngineEvent, EventSink, NoopEventSink};
use crate::executors::{
    ActionExecutor, ActionRegistry, ConditionEvaluator, DefaultConditionEvaluator,
};
use crate::instance::{merge_context, Context, HistoryEntry, InstanceStatus, WorkflowInstance};
use crate::problem::{codes, Problem};
use crate::support::{Clock, IdGenerator, SystemClock, UuidGenerator};

use super::config::EngineConfig;
use super::store::{InMemoryInstanceStore, InstanceStore, StoreError};

fn store_err_to_problem(err: StoreError) -> Problem {
    match err {
        StoreError::NotFound(id) => {
            Problem::not_found(codes::INSTANCE_NOT_FOUND, format!("instance {id} not found"))
        }
        StoreError::AlreadyExists(id) => Problem::technical(
            codes::STORE_ERROR,
            format!("instance {id} already exists"),
        ),
    }
}

/// Finite-state-machine workflow engine with Saga compensation.
///
/// Every public operation is synchronous. Cross-instance operations never
/// block each other; operations against the same instance are serialized
/// through a per-instance lock rather than a single engine-wide mutex, so
/// throughput scales with the number of distinct in-flight instances.
pub struct Engine<S: InstanceStore = InMemoryInstanceStore> {
    store: Arc<S>,
    definitions: DashMap<String, Arc<WorkflowDefinition>>,
    actions: RwLock<ActionRegistry>,
    condition_evaluator: Arc<dyn ConditionEvaluator>,
    id_generator: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    event_sink: Arc<dyn EventSink>,
    config: EngineConfig,
    instance_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl Engine<InMemoryInstanceStore> {
    /// Build an engine with every default port: an in-memory store,
    /// UUIDv7 ids, the system clock, the reject-by-default condition
    /// evaluator and a no-op event sink.
    pub fn new() -> Self {
        Self::with_store(InMemoryInstanceStore::new())
    }
}

impl Default for Engine<InMemoryInstanceStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: InstanceStore> Engine<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            store: Arc::new(store),
            definitions: DashMap::new(),
            actions: RwLock::new(ActionRegistry::new()),
            condition_evaluator: Arc::new(DefaultConditionEvaluator),
            id_generator: Arc::new(UuidGenerator),
            clock: Arc::new(SystemClock),
            event_sink: Arc::new(NoopEventSink),
            config: EngineConfig::default(),
            instance_locks: DashMap::new(),
        }
    }

    pub fn with_condition_evaluator(mut self, evaluator: impl ConditionEvaluator + 'static) -> Self {
        self.condition_evaluator = Arc::new(evaluator);
        self
    }

    pub fn with_id_generator(mut self, id_generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Arc::new(id_generator);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.event_sink = Arc::new(sink);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    fn lock_for(&self, instance_id: Uuid) -> Arc<Mutex<()>> {
        self.instance_locks
            .entry(instance_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn definition_for(&self, workflow_type: &str) -> Result<Arc<WorkflowDefinition>, Problem> {
        self.definitions
            .get(workflow_type)
            .map(|e| e.value().clone())
            .ok_or_else(|| {
                Problem::not_found(
                    codes::DEFINITION_NOT_FOUND,
                    format!("no workflow definition registered for type {workflow_type}"),
                )
            })
    }

    /// Registers a workflow definition, storing it under its `workflow_type`
    /// and silently overwriting any prior definition registered under the
    /// same type. Registries are open: re-registration is a normal way to
    /// roll out a new definition revision, not an error.
    #[tracing::instrument(skip(self, definition), fields(workflow_type = %definition.workflow_type))]
    pub fn register_definition(&self, definition: WorkflowDefinition) -> Result<(), Problem> {
        tracing::info!("registered workflow definition");
        self.definitions
            .insert(definition.workflow_type.clone(), Arc::new(definition));
        Ok(())
    }

    /// Registers a named action/compensation executor, silently overwriting
    /// any executor previously registered under the same name. Executors may
    /// be registered before or after the definitions that reference them.
    pub fn register_action_executor(
        &self,
        name: impl Into<String>,
        executor: impl ActionExecutor + 'static,
    ) -> Result<(), Problem> {
        let name = name.into();
        self.actions.write().register(name.clone(), executor);
        tracing::info!(action = %name, "registered action executor");
        Ok(())
    }

    /// Creates a new instance of `workflow_type` and runs its initial
    /// state to the first point it either completes or waits for an event.
    #[tracing::instrument(skip(self, context), fields(workflow_type))]
    pub fn start_workflow(
        &self,
        workflow_type: &str,
        context: Context,
    ) -> Result<WorkflowInstance, Problem> {
        let definition = self.definition_for(workflow_type)?;
        let id = self.id_generator.next_id();
        let now = self.clock.now();
        let mut instance =
            WorkflowInstance::new(id, workflow_type, definition.initial_state.clone(), context, now);

        let lock = self.lock_for(id);
        let _guard = lock.lock();

        self.store
            .insert(instance.clone())
            .map_err(store_err_to_problem)?;

        self.execute_current_state_locked(&mut instance, &definition)?;
        instance.updated_at = self.clock.now();

        self.store
            .update(instance.clone())
            .map_err(store_err_to_problem)?;
        info!(%id, "started workflow instance");
        Ok(instance)
    }

    /// Advances an instance on an external event: looks up the first
    /// matching transition from the instance's current state (evaluating
    /// each candidate's condition against the instance's context and the
    /// supplied `event_data`), merges `event_data` into the instance's
    /// context, moves to the transition's target, and runs that state.
    #[tracing::instrument(skip(self, event_data))]
    pub fn send_event(
        &self,
        instance_id: Uuid,
        event: &str,
        event_data: Context,
    ) -> Result<WorkflowInstance, Problem> {
        let lock = self.lock_for(instance_id);
        let _guard = lock.lock();

        let mut instance = self.store.get(instance_id).map_err(store_err_to_problem)?;
        if instance.status.is_terminal() {
            return Err(Problem::business(
                codes::ALREADY_TERMINAL,
                format!("instance {instance_id} is already in a terminal state"),
            ));
        }

        let definition = self.definition_for(&instance.workflow_type)?;
        let transition = definition.transitions_from(&instance.current_state).find(|t| {
            t.event == event
                && self.condition_evaluator.evaluate(
                    t.condition.as_deref(),
                    &instance.context,
                    &event_data,
                )
        });

        let Some(transition) = transition else {
            return Err(Problem::business(
                codes::NO_TRANSITION,
                format!(
                    "no transition from state {:?} on event {:?}",
                    instance.current_state, event
                ),
            ));
        };

        merge_context(&mut instance.context, event_data);
        instance.current_state = transition.to.clone();
        self.execute_current_state_locked(&mut instance, &definition)?;

        if instance.history.len() > self.config.max_history_per_instance {
            return Err(Problem::technical(
                codes::HISTORY_LIMIT_EXCEEDED,
                format!(
                    "instance {instance_id} exceeded the maximum history length ({})",
                    self.config.max_history_per_instance
                ),
            ));
        }

        instance.updated_at = self.clock.now();
        self.store
            .update(instance.clone())
            .map_err(store_err_to_problem)?;
        Ok(instance)
    }

    /// Returns the current snapshot of an instance.
    pub fn get_workflow(&self, instance_id: Uuid) -> Result<WorkflowInstance, Problem> {
        self.store.get(instance_id).map_err(store_err_to_problem)
    }

    /// Immediately marks an instance as failed, regardless of its current
    /// status — including an already-terminal one. Does not run
    /// compensation; callers that want compensation after a cancel call
    /// [`Engine::compensate`] explicitly.
    pub fn cancel(&self, instance_id: Uuid, reason: impl Into<String>) -> Result<WorkflowInstance, Problem> {
        let lock = self.lock_for(instance_id);
        let _guard = lock.lock();

        let mut instance = self.store.get(instance_id).map_err(store_err_to_problem)?;
        let now = self.clock.now();
        instance.status = InstanceStatus::Failed;
        instance.failure_reason = Some(format!("Cancelled: {}", reason.into()));
        instance.completed_at = Some(now);
        instance.updated_at = now;

        self.event_sink.on_event(&EngineEvent::TerminalTransition {
            instance_id,
            state: instance.current_state.clone(),
            status: InstanceStatus::Failed,
        });

        self.store
            .update(instance.clone())
            .map_err(store_err_to_problem)?;
        Ok(instance)
    }

    /// Walks the instance's full execution history in reverse, invoking
    /// every declared compensation. Re-invocable: calling it again re-runs
    /// every compensation rather than short-circuiting on an
    /// already-`Compensated` instance.
    pub fn compensate(&self, instance_id: Uuid) -> Result<WorkflowInstance, Problem> {
        let lock = self.lock_for(instance_id);
        let _guard = lock.lock();

        let mut instance = self.store.get(instance_id).map_err(store_err_to_problem)?;
        let definition = self.definition_for(&instance.workflow_type)?;
        self.compensate_locked(&mut instance, &definition);
        instance.updated_at = self.clock.now();

        self.store
            .update(instance.clone())
            .map_err(store_err_to_problem)?;
        Ok(instance)
    }

    /// Runs the state named by `instance.current_state`: records it as
    /// visited, invokes its action (if any), and handles terminal kinds.
    /// Returns `Err(STATE_NOT_FOUND)` if the current state isn't declared in
    /// `definition`, leaving `instance` unmutated. Callable only while the
    /// caller already holds this instance's lock.
    fn execute_current_state_locked(
        &self,
        instance: &mut WorkflowInstance,
        definition: &WorkflowDefinition,
    ) -> Result<(), Problem> {
        let Some(state) = definition.state(&instance.current_state).cloned() else {
            return Err(Problem::not_found(
                codes::STATE_NOT_FOUND,
                format!(
                    "state {:?} is not declared in definition {:?}",
                    instance.current_state, definition.workflow_type
                ),
            ));
        };

        instance.history.push(HistoryEntry {
            state: state.name.clone(),
            entered_at: self.clock.now(),
        });
        self.event_sink.on_event(&EngineEvent::StateEntered {
            instance_id: instance.id,
            state: state.name.clone(),
        });

        if let Some(action_name) = &state.action {
            self.event_sink.on_event(&EngineEvent::ActionInvoked {
                instance_id: instance.id,
                state: state.name.clone(),
                action: action_name.clone(),
            });

            match self.actions.read().get(action_name) {
                Ok(executor) => {
                    match executor.execute(instance.id, &state.name, &instance.context) {
                        Ok(new_context) => merge_context(&mut instance.context, new_context),
                        Err(reason) => {
                            self.event_sink.on_event(&EngineEvent::ActionFailed {
                                instance_id: instance.id,
                                state: state.name.clone(),
                                action: action_name.clone(),
                                reason: reason.clone(),
                            });
                            let now = self.clock.now();
                            instance.status = InstanceStatus::Failed;
                            instance.failure_reason = Some(format!("Action failed: {reason}"));
                            instance.completed_at = Some(now);
                            instance.updated_at = now;
                            self.compensate_locked(instance, definition);
                            return Ok(());
                        }
                    }
                }
                Err(_) => {
                    tracing::warn!(
                        action = %action_name,
                        state = %state.name,
                        "action executor not registered; state proceeds as a no-op",
                    );
                }
            }
        }

        match state.kind {
            StateKind::Start | StateKind::Task | StateKind::Choice | StateKind::Parallel => {}
            StateKind::End => {
                let now = self.clock.now();
                instance.status = InstanceStatus::Succeeded;
                instance.completed_at = Some(now);
                instance.updated_at = now;
                self.event_sink.on_event(&EngineEvent::TerminalTransition {
                    instance_id: instance.id,
                    state: state.name.clone(),
                    status: InstanceStatus::Succeeded,
                });
            }
            StateKind::Fail => {
                let now = self.clock.now();
                instance.status = InstanceStatus::Failed;
                instance.failure_reason =
                    Some(format!("Workflow reached FAIL state {:?}", state.name));
                instance.completed_at = Some(now);
                instance.updated_at = now;
                self.compensate_locked(instance, definition);
            }
        }

        Ok(())
    }

    /// Invokes every declared compensation over the instance's history, in
    /// reverse entry order, then marks the instance `Compensated`.
    /// Individual compensation failures are best-effort: they are reported
    /// to the event sink but do not halt the walk, matching the "no retry"
    /// design — a failed compensation is not retried, it is simply logged
    /// and the walk continues to the next entry. Sets and persists
    /// `Compensating` before the walk starts, so a concurrent `get_workflow`
    /// observes the walk in progress rather than a stale pre-compensation
    /// snapshot. Callable only while the caller already holds this
    /// instance's lock.
    fn compensate_locked(&self, instance: &mut WorkflowInstance, definition: &WorkflowDefinition) {
        instance.status = InstanceStatus::Compensating;
        instance.updated_at = self.clock.now();
        let _ = self.store.update(instance.clone());

        let visited: Vec<String> = instance
            .compensable_states_reverse()
            .map(String::from)
            .collect();

        for state_name in visited {
            let Some(state) = definition.state(&state_name) else {
                continue;
            };
            let Some(compensation_name) = &state.compensation else {
                continue;
            };

            self.event_sink.on_event(&EngineEvent::CompensationStep {
                instance_id: instance.id,
                state: state_name.clone(),
                compensation: compensation_name.clone(),
            });

            let outcome = match self.actions.read().get(compensation_name) {
                Ok(executor) => executor.execute(instance.id, &state_name, &instance.context),
                Err(_) => Err(format!(
                    "compensation executor not registered: {compensation_name}"
                )),
            };

            match outcome {
                Ok(new_context) => merge_context(&mut instance.context, new_context),
                Err(reason) => {
                    self.event_sink.on_event(&EngineEvent::CompensationStepFailed {
                        instance_id: instance.id,
                        state: state_name.clone(),
                        compensation: compensation_name.clone(),
                        reason,
                    });
                }
            }
        }

        let now = self.clock.now();
        instance.status = InstanceStatus::Compensated;
        instance.completed_at = Some(now);
        instance.updated_at = now;
        self.event_sink.on_event(&EngineEvent::TerminalTransition {
            instance_id: instance.id,
            state: instance.current_state.clone(),
            status: InstanceStatus::Compensated,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{State, Transition, WorkflowDefinition};
    use crate::executors::FnActionExecutor;
    use serde_json::json;

    fn order_definition() -> WorkflowDefinition {
        WorkflowDefinition::builder("order")
            .initial_state("reserve")
            .state(
                State::task("reserve")
                    .with_action("reserve_inventory")
                    .with_compensation("release_inventory"),
            )
            .state(
                State::task("charge")
                    .with_action("charge_card")
                    .with_compensation("refund_card"),
            )
            .state(State::end("done"))
            .state(State::fail("aborted"))
            .transition(Transition::new("reserve", "reserved", "charge"))
            .transition(Transition::new("charge", "charged", "done"))
            .transition(Transition::new("charge", "charge_failed", "aborted"))
            .build()
            .expect("valid definition")
    }

    fn always_ok() -> FnActionExecutor<impl Fn(Uuid, &str, &Context) -> Result<Context, String>> {
        FnActionExecutor(|_id, _state, ctx: &Context| Ok(ctx.clone()))
    }

    #[test]
    fn start_workflow_runs_initial_state_action() {
        let engine = Engine::new();
        engine.register_definition(order_definition()).unwrap();
        engine.register_action_executor("reserve_inventory", always_ok()).unwrap();
        engine.register_action_executor("release_inventory", always_ok()).unwrap();
        engine.register_action_executor("charge_card", always_ok()).unwrap();
        engine.register_action_executor("refund_card", always_ok()).unwrap();

        let instance = engine.start_workflow("order", Context::new()).unwrap();
        assert_eq!(instance.current_state, "reserve");
        assert_eq!(instance.status, InstanceStatus::Running);
        assert_eq!(instance.history.len(), 1);
        assert!(instance.completed_at.is_none());
    }

    #[test]
    fn full_happy_path_reaches_succeeded() {
        let engine = Engine::new();
        engine.register_definition(order_definition()).unwrap();
        for name in ["reserve_inventory", "release_inventory", "charge_card", "refund_card"] {
            engine.register_action_executor(name, always_ok()).unwrap();
        }

        let instance = engine.start_workflow("order", Context::new()).unwrap();
        let instance = engine.send_event(instance.id, "reserved", Context::new()).unwrap();
        assert_eq!(instance.current_state, "charge");

        let instance = engine.send_event(instance.id, "charged", Context::new()).unwrap();
        assert_eq!(instance.current_state, "done");
        assert_eq!(instance.status, InstanceStatus::Succeeded);
        assert!(instance.completed_at.is_some());
        assert!(instance.completed_at.unwrap() >= instance.created_at);
    }

    #[test]
    fn action_failure_triggers_reverse_compensation() {
        let engine = Engine::new();
        engine.register_definition(order_definition()).unwrap();
        engine.register_action_executor("reserve_inventory", always_ok()).unwrap();
        engine
            .register_action_executor(
                "charge_card",
                FnActionExecutor(|_id, _state, _ctx: &Context| Err("card declined".to_string())),
            )
            .unwrap();
        let compensated = Arc::new(Mutex::new(Vec::<String>::new()));
        let compensated_clone = compensated.clone();
        engine
            .register_action_executor(
                "release_inventory",
                FnActionExecutor(move |_id, state: &str, ctx: &Context| {
                    compensated_clone.lock().push(state.to_string());
                    Ok(ctx.clone())
                }),
            )
            .unwrap();

        let instance = engine.start_workflow("order", Context::new()).unwrap();
        let instance = engine.send_event(instance.id, "reserved", Context::new()).unwrap();
        assert_eq!(instance.status, InstanceStatus::Compensated);
        assert_eq!(instance.failure_reason.as_deref(), Some("Action failed: card declined"));
        assert_eq!(*compensated.lock(), vec!["reserve".to_string()]);
    }

    #[test]
    fn action_failure_on_current_state_also_compensates_itself() {
        // A single TASK state whose own action fails: its own compensation
        // must still run as part of the reverse walk, since the state is
        // recorded as visited before its action executes.
        let engine = Engine::new();
        engine.register_definition(
            WorkflowDefinition::builder("single_step")
                .initial_state("start")
                .state(
                    State::task("start")
                        .with_action("do_thing")
                        .with_compensation("undo_thing"),
                )
                .build()
                .unwrap(),
        ).unwrap();
        engine
            .register_action_executor(
                "do_thing",
                FnActionExecutor(|_id, _state, _ctx: &Context| Err("boom".to_string())),
            )
            .unwrap();
        engine
            .register_action_executor(
                "undo_thing",
                FnActionExecutor(|_id, _state, ctx: &Context| {
                    let mut ctx = ctx.clone();
                    ctx.insert("compensated".into(), json!(true));
                    Ok(ctx)
                }),
            )
            .unwrap();

        let instance = engine.start_workflow("single_step", Context::new()).unwrap();
        assert_eq!(instance.status, InstanceStatus::Compensated);
        assert_eq!(instance.context.get("compensated"), Some(&json!(true)));
    }

    #[test]
    fn unregistered_action_executor_is_a_no_op_not_a_failure() {
        let engine = Engine::new();
        engine.register_definition(order_definition()).unwrap();
        // No executors registered at all.
        let instance = engine.start_workflow("order", Context::new()).unwrap();
        assert_eq!(instance.status, InstanceStatus::Running);
        assert_eq!(instance.current_state, "reserve");
    }

    #[test]
    fn no_matching_transition_is_a_business_problem() {
        let engine = Engine::new();
        engine.register_definition(order_definition()).unwrap();
        engine.register_action_executor("reserve_inventory", always_ok()).unwrap();
        engine.register_action_executor("release_inventory", always_ok()).unwrap();

        let instance = engine.start_workflow("order", Context::new()).unwrap();
        let err = engine.send_event(instance.id, "nonexistent", Context::new()).unwrap_err();
        assert_eq!(err.code, codes::NO_TRANSITION);
    }

    #[test]
    fn send_event_on_terminal_instance_is_rejected() {
        let engine = Engine::new();
        engine.register_definition(order_definition()).unwrap();
        for name in ["reserve_inventory", "release_inventory"] {
            engine.register_action_executor(name, always_ok()).unwrap();
        }
        let instance = engine.start_workflow("order", Context::new()).unwrap();
        engine.cancel(instance.id, "operator abort").unwrap();
        let err = engine.send_event(instance.id, "reserved", Context::new()).unwrap_err();
        assert_eq!(err.code, codes::ALREADY_TERMINAL);
    }

    #[test]
    fn cancel_overwrites_even_an_already_terminal_instance() {
        let engine = Engine::new();
        engine.register_definition(order_definition()).unwrap();
        for name in ["reserve_inventory", "release_inventory"] {
            engine.register_action_executor(name, always_ok()).unwrap();
        }
        let instance = engine.start_workflow("order", Context::new()).unwrap();
        engine.cancel(instance.id, "first").unwrap();
        let second = engine.cancel(instance.id, "second").unwrap();
        assert_eq!(second.failure_reason.as_deref(), Some("Cancelled: second"));
        assert!(second.completed_at.is_some());
    }

    #[test]
    fn compensate_is_repeatable() {
        let engine = Engine::new();
        engine.register_definition(order_definition()).unwrap();
        let calls = Arc::new(Mutex::new(0usize));
        let calls_clone = calls.clone();
        engine.register_action_executor("reserve_inventory", always_ok()).unwrap();
        engine
            .register_action_executor(
                "release_inventory",
                FnActionExecutor(move |_id, _state, ctx: &Context| {
                    *calls_clone.lock() += 1;
                    Ok(ctx.clone())
                }),
            )
            .unwrap();

        let instance = engine.start_workflow("order", Context::new()).unwrap();
        engine.compensate(instance.id).unwrap();
        engine.compensate(instance.id).unwrap();
        assert_eq!(*calls.lock(), 2);
    }

    #[test]
    fn unregistered_workflow_type_is_not_found() {
        let engine = Engine::new();
        let err = engine.start_workflow("ghost", Context::new()).unwrap_err();
        assert_eq!(err.code, codes::DEFINITION_NOT_FOUND);
    }

    #[test]
    fn re_registering_a_definition_overwrites_silently() {
        let engine = Engine::new();
        engine.register_definition(order_definition()).unwrap();
        // Same workflow_type, different shape: re-registration must succeed
        // and replace the prior definition rather than erroring.
        engine
            .register_definition(
                WorkflowDefinition::builder("order")
                    .initial_state("only")
                    .state(State::end("only"))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let instance = engine.start_workflow("order", Context::new()).unwrap();
        assert_eq!(instance.current_state, "only");
        assert_eq!(instance.status, InstanceStatus::Succeeded);
    }

    #[test]
    fn send_event_merges_event_data_into_context_last_write_wins() {
        let engine = Engine::new();
        engine.register_definition(order_definition()).unwrap();
        engine.register_action_executor("reserve_inventory", always_ok()).unwrap();
        engine.register_action_executor("release_inventory", always_ok()).unwrap();
        engine.register_action_executor("charge_card", always_ok()).unwrap();
        engine.register_action_executor("refund_card", always_ok()).unwrap();

        let mut initial = Context::new();
        initial.insert("k".into(), json!("v"));
        let instance = engine.start_workflow("order", initial).unwrap();

        let mut event_data = Context::new();
        event_data.insert("r".into(), json!("success"));
        let instance = engine.send_event(instance.id, "reserved", event_data).unwrap();

        assert_eq!(instance.context.get("k"), Some(&json!("v")));
        assert_eq!(instance.context.get("r"), Some(&json!("success")));
    }

    #[test]
    fn event_data_is_visible_to_the_condition_evaluator() {
        struct RequireFlag;
        impl ConditionEvaluator for RequireFlag {
            fn evaluate(&self, condition: Option<&str>, _context: &Context, event_data: &Context) -> bool {
                match condition {
                    None => true,
                    Some(_) => event_data.get("ok") == Some(&json!(true)),
                }
            }
        }

        let engine = Engine::new().with_condition_evaluator(RequireFlag);
        engine.register_definition(
            WorkflowDefinition::builder("gated")
                .initial_state("start")
                .state(State::task("start"))
                .state(State::end("done"))
                .transition(Transition::new("start", "go", "done").with_condition("gate"))
                .build()
                .unwrap(),
        ).unwrap();

        let instance = engine.start_workflow("gated", Context::new()).unwrap();
        let err = engine.send_event(instance.id, "go", Context::new()).unwrap_err();
        assert_eq!(err.code, codes::NO_TRANSITION);

        let mut event_data = Context::new();
        event_data.insert("ok".into(), json!(true));
        let instance = engine.send_event(instance.id, "go", event_data).unwrap();
        assert_eq!(instance.status, InstanceStatus::Succeeded);
    }

    #[test]
    fn context_flows_through_states() {
        let engine = Engine::new();
        engine.register_definition(order_definition()).unwrap();
        engine
            .register_action_executor(
                "reserve_inventory",
                FnActionExecutor(|_id, _state, ctx: &Context| {
                    let mut ctx = ctx.clone();
                    ctx.insert("reservation_id".into(), json!("R-1"));
                    Ok(ctx)
                }),
            )
            .unwrap();
        engine.register_action_executor("release_inventory", always_ok()).unwrap();
        engine
            .register_action_executor(
                "charge_card",
                FnActionExecutor(|_id, _state, ctx: &Context| {
                    assert_eq!(ctx.get("reservation_id"), Some(&json!("R-1")));
                    Ok(ctx.clone())
                }),
            )
            .unwrap();
        engine.register_action_executor("refund_card", always_ok()).unwrap();

        let instance = engine.start_workflow("order", Context::new()).unwrap();
        engine.send_event(instance.id, "reserved", Context::new()).unwrap();
    }
}
