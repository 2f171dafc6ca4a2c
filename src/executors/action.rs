//! Action executor registry.
//!
//! Action and compensation executors share the same registry and trait:
//! both are named steps, looked up by the string a [`crate::definition::State`]
//! declares in its `action`/`compensation` field, that run against an
//! instance's context and either advance it or fail.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::instance::Context;

/// A single named step invoked when the engine enters a state (as its
/// action) or walks the compensation history (as its compensation).
///
/// Implementors perform whatever side effect the workflow author wants
/// (call a payment gateway, reserve inventory, send a message) and return
/// an updated context on success. Failures are reported as a message
/// string rather than a [`crate::problem::Problem`]: action failure is a
/// business outcome captured on the instance, not an engine-level error.
pub trait ActionExecutor: Send + Sync {
    fn execute(&self, instance_id: Uuid, state: &str, context: &Context) -> Result<Context, String>;
}

/// Wraps a plain closure as an [`ActionExecutor`], for simple cases that
/// don't need a dedicated type.
pub struct FnActionExecutor<F>(pub F)
where
    F: Fn(Uuid, &str, &Context) -> Result<Context, String> + Send + Sync;

impl<F> ActionExecutor for FnActionExecutor<F>
where
    F: Fn(Uuid, &str, &Context) -> Result<Context, String> + Send + Sync,
{
    fn execute(&self, instance_id: Uuid, state: &str, context: &Context) -> Result<Context, String> {
        (self.0)(instance_id, state, context)
    }
}

/// Registry of named action/compensation executors.
///
/// Readers never block writers and vice versa beyond a single registration
/// call: once registered, an executor is looked up through a shared
/// reference, matching the reference engine's workflow-type registry.
#[derive(Default)]
pub struct ActionRegistry {
    executors: HashMap<String, Arc<dyn ActionExecutor>>,
}

/// Errors from [`ActionRegistry`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ActionRegistryError {
    #[error("action executor not registered: {0}")]
    NotRegistered(String),
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `executor` under `name`, silently overwriting any executor
    /// previously registered under the same name. Registries are open:
    /// executors may be (re-)registered at any time, independent of
    /// definition registration.
    pub fn register(&mut self, name: impl Into<String>, executor: impl ActionExecutor + 'static) {
        self.executors.insert(name.into(), Arc::new(executor));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.executors.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn ActionExecutor>, ActionRegistryError> {
        self.executors
            .get(name)
            .cloned()
            .ok_or_else(|| ActionRegistryError::NotRegistered(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.executors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("executors", &self.executors.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;
    impl ActionExecutor for Noop {
        fn execute(&self, _instance_id: Uuid, _state: &str, context: &Context) -> Result<Context, String> {
            Ok(context.clone())
        }
    }

    #[test]
    fn register_and_get() {
        let mut registry = ActionRegistry::new();
        registry.register("noop", Noop);
        assert!(registry.contains("noop"));
        assert!(registry.get("noop").is_ok());
    }

    #[test]
    fn re_registration_silently_overwrites() {
        let mut registry = ActionRegistry::new();
        registry.register(
            "step",
            FnActionExecutor(|_id, _state, _ctx: &Context| Ok(Context::new())),
        );
        registry.register(
            "step",
            FnActionExecutor(|_id, _state, _ctx: &Context| Err("replaced".to_string())),
        );
        assert_eq!(registry.len(), 1);
        let result = registry
            .get("step")
            .unwrap()
            .execute(Uuid::now_v7(), "s", &Context::new());
        assert_eq!(result, Err("replaced".to_string()));
    }

    #[test]
    fn missing_executor_rejected() {
        let registry = ActionRegistry::new();
        let err = registry.get("ghost").unwrap_err();
        assert!(matches!(err, ActionRegistryError::NotRegistered(_)));
    }

    #[test]
    fn fn_action_executor_wraps_closure() {
        let mut registry = ActionRegistry::new();
        registry.register(
            "double",
            FnActionExecutor(|_id, _state, ctx: &Context| Ok(ctx.clone())),
        );
        assert!(registry.contains("double"));
    }
}
