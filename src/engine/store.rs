//! Instance store port and its in-memory reference implementation.

use dashmap::DashMap;
use uuid::Uuid;

use crate::instance::WorkflowInstance;

/// Errors from [`InstanceStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("instance not found: {0}")]
    NotFound(Uuid),

    #[error("instance already exists: {0}")]
    AlreadyExists(Uuid),
}

/// Persists [`WorkflowInstance`]s. The engine never assumes more than this
/// port promises, so a durable (e.g. database-backed) implementation can
/// stand in for the in-memory default without touching the interpreter.
pub trait InstanceStore: Send + Sync {
    fn insert(&self, instance: WorkflowInstance) -> Result<(), StoreError>;
    fn get(&self, id: Uuid) -> Result<WorkflowInstance, StoreError>;
    fn update(&self, instance: WorkflowInstance) -> Result<(), StoreError>;
}

/// In-memory instance store keyed by instance id. Uses a concurrent map so
/// cross-instance operations never block each other; per-instance
/// serialization is the engine's responsibility (see
/// [`crate::engine::interpreter::Engine`]), not the store's.
#[derive(Default)]
pub struct InMemoryInstanceStore {
    instances: DashMap<Uuid, WorkflowInstance>,
}

impl InMemoryInstanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InstanceStore for InMemoryInstanceStore {
    fn insert(&self, instance: WorkflowInstance) -> Result<(), StoreError> {
        if self.instances.contains_key(&instance.id) {
            return Err(StoreError::AlreadyExists(instance.id));
        }
        self.instances.insert(instance.id, instance);
        Ok(())
    }

    fn get(&self, id: Uuid) -> Result<WorkflowInstance, StoreError> {
        self.instances
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    fn update(&self, instance: WorkflowInstance) -> Result<(), StoreError> {
        if !self.instances.contains_key(&instance.id) {
            return Err(StoreError::NotFound(instance.id));
        }
        self.instances.insert(instance.id, instance);
        Ok(())
    }
}
