//! Identifier provider port.
//!
//! Abstracted behind a trait so tests can inject deterministic ids instead
//! of the time-ordered UUIDv7 the engine uses by default.

use uuid::Uuid;

/// Generates instance identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// Default generator: time-ordered UUIDv7, so instance ids sort by creation
/// order the way the reference engine's workflow ids do.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> Uuid {
        Uuid::now_v7()
    }
}
