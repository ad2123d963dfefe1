//! Observation identifier generation.

use crate::types::ObservationId;

/// Source of fresh observation identifiers.
pub trait IdProvider: Send + Sync {
    fn next_id(&self) -> ObservationId;
}

/// Time-ordered UUIDv7 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Provider;

impl IdProvider for UuidV7Provider {
    fn next_id(&self) -> ObservationId {
        ObservationId::new(uuid::Uuid::now_v7().to_string())
    }
}
