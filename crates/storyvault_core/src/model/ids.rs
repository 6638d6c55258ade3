//! Identifier generation contract.
//!
//! Imported projects need fresh identifiers for every project, chapter and
//! note. Callers inject the generator so tests can use deterministic values.

use uuid::Uuid;

/// Source of fresh, never-reused identifiers.
pub trait IdGenerator {
    fn next_id(&mut self) -> Uuid;
}

/// Production generator backed by random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic generator yielding `1, 2, 3, ...` encoded as UUIDs.
#[derive(Debug, Clone, Default)]
pub struct SequentialIdGenerator {
    issued: u128,
}

impl SequentialIdGenerator {
    /// Starts issuing after `issued`, so the next id is `issued + 1`.
    pub fn starting_after(issued: u128) -> Self {
        Self { issued }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> Uuid {
        self.issued += 1;
        Uuid::from_u128(self.issued)
    }
}
