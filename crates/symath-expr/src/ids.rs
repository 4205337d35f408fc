//! Variable identities and the generator that hands them out.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identity of a decision variable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct VariableId(u64);

impl VariableId {
    /// Get the inner u64 value.
    pub fn inner(self) -> u64 {
        self.0
    }

    /// Create an ID from a u64 value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

/// Monotonic source of variable identities.
///
/// The process-wide instance backs [`Variable::new`](crate::Variable::new).
/// Tests that need reproducible ids build a local instance instead.
#[derive(Debug)]
pub struct VariableIdGenerator {
    next: AtomicU64,
}

impl VariableIdGenerator {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Hand out the next identity. Never returns the same id twice.
    pub fn next_id(&self) -> VariableId {
        VariableId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// The id the next call to [`next_id`](Self::next_id) would return.
    pub fn peek(&self) -> VariableId {
        VariableId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for VariableIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_VARIABLE_IDS: VariableIdGenerator = VariableIdGenerator::new();

/// Allocate a fresh identity from the process-wide generator.
pub fn next_variable_id() -> VariableId {
    let id = GLOBAL_VARIABLE_IDS.next_id();
    tracing::trace!(
        component = "ids",
        operation = "next_variable_id",
        id = id.inner(),
        "Allocated variable id"
    );
    id
}
