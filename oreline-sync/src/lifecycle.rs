//! Mutation lifecycle tracking.
//!
//! One status per `(kind, operation)` pair. Pairs never interfere: a
//! pending create does not touch the fetch status of the same collection,
//! and nothing here blocks a call from being issued.

use oreline_types::{EntityKind, MutationStatus, Operation};
use serde::Serialize;
use std::collections::HashMap;

/// Status of one `(kind, operation)` pair plus its last error message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LifecycleState {
    pub status: MutationStatus,
    pub error: Option<String>,
}

impl LifecycleState {
    pub fn is_failed(&self) -> bool {
        self.status == MutationStatus::Failed
    }
}

/// All five operation statuses of one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LifecycleSnapshot {
    pub fetch: LifecycleState,
    pub create: LifecycleState,
    pub update: LifecycleState,
    pub delete: LifecycleState,
    pub search: LifecycleState,
}

impl LifecycleSnapshot {
    pub fn get(&self, operation: Operation) -> &LifecycleState {
        match operation {
            Operation::Fetch => &self.fetch,
            Operation::Create => &self.create,
            Operation::Update => &self.update,
            Operation::Delete => &self.delete,
            Operation::Search => &self.search,
        }
    }
}

/// Tracks lifecycle state for every collection.
#[derive(Debug, Clone, Default)]
pub struct LifecycleTracker {
    states: HashMap<(EntityKind, Operation), LifecycleState>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a call as in flight and clears any previous error.
    pub fn begin(&mut self, kind: EntityKind, operation: Operation) {
        self.set(kind, operation, MutationStatus::Pending, None);
    }

    pub fn succeed(&mut self, kind: EntityKind, operation: Operation) {
        self.set(kind, operation, MutationStatus::Succeeded, None);
    }

    pub fn fail(&mut self, kind: EntityKind, operation: Operation, message: impl Into<String>) {
        self.set(kind, operation, MutationStatus::Failed, Some(message.into()));
    }

    /// Back to idle (the user dismissed the result).
    pub fn reset(&mut self, kind: EntityKind, operation: Operation) {
        self.states.remove(&(kind, operation));
    }

    fn set(
        &mut self,
        kind: EntityKind,
        operation: Operation,
        status: MutationStatus,
        error: Option<String>,
    ) {
        self.states
            .insert((kind, operation), LifecycleState { status, error });
    }

    pub fn state(&self, kind: EntityKind, operation: Operation) -> LifecycleState {
        self.states
            .get(&(kind, operation))
            .cloned()
            .unwrap_or_default()
    }

    pub fn snapshot(&self, kind: EntityKind) -> LifecycleSnapshot {
        LifecycleSnapshot {
            fetch: self.state(kind, Operation::Fetch),
            create: self.state(kind, Operation::Create),
            update: self.state(kind, Operation::Update),
            delete: self.state(kind, Operation::Delete),
            search: self.state(kind, Operation::Search),
        }
    }

    /// Pairs with a call in flight.
    pub fn pending(&self) -> Vec<(EntityKind, Operation)> {
        let mut pending: Vec<_> = self
            .states
            .iter()
            .filter(|(_, state)| state.status.is_pending())
            .map(|(key, _)| *key)
            .collect();
        pending.sort();
        pending
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}
