//! Mutation operations and their lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An operation kind issued against a collection.
///
/// Each collection tracks one status per operation; they never share or
/// overwrite each other's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
    Search,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Fetch,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
        Operation::Search,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Search => "search",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where one `(kind, operation)` pair stands.
///
/// `Pending` is advisory for the UI; it never blocks other operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl MutationStatus {
    /// Returns true while a call is in flight.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, MutationStatus::Pending)
    }
}
