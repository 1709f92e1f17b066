//! Core type definitions for the Oreline synchronization core.
//!
//! This crate defines the small, shared vocabulary every other crate speaks:
//! - Entity and user identifiers (opaque strings issued by the API)
//! - The closed set of entity kinds carried on the real-time channel
//! - Mineral categories and the collections that hold their stock lots
//! - Mutation operations and their lifecycle status
//! - Pagination windows mirroring the server's page/limit/total triple
//!
//! Record shapes live in `oreline-model`; collection state lives in
//! `oreline-sync`.

mod ids;
mod kind;
mod lifecycle;
mod window;

pub use ids::{EntityId, UserId};
pub use kind::{EntityKind, MineralCategory};
pub use lifecycle::{MutationStatus, Operation};
pub use window::PaginationWindow;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("identifier must not be empty")]
    EmptyId,

    #[error("unknown entity kind: {0}")]
    UnknownKind(String),

    #[error("unknown mineral category: {0}")]
    UnknownCategory(String),

    #[error("invalid pagination window: page={page}, limit={limit}")]
    InvalidWindow { page: u32, limit: u32 },
}
