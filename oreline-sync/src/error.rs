//! Error types for the sync layer.
//!
//! None of these cross the facade boundary as `Err`: API errors become the
//! failed lifecycle state of a collection, protocol errors become dropped
//! broadcasts.

use oreline_model::ModelError;
use oreline_types::Operation;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Result type returned by network collaborators.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while decoding inbound data.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Protocol error (invalid message format).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Unknown entity kind on the wire.
    #[error("unknown entity kind: {0}")]
    UnknownKind(String),

    /// Payload does not match the record shape of its kind.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A rejected network call. The display string is the message the UI shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The call failed (transport failure, validation rejected by the server, ...).
    #[error("{0}")]
    Rejected(String),

    /// The target entity does not exist server-side.
    #[error("{0}")]
    NotFound(String),

    /// The collaborator answered with a response that does not fit the operation.
    #[error("unexpected response to {operation}")]
    UnexpectedResponse { operation: Operation },

    /// The server reported an unusable pagination window.
    #[error("invalid page: {0}")]
    InvalidPage(#[from] oreline_types::Error),
}
