use oreline_types::EntityKind;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while turning JSON into records.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("record must be a JSON object")]
    NotAnObject,

    #[error("record is missing a string `id`")]
    MissingId,

    #[error("invalid {kind} payload: {source}")]
    InvalidPayload {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
