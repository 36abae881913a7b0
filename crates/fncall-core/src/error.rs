use crate::function::ArgKind;

pub type InvokeResult<T> = Result<T, InvokeError>;

/// Failures surfaced by a single invocation. None of these are retried by
/// the engine; the caller decides what is worth retrying.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("expected {expected} arguments, got {got}")]
    Arity { expected: usize, got: usize },

    #[error("argument '{name}' must be of type {expected}")]
    TypeMismatch { name: String, expected: ArgKind },

    #[error("request failed: {status_text}")]
    RequestFailed { status: u16, status_text: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}
