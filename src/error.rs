use thiserror::Error;

use crate::session::state::SessionKey;

/// Result alias used across the pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a pipeline stage can surface to the session.
///
/// Nothing is retried and nothing is swallowed: each variant aborts the
/// command that triggered it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("dataset unavailable: {0}")]
    DataUnavailable(String),

    #[error("test fraction must lie strictly between 0 and 1, got {0}")]
    InvalidFraction(f64),

    #[error("invalid model config: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("not fitted: fit must run before transform or predict")]
    NotFitted,

    #[error("already fitted; transform new data instead of refitting")]
    AlreadyFitted,

    #[error("session key `{0}` is not initialized")]
    NotInitialized(SessionKey),

    #[error("training failed: {0}")]
    TrainingFailed(#[source] FitError),

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig { field, reason: reason.into() }
    }
}

/// Failures raised by the regressor's own fit procedure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("no training rows")]
    EmptyInput,

    #[error("{features} feature rows but {targets} targets")]
    ShapeMismatch { features: usize, targets: usize },

    #[error("row {row} has {actual} features, expected {expected}")]
    RaggedRow { row: usize, expected: usize, actual: usize },

    #[error("model is already trained; build a new one from the config")]
    AlreadyTrained,

    #[error("loss became non-finite at iteration {iteration}")]
    Diverged { iteration: usize },
}
