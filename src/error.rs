//! Error types shared across capture, execution, and task storage.

use thiserror::Error;

/// Errors that can occur while recording, storing, or replaying tasks
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Screenshot failed: {0}")]
    CaptureFailure(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Fail-safe triggered: pointer is at the top-left corner (0, 0)")]
    FailSafe,

    #[error("Already recording")]
    AlreadyRecording,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for task recorder operations
pub type Result<T> = std::result::Result<T, Error>;
