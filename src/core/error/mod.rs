use thiserror::Error;

/// Failures from the queue's ambient surfaces (config loading, snapshot export).
/// Queue operations themselves never fail.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QueueError>;
