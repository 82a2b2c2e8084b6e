//! Error types for the chat engine.

use chorus_core::error::ChorusError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("bot not found: {0}")]
    BotNotFound(String),
    #[error("bot did not respond within {0} ms")]
    Timeout(u64),
    #[error("storage error: {0}")]
    StorageError(String),
    #[error("task failed: {0}")]
    TaskFailed(String),
}

impl From<ChorusError> for ChatError {
    fn from(err: ChorusError) -> Self {
        ChatError::StorageError(err.to_string())
    }
}
