use thiserror::Error;

/// Top-level error type for the Chorus system.
///
/// Subsystem crates define their own error types and implement
/// `From<ChorusError>` so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChorusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for ChorusError {
    fn from(err: toml::de::Error) -> Self {
        ChorusError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ChorusError {
    fn from(err: toml::ser::Error) -> Self {
        ChorusError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ChorusError {
    fn from(err: serde_json::Error) -> Self {
        ChorusError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Chorus operations.
pub type Result<T> = std::result::Result<T, ChorusError>;
