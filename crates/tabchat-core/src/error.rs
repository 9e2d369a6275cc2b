use thiserror::Error;

/// Top-level error type for the tabchat system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for TabchatError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TabchatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data source error: {0}")]
    DataSource(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for TabchatError {
    fn from(err: toml::de::Error) -> Self {
        TabchatError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TabchatError {
    fn from(err: toml::ser::Error) -> Self {
        TabchatError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for TabchatError {
    fn from(err: serde_json::Error) -> Self {
        TabchatError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for tabchat operations.
pub type Result<T> = std::result::Result<T, TabchatError>;
