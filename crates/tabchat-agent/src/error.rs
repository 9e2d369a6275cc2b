//! Error types for reasoning-agent backends.

use tabchat_core::TabchatError;

/// Errors from a reasoning-agent call.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("access key not set: environment variable {0} is missing or empty")]
    MissingCredential(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<AgentError> for TabchatError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::MissingCredential(_) => TabchatError::Config(err.to_string()),
            other => TabchatError::Agent(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        AgentError::Http(err.to_string())
    }
}
