//! Error types for the chat orchestration layer.

use tabchat_core::TabchatError;

/// Errors from the chat core.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("a question is already in flight for this session")]
    Busy,
    #[error("question cannot be empty")]
    EmptyQuestion,
    #[error("question exceeds maximum length of {0} characters")]
    QuestionTooLong(usize),
    #[error("message {0} does not exist")]
    UnknownMessage(usize),
    #[error("message {0} has no artifact")]
    NoArtifact(usize),
    #[error("artifact error: {0}")]
    Artifact(String),
}

impl From<ChatError> for TabchatError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Artifact(msg) => TabchatError::Artifact(msg),
            other => TabchatError::Chat(other.to_string()),
        }
    }
}
