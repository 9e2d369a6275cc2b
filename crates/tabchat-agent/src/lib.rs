//! Reasoning-agent seam for tabchat.
//!
//! The agent is a black box that turns a natural-language question plus
//! grounding tables into a raw answer: plain text, a filesystem path to a
//! generated image, or a tabular result. Backends implement `ReasoningAgent`;
//! the chat core never looks behind the trait.

pub mod error;
pub mod mock;
pub mod openai;

use async_trait::async_trait;

use tabchat_core::TableHandle;

pub use error::AgentError;
pub use mock::MockAgent;
pub use openai::OpenAiAgent;

/// The heterogeneous raw result an agent call produces.
///
/// A `Text` reply may be a plain answer or a path to an image file the
/// agent wrote; telling those apart is the classifier's job, not the
/// agent's.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentReply {
    Text(String),
    Table(TableHandle),
}

/// One prior question/answer turn, passed to agents that use history for
/// context.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryTurn {
    pub question: String,
    pub answer: String,
}

/// A natural-language-to-data reasoning backend.
#[async_trait]
pub trait ReasoningAgent: Send + Sync {
    /// Answer one question, optionally using prior turns for context.
    async fn ask(
        &self,
        question: &str,
        history: &[HistoryTurn],
    ) -> Result<AgentReply, AgentError>;
}
