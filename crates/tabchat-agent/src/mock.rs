//! Scripted mock reasoning agent.
//!
//! Replays a queued script of replies and failures, for tests and for
//! running the app offline without a backend.

use std::collections::VecDeque;
use std::sync::Mutex;

use tabchat_core::TableHandle;

use crate::error::AgentError;
use crate::{AgentReply, HistoryTurn, ReasoningAgent};

enum Scripted {
    Reply(AgentReply),
    Fail(String),
}

/// Mock agent that pops scripted replies in order. With an empty script it
/// echoes the question, so it can serve as a stand-in backend.
#[derive(Default)]
pub struct MockAgent {
    script: Mutex<VecDeque<Scripted>>,
}

impl MockAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain text reply.
    pub fn push_text(&self, text: &str) {
        self.push(Scripted::Reply(AgentReply::Text(text.to_string())));
    }

    /// Queue a tabular reply.
    pub fn push_table(&self, table: TableHandle) {
        self.push(Scripted::Reply(AgentReply::Table(table)));
    }

    /// Queue a backend failure.
    pub fn push_failure(&self, message: &str) {
        self.push(Scripted::Fail(message.to_string()));
    }

    fn push(&self, entry: Scripted) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(entry);
    }
}

#[async_trait::async_trait]
impl ReasoningAgent for MockAgent {
    async fn ask(
        &self,
        question: &str,
        _history: &[HistoryTurn],
    ) -> Result<AgentReply, AgentError> {
        let next = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Fail(message)) => Err(AgentError::Backend(message)),
            None => Ok(AgentReply::Text(format!("You asked: {}", question))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_script_echoes() {
        let agent = MockAgent::new();
        let reply = agent.ask("how many rows?", &[]).await.unwrap();
        assert_eq!(reply, AgentReply::Text("You asked: how many rows?".to_string()));
    }

    #[tokio::test]
    async fn test_script_replayed_in_order() {
        let agent = MockAgent::new();
        agent.push_text("first");
        agent.push_text("second");

        assert_eq!(
            agent.ask("q", &[]).await.unwrap(),
            AgentReply::Text("first".to_string())
        );
        assert_eq!(
            agent.ask("q", &[]).await.unwrap(),
            AgentReply::Text("second".to_string())
        );
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let agent = MockAgent::new();
        agent.push_failure("connection reset");
        let err = agent.ask("q", &[]).await.unwrap_err();
        assert!(matches!(err, AgentError::Backend(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_scripted_table() {
        let table = TableHandle::from_csv("t", "a\n1\n").unwrap();
        let agent = MockAgent::new();
        agent.push_table(table.clone());
        assert_eq!(agent.ask("q", &[]).await.unwrap(), AgentReply::Table(table));
    }

    #[tokio::test]
    async fn test_failure_then_success() {
        let agent = MockAgent::new();
        agent.push_failure("boom");
        agent.push_text("recovered");

        assert!(agent.ask("q", &[]).await.is_err());
        assert_eq!(
            agent.ask("q", &[]).await.unwrap(),
            AgentReply::Text("recovered".to_string())
        );
    }
}
