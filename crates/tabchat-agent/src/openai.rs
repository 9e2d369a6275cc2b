//! OpenAI-compatible reasoning agent.
//!
//! Sends the grounding-table schema, prior turns, and the question to a
//! chat-completions endpoint and returns the first choice's content as a
//! text reply. Any OpenAI-compatible server works via `api_base`.

use serde_json::{json, Value};
use tracing::debug;

use tabchat_core::config::AgentConfig;
use tabchat_core::DataSource;

use crate::error::AgentError;
use crate::{AgentReply, HistoryTurn, ReasoningAgent};

/// Reasoning agent backed by an OpenAI-compatible chat-completions API.
#[derive(Debug)]
pub struct OpenAiAgent {
    client: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
    system_prompt: String,
}

impl OpenAiAgent {
    /// Build an agent from configuration, reading the access key from the
    /// configured environment variable.
    ///
    /// A missing or empty key is a fatal configuration error: the caller
    /// must surface it before any question can be asked.
    pub fn from_env(config: &AgentConfig) -> Result<Self, AgentError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentError::MissingCredential(config.api_key_env.clone()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            system_prompt: default_system_prompt(""),
        })
    }

    /// Ground the agent on a data source's schema.
    pub fn with_tables(mut self, source: &DataSource) -> Self {
        self.system_prompt = default_system_prompt(&source.describe());
        self
    }

    fn build_request(&self, question: &str, history: &[HistoryTurn]) -> Value {
        let mut messages = vec![json!({"role": "system", "content": self.system_prompt})];
        for turn in history {
            messages.push(json!({"role": "user", "content": turn.question}));
            messages.push(json!({"role": "assistant", "content": turn.answer}));
        }
        messages.push(json!({"role": "user", "content": question}));

        json!({
            "model": self.model,
            "temperature": 0,
            "messages": messages,
        })
    }
}

#[async_trait::async_trait]
impl ReasoningAgent for OpenAiAgent {
    async fn ask(
        &self,
        question: &str,
        history: &[HistoryTurn],
    ) -> Result<AgentReply, AgentError> {
        let body = self.build_request(question, history);
        debug!(model = %self.model, history_turns = history.len(), "Dispatching agent request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response.json().await?;
        if !status.is_success() {
            return Err(AgentError::Backend(format!(
                "{}: {}",
                status,
                payload
                    .pointer("/error/message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown backend error")
            )));
        }

        let content = parse_content(&payload)?;
        Ok(AgentReply::Text(content))
    }
}

/// Extract the first choice's message content from a chat-completions
/// response.
fn parse_content(payload: &Value) -> Result<String, AgentError> {
    payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| AgentError::InvalidResponse("response has no message content".to_string()))
}

fn default_system_prompt(schema: &str) -> String {
    let grounding = if schema.is_empty() {
        String::new()
    } else {
        format!(" You are grounded on: {}.", schema)
    };
    format!(
        "You answer questions about tabular data.{} Reply with a concise \
         answer. If you generated a chart image, reply with only its file path.",
        grounding
    )
}
