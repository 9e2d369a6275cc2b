//! Query dispatcher.
//!
//! The single blocking point of the system: appends the user's question,
//! invokes the reasoning agent exactly once, and always finishes the turn
//! with exactly one terminal response or error message. Agent failures stop
//! here; nothing raises past the dispatcher into rendering.

use std::sync::Arc;

use tracing::{info, warn};

use tabchat_agent::ReasoningAgent;

use crate::classify::{classify, Classified};
use crate::error::ChatError;
use crate::session::{MessagePayload, ResponseVariant, Role, SessionId, SessionStore};

/// User-safe text appended when the agent call fails. The raw error is
/// logged, never shown or propagated.
const DISPATCH_FAILURE_TEXT: &str =
    "I couldn't answer that question. Please try again.";

/// User-safe text appended when a generated chart could not be registered.
const ARTIFACT_FAILURE_TEXT: &str =
    "The chart for this answer could not be saved. Please try again.";

/// Dispatches questions to the reasoning agent and records the outcome.
pub struct Dispatcher {
    agent: Arc<dyn ReasoningAgent>,
    max_question_len: usize,
}

impl Dispatcher {
    pub fn new(agent: Arc<dyn ReasoningAgent>, max_question_len: usize) -> Self {
        Self {
            agent,
            max_question_len,
        }
    }

    /// Ask one question for the given session.
    ///
    /// Returns the index of the terminal message (response or error). The
    /// question message is appended before the agent is called, so the
    /// user's turn is visible even if the call fails; every accepted
    /// question ends in exactly one terminal message.
    pub async fn ask(
        &self,
        store: &mut SessionStore,
        session_id: SessionId,
        question: &str,
    ) -> Result<usize, ChatError> {
        // At most one in-flight call per session; rejected before any
        // state mutation.
        let session = store.get_or_create(session_id);
        if session.is_pending() {
            return Err(ChatError::Busy);
        }

        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyQuestion);
        }
        if question.len() > self.max_question_len {
            return Err(ChatError::QuestionTooLong(self.max_question_len));
        }

        let history = session.history_turns();
        session.append(Role::User, MessagePayload::Question(question.to_string()));
        session.set_pending(true);

        let outcome = self.agent.ask(question, &history).await;

        let session = store.get_or_create(session_id);
        let payload = match outcome {
            Ok(reply) => match classify(&reply) {
                Classified::Text(text) => MessagePayload::Response(ResponseVariant::Text(text)),
                Classified::Table(table) => {
                    MessagePayload::Response(ResponseVariant::TableRef(table))
                }
                Classified::Image(path) => {
                    let owning = session.next_index();
                    match session.artifacts_mut().register(&path, owning) {
                        Ok(artifact) => {
                            info!(session = %session_id, artifact = %artifact.id, "Chart registered");
                            MessagePayload::Response(ResponseVariant::ImageRef(artifact.id))
                        }
                        Err(e) => {
                            warn!(session = %session_id, error = %e, "Artifact registration failed");
                            MessagePayload::Error(ARTIFACT_FAILURE_TEXT.to_string())
                        }
                    }
                }
            },
            Err(e) => {
                warn!(session = %session_id, error = %e, "Agent call failed");
                MessagePayload::Error(DISPATCH_FAILURE_TEXT.to_string())
            }
        };

        let index = session.append(Role::Assistant, payload);
        session.set_pending(false);
        Ok(index)
    }
}

// =============================================================================
// Tests
// =============================================================================
