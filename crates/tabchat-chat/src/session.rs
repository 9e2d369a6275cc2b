//! Session state store.
//!
//! The host re-runs its whole interaction pipeline on every user action and
//! reconstructs its view of the conversation solely from this store. The
//! store is therefore the one long-lived object: sessions are created
//! idempotently on first observation and mutated only through the methods
//! here, which protect the append-only and atomic-reset invariants.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use tabchat_agent::HistoryTurn;
use tabchat_core::TableHandle;

use crate::artifacts::{ArtifactId, ArtifactRegistry};

/// Identifies one end-user session. Stores are keyed by session identity so
/// a multi-session host gets one isolated state pair per user.
pub type SessionId = Uuid;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// The classified body of an assistant response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseVariant {
    Text(String),
    TableRef(TableHandle),
    ImageRef(ArtifactId),
}

/// Exactly one of: the user's question, a classified response, or a
/// user-safe error. Immutable once appended.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePayload {
    Question(String),
    Response(ResponseVariant),
    Error(String),
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    /// Position in the session's message log, stable once appended.
    pub index: usize,
    pub at: DateTime<Utc>,
    pub payload: MessagePayload,
}

// =============================================================================
// Session
// =============================================================================

/// The full conversational state for one user's interactive lifetime.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    messages: Vec<Message>,
    active_artifact: Option<ArtifactId>,
    artifacts: ArtifactRegistry,
    pending: bool,
}

impl Session {
    fn new(id: SessionId, artifact_dir: PathBuf) -> Self {
        Self {
            id,
            messages: Vec::new(),
            active_artifact: None,
            artifacts: ArtifactRegistry::new(artifact_dir),
            pending: false,
        }
    }

    /// The ordered, append-only message log.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The artifact currently selected for the visual pane, if any.
    pub fn active_artifact(&self) -> Option<ArtifactId> {
        self.active_artifact
    }

    pub fn artifacts(&self) -> &ArtifactRegistry {
        &self.artifacts
    }

    pub(crate) fn artifacts_mut(&mut self) -> &mut ArtifactRegistry {
        &mut self.artifacts
    }

    /// Whether an agent call is currently in flight for this session.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub(crate) fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    pub(crate) fn set_active_artifact(&mut self, id: ArtifactId) {
        self.active_artifact = Some(id);
    }

    /// The index the next appended message will receive.
    ///
    /// Use this when something must be keyed by a message that does not
    /// exist yet (artifact registration precedes appending the response
    /// that owns it); never derive indices by arithmetic on earlier ones.
    pub fn next_index(&self) -> usize {
        self.messages.len()
    }

    /// Append a message; returns its index. Callers must use the returned
    /// index rather than computing it independently.
    pub fn append(&mut self, role: Role, payload: MessagePayload) -> usize {
        let index = self.messages.len();
        self.messages.push(Message {
            role,
            index,
            at: Utc::now(),
            payload,
        });
        index
    }

    /// Clear messages, artifact registry, and active artifact together.
    ///
    /// The three always reset as one unit; a registry left populated next to
    /// an empty message log (or vice versa) is an invalid state.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.artifacts.clear();
        self.active_artifact = None;
        self.pending = false;
        info!(session = %self.id, "Session reset");
    }

    /// Prior question/answer turns, summarized for agent context.
    pub fn history_turns(&self) -> Vec<HistoryTurn> {
        let mut turns = Vec::new();
        for pair in self.messages.windows(2) {
            if let MessagePayload::Question(ref question) = pair[0].payload {
                if let Some(answer) = summarize_terminal(&pair[1].payload) {
                    turns.push(HistoryTurn {
                        question: question.clone(),
                        answer,
                    });
                }
            }
        }
        turns
    }
}

/// Summarize a terminal message for history context; `None` for payloads
/// that are not terminal to a question.
fn summarize_terminal(payload: &MessagePayload) -> Option<String> {
    match payload {
        MessagePayload::Response(ResponseVariant::Text(text)) => Some(text.clone()),
        MessagePayload::Response(ResponseVariant::TableRef(table)) => {
            Some(format!("[table: {}]", table.name))
        }
        MessagePayload::Response(ResponseVariant::ImageRef(_)) => {
            Some("[chart image]".to_string())
        }
        MessagePayload::Error(text) => Some(format!("(previous attempt failed: {})", text)),
        MessagePayload::Question(_) => None,
    }
}

// =============================================================================
// SessionStore
// =============================================================================

/// Process-external, re-entrant session state, keyed by session identity.
///
/// One `Session` (message log + artifact registry + active-artifact pointer)
/// per end user; sessions are never shared across users.
#[derive(Debug)]
pub struct SessionStore {
    artifact_dir: PathBuf,
    sessions: HashMap<SessionId, Session>,
}

impl SessionStore {
    /// Create a store whose sessions relocate artifacts into `artifact_dir`.
    pub fn new(artifact_dir: PathBuf) -> Self {
        Self {
            artifact_dir,
            sessions: HashMap::new(),
        }
    }

    /// The session for `id`, created empty the first time it is observed.
    pub fn get_or_create(&mut self, id: SessionId) -> &mut Session {
        self.sessions.entry(id).or_insert_with(|| {
            info!(session = %id, "Session created");
            Session::new(id, self.artifact_dir.clone())
        })
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Atomically reset the session for `id`, if it exists.
    pub fn reset(&mut self, id: SessionId) {
        if let Some(session) = self.sessions.get_mut(&id) {
            session.reset();
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
