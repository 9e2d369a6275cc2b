//! Rendering arbitration.
//!
//! Projects a session's message log into render instructions for the chat
//! pane and a state for the secondary visual pane. Projection is pure: the
//! same session always yields the same instructions. The only state
//! transition here is the explicit per-message image toggle, which moves the
//! session's active-artifact pointer.

use std::path::PathBuf;

use tabchat_core::TableHandle;

use crate::artifacts::ArtifactId;
use crate::error::ChatError;
use crate::session::{MessagePayload, ResponseVariant, Session};

/// One paint instruction for the chat pane.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderInstruction {
    /// The user's question, in the user's turn.
    UserText { index: usize, text: String },
    /// A plain answer, in the assistant's turn.
    AssistantText { index: usize, text: String },
    /// A tabular answer.
    AssistantTable { index: usize, table: TableHandle },
    /// A chart answer: a toggle control, selected when this message's
    /// artifact is the one on the visual pane.
    AssistantImageToggle {
        index: usize,
        artifact: ArtifactId,
        selected: bool,
    },
    /// A user-safe error, in the assistant's turn.
    AssistantError { index: usize, text: String },
}

/// What the secondary visual pane shows.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualPane {
    /// Nothing selected.
    Empty,
    /// The active artifact, resolved to an existing file.
    Image { artifact: ArtifactId, path: PathBuf },
    /// The active artifact's file is gone; recoverable display error.
    Missing { artifact: ArtifactId },
}

/// Project the session's messages into chat-pane instructions.
pub fn render_chat(session: &Session) -> Vec<RenderInstruction> {
    session
        .messages()
        .iter()
        .map(|message| match &message.payload {
            MessagePayload::Question(text) => RenderInstruction::UserText {
                index: message.index,
                text: text.clone(),
            },
            MessagePayload::Response(ResponseVariant::Text(text)) => {
                RenderInstruction::AssistantText {
                    index: message.index,
                    text: text.clone(),
                }
            }
            MessagePayload::Response(ResponseVariant::TableRef(table)) => {
                RenderInstruction::AssistantTable {
                    index: message.index,
                    table: table.clone(),
                }
            }
            MessagePayload::Response(ResponseVariant::ImageRef(artifact)) => {
                RenderInstruction::AssistantImageToggle {
                    index: message.index,
                    artifact: *artifact,
                    selected: session.active_artifact() == Some(*artifact),
                }
            }
            MessagePayload::Error(text) => RenderInstruction::AssistantError {
                index: message.index,
                text: text.clone(),
            },
        })
        .collect()
}

/// Toggle a message's artifact onto the visual pane.
///
/// This is the only transition of the active-artifact pointer; it never
/// moves on its own when new answers arrive.
pub fn toggle_artifact(session: &mut Session, message_index: usize) -> Result<(), ChatError> {
    if message_index >= session.messages().len() {
        return Err(ChatError::UnknownMessage(message_index));
    }
    let artifact = session
        .artifacts()
        .lookup(message_index)
        .ok_or(ChatError::NoArtifact(message_index))?;
    let id = artifact.id;
    session.set_active_artifact(id);
    Ok(())
}

/// Resolve the visual pane from the session's active-artifact pointer.
///
/// A registered artifact whose file has disappeared renders as `Missing`,
/// not as a failure.
pub fn render_visual(session: &Session) -> VisualPane {
    let Some(active) = session.active_artifact() else {
        return VisualPane::Empty;
    };
    match session.artifacts().lookup_id(active) {
        Some(artifact) if artifact.path.is_file() => VisualPane::Image {
            artifact: active,
            path: artifact.path.clone(),
        },
        _ => VisualPane::Missing { artifact: active },
    }
}

// =============================================================================
// Tests
// =============================================================================
