//! Conversational query orchestration for tabchat.
//!
//! Holds durable per-session state across repeated re-executions of the host
//! program, dispatches questions to a reasoning agent, classifies the
//! heterogeneous results, manages generated chart artifacts, and decides what
//! is rendered where.

pub mod artifacts;
pub mod classify;
pub mod dispatch;
pub mod error;
pub mod render;
pub mod session;

pub use artifacts::{Artifact, ArtifactId, ArtifactRegistry};
pub use classify::{classify, Classified};
pub use dispatch::Dispatcher;
pub use error::ChatError;
pub use render::{render_chat, render_visual, toggle_artifact, RenderInstruction, VisualPane};
pub use session::{Message, MessagePayload, ResponseVariant, Role, Session, SessionId, SessionStore};
