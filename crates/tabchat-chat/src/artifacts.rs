//! Artifact registry: durable identity for generated chart images.
//!
//! Agents communicate image results as filesystem paths and happily reuse the
//! same filename for different answers. The registry gives every registered
//! image a fresh uuid-keyed identity and relocates the file under that
//! identity, so two messages can never resolve to the same live artifact.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ChatError;

/// Unique identity of a generated artifact within a session lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A generated visual result owned by one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub id: ArtifactId,
    /// Storage location after relocation; unique per artifact.
    pub path: PathBuf,
    /// Index of the message this artifact belongs to.
    pub owning_message: usize,
}

/// Registry mapping message indices to artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactRegistry {
    dir: PathBuf,
    by_message: HashMap<usize, Artifact>,
}

impl ArtifactRegistry {
    /// Create an empty registry that relocates files into `dir`.
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            by_message: HashMap::new(),
        }
    }

    /// Register the image at `source` for the message at `message_index`.
    ///
    /// The file is moved to a fresh uuid-keyed path inside the registry
    /// directory at registration time. Relocating every registration (not
    /// only on detected reuse) means an agent overwriting its scratch file
    /// between answers can never clobber an already-registered artifact.
    pub fn register(&mut self, source: &Path, message_index: usize) -> Result<Artifact, ChatError> {
        if self.by_message.contains_key(&message_index) {
            return Err(ChatError::Artifact(format!(
                "message {} already owns an artifact",
                message_index
            )));
        }

        let id = ArtifactId::new();
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png")
            .to_lowercase();
        let target = self.dir.join(format!("chart_{}.{}", id, ext));

        std::fs::create_dir_all(&self.dir)
            .map_err(|e| ChatError::Artifact(format!("cannot create {}: {}", self.dir.display(), e)))?;
        relocate(source, &target)?;
        debug!(from = %source.display(), to = %target.display(), "Artifact relocated");

        let artifact = Artifact {
            id,
            path: target,
            owning_message: message_index,
        };
        self.by_message.insert(message_index, artifact.clone());
        Ok(artifact)
    }

    /// The artifact owned by the message at `message_index`, if any.
    pub fn lookup(&self, message_index: usize) -> Option<&Artifact> {
        self.by_message.get(&message_index)
    }

    /// The artifact with the given id, if any.
    pub fn lookup_id(&self, id: ArtifactId) -> Option<&Artifact> {
        self.by_message.values().find(|a| a.id == id)
    }

    /// Deregister all artifacts. Underlying files are left on disk; removing
    /// them is the host's cleanup policy, not a correctness requirement.
    pub fn clear(&mut self) {
        if !self.by_message.is_empty() {
            debug!(count = self.by_message.len(), "Artifact registry cleared");
        }
        self.by_message.clear();
    }

    pub fn len(&self) -> usize {
        self.by_message.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_message.is_empty()
    }
}

/// Move `source` to `target`, falling back to copy + remove where a rename
/// crosses filesystems.
fn relocate(source: &Path, target: &Path) -> Result<(), ChatError> {
    if std::fs::rename(source, target).is_ok() {
        return Ok(());
    }
    std::fs::copy(source, target).map_err(|e| {
        ChatError::Artifact(format!(
            "cannot relocate {} to {}: {}",
            source.display(),
            target.display(),
            e
        ))
    })?;
    if let Err(e) = std::fs::remove_file(source) {
        warn!(path = %source.display(), error = %e, "Could not remove artifact source after copy");
    }
    Ok(())
}
