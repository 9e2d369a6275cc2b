use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the tabchat application.
///
/// Loaded from `~/.tabchat/config.toml` by default. Each section corresponds
/// to one concern: general runtime settings, the reasoning-agent backend,
/// artifact storage, and the chat loop itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabchatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl TabchatConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TabchatConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for generated artifacts and scratch files.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.tabchat/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Reasoning-agent backend settings.
///
/// The access key itself is never stored here: `api_key_env` names the
/// process environment variable it is read from at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Base URL of an OpenAI-compatible chat-completions endpoint.
    pub api_base: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Environment variable the access key is read from.
    pub api_key_env: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// Artifact storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Directory generated chart images are relocated into.
    pub dir: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: "~/.tabchat/artifacts".to_string(),
        }
    }
}

/// Chat loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum question length in characters.
    pub max_question_len: usize,
    /// Assistant greeting shown on a fresh or cleared session.
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_question_len: 2000,
            greeting: "How can I help you with your data?".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TabchatConfig::default();
        assert_eq!(config.agent.model, "gpt-4o-mini");
        assert_eq!(config.agent.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.chat.max_question_len, 2000);
        assert!(!config.chat.greeting.is_empty());
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = TabchatConfig::default();
        config.agent.model = "gpt-4o".to_string();
        config.chat.max_question_len = 500;
        config.save(&path).unwrap();

        let loaded = TabchatConfig::load(&path).unwrap();
        assert_eq!(loaded.agent.model, "gpt-4o");
        assert_eq!(loaded.chat.max_question_len, 500);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(TabchatConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let config = TabchatConfig::load_or_default(&path);
        assert_eq!(config.agent.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_load_or_default_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not = [[[ valid").unwrap();
        let config = TabchatConfig::load_or_default(&path);
        assert_eq!(config.chat.max_question_len, 2000);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[agent]\nmodel = \"local-llm\"\n").unwrap();

        let config = TabchatConfig::load(&path).unwrap();
        assert_eq!(config.agent.model, "local-llm");
        // Untouched sections keep defaults.
        assert_eq!(config.agent.api_base, "https://api.openai.com/v1");
        assert_eq!(config.chat.max_question_len, 2000);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("config.toml");
        TabchatConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }
}
