use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ChorusError, Result};
use crate::types::SIMPLE_AI_ID;

/// Top-level configuration for the Chorus application.
///
/// Loaded from `~/.chorus/config.toml` by default. Every section is optional;
/// missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChorusConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl ChorusConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ChorusConfig = toml::from_str(&content)?;
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
        let content =
            toml::to_string_pretty(self).map_err(|e| ChorusError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding the SQLite database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// HTTP port (bound on 127.0.0.1).
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.chorus/data".to_string(),
            log_level: "info".to_string(),
            port: 3040,
        }
    }
}

/// Conversation store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// How many of the most recent records a bot session loads as its corpus.
    pub corpus_limit: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { corpus_limit: 1000 }
    }
}

/// Chat fan-out settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Upper bound on one bot's respond (generate + persist + reload).
    pub respond_timeout_ms: u64,
    /// Maximum accepted message length in characters.
    pub max_message_length: usize,
    /// Bot ids selected when the orchestrator starts.
    pub default_selection: Vec<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            respond_timeout_ms: 5000,
            max_message_length: 2000,
            default_selection: vec![SIMPLE_AI_ID.to_string()],
        }
    }
}
