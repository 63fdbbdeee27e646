//! Configuration for the chat action layer.

use crate::api::ChatActionSender;
use crate::controller::{ChatActionsController, DEFAULT_REPEAT_INTERVAL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Top-level chat action configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatActionConfig {
    /// Whether outbound requests show chat actions automatically.
    pub auto_chat_action: bool,
    /// Seconds between repeated chat actions (minimum 1).
    pub repeat_interval_secs: u64,
}

impl Default for ChatActionConfig {
    fn default() -> Self {
        Self {
            auto_chat_action: true,
            repeat_interval_secs: DEFAULT_REPEAT_INTERVAL.as_secs(),
        }
    }
}

impl ChatActionConfig {
    pub fn repeat_interval(&self) -> Duration {
        Duration::from_secs(self.repeat_interval_secs)
    }

    /// Build a controller that emits through `sender` with these settings.
    pub fn build_controller(&self, sender: Arc<dyn ChatActionSender>) -> ChatActionsController {
        ChatActionsController::new(sender).with_repeat_interval(self.repeat_interval())
    }

    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::ChatActionError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ChatActionError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/chat-action/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config)
                .join("chat-action")
                .join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("chat-action")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/chat-action-config/config.toml")
        }
    }
}
