//! Configuration management for chatroom.
//!
//! Loads configuration from ${CHATROOM_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chatroom_types::{DEFAULT_ASSISTANT_SENDER, DEFAULT_SELF_SENDER};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for chatroom configuration and data directories.
    //!
    //! CHATROOM_HOME resolution order:
    //! 1. CHATROOM_HOME environment variable (if set)
    //! 2. ~/.config/chatroom (default)

    use std::path::PathBuf;

    /// Returns the chatroom home directory.
    pub fn chatroom_home() -> PathBuf {
        if let Ok(home) = std::env::var("CHATROOM_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("chatroom"))
            .unwrap_or_else(|| PathBuf::from(".chatroom"))
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        chatroom_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        chatroom_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend HTTP API.
    pub api_base_url: String,

    /// Base URL of the live update websocket.
    pub ws_base_url: String,

    /// Sender name attached to outbound messages.
    pub self_sender: String,

    /// Sender name of the automated responder.
    pub assistant_sender: String,

    /// Seconds before the typing indicator is forcibly cleared.
    pub typing_timeout_secs: u64,

    /// HTTP request timeout in seconds (0 disables).
    pub request_timeout_secs: u64,
}

impl Config {
    const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
    const DEFAULT_WS_BASE_URL: &str = "ws://localhost:8000";
    const DEFAULT_TYPING_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

    /// Loads configuration from the default config path, then applies
    /// `CHATROOM_API_BASE_URL` / `CHATROOM_WS_BASE_URL`.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&paths::config_path())?;
        config.apply_overrides(
            std::env::var("CHATROOM_API_BASE_URL").ok(),
            std::env::var("CHATROOM_WS_BASE_URL").ok(),
        );
        Ok(config)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Replaces the base URLs when an override is given. Blank values are ignored.
    pub fn apply_overrides(&mut self, api_base_url: Option<String>, ws_base_url: Option<String>) {
        if let Some(url) = api_base_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(url) = ws_base_url.filter(|u| !u.trim().is_empty()) {
            self.ws_base_url = url.trim().to_string();
        }
    }

    pub fn typing_timeout(&self) -> Duration {
        Duration::from_secs(self.typing_timeout_secs)
    }

    /// Returns None when the timeout is disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Writes the commented default template to `path`.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            ws_base_url: Self::DEFAULT_WS_BASE_URL.to_string(),
            self_sender: DEFAULT_SELF_SENDER.to_string(),
            assistant_sender: DEFAULT_ASSISTANT_SENDER.to_string(),
            typing_timeout_secs: Self::DEFAULT_TYPING_TIMEOUT_SECS,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}
