// config.rs — Daemon configuration from tally.toml.
//
// Everything has a sensible default; a missing file just means "local
// polling bot with goals.json next to the binary". The bot token is NOT
// configured here — it comes from the BOT_TOKEN environment variable so
// the secret never lands in a config file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// How updates reach the bot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Long-poll getUpdates. The default; needs no public endpoint.
    #[default]
    Polling,

    /// Telegram POSTs updates to `<webhook_url>/webhook/<token>`.
    Webhook,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub conversation: ConversationConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub mode: UpdateMode,

    /// Externally reachable base URL, required in webhook mode.
    pub webhook_url: Option<String>,

    /// Listen address for the webhook server.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the goals JSON document.
    #[serde(default = "default_goals_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Idle seconds before an abandoned dialog is dropped.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_goals_path() -> PathBuf {
    PathBuf::from("goals.json")
}

fn default_idle_timeout_secs() -> u64 {
    30 * 60
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_goals_path(),
        }
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

impl TallyConfig {
    /// Load the config file, or fall back to defaults when it's absent.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_a_local_polling_bot() {
        let config = TallyConfig::default();
        assert_eq!(config.telegram.mode, UpdateMode::Polling);
        assert_eq!(config.storage.path, PathBuf::from("goals.json"));
        assert_eq!(config.conversation.idle_timeout_secs, 1800);
    }

    #[test]
    fn partial_file_keeps_section_defaults() {
        let config: TallyConfig = toml::from_str(
            r#"
            [telegram]
            mode = "webhook"
            webhook_url = "https://bot.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.telegram.mode, UpdateMode::Webhook);
        assert_eq!(
            config.telegram.webhook_url.as_deref(),
            Some("https://bot.example.com")
        );
        assert_eq!(config.telegram.listen_addr, "0.0.0.0:8000");
        assert_eq!(config.storage.path, PathBuf::from("goals.json"));
    }

    #[test]
    fn full_file_round_trips() {
        let config: TallyConfig = toml::from_str(
            r#"
            [telegram]
            mode = "polling"
            listen_addr = "127.0.0.1:9000"

            [storage]
            path = "/var/lib/tally/goals.json"

            [conversation]
            idle_timeout_secs = 600
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/tally/goals.json"));
        assert_eq!(config.conversation.idle_timeout_secs, 600);
        assert_eq!(config.telegram.listen_addr, "127.0.0.1:9000");
    }

    #[test]
    fn load_or_default_handles_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = TallyConfig::load_or_default(&dir.path().join("tally.toml")).unwrap();
        assert_eq!(config.telegram.mode, UpdateMode::Polling);
    }
}
