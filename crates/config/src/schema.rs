use std::{net::SocketAddr, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FanpostConfig {
    pub server: ServerConfig,
    pub delivery: DeliveryConfig,
    pub telegram: TelegramConfig,
    /// Directory holding the subscription registry. Defaults to the per-user
    /// data directory.
    pub data_dir: Option<PathBuf>,
}

/// HTTP boundary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 5000,
        }
    }
}

/// Fan-out behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Cap on concurrent per-subscriber delivery attempts.
    pub max_in_flight: usize,
    /// Per-subscriber timeout, applied to the fetch and the send separately.
    pub attempt_timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 8,
            attempt_timeout_secs: 30,
        }
    }
}

impl DeliveryConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }
}

/// Chat-platform settings. The bot token itself always comes from the
/// environment, never from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Name of the environment variable holding the bot token.
    pub token_env: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token_env: "TELEGRAM_BOT_TOKEN".into(),
        }
    }
}

impl FanpostConfig {
    /// Path of the persisted subscription registry.
    pub fn registry_path(&self) -> PathBuf {
        self.resolved_data_dir().join("subscriptions.json")
    }

    /// Socket address the HTTP boundary binds to.
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.bind, self.server.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid bind address {addr}: {e}"))
    }

    fn resolved_data_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.data_dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("", "", "fanpost")
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
