//! Host configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Root configuration structure (`host.toml`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HostConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

impl HostConfig {
    /// Load configuration from `path`, writing the defaults there if it is missing.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bind address.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

/// Options handed to the browser client as `/client-config.json`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Game server WebSocket address.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_background_url")]
    pub background_url: String,
    #[serde(default = "default_world_size")]
    pub world_width: f32,
    #[serde(default = "default_world_size")]
    pub world_height: f32,
    #[serde(default = "default_avatar_size")]
    pub avatar_size: f32,
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: i32,
}

impl ClientConfig {
    /// The options object in the shape the browser client decodes.
    pub fn to_client_json(&self) -> serde_json::Value {
        serde_json::json!({
            "serverUrl": self.server_url,
            "backgroundUrl": self.background_url,
            "worldWidth": self.world_width,
            "worldHeight": self.world_height,
            "avatarSize": self.avatar_size,
            "reconnectDelayMs": self.reconnect_delay_ms,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            background_url: default_background_url(),
            world_width: default_world_size(),
            world_height: default_world_size(),
            avatar_size: default_avatar_size(),
            reconnect_delay_ms: default_reconnect_delay(),
        }
    }
}

fn default_port() -> u16 {
    3000
}
fn default_bind() -> String {
    "0.0.0.0".to_string()
}
fn default_server_url() -> String {
    "localhost:8080".to_string()
}
fn default_background_url() -> String {
    "assets/world.png".to_string()
}
fn default_world_size() -> f32 {
    2048.0
}
fn default_avatar_size() -> f32 {
    64.0
}
fn default_reconnect_delay() -> i32 {
    3000
}
