// Client options passed in from the hosting page
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

/// Options for a client instance. Every field is optional on the JS side.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptions {
    /// Game server address, with or without a `ws://`/`wss://` scheme.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Display name sent with `join_game`. A guest name is generated when absent.
    #[serde(default)]
    pub username: Option<String>,
    /// Static world image drawn behind the players.
    #[serde(default = "default_background_url")]
    pub background_url: String,
    #[serde(default = "default_world_size")]
    pub world_width: f32,
    #[serde(default = "default_world_size")]
    pub world_height: f32,
    /// Rendered avatar width in pixels; height follows the image aspect ratio.
    #[serde(default = "default_avatar_size")]
    pub avatar_size: f32,
    /// Space between the top of an avatar and its name label.
    #[serde(default = "default_label_gap")]
    pub label_gap: f32,
    #[serde(default = "default_label_font")]
    pub label_font: String,
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: i32,
}

impl ClientOptions {
    /// Decode options from a JS object. `undefined` and `null` give the defaults.
    pub fn from_js(value: JsValue) -> Result<Self, JsValue> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        serde_wasm_bindgen::from_value(value).map_err(JsValue::from)
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            username: None,
            background_url: default_background_url(),
            world_width: default_world_size(),
            world_height: default_world_size(),
            avatar_size: default_avatar_size(),
            label_gap: default_label_gap(),
            label_font: default_label_font(),
            reconnect_delay_ms: default_reconnect_delay(),
        }
    }
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
fn default_label_gap() -> f32 {
    5.0
}
fn default_label_font() -> String {
    "bold 14px Arial".to_string()
}
fn default_reconnect_delay() -> i32 {
    3000
}
