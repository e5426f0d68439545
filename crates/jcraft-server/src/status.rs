//! Server-list status JSON.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::json;
use tracing::warn;

use jcraft_proto::{GAME_VERSION, PROTOCOL_VERSION};

use crate::config::ServerConfig;

/// Build the status-response document for the current player count.
pub fn build_status_json(config: &ServerConfig, online: usize) -> String {
    let mut status = json!({
        "version": {
            "name": GAME_VERSION,
            "protocol": PROTOCOL_VERSION,
        },
        "players": {
            "max": config.server.max_players,
            "online": online,
        },
        "description": {
            "text": config.server.motd,
        },
    });
    if let Some(favicon) = load_favicon(config) {
        status["favicon"] = json!(favicon);
    }
    status.to_string()
}

/// Base64 data URL for the configured favicon PNG, if any.
fn load_favicon(config: &ServerConfig) -> Option<String> {
    let path = config.status.favicon.as_deref()?;
    match std::fs::read(path) {
        Ok(bytes) => Some(format!("data:image/png;base64,{}", STANDARD.encode(bytes))),
        Err(e) => {
            warn!("failed to read favicon {path}: {e}");
            None
        }
    }
}
