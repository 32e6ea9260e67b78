use anyhow::{bail, Result};

/// Relay runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token
    pub telegram_bot_token: String,
    /// Immich API key
    pub immich_token: String,
    /// Immich server base URL
    pub immich_server: String,
    /// Chats allowed to trigger uploads; `None` means every chat
    pub allowed_chat_ids: Option<Vec<i64>>,
    /// Port for the health/metrics sidecar
    pub metrics_port: u16,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing or empty required variables are fatal. `ALLOWED_CHAT_IDS`
    /// distinguishes unset (every chat allowed) from set-but-empty (no chat
    /// allowed).
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            telegram_bot_token: required("TELEGRAM_BOT_TOKEN")?,
            immich_token: required("IMMICH_TOKEN")?,
            immich_server: required("IMMICH_SERVER")?,
            allowed_chat_ids: std::env::var("ALLOWED_CHAT_IDS")
                .ok()
                .map(|raw| parse_chat_ids(&raw)),
            metrics_port: metrics_port(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Sidecar port, shared by `serve` and `status`.
pub fn metrics_port() -> u16 {
    std::env::var("METRICS_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}

fn required(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => bail!("{name} is not set"),
    }
}

/// Parse a comma-separated chat-ID list, stripping spaces and silently
/// skipping entries that are not integers.
fn parse_chat_ids(raw: &str) -> Vec<i64> {
    raw.replace(' ', "")
        .split(',')
        .filter_map(|id| id.parse().ok())
        .collect()
}
