use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, ScoutError};

pub const LISTING_URL: &str = "https://www.mobile.bg/obiavi/avtomobili-dzhipove/bmw/240";
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const DB_PATH: &str = "listings.db";
pub const NOTIFY_LABEL: &str = "BMW 240";

/// Browser-like identification sent with the listing page request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Telegram rejects messages above 4096 characters; keep some headroom.
pub const MAX_MESSAGE_CHARS: usize = 4000;

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listing_url: String,
    pub db_path: PathBuf,
    /// Label shown in the notification header (NOTIFY_LABEL)
    pub notify_label: String,
    pub http_timeout: Duration,
    pub telegram: TelegramConfig,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = get("TELEGRAM_BOT_TOKEN");
        let chat_id = get("TELEGRAM_CHAT_ID");
        let (bot_token, chat_id) = match (bot_token, chat_id) {
            (Some(token), Some(chat)) => (token, chat),
            (token, chat) => {
                let missing: Vec<&str> = [
                    ("TELEGRAM_BOT_TOKEN", token.is_none()),
                    ("TELEGRAM_CHAT_ID", chat.is_none()),
                ]
                .iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| *name)
                .collect();
                return Err(ScoutError::Config(format!(
                    "Telegram credentials not found in environment: {}",
                    missing.join(", ")
                )));
            }
        };

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                ScoutError::Config(format!("HTTP_TIMEOUT_SECS must be a whole number, got {raw:?}"))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            listing_url: get("LISTING_URL").unwrap_or_else(|| LISTING_URL.to_string()),
            db_path: get("LISTINGS_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DB_PATH)),
            notify_label: get("NOTIFY_LABEL").unwrap_or_else(|| NOTIFY_LABEL.to_string()),
            http_timeout: Duration::from_secs(http_timeout_secs),
            telegram: TelegramConfig {
                bot_token,
                chat_id,
                api_base: get("TELEGRAM_API_BASE")
                    .unwrap_or_else(|| TELEGRAM_API_BASE.to_string()),
            },
        })
    }
}
