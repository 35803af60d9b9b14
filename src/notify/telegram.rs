use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::MessageChannel;
use crate::config::TelegramConfig;
use crate::error::{Result, ScoutError};

/// Telegram Bot API `sendMessage` channel
pub struct TelegramChannel {
    client: Client,
    endpoint: String,
    chat_id: String,
}

impl TelegramChannel {
    pub fn new(config: &TelegramConfig, timeout: Duration) -> Result<Self> {
        if config.bot_token.trim().is_empty() || config.chat_id.trim().is_empty() {
            return Err(ScoutError::Config(
                "Telegram bot token and chat id are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScoutError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                config.api_base.trim_end_matches('/'),
                config.bot_token
            ),
            chat_id: config.chat_id.clone(),
        })
    }
}

#[async_trait]
impl MessageChannel for TelegramChannel {
    async fn send_text(&self, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        // Strip the URL from transport errors, it carries the bot token
        let response = self
            .client
            .post(&self.endpoint)
            .form(&payload)
            .send()
            .await
            .map_err(|e| ScoutError::NotifyDispatch(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!("Telegram accepted {} chars", text.chars().count());
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let reason = serde_json::from_str::<ApiError>(&body)
            .ok()
            .and_then(|e| e.description)
            .unwrap_or(body);
        Err(ScoutError::NotifyDispatch(format!(
            "Telegram returned {status}: {reason}"
        )))
    }

    fn channel_name(&self) -> &'static str {
        "Telegram"
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

#[derive(serde::Deserialize)]
struct ApiError {
    description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: &str, chat: &str) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.to_string(),
            chat_id: chat.to_string(),
            api_base: "https://api.telegram.org/".to_string(),
        }
    }

    #[test]
    fn builds_send_message_endpoint() {
        let channel = TelegramChannel::new(&config("123:abc", "-100"), Duration::from_secs(5)).unwrap();
        assert_eq!(channel.endpoint, "https://api.telegram.org/bot123:abc/sendMessage");
        assert_eq!(channel.chat_id, "-100");
    }

    #[test]
    fn empty_credentials_are_config_errors() {
        let err = TelegramChannel::new(&config("", "-100"), Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, ScoutError::Config(_)));
    }

    #[test]
    fn form_payload_carries_flags() {
        let payload = SendMessage {
            chat_id: "-100",
            text: "hi & bye",
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };
        let encoded = serde_json::to_value(&payload).unwrap();
        assert_eq!(encoded["parse_mode"], "HTML");
        assert_eq!(encoded["disable_web_page_preview"], true);
        assert_eq!(encoded["text"], "hi & bye");
    }
}
