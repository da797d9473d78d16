//! Telegram Bot API gateway

use super::{GatewayError, InlineKeyboard, MessagingGateway};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound client for the Telegram Bot API
pub struct TelegramGateway {
    client: Client,
    base_url: String,
}

impl TelegramGateway {
    /// `api_base` is normally `https://api.telegram.org`; tests point it at
    /// a local server.
    pub fn new(api_base: &str, token: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: format!("{}/bot{token}", api_base.trim_end_matches('/')),
        }
    }

    async fn post<T: Serialize + Sync>(&self, method: &str, payload: &T) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Http { status });
        }
        Ok(())
    }
}

#[async_trait]
impl MessagingGateway for TelegramGateway {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), GatewayError> {
        self.post(
            "sendMessage",
            &SendMessage {
                chat_id,
                text,
                reply_markup: keyboard,
            },
        )
        .await
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), GatewayError> {
        self.post(
            "answerCallbackQuery",
            &AnswerCallbackQuery {
                callback_query_id: callback_id,
                text,
            },
        )
        .await
    }
}

// Telegram API payloads

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboard>,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackQuery<'a> {
    callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_lands_in_the_url() {
        let gateway = TelegramGateway::new("https://api.telegram.org/", "123:abc");
        assert_eq!(gateway.base_url, "https://api.telegram.org/bot123:abc");
    }

    #[test]
    fn send_message_payload_omits_missing_keyboard() {
        let payload = SendMessage {
            chat_id: 42,
            text: "hello",
            reply_markup: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"chat_id": 42, "text": "hello"}));
    }
}
