//! Outbound messaging gateway
//!
//! The dialogue runtime talks to the chat platform through this seam; the
//! Telegram implementation lives in `telegram`, tests substitute a
//! recording double.

mod telegram;
mod types;

pub use telegram::TelegramGateway;
pub use types::{InlineKeyboard, KeyboardButton};

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway returned HTTP {status}")]
    Http { status: reqwest::StatusCode },
}

/// Messaging platform seam: send messages, acknowledge button presses
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), GatewayError>;

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), GatewayError>;
}

#[async_trait]
impl<T: MessagingGateway + ?Sized> MessagingGateway for Arc<T> {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), GatewayError> {
        (**self).send_text(chat_id, text, keyboard).await
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), GatewayError> {
        (**self).answer_callback(callback_id, text).await
    }
}
