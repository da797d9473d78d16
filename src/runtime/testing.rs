//! Test doubles shared by dispatcher tests

use crate::catalog::{CatalogClient, CatalogItem, UpstreamError};
use crate::gateway::{GatewayError, InlineKeyboard, MessagingGateway};
use async_trait::async_trait;
use std::sync::Mutex;

/// Gateway that records outbound traffic instead of sending it
#[derive(Default)]
pub struct RecordingGateway {
    pub sent: Mutex<Vec<SentMessage>>,
    pub acks: Mutex<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub has_keyboard: bool,
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), GatewayError> {
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            has_keyboard: keyboard.is_some(),
        });
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        _text: Option<&str>,
    ) -> Result<(), GatewayError> {
        self.acks.lock().unwrap().push(callback_id.to_string());
        Ok(())
    }
}

/// Catalog client serving a fixed item list, or a fixed failure
pub struct StaticCatalog {
    pub items: Vec<CatalogItem>,
    pub fail: bool,
}

#[async_trait]
impl CatalogClient for StaticCatalog {
    async fn fetch_all(&self) -> Result<Vec<CatalogItem>, UpstreamError> {
        if self.fail {
            return Err(UpstreamError::Api {
                comment: "testing outage".to_string(),
            });
        }
        Ok(self.items.clone())
    }
}

pub fn item(contest_id: i64, index: &str, rating: Option<i64>, tags: &[&str]) -> CatalogItem {
    CatalogItem {
        contest_id,
        index: index.to_string(),
        name: format!("Problem {contest_id}{index}"),
        rating,
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
    }
}
