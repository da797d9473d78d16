//! Webhook wire types (Telegram update shape)
//!
//! Only the fields the dialogue needs are modeled; everything else in an
//! update is ignored.

use crate::state_machine::Event;
use serde::{Deserialize, Serialize};

/// Inbound update envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

/// Body returned for every webhook delivery
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub ok: bool,
}

impl Update {
    /// Reduce the update to a dialogue event, when it carries one.
    /// Text-less messages and callbacks without a source chat or data
    /// yield `None` and are acknowledged without dispatching.
    pub fn into_event(self) -> Option<(i64, Event)> {
        if let Some(message) = self.message {
            if let Some(text) = message.text {
                return Some((message.chat.id, Event::message(text)));
            }
        }
        if let Some(callback) = self.callback_query {
            let chat_id = callback.message.map(|m| m.chat.id)?;
            let data = callback.data?;
            return Some((chat_id, Event::selection(callback.id, data)));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_update_becomes_message_event() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 10,
                "message": {
                    "message_id": 1,
                    "chat": {"id": 42, "type": "private"},
                    "text": "/start"
                }
            }"#,
        )
        .unwrap();

        let (chat_id, event) = update.into_event().unwrap();
        assert_eq!(chat_id, 42);
        assert!(matches!(event, Event::Message { text } if text == "/start"));
    }

    #[test]
    fn callback_update_becomes_selection_event() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 11,
                "callback_query": {
                    "id": "cb77",
                    "from": {"id": 9},
                    "message": {"message_id": 2, "chat": {"id": 42, "type": "private"}},
                    "data": "rating_1200"
                }
            }"#,
        )
        .unwrap();

        let (chat_id, event) = update.into_event().unwrap();
        assert_eq!(chat_id, 42);
        assert!(matches!(
            event,
            Event::Selection { callback_id, data }
                if callback_id == "cb77" && data == "rating_1200"
        ));
    }

    #[test]
    fn textless_update_carries_no_event() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 12,
                "message": {"message_id": 3, "chat": {"id": 42, "type": "private"}}
            }"#,
        )
        .unwrap();

        assert!(update.into_event().is_none());
    }
}
