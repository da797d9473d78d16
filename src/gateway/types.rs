//! Inline keyboard types (platform reply-markup shape)

use serde::Serialize;

/// Inline keyboard attached to an outbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboard {
    pub inline_keyboard: Vec<Vec<KeyboardButton>>,
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<KeyboardButton>>) -> Self {
        Self {
            inline_keyboard: rows,
        }
    }
}

/// One button; `callback_data` comes back verbatim in the selection event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_reply_markup_shape() {
        let keyboard = InlineKeyboard::new(vec![vec![KeyboardButton::new("800", "rating_800")]]);
        let json = serde_json::to_value(&keyboard).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "inline_keyboard": [[{"text": "800", "callback_data": "rating_800"}]]
            })
        );
    }
}
