//! Effects produced by state transitions

use crate::gateway::InlineKeyboard;

/// Effects to be executed by the runtime after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send a message to the chat
    Reply {
        text: String,
        keyboard: Option<InlineKeyboard>,
    },

    /// Acknowledge an inline-keyboard press
    AckSelection {
        callback_id: String,
        text: Option<String>,
    },

    /// Persist the transition's record
    PersistRecord,

    /// Pick one uniformly random item, deliver it, log it
    DeliverRandom,

    /// Query by exact rating, deliver up to `count` items, log each
    DeliverByRating { rating: i64, count: usize },

    /// Query by tag (and exact rating if present), deliver up to `count`
    /// items, log each
    DeliverByTag {
        tag: String,
        rating: Option<i64>,
        count: usize,
    },

    /// Read and send the most recently delivered items
    SendHistory { limit: usize },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn reply_with_keyboard(text: impl Into<String>, keyboard: InlineKeyboard) -> Self {
        Effect::Reply {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }

    pub fn ack(callback_id: impl Into<String>) -> Self {
        Effect::AckSelection {
            callback_id: callback_id.into(),
            text: None,
        }
    }
}
