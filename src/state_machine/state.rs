//! Dialogue step and per-chat record types

use std::fmt;

/// Position of a chat in the multi-turn dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    /// Idle, no parameter collection in progress
    #[default]
    None,

    /// `/rating` sent, waiting for a difficulty number
    AwaitingRating,

    /// Rating collected, waiting for how many problems to send
    AwaitingCount,

    /// `/tags` sent, waiting for a topic tag
    AwaitingTag,

    /// Tag collected, waiting for how many problems to send
    AwaitingTagCount,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::None => "none",
            Step::AwaitingRating => "awaiting_rating",
            Step::AwaitingCount => "awaiting_count",
            Step::AwaitingTag => "awaiting_tag",
            Step::AwaitingTagCount => "awaiting_tag_count",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-chat dialogue record
///
/// One record per chat, created lazily on first contact and overwritten in
/// place as the dialogue advances. `rating` is only meaningful while `step`
/// is `AwaitingCount`; `tag` only while `AwaitingTagCount`. `count` keeps
/// the last requested item count for the persisted layout and is never read
/// back by the dialogue.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub chat_id: i64,
    pub step: Step,
    pub rating: Option<i64>,
    pub count: Option<i64>,
    pub tag: Option<String>,
}

impl UserRecord {
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            step: Step::None,
            rating: None,
            count: None,
            tag: None,
        }
    }

    /// The terminal/idle shape reached after each completed dialogue or
    /// fallback: step cleared along with both collected parameters.
    pub fn reset(&self) -> Self {
        Self {
            chat_id: self.chat_id,
            step: Step::None,
            rating: None,
            count: self.count,
            tag: None,
        }
    }

}
