//! Pure dialogue transition function

use super::{Effect, Event, SelectionData, Step, UserRecord};
use crate::render;

/// Requested item counts are clamped into `[MIN_COUNT, MAX_COUNT]`
pub const MIN_COUNT: i64 = 1;
pub const MAX_COUNT: i64 = 10;

/// How many entries `/history` shows
pub const HISTORY_LIMIT: usize = 10;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub record: UserRecord,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(record: UserRecord) -> Self {
        Self {
            record,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition function: given the chat's current record and an inbound
/// event, produce the next record and the effects to execute. No I/O; same
/// inputs always produce the same outputs.
pub fn transition(record: &UserRecord, event: &Event) -> TransitionResult {
    match event {
        Event::Message { text } => on_message(record, text.trim()),
        Event::Selection { callback_id, data } => on_selection(record, callback_id, data),
    }
}

fn on_message(record: &UserRecord, text: &str) -> TransitionResult {
    // Commands are honored from any step; everything else is interpreted
    // against the step the chat is currently in.
    match command_of(text) {
        Some("/start" | "/help") => TransitionResult::new(record.reset())
            .with_effect(Effect::PersistRecord)
            .with_effect(Effect::reply(render::menu())),

        Some("/random") => TransitionResult::new(record.reset())
            .with_effect(Effect::PersistRecord)
            .with_effect(Effect::DeliverRandom),

        Some("/history") => TransitionResult::new(record.clone()).with_effect(Effect::SendHistory {
            limit: HISTORY_LIMIT,
        }),

        Some("/rating") => {
            let mut next = record.reset();
            next.step = Step::AwaitingRating;
            TransitionResult::new(next)
                .with_effect(Effect::PersistRecord)
                .with_effect(Effect::reply_with_keyboard(
                    render::RATING_PROMPT,
                    render::rating_keyboard(),
                ))
        }

        Some("/tags") => {
            let mut next = record.reset();
            next.step = Step::AwaitingTag;
            TransitionResult::new(next)
                .with_effect(Effect::PersistRecord)
                .with_effect(Effect::reply_with_keyboard(
                    render::TAG_PROMPT,
                    render::tag_keyboard(),
                ))
        }

        // Unknown commands fall through to the step the chat is in, where
        // they either fail step validation or hit the idle fallback.
        _ => step_input(record, text),
    }
}

fn step_input(record: &UserRecord, text: &str) -> TransitionResult {
    match record.step {
        Step::AwaitingRating => match parse_number(text) {
            Some(rating) => {
                let mut next = record.reset();
                next.step = Step::AwaitingCount;
                next.rating = Some(rating);
                TransitionResult::new(next)
                    .with_effect(Effect::PersistRecord)
                    .with_effect(Effect::reply(render::COUNT_PROMPT))
            }
            None => {
                TransitionResult::new(record.clone()).with_effect(Effect::reply(render::RATING_INVALID))
            }
        },

        Step::AwaitingCount => match parse_number(text) {
            Some(requested) => match record.rating {
                Some(rating) => {
                    let count = clamp_count(requested);
                    let mut next = record.reset();
                    next.count = Some(count as i64);
                    TransitionResult::new(next)
                        .with_effect(Effect::PersistRecord)
                        .with_effect(Effect::DeliverByRating { rating, count })
                }
                // The dialogue lost its rating parameter; start over.
                None => TransitionResult::new(record.reset())
                    .with_effect(Effect::PersistRecord)
                    .with_effect(Effect::reply(render::FALLBACK)),
            },
            None => {
                TransitionResult::new(record.clone()).with_effect(Effect::reply(render::COUNT_INVALID))
            }
        },

        Step::AwaitingTag => {
            if text.is_empty() {
                TransitionResult::new(record.clone()).with_effect(Effect::reply(render::TAG_INVALID))
            } else {
                let mut next = record.reset();
                next.step = Step::AwaitingTagCount;
                next.tag = Some(text.to_lowercase());
                TransitionResult::new(next)
                    .with_effect(Effect::PersistRecord)
                    .with_effect(Effect::reply(render::COUNT_PROMPT))
            }
        }

        Step::AwaitingTagCount => match parse_number(text) {
            Some(requested) => match record.tag.clone() {
                Some(tag) => {
                    let count = clamp_count(requested);
                    let rating = record.rating;
                    let mut next = record.reset();
                    next.count = Some(count as i64);
                    TransitionResult::new(next)
                        .with_effect(Effect::PersistRecord)
                        .with_effect(Effect::DeliverByTag { tag, rating, count })
                }
                None => TransitionResult::new(record.reset())
                    .with_effect(Effect::PersistRecord)
                    .with_effect(Effect::reply(render::FALLBACK)),
            },
            None => {
                TransitionResult::new(record.clone()).with_effect(Effect::reply(render::COUNT_INVALID))
            }
        },

        Step::None => {
            TransitionResult::new(record.clone()).with_effect(Effect::reply(render::FALLBACK))
        }
    }
}

fn on_selection(record: &UserRecord, callback_id: &str, data: &str) -> TransitionResult {
    // A button press encodes its intent in the callback data, so it
    // short-circuits to the matching transition from any step instead of
    // being re-validated as free text.
    match SelectionData::parse(data) {
        Some(SelectionData::Rating(rating)) => {
            let mut next = record.reset();
            next.step = Step::AwaitingCount;
            next.rating = Some(rating);
            TransitionResult::new(next)
                .with_effect(Effect::ack(callback_id))
                .with_effect(Effect::PersistRecord)
                .with_effect(Effect::reply(render::COUNT_PROMPT))
        }
        Some(SelectionData::Tag(tag)) => {
            let mut next = record.reset();
            next.step = Step::AwaitingTagCount;
            next.tag = Some(tag);
            TransitionResult::new(next)
                .with_effect(Effect::ack(callback_id))
                .with_effect(Effect::PersistRecord)
                .with_effect(Effect::reply(render::COUNT_PROMPT))
        }
        None => TransitionResult::new(record.clone()).with_effect(Effect::ack(callback_id)),
    }
}

// Helper functions

/// First token of a `/command`, with any `@botname` mention stripped
fn command_of(text: &str) -> Option<&str> {
    if !text.starts_with('/') {
        return None;
    }
    let token = text.split_whitespace().next().unwrap_or(text);
    token.split('@').next()
}

fn parse_number(text: &str) -> Option<i64> {
    text.parse().ok()
}

fn clamp_count(requested: i64) -> usize {
    requested.clamp(MIN_COUNT, MAX_COUNT) as usize
}
