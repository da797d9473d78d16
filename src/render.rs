//! User-facing message text and keyboards

use crate::catalog::CatalogItem;
use crate::db::HistoryEntry;
use crate::gateway::{InlineKeyboard, KeyboardButton};
use std::fmt::Write;

pub const FALLBACK: &str = "I didn't recognize that. Send /help to see what I can do.";
pub const RATING_PROMPT: &str = "Pick a difficulty rating, or type one (e.g. 1200):";
pub const RATING_INVALID: &str = "That doesn't look like a rating. Send a number, e.g. 1200.";
pub const COUNT_PROMPT: &str = "How many problems should I send (1-10)?";
pub const COUNT_INVALID: &str = "That doesn't look like a number. How many problems (1-10)?";
pub const TAG_PROMPT: &str = "Pick a topic, or type any tag (e.g. dp):";
pub const TAG_INVALID: &str = "Send a topic tag, e.g. dp, or pick one from the buttons.";
pub const NO_RESULTS: &str = "No problems matched those filters. Try different ones.";
pub const UPSTREAM_DOWN: &str = "The problem catalog is unavailable right now. Try again later.";
pub const EMPTY_HISTORY: &str = "No problems delivered yet. Ask for some with /rating or /tags.";

/// Ratings offered on the inline keyboard
const RATING_CHOICES: [i64; 10] = [800, 1000, 1200, 1400, 1600, 1800, 2000, 2200, 2400, 2600];

/// Tags offered on the inline keyboard; any other tag can still be typed
const TAG_CHOICES: [&str; 8] = [
    "dp",
    "greedy",
    "math",
    "graphs",
    "strings",
    "implementation",
    "trees",
    "binary search",
];

pub fn menu() -> String {
    "Hi! I recommend competitive programming problems.\n\n\
     /rating - problems by difficulty rating\n\
     /tags - problems by topic\n\
     /random - one random problem\n\
     /history - recently delivered problems\n\
     /help - this message"
        .to_string()
}

/// One delivered problem: name, identity, rating, link
pub fn item_line(item: &CatalogItem) -> String {
    let rating = item
        .rating
        .map_or_else(|| "unrated".to_string(), |r| r.to_string());
    format!(
        "{} ({}{}, {rating})\n{}",
        item.name,
        item.contest_id,
        item.index,
        item.url()
    )
}

/// Numbered most-recent-first history listing
pub fn history_list(entries: &[HistoryEntry]) -> String {
    let mut out = String::from("Recently delivered:\n");
    for (position, entry) in entries.iter().enumerate() {
        let rating = entry
            .rating
            .map_or_else(|| "unrated".to_string(), |r| r.to_string());
        let _ = write!(
            out,
            "\n{}. {} ({}{}, {rating})",
            position + 1,
            entry.name,
            entry.contest_id,
            entry.index,
        );
    }
    out
}

pub fn rating_keyboard() -> InlineKeyboard {
    let rows = RATING_CHOICES
        .chunks(5)
        .map(|chunk| {
            chunk
                .iter()
                .map(|rating| KeyboardButton::new(rating.to_string(), format!("rating_{rating}")))
                .collect()
        })
        .collect();
    InlineKeyboard::new(rows)
}

pub fn tag_keyboard() -> InlineKeyboard {
    let rows = TAG_CHOICES
        .chunks(4)
        .map(|chunk| {
            chunk
                .iter()
                .map(|tag| KeyboardButton::new(*tag, format!("tag_{tag}")))
                .collect()
        })
        .collect();
    InlineKeyboard::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn item_line_includes_identity_and_link() {
        let item = CatalogItem {
            contest_id: 4,
            index: "A".to_string(),
            name: "Watermelon".to_string(),
            rating: Some(800),
            tags: vec![],
        };
        let line = item_line(&item);
        assert!(line.contains("Watermelon (4A, 800)"));
        assert!(line.contains("https://codeforces.com/problemset/problem/4/A"));
    }

    #[test]
    fn unrated_items_say_so() {
        let item = CatalogItem {
            contest_id: 100,
            index: "B".to_string(),
            name: "Mystery".to_string(),
            rating: None,
            tags: vec![],
        };
        assert!(item_line(&item).contains("unrated"));
    }

    #[test]
    fn history_list_numbers_entries() {
        let entries = vec![
            HistoryEntry {
                id: 2,
                chat_id: 1,
                contest_id: 4,
                index: "A".to_string(),
                name: "Watermelon".to_string(),
                rating: Some(800),
                delivered_at: Utc::now(),
            },
            HistoryEntry {
                id: 1,
                chat_id: 1,
                contest_id: 1,
                index: "A".to_string(),
                name: "Theatre Square".to_string(),
                rating: Some(1000),
                delivered_at: Utc::now(),
            },
        ];
        let text = history_list(&entries);
        assert!(text.contains("1. Watermelon"));
        assert!(text.contains("2. Theatre Square"));
    }

    #[test]
    fn keyboards_carry_parsable_callback_data() {
        let keyboard = rating_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        for row in &keyboard.inline_keyboard {
            for button in row {
                assert!(button.callback_data.starts_with("rating_"));
            }
        }

        let keyboard = tag_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert!(keyboard.inline_keyboard[0]
            .iter()
            .any(|b| b.callback_data == "tag_dp"));
    }
}
