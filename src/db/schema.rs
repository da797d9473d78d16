//! Store schema and record types

pub use crate::state_machine::{Step, UserRecord};

use chrono::{DateTime, Utc};

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS users (
    chat_id INTEGER PRIMARY KEY,
    step TEXT NOT NULL DEFAULT 'none',
    rating INTEGER,
    count INTEGER,
    tag TEXT
);

CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    chat_id INTEGER NOT NULL,
    contest_id INTEGER NOT NULL,
    idx TEXT NOT NULL,
    name TEXT NOT NULL,
    rating INTEGER,
    delivered_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_history_chat ON history(chat_id, delivered_at DESC);
";

/// Partial update for a user record. `None` leaves a field untouched;
/// `Some(value)` overwrites it, including `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub step: Option<Step>,
    pub rating: Option<Option<i64>>,
    pub count: Option<Option<i64>>,
    pub tag: Option<Option<String>>,
}

impl UserPatch {
    /// Patch that writes every field of `record`
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            step: Some(record.step),
            rating: Some(record.rating),
            count: Some(record.count),
            tag: Some(record.tag.clone()),
        }
    }
}

/// One delivered-item log entry. Append-only; never updated or deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    pub chat_id: i64,
    pub contest_id: i64,
    pub index: String,
    pub name: String,
    pub rating: Option<i64>,
    pub delivered_at: DateTime<Utc>,
}
