//! Persistence for problembot
//!
//! Two tables back the dialogue: `users` holds one row per chat,
//! overwritten in place as the conversation advances, and `history` is the
//! append-only log of delivered items.

mod schema;

pub use schema::*;

use crate::catalog::CatalogItem;
use crate::state_machine::Step;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe store handle
///
/// The connection mutex serializes all writers, which is what gives the
/// per-key contract: two concurrent updates to the same chat cannot
/// interleave their field writes.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== User Records ====================

    /// Get the record for a chat, if one exists
    pub fn get_user(&self, chat_id: i64) -> DbResult<Option<UserRecord>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT chat_id, step, rating, count, tag FROM users WHERE chat_id = ?1",
            params![chat_id],
            |row| {
                Ok(UserRecord {
                    chat_id: row.get(0)?,
                    step: parse_step(&row.get::<_, String>(1)?),
                    rating: row.get(2)?,
                    count: row.get(3)?,
                    tag: row.get(4)?,
                })
            },
        )
        .optional()
        .map_err(DbError::from)
    }

    /// Merge the supplied fields into the chat's record, creating the row
    /// with defaults if it does not exist yet. Unsupplied fields are left
    /// untouched.
    pub fn upsert_user(&self, chat_id: i64, patch: &UserPatch) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();

        let existing = conn
            .query_row(
                "SELECT step, rating, count, tag FROM users WHERE chat_id = ?1",
                params![chat_id],
                |row| {
                    Ok(UserRecord {
                        chat_id,
                        step: parse_step(&row.get::<_, String>(0)?),
                        rating: row.get(1)?,
                        count: row.get(2)?,
                        tag: row.get(3)?,
                    })
                },
            )
            .optional()?;

        let mut record = existing.unwrap_or_else(|| UserRecord::new(chat_id));
        if let Some(step) = patch.step {
            record.step = step;
        }
        if let Some(rating) = patch.rating {
            record.rating = rating;
        }
        if let Some(count) = patch.count {
            record.count = count;
        }
        if let Some(tag) = &patch.tag {
            record.tag = tag.clone();
        }

        conn.execute(
            "INSERT INTO users (chat_id, step, rating, count, tag) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(chat_id) DO UPDATE SET
                 step = excluded.step,
                 rating = excluded.rating,
                 count = excluded.count,
                 tag = excluded.tag",
            params![
                chat_id,
                record.step.as_str(),
                record.rating,
                record.count,
                record.tag,
            ],
        )?;
        Ok(())
    }

    // ==================== History Log ====================

    /// Log a delivered item. Durable by the time this returns, so a
    /// following `recent_history` for the same chat observes it.
    pub fn append_history(&self, chat_id: i64, item: &CatalogItem) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO history (chat_id, contest_id, idx, name, rating, delivered_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                chat_id,
                item.contest_id,
                item.index,
                item.name,
                item.rating,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Most recently delivered items first, capped at `limit`
    pub fn recent_history(&self, chat_id: i64, limit: usize) -> DbResult<Vec<HistoryEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, chat_id, contest_id, idx, name, rating, delivered_at
             FROM history WHERE chat_id = ?1
             ORDER BY delivered_at DESC, id DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![chat_id, limit as i64], |row| {
            Ok(HistoryEntry {
                id: row.get(0)?,
                chat_id: row.get(1)?,
                contest_id: row.get(2)?,
                index: row.get(3)?,
                name: row.get(4)?,
                rating: row.get(5)?,
                delivered_at: parse_datetime(&row.get::<_, String>(6)?),
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }
}

fn parse_step(s: &str) -> Step {
    match s {
        "awaiting_rating" => Step::AwaitingRating,
        "awaiting_count" => Step::AwaitingCount,
        "awaiting_tag" => Step::AwaitingTag,
        "awaiting_tag_count" => Step::AwaitingTagCount,
        _ => Step::None,
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(contest_id: i64, index: &str, rating: Option<i64>) -> CatalogItem {
        CatalogItem {
            contest_id,
            index: index.to_string(),
            name: format!("Problem {contest_id}{index}"),
            rating,
            tags: vec![],
        }
    }

    #[test]
    fn get_missing_user_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_user(1).unwrap(), None);
    }

    #[test]
    fn upsert_creates_with_defaults_then_merges() {
        let db = Database::open_in_memory().unwrap();

        db.upsert_user(
            1,
            &UserPatch {
                step: Some(Step::AwaitingRating),
                ..UserPatch::default()
            },
        )
        .unwrap();

        let record = db.get_user(1).unwrap().unwrap();
        assert_eq!(record.step, Step::AwaitingRating);
        assert_eq!(record.rating, None);
        assert_eq!(record.tag, None);

        // A later partial update leaves the other fields untouched
        db.upsert_user(
            1,
            &UserPatch {
                rating: Some(Some(1200)),
                ..UserPatch::default()
            },
        )
        .unwrap();

        let record = db.get_user(1).unwrap().unwrap();
        assert_eq!(record.step, Step::AwaitingRating);
        assert_eq!(record.rating, Some(1200));
    }

    #[test]
    fn upsert_can_clear_fields() {
        let db = Database::open_in_memory().unwrap();

        db.upsert_user(
            1,
            &UserPatch {
                step: Some(Step::AwaitingCount),
                rating: Some(Some(1600)),
                ..UserPatch::default()
            },
        )
        .unwrap();

        db.upsert_user(
            1,
            &UserPatch {
                step: Some(Step::None),
                rating: Some(None),
                ..UserPatch::default()
            },
        )
        .unwrap();

        let record = db.get_user(1).unwrap().unwrap();
        assert_eq!(record.step, Step::None);
        assert_eq!(record.rating, None);
    }

    #[test]
    fn records_are_per_chat() {
        let db = Database::open_in_memory().unwrap();

        db.upsert_user(
            1,
            &UserPatch {
                step: Some(Step::AwaitingRating),
                ..UserPatch::default()
            },
        )
        .unwrap();
        db.upsert_user(
            2,
            &UserPatch {
                step: Some(Step::AwaitingTag),
                ..UserPatch::default()
            },
        )
        .unwrap();

        assert_eq!(db.get_user(1).unwrap().unwrap().step, Step::AwaitingRating);
        assert_eq!(db.get_user(2).unwrap().unwrap().step, Step::AwaitingTag);
    }

    #[test]
    fn history_is_most_recent_first_and_capped() {
        let db = Database::open_in_memory().unwrap();

        for i in 1..=5 {
            db.append_history(7, &item(i, "A", Some(1000 + i))).unwrap();
        }

        let entries = db.recent_history(7, 3).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].contest_id, 5);
        assert_eq!(entries[1].contest_id, 4);
        assert_eq!(entries[2].contest_id, 3);

        for pair in entries.windows(2) {
            assert!(pair[0].delivered_at >= pair[1].delivered_at);
        }
    }

    #[test]
    fn history_read_observes_prior_append() {
        let db = Database::open_in_memory().unwrap();

        db.append_history(9, &item(1, "B", None)).unwrap();
        let entries = db.recent_history(9, 10).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].index, "B");
        assert_eq!(entries[0].rating, None);
    }

    #[test]
    fn history_is_per_chat() {
        let db = Database::open_in_memory().unwrap();

        db.append_history(1, &item(10, "A", Some(800))).unwrap();
        db.append_history(2, &item(20, "B", Some(900))).unwrap();

        let entries = db.recent_history(1, 10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].contest_id, 10);
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problembot.db");

        {
            let db = Database::open(&path).unwrap();
            db.upsert_user(
                5,
                &UserPatch {
                    step: Some(Step::AwaitingCount),
                    rating: Some(Some(2000)),
                    ..UserPatch::default()
                },
            )
            .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let record = db.get_user(5).unwrap().unwrap();
        assert_eq!(record.step, Step::AwaitingCount);
        assert_eq!(record.rating, Some(2000));
    }
}
