//! Event dispatcher
//!
//! Owns all the I/O the pure state machine cannot do: it loads the chat's
//! record, runs the transition, and executes the resulting effects against
//! the catalog cache, the store, and the messaging gateway.

use crate::catalog::{CatalogCache, CatalogItem, UpstreamError};
use crate::db::{Database, DbError, UserPatch};
use crate::gateway::{InlineKeyboard, MessagingGateway};
use crate::render;
use crate::state_machine::{transition, Effect, Event, UserRecord};
use std::sync::Arc;
use thiserror::Error;

/// Store failures abort the current event; everything else is resolved
/// inside the dispatcher (a user-visible message or a logged fault).
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Store(#[from] DbError),
}

/// Executes dialogue transitions and their effects for inbound events
pub struct Dispatcher<G> {
    db: Database,
    catalog: Arc<CatalogCache>,
    gateway: G,
}

impl<G: MessagingGateway> Dispatcher<G> {
    pub fn new(db: Database, catalog: Arc<CatalogCache>, gateway: G) -> Self {
        Self {
            db,
            catalog,
            gateway,
        }
    }

    /// Handle one inbound event for a chat
    pub async fn handle_event(&self, chat_id: i64, event: Event) -> Result<(), DispatchError> {
        let record = match self.db.get_user(chat_id)? {
            Some(record) => record,
            None => {
                // First contact: create the row so later merges have a base
                let record = UserRecord::new(chat_id);
                self.db.upsert_user(chat_id, &UserPatch::from_record(&record))?;
                record
            }
        };

        let result = transition(&record, &event);
        tracing::debug!(
            chat_id,
            from = %record.step,
            to = %result.record.step,
            effects = result.effects.len(),
            "dialogue transition"
        );

        for effect in &result.effects {
            self.execute(&result.record, effect).await?;
        }
        Ok(())
    }

    async fn execute(&self, record: &UserRecord, effect: &Effect) -> Result<(), DispatchError> {
        let chat_id = record.chat_id;
        match effect {
            Effect::Reply { text, keyboard } => {
                self.send(chat_id, text, keyboard.as_ref()).await;
            }

            Effect::AckSelection { callback_id, text } => {
                if let Err(err) = self.gateway.answer_callback(callback_id, text.as_deref()).await
                {
                    tracing::error!(chat_id, error = %err, "failed to acknowledge selection");
                }
            }

            Effect::PersistRecord => {
                self.db.upsert_user(chat_id, &UserPatch::from_record(record))?;
            }

            Effect::DeliverRandom => match self.catalog.random_item().await {
                Ok(Some(item)) => self.deliver(chat_id, &[item]).await?,
                Ok(None) => self.send(chat_id, render::NO_RESULTS, None).await,
                Err(err) => self.report_upstream(chat_id, &err).await,
            },

            Effect::DeliverByRating { rating, count } => {
                match self.catalog.by_rating(*rating, *count).await {
                    Ok(items) => self.deliver_or_report_empty(chat_id, items).await?,
                    Err(err) => self.report_upstream(chat_id, &err).await,
                }
            }

            Effect::DeliverByTag { tag, rating, count } => {
                match self.catalog.by_tag(tag, *rating, *count).await {
                    Ok(items) => self.deliver_or_report_empty(chat_id, items).await?,
                    Err(err) => self.report_upstream(chat_id, &err).await,
                }
            }

            Effect::SendHistory { limit } => {
                let entries = self.db.recent_history(chat_id, *limit)?;
                if entries.is_empty() {
                    self.send(chat_id, render::EMPTY_HISTORY, None).await;
                } else {
                    self.send(chat_id, &render::history_list(&entries), None).await;
                }
            }
        }
        Ok(())
    }

    async fn deliver_or_report_empty(
        &self,
        chat_id: i64,
        items: Vec<CatalogItem>,
    ) -> Result<(), DispatchError> {
        if items.is_empty() {
            self.send(chat_id, render::NO_RESULTS, None).await;
            return Ok(());
        }
        self.deliver(chat_id, &items).await
    }

    /// Send each item and log it. A crash between a send and its append
    /// loses at most that log entry, which the delivery-logging contract
    /// tolerates.
    async fn deliver(&self, chat_id: i64, items: &[CatalogItem]) -> Result<(), DispatchError> {
        for item in items {
            self.send(chat_id, &render::item_line(item), None).await;
            self.db.append_history(chat_id, item)?;
        }
        Ok(())
    }

    async fn send(&self, chat_id: i64, text: &str, keyboard: Option<&InlineKeyboard>) {
        if let Err(err) = self.gateway.send_text(chat_id, text, keyboard).await {
            tracing::error!(chat_id, error = %err, "failed to send message");
        }
    }

    async fn report_upstream(&self, chat_id: i64, err: &UpstreamError) {
        tracing::error!(chat_id, error = %err, "catalog query failed");
        self.send(chat_id, render::UPSTREAM_DOWN, None).await;
    }

    #[cfg(test)]
    pub fn db(&self) -> &Database {
        &self.db
    }
}
