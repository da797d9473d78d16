//! Snapshot cache over the upstream catalog
//!
//! Refresh-or-serve-stale: an expired snapshot is refreshed by the caller
//! that notices, and a failed refresh serves the previous snapshot
//! unchanged. Queries never mutate cached state.

use super::{CatalogClient, CatalogItem, CatalogSnapshot, UpstreamError};
use chrono::{Duration, Utc};
use rand::seq::{IteratorRandom, SliceRandom};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Snapshot age below which `snapshot(false)` performs no upstream fetch
const FRESHNESS_WINDOW_SECS: i64 = 3600;

pub struct CatalogCache {
    client: Arc<dyn CatalogClient>,
    current: RwLock<Option<Arc<CatalogSnapshot>>>,
    max_age: Duration,
}

impl CatalogCache {
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        Self::with_max_age(client, Duration::seconds(FRESHNESS_WINDOW_SECS))
    }

    /// Cache with a custom freshness window (tests shrink it to force the
    /// expiry path).
    pub fn with_max_age(client: Arc<dyn CatalogClient>, max_age: Duration) -> Self {
        Self {
            client,
            current: RwLock::new(None),
            max_age,
        }
    }

    /// The current snapshot, refreshing first when it is missing, expired,
    /// or `force_refresh` is set. On refresh failure the previous snapshot
    /// is returned unchanged; with no previous snapshot the failure
    /// surfaces.
    pub async fn snapshot(
        &self,
        force_refresh: bool,
    ) -> Result<Arc<CatalogSnapshot>, UpstreamError> {
        if !force_refresh {
            let guard = self.current.read().await;
            if let Some(snap) = guard.as_ref() {
                if self.is_fresh(snap) {
                    return Ok(Arc::clone(snap));
                }
            }
        }

        // Refreshers serialize on the write lock; whoever wins re-checks
        // freshness so concurrent expiry callers trigger one upstream fetch
        // and the rest reuse its result.
        let mut guard = self.current.write().await;
        if !force_refresh {
            if let Some(snap) = guard.as_ref() {
                if self.is_fresh(snap) {
                    return Ok(Arc::clone(snap));
                }
            }
        }

        match self.client.fetch_all().await {
            Ok(items) => {
                let snap = Arc::new(CatalogSnapshot {
                    items,
                    fetched_at: Utc::now(),
                });
                *guard = Some(Arc::clone(&snap));
                Ok(snap)
            }
            Err(err) => match guard.as_ref() {
                Some(stale) => {
                    tracing::warn!(error = %err, "catalog refresh failed, serving stale snapshot");
                    Ok(Arc::clone(stale))
                }
                None => Err(err),
            },
        }
    }

    /// Up to `count` items whose rating is exactly `rating`, uniformly
    /// sampled without replacement.
    pub async fn by_rating(
        &self,
        rating: i64,
        count: usize,
    ) -> Result<Vec<CatalogItem>, UpstreamError> {
        let snap = self.snapshot(false).await?;
        let mut rng = rand::thread_rng();
        Ok(snap
            .items
            .iter()
            .filter(|item| item.rating == Some(rating))
            .choose_multiple(&mut rng, count)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Up to `count` items carrying `tag` (case-insensitive), narrowed to
    /// an exact rating when one is given, uniformly sampled without
    /// replacement.
    pub async fn by_tag(
        &self,
        tag: &str,
        rating: Option<i64>,
        count: usize,
    ) -> Result<Vec<CatalogItem>, UpstreamError> {
        let snap = self.snapshot(false).await?;
        let mut rng = rand::thread_rng();
        Ok(snap
            .items
            .iter()
            .filter(|item| item.has_tag(tag))
            .filter(|item| rating.is_none() || item.rating == rating)
            .choose_multiple(&mut rng, count)
            .into_iter()
            .cloned()
            .collect())
    }

    /// One uniformly random item from the full snapshot
    pub async fn random_item(&self) -> Result<Option<CatalogItem>, UpstreamError> {
        let snap = self.snapshot(false).await?;
        let mut rng = rand::thread_rng();
        Ok(snap.items.choose(&mut rng).cloned())
    }

    fn is_fresh(&self, snap: &CatalogSnapshot) -> bool {
        Utc::now() - snap.fetched_at < self.max_age
    }
}
