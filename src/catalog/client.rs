//! Upstream catalog client
//!
//! The upstream exposes a single bulk read endpoint with no server-side
//! filtering; all filtering happens in the cache.

use super::{CatalogItem, UpstreamError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Bounded request timeout for the bulk fetch; a timeout counts as a fetch
/// failure and falls back to the stale snapshot.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Read-only upstream catalog
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch the full item list
    async fn fetch_all(&self) -> Result<Vec<CatalogItem>, UpstreamError>;
}

/// Codeforces `problemset.problems` client
pub struct CodeforcesClient {
    client: Client,
    url: String,
}

impl CodeforcesClient {
    pub const DEFAULT_URL: &'static str = "https://codeforces.com/api/problemset.problems";

    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl CatalogClient for CodeforcesClient {
    async fn fetch_all(&self) -> Result<Vec<CatalogItem>, UpstreamError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Http { status });
        }

        let body = response.text().await?;
        let envelope: ApiEnvelope = serde_json::from_str(&body)?;

        if envelope.status != "OK" {
            return Err(UpstreamError::Api {
                comment: envelope
                    .comment
                    .unwrap_or_else(|| "status not OK".to_string()),
            });
        }

        let problems = envelope.result.map(|r| r.problems).unwrap_or_default();
        Ok(problems.into_iter().filter_map(WireProblem::into_item).collect())
    }
}

// Codeforces API wire types

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    status: String,
    comment: Option<String>,
    result: Option<ProblemsetResult>,
}

#[derive(Debug, Deserialize)]
struct ProblemsetResult {
    problems: Vec<WireProblem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProblem {
    contest_id: Option<i64>,
    index: String,
    name: String,
    rating: Option<i64>,
    #[serde(default)]
    tags: Vec<String>,
}

impl WireProblem {
    /// Problems without a contest id cannot be identified or linked; the
    /// snapshot skips them.
    fn into_item(self) -> Option<CatalogItem> {
        Some(CatalogItem {
            contest_id: self.contest_id?,
            index: self.index,
            name: self.name,
            rating: self.rating,
            tags: self.tags,
        })
    }
}
