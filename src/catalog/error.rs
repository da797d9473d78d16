//! Upstream catalog error types

use thiserror::Error;

/// Catalog fetch failed or the upstream reported a non-success status
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection failure or request timeout
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog returned HTTP {status}")]
    Http { status: reqwest::StatusCode },

    /// Upstream answered but its envelope carried a failure status
    #[error("catalog rejected the request: {comment}")]
    Api { comment: String },

    #[error("catalog payload could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}
