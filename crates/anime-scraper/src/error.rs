//! Error taxonomy for upstream fetches and identifier lookups.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream returned {status} for {url}")]
    UpstreamStatus { url: String, status: StatusCode },

    #[error("unexpected response body from {url}: {message}")]
    Parse { url: String, message: String },

    #[error("anime not found: {id}")]
    NotFound { id: String },
}

impl ScrapeError {
    /// True for failures caused by the upstream site rather than the caller.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ScrapeError::Transport { .. }
                | ScrapeError::UpstreamStatus { .. }
                | ScrapeError::Parse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
