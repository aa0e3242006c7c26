use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    /// Content retrieval for `url` failed; no page exists for it.
    #[error("failed to fetch {url}: {source}")]
    FetchFailed {
        url: String,
        source: anyhow::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ScoreError {
    /// URL of the failed fetch, if this is a fetch failure.
    pub fn url(&self) -> Option<&str> {
        match self {
            ScoreError::FetchFailed { url, .. } => Some(url),
            ScoreError::InvalidArgument(_) => None,
        }
    }
}
