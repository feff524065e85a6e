use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("Fetch failed: {0}")]
    FetchFailed(#[from] FetchError),

    #[error("Malformed seed: {0}")]
    MalformedSeed(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Unknown locale: {0}")]
    InvalidLocale(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BlogError {
    /// Whether the "load more" control should stay available for another try.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BlogError::FetchFailed(_))
    }
}

/// Everything that can go wrong between handing a cursor to the fetcher and
/// holding a normalized page.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid page URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {0}")]
    Status(StatusCode),

    #[error("Malformed page body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Malformed record in page: {0}")]
    Document(String),
}

pub type Result<T> = std::result::Result<T, BlogError>;
