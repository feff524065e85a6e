pub mod http_fetcher;

#[cfg(test)]
pub(crate) mod scripted;

use async_trait::async_trait;

use crate::app::FetchError;
use crate::domain::{PageToken, RawPage};

/// Resolves a page token to the page it points at.
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait PageFetcher {
    async fn fetch_page(&self, token: &PageToken) -> Result<RawPage, FetchError>;
}
