//! The headless-browser / HTTP page fetcher collaborator.
//!
//! The core never opens a socket itself; it drives whatever implements
//! [`PageFetcher`], which is free to be a plain `reqwest` client or a
//! headless-browser session. The only contract the pipeline relies on is
//! "give me the rendered HTML for this URL within a deadline".

use async_trait::async_trait;
use std::time::Duration;

use crate::error::FetchResult;

/// Default navigation deadline per §5 ("Cancellation & timeouts").
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(45);

/// A fetched page: the final (possibly redirected) URL and its HTML body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub html: String,
    pub status: u16,
}

/// Fetches a single page's rendered HTML.
///
/// Implementations own whatever session/connection state they need; the
/// coverage engine owns one `PageFetcher` instance for the duration of a
/// brand run and is responsible for releasing it on every exit path.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page, respecting the given deadline.
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchResult<FetchedPage>;

    /// Fetch with the default deadline.
    async fn fetch_default(&self, url: &str) -> FetchResult<FetchedPage> {
        self.fetch(url, DEFAULT_FETCH_TIMEOUT).await
    }
}
