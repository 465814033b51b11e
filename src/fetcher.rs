//! Reference [`PageFetcher`] implementations: a plain `reqwest`-backed
//! HTTP fetcher, and a decorator that runs every URL through
//! [`UrlValidator`] first (SSRF protection).
//!
//! Neither is load-bearing for the core pipeline — a real deployment is
//! expected to supply a headless-browser-backed fetcher for JS-rendered
//! catalogs — but both are useful defaults for simple static sites and for
//! wiring the crate up end-to-end without a browser dependency.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::security::UrlValidator;
use crate::traits::fetcher::{FetchedPage, PageFetcher};

/// Fetches pages over plain HTTP(S) via `reqwest`. Suitable for static
/// or server-rendered catalogs; does not execute JavaScript.
pub struct HttpPageFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpPageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .build()
                .expect("default reqwest client builds"),
            user_agent: "HaircatBot/1.0".to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError> {
        debug!(url = %url, "fetching page");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout { url: url.to_string() }
                } else {
                    warn!(url = %url, error = %e, "HTTP request failed");
                    FetchError::Http(Box::new(e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let final_url = response.url().to_string();
        let html = response.text().await.map_err(|e| FetchError::Http(Box::new(e)))?;

        Ok(FetchedPage { url: final_url, html, status: status.as_u16() })
    }
}

/// Wraps any [`PageFetcher`] with a pre-flight [`UrlValidator`] check —
/// always compose this around a production fetcher (§4.8 Tier 1, §9
/// "SSRF protection").
pub struct ValidatedFetcher<F: PageFetcher> {
    inner: F,
    validator: UrlValidator,
}

impl<F: PageFetcher> ValidatedFetcher<F> {
    pub fn new(inner: F) -> Self {
        Self { inner, validator: UrlValidator::new() }
    }

    pub fn with_validator(inner: F, validator: UrlValidator) -> Self {
        Self { inner, validator }
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for ValidatedFetcher<F> {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError> {
        self.validator.validate_with_dns(url).await?;
        self.inner.fetch(url, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn validated_fetcher_blocks_private_targets_before_delegating() {
        struct PanicsIfCalled;
        #[async_trait]
        impl PageFetcher for PanicsIfCalled {
            async fn fetch(&self, _url: &str, _timeout: Duration) -> Result<FetchedPage, FetchError> {
                panic!("inner fetcher should not be reached for a blocked URL");
            }
        }

        let fetcher = ValidatedFetcher::new(PanicsIfCalled);
        let result = fetcher.fetch_default("http://127.0.0.1/admin").await;
        assert!(result.is_err());
    }
}
