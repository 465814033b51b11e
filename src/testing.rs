//! Mock collaborators for testing the pipeline without a real browser,
//! LLM backend, or discovery network call.
//!
//! Builder-style configuration (`with_page`, `with_ingredients`, ...) and
//! call tracking.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{FetchError, FetchResult, Result as PipelineResult};
use crate::traits::discovery::DiscoveryAdapter;
use crate::traits::fetcher::PageFetcher;
use crate::traits::llm::{LlmClient, LlmExtraction};
use crate::types::blueprint::Blueprint;
use crate::types::brand::DiscoveredUrl;

/// A fetcher returning predefined HTML for known URLs and a fetch error for
/// everything else.
#[derive(Default)]
pub struct MockFetcher {
    pages: Arc<RwLock<HashMap<String, String>>>,
    fail_urls: Arc<RwLock<Vec<String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.write().unwrap().insert(url.into(), html.into());
        self
    }

    pub fn fail_url(self, url: impl Into<String>) -> Self {
        self.fail_urls.write().unwrap().push(url.into());
        self
    }

    /// URLs fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> FetchResult<crate::traits::fetcher::FetchedPage> {
        self.calls.write().unwrap().push(url.to_string());

        if self.fail_urls.read().unwrap().contains(&url.to_string()) {
            return Err(FetchError::Status { url: url.to_string(), status: 500 });
        }

        self.pages
            .read()
            .unwrap()
            .get(url)
            .map(|html| crate::traits::fetcher::FetchedPage {
                url: url.to_string(),
                html: html.clone(),
                status: 200,
            })
            .ok_or_else(|| FetchError::Status { url: url.to_string(), status: 404 })
    }
}

/// A budgeted LLM client returning a fixed ingredient list/description up to
/// a configurable number of calls per brand, then refusing (`can_call` ==
/// false) — used to exercise the §5 "LLM budget exhaustion" scenario.
pub struct MockLlmClient {
    ingredients: Option<Vec<String>>,
    description: Option<String>,
    budget_per_brand: u32,
    calls_made: RwLock<HashMap<String, u32>>,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self {
            ingredients: None,
            description: None,
            budget_per_brand: 50,
            calls_made: RwLock::new(HashMap::new()),
        }
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ingredients(mut self, ingredients: Vec<String>) -> Self {
        self.ingredients = Some(ingredients);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_budget(mut self, calls: u32) -> Self {
        self.budget_per_brand = calls;
        self
    }

    pub fn calls_made_for(&self, brand_slug: &str) -> u32 {
        *self.calls_made.read().unwrap().get(brand_slug).unwrap_or(&0)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn can_call(&self, brand_slug: &str) -> bool {
        self.calls_made_for(brand_slug) < self.budget_per_brand
    }

    async fn extract_grounded(
        &self,
        brand_slug: &str,
        _page_text: &str,
    ) -> Result<LlmExtraction, Box<dyn std::error::Error + Send + Sync>> {
        *self.calls_made.write().unwrap().entry(brand_slug.to_string()).or_insert(0) += 1;

        Ok(LlmExtraction {
            inci_ingredients: self.ingredients.clone(),
            description: self.description.clone(),
        })
    }
}

/// A discovery adapter returning a fixed set of URLs, ignoring the blueprint
/// beyond recording that it was asked.
#[derive(Default)]
pub struct MockDiscoveryAdapter {
    urls: Vec<DiscoveredUrl>,
}

impl MockDiscoveryAdapter {
    pub fn new(urls: Vec<DiscoveredUrl>) -> Self {
        Self { urls }
    }
}

#[async_trait]
impl DiscoveryAdapter for MockDiscoveryAdapter {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn discover(&self, _blueprint: &Blueprint) -> PipelineResult<Vec<DiscoveredUrl>> {
        Ok(self.urls.clone())
    }
}
