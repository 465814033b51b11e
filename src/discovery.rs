//! Polymorphic discovery adapter merge (§9 "Polymorphic discovery strategies").
//!
//! `ProductDiscoverer` holds a list of [`DiscoveryAdapter`]s and merges
//! their output by URL with first-seen-wins precedence — adapter-declared
//! precedence is explicitly ignored per §9.

use indexmap::IndexMap;

use crate::error::Result;
use crate::traits::discovery::DiscoveryAdapter;
use crate::types::blueprint::Blueprint;
use crate::types::brand::DiscoveredUrl;

/// Runs every configured adapter and merges their output, first-seen wins.
pub struct ProductDiscoverer {
    adapters: Vec<Box<dyn DiscoveryAdapter>>,
}

impl ProductDiscoverer {
    pub fn new() -> Self {
        Self { adapters: Vec::new() }
    }

    pub fn with_adapter(mut self, adapter: Box<dyn DiscoveryAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    /// Run every adapter in registration order and merge by URL,
    /// first-seen wins. Individual adapter failures are not currently
    /// isolated here: per §9 discovery is out of the core's scope
    /// boundary, so a failing adapter is expected to be wrapped by the
    /// caller rather than silently skipped by this merge step.
    pub async fn discover(&self, blueprint: &Blueprint) -> Result<Vec<DiscoveredUrl>> {
        let mut merged: IndexMap<String, DiscoveredUrl> = IndexMap::new();
        for adapter in &self.adapters {
            let urls = adapter.discover(blueprint).await?;
            for url in urls {
                merged.entry(url.url.clone()).or_insert(url);
            }
        }
        Ok(merged.into_values().collect())
    }
}

impl Default for ProductDiscoverer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedAdapter {
        name: &'static str,
        urls: Vec<&'static str>,
    }

    #[async_trait]
    impl DiscoveryAdapter for FixedAdapter {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn discover(&self, _blueprint: &Blueprint) -> Result<Vec<DiscoveredUrl>> {
            Ok(self
                .urls
                .iter()
                .map(|u| DiscoveredUrl::new(*u, self.name))
                .collect())
        }
    }

    fn blueprint() -> Blueprint {
        Blueprint {
            brand_slug: "curl-crew".into(),
            brand_name: "Curl Crew".into(),
            platform: crate::types::blueprint::Platform::Custom,
            domain: "curlcrew.example".into(),
            allowed_domains: vec![],
            entrypoints: vec![],
            discovery: Default::default(),
            extraction: Default::default(),
            version: 1,
        }
    }

    #[tokio::test]
    async fn first_seen_adapter_wins_on_duplicate_urls() {
        let discoverer = ProductDiscoverer::new()
            .with_adapter(Box::new(FixedAdapter { name: "sitemap", urls: vec!["https://a.example/p/1"] }))
            .with_adapter(Box::new(FixedAdapter { name: "dom_crawler", urls: vec!["https://a.example/p/1", "https://a.example/p/2"] }));

        let merged = discoverer.discover(&blueprint()).await.unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].source_type, "sitemap");
    }
}
