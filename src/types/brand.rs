//! Brand identity and the transient discovery output.

use serde::{Deserialize, Serialize};

/// A brand's immutable identity.
///
/// Created by the (out-of-scope) registry importer; read by the pipeline
/// and never mutated by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    /// Human-readable name, e.g. "Curl Crew".
    pub name: String,
    /// Stable, lowercase-hyphenated identifier. Unique.
    pub brand_slug: String,
    /// Canonical site root, e.g. `https://curlcrew.example`.
    pub site_root: String,
    pub country: Option<String>,
    pub priority: Option<i32>,
    /// Catalog entry-point URLs discovery starts from.
    pub entrypoints: Vec<String>,
}

/// The closed set of URL classifications produced by the classifier (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlType {
    Product,
    Category,
    Kit,
    NonHair,
    Other,
}

impl UrlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlType::Product => "product",
            UrlType::Category => "category",
            UrlType::Kit => "kit",
            UrlType::NonHair => "non_hair",
            UrlType::Other => "other",
        }
    }
}

impl std::fmt::Display for UrlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate URL surfaced by discovery, not yet persisted.
///
/// Transient: produced by a [`crate::traits::discovery::DiscoveryAdapter`],
/// consumed by the classifier and then the coverage engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredUrl {
    pub url: String,
    /// Which adapter surfaced this URL, e.g. `"sitemap"`, `"dom_crawler"`.
    pub source_type: String,
    pub hair_relevant: bool,
    pub is_kit: bool,
    pub reason: String,
}

impl DiscoveredUrl {
    pub fn new(url: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source_type: source_type.into(),
            hair_relevant: false,
            is_kit: false,
            reason: String::new(),
        }
    }
}
