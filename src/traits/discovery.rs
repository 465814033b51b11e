//! The discovery adapter contract (§9 "Polymorphic discovery strategies").
//!
//! Each adapter exposes the same one-method capability; `ProductDiscoverer`
//! (in [`crate::discovery`]) holds a list of them and merges their output.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::blueprint::Blueprint;
use crate::types::brand::DiscoveredUrl;

/// A single discovery strategy (sitemap fetcher, DOM link crawler, ...).
#[async_trait]
pub trait DiscoveryAdapter: Send + Sync {
    /// A short, stable name for logging and precedence bookkeeping.
    fn name(&self) -> &'static str;

    /// Produce candidate URLs for the given brand.
    async fn discover(&self, blueprint: &Blueprint) -> Result<Vec<DiscoveredUrl>>;
}
