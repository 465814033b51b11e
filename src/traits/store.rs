//! The repository interface (§4.10, component J).
//!
//! Storage-agnostic: the core only ever drives this trait. All writes are
//! idempotent with respect to the unique `product_url`; evidence is
//! append-only; `QuarantineDetail` is 1:1 with a quarantined product;
//! `BrandCoverage` is a per-brand singleton.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryResult;
use crate::quality_gate::GateVerdict;
use crate::types::coverage::BrandCoverage;
use crate::types::labels::LabelResult;
use crate::types::product::{ProductExtraction, StoredProduct, VerificationStatus};

/// Filter parameters for [`Repository::get_products`] / [`Repository::count_products`].
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub brand_slug: Option<String>,
    pub verified_only: bool,
    pub search: Option<String>,
    pub category: Option<String>,
}

/// Simple offset/limit pagination, matching the repository's `page` parameter (§4.10).
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self { offset: 0, limit: 50 }
    }
}

/// Storage-agnostic product/evidence/coverage repository (§4.10).
#[async_trait]
pub trait Repository: Send + Sync {
    /// Upsert by `product_url`. On insert: create the row, append all
    /// evidence, and create a `QuarantineDetail` if `verdict` is
    /// `Quarantined`. On update: overwrite non-identity fields, append new
    /// evidence (never delete historical rows), and upsert the quarantine
    /// row by `product_id`.
    async fn upsert_product(
        &self,
        extraction: &ProductExtraction,
        verdict: &GateVerdict,
    ) -> RepositoryResult<Uuid>;

    async fn get_products(&self, filter: &ProductFilter, page: Page) -> RepositoryResult<Vec<StoredProduct>>;

    async fn count_products(&self, filter: &ProductFilter) -> RepositoryResult<u64>;

    async fn get_product_by_id(&self, id: Uuid) -> RepositoryResult<StoredProduct>;

    /// Upsert by `brand_slug`, touching `last_run`.
    async fn upsert_brand_coverage(&self, coverage: &BrandCoverage) -> RepositoryResult<()>;

    async fn get_brand_coverage(&self, brand_slug: &str) -> RepositoryResult<Option<BrandCoverage>>;

    async fn get_all_brand_coverages(&self) -> RepositoryResult<Vec<BrandCoverage>>;

    async fn update_product_labels(&self, product_id: Uuid, labels: &LabelResult) -> RepositoryResult<()>;

    /// Catalog-only products with no ingredient list yet — useful for
    /// gap-filling re-runs; just a filtered `get_products` view.
    async fn get_products_without_inci(&self, brand_slug: &str) -> RepositoryResult<Vec<StoredProduct>> {
        let filter = ProductFilter {
            brand_slug: Some(brand_slug.to_string()),
            verified_only: false,
            search: None,
            category: None,
        };
        let all = self.get_products(&filter, Page { offset: 0, limit: u64::MAX }).await?;
        Ok(all
            .into_iter()
            .filter(|p| {
                p.verification_status == VerificationStatus::CatalogOnly
                    && p.extraction.inci_ingredients.as_ref().map(Vec::is_empty).unwrap_or(true)
            })
            .collect())
    }
}
