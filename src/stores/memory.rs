//! In-memory [`Repository`] implementation, for tests and local demos.
//!
//! Mirrors the shape of an in-memory store: plain `RwLock<HashMap<...>>`
//! state, `.read().unwrap()`/`.write().unwrap()` locking, and a handful of
//! `*_count`/`clear` helpers for test assertions. Not suitable for
//! production — state is lost on restart (§9 "storage backend").

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{RepositoryError, RepositoryResult};
use crate::quality_gate::GateVerdict;
use crate::traits::store::{Page, ProductFilter, Repository};
use crate::types::coverage::BrandCoverage;
use crate::types::labels::LabelResult;
use crate::types::product::{ProductExtraction, QuarantineDetail, StoredProduct, VerificationStatus};

/// In-memory product/coverage repository, keyed by `product_url` for
/// idempotent upserts and by `id` for direct lookup.
pub struct MemoryRepository {
    products: RwLock<HashMap<Uuid, StoredProduct>>,
    url_index: RwLock<HashMap<String, Uuid>>,
    coverage: RwLock<HashMap<String, BrandCoverage>>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
            url_index: RwLock::new(HashMap::new()),
            coverage: RwLock::new(HashMap::new()),
        }
    }

    /// Drop all stored products and coverage rows.
    pub fn clear(&self) {
        self.products.write().unwrap().clear();
        self.url_index.write().unwrap().clear();
        self.coverage.write().unwrap().clear();
    }

    /// Number of distinct products currently stored.
    pub fn product_count(&self) -> usize {
        self.products.read().unwrap().len()
    }

    fn matches(stored: &StoredProduct, filter: &ProductFilter) -> bool {
        if let Some(brand_slug) = &filter.brand_slug {
            if &stored.extraction.brand_slug != brand_slug {
                return false;
            }
        }
        if filter.verified_only && stored.verification_status != VerificationStatus::VerifiedInci {
            return false;
        }
        if let Some(category) = &filter.category {
            if stored.extraction.product_category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(search) = &filter.search {
            let lower = search.to_lowercase();
            let name_matches = stored
                .extraction
                .product_name
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .contains(&lower);
            let description_matches = stored
                .extraction
                .description
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .contains(&lower);
            if !name_matches && !description_matches {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn upsert_product(&self, extraction: &ProductExtraction, verdict: &GateVerdict) -> RepositoryResult<Uuid> {
        let (verification_status, quarantine_detail) = match verdict {
            GateVerdict::VerifiedInci => (VerificationStatus::VerifiedInci, None),
            GateVerdict::CatalogOnly => (VerificationStatus::CatalogOnly, None),
            GateVerdict::Quarantined { rejection_code, rejection_reason } => (
                VerificationStatus::Quarantined,
                Some(QuarantineDetail::new(rejection_code.clone(), rejection_reason.clone())),
            ),
        };

        let mut url_index = self.url_index.write().unwrap();
        let mut products = self.products.write().unwrap();
        let now = Utc::now();

        if let Some(&id) = url_index.get(&extraction.product_url) {
            let existing = products.get_mut(&id).expect("url_index entry without product row");
            let mut evidence = std::mem::take(&mut existing.extraction.evidence);
            evidence.extend(extraction.evidence.iter().cloned());
            existing.extraction = extraction.clone();
            existing.extraction.evidence = evidence;
            existing.verification_status = verification_status;
            existing.quarantine_detail = quarantine_detail;
            existing.updated_at = now;
            Ok(id)
        } else {
            let id = Uuid::new_v4();
            url_index.insert(extraction.product_url.clone(), id);
            products.insert(
                id,
                StoredProduct {
                    id,
                    extraction: extraction.clone(),
                    verification_status,
                    quarantine_detail,
                    created_at: now,
                    updated_at: now,
                },
            );
            Ok(id)
        }
    }

    async fn get_products(&self, filter: &ProductFilter, page: Page) -> RepositoryResult<Vec<StoredProduct>> {
        let products = self.products.read().unwrap();
        let mut matching: Vec<StoredProduct> = products
            .values()
            .filter(|p| Self::matches(p, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let start = page.offset.min(matching.len() as u64) as usize;
        let end = start.saturating_add(page.limit as usize).min(matching.len());
        Ok(matching[start..end].to_vec())
    }

    async fn count_products(&self, filter: &ProductFilter) -> RepositoryResult<u64> {
        let products = self.products.read().unwrap();
        Ok(products.values().filter(|p| Self::matches(p, filter)).count() as u64)
    }

    async fn get_product_by_id(&self, id: Uuid) -> RepositoryResult<StoredProduct> {
        self.products
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::ProductNotFound { id })
    }

    async fn upsert_brand_coverage(&self, coverage: &BrandCoverage) -> RepositoryResult<()> {
        self.coverage
            .write()
            .unwrap()
            .insert(coverage.brand_slug.clone(), coverage.clone());
        Ok(())
    }

    async fn get_brand_coverage(&self, brand_slug: &str) -> RepositoryResult<Option<BrandCoverage>> {
        Ok(self.coverage.read().unwrap().get(brand_slug).cloned())
    }

    async fn get_all_brand_coverages(&self) -> RepositoryResult<Vec<BrandCoverage>> {
        Ok(self.coverage.read().unwrap().values().cloned().collect())
    }

    async fn update_product_labels(&self, product_id: Uuid, labels: &LabelResult) -> RepositoryResult<()> {
        let mut products = self.products.write().unwrap();
        let product = products
            .get_mut(&product_id)
            .ok_or(RepositoryError::ProductNotFound { id: product_id })?;
        product.extraction.product_labels = Some(labels.clone());
        product.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(url: &str) -> ProductExtraction {
        let mut p = ProductExtraction::new("curl-crew", url);
        p.product_name = Some("Shampoo Reparador".to_string());
        p
    }

    #[tokio::test]
    async fn upsert_is_idempotent_by_product_url() {
        let repo = MemoryRepository::new();
        let id1 = repo
            .upsert_product(&product("https://brand.example/p/1"), &GateVerdict::CatalogOnly)
            .await
            .unwrap();
        let id2 = repo
            .upsert_product(&product("https://brand.example/p/1"), &GateVerdict::CatalogOnly)
            .await
            .unwrap();
        assert_eq!(id1, id2);
        assert_eq!(repo.product_count(), 1);
    }

    #[tokio::test]
    async fn quarantined_upsert_creates_quarantine_detail() {
        let repo = MemoryRepository::new();
        let verdict = GateVerdict::Quarantined {
            rejection_code: "tier1_failed".to_string(),
            rejection_reason: "image_missing".to_string(),
        };
        let id = repo
            .upsert_product(&product("https://brand.example/p/2"), &verdict)
            .await
            .unwrap();
        let stored = repo.get_product_by_id(id).await.unwrap();
        assert_eq!(stored.verification_status, VerificationStatus::Quarantined);
        assert!(stored.quarantine_detail.is_some());
    }

    #[tokio::test]
    async fn upsert_appends_evidence_instead_of_clobbering_it() {
        let repo = MemoryRepository::new();
        let mut first = product("https://brand.example/p/4");
        first.add_evidence(crate::types::evidence::Evidence::new(
            "product_name",
            &first.product_url,
            "h1.name",
            "Shampoo Reparador",
            crate::types::product::ExtractionMethod::HtmlSelector,
            Utc::now(),
        ));
        let id = repo.upsert_product(&first, &GateVerdict::CatalogOnly).await.unwrap();

        let mut second = product("https://brand.example/p/4");
        second.add_evidence(crate::types::evidence::Evidence::new(
            "description",
            &second.product_url,
            "meta[name=description]",
            "Repara fios danificados",
            crate::types::product::ExtractionMethod::HtmlSelector,
            Utc::now(),
        ));
        let id2 = repo.upsert_product(&second, &GateVerdict::CatalogOnly).await.unwrap();
        assert_eq!(id, id2);

        let stored = repo.get_product_by_id(id).await.unwrap();
        assert_eq!(stored.extraction.evidence.len(), 2);
        assert_eq!(stored.extraction.evidence[0].field_name, "product_name");
        assert_eq!(stored.extraction.evidence[1].field_name, "description");
    }

    #[tokio::test]
    async fn get_products_without_inci_default_impl() {
        let repo = MemoryRepository::new();
        repo.upsert_product(&product("https://brand.example/p/3"), &GateVerdict::CatalogOnly)
            .await
            .unwrap();
        let without_inci = repo.get_products_without_inci("curl-crew").await.unwrap();
        assert_eq!(without_inci.len(), 1);
    }

    #[tokio::test]
    async fn brand_coverage_roundtrip() {
        let repo = MemoryRepository::new();
        let coverage = crate::types::coverage::BrandReport::new()
            .finalize("curl-crew", crate::types::coverage::CoverageStatus::Completed);
        repo.upsert_brand_coverage(&coverage).await.unwrap();
        let fetched = repo.get_brand_coverage("curl-crew").await.unwrap();
        assert!(fetched.is_some());
        assert_eq!(repo.get_all_brand_coverages().await.unwrap().len(), 1);
    }
}
