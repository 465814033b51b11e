//! Coverage engine (§4.9, component I).
//!
//! Drives one brand end-to-end: classify discovered URLs into counters,
//! fetch + extract + gate + persist each product URL in strict order, and
//! maintain the stop-the-line safety brake.
//!
//! Sequential within a brand by design (§5): the loop below never spawns
//! concurrent fetches for a single brand, because ordered accumulation into
//! the counters and deterministic stop-the-line detection both rely on it.
//! A caller driving multiple brands concurrently should run one
//! `CoverageEngine::run` per brand, each owning its own fetcher session.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{Quota, RateLimiter};
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::extractor::{extract_deterministic, llm as llm_extractor};
use crate::ingredients::extract_and_validate_inci;
use crate::label_engine;
use crate::quality_gate::{self, GateVerdict};
use crate::taxonomy;
use crate::traits::fetcher::PageFetcher;
use crate::traits::llm::LlmClient;
use crate::traits::store::Repository;
use crate::types::blueprint::Blueprint;
use crate::types::brand::{DiscoveredUrl, UrlType};
use crate::types::coverage::{BrandCoverage, BrandReport, CoverageStatus};
use crate::types::product::{ExtractionMethod, GenderTarget, ProductExtraction};

/// Quarantine-rate threshold that trips the stop-the-line breaker (§4.9).
pub const STOP_THE_LINE_THRESHOLD: f64 = 0.50;
/// Minimum number of extracted products before the breaker is armed (§4.9,
/// §8 scenario 4: "extracts 5 products, all quarantined").
pub const STOP_THE_LINE_MIN_EXTRACTED: u64 = 5;

type DefaultRateLimiter =
    RateLimiter<governor::state::NotKeyed, governor::state::InMemoryState, governor::clock::DefaultClock>;

/// Drives one brand's full discover→extract→gate→persist loop.
///
/// Owns the fetcher for the duration of one `run` call; the rate limiter's
/// "time of last request" state is scoped to this instance, never to a
/// module global (§9 "Global state").
pub struct CoverageEngine<F, R> {
    fetcher: F,
    repository: R,
    llm_client: Option<Arc<dyn LlmClient>>,
    limiter: DefaultRateLimiter,
}

impl<F, R> CoverageEngine<F, R>
where
    F: PageFetcher,
    R: Repository,
{
    /// Build an engine with the given fetcher/repository, rate-limited to
    /// one request per `request_delay` (§6 `REQUEST_DELAY_SECONDS`).
    pub fn new(fetcher: F, repository: R, request_delay: Duration, llm_client: Option<Arc<dyn LlmClient>>) -> Self {
        let per_second = (1.0 / request_delay.as_secs_f64().max(0.001)).max(1.0) as u32;
        let quota = Quota::per_second(NonZeroU32::new(per_second.max(1)).unwrap());
        Self {
            fetcher,
            repository,
            llm_client,
            limiter: RateLimiter::direct(quota),
        }
    }

    /// Run the full pipeline for one brand against its already-discovered
    /// URLs. Returns the finalized [`BrandCoverage`] row; also upserts it
    /// into the repository before returning (§4.9 "finalize report; upsert
    /// BrandCoverage").
    pub async fn run(&self, blueprint: &Blueprint, discovered: Vec<DiscoveredUrl>) -> Result<BrandCoverage> {
        let mut report = BrandReport::new();
        report.discovered_total = discovered.len() as u64;

        let allowed_domains = blueprint.effective_allowed_domains();
        let mut product_urls = Vec::new();

        for item in &discovered {
            let url_type = crate::classifier::classify(&item.url, blueprint.discovery.product_url_pattern.as_deref());
            match url_type {
                UrlType::Kit => report.kits_total += 1,
                UrlType::NonHair => report.non_hair_total += 1,
                UrlType::Product | UrlType::Category => {
                    report.hair_total += 1;
                    if url_type == UrlType::Product {
                        product_urls.push(item.url.clone());
                    }
                }
                UrlType::Other => report.non_hair_total += 1,
            }
        }

        let mut status = CoverageStatus::Completed;

        for url in &product_urls {
            self.limiter.until_ready().await;

            match self.extract_one(blueprint, url, &allowed_domains).await {
                Ok(Some(extraction)) => {
                    let verdict = quality_gate::run_product_qa(
                        &extraction,
                        &allowed_domains,
                        quality_gate::DEFAULT_MIN_CONFIDENCE,
                    );
                    self.repository.upsert_product(&extraction, &verdict).await?;
                    report.extracted_total += 1;
                    match &verdict {
                        GateVerdict::VerifiedInci => report.verified_inci_total += 1,
                        GateVerdict::CatalogOnly => report.catalog_only_total += 1,
                        GateVerdict::Quarantined { .. } => report.quarantined_total += 1,
                    }

                    if report.extracted_total >= STOP_THE_LINE_MIN_EXTRACTED
                        && report.failure_rate() > STOP_THE_LINE_THRESHOLD
                    {
                        warn!(
                            brand_slug = %blueprint.brand_slug,
                            failure_rate = report.failure_rate(),
                            "stop-the-line triggered"
                        );
                        report.record_error(format!(
                            "stop_the_line: failure_rate={:.2} after {} products",
                            report.failure_rate(),
                            report.extracted_total
                        ));
                        status = CoverageStatus::StoppedTheLine;
                        break;
                    }
                }
                Ok(None) => {
                    // No product name found; skipped per §4.9 ("if no
                    // product_name: skip"), not an error.
                }
                Err(err) => {
                    warn!(url = %url, error = %err, "extraction error");
                    report.record_error(format!("extraction_error: {url}: {err}"));
                }
            }
        }

        let coverage = report.finalize(blueprint.brand_slug.clone(), status);
        self.repository.upsert_brand_coverage(&coverage).await?;

        info!(
            brand_slug = %blueprint.brand_slug,
            extracted = coverage.extracted_total,
            verified_rate = coverage.verified_inci_rate,
            quarantined = coverage.quarantined_total,
            "brand run complete"
        );

        Ok(coverage)
    }

    /// Fetch and fully extract one product URL: deterministic chain, LLM
    /// fallback (budget-gated), taxonomy, hair relevance, label engine.
    /// Returns `Ok(None)` when no product name could be established at all.
    async fn extract_one(
        &self,
        blueprint: &Blueprint,
        url: &str,
        allowed_domains: &[String],
    ) -> Result<Option<ProductExtraction>> {
        let page = self
            .fetcher
            .fetch_default(url)
            .await
            .map_err(PipelineError::Fetch)?;

        let det = extract_deterministic(&page.html, url, &blueprint.extraction);

        let Some(product_name) = det.product_name.clone() else {
            return Ok(None);
        };

        let mut extraction = ProductExtraction::new(blueprint.brand_slug.clone(), url.to_string());
        extraction.product_name = Some(product_name.clone());
        extraction.image_url_main = det.image_url_main.clone();
        extraction.description = det.description.clone();
        extraction.price = det.price;
        extraction.currency = det.currency.clone();
        extraction.evidence = det.evidence.clone();
        extraction.extraction_method = det.extraction_method;

        extraction.gender_target = match taxonomy::detect_gender_target(&product_name, url) {
            taxonomy::UrlGenderGuess::Unisex => GenderTarget::Unisex,
            taxonomy::UrlGenderGuess::Kids => GenderTarget::Kids,
            taxonomy::UrlGenderGuess::Men => GenderTarget::Men,
            taxonomy::UrlGenderGuess::Unknown => GenderTarget::Unknown,
        };
        extraction.product_type_normalized = taxonomy::normalize_product_type(&product_name).map(String::from);
        extraction.product_category =
            taxonomy::normalize_category(extraction.product_type_normalized.as_deref(), &product_name)
                .map(String::from);

        let (relevant, reason) =
            taxonomy::is_hair_relevant_by_keywords(&product_name, url, extraction.description.as_deref().unwrap_or(""));
        extraction.hair_relevance_reason = Some(if relevant {
            reason
        } else {
            "url_classified_as_product".to_string()
        });

        // INCI processing: deterministic first, confidence per §4.4.
        if let Some(raw) = &det.inci_raw {
            let validated = extract_and_validate_inci(Some(raw));
            if validated.valid {
                extraction.inci_ingredients = Some(validated.cleaned);
                extraction.confidence = 0.90;
            } else {
                extraction.confidence = 0.30;
            }
        }

        // S5 — LLM-grounded fallback, only when no deterministic ingredients
        // were found, the blueprint opts in, and the per-brand budget allows.
        if extraction.inci_ingredients.is_none() && blueprint.extraction.use_llm_fallback {
            if let Some(client) = &self.llm_client {
                if client.can_call(&blueprint.brand_slug) {
                    let document = scraper::Html::parse_document(&page.html);
                    let page_text = llm_extractor::cleaned_text_view(&document);
                    if let Some(result) =
                        llm_extractor::try_llm_extraction(client.as_ref(), &blueprint.brand_slug, &page_text).await
                    {
                        if result.accepted {
                            if let Some(ingredients) = result.inci_ingredients {
                                let raw_joined = ingredients.join(", ");
                                extraction.evidence.push(crate::types::evidence::Evidence::new(
                                    "inci_ingredients",
                                    url,
                                    "llm_grounded",
                                    &raw_joined,
                                    ExtractionMethod::LlmGrounded,
                                    chrono::Utc::now(),
                                ));
                                extraction.inci_ingredients = Some(ingredients);
                                extraction.confidence = 0.85;
                                extraction.extraction_method = Some(ExtractionMethod::LlmGrounded);
                            }
                        }
                        if extraction.description.is_none() {
                            extraction.description = result.description;
                        }
                    }
                }
            }
        }

        let image_texts: Vec<String> = Vec::new();
        extraction.product_labels = Some(label_engine::detect_for_product(&extraction, &image_texts));

        let _ = allowed_domains;
        Ok(Some(extraction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockFetcher, MockLlmClient};
    use crate::traits::store::ProductFilter;
    use crate::types::blueprint::{ExtractionConfig, Platform};
    use crate::stores::memory::MemoryRepository;

    fn blueprint(use_llm_fallback: bool) -> Blueprint {
        Blueprint {
            brand_slug: "curl-crew".into(),
            brand_name: "Curl Crew".into(),
            platform: Platform::Custom,
            domain: "brand.example".into(),
            allowed_domains: vec![],
            entrypoints: vec![],
            discovery: Default::default(),
            extraction: ExtractionConfig {
                inci_selectors: vec![".product-ingredients".into()],
                name_selectors: vec!["h1.product-name".into()],
                image_selectors: vec!["img.product-img".into()],
                wait_for_selector: None,
                use_llm_fallback,
            },
            version: 1,
        }
    }

    fn verified_page() -> &'static str {
        r#"<html><body>
        <h1 class="product-name">Shampoo Reparador</h1>
        <img class="product-img" src="https://brand.example/img/1.jpg">
        <p class="product-ingredients">Aqua, Glycerin, Parfum, Cetearyl Alcohol, Dimethicone, Tocopherol, Phenoxyethanol, Sodium Chloride, Citric Acid, Behentrimonium Chloride, Amodimethicone, Cetrimonium Chloride</p>
        </body></html>"#
    }

    #[tokio::test]
    async fn verified_product_end_to_end() {
        let fetcher = MockFetcher::new().with_page("https://brand.example/p/shampoo-1-250ml", verified_page());
        let repo = MemoryRepository::new();
        let engine = CoverageEngine::new(fetcher, repo, Duration::from_millis(1), None);

        let discovered = vec![DiscoveredUrl::new(
            "https://brand.example/p/shampoo-1-250ml",
            "sitemap",
        )];

        let coverage = engine.run(&blueprint(false), discovered).await.unwrap();
        assert_eq!(coverage.extracted_total, 1);
        assert_eq!(coverage.verified_inci_total, 1);
        assert_eq!(coverage.status, CoverageStatus::Completed);

        let products = engine
            .repository
            .get_products(&ProductFilter::default(), Default::default())
            .await
            .unwrap();
        assert_eq!(products.len(), 1);
    }

    #[tokio::test]
    async fn stop_the_line_after_five_quarantined() {
        let mut fetcher = MockFetcher::new();
        let bad_page = r#"<html><body><h1 class="product-name">Shampoo Ruim</h1></body></html>"#;
        let mut discovered = Vec::new();
        for i in 0..6 {
            let url = format!("https://brand.example/p/shampoo-{i}-250ml");
            fetcher = fetcher.with_page(&url, bad_page);
            discovered.push(DiscoveredUrl::new(url, "sitemap"));
        }

        let repo = MemoryRepository::new();
        let engine = CoverageEngine::new(fetcher, repo, Duration::from_millis(1), None);
        let coverage = engine.run(&blueprint(false), discovered).await.unwrap();

        assert_eq!(coverage.extracted_total, 5);
        assert_eq!(coverage.quarantined_total, 5);
        assert_eq!(coverage.status, CoverageStatus::StoppedTheLine);
        assert!(coverage.coverage_report.to_string().contains("stop_the_line"));
    }

    #[tokio::test]
    async fn llm_fallback_fills_ingredients_when_budget_allows() {
        let page = r#"<html><body><h1 class="product-name">Shampoo Sem Lista</h1></body></html>"#;
        let fetcher = MockFetcher::new().with_page("https://brand.example/p/shampoo-1-250ml", page);
        let repo = MemoryRepository::new();
        let llm = Arc::new(MockLlmClient::new().with_budget(1).with_ingredients(vec![
            "Aqua".into(),
            "Glycerin".into(),
            "Parfum".into(),
            "Cetearyl Alcohol".into(),
            "Dimethicone".into(),
        ]));
        let engine = CoverageEngine::new(fetcher, repo, Duration::from_millis(1), Some(llm.clone()));

        let discovered = vec![DiscoveredUrl::new("https://brand.example/p/shampoo-1-250ml", "sitemap")];
        let coverage = engine.run(&blueprint(true), discovered).await.unwrap();
        assert_eq!(coverage.verified_inci_total, 1);
    }
}
