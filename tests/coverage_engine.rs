//! End-to-end coverage-engine scenarios: a brand run driven entirely through
//! the public trait boundaries against an in-memory repository and mock
//! fetcher/LLM client, no real network or model calls.

use std::sync::Arc;
use std::time::Duration;

use haircat::testing::{MockFetcher, MockLlmClient};
use haircat::{
    Blueprint, CoverageEngine, CoverageStatus, DiscoveredUrl, ExtractionConfig, MemoryRepository, Platform,
};

fn blueprint(use_llm_fallback: bool) -> Blueprint {
    Blueprint {
        brand_slug: "curl-crew".to_string(),
        brand_name: "Curl Crew".to_string(),
        platform: Platform::Custom,
        domain: "brand.example".to_string(),
        allowed_domains: vec![],
        entrypoints: vec![],
        discovery: Default::default(),
        extraction: ExtractionConfig {
            inci_selectors: vec![".product-ingredients".to_string()],
            name_selectors: vec!["h1.product-name".to_string()],
            image_selectors: vec!["img.product-img".to_string()],
            wait_for_selector: None,
            use_llm_fallback,
        },
        version: 1,
    }
}

fn page(name: &str, ingredients: Option<&str>) -> String {
    let ingredients_html = ingredients
        .map(|i| format!(r#"<p class="product-ingredients">{i}</p>"#))
        .unwrap_or_default();
    format!(
        r#"<html><body>
        <h1 class="product-name">{name}</h1>
        <img class="product-img" src="https://brand.example/img/1.jpg">
        {ingredients_html}
        </body></html>"#
    )
}

const FULL_INCI: &str =
    "Aqua, Glycerin, Parfum, Cetearyl Alcohol, Dimethicone, Tocopherol, Phenoxyethanol, Sodium Chloride";

#[tokio::test]
async fn verified_product_with_full_structured_data() {
    let url = "https://brand.example/p/shampoo-reparador-250ml";
    let fetcher = MockFetcher::new().with_page(url, page("Shampoo Reparador", Some(FULL_INCI)));
    let repo = MemoryRepository::new();
    let engine = CoverageEngine::new(fetcher, repo, Duration::from_millis(1), None);

    let coverage = engine
        .run(&blueprint(false), vec![DiscoveredUrl::new(url, "sitemap")])
        .await
        .unwrap();

    assert_eq!(coverage.status, CoverageStatus::Completed);
    assert_eq!(coverage.extracted_total, 1);
    assert_eq!(coverage.verified_inci_total, 1);
    assert_eq!(coverage.quarantined_total, 0);
}

#[tokio::test]
async fn catalog_only_when_no_ingredient_source_found() {
    let url = "https://brand.example/p/oleo-capilar-100ml";
    let fetcher = MockFetcher::new().with_page(url, page("Óleo Capilar Nutritivo", None));
    let repo = MemoryRepository::new();
    let engine = CoverageEngine::new(fetcher, repo, Duration::from_millis(1), None);

    let coverage = engine
        .run(&blueprint(false), vec![DiscoveredUrl::new(url, "sitemap")])
        .await
        .unwrap();

    assert_eq!(coverage.catalog_only_total, 1);
    assert_eq!(coverage.verified_inci_total, 0);
}

#[tokio::test]
async fn quarantined_when_tier1_image_check_fails() {
    let url = "https://brand.example/p/duo-reparador-300ml";
    // No image selector match anywhere on the page: tier 1 rejects the
    // record before ingredients are even considered.
    let html = format!(
        r#"<html><body><h1 class="product-name">Duo Reparador</h1>
        <p class="product-ingredients">{FULL_INCI}</p>
        </body></html>"#
    );
    let fetcher = MockFetcher::new().with_page(url, html);
    let repo = MemoryRepository::new();
    let engine = CoverageEngine::new(fetcher, repo, Duration::from_millis(1), None);

    let coverage = engine
        .run(&blueprint(false), vec![DiscoveredUrl::new(url, "sitemap")])
        .await
        .unwrap();

    assert_eq!(coverage.quarantined_total, 1);
    assert_eq!(coverage.verified_inci_total, 0);
}

#[tokio::test]
async fn stop_the_line_after_five_quarantined_extractions() {
    let mut fetcher = MockFetcher::new();
    let mut discovered = Vec::new();
    for i in 0..6 {
        let url = format!("https://brand.example/p/shampoo-ruim-{i}-100ml");
        fetcher = fetcher.with_page(
            &url,
            format!(r#"<html><body><h1 class="product-name">Shampoo Ruim {i}</h1></body></html>"#),
        );
        discovered.push(DiscoveredUrl::new(url, "sitemap"));
    }

    let repo = MemoryRepository::new();
    let engine = CoverageEngine::new(fetcher, repo, Duration::from_millis(1), None);
    let coverage = engine.run(&blueprint(false), discovered).await.unwrap();

    assert_eq!(coverage.status, CoverageStatus::StoppedTheLine);
    assert_eq!(coverage.extracted_total, 5);
    assert_eq!(coverage.quarantined_total, 5);
}

#[tokio::test]
async fn llm_fallback_fills_ingredients_when_deterministic_chain_finds_none() {
    let url = "https://brand.example/p/mascara-hidratacao-500g";
    let fetcher = MockFetcher::new().with_page(url, page("Máscara Hidratação Intensa", None));
    let repo = MemoryRepository::new();
    let llm = Arc::new(
        MockLlmClient::new()
            .with_budget(50)
            .with_ingredients(vec![
                "Aqua".to_string(),
                "Glycerin".to_string(),
                "Parfum".to_string(),
                "Cetearyl Alcohol".to_string(),
                "Dimethicone".to_string(),
            ]),
    );
    let engine = CoverageEngine::new(fetcher, repo, Duration::from_millis(1), Some(llm));

    let coverage = engine
        .run(&blueprint(true), vec![DiscoveredUrl::new(url, "sitemap")])
        .await
        .unwrap();

    assert_eq!(coverage.verified_inci_total, 1);
}

#[tokio::test]
async fn llm_fallback_does_not_run_once_brand_budget_is_exhausted() {
    let url = "https://brand.example/p/gel-fixador-200ml";
    let fetcher = MockFetcher::new().with_page(url, page("Gel Fixador Forte", None));
    let repo = MemoryRepository::new();
    // Budget of zero: can_call is false on the first check, so the run stays
    // on the deterministic-only path and the product ends up catalog-only.
    let llm = Arc::new(MockLlmClient::new().with_budget(0).with_ingredients(vec!["Aqua".to_string()]));
    let engine = CoverageEngine::new(fetcher, repo, Duration::from_millis(1), Some(llm.clone()));

    let coverage = engine
        .run(&blueprint(true), vec![DiscoveredUrl::new(url, "sitemap")])
        .await
        .unwrap();

    assert_eq!(coverage.catalog_only_total, 1);
    assert_eq!(llm.calls_made_for("curl-crew"), 0);
}
