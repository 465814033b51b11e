//! Deterministic extractor (§4.4, component D): the ordered strategy-chain
//! fold over S1 (JSON-LD) → S2 (blueprint selectors) → S3 (label-proximity
//! heuristic) → S4 (meta-tag image fallback). S5 (LLM-grounded fallback) is
//! driven separately by [`crate::coverage`] since it is async and budgeted;
//! its output re-enters this module's confidence/evidence conventions.
//!
//! Each strategy only fills fields still unset by an earlier one (§9
//! "ordered-chain fallback ... a fold over strategies").

pub mod jsonld;
pub mod llm;
pub mod meta;
pub mod proximity;
pub mod selectors;

use chrono::Utc;
use scraper::Html;

use crate::types::blueprint::ExtractionConfig;
use crate::types::evidence::Evidence;
use crate::types::product::ExtractionMethod;

/// Everything the deterministic strategy chain can populate for one page,
/// plus the evidence trail that justifies each populated field. An
/// intermediate value the coverage engine folds into a full
/// `ProductExtraction` once a product name has been established.
#[derive(Debug, Clone, Default)]
pub struct DeterministicResult {
    pub product_name: Option<String>,
    pub image_url_main: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    /// Raw, uncleaned ingredient text — callers run it through
    /// [`crate::ingredients::extract_and_validate_inci`] themselves, since
    /// S5's LLM output re-enters that same validation path.
    pub inci_raw: Option<String>,
    pub inci_locator: Option<String>,
    /// Set as soon as any field is populated; `jsonld` takes priority over
    /// `html_selector` per §9's "structured data wins" resolution, even
    /// when a later strategy fills additional fields.
    pub extraction_method: Option<ExtractionMethod>,
    pub evidence: Vec<Evidence>,
}

impl DeterministicResult {
    fn record(
        &mut self,
        field_name: &str,
        source_url: &str,
        locator: &str,
        raw_text: &str,
        method: ExtractionMethod,
    ) {
        self.evidence.push(Evidence::new(field_name, source_url, locator, raw_text, method, Utc::now()));
        if self.extraction_method.is_none() {
            self.extraction_method = Some(method);
        }
    }
}

/// Run the full S1→S4 deterministic chain over one page's HTML.
///
/// `product_url` is the page's URL (used as `source_url` on every emitted
/// [`Evidence`] row); `config` supplies the blueprint's ordered selector
/// lists for S2.
pub fn extract_deterministic(html: &str, product_url: &str, config: &ExtractionConfig) -> DeterministicResult {
    let document = Html::parse_document(html);
    let mut result = DeterministicResult::default();

    // S1 — embedded structured data.
    if let Some(product) = jsonld::extract_jsonld_product(&document) {
        if let Some(name) = &product.name {
            result.product_name = Some(name.clone());
            result.record(
                "product_name",
                product_url,
                "json-ld @type=Product .name",
                name,
                ExtractionMethod::Jsonld,
            );
        }
        if let Some(image) = &product.image {
            result.image_url_main = Some(image.clone());
            result.record(
                "image_url_main",
                product_url,
                "json-ld @type=Product .image",
                image,
                ExtractionMethod::Jsonld,
            );
        }
        if let Some(description) = &product.description {
            result.description = Some(description.clone());
            result.record(
                "description",
                product_url,
                "json-ld @type=Product .description",
                description,
                ExtractionMethod::Jsonld,
            );
        }
        if let Some(price) = product.price {
            result.price = Some(price);
            result.currency = product.currency.clone();
            result.record(
                "price",
                product_url,
                "json-ld @type=Product .offers.price",
                &price.to_string(),
                ExtractionMethod::Jsonld,
            );
        }
    }

    // S2 — blueprint CSS selectors fill whatever S1 left unset.
    if result.product_name.is_none() {
        if let Some((text, selector)) = selectors::first_matching_text(&document, &config.name_selectors) {
            result.record("product_name", product_url, &selector, &text, ExtractionMethod::HtmlSelector);
            result.product_name = Some(text);
        }
    }
    if let Some((text, selector)) = selectors::first_matching_text(&document, &config.inci_selectors) {
        result.record("inci_ingredients", product_url, &selector, &text, ExtractionMethod::HtmlSelector);
        result.inci_locator = Some(selector);
        result.inci_raw = Some(text);
    }
    if result.image_url_main.is_none() {
        if let Some((src, selector)) = selectors::first_matching_image(&document, &config.image_selectors) {
            result.record("image_url_main", product_url, &selector, &src, ExtractionMethod::HtmlSelector);
            result.image_url_main = Some(src);
        }
    }

    // S3 — label-proximity heuristic, only when S1/S2 found no ingredient text.
    if result.inci_raw.is_none() {
        if let Some(candidate) = proximity::pick_winner(&document) {
            result.record(
                "inci_ingredients",
                product_url,
                &candidate.locator,
                &candidate.content,
                ExtractionMethod::HtmlSelector,
            );
            result.inci_locator = Some(candidate.locator);
            result.inci_raw = Some(candidate.content);
        }
    }

    // S4 — meta-tag image fallback, only when still unset (structured data wins, §9).
    if result.image_url_main.is_none() {
        if let Some(og_image) = meta::extract_og_image(&document) {
            result.record(
                "image_url_main",
                product_url,
                r#"meta[property="og:image"]"#,
                &og_image,
                ExtractionMethod::HtmlSelector,
            );
            result.image_url_main = Some(og_image);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::blueprint::ExtractionConfig;

    fn config() -> ExtractionConfig {
        ExtractionConfig {
            inci_selectors: vec![".product-ingredients".to_string()],
            name_selectors: vec!["h1.product-name".to_string()],
            image_selectors: vec!["img.product-img".to_string()],
            wait_for_selector: None,
            use_llm_fallback: false,
        }
    }

    #[test]
    fn jsonld_wins_over_selectors_for_name_and_sets_method() {
        let html = r#"
        <html><head>
        <script type="application/ld+json">
        {"@type":"Product","name":"Shampoo Reparador","offers":{"price":"29.90","priceCurrency":"BRL"}}
        </script>
        </head><body><h1 class="product-name">Wrong Name</h1></body></html>"#;
        let result = extract_deterministic(html, "https://brand.example/p/1", &config());
        assert_eq!(result.product_name.as_deref(), Some("Shampoo Reparador"));
        assert_eq!(result.price, Some(29.90));
        assert_eq!(result.extraction_method, Some(ExtractionMethod::Jsonld));
    }

    #[test]
    fn selectors_fill_name_when_no_jsonld() {
        let html = r#"<html><body><h1 class="product-name">Shampoo Reparador</h1></body></html>"#;
        let result = extract_deterministic(html, "https://brand.example/p/1", &config());
        assert_eq!(result.product_name.as_deref(), Some("Shampoo Reparador"));
        assert_eq!(result.extraction_method, Some(ExtractionMethod::HtmlSelector));
    }

    #[test]
    fn proximity_heuristic_used_only_when_selectors_find_nothing() {
        let html = r#"
        <html><body>
        <h1 class="product-name">Shampoo Reparador</h1>
        <h2>Lista completa de ingredientes</h2>
        <p>Aqua, Glycerin, Parfum, Cetearyl Alcohol, Dimethicone, Tocopherol, Phenoxyethanol</p>
        </body></html>"#;
        let result = extract_deterministic(html, "https://brand.example/p/1", &config());
        assert!(result.inci_raw.unwrap().contains("Aqua"));
    }

    #[test]
    fn og_image_used_only_when_nothing_else_found() {
        let html = r#"
        <html><head><meta property="og:image" content="https://brand.example/og.jpg"></head>
        <body><h1 class="product-name">Shampoo Reparador</h1></body></html>"#;
        let result = extract_deterministic(html, "https://brand.example/p/1", &config());
        assert_eq!(result.image_url_main.as_deref(), Some("https://brand.example/og.jpg"));
    }
}
