//! The per-brand blueprint document (§6).

use serde::{Deserialize, Serialize};

/// E-commerce platform a brand's site runs on. Drives default selector packs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Vtex,
    Shopify,
    Woocommerce,
    Custom,
}

/// Pagination strategy for category/listing pages during discovery.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaginationConfig {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub max_pages: Option<u32>,
}

/// Discovery-phase knobs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiscoveryConfig {
    #[serde(default)]
    pub sitemap_urls: Vec<String>,
    #[serde(default)]
    pub product_url_pattern: Option<String>,
    #[serde(default)]
    pub max_pages: Option<u32>,
    #[serde(default)]
    pub pagination: Option<PaginationConfig>,
}

/// Extraction-phase knobs: the ordered CSS-selector lists S2 walks, and the
/// S5 opt-in flag.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtractionConfig {
    #[serde(default)]
    pub inci_selectors: Vec<String>,
    #[serde(default)]
    pub name_selectors: Vec<String>,
    #[serde(default)]
    pub image_selectors: Vec<String>,
    #[serde(default)]
    pub wait_for_selector: Option<String>,
    #[serde(default)]
    pub use_llm_fallback: bool,
}

/// The full per-brand configuration document (YAML-shaped, §6).
///
/// Unknown keys are ignored by construction: `serde_yaml` drops fields this
/// struct does not declare.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blueprint {
    pub brand_slug: String,
    pub brand_name: String,
    pub platform: Platform,
    pub domain: String,
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    #[serde(default)]
    pub entrypoints: Vec<String>,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    pub version: i32,
}

impl Blueprint {
    /// Parse a blueprint document from its YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// The brand's own domain plus any additional allowed domains.
    pub fn effective_allowed_domains(&self) -> Vec<String> {
        let mut domains = vec![self.domain.clone()];
        domains.extend(self.allowed_domains.iter().cloned());
        domains
    }
}

/// Default INCI/name/image selector packs per platform (§9).
pub fn default_selectors_for_platform(platform: Platform) -> ExtractionConfig {
    match platform {
        Platform::Vtex => ExtractionConfig {
            inci_selectors: vec![
                ".productDescription .inci".into(),
                "#ingredientes".into(),
                ".vtex-flex-layout-0-x-flexRowContent .inci".into(),
            ],
            name_selectors: vec![".vtex-store-components-3-x-productNameContainer".into()],
            image_selectors: vec![".vtex-store-components-3-x-productImageTag".into()],
            wait_for_selector: None,
            use_llm_fallback: false,
        },
        Platform::Shopify => ExtractionConfig {
            inci_selectors: vec![
                ".product__description .ingredients".into(),
                "[data-ingredients]".into(),
            ],
            name_selectors: vec!["h1.product__title".into(), "h1.product-single__title".into()],
            image_selectors: vec![".product__media img".into()],
            wait_for_selector: None,
            use_llm_fallback: false,
        },
        Platform::Woocommerce => ExtractionConfig {
            inci_selectors: vec![
                "#tab-ingredients".into(),
                ".woocommerce-product-details__short-description .ingredients".into(),
            ],
            name_selectors: vec!["h1.product_title".into()],
            image_selectors: vec![".woocommerce-product-gallery__image img".into()],
            wait_for_selector: None,
            use_llm_fallback: false,
        },
        Platform::Custom => ExtractionConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_yaml_ignoring_unknown_keys() {
        let yaml = r#"
brand_slug: curl-crew
brand_name: Curl Crew
platform: shopify
domain: curlcrew.example
version: 1
future_field_nobody_knows_about: true
"#;
        let blueprint = Blueprint::from_yaml(yaml).unwrap();
        assert_eq!(blueprint.brand_slug, "curl-crew");
        assert_eq!(blueprint.platform, Platform::Shopify);
        assert!(blueprint.allowed_domains.is_empty());
    }

    #[test]
    fn effective_allowed_domains_includes_primary_domain() {
        let blueprint = Blueprint {
            brand_slug: "x".into(),
            brand_name: "X".into(),
            platform: Platform::Custom,
            domain: "x.example".into(),
            allowed_domains: vec!["shop.x.example".into()],
            entrypoints: vec![],
            discovery: DiscoveryConfig::default(),
            extraction: ExtractionConfig::default(),
            version: 1,
        };
        let domains = blueprint.effective_allowed_domains();
        assert_eq!(domains, vec!["x.example".to_string(), "shop.x.example".to_string()]);
    }
}
