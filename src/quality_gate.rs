//! Quality gate (§4.8, component H).
//!
//! Tiered, all-or-nothing: Tier 1 minimal validity, Tier 2 ingredient
//! validation. Emits a [`GateVerdict`] the coverage engine folds directly
//! into a `VerificationStatus` + optional `QuarantineDetail`.

use url::Url;

use crate::ingredients::validate_inci_list;
use crate::types::product::ProductExtraction;

/// Minimum ingredient-confidence a product needs to pass Tier 2 (§4.8, configurable).
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.80;

const GARBAGE_NAMES: &[&str] = &["404", "não encontrado", "nao encontrado", "page not found", "error"];

/// The gate's outcome for one product record.
#[derive(Debug, Clone, PartialEq)]
pub enum GateVerdict {
    VerifiedInci,
    CatalogOnly,
    Quarantined { rejection_code: String, rejection_reason: String },
}

fn check_domain(product_url: &str, allowed_domains: &[String]) -> bool {
    let Ok(parsed) = Url::parse(product_url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    allowed_domains
        .iter()
        .any(|domain| host == domain || host.ends_with(&format!(".{domain}")))
}

fn tier1(product: &ProductExtraction, allowed_domains: &[String]) -> Vec<String> {
    let mut failed = Vec::new();

    let name_ok = match &product.product_name {
        Some(name) => {
            let lower = name.to_lowercase();
            !GARBAGE_NAMES.iter().any(|g| lower.contains(g))
        }
        None => false,
    };
    if !name_ok {
        failed.push("name_invalid".to_string());
    }

    if !check_domain(&product.product_url, allowed_domains) {
        failed.push("domain_not_allowed".to_string());
    }

    if product.image_url_main.is_none() {
        failed.push("image_missing".to_string());
    }

    if product
        .hair_relevance_reason
        .as_deref()
        .unwrap_or("")
        .trim()
        .is_empty()
    {
        failed.push("hair_relevance_missing".to_string());
    }

    failed
}

/// Run the full tiered gate over a product record (§4.8).
pub fn run_product_qa(
    product: &ProductExtraction,
    allowed_domains: &[String],
    min_confidence: f64,
) -> GateVerdict {
    let failed = tier1(product, allowed_domains);
    if !failed.is_empty() {
        return GateVerdict::Quarantined {
            rejection_code: "tier1_failed".to_string(),
            rejection_reason: failed.join("; "),
        };
    }

    let Some(ingredients) = &product.inci_ingredients else {
        return GateVerdict::CatalogOnly;
    };

    let revalidated = validate_inci_list(ingredients.clone());
    if !revalidated.valid {
        let code = revalidated.rejection_reason.unwrap_or_else(|| "inci_invalid".to_string());
        return GateVerdict::Quarantined {
            rejection_reason: code.clone(),
            rejection_code: format!("inci_invalid:{code}"),
        };
    }

    if product.confidence < min_confidence {
        return GateVerdict::Quarantined {
            rejection_code: "confidence_below_threshold".to_string(),
            rejection_reason: format!("confidence {} < {}", product.confidence, min_confidence),
        };
    }

    GateVerdict::VerifiedInci
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_product() -> ProductExtraction {
        let mut p = ProductExtraction::new("brand", "https://brand.example/p/shampoo-1");
        p.product_name = Some("Shampoo Reparador".to_string());
        p.image_url_main = Some("https://brand.example/img/1.jpg".to_string());
        p.hair_relevance_reason = Some("keyword 'shampoo' found".to_string());
        p
    }

    #[test]
    fn catalog_only_without_ingredients() {
        let product = base_product();
        let verdict = run_product_qa(&product, &["brand.example".to_string()], DEFAULT_MIN_CONFIDENCE);
        assert_eq!(verdict, GateVerdict::CatalogOnly);
    }

    #[test]
    fn verified_with_valid_ingredients_and_high_confidence() {
        let mut product = base_product();
        product.inci_ingredients = Some(
            vec!["Aqua", "Glycerin", "Parfum", "Cetearyl Alcohol", "Dimethicone"]
                .into_iter()
                .map(String::from)
                .collect(),
        );
        product.confidence = 0.9;
        let verdict = run_product_qa(&product, &["brand.example".to_string()], DEFAULT_MIN_CONFIDENCE);
        assert_eq!(verdict, GateVerdict::VerifiedInci);
    }

    #[test]
    fn tier1_failure_when_domain_not_allowed() {
        let product = base_product();
        let verdict = run_product_qa(&product, &["other.example".to_string()], DEFAULT_MIN_CONFIDENCE);
        matches!(verdict, GateVerdict::Quarantined { .. });
    }

    #[test]
    fn quarantined_by_concatenation() {
        let mut product = base_product();
        product.inci_ingredients = Some(vec![
            "Shampoo: Aqua".to_string(),
            "Glycerin".to_string(),
            "Parfum".to_string(),
            "Condicionador: Aqua".to_string(),
            "Cetearyl Alcohol".to_string(),
            "Dimethicone".to_string(),
        ]);
        product.confidence = 0.9;
        let verdict = run_product_qa(&product, &["brand.example".to_string()], DEFAULT_MIN_CONFIDENCE);
        match verdict {
            GateVerdict::Quarantined { rejection_reason, .. } => {
                assert_eq!(rejection_reason, "concat_detected");
            }
            other => panic!("expected quarantined, got {other:?}"),
        }
    }
}
