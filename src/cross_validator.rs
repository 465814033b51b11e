//! Field cross-validator (§4.7, component G).
//!
//! Flags records where a value looks like it belongs to a different field
//! — marketing copy in the ingredient slot, an ingredient dump in the
//! description, and so on.

use regex::Regex;

use crate::types::product::ProductExtraction;
use crate::types::validation::{FieldIssue, IssueSeverity, ValidationReport};

const MARKETING_PHRASES: &[&str] = &[
    "sem amônia",
    "sem amonia",
    "fácil de aplicar",
    "facil de aplicar",
    "ideal para",
    "formulação",
    "formulacao",
    "proporciona",
    "promove",
    "fortalece",
    "protege",
    "tecnologia",
    "resultado",
    "hidratação profunda",
    "hidratacao profunda",
    "brilho intenso",
    "maciez",
    "nutrição",
    "nutricao",
    "reconstrução capilar",
    "reconstrucao capilar",
    "textura sedosa",
    "toque sedoso",
    "transformação",
    "transformacao",
    "renova",
];

const USAGE_PHRASES: &[&str] = &[
    "aplique",
    "massageie",
    "enxágue",
    "enxague",
    "apply to",
    "rinse",
    "wash",
    "modo de uso",
    "passo 1",
    "step 1",
    "seque com",
    "penteie",
    "deixe agir",
    "em seguida",
    "repita se necessário",
    "repita se necessario",
];

const INCI_ANCHOR_INGREDIENTS: &[&str] = &[
    "aqua",
    "water",
    "sodium laureth sulfate",
    "sodium lauryl sulfate",
    "cetearyl alcohol",
    "glycerin",
    "dimethicone",
    "phenoxyethanol",
    "tocopherol",
    "cetrimonium chloride",
    "stearyl alcohol",
    "isopropyl myristate",
    "parfum",
    "fragrance",
    "citric acid",
    "sodium chloride",
    "behentrimonium chloride",
    "amodimethicone",
];

fn count_hits(text: &str, phrases: &[&str]) -> usize {
    let lower = text.to_lowercase();
    phrases.iter().filter(|p| lower.contains(*p)).count()
}

fn check_inci_is_marketing(ingredients: &[String]) -> Vec<FieldIssue> {
    let joined = ingredients.join(" ").to_lowercase();
    let marketing_hits: usize = ingredients.iter().map(|i| count_hits(i, MARKETING_PHRASES)).sum();
    let anchors_found = INCI_ANCHOR_INGREDIENTS.iter().any(|a| joined.contains(a));

    let mut issues = Vec::new();
    if marketing_hits > 0 && !anchors_found {
        issues.push(FieldIssue::new(
            "inci_ingredients",
            "inci_is_marketing",
            IssueSeverity::Error,
            "ingredient list looks like marketing copy, not an INCI list",
        ));
    } else if !ingredients.is_empty() && marketing_hits as f64 / ingredients.len() as f64 > 0.30 {
        issues.push(FieldIssue::new(
            "inci_ingredients",
            "inci_mixed_marketing",
            IssueSeverity::Warning,
            "ingredient list contains a significant share of marketing phrases",
        ));
    }
    issues
}

fn check_inci_is_usage(ingredients: &[String]) -> Vec<FieldIssue> {
    if ingredients.is_empty() {
        return Vec::new();
    }
    let usage_hits = ingredients
        .iter()
        .filter(|i| count_hits(i, USAGE_PHRASES) > 0)
        .count();
    let ratio = usage_hits as f64 / ingredients.len() as f64;
    let mut issues = Vec::new();
    if ratio > 0.30 {
        issues.push(FieldIssue::new(
            "inci_ingredients",
            "inci_is_usage",
            IssueSeverity::Error,
            "ingredient list is mostly usage instructions",
        ));
    } else if usage_hits > 0 {
        issues.push(FieldIssue::new(
            "inci_ingredients",
            "inci_has_usage_text",
            IssueSeverity::Warning,
            "ingredient list contains some usage-instruction text",
        ));
    }
    issues
}

fn check_inci_has_sentences(ingredients: &[String]) -> Vec<FieldIssue> {
    let sentence_like = ingredients
        .iter()
        .filter(|i| {
            let word_count = i.split_whitespace().count();
            (i.contains('.') && i.chars().any(|c| c.is_uppercase()) && i.chars().count() > 50)
                || word_count > 12
        })
        .count();
    if sentence_like > 3 {
        vec![FieldIssue::new(
            "inci_ingredients",
            "inci_has_sentences",
            IssueSeverity::Warning,
            "several ingredient entries read like full sentences",
        )]
    } else {
        Vec::new()
    }
}

fn check_inci_marketing_complex(ingredients: &[String]) -> Vec<FieldIssue> {
    let re = Regex::new(r"\.\s*\*+[A-Z]|Complex[*:\s]").unwrap();
    if ingredients.iter().any(|i| re.is_match(i)) {
        vec![FieldIssue::new(
            "inci_ingredients",
            "inci_marketing_complex",
            IssueSeverity::Info,
            "ingredient entry appends a marketing 'complex' name",
        )]
    } else {
        Vec::new()
    }
}

fn check_description_quality(description: &str) -> Vec<FieldIssue> {
    let parts: Vec<&str> = description.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
    let mut issues = Vec::new();
    if parts.len() > 10 {
        let inci_like = parts
            .iter()
            .filter(|p| p.split_whitespace().count() <= 4)
            .count();
        if inci_like as f64 / parts.len() as f64 > 0.70 {
            issues.push(FieldIssue::new(
                "description",
                "desc_is_inci_list",
                IssueSeverity::Error,
                "description looks like a comma-separated ingredient list",
            ));
        }
    }
    if description.chars().count() < 20 && !description.chars().any(|c| c.is_alphabetic()) {
        issues.push(FieldIssue::new(
            "description",
            "desc_too_short",
            IssueSeverity::Warning,
            "description is too short to be meaningful",
        ));
    }
    issues
}

fn check_usage_quality(usage_instructions: &str) -> Vec<FieldIssue> {
    let has_verb = USAGE_PHRASES.iter().any(|p| usage_instructions.to_lowercase().contains(p));
    if !has_verb && usage_instructions.chars().count() > 50 {
        vec![FieldIssue::new(
            "usage_instructions",
            "usage_is_description",
            IssueSeverity::Warning,
            "usage instructions contain no action verb and read like marketing copy",
        )]
    } else {
        Vec::new()
    }
}

fn check_benefits_quality(benefits_claims: &[String]) -> Vec<FieldIssue> {
    if benefits_claims.iter().any(|b| b.chars().count() > 120) {
        vec![FieldIssue::new(
            "benefits_claims",
            "benefits_too_long",
            IssueSeverity::Warning,
            "one or more benefit claims exceed 120 characters",
        )]
    } else {
        Vec::new()
    }
}

fn check_price(price: Option<f64>, currency: &Option<String>) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    if let Some(p) = price {
        if p <= 0.0 {
            issues.push(FieldIssue::new("price", "price_invalid", IssueSeverity::Error, "price is non-positive"));
        } else if p > 5000.0 {
            issues.push(FieldIssue::new("price", "price_outlier", IssueSeverity::Warning, "price is an unusually high outlier"));
        }
        if currency.is_none() {
            issues.push(FieldIssue::new("price", "price_no_currency", IssueSeverity::Warning, "price is set without a currency code"));
        }
    }
    issues
}

fn check_required_fields(product: &ProductExtraction) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    if product.product_name.as_deref().unwrap_or("").trim().is_empty() {
        issues.push(FieldIssue::new("product_name", "name_missing", IssueSeverity::Error, "product name is missing"));
    }
    if product.image_url_main.is_none() {
        issues.push(FieldIssue::new("image_url_main", "image_missing", IssueSeverity::Warning, "main image is missing"));
    }
    if product.product_type_normalized.is_none() {
        issues.push(FieldIssue::new("product_type_normalized", "type_missing", IssueSeverity::Info, "product type could not be normalized"));
    }
    issues
}

/// Run every rule family over a populated record and fold into a [`ValidationReport`] (§4.7).
pub fn validate_product_fields(product: &ProductExtraction) -> ValidationReport {
    let mut issues = Vec::new();
    issues.extend(check_required_fields(product));

    if let Some(ingredients) = &product.inci_ingredients {
        issues.extend(check_inci_is_marketing(ingredients));
        issues.extend(check_inci_is_usage(ingredients));
        issues.extend(check_inci_has_sentences(ingredients));
        issues.extend(check_inci_marketing_complex(ingredients));
    }
    if let Some(description) = &product.description {
        issues.extend(check_description_quality(description));
    }
    if let Some(usage) = &product.usage_instructions {
        issues.extend(check_usage_quality(usage));
    }
    issues.extend(check_benefits_quality(&product.benefits_claims));
    issues.extend(check_price(product.price, &product.currency));

    ValidationReport::from_issues(issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_with_ingredients(ingredients: Vec<&str>) -> ProductExtraction {
        let mut p = ProductExtraction::new("brand", "https://brand.example/p/1");
        p.product_name = Some("Shampoo Reparador".to_string());
        p.inci_ingredients = Some(ingredients.into_iter().map(String::from).collect());
        p
    }

    #[test]
    fn marketing_text_without_anchors_is_error() {
        let product = product_with_ingredients(vec!["fortalece e protege", "ideal para cabelos secos"]);
        let report = validate_product_fields(&product);
        assert!(report.issues.iter().any(|i| i.code == "inci_is_marketing"));
    }

    #[test]
    fn real_inci_list_has_no_marketing_issue() {
        let product = product_with_ingredients(vec!["Aqua", "Glycerin", "Parfum", "Cetearyl Alcohol", "Dimethicone"]);
        let report = validate_product_fields(&product);
        assert!(!report.issues.iter().any(|i| i.code == "inci_is_marketing"));
    }

    #[test]
    fn missing_name_is_error() {
        let mut product = ProductExtraction::new("brand", "https://brand.example/p/1");
        product.product_name = None;
        let report = validate_product_fields(&product);
        assert!(report.issues.iter().any(|i| i.code == "name_missing"));
        assert!(report.score <= 80);
    }

    #[test]
    fn invalid_price_is_error() {
        let mut product = product_with_ingredients(vec!["Aqua", "Glycerin", "Parfum", "Cetearyl Alcohol", "Dimethicone"]);
        product.price = Some(-1.0);
        let report = validate_product_fields(&product);
        assert!(report.issues.iter().any(|i| i.code == "price_invalid"));
    }
}
