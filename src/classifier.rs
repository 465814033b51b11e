//! URL classifier (§4.1, component A).
//!
//! `classify` is total and pure: given a URL and an optional blueprint
//! product-URL regex, it always returns a [`UrlType`], never an error.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::taxonomy::{is_kit_url, EXCLUDE_KEYWORDS, HAIR_KEYWORDS, INFO_PAGE_KEYWORDS};
use crate::types::brand::UrlType;

const CATEGORY_INDICATORS: &[&str] = &[
    "/cabelos/",
    "/cabelo/",
    "/hair/",
    "/produtos/",
    "/products/",
    "/collections/",
    "/categoria/",
    "/category/",
    "/shampoo/",
    "/condicionador/",
    "/tratamento/",
    "/finalizacao/",
    "/masculino/",
    "/men/",
];

static PRODUCT_INDICATORS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)-\d+ml",
        r"(?i)-\d+g\b",
        r"(?i)/p$",
        r"(?i)/p/",
        r"(?i)\.html$",
        r"(?i)-shampoo-",
        r"(?i)-condicionador-",
        r"(?i)-mascara-",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static product indicator compiles"))
    .collect()
});

/// Decision order per §4.1: kit → exclusion → informational → query-string
/// category → category indicator → product indicator/pattern → hair-keyword
/// heuristic → `other`. Case-insensitive throughout; never raises.
pub fn classify(url: &str, product_url_pattern: Option<&str>) -> UrlType {
    let lower = url.to_lowercase();

    if is_kit_url(&lower) {
        return UrlType::Kit;
    }

    let segments: Vec<&str> = lower.split('/').filter(|s| !s.is_empty()).collect();

    if segments
        .iter()
        .any(|seg| EXCLUDE_KEYWORDS.iter().any(|kw| seg.contains(kw)))
    {
        return UrlType::NonHair;
    }

    if segments
        .iter()
        .any(|seg| INFO_PAGE_KEYWORDS.iter().any(|kw| seg.contains(kw)))
    {
        return UrlType::Other;
    }

    if let Ok(parsed) = Url::parse(&lower) {
        let has_category_query = parsed
            .query_pairs()
            .any(|(k, _)| k == "cgid" || k == "category");
        if has_category_query {
            return UrlType::Category;
        }
    } else if lower.contains("cgid=") || lower.contains("category=") {
        return UrlType::Category;
    }

    let matches_category_indicator = CATEGORY_INDICATORS.iter().any(|ind| lower.contains(ind));
    let matches_product_pattern = product_url_pattern
        .and_then(|p| Regex::new(p).ok())
        .map(|re| re.is_match(&lower))
        .unwrap_or(false);
    let matches_builtin_product_indicator = PRODUCT_INDICATORS.iter().any(|re| re.is_match(&lower));

    if matches_category_indicator && segments.len() <= 4 && !matches_product_pattern && !matches_builtin_product_indicator {
        return UrlType::Category;
    }

    if matches_product_pattern || matches_builtin_product_indicator {
        return UrlType::Product;
    }

    let has_hair_keyword = HAIR_KEYWORDS
        .iter()
        .take(20)
        .any(|kw| lower.contains(kw));
    if has_hair_keyword {
        if segments.len() >= 2 {
            return UrlType::Product;
        }
        if let Some(last) = segments.last() {
            if last.split('-').count() >= 3 {
                return UrlType::Product;
            }
        }
        return UrlType::Category;
    }

    UrlType::Other
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// `classify` is total: no input string, however malformed, panics
        /// or aborts the process.
        #[test]
        fn classify_is_total(url in "\\PC{0,200}", pattern in proptest::option::of("[a-z/*.-]{0,30}")) {
            let _ = classify(&url, pattern.as_deref());
        }
    }
}
