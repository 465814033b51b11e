//! Ingredient parser & validator (§4.3, component C).
//!
//! Turns a raw, possibly contaminated string scraped from an ingredients
//! tab into either a clean, deduplicated INCI list or an explicit rejection
//! code. Every step is a pure function so the pipeline in
//! [`extract_and_validate_inci`] stays easy to unit-test in isolation.

use regex::Regex;
use std::sync::LazyLock;

/// Case-insensitive cut markers: the first one found truncates the raw text.
pub const CUT_MARKERS: &[&str] = &[
    "modo de uso",
    "como usar",
    "how to use",
    "directions",
    "benefícios",
    "beneficios",
    "benefits",
    "indicação",
    "indicacao",
    "validade",
    "reg. ms",
    "reg ms",
    "sac:",
    "cnpj",
    "fabricante",
    "precauções",
    "precaucoes",
    "warnings",
];

/// Recurring UI chrome stripped out before splitting (case-insensitive).
pub const GARBAGE_PHRASES: &[&str] = &[
    "click here",
    "see more",
    "read more",
    "ver mais",
    "clique aqui",
    "saiba mais",
    "embed",
    "report error",
    "compare",
    "infamous",
];

/// Usage-instruction verbs; an item with more than 3 tokens containing one
/// of these reads as an instruction, not an ingredient name.
pub const VERB_INDICATORS: &[&str] = &[
    "aplique",
    "aplicar",
    "massageie",
    "enxágue",
    "enxague",
    "apply",
    "rinse",
    "wash",
    "massage",
    "deixe agir",
    "lave",
];

/// Product-heading patterns signalling two concatenated ingredient blocks
/// (e.g. `"Shampoo: Aqua, ... Condicionador: Aqua, ..."`).
static PRODUCT_HEADING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)shampoo\s*:",
        r"(?i)condicionador\s*:",
        r"(?i)conditioner\s*:",
        r"(?i)m[aá]scara\s*:",
        r"(?i)mask\s*:",
        r"(?i)creme\s*:",
        r"(?i)leave-in\s*:",
        r"(?i)óleo\s*:",
        r"(?i)oleo\s*:",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static heading pattern compiles"))
    .collect()
});

const AQUA_WATER_ANCHORS: &[&str] = &["aqua", "water"];

/// The result of running the full §4.3 pipeline over one raw string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientValidation {
    pub valid: bool,
    pub cleaned: Vec<String>,
    pub rejection_reason: Option<String>,
}

impl IngredientValidation {
    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            cleaned: Vec::new(),
            rejection_reason: Some(reason.into()),
        }
    }

    fn accepted(cleaned: Vec<String>) -> Self {
        Self {
            valid: true,
            cleaned,
            rejection_reason: None,
        }
    }
}

/// Truncate at the first cut marker, then strip garbage phrases (§4.3 steps 1-2).
pub fn clean_inci_text(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let mut cut_at = raw.len();
    for marker in CUT_MARKERS {
        if let Some(idx) = lower.find(marker) {
            cut_at = cut_at.min(idx);
        }
    }
    while cut_at > 0 && !raw.is_char_boundary(cut_at) {
        cut_at -= 1;
    }
    let mut truncated = raw[..cut_at].to_string();

    for phrase in GARBAGE_PHRASES {
        let re = Regex::new(&format!(r"(?i){}", regex::escape(phrase))).expect("phrase compiles");
        truncated = re.replace_all(&truncated, "").to_string();
    }
    truncated.trim().to_string()
}

/// Split on bullet/dot separators if present, otherwise on commas (§4.3 step 3).
fn split_ingredients(text: &str) -> Vec<String> {
    let parts: Vec<&str> = if text.contains('●') || text.contains('•') || text.contains('·') {
        text.split(['●', '•', '·']).collect()
    } else {
        text.split(',').collect()
    };
    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Per-item acceptance test (§4.3 step 4).
pub fn validate_ingredient(ingredient: &str) -> bool {
    let len = ingredient.chars().count();
    if !(2..=80).contains(&len) {
        return false;
    }
    if Regex::new(r"(?i)https?://").unwrap().is_match(ingredient) {
        return false;
    }
    let tokens: Vec<&str> = ingredient.split_whitespace().collect();
    if tokens.len() > 8 {
        return false;
    }
    let lower = ingredient.to_lowercase();
    let has_verb = VERB_INDICATORS.iter().any(|v| lower.contains(v));
    if has_verb && tokens.len() > 3 {
        return false;
    }
    true
}

/// Two `aqua`/`water` anchors more than one position apart, or a product
/// heading mid-list, signals two concatenated ingredient panels (§4.3 step 5).
pub fn detect_concatenation(ingredients: &[String]) -> bool {
    let anchor_positions: Vec<usize> = ingredients
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            let lower = item.to_lowercase();
            AQUA_WATER_ANCHORS.iter().any(|a| lower == *a || lower.starts_with(a))
        })
        .map(|(i, _)| i)
        .collect();
    if anchor_positions.len() >= 2 {
        for window in anchor_positions.windows(2) {
            if window[1] - window[0] > 1 {
                return true;
            }
        }
    }
    ingredients
        .iter()
        .any(|item| PRODUCT_HEADING_PATTERNS.iter().any(|re| re.is_match(item)))
}

/// A repeated block of size k (3..=n/2) immediately followed by itself (§4.3 step 5).
pub fn detect_repetition(ingredients: &[String]) -> bool {
    let n = ingredients.len();
    if n < 6 {
        return false;
    }
    for k in 3..=(n / 2) {
        let first = &ingredients[0..k];
        let second = &ingredients[k..2 * k];
        if first
            .iter()
            .zip(second.iter())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
        {
            return true;
        }
    }
    false
}

/// Case-insensitive dedup, preserving first-occurrence order (§4.3 step 6).
fn dedup_case_insensitive(ingredients: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for item in ingredients {
        let key = item.to_lowercase();
        if seen.insert(key) {
            out.push(item);
        }
    }
    out
}

/// Validate an already-split, already-cleaned ingredient list (§4.3 steps 5-7).
///
/// Pathology checks run repetition-before-concatenation: a repeated block
/// is the more specific signal and should win when a list happens to
/// trigger both checks at once.
pub fn validate_inci_list(ingredients: Vec<String>) -> IngredientValidation {
    if detect_repetition(&ingredients) {
        return IngredientValidation::rejected("repetition_detected");
    }
    if detect_concatenation(&ingredients) {
        return IngredientValidation::rejected("concat_detected");
    }

    let deduped = dedup_case_insensitive(ingredients);
    let cleaned: Vec<String> = deduped.into_iter().filter(|i| validate_ingredient(i)).collect();

    if cleaned.len() < 5 {
        return IngredientValidation::rejected(format!(
            "min_ingredients: only {} valid terms",
            cleaned.len()
        ));
    }

    IngredientValidation::accepted(cleaned)
}

/// The full pipeline entry point: clean, split, validate (§4.3).
pub fn extract_and_validate_inci(raw_text: Option<&str>) -> IngredientValidation {
    let raw = match raw_text {
        Some(r) if !r.trim().is_empty() => r,
        _ => return IngredientValidation::rejected("no_inci_text"),
    };

    let cleaned_text = clean_inci_text(raw);
    if cleaned_text.is_empty() {
        return IngredientValidation::rejected("empty_after_cleaning");
    }

    let ingredients = split_ingredients(&cleaned_text);
    validate_inci_list(ingredients)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuts_at_usage_instructions() {
        let raw = "Aqua, Glycerin, Parfum. Modo de uso: aplique no cabelo molhado";
        let cleaned = clean_inci_text(raw);
        assert!(!cleaned.to_lowercase().contains("modo de uso"));
        assert!(cleaned.contains("Aqua"));
    }

    #[test]
    fn exactly_five_distinct_items_is_valid() {
        let result = extract_and_validate_inci(Some("Aqua, Glycerin, Parfum, Cetearyl Alcohol, Dimethicone"));
        assert!(result.valid);
        assert_eq!(result.cleaned.len(), 5);
    }

    #[test]
    fn concatenated_panels_rejected() {
        let result = extract_and_validate_inci(Some(
            "Shampoo: Aqua, Glycerin, Parfum. Condicionador: Aqua, Cetearyl Alcohol, Dimethicone",
        ));
        assert!(!result.valid);
        assert_eq!(result.rejection_reason.as_deref(), Some("concat_detected"));
    }

    #[test]
    fn repeated_block_rejected() {
        let list = vec!["A", "B", "C", "D", "E", "A", "B", "C", "D", "E"]
            .into_iter()
            .map(String::from)
            .collect();
        let result = validate_inci_list(list);
        assert!(!result.valid);
        assert_eq!(result.rejection_reason.as_deref(), Some("repetition_detected"));
    }

    #[test]
    fn case_duplicates_coalesce() {
        let result = extract_and_validate_inci(Some(
            "Aqua, aqua, Glycerin, Parfum, Cetearyl Alcohol, Dimethicone, Tocopherol",
        ));
        assert!(result.valid);
        assert!(!result
            .cleaned
            .iter()
            .filter(|i| i.eq_ignore_ascii_case("aqua"))
            .count()
            > 1);
    }

    #[test]
    fn below_minimum_rejected() {
        let result = extract_and_validate_inci(Some("Aqua, Glycerin"));
        assert!(!result.valid);
        assert!(result.rejection_reason.unwrap().starts_with("min_ingredients"));
    }

    #[test]
    fn no_text_rejected() {
        let result = extract_and_validate_inci(None);
        assert_eq!(result.rejection_reason.as_deref(), Some("no_inci_text"));
    }

    #[test]
    fn usage_verb_item_dropped_but_list_can_still_pass() {
        assert!(!validate_ingredient("Aplique massageando suavemente no couro cabeludo"));
        assert!(validate_ingredient("Sodium Laureth Sulfate"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Arbitrary text never panics anywhere in the pipeline, no matter
        /// how it's cut, split, or how many separators it packs in.
        #[test]
        fn pipeline_never_panics_on_arbitrary_text(raw in "\\PC{0,400}") {
            let _ = extract_and_validate_inci(Some(&raw));
        }

        /// A cleaned-text prefix is always a valid UTF-8 slice of the input
        /// (the cut-marker truncation walks back to a char boundary).
        #[test]
        fn clean_inci_text_is_always_a_prefix(raw in "\\PC{0,200}") {
            let cleaned = clean_inci_text(&raw);
            prop_assert!(raw.contains(cleaned.trim_end()) || cleaned.is_empty());
        }

        /// The accepted output of a valid list is always deduplicated
        /// case-insensitively, regardless of how many duplicates were fed in.
        #[test]
        fn accepted_lists_have_no_case_insensitive_duplicates(
            items in proptest::collection::vec("[A-Za-z ]{2,20}", 5..12)
        ) {
            let result = validate_inci_list(items);
            if result.valid {
                let mut seen = std::collections::HashSet::new();
                for item in &result.cleaned {
                    prop_assert!(seen.insert(item.to_lowercase()));
                }
            }
        }
    }
}
