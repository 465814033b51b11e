//! Label (quality-seal) engine (§4.6, component F).
//!
//! Keyword matching is word-boundary, not substring — `vegan` must not
//! match `veganuary`, `bio` must not match `biofilm` (§8 "Label-engine word
//! boundaries").

use regex::Regex;
use std::collections::HashMap;

use crate::types::labels::{LabelEvidence, LabelResult, LabelSource, Seal};
use crate::types::product::ExtractionMethod;

fn seal_keywords() -> HashMap<Seal, &'static [&'static str]> {
    HashMap::from([
        (Seal::SulfateFree, &["sulfate free", "sulfate-free", "sem sulfato", "livre de sulfato"][..]),
        (Seal::Vegan, &["vegan", "vegano", "vegana"][..]),
        (Seal::SiliconeFree, &["silicone free", "silicone-free", "sem silicone", "livre de silicone"][..]),
        (Seal::Organic, &["organic", "orgânico", "organico"][..]),
        (Seal::Natural, &["natural", "naturais"][..]),
        (Seal::LowPoo, &["low poo", "low-poo"][..]),
        (Seal::NoPoo, &["no poo", "no-poo"][..]),
        (Seal::CrueltyFree, &["cruelty free", "cruelty-free", "não testado em animais", "nao testado em animais"][..]),
        (Seal::ParabenFree, &["paraben free", "paraben-free", "sem parabeno", "livre de parabeno"][..]),
        (Seal::PetrolatumFree, &["petrolatum free", "petrolatum-free", "sem petrolato"][..]),
        (Seal::DyeFree, &["dye free", "dye-free", "sem corante", "livre de corante"][..]),
    ])
}

const SILICONE_MARKERS: &[&str] = &[
    "dimethicone",
    "amodimethicone",
    "cyclomethicone",
    "cyclopentasiloxane",
    "cyclohexasiloxane",
    "dimethiconol",
    "phenyl trimethicone",
];

const SULFATE_MARKERS: &[&str] = &[
    "sodium lauryl sulfate",
    "sodium laureth sulfate",
    "ammonium lauryl sulfate",
    "ammonium laureth sulfate",
    "sodium coco sulfate",
];

const NO_POO_PROHIBITED_MARKERS: &[&str] = &[
    "sodium lauryl sulfate",
    "sodium laureth sulfate",
    "ammonium lauryl sulfate",
    "dimethicone",
    "amodimethicone",
    "silicone",
];

const PARABEN_MARKERS: &[&str] = &["methylparaben", "ethylparaben", "propylparaben", "butylparaben", "isobutylparaben"];

const PETROLATUM_MARKERS: &[&str] = &["petrolatum", "paraffinum liquidum", "mineral oil", "microcrystalline wax"];

const DYE_MARKERS: &[&str] = &["fd&c", "tartrazine", "amaranth", "d&c"];

fn word_boundary_match(keyword: &str, text: &str) -> bool {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
    Regex::new(&pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

fn has_any_marker(ingredients: &[String], markers: &[&str]) -> bool {
    ingredients.iter().any(|ing| {
        let lower = ing.to_lowercase();
        markers.iter().any(|m| lower.contains(m))
    })
}

/// A color-index number (e.g. `"CI 77491"`) is a dye marker only — it has
/// no bearing on silicone/sulfate/paraben/petrolatum/no-poo inference.
fn has_dye_marker(ingredients: &[String]) -> bool {
    let ci_number = Regex::new(r"(?i)ci\s*\d{4,5}").unwrap();
    has_any_marker(ingredients, DYE_MARKERS)
        || ingredients.iter().any(|ing| ci_number.is_match(&ing.to_lowercase()))
}

/// Run the full detection + inference pipeline over one product record (§4.6).
pub fn detect(
    description: Option<&str>,
    product_name: Option<&str>,
    benefits_claims: &[String],
    usage_instructions: Option<&str>,
    inci_ingredients: Option<&[String]>,
    image_texts: &[String],
) -> LabelResult {
    let text_fields: Vec<(&str, &str)> = [
        ("description", description),
        ("product_name", product_name),
        ("usage_instructions", usage_instructions),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|v| (name, v)))
    .chain(benefits_claims.iter().map(|b| ("benefits_claims", b.as_str())))
    .collect();

    let mut result = LabelResult::default();
    let keywords = seal_keywords();

    for &seal in Seal::ALL.iter() {
        let kws = keywords.get(&seal).copied().unwrap_or(&[]);
        'seal_scan: for (field_name, text) in &text_fields {
            for kw in kws {
                if word_boundary_match(kw, text) {
                    result.detected.push(seal);
                    if !result.sources.contains(&LabelSource::OfficialText) {
                        result.sources.push(LabelSource::OfficialText);
                    }
                    result.evidence.push(LabelEvidence {
                        field_name: field_name.to_string(),
                        extraction_method: LabelSource::OfficialText,
                        raw_source_text: text.chars().take(200).collect(),
                        evidence_locator: format!("keyword:{}", kw),
                    });
                    break 'seal_scan;
                }
            }
        }
    }

    for &seal in Seal::ALL.iter() {
        if result.detected.contains(&seal) {
            continue;
        }
        let kws = keywords.get(&seal).copied().unwrap_or(&[]);
        for image_text in image_texts {
            if kws.iter().any(|kw| word_boundary_match(kw, image_text)) {
                if !result.sources.contains(&LabelSource::HtmlImgElement) {
                    result.sources.push(LabelSource::HtmlImgElement);
                }
                result.evidence.push(LabelEvidence {
                    field_name: "image_alt_title".to_string(),
                    extraction_method: LabelSource::HtmlImgElement,
                    raw_source_text: image_text.chars().take(200).collect(),
                    evidence_locator: "img[alt|title]".to_string(),
                });
                break;
            }
        }
    }

    if let Some(ingredients) = inci_ingredients {
        let silicone_free = !has_any_marker(ingredients, SILICONE_MARKERS);
        let sulfate_free = !has_any_marker(ingredients, SULFATE_MARKERS);
        let no_poo = !has_any_marker(ingredients, NO_POO_PROHIBITED_MARKERS) && silicone_free;
        let paraben_free = !has_any_marker(ingredients, PARABEN_MARKERS);
        let petrolatum_free = !has_any_marker(ingredients, PETROLATUM_MARKERS);
        let dye_free = !has_dye_marker(ingredients);

        let mut maybe_infer = |seal: Seal, holds: bool| {
            if holds && !result.detected.contains(&seal) && !result.inferred.contains(&seal) {
                result.inferred.push(seal);
            }
        };
        maybe_infer(Seal::SiliconeFree, silicone_free);
        maybe_infer(Seal::SulfateFree, sulfate_free);
        maybe_infer(Seal::LowPoo, sulfate_free);
        maybe_infer(Seal::NoPoo, no_poo);
        maybe_infer(Seal::ParabenFree, paraben_free);
        maybe_infer(Seal::PetrolatumFree, petrolatum_free);
        maybe_infer(Seal::DyeFree, dye_free);

        if !result.inferred.is_empty() && !result.sources.contains(&LabelSource::InciAnalysis) {
            result.sources.push(LabelSource::InciAnalysis);
        }
    }

    result.confidence = match (!result.detected.is_empty(), !result.inferred.is_empty()) {
        (true, true) => 0.9,
        (true, false) => 0.8,
        (false, true) => 0.5,
        (false, false) => 0.0,
    };

    result
}

/// Convenience wrapper for the coverage engine: detects against a populated
/// [`crate::types::product::ProductExtraction`].
pub fn detect_for_product(product: &crate::types::product::ProductExtraction, image_texts: &[String]) -> LabelResult {
    detect(
        product.description.as_deref(),
        product.product_name.as_deref(),
        &product.benefits_claims,
        product.usage_instructions.as_deref(),
        product.inci_ingredients.as_deref(),
        image_texts,
    )
}

/// Unused by the engine itself, kept for callers that need to stamp an
/// `Evidence`-bearing field with the right extraction method.
pub const LABEL_EXTRACTION_METHOD_HINT: ExtractionMethod = ExtractionMethod::HtmlSelector;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biofilm_does_not_match_organic() {
        let result = detect(
            Some("Protects against probiotic biofilm buildup"),
            None,
            &[],
            None,
            None,
            &[],
        );
        assert!(!result.detected.contains(&Seal::Organic));
    }

    #[test]
    fn veganuary_does_not_match_vegan() {
        let result = detect(Some("Join veganuary"), None, &[], None, None, &[]);
        assert!(!result.detected.contains(&Seal::Vegan));
    }

    #[test]
    fn vegan_product_matches() {
        let result = detect(Some("A vegan product"), None, &[], None, None, &[]);
        assert!(result.detected.contains(&Seal::Vegan));
    }

    #[test]
    fn silicone_free_inferred_when_absent() {
        let ingredients = vec!["Aqua".to_string(), "Glycerin".to_string(), "Parfum".to_string()];
        let result = detect(None, None, &[], None, Some(&ingredients), &[]);
        assert!(result.inferred.contains(&Seal::SiliconeFree));
    }

    #[test]
    fn confidence_levels() {
        assert_eq!(detect(None, None, &[], None, None, &[]).confidence, 0.0);
        let ingredients = vec!["Aqua".to_string()];
        assert_eq!(detect(None, None, &[], None, Some(&ingredients), &[]).confidence, 0.5);
        assert_eq!(detect(Some("vegan"), None, &[], None, None, &[]).confidence, 0.8);
    }
}
