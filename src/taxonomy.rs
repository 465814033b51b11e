//! Taxonomy tables: product-type normalization, gender targeting, and the
//! hair-relevance keyword test (§4.2, component B).
//!
//! Keyword tables are intentionally bilingual (PT/EN) to match the catalogs
//! this pipeline was built against; callers extending the vocabulary add to
//! these lists rather than special-casing languages elsewhere.

use crate::types::brand::UrlType;

/// Closed, normalized product-type vocabulary (§4.2, §6).
pub const HAIR_PRODUCT_TYPES: &[&str] = &[
    "shampoo",
    "conditioner",
    "mask",
    "treatment",
    "leave_in",
    "oil_serum",
    "tonic",
    "exfoliant",
    "scalp_treatment",
    "gel",
    "mousse",
    "spray",
    "pomade",
    "wax",
    "clay",
    "paste",
    "texturizer",
    "finisher",
    "ampule",
    "serum",
    "cream",
];

pub const HAIR_KEYWORDS: &[&str] = &[
    "shampoo",
    "condicionador",
    "conditioner",
    "máscara capilar",
    "mascara capilar",
    "hair mask",
    "tratamento capilar",
    "leave-in",
    "leave in",
    "óleo capilar",
    "oil hair",
    "tônico capilar",
    "tonico capilar",
    "scalp",
    "couro cabeludo",
    "antiqueda",
    "anti-queda",
    "queda capilar",
    "crescimento capilar",
    "cabelo",
    "cabelos",
    "hair",
    "capilar",
    "fios",
    "gel fixador",
    "mousse",
    "spray fixador",
    "pomada",
    "cera capilar",
    "wax",
    "clay",
    "pasta modeladora",
    "texturizador",
    "finalizador",
    "ampola",
    "sérum capilar",
    "serum capilar",
    "creme para pentear",
    "creme de pentear",
    "alisamento",
    "progressiva",
    "reconstrução",
    "hidratação capilar",
    "nutrição capilar",
    "reparação",
];

pub const EXCLUDE_KEYWORDS: &[&str] = &[
    "corpo",
    "corporal",
    "body",
    "facial",
    "face",
    "rosto",
    "maquiagem",
    "makeup",
    "perfume",
    "fragrance",
    "fragrância",
    "unhas",
    "nail",
    "acessório",
    "accessory",
    "protetor solar",
    "sunscreen",
    "desodorante",
    "deodorant",
    "sabonete líquido",
    "sabonete corporal",
    "hidratante corporal",
    "body lotion",
    "body cream",
    "batom",
    "lipstick",
    "rímel",
    "mascara para cílios",
];

pub const KIT_PATTERNS: &[&str] = &[
    r"/kit[-_]",
    r"/combo[-_]",
    r"/bundle[-_]",
    r"/set[-_]",
    r"/kit/",
    r"/combo/",
    r"/bundle/",
];

pub const MALE_TARGETING_KEYWORDS: &[&str] =
    &["masculino", "masculina", "men", "for men", "man", "barber", "barbearia"];

pub const KIDS_KEYWORDS: &[&str] = &["kids", "infantil", "criança", "children", "baby"];

/// Non-product informational path segments (§4.1 step 3), letting the
/// classifier short-circuit to `other` before falling through to the
/// hair-keyword heuristic.
pub const INFO_PAGE_KEYWORDS: &[&str] = &[
    "about",
    "sobre",
    "blog",
    "contact",
    "contato",
    "privacy",
    "privacidade",
    "careers",
    "carreiras",
    "store-locator",
    "lojas",
    "faq",
    "terms",
    "termos",
];

/// Ordered `(keywords, normalized_type)` table; first match wins (§4.2).
fn type_map() -> &'static [(&'static [&'static str], &'static str)] {
    &[
        (&["shampoo"], "shampoo"),
        (&["condicionador", "conditioner"], "conditioner"),
        (&["máscara", "mascara", "mask"], "mask"),
        (&["leave-in", "leave in"], "leave_in"),
        (&["óleo", "oleo", "oil"], "oil_serum"),
        (&["sérum", "serum"], "oil_serum"),
        (&["tônico", "tonico", "tonic"], "tonic"),
        (&["pomada", "pomade"], "pomade"),
        (&["gel"], "gel"),
        (&["mousse"], "mousse"),
        (&["spray"], "spray"),
        (&["cera", "wax"], "wax"),
        (&["argila", "clay"], "clay"),
        (&["pasta", "paste"], "paste"),
        (&["creme de pentear", "creme para pentear", "cream"], "cream"),
        (&["ampola", "ampule"], "ampule"),
        (&["finalizador", "finisher"], "finisher"),
        (&["tratamento", "treatment", "reconstrução"], "treatment"),
        (&["esfoliante", "exfoliant"], "exfoliant"),
        (&["texturizador", "texturizer"], "texturizer"),
    ]
}

/// Normalize a free-text product name to the closed type vocabulary.
/// Returns `None` when nothing matches.
pub fn normalize_product_type(raw_name: &str) -> Option<&'static str> {
    let lower = raw_name.to_lowercase();
    for (keywords, normalized) in type_map() {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return Some(normalized);
        }
    }
    None
}

/// Gender-targeting test, in order: unisex, kids, men, else unknown (§4.2).
pub fn detect_gender_target(product_name: &str, url: &str) -> UrlGenderGuess {
    let combined = format!("{} {}", product_name, url).to_lowercase();
    if combined.contains("unissex") || combined.contains("unisex") {
        return UrlGenderGuess::Unisex;
    }
    if KIDS_KEYWORDS.iter().any(|kw| combined.contains(kw)) {
        return UrlGenderGuess::Kids;
    }
    if MALE_TARGETING_KEYWORDS.iter().any(|kw| combined.contains(kw)) {
        return UrlGenderGuess::Men;
    }
    UrlGenderGuess::Unknown
}

/// Mirrors [`crate::types::product::GenderTarget`] minus `Women`, which this
/// heuristic never positively asserts (absence of male/kids signals does not
/// imply a women's product — it implies unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlGenderGuess {
    Unisex,
    Kids,
    Men,
    Unknown,
}

/// `(is_relevant, reason)` — a hair keyword matched and no exclusion
/// keyword matched first (§4.2).
pub fn is_hair_relevant_by_keywords(product_name: &str, url: &str, description: &str) -> (bool, String) {
    let combined = format!("{} {} {}", product_name, url, description).to_lowercase();
    if EXCLUDE_KEYWORDS.iter().any(|kw| combined.contains(kw)) {
        return (false, String::new());
    }
    for kw in HAIR_KEYWORDS {
        if combined.contains(kw) {
            return (true, format!("keyword '{}' found", kw));
        }
    }
    (false, String::new())
}

/// Whether a URL path matches any kit pattern (§4.2, used by the classifier too).
pub fn is_kit_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    KIT_PATTERNS
        .iter()
        .any(|p| regex::Regex::new(p).expect("static kit pattern compiles").is_match(&lower))
}

/// Used only for documentation/round-tripping; the classifier works
/// directly off [`UrlType`] rather than this enum.
pub fn describe(url_type: UrlType) -> &'static str {
    url_type.as_str()
}

/// Coarser grouping over [`normalize_product_type`]'s output, used to
/// populate `ProductExtraction.product_category`.
pub fn normalize_category(product_type: Option<&str>, product_name: &str) -> Option<&'static str> {
    let normalized = product_type
        .map(str::to_string)
        .or_else(|| normalize_product_type(product_name).map(str::to_string))?;
    Some(match normalized.as_str() {
        "shampoo" | "conditioner" => "cleansing",
        "mask" | "treatment" | "scalp_treatment" => "treatment",
        "leave_in" | "oil_serum" | "tonic" | "serum" | "ampule" => "finishing",
        "gel" | "mousse" | "spray" | "pomade" | "wax" | "clay" | "paste" | "texturizer" | "finisher" => "styling",
        "exfoliant" => "treatment",
        "cream" => "finishing",
        _ => return None,
    })
}
