//! Append-only provenance for extracted fields (§4.5, §9 "Evidence as append-only").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::product::ExtractionMethod;

/// Raw source text is capped at 2KB before it is stored (§3).
pub const MAX_RAW_SOURCE_TEXT_BYTES: usize = 2000;

/// A single `(field, source, locator, raw snippet, method)` provenance record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub field_name: String,
    pub source_url: String,
    /// Selector string, structured-data JSON path, or heuristic key
    /// (e.g. `"tab-heading-p:composição"`).
    pub evidence_locator: String,
    pub raw_source_text: String,
    pub extraction_method: ExtractionMethod,
    pub extracted_at: DateTime<Utc>,
}

impl Evidence {
    /// Build an evidence row, truncating `raw_source_text` to the byte cap.
    ///
    /// Truncation is on a char boundary so the stored snippet is always
    /// valid UTF-8, even if that means keeping slightly under the cap.
    pub fn new(
        field_name: impl Into<String>,
        source_url: impl Into<String>,
        evidence_locator: impl Into<String>,
        raw_source_text: &str,
        extraction_method: ExtractionMethod,
        extracted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            source_url: source_url.into(),
            evidence_locator: evidence_locator.into(),
            raw_source_text: truncate_to_byte_cap(raw_source_text, MAX_RAW_SOURCE_TEXT_BYTES),
            extraction_method,
            extracted_at,
        }
    }
}

fn truncate_to_byte_cap(text: &str, cap: usize) -> String {
    if text.len() <= cap {
        return text.to_string();
    }
    let mut end = cap;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_raw_text() {
        let long = "a".repeat(3000);
        let ev = Evidence::new(
            "description",
            "https://x.example/p",
            "meta[name=description]",
            &long,
            ExtractionMethod::HtmlSelector,
            Utc::now(),
        );
        assert_eq!(ev.raw_source_text.len(), MAX_RAW_SOURCE_TEXT_BYTES);
    }

    #[test]
    fn leaves_short_text_untouched() {
        let ev = Evidence::new(
            "product_name",
            "https://x.example/p",
            "h1.name",
            "Shampoo Reparador",
            ExtractionMethod::HtmlSelector,
            Utc::now(),
        );
        assert_eq!(ev.raw_source_text, "Shampoo Reparador");
    }
}
