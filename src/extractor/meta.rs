//! S4 — meta-tag image fallback (§4.4).
//!
//! Grounded in `DevsHero-search-scrape`'s `rust_scraper::metadata`
//! (`extract_open_graph`): only tried when no image has been set by an
//! earlier strategy (§9 "structured data wins" open question).

use scraper::{Html, Selector};

/// Open-Graph-style image metadata from the page head.
pub fn extract_og_image(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[property="og:image"]"#).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_og_image() {
        let html = r#"<html><head><meta property="og:image" content="https://x.example/og.jpg"></head></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(extract_og_image(&document).as_deref(), Some("https://x.example/og.jpg"));
    }

    #[test]
    fn returns_none_without_og_image() {
        let document = Html::parse_document("<html><head></head></html>");
        assert!(extract_og_image(&document).is_none());
    }
}
