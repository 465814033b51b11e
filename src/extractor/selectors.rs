//! S2 — blueprint CSS selector fallback (§4.4).
//!
//! For each field still unset after S1, try the blueprint's ordered
//! selector list; the first non-empty match wins and its selector string
//! becomes the Evidence locator.

use scraper::{Html, Selector};

/// `(matched_text, matching_selector)`, or `None` if no selector matched.
pub fn first_matching_text(document: &Html, selectors: &[String]) -> Option<(String, String)> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else { continue };
        if let Some(el) = document.select(&selector).next() {
            let text: String = el.text().collect::<Vec<_>>().join(" ");
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some((trimmed.to_string(), raw.clone()));
            }
        }
    }
    None
}

/// Image selectors try `src` then `data-src` — many storefronts lazy-load
/// product images behind a `data-src` attribute.
pub fn first_matching_image(document: &Html, selectors: &[String]) -> Option<(String, String)> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else { continue };
        if let Some(el) = document.select(&selector).next() {
            if let Some(src) = el.value().attr("src").or_else(|| el.value().attr("data-src")) {
                if !src.trim().is_empty() {
                    return Some((src.trim().to_string(), raw.clone()));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_non_empty_selector_wins() {
        let html = r#"<html><body><h1 class="product-name">Shampoo Reparador</h1></body></html>"#;
        let document = Html::parse_document(html);
        let selectors = vec!["h1.missing".to_string(), "h1.product-name".to_string()];
        let (text, selector) = first_matching_text(&document, &selectors).unwrap();
        assert_eq!(text, "Shampoo Reparador");
        assert_eq!(selector, "h1.product-name");
    }

    #[test]
    fn image_falls_back_to_data_src() {
        let html = r#"<img class="product-img" data-src="https://x.example/lazy.jpg">"#;
        let document = Html::parse_document(html);
        let selectors = vec!["img.product-img".to_string()];
        let (src, _) = first_matching_image(&document, &selectors).unwrap();
        assert_eq!(src, "https://x.example/lazy.jpg");
    }
}
