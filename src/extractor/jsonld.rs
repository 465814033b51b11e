//! S1 — embedded structured-data extraction (§4.4).
//!
//! Grounded in `DevsHero-search-scrape`'s `rust_scraper::jsonld` module:
//! scan `script[type="application/ld+json"]` blocks, parse as JSON, and
//! recursively hunt for an object typed `Product` (handling both a bare
//! object, an array of objects, and a `@graph` wrapper).

use scraper::{Html, Selector};
use serde_json::Value;

/// Fields S1 can populate, plus the raw JSON-LD fragment each came from
/// (used to build Evidence locators/raw text upstream).
#[derive(Debug, Clone, Default)]
pub struct JsonLdProduct {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub raw_json: String,
}

/// Scan the document for the first JSON-LD block typed `Product`.
pub fn extract_jsonld_product(document: &Html) -> Option<JsonLdProduct> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;
    for script in document.select(&selector) {
        let text: String = script.text().collect();
        let Ok(value) = serde_json::from_str::<Value>(&text) else {
            continue;
        };
        if let Some(product) = find_product(&value) {
            return Some(product);
        }
    }
    None
}

fn find_product(value: &Value) -> Option<JsonLdProduct> {
    match value {
        Value::Array(items) => items.iter().find_map(find_product),
        Value::Object(map) => {
            if is_product_type(map.get("@type")) {
                return Some(to_product(value));
            }
            if let Some(graph) = map.get("@graph") {
                return find_product(graph);
            }
            None
        }
        _ => None,
    }
}

fn is_product_type(type_field: Option<&Value>) -> bool {
    match type_field {
        Some(Value::String(s)) => s == "Product",
        Some(Value::Array(arr)) => arr.iter().any(|v| v.as_str() == Some("Product")),
        _ => false,
    }
}

fn to_product(value: &Value) -> JsonLdProduct {
    let name = value.get("name").and_then(Value::as_str).map(String::from);
    let description = value.get("description").and_then(Value::as_str).map(String::from);

    let image = match value.get("image") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Array(arr)) => arr.first().and_then(Value::as_str).map(String::from),
        Some(Value::Object(obj)) => obj.get("url").and_then(Value::as_str).map(String::from),
        _ => None,
    };

    let offers = value.get("offers").map(|o| match o {
        Value::Array(arr) => arr.first().cloned().unwrap_or(Value::Null),
        other => other.clone(),
    });

    let price = offers.as_ref().and_then(|o| match o.get("price") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    });

    let currency = offers
        .as_ref()
        .and_then(|o| o.get("priceCurrency"))
        .and_then(Value::as_str)
        .map(String::from)
        .or_else(|| price.map(|_| "BRL".to_string()));

    JsonLdProduct {
        name,
        image,
        description,
        price,
        currency,
        raw_json: serde_json::to_string(value).unwrap_or_default(),
    }
}
