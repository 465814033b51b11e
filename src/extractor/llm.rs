//! S5 — optional LLM-grounded fallback (§4.4, §5 Budgets).
//!
//! Only invoked when the blueprint enables it and the per-brand budget
//! has room. Strips obviously non-content tags before handing the page a
//! cleaned text view to the model, matching
//! `coverage_engine.py::_try_llm_extraction`'s approach of stripping
//! `script`/`style`/`nav`/`footer`/`header` before building the prompt.

use std::collections::HashSet;

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

use crate::ingredients::extract_and_validate_inci;
use crate::traits::llm::{LlmClient, LlmExtraction};

const NOISE_TAGS: &[&str] = &["script", "style", "nav", "footer", "header"];

/// Strip non-content tags and join remaining text nodes — the "cleaned
/// text view of the page" the LLM contract requires.
pub fn cleaned_text_view(document: &Html) -> String {
    let noise = Selector::parse(&NOISE_TAGS.join(",")).unwrap();
    let noise_ids: HashSet<NodeId> = document.select(&noise).map(|e| e.id()).collect();

    let mut words = Vec::new();
    collect_text(document.root_element(), &noise_ids, &mut words);
    words.join(" ")
}

fn collect_text(el: ElementRef<'_>, noise_ids: &HashSet<NodeId>, out: &mut Vec<String>) {
    if noise_ids.contains(&el.id()) {
        return;
    }
    for child in el.children() {
        match child.value() {
            scraper::node::Node::Text(text) => {
                for word in text.split_whitespace() {
                    out.push(word.to_string());
                }
            }
            scraper::node::Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, noise_ids, out);
                }
            }
            _ => {}
        }
    }
}

/// Outcome of attempting S5 for one product page: ingredients are
/// re-validated through §4.3 before being accepted, matching the
/// deterministic strategies' own discipline.
pub struct LlmFallbackResult {
    pub inci_ingredients: Option<Vec<String>>,
    pub description: Option<String>,
    pub accepted: bool,
}

/// Ask the LLM collaborator for grounded fields and re-validate any
/// ingredient list it returns. Never infers; never called if the budget
/// is exhausted (callers must check `can_call` first per §5).
pub async fn try_llm_extraction(
    client: &dyn LlmClient,
    brand_slug: &str,
    page_text: &str,
) -> Option<LlmFallbackResult> {
    if !client.can_call(brand_slug) {
        return None;
    }

    let LlmExtraction { inci_ingredients, description } =
        client.extract_grounded(brand_slug, page_text).await.ok()?;

    if inci_ingredients.is_none() && description.is_none() {
        return None;
    }

    let (validated_ingredients, accepted) = match inci_ingredients {
        Some(list) => {
            let joined = list.join(", ");
            let result = extract_and_validate_inci(Some(&joined));
            if result.valid {
                (Some(result.cleaned), true)
            } else {
                (None, false)
            }
        }
        None => (None, false),
    };

    Some(LlmFallbackResult {
        inci_ingredients: validated_ingredients,
        description,
        accepted,
    })
}
