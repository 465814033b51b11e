//! S3 — label-proximity heuristic for ingredients (§4.4).
//!
//! Used only when S1/S2 found no ingredient text. Scans for text nodes
//! whose heading/button/label reads as one of a fixed, priority-ordered
//! phrase list, then gathers candidate content near each match through six
//! independent rules (§4.4, §9 "pure min-by-priority reducer — no implicit
//! short-circuit").

use scraper::{ElementRef, Html, Selector};

/// Priority-ordered (longest/most-specific first) label phrases.
const LABEL_PHRASES: &[&str] = &[
    "lista completa de ingredientes",
    "full ingredient list",
    "composição completa",
    "composicao completa",
    "composição do produto",
    "composicao do produto",
    "composição",
    "composicao",
    "ingredientes",
    "ingredients",
    "inci",
];

const NOISE_PREFIXES: &[&str] = &["todos", "all", "ver todos", "mostrar todos", "ver mais"];

const COLLAPSIBLE_CLASSES: &[&str] = &["collapse__content", "tab-content", "tab-pane", "accordion-content"];

/// One candidate ingredient-text find, before winner selection.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub content: String,
    pub locator: String,
    pub priority: usize,
}

fn matched_label(text: &str) -> Option<(usize, &'static str)> {
    let lower = text.to_lowercase();
    LABEL_PHRASES
        .iter()
        .enumerate()
        .find(|(_, phrase)| lower.contains(**phrase))
        .map(|(idx, phrase)| (idx, *phrase))
}

fn has_inci_separator(text: &str) -> bool {
    text.contains(',') || text.contains('●') || text.contains('•') || text.contains('·')
}

fn strip_noise_prefix(text: &str) -> String {
    let trimmed = text.trim();
    for prefix in NOISE_PREFIXES {
        let lower = trimmed.to_lowercase();
        if lower.starts_with(prefix) {
            return trimmed[prefix.len()..].trim_start().to_string();
        }
    }
    trimmed.to_string()
}

fn qualifies(content: &str) -> bool {
    content.len() > 30 && has_inci_separator(content)
}

fn next_sibling_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut node = el.next_sibling();
    while let Some(n) = node {
        if let Some(wrapped) = ElementRef::wrap(n) {
            return Some(wrapped);
        }
        node = n.next_sibling();
    }
    None
}

fn parent_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.parent().and_then(ElementRef::wrap)
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ").trim().to_string()
}

/// Pre-order DFS over element nodes, i.e. document order — used by rule
/// (c) to find "the next paragraph anywhere downstream" of a heading.
fn document_order_elements(document: &Html) -> Vec<ElementRef<'_>> {
    let mut out = Vec::new();
    collect_elements(document.root_element(), &mut out);
    out
}

fn collect_elements<'a>(el: ElementRef<'a>, out: &mut Vec<ElementRef<'a>>) {
    out.push(el);
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            collect_elements(child_el, out);
        }
    }
}

/// Gather every candidate across rules (a)-(f); callers pick the
/// minimum-priority winner (ties resolved by first-encountered, i.e.
/// document order, since we never reorder beyond a stable sort).
pub fn gather_candidates(document: &Html) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let doc_order = document_order_elements(document);

    let label_bearing_selector =
        Selector::parse("h1,h2,h3,h4,h5,h6,button,label,span,div,dt,strong,p").unwrap();

    for el in document.select(&label_bearing_selector) {
        let own_text = element_text(el);
        let Some((priority, phrase)) = matched_label(&own_text) else {
            continue;
        };
        let locator_base = format!("label:{phrase}");

        // (a) wrapper: inline remainder past the label text.
        if let Some(idx) = own_text.to_lowercase().find(phrase) {
            let remainder = own_text[idx + phrase.len()..].trim();
            if remainder.len() >= 30 {
                let cleaned = strip_noise_prefix(remainder);
                if qualifies(&cleaned) {
                    candidates.push(Candidate {
                        content: cleaned,
                        locator: format!("{locator_base}:wrapper"),
                        priority,
                    });
                }
            }
            // Prefer a descendant paragraph that looks like INCI.
            if let Ok(p_sel) = Selector::parse("p") {
                for p in el.select(&p_sel) {
                    let text = element_text(p);
                    if qualifies(&text) {
                        candidates.push(Candidate {
                            content: strip_noise_prefix(&text),
                            locator: format!("{locator_base}:wrapper-p"),
                            priority,
                        });
                        break;
                    }
                }
            }
        }

        // (b) next sibling of the labelling element.
        if let Some(sibling) = next_sibling_element(el) {
            let text = element_text(sibling);
            if qualifies(&text) {
                candidates.push(Candidate {
                    content: strip_noise_prefix(&text),
                    locator: format!("{locator_base}:next-sibling"),
                    priority,
                });
            }
        }

        // (c) for headings, the next paragraph anywhere downstream in document order.
        let tag = el.value().name();
        if matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") {
            if let Some(heading_idx) = doc_order.iter().position(|n| n.id() == el.id()) {
                for node in doc_order.iter().skip(heading_idx + 1) {
                    if node.value().name() != "p" {
                        continue;
                    }
                    let text = element_text(*node);
                    if qualifies(&text) {
                        candidates.push(Candidate {
                            content: strip_noise_prefix(&text),
                            locator: format!("{locator_base}:downstream-p"),
                            priority,
                        });
                        break;
                    }
                }
            }
        }

        // (d) parent section: text of the parent starting after the label.
        if let Some(parent) = parent_element(el) {
            let parent_text = element_text(parent);
            let lower_parent = parent_text.to_lowercase();
            if let Some(idx) = lower_parent.find(phrase) {
                let remainder = parent_text[idx + phrase.len()..].trim();
                if qualifies(remainder) {
                    candidates.push(Candidate {
                        content: strip_noise_prefix(remainder),
                        locator: format!("{locator_base}:parent-section"),
                        priority,
                    });
                }
            }

            // (e) parent's next sibling.
            if let Some(parent_sibling) = next_sibling_element(parent) {
                let text = element_text(parent_sibling);
                if qualifies(&text) {
                    candidates.push(Candidate {
                        content: strip_noise_prefix(&text),
                        locator: format!("{locator_base}:parent-next-sibling"),
                        priority,
                    });
                }
            }
        }

        // (f) collapsible/tab containers whose preceding sibling holds the label.
        if let Some(sibling) = next_sibling_element(el) {
            let class_attr = sibling.value().attr("class").unwrap_or("");
            if COLLAPSIBLE_CLASSES.iter().any(|c| class_attr.contains(c)) {
                let text = element_text(sibling);
                if qualifies(&text) {
                    candidates.push(Candidate {
                        content: strip_noise_prefix(&text),
                        locator: format!("{locator_base}:collapsible"),
                        priority,
                    });
                }
            }
        }
    }

    candidates
}

/// Pure min-by-priority reducer over every gathered candidate (§9).
pub fn pick_winner(document: &Html) -> Option<Candidate> {
    gather_candidates(document)
        .into_iter()
        .min_by_key(|c| c.priority)
}
