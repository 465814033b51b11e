//! The LLM client collaborator used as the extractor's last-resort strategy (S5).
//!
//! Out of scope for the core: no concrete model backend is implemented here.
//! The contract is deliberately narrow and grounded: the LLM may only return
//! text it claims is present verbatim on the page; the core re-validates
//! everything it hands back through the same machinery used on deterministic
//! output (§4.3, §4.4 S5).

use async_trait::async_trait;

/// What the LLM is permitted to return from a single grounded-extraction call.
#[derive(Debug, Clone, Default)]
pub struct LlmExtraction {
    /// Candidate INCI ingredient list, claimed verbatim from the page.
    pub inci_ingredients: Option<Vec<String>>,
    /// Candidate product description, claimed verbatim from the page.
    pub description: Option<String>,
}

/// A budgeted, grounded LLM extractor.
///
/// `can_call` must be checked before every request; the core treats a
/// `false` as silent permission to fall back to deterministic-only
/// extraction rather than an error (§5 Budgets, §7 "LLM budget exhaustion").
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Whether the per-brand call budget still has room.
    fn can_call(&self, brand_slug: &str) -> bool;

    /// Ask the model to extract grounded fields from a cleaned text view of the page.
    ///
    /// Implementations must count this call against the brand's budget
    /// before returning.
    async fn extract_grounded(
        &self,
        brand_slug: &str,
        page_text: &str,
    ) -> Result<LlmExtraction, Box<dyn std::error::Error + Send + Sync>>;
}
