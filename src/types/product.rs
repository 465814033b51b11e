//! The core extraction entity and its closed companion enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::evidence::Evidence;
use crate::types::labels::LabelResult;

/// Closed gender-targeting vocabulary (§4.2, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenderTarget {
    Men,
    Women,
    Unisex,
    Kids,
    #[default]
    Unknown,
}

/// Closed extraction-method vocabulary (§4.4, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Jsonld,
    HtmlSelector,
    JsDom,
    LlmGrounded,
    Manual,
}

/// Closed verification-status vocabulary emitted by the quality gate (§4.8, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    CatalogOnly,
    VerifiedInci,
    Quarantined,
}

/// Review workflow state for a quarantined product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Owned 1-to-1 by a quarantined `ProductExtraction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarantineDetail {
    pub rejection_reason: String,
    pub rejection_code: String,
    pub review_status: ReviewStatus,
    pub reviewer_notes: Option<String>,
}

impl QuarantineDetail {
    pub fn new(rejection_code: impl Into<String>, rejection_reason: impl Into<String>) -> Self {
        Self {
            rejection_reason: rejection_reason.into(),
            rejection_code: rejection_code.into(),
            review_status: ReviewStatus::Pending,
            reviewer_notes: None,
        }
    }
}

/// The core entity: one brand's product page, as extracted.
///
/// Invariants (§3) are enforced by the components that populate this
/// struct, not by the struct itself — it is a plain data holder so that
/// partially-filled intermediate states (mid-pipeline) are representable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductExtraction {
    // Identity
    pub brand_slug: String,
    pub product_url: String,
    pub product_name: Option<String>,

    // Media
    pub image_url_main: Option<String>,
    pub image_urls_gallery: Vec<String>,

    // Classification
    pub gender_target: GenderTarget,
    pub product_type_normalized: Option<String>,
    pub product_category: Option<String>,
    pub hair_relevance_reason: Option<String>,

    // Content
    pub description: Option<String>,
    pub usage_instructions: Option<String>,
    pub benefits_claims: Vec<String>,
    pub inci_ingredients: Option<Vec<String>>,
    pub size_volume: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,

    // Quality
    pub confidence: f64,
    pub extraction_method: Option<ExtractionMethod>,
    pub product_labels: Option<LabelResult>,

    // Provenance
    pub evidence: Vec<Evidence>,
}

impl ProductExtraction {
    /// A fresh, unpopulated record for the given brand/URL pair.
    pub fn new(brand_slug: impl Into<String>, product_url: impl Into<String>) -> Self {
        Self {
            brand_slug: brand_slug.into(),
            product_url: product_url.into(),
            product_name: None,
            image_url_main: None,
            image_urls_gallery: Vec::new(),
            gender_target: GenderTarget::default(),
            product_type_normalized: None,
            product_category: None,
            hair_relevance_reason: None,
            description: None,
            usage_instructions: None,
            benefits_claims: Vec::new(),
            inci_ingredients: None,
            size_volume: None,
            price: None,
            currency: None,
            confidence: 0.0,
            extraction_method: None,
            product_labels: None,
            evidence: Vec::new(),
        }
    }

    /// Append an evidence row (append-only per §4.5/§9).
    pub fn add_evidence(&mut self, evidence: Evidence) {
        self.evidence.push(evidence);
    }
}

/// Persisted product row together with its owned evidence (§4.10 `get_product_by_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProduct {
    pub id: Uuid,
    pub extraction: ProductExtraction,
    pub verification_status: VerificationStatus,
    pub quarantine_detail: Option<QuarantineDetail>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
