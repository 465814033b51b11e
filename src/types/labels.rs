//! Output types for the label (quality-seal) engine (§4.6).

use serde::{Deserialize, Serialize};

/// The closed set of seals the engine can detect or infer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seal {
    SulfateFree,
    Vegan,
    SiliconeFree,
    Organic,
    Natural,
    LowPoo,
    NoPoo,
    CrueltyFree,
    ParabenFree,
    PetrolatumFree,
    DyeFree,
}

impl Seal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Seal::SulfateFree => "sulfate_free",
            Seal::Vegan => "vegan",
            Seal::SiliconeFree => "silicone_free",
            Seal::Organic => "organic",
            Seal::Natural => "natural",
            Seal::LowPoo => "low_poo",
            Seal::NoPoo => "no_poo",
            Seal::CrueltyFree => "cruelty_free",
            Seal::ParabenFree => "paraben_free",
            Seal::PetrolatumFree => "petrolatum_free",
            Seal::DyeFree => "dye_free",
        }
    }

    pub const ALL: [Seal; 11] = [
        Seal::SulfateFree,
        Seal::Vegan,
        Seal::SiliconeFree,
        Seal::Organic,
        Seal::Natural,
        Seal::LowPoo,
        Seal::NoPoo,
        Seal::CrueltyFree,
        Seal::ParabenFree,
        Seal::PetrolatumFree,
        Seal::DyeFree,
    ];
}

/// Which class of signal a seal's source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSource {
    OfficialText,
    HtmlImgElement,
    InciAnalysis,
}

/// Provenance for one detected or inferred seal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEvidence {
    pub field_name: String,
    pub extraction_method: LabelSource,
    pub raw_source_text: String,
    pub evidence_locator: String,
}

/// The full result of running the label engine over a product record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LabelResult {
    pub detected: Vec<Seal>,
    pub inferred: Vec<Seal>,
    pub confidence: f64,
    pub sources: Vec<LabelSource>,
    pub evidence: Vec<LabelEvidence>,
    /// Manual override; not set by the engine itself (§4.6).
    pub manually_verified: bool,
}

impl LabelResult {
    pub fn has_seal(&self, seal: Seal) -> bool {
        self.detected.contains(&seal) || self.inferred.contains(&seal)
    }
}
