//! Per-brand counters maintained across a coverage run (§3, §4.9).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// The persisted, per-brand-singleton rollup (§3, §4.10).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandCoverage {
    pub brand_slug: String,
    pub discovered_total: u64,
    pub hair_total: u64,
    pub kits_total: u64,
    pub non_hair_total: u64,
    pub extracted_total: u64,
    pub verified_inci_total: u64,
    pub verified_inci_rate: f64,
    pub catalog_only_total: u64,
    pub quarantined_total: u64,
    pub status: CoverageStatus,
    pub last_run: DateTime<Utc>,
    pub coverage_report: JsonValue,
}

/// Terminal status of a brand run, surfaced alongside counters (§7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStatus {
    Completed,
    StoppedTheLine,
}

/// Working accumulator the coverage engine mutates as it walks a brand's
/// discovered URLs. Finalized into a [`BrandCoverage`] at the end of the run.
#[derive(Debug, Clone, Default)]
pub struct BrandReport {
    pub discovered_total: u64,
    pub hair_total: u64,
    pub kits_total: u64,
    pub non_hair_total: u64,
    pub extracted_total: u64,
    pub verified_inci_total: u64,
    pub catalog_only_total: u64,
    pub quarantined_total: u64,
    /// Human-readable log of non-fatal per-URL errors and stop-the-line events.
    pub errors: Vec<String>,
}

impl BrandReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quarantine rate over attempted extractions, used by the stop-the-line breaker.
    pub fn failure_rate(&self) -> f64 {
        if self.extracted_total == 0 {
            return 0.0;
        }
        self.quarantined_total as f64 / self.extracted_total as f64
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Fold this report into a persistable [`BrandCoverage`].
    pub fn finalize(self, brand_slug: impl Into<String>, status: CoverageStatus) -> BrandCoverage {
        let verified_inci_rate = if self.extracted_total == 0 {
            0.0
        } else {
            self.verified_inci_total as f64 / self.extracted_total as f64
        };
        BrandCoverage {
            brand_slug: brand_slug.into(),
            discovered_total: self.discovered_total,
            hair_total: self.hair_total,
            kits_total: self.kits_total,
            non_hair_total: self.non_hair_total,
            extracted_total: self.extracted_total,
            verified_inci_total: self.verified_inci_total,
            verified_inci_rate,
            catalog_only_total: self.catalog_only_total,
            quarantined_total: self.quarantined_total,
            status,
            last_run: Utc::now(),
            coverage_report: serde_json::json!({ "errors": self.errors }),
        }
    }
}
