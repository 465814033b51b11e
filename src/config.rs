//! Environment-driven configuration (§6 "Environment inputs").
//!
//! Read with plain `std::env::var`, matching the convention the rest of
//! this codebase's ancestry uses throughout — no config-loading crate.

use std::time::Duration;

use crate::error::PipelineError;

/// Process-wide knobs the coverage engine and its collaborators read at
/// startup. `database_url` is required; everything else has a spec-given
/// default.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub database_url: String,
    pub request_delay: Duration,
    pub headless: bool,
    pub max_llm_calls_per_brand: u32,
    pub llm_model: Option<String>,
}

impl PipelineConfig {
    /// Load from the process environment, applying the defaults §6 specifies.
    pub fn from_env() -> Result<Self, PipelineError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| PipelineError::Config {
            reason: "DATABASE_URL is required".to_string(),
        })?;

        let request_delay_seconds: u64 = std::env::var("REQUEST_DELAY_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let headless = std::env::var("HEADLESS")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let max_llm_calls_per_brand = std::env::var("MAX_LLM_CALLS_PER_BRAND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(50);

        let llm_model = std::env::var("LLM_MODEL").ok();

        Ok(Self {
            database_url,
            request_delay: Duration::from_secs(request_delay_seconds),
            headless,
            max_llm_calls_per_brand,
            llm_model,
        })
    }
}
