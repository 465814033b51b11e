//! Typed errors for the catalog harvesting pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Top-level errors surfaced by the pipeline crate.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fetching a page failed; recorded per-URL, never aborts a brand run.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Persisting to the repository failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Security validation failed (domain not allowed, SSRF guard tripped).
    #[error("security error: {0}")]
    Security(#[from] SecurityError),

    /// Blueprint document could not be parsed.
    #[error("blueprint error: {0}")]
    Blueprint(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON parsing error surfaced while reading structured data or wire payloads.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error (missing or malformed environment input).
    #[error("config error: {reason}")]
    Config { reason: String },
}

/// Errors that can occur while fetching a single page.
///
/// Fetch errors are isolated to the URL that produced them: the coverage
/// engine records them as `extraction_error` and continues the brand run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Security validation failed before the request was issued.
    #[error("security error: {0}")]
    Security(#[from] SecurityError),

    /// The underlying HTTP client failed.
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The fetch exceeded its cancellation deadline.
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// The page returned a non-success status.
    #[error("unexpected status {status} fetching: {url}")]
    Status { url: String, status: u16 },
}

/// Security-related errors, primarily for SSRF protection and domain allowlisting.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., `file://`, `ftp://`).
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, internal IPs).
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., `10.0.0.0/8`).
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// The URL's host is not one of the brand's allowed domains.
    #[error("host {host} not in allowed domains for brand {brand_slug}")]
    DomainNotAllowed { host: String, brand_slug: String },

    /// URL has no host.
    #[error("URL has no host")]
    NoHost,

    /// URL parsing failed.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Errors propagated from the repository interface.
///
/// Per §7, repository errors are propagated to the caller, who may retry
/// the whole brand run; they are not swallowed the way fetch errors are.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A product referenced by id does not exist.
    #[error("product not found: {id}")]
    ProductNotFound { id: uuid::Uuid },

    /// A quarantined product is missing its required `QuarantineDetail`.
    #[error("quarantined product {id} has no quarantine detail")]
    MissingQuarantineDetail { id: uuid::Uuid },
}

/// Result type alias for top-level pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;

/// Result type alias for repository operations.
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;
