//! Typed errors for pronoun lookups.

use thiserror::Error;

/// Reasons a single pronoun lookup can fail.
///
/// Every variant is recovered by the resolver: the author is cached as having
/// no pronoun and the failure is logged.
#[derive(Debug, Error)]
pub enum PronounError {
    /// The configured API URL is malformed, not HTTPS, or not on the allowlist.
    #[error("invalid pronoun API URL: {0}")]
    InvalidUrl(String),

    /// The request failed (DNS, connection, TLS or non-2xx status).
    #[error("pronoun request failed: {0}")]
    Http(String),

    /// The response body could not be read or exceeded the size limit.
    #[error("failed to read pronoun response: {0}")]
    Body(String),

    /// The response body was not the expected JSON shape.
    #[error("failed to parse pronoun response: {0}")]
    Json(#[from] serde_json::Error),
}
