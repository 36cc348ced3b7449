//! # Error Handling
//!
//! Error taxonomy for page fetches against the storefront REST API.
//!
//! A missing or oddly shaped envelope is never an error (the decoder
//! degrades to an empty page); what surfaces here are transport failures,
//! non-success statuses, and bodies that are not JSON at all.

use thiserror::Error;

/// Maximum number of characters kept from an upstream error body.
const BODY_SNIPPET_CHARS: usize = 200;

/// Failure of a single page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport or timeout error from the HTTP client
    #[error("Network error: {details}")]
    Network { details: String },

    /// The session token was rejected (401/403)
    #[error("Unauthorized: {details}")]
    Unauthorized { details: String },

    /// The API asked us to slow down
    #[error("Rate limited{}", .retry_after_secs.map(|s| format!(" (retry after: {}s)", s)).unwrap_or_default())]
    RateLimited { retry_after_secs: Option<u64> },

    /// Any other non-success status
    #[error("HTTP error {status}: {}", .body_snippet.as_deref().unwrap_or("No body"))]
    Http {
        status: u16,
        body_snippet: Option<String>,
    },

    /// The response body was not JSON
    #[error("Malformed response: {details}")]
    Decode { details: String },

    /// The request could not be built (bad path or query)
    #[error("Invalid request: {details}")]
    InvalidRequest { details: String },
}

impl FetchError {
    /// Build an HTTP status error, truncating the body for display.
    pub fn http(status: u16, body: Option<String>) -> Self {
        Self::Http {
            status,
            body_snippet: body.filter(|b| !b.is_empty()).map(truncate_snippet),
        }
    }

    /// Whether a user-initiated retry has a reasonable chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network { .. } | FetchError::RateLimited { .. } => true,
            FetchError::Http { status, .. } => *status >= 500,
            FetchError::Unauthorized { .. }
            | FetchError::Decode { .. }
            | FetchError::InvalidRequest { .. } => false,
        }
    }

    /// Stable machine-readable code, used as a metric label.
    pub fn code(&self) -> &'static str {
        match self {
            FetchError::Network { .. } => "NETWORK",
            FetchError::Unauthorized { .. } => "UNAUTHORIZED",
            FetchError::RateLimited { .. } => "RATE_LIMITED",
            FetchError::Http { .. } => "HTTP",
            FetchError::Decode { .. } => "DECODE",
            FetchError::InvalidRequest { .. } => "INVALID_REQUEST",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            FetchError::Decode {
                details: error.to_string(),
            }
        } else if error.is_builder() {
            FetchError::InvalidRequest {
                details: error.to_string(),
            }
        } else {
            FetchError::Network {
                details: error.to_string(),
            }
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(error: url::ParseError) -> Self {
        FetchError::InvalidRequest {
            details: error.to_string(),
        }
    }
}

fn truncate_snippet(body: String) -> String {
    if body.chars().count() > BODY_SNIPPET_CHARS {
        let truncated: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
        format!("{}...", truncated)
    } else {
        body
    }
}
