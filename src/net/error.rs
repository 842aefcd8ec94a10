//! Error type for the HTTP client wrapper.
//!
//! ERROR HANDLING
//! ==============
//! The wrapper does not recover anything: transport failures keep their
//! original `reqwest::Error`, and non-2xx responses surface their status plus
//! whatever human-readable detail the backend put in the body.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, DNS, CORS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },

    /// A success response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// A request URL could not be built from the configured root.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// A request could not be assembled before sending (body serialization,
    /// header values).
    #[error("request build failed: {0}")]
    RequestBuild(String),
}

impl ApiError {
    /// Stable machine-readable code for UI mapping and logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_TRANSPORT",
            Self::Status { status: 401 | 403, .. } => "E_AUTH_REJECTED",
            Self::Status { .. } => "E_STATUS",
            Self::Decode(_) => "E_DECODE",
            Self::InvalidUrl(_) => "E_INVALID_URL",
            Self::ClientBuild(_) => "E_CLIENT_BUILD",
            Self::RequestBuild(_) => "E_REQUEST_BUILD",
        }
    }

    /// Whether a caller could reasonably try again. Informational only:
    /// nothing in this crate retries.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { status: 429 | 500..=599, .. })
    }

    /// The backend refused the credentials or the session.
    #[must_use]
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }

    /// HTTP status, when the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[allow(clippy::ref_option)]
fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"detail": ..}`, `{"error": ..}` or `{"message": ..}`; anything
/// else (HTML error pages, empty bodies) yields `None`.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .detail
        .or(parsed.error)
        .or(parsed.message)
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}
