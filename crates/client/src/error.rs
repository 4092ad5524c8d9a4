//! Errors surfaced by the request gateway and typed services.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur when calling the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The session could not be recovered; it has been cleared and the
    /// shopper sent to the login entry point.
    #[error("Unauthorized")]
    Unauthorized,

    /// Non-success HTTP status, or a `success: false` envelope.
    #[error("{message}")]
    RequestFailed {
        /// HTTP status of the response.
        status: u16,
        /// Envelope error code, when the body carried one.
        code: Option<String>,
        /// Envelope error message, or `HTTP <status>`.
        message: String,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Persisting the session failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Whether the failure ended the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Envelope error code, if the backend supplied one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::RequestFailed { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_displays_message_only() {
        let err = ApiError::RequestFailed {
            status: 409,
            code: Some("COUPON_ALREADY_USED".to_string()),
            message: "이미 사용된 쿠폰입니다.".to_string(),
        };
        assert_eq!(err.to_string(), "이미 사용된 쿠폰입니다.");
        assert_eq!(err.code(), Some("COUPON_ALREADY_USED"));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized() {
        assert!(ApiError::Unauthorized.is_unauthorized());
        assert_eq!(ApiError::Unauthorized.to_string(), "Unauthorized");
        assert!(ApiError::Unauthorized.code().is_none());
    }
}
