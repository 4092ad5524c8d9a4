//! The uniform response envelope returned by every storefront endpoint.

use serde::{Deserialize, Serialize};

/// Response envelope: `{ success, data?, error?: { code, message } }`.
///
/// A well-formed envelope has `data` (possibly `null` for void endpoints)
/// and no `error` when `success` is true, and an `error` when `success` is
/// false. Transport success does not imply application success; callers
/// must check `success` even on a 2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Application-level outcome.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error details on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// Error details carried inside a failed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable code, e.g. `COUPON_EXPIRED`.
    pub code: String,
    /// Human-readable message suitable for display.
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// A successful envelope carrying `data`.
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failed envelope with an error code and message.
    pub fn fail(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.into(),
                message: message.into(),
            }),
        }
    }

    /// The error message, if the envelope carries one.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}
