//! Access-token refresh.

use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use secrecy::ExposeSecret;
use stylehub_core::{ApiResponse, AuthResponse, RefreshRequest};
use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{ApiClient, REQUEST_ID_HEADER};
use crate::storage::StorageError;

/// Refresh endpoint path.
const REFRESH_PATH: &str = "/auth/refresh";

/// Why a refresh did not produce new tokens. Always converted into
/// `ApiError::Unauthorized` by the gateway.
#[derive(Debug, Error)]
pub(crate) enum RefreshError {
    /// Another caller holds the refresh flag.
    #[error("Token refresh already in progress")]
    InProgress,

    #[error("No refresh token stored")]
    NoRefreshToken,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Refresh rejected with HTTP {0}")]
    Rejected(StatusCode),

    #[error("Refresh failed: {0}")]
    Envelope(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Holds the refresh-in-progress flag; releases it on drop.
struct RefreshGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RefreshGuard<'a> {
    /// Take the flag, or `None` if a refresh is already running.
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl ApiClient {
    /// Exchange the stored refresh token for new tokens.
    ///
    /// A caller that finds a refresh already running fails at once with
    /// `RefreshError::InProgress` rather than waiting for it.
    #[instrument(skip(self))]
    pub(super) async fn refresh_session(&self) -> Result<(), RefreshError> {
        let Some(_guard) = RefreshGuard::acquire(&self.inner.refreshing) else {
            debug!("Refresh already in progress");
            return Err(RefreshError::InProgress);
        };

        let refresh_token = self
            .inner
            .session
            .refresh_token()
            .ok_or(RefreshError::NoRefreshToken)?;

        let response = self
            .inner
            .http
            .post(self.url(REFRESH_PATH))
            .header(CONTENT_TYPE, "application/json")
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .json(&RefreshRequest {
                refresh_token: refresh_token.expose_secret().to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshError::Rejected(status));
        }

        let envelope: ApiResponse<AuthResponse> = serde_json::from_str(&response.text().await?)?;
        if !envelope.success {
            return Err(RefreshError::Envelope(
                envelope
                    .error_message()
                    .unwrap_or("success=false")
                    .to_string(),
            ));
        }
        let auth = envelope
            .data
            .ok_or_else(|| RefreshError::Envelope("missing data".to_string()))?;

        self.inner.session.apply_refresh(&auth)?;
        info!(user_id = %auth.user_id, "Access token refreshed");
        Ok(())
    }
}
