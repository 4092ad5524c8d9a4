//! Sign-in endpoints.

use secrecy::{ExposeSecret, SecretString};
use stylehub_core::{AuthResponse, AuthUser, Email, LoginRequest, SignupRequest};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::gateway::ApiClient;
use crate::services::with_query;

impl ApiClient {
    /// Sign in with email and password and store the session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::RequestFailed` for bad credentials and
    /// `ApiError::Storage` if the session cannot be persisted.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &SecretString) -> Result<AuthUser, ApiError> {
        let auth: AuthResponse = self
            .post_public(
                "/auth/login",
                &LoginRequest {
                    email: email.as_str(),
                    password: password.expose_secret(),
                },
            )
            .await?;
        self.start_session(&auth).await
    }

    /// Create an account and store the session.
    ///
    /// # Errors
    ///
    /// See [`Self::login`].
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn signup(
        &self,
        email: &Email,
        password: &SecretString,
        name: &str,
    ) -> Result<AuthUser, ApiError> {
        let auth: AuthResponse = self
            .post_public(
                "/auth/signup",
                &SignupRequest {
                    email: email.as_str(),
                    password: password.expose_secret(),
                    name,
                },
            )
            .await?;
        self.start_session(&auth).await
    }

    /// Complete a Kakao social login with the authorization `code`.
    ///
    /// # Errors
    ///
    /// See [`Self::login`].
    #[instrument(skip(self, code))]
    pub async fn kakao_callback(&self, code: &str) -> Result<AuthUser, ApiError> {
        let path = with_query("/auth/kakao/callback", [("code", code)]);
        let auth: AuthResponse = self.get_public(&path).await?;
        self.start_session(&auth).await
    }

    /// Delete the shopper's account, then end the session locally.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error if the backend refuses, in which case the
    /// session is kept, and `ApiError::Storage` if the persisted session
    /// cannot be removed afterwards.
    #[instrument(skip(self))]
    pub async fn withdraw(&self) -> Result<(), ApiError> {
        self.delete("/auth/withdraw").await?;
        self.session().clear()?;
        self.cache().invalidate_all().await;
        info!("Account withdrawn");
        Ok(())
    }

    /// End the session locally. The backend keeps no session to revoke.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the persisted session cannot be removed.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session().clear()?;
        self.cache().invalidate_all().await;
        info!("Signed out");
        Ok(())
    }

    async fn start_session(&self, auth: &AuthResponse) -> Result<AuthUser, ApiError> {
        self.session().login(auth)?;
        // Cached reads may belong to a previous shopper.
        self.cache().invalidate_all().await;
        info!(user_id = %auth.user_id, "Signed in");
        Ok(auth.user())
    }
}
