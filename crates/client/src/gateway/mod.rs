//! Authenticated request gateway.
//!
//! Every call attaches the stored bearer token, unwraps the
//! `{ success, data?, error? }` envelope and, on a first 401, refreshes the
//! access token once and retries once. When the session cannot be recovered
//! it is cleared, the shopper is redirected to the login entry point and the
//! call fails with [`ApiError::Unauthorized`].

mod refresh;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use serde_json::Value;
use stylehub_core::ApiResponse;
use tracing::{Span, debug, error, instrument, warn};
use uuid::Uuid;

use crate::cache::QueryCache;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::redirect::LoginRedirect;
use crate::session::SessionStore;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client for the StyleHub storefront API.
///
/// Clones share the HTTP connection pool, session, query cache and the
/// refresh-in-progress flag.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    login_path: String,
    session: SessionStore,
    cache: QueryCache,
    redirect: Arc<dyn LoginRedirect>,
    refreshing: AtomicBool,
}

/// What the response body should contain on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// An envelope whose `data` is returned.
    Envelope,
    /// Nothing that matters; any 2xx succeeds.
    Nothing,
}

/// What happens when a call comes back 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnUnauthorized {
    /// Refresh once and retry once, then force logout.
    Recover,
    /// Report it like any other failed status.
    Fail,
}

/// Result of a single HTTP exchange.
enum Attempt {
    Done(Value),
    Unauthorized(String),
}

impl ApiClient {
    /// Create a client for `config.api_url`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        session: SessionStore,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
                login_path: config.login_path.clone(),
                session,
                cache: QueryCache::new(config.cache_capacity, config.cache_ttl),
                redirect,
                refreshing: AtomicBool::new(false),
            }),
        })
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// The cache behind [`Self::get_cached`].
    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    // =========================================================================
    // Request Methods
    // =========================================================================

    /// `GET path`, returning the envelope's `data`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the session could not be recovered,
    /// `ApiError::RequestFailed` for any other failed status or a
    /// `success: false` envelope, and `ApiError::Http`/`ApiError::Parse` for
    /// transport and decoding failures.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let data = self
            .execute(Method::GET, path, None, Expect::Envelope, OnUnauthorized::Recover)
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    /// `POST path` with a JSON body, returning the envelope's `data`.
    ///
    /// # Errors
    ///
    /// See [`Self::get`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::POST, path, body, OnUnauthorized::Recover)
            .await
    }

    /// `PUT path` with a JSON body, returning the envelope's `data`.
    ///
    /// # Errors
    ///
    /// See [`Self::get`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PUT, path, body, OnUnauthorized::Recover)
            .await
    }

    /// `PATCH path` with a JSON body, returning the envelope's `data`.
    ///
    /// # Errors
    ///
    /// See [`Self::get`].
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PATCH, path, body, OnUnauthorized::Recover)
            .await
    }

    /// `DELETE path`. Any 2xx succeeds; the body is not inspected.
    ///
    /// # Errors
    ///
    /// See [`Self::get`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, None, Expect::Nothing, OnUnauthorized::Recover)
            .await?;
        Ok(())
    }

    /// `GET path` through the query cache.
    ///
    /// # Errors
    ///
    /// See [`Self::get`]. Failed reads are not cached.
    pub async fn get_cached<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        if let Some(data) = self.inner.cache.get(path).await {
            debug!(path = %path, "Query cache hit");
            return Ok(T::deserialize(data.as_ref())?);
        }

        let data = self
            .execute(Method::GET, path, None, Expect::Envelope, OnUnauthorized::Recover)
            .await?;
        let decoded = T::deserialize(&data)?;
        self.inner.cache.insert(path, data).await;
        Ok(decoded)
    }

    /// Drop the cached read of `path`.
    pub async fn invalidate(&self, path: &str) {
        self.inner.cache.invalidate(path).await;
    }

    /// `GET path` for endpoints that issue credentials. A 401 here means
    /// rejected credentials, so it is reported as an ordinary failure.
    pub(crate) async fn get_public<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let data = self
            .execute(Method::GET, path, None, Expect::Envelope, OnUnauthorized::Fail)
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    /// `POST` counterpart of [`Self::get_public`].
    pub(crate) async fn post_public<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::POST, path, body, OnUnauthorized::Fail)
            .await
    }

    async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        on_unauthorized: OnUnauthorized,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        let data = self
            .execute(method, path, Some(&body), Expect::Envelope, on_unauthorized)
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    // =========================================================================
    // Execution
    // =========================================================================

    #[instrument(skip(self, method, body, expect, on_unauthorized), fields(method = %method))]
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        expect: Expect,
        on_unauthorized: OnUnauthorized,
    ) -> Result<Value, ApiError> {
        let error_body = match self.send_once(&method, path, body, expect).await? {
            Attempt::Done(data) => return Ok(data),
            Attempt::Unauthorized(error_body) => error_body,
        };

        if on_unauthorized == OnUnauthorized::Fail {
            return Err(failure(StatusCode::UNAUTHORIZED, &error_body));
        }

        if let Err(e) = self.refresh_session().await {
            warn!(error = %e, "Token refresh failed");
            return Err(self.force_logout().await);
        }

        match self.send_once(&method, path, body, expect).await? {
            Attempt::Done(data) => Ok(data),
            Attempt::Unauthorized(_) => {
                warn!("Retried request still unauthorized");
                Err(self.force_logout().await)
            }
        }
    }

    #[instrument(skip(self, body, expect), fields(request_id = tracing::field::Empty))]
    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        expect: Expect,
    ) -> Result<Attempt, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", &request_id);

        let mut request = self
            .inner
            .http
            .request(method.clone(), self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(token) = self.inner.session.access_token() {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            debug!("Request unauthorized");
            return Ok(Attempt::Unauthorized(text));
        }

        if !status.is_success() {
            let err = failure(status, &text);
            debug!(status = %status, error = %err, "Request failed");
            return Err(err);
        }

        if expect == Expect::Nothing {
            return Ok(Attempt::Done(Value::Null));
        }

        let envelope: ApiResponse<Value> = serde_json::from_str(&text).map_err(|e| {
            error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse response envelope"
            );
            e
        })?;

        if !envelope.success {
            return Err(envelope_failure(status, envelope));
        }

        Ok(Attempt::Done(envelope.data.unwrap_or(Value::Null)))
    }

    /// Clear the session, drop cached reads and send the shopper to login.
    async fn force_logout(&self) -> ApiError {
        if let Err(e) = self.inner.session.clear() {
            error!(error = %e, "Failed to clear persisted session");
        }
        self.inner.cache.invalidate_all().await;
        self.inner.redirect.redirect_to_login(&self.inner.login_path);
        ApiError::Unauthorized
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("login_path", &self.inner.login_path)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

/// Error for a failed status, preferring the envelope's message when the
/// body is an envelope at all.
fn failure(status: StatusCode, body: &str) -> ApiError {
    match serde_json::from_str::<ApiResponse<IgnoredAny>>(body) {
        Ok(envelope) => envelope_failure(status, envelope),
        Err(_) => ApiError::RequestFailed {
            status: status.as_u16(),
            code: None,
            message: format!("HTTP {}", status.as_u16()),
        },
    }
}

fn envelope_failure<T>(status: StatusCode, envelope: ApiResponse<T>) -> ApiError {
    let (code, message) = envelope.error.map_or_else(
        || (None, format!("HTTP {}", status.as_u16())),
        |e| (Some(e.code), e.message),
    );
    ApiError::RequestFailed {
        status: status.as_u16(),
        code,
        message,
    }
}
