//! Integration tests for the StyleHub client.
//!
//! Every test starts its own [`MockBackend`], an in-process axum server on
//! `127.0.0.1:0` that speaks the storefront envelope, issues and rotates
//! tokens, and keeps per-product like state.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stylehub-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `gateway` - Envelope handling, token refresh and forced logout
//! - `likes` - Optimistic like toggles, rollback and invalidation
//! - `end_to_end` - Sign-in through silent refresh

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use stylehub_client::{ApiClient, ClientConfig, LoginRedirect, MemoryStore, SessionStore};
use stylehub_core::{AuthResponse, LikeState};
use url::Url;

/// Password the mock accepts for every email.
pub const PASSWORD: &str = "correct-horse";

/// Email of the mock's only shopper.
pub const EMAIL: &str = "shopper@stylehub.kr";

// =============================================================================
// Mock Backend
// =============================================================================

#[derive(Default)]
struct Tokens {
    generation: u32,
    access: String,
    refresh: String,
}

impl Tokens {
    fn rotate(&mut self) {
        self.generation += 1;
        self.access = format!("access-{}", self.generation);
        self.refresh = format!("refresh-{}", self.generation);
    }
}

#[derive(Default)]
struct MockState {
    tokens: Mutex<Tokens>,
    refresh_calls: AtomicUsize,
    refresh_delay: Mutex<Duration>,
    refresh_fails: AtomicBool,
    like_fails: AtomicBool,
    status_fails: AtomicBool,
    toggle_delays: Mutex<VecDeque<Duration>>,
    withdrawn: AtomicBool,
    likes: Mutex<HashMap<i64, LikeState>>,
    hits: Mutex<HashMap<String, usize>>,
    request_ids: Mutex<Vec<String>>,
}

impl MockState {
    fn tokens(&self) -> std::sync::MutexGuard<'_, Tokens> {
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn auth_payload(&self) -> Value {
        let tokens = self.tokens();
        json!({
            "accessToken": tokens.access,
            "refreshToken": tokens.refresh,
            "tokenType": "Bearer",
            "userId": 7,
            "email": EMAIL,
            "name": "Kim Minji",
            "role": "USER",
            "address": "Seoul"
        })
    }

    fn record(&self, path: &str, headers: &HeaderMap) {
        *self
            .hits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_string())
            .or_default() += 1;

        if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
            self.request_ids
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(id.to_string());
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {}", self.tokens().access);
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
    }
}

type Shared = Arc<MockState>;

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

fn fail(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "success": false, "error": { "code": code, "message": message } })),
    )
        .into_response()
}

fn unauthorized() -> Response {
    fail(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "인증이 필요합니다.")
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record("/auth/login", &headers);
    if body["password"] != PASSWORD {
        return fail(
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "이메일 또는 비밀번호가 올바르지 않습니다.",
        );
    }
    state.tokens().rotate();
    ok(state.auth_payload())
}

async fn refresh(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record("/auth/refresh", &headers);
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    let delay = *state
        .refresh_delay
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    if state.refresh_fails.load(Ordering::SeqCst) {
        return fail(StatusCode::UNAUTHORIZED, "INVALID_TOKEN", "유효하지 않은 토큰입니다.");
    }
    if body["refreshToken"] != state.tokens().refresh.as_str() {
        return fail(StatusCode::UNAUTHORIZED, "INVALID_TOKEN", "유효하지 않은 토큰입니다.");
    }

    state.tokens().rotate();
    ok(state.auth_payload())
}

async fn like_status(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    state.record(&format!("/products/{id}/like/status"), &headers);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    if state.status_fails.load(Ordering::SeqCst) {
        return fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "서버 오류가 발생했습니다.",
        );
    }
    let like = state
        .likes
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .copied()
        .unwrap_or(LikeState::new(false, 0));
    ok(json!(like))
}

async fn like_count(State(state): State<Shared>, Path(id): Path<i64>, headers: HeaderMap) -> Response {
    state.record(&format!("/products/{id}/like/count"), &headers);
    let count = state
        .likes
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .map_or(0, |l| l.like_count);
    ok(json!(count))
}

async fn toggle_like(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    state.record(&format!("/products/{id}/like"), &headers);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    if state.like_fails.load(Ordering::SeqCst) {
        return fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "서버 오류가 발생했습니다.",
        );
    }

    // Delays are taken in arrival order; the state changes before the wait.
    let delay = state
        .toggle_delays
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front();
    let like = {
        let mut likes = state.likes.lock().unwrap_or_else(PoisonError::into_inner);
        let like = likes.entry(id).or_insert(LikeState::new(false, 0));
        *like = like.toggled();
        *like
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    ok(json!(like))
}

async fn my_likes(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.record("/my/likes", &headers);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let likes = state.likes.lock().unwrap_or_else(PoisonError::into_inner);
    let liked: Vec<Value> = likes
        .iter()
        .filter(|(_, like)| like.liked)
        .map(|(id, _)| {
            json!({
                "productId": id,
                "productName": format!("Product {id}"),
                "price": "39000",
                "likedAt": "2026-10-01T12:00:00"
            })
        })
        .collect();
    ok(json!(liked))
}

async fn curations(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.record("/curations", &headers);
    ok(json!([]))
}

async fn profile(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.record("/users/me", &headers);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    ok(json!({ "userId": 7, "name": "Kim Minji" }))
}

async fn withdraw(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.record("/auth/withdraw", &headers);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    state.withdrawn.store(true, Ordering::SeqCst);
    ok(Value::Null)
}

async fn staff_only(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.record("/admin/dashboard", &headers);
    unauthorized()
}

async fn rejected(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.record("/coupons/9/use", &headers);
    fail(StatusCode::OK, "COUPON_EXPIRED", "만료된 쿠폰입니다.")
}

async fn bad_request(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.record("/cart", &headers);
    fail(StatusCode::BAD_REQUEST, "OUT_OF_STOCK", "재고가 부족합니다.")
}

async fn gateway_error(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.record("/broken", &headers);
    (StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>").into_response()
}

/// In-process storefront backend.
pub struct MockBackend {
    base_url: Url,
    state: Shared,
}

impl MockBackend {
    /// Start a backend on an ephemeral port.
    pub async fn start() -> Self {
        let state = Shared::default();
        state.tokens().rotate();

        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/refresh", post(refresh))
            .route("/auth/withdraw", delete(withdraw))
            .route("/products/{id}/like", post(toggle_like))
            .route("/products/{id}/like/status", get(like_status))
            .route("/products/{id}/like/count", get(like_count))
            .route("/my/likes", get(my_likes))
            .route("/curations", get(curations))
            .route("/users/me", get(profile))
            .route("/admin/dashboard", get(staff_only))
            .route("/coupons/9/use", post(rejected))
            .route("/cart", post(bad_request))
            .route("/broken", get(gateway_error))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/")).unwrap(),
            state,
        }
    }

    /// Base URL clients should use.
    #[must_use]
    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// A signed-out client with fresh in-memory storage.
    #[must_use]
    pub fn client(&self) -> TestClient {
        let mut config = ClientConfig::new(self.base_url());
        config.http_timeout = Duration::from_secs(5);

        let redirect = Arc::new(RecordingRedirect::default());
        let session = SessionStore::open(Arc::new(MemoryStore::new()));
        let api = ApiClient::new(&config, session, redirect.clone()).unwrap();
        TestClient { api, redirect }
    }

    /// A client holding the backend's current tokens.
    #[must_use]
    pub fn signed_in_client(&self) -> TestClient {
        let client = self.client();
        let auth: AuthResponse = serde_json::from_value(self.state.auth_payload()).unwrap();
        client.api.session().login(&auth).unwrap();
        client
    }

    /// Invalidate the issued access token. The refresh token stays valid.
    pub fn expire_access_token(&self) {
        self.state.tokens().access = "expired-on-server".to_string();
    }

    /// Current valid access token.
    #[must_use]
    pub fn access_token(&self) -> String {
        self.state.tokens().access.clone()
    }

    /// Make every refresh attempt fail.
    pub fn fail_refresh(&self) {
        self.state.refresh_fails.store(true, Ordering::SeqCst);
    }

    /// Delay every refresh response.
    pub fn delay_refresh(&self, delay: Duration) {
        *self
            .state
            .refresh_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = delay;
    }

    /// Make like toggles fail with a 500.
    pub fn fail_likes(&self, fail: bool) {
        self.state.like_fails.store(fail, Ordering::SeqCst);
    }

    /// Make like status fetches fail with a 500.
    pub fn fail_status(&self, fail: bool) {
        self.state.status_fails.store(fail, Ordering::SeqCst);
    }

    /// Hold the answer to the next like toggle for `delay`. Queued delays
    /// apply to toggles in arrival order.
    pub fn delay_next_toggle(&self, delay: Duration) {
        self.state
            .toggle_delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(delay);
    }

    /// Whether the account was withdrawn.
    #[must_use]
    pub fn withdrawn(&self) -> bool {
        self.state.withdrawn.load(Ordering::SeqCst)
    }

    /// Wait until `path` has received `count` requests.
    pub async fn wait_for_hits(&self, path: &str, count: usize) {
        for _ in 0..200 {
            if self.hits(path) >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("{path} never reached {count} requests");
    }

    /// Seed the server-side like state of a product.
    pub fn set_like(&self, product_id: i64, like: LikeState) {
        self.state
            .likes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product_id, like);
    }

    /// Server-side like state of a product.
    #[must_use]
    pub fn like(&self, product_id: i64) -> Option<LikeState> {
        self.state
            .likes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&product_id)
            .copied()
    }

    /// Number of `/auth/refresh` calls received.
    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    /// Number of requests received for `path`.
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        self.state
            .hits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// `x-request-id` values seen, in arrival order.
    #[must_use]
    pub fn request_ids(&self) -> Vec<String> {
        self.state
            .request_ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// =============================================================================
// Test Client
// =============================================================================

/// Login redirect that counts how often it was asked to navigate.
#[derive(Debug, Default)]
pub struct RecordingRedirect {
    paths: Mutex<Vec<String>>,
}

impl RecordingRedirect {
    /// Login paths requested so far.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LoginRedirect for RecordingRedirect {
    fn redirect_to_login(&self, login_path: &str) {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(login_path.to_string());
    }
}

/// A client wired to a [`MockBackend`], with its redirect recorder.
pub struct TestClient {
    pub api: ApiClient,
    pub redirect: Arc<RecordingRedirect>,
}
