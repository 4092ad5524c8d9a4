//! Persisted shopper session.
//!
//! The session lives under two storage keys:
//!
//! - `stylehub-auth`: `{"state":{"isLoggedIn","user","accessToken"},"version":0}`
//! - `stylehub-refresh-token`: the raw refresh token
//!
//! [`SessionStore`] hydrates its in-memory copy eagerly when opened and
//! writes through to storage on every change.

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use stylehub_core::{AuthResponse, AuthUser};
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, StorageError};

/// Storage key of the session record.
pub const AUTH_STORAGE_KEY: &str = "stylehub-auth";

/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "stylehub-refresh-token";

const RECORD_VERSION: u32 = 0;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSession {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default)]
    is_logged_in: bool,
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    access_token: Option<String>,
}

impl PersistedState {
    fn has_credentials(&self) -> bool {
        self.is_logged_in && self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

#[derive(Default)]
struct SessionState {
    is_logged_in: bool,
    user: Option<AuthUser>,
    access_token: Option<SecretString>,
}

/// The signed-in session, shared by every clone.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Open the session stored in `storage`.
    ///
    /// A missing or unreadable record yields a signed-out session.
    #[must_use]
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let state = match read_record(storage.as_ref()) {
            Ok(Some(record)) => SessionState {
                is_logged_in: record.state.is_logged_in,
                user: record.state.user,
                access_token: record.state.access_token.map(SecretString::from),
            },
            Ok(None) => SessionState::default(),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable session record");
                SessionState::default()
            }
        };

        Self {
            inner: Arc::new(SessionInner {
                storage,
                state: RwLock::new(state),
            }),
        }
    }

    /// Start a session from a login, signup or social-login payload.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be persisted.
    pub fn login(&self, auth: &AuthResponse) -> Result<(), StorageError> {
        let user = auth.user();
        {
            let mut state = self.write_state();
            state.is_logged_in = true;
            state.user = Some(user.clone());
            state.access_token = Some(SecretString::from(auth.access_token.clone()));
        }

        self.inner
            .storage
            .set(REFRESH_TOKEN_KEY, &auth.refresh_token)?;
        self.persist(Some(user), Some(&auth.access_token))?;
        debug!(user_id = %auth.user_id, "Session started");
        Ok(())
    }

    /// Apply a successful token refresh: both tokens are replaced and the
    /// profile is merged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be persisted.
    pub fn apply_refresh(&self, auth: &AuthResponse) -> Result<(), StorageError> {
        let user = {
            let mut state = self.write_state();
            state.is_logged_in = true;
            state.access_token = Some(SecretString::from(auth.access_token.clone()));
            match state.user.as_mut() {
                Some(user) => user.merge_from(auth),
                None => state.user = Some(auth.user()),
            }
            state.user.clone()
        };

        self.inner
            .storage
            .set(REFRESH_TOKEN_KEY, &auth.refresh_token)?;
        self.persist(user, Some(&auth.access_token))
    }

    /// End the session, in memory and in storage.
    ///
    /// Memory is cleared even when storage fails.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if either storage key cannot be removed.
    pub fn clear(&self) -> Result<(), StorageError> {
        *self.write_state() = SessionState::default();

        let removed = self.inner.storage.remove(REFRESH_TOKEN_KEY);
        self.persist(None, None)?;
        removed
    }

    /// Bearer token for the next request.
    ///
    /// Read from storage so that a session cleared or refreshed by another
    /// handle on the same storage is seen immediately; the in-memory copy is
    /// used only when storage cannot be read.
    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        match read_record(self.inner.storage.as_ref()) {
            Ok(record) => record
                .and_then(|r| r.state.access_token)
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            Err(e) => {
                debug!(error = %e, "Falling back to in-memory access token");
                self.read_state().access_token.clone()
            }
        }
    }

    /// Stored refresh token, if any.
    #[must_use]
    pub fn refresh_token(&self) -> Option<SecretString> {
        match self.inner.storage.get(REFRESH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(SecretString::from),
            Err(e) => {
                warn!(error = %e, "Failed to read refresh token");
                None
            }
        }
    }

    /// Profile of the signed-in shopper.
    #[must_use]
    pub fn user(&self) -> Option<AuthUser> {
        self.read_state().user.clone()
    }

    /// Whether the shopper counts as signed in.
    ///
    /// True when either the in-memory flag is set or storage holds a
    /// logged-in record with an access token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        if self.read_state().is_logged_in {
            return true;
        }
        read_record(self.inner.storage.as_ref())
            .ok()
            .flatten()
            .is_some_and(|r| r.state.has_credentials())
    }

    fn persist(&self, user: Option<AuthUser>, access_token: Option<&str>) -> Result<(), StorageError> {
        let record = PersistedSession {
            state: PersistedState {
                is_logged_in: access_token.is_some(),
                user,
                access_token: access_token.map(str::to_string),
            },
            version: RECORD_VERSION,
        };
        self.inner
            .storage
            .set(AUTH_STORAGE_KEY, &serde_json::to_string(&record)?)
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("SessionStore")
            .field("is_logged_in", &state.is_logged_in)
            .field("user", &state.user.as_ref().map(|u| u.user_id))
            .field(
                "access_token",
                &state.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

fn read_record(storage: &dyn KeyValueStore) -> Result<Option<PersistedSession>, StorageError> {
    storage
        .get(AUTH_STORAGE_KEY)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(StorageError::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStore;

    fn auth(access: &str, refresh: &str) -> AuthResponse {
        serde_json::from_value(json!({
            "accessToken": access,
            "refreshToken": refresh,
            "userId": 7,
            "email": "shopper@stylehub.kr",
            "name": "Kim",
            "role": "USER",
            "address": "Seoul"
        }))
        .unwrap()
    }

    fn open() -> (Arc<MemoryStore>, SessionStore) {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::open(storage.clone());
        (storage, session)
    }

    #[test]
    fn test_login_persists_layout() {
        let (storage, session) = open();
        session.login(&auth("access-1", "refresh-1")).unwrap();

        let record: serde_json::Value =
            serde_json::from_str(&storage.get(AUTH_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(record["state"]["isLoggedIn"], json!(true));
        assert_eq!(record["state"]["accessToken"], json!("access-1"));
        assert_eq!(record["state"]["user"]["userId"], json!(7));
        assert_eq!(record["version"], json!(0));
        assert_eq!(
            storage.get(REFRESH_TOKEN_KEY).unwrap().as_deref(),
            Some("refresh-1")
        );

        assert!(session.is_authenticated());
        assert_eq!(session.access_token().unwrap().expose_secret(), "access-1");
    }

    #[test]
    fn test_open_hydrates_from_storage() {
        let (storage, session) = open();
        session.login(&auth("access-1", "refresh-1")).unwrap();

        let reopened = SessionStore::open(storage);
        assert!(reopened.is_authenticated());
        assert_eq!(reopened.user().unwrap().name, "Kim");
    }

    #[test]
    fn test_session_survives_file_store_reopen() {
        let path = std::env::temp_dir()
            .join(format!("stylehub-session-{}", uuid::Uuid::new_v4()))
            .join("state.json");

        let session = SessionStore::open(Arc::new(crate::storage::FileStore::new(&path)));
        session.login(&auth("access-1", "refresh-1")).unwrap();

        let reopened = SessionStore::open(Arc::new(crate::storage::FileStore::new(&path)));
        assert!(reopened.is_authenticated());
        assert_eq!(reopened.access_token().unwrap().expose_secret(), "access-1");
        assert_eq!(reopened.refresh_token().unwrap().expose_secret(), "refresh-1");
        assert_eq!(reopened.user().unwrap().user_id, session.user().unwrap().user_id);

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_login_over_corrupt_file_store() {
        let path = std::env::temp_dir()
            .join(format!("stylehub-session-{}", uuid::Uuid::new_v4()))
            .join("state.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let session = SessionStore::open(Arc::new(crate::storage::FileStore::new(&path)));
        assert!(!session.is_authenticated());
        session.login(&auth("access-1", "refresh-1")).unwrap();

        let reopened = SessionStore::open(Arc::new(crate::storage::FileStore::new(&path)));
        assert!(reopened.is_authenticated());
        reopened.clear().unwrap();

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_apply_refresh_replaces_tokens_and_merges_profile() {
        let (_, session) = open();
        session.login(&auth("access-1", "refresh-1")).unwrap();

        let mut refreshed = auth("access-2", "refresh-2");
        refreshed.address = None;
        refreshed.name = "Kim Minji".to_string();
        session.apply_refresh(&refreshed).unwrap();

        assert_eq!(session.access_token().unwrap().expose_secret(), "access-2");
        assert_eq!(session.refresh_token().unwrap().expose_secret(), "refresh-2");
        let user = session.user().unwrap();
        assert_eq!(user.name, "Kim Minji");
        assert_eq!(user.address.as_deref(), Some("Seoul"));
    }

    #[test]
    fn test_clear_removes_everything() {
        let (storage, session) = open();
        session.login(&auth("access-1", "refresh-1")).unwrap();
        session.clear().unwrap();

        assert!(!session.is_authenticated());
        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
        assert!(session.user().is_none());
        assert_eq!(storage.get(REFRESH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_is_authenticated_consults_storage() {
        let (storage, session) = open();
        assert!(!session.is_authenticated());

        storage
            .set(
                AUTH_STORAGE_KEY,
                r#"{"state":{"isLoggedIn":true,"user":null,"accessToken":"access-9"},"version":0}"#,
            )
            .unwrap();
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_logged_in_flag_without_token_is_not_authenticated() {
        let (storage, session) = open();
        storage
            .set(
                AUTH_STORAGE_KEY,
                r#"{"state":{"isLoggedIn":true,"user":null,"accessToken":null},"version":0}"#,
            )
            .unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_corrupt_record_opens_signed_out() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(AUTH_STORAGE_KEY, "{not json").unwrap();

        let session = SessionStore::open(storage);
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let (_, session) = open();
        session.login(&auth("access-secret", "refresh-secret")).unwrap();
        let debug_output = format!("{session:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("access-secret"));
    }
}
