//! Authentication payloads.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Profile of the signed-in shopper, as persisted with the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_detail: Option<String>,
}

impl AuthUser {
    /// Merge profile fields from a fresher auth payload.
    ///
    /// Identity fields are replaced; optional shipping fields are only
    /// overwritten when the payload carries them, so a refresh response that
    /// omits the address does not erase one captured at login.
    pub fn merge_from(&mut self, auth: &AuthResponse) {
        self.user_id = auth.user_id;
        self.email.clone_from(&auth.email);
        self.name.clone_from(&auth.name);
        self.role.clone_from(&auth.role);
        if auth.phone.is_some() {
            self.phone.clone_from(&auth.phone);
        }
        if auth.postcode.is_some() {
            self.postcode.clone_from(&auth.postcode);
        }
        if auth.address.is_some() {
            self.address.clone_from(&auth.address);
        }
        if auth.address_detail.is_some() {
            self.address_detail.clone_from(&auth.address_detail);
        }
    }
}

/// Payload of `/auth/login`, `/auth/signup`, `/auth/kakao/callback` and
/// `/auth/refresh`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_detail: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl AuthResponse {
    /// The profile portion of the payload.
    #[must_use]
    pub fn user(&self) -> AuthUser {
        AuthUser {
            user_id: self.user_id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
            phone: self.phone.clone(),
            postcode: self.postcode.clone(),
            address: self.address.clone(),
            address_detail: self.address_detail.clone(),
        }
    }
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Body of `POST /auth/login`.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/signup`.
#[derive(Serialize)]
pub struct SignupRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

/// Body of `POST /auth/refresh`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}
