//! Saved shipping addresses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::id::AddressId;

/// Saved address (`GET /addresses`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub id: AddressId,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub zip_code: String,
    pub address: String,
    #[serde(default)]
    pub address_detail: String,
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

/// Body of `POST /addresses` and `PUT /addresses/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    pub receiver_name: String,
    pub receiver_phone: String,
    pub zip_code: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}
