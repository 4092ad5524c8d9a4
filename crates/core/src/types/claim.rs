//! Cancel and return claims.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ClaimId, ClaimItemId, OrderId, OrderItemId, ProductId};
use super::status::{ClaimStatus, ClaimType};

/// Row of the claim history (`GET /claims`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSummary {
    pub id: ClaimId,
    pub order_id: OrderId,
    #[serde(default)]
    pub order_number: Option<String>,
    pub claim_type: ClaimType,
    pub status: ClaimStatus,
    pub reason: String,
    #[serde(default)]
    pub refund_amount: Option<Decimal>,
    pub created_at: NaiveDateTime,
    pub item_count: u32,
    #[serde(default)]
    pub first_product_name: Option<String>,
    #[serde(default)]
    pub first_product_image_url: Option<String>,
    #[serde(default)]
    pub first_item_quantity: u32,
    #[serde(default)]
    pub first_item_price: Option<Decimal>,
}

/// One page of claim history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimPage {
    pub content: Vec<ClaimSummary>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub page_number: u32,
    pub page_size: u32,
}

/// Claimed order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimItem {
    pub id: ClaimItemId,
    pub order_item_id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub price_at_order: Decimal,
    pub subtotal: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Full claim (`GET /claims/{id}`, `POST /claims`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub id: ClaimId,
    pub order_id: OrderId,
    #[serde(default)]
    pub order_number: Option<String>,
    pub claim_type: ClaimType,
    pub status: ClaimStatus,
    pub reason: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub refund_amount: Option<Decimal>,
    #[serde(default)]
    pub refund_method: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub items: Vec<ClaimItem>,
}

/// Order line to include in a new claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimItemRequest {
    pub order_item_id: OrderItemId,
    pub quantity: u32,
}

/// Body of `POST /claims`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClaimRequest {
    pub order_id: OrderId,
    pub claim_type: ClaimType,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    pub items: Vec<ClaimItemRequest>,
}
