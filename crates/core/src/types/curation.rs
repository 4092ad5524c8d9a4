//! Curated home-page sections.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CurationId, ProductId};

/// Product tile inside a curated section.
///
/// `like_count` is an aggregate, which is why curated sections are re-read
/// after the shopper toggles a like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurationProduct {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub brand_name: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub discount_rate: Option<u32>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub badge_text: Option<String>,
    #[serde(default)]
    pub shipping_info: Option<String>,
    #[serde(default)]
    pub like_count: u64,
}

/// Curated section (`GET /curations`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurationResponse {
    pub id: CurationId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub products: Vec<CurationProduct>,
}
