//! Product like state.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Liked flag and aggregate like count for one product.
///
/// This is both the payload of `GET /products/{id}/like/status` and
/// `POST /products/{id}/like`, and the value held per product by the
/// client's like-state cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub liked: bool,
    pub like_count: u64,
}

impl LikeState {
    /// Create a like state.
    #[must_use]
    pub const fn new(liked: bool, like_count: u64) -> Self {
        Self { liked, like_count }
    }

    /// The state after the current shopper flips their like.
    ///
    /// The count never goes below zero.
    #[must_use]
    pub const fn toggled(self) -> Self {
        if self.liked {
            Self::new(false, self.like_count.saturating_sub(1))
        } else {
            Self::new(true, self.like_count.saturating_add(1))
        }
    }
}

/// Entry of `GET /my/likes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedProduct {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Decimal,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub liked_at: NaiveDateTime,
}
