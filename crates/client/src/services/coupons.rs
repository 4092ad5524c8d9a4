//! Coupons.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use stylehub_core::{Coupon, CouponId, best_coupon};
use tracing::instrument;

use crate::error::ApiError;
use crate::gateway::ApiClient;

impl ApiClient {
    /// Every coupon issued to the shopper, whatever its status.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn coupons(&self) -> Result<Vec<Coupon>, ApiError> {
        self.get_cached("/coupons").await
    }

    /// Coupons the shopper can still use.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn available_coupons(&self) -> Result<Vec<Coupon>, ApiError> {
        self.get_cached("/coupons/available").await
    }

    /// Mark a coupon as used.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn use_coupon(&self, id: CouponId) -> Result<Coupon, ApiError> {
        let coupon = self
            .post(&format!("/coupons/{id}/use"), &serde_json::json!({}))
            .await?;
        self.invalidate("/coupons").await;
        self.invalidate("/coupons/available").await;
        Ok(coupon)
    }

    /// The available coupon with the largest discount on `price`, with that
    /// discount.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn best_available_coupon(
        &self,
        price: Decimal,
        now: NaiveDateTime,
    ) -> Result<Option<(Coupon, Decimal)>, ApiError> {
        let coupons = self.available_coupons().await?;
        Ok(best_coupon(&coupons, price, now).map(|c| (c.clone(), c.discount_for(price))))
    }
}
