//! Server-side cart.

use futures::future::join_all;
use stylehub_core::{
    AddToCartRequest, CartItemId, CartResponse, LocalCartItem, UpdateCartItemRequest,
};
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::gateway::ApiClient;

impl ApiClient {
    /// The shopper's cart.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn cart(&self) -> Result<CartResponse, ApiError> {
        self.get("/cart").await
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<CartResponse, ApiError> {
        self.post("/cart", request).await
    }

    /// Change the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn update_cart_item(
        &self,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<CartResponse, ApiError> {
        self.put(&format!("/cart/{item_id}"), &UpdateCartItemRequest { quantity })
            .await
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn remove_cart_item(&self, item_id: CartItemId) -> Result<(), ApiError> {
        self.delete(&format!("/cart/{item_id}")).await
    }

    /// Copy a guest cart into the server cart after sign-in.
    ///
    /// Lines are posted concurrently and a failed line does not stop the
    /// others. Returns how many lines were merged.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn merge_local_cart(&self, items: &[LocalCartItem]) -> usize {
        let requests = items.iter().map(|item| async move {
            let request = AddToCartRequest::from(*item);
            let result: Result<CartResponse, ApiError> = self.post("/cart", &request).await;
            if let Err(e) = &result {
                warn!(product_id = %item.product_id, error = %e, "Failed to merge cart line");
            }
            result.is_ok()
        });

        let merged = join_all(requests).await.into_iter().filter(|ok| *ok).count();
        info!(merged, total = items.len(), "Merged guest cart");
        merged
    }
}
