//! Orders.

use stylehub_core::{CreateOrderRequest, OrderId, OrderPage, OrderResponse};
use tracing::instrument;

use crate::error::ApiError;
use crate::gateway::ApiClient;
use crate::services::page_query;

impl ApiClient {
    /// One page of order history, newest first.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn orders(&self, page: u32, size: u32) -> Result<OrderPage, ApiError> {
        self.get(&page_query("/orders", page, size)).await
    }

    /// Order detail.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn order(&self, id: OrderId) -> Result<OrderResponse, ApiError> {
        self.get(&format!("/orders/{id}")).await
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderResponse, ApiError> {
        self.post("/orders", request).await
    }

    /// Cancel an order that has not shipped.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<(), ApiError> {
        self.delete(&format!("/orders/{id}")).await
    }
}
