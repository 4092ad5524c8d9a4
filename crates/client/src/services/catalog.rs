//! Products and categories.

use stylehub_core::{CategoryItem, ProductDetail, ProductId, ProductPage, ProductQuery};
use tracing::instrument;

use crate::error::ApiError;
use crate::gateway::ApiClient;
use crate::services::with_query;

impl ApiClient {
    /// One page of products matching `query`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        self.get(&with_query("/products", query.to_pairs())).await
    }

    /// Product detail.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<ProductDetail, ApiError> {
        self.get(&format!("/products/{id}")).await
    }

    /// Category tree, cached.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn categories(&self) -> Result<Vec<CategoryItem>, ApiError> {
        self.get_cached("/categories").await
    }

    /// Public like count of a product.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn like_count(&self, id: ProductId) -> Result<u64, ApiError> {
        self.get(&format!("/products/{id}/like/count")).await
    }
}
