//! Saved shipping addresses.

use stylehub_core::{AddressId, AddressResponse, CreateAddressRequest};
use tracing::instrument;

use crate::error::ApiError;
use crate::gateway::ApiClient;

impl ApiClient {
    /// Saved addresses.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn addresses(&self) -> Result<Vec<AddressResponse>, ApiError> {
        self.get("/addresses").await
    }

    /// Save a new address.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self, request))]
    pub async fn create_address(
        &self,
        request: &CreateAddressRequest,
    ) -> Result<AddressResponse, ApiError> {
        self.post("/addresses", request).await
    }

    /// Replace a saved address.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self, request))]
    pub async fn update_address(
        &self,
        id: AddressId,
        request: &CreateAddressRequest,
    ) -> Result<AddressResponse, ApiError> {
        self.put(&format!("/addresses/{id}"), request).await
    }

    /// Delete a saved address.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn delete_address(&self, id: AddressId) -> Result<(), ApiError> {
        self.delete(&format!("/addresses/{id}")).await
    }

    /// Make an address the default for checkout.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn set_default_address(&self, id: AddressId) -> Result<AddressResponse, ApiError> {
        self.patch(&format!("/addresses/{id}/default"), &serde_json::json!({}))
            .await
    }
}
