//! Cancel and return claims.

use stylehub_core::{ClaimId, ClaimPage, ClaimResponse, CreateClaimRequest};
use tracing::instrument;

use crate::error::ApiError;
use crate::gateway::ApiClient;
use crate::services::page_query;

impl ApiClient {
    /// One page of claim history.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn claims(&self, page: u32, size: u32) -> Result<ClaimPage, ApiError> {
        self.get(&page_query("/claims", page, size)).await
    }

    /// Claim detail.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn claim(&self, id: ClaimId) -> Result<ClaimResponse, ApiError> {
        self.get(&format!("/claims/{id}")).await
    }

    /// File a cancel or return claim.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self, request), fields(order_id = %request.order_id, claim_type = ?request.claim_type))]
    pub async fn create_claim(&self, request: &CreateClaimRequest) -> Result<ClaimResponse, ApiError> {
        self.post("/claims", request).await
    }

    /// Withdraw a claim that is still being processed.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self))]
    pub async fn withdraw_claim(&self, id: ClaimId) -> Result<(), ApiError> {
        self.delete(&format!("/claims/{id}")).await
    }
}
