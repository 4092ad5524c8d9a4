//! Customer inquiries.

use stylehub_core::{CreateInquiryRequest, Inquiry, InquiryPage};
use tracing::instrument;

use crate::error::ApiError;
use crate::gateway::ApiClient;

impl ApiClient {
    /// The shopper's inquiries.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn inquiries(&self) -> Result<InquiryPage, ApiError> {
        self.get("/inquiries").await
    }

    /// Submit an inquiry.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    #[instrument(skip(self, request), fields(category = ?request.category))]
    pub async fn create_inquiry(&self, request: &CreateInquiryRequest) -> Result<Inquiry, ApiError> {
        self.post("/inquiries", request).await
    }
}
