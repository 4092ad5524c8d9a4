//! Curated sections and the liked-products list.
//!
//! Both carry aggregate like counts and are invalidated by
//! [`LikeCache::toggle`](crate::LikeCache::toggle).

use stylehub_core::{CurationResponse, LikedProduct};

use crate::error::ApiError;
use crate::gateway::ApiClient;
use crate::likes::{CURATIONS_PATH, MY_LIKES_PATH};

impl ApiClient {
    /// Curated home-page sections, cached.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn curations(&self) -> Result<Vec<CurationResponse>, ApiError> {
        self.get_cached(CURATIONS_PATH).await
    }

    /// Products the shopper has liked, cached. Empty when signed out.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn my_likes(&self) -> Result<Vec<LikedProduct>, ApiError> {
        if !self.session().is_authenticated() {
            return Ok(Vec::new());
        }
        self.get_cached(MY_LIKES_PATH).await
    }
}
