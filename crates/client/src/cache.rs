//! Read-through cache for list endpoints.
//!
//! Entries hold the unwrapped `data` payload keyed by request path, so a
//! cached read and a fresh one decode the same way.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;
use tracing::debug;

/// Cache of GET payloads keyed by path (`/my/likes`, `/curations`, ...).
#[derive(Clone)]
pub struct QueryCache {
    inner: Cache<String, Arc<Value>>,
}

impl QueryCache {
    /// Create a cache holding at most `capacity` entries for `ttl` each.
    #[must_use]
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get(&self, path: &str) -> Option<Arc<Value>> {
        self.inner.get(path).await
    }

    pub async fn insert(&self, path: &str, data: Value) {
        self.inner.insert(path.to_string(), Arc::new(data)).await;
    }

    /// Drop one cached read so the next one hits the network.
    pub async fn invalidate(&self, path: &str) {
        debug!(path = %path, "Invalidating cached query");
        self.inner.invalidate(path).await;
    }

    /// Drop every cached read.
    pub async fn invalidate_all(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}
