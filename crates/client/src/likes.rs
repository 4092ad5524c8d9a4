//! Per-product like state shared by every view of a product.
//!
//! [`LikeCache`] keeps one `{liked, likeCount}` entry per product for the
//! whole process. Toggles are applied optimistically and reconciled with
//! the server's answer, or rolled back when the call fails. Subscribers are
//! notified after every change to any entry and re-read the keys they care
//! about.
//!
//! Each entry carries a version that every optimistic write bumps, a count
//! of toggles in flight and the last server-confirmed state. Answers to
//! older toggles never replace a newer confirmation, and status fetches are
//! neither issued nor applied while a toggle is in flight, so responses
//! arriving out of order cannot overwrite newer state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde_json::json;
use stylehub_core::{LikeState, ProductId};
use tracing::{debug, instrument, warn};

use crate::gateway::ApiClient;

/// Path of the liked-products list invalidated after a toggle.
pub const MY_LIKES_PATH: &str = "/my/likes";

/// Path of the curated sections invalidated after a toggle.
pub const CURATIONS_PATH: &str = "/curations";

/// What a view renders for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeSnapshot {
    pub liked: bool,
    pub like_count: u64,
    /// The entry is populated, or a status fetch was attempted.
    pub is_loaded: bool,
}

/// How a [`LikeCache::toggle`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The shopper is not signed in; nothing changed.
    Skipped,
    /// The server confirmed the toggle with this state.
    Confirmed(LikeState),
    /// The server call failed and the pre-toggle state was restored.
    RolledBack,
    /// A newer write landed first; this toggle's answer was discarded.
    Superseded,
}

#[derive(Debug, Default)]
struct Entry {
    /// What views render.
    state: Option<LikeState>,
    /// Last server-authoritative state. `state` settles back here once no
    /// toggle is in flight.
    confirmed: Option<LikeState>,
    /// Ticket of the toggle whose answer is in `confirmed`.
    confirmed_ticket: u64,
    /// Bumped by every optimistic write; doubles as the toggle ticket.
    version: u64,
    /// Toggles still waiting for the server.
    pending: u32,
    attempted: bool,
}

impl Entry {
    /// Apply the optimistic flip and return the toggle's ticket.
    fn begin_toggle(&mut self, fallback_count: u64) -> u64 {
        if self.pending == 0 {
            self.confirmed = self.state;
            self.confirmed_ticket = self.version;
        }
        let base = self.state.unwrap_or(LikeState::new(false, fallback_count));
        self.state = Some(base.toggled());
        self.version += 1;
        self.pending += 1;
        self.version
    }

    /// Record the server's answer to toggle `ticket` (`None` on failure).
    ///
    /// Answers to older toggles never replace a newer confirmation. When
    /// the last in-flight toggle resolves, `state` returns to the newest
    /// confirmed value, which is the pre-toggle value if every call failed.
    fn finish_toggle(&mut self, ticket: u64, answer: Option<LikeState>) -> ToggleOutcome {
        self.pending = self.pending.saturating_sub(1);

        if let Some(confirmed) = answer {
            if ticket > self.confirmed_ticket {
                self.confirmed = Some(confirmed);
                self.confirmed_ticket = ticket;
            }
            if ticket == self.version {
                self.state = Some(confirmed);
            }
        }
        if self.pending == 0 {
            self.state = self.confirmed;
        }

        match answer {
            Some(confirmed)
                if self.confirmed_ticket == ticket && self.state == Some(confirmed) =>
            {
                ToggleOutcome::Confirmed(confirmed)
            }
            None if self.pending == 0 => ToggleOutcome::RolledBack,
            _ => ToggleOutcome::Superseded,
        }
    }

    /// Apply a status fetched while the entry was at `version`. Refused if
    /// a toggle started since or is still in flight.
    fn apply_status(&mut self, version: u64, status: LikeState) -> bool {
        self.attempted = true;
        if self.pending > 0 || self.version != version {
            return false;
        }
        self.state = Some(status);
        self.confirmed = Some(status);
        true
    }
}

type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    by_id: HashMap<u64, Listener>,
}

/// Process-wide like-state cache.
#[derive(Clone)]
pub struct LikeCache {
    inner: Arc<LikeCacheInner>,
}

struct LikeCacheInner {
    api: ApiClient,
    entries: Mutex<HashMap<ProductId, Entry>>,
    listeners: Arc<Mutex<Listeners>>,
    snapshot_version: AtomicU64,
}

/// Keeps a listener registered; unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    listeners: Weak<Mutex<Listeners>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .by_id
                .remove(&self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl LikeCache {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(LikeCacheInner {
                api,
                entries: Mutex::new(HashMap::new()),
                listeners: Arc::new(Mutex::new(Listeners::default())),
                snapshot_version: AtomicU64::new(0),
            }),
        }
    }

    /// Current state of `product_id`, or `{false, fallback_count}` when the
    /// product has never been populated.
    #[must_use]
    pub fn read(&self, product_id: ProductId, fallback_count: u64) -> LikeSnapshot {
        let entries = self.entries();
        let entry = entries.get(&product_id);

        match entry.and_then(|e| e.state) {
            Some(state) => LikeSnapshot {
                liked: state.liked,
                like_count: state.like_count,
                is_loaded: true,
            },
            None => LikeSnapshot {
                liked: false,
                like_count: fallback_count,
                is_loaded: entry.is_some_and(|e| e.attempted),
            },
        }
    }

    /// Call `listener` after every change to any entry.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        let mut listeners = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.by_id.insert(id, Arc::new(listener));

        Subscription {
            listeners: Arc::downgrade(&self.inner.listeners),
            id,
        }
    }

    /// Counter bumped on every notification.
    #[must_use]
    pub fn snapshot_version(&self) -> u64 {
        self.inner.snapshot_version.load(Ordering::Acquire)
    }

    /// Flip the shopper's like on `product_id`.
    ///
    /// The flipped state is visible to subscribers before the server is
    /// called. On success the server's `{liked, likeCount}` replaces it and
    /// the liked-products list and curated sections are invalidated; on
    /// failure the exact pre-toggle entry is restored. Signed-out shoppers
    /// get [`ToggleOutcome::Skipped`] with no change and no request.
    ///
    /// Overlapping toggles on one product each flip the latest optimistic
    /// state. When the last of them resolves the entry settles on the newest
    /// server answer, or on the state before the first of them if all failed.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn toggle(&self, product_id: ProductId, fallback_count: u64) -> ToggleOutcome {
        if !self.inner.api.session().is_authenticated() {
            debug!("Not signed in, ignoring like toggle");
            return ToggleOutcome::Skipped;
        }

        let ticket = self.entries().entry(product_id).or_default().begin_toggle(fallback_count);
        self.notify();

        let result = self
            .inner
            .api
            .post::<LikeState, _>(&format!("/products/{product_id}/like"), &json!({}))
            .await;

        let answer = match result {
            Ok(confirmed) => Some(confirmed),
            Err(e) => {
                warn!(error = %e, "Like toggle failed");
                None
            }
        };

        let outcome = self
            .entries()
            .entry(product_id)
            .or_default()
            .finish_toggle(ticket, answer);
        self.notify();

        if answer.is_some() {
            self.inner.api.invalidate(MY_LIKES_PATH).await;
            self.inner.api.invalidate(CURATIONS_PATH).await;
        }
        if outcome == ToggleOutcome::Superseded {
            debug!("Toggle answer superseded by a newer toggle");
        }
        outcome
    }

    /// Populate `product_id` from `GET /products/{id}/like/status`.
    ///
    /// Returns whether the entry was populated. A failed fetch leaves the
    /// entry empty but marks it attempted, which ends its loading state.
    /// Signed-out shoppers are never fetched for, and nothing is fetched
    /// while a toggle on the product is in flight.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn bootstrap_from_server(&self, product_id: ProductId) -> bool {
        if !self.inner.api.session().is_authenticated() {
            return false;
        }

        let version = {
            let mut entries = self.entries();
            let entry = entries.entry(product_id).or_default();
            if entry.pending > 0 {
                debug!("Toggle in flight, skipping like status fetch");
                return false;
            }
            entry.version
        };

        let result = self
            .inner
            .api
            .get::<LikeState>(&format!("/products/{product_id}/like/status"))
            .await;

        match result {
            Ok(status) => {
                let applied = self
                    .entries()
                    .entry(product_id)
                    .or_default()
                    .apply_status(version, status);
                if !applied {
                    debug!("Discarding like status overtaken by a toggle");
                }
                self.notify();
                applied
            }
            Err(e) => {
                debug!(error = %e, "Like status fetch failed");
                self.mark_attempted(product_id);
                false
            }
        }
    }

    fn mark_attempted(&self, product_id: ProductId) {
        let changed = {
            let mut entries = self.entries();
            let entry = entries.entry(product_id).or_default();
            !std::mem::replace(&mut entry.attempted, true)
        };
        if changed {
            self.notify();
        }
    }

    fn notify(&self) {
        self.inner.snapshot_version.fetch_add(1, Ordering::AcqRel);

        // Listeners run outside the lock so they may read or subscribe.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_id
            .values()
            .cloned()
            .collect();
        for listener in listeners {
            listener();
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<ProductId, Entry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for LikeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LikeCache")
            .field("entries", &self.entries().len())
            .field("snapshot_version", &self.snapshot_version())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use url::Url;

    use super::*;
    use crate::config::ClientConfig;
    use crate::redirect::LogRedirect;
    use crate::session::SessionStore;
    use crate::storage::MemoryStore;

    // Nothing listens on port 9; any request fails fast.
    fn signed_out_cache() -> LikeCache {
        let config = ClientConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        let session = SessionStore::open(Arc::new(MemoryStore::new()));
        let api = ApiClient::new(&config, session, Arc::new(LogRedirect)).unwrap();
        LikeCache::new(api)
    }

    #[test]
    fn test_read_falls_back_when_unpopulated() {
        let cache = signed_out_cache();
        assert_eq!(
            cache.read(ProductId::new(1), 12),
            LikeSnapshot {
                liked: false,
                like_count: 12,
                is_loaded: false,
            }
        );
    }

    #[tokio::test]
    async fn test_toggle_is_noop_when_signed_out() {
        let cache = signed_out_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let _sub = cache.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let outcome = cache.toggle(ProductId::new(1), 5).await;

        assert_eq!(outcome, ToggleOutcome::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(cache.snapshot_version(), 0);
        assert!(!cache.read(ProductId::new(1), 5).is_loaded);
    }

    #[tokio::test]
    async fn test_bootstrap_skipped_when_signed_out() {
        let cache = signed_out_cache();
        assert!(!cache.bootstrap_from_server(ProductId::new(1)).await);
        assert_eq!(cache.snapshot_version(), 0);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let cache = signed_out_cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let sub = cache.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        cache.notify();
        drop(sub);
        cache.notify();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.snapshot_version(), 2);
    }

    #[test]
    fn test_single_toggle_confirms_or_rolls_back() {
        let mut entry = Entry::default();
        let ticket = entry.begin_toggle(5);
        assert_eq!(entry.state, Some(LikeState::new(true, 6)));
        assert_eq!(
            entry.finish_toggle(ticket, Some(LikeState::new(true, 9))),
            ToggleOutcome::Confirmed(LikeState::new(true, 9))
        );
        assert_eq!(entry.state, Some(LikeState::new(true, 9)));

        let ticket = entry.begin_toggle(0);
        assert_eq!(entry.finish_toggle(ticket, None), ToggleOutcome::RolledBack);
        assert_eq!(entry.state, Some(LikeState::new(true, 9)));
    }

    #[test]
    fn test_failed_toggle_of_unpopulated_entry_restores_empty() {
        let mut entry = Entry::default();
        let ticket = entry.begin_toggle(3);
        assert_eq!(entry.finish_toggle(ticket, None), ToggleOutcome::RolledBack);
        assert_eq!(entry.state, None);
    }

    #[test]
    fn test_overlapping_failures_restore_original_state() {
        for older_fails_first in [true, false] {
            let mut entry = Entry {
                state: Some(LikeState::new(false, 5)),
                confirmed: Some(LikeState::new(false, 5)),
                ..Entry::default()
            };
            let older = entry.begin_toggle(0);
            let newer = entry.begin_toggle(0);

            let (early, late) = if older_fails_first {
                (older, newer)
            } else {
                (newer, older)
            };
            assert_eq!(entry.finish_toggle(early, None), ToggleOutcome::Superseded);
            assert_eq!(entry.finish_toggle(late, None), ToggleOutcome::RolledBack);
            assert_eq!(entry.state, Some(LikeState::new(false, 5)));
        }
    }

    #[test]
    fn test_late_answer_to_older_toggle_is_discarded() {
        let mut entry = Entry {
            state: Some(LikeState::new(false, 5)),
            confirmed: Some(LikeState::new(false, 5)),
            ..Entry::default()
        };
        let first = entry.begin_toggle(0);
        let second = entry.begin_toggle(0);

        assert_eq!(
            entry.finish_toggle(second, Some(LikeState::new(false, 5))),
            ToggleOutcome::Confirmed(LikeState::new(false, 5))
        );
        assert_eq!(
            entry.finish_toggle(first, Some(LikeState::new(true, 6))),
            ToggleOutcome::Superseded
        );
        assert_eq!(entry.state, Some(LikeState::new(false, 5)));
    }

    #[test]
    fn test_older_confirmation_then_newer_failure_settles_on_confirmation() {
        let mut entry = Entry::default();
        let first = entry.begin_toggle(5);
        let second = entry.begin_toggle(5);

        assert_eq!(
            entry.finish_toggle(first, Some(LikeState::new(true, 6))),
            ToggleOutcome::Superseded
        );
        assert_eq!(entry.finish_toggle(second, None), ToggleOutcome::RolledBack);
        assert_eq!(entry.state, Some(LikeState::new(true, 6)));
    }

    #[test]
    fn test_status_is_refused_during_toggle() {
        let mut entry = Entry::default();
        let version = entry.version;
        let ticket = entry.begin_toggle(5);

        assert!(!entry.apply_status(version, LikeState::new(false, 5)));
        assert!(!entry.apply_status(entry.version, LikeState::new(false, 5)));
        assert_eq!(
            entry.finish_toggle(ticket, Some(LikeState::new(true, 6))),
            ToggleOutcome::Confirmed(LikeState::new(true, 6))
        );
        assert!(entry.attempted);
        assert_eq!(entry.state, Some(LikeState::new(true, 6)));
    }

    #[test]
    fn test_status_applies_when_idle() {
        let mut entry = Entry::default();
        assert!(entry.apply_status(0, LikeState::new(true, 12)));
        assert_eq!(entry.state, Some(LikeState::new(true, 12)));
        assert_eq!(entry.confirmed, Some(LikeState::new(true, 12)));
    }

    #[test]
    fn test_mark_attempted_ends_loading_once() {
        let cache = signed_out_cache();
        let id = ProductId::new(4);

        cache.mark_attempted(id);
        cache.mark_attempted(id);

        let snapshot = cache.read(id, 7);
        assert!(snapshot.is_loaded);
        assert_eq!(snapshot.like_count, 7);
        assert_eq!(cache.snapshot_version(), 1);
    }
}
