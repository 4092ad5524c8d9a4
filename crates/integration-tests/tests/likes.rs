//! Like-state cache against the mock backend.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use stylehub_client::{LikeCache, LikeSnapshot, Subscription, ToggleOutcome};
use stylehub_core::{LikeState, ProductId};
use stylehub_integration_tests::MockBackend;

const PRODUCT: i64 = 42;

fn snapshot(liked: bool, like_count: u64) -> LikeSnapshot {
    LikeSnapshot {
        liked,
        like_count,
        is_loaded: true,
    }
}

/// Record every snapshot of `product_id` a subscriber sees.
fn observe(cache: &LikeCache, product_id: ProductId) -> (Arc<Mutex<Vec<LikeSnapshot>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let reader = cache.clone();
    let sink = seen.clone();
    let subscription = cache.subscribe(move || {
        sink.lock().unwrap().push(reader.read(product_id, 0));
    });
    (seen, subscription)
}

#[tokio::test]
async fn test_bootstrap_loads_server_state() {
    let backend = MockBackend::start().await;
    backend.set_like(PRODUCT, LikeState::new(true, 12));
    let client = backend.signed_in_client();
    let cache = LikeCache::new(client.api.clone());
    let id = ProductId::new(PRODUCT);

    assert!(!cache.read(id, 12).is_loaded);
    assert!(cache.bootstrap_from_server(id).await);
    assert_eq!(cache.read(id, 0), snapshot(true, 12));
}

#[tokio::test]
async fn test_toggle_is_optimistic_then_confirmed() {
    let backend = MockBackend::start().await;
    backend.set_like(PRODUCT, LikeState::new(false, 5));
    let client = backend.signed_in_client();
    let cache = LikeCache::new(client.api.clone());
    let id = ProductId::new(PRODUCT);
    cache.bootstrap_from_server(id).await;

    let (seen, _subscription) = observe(&cache, id);
    let outcome = cache.toggle(id, 0).await;

    assert_eq!(outcome, ToggleOutcome::Confirmed(LikeState::new(true, 6)));
    assert_eq!(cache.read(id, 0), snapshot(true, 6));
    assert_eq!(backend.like(PRODUCT), Some(LikeState::new(true, 6)));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.first(), Some(&snapshot(true, 6)));
    assert_eq!(seen.last(), Some(&snapshot(true, 6)));
}

#[tokio::test]
async fn test_failed_toggle_rolls_back() {
    let backend = MockBackend::start().await;
    backend.set_like(PRODUCT, LikeState::new(false, 5));
    let client = backend.signed_in_client();
    let cache = LikeCache::new(client.api.clone());
    let id = ProductId::new(PRODUCT);
    cache.bootstrap_from_server(id).await;
    backend.fail_likes(true);

    let (seen, _subscription) = observe(&cache, id);
    let outcome = cache.toggle(id, 0).await;

    assert_eq!(outcome, ToggleOutcome::RolledBack);
    assert_eq!(cache.read(id, 0), snapshot(false, 5));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![snapshot(true, 6), snapshot(false, 5)]
    );
    assert!(client.api.session().is_authenticated());
}

#[tokio::test]
async fn test_signed_out_toggle_is_a_no_op() {
    let backend = MockBackend::start().await;
    let client = backend.client();
    let cache = LikeCache::new(client.api.clone());
    let id = ProductId::new(PRODUCT);

    let version = cache.snapshot_version();
    assert_eq!(cache.toggle(id, 3).await, ToggleOutcome::Skipped);
    assert!(!cache.bootstrap_from_server(id).await);

    assert_eq!(cache.snapshot_version(), version);
    assert_eq!(backend.hits("/products/42/like"), 0);
    assert_eq!(backend.hits("/products/42/like/status"), 0);
    assert_eq!(
        cache.read(id, 3),
        LikeSnapshot {
            liked: false,
            like_count: 3,
            is_loaded: false,
        }
    );
}

#[tokio::test]
async fn test_toggle_without_bootstrap_uses_fallback_count() {
    let backend = MockBackend::start().await;
    let client = backend.signed_in_client();
    let cache = LikeCache::new(client.api.clone());
    let id = ProductId::new(7);

    let (seen, _subscription) = observe(&cache, id);
    let outcome = cache.toggle(id, 10).await;

    // Optimistic state is built on the caller's count, then replaced by the
    // server's.
    assert_eq!(seen.lock().unwrap().first(), Some(&snapshot(true, 11)));
    assert_eq!(outcome, ToggleOutcome::Confirmed(LikeState::new(true, 1)));
    assert_eq!(cache.read(id, 10), snapshot(true, 1));
}

#[tokio::test]
async fn test_confirmed_toggle_invalidates_liked_products() {
    let backend = MockBackend::start().await;
    backend.set_like(PRODUCT, LikeState::new(false, 0));
    let client = backend.signed_in_client();
    let cache = LikeCache::new(client.api.clone());
    let id = ProductId::new(PRODUCT);

    assert!(client.api.my_likes().await.unwrap().is_empty());
    assert!(client.api.my_likes().await.unwrap().is_empty());
    client.api.curations().await.unwrap();
    assert_eq!(backend.hits("/my/likes"), 1);
    assert_eq!(backend.hits("/curations"), 1);

    cache.toggle(id, 0).await;

    let likes = client.api.my_likes().await.unwrap();
    assert_eq!(likes.len(), 1);
    assert_eq!(likes[0].product_id, id);
    client.api.curations().await.unwrap();
    assert_eq!(backend.hits("/my/likes"), 2);
    assert_eq!(backend.hits("/curations"), 2);
}

#[tokio::test]
async fn test_toggle_recovers_expired_session() {
    let backend = MockBackend::start().await;
    backend.set_like(PRODUCT, LikeState::new(false, 2));
    let client = backend.signed_in_client();
    let cache = LikeCache::new(client.api.clone());
    backend.expire_access_token();

    let outcome = cache.toggle(ProductId::new(PRODUCT), 2).await;

    assert_eq!(outcome, ToggleOutcome::Confirmed(LikeState::new(true, 3)));
    assert_eq!(backend.refresh_calls(), 1);
    assert!(client.redirect.paths().is_empty());
}

#[tokio::test]
async fn test_overlapping_failed_toggles_restore_server_state() {
    let backend = MockBackend::start().await;
    backend.set_like(PRODUCT, LikeState::new(false, 5));
    let client = backend.signed_in_client();
    let cache = LikeCache::new(client.api.clone());
    let id = ProductId::new(PRODUCT);
    cache.bootstrap_from_server(id).await;
    backend.fail_likes(true);

    let (first, second) = tokio::join!(cache.toggle(id, 0), cache.toggle(id, 0));

    let outcomes = [first, second];
    assert!(outcomes.contains(&ToggleOutcome::RolledBack));
    assert!(outcomes.contains(&ToggleOutcome::Superseded));
    assert_eq!(cache.read(id, 0), snapshot(false, 5));
    assert_eq!(backend.like(PRODUCT), Some(LikeState::new(false, 5)));
}

#[tokio::test]
async fn test_late_answer_to_earlier_toggle_is_discarded() {
    let backend = MockBackend::start().await;
    backend.set_like(PRODUCT, LikeState::new(false, 5));
    let client = backend.signed_in_client();
    let cache = LikeCache::new(client.api.clone());
    let id = ProductId::new(PRODUCT);
    cache.bootstrap_from_server(id).await;

    backend.delay_next_toggle(Duration::from_millis(300));
    let earlier = tokio::spawn({
        let cache = cache.clone();
        async move { cache.toggle(id, 0).await }
    });
    backend.wait_for_hits("/products/42/like", 1).await;

    let later = cache.toggle(id, 0).await;
    assert_eq!(later, ToggleOutcome::Confirmed(LikeState::new(false, 5)));
    assert_eq!(earlier.await.unwrap(), ToggleOutcome::Superseded);

    assert_eq!(cache.read(id, 0), snapshot(false, 5));
    assert_eq!(backend.like(PRODUCT), Some(LikeState::new(false, 5)));
}

#[tokio::test]
async fn test_status_fetch_does_not_overtake_toggle() {
    let backend = MockBackend::start().await;
    backend.set_like(PRODUCT, LikeState::new(false, 5));
    let client = backend.signed_in_client();
    let cache = LikeCache::new(client.api.clone());
    let id = ProductId::new(PRODUCT);

    backend.delay_next_toggle(Duration::from_millis(300));
    let toggle = tokio::spawn({
        let cache = cache.clone();
        async move { cache.toggle(id, 5).await }
    });
    backend.wait_for_hits("/products/42/like", 1).await;

    assert!(!cache.bootstrap_from_server(id).await);
    assert_eq!(backend.hits("/products/42/like/status"), 0);

    assert_eq!(
        toggle.await.unwrap(),
        ToggleOutcome::Confirmed(LikeState::new(true, 6))
    );
    assert_eq!(cache.read(id, 5), snapshot(true, 6));
}

#[tokio::test]
async fn test_failed_status_fetch_ends_loading() {
    let backend = MockBackend::start().await;
    backend.set_like(PRODUCT, LikeState::new(true, 9));
    backend.fail_status(true);
    let client = backend.signed_in_client();
    let cache = LikeCache::new(client.api.clone());
    let id = ProductId::new(PRODUCT);

    assert!(!cache.bootstrap_from_server(id).await);

    assert_eq!(backend.hits("/products/42/like/status"), 1);
    assert_eq!(
        cache.read(id, 4),
        LikeSnapshot {
            liked: false,
            like_count: 4,
            is_loaded: true,
        }
    );
    assert!(client.api.session().is_authenticated());
}
