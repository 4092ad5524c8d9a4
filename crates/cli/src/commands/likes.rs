//! Like commands.

use stylehub_client::{ApiClient, ApiError, LikeCache, ToggleOutcome};
use stylehub_core::{ProductId, format_won};

use super::emit;

/// Show whether the shopper likes `id`, and its like count.
///
/// Signed-out shoppers only see the public count.
pub async fn status(api: &ApiClient, id: ProductId) -> Result<(), ApiError> {
    if !api.session().is_authenticated() {
        let count = api.like_count(id).await?;
        emit(format_args!("product {id}: {count} likes"));
        return Ok(());
    }

    let cache = LikeCache::new(api.clone());
    if !cache.bootstrap_from_server(id).await {
        emit(format_args!("product {id}: like status unavailable"));
        return Ok(());
    }
    let snapshot = cache.read(id, 0);
    emit(format_args!(
        "product {id}: {} ({} likes)",
        if snapshot.liked { "liked" } else { "not liked" },
        snapshot.like_count
    ));
    Ok(())
}

/// Flip the shopper's like on `id`.
pub async fn toggle(api: &ApiClient, id: ProductId, fallback_count: u64) {
    let cache = LikeCache::new(api.clone());
    let observer = cache.clone();
    let _subscription = cache.subscribe(move || {
        let snapshot = observer.read(id, fallback_count);
        tracing::debug!(
            liked = snapshot.liked,
            like_count = snapshot.like_count,
            "Like state changed"
        );
    });

    cache.bootstrap_from_server(id).await;
    match cache.toggle(id, fallback_count).await {
        ToggleOutcome::Skipped => emit("Not signed in"),
        ToggleOutcome::Confirmed(state) => emit(format_args!(
            "product {id}: {} ({} likes)",
            if state.liked { "liked" } else { "unliked" },
            state.like_count
        )),
        ToggleOutcome::RolledBack => emit("Could not update like, nothing changed"),
        ToggleOutcome::Superseded => {
            emit("Like changed concurrently, run `stylehub like status` to see it");
        }
    }
}

/// List liked products.
pub async fn list(api: &ApiClient) -> Result<(), ApiError> {
    let likes = api.my_likes().await?;
    if likes.is_empty() {
        emit("No liked products");
    }
    for like in likes {
        emit(format_args!(
            "{:>8}  {}  {}",
            like.product_id,
            like.product_name,
            format_won(like.price)
        ));
    }
    Ok(())
}
