use crate::domain::{Review, Store, StoreWithReviews};
use crate::error::Result;
use crate::storage::DirectoryStore;
use std::collections::HashMap;
use uuid::Uuid;

/// Attach each store's reviews in one batched fetch. The catalog applies
/// this after every raw read, so callers never see a store without its
/// reviews populated.
pub async fn attach_reviews(
    storage: &dyn DirectoryStore,
    stores: Vec<Store>,
) -> Result<Vec<StoreWithReviews>> {
    let ids: Vec<Uuid> = stores.iter().filter_map(|s| s.id).collect();
    let reviews = storage.reviews_for_stores(&ids).await?;
    Ok(group_reviews(stores, reviews))
}

/// Single-record variant for the create/get paths: same batched storage
/// call, same output shape.
pub async fn attach_reviews_one(
    storage: &dyn DirectoryStore,
    store: Store,
) -> Result<StoreWithReviews> {
    let ids: Vec<Uuid> = store.id.into_iter().collect();
    let reviews = storage.reviews_for_stores(&ids).await?;
    Ok(StoreWithReviews { store, reviews })
}

/// Group reviews by store id and attach them, preserving store order.
/// Stores with no reviews get an empty vec, never a missing field.
pub fn group_reviews(stores: Vec<Store>, reviews: Vec<Review>) -> Vec<StoreWithReviews> {
    let mut by_store: HashMap<Uuid, Vec<Review>> = HashMap::new();
    for review in reviews {
        by_store.entry(review.store_id).or_default().push(review);
    }

    stores
        .into_iter()
        .map(|store| {
            let reviews = store
                .id
                .and_then(|id| by_store.remove(&id))
                .unwrap_or_default();
            StoreWithReviews { store, reviews }
        })
        .collect()
}
