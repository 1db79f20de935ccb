use super::DirectoryStore;
use crate::domain::{Review, Store, User};
use crate::error::{DirectoryError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// In-memory storage implementation for development/testing
pub struct InMemoryStore {
    stores: Arc<Mutex<HashMap<Uuid, Store>>>,
    reviews: Arc<Mutex<HashMap<Uuid, Review>>>,
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            stores: Arc::new(Mutex::new(HashMap::new())),
            reviews: Arc::new(Mutex::new(HashMap::new())),
            users: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

/// Equirectangular approximation; good enough for city-scale radii.
fn distance_meters(from: [f64; 2], to: [f64; 2]) -> f64 {
    let mean_lat = ((from[1] + to[1]) / 2.0).to_radians();
    let x = (to[0] - from[0]).to_radians() * mean_lat.cos();
    let y = (to[1] - from[1]).to_radians();
    (x * x + y * y).sqrt() * EARTH_RADIUS_METERS
}

#[async_trait]
impl DirectoryStore for InMemoryStore {
    async fn create_store(&self, store: &mut Store) -> Result<()> {
        let mut stores = self.stores.lock().unwrap();
        // Uniqueness check and insert happen under the same lock; this is
        // the per-record atomicity the backend guarantees.
        if stores.values().any(|s| s.slug == store.slug) {
            return Err(DirectoryError::DuplicateSlug(store.slug.clone()));
        }

        let id = Uuid::new_v4();
        store.id = Some(id);
        stores.insert(id, store.clone());

        debug!("Created store: {} with slug {}", store.name, store.slug);
        Ok(())
    }

    async fn update_store(&self, store: &Store) -> Result<()> {
        let store_id = store.id.ok_or_else(|| {
            DirectoryError::validation("id", "cannot update a store without an id")
        })?;

        let mut stores = self.stores.lock().unwrap();
        if stores
            .values()
            .any(|s| s.slug == store.slug && s.id != Some(store_id))
        {
            return Err(DirectoryError::DuplicateSlug(store.slug.clone()));
        }
        stores.insert(store_id, store.clone());

        debug!("Updated store: {} with id {}", store.name, store_id);
        Ok(())
    }

    async fn get_store_by_id(&self, id: Uuid) -> Result<Option<Store>> {
        let stores = self.stores.lock().unwrap();
        Ok(stores.get(&id).cloned())
    }

    async fn get_store_by_slug(&self, slug: &str) -> Result<Option<Store>> {
        let stores = self.stores.lock().unwrap();
        let store = stores.values().find(|s| s.slug == slug).cloned();
        Ok(store)
    }

    async fn all_stores(&self, limit: Option<usize>, offset: Option<usize>) -> Result<Vec<Store>> {
        let stores = self.stores.lock().unwrap();
        let mut all: Vec<Store> = stores.values().cloned().collect();

        // Sort by creation time for consistent listing order
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.slug.cmp(&b.slug)));

        if let Some(offset) = offset {
            all = all.into_iter().skip(offset).collect();
        }
        if let Some(limit) = limit {
            all.truncate(limit);
        }
        Ok(all)
    }

    async fn stores_by_tag(&self, tag: &str) -> Result<Vec<Store>> {
        let stores = self.stores.lock().unwrap();
        let mut matching: Vec<Store> = stores
            .values()
            .filter(|s| s.tags.iter().any(|t| t == tag))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.slug.cmp(&b.slug)));
        Ok(matching)
    }

    async fn count_slugs_matching(&self, pattern: &str) -> Result<usize> {
        let matcher = Regex::new(pattern)
            .map_err(|e| DirectoryError::Config(format!("invalid slug pattern '{}': {}", pattern, e)))?;
        let stores = self.stores.lock().unwrap();
        let count = stores.values().filter(|s| matcher.is_match(&s.slug)).count();
        Ok(count)
    }

    async fn search_stores(&self, query: &str) -> Result<Vec<Store>> {
        let needle = query.to_lowercase();
        let stores = self.stores.lock().unwrap();
        let mut matching: Vec<Store> = stores
            .values()
            .filter(|s| {
                s.name.to_lowercase().contains(&needle)
                    || s.description
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.slug.cmp(&b.slug)));
        Ok(matching)
    }

    async fn stores_near(
        &self,
        longitude: f64,
        latitude: f64,
        radius_meters: f64,
        limit: usize,
    ) -> Result<Vec<Store>> {
        let origin = [longitude, latitude];
        let stores = self.stores.lock().unwrap();
        let mut within: Vec<(f64, Store)> = stores
            .values()
            .map(|s| (distance_meters(origin, s.location.coordinates), s.clone()))
            .filter(|(d, _)| *d <= radius_meters)
            .collect();
        within.sort_by(|a, b| a.0.total_cmp(&b.0));
        within.truncate(limit);
        Ok(within.into_iter().map(|(_, s)| s).collect())
    }

    async fn create_review(&self, review: &mut Review) -> Result<()> {
        let id = Uuid::new_v4();
        review.id = Some(id);

        let mut reviews = self.reviews.lock().unwrap();
        reviews.insert(id, review.clone());

        debug!("Created review for store {} with id {}", review.store_id, id);
        Ok(())
    }

    async fn reviews_for_stores(&self, store_ids: &[Uuid]) -> Result<Vec<Review>> {
        let reviews = self.reviews.lock().unwrap();
        let mut matching: Vec<Review> = reviews
            .values()
            .filter(|r| store_ids.contains(&r.store_id))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matching)
    }

    async fn create_user(&self, user: &mut User) -> Result<()> {
        let id = Uuid::new_v4();
        user.id = Some(id);

        let mut users = self.users.lock().unwrap();
        users.insert(id, user.clone());

        debug!("Created user: {} with id {}", user.name, id);
        Ok(())
    }

    async fn user_exists(&self, id: Uuid) -> Result<bool> {
        let users = self.users.lock().unwrap();
        Ok(users.contains_key(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;
    use chrono::Utc;

    fn store(name: &str, slug: &str, coordinates: [f64; 2]) -> Store {
        Store {
            id: None,
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            tags: vec![],
            location: Location {
                address: "123 Main St".to_string(),
                coordinates,
            },
            photo: None,
            author_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() {
        let storage = InMemoryStore::new();
        let mut first = store("Coffee Shop", "coffee-shop", [-122.3, 47.6]);
        storage.create_store(&mut first).await.unwrap();

        let mut second = store("Coffee Shop", "coffee-shop", [-122.3, 47.6]);
        let err = storage.create_store(&mut second).await.unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateSlug(s) if s == "coffee-shop"));

        // The second writer's record was not persisted
        assert_eq!(storage.all_stores(None, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_keeps_slug_uniqueness_across_other_records() {
        let storage = InMemoryStore::new();
        let mut first = store("A", "a", [0.0, 0.0]);
        let mut second = store("B", "b", [0.0, 0.0]);
        storage.create_store(&mut first).await.unwrap();
        storage.create_store(&mut second).await.unwrap();

        let mut renamed = second.clone();
        renamed.slug = "a".to_string();
        let err = storage.update_store(&renamed).await.unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateSlug(_)));

        // Re-saving a record under its own slug is fine
        storage.update_store(&second).await.unwrap();
    }

    #[tokio::test]
    async fn slug_pattern_count_is_case_insensitive() {
        let storage = InMemoryStore::new();
        for slug in ["coffee-shop", "Coffee-Shop-2", "coffee-shop-3", "coffee-house"] {
            let mut s = store(slug, slug, [0.0, 0.0]);
            storage.create_store(&mut s).await.unwrap();
        }

        let count = storage
            .count_slugs_matching("(?i)^coffee\\-shop(-[0-9]+)?$")
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn proximity_orders_by_distance_and_respects_radius() {
        let storage = InMemoryStore::new();
        // Roughly 0m, ~740m and ~7.4km east of the origin at this latitude
        let mut near = store("Near", "near", [-122.300, 47.6]);
        let mut mid = store("Mid", "mid", [-122.290, 47.6]);
        let mut far = store("Far", "far", [-122.200, 47.6]);
        storage.create_store(&mut near).await.unwrap();
        storage.create_store(&mut mid).await.unwrap();
        storage.create_store(&mut far).await.unwrap();

        let found = storage.stores_near(-122.300, 47.6, 2_000.0, 10).await.unwrap();
        let slugs: Vec<&str> = found.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["near", "mid"]);
    }

    #[tokio::test]
    async fn text_search_covers_name_and_description() {
        let storage = InMemoryStore::new();
        let mut by_name = store("Espresso Bar", "espresso-bar", [0.0, 0.0]);
        let mut by_desc = store("Corner Cafe", "corner-cafe", [0.0, 0.0]);
        by_desc.description = Some("Best espresso in town".to_string());
        let mut unrelated = store("Tea House", "tea-house", [0.0, 0.0]);
        storage.create_store(&mut by_name).await.unwrap();
        storage.create_store(&mut by_desc).await.unwrap();
        storage.create_store(&mut unrelated).await.unwrap();

        let found = storage.search_stores("espresso").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|s| s.slug != "tea-house"));
    }
}
