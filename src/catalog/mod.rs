pub mod materialize;
pub mod reports;
pub mod slugs;

use crate::config::Config;
use crate::domain::{
    Review, Store, StoreDraft, StoreQuery, StoreSummary, StoreWithReviews, TagCount,
};
use crate::error::{DirectoryError, Result};
use crate::storage::DirectoryStore;
use chrono::Utc;
use reports::Reports;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Façade over the store directory: create/read operations, slug
/// assignment, review materialization and the two reports. Storage is
/// injected; there is no global registry.
pub struct CatalogService {
    storage: Arc<dyn DirectoryStore>,
    config: Config,
}

impl CatalogService {
    pub fn new(storage: Arc<dyn DirectoryStore>) -> Self {
        Self::with_config(storage, Config::default())
    }

    pub fn with_config(storage: Arc<dyn DirectoryStore>, config: Config) -> Self {
        Self { storage, config }
    }

    /// Validates the draft, derives a unique slug and persists the store.
    /// A concurrent creation of the same name can produce the same slug;
    /// the loser surfaces `DuplicateSlug` and the caller retries.
    pub async fn create_store(&self, draft: StoreDraft) -> Result<StoreWithReviews> {
        validate_draft(&draft)?;
        self.check_author(draft.author_id).await?;

        let slug = slugs::assign(self.storage.as_ref(), &draft.name).await?;
        let mut store = Store {
            id: None,
            name: draft.name.trim().to_string(),
            slug,
            description: trimmed(draft.description),
            tags: draft.tags,
            location: draft.location,
            photo: draft.photo,
            author_id: draft.author_id,
            created_at: Utc::now(),
        };
        self.storage.create_store(&mut store).await?;

        info!("Created store '{}' with slug '{}'", store.name, store.slug);
        self.materialize_one(store).await
    }

    /// Replaces a store's editable fields. The slug is recomputed only
    /// when the proposed name differs from the stored one; re-saving an
    /// unchanged name never touches it. Ownership is fixed for the
    /// store's lifetime, so a draft naming a different author is rejected.
    pub async fn update_store(&self, id: Uuid, draft: StoreDraft) -> Result<StoreWithReviews> {
        validate_draft(&draft)?;

        let existing = self
            .storage
            .get_store_by_id(id)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))?;
        if draft.author_id != existing.author_id {
            return Err(DirectoryError::validation(
                "author_id",
                "store ownership cannot be transferred",
            ));
        }

        let proposed_name = draft.name.trim().to_string();
        let name_changed = proposed_name != existing.name;
        let slug = if name_changed {
            slugs::assign(self.storage.as_ref(), &proposed_name).await?
        } else {
            existing.slug.clone()
        };
        debug!(
            "Updating store {}: name_changed={}, slug '{}'",
            id, name_changed, slug
        );

        let store = Store {
            id: Some(id),
            name: proposed_name,
            slug,
            description: trimmed(draft.description),
            tags: draft.tags,
            location: draft.location,
            photo: draft.photo,
            author_id: existing.author_id,
            created_at: existing.created_at,
        };
        self.storage.update_store(&store).await?;
        self.materialize_one(store).await
    }

    /// Single-store read by slug. Absent slugs are a normal `NotFound`
    /// outcome, not a crash path.
    pub async fn get_store(&self, slug: &str) -> Result<StoreWithReviews> {
        let store = self
            .storage
            .get_store_by_slug(slug)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(slug.to_string()))?;
        self.materialize_one(store).await
    }

    pub async fn list_stores(&self, query: StoreQuery) -> Result<Vec<StoreWithReviews>> {
        let stores = match &query.tag {
            Some(tag) => {
                // Tag filtering and pagination are one operation; the page
                // window applies to the filtered listing.
                let mut stores = self.storage.stores_by_tag(tag).await?;
                if let Some(offset) = query.offset {
                    stores = stores.into_iter().skip(offset).collect();
                }
                if let Some(limit) = query.limit {
                    stores.truncate(limit);
                }
                stores
            }
            None => self.storage.all_stores(query.limit, query.offset).await?,
        };
        materialize::attach_reviews(self.storage.as_ref(), stores).await
    }

    /// Full-text search over name/description, delegated to the storage
    /// layer's index.
    pub async fn search_stores(&self, query: &str) -> Result<Vec<StoreWithReviews>> {
        let stores = self.storage.search_stores(query).await?;
        materialize::attach_reviews(self.storage.as_ref(), stores).await
    }

    /// Nearest stores within a radius, delegated to the storage layer's
    /// geospatial index. `radius_meters` falls back to the configured
    /// default.
    pub async fn stores_near(
        &self,
        longitude: f64,
        latitude: f64,
        radius_meters: Option<f64>,
    ) -> Result<Vec<StoreWithReviews>> {
        validate_coordinates(&[longitude, latitude])?;
        let radius = radius_meters.unwrap_or(self.config.proximity.radius_meters);
        let stores = self
            .storage
            .stores_near(longitude, latitude, radius, self.config.proximity.max_results)
            .await?;
        materialize::attach_reviews(self.storage.as_ref(), stores).await
    }

    /// Review submission for an existing store. Aggregation only consumes
    /// reviews; this is the one write path the collection has here.
    pub async fn add_review(
        &self,
        store_id: Uuid,
        author_id: Uuid,
        text: String,
        rating: u8,
    ) -> Result<Review> {
        if !(1..=5).contains(&rating) {
            return Err(DirectoryError::validation(
                "rating",
                format!("rating must be between 1 and 5, got {}", rating),
            ));
        }
        self.check_author(author_id).await?;
        if self.storage.get_store_by_id(store_id).await?.is_none() {
            return Err(DirectoryError::NotFound(store_id.to_string()));
        }

        let mut review = Review {
            id: None,
            store_id,
            author_id,
            text,
            rating,
            created_at: Utc::now(),
        };
        self.storage.create_review(&mut review).await?;
        debug!("Added review for store {} rated {}", store_id, rating);
        Ok(review)
    }

    /// Tag popularity report, recomputed on demand.
    pub async fn tag_counts(&self) -> Result<Vec<TagCount>> {
        let stores = self.storage.all_stores(None, None).await?;
        Ok(Reports::count_tags(&stores))
    }

    /// Review-weighted top-store ranking, recomputed on demand. `limit`
    /// falls back to the configured default.
    pub async fn top_stores(&self, limit: Option<usize>) -> Result<Vec<StoreSummary>> {
        let stores = self.storage.all_stores(None, None).await?;
        let ids: Vec<Uuid> = stores.iter().filter_map(|s| s.id).collect();
        let reviews = self.storage.reviews_for_stores(&ids).await?;
        let limit = limit.unwrap_or(self.config.reports.top_stores_limit);
        Ok(Reports::rank_stores(stores, reviews, limit))
    }

    async fn check_author(&self, author_id: Uuid) -> Result<()> {
        if !self.storage.user_exists(author_id).await? {
            return Err(DirectoryError::validation(
                "author_id",
                format!("no user with id {}", author_id),
            ));
        }
        Ok(())
    }

    async fn materialize_one(&self, store: Store) -> Result<StoreWithReviews> {
        materialize::attach_reviews_one(self.storage.as_ref(), store).await
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_draft(draft: &StoreDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(DirectoryError::validation("name", "name is required"));
    }
    if draft.location.address.trim().is_empty() {
        return Err(DirectoryError::validation(
            "location.address",
            "address is required",
        ));
    }
    validate_coordinates(&draft.location.coordinates)
}

fn validate_coordinates(coordinates: &[f64; 2]) -> Result<()> {
    let [longitude, latitude] = *coordinates;
    if !longitude.is_finite() || !latitude.is_finite() {
        return Err(DirectoryError::validation(
            "location.coordinates",
            "coordinates must be finite numbers",
        ));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(DirectoryError::validation(
            "location.coordinates",
            format!("longitude {} out of range [-180, 180]", longitude),
        ));
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(DirectoryError::validation(
            "location.coordinates",
            format!("latitude {} out of range [-90, 90]", latitude),
        ));
    }
    Ok(())
}
