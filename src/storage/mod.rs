pub mod in_memory;

pub use in_memory::InMemoryStore;

use crate::domain::{Review, Store, User};
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Document-store client the catalog is built against. Implementations
/// provide per-record atomicity only: a single create or update is atomic,
/// read-then-write sequences across records are not.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    // Store operations
    /// Assigns an id and persists the store. Fails with `DuplicateSlug`
    /// if another record already holds the same slug.
    async fn create_store(&self, store: &mut Store) -> Result<()>;
    /// Replaces the stored record, re-checking slug uniqueness against
    /// all other records.
    async fn update_store(&self, store: &Store) -> Result<()>;
    async fn get_store_by_id(&self, id: Uuid) -> Result<Option<Store>>;
    async fn get_store_by_slug(&self, slug: &str) -> Result<Option<Store>>;
    async fn all_stores(&self, limit: Option<usize>, offset: Option<usize>) -> Result<Vec<Store>>;
    async fn stores_by_tag(&self, tag: &str) -> Result<Vec<Store>>;

    // Index affordances delegated to the backend
    /// Number of stores whose slug matches the given regex pattern.
    /// Backs the collision count of the slug assigner.
    async fn count_slugs_matching(&self, pattern: &str) -> Result<usize>;
    /// Full-text search over name and description.
    async fn search_stores(&self, query: &str) -> Result<Vec<Store>>;
    /// Stores within `radius_meters` of the point, nearest first,
    /// capped at `limit`.
    async fn stores_near(
        &self,
        longitude: f64,
        latitude: f64,
        radius_meters: f64,
        limit: usize,
    ) -> Result<Vec<Store>>;

    // Review operations
    async fn create_review(&self, review: &mut Review) -> Result<()>;
    /// All reviews referencing any of the given store ids, in one batch.
    async fn reviews_for_stores(&self, store_ids: &[Uuid]) -> Result<Vec<Review>>;

    // User operations (existence checks only; profiles live elsewhere)
    async fn create_user(&self, user: &mut User) -> Result<()>;
    async fn user_exists(&self, id: Uuid) -> Result<bool>;
}
