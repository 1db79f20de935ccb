use crate::catalog::CatalogService;
use crate::domain::{Location, StoreDraft, User};
use crate::error::{DirectoryError, Result};
use crate::storage::DirectoryStore;
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Seed file shape for the CLI. Stores reference users by index, reviews
/// reference stores and users by index, so the file needs no ids.
#[derive(Debug, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub stores: Vec<SeedStore>,
    #[serde(default)]
    pub reviews: Vec<SeedReview>,
}

#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedStore {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub address: String,
    pub coordinates: [f64; 2],
    #[serde(default)]
    pub photo: Option<String>,
    pub author: usize,
}

#[derive(Debug, Deserialize)]
pub struct SeedReview {
    pub store: usize,
    pub author: usize,
    #[serde(default)]
    pub text: String,
    pub rating: u8,
}

#[derive(Debug, Default)]
pub struct SeedSummary {
    pub users: usize,
    pub stores: usize,
    pub reviews: usize,
}

pub fn load(path: &Path) -> Result<SeedData> {
    let content = std::fs::read_to_string(path)?;
    let data: SeedData = serde_json::from_str(&content)?;
    Ok(data)
}

/// Feed a seed file through the catalog: users straight into storage,
/// stores and reviews through the façade so slug assignment and
/// validation run exactly as they would for real writes.
pub async fn apply(
    catalog: &CatalogService,
    storage: &dyn DirectoryStore,
    data: SeedData,
) -> Result<SeedSummary> {
    let mut user_ids: Vec<Uuid> = Vec::with_capacity(data.users.len());
    for seed_user in data.users {
        let mut user = User {
            id: None,
            name: seed_user.name,
            email: seed_user.email,
        };
        storage.create_user(&mut user).await?;
        user_ids.push(user.id.ok_or_else(|| {
            DirectoryError::Config("storage did not assign a user id".to_string())
        })?);
    }

    let mut store_ids: Vec<Uuid> = Vec::with_capacity(data.stores.len());
    for seed_store in data.stores {
        let author_id = *user_ids.get(seed_store.author).ok_or_else(|| {
            DirectoryError::validation("author", format!("no seed user at index {}", seed_store.author))
        })?;
        let created = catalog
            .create_store(StoreDraft {
                name: seed_store.name,
                description: seed_store.description,
                tags: seed_store.tags,
                location: Location {
                    address: seed_store.address,
                    coordinates: seed_store.coordinates,
                },
                photo: seed_store.photo,
                author_id,
            })
            .await?;
        store_ids.push(created.store.id.ok_or_else(|| {
            DirectoryError::Config("storage did not assign a store id".to_string())
        })?);
    }

    let mut review_count = 0;
    for seed_review in data.reviews {
        let store_id = *store_ids.get(seed_review.store).ok_or_else(|| {
            DirectoryError::validation("store", format!("no seed store at index {}", seed_review.store))
        })?;
        let author_id = *user_ids.get(seed_review.author).ok_or_else(|| {
            DirectoryError::validation("author", format!("no seed user at index {}", seed_review.author))
        })?;
        catalog
            .add_review(store_id, author_id, seed_review.text, seed_review.rating)
            .await?;
        review_count += 1;
    }

    let summary = SeedSummary {
        users: user_ids.len(),
        stores: store_ids.len(),
        reviews: review_count,
    };
    info!(
        "Seeded {} users, {} stores, {} reviews",
        summary.users, summary.stores, summary.reviews
    );
    Ok(summary)
}

impl SeedData {
    /// Built-in sample dataset for the `demo` command.
    pub fn demo() -> Self {
        SeedData {
            users: vec![
                SeedUser {
                    name: "Ava".to_string(),
                    email: "ava@example.com".to_string(),
                },
                SeedUser {
                    name: "Ben".to_string(),
                    email: "ben@example.com".to_string(),
                },
            ],
            stores: vec![
                SeedStore {
                    name: "Blue Bottle Espresso".to_string(),
                    description: Some("Single-origin pour overs".to_string()),
                    tags: vec!["Wifi".to_string(), "Open Late".to_string()],
                    address: "300 Pine St".to_string(),
                    coordinates: [-122.338, 47.610],
                    photo: Some("blue-bottle.jpg".to_string()),
                    author: 0,
                },
                SeedStore {
                    name: "Green Leaf Deli".to_string(),
                    description: Some("Sandwiches and salads".to_string()),
                    tags: vec!["Vegetarian".to_string(), "Wifi".to_string()],
                    address: "415 1st Ave".to_string(),
                    coordinates: [-122.334, 47.604],
                    photo: None,
                    author: 0,
                },
                SeedStore {
                    name: "Night Owl Diner".to_string(),
                    description: Some("Open until 3am".to_string()),
                    tags: vec!["Open Late".to_string(), "Family Friendly".to_string()],
                    address: "77 Broadway".to_string(),
                    coordinates: [-122.321, 47.615],
                    photo: None,
                    author: 1,
                },
            ],
            reviews: vec![
                SeedReview { store: 0, author: 1, text: "Great coffee".to_string(), rating: 5 },
                SeedReview { store: 0, author: 0, text: "A bit loud".to_string(), rating: 4 },
                SeedReview { store: 1, author: 1, text: "Fresh and fast".to_string(), rating: 4 },
                SeedReview { store: 1, author: 0, text: "Solid lunch".to_string(), rating: 3 },
                SeedReview { store: 2, author: 0, text: "Only stopped once".to_string(), rating: 5 },
            ],
        }
    }
}
