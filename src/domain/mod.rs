use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geospatial point plus street address. Coordinates are stored
/// `[longitude, latitude]` and are always exactly two components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Insertion order preserved verbatim; duplicates allowed. The tag
    /// report counts each occurrence independently.
    pub tags: Vec<String>,
    pub location: Location,
    pub photo: Option<String>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Option<Uuid>,
    pub store_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    /// 1 through 5 inclusive.
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
}

/// A store with its reviews attached. This is the only shape read
/// operations return; the reviews are resolved at read time and never
/// persisted on the store record.
#[derive(Debug, Clone, Serialize)]
pub struct StoreWithReviews {
    #[serde(flatten)]
    pub store: Store,
    pub reviews: Vec<Review>,
}

/// One row of the tag popularity report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// One row of the top-rated stores report.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    pub photo: Option<String>,
    pub name: String,
    pub slug: String,
    pub reviews: Vec<Review>,
    pub average_rating: f64,
}

/// Create/update payload for a store. The slug is never part of the
/// input; it is derived from the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub location: Location,
    #[serde(default)]
    pub photo: Option<String>,
    pub author_id: Uuid,
}

/// Filter for multi-store listings.
#[derive(Debug, Clone, Default)]
pub struct StoreQuery {
    pub tag: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}
