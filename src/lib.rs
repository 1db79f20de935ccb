pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod seed;
pub mod storage;

// Re-export the surface external collaborators use
pub use catalog::CatalogService;
pub use config::Config;
pub use error::{DirectoryError, Result};
pub use storage::{DirectoryStore, InMemoryStore};
