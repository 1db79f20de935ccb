use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("no store found for '{0}'")]
    NotFound(String),

    #[error("slug '{0}' is already taken")]
    DuplicateSlug(String),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DirectoryError {
    /// Shorthand for field-level validation failures.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        DirectoryError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
