use crate::error::{DirectoryError, Result};
use crate::storage::DirectoryStore;
use deunicode::deunicode;

/// Normalize a display name into a URL-safe base slug: diacritics folded
/// to ASCII, lowercased, every non-alphanumeric run collapsed to a single
/// hyphen.
pub fn base_slug(name: &str) -> String {
    deunicode(name.trim())
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Case-insensitive pattern matching the base slug itself or the base
/// followed by a numeric suffix (`base`, `base-2`, `base-17`, ...).
pub fn collision_pattern(base: &str) -> String {
    format!("(?i)^{}(-[0-9]+)?$", regex::escape(base))
}

/// Derive a unique slug for `name` against the slugs already in storage.
///
/// With N existing matches the new slug is `base-(N+1)`. The count is not
/// a free-slot search: suffix gaps left by deletions are not reused, and
/// two concurrent callers can read the same count and collide. The
/// collision then surfaces as `DuplicateSlug` from the write, which the
/// caller retries; it is not resolved here.
pub async fn assign(storage: &dyn DirectoryStore, name: &str) -> Result<String> {
    let base = base_slug(name);
    if base.is_empty() {
        return Err(DirectoryError::validation(
            "name",
            "name must contain at least one alphanumeric character",
        ));
    }

    let taken = storage.count_slugs_matching(&collision_pattern(&base)).await?;
    if taken == 0 {
        Ok(base)
    } else {
        Ok(format!("{}-{}", base, taken + 1))
    }
}
