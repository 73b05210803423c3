//! Bundled default dataset.
//!
//! Used whenever no collection has been persisted yet, or the persisted one
//! cannot be parsed.

use crate::models::Keyword;
use std::sync::LazyLock;

/// Raw JSON of the bundled dataset.
pub const DEFAULT_KEYWORDS_JSON: &str = include_str!("default_keywords.json");

static DEFAULT_KEYWORDS: LazyLock<Vec<Keyword>> = LazyLock::new(|| {
    serde_json::from_str(DEFAULT_KEYWORDS_JSON).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Bundled keyword dataset is malformed");
        Vec::new()
    })
});

/// Returns a copy of the bundled default collection.
#[must_use]
pub fn default_keywords() -> Vec<Keyword> {
    DEFAULT_KEYWORDS.clone()
}
