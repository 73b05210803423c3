//! Collection filtering for the admin listing.

use super::Keyword;

/// Filter over a keyword collection.
///
/// All set criteria must match. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordFilter {
    /// Case-insensitive substring matched against term and description.
    pub search: Option<String>,
    /// Exact category tag.
    pub category: Option<String>,
    /// Exact depth tag.
    pub depth: Option<String>,
}

impl KeywordFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Restricts to one category tag.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restricts to one depth tag.
    #[must_use]
    pub fn with_depth(mut self, depth: impl Into<String>) -> Self {
        self.depth = Some(depth.into());
        self
    }

    /// Returns true if the keyword satisfies every criterion.
    #[must_use]
    pub fn matches(&self, keyword: &Keyword) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .is_none_or(|needle| {
                let needle = needle.to_lowercase();
                keyword.term.to_lowercase().contains(&needle)
                    || keyword.description.to_lowercase().contains(&needle)
            });

        search_ok
            && self.category.as_deref().is_none_or(|c| keyword.category == c)
            && self.depth.as_deref().is_none_or(|d| keyword.depth == d)
    }
}
