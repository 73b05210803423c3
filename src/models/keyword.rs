//! The canonical keyword record.

use super::{Category, Depth};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A knowledge card in the catalog.
///
/// `term` is the primary key: no two keywords in one collection share it.
/// `category` and `depth` are kept as strings so that permissive imports can
/// carry tags outside the known sets; use [`Keyword::category_tag`] and
/// [`Keyword::depth_tag`] for the typed view.
///
/// # Field Mapping
///
/// | Field | JSON key | Required |
/// |-------|----------|----------|
/// | `term` | `term` | Yes |
/// | `category` | `category` | Yes |
/// | `depth` | `depth` | Yes |
/// | `description` | `description` | Yes |
/// | `cognitive_impact` | `cognitiveImpact` | Yes (may be empty) |
/// | `examples` | `examples` | Yes (may be empty) |
/// | `related` | `related` | Yes (may be empty) |
/// | `cross_domains` | `crossDomains` | Yes (may be empty) |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    /// Unique term (primary key).
    pub term: String,
    /// Category tag, normally one of [`Category::all`].
    pub category: String,
    /// Depth tag, normally one of [`Depth::all`].
    pub depth: String,
    /// What the term means.
    pub description: String,
    /// Usage examples, in display order.
    pub examples: Vec<String>,
    /// Related terms, in display order.
    pub related: Vec<String>,
    /// Effect the term has on a reader's thinking.
    pub cognitive_impact: String,
    /// Domains the term applies to.
    pub cross_domains: Vec<String>,
}

impl Keyword {
    /// Creates a keyword with the given term and description and default tags.
    #[must_use]
    pub fn new(term: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            category: Category::default().as_str().to_string(),
            depth: Depth::default().as_str().to_string(),
            description: description.into(),
            examples: Vec::new(),
            related: Vec::new(),
            cognitive_impact: String::new(),
            cross_domains: Vec::new(),
        }
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category.as_str().to_string();
        self
    }

    /// Sets the depth.
    #[must_use]
    pub fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = depth.as_str().to_string();
        self
    }

    /// Sets the cognitive impact.
    #[must_use]
    pub fn with_cognitive_impact(mut self, impact: impl Into<String>) -> Self {
        self.cognitive_impact = impact.into();
        self
    }

    /// Adds an example.
    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    /// Adds a related term.
    #[must_use]
    pub fn with_related(mut self, related: impl Into<String>) -> Self {
        self.related.push(related.into());
        self
    }

    /// Adds a cross-domain tag.
    #[must_use]
    pub fn with_cross_domain(mut self, domain: impl Into<String>) -> Self {
        self.cross_domains.push(domain.into());
        self
    }

    /// Returns the category if it is a known tag.
    #[must_use]
    pub fn category_tag(&self) -> Option<Category> {
        Category::parse(&self.category)
    }

    /// Returns the depth if it is a known tag.
    #[must_use]
    pub fn depth_tag(&self) -> Option<Depth> {
        Depth::parse(&self.depth)
    }

    /// Converts a structurally valid candidate object into a keyword.
    ///
    /// Expects the shape accepted by the permissive validator: string scalars
    /// and array-valued list fields. List elements that are not strings are
    /// kept as their JSON text. Returns `None` if a field has the wrong type.
    #[must_use]
    pub fn from_candidate(value: &Value) -> Option<Self> {
        let scalar = |key: &str| value.get(key).and_then(Value::as_str).map(String::from);
        let list = |key: &str| {
            value.get(key).and_then(Value::as_array).map(|items| {
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
            })
        };

        Some(Self {
            term: scalar("term")?,
            category: scalar("category")?,
            depth: scalar("depth")?,
            description: scalar("description")?,
            examples: list("examples")?,
            related: list("related")?,
            cognitive_impact: scalar("cognitiveImpact")?,
            cross_domains: list("crossDomains")?,
        })
    }
}

/// A partial update to a keyword.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordUpdate {
    /// New term (renames the keyword).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    /// New category tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New depth tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New examples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
    /// New related terms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<Vec<String>>,
    /// New cognitive impact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognitive_impact: Option<String>,
    /// New cross-domain tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_domains: Option<Vec<String>>,
}

impl KeywordUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the new term.
    #[must_use]
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    /// Sets the new description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the new category tag.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns true if the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the update to a keyword in place.
    pub fn apply_to(self, keyword: &mut Keyword) {
        if let Some(term) = self.term {
            keyword.term = term;
        }
        if let Some(category) = self.category {
            keyword.category = category;
        }
        if let Some(depth) = self.depth {
            keyword.depth = depth;
        }
        if let Some(description) = self.description {
            keyword.description = description;
        }
        if let Some(examples) = self.examples {
            keyword.examples = examples;
        }
        if let Some(related) = self.related {
            keyword.related = related;
        }
        if let Some(impact) = self.cognitive_impact {
            keyword.cognitive_impact = impact;
        }
        if let Some(cross_domains) = self.cross_domains {
            keyword.cross_domains = cross_domains;
        }
    }
}

impl From<Keyword> for KeywordUpdate {
    fn from(k: Keyword) -> Self {
        Self {
            term: Some(k.term),
            category: Some(k.category),
            depth: Some(k.depth),
            description: Some(k.description),
            examples: Some(k.examples),
            related: Some(k.related),
            cognitive_impact: Some(k.cognitive_impact),
            cross_domains: Some(k.cross_domains),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keyword_builder() {
        let kw = Keyword::new("元认知", "对思维过程的思维")
            .with_category(Category::MetaThinking)
            .with_depth(Depth::Expert)
            .with_example("学习如何学习")
            .with_related("自我反思")
            .with_cross_domain("教育");

        assert_eq!(kw.category, "meta-thinking");
        assert_eq!(kw.depth_tag(), Some(Depth::Expert));
        assert_eq!(kw.examples, vec!["学习如何学习"]);
        assert!(kw.cognitive_impact.is_empty());
    }

    #[test]
    fn test_keyword_serializes_camel_case() {
        let kw = Keyword::new("TRIZ", "inventive problem solving").with_cognitive_impact("x");
        let value = serde_json::to_value(&kw).unwrap();
        assert_eq!(value["cognitiveImpact"], "x");
        assert!(value.get("crossDomains").is_some());
        assert!(value.get("cross_domains").is_none());
    }

    #[test]
    fn test_from_candidate_keeps_non_string_elements() {
        let value = json!({
            "term": "t", "category": "c1", "depth": "d", "description": "desc",
            "cognitiveImpact": "", "examples": ["a", 2, true], "related": [], "crossDomains": []
        });
        let kw = Keyword::from_candidate(&value).unwrap();
        assert_eq!(kw.examples, vec!["a", "2", "true"]);
        assert_eq!(kw.category_tag(), None);
    }

    #[test]
    fn test_from_candidate_rejects_missing_field() {
        let value = json!({"term": "t", "description": "d"});
        assert!(Keyword::from_candidate(&value).is_none());
    }

    #[test]
    fn test_partial_update() {
        let mut kw = Keyword::new("X", "old");
        KeywordUpdate::new().with_description("new").apply_to(&mut kw);
        assert_eq!(kw.term, "X");
        assert_eq!(kw.description, "new");
        assert!(KeywordUpdate::new().is_empty());
    }

    #[test]
    fn test_full_record_update_replaces_every_field() {
        let mut kw = Keyword::new("X", "old").with_example("e");
        let replacement = Keyword::new("Y", "new").with_depth(Depth::Visionary);
        KeywordUpdate::from(replacement.clone()).apply_to(&mut kw);
        assert_eq!(kw, replacement);
    }
}
