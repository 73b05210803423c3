//! Collection statistics.

#![allow(clippy::cast_precision_loss)]

use super::Keyword;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate counts over a keyword collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordStatistics {
    /// Number of keywords.
    pub total: usize,
    /// Keyword count per category tag present in the collection.
    pub by_category: BTreeMap<String, usize>,
    /// Keyword count per depth tag present in the collection.
    pub by_depth: BTreeMap<String, usize>,
    /// Mean number of examples per keyword.
    pub avg_examples: f64,
    /// Mean number of related terms per keyword.
    pub avg_related: f64,
    /// Mean number of cross-domain tags per keyword.
    pub avg_cross_domains: f64,
}

impl KeywordStatistics {
    /// Computes statistics for a collection.
    ///
    /// An empty collection yields zero totals and `0.0` averages.
    #[must_use]
    pub fn from_keywords(keywords: &[Keyword]) -> Self {
        let mut stats = Self {
            total: keywords.len(),
            ..Self::default()
        };

        let (mut examples, mut related, mut cross_domains) = (0usize, 0usize, 0usize);
        for k in keywords {
            *stats.by_category.entry(k.category.clone()).or_default() += 1;
            *stats.by_depth.entry(k.depth.clone()).or_default() += 1;
            examples += k.examples.len();
            related += k.related.len();
            cross_domains += k.cross_domains.len();
        }

        if stats.total > 0 {
            let total = stats.total as f64;
            stats.avg_examples = examples as f64 / total;
            stats.avg_related = related as f64 / total;
            stats.avg_cross_domains = cross_domains as f64 / total;
        }

        stats
    }
}
