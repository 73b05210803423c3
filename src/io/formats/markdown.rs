//! Markdown format adapter for import/export.
//!
//! Each record is a level-2 section:
//!
//! ```markdown
//! ## 1. 元认知
//!
//! - **分类**: 🤔 元思维
//! - **深度**: 🎯 专家级
//! - **描述**: 对思维过程的思维
//! - **认知影响**: 提升自我监控
//! - **示例**:
//!   - 学习如何学习
//! - **相关词**: 自我反思, 批判性思维
//! - **跨领域应用**: 教育, 心理学
//! ```
//!
//! Field lines are recognized through a [`MarkdownLabels`] table, so the
//! label vocabulary can be swapped without touching the parser. Category
//! and depth are written as display labels and reverse-looked-up on import.

use super::strip_bom;
use crate::io::traits::{Candidate, KeywordDecoder, KeywordEncoder};
use crate::models::{Category, Depth, Keyword};
use crate::{Error, Result};
use regex::Regex;
use serde_json::{Value, json};
use std::fmt::Write as _;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##\s+(.*)$").expect("static regex: section heading"));

#[allow(clippy::expect_used)]
static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+").expect("static regex: heading number"));

#[allow(clippy::expect_used)]
static NESTED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s\s-\s(.*)$").expect("static regex: nested list item"));

/// A field carried by a Markdown section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Category,
    Depth,
    Description,
    CognitiveImpact,
    Examples,
    Related,
    CrossDomains,
}

/// Label vocabulary for Markdown field lines.
///
/// Each field lists the labels accepted on import; the first one is the
/// label written on export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownLabels {
    /// Document title written in the export preamble.
    pub title: String,
    /// Count line written under the title; `{count}` is replaced.
    pub summary: String,
    /// Labels for the category field.
    pub category: Vec<String>,
    /// Labels for the depth field.
    pub depth: Vec<String>,
    /// Labels for the description field.
    pub description: Vec<String>,
    /// Labels for the cognitive impact field.
    pub cognitive_impact: Vec<String>,
    /// Labels for the examples list.
    pub examples: Vec<String>,
    /// Labels for the related terms field.
    pub related: Vec<String>,
    /// Labels for the cross-domain field.
    pub cross_domains: Vec<String>,
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

impl MarkdownLabels {
    /// Chinese labels, accepting the English field names on import.
    #[must_use]
    pub fn chinese() -> Self {
        Self {
            title: "魔法关键词列表".to_string(),
            summary: "共 {count} 个关键词".to_string(),
            category: labels(&["分类", "Category"]),
            depth: labels(&["深度", "Depth"]),
            description: labels(&["描述", "Description"]),
            cognitive_impact: labels(&["认知影响", "CognitiveImpact", "Cognitive Impact"]),
            examples: labels(&["示例", "Examples"]),
            related: labels(&["相关词", "Related"]),
            cross_domains: labels(&["跨领域应用", "CrossDomains", "Cross Domains"]),
        }
    }

    /// English labels, accepting the Chinese field names on import.
    #[must_use]
    pub fn english() -> Self {
        Self {
            title: "Magic Keywords".to_string(),
            summary: "{count} keywords".to_string(),
            category: labels(&["Category", "分类"]),
            depth: labels(&["Depth", "深度"]),
            description: labels(&["Description", "描述"]),
            cognitive_impact: labels(&["Cognitive Impact", "CognitiveImpact", "认知影响"]),
            examples: labels(&["Examples", "示例"]),
            related: labels(&["Related", "相关词"]),
            cross_domains: labels(&["Cross Domains", "CrossDomains", "跨领域应用"]),
        }
    }

    fn entries(&self) -> [(Field, &[String]); 7] {
        [
            (Field::Category, self.category.as_slice()),
            (Field::Depth, self.depth.as_slice()),
            (Field::Description, self.description.as_slice()),
            (Field::CognitiveImpact, self.cognitive_impact.as_slice()),
            (Field::Examples, self.examples.as_slice()),
            (Field::Related, self.related.as_slice()),
            (Field::CrossDomains, self.cross_domains.as_slice()),
        ]
    }

    fn export_label(names: &[String]) -> &str {
        names.first().map_or("", String::as_str)
    }
}

impl Default for MarkdownLabels {
    fn default() -> Self {
        Self::chinese()
    }
}

/// Compiled matchers for one label vocabulary.
#[derive(Debug)]
struct FieldPatterns {
    patterns: Vec<(Field, Regex)>,
}

impl FieldPatterns {
    fn compile(labels: &MarkdownLabels) -> Result<Self> {
        let patterns = labels
            .entries()
            .into_iter()
            .map(|(field, names)| {
                let alternatives = names
                    .iter()
                    .map(|name| regex::escape(name))
                    .collect::<Vec<_>>()
                    .join("|");
                // The examples label opens a nested list and carries no inline value.
                let value = if field == Field::Examples {
                    r"\s*$"
                } else {
                    r"\s*(.+?)\s*$"
                };
                let pattern = format!(r"^\s*(?:-\s+)?\*\*(?:{alternatives})\*\*\s*[:：]{value}");
                Regex::new(&pattern)
                    .map(|re| (field, re))
                    .map_err(|e| Error::InvalidInput(format!("invalid Markdown label: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Returns the field a line introduces and its inline value.
    fn match_line<'a>(&self, line: &'a str) -> Option<(Field, &'a str)> {
        self.patterns.iter().find_map(|(field, re)| {
            re.captures(line).map(|caps| {
                let value = caps.get(1).map_or("", |m| m.as_str());
                (*field, value)
            })
        })
    }
}

/// Markdown codec.
#[derive(Debug)]
pub struct MarkdownCodec {
    labels: MarkdownLabels,
    patterns: FieldPatterns,
}

impl MarkdownCodec {
    /// Creates a codec with the default (Chinese) labels.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: FieldPatterns::default_set(),
            labels: MarkdownLabels::default(),
        }
    }

    /// Creates a codec with a custom label vocabulary.
    ///
    /// # Errors
    ///
    /// Returns an error if the labels produce an invalid pattern.
    pub fn with_labels(labels: MarkdownLabels) -> Result<Self> {
        let patterns = FieldPatterns::compile(&labels)?;
        Ok(Self { labels, patterns })
    }

    /// Returns the label vocabulary.
    #[must_use]
    pub const fn labels(&self) -> &MarkdownLabels {
        &self.labels
    }

    /// Splits the document into `(heading, body lines)` sections.
    ///
    /// Text before the first heading is dropped, as are sections whose
    /// heading and body are all blank. A preamble therefore never takes a
    /// position: the first `##` section is position 1 even when a title
    /// precedes it, unlike numbering that counts the preamble as a failed
    /// section 1.
    fn sections(text: &str) -> Vec<(&str, Vec<&str>)> {
        let mut sections: Vec<(&str, Vec<&str>)> = Vec::new();

        for line in text.lines() {
            if let Some(caps) = HEADING.captures(line) {
                let heading = caps.get(1).map_or("", |m| m.as_str());
                sections.push((heading, Vec::new()));
            } else if let Some((_, body)) = sections.last_mut() {
                body.push(line);
            }
        }

        sections.retain(|(heading, body)| {
            !heading.trim().is_empty() || body.iter().any(|l| !l.trim().is_empty())
        });
        sections
    }

    fn parse_section(&self, heading: &str, body: &[&str]) -> Value {
        let heading = heading.trim();
        let term = NUMBER_PREFIX.replace(heading, "").trim().to_string();

        let mut category = Category::default();
        let mut depth = Depth::default();
        let mut description = String::new();
        let mut cognitive_impact = String::new();
        let mut examples: Vec<String> = Vec::new();
        let mut related: Vec<String> = Vec::new();
        let mut cross_domains: Vec<String> = Vec::new();

        let lines: Vec<&str> = body
            .iter()
            .map(|l| l.trim_end())
            .filter(|l| !l.trim().is_empty())
            .collect();

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            i += 1;

            if line.trim() == "---" {
                continue;
            }
            let Some((field, value)) = self.patterns.match_line(line) else {
                continue;
            };

            match field {
                Field::Category => {
                    if let Some(c) = Category::from_label(value) {
                        category = c;
                    }
                },
                Field::Depth => {
                    if let Some(d) = Depth::from_label(value) {
                        depth = d;
                    }
                },
                Field::Description => description = value.to_string(),
                Field::CognitiveImpact => cognitive_impact = value.to_string(),
                Field::Related => related = split_commas(value),
                Field::CrossDomains => cross_domains = split_commas(value),
                Field::Examples => {
                    while let Some(caps) = lines.get(i).and_then(|l| NESTED_ITEM.captures(l)) {
                        let item = caps.get(1).map_or("", |m| m.as_str()).trim();
                        if !item.is_empty() {
                            examples.push(item.to_string());
                        }
                        i += 1;
                    }
                },
            }
        }

        json!({
            "term": term,
            "category": category.as_str(),
            "depth": depth.as_str(),
            "description": description,
            "examples": examples,
            "related": related,
            "cognitiveImpact": cognitive_impact,
            "crossDomains": cross_domains,
        })
    }
}

impl Default for MarkdownCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldPatterns {
    /// Patterns for the default labels, compiled once.
    fn default_set() -> Self {
        static DEFAULT: LazyLock<Vec<(Field, Regex)>> = LazyLock::new(|| {
            FieldPatterns::compile(&MarkdownLabels::default())
                .map(|p| p.patterns)
                .unwrap_or_else(|e| {
                    tracing::error!(error = %e, "Default Markdown labels failed to compile");
                    Vec::new()
                })
        });
        Self {
            patterns: DEFAULT.clone(),
        }
    }
}

fn split_commas(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl KeywordDecoder for MarkdownCodec {
    fn decode(&self, text: &str) -> Result<Vec<Candidate>> {
        Ok(Self::sections(strip_bom(text))
            .into_iter()
            .enumerate()
            .map(|(i, (heading, body))| {
                Candidate::new(i + 1, self.parse_section(heading, &body)).requiring_content()
            })
            .collect())
    }
}

impl KeywordEncoder for MarkdownCodec {
    fn encode(&self, keywords: &[Keyword]) -> Result<String> {
        let l = &self.labels;
        let mut out = String::new();

        let summary = l.summary.replace("{count}", &keywords.len().to_string());
        let _ = write!(out, "# {}\n\n{summary}\n\n---\n\n", l.title);

        for (i, k) in keywords.iter().enumerate() {
            let _ = writeln!(out, "## {}. {}\n", i + 1, k.term);
            let _ = writeln!(
                out,
                "- **{}**: {}",
                MarkdownLabels::export_label(&l.category),
                Category::label_for(&k.category)
            );
            let _ = writeln!(
                out,
                "- **{}**: {}",
                MarkdownLabels::export_label(&l.depth),
                Depth::label_for(&k.depth)
            );
            let _ = writeln!(
                out,
                "- **{}**: {}",
                MarkdownLabels::export_label(&l.description),
                k.description
            );
            if !k.cognitive_impact.is_empty() {
                let _ = writeln!(
                    out,
                    "- **{}**: {}",
                    MarkdownLabels::export_label(&l.cognitive_impact),
                    k.cognitive_impact
                );
            }

            if !k.examples.is_empty() {
                let _ = writeln!(out, "- **{}**:", MarkdownLabels::export_label(&l.examples));
                for example in &k.examples {
                    let _ = writeln!(out, "  - {example}");
                }
            }
            if !k.related.is_empty() {
                let _ = writeln!(
                    out,
                    "- **{}**: {}",
                    MarkdownLabels::export_label(&l.related),
                    k.related.join(", ")
                );
            }
            if !k.cross_domains.is_empty() {
                let _ = writeln!(
                    out,
                    "- **{}**: {}",
                    MarkdownLabels::export_label(&l.cross_domains),
                    k.cross_domains.join(", ")
                );
            }

            out.push_str("\n---\n\n");
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_one(text: &str) -> Keyword {
        let candidates = MarkdownCodec::new().decode(text).unwrap();
        assert_eq!(candidates.len(), 1);
        Keyword::from_candidate(&candidates[0].value).unwrap()
    }

    #[test]
    fn test_decode_full_section() {
        let kw = decode_one(
            "# 魔法关键词列表\n\n共 1 个关键词\n\n---\n\n\
             ## 1. 元认知\n\n\
             - **分类**: 🤔 元思维\n\
             - **深度**: 🎯 专家级\n\
             - **描述**: 对思维过程的思维\n\
             - **认知影响**: 提升自我监控\n\
             - **示例**:\n  - 学习如何学习\n  - 复盘\n\
             - **相关词**: 自我反思, 批判性思维\n\
             - **跨领域应用**: 教育\n\n---\n",
        );

        assert_eq!(kw.term, "元认知");
        assert_eq!(kw.category, "meta-thinking");
        assert_eq!(kw.depth, "expert");
        assert_eq!(kw.description, "对思维过程的思维");
        assert_eq!(kw.cognitive_impact, "提升自我监控");
        assert_eq!(kw.examples, vec!["学习如何学习", "复盘"]);
        assert_eq!(kw.related, vec!["自我反思", "批判性思维"]);
        assert_eq!(kw.cross_domains, vec!["教育"]);
    }

    #[test]
    fn test_examples_list_ends_at_next_field() {
        let kw = decode_one("## T\n**描述**: d\n- **示例**:\n  - A\n  - B\n**相关词**: C, D\n");
        assert_eq!(kw.examples, vec!["A", "B"]);
        assert_eq!(kw.related, vec!["C", "D"]);
    }

    #[test]
    fn test_unknown_labels_fall_back_to_defaults() {
        let kw = decode_one("## T\n- **分类**: 不存在\n- **深度**: advanced\n- **描述**: d\n");
        assert_eq!(kw.category, Category::default().as_str());
        assert_eq!(kw.depth, "advanced");
    }

    #[test]
    fn test_english_labels_and_fullwidth_colon() {
        let kw = decode_one("## 2. Flow\n- **Description**： deep focus\n- **Related**: a,b\n");
        assert_eq!(kw.term, "Flow");
        assert_eq!(kw.description, "deep focus");
        assert_eq!(kw.related, vec!["a", "b"]);
    }

    #[test]
    fn test_heading_number_requires_space() {
        assert_eq!(decode_one("## 3.14 pi\n").term, "3.14 pi");
        assert_eq!(decode_one("## 12. pi\n").term, "pi");
    }

    #[test]
    fn test_sections_get_consecutive_positions() {
        let text = "intro text\n## A\n**描述**: a\n## \n\n## B\n";
        let candidates = MarkdownCodec::new().decode(text).unwrap();
        let positions: Vec<_> = candidates.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![1, 2]);
        assert_eq!(candidates[1].term(), Some("B"));
        assert!(candidates.iter().all(|c| c.require_content));
    }

    #[test]
    fn test_no_sections() {
        assert!(MarkdownCodec::new().decode("just text").unwrap().is_empty());
    }

    #[test]
    fn test_encode_layout() {
        let kw = Keyword::new("涌现", "整体大于部分之和")
            .with_category(Category::SystemOrchestration)
            .with_example("蚁群");
        let text = MarkdownCodec::new().encode(&[kw]).unwrap();

        assert!(text.starts_with("# 魔法关键词列表\n\n共 1 个关键词\n\n---\n\n## 1. 涌现\n\n"));
        assert!(text.contains("- **分类**: 🏗️ 系统编排\n"));
        assert!(text.contains("- **深度**: 🏗️ 基础构建\n"));
        assert!(text.contains("- **示例**:\n  - 蚁群\n"));
        assert!(!text.contains("相关词"));
        assert!(text.ends_with("\n---\n\n"));
    }

    #[test]
    fn test_encode_omits_empty_cognitive_impact() {
        let codec = MarkdownCodec::new();
        let text = codec.encode(&[Keyword::new("X", "d")]).unwrap();
        assert!(!text.contains("认知影响"));

        let text = codec
            .encode(&[Keyword::new("X", "d").with_cognitive_impact("更清晰")])
            .unwrap();
        assert!(text.contains("- **认知影响**: 更清晰\n"));
    }

    #[test]
    fn test_encode_unknown_tag_written_raw() {
        let mut kw = Keyword::new("X", "d");
        kw.category = "c1".to_string();
        let text = MarkdownCodec::new().encode(&[kw]).unwrap();
        assert!(text.contains("- **分类**: c1\n"));
    }

    #[test]
    fn test_encode_then_decode_preserves_record() {
        let kw = Keyword::new("Zettelkasten", "linked notes")
            .with_category(Category::PromptStructuring)
            .with_depth(Depth::Visionary)
            .with_cognitive_impact("externalized memory")
            .with_example("atomic note")
            .with_related("PKM")
            .with_cross_domain("research");
        let codec = MarkdownCodec::new();
        let text = codec.encode(std::slice::from_ref(&kw)).unwrap();
        let candidates = codec.decode(&text).unwrap();
        assert_eq!(Keyword::from_candidate(&candidates[0].value), Some(kw));
    }

    #[test]
    fn test_custom_labels() {
        let codec = MarkdownCodec::with_labels(MarkdownLabels::english()).unwrap();
        let text = codec.encode(&[Keyword::new("X", "d")]).unwrap();
        assert!(text.starts_with("# Magic Keywords\n\n1 keywords\n"));
        assert!(text.contains("- **Description**: d\n"));
        assert_eq!(codec.labels().title, "Magic Keywords");

        let decoded = codec.decode(&text).unwrap();
        assert_eq!(decoded[0].value["description"], "d");
    }
}
