//! Command handlers module.
//!
//! - `core.rs`: Collection commands (list, show, add, update, delete, stats, reset)
//! - `io.rs`: Import and export commands

mod core;
mod io;

use std::path::PathBuf;

use clap::Args;
use magic_keywords::{Category, Depth, KeywordUpdate};

// Re-export command functions
pub use self::core::{cmd_add, cmd_delete, cmd_list, cmd_reset, cmd_show, cmd_stats, cmd_update};
pub use io::{cmd_export, cmd_import};

/// Optional keyword fields shared by `add` and `update`.
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    /// Category tag or display label.
    #[arg(long)]
    pub category: Option<String>,

    /// Depth tag or display label.
    #[arg(long)]
    pub depth: Option<String>,

    /// Description.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Cognitive impact.
    #[arg(long)]
    pub impact: Option<String>,

    /// Examples, separated by `;`.
    #[arg(long)]
    pub examples: Option<String>,

    /// Related terms, separated by `;`.
    #[arg(long)]
    pub related: Option<String>,

    /// Cross-domain tags, separated by `;`.
    #[arg(long)]
    pub cross_domains: Option<String>,
}

impl FieldArgs {
    /// Converts the arguments into a partial update.
    pub fn into_update(self) -> KeywordUpdate {
        KeywordUpdate {
            term: None,
            category: self.category.map(|c| normalize_category(&c)),
            depth: self.depth.map(|d| normalize_depth(&d)),
            description: self.description,
            examples: self.examples.as_deref().map(split_list),
            related: self.related.as_deref().map(split_list),
            cognitive_impact: self.impact,
            cross_domains: self.cross_domains.as_deref().map(split_list),
        }
    }
}

/// Arguments for the `import` command.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// File to import, or `-` for stdin.
    pub file: PathBuf,

    /// Format: json, csv, or markdown (default: inferred).
    #[arg(short, long)]
    pub format: Option<String>,

    /// Discard the current collection instead of merging into it.
    #[arg(long)]
    pub replace: bool,

    /// Replace existing keywords that share a term.
    #[arg(long)]
    pub overwrite: bool,

    /// Reject records with unknown tags or empty fields.
    #[arg(long)]
    pub strict: bool,

    /// Report what would happen without saving.
    #[arg(long)]
    pub dry_run: bool,
}

/// Splits a `;`-separated argument into trimmed, non-empty items.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Maps a display label to its tag; unknown values are kept as given.
pub fn normalize_category(s: &str) -> String {
    Category::from_label(s).map_or_else(|| s.trim().to_string(), |c| c.as_str().to_string())
}

/// Maps a display label to its tag; unknown values are kept as given.
pub fn normalize_depth(s: &str) -> String {
    Depth::from_label(s).map_or_else(|| s.trim().to_string(), |d| d.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a; b;;c ;"), vec!["a", "b", "c"]);
        assert!(split_list("  ").is_empty());
    }

    #[test]
    fn test_field_args_into_update() {
        let args = FieldArgs {
            description: Some("d".to_string()),
            examples: Some("x;y".to_string()),
            ..FieldArgs::default()
        };
        let update = args.into_update();
        assert_eq!(update.description.as_deref(), Some("d"));
        assert_eq!(update.examples, Some(vec!["x".to_string(), "y".to_string()]));
        assert!(update.category.is_none());
        assert!(update.term.is_none());
    }

    #[test]
    fn test_normalize_keeps_unknown() {
        assert_eq!(normalize_category("custom"), "custom");
        assert_eq!(normalize_depth(" custom "), "custom");
    }
}
