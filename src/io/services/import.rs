//! Keyword import service.
//!
//! Decodes import text in one of the supported formats and reconciles the
//! decoded candidates against the stored collection.

use crate::io::formats::{Format, create_decoder, strip_bom};
use crate::io::traits::Candidate;
use crate::io::validation::{ImportValidator, ValidationMode};
use crate::models::Keyword;
use crate::services::KeywordService;
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Options for keyword import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Keep the existing collection and add to it. When false the import
    /// replaces the collection.
    pub merge: bool,
    /// Replace existing records whose term matches an imported one.
    pub overwrite: bool,
    /// Format to decode; inferred from the text and file name when unset.
    pub format: Option<Format>,
    /// How strictly candidates are checked.
    pub validation: ValidationMode,
    /// Reconcile and report without persisting.
    pub dry_run: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            merge: true,
            overwrite: false,
            format: None,
            validation: ValidationMode::Permissive,
            dry_run: false,
        }
    }
}

impl ImportOptions {
    /// Sets merge mode.
    #[must_use]
    pub const fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    /// Sets overwrite mode.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Forces a format instead of inferring one.
    #[must_use]
    pub const fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the validation mode.
    #[must_use]
    pub const fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    /// Enables or disables dry run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Result of an import operation.
///
/// `success` counts records added or overwritten and `failed` counts records
/// rejected by validation. A record skipped because its term already exists
/// counts toward neither: it adds a line to `errors` and bumps `skipped`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    /// Records added or overwritten.
    pub success: usize,
    /// Records rejected by validation.
    pub failed: usize,
    /// Records skipped because the term already existed.
    pub skipped: usize,
    /// One line per rejected or skipped record, in source order.
    pub errors: Vec<String>,
    /// Non-fatal findings on accepted records.
    pub warnings: Vec<String>,
}

impl ImportResult {
    /// Creates an empty result.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            success: 0,
            failed: 0,
            skipped: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns the number of candidates processed.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.success + self.failed + self.skipped
    }

    /// Returns whether any errors occurred.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Reconciles decoded candidates against a base collection.
///
/// Starts from `base` when merging and from an empty collection otherwise,
/// then applies each candidate in order: invalid ones are counted as failed,
/// new terms are appended, and existing terms are replaced in place when
/// overwriting or skipped otherwise. Terms stay unique throughout, including
/// between candidates of the same import.
#[must_use]
pub fn reconcile(
    candidates: Vec<Candidate>,
    options: &ImportOptions,
    base: Vec<Keyword>,
) -> (Vec<Keyword>, ImportResult) {
    let validator = ImportValidator::new(options.validation);
    let mut result = ImportResult::new();

    let mut working = if options.merge { base } else { Vec::new() };
    let mut index: HashMap<String, usize> = working
        .iter()
        .enumerate()
        .map(|(i, k)| (k.term.clone(), i))
        .collect();

    for candidate in candidates {
        let position = candidate.position;
        let validation = validator.validate(&candidate);

        for issue in validation.warnings() {
            result
                .warnings
                .push(format!("position {position}: {}", issue.message));
        }

        let Some(keyword) = validation.keyword else {
            let cause = validation
                .first_error()
                .map_or("invalid record format", |issue| issue.message.as_str());
            result.failed += 1;
            result.errors.push(format!("position {position}: {cause}"));
            continue;
        };

        match index.get(&keyword.term) {
            Some(&i) if options.overwrite => {
                working[i] = keyword;
                result.success += 1;
            },
            Some(_) => {
                result.skipped += 1;
                result.errors.push(format!(
                    "position {position}: term '{}' already exists, skipped",
                    keyword.term
                ));
            },
            None => {
                index.insert(keyword.term.clone(), working.len());
                working.push(keyword);
                result.success += 1;
            },
        }
    }

    (working, result)
}

/// Service for importing keywords from text or files.
pub struct ImportService {
    /// Collection the import is applied to.
    keywords: Arc<KeywordService>,
}

impl ImportService {
    /// Creates a new import service.
    #[must_use]
    pub const fn new(keywords: Arc<KeywordService>) -> Self {
        Self { keywords }
    }

    /// Imports keywords from a file.
    ///
    /// The file name takes part in format inference.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or as
    /// [`ImportService::import_text`].
    pub fn import_file(&self, path: &Path, options: &ImportOptions) -> Result<ImportResult> {
        let text =
            std::fs::read_to_string(path).map_err(|e| Error::operation("read_import_file", e))?;
        let filename = path.file_name().and_then(|n| n.to_str());
        self.import_text(&text, filename, options)
    }

    /// Imports keywords from text.
    ///
    /// Per-record problems are reported in the result. The collection is
    /// persisted after every candidate is processed, unless this is a dry run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the text is empty or has no recoverable
    /// structure, [`Error::InvalidInput`] if the format cannot be imported,
    /// or [`Error::OperationFailed`] if persisting fails. The stored
    /// collection is unchanged on error.
    pub fn import_text(
        &self,
        text: &str,
        filename: Option<&str>,
        options: &ImportOptions,
    ) -> Result<ImportResult> {
        let start = Instant::now();
        let format = options
            .format
            .unwrap_or_else(|| Format::infer(text, filename));
        let candidates = Self::decode(text, format)?;

        tracing::debug!(
            format = %format,
            candidates = candidates.len(),
            merge = options.merge,
            overwrite = options.overwrite,
            "Decoded import"
        );

        let result = self.keywords.transaction(!options.dry_run, |base| {
            reconcile(candidates, options, base)
        })?;

        Self::record_metrics(format, &result, start);
        tracing::info!(
            format = %format,
            success = result.success,
            failed = result.failed,
            skipped = result.skipped,
            dry_run = options.dry_run,
            "Import completed"
        );
        Ok(result)
    }

    /// Decodes text without touching the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is export-only, the text is empty, or
    /// the decoder finds no recoverable structure.
    pub fn decode(text: &str, format: Format) -> Result<Vec<Candidate>> {
        if !format.supports_import() {
            return Err(Error::InvalidInput(format!(
                "{format} files cannot be imported"
            )));
        }
        if strip_bom(text.trim_start()).trim().is_empty() {
            return Err(Error::Decode {
                format: format.name(),
                message: "import text is empty".to_string(),
            });
        }
        create_decoder(format)?.decode(text)
    }

    #[allow(clippy::cast_precision_loss)]
    fn record_metrics(format: Format, result: &ImportResult, start: Instant) {
        metrics::counter!("keywords_imports_total", "format" => format.name()).increment(1);
        metrics::counter!("keywords_import_records_total", "outcome" => "success")
            .increment(result.success as u64);
        metrics::counter!("keywords_import_records_total", "outcome" => "failed")
            .increment(result.failed as u64);
        metrics::counter!("keywords_import_records_total", "outcome" => "skipped")
            .increment(result.skipped as u64);
        metrics::histogram!("keywords_import_duration_ms", "format" => format.name())
            .record(start.elapsed().as_millis() as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn record(term: &str, description: &str) -> serde_json::Value {
        json!({
            "term": term, "category": "meta-thinking", "depth": "expert",
            "description": description, "examples": [], "related": [],
            "cognitiveImpact": "", "crossDomains": []
        })
    }

    fn candidates(values: Vec<serde_json::Value>) -> Vec<Candidate> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Candidate::new(i + 1, v))
            .collect()
    }

    fn empty_service() -> ImportService {
        let keywords = KeywordService::new(MemoryStore::new());
        keywords.replace_all(Vec::new()).unwrap();
        ImportService::new(Arc::new(keywords))
    }

    #[test]
    fn test_import_options_defaults() {
        let options = ImportOptions::default();
        assert!(options.merge);
        assert!(!options.overwrite);
        assert!(options.format.is_none());
        assert_eq!(options.validation, ValidationMode::Permissive);
        assert!(!options.dry_run);
    }

    #[test]
    fn test_reconcile_skip_is_neither_success_nor_failure() {
        let base = vec![Keyword::new("A", "old")];
        let (merged, result) = reconcile(
            candidates(vec![record("A", "new"), record("B", "b")]),
            &ImportOptions::default(),
            base,
        );

        assert_eq!(result.success, 1);
        assert_eq!(result.failed, 0);
        assert_eq!(result.skipped, 1);
        assert_eq!(
            result.errors,
            vec!["position 1: term 'A' already exists, skipped"]
        );
        assert_eq!(merged[0].description, "old");
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_reconcile_overwrite_replaces_in_place() {
        let base = vec![Keyword::new("A", "old"), Keyword::new("Z", "z")];
        let (merged, result) = reconcile(
            candidates(vec![record("A", "new")]),
            &ImportOptions::default().with_overwrite(true),
            base,
        );

        assert_eq!(result.success, 1);
        assert!(result.errors.is_empty());
        assert_eq!(merged[0].term, "A");
        assert_eq!(merged[0].description, "new");
        assert_eq!(merged[1].term, "Z");
    }

    #[test]
    fn test_reconcile_replace_mode_ignores_base() {
        let base = vec![Keyword::new("A", "old")];
        let (merged, result) = reconcile(
            candidates(vec![record("B", "b")]),
            &ImportOptions::default().with_merge(false),
            base,
        );
        assert_eq!(result.success, 1);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].term, "B");
    }

    #[test]
    fn test_reconcile_dedupes_within_one_import() {
        let (merged, result) = reconcile(
            candidates(vec![record("A", "1"), record("A", "2")]),
            &ImportOptions::default().with_merge(false),
            Vec::new(),
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].description, "1");
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_reconcile_counts_invalid_records() {
        let (merged, result) = reconcile(
            candidates(vec![json!({"term": "A"}), json!(7), record("B", "b")]),
            &ImportOptions::default(),
            Vec::new(),
        );
        assert_eq!(result.failed, 2);
        assert_eq!(result.success, 1);
        assert!(result.errors[0].starts_with("position 1: invalid record format"));
        assert!(result.errors[1].starts_with("position 2: invalid record format"));
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_strict_mode_rejects_unknown_tags() {
        let mut value = record("A", "a");
        value["category"] = json!("c1");
        let options = ImportOptions::default().with_validation(ValidationMode::Strict);
        let (_, result) = reconcile(candidates(vec![value.clone()]), &options, Vec::new());
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors, vec!["position 1: unknown category 'c1'"]);

        let (_, result) = reconcile(candidates(vec![value]), &ImportOptions::default(), Vec::new());
        assert_eq!(result.success, 1);
        assert_eq!(result.warnings, vec!["position 1: unknown category 'c1'"]);
    }

    #[test]
    fn test_import_text_persists() {
        let service = empty_service();
        let text = serde_json::to_string(&vec![record("A", "a")]).unwrap();
        let result = service
            .import_text(&text, None, &ImportOptions::default())
            .unwrap();
        assert_eq!(result.success, 1);
        assert_eq!(service.keywords.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_dry_run_does_not_persist() {
        let service = empty_service();
        let text = serde_json::to_string(&vec![record("A", "a")]).unwrap();
        let result = service
            .import_text(&text, None, &ImportOptions::default().with_dry_run(true))
            .unwrap();
        assert_eq!(result.success, 1);
        assert!(service.keywords.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_empty_text_is_decode_error() {
        let service = empty_service();
        for text in ["", "   \n", "\u{feff}"] {
            assert!(matches!(
                service.import_text(text, None, &ImportOptions::default()),
                Err(Error::Decode { .. })
            ));
        }
    }

    #[test]
    fn test_excel_import_rejected() {
        let service = empty_service();
        let options = ImportOptions::default().with_format(Format::ExcelXml);
        assert!(matches!(
            service.import_text("<xml/>", None, &options),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_import_result_total() {
        let result = ImportResult {
            success: 2,
            failed: 1,
            skipped: 3,
            ..ImportResult::new()
        };
        assert_eq!(result.total(), 6);
        assert!(!result.has_errors());
    }
}
