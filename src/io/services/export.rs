//! Keyword export service.
//!
//! Encodes the stored collection, or a filtered view of it, in any of the
//! export formats.

use crate::io::formats::{Format, create_encoder};
use crate::models::{Keyword, KeywordFilter};
use crate::services::KeywordService;
use crate::{Error, Result};
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;

/// Options for keyword export.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Format to export to.
    pub format: Format,
    /// Only export keywords matching this filter.
    pub filter: Option<KeywordFilter>,
    /// Maximum number of keywords to export.
    pub limit: Option<usize>,
}

impl ExportOptions {
    /// Creates export options with the given format.
    #[must_use]
    pub const fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Sets the filter.
    #[must_use]
    pub fn with_filter(mut self, filter: KeywordFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the maximum number of keywords to export.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Result of an export to a file.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Number of keywords exported.
    pub exported: usize,
    /// Keywords that matched the filter.
    pub total_matched: usize,
    /// Format used for export.
    pub format: Format,
    /// Output path, if written to a file.
    pub output_path: Option<String>,
}

impl ExportResult {
    /// Creates a new export result.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self {
            exported: 0,
            total_matched: 0,
            format,
            output_path: None,
        }
    }

    /// Returns whether any keywords were exported.
    #[must_use]
    pub const fn has_exports(&self) -> bool {
        self.exported > 0
    }
}

/// Service for exporting keywords.
pub struct ExportService {
    /// Collection to export.
    keywords: Arc<KeywordService>,
}

impl ExportService {
    /// Creates a new export service.
    #[must_use]
    pub const fn new(keywords: Arc<KeywordService>) -> Self {
        Self { keywords }
    }

    /// Exports the whole collection as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or encoding fails.
    pub fn export(&self, format: Format) -> Result<String> {
        let keywords = self.keywords.get_all()?;
        Self::encode(&keywords, format)
    }

    /// Exports the selected keywords as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or encoding fails.
    pub fn export_with(&self, options: &ExportOptions) -> Result<(String, ExportResult)> {
        let selected = self.select(options)?;
        let text = Self::encode(&selected.keywords, options.format)?;

        let mut result = ExportResult::new(options.format);
        result.exported = selected.keywords.len();
        result.total_matched = selected.matched;
        Ok((text, result))
    }

    /// Exports the selected keywords to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the file cannot be written.
    pub fn export_to_file(&self, path: &Path, options: &ExportOptions) -> Result<ExportResult> {
        let (text, mut result) = self.export_with(options)?;
        std::fs::write(path, text).map_err(|e| Error::operation("write_export_file", e))?;
        result.output_path = Some(path.display().to_string());

        tracing::info!(
            path = %path.display(),
            format = %options.format,
            exported = result.exported,
            "Export completed"
        );
        Ok(result)
    }

    /// Encodes keywords in the given format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn encode(keywords: &[Keyword], format: Format) -> Result<String> {
        let text = create_encoder(format).encode(keywords)?;
        metrics::counter!("keywords_export_total", "format" => format.name()).increment(1);
        tracing::debug!(format = %format, count = keywords.len(), bytes = text.len(), "Encoded export");
        Ok(text)
    }

    /// Returns the suggested download name, e.g. `magic-keywords-2024-05-01.csv`.
    #[must_use]
    pub fn default_filename(format: Format, date: NaiveDate) -> String {
        format!(
            "magic-keywords-{}.{}",
            date.format("%Y-%m-%d"),
            format.extension()
        )
    }

    fn select(&self, options: &ExportOptions) -> Result<Selection> {
        let mut keywords = match &options.filter {
            Some(filter) => self.keywords.list(filter)?,
            None => self.keywords.get_all()?,
        };
        let matched = keywords.len();
        if let Some(limit) = options.limit {
            keywords.truncate(limit);
        }
        Ok(Selection { keywords, matched })
    }
}

struct Selection {
    keywords: Vec<Keyword>,
    matched: usize,
}
