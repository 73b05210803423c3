//! Format adapters for import/export.
//!
//! Each format implements [`KeywordDecoder`] and/or [`KeywordEncoder`].

pub mod csv;
pub mod excel;
pub mod json;
pub mod markdown;

use crate::{Error, Result};
use std::path::Path;
use std::str::FromStr;

use super::traits::{KeywordDecoder, KeywordEncoder};

/// Byte-order mark written at the start of CSV and Excel-XML exports so that
/// spreadsheet applications detect UTF-8.
pub const UTF8_BOM: char = '\u{FEFF}';

/// Strips a leading byte-order mark, if present.
#[must_use]
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(UTF8_BOM).unwrap_or(text)
}

/// Supported file formats for import/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// JSON array of records.
    #[default]
    Json,
    /// CSV with a header row.
    Csv,
    /// Markdown with one level-2 section per record.
    Markdown,
    /// `SpreadsheetML` 2003 workbook (export only).
    ExcelXml,
}

impl Format {
    /// Returns all formats that can be imported.
    #[must_use]
    pub const fn import_formats() -> &'static [Self] {
        &[Self::Json, Self::Csv, Self::Markdown]
    }

    /// Returns all formats that can be exported.
    #[must_use]
    pub const fn export_formats() -> &'static [Self] {
        &[Self::Json, Self::Csv, Self::Markdown, Self::ExcelXml]
    }

    /// Returns the short name for this format.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Markdown => "markdown",
            Self::ExcelXml => "excel",
        }
    }

    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Markdown => "md",
            Self::ExcelXml => "xls",
        }
    }

    /// Returns the MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv;charset=utf-8",
            Self::Markdown => "text/markdown;charset=utf-8",
            Self::ExcelXml => "application/vnd.ms-excel",
        }
    }

    /// Returns whether this format supports import.
    #[must_use]
    pub const fn supports_import(&self) -> bool {
        !matches!(self, Self::ExcelXml)
    }

    /// Detects format from file extension.
    ///
    /// `.xlsx` maps to CSV: such files are read as CSV text.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is not recognized.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv" | "xlsx") => Ok(Self::Csv),
            Some("md" | "markdown") => Ok(Self::Markdown),
            Some("xls" | "xml") => Ok(Self::ExcelXml),
            Some(ext) => Err(Error::InvalidInput(format!(
                "Unsupported file extension: .{ext}"
            ))),
            None => Err(Error::InvalidInput(
                "Cannot determine format: file has no extension".to_string(),
            )),
        }
    }

    /// Infers the import format from the text and an optional file name.
    ///
    /// CSV wins if the name ends in `.csv`/`.xlsx` or the text starts with
    /// `term,`; Markdown if the name ends in `.md` or the text starts with
    /// `#`; JSON otherwise. A leading BOM and whitespace are ignored.
    #[must_use]
    pub fn infer(text: &str, filename: Option<&str>) -> Self {
        let name = filename.map(str::to_lowercase).unwrap_or_default();
        let start = strip_bom(text.trim_start()).trim_start();

        if name.ends_with(".csv") || name.ends_with(".xlsx") || start.starts_with("term,") {
            Self::Csv
        } else if name.ends_with(".md") || start.starts_with('#') {
            Self::Markdown
        } else {
            Self::Json
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" | "xlsx" => Ok(Self::Csv),
            "md" | "markdown" => Ok(Self::Markdown),
            "xls" | "excel" | "xml" => Ok(Self::ExcelXml),
            _ => Err(Error::InvalidInput(format!("Unknown format: {s}"))),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Creates a decoder for the given format.
///
/// # Errors
///
/// Returns an error if the format doesn't support import.
pub fn create_decoder(format: Format) -> Result<Box<dyn KeywordDecoder>> {
    match format {
        Format::Json => Ok(Box::new(json::JsonCodec)),
        Format::Csv => Ok(Box::new(csv::CsvCodec)),
        Format::Markdown => Ok(Box::new(markdown::MarkdownCodec::new())),
        Format::ExcelXml => Err(Error::InvalidInput(
            "Excel XML is an export-only format".to_string(),
        )),
    }
}

/// Creates an encoder for the given format.
#[must_use]
pub fn create_encoder(format: Format) -> Box<dyn KeywordEncoder> {
    match format {
        Format::Json => Box::new(json::JsonCodec),
        Format::Csv => Box::new(csv::CsvCodec),
        Format::Markdown => Box::new(markdown::MarkdownCodec::new()),
        Format::ExcelXml => Box::new(excel::ExcelXmlCodec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_format_from_str() {
        assert_eq!(Format::from_str("json").unwrap(), Format::Json);
        assert_eq!(Format::from_str("CSV").unwrap(), Format::Csv);
        assert_eq!(Format::from_str("md").unwrap(), Format::Markdown);
        assert_eq!(Format::from_str("excel").unwrap(), Format::ExcelXml);
        assert!(Format::from_str("yaml").is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            Format::from_path(Path::new("a.JSON")).unwrap(),
            Format::Json
        );
        assert_eq!(Format::from_path(Path::new("a.xlsx")).unwrap(), Format::Csv);
        assert_eq!(
            Format::from_path(Path::new("a.md")).unwrap(),
            Format::Markdown
        );
        assert_eq!(
            Format::from_path(Path::new("a.xls")).unwrap(),
            Format::ExcelXml
        );
        assert!(Format::from_path(Path::new("a.txt")).is_err());
        assert!(Format::from_path(Path::new("noext")).is_err());
    }

    #[test_case("[]", None, Format::Json; "json default")]
    #[test_case("anything", Some("cards.CSV"), Format::Csv; "csv by name")]
    #[test_case("[]", Some("cards.xlsx"), Format::Csv; "xlsx read as csv")]
    #[test_case("term,category\n", None, Format::Csv; "csv by header")]
    #[test_case("\u{feff}term,category\n", None, Format::Csv; "csv header after bom")]
    #[test_case("## 1. X", None, Format::Markdown; "markdown by heading")]
    #[test_case("  # Title", None, Format::Markdown; "markdown after whitespace")]
    #[test_case("[]", Some("notes.md"), Format::Markdown; "markdown by name")]
    #[test_case("#x", Some("cards.csv"), Format::Csv; "csv name beats markdown text")]
    #[test_case("{\"a\":1}", Some("cards.txt"), Format::Json; "unknown name falls back to json")]
    fn test_infer(text: &str, filename: Option<&str>, expected: Format) {
        assert_eq!(Format::infer(text, filename), expected);
    }

    #[test]
    fn test_excel_is_export_only() {
        assert!(!Format::ExcelXml.supports_import());
        assert!(create_decoder(Format::ExcelXml).is_err());
        assert!(Format::import_formats().iter().all(Format::supports_import));
        assert_eq!(Format::export_formats().len(), 4);
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom("\u{feff}abc"), "abc");
        assert_eq!(strip_bom("abc"), "abc");
    }
}
