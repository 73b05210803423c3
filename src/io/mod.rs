//! Import/Export I/O subsystem.
//!
//! Moves the keyword collection in and out of textual formats.
//!
//! # Architecture
//!
//! - **Format adapters** implement [`KeywordDecoder`] and [`KeywordEncoder`]
//! - **Validation layer** decides which decoded candidates are accepted
//! - **Services** orchestrate decoding, reconciliation, and storage
//!
//! # Supported Formats
//!
//! | Format | Import | Export | Notes |
//! |--------|--------|--------|-------|
//! | JSON | ✓ | ✓ | Top-level array, pretty-printed on export |
//! | CSV | ✓ | ✓ | Header-mapped columns, `;`-separated lists |
//! | Markdown | ✓ | ✓ | One `##` section per record, labelled fields |
//! | Excel XML | - | ✓ | `SpreadsheetML` 2003 workbook |
//!
//! Decoding is all-or-nothing only at the document level: text with no
//! recoverable structure is rejected before anything is stored, while a bad
//! record is reported by position and the rest of the import proceeds.
//!
//! # Examples
//!
//! ```rust,ignore
//! use magic_keywords::io::{ExportService, Format, ImportOptions, ImportService};
//!
//! let importer = ImportService::new(Arc::clone(&keywords));
//! let result = importer.import_text(&text, Some("cards.csv"), &ImportOptions::default())?;
//! println!("{} imported, {} failed", result.success, result.failed);
//!
//! let markdown = ExportService::new(keywords).export(Format::Markdown)?;
//! ```

pub mod formats;
pub mod services;
pub mod traits;
pub mod validation;

pub use formats::Format;
pub use services::{
    ExportOptions, ExportResult, ExportService, ImportOptions, ImportResult, ImportService,
};
pub use traits::{Candidate, KeywordDecoder, KeywordEncoder};
pub use validation::{ImportValidator, ValidationMode};
