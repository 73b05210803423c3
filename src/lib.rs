//! # Magic Keywords
//!
//! Storage and data-interchange core for a catalog of knowledge cards.
//!
//! Each card is a [`Keyword`]: a term with a category, a depth tier, a
//! description, and lists of examples, related terms and cross-domain tags.
//! The crate keeps one collection of keywords in an injected key-value store
//! and moves it in and out of four textual formats.
//!
//! ## Features
//!
//! - CRUD and statistics over a persisted collection ([`KeywordService`])
//! - JSON, CSV and Markdown import with per-record error reporting
//! - JSON, CSV, Markdown and Excel-XML (SpreadsheetML) export
//! - Merge/overwrite conflict policy for imports
//! - Pluggable storage backends (in-memory, filesystem)
//!
//! ## Example
//!
//! ```rust,ignore
//! use magic_keywords::io::{ImportOptions, ImportService};
//! use magic_keywords::storage::MemoryStore;
//! use magic_keywords::KeywordService;
//! use std::sync::Arc;
//!
//! let service = Arc::new(KeywordService::new(MemoryStore::new()));
//! let importer = ImportService::new(Arc::clone(&service));
//! let result = importer.import_text(csv_text, Some("cards.csv"), &ImportOptions::default())?;
//! println!("imported {} cards, {} failed", result.success, result.failed);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod data;
pub mod io;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::KeywordsConfig;
pub use io::{Format, ImportOptions, ImportResult};
pub use models::{Category, Depth, Keyword, KeywordFilter, KeywordStatistics, KeywordUpdate};
pub use services::KeywordService;
pub use storage::{FilesystemStore, KeyValueStore, MemoryStore};

/// Error type for keyword catalog operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Bad arguments, unknown format names, importing an export-only format |
/// | `Decode` | Import text has no recoverable structure (non-array JSON, too few CSV lines) |
/// | `DuplicateKey` | Creating a term that exists, or renaming onto an existing term |
/// | `NotFound` | Updating a term that does not exist |
/// | `OperationFailed` | Storage reads/writes, file I/O, serialization |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Import text could not be decoded at all.
    ///
    /// Aborts an import before any record is reconciled, so the stored
    /// collection is left untouched.
    #[error("failed to decode {format} import: {message}")]
    Decode {
        /// Name of the format being decoded.
        format: &'static str,
        /// What was wrong with the text.
        message: String,
    },

    /// A keyword with this term already exists.
    #[error("keyword \"{0}\" already exists")]
    DuplicateKey(String),

    /// No keyword with this term exists.
    #[error("keyword \"{0}\" not found")]
    NotFound(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - The key-value store cannot be read or written
    /// - Import/export files cannot be opened
    /// - The collection cannot be serialized
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from an operation name and any displayable cause.
    pub fn operation(operation: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for keyword catalog operations.
pub type Result<T> = std::result::Result<T, Error>;
