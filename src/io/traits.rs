//! Core traits for import/export operations.
//!
//! Defines the [`KeywordDecoder`] and [`KeywordEncoder`] traits that format
//! adapters implement, and the [`Candidate`] they decode into.

use crate::Result;
use crate::models::Keyword;
use serde_json::Value;

/// A decoded, not yet validated record.
///
/// Decoders produce candidates as loosely typed JSON objects so that
/// field-level problems surface during reconciliation, one per position,
/// instead of aborting the whole decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// 1-based source position: array index for JSON, line number for CSV
    /// (the header is line 1), section index for Markdown.
    pub position: usize,
    /// The raw record.
    pub value: Value,
    /// Whether `term` and `description` must be non-empty strings.
    ///
    /// Set by decoders whose format always yields both fields, so that an
    /// empty value means the source was missing it.
    pub require_content: bool,
}

impl Candidate {
    /// Creates a candidate at the given position.
    #[must_use]
    pub const fn new(position: usize, value: Value) -> Self {
        Self {
            position,
            value,
            require_content: false,
        }
    }

    /// Marks the candidate as requiring non-empty term and description.
    #[must_use]
    pub const fn requiring_content(mut self) -> Self {
        self.require_content = true;
        self
    }

    /// Returns the candidate's term, if it has a string one.
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        self.value.get("term").and_then(Value::as_str)
    }
}

/// Decodes import text into candidates.
///
/// Implementations return [`crate::Error::Decode`] only when the text has no
/// recoverable structure at all. Anything wrong with an individual record is
/// left for validation.
pub trait KeywordDecoder {
    /// Decodes `text` into candidates in source order.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the text has no recoverable structure.
    fn decode(&self, text: &str) -> Result<Vec<Candidate>>;
}

/// Encodes a collection into export text.
pub trait KeywordEncoder {
    /// Encodes the keywords in order.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn encode(&self, keywords: &[Keyword]) -> Result<String>;
}
