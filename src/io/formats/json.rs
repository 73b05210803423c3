//! JSON format adapter for import/export.
//!
//! Imports a top-level array of record objects; exports the collection as a
//! pretty-printed array with two-space indentation.

use super::strip_bom;
use crate::io::traits::{Candidate, KeywordDecoder, KeywordEncoder};
use crate::models::Keyword;
use crate::{Error, Result};
use serde_json::Value;

/// JSON codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl KeywordDecoder for JsonCodec {
    fn decode(&self, text: &str) -> Result<Vec<Candidate>> {
        let value: Value = serde_json::from_str(strip_bom(text)).map_err(|e| Error::Decode {
            format: "json",
            message: e.to_string(),
        })?;

        let Value::Array(items) = value else {
            return Err(Error::Decode {
                format: "json",
                message: "top-level value must be an array".to_string(),
            });
        };

        Ok(items
            .into_iter()
            .enumerate()
            .map(|(i, value)| Candidate::new(i + 1, value))
            .collect())
    }
}

impl KeywordEncoder for JsonCodec {
    fn encode(&self, keywords: &[Keyword]) -> Result<String> {
        serde_json::to_string_pretty(keywords).map_err(|e| Error::operation("serialize_json", e))
    }
}
