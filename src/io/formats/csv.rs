//! CSV format adapter for import/export.
//!
//! The first non-blank line is the header; each column is mapped to the
//! record field of the same name. List fields (`examples`, `related`,
//! `crossDomains`) hold `;`-separated items.
//!
//! Quoted fields may span lines. Positions count non-blank records, so the
//! header is 1 and the first data record is 2 regardless of blank lines.

use super::{UTF8_BOM, strip_bom};
use crate::io::traits::{Candidate, KeywordDecoder, KeywordEncoder};
use crate::models::Keyword;
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Column order used on export.
pub const HEADERS: [&str; 8] = [
    "term",
    "category",
    "depth",
    "description",
    "examples",
    "related",
    "cognitiveImpact",
    "crossDomains",
];

/// Columns whose cells hold `;`-separated lists.
const LIST_FIELDS: [&str; 3] = ["examples", "related", "crossDomains"];

/// Separator used when joining list cells on export.
const LIST_JOIN: &str = "; ";

/// CSV codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCodec;

impl CsvCodec {
    fn split_list(cell: &str) -> Value {
        Value::Array(
            cell.split(';')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        )
    }

    /// Reads every non-blank record, the header included.
    fn records(text: &str) -> Result<Vec<csv::StringRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // Allow varying number of fields
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| Error::Decode {
                format: "csv",
                message: e.to_string(),
            })?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            records.push(record);
        }
        Ok(records)
    }
}

impl KeywordDecoder for CsvCodec {
    fn decode(&self, text: &str) -> Result<Vec<Candidate>> {
        let records = Self::records(strip_bom(text))?;

        let Some((headers, rows)) = records.split_first().filter(|(_, rows)| !rows.is_empty())
        else {
            return Err(Error::Decode {
                format: "csv",
                message: "expected a header line and at least one data line".to_string(),
            });
        };

        let candidates = rows
            .iter()
            .enumerate()
            .map(|(i, cells)| {
                let mut record = Map::new();

                for (col, header) in headers.iter().enumerate() {
                    if header.is_empty() {
                        continue;
                    }
                    let cell = cells.get(col).unwrap_or_default();
                    let value = if LIST_FIELDS.contains(&header) {
                        Self::split_list(cell)
                    } else {
                        Value::String(cell.to_string())
                    };
                    record.insert(header.to_string(), value);
                }

                // Record 1 is the header.
                Candidate::new(i + 2, Value::Object(record))
            })
            .collect();

        Ok(candidates)
    }
}

impl KeywordEncoder for CsvCodec {
    fn encode(&self, keywords: &[Keyword]) -> Result<String> {
        let mut out = String::new();
        out.push(UTF8_BOM);
        out.push_str(&HEADERS.join(","));
        out.push('\n');

        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(out.into_bytes());

        for k in keywords {
            writer
                .write_record([
                    k.term.as_str(),
                    k.category.as_str(),
                    k.depth.as_str(),
                    k.description.as_str(),
                    k.examples.join(LIST_JOIN).as_str(),
                    k.related.join(LIST_JOIN).as_str(),
                    k.cognitive_impact.as_str(),
                    k.cross_domains.join(LIST_JOIN).as_str(),
                ])
                .map_err(|e| Error::operation("write_csv_record", e))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::operation("flush_csv", e.error()))?;
        String::from_utf8(bytes).map_err(|e| Error::operation("encode_csv", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_maps_headers_and_lists() {
        let text = "term,category,depth,description,examples,related,cognitiveImpact,crossDomains\n\
                    \"X\",\"c1\",\"d2\",\"desc, with comma\",\"a; b;\",\"\",\"ci\",\"k\"\n";
        let candidates = CsvCodec.decode(text).unwrap();

        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.position, 2);
        assert_eq!(
            c.value,
            json!({
                "term": "X", "category": "c1", "depth": "d2",
                "description": "desc, with comma", "examples": ["a", "b"],
                "related": [], "cognitiveImpact": "ci", "crossDomains": ["k"]
            })
        );
    }

    #[test]
    fn test_decode_missing_cells_become_empty() {
        let candidates = CsvCodec.decode("term,description,related\nonly\n").unwrap();
        assert_eq!(
            candidates[0].value,
            json!({"term": "only", "description": "", "related": []})
        );
    }

    #[test]
    fn test_decode_skips_blank_lines_and_bom() {
        let text = "\u{feff}term,description\n\n  \nA,one\r\n\nB,two\n";
        let candidates = CsvCodec.decode(text).unwrap();
        let terms: Vec<_> = candidates.iter().filter_map(Candidate::term).collect();
        assert_eq!(terms, vec!["A", "B"]);
        assert_eq!(candidates[1].position, 3);
    }

    #[test]
    fn test_decode_unescapes_doubled_quotes() {
        let candidates = CsvCodec
            .decode("term,description\n\"say \"\"hi\"\"\",\"x\"\n")
            .unwrap();
        assert_eq!(candidates[0].term(), Some("say \"hi\""));
    }

    #[test]
    fn test_decode_requires_data_line() {
        assert!(matches!(
            CsvCodec.decode("term,category\n\n"),
            Err(Error::Decode { format: "csv", .. })
        ));
        assert!(CsvCodec.decode("").is_err());
    }

    #[test]
    fn test_encode_layout() {
        let kw = Keyword::new("A \"quoted\", term", "d")
            .with_example("e1")
            .with_example("e2");
        let text = CsvCodec.encode(&[kw]).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("\u{feff}term,category,depth,description,examples,related,cognitiveImpact,crossDomains")
        );
        assert_eq!(
            lines.next(),
            Some(
                "\"A \"\"quoted\"\", term\",\"core-catalysts\",\"foundational\",\"d\",\"e1; e2\",\"\",\"\",\"\""
            )
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_decode_quoted_field_spans_lines() {
        let text = "term,description\n\"A\",\"line one\nline two\"\n\"B\",\"x\"\n";
        let candidates = CsvCodec.decode(text).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].value["description"], "line one\nline two");
        assert_eq!(candidates[1].term(), Some("B"));
        assert_eq!(candidates[1].position, 3);
    }

    #[test]
    fn test_encode_then_decode_preserves_newlines() {
        let kw = Keyword::new("X", "line one\nline two").with_cognitive_impact("a\r\nb");
        let text = CsvCodec.encode(std::slice::from_ref(&kw)).unwrap();
        let candidates = CsvCodec.decode(&text).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(Keyword::from_candidate(&candidates[0].value), Some(kw));
    }

    #[test]
    fn test_encode_then_decode_preserves_commas_and_quotes() {
        let kw = Keyword::new("a, \"b\"", "x, y").with_related("r1").with_related("r2");
        let text = CsvCodec.encode(std::slice::from_ref(&kw)).unwrap();
        let candidates = CsvCodec.decode(&text).unwrap();
        assert_eq!(Keyword::from_candidate(&candidates[0].value), Some(kw));
    }
}
