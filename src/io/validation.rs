//! Import validation.
//!
//! Decides whether a decoded [`Candidate`] may enter the collection and
//! converts it into a [`Keyword`].
//!
//! The default [`ValidationMode::Permissive`] only checks the record's
//! shape: every scalar field is a string and every list field is an array.
//! Values are not checked, so a record with `category: "c1"` is accepted.
//! [`ValidationMode::Strict`] additionally rejects unknown tags, empty
//! terms and descriptions, and non-string list elements.

use crate::models::{Category, Depth, Keyword};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use super::traits::Candidate;

/// Record fields that must be strings.
const SCALAR_FIELDS: [&str; 5] = ["term", "category", "depth", "description", "cognitiveImpact"];

/// Record fields that must be arrays.
const LIST_FIELDS: [&str; 3] = ["examples", "related", "crossDomains"];

/// How strictly candidates are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Shape only.
    #[default]
    Permissive,
    /// Shape plus known tags and non-empty content.
    Strict,
}

impl ValidationMode {
    /// Returns the mode name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Permissive => "permissive",
            Self::Strict => "strict",
        }
    }
}

impl FromStr for ValidationMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "permissive" | "lenient" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown validation mode: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    /// Noted, the record is still accepted.
    Warning,
    /// The record is rejected.
    Error,
}

/// A validation issue found during import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The field that has an issue.
    pub field: String,
    /// Description of the issue.
    pub message: String,
    /// Severity of the issue.
    pub severity: ValidationSeverity,
}

impl ValidationIssue {
    /// Creates a warning issue.
    #[must_use]
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Warning,
        }
    }

    /// Creates an error issue.
    #[must_use]
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Error,
        }
    }
}

/// Result of validating a candidate.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// The converted record, present when the candidate is accepted.
    pub keyword: Option<Keyword>,
    /// Issues found, errors first in check order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns whether the candidate was accepted.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.keyword.is_some()
    }

    /// Returns the first error, which is reported as the rejection cause.
    #[must_use]
    pub fn first_error(&self) -> Option<&ValidationIssue> {
        self.issues
            .iter()
            .find(|i| i.severity == ValidationSeverity::Error)
    }

    /// Returns all warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Warning)
    }
}

/// Checks that a value has the record shape.
///
/// True iff the value is an object whose scalar fields are all strings and
/// whose list fields are all arrays. Field values are not inspected.
#[must_use]
pub fn validate(value: &Value) -> bool {
    SCALAR_FIELDS
        .iter()
        .all(|f| value.get(f).is_some_and(Value::is_string))
        && LIST_FIELDS
            .iter()
            .all(|f| value.get(f).is_some_and(Value::is_array))
}

/// Validates candidates for import.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportValidator {
    mode: ValidationMode,
}

impl ImportValidator {
    /// Creates a validator with the given mode.
    #[must_use]
    pub const fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    /// Returns the validation mode.
    #[must_use]
    pub const fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Validates a candidate and converts it on success.
    #[must_use]
    pub fn validate(&self, candidate: &Candidate) -> ValidationResult {
        let mut issues = Vec::new();
        let value = &candidate.value;

        if candidate.require_content && !Self::has_content(value) {
            issues.push(ValidationIssue::error(
                "term",
                "missing required field (term or description)",
            ));
            return ValidationResult {
                keyword: None,
                issues,
            };
        }

        if !validate(value) {
            issues.push(Self::shape_issue(value));
            return ValidationResult {
                keyword: None,
                issues,
            };
        }

        self.check_values(value, &mut issues);

        let rejected = issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Error);
        let keyword = if rejected {
            None
        } else {
            Keyword::from_candidate(value)
        };

        ValidationResult { keyword, issues }
    }

    fn has_content(value: &Value) -> bool {
        ["term", "description"].iter().all(|f| {
            value
                .get(f)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.is_empty())
        })
    }

    /// Describes the first field that breaks the record shape.
    fn shape_issue(value: &Value) -> ValidationIssue {
        if !value.is_object() {
            return ValidationIssue::error("record", "invalid record format: not an object");
        }
        let scalar = SCALAR_FIELDS
            .iter()
            .find(|f| !value.get(**f).is_some_and(Value::is_string))
            .map(|f| (*f, "a string"));
        let list = LIST_FIELDS
            .iter()
            .find(|f| !value.get(**f).is_some_and(Value::is_array))
            .map(|f| (*f, "an array"));

        match scalar.or(list) {
            Some((field, expected)) => ValidationIssue::error(
                field,
                format!("invalid record format: '{field}' must be {expected}"),
            ),
            None => ValidationIssue::error("record", "invalid record format"),
        }
    }

    fn check_values(&self, value: &Value, issues: &mut Vec<ValidationIssue>) {
        let strict = self.mode == ValidationMode::Strict;
        let issue = |field: &str, message: String| {
            if strict {
                ValidationIssue::error(field, message)
            } else {
                ValidationIssue::warning(field, message)
            }
        };

        let text = |field: &str| value.get(field).and_then(Value::as_str).unwrap_or_default();

        let category = text("category");
        if Category::parse(category).is_none() {
            issues.push(issue("category", format!("unknown category '{category}'")));
        }
        let depth = text("depth");
        if Depth::parse(depth).is_none() {
            issues.push(issue("depth", format!("unknown depth '{depth}'")));
        }

        if !strict {
            return;
        }

        for field in ["term", "description"] {
            if text(field).trim().is_empty() {
                issues.push(ValidationIssue::error(field, format!("'{field}' is empty")));
            }
        }
        for field in LIST_FIELDS {
            let all_strings = value
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.iter().all(Value::is_string));
            if !all_strings {
                issues.push(ValidationIssue::error(
                    field,
                    format!("'{field}' must contain only strings"),
                ));
            }
        }
    }
}
