//! Field validation: value kind checks plus the per-field rule chain.
//!
//! Rules run in declaration order and short-circuit on the first failure.
//! The caller gets a human-readable reason; reporting it to the author is
//! the editing tool's job, not ours.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::types::{FieldDefinition, FieldKind};

/// A validation failure for a single field value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValueError {
    /// Field name, with an index suffix for multi-value fields (`tags[1]`).
    pub field: String,
    pub reason: String,
}

impl ValueError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A composable validation predicate attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationRule {
    /// The field must have a value.
    Required,

    /// Minimum character count for text values.
    MinLength { min: usize },

    /// Maximum character count for text values.
    MaxLength { max: usize },

    /// Text must match a regular expression.
    Pattern { pattern: String },

    /// URL scheme must be one of the allowed set (case-sensitive).
    UriScheme { allowed: Vec<String> },
}

impl ValidationRule {
    pub fn min_length(min: usize) -> Self {
        Self::MinLength { min }
    }

    pub fn max_length(max: usize) -> Self {
        Self::MaxLength { max }
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
        }
    }

    pub fn uri_scheme<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::UriScheme {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

/// Validate a candidate value against a field definition.
///
/// `None` (or JSON null) only fails when the chain contains
/// [`ValidationRule::Required`]. Present values are checked against the
/// field kind first, then against each rule in order.
pub fn validate_field(field: &FieldDefinition, value: Option<&Value>) -> Result<(), ValueError> {
    let value = match value {
        None | Some(Value::Null) => {
            if field.is_required() {
                return Err(ValueError::new(&field.name, "a value is required"));
            }
            return Ok(());
        }
        Some(v) => v,
    };

    if field.is_single() {
        return validate_single(&field.name, field, value);
    }

    // Multi-value fields hold an array; every element is checked on its own.
    let Some(items) = value.as_array() else {
        return Err(ValueError::new(&field.name, "expected an array of values"));
    };
    for (i, item) in items.iter().enumerate() {
        validate_single(&format!("{}[{i}]", field.name), field, item)?;
    }
    Ok(())
}

fn validate_single(label: &str, field: &FieldDefinition, value: &Value) -> Result<(), ValueError> {
    check_kind(&field.kind, value).map_err(|reason| ValueError::new(label, reason))?;

    for rule in &field.validation {
        check_rule(rule, value).map_err(|reason| ValueError::new(label, reason))?;
    }
    Ok(())
}

/// Apply one validation rule to a present value.
///
/// Returns the failure reason on its own so callers can attach field
/// context. [`ValidationRule::Required`] always passes here; absence is
/// handled before the chain runs.
pub fn check_rule(rule: &ValidationRule, value: &Value) -> Result<(), String> {
    match rule {
        ValidationRule::Required => Ok(()),

        ValidationRule::MinLength { min } => {
            let text = value.as_str().ok_or("expected text")?;
            if text.chars().count() < *min {
                return Err(format!("shorter than the minimum length {min}"));
            }
            Ok(())
        }

        ValidationRule::MaxLength { max } => {
            let text = value.as_str().ok_or("expected text")?;
            if text.chars().count() > *max {
                return Err(format!("longer than the maximum length {max}"));
            }
            Ok(())
        }

        ValidationRule::Pattern { pattern } => {
            let text = value.as_str().ok_or("expected text")?;
            let re = regex::Regex::new(pattern)
                .map_err(|_| "invalid validation pattern".to_string())?;
            if !re.is_match(text) {
                return Err(format!("does not match the pattern {pattern}"));
            }
            Ok(())
        }

        ValidationRule::UriScheme { allowed } => {
            let text = value.as_str().ok_or("expected a URL string")?;
            url::Url::parse(text).map_err(|_| "not a valid URL".to_string())?;
            // The parser normalizes schemes to lowercase; match against the
            // scheme exactly as authored.
            let raw = text.split_once(':').map(|(s, _)| s).unwrap_or_default();
            if !allowed.iter().any(|a| a == raw) {
                return Err(format!("disallowed scheme \"{raw}\""));
            }
            Ok(())
        }
    }
}

fn check_kind(kind: &FieldKind, value: &Value) -> Result<(), String> {
    match kind {
        FieldKind::Text { max_length } => {
            let text = value.as_str().ok_or("expected text")?;
            if let Some(max) = max_length
                && text.chars().count() > *max
            {
                return Err(format!("text is longer than {max} characters"));
            }
            Ok(())
        }

        FieldKind::RichText { .. } => {
            if !value.is_array() {
                return Err("expected an array of rich text blocks".to_string());
            }
            Ok(())
        }

        FieldKind::Url => {
            let text = value.as_str().ok_or("expected a URL string")?;
            url::Url::parse(text).map_err(|_| "not a valid URL".to_string())?;
            Ok(())
        }

        FieldKind::Boolean => {
            if !value.is_boolean() {
                return Err("expected a boolean".to_string());
            }
            Ok(())
        }

        FieldKind::Number => {
            if !value.is_number() {
                return Err("expected a number".to_string());
            }
            Ok(())
        }

        FieldKind::Datetime => {
            let text = value.as_str().ok_or("expected a datetime string")?;
            chrono::DateTime::parse_from_rfc3339(text)
                .map_err(|_| "not a valid RFC 3339 datetime".to_string())?;
            Ok(())
        }

        // Reference values carry the referenced document's id.
        FieldKind::Reference { .. } => {
            if value.as_str().is_none() {
                return Err("expected a reference id".to_string());
            }
            Ok(())
        }

        FieldKind::Select { options } => {
            let text = value.as_str().ok_or("expected text")?;
            if !options.iter().any(|o| o == text) {
                return Err(format!("\"{text}\" is not one of the allowed values"));
            }
            Ok(())
        }
    }
}
