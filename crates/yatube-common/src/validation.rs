//! Input validation utilities.
//!
//! Centralized validation helpers used by forms and API routes.

use std::collections::BTreeMap;

use serde::Serialize;
use validator::Validate;

use crate::error::YatubeError;

/// Field name → messages, as shown next to each form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl From<validator::ValidationErrors> for FormErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FormErrors::new();
        for (field, errs) in errors.field_errors() {
            for e in errs {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for '{field}'"));
                out.add(&field.to_string(), msg);
            }
        }
        out
    }
}

/// Validate a form, collecting messages per field.
pub fn validate_form<T: Validate>(form: &T) -> Result<(), FormErrors> {
    form.validate().map_err(FormErrors::from)
}

/// Validate a request body, returning a YatubeError::Validation on failure.
pub fn validate_request<T: Validate>(body: &T) -> Result<(), YatubeError> {
    body.validate().map_err(|e| YatubeError::Validation {
        message: format_validation_errors(e),
    })
}

/// Format validation errors into a human-readable string.
fn format_validation_errors(errors: validator::ValidationErrors) -> String {
    FormErrors::from(errors)
        .0
        .into_values()
        .flatten()
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate that a group slug is URL-safe: lowercase letters, digits, hyphens, underscores.
pub fn validate_slug(slug: &str) -> Result<(), YatubeError> {
    if slug.is_empty() {
        return Err(YatubeError::Validation {
            message: "Slug cannot be empty".into(),
        });
    }

    let valid = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');

    if !valid {
        return Err(YatubeError::Validation {
            message: "Slug can only contain lowercase letters, numbers, hyphens and underscores"
                .into(),
        });
    }

    Ok(())
}

/// Text fields count as empty when they hold only whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_accepts_url_safe() {
        assert!(validate_slug("test_slug-5").is_ok());
    }

    #[test]
    fn slug_rejects_spaces_and_uppercase() {
        assert!(validate_slug("Test slug").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn form_errors_group_by_field() {
        let mut errors = FormErrors::new();
        errors.add("text", "This field is required.");
        errors.add("text", "Too short.");
        errors.add("group", "Select a valid choice.");
        assert_eq!(errors.field("text").len(), 2);
        assert_eq!(errors.field("image"), &[] as &[String]);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["group"][0], "Select a valid choice.");
    }
}
