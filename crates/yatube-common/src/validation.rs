//! Input validation utilities.
//!
//! Centralized validation helpers used by the authoring service, the CLI and API routes.

use std::sync::LazyLock;

use validator::Validate;

use crate::error::YatubeError;

pub(crate) static SLUG_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern compiles"));

pub(crate) static USERNAME_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[\w.@+-]+$").expect("username pattern compiles"));

/// Validate a request body, returning a YatubeError::Validation on failure.
pub fn validate_request<T: Validate>(body: &T) -> Result<(), YatubeError> {
    body.validate().map_err(first_field_error)
}

/// Reduce validator output to the first failing field and its message.
fn first_field_error(errors: validator::ValidationErrors) -> YatubeError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    match fields.first() {
        Some((field, errs)) => {
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for '{field}'"));
            YatubeError::validation(field, message)
        }
        None => YatubeError::validation("__all__", "Invalid request"),
    }
}

/// Require a non-blank text field. Returns the value with surrounding whitespace stripped.
pub fn required_text(field: &str, value: &str) -> Result<String, YatubeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(YatubeError::validation(field, "This field is required."));
    }
    Ok(trimmed.to_string())
}

/// Validate a username (letters, digits and `@ . + - _`, at most 150 chars).
pub fn validate_username(username: &str) -> Result<(), YatubeError> {
    if !USERNAME_REGEX.is_match(username) || username.chars().count() > 150 {
        return Err(YatubeError::validation(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_strips_and_rejects_blank() {
        assert_eq!(required_text("text", "  hello \n").unwrap(), "hello");
        assert!(matches!(
            required_text("text", "   \t"),
            Err(YatubeError::Validation { ref field, .. }) if field == "text"
        ));
        assert!(required_text("text", "").is_err());
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("leo.tolstoy+1@x").is_ok());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("").is_err());
    }
}
