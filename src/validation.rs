use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;

use crate::error::ApiError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Parses an integer path parameter, rejecting with 400 rather than 404 so
/// `/users/abc` is reported as a malformed ID, not a missing record.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {what} ID")))
}

/// Collects per-field validation messages and renders them as the
/// `errors` map of a 400 response.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_result(self, message: &str) -> Result<(), ApiError> {
        if self.is_empty() {
            return Ok(());
        }
        Err(ApiError::Validation {
            message: message.to_string(),
            errors: json!(self.fields),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("two@@example.com "));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn parse_id_accepts_integers() {
        assert_eq!(parse_id("42", "user").unwrap(), 42);
    }

    #[test]
    fn parse_id_rejects_non_integers() {
        for raw in ["abc", "1.5", "", "9999999999999"] {
            let err = parse_id(raw, "booking").unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Invalid booking ID"));
        }
    }

    #[test]
    fn empty_field_errors_pass() {
        assert!(FieldErrors::new().into_result("Invalid input").is_ok());
    }

    #[test]
    fn field_errors_render_as_map() {
        let mut errors = FieldErrors::new();
        errors.push("email", "Invalid email format");
        errors.push("password", "Password too short");
        errors.push("password", "Password needs a digit");
        let err = errors.into_result("Invalid input").unwrap_err();
        match err {
            ApiError::Validation { message, errors } => {
                assert_eq!(message, "Invalid input");
                assert_eq!(errors["email"][0], "Invalid email format");
                assert_eq!(errors["password"].as_array().unwrap().len(), 2);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
