//! Reusable field validators
//!
//! Drafts and patches are checked here before anything is forwarded to the
//! gateway, so a record that would break filtering or sorting can never be
//! written in the first place.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::error::{FieldError, ValidationError};

/// Implemented by drafts and patches that can be checked before a write
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// The field must contain at least one non-whitespace character
pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        Err(FieldError::new(field, "must not be empty"))
    } else {
        Ok(())
    }
}

/// String length must be within range
pub fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), FieldError> {
    let len = value.chars().count();
    if len < min {
        Err(FieldError::new(
            field,
            format!("must have at least {} characters (currently {})", min, len),
        ))
    } else if len > max {
        Err(FieldError::new(
            field,
            format!("must not exceed {} characters (currently {})", max, len),
        ))
    } else {
        Ok(())
    }
}

/// Year must be a plausible four-digit year
pub fn check_year(field: &'static str, year: i32) -> Result<(), FieldError> {
    if (1000..=9999).contains(&year) {
        Ok(())
    } else {
        Err(FieldError::new(
            field,
            format!("must be a four-digit year (currently {})", year),
        ))
    }
}

/// Value must look like an email address
pub fn check_email(field: &'static str, value: &str) -> Result<(), FieldError> {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
    });

    if regex.is_match(value) {
        Ok(())
    } else {
        Err(FieldError::new(field, "must be a valid email address"))
    }
}
