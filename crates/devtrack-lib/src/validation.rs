//! Validation helpers.
//!
//! These routines check caller-supplied fields and return structured
//! validation errors without touching the store.

use crate::error::{DevTrackError, Result, ValidationError};

pub const MAX_TITLE_LEN: usize = 500;
pub const MAX_DESCRIPTION_LEN: usize = 102_400;
pub const MIN_KEY_LEN: usize = 2;
pub const MAX_KEY_LEN: usize = 10;

/// Validates fields of a new issue.
pub struct IssueValidator;

impl IssueValidator {
    /// # Errors
    ///
    /// Returns `Validation`/`ValidationErrors` listing every violated rule.
    pub fn validate(title: &str, description: Option<&str>) -> Result<()> {
        let mut errors = Vec::new();

        if title.trim().is_empty() {
            errors.push(ValidationError::new("title", "cannot be empty"));
        }
        if title.len() > MAX_TITLE_LEN {
            errors.push(ValidationError::new("title", "exceeds 500 characters"));
        }
        if description.is_some_and(|d| d.len() > MAX_DESCRIPTION_LEN) {
            errors.push(ValidationError::new("description", "exceeds 100KB"));
        }

        finish(errors)
    }
}

/// Validates fields of a new project.
pub struct ProjectValidator;

impl ProjectValidator {
    /// # Errors
    ///
    /// Returns `Validation`/`ValidationErrors` listing every violated rule.
    pub fn validate(name: &str, key: &str) -> Result<()> {
        let mut errors = Vec::new();

        if name.trim().is_empty() {
            errors.push(ValidationError::new("name", "cannot be empty"));
        }
        if let Err(err) = Self::validate_key(key) {
            errors.push(err);
        }

        finish(errors)
    }

    /// A key is 2-10 characters of `A-Z` and `0-9`.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the key is invalid.
    pub fn validate_key(key: &str) -> std::result::Result<(), ValidationError> {
        if !(MIN_KEY_LEN..=MAX_KEY_LEN).contains(&key.len()) {
            return Err(ValidationError::new("key", "must be 2-10 characters"));
        }
        if !key
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(ValidationError::new(
                "key",
                "invalid characters (only A-Z and 0-9 allowed)",
            ));
        }
        Ok(())
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DevTrackError::from_validation_errors(errors))
    }
}
