//! Common validation utilities.

use validator::ValidationError;

/// Validates that a text value contains at least one non-whitespace character.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Value is required and cannot be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a phone number carries at least one digit.
///
/// Character set and length are checked separately by the model's regex rule;
/// this rejects values like `"---"` or `"( )"` that pass the pattern alone.
pub fn validate_contains_digit(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_digits");
        err.message = Some("Phone number must contain at least one digit".into());
        Err(err)
    }
}
