//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., CPF digits)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Date isn't a real DD/MM/YYYY calendar date
    InvalidDate { field: &'static str, value: String },

    /// Date lies after today
    FutureDate { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidDate { field, value } => {
                write!(f, "{} '{}' is not a valid DD/MM/YYYY date", field, value)
            }
            Self::FutureDate { field } => write!(f, "{} cannot be in the future", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim `raw` and enforce non-empty plus a character limit.
pub(crate) fn bounded_text(
    raw: &str,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}
