//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty (or whitespace only) when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length in characters
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., UUID)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Unknown enum variant read from storage or input
    InvalidVariant { field: &'static str, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "comment",
            max: 2000,
        };
        assert_eq!(
            err.to_string(),
            "comment exceeds maximum length of 2000 characters"
        );

        let err = ValidationError::Empty { field: "content" };
        assert_eq!(err.to_string(), "content cannot be empty");
    }
}
