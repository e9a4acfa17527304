//! Field-level validation shared by all drafts.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum length of every string attribute.
pub const MAX_TEXT_LEN: usize = 250;

/// Draft validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Blank { field: &'static str },
    TooLong { field: &'static str, max: usize },
    OutOfRange { field: &'static str, value: f64 },
    EmptyList { field: &'static str },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "`{field}` may not be blank"),
            Self::TooLong { field, max } => {
                write!(f, "`{field}` must have no more than {max} characters")
            }
            Self::OutOfRange { field, value } => write!(f, "`{field}` out of range: {value}"),
            Self::EmptyList { field } => write!(f, "`{field}` may not be empty"),
        }
    }
}

impl Error for ValidationError {}

/// Checks a required string attribute.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    limit_text(field, value)
}

/// Checks the length of an optional string attribute.
pub(crate) fn limit_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{limit_text, require_text, ValidationError, MAX_TEXT_LEN};

    #[test]
    fn require_text_rejects_whitespace_only() {
        assert_eq!(
            require_text("type", "   "),
            Err(ValidationError::Blank { field: "type" })
        );
    }

    #[test]
    fn limit_text_counts_chars_not_bytes() {
        let accented = "é".repeat(MAX_TEXT_LEN);
        assert!(limit_text("location_name", &accented).is_ok());

        let too_long = "a".repeat(MAX_TEXT_LEN + 1);
        assert!(matches!(
            limit_text("location_name", &too_long),
            Err(ValidationError::TooLong { .. })
        ));
    }
}
