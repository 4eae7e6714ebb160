//! Error types for Nibble core.

/// The main error type for Nibble core operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NibbleError {
    /// Scheduler-related error.
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
    /// Color parsing error.
    #[error("Color error: {0}")]
    Color(#[from] ColorParseError),
}

/// Scheduler-specific errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    /// The task ID is invalid, has already run, or was cancelled.
    #[error("Invalid or expired scheduled task ID")]
    InvalidTaskId,
}

/// Errors produced when parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    /// The string does not start with `#`.
    #[error("color '{0}' must start with '#'")]
    MissingHash(String),
    /// The string has the wrong number of hex digits.
    #[error("color '{input}' has {len} hex digits, expected 3 or 6")]
    InvalidLength { input: String, len: usize },
    /// The string contains a non-hex character.
    #[error("color '{0}' contains a non-hexadecimal digit")]
    InvalidDigit(String),
}

impl ColorParseError {
    /// Create a length error.
    pub fn invalid_length(input: impl Into<String>, len: usize) -> Self {
        Self::InvalidLength {
            input: input.into(),
            len,
        }
    }
}

/// A specialized Result type for Nibble core operations.
pub type Result<T> = std::result::Result<T, NibbleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err: NibbleError = SchedulerError::InvalidTaskId.into();
        assert_eq!(
            err.to_string(),
            "Scheduler error: Invalid or expired scheduled task ID"
        );

        let err = ColorParseError::invalid_length("#ABCD", 4);
        assert_eq!(
            err.to_string(),
            "color '#ABCD' has 4 hex digits, expected 3 or 6"
        );
    }
}
