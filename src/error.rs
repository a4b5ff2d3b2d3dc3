//! Unified error hierarchy for VitalRS
//!
//! The calculation engines are total and never fail. Errors only arise at the
//! boundary: validating user input, parsing categorical tags, and reading or
//! writing configuration.

use thiserror::Error;

/// Top-level error type for all VitalRS boundary operations
#[derive(Debug, Error)]
pub enum VitalsError {
    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Unrecognized categorical value
    #[error("Parse error: {kind} '{value}' is not recognized")]
    Parse { kind: String, value: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Measurement validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Measurement must be strictly positive
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: String, value: f64 },

    /// Measurement outside its accepted range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    /// A measurement required by the chosen method is absent
    #[error("Missing measurement: {field}")]
    Missing { field: String },
}

/// Result type alias for VitalRS boundary operations
pub type Result<T> = std::result::Result<T, VitalsError>;

impl VitalsError {
    /// Shorthand for a parse failure on a categorical tag
    pub fn parse(kind: impl Into<String>, value: impl Into<String>) -> Self {
        VitalsError::Parse {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VitalsError::Validation(_) => ErrorSeverity::Warning,
            VitalsError::Parse { .. } => ErrorSeverity::Warning,
            VitalsError::Configuration(_) => ErrorSeverity::Error,
            VitalsError::Io(_) => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            VitalsError::Validation(ValidationError::NotPositive { field, .. }) => {
                format!("Please enter a {} greater than zero.", field)
            }
            VitalsError::Validation(ValidationError::Missing { field }) => {
                format!("The {} measurement is required for this calculation.", field)
            }
            VitalsError::Parse { kind, value } => {
                format!("'{}' is not a valid {}.", value, kind)
            }
            VitalsError::Configuration(_) => {
                "The configuration file is invalid. Fix it or run `vitalrs config init --force`.".to_string()
            }
            VitalsError::Io(err) if err.kind() == std::io::ErrorKind::NotFound => {
                "A required file was not found.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation
    Error,
    /// Bad input the user can correct
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = VitalsError::from(ValidationError::NotPositive {
            field: "weight".to_string(),
            value: 0.0,
        });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = VitalsError::Configuration("bad toml".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_user_messages() {
        let err = VitalsError::from(ValidationError::Missing {
            field: "hip".to_string(),
        });
        assert!(err.user_message().contains("hip"));

        let err = VitalsError::parse("activity level", "couch");
        assert_eq!(err.user_message(), "'couch' is not a valid activity level.");
    }

    #[test]
    fn test_io_errors() {
        let err = VitalsError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(err.user_message(), "A required file was not found.");

        let err = VitalsError::Configuration("expected `]`".to_string());
        assert!(err.user_message().contains("config init"));
    }
}
