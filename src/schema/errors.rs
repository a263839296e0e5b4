//! Model error types
//!
//! Two disjoint kinds:
//! - MODEL_MISUSE: a schema was declared in a way the engine does not accept
//! - MODEL_VIOLATION: a value failed validation or conversion
//!
//! Both are fail-fast. Nothing here aggregates multiple failures.
//!
//! Loading declaration files adds I/O and JSON failures on top, see
//! [`LoaderError`].

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Programming error in a schema declaration
    Misuse,
    /// Bad data presented to a field or model
    Violation,
}

impl ErrorKind {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Misuse => "MODEL_MISUSE",
            ErrorKind::Violation => "MODEL_VIOLATION",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error raised by field and model operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The schema itself is illegal
    #[error("[MODEL_MISUSE] {message}")]
    Misuse { message: String },

    /// A value does not match its field definition
    #[error("[MODEL_VIOLATION] field '{field}': {message}")]
    Violation { field: String, message: String },
}

impl ModelError {
    pub fn misuse(message: impl Into<String>) -> Self {
        ModelError::Misuse {
            message: message.into(),
        }
    }

    pub fn violation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ModelError::Violation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Value is null but the field does not allow null
    pub fn null_value(field: impl Into<String>) -> Self {
        Self::violation(field, "value is null but null is not allowed")
    }

    /// Value is missing but the field is required
    pub fn missing_required(field: impl Into<String>) -> Self {
        Self::violation(field, "value is not set but it is required")
    }

    pub fn type_mismatch(field: impl Into<String>, expected: &str, actual: &str) -> Self {
        Self::violation(field, format!("expected {}, got {}", expected, actual))
    }

    pub fn count_out_of_bounds(
        field: impl Into<String>,
        minimum: Option<usize>,
        maximum: Option<usize>,
        count: usize,
    ) -> Self {
        let upper = maximum.map_or_else(|| "unbounded".to_string(), |m| m.to_string());
        Self::violation(
            field,
            format!(
                "element count {} outside of bounds [{}, {}]",
                count,
                minimum.unwrap_or(0),
                upper
            ),
        )
    }

    /// Returns the error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::Misuse { .. } => ErrorKind::Misuse,
            ModelError::Violation { .. } => ErrorKind::Violation,
        }
    }

    pub fn is_misuse(&self) -> bool {
        self.kind() == ErrorKind::Misuse
    }

    pub fn is_violation(&self) -> bool {
        self.kind() == ErrorKind::Violation
    }

    /// Path of the offending field, for violations
    pub fn field(&self) -> Option<&str> {
        match self {
            ModelError::Misuse { .. } => None,
            ModelError::Violation { field, .. } => Some(field),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ModelError::Misuse { message } | ModelError::Violation { message, .. } => message,
        }
    }

    /// Re-attributes a violation raised inside a nested model to the outer field.
    ///
    /// `basic` + `message` becomes `basic.message`. Misuse errors pass through.
    pub fn nested_under(self, outer: &str) -> Self {
        match self {
            ModelError::Violation { field, message } => ModelError::Violation {
                field: format!("{}.{}", outer, field),
                message,
            },
            misuse => misuse,
        }
    }
}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Error raised while loading declaration documents
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid declaration JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("declaration '{}' rejected: {source}", path.display())]
    Declaration { path: PathBuf, source: ModelError },
}

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;
