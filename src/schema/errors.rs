//! Schema error types
//!
//! Every schema error is a client error: the payload is rejected and nothing
//! is written.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// One field-level violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetails {
    /// Field path (e.g. "tags[2]")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(field, expected, actual)
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, found {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Schema errors
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// Body is not valid JSON
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Query string could not be decoded
    #[error("Malformed query string: {0}")]
    MalformedQuery(String),

    /// Body is JSON but violates the entity schema
    #[error("Validation failed for {schema}: {}", join_details(.details))]
    ValidationFailed {
        schema: &'static str,
        details: Vec<ValidationDetails>,
    },
}

impl SchemaError {
    pub fn validation_failed(schema: &'static str, details: Vec<ValidationDetails>) -> Self {
        Self::ValidationFailed { schema, details }
    }

    pub fn malformed_body(reason: impl Into<String>) -> Self {
        Self::MalformedBody(reason.into())
    }

    pub fn malformed_query(reason: impl Into<String>) -> Self {
        Self::MalformedQuery(reason.into())
    }

    /// Field-level details, empty for malformed bodies and queries
    pub fn details(&self) -> &[ValidationDetails] {
        match self {
            Self::ValidationFailed { details, .. } => details,
            Self::MalformedBody(_) | Self::MalformedQuery(_) => &[],
        }
    }

    /// Names of the offending fields
    pub fn fields(&self) -> Vec<&str> {
        self.details().iter().map(|d| d.field.as_str()).collect()
    }
}

fn join_details(details: &[ValidationDetails]) -> String {
    details
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
