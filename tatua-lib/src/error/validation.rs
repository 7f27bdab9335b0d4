//! Validation error types

use std::fmt;

/// Error information for a specific field that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Human-readable validation error message.
    pub message: String,
}

impl FieldValidationError {
    /// Creates a new field validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All validation failures collected for one form submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<FieldValidationError>,
}

impl ValidationErrors {
    /// Creates an empty error list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure for a field.
    pub fn push(&mut self, error: FieldValidationError) {
        self.errors.push(error);
    }

    /// Returns `true` if no failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of failures.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns all failures in the order they were found.
    pub fn errors(&self) -> &[FieldValidationError] {
        &self.errors
    }

    /// Returns the failure message for a field, if any.
    pub fn message(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Converts the collected failures into a result.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
