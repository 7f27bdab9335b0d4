//! FieldError for typed field values

/// Error type for text that does not name a valid field value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// The field's text is not one of the accepted values.
    #[error("Field '{field}' has invalid value '{value}'")]
    Invalid { field: String, value: String },
}

impl FieldError {
    /// Creates a new invalid value error.
    pub fn invalid(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            value: value.into(),
        }
    }
}
