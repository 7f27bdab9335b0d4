//! Schema and query interpretation errors

/// Errors raised while interpreting column schemas, relations or queries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// A column has an empty key.
    #[error("Column at position {index} has an empty key")]
    EmptyKey { index: usize },

    /// Two columns share the same key.
    #[error("Duplicate column key '{key}'")]
    DuplicateKey { key: String },

    /// The column list could not be read from configuration.
    #[error("Malformed column list: {0}")]
    Malformed(String),

    /// An unknown column type name.
    #[error("Unknown column type '{0}'")]
    UnknownColumnType(String),

    /// An unknown relation name.
    #[error("Unknown relation '{0}'")]
    UnknownRelation(String),

    /// An unknown sort order name.
    #[error("Unknown sort order '{0}'")]
    UnknownOrder(String),

    /// A query segment could not be parsed.
    #[error("Invalid query segment '{0}'")]
    InvalidQuery(String),
}
