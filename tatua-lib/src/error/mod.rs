//! Error types

mod fetch;
mod field;
mod schema;
mod store;
mod validation;

pub use fetch::*;
pub use field::*;
pub use schema::*;
pub use store::*;
pub use validation::*;

/// Errors surfaced by the library's collaborators.
///
/// The table engine itself never returns these to callers: schema and fetch
/// failures are logged and degrade to a safe view. They exist for the parts
/// that talk to the outside world (record sources, ticket stores, forms).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A delegated fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A typed field access failed.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A column schema or query could not be interpreted.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Ticket persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A ticket form did not pass validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}
