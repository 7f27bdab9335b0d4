use std::process;

use tatua_lib::error::Error;
use tatua_lib::error::FetchError;
use tatua_lib::error::StoreError;
use tatua_lib::error::ValidationErrors;

/// Errors that end a command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Lib(#[from] Error),

    /// No ticket with this id.
    #[error("Ticket {0} not found")]
    NotFound(u64),

    /// The platform data directory could not be determined.
    #[error("Cannot determine a data directory; pass --store")]
    NoDataDir,

    /// Arguments that parse but make no sense together.
    #[error("{0}")]
    Usage(String),
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { id } => Self::NotFound(id),
            other => Self::Lib(other.into()),
        }
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        Self::Lib(e.into())
    }
}

impl From<ValidationErrors> for CliError {
    fn from(e: ValidationErrors) -> Self {
        Self::Lib(e.into())
    }
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}

/// Prints the error to stderr and exits.
pub fn exit_with_error(e: CliError) -> ! {
    log::error!("{}", e);
    eprintln!("error: {}", e);
    process::exit(e.exit_code());
}
