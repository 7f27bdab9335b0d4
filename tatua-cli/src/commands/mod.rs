//! Subcommand implementations.

pub mod list;
pub mod refresh;
pub mod tickets;

use std::path::Path;
use std::path::PathBuf;

use tatua_lib::table::TableConfig;
use tatua_lib::tickets::JsonFileStore;
use tatua_lib::tickets::TicketBook;

use crate::cli::Cli;
use crate::cli::Commands;
use crate::error::CliError;
use crate::paths;

/// Resolved locations shared by every subcommand.
#[derive(Debug)]
pub struct Context {
    pub store: JsonFileStore,
    pub config: Option<PathBuf>,
}

impl Context {
    /// Resolves the store and configuration paths from flags or platform defaults.
    pub fn resolve(store: Option<PathBuf>, config: Option<PathBuf>) -> Result<Self, CliError> {
        let store = match store {
            Some(path) => path,
            None => paths::ticket_store().ok_or(CliError::NoDataDir)?,
        };
        let config = config.or_else(|| paths::table_config().filter(|p| p.exists()));
        log::debug!("Ticket store: {}", store.display());

        Ok(Self {
            store: JsonFileStore::new(store),
            config,
        })
    }

    pub async fn book(&self) -> Result<TicketBook, CliError> {
        Ok(TicketBook::load(&self.store).await?)
    }

    pub async fn save(&self, book: &TicketBook) -> Result<(), CliError> {
        Ok(book.save(&self.store).await?)
    }

    /// Loads the table configuration, or the defaults when none is configured.
    pub async fn table_config(&self) -> Result<TableConfig, CliError> {
        match &self.config {
            Some(path) => load_config(path).await,
            None => Ok(TableConfig::default()),
        }
    }
}

async fn load_config(path: &Path) -> Result<TableConfig, CliError> {
    log::debug!("Table configuration: {}", path.display());
    Ok(TableConfig::load(path).await?)
}

/// Dispatches the parsed command line.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context::resolve(cli.store, cli.config)?;

    match cli.command {
        Commands::List(args) => list::run(&ctx, args).await,
        Commands::Add(args) => tickets::add(&ctx, args).await,
        Commands::Edit { id, fields } => tickets::edit(&ctx, id, fields).await,
        Commands::Delete { id } => tickets::delete(&ctx, id).await,
        Commands::Show { id } => tickets::show(&ctx, id).await,
        Commands::Refresh { seed } => refresh::run(&ctx, &seed).await,
    }
}
