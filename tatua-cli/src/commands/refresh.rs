//! `tatua refresh`

use std::path::Path;

use tatua_lib::tickets::JsonFileStore;
use tatua_lib::tickets::TicketBook;

use super::Context;
use crate::error::CliError;

/// Replaces the store with the tickets of a seed file.
pub async fn run(ctx: &Context, seed: &Path) -> Result<(), CliError> {
    if !seed.exists() {
        return Err(CliError::Usage(format!(
            "Seed file {} does not exist",
            seed.display()
        )));
    }

    let book = TicketBook::load(&JsonFileStore::new(seed)).await?;
    ctx.save(&book).await?;

    log::info!("Loaded {} tickets from {}", book.len(), seed.display());
    println!("Loaded {} tickets", book.len());
    Ok(())
}
