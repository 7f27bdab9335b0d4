//! `tatua list`

use std::time::Duration;

use tatua_lib::error::Error;
use tatua_lib::error::SchemaError;
use tatua_lib::model::Record;
use tatua_lib::source::HttpSource;
use tatua_lib::source::RecordSource;
use tatua_lib::table::Direction;
use tatua_lib::table::DynamicTable;
use tatua_lib::table::FilterCriterion;
use tatua_lib::table::QueryOutcome;
use tatua_lib::table::Relation;
use tatua_lib::table::SortCriterion;
use tatua_lib::table::TableConfig;
use tatua_lib::tickets::ticket_columns;

use super::Context;
use crate::cli::ListArgs;
use crate::error::CliError;

const API_TIMEOUT: Duration = Duration::from_secs(30);
const API_ATTEMPTS: usize = 2;

/// Parses `column:asc|desc`. A bare column sorts ascending.
pub fn parse_sort_arg(s: &str) -> Result<SortCriterion, String> {
    let (column, direction) = match s.rsplit_once(':') {
        Some((column, order)) => (column, order.parse::<Direction>().map_err(|e| e.to_string())?),
        None => (s, Direction::Asc),
    };
    if column.is_empty() {
        return Err(format!("missing column in sort '{}'", s));
    }
    Ok(SortCriterion::new(column, direction))
}

/// Parses `column:relation:value`. The value may contain colons and may be
/// omitted for `empty`.
pub fn parse_filter_arg(s: &str) -> Result<FilterCriterion, String> {
    let mut parts = s.splitn(3, ':');
    let column = parts.next().unwrap_or_default();
    let relation = parts
        .next()
        .ok_or_else(|| format!("expected column:relation:value, got '{}'", s))?;
    let value = parts.next().unwrap_or_default();

    if column.is_empty() {
        return Err(format!("missing column in filter '{}'", s));
    }
    let relation: Relation = relation.parse().map_err(|e: SchemaError| e.to_string())?;
    if relation.requires_value() && value.is_empty() {
        return Err(format!("relation '{}' needs a value", relation));
    }
    Ok(FilterCriterion::new(column, relation, value))
}

/// Builds the table the command renders.
pub fn build_table(mut config: TableConfig, args: &ListArgs, data: Vec<Record>) -> DynamicTable {
    if let Some(per_page) = args.per_page {
        config.items_per_page = per_page;
    }
    if args.no_paginate {
        config.enable_pagination = false;
    }
    if args.api.is_some() {
        config.api_driven = true;
    }

    let mut table = if config.columns.is_null() {
        DynamicTable::new(data, ticket_columns(), config.options())
    } else {
        DynamicTable::from_config(data, &config)
    };

    table.set_sort_criteria(args.sort.clone());
    table.set_filter_criteria(args.filter.clone());
    table
}

pub async fn run(ctx: &Context, args: ListArgs) -> Result<(), CliError> {
    if args.page == 0 {
        return Err(CliError::Usage("--page starts at 1".to_string()));
    }

    let book = ctx.book().await?;
    let config = ctx.table_config().await?;
    let mut table = build_table(config, &args, book.records());

    if let Some(url) = &args.api {
        let source = HttpSource::builder().url(url.as_str()).timeout(API_TIMEOUT).build()?;
        let pending = table.begin_query();
        let result = fetch_retrying(&source, &pending.suffix).await;
        let status = match &result {
            Err(Error::Fetch(e)) => e.status_code(),
            _ => None,
        };
        match table.complete_query(pending.token, result) {
            QueryOutcome::Applied => log::info!("Fetched {} records", table.processed().len()),
            QueryOutcome::Failed => match status {
                Some(code) => eprintln!("warning: {} answered HTTP {}, showing local tickets", url, code),
                None => eprintln!("warning: fetch from {} failed, showing local tickets", url),
            },
            QueryOutcome::Stale => {}
        }
    }

    table.goto_page(args.page);
    if table.current_page() != args.page {
        log::warn!(
            "Page {} out of range, showing page {}",
            args.page,
            table.current_page()
        );
    }

    print!("{}", table.view());
    Ok(())
}

/// Fetches again when the failure looks temporary.
async fn fetch_retrying(source: &dyn RecordSource, suffix: &str) -> Result<Vec<Record>, Error> {
    let mut attempt = 1;
    loop {
        match source.fetch(suffix).await {
            Err(Error::Fetch(e)) if e.is_retryable() && attempt < API_ATTEMPTS => {
                log::warn!("Fetch attempt {} failed, retrying: {}", attempt, e);
                attempt += 1;
            }
            result => return result,
        }
    }
}
