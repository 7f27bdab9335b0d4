use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use tatua_lib::table::FilterCriterion;
use tatua_lib::table::SortCriterion;
use tatua_lib::tickets::PreferredContact;

use crate::commands::list::parse_filter_arg;
use crate::commands::list::parse_sort_arg;

#[derive(Debug, Parser)]
#[command(name = "tatua", about = "Raise, browse and triage support tickets", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Ticket store file (defaults to the platform data directory)
    #[arg(long, global = true, env = "TATUA_STORE")]
    pub store: Option<PathBuf>,

    /// Table configuration file (JSON)
    #[arg(long, global = true, env = "TATUA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase terminal log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show tickets as a sorted, filtered, paginated table
    List(ListArgs),

    /// Raise a new ticket
    Add(AddArgs),

    /// Change fields of an existing ticket
    Edit {
        /// Ticket id
        id: u64,

        #[command(flatten)]
        fields: EditArgs,
    },

    /// Delete a ticket
    Delete {
        /// Ticket id
        id: u64,
    },

    /// Show every field of a ticket
    Show {
        /// Ticket id
        id: u64,
    },

    /// Replace the store with the contents of a seed file
    Refresh {
        /// Seed file with `{"tickets": [...]}` or a bare array
        #[arg(long)]
        seed: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Sort key as `column:asc|desc`, repeat for secondary keys
    #[arg(long = "sort", value_parser = parse_sort_arg)]
    pub sort: Vec<SortCriterion>,

    /// Filter as `column:relation:value`, repeat to combine (all must hold)
    #[arg(long = "filter", value_parser = parse_filter_arg)]
    pub filter: Vec<FilterCriterion>,

    /// Page to show, 1-based
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (overrides the configuration)
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Show every row on one page
    #[arg(long)]
    pub no_paginate: bool,

    /// Delegate sorting and filtering to this endpoint
    #[arg(long)]
    pub api: Option<String>,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Full name of the person raising the ticket
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: String,

    #[arg(long)]
    pub subject: String,

    /// Ticket description
    #[arg(long)]
    pub message: String,

    /// Preferred contact channel
    #[arg(long, default_value = "email", value_parser = parse_contact)]
    pub contact: PreferredContact,

    /// Attachment file name (PDF, PNG or JPEG)
    #[arg(long)]
    pub attachment: Option<String>,

    /// Accept the terms and conditions
    #[arg(long)]
    pub accept_terms: bool,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub subject: Option<String>,

    /// New description
    #[arg(long)]
    pub message: Option<String>,

    #[arg(long, value_parser = parse_contact)]
    pub contact: Option<PreferredContact>,

    /// Replacement attachment file name
    #[arg(long)]
    pub attachment: Option<String>,
}

fn parse_contact(s: &str) -> Result<PreferredContact, String> {
    s.parse().map_err(|e: tatua_lib::error::FieldError| e.to_string())
}
