//! Ticket intake and dynamic table library
//!
//! A generic table engine that turns any record collection plus a column
//! schema into a paginated, sortable, filterable view, processed either in
//! memory or by a remote source, together with the ticket model, form rules
//! and storage it was built to serve.

pub mod error;
pub mod model;
pub mod source;
pub mod table;
pub mod tickets;
