//! Record sources for delegated table processing.

use async_trait::async_trait;

use crate::error::Error;
use crate::model::Record;

mod http;
mod memory;

pub use http::*;
pub use memory::*;

/// Answers a delegated table query.
///
/// `query` is a suffix such as `?sort=age:desc&filter=name:contains:an`, or
/// empty when no criteria are applied. The source returns the processed
/// collection; the table pages it.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<Vec<Record>, Error>;
}
