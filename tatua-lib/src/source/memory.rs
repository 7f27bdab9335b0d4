//! In-process record source

use async_trait::async_trait;

use super::RecordSource;
use crate::error::Error;
use crate::model::Record;
use crate::table::Column;
use crate::table::Query;
use crate::table::RelationCatalog;
use crate::table::Schema;
use crate::table::TypedComparator;
use crate::table::TypedPredicate;
use crate::table::filter_records;
use crate::table::sort_records;

/// Serves delegated queries from an in-memory collection.
///
/// Parses the query suffix and runs the default engines, which makes it a
/// stand-in for a remote endpoint in tests and offline use.
#[derive(Debug, Clone)]
pub struct MemorySource {
    records: Vec<Record>,
    schema: Schema,
    relations: RelationCatalog,
}

impl MemorySource {
    /// Creates a source. Empty `columns` are inferred from the first record.
    pub fn new(records: Vec<Record>, columns: Vec<Column>) -> Self {
        let schema = Schema::resolve(columns, &records);
        Self {
            records,
            schema,
            relations: RelationCatalog::default(),
        }
    }

    /// Sets the relation catalog used to validate filters.
    pub fn with_relations(mut self, relations: RelationCatalog) -> Self {
        self.relations = relations;
        self
    }

    /// Returns the served records.
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn fetch(&self, query: &str) -> Result<Vec<Record>, Error> {
        let query = Query::parse(query)?;
        let mut records = if query.filter.is_empty() {
            self.records.clone()
        } else {
            filter_records(
                &self.records,
                &query.filter,
                &self.schema,
                &self.relations,
                &TypedPredicate,
            )
        };
        sort_records(&mut records, &query.sort, &self.schema, &TypedComparator);
        Ok(records)
    }
}
