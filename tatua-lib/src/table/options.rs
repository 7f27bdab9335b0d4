//! Table options and their JSON configuration form.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::compare::Comparator;
use super::predicate::Predicate;
use super::relation::Relation;
use super::relation::RelationCatalog;
use super::schema::Column;
use super::schema::columns_from_json;
use crate::error::SchemaError;
use crate::error::StoreError;

/// Behaviour switches for a [`DynamicTable`](super::DynamicTable).
///
/// # Example
///
/// ```
/// use tatua_lib::table::TableOptions;
///
/// let options = TableOptions::default()
///     .with_items_per_page(10)
///     .with_filter(false);
/// assert!(options.enable_sort);
/// ```
#[derive(Clone)]
pub struct TableOptions {
    /// Slice the processed records into pages.
    ///
    /// Default: true
    pub enable_pagination: bool,

    /// Offer and apply sort criteria.
    ///
    /// Default: true
    pub enable_sort: bool,

    /// Offer and apply filter criteria.
    ///
    /// Default: true
    pub enable_filter: bool,

    /// Page size.
    ///
    /// Default: 5
    pub items_per_page: usize,

    /// Hand sorting and filtering to a record source instead of doing it in
    /// memory.
    ///
    /// Default: false
    pub api_driven: bool,

    /// Replaces the default per-type ordering.
    pub comparator: Option<Arc<dyn Comparator>>,

    /// Replaces the default relation semantics.
    pub predicate: Option<Arc<dyn Predicate>>,

    /// Relations offered per column type.
    pub relations: RelationCatalog,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            enable_pagination: true,
            enable_sort: true,
            enable_filter: true,
            items_per_page: 5,
            api_driven: false,
            comparator: None,
            predicate: None,
            relations: RelationCatalog::default(),
        }
    }
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pagination(mut self, enabled: bool) -> Self {
        self.enable_pagination = enabled;
        self
    }

    pub fn with_sort(mut self, enabled: bool) -> Self {
        self.enable_sort = enabled;
        self
    }

    pub fn with_filter(mut self, enabled: bool) -> Self {
        self.enable_filter = enabled;
        self
    }

    /// Sets the page size. 0 is read as 1.
    pub fn with_items_per_page(mut self, items: usize) -> Self {
        self.items_per_page = items;
        self
    }

    pub fn with_api_driven(mut self, api_driven: bool) -> Self {
        self.api_driven = api_driven;
        self
    }

    /// Sets a custom comparator.
    pub fn with_comparator(mut self, comparator: impl Comparator + 'static) -> Self {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    /// Sets a custom predicate.
    pub fn with_predicate(mut self, predicate: impl Predicate + 'static) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Sets the relation catalog.
    pub fn with_relations(mut self, relations: RelationCatalog) -> Self {
        self.relations = relations;
        self
    }
}

impl fmt::Debug for TableOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableOptions")
            .field("enable_pagination", &self.enable_pagination)
            .field("enable_sort", &self.enable_sort)
            .field("enable_filter", &self.enable_filter)
            .field("items_per_page", &self.items_per_page)
            .field("api_driven", &self.api_driven)
            .field("comparator", &self.comparator.as_ref().map(|_| "<custom>"))
            .field("predicate", &self.predicate.as_ref().map(|_| "<custom>"))
            .field("relations", &self.relations)
            .finish()
    }
}

/// Table configuration as stored in a JSON file.
///
/// ```json
/// {
///   "itemsPerPage": 10,
///   "isApiDriven": false,
///   "relationsByType": { "string": ["contains", "eq"] },
///   "columns": [
///     { "key": "id", "label": "ID", "type": "number" },
///     { "key": "subject" }
///   ]
/// }
/// ```
///
/// `columns` is kept as raw JSON so a malformed list can degrade the table
/// instead of failing the whole configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    pub enable_pagination: bool,
    pub enable_sort: bool,
    pub enable_filter: bool,
    pub items_per_page: usize,
    #[serde(alias = "isApiDriven")]
    pub api_driven: bool,
    pub relations_by_type: HashMap<String, Vec<Relation>>,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub columns: serde_json::Value,
}

impl Default for TableConfig {
    fn default() -> Self {
        let options = TableOptions::default();
        Self {
            enable_pagination: options.enable_pagination,
            enable_sort: options.enable_sort,
            enable_filter: options.enable_filter,
            items_per_page: options.items_per_page,
            api_driven: options.api_driven,
            relations_by_type: HashMap::new(),
            columns: serde_json::Value::Null,
        }
    }
}

impl TableConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a configuration file.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| StoreError::parse(path, e))
    }

    /// Builds table options.
    ///
    /// Unknown column type names in `relationsByType` are logged and the
    /// default catalog is used.
    pub fn options(&self) -> TableOptions {
        let relations = match RelationCatalog::from_overrides(&self.relations_by_type) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("Ignoring relation overrides: {}", e);
                RelationCatalog::default()
            }
        };

        TableOptions {
            enable_pagination: self.enable_pagination,
            enable_sort: self.enable_sort,
            enable_filter: self.enable_filter,
            items_per_page: self.items_per_page,
            api_driven: self.api_driven,
            comparator: None,
            predicate: None,
            relations,
        }
    }

    /// Reads the configured columns. A missing list yields no columns.
    pub fn columns(&self) -> Result<Vec<Column>, SchemaError> {
        if self.columns.is_null() {
            return Ok(Vec::new());
        }
        columns_from_json(&self.columns)
    }
}
