//! The dynamic table: schema, data, criteria and paging composed together.

use std::fmt;

use super::compare::Comparator;
use super::compare::TypedComparator;
use super::compare::sort_records;
use super::criteria::CriteriaState;
use super::criteria::CriterionContext;
use super::criteria::CriterionId;
use super::criteria::FilterCriterion;
use super::criteria::FilterField;
use super::criteria::SortCriterion;
use super::criteria::SortField;
use super::options::TableConfig;
use super::options::TableOptions;
use super::page::Page;
use super::page::Pagination;
use super::predicate::Predicate;
use super::predicate::TypedPredicate;
use super::predicate::filter_records;
use super::query::Query;
use super::schema::Column;
use super::schema::Schema;
use super::schema::infer_columns;
use super::view::Choice;
use super::view::CriteriaControl;
use super::view::FilterPopupView;
use super::view::FilterRowView;
use super::view::HeaderCell;
use super::view::NavTarget;
use super::view::PaginationControls;
use super::view::RowView;
use super::view::SortPopupView;
use super::view::SortRowView;
use super::view::TableView;
use crate::error::Error;
use crate::model::Record;
use crate::source::RecordSource;

/// Identifies one delegated query. Later tokens supersede earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryToken(u64);

impl QueryToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A delegated query handed to the caller by [`DynamicTable::begin_query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub token: QueryToken,
    /// Suffix to append to the source endpoint, possibly empty.
    pub suffix: String,
}

/// What happened to a delegated query's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The records replaced the processed data.
    Applied,
    /// A newer query was issued; the result was dropped.
    Stale,
    /// The fetch failed; the previous data was kept.
    Failed,
}

type RefreshCallback = Box<dyn FnMut() + Send>;

/// A paginated, sortable, filterable view over a record collection.
///
/// In local mode the table filters and sorts in memory whenever the data or
/// the applied criteria change. In delegated mode it serializes the applied
/// criteria into a [`Query`] and takes whatever a [`RecordSource`] returns as
/// the processed data, paging it locally.
///
/// Delegated queries are split in two so page navigation stays responsive
/// while a fetch is in flight: [`begin_query`](Self::begin_query) issues a
/// token and raises the loading flag, [`complete_query`](Self::complete_query)
/// delivers the result. Only the latest token's result is kept.
///
/// # Example
///
/// ```
/// use tatua_lib::model::Record;
/// use tatua_lib::table::{Column, ColumnType, DynamicTable, SortCriterion, TableOptions};
///
/// let data = vec![
///     Record::new().set("id", 1).set("name", "Ann").set("age", 30),
///     Record::new().set("id", 2).set("name", "Bob").set("age", 25),
/// ];
/// let columns = vec![
///     Column::new("name", "Name"),
///     Column::new("age", "Age").with_type(ColumnType::Number),
/// ];
///
/// let mut table = DynamicTable::new(data, columns, TableOptions::default());
/// table.set_sort_criteria(vec![SortCriterion::asc("age")]);
///
/// assert_eq!(table.view().column_cells("name"), vec!["Bob", "Ann"]);
/// ```
pub struct DynamicTable {
    data: Vec<Record>,
    declared: Vec<Column>,
    schema: Schema,
    config_degraded: bool,
    options: TableOptions,
    sort: CriteriaState<SortCriterion>,
    filter: CriteriaState<FilterCriterion>,
    processed: Vec<Record>,
    pagination: Pagination,
    last_token: u64,
    loading: bool,
    needs_query: bool,
    on_refresh: Option<RefreshCallback>,
}

impl DynamicTable {
    /// Creates a table. Empty `columns` are inferred from the first record.
    pub fn new(data: Vec<Record>, columns: Vec<Column>, options: TableOptions) -> Self {
        let schema = Schema::resolve(columns.clone(), &data);
        Self::build(data, columns, schema, false, options)
    }

    /// Creates a table from a configuration file's contents.
    ///
    /// A malformed column list is logged; the table then renders inferred
    /// columns without sort or filter.
    pub fn from_config(data: Vec<Record>, config: &TableConfig) -> Self {
        let options = config.options();
        match config.columns() {
            Ok(columns) => Self::new(data, columns, options),
            Err(e) => {
                log::warn!("Column configuration rejected, sort and filter disabled: {}", e);
                let schema = Schema::degraded(infer_columns(&data));
                Self::build(data, Vec::new(), schema, true, options)
            }
        }
    }

    fn build(
        data: Vec<Record>,
        declared: Vec<Column>,
        schema: Schema,
        config_degraded: bool,
        options: TableOptions,
    ) -> Self {
        let pagination = Pagination::new(options.items_per_page);
        let needs_query = options.api_driven;
        let mut table = Self {
            processed: data.clone(),
            data,
            declared,
            schema,
            config_degraded,
            options,
            sort: CriteriaState::new(),
            filter: CriteriaState::new(),
            pagination,
            last_token: 0,
            loading: false,
            needs_query,
            on_refresh: None,
        };
        table.derive();
        table
    }

    /// Sets the callback run by [`refresh`](Self::refresh).
    pub fn on_refresh(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_refresh = Some(Box::new(callback));
        self
    }

    // =========================================================================
    // Data and mode
    // =========================================================================

    /// Replaces the raw records.
    pub fn set_data(&mut self, data: Vec<Record>) {
        self.data = data;
        if self.declared.is_empty() {
            let columns = infer_columns(&self.data);
            self.schema = if self.config_degraded {
                Schema::degraded(columns)
            } else {
                Schema::resolve(columns, &self.data)
            };
        }
        if self.options.api_driven {
            self.processed = self.data.clone();
            self.needs_query = true;
        }
        self.derive();
    }

    /// Switches between local and delegated processing.
    pub fn set_api_driven(&mut self, api_driven: bool) {
        if self.options.api_driven == api_driven {
            return;
        }
        self.options.api_driven = api_driven;
        self.needs_query = api_driven;
        // Retire any query issued under the previous mode.
        self.last_token += 1;
        self.loading = false;
        self.derive();
    }

    /// Changes the page size and returns to page 1.
    pub fn set_items_per_page(&mut self, items: usize) {
        self.options.items_per_page = items;
        self.pagination.set_per_page(items);
    }

    /// Runs the refresh callback. In delegated mode a new query is due.
    pub fn refresh(&mut self) {
        if let Some(callback) = self.on_refresh.as_mut() {
            callback();
        }
        if self.options.api_driven {
            self.needs_query = true;
        }
    }

    /// Recomputes the processed records from data and applied criteria.
    fn derive(&mut self) {
        if !self.options.api_driven {
            let sort = self.active_sort().to_vec();
            let filter = self.active_filter().to_vec();

            let predicate: &dyn Predicate = match &self.options.predicate {
                Some(p) => p.as_ref(),
                None => &TypedPredicate,
            };
            let comparator: &dyn Comparator = match &self.options.comparator {
                Some(c) => c.as_ref(),
                None => &TypedComparator,
            };

            let mut processed = if filter.is_empty() {
                self.data.clone()
            } else {
                filter_records(
                    &self.data,
                    &filter,
                    &self.schema,
                    &self.options.relations,
                    predicate,
                )
            };
            sort_records(&mut processed, &sort, &self.schema, comparator);
            log::debug!(
                "Derived {} of {} records ({} sort, {} filter)",
                processed.len(),
                self.data.len(),
                sort.len(),
                filter.len()
            );
            self.processed = processed;
        }
        self.pagination.clamp(self.processed.len());
    }

    fn criteria_changed(&mut self) {
        self.pagination.reset();
        if self.options.api_driven {
            self.needs_query = true;
        }
        self.derive();
    }

    fn active_sort(&self) -> &[SortCriterion] {
        if self.options.enable_sort && self.schema.is_valid() {
            self.sort.applied()
        } else {
            &[]
        }
    }

    fn active_filter(&self) -> &[FilterCriterion] {
        if self.options.enable_filter && self.schema.is_valid() {
            self.filter.applied()
        } else {
            &[]
        }
    }

    // =========================================================================
    // Delegated queries
    // =========================================================================

    /// Returns the applied criteria as a query.
    pub fn query(&self) -> Query {
        Query::new(self.active_sort().to_vec(), self.active_filter().to_vec())
    }

    /// Returns `true` if delegated mode is on and the processed data is out
    /// of date with the applied criteria.
    pub fn needs_query(&self) -> bool {
        self.options.api_driven && self.needs_query
    }

    /// Issues a new delegated query and raises the loading flag.
    pub fn begin_query(&mut self) -> PendingQuery {
        self.last_token += 1;
        self.loading = true;
        self.needs_query = false;
        let suffix = self.query().to_suffix();
        log::debug!("Issuing query #{}: {:?}", self.last_token, suffix);
        PendingQuery {
            token: QueryToken(self.last_token),
            suffix,
        }
    }

    /// Delivers a delegated query's result.
    pub fn complete_query(
        &mut self,
        token: QueryToken,
        result: Result<Vec<Record>, Error>,
    ) -> QueryOutcome {
        if !self.options.api_driven || token.0 != self.last_token {
            log::debug!(
                "Dropping result of query #{}, latest is #{}",
                token.0,
                self.last_token
            );
            return QueryOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(records) => {
                log::debug!("Query #{} returned {} records", token.0, records.len());
                self.processed = records;
                self.pagination.clamp(self.processed.len());
                QueryOutcome::Applied
            }
            Err(e) => {
                log::error!("Query #{} failed, keeping previous data: {}", token.0, e);
                QueryOutcome::Failed
            }
        }
    }

    /// Runs one delegated query against a source.
    pub async fn sync(&mut self, source: &dyn RecordSource) -> QueryOutcome {
        let pending = self.begin_query();
        let result = source.fetch(&pending.suffix).await;
        self.complete_query(pending.token, result)
    }

    /// Returns `true` while a delegated query is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // =========================================================================
    // Sort popup
    // =========================================================================

    fn context(&self) -> CriterionContext<'_> {
        CriterionContext {
            schema: &self.schema,
            catalog: &self.options.relations,
        }
    }

    pub fn open_sort(&mut self) {
        self.sort.open();
    }

    pub fn add_sort(&mut self) -> CriterionId {
        let ctx = CriterionContext {
            schema: &self.schema,
            catalog: &self.options.relations,
        };
        self.sort.add(ctx)
    }

    pub fn update_sort(&mut self, id: CriterionId, field: SortField) -> bool {
        let ctx = CriterionContext {
            schema: &self.schema,
            catalog: &self.options.relations,
        };
        self.sort.update(id, field, ctx)
    }

    pub fn remove_sort(&mut self, id: CriterionId) -> bool {
        self.sort.remove(id)
    }

    /// Commits the sort draft and returns to page 1.
    pub fn apply_sort(&mut self) {
        self.sort.apply();
        self.criteria_changed();
    }

    pub fn cancel_sort(&mut self) {
        self.sort.cancel();
    }

    /// Clears draft and applied sort criteria.
    pub fn reset_sort(&mut self) {
        self.sort.reset();
        self.criteria_changed();
    }

    /// Clears applied sort criteria without opening the popup.
    pub fn clear_sort(&mut self) {
        self.sort.clear_applied();
        self.criteria_changed();
    }

    /// Replaces the applied sort criteria directly.
    pub fn set_sort_criteria(&mut self, criteria: Vec<SortCriterion>) {
        self.sort.set_applied(criteria);
        self.criteria_changed();
    }

    pub fn sort_state(&self) -> &CriteriaState<SortCriterion> {
        &self.sort
    }

    // =========================================================================
    // Filter popup
    // =========================================================================

    pub fn open_filter(&mut self) {
        self.filter.open();
    }

    pub fn add_filter(&mut self) -> CriterionId {
        let ctx = CriterionContext {
            schema: &self.schema,
            catalog: &self.options.relations,
        };
        self.filter.add(ctx)
    }

    /// Edits a draft filter. Changing the column resets relation and value.
    pub fn update_filter(&mut self, id: CriterionId, field: FilterField) -> bool {
        let ctx = CriterionContext {
            schema: &self.schema,
            catalog: &self.options.relations,
        };
        self.filter.update(id, field, ctx)
    }

    pub fn remove_filter(&mut self, id: CriterionId) -> bool {
        self.filter.remove(id)
    }

    /// Commits the filter draft and returns to page 1.
    pub fn apply_filter(&mut self) {
        self.filter.apply();
        self.criteria_changed();
    }

    pub fn cancel_filter(&mut self) {
        self.filter.cancel();
    }

    /// Clears draft and applied filter criteria.
    pub fn reset_filter(&mut self) {
        self.filter.reset();
        self.criteria_changed();
    }

    /// Clears applied filter criteria without opening the popup.
    pub fn clear_filter(&mut self) {
        self.filter.clear_applied();
        self.criteria_changed();
    }

    /// Replaces the applied filter criteria directly.
    pub fn set_filter_criteria(&mut self, criteria: Vec<FilterCriterion>) {
        self.filter.set_applied(criteria);
        self.criteria_changed();
    }

    pub fn filter_state(&self) -> &CriteriaState<FilterCriterion> {
        &self.filter
    }

    // =========================================================================
    // Paging
    // =========================================================================

    pub fn first_page(&mut self) {
        self.pagination.first();
    }

    pub fn prev_page(&mut self) {
        self.pagination.prev(self.processed.len());
    }

    pub fn next_page(&mut self) {
        self.pagination.next(self.processed.len());
    }

    pub fn last_page(&mut self) {
        self.pagination.last(self.processed.len());
    }

    /// Moves to a page, clamped into range.
    pub fn goto_page(&mut self, page: usize) {
        self.pagination.goto(page, self.processed.len());
    }

    /// Follows a navigation button.
    pub fn navigate(&mut self, target: NavTarget) {
        match target {
            NavTarget::First => self.first_page(),
            NavTarget::Prev => self.prev_page(),
            NavTarget::Page(page) => self.goto_page(page),
            NavTarget::Next => self.next_page(),
            NavTarget::Last => self.last_page(),
        }
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.processed.len())
    }

    /// Returns the records shown on the current page.
    pub fn page(&self) -> Page {
        if self.options.enable_pagination {
            Page::from_records(&self.processed, &self.pagination)
        } else {
            Page::whole(&self.processed)
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the raw records.
    pub fn data(&self) -> &[Record] {
        &self.data
    }

    /// Returns the filtered and sorted records, before paging.
    pub fn processed(&self) -> &[Record] {
        &self.processed
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Builds the render snapshot.
    pub fn view(&self) -> TableView {
        let visible: Vec<&Column> = self.schema.visible().collect();
        let headers = visible
            .iter()
            .map(|c| HeaderCell {
                key: c.key.clone(),
                label: c.label.clone(),
            })
            .collect();

        let page = self.page();
        let rows = page
            .records()
            .iter()
            .map(|record| RowView {
                id: record.id_text(),
                cells: visible.iter().map(|c| c.format(record)).collect(),
            })
            .collect();

        let pagination = if self.options.enable_pagination {
            PaginationControls::build(page.number(), page.total_pages())
        } else {
            None
        };

        let sort_enabled = self.options.enable_sort && self.schema.is_valid();
        let filter_enabled = self.options.enable_filter && self.schema.is_valid();

        TableView {
            headers,
            rows,
            pagination,
            sort: sort_enabled.then(|| CriteriaControl::new("Sort", self.sort.applied().len())),
            filter: filter_enabled
                .then(|| CriteriaControl::new("Filter", self.filter.applied().len())),
            sort_popup: (sort_enabled && self.sort.is_editing()).then(|| self.sort_popup()),
            filter_popup: (filter_enabled && self.filter.is_editing())
                .then(|| self.filter_popup()),
            loading: self.loading,
            empty: self.data.is_empty() && self.processed.is_empty(),
        }
    }

    fn sort_popup(&self) -> SortPopupView {
        SortPopupView {
            columns: self
                .schema
                .sort_columns()
                .map(|c| Choice {
                    value: c.key.clone(),
                    label: c.label.clone(),
                })
                .collect(),
            rows: self
                .sort
                .draft()
                .iter()
                .map(|c| SortRowView {
                    id: c.id,
                    column: c.column.clone(),
                    direction: c.direction,
                })
                .collect(),
        }
    }

    fn filter_popup(&self) -> FilterPopupView {
        let ctx = self.context();
        FilterPopupView {
            columns: ctx
                .schema
                .filter_columns()
                .map(|c| Choice {
                    value: c.key.clone(),
                    label: c.label.clone(),
                })
                .collect(),
            rows: self
                .filter
                .draft()
                .iter()
                .map(|c| {
                    let column_type = ctx.schema.column_type(&c.column);
                    FilterRowView {
                        id: c.id,
                        column: c.column.clone(),
                        relation: c.relation,
                        value: c.value.clone(),
                        relations: ctx
                            .catalog
                            .relations(column_type)
                            .iter()
                            .map(|r| Choice {
                                value: r.as_str().to_string(),
                                label: r.label(column_type).to_string(),
                            })
                            .collect(),
                        needs_value: c.relation.requires_value(),
                    }
                })
                .collect(),
        }
    }
}

impl fmt::Debug for DynamicTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicTable")
            .field("records", &self.data.len())
            .field("processed", &self.processed.len())
            .field("schema", &self.schema)
            .field("options", &self.options)
            .field("page", &self.pagination.current())
            .field("loading", &self.loading)
            .finish()
    }
}
