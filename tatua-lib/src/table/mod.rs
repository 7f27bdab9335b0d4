//! The dynamic table engine.
//!
//! Turns a record collection plus a column [`Schema`] into a paginated,
//! sortable, filterable [`TableView`]. Processing happens either in memory or
//! through a delegated [`Query`] answered by a
//! [`RecordSource`](crate::source::RecordSource).
//!
//! Data flows one way: records are filtered, then sorted, then sliced into a
//! page, then rendered. Criteria edits go to a draft and only reach the view
//! when applied.

pub mod coerce;
pub mod compare;
pub mod criteria;
pub mod options;
pub mod orchestrator;
pub mod page;
pub mod predicate;
pub mod query;
pub mod relation;
pub mod schema;
pub mod view;

pub use compare::Comparator;
pub use compare::TypedComparator;
pub use compare::compare_values;
pub use compare::sort_records;
pub use criteria::CriteriaState;
pub use criteria::Criterion;
pub use criteria::CriterionContext;
pub use criteria::CriterionId;
pub use criteria::Direction;
pub use criteria::FilterCriterion;
pub use criteria::FilterField;
pub use criteria::SortCriterion;
pub use criteria::SortField;
pub use options::TableConfig;
pub use options::TableOptions;
pub use orchestrator::DynamicTable;
pub use orchestrator::PendingQuery;
pub use orchestrator::QueryOutcome;
pub use orchestrator::QueryToken;
pub use page::Page;
pub use page::Pagination;
pub use predicate::Predicate;
pub use predicate::TypedPredicate;
pub use predicate::filter_records;
pub use predicate::matches_criterion;
pub use query::Query;
pub use relation::Relation;
pub use relation::RelationCatalog;
pub use schema::Column;
pub use schema::ColumnSpec;
pub use schema::ColumnType;
pub use schema::Formatter;
pub use schema::Schema;
pub use schema::format_label;
pub use schema::infer_columns;
pub use view::EMPTY_MESSAGE;
pub use view::TableView;
