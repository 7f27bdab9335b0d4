//! Delegated-mode scenarios: query suffixes, request tokens and fetch failures.

use async_trait::async_trait;
use tatua_lib::error::Error;
use tatua_lib::error::FetchError;
use tatua_lib::model::Record;
use tatua_lib::source::MemorySource;
use tatua_lib::source::RecordSource;
use tatua_lib::table::Column;
use tatua_lib::table::ColumnType;
use tatua_lib::table::DynamicTable;
use tatua_lib::table::FilterCriterion;
use tatua_lib::table::QueryOutcome;
use tatua_lib::table::Relation;
use tatua_lib::table::SortCriterion;
use tatua_lib::table::TableOptions;

struct FailingSource;

#[async_trait]
impl RecordSource for FailingSource {
    async fn fetch(&self, _query: &str) -> Result<Vec<Record>, Error> {
        Err(FetchError::http(500, "boom").into())
    }
}

fn people() -> Vec<Record> {
    vec![
        Record::new().set("id", 1).set("name", "Ann").set("age", 30),
        Record::new().set("id", 2).set("name", "Bob").set("age", 25),
        Record::new().set("id", 3).set("name", "Cab").set("age", 25),
    ]
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name"),
        Column::new("age", "Age").with_type(ColumnType::Number),
    ]
}

fn delegated_table() -> DynamicTable {
    DynamicTable::new(
        Vec::new(),
        columns(),
        TableOptions::default().with_api_driven(true),
    )
}

#[test]
fn test_sort_suffix() {
    let mut table = delegated_table();
    table.set_sort_criteria(vec![SortCriterion::desc("age")]);
    assert_eq!(table.begin_query().suffix, "?sort=age:desc");
}

#[test]
fn test_empty_suffix() {
    let mut table = delegated_table();
    assert_eq!(table.begin_query().suffix, "");
}

#[tokio::test]
async fn test_sync_with_memory_source() {
    let source = MemorySource::new(people(), columns());
    let mut table = delegated_table();
    table.set_sort_criteria(vec![SortCriterion::desc("name")]);
    table.set_filter_criteria(vec![FilterCriterion::new("age", Relation::Eq, "25")]);
    assert!(table.needs_query());

    assert_eq!(table.sync(&source).await, QueryOutcome::Applied);
    assert!(!table.needs_query());
    assert_eq!(table.view().column_cells("name"), vec!["Cab", "Bob"]);
}

#[tokio::test]
async fn test_out_of_order_completion() {
    let source = MemorySource::new(people(), columns());
    let mut table = delegated_table();

    table.set_sort_criteria(vec![SortCriterion::asc("name")]);
    let slow = table.begin_query();
    table.set_sort_criteria(vec![SortCriterion::desc("name")]);
    let fast = table.begin_query();

    let fast_result = source.fetch(&fast.suffix).await;
    assert_eq!(table.complete_query(fast.token, fast_result), QueryOutcome::Applied);

    let slow_result = source.fetch(&slow.suffix).await;
    assert_eq!(table.complete_query(slow.token, slow_result), QueryOutcome::Stale);

    assert_eq!(table.view().column_cells("name"), vec!["Cab", "Bob", "Ann"]);
    assert!(!table.is_loading());
}

#[tokio::test]
async fn test_failure_keeps_previous_page() {
    let source = MemorySource::new(people(), columns());
    let mut table = delegated_table();
    assert_eq!(table.sync(&source).await, QueryOutcome::Applied);

    table.set_sort_criteria(vec![SortCriterion::desc("age")]);
    assert_eq!(table.sync(&FailingSource).await, QueryOutcome::Failed);
    assert!(!table.is_loading());
    assert_eq!(table.processed().len(), 3);
    assert_eq!(table.view().column_cells("name"), vec!["Ann", "Bob", "Cab"]);
}

#[tokio::test]
async fn test_navigation_while_loading() {
    let source = MemorySource::new(people(), columns());
    let mut table = DynamicTable::new(
        Vec::new(),
        columns(),
        TableOptions::default()
            .with_api_driven(true)
            .with_items_per_page(1),
    );
    assert_eq!(table.sync(&source).await, QueryOutcome::Applied);

    table.set_sort_criteria(vec![SortCriterion::desc("age")]);
    let pending = table.begin_query();
    assert!(table.view().loading);

    table.next_page();
    assert_eq!(table.current_page(), 2);

    let result = source.fetch(&pending.suffix).await;
    table.complete_query(pending.token, result);
    assert!(!table.view().loading);
}
