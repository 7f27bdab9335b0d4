//! End-to-end scenarios for the table engine in local mode.

use tatua_lib::model::Record;
use tatua_lib::table::Column;
use tatua_lib::table::ColumnType;
use tatua_lib::table::Direction;
use tatua_lib::table::DynamicTable;
use tatua_lib::table::FilterCriterion;
use tatua_lib::table::FilterField;
use tatua_lib::table::Relation;
use tatua_lib::table::SortCriterion;
use tatua_lib::table::SortField;
use tatua_lib::table::TableConfig;
use tatua_lib::table::TableOptions;
use tatua_lib::tickets::JsonFileStore;
use tatua_lib::tickets::PreferredContact;
use tatua_lib::tickets::TicketBook;
use tatua_lib::tickets::TicketForm;
use tatua_lib::tickets::ticket_columns;

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

fn names(table: &DynamicTable) -> Vec<String> {
    table.processed().iter().map(|r| r.text("name")).collect()
}

#[test]
fn test_multi_key_sort_scenario() {
    let mut table = DynamicTable::new(people(), columns(), TableOptions::default());
    table.set_sort_criteria(vec![SortCriterion::asc("age"), SortCriterion::asc("name")]);
    assert_eq!(names(&table), vec!["Bob", "Cab", "Ann"]);
}

#[test]
fn test_filter_then_page_scenario() {
    let options = TableOptions::default().with_items_per_page(1);
    let mut table = DynamicTable::new(people(), columns(), options);
    table.set_filter_criteria(vec![FilterCriterion::new("age", Relation::Eq, "25")]);
    assert_eq!(names(&table), vec!["Bob", "Cab"]);

    table.goto_page(2);
    let view = table.view();
    assert_eq!(view.column_cells("name"), vec!["Cab"]);
    let pagination = view.pagination.unwrap();
    assert_eq!(pagination.total_pages, 2);
    assert_eq!(pagination.current, 2);
}

#[test]
fn test_popup_workflow() {
    let mut table = DynamicTable::new(people(), columns(), TableOptions::default());

    table.open_sort();
    let age = table.add_sort();
    table.update_sort(age, SortField::Column("age".into()));
    table.update_sort(age, SortField::Direction(Direction::Desc));
    let name = table.add_sort();
    table.update_sort(name, SortField::Direction(Direction::Desc));
    table.apply_sort();
    assert_eq!(names(&table), vec!["Ann", "Cab", "Bob"]);
    assert_eq!(table.view().sort.unwrap().label, "2 Sort");

    table.open_filter();
    let filter = table.add_filter();
    table.update_filter(filter, FilterField::Column("age".into()));
    table.update_filter(filter, FilterField::Relation(Relation::Lt));
    table.update_filter(filter, FilterField::Value("30".into()));
    let popup = table.view().filter_popup.unwrap();
    let labels: Vec<_> = popup.rows[0].relations.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["Equals", "Greater Than", "Less Than", "Is Empty"]);
    table.apply_filter();
    assert_eq!(names(&table), vec!["Cab", "Bob"]);

    table.reset_filter();
    table.reset_sort();
    assert_eq!(names(&table), vec!["Ann", "Bob", "Cab"]);
}

#[test]
fn test_pagination_invariant() {
    let data: Vec<Record> = (0..23)
        .map(|i| Record::new().set("id", i).set("name", format!("n{:02}", i)))
        .collect();
    let options = TableOptions::default().with_items_per_page(5);
    let mut table = DynamicTable::new(data, Vec::new(), options);
    table.set_sort_criteria(vec![SortCriterion::desc("name")]);

    assert_eq!(table.total_pages(), 5);
    let processed = table.processed().to_vec();

    assert_eq!(table.page().records()[0], processed[0]);
    table.last_page();
    let last = table.page();
    assert_eq!(last.len(), 3);
    assert_eq!(last.records().last(), processed.last());
}

#[test]
fn test_apply_twice_is_stable() {
    let mut table = DynamicTable::new(people(), columns(), TableOptions::default());
    table.open_sort();
    table.add_sort();
    table.apply_sort();
    let once = names(&table);
    table.apply_sort();
    assert_eq!(names(&table), once);
}

#[test]
fn test_shrinking_data_clamps_page() {
    let options = TableOptions::default().with_items_per_page(1);
    let mut table = DynamicTable::new(people(), columns(), options);
    table.last_page();
    assert_eq!(table.current_page(), 3);

    table.set_data(people().into_iter().take(1).collect());
    assert_eq!(table.current_page(), 1);
    assert_eq!(table.view().column_cells("name"), vec!["Ann"]);
}

#[test]
fn test_inferred_columns_render() {
    let data = vec![Record::new().set("id", 1).set("createdAt", "2024-01-01")];
    let table = DynamicTable::new(data, Vec::new(), TableOptions::default());
    assert_eq!(table.view().labels(), vec!["Id", "Created Date"]);
}

#[test]
fn test_custom_engines() {
    let options = TableOptions::default()
        .with_comparator(|a: Option<&tatua_lib::model::Value>, b: Option<&tatua_lib::model::Value>, _: ColumnType| {
            let len = |v: Option<&tatua_lib::model::Value>| v.map(|v| v.as_text().len()).unwrap_or(0);
            len(b).cmp(&len(a))
        })
        .with_predicate(|record: &Record, criterion: &FilterCriterion, _: ColumnType| {
            record.text(&criterion.column).ends_with(&criterion.value)
        });
    let data = vec![
        Record::new().set("name", "Al"),
        Record::new().set("name", "Alexandra"),
        Record::new().set("name", "Sandra"),
    ];
    let mut table = DynamicTable::new(data, vec![Column::new("name", "Name")], options);
    table.set_sort_criteria(vec![SortCriterion::asc("name")]);
    table.set_filter_criteria(vec![FilterCriterion::new("name", Relation::Eq, "ndra")]);
    assert_eq!(names(&table), vec!["Alexandra", "Sandra"]);
}

#[test]
fn test_malformed_config_degrades() {
    let config = TableConfig::from_json(r#"{"columns": {"key": "name"}}"#).unwrap();
    let mut table = DynamicTable::from_config(people(), &config);
    table.set_sort_criteria(vec![SortCriterion::desc("name")]);

    let view = table.view();
    assert_eq!(view.labels(), vec!["Id", "Name", "Age"]);
    assert_eq!(view.column_cells("name"), vec!["Ann", "Bob", "Cab"]);
    assert!(view.sort.is_none());
    assert!(view.filter.is_none());
}

#[tokio::test]
async fn test_ticket_list_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("tickets.json"));
    let mut book = TicketBook::load(&store).await.unwrap();

    for (name, subject) in [("Ann", "Printer"), ("Bob", "Laptop"), ("Cab", "Monitor")] {
        let form = TicketForm {
            full_name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555-0100".into(),
            subject: subject.into(),
            message: "Broken".into(),
            preferred_contact: PreferredContact::Email,
            terms_accepted: true,
            attachment: None,
        };
        let ticket = form.into_ticket(book.next_id(), chrono::Utc::now()).unwrap();
        book.add(ticket);
    }
    book.save(&store).await.unwrap();

    let book = TicketBook::load(&store).await.unwrap();
    let mut table = DynamicTable::new(book.records(), ticket_columns(), TableOptions::default());
    table.set_sort_criteria(vec![SortCriterion::desc("id")]);

    let view = table.view();
    assert_eq!(view.labels(), vec!["ID", "Raised By", "Ticket Details", "Created Date"]);
    assert_eq!(view.column_cells("id"), vec!["3", "2", "1"]);
    assert_eq!(view.column_cells("raisedBy")[0], "Cab (cab@example.com)");
}
