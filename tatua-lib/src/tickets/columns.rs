//! Column layout of the ticket list.

use crate::model::Record;
use crate::model::Value;
use crate::table::Column;
use crate::table::ColumnType;
use crate::table::coerce::value_date;

const NOT_AVAILABLE: &str = "N/A";

/// Columns of the ticket list.
///
/// `Raised By` and `Ticket Details` combine several fields and have no
/// backing field of their own, so they cannot be sorted.
pub fn ticket_columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID").with_type(ColumnType::Number),
        Column::new("raisedBy", "Raised By")
            .not_sortable()
            .with_formatter(|_, record| raised_by(record)),
        Column::new("ticketDetails", "Ticket Details")
            .not_sortable()
            .with_formatter(|_, record| ticket_details(record)),
        Column::new("created_at", "Created Date")
            .with_type(ColumnType::Date)
            .with_formatter(|value, _| calendar_day(value)),
    ]
}

fn non_blank(record: &Record, field: &str) -> Option<String> {
    let text = record.text(field);
    (!text.trim().is_empty()).then_some(text)
}

fn raised_by(record: &Record) -> String {
    let name = non_blank(record, "fullName").unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let contact = match record.text("preferredContact").as_str() {
        "email" => non_blank(record, "email"),
        "phone" => non_blank(record, "phone"),
        _ => None,
    };
    format!("{} ({})", name, contact.as_deref().unwrap_or(NOT_AVAILABLE))
}

fn ticket_details(record: &Record) -> String {
    let subject = non_blank(record, "subject").unwrap_or_else(|| NOT_AVAILABLE.to_string());
    match non_blank(record, "description") {
        Some(description) => format!("{}: {}", subject, description),
        None => subject,
    }
}

fn calendar_day(value: Option<&Value>) -> String {
    match value {
        Some(v) => value_date(v)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| v.as_text().into_owned()),
        None => String::new(),
    }
}
