//! Support tickets: the records the table shows in the ticket list.

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::error::FieldError;
use crate::model::Record;
use crate::model::Value;

mod columns;
mod form;
mod store;

pub use columns::*;
pub use form::*;
pub use store::*;

/// How the ticket's author wants to be contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredContact {
    #[default]
    Email,
    Phone,
}

impl PreferredContact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl fmt::Display for PreferredContact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferredContact {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            _ => Err(FieldError::invalid("preferredContact", s)),
        }
    }
}

/// A support ticket.
///
/// Field names on the wire follow the ticket JSON files: camelCase except
/// for `created_at`. Missing fields read as empty so partially filled seed
/// files still load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ticket {
    pub id: u64,
    pub subject: String,
    pub description: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub preferred_contact: PreferredContact,
    /// Original file name of the attachment.
    pub attachment: Option<String>,
    /// Where the uploaded attachment can be downloaded.
    pub attachment_url: Option<String>,
    #[serde(rename = "created_at", alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Returns the address matching the preferred contact channel.
    pub fn contact(&self) -> &str {
        match self.preferred_contact {
            PreferredContact::Email => &self.email,
            PreferredContact::Phone => &self.phone,
        }
    }
}

impl From<&Ticket> for Record {
    fn from(ticket: &Ticket) -> Self {
        Record::new()
            .set("id", ticket.id)
            .set("subject", ticket.subject.as_str())
            .set("description", ticket.description.as_str())
            .set("fullName", ticket.full_name.as_str())
            .set("email", ticket.email.as_str())
            .set("phone", ticket.phone.as_str())
            .set("preferredContact", ticket.preferred_contact.as_str())
            .set("attachment", ticket.attachment.clone())
            .set("attachmentUrl", ticket.attachment_url.clone())
            .set("created_at", Value::from(ticket.created_at))
    }
}

/// Converts tickets into table records.
pub fn ticket_records(tickets: &[Ticket]) -> Vec<Record> {
    tickets.iter().map(Record::from).collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_ticket_json_names() {
        let json = r#"{
            "id": 4,
            "subject": "Printer jam",
            "description": "Tray 2",
            "fullName": "Ann Lee",
            "email": "ann@example.com",
            "phone": "555-0100",
            "preferredContact": "phone",
            "attachment": null,
            "created_at": "2024-01-15T10:30:00.000Z"
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.full_name, "Ann Lee");
        assert_eq!(ticket.preferred_contact, PreferredContact::Phone);
        assert_eq!(ticket.contact(), "555-0100");
        assert!(ticket.attachment_url.is_none());

        let back = serde_json::to_value(&ticket).unwrap();
        assert_eq!(back["fullName"], "Ann Lee");
        assert!(back.get("created_at").is_some());
    }

    #[test]
    fn test_partial_ticket_loads() {
        let ticket: Ticket = serde_json::from_str(r#"{"id": 1, "subject": "Hi"}"#).unwrap();
        assert_eq!(ticket.preferred_contact, PreferredContact::Email);
        assert!(ticket.email.is_empty());
    }

    #[test]
    fn test_ticket_to_record() {
        let ticket = Ticket {
            id: 9,
            full_name: "Bob".into(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            ..Default::default()
        };
        let record = Record::from(&ticket);
        assert_eq!(record.id_text(), "9");
        assert_eq!(record.text("fullName"), "Bob");
        assert!(record.get("attachment").unwrap().is_null());
        assert_eq!(record.text("created_at"), "2024-03-01T08:00:00.000Z");
    }

    #[test]
    fn test_preferred_contact_parse() {
        assert_eq!("Phone".parse::<PreferredContact>().unwrap(), PreferredContact::Phone);
        assert!("fax".parse::<PreferredContact>().is_err());
    }
}
