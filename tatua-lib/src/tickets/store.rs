//! Ticket persistence.

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use super::Ticket;
use crate::error::StoreError;
use crate::model::Record;

/// Backend trait for ticket storage.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Loads the whole collection. A store that was never written is empty.
    async fn load(&self) -> Result<Vec<Ticket>, StoreError>;

    /// Replaces the whole collection.
    async fn save(&self, tickets: &[Ticket]) -> Result<(), StoreError>;
}

#[derive(Serialize)]
struct TicketFileRef<'a> {
    tickets: &'a [Ticket],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TicketFile {
    Wrapped { tickets: Vec<Ticket> },
    Bare(Vec<Ticket>),
}

impl TicketFile {
    fn into_tickets(self) -> Vec<Ticket> {
        match self {
            Self::Wrapped { tickets } | Self::Bare(tickets) => tickets,
        }
    }
}

/// Stores tickets in a JSON file.
///
/// Reads `{"tickets": [...]}` or a bare array and always writes the wrapped
/// form.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parses a ticket file's contents.
pub fn parse_tickets(path: &Path, text: &str) -> Result<Vec<Ticket>, StoreError> {
    let file: TicketFile = serde_json::from_str(text).map_err(|e| StoreError::parse(path, e))?;
    Ok(file.into_tickets())
}

#[async_trait]
impl TicketStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Ticket>, StoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No ticket file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        let tickets = parse_tickets(&self.path, &text)?;
        log::debug!("Loaded {} tickets from {}", tickets.len(), self.path.display());
        Ok(tickets)
    }

    async fn save(&self, tickets: &[Ticket]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&TicketFileRef { tickets })?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        log::debug!("Saved {} tickets to {}", tickets.len(), self.path.display());
        Ok(())
    }
}

/// An in-memory ticket collection with id-based edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketBook {
    tickets: Vec<Ticket>,
}

impl TicketBook {
    pub fn new(tickets: Vec<Ticket>) -> Self {
        Self { tickets }
    }

    /// Loads a book from a store.
    pub async fn load(store: &dyn TicketStore) -> Result<Self, StoreError> {
        Ok(Self::new(store.load().await?))
    }

    /// Writes the book to a store.
    pub async fn save(&self, store: &dyn TicketStore) -> Result<(), StoreError> {
        store.save(&self.tickets).await
    }

    /// Returns the id the next added ticket receives.
    pub fn next_id(&self) -> u64 {
        self.tickets.iter().map(|t| t.id).max().map_or(1, |max| max + 1)
    }

    /// Adds a ticket under the next id and returns that id.
    pub fn add(&mut self, mut ticket: Ticket) -> u64 {
        let id = self.next_id();
        ticket.id = id;
        self.tickets.push(ticket);
        id
    }

    /// Replaces the ticket with the same id.
    pub fn update(&mut self, ticket: Ticket) -> Result<(), StoreError> {
        let slot = self
            .tickets
            .iter_mut()
            .find(|t| t.id == ticket.id)
            .ok_or(StoreError::NotFound { id: ticket.id })?;
        *slot = ticket;
        Ok(())
    }

    /// Removes and returns a ticket.
    pub fn delete(&mut self, id: u64) -> Result<Ticket, StoreError> {
        let index = self
            .tickets
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound { id })?;
        Ok(self.tickets.remove(index))
    }

    pub fn find(&self, id: u64) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    pub fn find_mut(&mut self, id: u64) -> Option<&mut Ticket> {
        self.tickets.iter_mut().find(|t| t.id == id)
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Converts the collection into table records.
    pub fn records(&self) -> Vec<Record> {
        super::ticket_records(&self.tickets)
    }
}
