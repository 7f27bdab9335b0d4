//! Column schema: which fields a table shows and how it reads them.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::error::SchemaError;
use crate::model::Record;
use crate::model::Value;

/// Semantic type of a column, driving comparison and filter relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text, compared case-insensitively.
    #[default]
    String,
    /// Numeric values, compared as floats.
    Number,
    /// Calendar dates and timestamps.
    Date,
}

impl ColumnType {
    /// Returns the wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
        }
    }

    /// All column types.
    pub fn all() -> &'static [ColumnType] {
        &[Self::String, Self::Number, Self::Date]
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            other => Err(SchemaError::UnknownColumnType(other.to_string())),
        }
    }
}

/// Renders a cell from the raw field value and its record.
pub type Formatter = Arc<dyn Fn(Option<&Value>, &Record) -> String + Send + Sync>;

/// A column definition.
///
/// # Example
///
/// ```
/// use tatua_lib::model::Record;
/// use tatua_lib::table::{Column, ColumnType};
///
/// let columns = vec![
///     Column::new("id", "ID").with_type(ColumnType::Number),
///     Column::new("name", "Name"),
///     Column::new("created_at", "Created Date")
///         .with_type(ColumnType::Date)
///         .with_formatter(|value, _| {
///             value
///                 .map(|v| v.as_text().chars().take(10).collect())
///                 .unwrap_or_default()
///         }),
///     Column::new("internal", "Internal").hide(),
/// ];
///
/// let record = Record::new().set("created_at", "2024-01-15T10:30:00Z");
/// assert_eq!(columns[2].format(&record), "2024-01-15");
/// let short = Record::new().set("created_at", "2024");
/// assert_eq!(columns[2].format(&short), "2024");
/// ```
#[derive(Clone)]
pub struct Column {
    /// Field key, unique among columns.
    pub key: String,
    /// Header label.
    pub label: String,
    /// Semantic type.
    pub column_type: ColumnType,
    /// Whether the column is offered in the sort picker.
    pub sortable: bool,
    /// Hidden columns are neither rendered nor offered in pickers.
    pub hidden: bool,
    formatter: Option<Formatter>,
}

impl Column {
    /// Creates a visible, sortable string column.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            column_type: ColumnType::String,
            sortable: true,
            hidden: false,
            formatter: None,
        }
    }

    /// Creates a column whose label is inferred from its key.
    pub fn inferred(key: impl Into<String>) -> Self {
        let key = key.into();
        let label = format_label(&key);
        Self::new(key, label)
    }

    /// Sets the semantic type.
    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    /// Excludes the column from sorting.
    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Hides the column.
    pub fn hide(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Sets the cell formatter.
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(Option<&Value>, &Record) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Returns `true` if a formatter is set.
    pub fn has_formatter(&self) -> bool {
        self.formatter.is_some()
    }

    /// Renders this column's cell for a record.
    ///
    /// Without a formatter the raw value's text is used.
    pub fn format(&self, record: &Record) -> String {
        let value = record.get(&self.key);
        match &self.formatter {
            Some(formatter) => formatter(value, record),
            None => value.map(|v| v.as_text().into_owned()).unwrap_or_default(),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("column_type", &self.column_type)
            .field("sortable", &self.sortable)
            .field("hidden", &self.hidden)
            .field("formatter", &self.formatter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Declarative column description, as read from configuration.
///
/// Formatters cannot be expressed here; attach them in code after
/// converting into a [`Column`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "type")]
    pub column_type: ColumnType,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default)]
    pub hidden: bool,
}

fn default_true() -> bool {
    true
}

impl From<ColumnSpec> for Column {
    fn from(spec: ColumnSpec) -> Self {
        let label = spec.label.unwrap_or_else(|| format_label(&spec.key));
        Column {
            key: spec.key,
            label,
            column_type: spec.column_type,
            sortable: spec.sortable,
            hidden: spec.hidden,
            formatter: None,
        }
    }
}

/// Reads a column list from a JSON value.
///
/// Anything that is not an array of column objects is reported as
/// [`SchemaError::Malformed`].
pub fn columns_from_json(value: &serde_json::Value) -> Result<Vec<Column>, SchemaError> {
    let specs: Vec<ColumnSpec> = serde_json::from_value(value.clone())
        .map_err(|e| SchemaError::Malformed(e.to_string()))?;
    Ok(specs.into_iter().map(Column::from).collect())
}

/// Infers a header label from a field key.
///
/// Splits camelCase words, capitalizes the first letter, and reads the first
/// `At` as `Date`: `createdAt` becomes `Created Date`.
pub fn format_label(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(ch);
    }

    let mut chars = spaced.trim().chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    capitalized.replacen("At", "Date", 1)
}

/// Derives one string column per key of the first record.
pub fn infer_columns(records: &[Record]) -> Vec<Column> {
    records
        .first()
        .map(|first| first.keys().map(Column::inferred).collect())
        .unwrap_or_default()
}

/// Checks that every column has a non-empty, unique key.
pub fn validate_columns(columns: &[Column]) -> Result<(), SchemaError> {
    let mut seen = HashSet::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        if column.key.is_empty() {
            return Err(SchemaError::EmptyKey { index });
        }
        if !seen.insert(column.key.as_str()) {
            return Err(SchemaError::DuplicateKey {
                key: column.key.clone(),
            });
        }
    }
    Ok(())
}

/// The resolved column set a table works against.
///
/// A schema built from columns that fail validation is kept for display but
/// flagged invalid; the table then applies no sort or filter.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<Column>,
    valid: bool,
}

impl Schema {
    /// Creates a validated schema.
    pub fn new(columns: Vec<Column>) -> Result<Self, SchemaError> {
        validate_columns(&columns)?;
        Ok(Self {
            columns,
            valid: true,
        })
    }

    /// Resolves the schema for a table.
    ///
    /// An empty column list is inferred from the first record. Invalid
    /// columns are logged and kept in degraded mode.
    pub fn resolve(columns: Vec<Column>, data: &[Record]) -> Self {
        let columns = if columns.is_empty() {
            infer_columns(data)
        } else {
            columns
        };

        match validate_columns(&columns) {
            Ok(()) => Self {
                columns,
                valid: true,
            },
            Err(e) => {
                log::warn!("Column schema rejected, sort and filter disabled: {}", e);
                Self::degraded(columns)
            }
        }
    }

    /// Creates a schema that renders but never sorts or filters.
    pub fn degraded(columns: Vec<Column>) -> Self {
        Self {
            columns,
            valid: false,
        }
    }

    /// Returns `true` if sort and filter may use this schema.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns all columns, hidden ones included.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns `true` if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates over rendered columns.
    pub fn visible(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.hidden)
    }

    /// Columns offered in the sort picker.
    pub fn sort_columns(&self) -> impl Iterator<Item = &Column> {
        self.visible().filter(|c| c.sortable)
    }

    /// Columns offered in the filter picker.
    pub fn filter_columns(&self) -> impl Iterator<Item = &Column> {
        self.visible()
    }

    /// Looks up a column by key.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Returns the semantic type of a key, `string` when unknown.
    pub fn column_type(&self, key: &str) -> ColumnType {
        self.column(key).map(|c| c.column_type).unwrap_or_default()
    }
}
