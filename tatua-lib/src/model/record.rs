//! Dynamic record

use indexmap::IndexMap;

use super::Value;

/// Field that carries row identity.
pub const ID_FIELD: &str = "id";

/// One data row flowing through the table.
///
/// Records hold field values as an insertion-ordered map, so the key order of
/// the first record can drive column inference. The only field the engine
/// relies on is [`ID_FIELD`], used as row identity when rendering.
///
/// # Example
///
/// ```
/// use tatua_lib::model::Record;
///
/// let record = Record::new()
///     .set("id", 1)
///     .set("name", "Ann")
///     .set("age", 30);
///
/// assert_eq!(record.text("name"), "Ann");
/// assert_eq!(record.id_text(), "1");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub(crate) fields: IndexMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Returns the identity value, if present.
    pub fn id(&self) -> Option<&Value> {
        self.fields.get(ID_FIELD)
    }

    /// Returns the identity rendered as text (empty when absent).
    pub fn id_text(&self) -> String {
        self.id().map(|v| v.as_text().into_owned()).unwrap_or_default()
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the display text of a field (empty when absent).
    pub fn text(&self, field: &str) -> String {
        self.get(field)
            .map(|v| v.as_text().into_owned())
            .unwrap_or_default()
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value, keeping the position of an existing field.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.shift_remove(field)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
