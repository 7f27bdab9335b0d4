//! Filter relations and the per-type relation catalog.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use super::schema::ColumnType;
use crate::error::SchemaError;

/// A relational operator a filter criterion applies to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    /// Equality (same calendar day for dates).
    Eq,
    /// Greater than, or after for dates.
    Gt,
    /// Less than, or before for dates.
    Lt,
    /// Case-insensitive substring.
    Contains,
    /// Case-insensitive prefix.
    StartsWith,
    /// Field is missing, null or the empty string.
    Empty,
}

impl Relation {
    /// Returns the wire name used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Contains => "contains",
            Self::StartsWith => "startswith",
            Self::Empty => "empty",
        }
    }

    /// Returns the human label for a column type.
    pub fn label(&self, column_type: ColumnType) -> &'static str {
        match (self, column_type) {
            (Self::Eq, _) => "Equals",
            (Self::Gt, ColumnType::Date) => "After",
            (Self::Gt, _) => "Greater Than",
            (Self::Lt, ColumnType::Date) => "Before",
            (Self::Lt, _) => "Less Than",
            (Self::Contains, _) => "Contains",
            (Self::StartsWith, _) => "Starts With",
            (Self::Empty, _) => "Is Empty",
        }
    }

    /// Returns `false` for relations that ignore the criterion value.
    pub fn requires_value(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Self::Eq),
            "gt" => Ok(Self::Gt),
            "lt" => Ok(Self::Lt),
            "contains" => Ok(Self::Contains),
            "startswith" => Ok(Self::StartsWith),
            "empty" => Ok(Self::Empty),
            other => Err(SchemaError::UnknownRelation(other.to_string())),
        }
    }
}

const STRING_RELATIONS: &[Relation] = &[
    Relation::Eq,
    Relation::Contains,
    Relation::StartsWith,
    Relation::Empty,
];
const NUMBER_RELATIONS: &[Relation] = &[Relation::Eq, Relation::Gt, Relation::Lt, Relation::Empty];
const DATE_RELATIONS: &[Relation] = &[Relation::Eq, Relation::Gt, Relation::Lt, Relation::Empty];

/// Relations offered per column type.
///
/// Overrides replace the default list for one type. The first relation of a
/// list is what a new or re-targeted filter criterion starts with.
///
/// # Example
///
/// ```
/// use tatua_lib::table::{ColumnType, Relation, RelationCatalog};
///
/// let catalog = RelationCatalog::default()
///     .with_relations(ColumnType::String, vec![Relation::Contains, Relation::Eq]);
///
/// assert_eq!(catalog.first(ColumnType::String), Relation::Contains);
/// assert!(!catalog.allows(ColumnType::String, Relation::StartsWith));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationCatalog {
    overrides: HashMap<ColumnType, Vec<Relation>>,
}

impl RelationCatalog {
    /// Replaces the relation list for a column type.
    ///
    /// An empty list is ignored and the default stays in effect.
    pub fn with_relations(mut self, column_type: ColumnType, relations: Vec<Relation>) -> Self {
        self.set_relations(column_type, relations);
        self
    }

    /// Replaces the relation list for a column type in place.
    pub fn set_relations(&mut self, column_type: ColumnType, relations: Vec<Relation>) {
        if relations.is_empty() {
            log::warn!("Ignoring empty relation list for {} columns", column_type);
            return;
        }
        self.overrides.insert(column_type, relations);
    }

    /// Builds a catalog from type-name keyed overrides, as read from configuration.
    pub fn from_overrides(overrides: &HashMap<String, Vec<Relation>>) -> Result<Self, SchemaError> {
        let mut catalog = Self::default();
        for (name, relations) in overrides {
            let column_type: ColumnType = name.parse()?;
            catalog.set_relations(column_type, relations.clone());
        }
        Ok(catalog)
    }

    /// Returns the relations offered for a column type.
    pub fn relations(&self, column_type: ColumnType) -> &[Relation] {
        if let Some(relations) = self.overrides.get(&column_type) {
            return relations;
        }
        match column_type {
            ColumnType::String => STRING_RELATIONS,
            ColumnType::Number => NUMBER_RELATIONS,
            ColumnType::Date => DATE_RELATIONS,
        }
    }

    /// Returns the default relation for a column type.
    pub fn first(&self, column_type: ColumnType) -> Relation {
        self.relations(column_type)
            .first()
            .copied()
            .unwrap_or(Relation::Eq)
    }

    /// Returns `true` if the relation is in the type's list.
    pub fn allows(&self, column_type: ColumnType, relation: Relation) -> bool {
        self.relations(column_type).contains(&relation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_starts_with_eq() {
        let catalog = RelationCatalog::default();
        for ty in ColumnType::all() {
            assert_eq!(catalog.first(*ty), Relation::Eq);
            assert!(catalog.allows(*ty, Relation::Empty));
        }
        assert!(catalog.allows(ColumnType::String, Relation::Contains));
        assert!(!catalog.allows(ColumnType::Number, Relation::Contains));
        assert!(!catalog.allows(ColumnType::String, Relation::Gt));
    }

    #[test]
    fn test_wire_names_round_trip() {
        for relation in [
            Relation::Eq,
            Relation::Gt,
            Relation::Lt,
            Relation::Contains,
            Relation::StartsWith,
            Relation::Empty,
        ] {
            assert_eq!(relation.as_str().parse::<Relation>().unwrap(), relation);
        }
        assert!("like".parse::<Relation>().is_err());
        assert_eq!(
            serde_json::to_string(&Relation::StartsWith).unwrap(),
            "\"startswith\""
        );
    }

    #[test]
    fn test_labels_depend_on_type() {
        assert_eq!(Relation::Gt.label(ColumnType::Date), "After");
        assert_eq!(Relation::Gt.label(ColumnType::Number), "Greater Than");
        assert_eq!(Relation::Lt.label(ColumnType::Date), "Before");
    }

    #[test]
    fn test_overrides_from_config() {
        let mut overrides = HashMap::new();
        overrides.insert("number".to_string(), vec![Relation::Gt, Relation::Lt]);
        let catalog = RelationCatalog::from_overrides(&overrides).unwrap();

        assert_eq!(catalog.first(ColumnType::Number), Relation::Gt);
        assert_eq!(catalog.first(ColumnType::String), Relation::Eq);

        overrides.insert("money".to_string(), vec![Relation::Eq]);
        assert!(RelationCatalog::from_overrides(&overrides).is_err());
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let catalog = RelationCatalog::default().with_relations(ColumnType::Date, vec![]);
        assert_eq!(catalog.relations(ColumnType::Date), DATE_RELATIONS);
    }
}
