//! Typed filter relations and AND-composed record filtering.

use std::cmp::Ordering;

use super::coerce::parse_date;
use super::coerce::parse_number;
use super::coerce::value_date;
use super::coerce::value_number;
use super::criteria::FilterCriterion;
use super::relation::Relation;
use super::relation::RelationCatalog;
use super::schema::ColumnType;
use super::schema::Schema;
use crate::model::Record;
use crate::model::Value;

/// Decides whether a record satisfies one filter criterion.
pub trait Predicate: Send + Sync {
    fn matches(&self, record: &Record, criterion: &FilterCriterion, column_type: ColumnType) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&Record, &FilterCriterion, ColumnType) -> bool + Send + Sync,
{
    fn matches(&self, record: &Record, criterion: &FilterCriterion, column_type: ColumnType) -> bool {
        self(record, criterion, column_type)
    }
}

/// The default per-type relation semantics. See [`matches_criterion`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedPredicate;

impl Predicate for TypedPredicate {
    fn matches(&self, record: &Record, criterion: &FilterCriterion, column_type: ColumnType) -> bool {
        matches_criterion(record.get(&criterion.column), criterion, column_type)
    }
}

/// Evaluates a criterion against a field value.
///
/// `empty` holds for missing, null and blank fields. Every other relation is
/// vacuously true while the criterion value is blank, and fails on missing or
/// null fields. Numbers and dates that cannot be read fail the criterion.
pub fn matches_criterion(
    value: Option<&Value>,
    criterion: &FilterCriterion,
    column_type: ColumnType,
) -> bool {
    if criterion.relation == Relation::Empty {
        return value.is_none_or(Value::is_empty);
    }
    if criterion.value.is_empty() {
        return true;
    }
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return false;
    };

    match (column_type, criterion.relation) {
        (ColumnType::Number, Relation::Eq | Relation::Gt | Relation::Lt) => {
            let (Some(field), Some(target)) = (value_number(value), parse_number(&criterion.value))
            else {
                return false;
            };
            ordering_holds(field.partial_cmp(&target), criterion.relation)
        }
        (ColumnType::Date, Relation::Eq) => {
            let (Some(field), Some(target)) = (value_date(value), parse_date(&criterion.value))
            else {
                return false;
            };
            field.date_naive() == target.date_naive()
        }
        (ColumnType::Date, Relation::Gt | Relation::Lt) => {
            let (Some(field), Some(target)) = (value_date(value), parse_date(&criterion.value))
            else {
                return false;
            };
            ordering_holds(Some(field.cmp(&target)), criterion.relation)
        }
        (_, relation) => {
            let field = value.as_text().to_lowercase();
            let target = criterion.value.to_lowercase();
            match relation {
                Relation::Eq => field == target,
                Relation::Contains => field.contains(&target),
                Relation::StartsWith => field.starts_with(&target),
                Relation::Gt | Relation::Lt => ordering_holds(Some(field.cmp(&target)), relation),
                Relation::Empty => false,
            }
        }
    }
}

fn ordering_holds(ordering: Option<Ordering>, relation: Relation) -> bool {
    matches!(
        (ordering, relation),
        (Some(Ordering::Equal), Relation::Eq)
            | (Some(Ordering::Greater), Relation::Gt)
            | (Some(Ordering::Less), Relation::Lt)
    )
}

/// Keeps the records that satisfy every criterion.
///
/// A criterion whose relation is not offered for its column's type rejects
/// every record.
pub fn filter_records(
    records: &[Record],
    criteria: &[FilterCriterion],
    schema: &Schema,
    catalog: &RelationCatalog,
    predicate: &dyn Predicate,
) -> Vec<Record> {
    let typed: Vec<(&FilterCriterion, ColumnType)> = criteria
        .iter()
        .map(|c| (c, schema.column_type(&c.column)))
        .collect();

    if let Some((criterion, column_type)) = typed
        .iter()
        .find(|(c, ty)| !catalog.allows(*ty, c.relation))
    {
        log::warn!(
            "Relation {} is not offered for {} column {:?}",
            criterion.relation,
            column_type,
            criterion.column
        );
        return Vec::new();
    }

    records
        .iter()
        .filter(|record| {
            typed
                .iter()
                .all(|(criterion, column_type)| predicate.matches(record, criterion, *column_type))
        })
        .cloned()
        .collect()
}
