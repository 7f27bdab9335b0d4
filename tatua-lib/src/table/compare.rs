//! Typed value ordering and multi-key record sorting.

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::Utc;

use super::coerce::value_date;
use super::coerce::value_number;
use super::criteria::SortCriterion;
use super::schema::ColumnType;
use super::schema::Schema;
use crate::model::Record;
use crate::model::Value;

/// Orders two field values under a column type.
///
/// Closures with the matching signature implement this, so a table can swap
/// in a custom ordering without a named type.
pub trait Comparator: Send + Sync {
    fn compare(&self, a: Option<&Value>, b: Option<&Value>, column_type: ColumnType) -> Ordering;
}

impl<F> Comparator for F
where
    F: Fn(Option<&Value>, Option<&Value>, ColumnType) -> Ordering + Send + Sync,
{
    fn compare(&self, a: Option<&Value>, b: Option<&Value>, column_type: ColumnType) -> Ordering {
        self(a, b, column_type)
    }
}

/// The default per-type ordering. See [`compare_values`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedComparator;

impl Comparator for TypedComparator {
    fn compare(&self, a: Option<&Value>, b: Option<&Value>, column_type: ColumnType) -> Ordering {
        compare_values(a, b, column_type)
    }
}

/// Compares two values under a column type.
///
/// - `number`: lenient float parse, unreadable values count as `0`
/// - `date`: unreadable values count as the Unix epoch
/// - `string`: case-insensitive, absent values count as `""`
pub fn compare_values(a: Option<&Value>, b: Option<&Value>, column_type: ColumnType) -> Ordering {
    match column_type {
        ColumnType::Number => {
            let a = a.and_then(value_number).unwrap_or(0.0);
            let b = b.and_then(value_number).unwrap_or(0.0);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        ColumnType::Date => {
            let a = a.and_then(value_date).unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
            let b = b.and_then(value_date).unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
            a.cmp(&b)
        }
        ColumnType::String => {
            let a = a.map(|v| v.as_text().to_lowercase()).unwrap_or_default();
            let b = b.map(|v| v.as_text().to_lowercase()).unwrap_or_default();
            a.cmp(&b)
        }
    }
}

/// Compares two records key by key; the first non-equal key decides.
pub fn compare_records(
    a: &Record,
    b: &Record,
    criteria: &[SortCriterion],
    schema: &Schema,
    comparator: &dyn Comparator,
) -> Ordering {
    for criterion in criteria {
        let column_type = schema.column_type(&criterion.column);
        let ordering = comparator.compare(
            a.get(&criterion.column),
            b.get(&criterion.column),
            column_type,
        );
        let ordering = criterion.direction.apply(ordering);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Sorts records in place. Ties keep their original relative order.
pub fn sort_records(
    records: &mut [Record],
    criteria: &[SortCriterion],
    schema: &Schema,
    comparator: &dyn Comparator,
) {
    if criteria.is_empty() {
        return;
    }
    records.sort_by(|a, b| compare_records(a, b, criteria, schema, comparator));
}
