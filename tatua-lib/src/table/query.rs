//! Query suffix for delegated sorting and filtering.
//!
//! The suffix has the shape
//! `?sort=col:order,col:order&filter=col:relation:value,...` with filter
//! values percent-encoded. Empty segments are left out, and no criteria at
//! all yields the empty string.

use std::fmt;

use super::criteria::Direction;
use super::criteria::FilterCriterion;
use super::criteria::SortCriterion;
use super::relation::Relation;
use crate::error::SchemaError;

/// Applied criteria as they travel to a record source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub sort: Vec<SortCriterion>,
    pub filter: Vec<FilterCriterion>,
}

impl Query {
    pub fn new(sort: Vec<SortCriterion>, filter: Vec<FilterCriterion>) -> Self {
        Self { sort, filter }
    }

    /// Returns `true` if there are no criteria.
    pub fn is_empty(&self) -> bool {
        self.sort.is_empty() && self.filter.is_empty()
    }

    /// Serializes into a query suffix.
    ///
    /// ```
    /// use tatua_lib::table::{Query, SortCriterion};
    ///
    /// let query = Query::new(vec![SortCriterion::desc("age")], vec![]);
    /// assert_eq!(query.to_suffix(), "?sort=age:desc");
    /// assert_eq!(Query::default().to_suffix(), "");
    /// ```
    pub fn to_suffix(&self) -> String {
        let mut segments = Vec::with_capacity(2);
        if !self.sort.is_empty() {
            segments.push(format!("sort={}", sort_to_query(&self.sort)));
        }
        if !self.filter.is_empty() {
            segments.push(format!("filter={}", filter_to_query(&self.filter)));
        }

        if segments.is_empty() {
            String::new()
        } else {
            format!("?{}", segments.join("&"))
        }
    }

    /// Parses a query suffix. The leading `?` is optional.
    ///
    /// Criteria get fresh ids; unrelated parameters are skipped.
    pub fn parse(suffix: &str) -> Result<Self, SchemaError> {
        let mut query = Self::default();
        let params = suffix.strip_prefix('?').unwrap_or(suffix);

        for param in params.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = param
                .split_once('=')
                .ok_or_else(|| SchemaError::InvalidQuery(param.to_string()))?;
            match name {
                "sort" => {
                    for item in value.split(',').filter(|i| !i.is_empty()) {
                        query.sort.push(parse_sort(item)?);
                    }
                }
                "filter" => {
                    for item in value.split(',').filter(|i| !i.is_empty()) {
                        query.filter.push(parse_filter(item)?);
                    }
                }
                _ => {}
            }
        }

        Ok(query)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_suffix())
    }
}

/// Serializes sort criteria as `col:order` joined by commas.
pub fn sort_to_query(criteria: &[SortCriterion]) -> String {
    criteria
        .iter()
        .map(|c| format!("{}:{}", c.column, c.direction.as_str()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Serializes filter criteria as `col:relation:value` joined by commas.
pub fn filter_to_query(criteria: &[FilterCriterion]) -> String {
    criteria
        .iter()
        .map(|c| {
            format!(
                "{}:{}:{}",
                c.column,
                c.relation.as_str(),
                urlencoding::encode(&c.value)
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_sort(item: &str) -> Result<SortCriterion, SchemaError> {
    let (column, order) = item
        .rsplit_once(':')
        .ok_or_else(|| SchemaError::InvalidQuery(item.to_string()))?;
    let direction: Direction = order.parse()?;
    Ok(SortCriterion::new(column, direction))
}

fn parse_filter(item: &str) -> Result<FilterCriterion, SchemaError> {
    let mut parts = item.splitn(3, ':');
    let (Some(column), Some(relation), Some(value)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(SchemaError::InvalidQuery(item.to_string()));
    };
    let relation: Relation = relation.parse()?;
    let value = urlencoding::decode(value)
        .map_err(|e| SchemaError::InvalidQuery(format!("{}: {}", item, e)))?;
    Ok(FilterCriterion::new(column, relation, value.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_only() {
        let query = Query::new(vec![SortCriterion::desc("age")], vec![]);
        assert_eq!(query.to_suffix(), "?sort=age:desc");
    }

    #[test]
    fn test_both_segments() {
        let query = Query::new(
            vec![SortCriterion::asc("age"), SortCriterion::desc("name")],
            vec![
                FilterCriterion::new("name", Relation::Contains, "a, b&c"),
                FilterCriterion::new("age", Relation::Gt, "18"),
            ],
        );
        assert_eq!(
            query.to_suffix(),
            "?sort=age:asc,name:desc&filter=name:contains:a%2C%20b%26c,age:gt:18"
        );
    }

    #[test]
    fn test_filter_only_and_empty() {
        let query = Query::new(vec![], vec![FilterCriterion::new("age", Relation::Empty, "")]);
        assert_eq!(query.to_suffix(), "?filter=age:empty:");
        assert_eq!(Query::default().to_suffix(), "");
    }

    #[test]
    fn test_parse_decodes_values() {
        let query = Query::parse("?sort=age:desc&filter=name:contains:a%2C%20b%26c,age:gt:18").unwrap();
        assert_eq!(query.sort.len(), 1);
        assert_eq!(query.sort[0].column, "age");
        assert_eq!(query.sort[0].direction, Direction::Desc);
        assert_eq!(query.filter[0].value, "a, b&c");
        assert_eq!(query.filter[1].relation, Relation::Gt);

        assert!(Query::parse("").unwrap().is_empty());
        assert!(Query::parse("?page=2").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Query::parse("?sort=age").is_err());
        assert!(Query::parse("?sort=age:sideways").is_err());
        assert!(Query::parse("?filter=age:gt").is_err());
        assert!(Query::parse("?filter=age:like:3").is_err());
        assert!(Query::parse("?sort").is_err());
    }
}
