//! Sort and filter criteria, and the draft/applied state they live in.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::relation::Relation;
use super::relation::RelationCatalog;
use super::schema::Schema;
use crate::error::SchemaError;

/// Identity of a criterion within its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CriterionId(Uuid);

impl CriterionId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CriterionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Returns the human label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Asc => "Ascending",
            Self::Desc => "Descending",
        }
    }

    /// Orients an ascending comparison.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for Direction {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(SchemaError::UnknownOrder(other.to_string())),
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCriterion {
    pub id: CriterionId,
    pub column: String,
    pub direction: Direction,
}

impl SortCriterion {
    /// Creates a sort key with a fresh id.
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            id: CriterionId::new(),
            column: column.into(),
            direction,
        }
    }

    /// Creates an ascending sort key.
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, Direction::Asc)
    }

    /// Creates a descending sort key.
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, Direction::Desc)
    }
}

/// One filter condition. A list of them is read as logical AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriterion {
    pub id: CriterionId,
    pub column: String,
    pub relation: Relation,
    pub value: String,
}

impl FilterCriterion {
    /// Creates a filter condition with a fresh id.
    pub fn new(column: impl Into<String>, relation: Relation, value: impl Into<String>) -> Self {
        Self {
            id: CriterionId::new(),
            column: column.into(),
            relation,
            value: value.into(),
        }
    }
}

/// A single-field edit to a sort criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum SortField {
    Column(String),
    Direction(Direction),
}

/// A single-field edit to a filter criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterField {
    /// Re-targets the criterion; resets relation and clears the value.
    Column(String),
    Relation(Relation),
    Value(String),
}

/// What a criterion needs to pick defaults and cascade edits.
#[derive(Debug, Clone, Copy)]
pub struct CriterionContext<'a> {
    pub schema: &'a Schema,
    pub catalog: &'a RelationCatalog,
}

/// A criterion kind managed by [`CriteriaState`].
pub trait Criterion: Clone {
    /// Edit applied through [`CriteriaState::update`].
    type Field;

    /// Returns the criterion's identity.
    fn id(&self) -> CriterionId;

    /// Creates a criterion with the kind's defaults.
    fn fresh(ctx: CriterionContext<'_>) -> Self;

    /// Applies one field edit.
    fn update(&mut self, field: Self::Field, ctx: CriterionContext<'_>);
}

impl Criterion for SortCriterion {
    type Field = SortField;

    fn id(&self) -> CriterionId {
        self.id
    }

    fn fresh(ctx: CriterionContext<'_>) -> Self {
        let column = ctx
            .schema
            .sort_columns()
            .next()
            .map(|c| c.key.clone())
            .unwrap_or_default();
        Self::asc(column)
    }

    fn update(&mut self, field: SortField, _ctx: CriterionContext<'_>) {
        match field {
            SortField::Column(column) => self.column = column,
            SortField::Direction(direction) => self.direction = direction,
        }
    }
}

impl Criterion for FilterCriterion {
    type Field = FilterField;

    fn id(&self) -> CriterionId {
        self.id
    }

    fn fresh(ctx: CriterionContext<'_>) -> Self {
        let column = ctx
            .schema
            .filter_columns()
            .next()
            .map(|c| c.key.clone())
            .unwrap_or_default();
        let relation = ctx.catalog.first(ctx.schema.column_type(&column));
        Self::new(column, relation, "")
    }

    fn update(&mut self, field: FilterField, ctx: CriterionContext<'_>) {
        match field {
            FilterField::Column(column) => {
                self.relation = ctx.catalog.first(ctx.schema.column_type(&column));
                self.value.clear();
                self.column = column;
            }
            FilterField::Relation(relation) => self.relation = relation,
            FilterField::Value(value) => self.value = value,
        }
    }
}

/// Applied criteria plus the draft edited in a popup.
///
/// The draft is seeded from the applied list on [`open`](Self::open) and only
/// replaces it on [`apply`](Self::apply). Edits address criteria by id;
/// unknown ids are ignored.
#[derive(Debug, Clone)]
pub struct CriteriaState<C> {
    applied: Vec<C>,
    draft: Vec<C>,
    editing: bool,
}

impl<C> Default for CriteriaState<C> {
    fn default() -> Self {
        Self {
            applied: Vec::new(),
            draft: Vec::new(),
            editing: false,
        }
    }
}

impl<C: Criterion> CriteriaState<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts editing with a copy of the applied criteria.
    pub fn open(&mut self) {
        self.draft = self.applied.clone();
        self.editing = true;
    }

    /// Appends a default criterion to the draft and returns its id.
    pub fn add(&mut self, ctx: CriterionContext<'_>) -> CriterionId {
        let criterion = C::fresh(ctx);
        let id = criterion.id();
        self.draft.push(criterion);
        id
    }

    /// Edits one draft criterion. Returns `false` for an unknown id.
    pub fn update(&mut self, id: CriterionId, field: C::Field, ctx: CriterionContext<'_>) -> bool {
        match self.draft.iter_mut().find(|c| c.id() == id) {
            Some(criterion) => {
                criterion.update(field, ctx);
                true
            }
            None => false,
        }
    }

    /// Removes one draft criterion. Returns `false` for an unknown id.
    pub fn remove(&mut self, id: CriterionId) -> bool {
        let before = self.draft.len();
        self.draft.retain(|c| c.id() != id);
        self.draft.len() != before
    }

    /// Commits the draft and stops editing.
    pub fn apply(&mut self) {
        self.applied = self.draft.clone();
        self.editing = false;
    }

    /// Discards the draft and stops editing.
    pub fn cancel(&mut self) {
        self.draft.clear();
        self.editing = false;
    }

    /// Clears draft and applied criteria at once.
    pub fn reset(&mut self) {
        self.applied.clear();
        self.draft.clear();
        self.editing = false;
    }

    /// Clears the applied criteria, leaving any open draft alone.
    pub fn clear_applied(&mut self) {
        self.applied.clear();
    }

    /// Replaces the applied criteria directly.
    pub fn set_applied(&mut self, criteria: Vec<C>) {
        self.applied = criteria;
    }

    pub fn applied(&self) -> &[C] {
        &self.applied
    }

    pub fn draft(&self) -> &[C] {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::schema::Column;
    use crate::table::schema::ColumnType;

    fn schema() -> Schema {
        Schema::new(vec![
            Column::new("name", "Name"),
            Column::new("age", "Age").with_type(ColumnType::Number),
            Column::new("actions", "Actions").not_sortable(),
        ])
        .unwrap()
    }

    #[test]
    fn test_open_seeds_draft_and_cancel_discards() {
        let schema = schema();
        let catalog = RelationCatalog::default();
        let ctx = CriterionContext {
            schema: &schema,
            catalog: &catalog,
        };

        let mut state = CriteriaState::<SortCriterion>::new();
        state.set_applied(vec![SortCriterion::desc("age")]);
        state.open();
        assert!(state.is_editing());
        assert_eq!(state.draft(), state.applied());

        state.add(ctx);
        assert_eq!(state.draft().len(), 2);
        state.cancel();
        assert!(!state.is_editing());
        assert_eq!(state.applied().len(), 1);
    }

    #[test]
    fn test_add_uses_first_column_defaults() {
        let schema = schema();
        let catalog = RelationCatalog::default();
        let ctx = CriterionContext {
            schema: &schema,
            catalog: &catalog,
        };

        let mut filters = CriteriaState::<FilterCriterion>::new();
        filters.open();
        filters.add(ctx);
        let added = &filters.draft()[0];
        assert_eq!(added.column, "name");
        assert_eq!(added.relation, Relation::Eq);
        assert_eq!(added.value, "");

        let empty = Schema::default();
        let mut sorts = CriteriaState::<SortCriterion>::new();
        sorts.add(CriterionContext {
            schema: &empty,
            catalog: &catalog,
        });
        assert_eq!(sorts.draft()[0].column, "");
        assert_eq!(sorts.draft()[0].direction, Direction::Asc);
    }

    #[test]
    fn test_filter_column_change_resets_relation_and_value() {
        let schema = schema();
        let catalog = RelationCatalog::default()
            .with_relations(ColumnType::Number, vec![Relation::Gt, Relation::Eq]);
        let ctx = CriterionContext {
            schema: &schema,
            catalog: &catalog,
        };

        let mut filters = CriteriaState::<FilterCriterion>::new();
        let id = filters.add(ctx);
        assert!(filters.update(id, FilterField::Relation(Relation::Contains), ctx));
        assert!(filters.update(id, FilterField::Value("an".into()), ctx));
        assert!(filters.update(id, FilterField::Column("age".into()), ctx));

        let criterion = &filters.draft()[0];
        assert_eq!(criterion.column, "age");
        assert_eq!(criterion.relation, Relation::Gt);
        assert!(criterion.value.is_empty());
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let schema = schema();
        let catalog = RelationCatalog::default();
        let ctx = CriterionContext {
            schema: &schema,
            catalog: &catalog,
        };

        let mut sorts = CriteriaState::<SortCriterion>::new();
        sorts.add(ctx);
        let before = sorts.draft().to_vec();

        let stranger = CriterionId::new();
        assert!(!sorts.update(stranger, SortField::Direction(Direction::Desc), ctx));
        assert!(!sorts.remove(stranger));
        assert_eq!(sorts.draft(), before.as_slice());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let schema = schema();
        let catalog = RelationCatalog::default();
        let ctx = CriterionContext {
            schema: &schema,
            catalog: &catalog,
        };

        let mut sorts = CriteriaState::<SortCriterion>::new();
        sorts.open();
        let id = sorts.add(ctx);
        sorts.update(id, SortField::Direction(Direction::Desc), ctx);
        sorts.apply();
        let once = sorts.applied().to_vec();
        sorts.apply();
        assert_eq!(sorts.applied(), once.as_slice());
        assert!(!sorts.is_editing());
    }

    #[test]
    fn test_reset_and_clear_applied() {
        let mut sorts = CriteriaState::<SortCriterion>::new();
        sorts.set_applied(vec![SortCriterion::asc("name")]);
        sorts.open();
        sorts.reset();
        assert!(sorts.applied().is_empty());
        assert!(sorts.draft().is_empty());
        assert!(!sorts.is_editing());

        sorts.set_applied(vec![SortCriterion::asc("name")]);
        sorts.clear_applied();
        assert!(sorts.applied().is_empty());
    }

    #[test]
    fn test_direction_apply() {
        assert_eq!(Direction::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Direction::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!("desc".parse::<Direction>().unwrap(), Direction::Desc);
        assert!("down".parse::<Direction>().is_err());
    }
}
