//! Render output of a table.
//!
//! A [`TableView`] is a plain snapshot: header labels, formatted rows for the
//! current page, navigation controls, criteria controls and the popups while
//! they are open. Front ends draw it however they like; [`fmt::Display`]
//! gives a text rendering for terminals.

use std::fmt;

use super::criteria::CriterionId;
use super::criteria::Direction;
use super::relation::Relation;

/// Shown in place of rows when the table has no records.
pub const EMPTY_MESSAGE: &str = "No data available";

/// A header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Row identity, the record's `id` as text.
    pub id: String,
    /// Formatted cells, one per visible column.
    pub cells: Vec<String>,
}

/// What a navigation button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    First,
    Prev,
    Page(usize),
    Next,
    Last,
}

/// A navigation button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavButton {
    pub target: NavTarget,
    pub label: String,
    pub disabled: bool,
    /// Set on the button of the current page.
    pub active: bool,
}

/// Navigation controls, present only when there is more than one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControls {
    pub current: usize,
    pub total_pages: usize,
    pub buttons: Vec<NavButton>,
}

impl PaginationControls {
    /// Builds the button row, or `None` for a single page.
    pub fn build(current: usize, total_pages: usize) -> Option<Self> {
        if total_pages <= 1 {
            return None;
        }

        let at_start = current <= 1;
        let at_end = current >= total_pages;
        let nav = |target, label: &str, disabled| NavButton {
            target,
            label: label.to_string(),
            disabled,
            active: false,
        };

        let mut buttons = Vec::with_capacity(total_pages + 4);
        buttons.push(nav(NavTarget::First, "«", at_start));
        buttons.push(nav(NavTarget::Prev, "‹", at_start));
        for page in 1..=total_pages {
            buttons.push(NavButton {
                target: NavTarget::Page(page),
                label: page.to_string(),
                disabled: false,
                active: page == current,
            });
        }
        buttons.push(nav(NavTarget::Next, "›", at_end));
        buttons.push(nav(NavTarget::Last, "»", at_end));

        Some(Self {
            current,
            total_pages,
            buttons,
        })
    }
}

/// Trigger button for the sort or filter popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaControl {
    /// `"Sort"`, or `"2 Sort"` with two applied criteria.
    pub label: String,
    /// Number of applied criteria.
    pub count: usize,
    /// Whether the clear affordance is shown.
    pub clearable: bool,
}

impl CriteriaControl {
    pub fn new(name: &str, count: usize) -> Self {
        let label = if count > 0 {
            format!("{} {}", count, name)
        } else {
            name.to_string()
        };
        Self {
            label,
            count,
            clearable: count > 0,
        }
    }
}

/// A choice in a picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

/// A draft sort criterion as shown in the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRowView {
    pub id: CriterionId,
    pub column: String,
    pub direction: Direction,
}

/// The open sort popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortPopupView {
    /// Columns offered in the column picker.
    pub columns: Vec<Choice>,
    pub rows: Vec<SortRowView>,
}

/// A draft filter criterion as shown in the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRowView {
    pub id: CriterionId,
    pub column: String,
    pub relation: Relation,
    pub value: String,
    /// Relations offered for the row's column type.
    pub relations: Vec<Choice>,
    /// `false` when the relation ignores the value input.
    pub needs_value: bool,
}

/// The open filter popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPopupView {
    pub columns: Vec<Choice>,
    pub rows: Vec<FilterRowView>,
}

/// Everything a front end needs to draw the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<RowView>,
    pub pagination: Option<PaginationControls>,
    /// Absent when sorting is disabled.
    pub sort: Option<CriteriaControl>,
    /// Absent when filtering is disabled.
    pub filter: Option<CriteriaControl>,
    pub sort_popup: Option<SortPopupView>,
    pub filter_popup: Option<FilterPopupView>,
    /// A delegated query is outstanding.
    pub loading: bool,
    /// The table has no records at all.
    pub empty: bool,
}

impl TableView {
    /// Returns the header labels in order.
    pub fn labels(&self) -> Vec<&str> {
        self.headers.iter().map(|h| h.label.as_str()).collect()
    }

    /// Returns the cells of one column for every row on the page.
    pub fn column_cells(&self, key: &str) -> Vec<&str> {
        let Some(index) = self.headers.iter().position(|h| h.key == key) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.cells.get(index).map(String::as_str))
            .collect()
    }
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let controls: Vec<String> = [&self.sort, &self.filter]
            .into_iter()
            .flatten()
            .map(|c| {
                if c.clearable {
                    format!("[{} ×]", c.label)
                } else {
                    format!("[{}]", c.label)
                }
            })
            .collect();
        if !controls.is_empty() {
            writeln!(f, "{}", controls.join(" "))?;
        }
        if self.loading {
            writeln!(f, "Loading...")?;
        }
        if self.empty {
            return writeln!(f, "{}", EMPTY_MESSAGE);
        }

        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .map(|h| h.label.chars().count())
            .collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |cells: Vec<&str>| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        writeln!(f, "{}", line(self.labels()))?;
        let rule: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 3;
        writeln!(f, "{}", "-".repeat(rule))?;
        for row in &self.rows {
            writeln!(f, "{}", line(row.cells.iter().map(String::as_str).collect()))?;
        }

        if let Some(pagination) = &self.pagination {
            let buttons: Vec<String> = pagination
                .buttons
                .iter()
                .map(|b| {
                    if b.active {
                        format!("[{}]", b.label)
                    } else {
                        b.label.clone()
                    }
                })
                .collect();
            writeln!(
                f,
                "{}  (page {} of {})",
                buttons.join(" "),
                pagination.current,
                pagination.total_pages
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> TableView {
        TableView {
            headers: vec![
                HeaderCell {
                    key: "name".into(),
                    label: "Name".into(),
                },
                HeaderCell {
                    key: "age".into(),
                    label: "Age".into(),
                },
            ],
            rows: vec![RowView {
                id: "2".into(),
                cells: vec!["Bob".into(), "25".into()],
            }],
            pagination: PaginationControls::build(2, 3),
            sort: Some(CriteriaControl::new("Sort", 2)),
            filter: Some(CriteriaControl::new("Filter", 0)),
            sort_popup: None,
            filter_popup: None,
            loading: false,
            empty: false,
        }
    }

    #[test]
    fn test_single_page_has_no_controls() {
        assert!(PaginationControls::build(1, 1).is_none());
    }

    #[test]
    fn test_pagination_buttons() {
        let controls = PaginationControls::build(1, 3).unwrap();
        assert_eq!(controls.buttons.len(), 7);
        assert!(controls.buttons[0].disabled);
        assert!(controls.buttons[1].disabled);
        assert!(controls.buttons[2].active);
        assert!(!controls.buttons[5].disabled);

        let controls = PaginationControls::build(3, 3).unwrap();
        assert!(controls.buttons[5].disabled);
        assert!(controls.buttons[6].disabled);
        assert_eq!(controls.buttons[4].target, NavTarget::Page(3));
    }

    #[test]
    fn test_criteria_badge() {
        let control = CriteriaControl::new("Sort", 2);
        assert_eq!(control.label, "2 Sort");
        assert!(control.clearable);

        let control = CriteriaControl::new("Filter", 0);
        assert_eq!(control.label, "Filter");
        assert!(!control.clearable);
    }

    #[test]
    fn test_text_rendering() {
        let text = view().to_string();
        assert!(text.starts_with("[2 Sort ×] [Filter]\n"));
        assert!(text.contains("Name | Age"));
        assert!(text.contains("Bob  | 25"));
        assert!(text.contains("« ‹ 1 [2] 3 › »  (page 2 of 3)"));
    }

    #[test]
    fn test_empty_rendering() {
        let mut view = view();
        view.empty = true;
        view.rows.clear();
        assert!(view.to_string().ends_with("No data available\n"));
        assert!(view.column_cells("name").is_empty());
    }
}
