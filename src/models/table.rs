use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::db::models::{Article, Author, NewsItem};

/// Sort direction of the active column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Which column (by index) a table is sorted by, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<usize>,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: None,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortState {
    /// Header click: the active column flips direction, any other column
    /// becomes active in ascending order.
    pub fn toggled(self, column: usize) -> Self {
        if self.column == Some(column) {
            Self {
                column: Some(column),
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                column: Some(column),
                direction: SortDirection::Ascending,
            }
        }
    }
}

/// Comparable value behind a rendered cell.
///
/// Columns are homogeneous; `Empty` sorts before every other key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Empty,
    Flag(bool),
    Timestamp(i64),
    /// Stored lower-cased so ordering is case-insensitive.
    Text(String),
}

impl SortKey {
    pub fn text(value: &str) -> Self {
        if value.is_empty() {
            SortKey::Empty
        } else {
            SortKey::Text(value.to_lowercase())
        }
    }

    pub fn timestamp(value: DateTime<Utc>) -> Self {
        SortKey::Timestamp(value.timestamp_millis())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub display: String,
    pub key: SortKey,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        let display = value.into();
        let key = SortKey::text(&display);
        Self { display, key }
    }

    pub fn timestamp(value: DateTime<Utc>) -> Self {
        Self {
            display: value.format("%Y-%m-%d %H:%M").to_string(),
            key: SortKey::timestamp(value),
        }
    }

    pub fn flag(value: bool) -> Self {
        Self {
            display: if value { "Yes" } else { "No" }.to_string(),
            key: SortKey::Flag(value),
        }
    }
}

/// A column header description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub label: &'static str,
    /// Included in the substring filter and autocomplete.
    pub searchable: bool,
    pub sortable: bool,
}

impl ColumnSpec {
    pub const fn searchable(label: &'static str) -> Self {
        Self {
            label,
            searchable: true,
            sortable: true,
        }
    }

    pub const fn sortable(label: &'static str) -> Self {
        Self {
            label,
            searchable: false,
            sortable: true,
        }
    }
}

/// One rendered table row, keyed by document id.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<Cell>,
}

/// Anything that can be shown in the generic document table.
pub trait Tabular {
    fn columns() -> Vec<ColumnSpec>;

    fn to_row(&self) -> TableRow;
}

impl Tabular for Article {
    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::searchable("Title"),
            ColumnSpec::searchable("Author"),
            ColumnSpec::searchable("Label"),
            ColumnSpec::sortable("Created"),
            ColumnSpec::sortable("Published"),
        ]
    }

    fn to_row(&self) -> TableRow {
        TableRow {
            id: self.id.clone(),
            cells: vec![
                Cell::text(&self.title),
                Cell::text(&self.author_name),
                Cell::text(&self.label),
                Cell::timestamp(self.created_at),
                Cell::flag(self.published),
            ],
        }
    }
}

impl Tabular for NewsItem {
    fn columns() -> Vec<ColumnSpec> {
        vec![ColumnSpec::searchable("Title"), ColumnSpec::sortable("Created")]
    }

    fn to_row(&self) -> TableRow {
        TableRow {
            id: self.id.clone(),
            cells: vec![Cell::text(&self.title), Cell::timestamp(self.created_at)],
        }
    }
}

impl Tabular for Author {
    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::searchable("Name"),
            ColumnSpec::searchable("Role"),
            ColumnSpec::searchable("City"),
            ColumnSpec::searchable("Job"),
        ]
    }

    fn to_row(&self) -> TableRow {
        let role = self.role.map(|r| r.label()).unwrap_or("");
        TableRow {
            id: self.id.clone(),
            cells: vec![
                Cell::text(&self.name),
                Cell::text(role),
                Cell::text(&self.city),
                Cell::text(&self.job),
            ],
        }
    }
}

fn matches(row: &TableRow, columns: &[ColumnSpec], needle: &str) -> bool {
    row.cells
        .iter()
        .zip(columns)
        .any(|(cell, col)| col.searchable && cell.display.to_lowercase().contains(needle))
}

/// Keep the rows whose searchable cells contain `query` (case-insensitive).
///
/// An empty or blank query keeps every row.
pub fn filter_rows(rows: &[TableRow], columns: &[ColumnSpec], query: &str) -> Vec<TableRow> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|row| matches(row, columns, &needle))
        .cloned()
        .collect()
}

/// Stable sort by the selected column; equal keys keep their fetch order.
pub fn sort_rows(rows: &mut [TableRow], sort: SortState) {
    let Some(column) = sort.column else {
        return;
    };

    rows.sort_by(|a, b| {
        let ord = match (a.cells.get(column), b.cells.get(column)) {
            (Some(x), Some(y)) => x.key.cmp(&y.key),
            _ => Ordering::Equal,
        };
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Filter then sort, the pipeline behind every list page.
pub fn view_rows(
    rows: &[TableRow],
    columns: &[ColumnSpec],
    query: &str,
    sort: SortState,
) -> Vec<TableRow> {
    let mut visible = filter_rows(rows, columns, query);
    sort_rows(&mut visible, sort);
    visible
}

/// Autocomplete: distinct searchable cell values containing `query`,
/// in fetch order, at most `limit` of them.
pub fn suggestions(
    rows: &[TableRow],
    columns: &[ColumnSpec],
    query: &str,
    limit: usize,
) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut found: Vec<String> = Vec::new();
    for row in rows {
        for (cell, col) in row.cells.iter().zip(columns) {
            if found.len() >= limit {
                return found;
            }
            if col.searchable
                && cell.display.to_lowercase().contains(&needle)
                && !found.contains(&cell.display)
            {
                found.push(cell.display.clone());
            }
        }
    }
    found
}
