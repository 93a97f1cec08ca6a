//! Flatten-and-merge engine shared by every report.
//!
//! A report hands [`build_table`] the rows it expanded from its records and
//! a [`ReportLayout`] describing columns, ordering and merged columns. The
//! engine checks the rows against the layout, sorts them and computes the
//! merge regions the renderer needs.

use tracing::debug;

use crate::inventory::report::error::{ReportError, Result};
use crate::inventory::report::model::{FlatRow, MergeRegion};

pub mod align;
pub mod expand;
pub mod merge;
pub mod normalize;
pub mod sort;

pub use align::align;
pub use expand::expand;
pub use merge::{MergeColumn, compute_merges, compute_scoped_merges};
pub use normalize::{NameIndex, normalize};
pub use sort::{SortKey, sort};

/// A column header and its rendered width in character units.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    pub width: f64,
}

/// A label spanning several adjacent columns in an extra header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderGroup {
    pub label: String,
    pub first: usize,
    pub last: usize,
}

impl HeaderGroup {
    pub fn contains(&self, column: usize) -> bool {
        (self.first..=self.last).contains(&column)
    }
}

/// Column, ordering and merge configuration of one report.
#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub sheet_name: String,
    pub columns: Vec<Column>,
    pub groups: Vec<HeaderGroup>,
    pub sort_keys: Vec<SortKey>,
    pub merges: Vec<MergeColumn>,
}

impl ReportLayout {
    pub fn builder(sheet_name: impl Into<String>) -> ReportLayoutBuilder {
        ReportLayoutBuilder {
            layout: ReportLayout {
                sheet_name: sheet_name.into(),
                columns: Vec::new(),
                groups: Vec::new(),
                sort_keys: Vec::new(),
                merges: Vec::new(),
            },
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

/// Builder for [`ReportLayout`]. Column references are checked in
/// [`ReportLayoutBuilder::build`].
#[derive(Debug, Clone)]
pub struct ReportLayoutBuilder {
    layout: ReportLayout,
}

impl ReportLayoutBuilder {
    pub fn column(mut self, header: impl Into<String>, width: f64) -> Self {
        self.layout.columns.push(Column {
            header: header.into(),
            width,
        });
        self
    }

    pub fn group(mut self, label: impl Into<String>, first: usize, last: usize) -> Self {
        self.layout.groups.push(HeaderGroup {
            label: label.into(),
            first,
            last,
        });
        self
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.layout.sort_keys.push(key);
        self
    }

    pub fn merge(mut self, column: MergeColumn) -> Self {
        self.layout.merges.push(column);
        self
    }

    pub fn build(self) -> Result<ReportLayout> {
        let width = self.layout.width();
        sort::validate_keys(&self.layout.sort_keys, width)?;
        merge::validate_merge_columns(&self.layout.merges, width)?;
        for group in &self.layout.groups {
            if group.first > group.last || group.last >= width {
                return Err(ReportError::ColumnOutOfRange {
                    column: group.last.max(group.first),
                    width,
                });
            }
        }
        Ok(self.layout)
    }
}

/// A sorted, merge-annotated table ready to be rendered as one sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<Column>,
    pub groups: Vec<HeaderGroup>,
    pub rows: Vec<FlatRow>,
    pub merges: Vec<MergeRegion>,
}

impl SheetTable {
    pub fn headers(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|column| column.header.as_str())
            .collect()
    }

    /// Number of header rows the renderer emits before the data.
    pub fn header_rows(&self) -> usize {
        if self.groups.is_empty() { 1 } else { 2 }
    }

    pub fn group_for(&self, column: usize) -> Option<&HeaderGroup> {
        self.groups.iter().find(|group| group.contains(column))
    }
}

/// Orders `rows` according to `layout` and computes their merge regions.
///
/// Every row must have exactly one cell per layout column.
pub fn build_table(layout: &ReportLayout, rows: Vec<FlatRow>) -> Result<SheetTable> {
    let width = layout.width();
    if let Some(row) = rows.iter().find(|row| row.len() != width) {
        return Err(ReportError::RowWidth {
            expected: width,
            found: row.len(),
        });
    }

    let rows = sort(&rows, &layout.sort_keys);
    let merges = compute_scoped_merges(&rows, &layout.merges);
    debug!(
        sheet = %layout.sheet_name,
        row_count = rows.len(),
        merged = merges.iter().filter(|region| region.is_merged()).count(),
        "table flattened"
    );

    Ok(SheetTable {
        sheet_name: layout.sheet_name.clone(),
        columns: layout.columns.clone(),
        groups: layout.groups.clone(),
        rows,
        merges,
    })
}
