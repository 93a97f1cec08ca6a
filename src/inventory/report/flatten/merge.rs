use crate::inventory::report::error::{ReportError, Result};
use crate::inventory::report::model::{FlatRow, MergeRegion};

/// A column whose repeated values should render as merged cells.
///
/// Scope columns bound the runs: a run also ends where any scope column
/// changes value, which keeps a merge inside one parent record even when a
/// neighbouring parent shares the same display value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeColumn {
    pub column: usize,
    pub scope: Vec<usize>,
}

impl MergeColumn {
    pub fn new(column: usize) -> Self {
        Self {
            column,
            scope: Vec::new(),
        }
    }

    pub fn within(mut self, scope_column: usize) -> Self {
        if scope_column != self.column && !self.scope.contains(&scope_column) {
            self.scope.push(scope_column);
        }
        self
    }

    fn columns(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.column).chain(self.scope.iter().copied())
    }
}

/// Checks every merge column and scope column against a layout width.
pub fn validate_merge_columns(columns: &[MergeColumn], width: usize) -> Result<()> {
    match columns
        .iter()
        .flat_map(MergeColumn::columns)
        .find(|column| *column >= width)
    {
        Some(column) => Err(ReportError::ColumnOutOfRange { column, width }),
        None => Ok(()),
    }
}

/// Computes runs of equal values for each requested column independently.
///
/// Every run becomes a region, single-row runs included, so the regions of a
/// column cover all rows exactly once. Rows sharing a value are only merged
/// when they are adjacent; callers sort first.
pub fn compute_merges(rows: &[FlatRow], columns: &[usize]) -> Vec<MergeRegion> {
    let merge_columns: Vec<MergeColumn> = columns.iter().copied().map(MergeColumn::new).collect();
    compute_scoped_merges(rows, &merge_columns)
}

/// Like [`compute_merges`], additionally ending runs at scope boundaries.
///
/// A column listed more than once is computed for its first entry only, so
/// regions never overlap within a column.
pub fn compute_scoped_merges(rows: &[FlatRow], columns: &[MergeColumn]) -> Vec<MergeRegion> {
    let mut seen = Vec::with_capacity(columns.len());
    let mut regions = Vec::new();
    for merge_column in columns {
        if seen.contains(&merge_column.column) {
            continue;
        }
        seen.push(merge_column.column);
        column_regions(rows, merge_column, &mut regions);
    }
    regions
}

fn column_regions(rows: &[FlatRow], merge_column: &MergeColumn, regions: &mut Vec<MergeRegion>) {
    let Some(last_row) = rows.len().checked_sub(1) else {
        return;
    };

    let mut anchor = 0;
    for row_idx in 1..rows.len() {
        let run_ends = merge_column
            .columns()
            .any(|column| cell(&rows[row_idx], column) != cell(&rows[anchor], column));
        if run_ends {
            regions.push(region(rows, merge_column.column, anchor, row_idx - 1));
            anchor = row_idx;
        }
    }
    regions.push(region(rows, merge_column.column, anchor, last_row));
}

fn region(rows: &[FlatRow], column: usize, start_row: usize, end_row: usize) -> MergeRegion {
    MergeRegion::new(column, start_row, end_row, cell(&rows[start_row], column))
}

fn cell(row: &FlatRow, column: usize) -> &str {
    row.get(column).map(String::as_str).unwrap_or_default()
}
