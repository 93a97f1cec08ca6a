use crate::inventory::report::error::{ReportError, Result};
use crate::inventory::report::model::FlatRow;

/// Maps a cell value to a rank; lower ranks sort first.
pub type PriorityFn = fn(&str) -> u8;

#[derive(Debug, Clone)]
enum KeyOrder {
    Exact,
    CaseInsensitive,
    Priority(PriorityFn),
    SentinelFirst(String),
}

/// One component of a composite row ordering.
#[derive(Debug, Clone)]
pub struct SortKey {
    column: usize,
    order: KeyOrder,
}

impl SortKey {
    /// Case-sensitive string order on `column`.
    pub fn column(column: usize) -> Self {
        Self {
            column,
            order: KeyOrder::Exact,
        }
    }

    /// Orders `column` by the rank `priority` assigns to each value.
    pub fn priority(column: usize, priority: PriorityFn) -> Self {
        Self {
            column,
            order: KeyOrder::Priority(priority),
        }
    }

    /// Rows whose `column` equals `sentinel` rank 0, everything else 1.
    pub fn sentinel_first(column: usize, sentinel: impl Into<String>) -> Self {
        Self {
            column,
            order: KeyOrder::SentinelFirst(sentinel.into()),
        }
    }

    /// Switches a string key to lowercase comparison.
    pub fn case_insensitive(mut self) -> Self {
        if matches!(self.order, KeyOrder::Exact) {
            self.order = KeyOrder::CaseInsensitive;
        }
        self
    }

    fn value_for(&self, row: &FlatRow) -> SortValue {
        let cell = row.get(self.column).map(String::as_str).unwrap_or_default();
        match &self.order {
            KeyOrder::Exact => SortValue::Text(cell.to_string()),
            KeyOrder::CaseInsensitive => SortValue::Text(cell.to_lowercase()),
            KeyOrder::Priority(priority) => SortValue::Rank(priority(cell)),
            KeyOrder::SentinelFirst(sentinel) => {
                SortValue::Rank(u8::from(cell != sentinel.as_str()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Rank(u8),
    Text(String),
}

/// Checks every key against the row width of a layout.
pub fn validate_keys(keys: &[SortKey], width: usize) -> Result<()> {
    match keys.iter().find(|key| key.column >= width) {
        Some(key) => Err(ReportError::ColumnOutOfRange {
            column: key.column,
            width,
        }),
        None => Ok(()),
    }
}

/// Returns the rows ordered by `keys`, leaving the input untouched.
///
/// Keys apply in order; rows equal under every key keep their input order,
/// so sorting an already sorted sequence returns it unchanged.
pub fn sort(rows: &[FlatRow], keys: &[SortKey]) -> Vec<FlatRow> {
    let mut sorted = rows.to_vec();
    if keys.is_empty() {
        return sorted;
    }
    // Stable: equal keys keep their relative order.
    sorted.sort_by_cached_key(|row| {
        keys.iter()
            .map(|key| key.value_for(row))
            .collect::<Vec<_>>()
    });
    sorted
}
