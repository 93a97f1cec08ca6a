use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::inventory::report::error::{ReportError, Result};

/// Cell text of one worksheet, header rows included. Cells hidden under a
/// merged range read back as empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetContents {
    pub rows: Vec<Vec<String>>,
}

impl SheetContents {
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

/// Lists the worksheet names of a workbook in order.
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    let workbook: Xlsx<_> = open_workbook(path)?;
    Ok(workbook.sheet_names().to_vec())
}

/// Reads a rendered report sheet back into strings.
pub fn read_sheet(path: &Path, name: &str) -> Result<SheetContents> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = read_required_sheet(&mut workbook, name)?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell_to_string(Some(cell))).collect())
        .collect();
    Ok(SheetContents { rows })
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ReportError::MissingSheet(name.to_string()))?;
    let range = range_result.map_err(ReportError::from)?;
    Ok(range)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
