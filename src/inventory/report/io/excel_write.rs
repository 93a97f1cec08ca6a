use std::collections::HashSet;
use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::inventory::report::error::Result;
use crate::inventory::report::flatten::SheetTable;

const HEADER_FILL: u32 = 0xE6E6E6;

/// Writes every table as a worksheet of one workbook at `path`.
pub fn write_report(path: &Path, tables: &[SheetTable]) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = header_format();
    let cell_format = cell_format();

    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&table.sheet_name)?;
        write_header(worksheet, table, &header_format)?;
        write_body(worksheet, table, &cell_format)?;

        for (col_idx, column) in table.columns.iter().enumerate() {
            worksheet.set_column_width(col_idx as u16, column.width)?;
        }
        worksheet.set_freeze_panes(table.header_rows() as u32, 0)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

fn cell_format() -> Format {
    Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

/// Writes one header row, or two when the table has header groups: the
/// group label spans its columns in the first row, and ungrouped headers
/// span both rows.
fn write_header(worksheet: &mut Worksheet, table: &SheetTable, format: &Format) -> Result<()> {
    if table.groups.is_empty() {
        for (col_idx, header) in table.headers().into_iter().enumerate() {
            worksheet.write_string_with_format(0, col_idx as u16, header, format)?;
        }
        return Ok(());
    }

    for group in &table.groups {
        let (first, last) = (group.first as u16, group.last as u16);
        if first == last {
            worksheet.write_string_with_format(0, first, &group.label, format)?;
        } else {
            worksheet.merge_range(0, first, 0, last, &group.label, format)?;
        }
    }

    for (col_idx, header) in table.headers().into_iter().enumerate() {
        let col = col_idx as u16;
        if table.group_for(col_idx).is_some() {
            worksheet.write_string_with_format(1, col, header, format)?;
        } else {
            worksheet.merge_range(0, col, 1, col, header, format)?;
        }
    }
    Ok(())
}

fn write_body(worksheet: &mut Worksheet, table: &SheetTable, format: &Format) -> Result<()> {
    let offset = table.header_rows() as u32;
    let merged: Vec<_> = table
        .merges
        .iter()
        .filter(|region| region.is_merged())
        .collect();
    let covered: HashSet<(usize, usize)> = merged
        .iter()
        .flat_map(|region| {
            (region.start_row..=region.end_row).map(move |row| (row, region.column))
        })
        .collect();

    for (row_idx, row) in table.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            if covered.contains(&(row_idx, col_idx)) {
                continue;
            }
            worksheet.write_string_with_format(
                offset + row_idx as u32,
                col_idx as u16,
                cell,
                format,
            )?;
        }
    }

    for region in merged {
        worksheet.merge_range(
            offset + region.start_row as u32,
            region.column as u16,
            offset + region.end_row as u32,
            region.column as u16,
            &region.value,
            format,
        )?;
    }
    Ok(())
}
