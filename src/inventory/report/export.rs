use std::path::Path;

use tracing::{debug, info, instrument};

use crate::inventory::report::error::{ReportError, Result};
use crate::inventory::report::flatten::SheetTable;
use crate::inventory::report::io::excel_read::{self, SheetContents};
use crate::inventory::report::io::{excel_write, snapshot};
use crate::inventory::report::model::PLACEHOLDER;
use crate::inventory::report::model::snapshot::Snapshot;
use crate::inventory::report::reports::{ReportKind, build_report};

/// Selects the reports of one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Reports to build, in sheet order. Duplicates are ignored.
    pub reports: Vec<ReportKind>,
    /// Label written into the account column of the route table report.
    pub account: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            reports: ReportKind::ALL.to_vec(),
            account: PLACEHOLDER.to_string(),
        }
    }
}

/// Builds the selected report tables from an in-memory snapshot.
pub fn build_tables(snapshot: &Snapshot, options: &ExportOptions) -> Result<Vec<SheetTable>> {
    let mut kinds = Vec::with_capacity(options.reports.len());
    for kind in &options.reports {
        if !kinds.contains(kind) {
            kinds.push(*kind);
        }
    }

    kinds
        .into_iter()
        .map(|kind| {
            let table = build_report(kind, snapshot, &options.account)?;
            debug!(
                report = %kind,
                row_count = table.rows.len(),
                region_count = table.merges.len(),
                "report built"
            );
            Ok(table)
        })
        .collect()
}

/// Loads a snapshot file and writes the selected reports into one workbook.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn export(input: &Path, output: &Path, options: &ExportOptions) -> Result<()> {
    if !input.exists() {
        return Err(ReportError::MissingInput(input.to_path_buf()));
    }

    let snapshot = snapshot::load_snapshot(input)?;
    info!(
        security_groups = snapshot.security_groups.len(),
        route_tables = snapshot.route_tables.len(),
        vpc_endpoints = snapshot.vpc_endpoints.len(),
        users = snapshot.identity.users.len(),
        "loaded inventory snapshot"
    );
    let tables = build_tables(&snapshot, options)?;
    excel_write::write_report(output, &tables)?;
    info!(sheet_count = tables.len(), "workbook written");
    Ok(())
}

/// Reads one sheet of a rendered workbook.
#[instrument(level = "info", skip_all, fields(input = %input.display(), sheet = %sheet))]
pub fn inspect(input: &Path, sheet: &str) -> Result<SheetContents> {
    if !input.exists() {
        return Err(ReportError::MissingInput(input.to_path_buf()));
    }

    let contents = excel_read::read_sheet(input, sheet)?;
    debug!(row_count = contents.rows.len(), "sheet read");
    Ok(contents)
}
