use std::fs;
use std::path::Path;

use crate::inventory::report::error::Result;
use crate::inventory::report::model::snapshot::Snapshot;

/// Reads an inventory snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let source = fs::read_to_string(path)?;
    parse_snapshot(&source)
}

/// Parses an inventory snapshot from a JSON document.
pub fn parse_snapshot(source: &str) -> Result<Snapshot> {
    Ok(serde_json::from_str(source)?)
}
