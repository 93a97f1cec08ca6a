//! Flattens cloud inventory snapshots into spreadsheet reports.
//!
//! Nested resources (security groups and their rules, route tables and
//! their routes, endpoints and their interfaces, users and their groups) are
//! expanded into fixed-width rows, sorted, and annotated with the merge
//! regions a renderer needs to group rows of the same parent visually. The
//! engine lives in [`inventory::report::flatten`], the per-report
//! configurations in [`inventory::report::reports`], the snapshot model in
//! [`inventory::report::model`], file adapters under [`inventory::report::io`]
//! and the orchestration in [`inventory::report::export`].

pub mod inventory;

pub use inventory::report::{ReportError, Result, error, export, flatten, io, model, reports};
