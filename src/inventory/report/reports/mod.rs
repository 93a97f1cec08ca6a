//! The reports built from a snapshot, each a [`ReportLayout`] plus the
//! mapping from snapshot resources to rows.
//!
//! [`ReportLayout`]: crate::inventory::report::flatten::ReportLayout

use std::fmt;

use crate::inventory::report::error::Result;
use crate::inventory::report::flatten::SheetTable;
use crate::inventory::report::model::snapshot::Snapshot;

pub mod route_tables;
pub mod security_groups;
pub mod sso_users;
pub mod vpc_endpoints;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportKind {
    SecurityGroups,
    RouteTables,
    VpcEndpoints,
    SsoUsers,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::SecurityGroups,
        ReportKind::RouteTables,
        ReportKind::VpcEndpoints,
        ReportKind::SsoUsers,
    ];

    pub fn sheet_name(self) -> &'static str {
        match self {
            ReportKind::SecurityGroups => security_groups::SHEET_NAME,
            ReportKind::RouteTables => route_tables::SHEET_NAME,
            ReportKind::VpcEndpoints => vpc_endpoints::SHEET_NAME,
            ReportKind::SsoUsers => sso_users::SHEET_NAME,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::SecurityGroups => write!(f, "security-groups"),
            ReportKind::RouteTables => write!(f, "route-tables"),
            ReportKind::VpcEndpoints => write!(f, "vpc-endpoints"),
            ReportKind::SsoUsers => write!(f, "sso-users"),
        }
    }
}

/// Builds the table of one report. `account` labels the route table rows.
pub fn build_report(kind: ReportKind, snapshot: &Snapshot, account: &str) -> Result<SheetTable> {
    match kind {
        ReportKind::SecurityGroups => security_groups::build(snapshot),
        ReportKind::RouteTables => route_tables::build(snapshot, account),
        ReportKind::VpcEndpoints => vpc_endpoints::build(snapshot),
        ReportKind::SsoUsers => sso_users::build(snapshot),
    }
}
