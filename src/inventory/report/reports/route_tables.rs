//! Route tables with one row per route, `local` routes first.

use tracing::debug;

use crate::inventory::report::error::Result;
use crate::inventory::report::flatten::normalize::{non_empty, or_placeholder, require_id};
use crate::inventory::report::flatten::{
    MergeColumn, NameIndex, ReportLayout, SheetTable, SortKey, build_table, expand, normalize,
};
use crate::inventory::report::model::snapshot::{Route, RouteTable, Snapshot};
use crate::inventory::report::model::{ChildRelation, PLACEHOLDER, PortRange, Record, Source};

pub const SHEET_NAME: &str = "RouteTables";
/// Name shown for route tables without a `Name` tag.
pub const UNNAMED_ROUTE_TABLE: &str = "Unused";
/// Target of the implicit route covering the VPC's own range.
pub const LOCAL_TARGET: &str = "local";
/// Relation kind attached to route entries.
pub const ROUTE_KIND: &str = "route";

const ACCOUNT: usize = 0;
const VPC_NAME: usize = 1;
const VPC_ID: usize = 2;
const TABLE_NAME: usize = 3;
const TABLE_ID: usize = 4;
const DESTINATION: usize = 5;
const TARGET: usize = 6;

pub fn layout() -> Result<ReportLayout> {
    ReportLayout::builder(SHEET_NAME)
        .column("Account", 25.0)
        .column("VPC Name", 25.0)
        .column("VPC ID", 25.0)
        .column("Route Table Name", 25.0)
        .column("Route Table ID", 25.0)
        .column("Destination", 25.0)
        .column("Target", 25.0)
        .sort_by(SortKey::column(VPC_NAME))
        .sort_by(SortKey::column(VPC_ID))
        .sort_by(SortKey::column(TABLE_NAME))
        .sort_by(SortKey::column(TABLE_ID))
        .sort_by(SortKey::sentinel_first(TARGET, LOCAL_TARGET))
        .sort_by(SortKey::column(DESTINATION))
        .merge(MergeColumn::new(ACCOUNT))
        .merge(MergeColumn::new(VPC_NAME))
        .merge(MergeColumn::new(VPC_ID))
        .merge(MergeColumn::new(TABLE_NAME))
        .merge(MergeColumn::new(TABLE_ID))
        .build()
}

pub fn build(snapshot: &Snapshot, account: &str) -> Result<SheetTable> {
    let vpc_names = NameIndex::from_tagged(
        snapshot
            .vpcs
            .iter()
            .map(|vpc| (vpc.vpc_id.as_deref(), &vpc.tags)),
    );

    let mut rows = Vec::new();
    for (index, table) in snapshot.route_tables.iter().enumerate() {
        let record = table_record(table, index)?;
        let (vpc_name, vpc_id) = match record.parent.as_deref() {
            Some(vpc_id) => (vpc_names.resolve(vpc_id), vpc_id.to_string()),
            None => (PLACEHOLDER.to_string(), PLACEHOLDER.to_string()),
        };

        for rule in expand(&record.relations) {
            rows.push(vec![
                account.to_string(),
                vpc_name.clone(),
                vpc_id.clone(),
                record.name.clone(),
                record.id.clone(),
                rule.source,
                rule.annotation,
            ]);
        }
    }

    debug!(
        table_count = snapshot.route_tables.len(),
        row_count = rows.len(),
        "routes expanded"
    );
    build_table(&layout()?, rows)
}

pub fn table_record(table: &RouteTable, index: usize) -> Result<Record> {
    let id = require_id(table.route_table_id.as_deref(), "route table", index)?;
    Ok(Record::new(id, normalize(&table.tags, UNNAMED_ROUTE_TABLE))
        .with_parent(non_empty(table.vpc_id.as_deref()).map(str::to_string))
        .with_relations(table.routes.iter().map(route_relation).collect()))
}

/// A route as a relation whose single source is the destination, annotated
/// with the target.
pub fn route_relation(route: &Route) -> ChildRelation {
    let target = or_placeholder(route_target(route));
    ChildRelation::new(ROUTE_KIND, PortRange::unbounded())
        .with_source(Source::annotated(route_destination(route), Some(target.as_str())))
}

pub fn route_destination(route: &Route) -> String {
    or_placeholder(
        non_empty(route.destination_cidr_block.as_deref())
            .or(non_empty(route.destination_prefix_list_id.as_deref()))
            .or(non_empty(route.destination_ipv6_cidr_block.as_deref())),
    )
}

fn route_target(route: &Route) -> Option<&str> {
    [
        &route.gateway_id,
        &route.transit_gateway_id,
        &route.nat_gateway_id,
        &route.network_interface_id,
        &route.vpc_peering_connection_id,
    ]
    .into_iter()
    .find_map(|target| non_empty(target.as_deref()))
}
