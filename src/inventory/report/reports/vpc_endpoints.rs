//! VPC endpoints, one row per network interface of interface endpoints.

use std::collections::HashMap;

use tracing::debug;

use crate::inventory::report::error::Result;
use crate::inventory::report::flatten::normalize::{non_empty, or_placeholder, require_id};
use crate::inventory::report::flatten::{
    MergeColumn, NameIndex, ReportLayout, SheetTable, build_table, expand, normalize,
};
use crate::inventory::report::model::snapshot::{NetworkInterface, Snapshot, VpcEndpoint};
use crate::inventory::report::model::{ChildRelation, PLACEHOLDER, PortRange, Record, Source};

pub const SHEET_NAME: &str = "VPCEndpoints";
/// Endpoint type whose network interfaces are listed individually.
pub const INTERFACE_ENDPOINT: &str = "Interface";

const ENDPOINT_ID: usize = 3;

pub fn layout() -> Result<ReportLayout> {
    let mut builder = ReportLayout::builder(SHEET_NAME)
        .column("No.", 6.0)
        .column("Name", 35.0)
        .column("Service Name", 35.0)
        .column("Endpoint ID", 35.0)
        .column("Type", 15.0)
        .column("VPC", 15.0)
        .column("Subnet", 25.0)
        .column("Private IP", 25.0)
        .column("Security Group", 25.0);
    // Subnet and Private IP vary per interface and stay unmerged.
    for column in [0, 1, 2, ENDPOINT_ID, 4, 5, 8] {
        builder = builder.merge(MergeColumn::new(column).within(ENDPOINT_ID));
    }
    builder.build()
}

pub fn build(snapshot: &Snapshot) -> Result<SheetTable> {
    let vpc_names = NameIndex::from_tagged(
        snapshot
            .vpcs
            .iter()
            .map(|vpc| (vpc.vpc_id.as_deref(), &vpc.tags)),
    );
    let subnet_names = NameIndex::from_tagged(
        snapshot
            .subnets
            .iter()
            .map(|subnet| (subnet.subnet_id.as_deref(), &subnet.tags)),
    );
    let group_names = NameIndex::from_tagged(
        snapshot
            .security_groups
            .iter()
            .map(|group| (group.group_id.as_deref(), &group.tags)),
    );
    let interfaces: HashMap<&str, &NetworkInterface> = snapshot
        .network_interfaces
        .iter()
        .filter_map(|eni| Some((non_empty(eni.network_interface_id.as_deref())?, eni)))
        .collect();

    let mut rows = Vec::new();
    for (index, endpoint) in snapshot.vpc_endpoints.iter().enumerate() {
        let record = endpoint_record(endpoint, index, &interfaces, &subnet_names)?;
        let number = (index + 1).to_string();
        let name = normalize(&endpoint.tags, PLACEHOLDER);
        let service = or_placeholder(endpoint.service_name.as_deref());
        let endpoint_type = or_placeholder(endpoint.vpc_endpoint_type.as_deref());
        let vpc = match record.parent.as_deref() {
            Some(vpc_id) => vpc_names.resolve(vpc_id),
            None => PLACEHOLDER.to_string(),
        };
        let groups = security_group_cell(endpoint, &group_names);

        for rule in expand(&record.relations) {
            rows.push(vec![
                number.clone(),
                name.clone(),
                service.clone(),
                record.id.clone(),
                endpoint_type.clone(),
                vpc.clone(),
                rule.source,
                rule.annotation,
                groups.clone(),
            ]);
        }
    }

    debug!(
        endpoint_count = snapshot.vpc_endpoints.len(),
        row_count = rows.len(),
        "endpoint interfaces expanded"
    );
    build_table(&layout()?, rows)
}

/// An endpoint as a record with one relation per network interface. Only
/// interface endpoints carry relations; the rest render a single `-` row.
pub fn endpoint_record(
    endpoint: &VpcEndpoint,
    index: usize,
    interfaces: &HashMap<&str, &NetworkInterface>,
    subnet_names: &NameIndex,
) -> Result<Record> {
    let id = require_id(endpoint.vpc_endpoint_id.as_deref(), "VPC endpoint", index)?;
    let relations = if endpoint.vpc_endpoint_type.as_deref() == Some(INTERFACE_ENDPOINT) {
        endpoint
            .network_interface_ids
            .iter()
            .map(|eni_id| interface_relation(eni_id, interfaces, subnet_names))
            .collect()
    } else {
        Vec::new()
    };

    Ok(Record::new(id, normalize(&endpoint.tags, id))
        .with_parent(non_empty(endpoint.vpc_id.as_deref()).map(str::to_string))
        .with_relations(relations))
}

/// Source is the subnet name, annotation the private address. An interface
/// missing from the snapshot shows its raw id in place of the address.
fn interface_relation(
    eni_id: &str,
    interfaces: &HashMap<&str, &NetworkInterface>,
    subnet_names: &NameIndex,
) -> ChildRelation {
    let source = match interfaces.get(eni_id) {
        Some(eni) => {
            let subnet = non_empty(eni.subnet_id.as_deref())
                .map(|subnet_id| subnet_names.resolve(subnet_id))
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            Source::annotated(subnet, eni.private_ip_address.as_deref())
        }
        None => Source::annotated(PLACEHOLDER, Some(eni_id)),
    };
    ChildRelation::new(INTERFACE_ENDPOINT, PortRange::unbounded()).with_source(source)
}

fn security_group_cell(endpoint: &VpcEndpoint, group_names: &NameIndex) -> String {
    let names: Vec<String> = endpoint
        .groups
        .iter()
        .filter_map(|group| non_empty(group.group_id.as_deref()))
        .map(|group_id| group_names.resolve(group_id))
        .collect();
    if names.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        names.join("\n")
    }
}
