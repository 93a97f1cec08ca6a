//! Security groups with inbound and outbound rules side by side.

use tracing::debug;

use crate::inventory::report::error::Result;
use crate::inventory::report::flatten::expand::WILDCARD_PROTOCOL;
use crate::inventory::report::flatten::normalize::{non_empty, require_id};
use crate::inventory::report::flatten::{
    MergeColumn, NameIndex, ReportLayout, SheetTable, SortKey, align, build_table, expand,
};
use crate::inventory::report::model::snapshot::{IpPermission, SecurityGroup, Snapshot};
use crate::inventory::report::model::{ChildRelation, ExpandedRule, PortRange, Record, Source};

pub const SHEET_NAME: &str = "SecurityGroups";
/// VPC column value for groups that are not attached to a VPC.
pub const NO_VPC: &str = "NO_VPC";

const VPC_NAME: usize = 0;
const GROUP_NAME: usize = 1;
const GROUP_ID: usize = 2;

pub fn layout() -> Result<ReportLayout> {
    ReportLayout::builder(SHEET_NAME)
        .column("VPC Name", 24.0)
        .column("Security Group Name", 32.0)
        .column("Group ID", 18.0)
        .column("Type", 10.0)
        .column("Port Range", 14.0)
        .column("Source", 36.0)
        .column("Remark (Inbound)", 24.0)
        .column("Type", 10.0)
        .column("Port Range", 14.0)
        .column("Source", 36.0)
        .column("Remark (Outbound)", 24.0)
        .group("Inbound Rule", 3, 5)
        .group("Outbound Rule", 7, 9)
        .sort_by(SortKey::column(GROUP_NAME).case_insensitive())
        .sort_by(SortKey::column(GROUP_ID))
        .merge(MergeColumn::new(VPC_NAME).within(GROUP_ID))
        .merge(MergeColumn::new(GROUP_NAME).within(GROUP_ID))
        .merge(MergeColumn::new(GROUP_ID))
        .build()
}

/// A group as a record of its inbound rules, plus its outbound rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRules {
    pub record: Record,
    pub egress: Vec<ChildRelation>,
}

pub fn build(snapshot: &Snapshot) -> Result<SheetTable> {
    let vpc_names = NameIndex::from_tagged(
        snapshot
            .vpcs
            .iter()
            .map(|vpc| (vpc.vpc_id.as_deref(), &vpc.tags)),
    );
    let group_names = group_name_index(&snapshot.security_groups);

    let mut rows = Vec::new();
    for (index, group) in snapshot.security_groups.iter().enumerate() {
        let rules = group_rules(group, index, &group_names)?;
        let vpc_name = match rules.record.parent.as_deref() {
            Some(vpc_id) => vpc_names.resolve(vpc_id),
            None => NO_VPC.to_string(),
        };

        let pairs = align(
            expand(&rules.record.relations),
            expand(&rules.egress),
            ExpandedRule::placeholder(),
            ExpandedRule::placeholder(),
        );
        for (inbound, outbound) in pairs {
            let mut row = vec![
                vpc_name.clone(),
                rules.record.name.clone(),
                rules.record.id.clone(),
            ];
            row.extend(inbound.into_cells());
            row.extend(outbound.into_cells());
            rows.push(row);
        }
    }

    debug!(
        group_count = snapshot.security_groups.len(),
        row_count = rows.len(),
        "security group rules expanded"
    );
    build_table(&layout()?, rows)
}

/// Group id → group name, falling back to the id for unnamed groups.
pub fn group_name_index(groups: &[SecurityGroup]) -> NameIndex {
    groups
        .iter()
        .filter_map(|group| {
            let id = non_empty(group.group_id.as_deref())?;
            let name = non_empty(group.group_name.as_deref()).unwrap_or(id);
            Some((id.to_string(), name.to_string()))
        })
        .collect()
}

pub fn group_rules(
    group: &SecurityGroup,
    index: usize,
    group_names: &NameIndex,
) -> Result<GroupRules> {
    let id = require_id(group.group_id.as_deref(), "security group", index)?;
    let name = non_empty(group.group_name.as_deref()).unwrap_or(id);
    let relations = permission_relations(&group.ip_permissions, group_names);

    Ok(GroupRules {
        record: Record::new(id, name)
            .with_parent(non_empty(group.vpc_id.as_deref()).map(str::to_string))
            .with_relations(relations),
        egress: permission_relations(&group.ip_permissions_egress, group_names),
    })
}

fn permission_relations(permissions: &[IpPermission], group_names: &NameIndex) -> Vec<ChildRelation> {
    permissions
        .iter()
        .map(|permission| permission_relation(permission, group_names))
        .collect()
}

/// Sources are listed IPv4 ranges first, then IPv6 ranges, referenced
/// groups and prefix lists.
pub fn permission_relation(permission: &IpPermission, group_names: &NameIndex) -> ChildRelation {
    let protocol = non_empty(permission.ip_protocol.as_deref()).unwrap_or(WILDCARD_PROTOCOL);
    let mut relation = ChildRelation::new(
        protocol,
        PortRange::new(permission.from_port, permission.to_port),
    );

    for range in &permission.ip_ranges {
        if let Some(cidr) = non_empty(range.cidr_ip.as_deref()) {
            relation = relation.with_source(Source::annotated(cidr, range.description.as_deref()));
        }
    }
    for range in &permission.ipv6_ranges {
        if let Some(cidr) = non_empty(range.cidr_ipv6.as_deref()) {
            relation = relation.with_source(Source::annotated(cidr, range.description.as_deref()));
        }
    }
    for pair in &permission.user_id_group_pairs {
        if let Some(group_id) = non_empty(pair.group_id.as_deref()) {
            let reference = format!("{group_id}({})", group_names.resolve(group_id));
            relation =
                relation.with_source(Source::annotated(reference, pair.description.as_deref()));
        }
    }
    for prefix_list in &permission.prefix_list_ids {
        if let Some(prefix_list_id) = non_empty(prefix_list.prefix_list_id.as_deref()) {
            relation = relation.with_source(Source::annotated(
                prefix_list_id,
                prefix_list.description.as_deref(),
            ));
        }
    }

    relation
}
