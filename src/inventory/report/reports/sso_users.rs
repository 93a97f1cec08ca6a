//! Identity-store users with their group memberships.

use std::collections::HashMap;

use tracing::debug;

use crate::inventory::report::error::Result;
use crate::inventory::report::flatten::normalize::{non_empty, or_placeholder, require_id};
use crate::inventory::report::flatten::{NameIndex, ReportLayout, SheetTable, build_table};
use crate::inventory::report::model::snapshot::{Snapshot, User};
use crate::inventory::report::model::{FlatRow, PLACEHOLDER};

pub const SHEET_NAME: &str = "SSO_Users";

pub fn layout() -> Result<ReportLayout> {
    ReportLayout::builder(SHEET_NAME)
        .column("No.", 6.0)
        .column("Display Name", 28.0)
        .column("User Name", 28.0)
        .column("Email", 28.0)
        .column("User Status", 15.0)
        .column("MFA", 15.0)
        .column("Group", 45.0)
        .build()
}

pub fn build(snapshot: &Snapshot) -> Result<SheetTable> {
    let identity = &snapshot.identity;
    let group_names: NameIndex = identity
        .groups
        .iter()
        .filter_map(|group| {
            let id = non_empty(group.group_id.as_deref())?;
            let name = non_empty(group.display_name.as_deref()).unwrap_or(id);
            Some((id.to_string(), name.to_string()))
        })
        .collect();

    let mut memberships: HashMap<&str, Vec<&str>> = HashMap::new();
    for membership in &identity.group_memberships {
        let (Some(user_id), Some(group_id)) = (
            non_empty(membership.member_id.user_id.as_deref()),
            non_empty(membership.group_id.as_deref()),
        ) else {
            continue;
        };
        memberships.entry(user_id).or_default().push(group_id);
    }

    let rows = identity
        .users
        .iter()
        .enumerate()
        .map(|(index, user)| {
            let user_id = require_id(user.user_id.as_deref(), "user", index)?;
            let groups = memberships.get(user_id).map(Vec::as_slice).unwrap_or_default();
            Ok(user_row(index + 1, user, groups, &group_names))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        user_count = identity.users.len(),
        group_count = group_names.len(),
        "identity users flattened"
    );
    build_table(&layout()?, rows)
}

pub fn user_row(number: usize, user: &User, group_ids: &[&str], group_names: &NameIndex) -> FlatRow {
    // Primary address first, else the first listed one.
    let email = user
        .emails
        .iter()
        .filter(|email| email.primary == Some(true))
        .chain(&user.emails)
        .find_map(|email| non_empty(email.value.as_deref()));

    vec![
        number.to_string(),
        or_placeholder(user.display_name.as_deref()),
        or_placeholder(user.user_name.as_deref()),
        or_placeholder(email),
        or_placeholder(user.status.as_deref()),
        mfa_cell(user.mfa_devices),
        group_cell(group_ids, group_names),
    ]
}

fn mfa_cell(devices: Option<u32>) -> String {
    match devices {
        Some(1) => "1 device".to_string(),
        Some(count) => format!("{count} devices"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Member group names, sorted and comma separated.
pub fn group_cell(group_ids: &[&str], group_names: &NameIndex) -> String {
    let mut names: Vec<String> = group_ids.iter().map(|id| group_names.resolve(id)).collect();
    if names.is_empty() {
        return PLACEHOLDER.to_string();
    }
    names.sort();
    names.join(", ")
}
