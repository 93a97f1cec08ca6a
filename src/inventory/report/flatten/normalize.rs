use std::collections::HashMap;

use crate::inventory::report::error::{ReportError, Result};
use crate::inventory::report::model::PLACEHOLDER;
use crate::inventory::report::model::snapshot::Tags;

/// Tag key holding a resource's friendly name.
pub const NAME_TAG: &str = "Name";

/// Returns the non-empty `Name` tag, or `fallback` when there is none.
///
/// The key match is exact and case-sensitive: `name` or `NAME` tags are
/// ignored.
pub fn normalize(tags: &Tags, fallback: &str) -> String {
    match tags.get(NAME_TAG) {
        Some(name) if !name.is_empty() => name.clone(),
        _ => fallback.to_string(),
    }
}

/// Maps an absent or empty optional value to [`PLACEHOLDER`].
pub fn or_placeholder(value: Option<&str>) -> String {
    non_empty(value).unwrap_or(PLACEHOLDER).to_string()
}

/// Treats an empty string like an absent one.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Returns the identifier of the `index`-th `kind` record, failing when the
/// snapshot entry carries none.
pub fn require_id<'a>(id: Option<&'a str>, kind: &'static str, index: usize) -> Result<&'a str> {
    non_empty(id).ok_or(ReportError::MissingIdentifier { kind, index })
}

/// Identifier → display name lookup for cross-referenced resources.
///
/// Lookups never fail: an identifier missing from the index resolves to
/// itself.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    names: HashMap<String, String>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn resolve(&self, id: &str) -> String {
        self.get(id).unwrap_or(id).to_string()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Indexes tagged resources by identifier, naming each via [`normalize`].
    /// Entries without an identifier cannot be referenced and are skipped.
    pub fn from_tagged<'a, I>(resources: I) -> Self
    where
        I: IntoIterator<Item = (Option<&'a str>, &'a Tags)>,
    {
        resources
            .into_iter()
            .filter_map(|(id, tags)| {
                let id = non_empty(id)?;
                Some((id.to_string(), normalize(tags, id)))
            })
            .collect()
    }
}

impl FromIterator<(String, String)> for NameIndex {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}
