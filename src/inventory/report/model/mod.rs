use std::fmt;

use serde::{Deserialize, Serialize};

pub mod snapshot;

/// Neutral display value used for absent fields, rule-less records, and the
/// padding side of an aligned pair.
pub const PLACEHOLDER: &str = "-";

/// One fully populated display row. Every cell is present; absence is
/// expressed as [`PLACEHOLDER`].
pub type FlatRow = Vec<String>;

/// Inclusive numeric range attached to a rule, e.g. a port range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl PortRange {
    pub fn new(from: Option<i64>, to: Option<i64>) -> Self {
        Self { from, to }
    }

    /// A range with no bounds, rendered as [`PLACEHOLDER`].
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn single(port: i64) -> Self {
        Self::new(Some(port), Some(port))
    }
}

impl fmt::Display for PortRange {
    /// Missing bounds render as `-`, equal bounds as the single value and
    /// anything else as `lower-upper`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from == to => write!(f, "{from}"),
            (Some(from), Some(to)) => write!(f, "{from}-{to}"),
            _ => f.write_str(PLACEHOLDER),
        }
    }
}

/// One endpoint a relation applies to, with an optional free-text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub endpoint: String,
    pub annotation: Option<String>,
}

impl Source {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            annotation: None,
        }
    }

    pub fn annotated(endpoint: impl Into<String>, annotation: Option<&str>) -> Self {
        Self {
            endpoint: endpoint.into(),
            annotation: annotation.map(str::to_string),
        }
    }
}

/// A single rule, route or membership owned by a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRelation {
    /// Protocol or relation type. `-1` is the wildcard protocol.
    pub kind: String,
    pub range: PortRange,
    pub sources: Vec<Source>,
}

impl ChildRelation {
    pub fn new(kind: impl Into<String>, range: PortRange) -> Self {
        Self {
            kind: kind.into(),
            range,
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }
}

/// A parent entity being reported on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    /// Friendly name, equal to `id` when the entity carries none.
    pub name: String,
    /// Identifier of the containing entity, e.g. the VPC of a route table.
    pub parent: Option<String>,
    pub relations: Vec<ChildRelation>,
}

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent: None,
            relations: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: Option<String>) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_relations(mut self, relations: Vec<ChildRelation>) -> Self {
        self.relations = relations;
        self
    }
}

/// Display tuple produced for each relation/source pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedRule {
    pub kind: String,
    pub range: String,
    pub source: String,
    pub annotation: String,
}

impl ExpandedRule {
    pub fn new(
        kind: impl Into<String>,
        range: impl Into<String>,
        source: impl Into<String>,
        annotation: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            range: range.into(),
            source: source.into(),
            annotation: annotation.into(),
        }
    }

    /// The all-`-` tuple.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER, PLACEHOLDER, PLACEHOLDER, PLACEHOLDER)
    }

    /// Cells in column order: kind, range, source, annotation.
    pub fn into_cells(self) -> [String; 4] {
        [self.kind, self.range, self.source, self.annotation]
    }
}

/// A contiguous span of rows in one column that share a value.
///
/// `start_row == end_row` describes an ordinary, unmerged cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRegion {
    pub column: usize,
    pub start_row: usize,
    pub end_row: usize,
    pub value: String,
}

impl MergeRegion {
    pub fn new(column: usize, start_row: usize, end_row: usize, value: impl Into<String>) -> Self {
        Self {
            column,
            start_row,
            end_row,
            value: value.into(),
        }
    }

    /// Whether the region spans more than one row.
    pub fn is_merged(&self) -> bool {
        self.end_row > self.start_row
    }
}
