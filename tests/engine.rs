use inventory_report::flatten::normalize::{NameIndex, normalize, or_placeholder, require_id};
use inventory_report::flatten::{
    MergeColumn, ReportLayout, SortKey, align, build_table, compute_merges, compute_scoped_merges,
    expand, sort,
};
use inventory_report::model::snapshot::Tags;
use inventory_report::model::{
    ChildRelation, ExpandedRule, FlatRow, MergeRegion, PortRange, Source,
};
use inventory_report::ReportError;

fn row(cells: &[&str]) -> FlatRow {
    cells.iter().map(|cell| cell.to_string()).collect()
}

fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn normalize_prefers_non_empty_name_tag() {
    assert_eq!(normalize(&tags(&[("Name", "prod-vpc")]), "vpc-1"), "prod-vpc");
    assert_eq!(normalize(&tags(&[("Name", "")]), "vpc-1"), "vpc-1");
    assert_eq!(normalize(&tags(&[("name", "lower")]), "vpc-1"), "vpc-1");
    assert_eq!(normalize(&Tags::new(), "vpc-1"), "vpc-1");
}

#[test]
fn name_index_falls_back_to_raw_identifier() {
    let mut index = NameIndex::new();
    index.insert("sg-1", "web");
    assert_eq!(index.resolve("sg-1"), "web");
    assert_eq!(index.resolve("sg-missing"), "sg-missing");
    assert_eq!(or_placeholder(None), "-");
    assert_eq!(or_placeholder(Some("")), "-");
}

#[test]
fn require_id_rejects_missing_identifiers() {
    let error = require_id(None, "route table", 3).expect_err("missing id rejected");
    assert!(matches!(
        error,
        ReportError::MissingIdentifier {
            kind: "route table",
            index: 3
        }
    ));
    assert_eq!(require_id(Some("rtb-1"), "route table", 0).expect("id present"), "rtb-1");
}

#[test]
fn expand_emits_one_row_per_source_and_placeholder_for_sourceless_rule() {
    let relations = vec![
        ChildRelation::new("tcp", PortRange::single(443))
            .with_source(Source::annotated("10.0.0.0/16", Some("web"))),
        ChildRelation::new("tcp", PortRange::single(22)),
    ];

    assert_eq!(
        expand(&relations),
        vec![
            ExpandedRule::new("tcp", "443", "10.0.0.0/16", "web"),
            ExpandedRule::new("tcp", "22", "-", "-"),
        ]
    );
}

#[test]
fn expand_keeps_relation_then_source_order() {
    let relations = vec![
        ChildRelation::new("udp", PortRange::new(Some(1000), Some(2000)))
            .with_source(Source::new("10.1.0.0/16"))
            .with_source(Source::annotated("10.2.0.0/16", Some("peer"))),
        ChildRelation::new("-1", PortRange::unbounded())
            .with_source(Source::annotated("0.0.0.0/0", Some(""))),
    ];

    let rules = expand(&relations);
    assert_eq!(rules.len(), 3);
    assert_eq!(rules[0], ExpandedRule::new("udp", "1000-2000", "10.1.0.0/16", "-"));
    assert_eq!(rules[1], ExpandedRule::new("udp", "1000-2000", "10.2.0.0/16", "peer"));
    assert_eq!(rules[2], ExpandedRule::new("all", "-", "0.0.0.0/0", "-"));
}

#[test]
fn expand_of_no_relations_is_a_single_placeholder_row() {
    let first = expand(&[]);
    assert_eq!(first, vec![ExpandedRule::placeholder()]);
    assert_eq!(expand(&[]), first);
}

#[test]
fn port_range_rendering() {
    assert_eq!(PortRange::new(Some(80), None).to_string(), "-");
    assert_eq!(PortRange::new(None, None).to_string(), "-");
    assert_eq!(PortRange::single(8080).to_string(), "8080");
    assert_eq!(PortRange::new(Some(0), Some(65535)).to_string(), "0-65535");
}

#[test]
fn align_pads_shorter_side_with_placeholder() {
    let pairs = align(vec!["A", "B", "C"], vec!["X"], "L0", "R0");
    assert_eq!(pairs, vec![("A", "X"), ("B", "R0"), ("C", "R0")]);

    let pairs = align(vec!["A"], vec!["X", "Y"], "L0", "R0");
    assert_eq!(pairs, vec![("A", "X"), ("L0", "Y")]);
}

#[test]
fn align_of_equal_lengths_is_a_plain_zip() {
    let left = vec![1, 2, 3];
    let right = vec!["a", "b", "c"];
    let expected: Vec<_> = left.iter().copied().zip(right.iter().copied()).collect();
    assert_eq!(align(left, right, 0, "-"), expected);
    assert!(align(Vec::<u8>::new(), Vec::<u8>::new(), 0, 0).is_empty());
}

#[test]
fn sort_puts_sentinel_first_within_group() {
    let rows = vec![
        row(&["vpc2", "10.9.0.0/16"]),
        row(&["vpc1", "10.0.0.0/16"]),
        row(&["vpc1", "local"]),
    ];
    let keys = [
        SortKey::column(0),
        SortKey::sentinel_first(1, "local"),
        SortKey::column(1),
    ];

    let sorted = sort(&rows, &keys);
    assert_eq!(
        sorted,
        vec![
            row(&["vpc1", "local"]),
            row(&["vpc1", "10.0.0.0/16"]),
            row(&["vpc2", "10.9.0.0/16"]),
        ]
    );
    assert_eq!(rows[0], row(&["vpc2", "10.9.0.0/16"]), "input untouched");
}

#[test]
fn sort_is_stable_and_idempotent() {
    let rows = vec![
        row(&["b", "1"]),
        row(&["a", "2"]),
        row(&["b", "3"]),
        row(&["a", "4"]),
    ];
    let keys = [SortKey::column(0)];

    let sorted = sort(&rows, &keys);
    assert_eq!(
        sorted,
        vec![
            row(&["a", "2"]),
            row(&["a", "4"]),
            row(&["b", "1"]),
            row(&["b", "3"]),
        ]
    );
    assert_eq!(sort(&sorted, &keys), sorted);
}

#[test]
fn sort_string_keys_are_case_sensitive_unless_requested() {
    let rows = vec![row(&["beta"]), row(&["Alpha"]), row(&["alpha"])];

    let exact = sort(&rows, &[SortKey::column(0)]);
    assert_eq!(exact, vec![row(&["Alpha"]), row(&["alpha"]), row(&["beta"])]);

    let folded = sort(&rows, &[SortKey::column(0).case_insensitive()]);
    assert_eq!(folded, vec![row(&["Alpha"]), row(&["alpha"]), row(&["beta"])]);

    let rows = vec![row(&["b"]), row(&["B"]), row(&["a"])];
    let folded = sort(&rows, &[SortKey::column(0).case_insensitive()]);
    assert_eq!(folded, vec![row(&["a"]), row(&["b"]), row(&["B"])]);
}

#[test]
fn sort_with_custom_priority_function() {
    fn rank(value: &str) -> u8 {
        match value {
            "high" => 0,
            "medium" => 1,
            _ => 2,
        }
    }
    let rows = vec![row(&["low"]), row(&["high"]), row(&["medium"])];
    let sorted = sort(&rows, &[SortKey::priority(0, rank)]);
    assert_eq!(sorted, vec![row(&["high"]), row(&["medium"]), row(&["low"])]);
}

#[test]
fn merges_cover_runs_including_single_rows() {
    let rows = vec![row(&["vpc1"]), row(&["vpc1"]), row(&["vpc2"])];
    assert_eq!(
        compute_merges(&rows, &[0]),
        vec![
            MergeRegion::new(0, 0, 1, "vpc1"),
            MergeRegion::new(0, 2, 2, "vpc2"),
        ]
    );
}

#[test]
fn merges_partition_each_column_independently() {
    let rows = vec![
        row(&["a", "x"]),
        row(&["a", "y"]),
        row(&["b", "y"]),
        row(&["b", "y"]),
        row(&["a", "z"]),
    ];
    let regions = compute_merges(&rows, &[0, 1]);

    for column in [0, 1] {
        let mut next_row = 0;
        for region in regions.iter().filter(|region| region.column == column) {
            assert_eq!(region.start_row, next_row, "contiguous in column {column}");
            assert!(region.end_row >= region.start_row);
            next_row = region.end_row + 1;
        }
        assert_eq!(next_row, rows.len(), "full coverage in column {column}");
    }

    let column_one: Vec<_> = regions.iter().filter(|region| region.column == 1).collect();
    assert_eq!(column_one[1], &MergeRegion::new(1, 1, 3, "y"));
}

#[test]
fn merges_of_empty_rows_and_duplicate_columns() {
    assert!(compute_merges(&[], &[0, 1]).is_empty());

    let rows = vec![row(&["a"]), row(&["a"])];
    assert_eq!(
        compute_merges(&rows, &[0, 0]),
        vec![MergeRegion::new(0, 0, 1, "a")]
    );
}

#[test]
fn scoped_merges_stop_at_parent_boundaries() {
    let rows = vec![
        row(&["vpc1", "sg-1"]),
        row(&["vpc1", "sg-1"]),
        row(&["vpc1", "sg-2"]),
    ];

    let unscoped = compute_merges(&rows, &[0]);
    assert_eq!(unscoped, vec![MergeRegion::new(0, 0, 2, "vpc1")]);

    let scoped = compute_scoped_merges(&rows, &[MergeColumn::new(0).within(1)]);
    assert_eq!(
        scoped,
        vec![
            MergeRegion::new(0, 0, 1, "vpc1"),
            MergeRegion::new(0, 2, 2, "vpc1"),
        ]
    );
    assert!(scoped[0].is_merged());
    assert!(!scoped[1].is_merged());
}

#[test]
fn layout_rejects_out_of_range_columns() {
    let error = ReportLayout::builder("Sheet")
        .column("A", 10.0)
        .sort_by(SortKey::column(1))
        .build()
        .expect_err("sort key past the last column");
    assert!(matches!(
        error,
        ReportError::ColumnOutOfRange { column: 1, width: 1 }
    ));

    let error = ReportLayout::builder("Sheet")
        .column("A", 10.0)
        .column("B", 10.0)
        .merge(MergeColumn::new(0).within(4))
        .build()
        .expect_err("scope column past the last column");
    assert!(matches!(
        error,
        ReportError::ColumnOutOfRange { column: 4, width: 2 }
    ));

    let error = ReportLayout::builder("Sheet")
        .column("A", 10.0)
        .group("Group", 0, 2)
        .build()
        .expect_err("header group past the last column");
    assert!(matches!(error, ReportError::ColumnOutOfRange { .. }));
}

#[test]
fn build_table_sorts_then_merges() {
    let layout = ReportLayout::builder("Routes")
        .column("VPC", 10.0)
        .column("Destination", 10.0)
        .sort_by(SortKey::column(0))
        .sort_by(SortKey::sentinel_first(1, "local"))
        .merge(MergeColumn::new(0))
        .build()
        .expect("layout valid");

    let table = build_table(
        &layout,
        vec![
            row(&["vpc2", "10.9.0.0/16"]),
            row(&["vpc1", "10.0.0.0/16"]),
            row(&["vpc1", "local"]),
        ],
    )
    .expect("table built");

    assert_eq!(table.headers(), vec!["VPC", "Destination"]);
    assert_eq!(table.header_rows(), 1);
    assert_eq!(table.rows[0], row(&["vpc1", "local"]));
    assert_eq!(
        table.merges,
        vec![
            MergeRegion::new(0, 0, 1, "vpc1"),
            MergeRegion::new(0, 2, 2, "vpc2"),
        ]
    );
}

#[test]
fn build_table_rejects_ragged_rows() {
    let layout = ReportLayout::builder("Sheet")
        .column("A", 10.0)
        .column("B", 10.0)
        .build()
        .expect("layout valid");

    let error = build_table(&layout, vec![row(&["a", "b"]), row(&["only-one"])])
        .expect_err("short row rejected");
    assert!(matches!(
        error,
        ReportError::RowWidth {
            expected: 2,
            found: 1
        }
    ));
}

#[test]
fn scoped_merges_ignore_repeated_columns() {
    let rows = vec![
        row(&["vpc1", "sg-1"]),
        row(&["vpc1", "sg-2"]),
    ];

    let regions = compute_scoped_merges(
        &rows,
        &[MergeColumn::new(0), MergeColumn::new(0).within(1)],
    );
    assert_eq!(regions, vec![MergeRegion::new(0, 0, 1, "vpc1")]);
}
