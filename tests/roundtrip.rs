use std::fs;

use inventory_report::ReportError;
use inventory_report::export::{self, ExportOptions};
use inventory_report::io::excel_read;
use inventory_report::reports::ReportKind;
use tempfile::tempdir;

fn snapshot_json() -> serde_json::Value {
    serde_json::json!({
        "Vpcs": [{"VpcId": "vpc-1", "Tags": [{"Key": "Name", "Value": "core"}]}],
        "SecurityGroups": [
            {
                "GroupId": "sg-1",
                "GroupName": "web",
                "VpcId": "vpc-1",
                "IpPermissions": [
                    {
                        "IpProtocol": "tcp",
                        "FromPort": 443,
                        "ToPort": 443,
                        "IpRanges": [
                            {"CidrIp": "10.0.0.0/16", "Description": "office"},
                            {"CidrIp": "10.1.0.0/16"}
                        ]
                    }
                ],
                "IpPermissionsEgress": [
                    {"IpProtocol": "-1", "IpRanges": [{"CidrIp": "0.0.0.0/0"}]}
                ]
            }
        ],
        "RouteTables": [
            {
                "RouteTableId": "rtb-1",
                "VpcId": "vpc-1",
                "Tags": [{"Key": "Name", "Value": "public"}],
                "Routes": [
                    {"DestinationCidrBlock": "0.0.0.0/0", "GatewayId": "igw-1"},
                    {"DestinationCidrBlock": "10.0.0.0/16", "GatewayId": "local"}
                ]
            }
        ]
    })
}

#[test]
fn exported_workbook_reads_back_with_merged_cells() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("snapshot.json");
    let output = temp_dir.path().join("inventory.xlsx");
    fs::write(&input, serde_json::to_string_pretty(&snapshot_json()).unwrap())
        .expect("snapshot written");

    let options = ExportOptions {
        account: "DEV".to_string(),
        ..ExportOptions::default()
    };
    export::export(&input, &output, &options).expect("workbook exported");

    let names = excel_read::sheet_names(&output).expect("sheet names read");
    let expected: Vec<String> = ReportKind::ALL
        .iter()
        .map(|kind| kind.sheet_name().to_string())
        .collect();
    assert_eq!(names, expected);

    let routes = export::inspect(&output, "RouteTables").expect("route sheet read");
    assert_eq!(
        routes.rows[0],
        vec![
            "Account",
            "VPC Name",
            "VPC ID",
            "Route Table Name",
            "Route Table ID",
            "Destination",
            "Target"
        ]
    );
    assert_eq!(
        routes.rows[1],
        vec!["DEV", "core", "vpc-1", "public", "rtb-1", "10.0.0.0/16", "local"]
    );
    assert_eq!(routes.rows[2], vec!["", "", "", "", "", "0.0.0.0/0", "igw-1"]);
}

#[test]
fn grouped_headers_span_two_rows() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("snapshot.json");
    let output = temp_dir.path().join("groups.xlsx");
    fs::write(&input, snapshot_json().to_string()).expect("snapshot written");

    let options = ExportOptions {
        reports: vec![ReportKind::SecurityGroups],
        ..ExportOptions::default()
    };
    export::export(&input, &output, &options).expect("workbook exported");

    let sheet = excel_read::read_sheet(&output, "SecurityGroups").expect("sheet read");
    assert_eq!(sheet.cell(0, 0), Some("VPC Name"));
    assert_eq!(sheet.cell(1, 0), Some(""));
    assert_eq!(sheet.cell(0, 3), Some("Inbound Rule"));
    assert_eq!(sheet.cell(1, 3), Some("Type"));
    assert_eq!(sheet.cell(0, 7), Some("Outbound Rule"));
    assert_eq!(sheet.cell(1, 9), Some("Source"));
    assert_eq!(sheet.cell(0, 10), Some("Remark (Outbound)"));

    assert_eq!(
        sheet.rows[2],
        vec![
            "core", "web", "sg-1", "tcp", "443", "10.0.0.0/16", "office", "all", "-", "0.0.0.0/0",
            "-"
        ]
    );
    assert_eq!(
        sheet.rows[3],
        vec!["", "", "", "tcp", "443", "10.1.0.0/16", "-", "-", "-", "-", "-"]
    );
}

#[test]
fn missing_snapshot_is_reported() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("absent.json");
    let output = temp_dir.path().join("out.xlsx");

    let error = export::export(&input, &output, &ExportOptions::default())
        .expect_err("missing input rejected");
    assert!(matches!(error, ReportError::MissingInput(path) if path == input));
    assert!(!output.exists());
}

#[test]
fn unknown_sheet_is_reported() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("snapshot.json");
    let output = temp_dir.path().join("out.xlsx");
    fs::write(&input, "{}").expect("snapshot written");

    export::export(&input, &output, &ExportOptions::default()).expect("workbook exported");
    let error = export::inspect(&output, "Nope").expect_err("unknown sheet rejected");
    assert!(matches!(error, ReportError::MissingSheet(name) if name == "Nope"));
}
