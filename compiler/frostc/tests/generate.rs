//! End-to-end tests: snapshot files on disk in, Go files out.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::fs;
use std::path::Path;

use frostc::{generate, GenerateConfig, GenerateError, SnapshotParser};
use pretty_assertions::assert_eq;

const AST: &str = "github.com/influxdata/flux/ast";

fn write_snapshot(root: &Path, dir: &str, package: &str, body: &str) {
    let dir = root.join(dir);
    fs::create_dir_all(&dir).unwrap();
    let text = format!(
        r#"{{
  "package": "{package}",
  "types": {{
    "{AST}.Package": {{"kind": "struct", "fields": [
      {{"name": "Path", "type": "string"}},
      {{"name": "Package", "type": "string"}},
      {{"name": "Files", "type": "[]*{AST}.File"}}
    ]}},
    "{AST}.File": {{"kind": "struct", "fields": [
      {{"name": "Name", "type": "string"}},
      {{"name": "Body", "type": "[]{AST}.Statement"}},
      {{"name": "Meta", "type": "map[string]float64"}},
      {{"name": "hash", "type": "uint32"}}
    ]}},
    "{AST}.Statement": {{"kind": "interface"}},
    "{AST}.OptionStatement": {{"kind": "struct", "fields": [
      {{"name": "Op", "type": "{AST}.OperatorKind"}}
    ]}},
    "{AST}.OperatorKind": {{"kind": "named", "underlying": "int"}}
  }},
  "root": {{"type": "*{AST}.Package", "value": {body}}}
}}"#
    );
    fs::write(dir.join(format!("{package}.frozen.json")), text).unwrap();
}

fn config(root: &Path) -> GenerateConfig {
    GenerateConfig {
        pkg: "github.com/influxdata/flux/stdlib".to_string(),
        root_dir: root.to_path_buf(),
        ..GenerateConfig::default()
    }
}

#[test]
fn generates_package_files_and_import_file() {
    let root = tempfile::tempdir().unwrap();
    write_snapshot(
        root.path(),
        "csv",
        "csv",
        r#"{
            "Package": "csv",
            "Files": [{
                "Name": "csv.flux",
                "Body": [{"type": "*github.com/influxdata/flux/ast.OptionStatement", "value": {"Op": 2}}],
                "Meta": [["z", 1.5], ["a", "+Inf"]],
                "hash": 7
            }]
        }"#,
    );
    write_snapshot(root.path(), "testing/expect", "expect", r#"{"Package": "expect"}"#);
    fs::create_dir_all(root.path().join("internal")).unwrap();

    let report = generate(&config(root.path()), &SnapshotParser).unwrap();
    assert_eq!(report.units, 2);

    let csv = fs::read_to_string(root.path().join("csv/flux_gen.go")).unwrap();
    let expected = "\
// DO NOT EDIT: This file is autogenerated via the builtin command.

package csv

import (
\tflux \"github.com/influxdata/flux\"
\tast \"github.com/influxdata/flux/ast\"
\tmath \"math\"
)

func init() {
\tflux.RegisterPackage(pkgAST)
}

var pkgAST = &ast.Package{
\tPath: \"csv\",
\tPackage: \"csv\",
\tFiles: []*ast.File{
\t\t&ast.File{
\t\t\tName: \"csv.flux\",
\t\t\tBody: []ast.Statement{
\t\t\t\t&ast.OptionStatement{
\t\t\t\t\tOp: ast.OperatorKind(2),
\t\t\t\t},
\t\t\t},
\t\t\tMeta: map[string]float64{
\t\t\t\t\"a\": math.Inf(1),
\t\t\t\t\"z\": 1.5,
\t\t\t},
\t\t},
\t},
}
";
    assert_eq!(csv, expected);

    let expect = fs::read_to_string(root.path().join("testing/expect/flux_gen.go")).unwrap();
    assert!(expect.contains("\tPath: \"testing/expect\",\n"));
    assert!(expect.contains("\tFiles: nil,\n"));

    let imports = fs::read_to_string(root.path().join("builtin_gen.go")).unwrap();
    assert_eq!(
        imports,
        "\
// DO NOT EDIT: This file is autogenerated via the builtin command.

package stdlib

import (
\t_ \"github.com/influxdata/flux/stdlib/csv\"
\t_ \"github.com/influxdata/flux/stdlib/testing/expect\"
)
"
    );
    assert!(!root.path().join("internal/flux_gen.go").exists());
}

#[test]
fn two_packages_in_one_directory_fail() {
    let root = tempfile::tempdir().unwrap();
    write_snapshot(root.path(), "csv", "csv", "{}");
    write_snapshot(root.path(), "csv", "csv_test", "{}");

    let err = generate(&config(root.path()), &SnapshotParser).unwrap_err();
    assert!(
        matches!(&err, GenerateError::MultiplePackages { packages, .. } if packages == &["csv", "csv_test"]),
        "{err}"
    );
    assert!(!root.path().join("csv/flux_gen.go").exists());
}

#[test]
fn malformed_snapshot_fails_the_run() {
    let root = tempfile::tempdir().unwrap();
    write_snapshot(root.path(), "good", "good", "{}");
    fs::create_dir_all(root.path().join("bad")).unwrap();
    fs::write(root.path().join("bad/bad.frozen.json"), "{").unwrap();

    let err = generate(&config(root.path()), &SnapshotParser).unwrap_err();
    assert!(matches!(err, GenerateError::Parse { .. }), "{err}");
    assert!(!root.path().join("good/flux_gen.go").exists());
}

#[test]
fn check_passes_after_generate() {
    let root = tempfile::tempdir().unwrap();
    write_snapshot(root.path(), "csv", "csv", r#"{"Package": "csv"}"#);

    let mut config = config(root.path());
    generate(&config, &SnapshotParser).unwrap();
    config.check = true;
    let report = generate(&config, &SnapshotParser).unwrap();
    assert!(report.stale.is_empty());
    assert_eq!(report.units, 1);

    write_snapshot(root.path(), "csv", "csv", r#"{"Package": "changed"}"#);
    let report = generate(&config, &SnapshotParser).unwrap();
    assert_eq!(report.stale, [root.path().join("csv/flux_gen.go")]);
}
