use super::*;
use std::io;

use frost_codegen::MapOrder;
use frost_ir::{RecordSchema, TypeDesc};
use pretty_assertions::assert_eq;

const PKG: &str = "example.com/lib";

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

fn package_ty() -> frost_ir::Ty {
    TypeDesc::record(
        QualName::new("example.com/ast", "Package"),
        RecordSchema::from_names(["Path", "Package"]),
    )
}

fn package_value(name: &str) -> Value {
    Value::pointer_to(Value::record(
        package_ty(),
        vec![Value::string(""), Value::string(name)],
    ))
}

/// Serves packages by directory, relative to `root`. Unlisted directories
/// are empty; a package named `!` fails to parse.
struct Fixture {
    root: PathBuf,
    dirs: Vec<(&'static str, Vec<&'static str>)>,
}

impl UnitParser for Fixture {
    type Error = io::Error;

    fn parse_dir(&self, dir: &Path) -> Result<Vec<ParsedUnit>, io::Error> {
        let rel = relative_dir(&self.root, dir);
        let Some((_, packages)) = self.dirs.iter().find(|(name, _)| *name == rel) else {
            return Ok(Vec::new());
        };
        packages
            .iter()
            .map(|&package| {
                if package == "!" {
                    return Err(io::Error::new(io::ErrorKind::InvalidData, "bad source"));
                }
                Ok(ParsedUnit {
                    package: package.to_string(),
                    value: package_value(package),
                })
            })
            .collect()
    }
}

/// A root with `dirs` created and a config pointing at it.
fn setup(dirs: &[&'static str]) -> (tempfile::TempDir, GenerateConfig) {
    let root = tempfile::tempdir().unwrap();
    for dir in dirs {
        fs::create_dir_all(root.path().join(dir)).unwrap();
    }
    let config = GenerateConfig {
        pkg: PKG.to_string(),
        root_dir: root.path().to_path_buf(),
        ..GenerateConfig::default()
    };
    (root, config)
}

fn fixture(config: &GenerateConfig, dirs: Vec<(&'static str, Vec<&'static str>)>) -> Fixture {
    Fixture {
        root: config.root_dir.clone(),
        dirs,
    }
}

// Options

#[test]
fn options_default() {
    let config = parse_generate_options(&[]).unwrap();
    assert_eq!(config.pkg, "");
    assert_eq!(config.root_dir, PathBuf::from("."));
    assert_eq!(config.import_file, PathBuf::from("builtin_gen.go"));
    assert_eq!(config.output_file, "flux_gen.go");
    assert_eq!(config.var_name, "pkgAST");
    assert_eq!(
        config.register,
        Some(QualName::new("github.com/influxdata/flux", "RegisterPackage"))
    );
    assert_eq!(config.path_field.as_deref(), Some("Path"));
    assert!(!config.check);
}

#[test]
fn options_override_defaults() {
    let config = parse_generate_options(&args(&[
        "--pkg=example.com/lib/",
        "--root-dir=src",
        "--import-file=all_gen.go",
        "--out-file=frozen_gen.go",
        "--var=frozen",
        "--register=example.com/reg.Add",
        "--path-field=",
        "--map-order=encounter",
        "--check",
    ]))
    .unwrap();
    assert_eq!(config.pkg, PKG);
    assert_eq!(config.root_dir, PathBuf::from("src"));
    assert_eq!(config.import_file, PathBuf::from("all_gen.go"));
    assert_eq!(config.output_file, "frozen_gen.go");
    assert_eq!(config.var_name, "frozen");
    assert_eq!(config.register, Some(QualName::new("example.com/reg", "Add")));
    assert_eq!(config.path_field, None);
    assert_eq!(config.encode.map_order, MapOrder::Encounter);
    assert!(config.check);
}

#[test]
fn empty_register_disables_init() {
    let config = parse_generate_options(&args(&["--register="])).unwrap();
    assert_eq!(config.register, None);
}

#[test]
fn invalid_options_are_rejected() {
    for arg in [
        "--frobnicate",
        "--out-file=gen/x.go",
        "--var=2fast",
        "--register=example.com/reg.",
        "--map-order=random",
    ] {
        let err = parse_generate_options(&args(&[arg])).unwrap_err();
        assert!(
            matches!(&err, GenerateError::InvalidOption { arg: bad, .. } if bad == arg),
            "{arg} gave {err:?}"
        );
    }
}

// Paths

#[test]
fn relative_dirs_and_import_paths() {
    let root = Path::new("/src/lib");
    assert_eq!(relative_dir(root, root), ".");
    assert_eq!(relative_dir(root, &root.join("csv")), "csv");
    assert_eq!(relative_dir(root, &root.join("a").join("b")), "a/b");

    assert_eq!(join_import_path(PKG, "."), PKG);
    assert_eq!(join_import_path(PKG, "a/b"), "example.com/lib/a/b");
    assert_eq!(package_name(PKG), "lib");
    assert_eq!(package_name("lib"), "lib");
}

#[test]
fn stamp_path_sets_the_root_record_field() {
    let stamped = stamp_path(package_value("csv"), "Path", "csv");
    let expected = Value::pointer_to(Value::record(
        package_ty(),
        vec![Value::string("csv"), Value::string("csv")],
    ));
    assert_eq!(stamped, expected);

    // Unknown fields and non-record roots are left alone.
    assert_eq!(
        stamp_path(package_value("csv"), "Dir", "csv"),
        package_value("csv")
    );
    assert_eq!(stamp_path(Value::int(1), "Path", "csv"), Value::int(1));
}

#[test]
fn walk_visits_parents_first_in_name_order() {
    let (root, _) = setup(&["b/y", "a", "b/x", ".git/objects"]);
    fs::write(root.path().join("a.txt"), "").unwrap();
    let dirs: Vec<String> = walk_dirs(root.path())
        .unwrap()
        .iter()
        .map(|dir| relative_dir(root.path(), dir))
        .collect();
    assert_eq!(dirs, [".", "a", "b", "b/x", "b/y"]);
}

#[test]
fn walk_of_missing_root_is_an_io_error() {
    let root = tempfile::tempdir().unwrap();
    let missing = root.path().join("missing");
    assert!(matches!(
        walk_dirs(&missing).unwrap_err(),
        GenerateError::Io { path, .. } if path == missing
    ));
}

// Generation

#[test]
fn generates_one_file_per_package() {
    let (root, config) = setup(&["csv", "empty", "strings/inner"]);
    let parser = fixture(
        &config,
        vec![
            (".", vec!["lib"]),
            ("csv", vec!["csv"]),
            ("strings/inner", vec!["inner"]),
        ],
    );
    let report = generate(&config, &parser).unwrap();
    assert_eq!(report.units, 3);
    assert_eq!(report.written.len(), 4);
    assert!(report.stale.is_empty());

    let csv = fs::read_to_string(root.path().join("csv/flux_gen.go")).unwrap();
    let expected = "\
// DO NOT EDIT: This file is autogenerated via the builtin command.

package csv

import (
\tast \"example.com/ast\"
\tflux \"github.com/influxdata/flux\"
)

func init() {
\tflux.RegisterPackage(pkgAST)
}

var pkgAST = &ast.Package{
\tPath: \"csv\",
\tPackage: \"csv\",
}
";
    assert_eq!(csv, expected);

    let inner = fs::read_to_string(root.path().join("strings/inner/flux_gen.go")).unwrap();
    assert!(inner.contains("\tPath: \"strings/inner\",\n"));
    let top = fs::read_to_string(root.path().join("flux_gen.go")).unwrap();
    assert!(top.contains("\tPath: \".\",\n"));
    assert!(!root.path().join("empty/flux_gen.go").exists());

    let imports = fs::read_to_string(root.path().join("builtin_gen.go")).unwrap();
    let expected = "\
// DO NOT EDIT: This file is autogenerated via the builtin command.

package lib

import (
\t_ \"example.com/lib/csv\"
\t_ \"example.com/lib/strings/inner\"
)
";
    assert_eq!(imports, expected);
}

#[test]
fn multiple_packages_in_one_directory_fail() {
    let (root, config) = setup(&["csv"]);
    let parser = fixture(&config, vec![("csv", vec!["csv_test", "csv"])]);
    let err = generate(&config, &parser).unwrap_err();
    let GenerateError::MultiplePackages { dir, packages } = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(dir, &root.path().join("csv"));
    assert_eq!(packages, &["csv", "csv_test"]);
    assert!(err
        .to_string()
        .starts_with("found multiple packages in the same directory: "));
}

#[test]
fn failing_unit_writes_nothing() {
    let (root, config) = setup(&["a", "b"]);
    let parser = fixture(&config, vec![("a", vec!["a"]), ("b", vec!["!"])]);
    let err = generate(&config, &parser).unwrap_err();
    assert!(matches!(err, GenerateError::Parse { .. }));
    assert!(!root.path().join("a/flux_gen.go").exists());
    assert!(!root.path().join("builtin_gen.go").exists());
}

#[test]
fn first_failing_directory_in_walk_order_is_reported() {
    let (root, config) = setup(&["a", "b", "c", "d"]);
    let parser = fixture(
        &config,
        vec![
            ("a", vec!["a"]),
            ("b", vec!["!"]),
            ("c", vec!["c"]),
            ("d", vec!["!"]),
        ],
    );
    for _ in 0..16 {
        let err = generate(&config, &parser).unwrap_err();
        let GenerateError::Parse { dir, .. } = &err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(dir, &root.path().join("b"));
    }
}

#[test]
fn unencodable_value_names_the_package() {
    struct Opaque;
    impl UnitParser for Opaque {
        type Error = io::Error;
        fn parse_dir(&self, _: &Path) -> Result<Vec<ParsedUnit>, io::Error> {
            Ok(vec![ParsedUnit {
                package: "lib".to_string(),
                value: Value::opaque(TypeDesc::func()),
            }])
        }
    }
    let (_root, config) = setup(&[]);
    let err = generate(&config, &Opaque).unwrap_err();
    assert!(matches!(err, GenerateError::Encode { package, .. } if package == "lib"));
}

#[test]
fn missing_package_path_is_an_error() {
    let (_root, mut config) = setup(&[]);
    config.pkg = String::new();
    let parser = fixture(&config, vec![]);
    assert!(matches!(
        generate(&config, &parser).unwrap_err(),
        GenerateError::MissingPackagePath
    ));
}

#[test]
fn check_mode_reports_stale_files() {
    let (root, mut config) = setup(&["csv"]);
    let parser = fixture(&config, vec![("csv", vec!["csv"])]);

    config.check = true;
    let report = generate(&config, &parser).unwrap();
    assert_eq!(report.stale.len(), 2);
    assert!(report.written.is_empty());
    assert!(!root.path().join("csv/flux_gen.go").exists());

    config.check = false;
    generate(&config, &parser).unwrap();

    config.check = true;
    let report = generate(&config, &parser).unwrap();
    assert!(report.stale.is_empty(), "stale: {:?}", report.stale);

    fs::write(root.path().join("csv/flux_gen.go"), "package csv\n").unwrap();
    let report = generate(&config, &parser).unwrap();
    assert_eq!(report.stale, [root.path().join("csv/flux_gen.go")]);
}

#[test]
fn regeneration_is_byte_identical() {
    let (root, config) = setup(&["a", "b", "c"]);
    let parser = fixture(
        &config,
        vec![("a", vec!["a"]), ("b", vec!["b"]), ("c", vec!["c"])],
    );
    generate(&config, &parser).unwrap();
    let first = fs::read_to_string(root.path().join("builtin_gen.go")).unwrap();
    generate(&config, &parser).unwrap();
    let second = fs::read_to_string(root.path().join("builtin_gen.go")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn render_unit_without_register() {
    let config = GenerateConfig {
        register: None,
        header: String::new(),
        ..GenerateConfig::default()
    };
    let text = render_unit(&config, "p", "example.com/p", &Value::int(7)).unwrap();
    assert_eq!(text, "package p\n\nvar pkgAST = 7\n");
}
