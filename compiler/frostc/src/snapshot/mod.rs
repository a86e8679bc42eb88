//! Package snapshots.
//!
//! A snapshot is a JSON file (`*.frozen.json`) holding one package's typed
//! value tree:
//!
//! ```text
//! {
//!   "package": "csv",
//!   "types": {
//!     "github.com/influxdata/flux/ast.Package": {
//!       "kind": "struct",
//!       "fields": [
//!         { "name": "Package", "type": "string" },
//!         { "name": "Files", "type": "[]*github.com/influxdata/flux/ast.File" }
//!       ]
//!     },
//!     "github.com/influxdata/flux/ast.Expression": { "kind": "interface" },
//!     "github.com/influxdata/flux/ast.OperatorKind": { "kind": "named", "underlying": "int" }
//!   },
//!   "root": { "type": "*github.com/influxdata/flux/ast.Package", "value": { ... } }
//! }
//! ```
//!
//! Values decode against their type. Struct fields left out take their zero
//! value. Interfaces are `null` or `{ "type", "value" }`. Maps are arrays of
//! `[key, value]` pairs with distinct keys. Complex numbers are `[re, im]`,
//! and non-finite floats are the strings `"+Inf"`, `"-Inf"` and `"NaN"`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::generate::{ParsedUnit, UnitParser};

mod decode;
mod syntax;

use decode::Decoder;
use syntax::TypeSyntax;

/// File name suffix of snapshot files.
pub const SNAPSHOT_SUFFIX: &str = ".frozen.json";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotFile {
    package: String,
    #[serde(default)]
    types: BTreeMap<String, TypeDecl>,
    root: TypedJson,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum TypeDecl {
    Struct {
        #[serde(default)]
        fields: Vec<FieldDecl>,
    },
    Interface,
    Named {
        underlying: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDecl {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    /// Overrides the capitalization rule.
    #[serde(default)]
    exported: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypedJson {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    value: serde_json::Value,
}

/// Error loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid type `{ty}`: {reason}")]
    InvalidType { ty: String, reason: String },

    #[error("undeclared type `{0}`")]
    UndeclaredType(String),

    #[error("type `{0}` contains itself")]
    RecursiveType(String),

    #[error("value does not match `{ty}`: {reason}")]
    Mismatch { ty: String, reason: String },

    #[error("package {package:?} is declared by both {} and {}", first.display(), second.display())]
    DuplicatePackage {
        package: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<SnapshotError>,
    },
}

/// Parse snapshot text into a unit. Values may nest to any depth.
pub fn parse_snapshot(text: &str) -> Result<ParsedUnit, SnapshotError> {
    frost_stack::with_deep_stack(|| parse_file(text))
}

fn parse_file(text: &str) -> Result<ParsedUnit, SnapshotError> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let file = SnapshotFile::deserialize(&mut de)?;
    de.end()?;
    let mut decoder = Decoder::new(&file.types);
    let root = TypeSyntax::parse(&file.root.ty)?;
    let value = decoder.decode(&root, &file.root.value)?;
    Ok(ParsedUnit {
        package: file.package,
        value,
    })
}

/// Load the snapshot at `path`.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn load_snapshot(path: &Path) -> Result<ParsedUnit, SnapshotError> {
    let text = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(&text).map_err(|source| SnapshotError::InFile {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

/// Reads the `*.frozen.json` files of a directory, one package per file.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapshotParser;

impl UnitParser for SnapshotParser {
    type Error = SnapshotError;

    fn parse_dir(&self, dir: &Path) -> Result<Vec<ParsedUnit>, SnapshotError> {
        let io = |source| SnapshotError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(io)? {
            let entry = entry.map_err(io)?;
            let is_snapshot = entry.file_name().to_string_lossy().ends_with(SNAPSHOT_SUFFIX);
            if is_snapshot && entry.file_type().map_err(io)?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();

        let mut units: Vec<(PathBuf, ParsedUnit)> = Vec::with_capacity(files.len());
        for path in files {
            let unit = load_snapshot(&path)?;
            if let Some((first, _)) = units.iter().find(|(_, seen)| seen.package == unit.package) {
                return Err(SnapshotError::DuplicatePackage {
                    package: unit.package,
                    first: first.clone(),
                    second: path,
                });
            }
            units.push((path, unit));
        }
        Ok(units.into_iter().map(|(_, unit)| unit).collect())
    }
}
