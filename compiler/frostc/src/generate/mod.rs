//! The `generate` command: one Go file per package directory.
//!
//! Every directory under the root is handed to a [`UnitParser`]. A directory
//! with no package is skipped; more than one package in a directory is an
//! error. Each package's value is encoded and rendered into
//! `<dir>/<output_file>`, and every package other than the root one is
//! blank-imported from `<root>/<import_file>`.
//!
//! Units are processed in parallel. All files are rendered before any is
//! written, so a failing unit leaves the tree untouched.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use frost_codegen::{encode_value_with, EncodeError, EncodeOptions};
use frost_ir::{QualName, Scalar, Value};
use frost_render::{render_import_file, UnitFile};

mod options;
mod walk;

pub use options::parse_generate_options;
pub use walk::walk_dirs;

/// Header written at the top of every generated file.
pub const DEFAULT_HEADER: &str =
    "// DO NOT EDIT: This file is autogenerated via the builtin command.";

/// Function each unit file registers its value with.
pub const DEFAULT_REGISTER: &str = "github.com/influxdata/flux.RegisterPackage";

/// One package found in a directory.
#[derive(Clone, Debug)]
pub struct ParsedUnit {
    /// Package clause name.
    pub package: String,
    /// The package's typed value tree.
    pub value: Value,
}

/// Produces the packages of one directory.
///
/// Implementations return one unit per package; an empty directory yields
/// an empty list.
pub trait UnitParser {
    type Error: std::error::Error + Send + Sync + 'static;

    fn parse_dir(&self, dir: &Path) -> Result<Vec<ParsedUnit>, Self::Error>;
}

/// Configuration for the generate command.
#[derive(Clone, Debug)]
pub struct GenerateConfig {
    /// Import path of the root package; subdirectories extend it.
    pub pkg: String,
    /// Directory to walk.
    pub root_dir: PathBuf,
    /// Aggregate import file, relative to `root_dir`.
    pub import_file: PathBuf,
    /// Name of the file written into each package directory.
    pub output_file: String,
    /// Package-level variable holding the value.
    pub var_name: String,
    /// Registration function called from `init`; `None` writes no `init`.
    pub register: Option<QualName>,
    pub header: String,
    /// String field of the root record that receives the package's
    /// directory relative to `root_dir`.
    pub path_field: Option<String>,
    pub encode: EncodeOptions,
    /// Compare against the files on disk instead of writing.
    pub check: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        GenerateConfig {
            pkg: String::new(),
            root_dir: PathBuf::from("."),
            import_file: PathBuf::from("builtin_gen.go"),
            output_file: "flux_gen.go".to_string(),
            var_name: "pkgAST".to_string(),
            register: Some(QualName::parse(DEFAULT_REGISTER)),
            header: DEFAULT_HEADER.to_string(),
            path_field: Some("Path".to_string()),
            encode: EncodeOptions::default(),
            check: false,
        }
    }
}

/// Outcome of a generate run.
#[derive(Debug, Default)]
pub struct GenerateReport {
    /// Number of packages generated.
    pub units: usize,
    /// Files written (empty in check mode).
    pub written: Vec<PathBuf>,
    /// Files whose content on disk differs from the generated content
    /// (check mode only).
    pub stale: Vec<PathBuf>,
}

/// Error from the generate command.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("missing --pkg: the import path of the root package is required")]
    MissingPackagePath,

    #[error("invalid option `{arg}`: {reason}")]
    InvalidOption { arg: String, reason: &'static str },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse package in {}: {source}", dir.display())]
    Parse {
        dir: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("found multiple packages in the same directory: {} packages {packages:?}", dir.display())]
    MultiplePackages { dir: PathBuf, packages: Vec<String> },

    #[error("failed to encode package {package:?} in {}: {source}", dir.display())]
    Encode {
        dir: PathBuf,
        package: String,
        #[source]
        source: EncodeError,
    },
}

impl GenerateError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| GenerateError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A rendered output file.
struct Rendered {
    import_path: String,
    path: PathBuf,
    text: String,
}

/// Run the generate command over `config.root_dir`.
#[tracing::instrument(level = "debug", skip_all, fields(root = %config.root_dir.display()))]
pub fn generate<P>(config: &GenerateConfig, parser: &P) -> Result<GenerateReport, GenerateError>
where
    P: UnitParser + Sync,
{
    if config.pkg.is_empty() {
        return Err(GenerateError::MissingPackagePath);
    }

    let dirs = walk_dirs(&config.root_dir)?;
    tracing::debug!(dirs = dirs.len(), "walked root");

    // Every unit runs to completion so the error reported is the first in
    // walk order, whatever order the workers finish in.
    let results: Vec<Result<Option<Rendered>, GenerateError>> = dirs
        .par_iter()
        .map(|dir| generate_unit(config, parser, dir))
        .collect();
    let rendered: Vec<Rendered> = results
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .flatten()
        .collect();

    let imports: Vec<String> = rendered
        .iter()
        .filter(|unit| unit.import_path != config.pkg)
        .map(|unit| unit.import_path.clone())
        .collect();
    let units = rendered.len();
    let mut outputs: Vec<(PathBuf, String)> = rendered
        .into_iter()
        .map(|unit| (unit.path, unit.text))
        .collect();
    outputs.push((
        config.root_dir.join(&config.import_file),
        render_import_file(&config.header, package_name(&config.pkg), &imports),
    ));

    let mut report = GenerateReport {
        units,
        ..GenerateReport::default()
    };
    if config.check {
        for (path, text) in outputs {
            let current = fs::read_to_string(&path).ok();
            if current.as_deref() != Some(text.as_str()) {
                tracing::debug!(path = %path.display(), "stale");
                report.stale.push(path);
            }
        }
    } else {
        for (path, text) in outputs {
            fs::write(&path, text).map_err(GenerateError::io(&path))?;
            report.written.push(path);
        }
    }
    Ok(report)
}

#[tracing::instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
fn generate_unit<P>(
    config: &GenerateConfig,
    parser: &P,
    dir: &Path,
) -> Result<Option<Rendered>, GenerateError>
where
    P: UnitParser,
{
    let mut units = parser.parse_dir(dir).map_err(|source| GenerateError::Parse {
        dir: dir.to_path_buf(),
        source: Box::new(source),
    })?;
    if units.len() > 1 {
        let mut packages: Vec<String> = units.into_iter().map(|unit| unit.package).collect();
        packages.sort();
        return Err(GenerateError::MultiplePackages {
            dir: dir.to_path_buf(),
            packages,
        });
    }
    let Some(unit) = units.pop() else {
        tracing::debug!("no package, skipping");
        return Ok(None);
    };

    let rel = relative_dir(&config.root_dir, dir);
    let import_path = join_import_path(&config.pkg, &rel);
    let value = match &config.path_field {
        Some(field) => stamp_path(unit.value, field, &rel),
        None => unit.value,
    };
    let text = render_unit(config, &unit.package, &import_path, &value).map_err(|source| {
        GenerateError::Encode {
            dir: dir.to_path_buf(),
            package: unit.package.clone(),
            source,
        }
    })?;

    Ok(Some(Rendered {
        import_path,
        path: dir.join(&config.output_file),
        text,
    }))
}

/// Encode `value` and render it as the unit file of package `package` with
/// import path `import_path`.
pub fn render_unit(
    config: &GenerateConfig,
    package: &str,
    import_path: &str,
    value: &Value,
) -> Result<String, EncodeError> {
    let code = encode_value_with(value, config.encode.clone())?;
    let file = UnitFile {
        header: config.header.clone(),
        package: package.to_string(),
        import_path: import_path.to_string(),
        var_name: config.var_name.clone(),
        register: config.register.clone(),
    };
    Ok(file.render(&code))
}

/// `dir` relative to `root`, `/`-separated; `.` for the root itself.
fn relative_dir(root: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(root).unwrap_or(dir);
    let parts: Vec<_> = rel
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect();
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

fn join_import_path(pkg: &str, rel: &str) -> String {
    if rel == "." {
        pkg.to_string()
    } else {
        format!("{pkg}/{rel}")
    }
}

/// Last element of an import path.
fn package_name(pkg: &str) -> &str {
    pkg.rsplit('/').next().unwrap_or(pkg)
}

/// Set the string field `field` of the root record (or the record the root
/// points to) to `rel`. Other roots are returned unchanged.
fn stamp_path(value: Value, field: &str, rel: &str) -> Value {
    match value {
        Value::Pointer {
            ty,
            target: Some(target),
        } => {
            let pointee = target.read().clone();
            Value::pointer(ty, frost_ir::Ptr::new(stamp_path(pointee, field, rel)))
        }
        Value::Struct { ty, mut fields } => {
            let slot = ty
                .schema()
                .and_then(|schema| schema.position(field))
                .and_then(|index| fields.get_mut(index));
            if let Some(Value::Scalar {
                scalar: Scalar::String(path),
                ..
            }) = slot
            {
                *path = rel.to_string();
            }
            Value::Struct { ty, fields }
        }
        other => other,
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
