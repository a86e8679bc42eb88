//! Command-line options for `generate`.

use std::path::PathBuf;

use frost_codegen::MapOrder;
use frost_ir::QualName;

use super::{GenerateConfig, GenerateError};

/// Parse `--flag=value` options on top of [`GenerateConfig::default`].
pub fn parse_generate_options(args: &[String]) -> Result<GenerateConfig, GenerateError> {
    let mut config = GenerateConfig::default();

    for arg in args {
        if arg == "--check" {
            config.check = true;
        } else if let Some(pkg) = arg.strip_prefix("--pkg=") {
            config.pkg = pkg.trim_end_matches('/').to_string();
        } else if let Some(dir) = arg.strip_prefix("--root-dir=") {
            config.root_dir = PathBuf::from(dir);
        } else if let Some(file) = arg.strip_prefix("--import-file=") {
            config.import_file = PathBuf::from(file);
        } else if let Some(file) = arg.strip_prefix("--out-file=") {
            if file.is_empty() || file.contains(['/', '\\']) {
                return Err(invalid(arg, "expected a bare file name"));
            }
            config.output_file = file.to_string();
        } else if let Some(name) = arg.strip_prefix("--var=") {
            if !is_identifier(name) {
                return Err(invalid(arg, "expected a Go identifier"));
            }
            config.var_name = name.to_string();
        } else if let Some(func) = arg.strip_prefix("--register=") {
            config.register = if func.is_empty() {
                None
            } else {
                let name = QualName::parse(func);
                if !is_identifier(&name.name) {
                    return Err(invalid(arg, "expected <import path>.<Func>"));
                }
                Some(name)
            };
        } else if let Some(field) = arg.strip_prefix("--path-field=") {
            config.path_field = (!field.is_empty()).then(|| field.to_string());
        } else if let Some(order) = arg.strip_prefix("--map-order=") {
            config.encode.map_order = match order {
                "sorted" => MapOrder::SortedByKey,
                "encounter" => MapOrder::Encounter,
                _ => return Err(invalid(arg, "expected `sorted` or `encounter`")),
            };
        } else {
            return Err(invalid(arg, "unknown option"));
        }
    }

    Ok(config)
}

fn invalid(arg: &str, reason: &'static str) -> GenerateError {
    GenerateError::InvalidOption {
        arg: arg.to_string(),
        reason,
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}
