//! Go file assembly.
//!
//! A unit file holds one package's frozen value:
//!
//! ```text
//! // DO NOT EDIT: ...
//!
//! package csv
//!
//! import (
//! 	flux "github.com/influxdata/flux"
//! 	ast "github.com/influxdata/flux/ast"
//! )
//!
//! func init() {
//! 	flux.RegisterPackage(pkgAST)
//! }
//!
//! var pkgAST = &ast.Package{
//! 	...
//! }
//! ```
//!
//! The import file pulls every unit package in through blank imports so
//! their `init` functions run.

use frost_codegen::Code;
use frost_ir::QualName;

use crate::{Emitter, ExprWriter, ImportTable, StringEmitter};

/// Everything about a unit file except the value expression.
#[derive(Clone, Debug)]
pub struct UnitFile {
    /// Comment block written verbatim at the top.
    pub header: String,
    /// Package clause name.
    pub package: String,
    /// Import path of the package itself.
    pub import_path: String,
    /// Name of the package-level variable holding the value.
    pub var_name: String,
    /// Function called from `init` with the variable; `None` writes no `init`.
    pub register: Option<QualName>,
}

impl UnitFile {
    /// Render the file with `value` as the variable's initializer.
    pub fn render(&self, value: &Code) -> String {
        let mut imports = ImportTable::new(&self.import_path);
        imports.reserve(&self.var_name);

        // The body decides which packages are imported, so it goes first.
        let mut body = StringEmitter::with_capacity(4096);
        if let Some(register) = &self.register {
            body.emit("func init() {");
            body.emit_newline();
            body.emit_indent(1);
            let mut writer = ExprWriter::new(&mut body, &mut imports);
            writer.write_name(register);
            body.emit("(");
            body.emit(&self.var_name);
            body.emit(")");
            body.emit_newline();
            body.emit("}");
            body.emit_newline();
            body.emit_newline();
        }
        body.emit("var");
        body.emit_space();
        body.emit(&self.var_name);
        body.emit(" = ");
        ExprWriter::new(&mut body, &mut imports).write_code(value, 0);
        body.emit_newline();

        let mut out = StringEmitter::with_capacity(body.as_str().len() + 512);
        write_preamble(&mut out, &self.header, &self.package);
        let entries: Vec<(&str, &str)> = imports
            .imports()
            .into_iter()
            .map(|import| (import.alias, import.path))
            .collect();
        write_imports(&mut out, &entries);
        out.emit(body.as_str());
        out.ensure_trailing_newline();
        out.output()
    }
}

/// Render the file that blank-imports every path in `paths`.
pub fn render_import_file(header: &str, package: &str, paths: &[String]) -> String {
    let mut sorted: Vec<&str> = paths.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();
    let entries: Vec<(&str, &str)> = sorted.into_iter().map(|path| ("_", path)).collect();

    let mut out = StringEmitter::new();
    write_preamble(&mut out, header, package);
    write_imports(&mut out, &entries);
    out.ensure_trailing_newline();
    out.output()
}

fn write_preamble(out: &mut StringEmitter, header: &str, package: &str) {
    let header = header.trim_end();
    if !header.is_empty() {
        out.emit(header);
        out.emit_newline();
        out.emit_newline();
    }
    out.emit("package");
    out.emit_space();
    out.emit(package);
    out.emit_newline();
    out.emit_newline();
}

/// Parenthesized import block of `(alias, path)` entries.
fn write_imports(out: &mut StringEmitter, entries: &[(&str, &str)]) {
    if entries.is_empty() {
        return;
    }
    out.emit("import (");
    out.emit_newline();
    for (alias, path) in entries {
        out.emit_indent(1);
        out.emit(alias);
        out.emit_space();
        out.emit(&frost_codegen::quote(path));
        out.emit_newline();
    }
    out.emit(")");
    out.emit_newline();
    out.emit_newline();
}
