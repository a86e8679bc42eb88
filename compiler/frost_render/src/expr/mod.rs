//! Expression layout.
//!
//! Lays a [`Code`] tree out as Go source. Scalars, conversions and calls stay
//! on one line. A non-empty composite literal puts each element on its own
//! line, one tab deeper than the literal, with a trailing comma; an empty one
//! is written `T{}`.

use frost_codegen::{Code, Elements, TypeExpr};
use frost_ir::QualName;
use frost_stack::ensure_sufficient_stack;

use crate::{Emitter, ImportTable};

/// Writes expressions, importing the packages they name.
pub struct ExprWriter<'a, E: Emitter> {
    out: &'a mut E,
    imports: &'a mut ImportTable,
}

impl<'a, E: Emitter> ExprWriter<'a, E> {
    pub fn new(out: &'a mut E, imports: &'a mut ImportTable) -> Self {
        ExprWriter { out, imports }
    }

    /// Write `code` as if it starts on a line indented `level` tabs.
    pub fn write_code(&mut self, code: &Code, level: usize) {
        ensure_sufficient_stack(|| self.write_code_inner(code, level));
    }

    fn write_code_inner(&mut self, code: &Code, level: usize) {
        match code {
            Code::Nil => self.out.emit("nil"),
            Code::Lit(token) | Code::Ident(token) => self.out.emit(token),
            Code::Convert { ty, value } => {
                if matches!(ty, TypeExpr::Pointer(_)) {
                    self.out.emit("(");
                    self.write_type(ty);
                    self.out.emit(")");
                } else {
                    self.write_type(ty);
                }
                self.out.emit("(");
                self.write_code(value, level);
                self.out.emit(")");
            }
            Code::Call { func, args } => {
                self.write_name(func);
                self.out.emit("(");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.emit(",");
                        self.out.emit_space();
                    }
                    self.write_code(arg, level);
                }
                self.out.emit(")");
            }
            Code::Composite { ty, elems } => self.write_composite(ty, elems, level),
            Code::AddrOf(inner) => {
                self.out.emit("&");
                self.write_code(inner, level);
            }
            Code::PointerTo { ty, value } => {
                self.out.emit("func() *");
                self.write_type(ty);
                self.out.emit(" { var v ");
                self.write_type(ty);
                self.out.emit(" = ");
                self.write_code(value, level);
                self.out.emit("; return &v }()");
            }
        }
    }

    fn write_composite(&mut self, ty: &TypeExpr, elems: &Elements, level: usize) {
        self.write_type(ty);
        self.out.emit("{");
        if elems.is_empty() {
            self.out.emit("}");
            return;
        }
        self.out.emit_newline();
        match elems {
            Elements::Positional(items) => {
                for item in items {
                    self.out.emit_indent(level + 1);
                    self.write_code(item, level + 1);
                    self.out.emit(",");
                    self.out.emit_newline();
                }
            }
            Elements::Keyed(entries) => {
                for (key, value) in entries {
                    self.out.emit_indent(level + 1);
                    self.write_code(key, level + 1);
                    self.out.emit(":");
                    self.out.emit_space();
                    self.write_code(value, level + 1);
                    self.out.emit(",");
                    self.out.emit_newline();
                }
            }
        }
        self.out.emit_indent(level);
        self.out.emit("}");
    }

    /// Write a type expression.
    pub fn write_type(&mut self, ty: &TypeExpr) {
        ensure_sufficient_stack(|| match ty {
            TypeExpr::Named(name) => self.write_name(name),
            TypeExpr::Slice(elem) => {
                self.out.emit("[]");
                self.write_type(elem);
            }
            TypeExpr::Map { key, value } => {
                self.out.emit("map[");
                self.write_type(key);
                self.out.emit("]");
                self.write_type(value);
            }
            TypeExpr::Pointer(pointee) => {
                self.out.emit("*");
                self.write_type(pointee);
            }
        });
    }

    /// Write a possibly qualified name.
    pub fn write_name(&mut self, name: &QualName) {
        if let Some(alias) = self.imports.qualifier(&name.path) {
            self.out.emit(alias);
            self.out.emit(".");
        }
        self.out.emit(&name.name);
    }
}
