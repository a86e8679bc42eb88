//! Type strings in snapshot files.
//!
//! A subset of Go type syntax: builtin scalar names, `*T`, `[]T`, `[N]T`,
//! `map[K]V`, `interface{}`, `func`, `chan`, `unsafe.Pointer`, and declared
//! type names (`github.com/influxdata/flux/ast.File`).

use std::fmt;

use frost_ir::ScalarKind;

use super::SnapshotError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TypeSyntax {
    Scalar(ScalarKind),
    Array { elem: Box<TypeSyntax>, len: usize },
    Slice(Box<TypeSyntax>),
    Map { key: Box<TypeSyntax>, value: Box<TypeSyntax> },
    Pointer(Box<TypeSyntax>),
    Any,
    Func,
    Chan,
    UnsafePointer,
    /// A name declared in the snapshot's `types` table.
    Decl(String),
}

impl TypeSyntax {
    pub(crate) fn parse(text: &str) -> Result<Self, SnapshotError> {
        let invalid = |reason: &str| SnapshotError::InvalidType {
            ty: text.to_string(),
            reason: reason.to_string(),
        };
        let text = text.trim();

        if let Some(rest) = text.strip_prefix('*') {
            return Ok(TypeSyntax::Pointer(Box::new(Self::parse(rest)?)));
        }
        if let Some(rest) = text.strip_prefix("[]") {
            return Ok(TypeSyntax::Slice(Box::new(Self::parse(rest)?)));
        }
        if let Some(rest) = text.strip_prefix("map[") {
            let close = matching_bracket(rest).ok_or_else(|| invalid("unclosed map key"))?;
            let key = Self::parse(&rest[..close])?;
            let value = Self::parse(&rest[close + 1..])?;
            return Ok(TypeSyntax::Map {
                key: Box::new(key),
                value: Box::new(value),
            });
        }
        if let Some(rest) = text.strip_prefix('[') {
            let (len, elem) = rest
                .split_once(']')
                .ok_or_else(|| invalid("unclosed array length"))?;
            let len = len
                .trim()
                .parse()
                .map_err(|_| invalid("array length is not a number"))?;
            return Ok(TypeSyntax::Array {
                elem: Box::new(Self::parse(elem)?),
                len,
            });
        }

        match text {
            "interface{}" | "any" => return Ok(TypeSyntax::Any),
            "unsafe.Pointer" => return Ok(TypeSyntax::UnsafePointer),
            _ => {}
        }
        if text == "func" || text.starts_with("func(") {
            return Ok(TypeSyntax::Func);
        }
        if text == "chan" || text.starts_with("chan ") || text.starts_with("<-chan ") {
            return Ok(TypeSyntax::Chan);
        }
        if let Some(kind) = ScalarKind::from_name(text) {
            return Ok(TypeSyntax::Scalar(kind));
        }
        if is_type_name(text) {
            return Ok(TypeSyntax::Decl(text.to_string()));
        }
        Err(invalid("not a type"))
    }
}

/// Index of the `]` closing an already opened `[`.
fn matching_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' if depth == 0 => return Some(i),
            ']' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// `path.Name` or a bare name: no whitespace or type punctuation.
fn is_type_name(text: &str) -> bool {
    !text.is_empty()
        && !text.ends_with(['.', '/'])
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '/' | '-' | '~'))
}

impl fmt::Display for TypeSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSyntax::Scalar(kind) => write!(f, "{kind}"),
            TypeSyntax::Array { elem, len } => write!(f, "[{len}]{elem}"),
            TypeSyntax::Slice(elem) => write!(f, "[]{elem}"),
            TypeSyntax::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeSyntax::Pointer(pointee) => write!(f, "*{pointee}"),
            TypeSyntax::Any => f.write_str("interface{}"),
            TypeSyntax::Func => f.write_str("func"),
            TypeSyntax::Chan => f.write_str("chan"),
            TypeSyntax::UnsafePointer => f.write_str("unsafe.Pointer"),
            TypeSyntax::Decl(name) => f.write_str(name),
        }
    }
}
