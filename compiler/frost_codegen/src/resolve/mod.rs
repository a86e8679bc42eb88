//! Type expression resolution.
//!
//! Maps a type descriptor to the Go type expression naming it in a composite
//! literal. Maps, pointers, arrays, and slices are spelled structurally (even
//! when the type is named); everything else is spelled by its qualified name.
//! Arrays resolve to slice syntax: the element count lives in the literal, not
//! in the type expression.

use frost_ir::{QualName, TypeDesc, TypeKind};

use crate::TypeExpr;

/// Resolve the type expression for `ty`. Total over all descriptors.
pub fn resolve(ty: &TypeDesc) -> TypeExpr {
    match ty.kind() {
        TypeKind::Map { key, value } => TypeExpr::map(resolve(key), resolve(value)),
        TypeKind::Pointer { pointee } => TypeExpr::pointer(resolve(pointee)),
        TypeKind::Array { elem, .. } | TypeKind::Slice { elem } => TypeExpr::slice(resolve(elem)),
        _ => TypeExpr::Named(qualified_name(ty)),
    }
}

/// Qualified name of a non-structural type. Unnamed types fall back to
/// their builtin spelling (`int`, `interface{}`).
fn qualified_name(ty: &TypeDesc) -> QualName {
    if let Some(name) = ty.name() {
        return name.clone();
    }
    match ty.kind() {
        TypeKind::Scalar(scalar) => QualName::local(scalar.name()),
        TypeKind::UnsafePointer => QualName::new("unsafe", "Pointer"),
        _ => QualName::local(ty.to_string()),
    }
}
