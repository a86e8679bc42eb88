//! Runtime value trees.
//!
//! [`Value`] is a closed tagged union with one case per kind of
//! [`TypeDesc`](crate::TypeDesc). Every value carries its own type
//! descriptor, so a container knows its element type even when it is empty
//! and a polymorphic slot knows the dynamic type of what it holds.
//!
//! Pointer targets are shared through [`Ptr`], which has identity: two
//! pointers to the same target compare equal by address, and a target may be
//! filled in after the pointer was embedded elsewhere (which is how a cyclic
//! graph can be built at all).

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::{Kind, ScalarKind, Ty, TypeDesc};

/// Scalar payload. Each variant is stored at its own width.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint(u64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Uintptr(u64),
    Float32(f32),
    Float64(f64),
    /// Real and imaginary parts.
    Complex64(f32, f32),
    Complex128(f64, f64),
    String(String),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::Int8(_) => ScalarKind::Int8,
            Scalar::Int16(_) => ScalarKind::Int16,
            Scalar::Int32(_) => ScalarKind::Int32,
            Scalar::Int64(_) => ScalarKind::Int64,
            Scalar::Uint(_) => ScalarKind::Uint,
            Scalar::Uint8(_) => ScalarKind::Uint8,
            Scalar::Uint16(_) => ScalarKind::Uint16,
            Scalar::Uint32(_) => ScalarKind::Uint32,
            Scalar::Uint64(_) => ScalarKind::Uint64,
            Scalar::Uintptr(_) => ScalarKind::Uintptr,
            Scalar::Float32(_) => ScalarKind::Float32,
            Scalar::Float64(_) => ScalarKind::Float64,
            Scalar::Complex64(..) => ScalarKind::Complex64,
            Scalar::Complex128(..) => ScalarKind::Complex128,
            Scalar::String(_) => ScalarKind::String,
        }
    }

    /// The zero value of a scalar kind.
    pub fn zero(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Bool => Scalar::Bool(false),
            ScalarKind::Int => Scalar::Int(0),
            ScalarKind::Int8 => Scalar::Int8(0),
            ScalarKind::Int16 => Scalar::Int16(0),
            ScalarKind::Int32 => Scalar::Int32(0),
            ScalarKind::Int64 => Scalar::Int64(0),
            ScalarKind::Uint => Scalar::Uint(0),
            ScalarKind::Uint8 => Scalar::Uint8(0),
            ScalarKind::Uint16 => Scalar::Uint16(0),
            ScalarKind::Uint32 => Scalar::Uint32(0),
            ScalarKind::Uint64 => Scalar::Uint64(0),
            ScalarKind::Uintptr => Scalar::Uintptr(0),
            ScalarKind::Float32 => Scalar::Float32(0.0),
            ScalarKind::Float64 => Scalar::Float64(0.0),
            ScalarKind::Complex64 => Scalar::Complex64(0.0, 0.0),
            ScalarKind::Complex128 => Scalar::Complex128(0.0, 0.0),
            ScalarKind::String => Scalar::String(String::new()),
        }
    }
}

/// Shared, identity-bearing pointer target.
#[derive(Clone)]
pub struct Ptr(Arc<RwLock<Value>>);

impl Ptr {
    pub fn new(target: Value) -> Self {
        Ptr(Arc::new(RwLock::new(target)))
    }

    /// Replace the target. Pointers cloned from this one observe the change.
    pub fn set(&self, target: Value) {
        *self.0.write() = target;
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Value> {
        self.0.read()
    }

    /// Address of the shared target, stable for the target's lifetime.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }

    pub fn ptr_eq(&self, other: &Ptr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Ptr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ptr({:#x})", self.id())
    }
}

/// Pointers are equal when they share a target or their targets are deeply
/// equal. Comparing two distinct cyclic graphs does not terminate.
impl PartialEq for Ptr {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.read() == *other.read()
    }
}

/// A runtime value together with its type descriptor.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar { ty: Ty, scalar: Scalar },
    Array { ty: Ty, elems: Vec<Value> },
    /// `None` is an absent (nil) sequence, distinct from an empty one.
    Slice { ty: Ty, elems: Option<Vec<Value>> },
    /// Entries in the order the producer enumerated them.
    Map {
        ty: Ty,
        entries: Option<Vec<(Value, Value)>>,
    },
    Pointer { ty: Ty, target: Option<Ptr> },
    /// Polymorphic slot; the held value's own `ty` is its dynamic type.
    Interface { ty: Ty, held: Option<Box<Value>> },
    /// Field values in schema order.
    Struct { ty: Ty, fields: Vec<Value> },
    /// A value of a kind that has no payload representation here
    /// (functions, channels, unsafe pointers).
    Opaque { ty: Ty },
}

impl Value {
    /// A scalar of its builtin type.
    pub fn scalar(scalar: Scalar) -> Self {
        Value::Scalar {
            ty: TypeDesc::scalar(scalar.kind()),
            scalar,
        }
    }

    /// A scalar of a named type (`type OperatorKind int`).
    pub fn typed_scalar(ty: Ty, scalar: Scalar) -> Self {
        Value::Scalar { ty, scalar }
    }

    pub fn bool(b: bool) -> Self {
        Self::scalar(Scalar::Bool(b))
    }

    pub fn int(n: i64) -> Self {
        Self::scalar(Scalar::Int(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::scalar(Scalar::String(s.into()))
    }

    pub fn array(ty: Ty, elems: Vec<Value>) -> Self {
        Value::Array { ty, elems }
    }

    pub fn slice(ty: Ty, elems: Vec<Value>) -> Self {
        Value::Slice {
            ty,
            elems: Some(elems),
        }
    }

    pub fn nil_slice(ty: Ty) -> Self {
        Value::Slice { ty, elems: None }
    }

    pub fn map(ty: Ty, entries: Vec<(Value, Value)>) -> Self {
        Value::Map {
            ty,
            entries: Some(entries),
        }
    }

    pub fn nil_map(ty: Ty) -> Self {
        Value::Map { ty, entries: None }
    }

    pub fn pointer(ty: Ty, target: Ptr) -> Self {
        Value::Pointer {
            ty,
            target: Some(target),
        }
    }

    /// A pointer to a fresh target holding `value`, typed `*T` for the
    /// value's type `T`.
    pub fn pointer_to(value: Value) -> Self {
        let ty = TypeDesc::pointer(value.ty().clone());
        Self::pointer(ty, Ptr::new(value))
    }

    pub fn nil_pointer(ty: Ty) -> Self {
        Value::Pointer { ty, target: None }
    }

    pub fn interface(ty: Ty, held: Value) -> Self {
        Value::Interface {
            ty,
            held: Some(Box::new(held)),
        }
    }

    pub fn nil_interface(ty: Ty) -> Self {
        Value::Interface { ty, held: None }
    }

    pub fn record(ty: Ty, fields: Vec<Value>) -> Self {
        Value::Struct { ty, fields }
    }

    pub fn opaque(ty: Ty) -> Self {
        Value::Opaque { ty }
    }

    /// The value's (static) type descriptor.
    pub fn ty(&self) -> &Ty {
        match self {
            Value::Scalar { ty, .. }
            | Value::Array { ty, .. }
            | Value::Slice { ty, .. }
            | Value::Map { ty, .. }
            | Value::Pointer { ty, .. }
            | Value::Interface { ty, .. }
            | Value::Struct { ty, .. }
            | Value::Opaque { ty } => ty,
        }
    }

    pub fn kind(&self) -> Kind {
        self.ty().kind_tag()
    }

    /// Replace the type descriptor, keeping the payload. Used to give a
    /// value decoded from an underlying type its named type.
    #[must_use]
    pub fn retyped(mut self, new_ty: Ty) -> Self {
        match &mut self {
            Value::Scalar { ty, .. }
            | Value::Array { ty, .. }
            | Value::Slice { ty, .. }
            | Value::Map { ty, .. }
            | Value::Pointer { ty, .. }
            | Value::Interface { ty, .. }
            | Value::Struct { ty, .. }
            | Value::Opaque { ty } => *ty = new_ty,
        }
        self
    }

    /// Whether this is a nil slice, map, pointer, or interface.
    pub fn is_nil(&self) -> bool {
        matches!(
            self,
            Value::Slice { elems: None, .. }
                | Value::Map { entries: None, .. }
                | Value::Pointer { target: None, .. }
                | Value::Interface { held: None, .. }
        )
    }
}
