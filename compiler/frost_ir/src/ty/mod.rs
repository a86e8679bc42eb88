//! Type descriptors.
//!
//! A [`TypeDesc`] describes the shape of a type without regard to any value:
//! its kind, its element types (for containers and pointers), and its
//! qualified name when the type is named. Descriptors are immutable and
//! shared through [`Ty`].
//!
//! Record descriptors carry a [`RecordSchema`] (field names and visibility)
//! but not the field types: every field value carries its own descriptor, so
//! the schema only has to say which fields exist and which participate in
//! encoding. This also lets self-referential types (`type List struct { Next
//! *List }`) be described without cyclic descriptors.

use std::fmt;
use std::sync::Arc;

/// Shared handle to an immutable type descriptor.
pub type Ty = Arc<TypeDesc>;

/// Builtin scalar kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    Bool,
    /// Platform-width signed integer (`int`).
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    /// Platform-width unsigned integer (`uint`).
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
}

impl ScalarKind {
    /// Every scalar kind, in declaration order.
    pub const ALL: [ScalarKind; 17] = [
        ScalarKind::Bool,
        ScalarKind::Int,
        ScalarKind::Int8,
        ScalarKind::Int16,
        ScalarKind::Int32,
        ScalarKind::Int64,
        ScalarKind::Uint,
        ScalarKind::Uint8,
        ScalarKind::Uint16,
        ScalarKind::Uint32,
        ScalarKind::Uint64,
        ScalarKind::Uintptr,
        ScalarKind::Float32,
        ScalarKind::Float64,
        ScalarKind::Complex64,
        ScalarKind::Complex128,
        ScalarKind::String,
    ];

    /// The builtin type name (`int8`, `float64`, `string`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Int8 => "int8",
            ScalarKind::Int16 => "int16",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint => "uint",
            ScalarKind::Uint8 => "uint8",
            ScalarKind::Uint16 => "uint16",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::Uintptr => "uintptr",
            ScalarKind::Float32 => "float32",
            ScalarKind::Float64 => "float64",
            ScalarKind::Complex64 => "complex64",
            ScalarKind::Complex128 => "complex128",
            ScalarKind::String => "string",
        }
    }

    /// Look up a builtin scalar by name. Accepts the `byte` and `rune` aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "byte" => Some(ScalarKind::Uint8),
            "rune" => Some(ScalarKind::Int32),
            _ => Self::ALL.into_iter().find(|kind| kind.name() == name),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Flat kind tag of a type, independent of its name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Scalar(ScalarKind),
    Array,
    Slice,
    Map,
    Pointer,
    Interface,
    Struct,
    Func,
    Chan,
    UnsafePointer,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Scalar(scalar) => f.write_str(scalar.name()),
            Kind::Array => f.write_str("array"),
            Kind::Slice => f.write_str("slice"),
            Kind::Map => f.write_str("map"),
            Kind::Pointer => f.write_str("ptr"),
            Kind::Interface => f.write_str("interface"),
            Kind::Struct => f.write_str("struct"),
            Kind::Func => f.write_str("func"),
            Kind::Chan => f.write_str("chan"),
            Kind::UnsafePointer => f.write_str("unsafe.Pointer"),
        }
    }
}

/// A type name qualified by the import path of the package declaring it.
///
/// Builtin types have an empty path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualName {
    pub path: String,
    pub name: String,
}

impl QualName {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        QualName {
            path: path.into(),
            name: name.into(),
        }
    }

    /// A name with no package path (builtins, or types local to the output file).
    pub fn local(name: impl Into<String>) -> Self {
        Self::new(String::new(), name)
    }

    pub fn is_local(&self) -> bool {
        self.path.is_empty()
    }

    /// Split `path.Name` at the last dot after the last slash, so dots in
    /// the path (`github.com/...`) stay in the path. No dot means local.
    pub fn parse(qualified: &str) -> Self {
        let tail = qualified.rfind('/').map_or(0, |slash| slash + 1);
        match qualified[tail..].rfind('.') {
            Some(dot) => {
                let dot = tail + dot;
                Self::new(&qualified[..dot], &qualified[dot + 1..])
            }
            None => Self::local(qualified),
        }
    }
}

impl fmt::Display for QualName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.path, self.name)
        }
    }
}

/// Whether a record field participates in encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Exported,
    Unexported,
}

impl Visibility {
    /// Go visibility rule: a field is exported iff its name starts with an
    /// uppercase letter.
    pub fn of_field_name(name: &str) -> Self {
        if name.chars().next().is_some_and(char::is_uppercase) {
            Visibility::Exported
        } else {
            Visibility::Unexported
        }
    }

    pub fn is_exported(self) -> bool {
        self == Visibility::Exported
    }
}

/// One field of a record schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDesc {
    pub name: String,
    pub visibility: Visibility,
}

impl FieldDesc {
    /// Create a field whose visibility follows from its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let visibility = Visibility::of_field_name(&name);
        FieldDesc { name, visibility }
    }

    pub fn with_visibility(name: impl Into<String>, visibility: Visibility) -> Self {
        FieldDesc {
            name: name.into(),
            visibility,
        }
    }
}

/// Ordered field list of a record type, built once per record type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RecordSchema {
    fields: Vec<FieldDesc>,
}

impl RecordSchema {
    pub fn new(fields: Vec<FieldDesc>) -> Self {
        RecordSchema { fields }
    }

    /// Build a schema from field names, deriving visibility from each name.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RecordSchema {
            fields: names.into_iter().map(FieldDesc::new).collect(),
        }
    }

    pub fn fields(&self) -> &[FieldDesc] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of the field named `name`, if any.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }
}

/// Structural shape of a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Scalar(ScalarKind),
    /// Fixed-length array: `[len]elem`.
    Array { elem: Ty, len: usize },
    /// Dynamic sequence: `[]elem`.
    Slice { elem: Ty },
    Map { key: Ty, value: Ty },
    Pointer { pointee: Ty },
    /// Polymorphic slot. The held value's dynamic type comes from the value.
    Interface,
    Struct(RecordSchema),
    // Kinds with no encoding rule.
    Func,
    Chan,
    UnsafePointer,
}

/// Immutable description of a type: optional qualified name plus shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDesc {
    name: Option<QualName>,
    kind: TypeKind,
}

impl TypeDesc {
    fn unnamed(kind: TypeKind) -> Ty {
        Arc::new(TypeDesc { name: None, kind })
    }

    /// The builtin scalar type of the given kind.
    pub fn scalar(kind: ScalarKind) -> Ty {
        Self::unnamed(TypeKind::Scalar(kind))
    }

    pub fn array(elem: Ty, len: usize) -> Ty {
        Self::unnamed(TypeKind::Array { elem, len })
    }

    pub fn slice(elem: Ty) -> Ty {
        Self::unnamed(TypeKind::Slice { elem })
    }

    pub fn map(key: Ty, value: Ty) -> Ty {
        Self::unnamed(TypeKind::Map { key, value })
    }

    pub fn pointer(pointee: Ty) -> Ty {
        Self::unnamed(TypeKind::Pointer { pointee })
    }

    /// The empty interface (`interface{}`).
    pub fn any() -> Ty {
        Self::unnamed(TypeKind::Interface)
    }

    pub fn func() -> Ty {
        Self::unnamed(TypeKind::Func)
    }

    pub fn chan() -> Ty {
        Self::unnamed(TypeKind::Chan)
    }

    pub fn unsafe_pointer() -> Ty {
        Self::unnamed(TypeKind::UnsafePointer)
    }

    /// A named interface type.
    pub fn interface(name: QualName) -> Ty {
        Arc::new(TypeDesc {
            name: Some(name),
            kind: TypeKind::Interface,
        })
    }

    /// A named record type.
    pub fn record(name: QualName, schema: RecordSchema) -> Ty {
        Arc::new(TypeDesc {
            name: Some(name),
            kind: TypeKind::Struct(schema),
        })
    }

    /// A named type whose shape is that of `underlying` (`type Kind int`,
    /// `type Names []string`).
    pub fn named(name: QualName, underlying: &TypeDesc) -> Ty {
        Arc::new(TypeDesc {
            name: Some(name),
            kind: underlying.kind.clone(),
        })
    }

    pub fn name(&self) -> Option<&QualName> {
        self.name.as_ref()
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Flat kind tag.
    pub fn kind_tag(&self) -> Kind {
        match &self.kind {
            TypeKind::Scalar(scalar) => Kind::Scalar(*scalar),
            TypeKind::Array { .. } => Kind::Array,
            TypeKind::Slice { .. } => Kind::Slice,
            TypeKind::Map { .. } => Kind::Map,
            TypeKind::Pointer { .. } => Kind::Pointer,
            TypeKind::Interface => Kind::Interface,
            TypeKind::Struct(_) => Kind::Struct,
            TypeKind::Func => Kind::Func,
            TypeKind::Chan => Kind::Chan,
            TypeKind::UnsafePointer => Kind::UnsafePointer,
        }
    }

    /// The record schema, if this is a record type.
    pub fn schema(&self) -> Option<&RecordSchema> {
        match &self.kind {
            TypeKind::Struct(schema) => Some(schema),
            _ => None,
        }
    }
}

/// Go-style type syntax, used in diagnostics.
impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            return write!(f, "{name}");
        }
        match &self.kind {
            TypeKind::Scalar(scalar) => f.write_str(scalar.name()),
            TypeKind::Array { elem, len } => write!(f, "[{len}]{elem}"),
            TypeKind::Slice { elem } => write!(f, "[]{elem}"),
            TypeKind::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeKind::Pointer { pointee } => write!(f, "*{pointee}"),
            TypeKind::Interface => f.write_str("interface{}"),
            TypeKind::Struct(schema) => {
                f.write_str("struct{")?;
                for (i, field) in schema.fields().iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    f.write_str(&field.name)?;
                }
                f.write_str("}")
            }
            TypeKind::Func => f.write_str("func()"),
            TypeKind::Chan => f.write_str("chan"),
            TypeKind::UnsafePointer => f.write_str("unsafe.Pointer"),
        }
    }
}

#[cfg(test)]
mod tests;
