//! Code expressions.
//!
//! The encoder produces [`Code`] trees; the renderer lays them out as Go
//! source and decides how qualified names are imported. Every `Code` is a
//! complete Go expression that can stand on the right of an assignment or as
//! a call argument.
//!
//! The `Display` impls give a compact single-line canonical form in which
//! qualified names keep their full import path (`"go/ast".Ident`). That form
//! is what map entries are sorted by, and what diagnostics show.

use std::fmt;

use frost_ir::QualName;

/// A Go type expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// Qualified or builtin type name.
    Named(QualName),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `*T`
    Pointer(Box<TypeExpr>),
}

impl TypeExpr {
    /// A builtin type name such as `int8`.
    pub fn builtin(name: &str) -> Self {
        TypeExpr::Named(QualName::local(name))
    }

    pub fn slice(elem: TypeExpr) -> Self {
        TypeExpr::Slice(Box::new(elem))
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn pointer(pointee: TypeExpr) -> Self {
        TypeExpr::Pointer(Box::new(pointee))
    }
}

/// Elements of a composite literal.
#[derive(Clone, Debug, PartialEq)]
pub enum Elements {
    /// `T{a, b}`
    Positional(Vec<Code>),
    /// `T{k: v}` for maps, `T{Field: v}` for records.
    Keyed(Vec<(Code, Code)>),
}

impl Elements {
    pub fn len(&self) -> usize {
        match self {
            Elements::Positional(items) => items.len(),
            Elements::Keyed(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A Go expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Code {
    /// `nil`
    Nil,
    /// A literal token, emitted verbatim.
    Lit(String),
    Ident(String),
    /// Conversion `T(x)`.
    Convert { ty: TypeExpr, value: Box<Code> },
    /// Call of a (possibly qualified) function: `math.Inf(1)`.
    Call { func: QualName, args: Vec<Code> },
    /// Composite literal `T{...}`.
    Composite { ty: TypeExpr, elems: Elements },
    /// `&x`, only applied to composite literals.
    AddrOf(Box<Code>),
    /// Pointer to a non-addressable value, via an immediately invoked
    /// function: `func() *T { var v T = x; return &v }()`.
    PointerTo { ty: TypeExpr, value: Box<Code> },
}

impl Code {
    pub fn lit(token: impl Into<String>) -> Self {
        Code::Lit(token.into())
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Code::Ident(name.into())
    }

    pub fn convert(ty: TypeExpr, value: Code) -> Self {
        Code::Convert {
            ty,
            value: Box::new(value),
        }
    }

    pub fn call(func: QualName, args: Vec<Code>) -> Self {
        Code::Call { func, args }
    }

    pub fn composite(ty: TypeExpr, elems: Elements) -> Self {
        Code::Composite { ty, elems }
    }

    /// Take the address of `value`. Composite literals are addressable with
    /// `&`; anything else goes through [`Code::PointerTo`].
    pub fn address_of(ty: TypeExpr, value: Code) -> Self {
        match value {
            Code::Composite { .. } => Code::AddrOf(Box::new(value)),
            other => Code::PointerTo {
                ty,
                value: Box::new(other),
            },
        }
    }
}

fn write_name(f: &mut fmt::Formatter<'_>, name: &QualName) -> fmt::Result {
    if name.is_local() {
        f.write_str(&name.name)
    } else {
        write!(f, "{:?}.{}", name.path, name.name)
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(name) => write_name(f, name),
            TypeExpr::Slice(elem) => write!(f, "[]{elem}"),
            TypeExpr::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeExpr::Pointer(pointee) => write!(f, "*{pointee}"),
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Nil => f.write_str("nil"),
            Code::Lit(token) | Code::Ident(token) => f.write_str(token),
            Code::Convert { ty, value } => {
                if matches!(ty, TypeExpr::Pointer(_)) {
                    write!(f, "({ty})({value})")
                } else {
                    write!(f, "{ty}({value})")
                }
            }
            Code::Call { func, args } => {
                write_name(f, func)?;
                f.write_str("(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Code::Composite { ty, elems } => {
                write!(f, "{ty}{{")?;
                match elems {
                    Elements::Positional(items) => {
                        for (i, item) in items.iter().enumerate() {
                            if i > 0 {
                                f.write_str(", ")?;
                            }
                            write!(f, "{item}")?;
                        }
                    }
                    Elements::Keyed(entries) => {
                        for (i, (key, value)) in entries.iter().enumerate() {
                            if i > 0 {
                                f.write_str(", ")?;
                            }
                            write!(f, "{key}: {value}")?;
                        }
                    }
                }
                f.write_str("}")
            }
            Code::AddrOf(inner) => write!(f, "&{inner}"),
            Code::PointerTo { ty, value } => {
                write!(f, "func() *{ty} {{ var v {ty} = {value}; return &v }}()")
            }
        }
    }
}
