//! Decoding snapshot JSON into typed values.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value as Json;

use frost_ir::{
    FieldDesc, Ptr, QualName, RecordSchema, Scalar, ScalarKind, Ty, TypeDesc, Value, Visibility,
};
use frost_stack::ensure_sufficient_stack;

use super::syntax::TypeSyntax;
use super::{FieldDecl, SnapshotError, TypeDecl};

/// Decodes values against the type declarations of one snapshot.
pub(crate) struct Decoder<'a> {
    decls: &'a BTreeMap<String, TypeDecl>,
    /// Descriptors of declared types, built on first use.
    types: FxHashMap<String, Ty>,
    /// Named types whose underlying type is being resolved.
    resolving: FxHashSet<String>,
    /// Records whose zero value is being built.
    zeroing: FxHashSet<String>,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(decls: &'a BTreeMap<String, TypeDecl>) -> Self {
        Decoder {
            decls,
            types: FxHashMap::default(),
            resolving: FxHashSet::default(),
            zeroing: FxHashSet::default(),
        }
    }

    /// The type descriptor for `syntax`.
    pub(crate) fn ty(&mut self, syntax: &TypeSyntax) -> Result<Ty, SnapshotError> {
        Ok(match syntax {
            TypeSyntax::Scalar(kind) => TypeDesc::scalar(*kind),
            TypeSyntax::Array { elem, len } => TypeDesc::array(self.ty(elem)?, *len),
            TypeSyntax::Slice(elem) => TypeDesc::slice(self.ty(elem)?),
            TypeSyntax::Map { key, value } => TypeDesc::map(self.ty(key)?, self.ty(value)?),
            TypeSyntax::Pointer(pointee) => TypeDesc::pointer(self.ty(pointee)?),
            TypeSyntax::Any => TypeDesc::any(),
            TypeSyntax::Func => TypeDesc::func(),
            TypeSyntax::Chan => TypeDesc::chan(),
            TypeSyntax::UnsafePointer => TypeDesc::unsafe_pointer(),
            TypeSyntax::Decl(name) => self.decl_ty(name)?,
        })
    }

    fn decl(&self, name: &str) -> Result<&'a TypeDecl, SnapshotError> {
        self.decls
            .get(name)
            .ok_or_else(|| SnapshotError::UndeclaredType(name.to_string()))
    }

    fn decl_ty(&mut self, name: &str) -> Result<Ty, SnapshotError> {
        if let Some(ty) = self.types.get(name) {
            return Ok(ty.clone());
        }
        let qual = QualName::parse(name);
        let ty = match self.decl(name)? {
            TypeDecl::Struct { fields } => TypeDesc::record(qual, schema(fields)),
            TypeDecl::Interface => TypeDesc::interface(qual),
            TypeDecl::Named { underlying } => {
                if !self.resolving.insert(name.to_string()) {
                    return Err(SnapshotError::RecursiveType(name.to_string()));
                }
                let underlying = self.ty(&TypeSyntax::parse(underlying)?);
                self.resolving.remove(name);
                let underlying = underlying?;
                TypeDesc::named(qual, &underlying)
            }
        };
        self.types.insert(name.to_string(), ty.clone());
        Ok(ty)
    }

    /// Decode `json` as a value of type `syntax`.
    pub(crate) fn decode(&mut self, syntax: &TypeSyntax, json: &Json) -> Result<Value, SnapshotError> {
        ensure_sufficient_stack(|| self.decode_value(syntax, json))
    }

    fn decode_value(&mut self, syntax: &TypeSyntax, json: &Json) -> Result<Value, SnapshotError> {
        let mismatch = |reason: &str| SnapshotError::Mismatch {
            ty: syntax.to_string(),
            reason: reason.to_string(),
        };

        match syntax {
            TypeSyntax::Scalar(kind) => decode_scalar(*kind, json)
                .map(Value::scalar)
                .ok_or_else(|| mismatch(&format!("expected {kind}, found {json}"))),
            TypeSyntax::Array { elem, len } => {
                let items = json.as_array().ok_or_else(|| mismatch("expected an array"))?;
                if items.len() != *len {
                    return Err(mismatch(&format!("expected {len} elements, found {}", items.len())));
                }
                let elems = self.decode_all(elem, items)?;
                Ok(Value::array(self.ty(syntax)?, elems))
            }
            TypeSyntax::Slice(elem) => {
                let ty = self.ty(syntax)?;
                match json {
                    Json::Null => Ok(Value::nil_slice(ty)),
                    Json::Array(items) => Ok(Value::slice(ty, self.decode_all(elem, items)?)),
                    _ => Err(mismatch("expected an array or null")),
                }
            }
            TypeSyntax::Map { key, value } => {
                let ty = self.ty(syntax)?;
                let pairs = match json {
                    Json::Null => return Ok(Value::nil_map(ty)),
                    Json::Array(pairs) => pairs,
                    _ => return Err(mismatch("expected an array of [key, value] pairs or null")),
                };
                let mut entries = Vec::with_capacity(pairs.len());
                for pair in pairs {
                    let Some([k, v]) = pair.as_array().map(Vec::as_slice) else {
                        return Err(mismatch("map entries are [key, value] pairs"));
                    };
                    let decoded = self.decode(key, k)?;
                    if entries.iter().any(|(seen, _)| *seen == decoded) {
                        return Err(mismatch(&format!("duplicate map key {k}")));
                    }
                    entries.push((decoded, self.decode(value, v)?));
                }
                Ok(Value::map(ty, entries))
            }
            TypeSyntax::Pointer(pointee) => {
                let ty = self.ty(syntax)?;
                if json.is_null() {
                    return Ok(Value::nil_pointer(ty));
                }
                let target = self.decode(pointee, json)?;
                Ok(Value::pointer(ty, Ptr::new(target)))
            }
            TypeSyntax::Any => {
                let ty = TypeDesc::any();
                self.decode_interface(ty, json)
            }
            TypeSyntax::Func | TypeSyntax::Chan | TypeSyntax::UnsafePointer => {
                Ok(Value::opaque(self.ty(syntax)?))
            }
            TypeSyntax::Decl(name) => self.decode_decl(name, json),
        }
    }

    fn decode_all(&mut self, elem: &TypeSyntax, items: &[Json]) -> Result<Vec<Value>, SnapshotError> {
        items.iter().map(|item| self.decode(elem, item)).collect()
    }

    /// `null`, or `{"type": ..., "value": ...}` naming the dynamic type.
    fn decode_interface(&mut self, ty: Ty, json: &Json) -> Result<Value, SnapshotError> {
        if json.is_null() {
            return Ok(Value::nil_interface(ty));
        }
        let (Some(dynamic), Some(held)) = (json.get("type").and_then(Json::as_str), json.get("value"))
        else {
            return Err(SnapshotError::Mismatch {
                ty: ty.to_string(),
                reason: "expected null or {\"type\", \"value\"}".to_string(),
            });
        };
        let held = self.decode(&TypeSyntax::parse(dynamic)?, held)?;
        Ok(Value::interface(ty, held))
    }

    fn decode_decl(&mut self, name: &str, json: &Json) -> Result<Value, SnapshotError> {
        let ty = self.decl_ty(name)?;
        match self.decl(name)? {
            TypeDecl::Struct { fields } => {
                let Some(object) = json.as_object() else {
                    return Err(SnapshotError::Mismatch {
                        ty: name.to_string(),
                        reason: "expected an object".to_string(),
                    });
                };
                if let Some(unknown) = object.keys().find(|key| !fields.iter().any(|f| &f.name == *key)) {
                    return Err(SnapshotError::Mismatch {
                        ty: name.to_string(),
                        reason: format!("no field named {unknown:?}"),
                    });
                }
                let mut values = Vec::with_capacity(fields.len());
                for field in fields {
                    let syntax = TypeSyntax::parse(&field.ty)?;
                    values.push(match object.get(&field.name) {
                        Some(json) => self.decode(&syntax, json)?,
                        None => self.zero(&syntax)?,
                    });
                }
                Ok(Value::record(ty, values))
            }
            TypeDecl::Interface => self.decode_interface(ty, json),
            TypeDecl::Named { underlying } => {
                let underlying = TypeSyntax::parse(underlying)?;
                Ok(self.decode(&underlying, json)?.retyped(ty))
            }
        }
    }

    /// The zero value of `syntax`: nil for sequences, maps, pointers and
    /// interfaces, zero scalars, and records of zero fields.
    pub(crate) fn zero(&mut self, syntax: &TypeSyntax) -> Result<Value, SnapshotError> {
        ensure_sufficient_stack(|| self.zero_value(syntax))
    }

    fn zero_value(&mut self, syntax: &TypeSyntax) -> Result<Value, SnapshotError> {
        let ty = self.ty(syntax)?;
        Ok(match syntax {
            TypeSyntax::Scalar(kind) => Value::scalar(Scalar::zero(*kind)),
            TypeSyntax::Array { elem, len } => {
                let elems = (0..*len)
                    .map(|_| self.zero(elem))
                    .collect::<Result<_, _>>()?;
                Value::array(ty, elems)
            }
            TypeSyntax::Slice(_) => Value::nil_slice(ty),
            TypeSyntax::Map { .. } => Value::nil_map(ty),
            TypeSyntax::Pointer(_) => Value::nil_pointer(ty),
            TypeSyntax::Any => Value::nil_interface(ty),
            TypeSyntax::Func | TypeSyntax::Chan | TypeSyntax::UnsafePointer => Value::opaque(ty),
            TypeSyntax::Decl(name) => match self.decl(name)? {
                TypeDecl::Struct { fields } => {
                    if !self.zeroing.insert(name.clone()) {
                        return Err(SnapshotError::RecursiveType(name.clone()));
                    }
                    let values = fields
                        .iter()
                        .map(|field| self.zero(&TypeSyntax::parse(&field.ty)?))
                        .collect::<Result<_, _>>();
                    self.zeroing.remove(name);
                    Value::record(ty, values?)
                }
                TypeDecl::Interface => Value::nil_interface(ty),
                TypeDecl::Named { underlying } => {
                    self.zero(&TypeSyntax::parse(underlying)?)?.retyped(ty)
                }
            },
        })
    }
}

fn schema(fields: &[FieldDecl]) -> RecordSchema {
    RecordSchema::new(
        fields
            .iter()
            .map(|field| match field.exported {
                Some(true) => FieldDesc::with_visibility(&field.name, Visibility::Exported),
                Some(false) => FieldDesc::with_visibility(&field.name, Visibility::Unexported),
                None => FieldDesc::new(&field.name),
            })
            .collect(),
    )
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "float32 values are stored in the snapshot at float32 precision"
)]
fn decode_scalar(kind: ScalarKind, json: &Json) -> Option<Scalar> {
    Some(match kind {
        ScalarKind::Bool => Scalar::Bool(json.as_bool()?),
        ScalarKind::Int => Scalar::Int(json.as_i64()?),
        ScalarKind::Int8 => Scalar::Int8(i8::try_from(json.as_i64()?).ok()?),
        ScalarKind::Int16 => Scalar::Int16(i16::try_from(json.as_i64()?).ok()?),
        ScalarKind::Int32 => Scalar::Int32(i32::try_from(json.as_i64()?).ok()?),
        ScalarKind::Int64 => Scalar::Int64(json.as_i64()?),
        ScalarKind::Uint => Scalar::Uint(json.as_u64()?),
        ScalarKind::Uint8 => Scalar::Uint8(u8::try_from(json.as_u64()?).ok()?),
        ScalarKind::Uint16 => Scalar::Uint16(u16::try_from(json.as_u64()?).ok()?),
        ScalarKind::Uint32 => Scalar::Uint32(u32::try_from(json.as_u64()?).ok()?),
        ScalarKind::Uint64 => Scalar::Uint64(json.as_u64()?),
        ScalarKind::Uintptr => Scalar::Uintptr(json.as_u64()?),
        ScalarKind::Float32 => Scalar::Float32(float(json)? as f32),
        ScalarKind::Float64 => Scalar::Float64(float(json)?),
        ScalarKind::Complex64 => {
            let (re, im) = complex(json)?;
            Scalar::Complex64(re as f32, im as f32)
        }
        ScalarKind::Complex128 => {
            let (re, im) = complex(json)?;
            Scalar::Complex128(re, im)
        }
        ScalarKind::String => Scalar::String(json.as_str()?.to_string()),
    })
}

/// A number, or one of `"+Inf"`, `"-Inf"`, `"NaN"`.
fn float(json: &Json) -> Option<f64> {
    match json {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => match s.as_str() {
            "+Inf" | "Inf" => Some(f64::INFINITY),
            "-Inf" => Some(f64::NEG_INFINITY),
            "NaN" => Some(f64::NAN),
            _ => None,
        },
        _ => None,
    }
}

/// `[re, im]`.
fn complex(json: &Json) -> Option<(f64, f64)> {
    match json.as_array()?.as_slice() {
        [re, im] => Some((float(re)?, float(im)?)),
        _ => None,
    }
}
