//! Value encoding.
//!
//! [`Encoder::encode`] walks a value tree and builds the Go expression that
//! re-creates it. Dispatch is an exhaustive match over [`Value`]:
//!
//! | Value | Expression |
//! |-------|------------|
//! | scalar | literal at the scalar's own width; `T(x)` for a named type `T` |
//! | array, slice | `[]T{e0, e1, ...}`; a nil slice is `nil` |
//! | map | `map[K]V{k: v, ...}`; a nil map is `nil` |
//! | pointer | `&T{...}` (or a closure for non-composites); nil is `nil` |
//! | interface | the held value's expression; nil is `nil` |
//! | record | `T{Field: v, ...}` over exported fields only |
//! | opaque | [`EncodeError::UnsupportedKind`] |
//!
//! Errors propagate unchanged from any depth and abort the whole encode.

use rustc_hash::FxHashSet;

use frost_ir::{Ptr, Ty, TypeKind, Value};
use frost_stack::ensure_sufficient_stack;

use crate::literal::{format_named_scalar, format_scalar};
use crate::resolve::resolve;
use crate::{Code, Elements, EncodeError};

/// Order of entries in an encoded map literal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MapOrder {
    /// Sort entries by the canonical text of their encoded key, so output is
    /// reproducible regardless of how the producer enumerated the map.
    #[default]
    SortedByKey,
    /// Keep the order in which the producer enumerated the entries.
    Encounter,
}

/// Encoder configuration.
#[derive(Clone, Debug, Default)]
pub struct EncodeOptions {
    pub map_order: MapOrder,
}

/// Recursive value-to-expression encoder.
///
/// Holds no state between top-level calls; the pointer set only tracks the
/// current path from the root while a call is in progress.
#[derive(Debug, Default)]
pub struct Encoder {
    options: EncodeOptions,
    /// Pointer targets on the path from the root to the current value.
    active: FxHashSet<usize>,
}

impl Encoder {
    pub fn new(options: EncodeOptions) -> Self {
        Encoder {
            options,
            active: FxHashSet::default(),
        }
    }

    /// Encode `value` into an expression that re-creates it.
    pub fn encode(&mut self, value: &Value) -> Result<Code, EncodeError> {
        ensure_sufficient_stack(|| self.encode_value(value))
    }

    fn encode_value(&mut self, value: &Value) -> Result<Code, EncodeError> {
        tracing::trace!(kind = %value.kind(), "encode");
        match value {
            Value::Scalar { ty, scalar } => Ok(match ty.name() {
                Some(_) => format_named_scalar(scalar, resolve(ty)),
                None => format_scalar(scalar),
            }),
            Value::Array { ty, elems }
            | Value::Slice {
                ty,
                elems: Some(elems),
            } => {
                let items = self.encode_all(elems)?;
                Ok(Code::composite(resolve(ty), Elements::Positional(items)))
            }
            Value::Map {
                ty,
                entries: Some(entries),
            } => self.encode_map(ty, entries),
            Value::Pointer {
                ty,
                target: Some(target),
            } => self.encode_pointer(ty, target),
            Value::Interface {
                held: Some(held), ..
            } => self.encode(held),
            Value::Struct { ty, fields } => self.encode_record(ty, fields),
            Value::Slice { elems: None, .. }
            | Value::Map { entries: None, .. }
            | Value::Pointer { target: None, .. }
            | Value::Interface { held: None, .. } => Ok(Code::Nil),
            Value::Opaque { ty } => Err(EncodeError::UnsupportedKind {
                kind: ty.kind_tag(),
                ty: ty.to_string(),
            }),
        }
    }

    fn encode_all(&mut self, values: &[Value]) -> Result<Vec<Code>, EncodeError> {
        let mut codes = Vec::with_capacity(values.len());
        for value in values {
            codes.push(self.encode(value)?);
        }
        Ok(codes)
    }

    fn encode_map(&mut self, ty: &Ty, entries: &[(Value, Value)]) -> Result<Code, EncodeError> {
        let mut pairs = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let key = self.encode(key)?;
            let value = self.encode(value)?;
            pairs.push((key, value));
        }
        if self.options.map_order == MapOrder::SortedByKey {
            pairs.sort_by_cached_key(|(key, _)| key.to_string());
        }
        Ok(Code::composite(resolve(ty), Elements::Keyed(pairs)))
    }

    fn encode_pointer(&mut self, ty: &Ty, target: &Ptr) -> Result<Code, EncodeError> {
        let id = target.id();
        if !self.active.insert(id) {
            return Err(EncodeError::CyclicValue { ty: ty.to_string() });
        }
        let pointee = target.read();
        let result = self.encode(&pointee);
        self.active.remove(&id);

        let pointee_ty = match ty.kind() {
            TypeKind::Pointer { pointee } => resolve(pointee),
            _ => resolve(pointee.ty()),
        };
        Ok(Code::address_of(pointee_ty, result?))
    }

    fn encode_record(&mut self, ty: &Ty, fields: &[Value]) -> Result<Code, EncodeError> {
        let schema = ty.schema().map(|schema| schema.fields()).unwrap_or_default();
        let mut entries = Vec::with_capacity(schema.len());
        for (index, field) in schema.iter().enumerate() {
            if !field.visibility.is_exported() {
                continue;
            }
            let Some(value) = fields.get(index) else {
                tracing::debug!(record = %ty, field = %field.name, "field not readable, skipping");
                continue;
            };
            entries.push((Code::ident(field.name.clone()), self.encode(value)?));
        }
        Ok(Code::composite(resolve(ty), Elements::Keyed(entries)))
    }
}

/// Encode `value` with default options.
#[tracing::instrument(level = "debug", skip_all, fields(ty = %value.ty()))]
pub fn encode_value(value: &Value) -> Result<Code, EncodeError> {
    Encoder::default().encode(value)
}

/// Encode `value` with the given options.
#[tracing::instrument(level = "debug", skip_all, fields(ty = %value.ty()))]
pub fn encode_value_with(value: &Value, options: EncodeOptions) -> Result<Code, EncodeError> {
    Encoder::new(options).encode(value)
}
