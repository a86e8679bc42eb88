//! Frost IR - typed value trees
//!
//! This crate contains the data model consumed by the frost encoder:
//! - Type descriptors ([`TypeDesc`], shared as [`Ty`]) with qualified names
//! - Record schemas listing field names and visibility
//! - Runtime values ([`Value`]) carrying their type and payload
//!
//! # Design
//!
//! - **Closed kinds**: `Value` has one case per type kind, so consumers match
//!   exhaustively instead of inspecting types at run time.
//! - **Explicit schemas**: which record fields exist and which are exported is
//!   data, built once per record type.
//! - **Read-only**: the encoder only reads values. The one mutation point is
//!   [`Ptr::set`], used by producers to tie pointer targets together.

mod ty;
mod value;

pub use ty::{
    FieldDesc, Kind, QualName, RecordSchema, ScalarKind, Ty, TypeDesc, TypeKind, Visibility,
};
pub use value::{Ptr, Scalar, Value};
