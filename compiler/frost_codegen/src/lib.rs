//! Frost Codegen - value trees to Go expressions
//!
//! Turns a typed [`Value`](frost_ir::Value) into a [`Code`] expression that,
//! compiled as Go, re-creates an equal value at package init time.
//!
//! # Architecture
//!
//! ```text
//! Value (frost_ir)
//!        ↓
//!    Encoder          (exhaustive dispatch over value kinds)
//!      ↙    ↘
//! resolve    format_scalar   (type expressions, width-exact literals)
//!        ↓
//!      Code           (rendered by frost_render)
//! ```
//!
//! Map entries are sorted by their encoded key unless
//! [`MapOrder::Encounter`] is requested, so the same value always encodes to
//! the same expression.

mod code;
mod encoder;
mod error;
mod literal;
mod resolve;

pub use code::{Code, Elements, TypeExpr};
pub use encoder::{encode_value, encode_value_with, EncodeOptions, Encoder, MapOrder};
pub use error::EncodeError;
pub use literal::{format_named_scalar, format_scalar, quote};
pub use resolve::resolve;
