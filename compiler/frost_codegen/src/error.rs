//! Encoding errors.
//!
//! Every error aborts the whole top-level encode: there is no partial
//! expression.

use frost_ir::Kind;

/// Error from encoding a value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The value's kind has no encoding rule (functions, channels, unsafe
    /// pointers).
    #[error("unsupported value kind {kind} (type {ty})")]
    UnsupportedKind { kind: Kind, ty: String },

    /// A pointer leads back to a target that is still being encoded.
    #[error("cyclic value: pointer of type {ty} leads back to itself")]
    CyclicValue { ty: String },
}
