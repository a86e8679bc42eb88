//! Frost Render - Go source from code expressions
//!
//! Takes the [`Code`](frost_codegen::Code) trees produced by the encoder and
//! writes Go files:
//!
//! - [`Emitter`] / [`StringEmitter`]: text sink with tab indentation
//! - [`ImportTable`]: package aliases for qualified names
//! - [`ExprWriter`]: multi-line layout of expressions
//! - [`UnitFile`] and [`render_import_file`]: whole generated files
//!
//! Rendering is infallible: every `Code` is already a complete expression.

mod emitter;
mod expr;
mod file;
mod imports;

pub use emitter::{Emitter, StringEmitter};
pub use expr::ExprWriter;
pub use file::{render_import_file, UnitFile};
pub use imports::{guess_alias, Import, ImportTable};
