//! Frost driver - snapshots in, Go files out
//!
//! Walks a directory tree, loads each directory's package snapshot, encodes
//! its value with `frost_codegen` and writes one Go file per package plus an
//! aggregate file importing every generated package.
//!
//! # Pipeline
//!
//! ```text
//! root dir ──► walk_dirs ──► UnitParser::parse_dir (per dir, in parallel)
//!                                   │
//!                                   ▼
//!                          encode_value_with ──► UnitFile::render
//!                                   │
//!                                   ▼
//!                      write (or compare, with --check)
//! ```

use std::sync::Once;

pub mod generate;
pub mod snapshot;

pub use generate::{
    generate, parse_generate_options, render_unit, GenerateConfig, GenerateError, GenerateReport,
    ParsedUnit, UnitParser,
};
pub use snapshot::{load_snapshot, parse_snapshot, SnapshotError, SnapshotParser};

static TRACING_INIT: Once = Once::new();

/// Install the `tracing` subscriber once, and only when `RUST_LOG` is set.
///
/// ```text
/// RUST_LOG=frostc=debug frostc generate --pkg=example.com/lib
/// RUST_LOG=frost_codegen=trace frostc encode lib.frozen.json
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
