//! Frost CLI
//!
//! Freezes package snapshots into Go source files.

use std::path::Path;

use frostc::{generate, load_snapshot, parse_generate_options, render_unit, SnapshotParser};

fn main() {
    frostc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "generate" => run_generate(&args[2..]),
        "encode" => {
            if args.len() < 3 {
                eprintln!("Usage: frostc encode <file.frozen.json> [options]");
                eprintln!();
                eprintln!("Prints the Go file generated for one snapshot. Takes the");
                eprintln!("generate options; --pkg sets the file's own import path.");
                std::process::exit(1);
            }
            run_encode(&args[2], &args[3..]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("frostc {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn run_generate(args: &[String]) {
    let config = parse_generate_options(args).unwrap_or_else(|e| fail(&e));
    let report = generate(&config, &SnapshotParser).unwrap_or_else(|e| fail(&e));

    if config.check {
        if report.stale.is_empty() {
            println!("{} packages up to date", report.units);
            return;
        }
        for path in &report.stale {
            eprintln!("stale: {}", path.display());
        }
        eprintln!();
        eprintln!("{} of the generated files are out of date", report.stale.len());
        eprintln!("Run `frostc generate` without --check to update them.");
        std::process::exit(1);
    }

    println!(
        "generated {} packages ({} files)",
        report.units,
        report.written.len()
    );
}

fn run_encode(file: &str, args: &[String]) {
    let config = parse_generate_options(args).unwrap_or_else(|e| fail(&e));
    let unit = load_snapshot(Path::new(file)).unwrap_or_else(|e| fail(&e));
    let text = render_unit(&config, &unit.package, &config.pkg, &unit.value)
        .unwrap_or_else(|e| fail(&e));
    print!("{text}");
}

fn fail(err: &dyn std::error::Error) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}

fn print_usage() {
    println!("Frost - freeze typed value snapshots into Go source");
    println!();
    println!("Usage: frostc <command> [options]");
    println!();
    println!("Commands:");
    println!("  generate [options]          Generate a Go file for every package under --root-dir");
    println!("  encode <file> [options]     Print the Go file for one snapshot");
    println!("  help                        Show this help message");
    println!("  version                     Show version information");
    println!();
    println!("Generate options:");
    println!("  --pkg=<import path>         Import path of the root directory (required)");
    println!("  --root-dir=<dir>            Directory to walk (default: .)");
    println!("  --import-file=<file>        Aggregate import file (default: builtin_gen.go)");
    println!("  --out-file=<name>           File written per package (default: flux_gen.go)");
    println!("  --var=<ident>               Variable holding the value (default: pkgAST)");
    println!("  --register=<path.Func>      Called from init with the variable;");
    println!("                              empty for no init (default: github.com/influxdata/flux.RegisterPackage)");
    println!("  --path-field=<field>        Root record field set to the package directory;");
    println!("                              empty to disable (default: Path)");
    println!("  --map-order=<order>         sorted (default) or encounter");
    println!("  --check                     Compare with the files on disk (exit 1 if stale)");
    println!();
    println!("Each package directory holds one <name>.frozen.json snapshot.");
    println!("Set RUST_LOG (e.g. RUST_LOG=frostc=debug) for diagnostics on stderr.");
    println!();
    println!("Examples:");
    println!("  frostc generate --pkg=github.com/influxdata/flux/stdlib --root-dir=stdlib");
    println!("  frostc generate --pkg=github.com/influxdata/flux/stdlib --root-dir=stdlib --check");
    println!("  frostc encode stdlib/csv/csv.frozen.json --pkg=github.com/influxdata/flux/stdlib/csv");
}
