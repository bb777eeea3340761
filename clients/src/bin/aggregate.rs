//! `violations-long` — Aggregates per-run specification-violation reports
//! into one normalized CSV table.
//!
//! Scans the given root for `run-*` directories, parses each run's
//! `violation-counts` report, and writes `<root>/violations_long.csv` with
//! the columns `run,spec,file,line,count`.
//!
//! **Usage:**
//! ```
//! violations-long <root>
//! ```
//!
//! Exits with status 2 on a usage error (wrong argument count, or a root
//! that is not a directory); unparseable report lines and runs without a
//! report file are skipped silently.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use violations_aggregate::{aggregate, Error};

/// Aggregate per-run violation reports into violations_long.csv.
#[derive(Parser)]
#[command(
    name = "violations-long",
    about = "Aggregate per-run specification-violation reports into one CSV table"
)]
struct Args {
    /// Directory containing the run-* directories to aggregate.
    root: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if !args.root.is_dir() {
        eprintln!("Not a directory: {}", args.root.display());
        process::exit(2);
    }
    let root = args
        .root
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", args.root.display()))?;

    match aggregate(&root) {
        Ok(out_path) => {
            println!("Wrote {}", out_path.display());
            Ok(())
        }
        // Unreachable after the is_dir check above unless the directory
        // vanished meanwhile; still a usage error to the operator.
        Err(Error::NotADirectory(path)) => {
            eprintln!("Not a directory: {}", path.display());
            process::exit(2);
        }
        Err(err) => Err(err.into()),
    }
}
