//! Violation-report aggregation library.
//!
//! External violation checkers (JavaMOP-style runtime monitors) leave one
//! plain-text report per test run, in directories named `run-<n>`. Each report
//! line describes a violated specification together with a repeat count and a
//! free-form location sentence. This crate collects those scattered reports
//! into a single normalized CSV table, one row per violation.
//!
//! # Pipeline
//!
//! 1. [`runs::discover`] — find `run-*` directories under a root, ordered by
//!    their numeric suffix.
//! 2. [`parse::LineParser`] — turn one raw report line into a structured
//!    record, or signal non-match.
//! 3. [`writer::write_table`] — stream accepted records into
//!    `violations_long.csv` with a fixed column header.
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::Path;
//! use violations_aggregate::aggregate;
//!
//! let out = aggregate(Path::new("results")).expect("aggregation failed");
//! println!("Wrote {}", out.display());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod parse;
pub mod record;
pub mod runs;
pub mod writer;

pub use record::Violation;

/// Base name of the consolidated output file, created directly under the root.
pub const OUTPUT_FILE: &str = "violations_long.csv";

/// Errors surfaced by the aggregation pipeline.
///
/// Per-line anomalies (unparseable lines, unlocatable files, invalid byte
/// sequences) are not errors; they are absorbed by the parser and the writer.
/// Everything that does reach this enum is fatal for the whole run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The root argument does not name a directory. Maps to a usage error
    /// (exit status 2) in the client binary.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A built-in pattern failed to compile. Unreachable for the shipped
    /// patterns; propagated rather than panicking.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A report file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the file that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },

    /// The output file could not be created or written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Path of the file that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

/// Aggregates every run's violation report under `root` into
/// `<root>/violations_long.csv`, overwriting any previous output.
///
/// Runs are processed in ascending numeric order (see [`runs::discover`]);
/// within a run, rows follow the report file top to bottom. Runs without a
/// report file are skipped. Returns the path of the written output file.
///
/// # Errors
///
/// Returns [`Error::NotADirectory`] when `root` is not a directory, and
/// [`Error::Read`] / [`Error::Write`] on filesystem failures.
pub fn aggregate(root: &Path) -> Result<PathBuf, Error> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let run_dirs = runs::discover(root)?;
    let parser = parse::LineParser::new()?;

    let out_path = root.join(OUTPUT_FILE);
    let file = File::create(&out_path).map_err(|source| Error::Write {
        path: out_path.clone(),
        source,
    })?;
    let mut out = BufWriter::new(file);

    writer::write_table(&run_dirs, &parser, &mut out, &out_path)?;

    out.flush().map_err(|source| Error::Write {
        path: out_path.clone(),
        source,
    })?;

    Ok(out_path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use std::fs;

    use super::*;

    #[test]
    fn rejects_non_directory_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();

        match aggregate(&file) {
            Err(Error::NotADirectory(path)) => assert_eq!(path, file),
            other => panic!("expected NotADirectory, got {other:?}"),
        }
    }

    #[test]
    fn end_to_end_single_violation() {
        let dir = tempfile::tempdir().unwrap();
        let run = dir.path().join("run-1");
        fs::create_dir(&run).unwrap();
        fs::write(
            run.join("violation-counts"),
            "3 Specification Closeable_MultipleClose has been violated on line \
             foo.bar(Baz.java:164). Documentation see spec X\n",
        )
        .unwrap();

        let out = aggregate(dir.path()).unwrap();
        assert_eq!(out, dir.path().join("violations_long.csv"));

        let table = fs::read_to_string(&out).unwrap();
        assert_eq!(
            table,
            "run,spec,file,line,count\r\nrun-1,Closeable_MultipleClose,Baz.java,164,3\r\n"
        );
    }

    #[test]
    fn rows_follow_run_order_then_line_order() {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in [
            ("run-2", "1 Specification B has been violated on line x\n"),
            ("run-10", "1 Specification C has been violated on line x\n"),
            ("run-abc", "1 Specification D has been violated on line x\n"),
            (
                "run-1",
                "1 Specification A1 has been violated on line x\n\
                 2 Specification A2 has been violated on line y\n",
            ),
        ] {
            let run = dir.path().join(name);
            fs::create_dir(&run).unwrap();
            fs::write(run.join("violation-counts"), body).unwrap();
        }

        let out = aggregate(dir.path()).unwrap();
        let table = fs::read_to_string(out).unwrap();
        let specs: Vec<&str> = table
            .lines()
            .skip(1)
            .map(|row| row.split(',').nth(1).unwrap())
            .collect();
        assert_eq!(specs, ["A1", "A2", "B", "C", "D"]);
    }

    #[test]
    fn missing_report_contributes_zero_rows() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("run-1")).unwrap();
        let run2 = dir.path().join("run-2");
        fs::create_dir(&run2).unwrap();
        fs::write(
            run2.join("violation-counts"),
            "5 Specification Only has been violated on line q\n",
        )
        .unwrap();

        let out = aggregate(dir.path()).unwrap();
        let table = fs::read_to_string(out).unwrap();
        assert_eq!(table.lines().count(), 2);
        assert!(table.contains("run-2,Only"));
    }

    #[test]
    fn reruns_are_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let run = dir.path().join("run-7");
        fs::create_dir(&run).unwrap();
        fs::write(
            run.join("violation-counts"),
            "4 Specification Idem has been violated on line a.b(C.java:9)\n",
        )
        .unwrap();

        let first = fs::read(aggregate(dir.path()).unwrap()).unwrap();
        let second = fs::read(aggregate(dir.path()).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn output_is_overwritten_not_appended() {
        let dir = tempfile::tempdir().unwrap();
        let run = dir.path().join("run-1");
        fs::create_dir(&run).unwrap();
        fs::write(
            run.join("violation-counts"),
            "1 Specification S has been violated on line x\n",
        )
        .unwrap();

        aggregate(dir.path()).unwrap();
        let out = aggregate(dir.path()).unwrap();
        let table = fs::read_to_string(out).unwrap();
        assert_eq!(table.lines().count(), 2);
    }
}
