//! Aggregation writer: reads each run's report and streams accepted records
//! into the consolidated CSV table.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::parse::LineParser;
use crate::record::{Violation, CSV_HEADER};
use crate::Error;

/// Exact name of the per-run report file.
pub const REPORT_FILE: &str = "violation-counts";

/// CSV row terminator.
const ROW_TERMINATOR: &str = "\r\n";

/// Writes the header and one row per accepted violation to `out`.
///
/// Runs without a [`REPORT_FILE`] are skipped silently. Report bytes are
/// decoded permissively: invalid UTF-8 sequences become U+FFFD rather than
/// failing the run. Row order is the given run order, then report line order.
///
/// `out_path` is only used to label write failures.
///
/// # Errors
///
/// Returns [`Error::Read`] when a present report file cannot be read and
/// [`Error::Write`] when `out` rejects a row.
pub fn write_table<W: Write>(
    run_dirs: &[PathBuf],
    parser: &LineParser,
    out: &mut W,
    out_path: &Path,
) -> Result<(), Error> {
    write_row(out, CSV_HEADER, out_path)?;

    for run_dir in run_dirs {
        let report = run_dir.join(REPORT_FILE);
        if !report.is_file() {
            continue;
        }
        let run = run_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let bytes = fs::read(&report).map_err(|source| Error::Read {
            path: report.clone(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);

        for raw in text.lines() {
            let Some(parsed) = parser.parse(raw) else {
                continue;
            };
            let record = Violation {
                run: run.clone(),
                spec: parsed.spec,
                file: parsed.file,
                line: parsed.line,
                count: parsed.count,
            };
            write_row(out, &record.to_csv_row(), out_path)?;
        }
    }

    Ok(())
}

fn write_row<W: Write>(out: &mut W, row: &str, out_path: &Path) -> Result<(), Error> {
    out.write_all(row.as_bytes())
        .and_then(|()| out.write_all(ROW_TERMINATOR.as_bytes()))
        .map_err(|source| Error::Write {
            path: out_path.to_path_buf(),
            source,
        })
}
