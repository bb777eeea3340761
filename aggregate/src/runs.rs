//! Run-directory discovery and ordering.

use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::Error;

/// Name prefix identifying a run directory.
const RUN_PREFIX: &str = "run-";

/// Pattern extracting the run's numeric sort key from its base name.
const RUN_NUMBER: &str = r"run-(\d+)";

/// Finds the run directories directly under `root`, ordered for output.
///
/// A run directory is any direct child whose base name starts with `run-`.
/// Ordering is ascending by the integer in the first `run-<digits>`
/// occurrence of the base name; directories without such digits sort after
/// all numbered ones, by name among themselves so reruns stay deterministic.
///
/// # Errors
///
/// Returns [`Error::Pattern`] if the built-in sort-key pattern fails to
/// compile (unreachable for the shipped pattern).
pub fn discover(root: &Path) -> Result<Vec<PathBuf>, Error> {
    let number = Regex::new(RUN_NUMBER)?;

    let mut run_dirs: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| base_name(path).starts_with(RUN_PREFIX))
        .collect();

    run_dirs.sort_by(|a, b| {
        sort_key(&number, a)
            .cmp(&sort_key(&number, b))
            .then_with(|| base_name(a).cmp(&base_name(b)))
    });

    Ok(run_dirs)
}

/// Numeric sort key of a run directory; effectively infinite when the base
/// name carries no `run-<digits>` occurrence.
fn sort_key(number: &Regex, path: &Path) -> u64 {
    let name = base_name(path);
    number
        .captures(&name)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
        .unwrap_or(u64::MAX)
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
