//! Report-line parser: primary grammar plus the location-extraction
//! fallback chain.
//!
//! A report line looks like
//!
//! ```text
//! 3 Specification Closeable_MultipleClose has been violated on line \
//! org.apache...ThresholdingOutputStream.close(ThresholdingOutputStream.java:164). Documentation ...
//! ```
//!
//! The spec-name capture is non-greedy and the location capture greedy, so
//! ambiguity is resolved toward the end of the line; the same rule drives the
//! last-occurrence-wins fallback when the location sentence names several
//! `Foo.java:N` frames.

use std::path::Path;

use regex::Regex;

use crate::Error;

/// Primary grammar: `<count> Specification <spec> has been violated on line <location>`.
const GRAMMAR: &str = r"^(\d+)\s+Specification\s+(.*?)\s+has been violated on line\s+(.*)$";

/// Exact-tail location: the sentence ends with `(<file>.java:<line>)`.
const LOCATION_TAIL: &str = r"\(([^()]+\.java):(\d+)\)\s*$";

/// Fallback location: any `<path>.java:<line>` token anywhere in the sentence.
const LOCATION_ANYWHERE: &str = r"([^()\s]+\.java):(\d+)";

/// Everything after this marker is prose and is discarded before location
/// extraction.
const DOC_MARKER: &str = ". Documentation";

/// Fields extracted from one report line, before the owning run is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Name of the violated specification.
    pub spec: String,
    /// Base name of the offending source file; empty when unknown.
    pub file: String,
    /// 1-based line number; `None` when unknown.
    pub line: Option<u64>,
    /// How many times the violation occurred.
    pub count: u64,
}

/// Compiled line parser. Construct once, apply to every line.
pub struct LineParser {
    grammar: Regex,
    tail: Regex,
    anywhere: Regex,
}

impl LineParser {
    /// Compiles the grammar and location patterns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if a built-in pattern fails to compile
    /// (unreachable for the shipped patterns).
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            grammar: Regex::new(GRAMMAR)?,
            tail: Regex::new(LOCATION_TAIL)?,
            anywhere: Regex::new(LOCATION_ANYWHERE)?,
        })
    }

    /// Parses one raw report line.
    ///
    /// Returns `None` for empty lines, lines that do not match the primary
    /// grammar, and counts too large to represent; none of these are errors.
    /// A line whose location cannot be pinned down still yields a record,
    /// with empty `file` and unknown `line`.
    pub fn parse(&self, raw: &str) -> Option<ParsedLine> {
        let line = raw.trim();
        if line.is_empty() {
            return None;
        }

        let caps = self.grammar.captures(line)?;
        let count: u64 = caps.get(1)?.as_str().parse().ok()?;
        let spec = caps.get(2)?.as_str().trim().to_string();

        let location = caps.get(3)?.as_str();
        let location = match location.split_once(DOC_MARKER) {
            Some((before, _)) => before,
            None => location,
        }
        .trim();

        let (file, line_no) = self.extract_location(location);
        Some(ParsedLine {
            spec,
            file,
            line: line_no,
            count,
        })
    }

    /// Pins the violation down to a source file and line, best effort.
    ///
    /// Tried in order, first success wins: the exact parenthesized tail,
    /// then the last `Foo.java:N` occurrence anywhere in the sentence, then
    /// unknown.
    fn extract_location(&self, location: &str) -> (String, Option<u64>) {
        if let Some(caps) = self.tail.captures(location) {
            if let Some(hit) = capture_location(&caps) {
                return hit;
            }
        }

        if let Some(hit) = self
            .anywhere
            .captures_iter(location)
            .filter_map(|caps| capture_location(&caps))
            .last()
        {
            return hit;
        }

        (String::new(), None)
    }
}

/// Pulls `(base name, line)` out of a two-group location capture.
fn capture_location(caps: &regex::Captures<'_>) -> Option<(String, Option<u64>)> {
    let file = caps.get(1)?.as_str();
    let line: u64 = caps.get(2)?.as_str().parse().ok()?;
    Some((base_name(file), Some(line)))
}

/// Strips any directory components, keeping the file's base name.
fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
