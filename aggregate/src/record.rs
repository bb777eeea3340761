//! Violation record type and its CSV serialization.

use std::borrow::Cow;

/// Column header of the consolidated table.
pub const CSV_HEADER: &str = "run,spec,file,line,count";

/// One accepted specification violation, ready to serialize.
///
/// Records are transient: constructed per report line and written out
/// immediately, never retained across lines or runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Base name of the owning run directory. Never empty.
    pub run: String,
    /// Name of the violated specification. Never empty.
    pub spec: String,
    /// Base name of the offending source file; empty when location
    /// extraction failed.
    pub file: String,
    /// 1-based line number in `file`; `None` when unknown.
    pub line: Option<u64>,
    /// How many times the violation occurred.
    pub count: u64,
}

impl Violation {
    /// Serializes this record as one CSV data row (no line terminator).
    ///
    /// Unknown `file`/`line` become empty fields; numeric fields are plain
    /// integers and never need quoting.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{}",
            csv_field(&self.run),
            csv_field(&self.spec),
            csv_field(&self.file),
            self.line.map(|n| n.to_string()).unwrap_or_default(),
            self.count
        )
    }
}

/// Applies minimal CSV quoting: a field containing a comma, double quote,
/// CR, or LF is wrapped in double quotes with embedded quotes doubled.
pub(crate) fn csv_field(value: &str) -> Cow<'_, str> {
    if !value.contains([',', '"', '\r', '\n']) {
        return Cow::Borrowed(value);
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if ch == '"' {
            quoted.push('"');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn plain_fields_pass_through_unquoted() {
        assert_eq!(csv_field("Closeable_MultipleClose"), "Closeable_MultipleClose");
        assert_eq!(csv_field(""), "");
    }

    #[test]
    fn commas_quotes_and_newlines_trigger_quoting() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn row_with_known_location() {
        let record = Violation {
            run: "run-1".into(),
            spec: "Closeable_MultipleClose".into(),
            file: "Baz.java".into(),
            line: Some(164),
            count: 3,
        };
        assert_eq!(
            record.to_csv_row(),
            "run-1,Closeable_MultipleClose,Baz.java,164,3"
        );
    }

    #[test]
    fn row_with_unknown_location_has_empty_fields() {
        let record = Violation {
            run: "run-2".into(),
            spec: "Iterator_HasNext".into(),
            file: String::new(),
            line: None,
            count: 7,
        };
        assert_eq!(record.to_csv_row(), "run-2,Iterator_HasNext,,,7");
    }

    #[test]
    fn spec_names_with_commas_are_quoted() {
        let record = Violation {
            run: "run-1".into(),
            spec: "Map_Unsync,Collection".into(),
            file: String::new(),
            line: None,
            count: 1,
        };
        assert_eq!(record.to_csv_row(), "run-1,\"Map_Unsync,Collection\",,,1");
    }
}
