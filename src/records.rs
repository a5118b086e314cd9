//! Line-delimited JSON record parsing.
//!
//! Select output is newline-delimited JSON. Each line is parsed on its own:
//! a malformed line is reported and skipped, it never affects its neighbours.

use thiserror::Error;

use crate::model::Record;

/// A line of select output that is not valid JSON.
#[derive(Error, Debug)]
#[error("Invalid JSON input: {line}")]
pub struct InvalidRecord {
    /// The raw offending line
    pub line: String,

    #[source]
    pub source: serde_json::Error,
}

/// Parse a single output line.
///
/// # Example
/// ```
/// use s3query::records::parse_line;
///
/// let record = parse_line("{\"a\":1}").unwrap();
/// assert_eq!(record["a"], 1);
///
/// let err = parse_line("{bad}").unwrap_err();
/// assert_eq!(err.to_string(), "Invalid JSON input: {bad}");
/// ```
pub fn parse_line(line: &str) -> Result<Record, InvalidRecord> {
    serde_json::from_str(line).map_err(|source| InvalidRecord {
        line: line.to_string(),
        source,
    })
}

/// Parse every non-empty line of `text`, in order.
///
/// Lines may end in `\n` or `\r\n`.
pub fn parse_records(text: &str) -> impl Iterator<Item = Result<Record, InvalidRecord>> + '_ {
    parse_records_with_delimiter(text, "\n")
}

/// Parse every non-empty record of `text`, split on `delimiter`.
///
/// A trailing `\r` is stripped from each record. An empty delimiter falls
/// back to `\n`. Only empty records are skipped; whitespace-only records are
/// reported as invalid.
///
/// # Example
/// ```
/// use s3query::records::parse_records_with_delimiter;
///
/// let records: Vec<_> = parse_records_with_delimiter("{\"a\":1};{\"a\":2};", ";").collect();
/// assert_eq!(records.len(), 2);
/// ```
pub fn parse_records_with_delimiter<'a>(
    text: &'a str,
    delimiter: &'a str,
) -> impl Iterator<Item = Result<Record, InvalidRecord>> + 'a {
    let delimiter = if delimiter.is_empty() { "\n" } else { delimiter };
    text.split(delimiter)
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(parse_line)
}
