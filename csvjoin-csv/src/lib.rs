//! Line-oriented CSV access for the join engine.
//!
//! Rows are produced by stripping trailing whitespace from a line and splitting
//! on the configured delimiter. Quoting and escaping are not modelled: a
//! delimiter inside a quoted field splits the field. This is a known
//! restriction of the input format, not something callers should work around.
//!
//! [`CsvSource`] wraps a seekable reader so the join can rewind to the first
//! data row as many times as it needs. Output goes through the [`RowWriter`]
//! implementations in [`writer`].

use csvjoin_result::{Error, Result as CsvJoinResult};

pub mod reader;
pub mod writer;

pub use reader::{CsvSource, Rows};
pub use writer::{
    AlignedWriter, DEFAULT_MIN_WIDTH, DelimitedWriter, OutputFormat, RowWriter, WriteOptions,
    row_writer,
};

/// Options controlling how input lines are split into fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReadOptions {
    pub delimiter: char,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl CsvReadOptions {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn validate(&self) -> CsvJoinResult<()> {
        validate_delimiter(self.delimiter)
    }
}

pub(crate) fn validate_delimiter(delimiter: char) -> CsvJoinResult<()> {
    if matches!(delimiter, '\n' | '\r') {
        return Err(Error::InvalidArgumentError(
            "delimiter cannot be a line terminator".to_string(),
        ));
    }
    Ok(())
}

/// An ordered sequence of text fields.
///
/// Values are compared as text only; `"08"` and `"8"` are different keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Row {
    fields: Vec<String>,
}

impl Row {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Split one input line into fields.
    ///
    /// Trailing whitespace (including `\r\n`) is removed first, except for
    /// the delimiter itself, so empty trailing fields survive a tab or space
    /// delimiter. A blank line yields a single empty field.
    pub fn parse(line: &str, delimiter: char) -> Self {
        line.trim_end_matches(|c: char| c.is_whitespace() && c != delimiter)
            .split(delimiter)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Vec<String>> for Row {
    fn from(fields: Vec<String>) -> Self {
        Self::new(fields)
    }
}
