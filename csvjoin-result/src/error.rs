use std::path::PathBuf;
use std::{fmt, io};
use thiserror::Error;

/// Unified error type for all csvjoin operations.
///
/// Every variant is fatal to a join run; there is no partial-result mode.
/// The binary prints usage instructions for the variants where
/// [`Error::is_usage_error`] returns true and only the message otherwise.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while opening, reading or writing.
    ///
    /// Surfaced as-is to the caller; reads are never retried.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid user input or API parameter.
    ///
    /// Raised for unrecognised join types or algorithms and for option values
    /// that cannot be honoured (e.g. a line terminator used as a delimiter).
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// An input path does not resolve to an existing regular file.
    ///
    /// Checked before any data is read.
    #[error("{} is not a file path or file does not exist!", .0.display())]
    FileNotFound(PathBuf),

    /// The join column is absent from one of the headers.
    ///
    /// Column names match exactly and case-sensitively. This is a
    /// configuration error for the whole join, never a per-row condition.
    #[error("The name {column} does not exist in {source_name}!")]
    ColumnNotFound { column: String, source_name: String },
}

impl Error {
    /// Create an invalid-argument error from any displayable value.
    ///
    /// # Examples
    ///
    /// ```
    /// use csvjoin_result::Error;
    ///
    /// fn parse_width(input: &str) -> Result<usize, Error> {
    ///     input.parse::<usize>().map_err(Error::invalid_argument)
    /// }
    ///
    /// assert_eq!(parse_width("13").unwrap(), 13);
    /// assert!(matches!(parse_width("wide"), Err(Error::InvalidArgumentError(_))));
    /// ```
    #[inline]
    pub fn invalid_argument<E: fmt::Display>(err: E) -> Self {
        Error::InvalidArgumentError(err.to_string())
    }

    /// Create a column-not-found error for `column` in the named source.
    #[inline]
    pub fn column_not_found(column: impl Into<String>, source_name: impl Into<String>) -> Self {
        Error::ColumnNotFound {
            column: column.into(),
            source_name: source_name.into(),
        }
    }

    /// True for errors caused by how the tool was invoked.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgumentError(_) | Error::FileNotFound(_)
        )
    }
}
