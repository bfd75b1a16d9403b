//! Output writers for joined rows.
//!
//! [`AlignedWriter`] renders the fixed-width, right-aligned layout the CLI
//! prints by default. [`DelimitedWriter`] emits plain delimited lines for
//! piping into other tools. Both stream one line per row to any `Write` sink.

use std::io::Write;

use csvjoin_result::{Error, Result as CsvJoinResult};

use crate::{Row, validate_delimiter};

/// Minimum rendered width of each field in aligned output.
pub const DEFAULT_MIN_WIDTH: usize = 13;

/// How output rows are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Right-aligned fields padded to `min_width`, separated by one space.
    Aligned,
    /// Fields joined by the given delimiter, no padding.
    Delimited(char),
}

/// Configuration for rendering joined rows.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub min_width: usize,
    pub format: OutputFormat,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_WIDTH,
            format: OutputFormat::Aligned,
        }
    }
}

impl WriteOptions {
    pub fn with_min_width(mut self, min_width: usize) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn validate(&self) -> CsvJoinResult<()> {
        match self.format {
            OutputFormat::Aligned => Ok(()),
            OutputFormat::Delimited(delimiter) => validate_delimiter(delimiter),
        }
    }
}

/// Sink for output rows.
pub trait RowWriter {
    fn write_row(&mut self, row: &Row) -> CsvJoinResult<()>;

    /// Flush anything buffered.
    fn finish(&mut self) -> CsvJoinResult<()>;
}

/// Fixed-width writer: `{field:>min_width}` joined by single spaces.
pub struct AlignedWriter<W: Write> {
    writer: W,
    min_width: usize,
}

impl<W: Write> AlignedWriter<W> {
    pub fn new(writer: W, min_width: usize) -> Self {
        Self { writer, min_width }
    }
}

impl<W: Write> RowWriter for AlignedWriter<W> {
    fn write_row(&mut self, row: &Row) -> CsvJoinResult<()> {
        let width = self.min_width;
        for (idx, field) in row.iter().enumerate() {
            if idx > 0 {
                self.writer.write_all(b" ")?;
            }
            write!(self.writer, "{field:>width$}")?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> CsvJoinResult<()> {
        self.writer.flush().map_err(Error::from)
    }
}

/// Delimited writer: fields joined by `delimiter`, one row per line.
pub struct DelimitedWriter<W: Write> {
    writer: W,
    delimiter: char,
}

impl<W: Write> DelimitedWriter<W> {
    pub fn new(writer: W, delimiter: char) -> Self {
        Self { writer, delimiter }
    }
}

impl<W: Write> RowWriter for DelimitedWriter<W> {
    fn write_row(&mut self, row: &Row) -> CsvJoinResult<()> {
        let mut sep = [0u8; 4];
        let sep = self.delimiter.encode_utf8(&mut sep).as_bytes();
        for (idx, field) in row.iter().enumerate() {
            if idx > 0 {
                self.writer.write_all(sep)?;
            }
            self.writer.write_all(field.as_bytes())?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> CsvJoinResult<()> {
        self.writer.flush().map_err(Error::from)
    }
}

/// Build the writer selected by `options` over `writer`.
pub fn row_writer<'a, W>(
    writer: W,
    options: &WriteOptions,
) -> CsvJoinResult<Box<dyn RowWriter + 'a>>
where
    W: Write + 'a,
{
    options.validate()?;
    tracing::trace!(format = ?options.format, min_width = options.min_width, "building row writer");
    Ok(match options.format {
        OutputFormat::Aligned => Box::new(AlignedWriter::new(writer, options.min_width)),
        OutputFormat::Delimited(delimiter) => Box::new(DelimitedWriter::new(writer, delimiter)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(build: F, rows: &[Row]) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Box<dyn RowWriter + '_>,
    {
        let mut buf = Vec::new();
        {
            let mut writer = build(&mut buf);
            for row in rows {
                writer.write_row(row).unwrap();
            }
            writer.finish().unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn aligned_pads_to_thirteen_by_default() {
        let rows = [Row::from_iter(["Age", "Gender"])];
        let out = render(|buf| row_writer(buf, &WriteOptions::default()).unwrap(), &rows);
        assert_eq!(out, "          Age        Gender\n");
    }

    #[test]
    fn aligned_never_truncates_long_fields() {
        let rows = [Row::from_iter(["abcdefghijklmnop", "x"])];
        let out = render(|buf| Box::new(AlignedWriter::new(buf, 4)), &rows);
        assert_eq!(out, "abcdefghijklmnop    x\n");
    }

    #[test]
    fn delimited_joins_fields() {
        let rows = [
            Row::from_iter(["Age", "Gender", "ID"]),
            Row::from_iter(["7", "", "NULL"]),
        ];
        let options = WriteOptions::default().with_format(OutputFormat::Delimited(','));
        let out = render(|buf| row_writer(buf, &options).unwrap(), &rows);
        assert_eq!(out, "Age,Gender,ID\n7,,NULL\n");
    }

    #[test]
    fn delimited_supports_multibyte_delimiters() {
        let rows = [Row::from_iter(["a", "b"])];
        let out = render(|buf| Box::new(DelimitedWriter::new(buf, '│')), &rows);
        assert_eq!(out, "a│b\n");
    }

    #[test]
    fn newline_delimiter_is_rejected() {
        let options = WriteOptions::default().with_format(OutputFormat::Delimited('\n'));
        assert!(row_writer(Vec::new(), &options).is_err());
    }
}
