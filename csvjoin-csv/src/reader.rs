//! Seekable row sources.
//!
//! The nested-loop join rescans the right input once per left row, so every
//! source must be able to return to its first data row. Files are seekable as
//! opened; anything else is materialised into memory by
//! [`CsvSource::from_reader`] before the join begins.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use csvjoin_result::{Error, Result as CsvJoinResult};

use crate::{CsvReadOptions, Row};

/// A header plus a rewindable stream of data rows.
#[derive(Debug)]
pub struct CsvSource<R> {
    name: String,
    reader: R,
    header: Row,
    data_start: u64,
    options: CsvReadOptions,
}

impl CsvSource<BufReader<File>> {
    /// Open a CSV file and read its header.
    ///
    /// Fails with [`Error::FileNotFound`] when `path` is not a regular file.
    pub fn open(path: impl AsRef<Path>, options: CsvReadOptions) -> CsvJoinResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::from_seekable(path.display().to_string(), BufReader::new(file), options)
    }
}

impl CsvSource<Cursor<Vec<u8>>> {
    /// Buffer a non-seekable reader (a pipe, stdin, a socket) fully in memory.
    pub fn from_reader<T: Read>(
        name: impl Into<String>,
        mut reader: T,
        options: CsvReadOptions,
    ) -> CsvJoinResult<Self> {
        let name = name.into();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        tracing::debug!(source = %name, bytes = buf.len(), "materialized non-seekable input");
        Self::from_seekable(name, Cursor::new(buf), options)
    }
}

impl<R: BufRead + Seek> CsvSource<R> {
    /// Wrap a reader that already supports seeking. The first line of the
    /// stream is taken as the header regardless of the current position.
    pub fn from_seekable(
        name: impl Into<String>,
        mut reader: R,
        options: CsvReadOptions,
    ) -> CsvJoinResult<Self> {
        options.validate()?;
        reader.rewind()?;

        let mut line = String::new();
        reader.read_line(&mut line)?;
        let header = Row::parse(&line, options.delimiter);
        let data_start = reader.stream_position()?;

        Ok(Self {
            name: name.into(),
            reader,
            header,
            data_start,
            options,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> &Row {
        &self.header
    }

    /// Rewind to the first data row and iterate the rows in file order.
    ///
    /// Row numbers are 1-based and exclude the header, so every call numbers
    /// the same line identically.
    pub fn rows(&mut self) -> CsvJoinResult<Rows<'_, R>> {
        self.reader.seek(SeekFrom::Start(self.data_start))?;
        Ok(Rows {
            reader: &mut self.reader,
            delimiter: self.options.delimiter,
            line: String::new(),
            number: 0,
        })
    }
}

/// Iterator over `(row_number, row)` pairs produced by [`CsvSource::rows`].
pub struct Rows<'a, R> {
    reader: &'a mut R,
    delimiter: char,
    line: String,
    number: usize,
}

impl<R: BufRead> Iterator for Rows<'_, R> {
    type Item = CsvJoinResult<(usize, Row)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.line.clear();
        match self.reader.read_line(&mut self.line) {
            Ok(0) => None,
            Ok(_) => {
                self.number += 1;
                Some(Ok((self.number, Row::parse(&self.line, self.delimiter))))
            }
            Err(err) => Some(Err(Error::from(err))),
        }
    }
}
