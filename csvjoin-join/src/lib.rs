//! Join two CSV sources on a named column.
//!
//! This crate exposes the shared types (`JoinType`, `JoinAlgorithm`,
//! `JoinOptions`, `JoinSpec`) and the two building blocks every join uses:
//! [`locate_column`] to resolve the key column in a header and
//! [`combine_rows`] to splice a pair of rows into one output row.
//!
//! A join always runs an inner scan first, emitting each matching pair as it
//! is found and recording which row numbers on each side matched. Left and
//! right joins then make a fill pass over the preserved side, emitting every
//! row that never matched next to an all-`NULL` filler.
#![forbid(unsafe_code)]

mod fill;
mod hash_join;
mod nested_loop;

use std::fmt;
use std::io::{BufRead, Seek};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csvjoin_csv::{CsvReadOptions, CsvSource, Row};
use csvjoin_result::{Error, Result as CsvJoinResult};
use rustc_hash::FxHashSet;

pub use fill::{NULL_TOKEN, filler_row};

/// Type of join to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum JoinType {
    /// Emit only matching row pairs.
    #[default]
    Inner,
    /// Emit all left rows; unmatched left rows have NULL right columns.
    Left,
    /// Emit all right rows; unmatched right rows have NULL left columns.
    Right,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "inner"),
            JoinType::Left => write!(f, "left"),
            JoinType::Right => write!(f, "right"),
        }
    }
}

impl FromStr for JoinType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inner" => Ok(JoinType::Inner),
            "left" => Ok(JoinType::Left),
            "right" => Ok(JoinType::Right),
            other => Err(Error::InvalidArgumentError(format!(
                "{other} is not available type of join: inner, left, right"
            ))),
        }
    }
}

/// Algorithm used for the inner scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum JoinAlgorithm {
    /// Rescan the right source from its first data row for every left row.
    /// O(N×M) comparisons, constant extra memory.
    #[default]
    NestedLoop,
    /// Read the right source once into a map keyed by join value, then probe
    /// it with each left row. O(N+M), holds the right side in memory.
    Hash,
}

impl fmt::Display for JoinAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinAlgorithm::NestedLoop => write!(f, "nested-loop"),
            JoinAlgorithm::Hash => write!(f, "hash"),
        }
    }
}

impl FromStr for JoinAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nested-loop" => Ok(JoinAlgorithm::NestedLoop),
            "hash" => Ok(JoinAlgorithm::Hash),
            other => Err(Error::InvalidArgumentError(format!(
                "{other} is not an available join algorithm: nested-loop, hash"
            ))),
        }
    }
}

/// Options controlling join execution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JoinOptions {
    /// Type of join to perform.
    pub join_type: JoinType,
    /// Algorithm for the inner scan. Output is identical either way.
    pub algorithm: JoinAlgorithm,
}

impl JoinOptions {
    /// Create options for an inner join with default settings.
    pub fn inner() -> Self {
        Self {
            join_type: JoinType::Inner,
            ..Default::default()
        }
    }

    /// Create options for a left outer join with default settings.
    pub fn left() -> Self {
        Self {
            join_type: JoinType::Left,
            ..Default::default()
        }
    }

    /// Create options for a right outer join with default settings.
    pub fn right() -> Self {
        Self {
            join_type: JoinType::Right,
            ..Default::default()
        }
    }

    /// Set the join algorithm.
    pub fn with_algorithm(mut self, algorithm: JoinAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

/// Which side loses its copy of the key column when two rows are combined.
///
/// Exactly one side drops its key, so the key appears once in the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyDrop {
    Left(usize),
    Right(usize),
}

/// Resolved key column positions for both sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct JoinColumns {
    pub left: usize,
    pub right: usize,
}

impl JoinColumns {
    /// The right join keeps the right key; inner and left keep the left key.
    /// Header, matched rows and filled rows all use the same orientation.
    pub(crate) fn key_drop(self, join_type: JoinType) -> KeyDrop {
        match join_type {
            JoinType::Inner | JoinType::Left => KeyDrop::Right(self.right),
            JoinType::Right => KeyDrop::Left(self.left),
        }
    }
}

/// Counts reported once a join completes. The header row is not counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JoinStats {
    /// Rows emitted by the inner scan, one per pair of equal keys.
    pub matched_pairs: usize,
    /// Rows emitted by the fill pass.
    pub filled_rows: usize,
}

impl JoinStats {
    pub fn data_rows(&self) -> usize {
        self.matched_pairs + self.filled_rows
    }
}

/// 1-based numbers of the rows on one side that found at least one partner.
#[derive(Clone, Debug, Default)]
pub struct MatchedRowSet {
    rows: FxHashSet<usize>,
}

impl MatchedRowSet {
    pub fn insert(&mut self, row_number: usize) -> bool {
        self.rows.insert(row_number)
    }

    pub fn contains(&self, row_number: usize) -> bool {
        self.rows.contains(&row_number)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Matched sets for both sides of one join call.
#[derive(Debug, Default)]
pub(crate) struct MatchedRows {
    pub left: MatchedRowSet,
    pub right: MatchedRowSet,
}

/// Return the position of the first header field exactly equal to `column`.
///
/// No case folding or trimming is applied. A missing column is a hard
/// [`Error::ColumnNotFound`] naming `source_name`.
pub fn locate_column(header: &Row, column: &str, source_name: &str) -> CsvJoinResult<usize> {
    header
        .iter()
        .position(|field| field == column)
        .ok_or_else(|| Error::column_not_found(column, source_name))
}

/// Concatenate `left` and `right`, omitting the key field named by `key_drop`.
///
/// An index past the end of a short row removes nothing.
pub fn combine_rows(left: &Row, right: &Row, key_drop: KeyDrop) -> Row {
    let (skip_left, skip_right) = match key_drop {
        KeyDrop::Left(idx) => (Some(idx), None),
        KeyDrop::Right(idx) => (None, Some(idx)),
    };

    let left_fields = left
        .iter()
        .enumerate()
        .filter(|(idx, _)| Some(*idx) != skip_left);
    let right_fields = right
        .iter()
        .enumerate()
        .filter(|(idx, _)| Some(*idx) != skip_right);

    left_fields.chain(right_fields).map(|(_, field)| field).collect()
}

/// Run a join between two sources, handing every output row to `on_row`.
///
/// Both key columns are resolved before anything is emitted, so a missing
/// column produces no output. The header row is always emitted first, exactly
/// once, followed by inner-scan rows and then (for left/right joins) fill-pass
/// rows. An error from `on_row` aborts the join.
pub fn join_sources<L, R, F>(
    left: &mut CsvSource<L>,
    right: &mut CsvSource<R>,
    column: &str,
    options: &JoinOptions,
    mut on_row: F,
) -> CsvJoinResult<JoinStats>
where
    L: BufRead + Seek,
    R: BufRead + Seek,
    F: FnMut(Row) -> CsvJoinResult<()>,
{
    let columns = JoinColumns {
        left: locate_column(left.header(), column, left.name())?,
        right: locate_column(right.header(), column, right.name())?,
    };
    let key_drop = columns.key_drop(options.join_type);

    tracing::debug!(
        join_type = %options.join_type,
        algorithm = %options.algorithm,
        left = left.name(),
        right = right.name(),
        left_key = columns.left,
        right_key = columns.right,
        "starting join"
    );

    on_row(combine_rows(left.header(), right.header(), key_drop))?;

    let mut matched = MatchedRows::default();
    let matched_pairs = match options.algorithm {
        JoinAlgorithm::NestedLoop => {
            nested_loop::inner_scan(left, right, columns, key_drop, &mut matched, &mut on_row)?
        }
        JoinAlgorithm::Hash => {
            hash_join::inner_scan(left, right, columns, key_drop, &mut matched, &mut on_row)?
        }
    };
    tracing::debug!(
        matched_pairs,
        matched_left = matched.left.len(),
        matched_right = matched.right.len(),
        "inner scan finished"
    );

    let filled_rows = match options.join_type {
        JoinType::Inner => 0,
        JoinType::Left => {
            let filler = filler_row(right.header().len());
            fill::fill_pass(
                left,
                &matched.left,
                |row| combine_rows(row, &filler, key_drop),
                &mut on_row,
            )?
        }
        JoinType::Right => {
            let filler = filler_row(left.header().len());
            fill::fill_pass(
                right,
                &matched.right,
                |row| combine_rows(&filler, row, key_drop),
                &mut on_row,
            )?
        }
    };

    let stats = JoinStats {
        matched_pairs,
        filled_rows,
    };
    tracing::debug!(?stats, "join complete");
    Ok(stats)
}

/// Run a join and collect every output row, header first.
pub fn collect_join<L, R>(
    left: &mut CsvSource<L>,
    right: &mut CsvSource<R>,
    column: &str,
    options: &JoinOptions,
) -> CsvJoinResult<(Vec<Row>, JoinStats)>
where
    L: BufRead + Seek,
    R: BufRead + Seek,
{
    let mut rows = Vec::new();
    let stats = join_sources(left, right, column, options, |row| {
        rows.push(row);
        Ok(())
    })?;
    Ok((rows, stats))
}

/// Complete description of a file join: both paths, the key column and how
/// to join and read them. Built once and never mutated by execution.
#[derive(Clone, Debug)]
pub struct JoinSpec {
    left_path: PathBuf,
    right_path: PathBuf,
    column: String,
    options: JoinOptions,
    read_options: CsvReadOptions,
}

impl JoinSpec {
    pub fn new(
        left_path: impl Into<PathBuf>,
        right_path: impl Into<PathBuf>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            left_path: left_path.into(),
            right_path: right_path.into(),
            column: column.into(),
            options: JoinOptions::default(),
            read_options: CsvReadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: JoinOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_read_options(mut self, read_options: CsvReadOptions) -> Self {
        self.read_options = read_options;
        self
    }

    pub fn left_path(&self) -> &Path {
        &self.left_path
    }

    pub fn right_path(&self) -> &Path {
        &self.right_path
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn options(&self) -> &JoinOptions {
        &self.options
    }

    pub fn read_options(&self) -> &CsvReadOptions {
        &self.read_options
    }

    /// Check both inputs are regular files before anything is read.
    pub fn validate(&self) -> CsvJoinResult<()> {
        for path in [&self.left_path, &self.right_path] {
            if !path.is_file() {
                return Err(Error::FileNotFound(path.clone()));
            }
        }
        self.read_options.validate()
    }

    /// Open both files and run the join, handing each output row to `on_row`.
    pub fn execute<F>(&self, on_row: F) -> CsvJoinResult<JoinStats>
    where
        F: FnMut(Row) -> CsvJoinResult<()>,
    {
        self.validate()?;
        let mut left = CsvSource::open(&self.left_path, self.read_options.clone())?;
        let mut right = CsvSource::open(&self.right_path, self.read_options.clone())?;
        join_sources(&mut left, &mut right, &self.column, &self.options, on_row)
    }
}
