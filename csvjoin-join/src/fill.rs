//! Fill pass for left and right joins.

use std::io::{BufRead, Seek};

use csvjoin_csv::{CsvSource, Row};
use csvjoin_result::Result as CsvJoinResult;

use crate::MatchedRowSet;

/// Placeholder written for every field of a missing partner row.
pub const NULL_TOKEN: &str = "NULL";

/// A row of `width` [`NULL_TOKEN`] fields.
pub fn filler_row(width: usize) -> Row {
    std::iter::repeat_n(NULL_TOKEN, width).collect()
}

/// Revisit `target` in file order and emit `combine(row)` for every row whose
/// number is absent from `matched`. Returns the number of rows emitted.
pub(crate) fn fill_pass<R, C, F>(
    target: &mut CsvSource<R>,
    matched: &MatchedRowSet,
    combine: C,
    on_row: &mut F,
) -> CsvJoinResult<usize>
where
    R: BufRead + Seek,
    C: Fn(&Row) -> Row,
    F: FnMut(Row) -> CsvJoinResult<()>,
{
    let mut filled = 0usize;

    for item in target.rows()? {
        let (number, row) = item?;
        if matched.contains(number) {
            continue;
        }
        filled += 1;
        on_row(combine(&row))?;
    }

    tracing::debug!(source = target.name(), filled, "fill pass finished");
    Ok(filled)
}
