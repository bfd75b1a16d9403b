//! Nested-loop inner scan.
//!
//! For each left row in file order, rewind the right source to its first data
//! row and compare every key. This reads the right input N times but keeps
//! only one row from each side in memory.

use std::io::{BufRead, Seek};

use csvjoin_csv::{CsvSource, Row};
use csvjoin_result::Result as CsvJoinResult;

use crate::{JoinColumns, KeyDrop, MatchedRows, combine_rows};

/// Emit every pair of rows with equal keys and record both row numbers.
/// Returns the number of pairs emitted.
pub(crate) fn inner_scan<L, R, F>(
    left: &mut CsvSource<L>,
    right: &mut CsvSource<R>,
    columns: JoinColumns,
    key_drop: KeyDrop,
    matched: &mut MatchedRows,
    on_row: &mut F,
) -> CsvJoinResult<usize>
where
    L: BufRead + Seek,
    R: BufRead + Seek,
    F: FnMut(Row) -> CsvJoinResult<()>,
{
    let mut pairs = 0usize;

    for left_item in left.rows()? {
        let (left_number, left_row) = left_item?;
        let Some(left_key) = left_row.get(columns.left) else {
            tracing::trace!(
                row = left_number,
                fields = left_row.len(),
                "left row has no key column; skipping"
            );
            continue;
        };

        for right_item in right.rows()? {
            let (right_number, right_row) = right_item?;
            if right_row.get(columns.right) != Some(left_key) {
                continue;
            }

            matched.left.insert(left_number);
            matched.right.insert(right_number);
            pairs += 1;
            tracing::trace!(
                left_row = left_number,
                right_row = right_number,
                key = left_key,
                "matched"
            );
            on_row(combine_rows(&left_row, &right_row, key_drop))?;
        }
    }

    Ok(pairs)
}
