//! Hash inner scan.
//!
//! Build phase: read the right source once and group its rows by key value,
//! keeping file order inside each group. Probe phase: walk the left source
//! and emit one row per partner found in the group for its key.
//!
//! Output order equals the nested-loop scan: left rows in file order, and for
//! each left row its partners in right file order.

use std::io::{BufRead, Seek};

use csvjoin_csv::{CsvSource, Row};
use csvjoin_result::Result as CsvJoinResult;
use rustc_hash::FxHashMap;

use crate::{JoinColumns, KeyDrop, MatchedRows, combine_rows};

/// A right-side row with its 1-based number.
type NumberedRow = (usize, Row);

/// Key value to the right rows carrying it, in file order.
type HashTable = FxHashMap<String, Vec<NumberedRow>>;

fn build_hash_table<R>(right: &mut CsvSource<R>, key_idx: usize) -> CsvJoinResult<HashTable>
where
    R: BufRead + Seek,
{
    let mut table = HashTable::default();
    let mut rows = 0usize;

    for item in right.rows()? {
        let (number, row) = item?;
        rows += 1;
        let Some(key) = row.get(key_idx) else {
            tracing::trace!(row = number, "right row has no key column; not indexed");
            continue;
        };
        table.entry(key.to_owned()).or_default().push((number, row));
    }

    tracing::debug!(rows, distinct_keys = table.len(), "built hash table");
    Ok(table)
}

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
    let table = build_hash_table(right, columns.right)?;
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
        let Some(partners) = table.get(left_key) else {
            continue;
        };

        matched.left.insert(left_number);
        for (right_number, right_row) in partners {
            matched.right.insert(*right_number);
            pairs += 1;
            on_row(combine_rows(&left_row, right_row, key_drop))?;
        }
    }

    Ok(pairs)
}
