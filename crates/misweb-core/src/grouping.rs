//! Order-preserving grouping helpers
//!
//! Report rows arrive in the order the backend emitted them; grouping walks
//! that order and never re-sorts. Callers that need sorted groups sort the
//! rows first with a stable sort.

use std::ops::Range;

/// Split rows into consecutive runs sharing a key, preserving input order.
/// Returns each run's key and index range.
pub fn runs_by<T, K, F>(rows: &[T], key_fn: F) -> Vec<(K, Range<usize>)>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut runs = Vec::new();
    let mut start = 0;

    for i in 1..=rows.len() {
        let boundary = i == rows.len() || key_fn(&rows[i]) != key_fn(&rows[i - 1]);
        if boundary {
            runs.push((key_fn(&rows[start]), start..i));
            start = i;
        }
    }

    runs
}

/// Row-span sizes for a merged leading cell: the first row of each run
/// carries the run length, rows inside a run carry 0.
pub fn leading_spans<T, K, F>(rows: &[T], key_fn: F) -> Vec<usize>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut spans = vec![0; rows.len()];
    for (_, range) in runs_by(rows, &key_fn) {
        spans[range.start] = range.len();
    }
    spans
}
