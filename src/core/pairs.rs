// Logalizer - core/pairs.rs
//
// Request/response pair consistency checking over rendered output.
//
// Each pair spec is checked in one pass with a single "open source"
// marker. Violations are annotated in place: positional insertions are
// collected during the pass and applied afterwards in descending position
// order, so pending positions never shift. Specs run in configured order,
// each one seeing the annotations added by the previous ones.

use crate::core::model::PairSpec;

/// Check every pair spec in order. Returns the number of error lines added.
pub fn check_pairs(lines: &mut Vec<String>, pairs: &[PairSpec]) -> usize {
    pairs.iter().map(|pair| check_pair(lines, pair)).sum()
}

/// Check one pair spec over `lines`. Returns the number of error lines added.
///
/// Per line, the first applicable case wins:
/// 1. open and the line contains `source` -> error before this line, the
///    marker moves here
/// 2. closed and the line contains `source` -> open the marker
/// 3. open and the line contains `pairswith` -> close (paired)
/// 4. open and the line contains `before` -> error before this line, close
///
/// A marker still open after the last line appends `error` at the end.
pub fn check_pair(lines: &mut Vec<String>, pair: &PairSpec) -> usize {
    let mut open: Option<usize> = None;
    let mut insertions: Vec<usize> = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let has_source = line.contains(pair.source.as_str());
        match open {
            Some(pending) if has_source => {
                tracing::debug!(
                    source_line = pending,
                    at = idx,
                    source = %pair.source,
                    "Source repeated before its pair"
                );
                insertions.push(idx);
                open = Some(idx);
            }
            None if has_source => open = Some(idx),
            Some(_) if line.contains(pair.pairswith.as_str()) => open = None,
            Some(pending) if line.contains(pair.before.as_str()) => {
                tracing::debug!(
                    source_line = pending,
                    at = idx,
                    before = %pair.before,
                    "Checkpoint reached before pair"
                );
                insertions.push(idx);
                open = None;
            }
            _ => {}
        }
    }

    let mut added = insertions.len();

    if let Some(pending) = open {
        tracing::debug!(
            source_line = pending,
            source = %pair.source,
            "Source unpaired at end of output"
        );
        lines.push(pair.error.clone());
        added += 1;
    }

    // Positions were collected in ascending order.
    for &pos in insertions.iter().rev() {
        lines.insert(pos, pair.error.clone());
    }

    added
}
