// Logalizer - core/dedup.rs
//
// Duplicate suppression and occurrence tallies for rendered lines.

use crate::core::model::DuplicateStrategy;
use crate::core::render::fill_count;
use std::collections::HashMap;

/// Decide whether `candidate` is suppressed given the lines kept so far.
///
/// Continuous strategies compare against the last *kept* line only; an
/// empty history never suppresses.
pub fn should_suppress(strategy: DuplicateStrategy, prior: &[String], candidate: &str) -> bool {
    match strategy {
        DuplicateStrategy::Keep => false,
        DuplicateStrategy::RemoveAll | DuplicateStrategy::Count => {
            prior.iter().any(|line| line == candidate)
        }
        DuplicateStrategy::RemoveContinuous | DuplicateStrategy::CountContinuous => {
            prior.last().is_some_and(|last| last == candidate)
        }
    }
}

/// Rendered lines accumulated during a scan, with the tallies kept by the
/// counting strategies.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    lines: Vec<String>,
    /// Line index -> number of occurrences folded into that line.
    tallies: HashMap<usize, usize>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Offer a rendered line. Returns `true` if it was appended.
    pub fn push(&mut self, candidate: String, strategy: DuplicateStrategy) -> bool {
        if should_suppress(strategy, &self.lines, &candidate) {
            if strategy.is_counting() {
                let idx = match strategy {
                    DuplicateStrategy::Count => {
                        self.lines.iter().position(|line| *line == candidate)
                    }
                    _ => self.lines.len().checked_sub(1),
                };
                // A line kept by a non-counting rule has no tally yet; this
                // repeat is its first counted occurrence.
                if let Some(idx) = idx {
                    *self.tallies.entry(idx).or_insert(0) += 1;
                }
            }
            return false;
        }

        self.lines.push(candidate);
        if strategy.is_counting() {
            self.tallies.insert(self.lines.len() - 1, 1);
        }
        true
    }

    /// Substitute `${count}` in every tallied line and return the lines.
    pub fn finish(mut self) -> Vec<String> {
        for (idx, count) in self.tallies {
            self.lines[idx] = fill_count(&self.lines[idx], count);
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keep_never_suppresses() {
        let prior = lines(&["a", "a"]);
        assert!(!should_suppress(DuplicateStrategy::Keep, &prior, "a"));
    }

    #[test]
    fn test_remove_all_checks_full_history() {
        let prior = lines(&["a", "b", "c", "d"]);
        assert!(should_suppress(DuplicateStrategy::RemoveAll, &prior, "a"));
        assert!(!should_suppress(DuplicateStrategy::RemoveAll, &prior, "e"));
    }

    #[test]
    fn test_remove_continuous_checks_last_only() {
        let prior = lines(&["a", "b"]);
        assert!(should_suppress(DuplicateStrategy::RemoveContinuous, &prior, "b"));
        assert!(!should_suppress(DuplicateStrategy::RemoveContinuous, &prior, "a"));
    }

    #[test]
    fn test_remove_continuous_empty_history() {
        assert!(!should_suppress(DuplicateStrategy::RemoveContinuous, &[], "a"));
    }

    #[test]
    fn test_count_folds_repeats_into_first_occurrence() {
        let mut buffer = OutputBuffer::new();
        assert!(buffer.push("retry x${count}".to_string(), DuplicateStrategy::Count));
        assert!(buffer.push("other".to_string(), DuplicateStrategy::Keep));
        assert!(!buffer.push("retry x${count}".to_string(), DuplicateStrategy::Count));
        assert!(!buffer.push("retry x${count}".to_string(), DuplicateStrategy::Count));
        assert_eq!(buffer.finish(), lines(&["retry x3", "other"]));
    }

    #[test]
    fn test_count_continuous_restarts_after_interruption() {
        let mut buffer = OutputBuffer::new();
        let tick = || "tick (${count})".to_string();
        buffer.push(tick(), DuplicateStrategy::CountContinuous);
        buffer.push(tick(), DuplicateStrategy::CountContinuous);
        buffer.push("tock".to_string(), DuplicateStrategy::Keep);
        buffer.push(tick(), DuplicateStrategy::CountContinuous);
        assert_eq!(buffer.finish(), lines(&["tick (2)", "tock", "tick (1)"]));
    }

    #[test]
    fn test_untallied_lines_keep_placeholder() {
        let mut buffer = OutputBuffer::new();
        buffer.push("literal ${count}".to_string(), DuplicateStrategy::Keep);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.finish(), lines(&["literal ${count}"]));
    }

    #[test]
    fn test_count_against_line_kept_by_other_rule_starts_at_one() {
        let mut buffer = OutputBuffer::new();
        buffer.push("sync x${count}".to_string(), DuplicateStrategy::Keep);
        assert!(!buffer.push("sync x${count}".to_string(), DuplicateStrategy::Count));
        assert_eq!(buffer.finish(), lines(&["sync x1"]));

        let mut buffer = OutputBuffer::new();
        buffer.push("beat x${count}".to_string(), DuplicateStrategy::Keep);
        buffer.push("beat x${count}".to_string(), DuplicateStrategy::CountContinuous);
        buffer.push("beat x${count}".to_string(), DuplicateStrategy::CountContinuous);
        assert_eq!(buffer.finish(), lines(&["beat x2"]));
    }
}
