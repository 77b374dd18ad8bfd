// Logalizer - core/translate.rs
//
// The translation engine: raw lines in, rendered interaction lines out.
// Core layer: pure, synchronous, in-memory. Never fails on log content.
//
// Per raw line: replacement table -> blacklist check -> first matching
// rule -> variable extraction -> template rendering -> duplicate filter.
// After the scan, `${count}` tallies are filled in and every pair spec is
// checked over the accumulated output.

use crate::core::dedup::OutputBuffer;
use crate::core::extract::extract;
use crate::core::matcher::{find_rule, is_blacklisted};
use crate::core::model::{DuplicateStrategy, LineDeletion, RuleSet};
use crate::core::pairs::check_pairs;
use crate::core::render::{apply_replacements, render};
use crate::util::logging::preview;

/// Counters describing one translation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationStats {
    /// Raw lines offered to the engine.
    pub lines_read: usize,
    /// Lines discarded by the blacklist.
    pub blacklisted: usize,
    /// Lines no rule matched.
    pub unmatched: usize,
    /// Rendered lines dropped by a duplicate strategy.
    pub suppressed: usize,
    /// Error lines added by the pair checker.
    pub pair_errors: usize,
}

/// Output of a translation run.
#[derive(Debug, Clone, Default)]
pub struct TranslationResult {
    /// Final output sequence, pair annotations included.
    pub lines: Vec<String>,
    pub stats: TranslationStats,
}

/// Render a single raw line.
///
/// Returns `None` if the line is blacklisted or matches no rule. The
/// replacement table is applied first; the blacklist, the rule patterns
/// and extraction all see the replaced line, so a log already rewritten
/// with the same table translates the same way.
pub fn translate_line(line: &str, rule_set: &RuleSet) -> Option<(String, DuplicateStrategy)> {
    let replaced = apply_replacements(line, rule_set.replacements());
    if is_blacklisted(&replaced, rule_set.blacklist()) {
        return None;
    }
    render_line(&replaced, rule_set)
}

/// Match and render a replaced line already cleared by the blacklist.
fn render_line(line: &str, rule_set: &RuleSet) -> Option<(String, DuplicateStrategy)> {
    let rule = find_rule(line, rule_set.rules())?;
    let values = extract(&rule.variables, line);
    Some((render(&rule.template, &values), rule.duplicates))
}

/// Translate a whole sequence of raw lines.
pub fn translate_lines<I, S>(raw_lines: I, rule_set: &RuleSet) -> TranslationResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stats = TranslationStats::default();
    let mut buffer = OutputBuffer::new();

    for raw in raw_lines {
        let line = apply_replacements(raw.as_ref(), rule_set.replacements());
        stats.lines_read += 1;

        if is_blacklisted(&line, rule_set.blacklist()) {
            stats.blacklisted += 1;
            continue;
        }

        match render_line(&line, rule_set) {
            Some((rendered, strategy)) => {
                tracing::trace!(line = preview(&line), rendered = %rendered, "Line translated");
                if !buffer.push(rendered, strategy) {
                    stats.suppressed += 1;
                }
            }
            None => stats.unmatched += 1,
        }
    }

    let mut lines = buffer.finish();
    stats.pair_errors = check_pairs(&mut lines, rule_set.pairs());

    tracing::debug!(
        lines_read = stats.lines_read,
        blacklisted = stats.blacklisted,
        unmatched = stats.unmatched,
        suppressed = stats.suppressed,
        pair_errors = stats.pair_errors,
        output = lines.len(),
        "Translation complete"
    );

    TranslationResult { lines, stats }
}

/// Translate a whole sequence of raw lines, returning only the output.
pub fn translate<I, S>(raw_lines: I, rule_set: &RuleSet) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    translate_lines(raw_lines, rule_set).lines
}

/// Drop every line matched by a `delete_lines` entry.
///
/// Returns the kept lines and the number removed.
pub fn remove_deleted_lines(
    lines: Vec<String>,
    deletions: &[LineDeletion],
) -> (Vec<String>, usize) {
    if deletions.is_empty() {
        return (lines, 0);
    }
    let before = lines.len();
    let kept: Vec<String> = lines
        .into_iter()
        .filter(|line| !deletions.iter().any(|d| d.matches(line)))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}
