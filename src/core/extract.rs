// Logalizer - core/extract.rs
//
// Variable extraction from a matched line.
//
// `capture` resolves one spec and reports failure as `None`; the
// skip-on-failure policy lives only in `extract`, so a stricter policy can
// replace it without touching matching or rendering.

use crate::core::model::VariableSpec;

/// Resolve one spec against `line`.
///
/// Finds the first `startswith`, then the first `endswith` after it, and
/// returns the text strictly between them. `None` if either is absent.
pub fn capture<'a>(spec: &VariableSpec, line: &'a str) -> Option<&'a str> {
    let start = line.find(spec.startswith.as_str())? + spec.startswith.len();
    let len = line[start..].find(spec.endswith.as_str())?;
    Some(&line[start..start + len])
}

/// Extract one value per resolvable spec, in spec order.
///
/// Unresolvable specs are skipped rather than replaced with an empty value,
/// so later values shift down one position. Every spec searches from the
/// start of the line; positions are not chained between specs.
pub fn extract(variables: &[VariableSpec], line: &str) -> Vec<String> {
    variables
        .iter()
        .filter_map(|spec| {
            let value = capture(spec, line);
            if value.is_none() {
                tracing::trace!(
                    startswith = %spec.startswith,
                    endswith = %spec.endswith,
                    "Variable not resolved; skipping"
                );
            }
            value
        })
        .map(str::to_string)
        .collect()
}
