// Logalizer - core/render.rs
//
// Template filling and literal text substitution.

use crate::core::model::Replacement;
use crate::util::constants::{COUNT_PLACEHOLDER, FIRST_PLACEHOLDER};

/// Fill `template` with extracted `values`.
///
/// - No values: the template is returned unchanged.
/// - Template contains `${1}`: each `${i}` is replaced by `values[i-1]`;
///   placeholders without a value are left in place.
/// - Otherwise: the values are appended as `(a, b, ...)`.
pub fn render(template: &str, values: &[String]) -> String {
    if values.is_empty() {
        return template.to_string();
    }

    if template.contains(FIRST_PLACEHOLDER) {
        values
            .iter()
            .enumerate()
            .fold(template.to_string(), |filled, (idx, value)| {
                filled.replace(&format!("${{{}}}", idx + 1), value)
            })
    } else {
        format!("{template}({})", values.join(", "))
    }
}

/// Apply the replacement table left to right. Each entry sees the result
/// of the previous ones.
pub fn apply_replacements(line: &str, replacements: &[Replacement]) -> String {
    replacements
        .iter()
        .filter(|r| !r.search.is_empty())
        .fold(line.to_string(), |text, r| {
            text.replace(r.search.as_str(), &r.replace)
        })
}

/// Replace every `${count}` in `line` with `count`.
pub fn fill_count(line: &str, count: usize) -> String {
    line.replace(COUNT_PLACEHOLDER, &count.to_string())
}
