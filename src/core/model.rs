// Logalizer - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers. A `RuleSet`
// is immutable once built; its constructor is the single place where
// rule validity is enforced, so the translation engine never sees a
// malformed rule.

use crate::util::error::RuleConfigError;
use regex::Regex;

// =============================================================================
// Rules
// =============================================================================

/// One `{startswith, endswith}` extraction spec. Both are substrings,
/// not positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSpec {
    pub startswith: String,
    pub endswith: String,
}

impl VariableSpec {
    pub fn new(startswith: impl Into<String>, endswith: impl Into<String>) -> Self {
        Self {
            startswith: startswith.into(),
            endswith: endswith.into(),
        }
    }
}

/// Policy deciding whether a freshly rendered line is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DuplicateStrategy {
    /// Never suppress.
    #[default]
    Keep,

    /// Suppress if the line equals any line already in the output.
    RemoveAll,

    /// Suppress if the line equals the last line in the output.
    RemoveContinuous,

    /// As `RemoveAll`, tallying suppressed repeats against the first
    /// occurrence. The tally replaces `${count}` after the scan.
    Count,

    /// As `RemoveContinuous`, tallying repeats against the last line.
    CountContinuous,
}

impl DuplicateStrategy {
    /// Parse a configuration tag. Returns `None` for unknown tags.
    ///
    /// An empty tag means "not configured" and maps to `Keep`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "" | "none" | "allowed" => Some(Self::Keep),
            "remove_all" | "remove" => Some(Self::RemoveAll),
            "remove_continuous" => Some(Self::RemoveContinuous),
            "count" => Some(Self::Count),
            "count_continuous" => Some(Self::CountContinuous),
            _ => None,
        }
    }

    /// Canonical configuration tag.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Keep => "none",
            Self::RemoveAll => "remove_all",
            Self::RemoveContinuous => "remove_continuous",
            Self::Count => "count",
            Self::CountContinuous => "count_continuous",
        }
    }

    /// True for the strategies that maintain occurrence tallies.
    pub fn is_counting(&self) -> bool {
        matches!(self, Self::Count | Self::CountContinuous)
    }
}

impl std::fmt::Display for DuplicateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A configured pattern-to-template mapping used to translate one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Group used for enable/disable selection. `None` when ungrouped.
    pub group: Option<String>,

    /// `false` when the configuration disables the rule by default.
    pub enabled: bool,

    /// Every entry must be a substring of the line for the rule to match.
    pub patterns: Vec<String>,

    /// Extraction specs, applied independently in order.
    pub variables: Vec<VariableSpec>,

    /// Output template, optionally with `${1}`, `${2}`, ... placeholders.
    pub template: String,

    pub duplicates: DuplicateStrategy,
}

impl Rule {
    /// Create an enabled, ungrouped rule with no variables.
    pub fn new<P: Into<String>>(
        patterns: impl IntoIterator<Item = P>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            group: None,
            enabled: true,
            patterns: patterns.into_iter().map(Into::into).collect(),
            variables: Vec::new(),
            template: template.into(),
            duplicates: DuplicateStrategy::Keep,
        }
    }

    pub fn with_variable(mut self, startswith: &str, endswith: &str) -> Self {
        self.variables.push(VariableSpec::new(startswith, endswith));
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicateStrategy) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    /// True if every pattern is contained in `line`. Order is irrelevant.
    pub fn matches(&self, line: &str) -> bool {
        self.patterns.iter().all(|pattern| line.contains(pattern.as_str()))
    }

    /// Check the fields every rule needs. `location` is used for errors only.
    pub fn validate(&self, location: &str) -> Result<(), RuleConfigError> {
        if self.patterns.is_empty() {
            return Err(RuleConfigError::MissingField {
                location: location.to_string(),
                field: "patterns",
            });
        }
        if self.template.is_empty() {
            return Err(RuleConfigError::MissingField {
                location: location.to_string(),
                field: "print",
            });
        }
        Ok(())
    }
}

// =============================================================================
// Replacements, pairs, deletions
// =============================================================================

/// One literal `search -> replace` entry of the replacement table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub search: String,
    pub replace: String,
}

impl Replacement {
    pub fn new(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replace: replace.into(),
        }
    }
}

/// Expected request/response relationship between rendered lines.
///
/// Every `source` line must be followed by a `pairswith` line before the
/// next `before` line (or a repeated `source`); otherwise `error` is
/// injected into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSpec {
    pub source: String,
    pub pairswith: String,
    pub before: String,
    pub error: String,
}

impl PairSpec {
    /// Create a spec whose checkpoint defaults to `source`.
    pub fn new(
        source: impl Into<String>,
        pairswith: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        let source = source.into();
        Self {
            before: source.clone(),
            source,
            pairswith: pairswith.into(),
            error: error.into(),
        }
    }

    pub fn with_before(mut self, before: impl Into<String>) -> Self {
        self.before = before.into();
        self
    }

    /// An empty `source` or `pairswith` would match every line.
    pub fn validate(&self, location: &str) -> Result<(), RuleConfigError> {
        if self.source.is_empty() {
            return Err(RuleConfigError::MissingField {
                location: location.to_string(),
                field: "source",
            });
        }
        if self.pairswith.is_empty() {
            return Err(RuleConfigError::MissingField {
                location: location.to_string(),
                field: "pairswith",
            });
        }
        Ok(())
    }
}

/// A `delete_lines` entry: a literal substring or a compiled regex.
#[derive(Debug, Clone)]
pub enum LineDeletion {
    Literal(String),
    Pattern(Regex),
}

impl LineDeletion {
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Self::Literal(text) => line.contains(text.as_str()),
            Self::Pattern(regex) => regex.is_match(line),
        }
    }
}

// =============================================================================
// Rule set
// =============================================================================

/// The validated, already group-filtered input of the translation engine.
///
/// Rules are kept in configured order: the first fully matching rule wins.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    blacklist: Vec<String>,
    replacements: Vec<Replacement>,
    pairs: Vec<PairSpec>,
}

impl RuleSet {
    /// Build a rule set, rejecting the first malformed rule or pair spec.
    pub fn new(
        rules: Vec<Rule>,
        blacklist: Vec<String>,
        replacements: Vec<Replacement>,
        pairs: Vec<PairSpec>,
    ) -> Result<Self, RuleConfigError> {
        for (idx, rule) in rules.iter().enumerate() {
            rule.validate(&format!("rules[{idx}]"))?;
        }
        for (idx, pair) in pairs.iter().enumerate() {
            pair.validate(&format!("pairs[{idx}]"))?;
        }
        Ok(Self {
            rules,
            blacklist,
            replacements,
            pairs,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn blacklist(&self) -> &[String] {
        &self.blacklist
    }

    pub fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    pub fn pairs(&self) -> &[PairSpec] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_matches_all_patterns_in_any_order() {
        let rule = Rule::new(["response", "Client"], "S -> C : response");
        assert!(rule.matches("Client got response 200"));
        assert!(rule.matches("response sent to Client"));
        assert!(!rule.matches("Client timed out"));
    }

    #[test]
    fn test_duplicate_strategy_tags() {
        assert_eq!(DuplicateStrategy::from_tag(""), Some(DuplicateStrategy::Keep));
        assert_eq!(
            DuplicateStrategy::from_tag("remove"),
            Some(DuplicateStrategy::RemoveAll)
        );
        assert_eq!(
            DuplicateStrategy::from_tag("remove_continuous"),
            Some(DuplicateStrategy::RemoveContinuous)
        );
        assert_eq!(
            DuplicateStrategy::from_tag("count_continuous"),
            Some(DuplicateStrategy::CountContinuous)
        );
        assert_eq!(DuplicateStrategy::from_tag("sometimes"), None);
    }

    #[test]
    fn test_pair_spec_before_defaults_to_source() {
        let pair = PairSpec::new("C->S: request", "S->C: response", "ERR");
        assert_eq!(pair.before, "C->S: request");
        let pair = pair.with_before("== reset ==");
        assert_eq!(pair.before, "== reset ==");
    }

    #[test]
    fn test_rule_set_rejects_rule_without_patterns() {
        let rules = vec![
            Rule::new(["hello"], "C -> S : hello"),
            Rule::new(Vec::<String>::new(), "C -> S : bye"),
        ];
        let err = RuleSet::new(rules, vec![], vec![], vec![]).unwrap_err();
        match err {
            RuleConfigError::MissingField { location, field } => {
                assert_eq!(location, "rules[1]");
                assert_eq!(field, "patterns");
            }
            other => panic!("Expected MissingField, got: {other:?}"),
        }
    }

    #[test]
    fn test_rule_set_rejects_rule_without_template() {
        let rules = vec![Rule::new(["hello"], "")];
        let err = RuleSet::new(rules, vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(
            err,
            RuleConfigError::MissingField { field: "print", .. }
        ));
    }

    #[test]
    fn test_rule_set_rejects_pair_without_source() {
        let pairs = vec![PairSpec::new("", "S->C: response", "ERR")];
        let err = RuleSet::new(vec![], vec![], vec![], pairs).unwrap_err();
        assert!(matches!(
            err,
            RuleConfigError::MissingField { field: "source", .. }
        ));
    }

    #[test]
    fn test_line_deletion_literal_and_pattern() {
        let literal = LineDeletion::Literal("heartbeat".to_string());
        let pattern = LineDeletion::Pattern(Regex::new(r"^2017.*slow").unwrap());
        assert!(literal.matches("12:00 heartbeat ok"));
        assert!(!literal.matches("12:00 request"));
        assert!(pattern.matches("2017-07-13 regex lines are very slow"));
        assert!(!pattern.matches("2019-07-13 regex lines are very slow"));
    }
}
