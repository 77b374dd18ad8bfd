// Logalizer - core/config.rs
//
// Rule configuration loading, validation, and group selection.
// Core layer: accepts JSON/CSV strings, never touches the filesystem.
// I/O is handled by app::job which feeds content here.
//
// Every rule is validated once, here, before any log line is read. A
// defect is reported with the location of the offending entry rather
// than skipped.

use crate::core::model::{
    DuplicateStrategy, LineDeletion, PairSpec, Replacement, Rule, RuleSet, VariableSpec,
};
use crate::util::constants;
use crate::util::error::RuleConfigError;
use regex::Regex;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

// =============================================================================
// JSON deserialization structures (raw input)
// =============================================================================

/// Raw rule configuration as deserialized from JSON.
/// This is validated and compiled into a `TranslationConfig` for runtime use.
///
/// Unknown keys are ignored, so configuration files can carry notes such
/// as sample log lines.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigDefinition {
    pub translations: Vec<RuleDef>,
    pub translations_csv: Option<String>,
    pub blacklist: Vec<String>,
    pub delete_lines: Vec<String>,
    #[serde(deserialize_with = "ordered_pairs")]
    pub replace_words: Vec<(String, String)>,
    pub pairs: Vec<PairDef>,
    #[serde(alias = "disable_category")]
    pub disable_group: Vec<String>,
    pub wrap_text_pre: Vec<String>,
    pub wrap_text_post: Vec<String>,
    pub auto_new_line: Option<bool>,
    pub translation_file: Option<String>,
    pub backup_file: Option<String>,
    pub execute: Vec<String>,
}

/// One entry of `translations`. Required fields are optional here so that
/// their absence is reported with the rule's location.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RuleDef {
    #[serde(alias = "category")]
    pub group: Option<String>,
    pub enable: Option<bool>,
    pub patterns: Option<Vec<String>>,
    pub print: Option<String>,
    pub variables: Vec<VariableDef>,
    pub duplicates: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct VariableDef {
    pub startswith: Option<String>,
    pub endswith: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PairDef {
    pub source: Option<String>,
    pub pairswith: Option<String>,
    pub before: Option<String>,
    pub error: Option<String>,
}

/// A rule definition together with where it came from, for error messages.
#[derive(Debug, Clone)]
pub struct LocatedRule {
    pub location: String,
    pub def: RuleDef,
}

/// Deserialize a JSON object into `(key, value)` pairs in file order.
fn ordered_pairs<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of search -> replace strings")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((search, replace)) = map.next_entry::<String, String>()? {
                pairs.push((search, replace));
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairsVisitor)
}

/// Parse a JSON string into a `ConfigDefinition`.
///
/// `source_path` is used for error messages only (not for I/O).
pub fn parse_config_json(
    json_content: &str,
    source_path: &Path,
) -> Result<ConfigDefinition, RuleConfigError> {
    serde_json::from_str(json_content).map_err(|e| RuleConfigError::JsonParse {
        path: source_path.to_path_buf(),
        source: e,
    })
}

// =============================================================================
// CSV rule tables
// =============================================================================

/// One row of a CSV rule table. Missing columns read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRuleRow {
    enable: String,
    group: String,
    print: String,
    duplicates: String,
    pattern1: String,
    pattern2: String,
    pattern3: String,
    variable1_starts_with: String,
    variable1_ends_with: String,
    variable2_starts_with: String,
    variable2_ends_with: String,
    variable3_starts_with: String,
    variable3_ends_with: String,
}

impl CsvRuleRow {
    fn into_rule_def(self) -> RuleDef {
        let disabled = constants::CSV_DISABLED_VALUES
            .iter()
            .any(|v| self.enable.eq_ignore_ascii_case(v));

        let patterns: Vec<String> = [self.pattern1, self.pattern2, self.pattern3]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();

        let variables = [
            (self.variable1_starts_with, self.variable1_ends_with),
            (self.variable2_starts_with, self.variable2_ends_with),
            (self.variable3_starts_with, self.variable3_ends_with),
        ]
        .into_iter()
        .filter(|(start, _)| !start.is_empty())
        .map(|(start, end)| VariableDef {
            startswith: Some(start),
            endswith: Some(end),
        })
        .collect();

        RuleDef {
            group: non_empty(self.group),
            enable: Some(!disabled),
            patterns: Some(patterns),
            print: Some(self.print),
            variables,
            duplicates: non_empty(self.duplicates),
        }
    }
}

/// Parse a CSV rule table.
///
/// Columns: `enable, group, print, duplicates, pattern1..pattern3,
/// variable1_starts_with, variable1_ends_with, ... variable3_ends_with`.
/// Extra columns are ignored; cells are trimmed.
pub fn parse_rules_csv(
    csv_content: &str,
    source_path: &Path,
) -> Result<Vec<LocatedRule>, RuleConfigError> {
    let file_name = source_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_path.display().to_string());

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(csv_content.as_bytes());

    let mut rules = Vec::new();
    for (idx, row) in reader.deserialize::<CsvRuleRow>().enumerate() {
        let row = row.map_err(|e| RuleConfigError::CsvParse {
            path: source_path.to_path_buf(),
            source: e,
        })?;
        rules.push(LocatedRule {
            // Row 1 is the header.
            location: format!("{file_name} row {}", idx + 2),
            def: row.into_rule_def(),
        });
    }

    tracing::debug!(
        file = %source_path.display(),
        rules = rules.len(),
        max_patterns = constants::CSV_MAX_PATTERNS,
        "CSV rule table parsed"
    );

    Ok(rules)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// =============================================================================
// Validation and compilation
// =============================================================================

/// Fully validated rule configuration for one run.
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    /// Every configured rule, before group selection, in order.
    pub rules: Vec<Rule>,
    pub blacklist: Vec<String>,
    pub replacements: Vec<Replacement>,
    pub pairs: Vec<PairSpec>,
    pub deletions: Vec<LineDeletion>,
    /// Groups disabled by default (`disable_group`).
    pub disabled_groups: Vec<String>,
    pub wrap_text_pre: Vec<String>,
    pub wrap_text_post: Vec<String>,
    pub auto_new_line: bool,
    /// Output path template (path variables unexpanded).
    pub translation_file: String,
    /// Backup path template (path variables unexpanded).
    pub backup_file: Option<String>,
    pub execute: Vec<String>,
}

/// Validate a `ConfigDefinition` and compile it into a `TranslationConfig`.
///
/// `csv_rules`, when given, replaces the JSON `translations` list.
///
/// Validates:
/// - every rule has non-empty `patterns` and `print`
/// - every variable has `startswith` and `endswith`
/// - `duplicates` tags are known
/// - pair specs have `source`, `pairswith` and `error`
/// - `delete_lines` regexes compile and are within size limits
pub fn validate_and_compile(
    def: ConfigDefinition,
    csv_rules: Option<Vec<LocatedRule>>,
) -> Result<TranslationConfig, RuleConfigError> {
    let located: Vec<LocatedRule> = match csv_rules {
        Some(rows) => {
            if !def.translations.is_empty() {
                tracing::warn!(
                    "'translations' is ignored because 'translations_csv' is configured"
                );
            }
            rows
        }
        None => def
            .translations
            .into_iter()
            .enumerate()
            .map(|(idx, def)| LocatedRule {
                location: format!("translations[{idx}]"),
                def,
            })
            .collect(),
    };

    let rules = located
        .into_iter()
        .map(|LocatedRule { location, def }| compile_rule(def, &location))
        .collect::<Result<Vec<_>, _>>()?;

    let pairs = def
        .pairs
        .into_iter()
        .enumerate()
        .map(|(idx, pair)| compile_pair(pair, &format!("pairs[{idx}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let deletions = def
        .delete_lines
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| compile_deletion(entry, &format!("delete_lines[{idx}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let regex_count = deletions
        .iter()
        .filter(|d| matches!(d, LineDeletion::Pattern(_)))
        .count();
    if regex_count > 0 {
        tracing::info!(
            count = regex_count,
            "delete_lines contains regex entries; plain substrings are faster"
        );
    }

    let replacements = def
        .replace_words
        .into_iter()
        .map(|(search, replace)| Replacement::new(search, replace))
        .collect();

    tracing::debug!(
        rules = rules.len(),
        pairs = pairs.len(),
        deletions = deletions.len(),
        "Rule configuration compiled"
    );

    Ok(TranslationConfig {
        rules,
        blacklist: def.blacklist,
        replacements,
        pairs,
        deletions,
        disabled_groups: def.disable_group,
        wrap_text_pre: def.wrap_text_pre,
        wrap_text_post: def.wrap_text_post,
        auto_new_line: def.auto_new_line.unwrap_or(true),
        translation_file: def
            .translation_file
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| constants::DEFAULT_TRANSLATION_FILE.to_string()),
        backup_file: def.backup_file.filter(|f| !f.is_empty()),
        execute: def.execute,
    })
}

fn compile_rule(def: RuleDef, location: &str) -> Result<Rule, RuleConfigError> {
    let missing = |field: &'static str| RuleConfigError::MissingField {
        location: location.to_string(),
        field,
    };

    let patterns = def.patterns.ok_or_else(|| missing("patterns"))?;
    let template = def.print.ok_or_else(|| missing("print"))?;

    let variables = def
        .variables
        .into_iter()
        .map(|v| {
            Ok(VariableSpec {
                startswith: v.startswith.ok_or_else(|| missing("variables.startswith"))?,
                endswith: v.endswith.ok_or_else(|| missing("variables.endswith"))?,
            })
        })
        .collect::<Result<Vec<_>, RuleConfigError>>()?;

    let duplicates = match def.duplicates {
        Some(tag) => DuplicateStrategy::from_tag(&tag).ok_or_else(|| {
            RuleConfigError::UnknownDuplicateStrategy {
                location: location.to_string(),
                value: tag.clone(),
            }
        })?,
        None => DuplicateStrategy::Keep,
    };

    let rule = Rule {
        group: def.group.filter(|g| !g.is_empty()),
        enabled: def.enable.unwrap_or(true),
        patterns,
        variables,
        template,
        duplicates,
    };
    rule.validate(location)?;
    Ok(rule)
}

fn compile_pair(def: PairDef, location: &str) -> Result<PairSpec, RuleConfigError> {
    let missing = |field: &'static str| RuleConfigError::MissingField {
        location: location.to_string(),
        field,
    };

    let source = def.source.ok_or_else(|| missing("source"))?;
    let pairswith = def.pairswith.ok_or_else(|| missing("pairswith"))?;
    let error = def.error.ok_or_else(|| missing("error"))?;

    let mut pair = PairSpec::new(source, pairswith, error);
    if let Some(before) = def.before.filter(|b| !b.is_empty()) {
        pair = pair.with_before(before);
    }
    pair.validate(location)?;
    Ok(pair)
}

fn compile_deletion(entry: String, location: &str) -> Result<LineDeletion, RuleConfigError> {
    if !entry.contains(constants::REGEX_META_CHARS) {
        return Ok(LineDeletion::Literal(entry));
    }
    compile_regex(location, &entry).map(LineDeletion::Pattern)
}

/// Compile a regex pattern with length validation to prevent ReDoS.
fn compile_regex(location: &str, pattern: &str) -> Result<Regex, RuleConfigError> {
    if pattern.len() > constants::MAX_REGEX_PATTERN_LENGTH {
        return Err(RuleConfigError::RegexTooLong {
            location: location.to_string(),
            length: pattern.len(),
            max_length: constants::MAX_REGEX_PATTERN_LENGTH,
        });
    }

    Regex::new(pattern).map_err(|e| RuleConfigError::InvalidRegex {
        location: location.to_string(),
        pattern: pattern.to_string(),
        source: e,
    })
}

// =============================================================================
// Group selection
// =============================================================================

/// Group enable/disable choice made on the command line.
///
/// `enable` wins over `disable`; with neither, the configuration's own
/// `enable` flags and `disable_group` list apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSelection {
    pub enable: Vec<String>,
    pub disable: Vec<String>,
}

impl GroupSelection {
    /// Parse comma-separated group lists, trimming whitespace.
    pub fn from_lists(enable: Option<&str>, disable: Option<&str>) -> Self {
        let split = |list: Option<&str>| -> Vec<String> {
            list.map(|l| {
                l.split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
        };
        Self {
            enable: split(enable),
            disable: split(disable),
        }
    }

    fn includes(&self, rule: &Rule, disabled_groups: &[String]) -> bool {
        let in_list = |list: &[String]| rule.group.as_ref().is_some_and(|g| list.contains(g));

        if !self.enable.is_empty() {
            in_list(&self.enable)
        } else if !self.disable.is_empty() {
            !in_list(&self.disable)
        } else {
            rule.enabled && !in_list(disabled_groups)
        }
    }
}

impl TranslationConfig {
    /// Build the engine input for `selection`. Rule order is preserved.
    pub fn rule_set(&self, selection: &GroupSelection) -> Result<RuleSet, RuleConfigError> {
        let rules: Vec<Rule> = self
            .rules
            .iter()
            .filter(|rule| selection.includes(rule, &self.disabled_groups))
            .cloned()
            .collect();

        tracing::info!(
            selected = rules.len(),
            configured = self.rules.len(),
            "Rules selected"
        );

        RuleSet::new(
            rules,
            self.blacklist.clone(),
            self.replacements.clone(),
            self.pairs.clone(),
        )
    }
}

// =============================================================================
// Sample configuration (embedded at compile time)
// =============================================================================

/// Annotated sample configuration printed by `--config-help`.
pub fn sample_config() -> &'static str {
    include_str!("../../configs/sample.json")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn compile(json: &str) -> Result<TranslationConfig, RuleConfigError> {
        let def = parse_config_json(json, &PathBuf::from("test.json"))?;
        validate_and_compile(def, None)
    }

    #[test]
    fn test_sample_config_compiles() {
        let config = compile(sample_config()).unwrap();
        assert_eq!(config.rules.len(), 4);
        assert_eq!(config.pairs.len(), 1);
        assert_eq!(config.wrap_text_pre, vec!["@startuml", "skinparam dpi 300"]);
        assert!(config.auto_new_line);
        assert!(matches!(config.deletions[0], LineDeletion::Literal(_)));
        assert!(matches!(config.deletions[1], LineDeletion::Pattern(_)));
    }

    #[test]
    fn test_absent_keys_mean_nothing_configured() {
        let config = compile("{}").unwrap();
        assert!(config.rules.is_empty());
        assert!(config.blacklist.is_empty());
        assert!(config.pairs.is_empty());
        assert_eq!(config.translation_file, constants::DEFAULT_TRANSLATION_FILE);
        assert!(config.backup_file.is_none());
    }

    #[test]
    fn test_rule_fields_compiled() {
        let config = compile(
            r#"{ "translations": [ {
                "category": "Net",
                "patterns": ["a", "b"],
                "print": "A -> B : ${1}",
                "variables": [ { "startswith": "id=", "endswith": ";" } ],
                "duplicates": "remove"
            } ] }"#,
        )
        .unwrap();
        let rule = &config.rules[0];
        assert_eq!(rule.group.as_deref(), Some("Net"));
        assert_eq!(rule.patterns, vec!["a", "b"]);
        assert_eq!(rule.variables, vec![VariableSpec::new("id=", ";")]);
        assert_eq!(rule.duplicates, DuplicateStrategy::RemoveAll);
        assert!(rule.enabled);
    }

    #[test]
    fn test_missing_patterns_names_rule() {
        let err = compile(
            r#"{ "translations": [
                { "patterns": ["a"], "print": "ok" },
                { "print": "no patterns" }
            ] }"#,
        )
        .unwrap_err();
        match err {
            RuleConfigError::MissingField { location, field } => {
                assert_eq!(location, "translations[1]");
                assert_eq!(field, "patterns");
            }
            other => panic!("Expected MissingField, got: {other:?}"),
        }
    }

    #[test]
    fn test_empty_print_rejected() {
        let err = compile(r#"{ "translations": [ { "patterns": ["a"], "print": "" } ] }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            RuleConfigError::MissingField { field: "print", .. }
        ));
    }

    #[test]
    fn test_variable_without_end_rejected() {
        let err = compile(
            r#"{ "translations": [ {
                "patterns": ["a"], "print": "x",
                "variables": [ { "startswith": "id=" } ]
            } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RuleConfigError::MissingField {
                field: "variables.endswith",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_duplicates_rejected() {
        let err = compile(
            r#"{ "translations": [ { "patterns": ["a"], "print": "x", "duplicates": "often" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RuleConfigError::UnknownDuplicateStrategy { .. }
        ));
    }

    #[test]
    fn test_pair_before_defaults_to_source() {
        let config = compile(
            r#"{ "pairs": [ { "source": "req", "pairswith": "resp", "error": "ERR" } ] }"#,
        )
        .unwrap();
        assert_eq!(config.pairs[0].before, "req");
    }

    #[test]
    fn test_pair_without_error_rejected() {
        let err =
            compile(r#"{ "pairs": [ { "source": "req", "pairswith": "resp" } ] }"#).unwrap_err();
        match err {
            RuleConfigError::MissingField { location, field } => {
                assert_eq!(location, "pairs[0]");
                assert_eq!(field, "error");
            }
            other => panic!("Expected MissingField, got: {other:?}"),
        }
    }

    #[test]
    fn test_replace_words_keep_file_order() {
        let config =
            compile(r#"{ "replace_words": { "zeta": "z", "alpha": "a", "mid": "m" } }"#).unwrap();
        let searches: Vec<&str> = config
            .replacements
            .iter()
            .map(|r| r.search.as_str())
            .collect();
        assert_eq!(searches, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_invalid_delete_regex() {
        let err = compile(r#"{ "delete_lines": ["[unclosed"] }"#).unwrap_err();
        assert!(matches!(err, RuleConfigError::InvalidRegex { .. }));
    }

    #[test]
    fn test_delete_regex_too_long() {
        let pattern = format!("{}.", "a".repeat(constants::MAX_REGEX_PATTERN_LENGTH));
        let json = format!(r#"{{ "delete_lines": ["{pattern}"] }}"#);
        let err = compile(&json).unwrap_err();
        assert!(matches!(err, RuleConfigError::RegexTooLong { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = compile("{ translations: ").unwrap_err();
        assert!(matches!(err, RuleConfigError::JsonParse { .. }));
    }

    const CSV_TABLE: &str = "\
enable,group,print,duplicates,pattern1,pattern2,pattern3,variable1_starts_with,variable1_ends_with
yes,Net,client -> server : hello,remove_continuous,say_hello,,,,
no,Net,client -> server : bye,,say_bye,,,,
yes, Boot ,boot ${1},,start_routine,state=,,state=,\", entering\"
";

    #[test]
    fn test_csv_rules_compiled() {
        let rows = parse_rules_csv(CSV_TABLE, &PathBuf::from("conf/rules.csv")).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].location, "rules.csv row 2");

        let config = validate_and_compile(ConfigDefinition::default(), Some(rows)).unwrap();
        assert_eq!(config.rules[0].duplicates, DuplicateStrategy::RemoveContinuous);
        assert!(!config.rules[1].enabled);
        let boot = &config.rules[2];
        assert_eq!(boot.group.as_deref(), Some("Boot"));
        assert_eq!(boot.patterns, vec!["start_routine", "state="]);
        assert_eq!(boot.variables, vec![VariableSpec::new("state=", ", entering")]);
    }

    #[test]
    fn test_csv_row_without_patterns_rejected() {
        let table = "enable,group,print,pattern1\nyes,Net,hello,\n";
        let rows = parse_rules_csv(table, &PathBuf::from("rules.csv")).unwrap();
        let err = validate_and_compile(ConfigDefinition::default(), Some(rows)).unwrap_err();
        match err {
            RuleConfigError::MissingField { location, field } => {
                assert_eq!(location, "rules.csv row 2");
                assert_eq!(field, "patterns");
            }
            other => panic!("Expected MissingField, got: {other:?}"),
        }
    }

    #[test]
    fn test_csv_replaces_json_translations() {
        let def = parse_config_json(
            r#"{ "translations": [ { "patterns": ["json"], "print": "from json" } ] }"#,
            &PathBuf::from("test.json"),
        )
        .unwrap();
        let rows = parse_rules_csv(
            "enable,print,pattern1\nyes,from csv,csv\n",
            &PathBuf::from("rules.csv"),
        )
        .unwrap();
        let config = validate_and_compile(def, Some(rows)).unwrap();
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].template, "from csv");
    }

    const GROUPED: &str = r#"{
        "disable_group": ["Noise"],
        "translations": [
            { "group": "Net", "patterns": ["a"], "print": "net" },
            { "group": "Noise", "patterns": ["a"], "print": "noise" },
            { "group": "Debug", "enable": false, "patterns": ["a"], "print": "debug" },
            { "patterns": ["a"], "print": "ungrouped" }
        ]
    }"#;

    fn selected(selection: &GroupSelection) -> Vec<String> {
        compile(GROUPED)
            .unwrap()
            .rule_set(selection)
            .unwrap()
            .rules()
            .iter()
            .map(|r| r.template.clone())
            .collect()
    }

    #[test]
    fn test_default_selection_uses_config_flags() {
        assert_eq!(selected(&GroupSelection::default()), vec!["net", "ungrouped"]);
    }

    #[test]
    fn test_enable_selection_keeps_only_listed_groups() {
        let selection = GroupSelection::from_lists(Some("Debug, Noise"), Some("Net"));
        assert_eq!(selected(&selection), vec!["noise", "debug"]);
    }

    #[test]
    fn test_disable_selection_overrides_config() {
        let selection = GroupSelection::from_lists(None, Some("Net"));
        assert_eq!(selected(&selection), vec!["noise", "debug", "ungrouped"]);
    }
}
