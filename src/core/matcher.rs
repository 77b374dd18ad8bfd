// Logalizer - core/matcher.rs
//
// Rule selection for a single raw line.
// Plain substring containment only; rule order is the priority.

use crate::core::model::Rule;

/// Return the first rule, in configured order, whose patterns are all
/// contained in `line`.
///
/// First match wins: a later rule is never preferred for being more
/// specific. Returns `None` for an empty or exhausted rule list.
pub fn find_rule<'a>(line: &str, rules: &'a [Rule]) -> Option<&'a Rule> {
    rules.iter().find(|rule| rule.matches(line))
}

/// True if `line` contains any blacklisted substring.
pub fn is_blacklisted(line: &str, blacklist: &[String]) -> bool {
    blacklist.iter().any(|entry| line.contains(entry.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            Rule::new(["say_hello"], "client -> server : hello"),
            Rule::new(["say_hello", "DisplayClient"], "display -> server : hello"),
        ];
        let line = "14:29:05 [Networking] DisplayClient say_hello: connecting";
        let found = find_rule(line, &rules).unwrap();
        assert_eq!(found.template, "client -> server : hello");
    }

    #[test]
    fn test_later_rule_used_when_earlier_does_not_match() {
        let rules = vec![
            Rule::new(["say_hello", "Printer"], "printer -> server : hello"),
            Rule::new(["say_hello"], "client -> server : hello"),
        ];
        let found = find_rule("DisplayClient say_hello", &rules).unwrap();
        assert_eq!(found.template, "client -> server : hello");
    }

    #[test]
    fn test_no_rules_or_no_match() {
        assert!(find_rule("anything", &[]).is_none());
        let rules = vec![Rule::new(["start_routine"], "client -> server : start")];
        assert!(find_rule("stop_routine", &rules).is_none());
    }

    #[test]
    fn test_blacklist_substring() {
        let blacklist = vec!["Do not translate".to_string(), "noise".to_string()];
        assert!(is_blacklisted("say_hello: Do not translate this line", &blacklist));
        assert!(is_blacklisted("some noise here", &blacklist));
        assert!(!is_blacklisted("say_hello: connecting", &blacklist));
        assert!(!is_blacklisted("say_hello", &[]));
    }
}
