//! `{{name}}` placeholder substitution.

use std::collections::{BTreeSet, HashMap};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replace every `{{name}}` in `pattern` with its value from `vars`.
///
/// Whitespace inside the braces is ignored. Names missing from `vars`
/// become the empty string, so template syntax never reaches a recipient.
/// An unclosed `{{` is left as written.
pub fn render(pattern: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = after_open[..end].trim();
        if let Some(value) = vars.get(name) {
            out.push_str(value);
        }
        rest = &after_open[end + CLOSE.len()..];
    }

    out.push_str(rest);
    out
}

/// Placeholder names referenced by `pattern`, sorted and deduplicated.
pub fn placeholders(pattern: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut rest = pattern;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };
        let name = after_open[..end].trim();
        if !name.is_empty() {
            names.insert(name.to_string());
        }
        rest = &after_open[end + CLOSE.len()..];
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_every_occurrence_is_replaced() {
        let out = render("{{x}}-{{x}}-{{ x }}", &vars(&[("x", "7")]));
        assert_eq!(out, "7-7-7");
    }

    #[test]
    fn test_missing_variable_becomes_empty() {
        let out = render("Hello {{name}}, {{unknown}}done", &vars(&[("name", "Asha")]));
        assert_eq!(out, "Hello Asha, done");
        assert!(!out.contains("{{"));
    }

    #[test]
    fn test_text_without_placeholders_is_unchanged() {
        let text = "Office closed on Friday. Braces {like this} stay.";
        let once = render(text, &vars(&[("a", "b")]));
        assert_eq!(once, text);
        assert_eq!(render(&once, &vars(&[("a", "b")])), text);
    }

    #[test]
    fn test_unclosed_placeholder_is_left_alone() {
        assert_eq!(render("a {{b", &vars(&[("b", "x")])), "a {{b");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let out = render("{{a}}", &vars(&[("a", "{{b}}"), ("b", "nope")]));
        assert_eq!(out, "{{b}}");
    }

    #[test]
    fn test_placeholders_are_collected() {
        let names = placeholders("{{ name }} {{date}} {{name}} {{}}");
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["date".to_string(), "name".to_string()]
        );
    }
}
