//! Rule pipeline for markup to Markdown conversion.

mod chat;
mod rule;

pub use chat::chat_rules;
pub use rule::{Rule, TransformFn};

use indexmap::IndexMap;

use crate::{ConvertError, Result};

/// Ordered collection of named rules.
///
/// Rules run in insertion order, each one over the output of the previous.
#[derive(Debug)]
pub struct Rules {
    rules: IndexMap<String, Rule>,
}

impl Rules {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Append a rule, or replace an existing rule of the same name in place
    pub fn add(&mut self, name: &str, rule: Rule) {
        self.rules.insert(name.to_string(), rule);
    }

    /// Insert a rule directly before `anchor`
    pub fn insert_before(&mut self, anchor: &str, name: &str, rule: Rule) -> Result<()> {
        if name != anchor {
            self.rules.shift_remove(name);
        }
        let index = self
            .rules
            .get_index_of(anchor)
            .ok_or_else(|| ConvertError::UnknownRule(anchor.to_string()))?;
        self.rules.shift_insert(index, name.to_string(), rule);
        Ok(())
    }

    /// Remove a rule, keeping the order of the rest
    pub fn remove(&mut self, name: &str) -> Option<Rule> {
        self.rules.shift_remove(name)
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Rule names in execution order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule in order
    pub fn apply(&self, input: &str) -> String {
        self.rules
            .values()
            .fold(input.to_string(), |text, rule| rule.apply(&text))
    }
}

impl Default for Rules {
    fn default() -> Self {
        chat_rules()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffix(s: &'static str) -> Rule {
        Rule::map(move |input| format!("{input}{s}"))
    }

    #[test]
    fn test_rules_run_in_order() {
        let mut rules = Rules::new();
        rules.add("a", suffix("a"));
        rules.add("b", suffix("b"));
        assert_eq!(rules.apply(">"), ">ab");
    }

    #[test]
    fn test_add_replaces_in_place() {
        let mut rules = Rules::new();
        rules.add("a", suffix("a"));
        rules.add("b", suffix("b"));
        rules.add("a", suffix("A"));
        assert_eq!(rules.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(rules.apply(""), "Ab");
    }

    #[test]
    fn test_insert_before() {
        let mut rules = Rules::new();
        rules.add("a", suffix("a"));
        rules.add("c", suffix("c"));
        rules.insert_before("c", "b", suffix("b")).unwrap();
        assert_eq!(rules.apply(""), "abc");
    }

    #[test]
    fn test_insert_before_moves_existing() {
        let mut rules = Rules::new();
        rules.add("a", suffix("a"));
        rules.add("b", suffix("b"));
        rules.add("c", suffix("c"));
        rules.insert_before("a", "c", suffix("c")).unwrap();
        assert_eq!(rules.names().collect::<Vec<_>>(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_insert_before_unknown_anchor() {
        let mut rules = Rules::new();
        let result = rules.insert_before("missing", "x", suffix("x"));
        assert!(matches!(result, Err(ConvertError::UnknownRule(name)) if name == "missing"));
    }

    #[test]
    fn test_remove() {
        let mut rules = Rules::new();
        rules.add("a", suffix("a"));
        rules.add("b", suffix("b"));
        assert!(rules.remove("a").is_some());
        assert!(rules.remove("a").is_none());
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.apply(""), "b");
    }

    #[test]
    fn test_default_pipeline_order() {
        let names: Vec<_> = Rules::default().names().map(str::to_string).collect();
        assert_eq!(
            names,
            vec![
                "strip-chrome",
                "code-blocks",
                "headings",
                "strong",
                "emphasis",
                "inline-code",
                "links",
                "unordered-lists",
                "ordered-lists",
                "paragraphs",
                "line-breaks",
                "strip-tags",
                "trim",
            ]
        );
    }
}
