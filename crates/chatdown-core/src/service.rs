//! MarkdownConverter - the main entry point for markup to Markdown conversion.

use once_cell::sync::Lazy;

use crate::rules::{Rule, Rules};
use crate::Result;

static DEFAULT_CONVERTER: Lazy<MarkdownConverter> = Lazy::new(MarkdownConverter::new);

/// Convert one markup fragment with the default pipeline.
///
/// Input must be raw markup: running the result through `convert` again is
/// not meaningful.
pub fn convert(markup: &str) -> String {
    DEFAULT_CONVERTER.convert(markup)
}

/// The service for converting rendered markup to Markdown
#[derive(Debug)]
pub struct MarkdownConverter {
    rules: Rules,
}

impl MarkdownConverter {
    /// Create a converter with the default chat pipeline
    pub fn new() -> Self {
        Self {
            rules: Rules::default(),
        }
    }

    /// Create a converter with a custom pipeline
    pub fn with_rules(rules: Rules) -> Self {
        Self { rules }
    }

    /// Append a rule, or replace an existing rule of the same name
    pub fn add_rule(&mut self, name: &str, rule: Rule) -> &mut Self {
        self.rules.add(name, rule);
        self
    }

    /// Insert a rule before an existing one
    pub fn insert_rule_before(&mut self, anchor: &str, name: &str, rule: Rule) -> Result<&mut Self> {
        self.rules.insert_before(anchor, name, rule)?;
        Ok(self)
    }

    /// Remove a rule by name
    pub fn remove_rule(&mut self, name: &str) -> &mut Self {
        self.rules.remove(name);
        self
    }

    /// Get the current pipeline
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Convert markup to Markdown
    pub fn convert(&self, markup: &str) -> String {
        let markdown = self.rules.apply(markup);
        tracing::debug!(
            stages = self.rules.len(),
            input_len = markup.len(),
            output_len = markdown.len(),
            "Converted markup"
        );
        markdown
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_paragraph() {
        assert_eq!(convert("<p>Hello <strong>world</strong></p>"), "Hello **world**");
    }

    #[test]
    fn test_heading() {
        assert_eq!(convert("<h2>Title</h2>"), "## Title");
    }

    #[test]
    fn test_code_block_is_trimmed_at_document_edges() {
        assert_eq!(convert("<pre><code>x = 1</code></pre>"), "```\nx = 1\n```");
    }

    #[test]
    fn test_code_block_between_paragraphs() {
        let result = convert("<p>Run:</p><pre><code>ls -la\n</code></pre><p>Done.</p>");
        assert_eq!(result, "Run:\n\n\n```\nls -la\n```\nDone.");
    }

    #[test]
    fn test_code_block_keeps_markup_out_of_inline_rules() {
        let result = convert("<pre><code><b>bold</b> &amp;&amp; <i>x</i></code></pre>");
        assert_eq!(result, "```\nbold && x\n```");
    }

    #[test]
    fn test_ordered_lists_restart() {
        let result = convert("<ol><li>a</li><li>b</li></ol><p>then</p><ol><li>c</li></ol>");
        assert_eq!(result, "1. a\n2. b\nthen\n\n1. c");
    }

    #[test]
    fn test_unordered_list_with_inline_markup() {
        let result = convert("<ul>\n<li><strong>Fast</strong>: yes</li>\n<li>Safe</li>\n</ul>");
        assert_eq!(result, "- **Fast**: yes\n\n- Safe");
    }

    #[test]
    fn test_button_text_never_leaks() {
        let result = convert("<p>Answer</p><button aria-label=\"Copy\">Copy code</button>");
        assert_eq!(result, "Answer");
        assert!(!result.contains("Copy"));
    }

    #[test]
    fn test_icons_dropped() {
        let result = convert("<p><svg width=\"16\"><path d=\"M0 0\"></path></svg>Text</p>");
        assert_eq!(result, "Text");
    }

    #[test]
    fn test_link_and_inline_code() {
        let result = convert(
            "<p>See <a href=\"https://docs.rs\">docs</a> for <code>Vec&lt;T&gt;</code>.</p>",
        );
        assert_eq!(result, "See [docs](https://docs.rs) for `Vec<T>`.");
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(convert("<p>one<br>two</p>"), "one\ntwo");
    }

    #[test]
    fn test_unknown_tags_stripped() {
        assert_eq!(convert("<div><span class=\"x\">plain</span></div>"), "plain");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(convert(""), "");
        assert_eq!(convert("   "), "");
    }

    #[test]
    fn test_custom_rule() {
        let mut converter = MarkdownConverter::new();
        converter
            .insert_rule_before(
                "strip-tags",
                "strikethrough",
                Rule::pattern(r"(?i)<(?:del|s)>(.*?)</(?:del|s)>", |caps| {
                    format!("~~{}~~", &caps[1])
                })
                .unwrap(),
            )
            .unwrap();
        assert_eq!(converter.convert("<p><del>old</del> new</p>"), "~~old~~ new");
    }

    #[test]
    fn test_remove_rule() {
        let mut converter = MarkdownConverter::new();
        converter.remove_rule("strong");
        assert_eq!(converter.convert("<b>x</b>"), "x");
    }
}
