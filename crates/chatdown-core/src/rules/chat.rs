//! The chat conversion pipeline.
//!
//! Every opening-tag pattern requires the tag name to end at whitespace, `/`
//! or `>`, so `<b` never matches `<br>` and `<code` never matches
//! `<code-block>`. Inline patterns use `.` and stay on one line; block
//! patterns use `[\s\S]` and may span lines.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{Rule, Rules};
use crate::utilities::{decode_entities, strip_tags};

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

static SVG: Lazy<Regex> = Lazy::new(|| regex(r"(?i)<svg(?:[\s/][^>]*)?>[\s\S]*?</svg>"));
static BUTTON: Lazy<Regex> =
    Lazy::new(|| regex(r"(?i)<button(?:[\s/][^>]*)?>[\s\S]*?</button>"));
static CODE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    regex(r"(?i)<(?:code-block|pre)(?:[\s/][^>]*)?>[\s\S]*?</(?:code-block|pre)>")
});
static CODE_BLOCK_INNER: Lazy<Regex> =
    Lazy::new(|| regex(r"(?i)<code(?:[\s/][^>]*)?>([\s\S]*?)</code>"));
static HEADING: Lazy<Regex> = Lazy::new(|| regex(r"(?i)<h([1-3])(?:[\s/][^>]*)?>(.*?)</h[1-3]>"));
static STRONG: Lazy<Regex> =
    Lazy::new(|| regex(r"(?i)<(?:strong|b)(?:[\s/][^>]*)?>(.*?)</(?:strong|b)>"));
static EMPHASIS: Lazy<Regex> = Lazy::new(|| regex(r"(?i)<(?:em|i)(?:[\s/][^>]*)?>(.*?)</(?:em|i)>"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| regex(r"(?i)<code(?:[\s/][^>]*)?>(.*?)</code>"));
static LINK: Lazy<Regex> =
    Lazy::new(|| regex(r#"(?i)<a(?:\s[^>]*?)?\shref="([^"]*)"[^>]*>(.*?)</a>"#));
static UNORDERED_LIST: Lazy<Regex> =
    Lazy::new(|| regex(r"(?i)<ul(?:[\s/][^>]*)?>([\s\S]*?)</ul>"));
static ORDERED_LIST: Lazy<Regex> = Lazy::new(|| regex(r"(?i)<ol(?:[\s/][^>]*)?>([\s\S]*?)</ol>"));
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| regex(r"(?i)<li(?:[\s/][^>]*)?>(.*?)</li>"));
static PARAGRAPH: Lazy<Regex> = Lazy::new(|| regex(r"(?i)<p(?:[\s/][^>]*)?>(.*?)</p>"));
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| regex(r"(?i)<br\s*/?>"));

/// Create the default chat conversion pipeline
pub fn chat_rules() -> Rules {
    let mut rules = Rules::new();
    rules.add("strip-chrome", strip_chrome_rule());
    rules.add("code-blocks", code_block_rule());
    rules.add("headings", heading_rule());
    rules.add("strong", strong_rule());
    rules.add("emphasis", emphasis_rule());
    rules.add("inline-code", inline_code_rule());
    rules.add("links", link_rule());
    rules.add("unordered-lists", unordered_list_rule());
    rules.add("ordered-lists", ordered_list_rule());
    rules.add("paragraphs", paragraph_rule());
    rules.add("line-breaks", line_break_rule());
    rules.add("strip-tags", strip_tags_rule());
    rules.add("trim", trim_rule());
    rules
}

/// Icons and buttons are UI chrome; drop them with their content.
fn strip_chrome_rule() -> Rule {
    Rule::map(|input| {
        let without_svg = SVG.replace_all(input, "");
        BUTTON.replace_all(&without_svg, "").into_owned()
    })
}

fn code_block_rule() -> Rule {
    Rule::replace(CODE_BLOCK.clone(), |caps| {
        match CODE_BLOCK_INNER.captures(&caps[0]) {
            Some(code) => format!("\n```\n{}\n```\n", strip_tags(&code[1]).trim()),
            None => String::new(),
        }
    })
}

fn heading_rule() -> Rule {
    Rule::replace(HEADING.clone(), |caps| {
        let level: usize = caps[1].parse().unwrap_or(1);
        format!("{} {}\n", "#".repeat(level), caps[2].trim())
    })
}

fn strong_rule() -> Rule {
    Rule::replace(STRONG.clone(), |caps| format!("**{}**", &caps[1]))
}

fn emphasis_rule() -> Rule {
    Rule::replace(EMPHASIS.clone(), |caps| format!("*{}*", &caps[1]))
}

fn inline_code_rule() -> Rule {
    Rule::replace(INLINE_CODE.clone(), |caps| format!("`{}`", &caps[1]))
}

fn link_rule() -> Rule {
    Rule::replace(LINK.clone(), |caps| format!("[{}]({})", &caps[2], &caps[1]))
}

fn unordered_list_rule() -> Rule {
    Rule::replace(UNORDERED_LIST.clone(), |caps| {
        LIST_ITEM
            .replace_all(&caps[1], |item: &Captures| format!("- {}\n", &item[1]))
            .into_owned()
    })
}

/// Numbering restarts at 1 for every list block.
fn ordered_list_rule() -> Rule {
    Rule::replace(ORDERED_LIST.clone(), |caps| {
        let mut counter = 0;
        LIST_ITEM
            .replace_all(&caps[1], |item: &Captures| {
                counter += 1;
                format!("{}. {}\n", counter, &item[1])
            })
            .into_owned()
    })
}

fn paragraph_rule() -> Rule {
    Rule::replace(PARAGRAPH.clone(), |caps| format!("{}\n\n", &caps[1]))
}

fn line_break_rule() -> Rule {
    Rule::replace(LINE_BREAK.clone(), |_| "\n".to_string())
}

fn strip_tags_rule() -> Rule {
    Rule::map(|input| decode_entities(strip_tags(input).trim()))
}

fn trim_rule() -> Rule {
    Rule::map(|input| input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(name: &str, input: &str) -> String {
        chat_rules().get(name).unwrap().apply(input)
    }

    #[test]
    fn test_strip_svg_and_buttons() {
        let input = "<div>a<svg viewBox=\"0 0 1 1\"><path d=\"M0\"/></svg>b<button class=\"copy\"><span>Copy</span>\n</button>c</div>";
        assert_eq!(stage("strip-chrome", input), "<div>abc</div>");
    }

    #[test]
    fn test_code_block_fenced() {
        assert_eq!(
            stage("code-blocks", "<pre><code>x = 1</code></pre>"),
            "\n```\nx = 1\n```\n"
        );
    }

    #[test]
    fn test_code_block_custom_element() {
        let input = "<code-block><div class=\"header\">python</div><pre><code class=\"language-python\">  <span>print</span>(1)\n</code></pre></code-block>";
        assert_eq!(stage("code-blocks", input), "\n```\nprint(1)\n```\n</code-block>");
    }

    #[test]
    fn test_code_block_without_code_is_dropped() {
        assert_eq!(stage("code-blocks", "a<pre>plain</pre>b"), "ab");
    }

    #[test]
    fn test_headings() {
        assert_eq!(stage("headings", "<h1> One </h1>"), "# One\n");
        assert_eq!(stage("headings", "<h2 id=\"t\">Two</h2>"), "## Two\n");
        assert_eq!(stage("headings", "<h3>Three</h3>"), "### Three\n");
        assert_eq!(stage("headings", "<h4>Four</h4>"), "<h4>Four</h4>");
    }

    #[test]
    fn test_strong_and_emphasis() {
        assert_eq!(stage("strong", "<b>a</b> <strong class=\"x\">b</strong>"), "**a** **b**");
        assert_eq!(stage("emphasis", "<i>a</i> <em>b</em>"), "*a* *b*");
    }

    #[test]
    fn test_strong_does_not_match_line_break() {
        assert_eq!(stage("strong", "a<br>b</b>"), "a<br>b</b>");
    }

    #[test]
    fn test_first_closing_tag_wins() {
        assert_eq!(stage("strong", "<b>a <b>b</b> c</b>"), "**a <b>b** c</b>");
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(stage("inline-code", "use <code>cargo</code> here"), "use `cargo` here");
    }

    #[test]
    fn test_links() {
        assert_eq!(
            stage("links", "<a href=\"https://example.com\" target=\"_blank\">Example</a>"),
            "[Example](https://example.com)"
        );
        assert_eq!(
            stage("links", "<a class=\"l\" href=\"/x\">X</a>"),
            "[X](/x)"
        );
        assert_eq!(stage("links", "<a name=\"anchor\">A</a>"), "<a name=\"anchor\">A</a>");
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(
            stage("unordered-lists", "<ul><li>a</li><li>b</li></ul>"),
            "- a\n- b\n"
        );
    }

    #[test]
    fn test_ordered_list_counter_resets_per_block() {
        assert_eq!(
            stage("ordered-lists", "<ol><li>a</li><li>b</li></ol><ol><li>c</li></ol>"),
            "1. a\n2. b\n1. c\n"
        );
    }

    #[test]
    fn test_paragraph_and_line_break() {
        assert_eq!(stage("paragraphs", "<p class=\"x\">Hi</p>"), "Hi\n\n");
        assert_eq!(stage("line-breaks", "a<br>b<br/>c<BR />d"), "a\nb\nc\nd");
    }

    #[test]
    fn test_strip_tags_decodes_entities() {
        assert_eq!(
            stage("strip-tags", "  <span>a &amp; b</span> &lt;tag&gt; "),
            "a & b <tag>"
        );
    }
}
