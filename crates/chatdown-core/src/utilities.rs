//! Utility functions shared by the conversion stages.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static TEXTAREA: Lazy<Selector> = Lazy::new(|| Selector::parse("textarea").unwrap());

/// Remove everything that looks like a tag, keeping the text between tags.
pub fn strip_tags(markup: &str) -> String {
    TAG.replace_all(markup, "").into_owned()
}

/// Decode HTML character references (`&amp;`, `&#39;`, `&nbsp;`, ...).
///
/// The text is tokenized as the content of a `<textarea>`, which is RCDATA:
/// character references are decoded while anything tag-like stays literal
/// text. The leading newline keeps the parser from eating one that belongs to
/// the input.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let fragment = Html::parse_fragment(&format!("<textarea>\n{text}</textarea>"));
    fragment
        .select(&TEXTAREA)
        .next()
        .map(|textarea| textarea.text().collect())
        .unwrap_or_else(|| text.to_string())
}
