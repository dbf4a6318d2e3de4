//! # chatdown-core
//!
//! Convert rendered chat markup to Markdown.
//!
//! The converter is a fixed, ordered pipeline of textual rewrite stages. It is
//! not an HTML parser: every stage is a pure `&str -> String` transform that
//! sees the output of the stage before it, so order matters (code blocks are
//! pulled out before inline code, everything is converted before the final tag
//! strip).
//!
//! ```text
//! markup ─▶ strip-chrome ─▶ code-blocks ─▶ headings ─▶ strong ─▶ emphasis
//!        ─▶ inline-code ─▶ links ─▶ unordered-lists ─▶ ordered-lists
//!        ─▶ paragraphs ─▶ line-breaks ─▶ strip-tags ─▶ trim ─▶ Markdown
//! ```
//!
//! ## Example
//!
//! ```rust
//! let markdown = chatdown_core::convert("<p>Hello <strong>world</strong></p>");
//! assert_eq!(markdown, "Hello **world**");
//! ```
//!
//! ## Limitations
//!
//! Inline rules match non-greedily, so nested markup of the same family
//! (`<b>a <b>b</b> c</b>`) closes at the first closing tag.

mod rules;
mod service;
mod utilities;

pub use rules::{chat_rules, Rule, Rules, TransformFn};
pub use service::{convert, MarkdownConverter};
pub use utilities::{decode_entities, strip_tags};

/// Error type for converter operations
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Invalid rule pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Unknown rule: {0}")]
    UnknownRule(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
