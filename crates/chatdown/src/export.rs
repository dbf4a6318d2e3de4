//! Export orchestration: find turns, convert them, assemble the document.

use std::fmt;

use chatdown_core::MarkdownConverter;
use chrono::{DateTime, Utc};

use crate::delivery::{Delivered, Delivery, FallbackDelivery};
use crate::finder::deep_query_selector_all;
use crate::node::Node;
use crate::options::ExportOptions;
use crate::selector::Selector;
use crate::title::{resolve_title, TitleSource};
use crate::{ExportError, Result};

/// Who produced a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// One conversation turn as found on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    /// Inner markup of the turn element
    pub markup: String,
}

/// A finished export
#[derive(Debug, Clone)]
pub struct ExportDocument {
    pub title: String,
    pub timestamp: String,
    pub turns: Vec<Turn>,
    /// The Markdown document
    pub content: String,
    /// Suggested file name for download delivery
    pub filename: String,
}

/// Result of an export run
#[derive(Debug, Clone)]
pub enum ExportOutcome {
    /// No turn elements were found; there is nothing to export
    Empty,
    Document(ExportDocument),
}

impl ExportOutcome {
    pub fn document(&self) -> Option<&ExportDocument> {
        match self {
            ExportOutcome::Empty => None,
            ExportOutcome::Document(document) => Some(document),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ExportOutcome::Empty)
    }
}

/// Format an instant as `YYYY-MM-DDTHH-MM-SS` (UTC, file-name safe)
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// Replace every character that is not an ASCII letter or digit with `_`
/// and cap the result at `max_len` characters.
pub fn sanitize_filename(title: &str, max_len: usize) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(max_len)
        .collect()
}

/// Refuse to run on browser-internal pages or when the URL is unknown.
///
/// # Errors
/// Returns [`ExportError::RestrictedPage`] for a missing or empty URL, or one
/// starting with any of `blocked`.
pub fn check_page_url(url: Option<&str>, blocked: &[String]) -> Result<()> {
    match url {
        None | Some("") => Err(ExportError::RestrictedPage("<unknown>".to_string())),
        Some(url) if blocked.iter().any(|scheme| url.starts_with(scheme.as_str())) => {
            Err(ExportError::RestrictedPage(url.to_string()))
        }
        Some(_) => Ok(()),
    }
}

/// Drives the element finder and the converter to build an export.
///
/// # Example
///
/// ```rust
/// use chatdown::{parse_document, ExportOptions, Exporter};
///
/// let page = parse_document(
///     r#"<title>Demo</title>
///        <div class="query-text">Hi</div>
///        <div class="markdown-main-panel"><p>Hello <b>there</b></p></div>"#,
/// );
/// let exporter = Exporter::new(ExportOptions::default()).unwrap();
/// let outcome = exporter.export(&page);
/// let document = outcome.document().unwrap();
/// assert!(document.content.contains("### ChatGPT\n\nHello **there**"));
/// ```
#[derive(Debug)]
pub struct Exporter {
    options: ExportOptions,
    user: Selector,
    assistant: Selector,
    turns: Selector,
    titles: Vec<TitleSource>,
    converter: MarkdownConverter,
}

impl Exporter {
    /// Create an exporter, parsing every configured selector.
    ///
    /// # Errors
    /// Returns [`ExportError::Selector`] if any selector is invalid.
    pub fn new(options: ExportOptions) -> Result<Self> {
        let user = Selector::parse(&options.user_selector)?;
        let assistant = Selector::parse(&options.assistant_selector)?;
        let turns = user.union(&assistant);
        let titles = options
            .title_strategies
            .iter()
            .map(TitleSource::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            options,
            user,
            assistant,
            turns,
            titles,
            converter: MarkdownConverter::new(),
        })
    }

    /// Use a custom converter pipeline
    pub fn with_converter(mut self, converter: MarkdownConverter) -> Self {
        self.converter = converter;
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Resolve the conversation title from the configured strategies
    pub fn resolve_title(&self, root: &Node) -> String {
        resolve_title(&self.titles, root)
    }

    /// Classify a matched element. The user selector is checked first.
    fn classify(&self, element: &Node) -> Option<Turn> {
        let role = if self.user.matches(element) {
            Role::User
        } else if self.assistant.matches(element) {
            Role::Assistant
        } else {
            return None;
        };

        let markup = element.inner_html();
        if markup.trim().is_empty() {
            tracing::debug!(%role, "Skipping empty turn");
            return None;
        }
        Some(Turn { role, markup })
    }

    /// Find and classify every turn under `root`, skipping empty ones
    pub fn collect_turns(&self, root: &Node) -> Vec<Turn> {
        deep_query_selector_all(root, &self.turns)
            .into_iter()
            .filter_map(|element| self.classify(element))
            .collect()
    }

    fn label(&self, role: Role) -> &str {
        match role {
            Role::User => &self.options.user_label,
            Role::Assistant => &self.options.assistant_label,
        }
    }

    /// Assemble the Markdown document.
    ///
    /// After assembly every `### {assistant_label}` in the text, including any
    /// inside converted content, is replaced by `### {assistant_display_label}`.
    pub fn render(&self, title: &str, timestamp: &str, turns: &[Turn]) -> String {
        let mut content = format!("# {title}\n*Exported: {timestamp}*\n\n---\n\n");

        for turn in turns {
            content.push_str(&format!(
                "### {}\n\n{}\n\n---\n\n",
                self.label(turn.role),
                self.converter.convert(&turn.markup)
            ));
        }

        if self.options.assistant_label == self.options.assistant_display_label {
            return content;
        }
        content.replace(
            &format!("### {}", self.options.assistant_label),
            &format!("### {}", self.options.assistant_display_label),
        )
    }

    /// Export the conversation under `root`, stamped with the current time
    pub fn export(&self, root: &Node) -> ExportOutcome {
        self.export_at(root, Utc::now())
    }

    /// Export the conversation under `root`, stamped with `at`
    pub fn export_at(&self, root: &Node, at: DateTime<Utc>) -> ExportOutcome {
        let matches = deep_query_selector_all(root, &self.turns);
        if matches.is_empty() {
            tracing::warn!(selector = %self.turns, "No messages found");
            return ExportOutcome::Empty;
        }

        let turns: Vec<Turn> = matches
            .into_iter()
            .filter_map(|element| self.classify(element))
            .collect();
        let title = self.resolve_title(root);
        let timestamp = format_timestamp(at);
        let content = self.render(&title, &timestamp, &turns);
        let filename = format!(
            "{}_{}.md",
            sanitize_filename(&title, self.options.filename_max_len),
            timestamp
        );

        tracing::info!(
            %title,
            turns = turns.len(),
            bytes = content.len(),
            "Conversation exported"
        );

        ExportOutcome::Document(ExportDocument {
            title,
            timestamp,
            turns,
            content,
            filename,
        })
    }

    /// Check the page URL, then export
    ///
    /// # Errors
    /// Returns [`ExportError::RestrictedPage`] if the page must not be exported.
    pub fn export_page(&self, url: Option<&str>, root: &Node) -> Result<ExportOutcome> {
        check_page_url(url, &self.options.blocked_schemes)?;
        Ok(self.export(root))
    }

    /// Check the page URL, export, and hand the document to `delivery`.
    ///
    /// Returns `None` when there was nothing to export.
    ///
    /// # Errors
    /// Returns error if the page is restricted or both delivery paths fail.
    pub fn export_page_to<P, F>(
        &self,
        url: Option<&str>,
        root: &Node,
        delivery: &mut FallbackDelivery<P, F>,
    ) -> Result<Option<Delivered>>
    where
        P: Delivery,
        F: Delivery,
    {
        match self.export_page(url, root)? {
            ExportOutcome::Empty => Ok(None),
            ExportOutcome::Document(document) => Ok(Some(delivery.deliver_document(&document)?)),
        }
    }
}
