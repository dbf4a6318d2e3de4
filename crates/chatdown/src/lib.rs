//! # chatdown
//!
//! Export AI chat conversations from a rendered page to Markdown.
//!
//! ## Design
//!
//! The page is a CDP-style [`Node`] tree whose elements may host shadow
//! roots. Export runs in three steps:
//!
//! - **Find**: [`deep_query_selector_all`] collects user and assistant turn
//!   elements, descending into shadow trees a plain selector query misses.
//! - **Convert**: each turn's inner markup goes through the
//!   [`chatdown_core`] rewrite pipeline.
//! - **Assemble**: [`Exporter`] adds the title, timestamp, role headings and
//!   separators, and a file name for download delivery.
//!
//! ## Example
//!
//! ```rust
//! use chatdown::{parse_document, ExportOptions, Exporter};
//!
//! let page = parse_document(
//!     r#"<div class="conversation-title">Greeting</div>
//!        <div class="query-text">Hello</div>"#,
//! );
//! let exporter = Exporter::new(ExportOptions::default()).unwrap();
//! let outcome = exporter.export(&page);
//! let document = outcome.document().unwrap();
//! assert!(document.content.starts_with("# Greeting\n*Exported: "));
//! assert!(document.content.contains("### User\n\nHello\n\n---\n\n"));
//! ```

pub mod delivery;
mod export;
pub mod finder;
pub mod html;
pub mod node;
mod options;
pub mod selector;
mod title;

use std::path::PathBuf;

pub use chatdown_core::{convert, MarkdownConverter, Rule, Rules};
pub use delivery::{Delivered, Delivery, DeliveryError, FallbackDelivery, FileDelivery, WriterDelivery};
pub use export::{
    check_page_url, format_timestamp, sanitize_filename, ExportDocument, ExportOutcome, Exporter,
    Role, Turn,
};
pub use finder::{deep_query_selector, deep_query_selector_all};
pub use html::{parse_document, parse_fragment};
pub use node::{Node, NodeType};
pub use options::{ExportOptions, TitleStrategy};
pub use selector::{Selector, SelectorError};
pub use title::FALLBACK_TITLE;

/// Error type for export operations
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Refusing to export restricted page: {0}")]
    RestrictedPage(String),

    #[error("Invalid selector: {0}")]
    Selector(#[from] SelectorError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

pub type Result<T> = std::result::Result<T, ExportError>;
