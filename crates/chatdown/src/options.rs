//! Export configuration.
//!
//! The host page's markup is outside our control, so every selector and label
//! the exporter relies on lives here and can be overridden from TOML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ExportError, Result};

/// One way of finding the conversation title, tried in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TitleStrategy {
    /// Trimmed text of the first element matching `selector`
    Selector { selector: String },
    /// Text of the `<title>` element with every `strip` string removed
    DocumentTitle {
        #[serde(default)]
        strip: Vec<String>,
    },
    /// A fixed title
    Literal { value: String },
}

/// Options for [`Exporter`](crate::Exporter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Selector for user turns
    pub user_selector: String,

    /// Selector for assistant turns
    pub assistant_selector: String,

    /// Heading label for user turns
    pub user_label: String,

    /// Heading label assigned to assistant turns while assembling
    pub assistant_label: String,

    /// Label that replaces `### {assistant_label}` in the finished document
    pub assistant_display_label: String,

    /// Title strategies, highest priority first
    pub title_strategies: Vec<TitleStrategy>,

    /// Maximum length of the sanitized title part of the filename
    pub filename_max_len: usize,

    /// URL prefixes of pages that must never be exported
    pub blocked_schemes: Vec<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            user_selector: ".query-text".to_string(),
            assistant_selector: ".markdown-main-panel".to_string(),
            user_label: "User".to_string(),
            assistant_label: "Gemini".to_string(),
            assistant_display_label: "ChatGPT".to_string(),
            title_strategies: vec![
                TitleStrategy::Selector {
                    selector: ".conversation-title".to_string(),
                },
                TitleStrategy::DocumentTitle {
                    strip: vec!["Google".to_string(), "Gemini".to_string(), " - ".to_string()],
                },
                TitleStrategy::Literal {
                    value: "Gemini_Export".to_string(),
                },
            ],
            filename_max_len: 50,
            blocked_schemes: vec![
                "chrome://".to_string(),
                "edge://".to_string(),
                "about:".to_string(),
            ],
        }
    }
}

impl ExportOptions {
    /// Parse options from TOML. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns [`ExportError::Config`] if the document is not valid TOML or
    /// has values of the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from a TOML file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let options = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded export options");
        Ok(options)
    }
}
