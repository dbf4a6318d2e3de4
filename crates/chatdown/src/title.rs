//! Conversation title resolution.

use crate::finder::deep_query_selector;
use crate::node::Node;
use crate::options::TitleStrategy;
use crate::selector::Selector;
use crate::Result;

/// Title used when every strategy comes up empty
pub const FALLBACK_TITLE: &str = "Export";

/// A title strategy with its selector already parsed
#[derive(Debug, Clone)]
pub(crate) enum TitleSource {
    Selector(Selector),
    DocumentTitle(Vec<String>),
    Literal(String),
}

impl TitleSource {
    pub(crate) fn compile(strategy: &TitleStrategy) -> Result<Self> {
        Ok(match strategy {
            TitleStrategy::Selector { selector } => Self::Selector(Selector::parse(selector)?),
            TitleStrategy::DocumentTitle { strip } => Self::DocumentTitle(strip.clone()),
            TitleStrategy::Literal { value } => Self::Literal(value.clone()),
        })
    }

    fn resolve(&self, root: &Node) -> Option<String> {
        let title = match self {
            Self::Selector(selector) => deep_query_selector(root, selector)?
                .text_content()
                .trim()
                .to_string(),
            Self::DocumentTitle(strip) => {
                let text = root
                    .descendants()
                    .find(|n| n.tag_name() == "title")?
                    .text_content();
                strip
                    .iter()
                    .filter(|s| !s.is_empty())
                    .fold(text, |text, s| text.replace(s.as_str(), ""))
                    .trim()
                    .to_string()
            }
            Self::Literal(value) => value.trim().to_string(),
        };
        (!title.is_empty()).then_some(title)
    }
}

/// Try each source in priority order
pub(crate) fn resolve_title(sources: &[TitleSource], root: &Node) -> String {
    sources
        .iter()
        .find_map(|source| source.resolve(root))
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}
