//! A small CSS selector matcher.
//!
//! Supports comma-separated lists of compound selectors built from a type
//! selector (or `*`), `#id`, `.class`, `[attr]` and `[attr="value"]`.
//! Combinators are rejected: the element finder only ever needs to test one
//! element at a time, and nodes carry no parent link to walk ancestors with.
//! Turn and title selectors must therefore describe the element itself
//! (`user-query.query-text`, not `user-query .query-text`). A selector with a
//! combinator fails at [`Exporter::new`](crate::Exporter::new) with
//! [`SelectorError::Combinator`] instead of silently matching nothing.

use std::fmt;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

use crate::node::Node;

/// Errors raised while parsing a selector
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected {found:?} at offset {offset} in selector {selector:?}")]
    Unexpected {
        found: char,
        offset: usize,
        selector: String,
    },

    #[error("combinators are not supported (selector {0:?})")]
    Combinator(String),

    #[error("unterminated attribute selector in {0:?}")]
    UnterminatedAttribute(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attr { name: String, value: Option<String> },
}

impl Simple {
    fn matches(&self, node: &Node) -> bool {
        match self {
            Simple::Universal => true,
            Simple::Tag(tag) => node.node_name.eq_ignore_ascii_case(tag),
            Simple::Id(id) => node.attr("id") == Some(id.as_str()),
            Simple::Class(class) => node.has_class(class),
            Simple::Attr { name, value: None } => node.has_attr(name),
            Simple::Attr {
                name,
                value: Some(value),
            } => node.attr(name) == Some(value.as_str()),
        }
    }
}

/// A parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    compounds: Vec<Vec<Simple>>,
}

impl Selector {
    /// Parse a selector list such as `.query-text, .markdown-main-panel`
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let compounds = source
            .split(',')
            .map(|part| parse_compound(part.trim(), source))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: source.trim().to_string(),
            compounds,
        })
    }

    /// Check whether an element matches any selector in the list
    pub fn matches(&self, node: &Node) -> bool {
        node.is_element()
            && self
                .compounds
                .iter()
                .any(|compound| compound.iter().all(|simple| simple.matches(node)))
    }

    /// The selector text as given
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// A selector list matching anything either list matches
    pub fn union(&self, other: &Selector) -> Selector {
        let mut compounds = self.compounds.clone();
        compounds.extend(other.compounds.iter().cloned());
        Selector {
            source: format!("{}, {}", self.source, other.source),
            compounds,
        }
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn parse_compound(part: &str, selector: &str) -> Result<Vec<Simple>, SelectorError> {
    if part.is_empty() {
        return Err(SelectorError::Empty);
    }

    let mut chars = part.char_indices().peekable();
    let mut simples = Vec::new();

    while let Some(&(offset, c)) = chars.peek() {
        match c {
            '*' if simples.is_empty() => {
                chars.next();
                simples.push(Simple::Universal);
            }
            '#' => {
                chars.next();
                simples.push(Simple::Id(ident(&mut chars, selector)?));
            }
            '.' => {
                chars.next();
                simples.push(Simple::Class(ident(&mut chars, selector)?));
            }
            '[' => {
                chars.next();
                simples.push(attribute(&mut chars, selector)?);
            }
            c if is_ident_char(c) && simples.is_empty() => {
                simples.push(Simple::Tag(ident(&mut chars, selector)?));
            }
            c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                return Err(SelectorError::Combinator(selector.to_string()));
            }
            found => {
                return Err(SelectorError::Unexpected {
                    found,
                    offset,
                    selector: selector.to_string(),
                });
            }
        }
    }

    Ok(simples)
}

fn ident(chars: &mut Peekable<CharIndices>, selector: &str) -> Result<String, SelectorError> {
    let mut name = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        name.push(c);
        chars.next();
    }

    if name.is_empty() {
        return Err(match chars.peek() {
            Some(&(offset, found)) => SelectorError::Unexpected {
                found,
                offset,
                selector: selector.to_string(),
            },
            None => SelectorError::Empty,
        });
    }
    Ok(name)
}

/// Parse the rest of `[name]` or `[name=value]` after the opening bracket
fn attribute(chars: &mut Peekable<CharIndices>, selector: &str) -> Result<Simple, SelectorError> {
    let name = ident(chars, selector)?;

    match chars.next() {
        Some((_, ']')) => Ok(Simple::Attr { name, value: None }),
        Some((_, '=')) => {
            let value = match chars.peek() {
                Some(&(_, quote @ ('"' | '\''))) => {
                    chars.next();
                    let mut value = String::new();
                    loop {
                        match chars.next() {
                            Some((_, c)) if c == quote => break,
                            Some((_, c)) => value.push(c),
                            None => {
                                return Err(SelectorError::UnterminatedAttribute(
                                    selector.to_string(),
                                ))
                            }
                        }
                    }
                    value
                }
                _ => ident(chars, selector)?,
            };
            match chars.next() {
                Some((_, ']')) => Ok(Simple::Attr {
                    name,
                    value: Some(value),
                }),
                _ => Err(SelectorError::UnterminatedAttribute(selector.to_string())),
            }
        }
        _ => Err(SelectorError::UnterminatedAttribute(selector.to_string())),
    }
}
