//! HTML parsing support.
//!
//! Parses HTML strings with scraper (html5ever) and converts the result to the
//! CDP-style Node structure. Declarative shadow roots
//! (`<template shadowrootmode="open">`) become shadow roots of their parent
//! element instead of ordinary children, which lets a saved page keep its
//! shadow trees. Comments are kept so `inner_html` matches the browser's
//! `innerHTML`; doctypes and processing instructions are dropped.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;

/// Parse a full HTML document into a Node tree rooted at a document node.
///
/// # Example
///
/// ```rust
/// use chatdown::parse_document;
///
/// let doc = parse_document("<title>Chat</title><p>Hi</p>");
/// assert_eq!(doc.descendants().filter(|n| n.tag_name() == "p").count(), 1);
/// ```
pub fn parse_document(html: &str) -> Node {
    let document = Html::parse_document(html);
    let mut root = Node::document();
    root.add_child(scraper_to_node(document.root_element()));
    root
}

/// Parse an HTML fragment into a Node tree rooted at a document fragment.
pub fn parse_fragment(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    let mut root = Node::document_fragment();
    convert_children(document.root_element(), &mut root);
    root
}

/// Convert a scraper ElementRef to our Node structure
fn scraper_to_node(element: ElementRef) -> Node {
    let tag = element.value().name();
    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();

    let mut node = if attrs.is_empty() {
        Node::element(tag)
    } else {
        Node::element_with_attrs(tag, attrs)
    };
    convert_children(element, &mut node);
    node
}

/// Convert the children of `element` into `node`.
///
/// A `<template>` keeps its content under a single document-fragment child;
/// that fragment is unwrapped so the content becomes the template's children.
fn convert_children(element: ElementRef, node: &mut Node) {
    let children = element.children().flat_map(|child| {
        if child.value().is_fragment() {
            child.children().collect::<Vec<_>>()
        } else {
            vec![child]
        }
    });

    for child in children {
        match child.value() {
            ScraperNode::Text(text) => {
                node.add_child(Node::text(&text.text));
            }
            ScraperNode::Comment(comment) => {
                node.add_child(Node::comment(&comment.comment));
            }
            ScraperNode::Element(_) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                if node.is_element() && is_declarative_shadow_root(child_element) {
                    let mut shadow_root = Node::document_fragment();
                    convert_children(child_element, &mut shadow_root);
                    node.attach_shadow(shadow_root);
                } else {
                    node.add_child(scraper_to_node(child_element));
                }
            }
            _ => {}
        }
    }
}

fn is_declarative_shadow_root(element: ElementRef) -> bool {
    let value = element.value();
    value.name() == "template"
        && (value.attr("shadowrootmode").is_some() || value.attr("shadowroot").is_some())
}
