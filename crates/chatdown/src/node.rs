//! CDP-style DOM Node structure with shadow roots.
//!
//! This module provides a DOM node structure shaped like the Chrome DevTools
//! Protocol DOM.Node, including its `shadowRoots` field. Shadow roots hang off
//! their host element and are never reached through `children`.

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Comment node (nodeType = 8)
    Comment = 8,
    /// Document node (nodeType = 9)
    Document = 9,
    /// Document fragment node (nodeType = 11), also used for shadow roots
    DocumentFragment = 11,
}

/// A DOM node following the CDP DOM.Node structure.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node type (1 = Element, 3 = Text, etc.)
    pub node_type: NodeType,

    /// Node name (uppercase for elements, e.g., "DIV", "#text" for text nodes)
    pub node_name: String,

    /// Text content for text and comment nodes
    pub node_value: Option<String>,

    /// Attributes as flat array [name, value, name, value, ...] (CDP style)
    pub attributes: Option<Vec<String>>,

    /// Child nodes of the light tree
    pub children: Option<Vec<Node>>,

    /// Shadow trees attached to this element, in attachment order
    pub shadow_roots: Option<Vec<Node>>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_type: NodeType::Element,
            node_name: tag_name.to_uppercase(),
            node_value: None,
            attributes: Some(Vec::new()),
            children: Some(Vec::new()),
            shadow_roots: None,
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        node.attributes = Some(
            attrs
                .into_iter()
                .flat_map(|(k, v)| [k.to_string(), v.to_string()])
                .collect(),
        );
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            node_type: NodeType::Text,
            node_name: "#text".to_string(),
            node_value: Some(content.to_string()),
            attributes: None,
            children: None,
            shadow_roots: None,
        }
    }

    /// Create a comment node
    pub fn comment(content: &str) -> Self {
        Self {
            node_type: NodeType::Comment,
            node_name: "#comment".to_string(),
            node_value: Some(content.to_string()),
            attributes: None,
            children: None,
            shadow_roots: None,
        }
    }

    /// Create a document node
    pub fn document() -> Self {
        Self {
            node_type: NodeType::Document,
            node_name: "#document".to_string(),
            node_value: None,
            attributes: None,
            children: Some(Vec::new()),
            shadow_roots: None,
        }
    }

    /// Create a document fragment node
    pub fn document_fragment() -> Self {
        Self {
            node_type: NodeType::DocumentFragment,
            node_name: "#document-fragment".to_string(),
            node_value: None,
            attributes: None,
            children: Some(Vec::new()),
            shadow_roots: None,
        }
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Get the tag name (lowercase)
    pub fn tag_name(&self) -> String {
        self.node_name.to_lowercase()
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        let attrs = self.attributes.as_ref()?;
        attrs
            .chunks_exact(2)
            .find(|pair| pair[0].eq_ignore_ascii_case(name))
            .map(|pair| pair[1].as_str())
    }

    /// Check if an attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute, replacing an existing value
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let attrs = self.attributes.get_or_insert_with(Vec::new);
        if let Some(pair) = attrs
            .chunks_exact_mut(2)
            .find(|pair| pair[0].eq_ignore_ascii_case(name))
        {
            pair[1] = value.to_string();
            return;
        }
        attrs.push(name.to_string());
        attrs.push(value.to_string());
    }

    /// Whitespace-separated tokens of the `class` attribute
    pub fn class_list(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_list().any(|c| c == class)
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().flat_map(|c| c.iter())
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Shadow roots attached to this node
    pub fn shadow_roots(&self) -> impl Iterator<Item = &Node> {
        self.shadow_roots.iter().flat_map(|r| r.iter())
    }

    /// Check if this element hosts at least one shadow tree
    pub fn is_shadow_host(&self) -> bool {
        self.shadow_roots().next().is_some()
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    /// Attach a shadow root. Non-fragment nodes are wrapped in a fragment.
    pub fn attach_shadow(&mut self, root: Node) {
        let root = if root.node_type == NodeType::DocumentFragment {
            root
        } else {
            let mut fragment = Node::document_fragment();
            fragment.add_child(root);
            fragment
        };
        self.shadow_roots.get_or_insert_with(Vec::new).push(root);
    }

    /// Element descendants in document order, excluding this node.
    ///
    /// Only the light tree is walked; shadow roots are not entered.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut descendants = Descendants { stack: Vec::new() };
        descendants.push_children(self);
        descendants
    }

    /// Get all text content from this node and its light-tree descendants
    pub fn text_content(&self) -> String {
        match self.node_type {
            NodeType::Text => self.node_value.clone().unwrap_or_default(),
            NodeType::Comment => String::new(),
            _ => self.children().map(|child| child.text_content()).collect(),
        }
    }

    /// Serialize like the DOM's `outerHTML`
    pub fn outer_html(&self) -> String {
        match self.node_type {
            NodeType::Text => escape_html_text(self.node_value.as_deref().unwrap_or("")),
            NodeType::Comment => format!("<!--{}-->", self.node_value.as_deref().unwrap_or("")),
            NodeType::Element => {
                let tag = self.tag_name();
                let attrs = self.attributes_string();
                let open = if attrs.is_empty() {
                    format!("<{tag}>")
                } else {
                    format!("<{tag} {attrs}>")
                };

                if is_void_element(&tag) {
                    open
                } else {
                    format!("{open}{}</{tag}>", self.inner_html())
                }
            }
            _ => self.inner_html(),
        }
    }

    /// Serialize like the DOM's `innerHTML`
    pub fn inner_html(&self) -> String {
        self.children().map(|child| child.outer_html()).collect()
    }

    fn attributes_string(&self) -> String {
        let Some(ref attrs) = self.attributes else {
            return String::new();
        };

        attrs
            .chunks_exact(2)
            .map(|pair| format!("{}=\"{}\"", pair[0], escape_html_attr(&pair[1])))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Depth-first iterator over element descendants
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Descendants<'a> {
    fn push_children(&mut self, node: &'a Node) {
        let start = self.stack.len();
        self.stack.extend(node.element_children());
        self.stack[start..].reverse();
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_children(node);
        Some(node)
    }
}

fn is_void_element(tag: &str) -> bool {
    const VOID_ELEMENTS: &[&str] = &[
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ];
    VOID_ELEMENTS.contains(&tag)
}

fn escape_html_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_element() {
        let node = Node::element("div");
        assert!(node.is_element());
        assert_eq!(node.tag_name(), "div");
        assert_eq!(node.node_name, "DIV");
        assert!(!node.is_shadow_host());
    }

    #[test]
    fn test_attributes_and_classes() {
        let mut node = Node::element_with_attrs("div", vec![("class", "query-text  user"), ("id", "q1")]);
        assert_eq!(node.attr("ID"), Some("q1"));
        assert!(node.has_class("query-text"));
        assert!(node.has_class("user"));
        assert!(!node.has_class("query"));
        node.set_attr("id", "q2");
        node.set_attr("role", "log");
        assert_eq!(node.attr("id"), Some("q2"));
        assert_eq!(node.attr("role"), Some("log"));
    }

    #[test]
    fn test_descendants_document_order() {
        let mut root = Node::document();
        let mut a = Node::element("a");
        a.add_child(Node::element("b"));
        a.add_child(Node::text("t"));
        a.add_child(Node::element("c"));
        root.add_child(a);
        root.add_child(Node::element("d"));

        let tags: Vec<_> = root.descendants().map(|n| n.tag_name()).collect();
        assert_eq!(tags, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_descendants_skip_shadow_roots() {
        let mut host = Node::element("host");
        host.attach_shadow(Node::element("hidden"));
        let mut root = Node::document();
        root.add_child(host);

        let tags: Vec<_> = root.descendants().map(|n| n.tag_name()).collect();
        assert_eq!(tags, vec!["host"]);
        assert_eq!(root.descendants().next().unwrap().shadow_roots().count(), 1);
    }

    #[test]
    fn test_attach_shadow_wraps_in_fragment() {
        let mut host = Node::element("div");
        host.attach_shadow(Node::element("span"));
        let root = host.shadow_roots().next().unwrap();
        assert_eq!(root.node_type, NodeType::DocumentFragment);
        assert_eq!(root.element_children().count(), 1);
    }

    #[test]
    fn test_text_content() {
        let mut div = Node::element("div");
        div.add_child(Node::text("Hello "));
        let mut span = Node::element("span");
        span.add_child(Node::text("World"));
        div.add_child(span);
        assert_eq!(div.text_content(), "Hello World");
    }

    #[test]
    fn test_inner_html_escapes_text() {
        let mut p = Node::element("p");
        p.add_child(Node::text("a < b & c\u{a0}d"));
        assert_eq!(p.inner_html(), "a &lt; b &amp; c&nbsp;d");
    }

    #[test]
    fn test_outer_html() {
        let mut a = Node::element_with_attrs("a", vec![("href", "https://example.com?a=1&b=\"2\"")]);
        a.add_child(Node::text("Link"));
        assert_eq!(
            a.outer_html(),
            "<a href=\"https://example.com?a=1&amp;b=&quot;2&quot;\">Link</a>"
        );
    }

    #[test]
    fn test_void_element_html() {
        assert_eq!(Node::element("br").outer_html(), "<br>");
        let img = Node::element_with_attrs("img", vec![("src", "test.png"), ("alt", "")]);
        assert_eq!(img.outer_html(), "<img src=\"test.png\" alt=\"\">");
    }

    #[test]
    fn test_comment_serialization() {
        let mut div = Node::element("div");
        div.add_child(Node::text("a"));
        div.add_child(Node::comment(" c "));
        assert_eq!(div.inner_html(), "a<!-- c -->");
        assert_eq!(div.text_content(), "a");
        assert_eq!(div.descendants().count(), 0);
    }

    #[test]
    fn test_inner_html_excludes_shadow_roots() {
        let mut host = Node::element("div");
        host.add_child(Node::text("light"));
        host.attach_shadow(Node::text("shadow"));
        assert_eq!(host.inner_html(), "light");
    }
}
