//! Owned, mutable document tree.
//!
//! The tree is a closed set of node kinds: elements, text and comments.
//! Every element owns its children outright, so a node removed from its
//! parent's child list is dropped with its whole subtree. Rewrite passes
//! get exclusive access through `&mut Document`; the renderer only reads.
//!
//! Walks over the tree use explicit stacks. Nesting depth is bounded only by
//! the input, not by the call stack.

use indexmap::IndexMap;

use crate::utilities::{is_void, role_of, TagRole};

/// Class token that flags an element as a source page boundary.
pub const PAGE_MARKER_CLASS: &str = "p-Pagina";

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Node::Element(Element::new(tag_name))
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut element = Element::new(tag_name);
        for (name, value) in attrs {
            element.set_attr(name, value);
        }
        Node::Element(element)
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Node::Text(content.to_string())
    }

    /// Create a new comment node
    pub fn comment(content: &str) -> Self {
        Node::Comment(content.to_string())
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Node::Comment(_))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Get all text content from this node and descendants.
    ///
    /// Comments carry no visible text and contribute nothing.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(std::slice::from_ref(self), &mut out);
        out
    }

    /// Reconstruct markup for this node
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        write_html(std::slice::from_ref(self), &mut out);
        out
    }
}

/// An element with a lowercase tag name, ordered unique attributes and
/// owned children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag: tag_name.to_lowercase(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Get the tag name (lowercase)
    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    /// Semantic role of this element's tag
    pub fn role(&self) -> TagRole {
        role_of(&self.tag)
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        let name_lower = name.to_lowercase();
        self.attributes
            .iter()
            .find(|(attr_name, _)| attr_name.to_lowercase() == name_lower)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing any value already stored under the name
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name_lower = name.to_lowercase();
        if let Some((_, existing)) = self
            .attributes
            .iter_mut()
            .find(|(attr_name, _)| attr_name.to_lowercase() == name_lower)
        {
            *existing = value.to_string();
            return;
        }
        self.attributes.insert(name.to_string(), value.to_string());
    }

    /// Whitespace-separated tokens of the `class` attribute
    pub fn class_tokens(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    /// Exact token membership in the `class` attribute
    pub fn has_class(&self, token: &str) -> bool {
        self.class_tokens().any(|t| t == token)
    }

    /// Whether this element flags a source page boundary
    pub fn is_page_marker(&self) -> bool {
        self.has_class(PAGE_MARKER_CLASS)
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Get all text content from descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Reconstruct outer HTML
    pub fn outer_html(&self) -> String {
        let mut out = self.open_tag();
        if !is_void(&self.tag) {
            write_html(&self.children, &mut out);
            out.push_str(&format!("</{}>", self.tag));
        }
        out
    }

    /// Reconstruct inner HTML
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        write_html(&self.children, &mut out);
        out
    }

    fn open_tag(&self) -> String {
        let attrs = self
            .attributes
            .iter()
            .map(|(name, value)| {
                if value.is_empty() {
                    name.clone()
                } else {
                    format!("{}=\"{}\"", name, escape_html_attr(value))
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        if attrs.is_empty() {
            format!("<{}>", self.tag)
        } else {
            format!("<{} {}>", self.tag, attrs)
        }
    }
}

impl Drop for Element {
    // Unnest descendants before they drop so deep trees never recurse.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let Node::Element(mut element) = node {
                pending.append(&mut element.children);
            }
        }
    }
}

/// A parsed document. Owns the root element for the lifetime of one
/// conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Count elements anywhere in the tree that satisfy `pred`
    pub fn count_elements<F>(&self, pred: F) -> usize
    where
        F: Fn(&Element) -> bool,
    {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(element) = stack.pop() {
            count += usize::from(pred(element));
            stack.extend(element.element_children());
        }
        count
    }

    /// Depth of the deepest element, the root being 1
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(&self.root, 1)];
        while let Some((element, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(element.element_children().map(|child| (child, depth + 1)));
        }
        deepest
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    let mut stack: Vec<&Node> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => stack.extend(element.children.iter().rev()),
            Node::Comment(_) => {}
        }
    }
}

enum HtmlStep<'a> {
    Open(&'a Node),
    Close(&'a str),
}

fn write_html(nodes: &[Node], out: &mut String) {
    let mut stack: Vec<HtmlStep> = nodes.iter().rev().map(HtmlStep::Open).collect();
    while let Some(step) = stack.pop() {
        match step {
            HtmlStep::Close(tag) => out.push_str(&format!("</{}>", tag)),
            HtmlStep::Open(Node::Text(text)) => out.push_str(&escape_html_text(text)),
            HtmlStep::Open(Node::Comment(content)) => out.push_str(&format!("<!--{}-->", content)),
            HtmlStep::Open(Node::Element(element)) => {
                out.push_str(&element.open_tag());
                if !is_void(&element.tag) {
                    stack.push(HtmlStep::Close(&element.tag));
                    stack.extend(element.children.iter().rev().map(HtmlStep::Open));
                }
            }
        }
    }
}

/// Escape HTML attribute value
fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_html_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
