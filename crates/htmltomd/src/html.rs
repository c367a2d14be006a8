//! HTML parsing support.
//!
//! Parses an HTML string with scraper (html5ever) and converts the result to
//! the owned [`Document`] tree used by the rest of the pipeline.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::{Document, Element, Node};
use crate::{ConvertError, Result};

/// Parse an HTML string into a Document.
///
/// Parsing is lenient: unclosed tags are closed, stray text is kept and
/// fragments are wrapped in an implicit `html`/`body`. Source comments and
/// doctypes are dropped.
///
/// # Example
///
/// ```rust
/// use htmltomd::parse_html;
///
/// let doc = parse_html("<h1>Hello <em>World</em>").unwrap();
/// assert_eq!(doc.root().tag_name(), "html");
/// ```
pub fn parse_html(html: &str) -> Result<Document> {
    if looks_binary(html) {
        return Err(ConvertError::ParseError(
            "input is mostly control characters, it looks like binary data".to_string(),
        ));
    }

    let document = Html::parse_document(html);
    Ok(Document::new(scraper_to_element(document.root_element())))
}

/// Characters sampled from the start of the input by [`looks_binary`]
const BINARY_SAMPLE_CHARS: usize = 8192;

/// More than one control character in ten marks the input as binary
fn looks_binary(html: &str) -> bool {
    let mut sampled = 0;
    let mut control = 0;
    for c in html.chars().take(BINARY_SAMPLE_CHARS) {
        sampled += 1;
        if c.is_control() && !matches!(c, '\t' | '\n' | '\r' | '\x0c') {
            control += 1;
        }
    }
    control * 10 > sampled
}

/// Convert a scraper ElementRef to our Element structure.
///
/// Walks the ego-tree with an explicit stack of open elements; an element
/// is attached to its parent once the walk climbs out of it.
fn scraper_to_element(root: ElementRef) -> Element {
    let mut open = vec![element_from(root.value())];
    let mut next = root.first_child();

    while let Some(node) = next {
        match node.value() {
            ScraperNode::Element(value) => {
                if let Some(first) = node.first_child() {
                    open.push(element_from(value));
                    next = Some(first);
                    continue;
                }
                attach(&mut open, Node::Element(element_from(value)));
            }
            ScraperNode::Text(text) => attach(&mut open, Node::text(&text.text)),
            _ => {}
        }

        let mut at = node;
        next = loop {
            if let Some(sibling) = at.next_sibling() {
                break Some(sibling);
            }
            match at.parent() {
                Some(parent) if parent.id() != root.id() => {
                    close_top(&mut open);
                    at = parent;
                }
                _ => break None,
            }
        };
    }

    while open.len() > 1 {
        close_top(&mut open);
    }
    open.pop().unwrap_or_else(|| Element::new("html"))
}

fn element_from(value: &scraper::node::Element) -> Element {
    let mut element = Element::new(value.name());
    for (name, attr_value) in value.attrs() {
        element.set_attr(name, attr_value);
    }
    element
}

fn attach(open: &mut [Element], node: Node) {
    if let Some(parent) = open.last_mut() {
        parent.add_child(node);
    }
}

fn close_top(open: &mut Vec<Element>) {
    if let Some(done) = open.pop() {
        attach(open, Node::Element(done));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(doc: &Document) -> &Element {
        doc.root()
            .element_children()
            .find(|e| e.tag_name() == "body")
            .unwrap()
    }

    #[test]
    fn test_parse_simple_html() {
        let doc = parse_html("<p>Hello World</p>").unwrap();
        assert_eq!(doc.root().tag_name(), "html");
        let p = body(&doc).element_children().next().unwrap();
        assert_eq!(p.tag_name(), "p");
        assert_eq!(p.text_content(), "Hello World");
    }

    #[test]
    fn test_parse_keeps_attributes() {
        let doc = parse_html(r#"<span class="_20-asap-bold numero_text p-Pagina">14 e 15</span>"#).unwrap();
        let span = body(&doc).element_children().next().unwrap();
        assert!(span.is_page_marker());
        assert_eq!(span.text_content(), "14 e 15");
    }

    #[test]
    fn test_parse_is_lenient() {
        let doc = parse_html("<div><p>one<p>two</div><b>stray").unwrap();
        let text = body(&doc).text_content();
        assert!(text.contains("one"));
        assert!(text.contains("two"));
        assert!(text.contains("stray"));
    }

    #[test]
    fn test_parse_drops_source_comments() {
        let doc = parse_html("<p>a<!-- note -->b</p>").unwrap();
        assert_eq!(doc.count_elements(|e| e.children.iter().any(Node::is_comment)), 0);
    }

    #[test]
    fn test_parse_keeps_nesting_order() {
        let doc = parse_html("<div><p>a<b>b</b></p>c<span></span><p>d</p></div>e").unwrap();
        let div = body(&doc).element_children().next().unwrap();
        let tags: Vec<_> = div.element_children().map(Element::tag_name).collect();
        assert_eq!(tags, ["p", "span", "p"]);
        assert_eq!(div.text_content(), "abcd");
        assert_eq!(body(&doc).text_content(), "abcde");
    }

    #[test]
    fn test_parse_deeply_nested_input() {
        let html = "<span>".repeat(20_000) + "x";
        let doc = parse_html(&html).unwrap();
        assert_eq!(body(&doc).text_content(), "x");
        assert!(doc.depth() > 20_000);
    }

    #[test]
    fn test_parse_accepts_stray_control_characters() {
        let doc = parse_html("<p>Texto com um \u{0} perdido e um \u{1} também.</p>").unwrap();
        let text = body(&doc).text_content();
        assert!(text.starts_with("Texto com um"));
        assert!(text.ends_with("também."));
    }

    #[test]
    fn test_parse_rejects_binary() {
        let err = parse_html("\u{0}\u{1}PNG\r\n\u{1a}\n\u{0}\u{0}\u{0}\rIHDR").unwrap_err();
        assert!(matches!(err, ConvertError::ParseError(_)));
    }
}
