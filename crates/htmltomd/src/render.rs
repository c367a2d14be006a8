//! Document to Markdown text.
//!
//! Settings are fixed: links and images are ignored, lines are never
//! wrapped, Unicode passes through, and no Markdown syntax is generated.
//! Headings were already turned into literal text by the rewrite passes.
//!
//! Comments render as `<!--...-->` in the text stream. A page-marker
//! element renders like any other element, except that inline text inside
//! it is left out: that text is the page label, already carried by the
//! comment in front of the element. Blocks and comments inside a marker
//! are rendered.

use crate::node::{Document, Element, Node};
use crate::utilities::TagRole;

/// Render a rewritten document as Markdown text
pub fn render_markdown(doc: &Document) -> String {
    let mut writer = Writer::default();
    let mut steps = vec![Step::Element(doc.root(), false)];

    while let Some(step) = steps.pop() {
        match step {
            Step::CloseBlock => writer.block_boundary(),
            Step::Children(children, in_label) => {
                steps.extend(children.iter().rev().map(|child| Step::Node(child, in_label)));
            }
            Step::Node(Node::Text(text), in_label) => {
                if !in_label {
                    writer.text(text);
                }
            }
            Step::Node(Node::Comment(content), _) => {
                writer.inline_token(&format!("<!--{}-->", content));
            }
            Step::Node(Node::Element(element), in_label) => {
                steps.push(Step::Element(element, in_label));
            }
            Step::Element(element, in_label) => match element.role() {
                TagRole::Ignored | TagRole::Media => {}
                TagRole::LineBreak => writer.line_break(),
                TagRole::Preformatted => {
                    writer.block_boundary();
                    writer.out.push_str(element.text_content().trim_matches('\n'));
                    writer.block_boundary();
                }
                TagRole::Block | TagRole::Heading(_) => {
                    writer.block_boundary();
                    steps.push(Step::CloseBlock);
                    steps.push(Step::Children(&element.children, element.is_page_marker()));
                }
                TagRole::Link | TagRole::Inline => {
                    let in_label = in_label || element.is_page_marker();
                    steps.push(Step::Children(&element.children, in_label));
                }
            },
        }
    }

    writer.finish()
}

/// Pending work for the render loop. The flag marks inline text that
/// belongs to a page label.
enum Step<'a> {
    Node(&'a Node, bool),
    Element(&'a Element, bool),
    Children(&'a [Node], bool),
    CloseBlock,
}

/// Streaming text writer tracking line and whitespace state
#[derive(Default)]
struct Writer {
    out: String,
    /// A whitespace run was seen and not yet written
    pending_space: bool,
}

impl Writer {
    fn text(&mut self, text: &str) {
        for c in text.chars() {
            if c.is_whitespace() {
                self.pending_space = true;
            } else {
                self.flush_space();
                self.out.push(c);
            }
        }
    }

    fn inline_token(&mut self, token: &str) {
        self.flush_space();
        self.out.push_str(token);
    }

    fn flush_space(&mut self) {
        if self.pending_space && !self.at_line_start() {
            self.out.push(' ');
        }
        self.pending_space = false;
    }

    fn at_line_start(&self) -> bool {
        self.out.is_empty() || self.out.ends_with('\n')
    }

    fn line_break(&mut self) {
        self.pending_space = false;
        trim_trailing_spaces(&mut self.out);
        self.out.push('\n');
    }

    /// End the current line and leave exactly one blank line behind it
    fn block_boundary(&mut self) {
        self.pending_space = false;
        trim_trailing_spaces(&mut self.out);
        if self.out.is_empty() {
            return;
        }
        let trailing = self.out.len() - self.out.trim_end_matches('\n').len();
        for _ in trailing..2 {
            self.out.push('\n');
        }
    }

    fn finish(self) -> String {
        self.out.trim().to_string()
    }
}

fn trim_trailing_spaces(out: &mut String) {
    let kept = out.trim_end_matches([' ', '\t']).len();
    out.truncate(kept);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;
    use crate::rules::rewrite;

    fn render(html: &str) -> String {
        let mut doc = parse_html(html).unwrap();
        rewrite(&mut doc);
        render_markdown(&doc)
    }

    #[test]
    fn test_simple_paragraph() {
        assert_eq!(render("<p>Hello World</p>"), "Hello World");
    }

    #[test]
    fn test_blocks_are_separated_by_one_blank_line() {
        assert_eq!(render("<p>one</p><div><p>two</p></div>"), "one\n\ntwo");
    }

    #[test]
    fn test_whitespace_collapses_across_removed_nodes() {
        assert_eq!(
            render(r#"<p>Texto com <img src="x.jpg"> e <a href="y">link</a>.</p>"#),
            "Texto com e link."
        );
    }

    #[test]
    fn test_no_markdown_syntax_generated() {
        assert_eq!(
            render("<p><strong>bold</strong> <em>it</em> a*b_c</p>"),
            "bold it a*b_c"
        );
    }

    #[test]
    fn test_unicode_passes_through() {
        assert_eq!(render("<p>Ação – “ok” 日本</p>"), "Ação – “ok” 日本");
    }

    #[test]
    fn test_line_break() {
        assert_eq!(render("<p>a<br>b</p>"), "a\nb");
    }

    #[test]
    fn test_preformatted_kept_verbatim() {
        assert_eq!(render("<pre>a  b\n  c</pre>"), "a  b\n  c");
    }

    #[test]
    fn test_ignored_elements() {
        assert_eq!(
            render("<html><head><title>T</title><style>p{}</style></head><body><script>x()</script><p>ok</p></body></html>"),
            "ok"
        );
    }

    #[test]
    fn test_marker_label_is_not_repeated() {
        assert_eq!(
            render(r#"<span class="p-Pagina"> 12   e 13 </span>"#),
            "<!-- Página 12   e 13 -->"
        );
        assert_eq!(
            render(r#"<p>fim <span class="p-Pagina">5</span> início</p>"#),
            "fim <!-- Página 5 --> início"
        );
    }

    #[test]
    fn test_marker_block_content_is_rendered() {
        assert_eq!(
            render(r#"<div class="p-Pagina">7<p>Corpo do capítulo</p></div>"#),
            "<!-- Página 7Corpo do capítulo -->\n\nCorpo do capítulo"
        );
    }

    #[test]
    fn test_nested_marker_comments_are_rendered() {
        assert_eq!(
            render(r#"<span class="p-Pagina">3 <span class="p-Pagina">4</span></span>"#),
            "<!-- Página 3 4 --><!-- Página 4 -->"
        );
        assert_eq!(
            render(r#"<div class="p-Pagina">3 <span class="p-Pagina">4</span></div>"#),
            "<!-- Página 3 4 -->\n\n<!-- Página 4 -->"
        );
    }

    #[test]
    fn test_deeply_nested_render() {
        let html = "<div>".repeat(5_000) + &"<span>".repeat(20_000) + "fundo";
        assert_eq!(render(&html), "fundo");
    }

    #[test]
    fn test_headings_render_as_plain_lines() {
        assert_eq!(render("<h3>Seção</h3><h4>Sub</h4>"), "### Seção\n\n### Sub");
    }

    #[test]
    fn test_links_render_text_without_normalization() {
        let mut a = Element::new("a");
        a.set_attr("href", "https://example.com");
        a.add_child(Node::text("Link"));
        let mut root = Element::new("p");
        root.add_child(Node::Element(a));
        root.add_child(Node::element("img"));

        assert_eq!(render_markdown(&Document::new(root)), "Link");
    }
}
