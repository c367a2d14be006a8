//! Page-break markers.

use tracing::debug;

use super::{Filter, Replacement, Rule};
use crate::node::{Document, Node};

/// Comment text for a page label, rendered as `<!-- Página <label> -->`
pub fn page_comment(label: &str) -> String {
    format!(" Página {} ", label)
}

pub fn page_break_rule() -> Rule {
    Rule::new(Filter::predicate(|e| e.is_page_marker()), |element| {
        let text = element.text_content();
        Replacement::InsertBefore(Node::Comment(page_comment(text.trim())))
    })
}

/// Insert a page comment before every element flagged with the
/// `p-Pagina` class token. The flagged element stays in place.
pub fn mark_page_breaks(doc: &mut Document) {
    let markers = page_break_rule().apply(doc);
    debug!(markers, "marked page breaks");
}
