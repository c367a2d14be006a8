//! Heading normalization.
//!
//! Headings are rewritten into plain `p` elements whose text already carries
//! the Markdown prefix, so the renderer never derives a heading level itself.
//! Levels 3 to 6 all become `###`.

use tracing::debug;

use super::{Filter, Replacement, Rule};
use crate::node::{Document, Element, Node};
use crate::utilities::{heading_prefix, TagRole};

/// Tag of the block that replaces a heading
pub const HEADING_REPLACEMENT_TAG: &str = "p";

pub fn heading_rule() -> Rule {
    Rule::new(
        Filter::predicate(|e| matches!(e.role(), TagRole::Heading(_))),
        |element| {
            let TagRole::Heading(level) = element.role() else {
                return Replacement::Keep;
            };
            let text = element.text_content();
            let mut block = Element::new(HEADING_REPLACEMENT_TAG);
            block.add_child(Node::Text(format!("{} {}", heading_prefix(level), text.trim())));
            Replacement::ReplaceWith(Node::Element(block))
        },
    )
}

/// Replace every `h1`..`h6` with a `p` holding `"<prefix> <text>"`.
pub fn normalize_headers(doc: &mut Document) {
    let headings = heading_rule().apply(doc);
    debug!(headings, "normalized headings");
}
