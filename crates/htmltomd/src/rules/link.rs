//! Link flattening.

use tracing::debug;

use super::{Filter, Replacement, Rule};
use crate::node::{Document, Node};
use crate::utilities::TagRole;

pub fn link_rule() -> Rule {
    Rule::new(Filter::role(TagRole::Link), |element| {
        Replacement::ReplaceWith(Node::Text(element.text_content()))
    })
}

/// Replace every `a` element with a single text node holding its
/// concatenated descendant text. The destination is dropped.
pub fn flatten_links(doc: &mut Document) {
    let flattened = link_rule().apply(doc);
    debug!(flattened, "flattened links");
}
