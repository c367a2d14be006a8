//! Tree rewrite passes.
//!
//! Each pass is a [`Rule`]: a [`Filter`] selecting elements plus a function
//! deciding their [`Replacement`]. The converter runs them in a fixed order:
//! page breaks, media, links, headings. Links are flattened after media is
//! stripped so an image inside a link never survives as text.

mod heading;
mod link;
mod media;
mod page_break;
mod rule;

pub use heading::{heading_rule, normalize_headers, HEADING_REPLACEMENT_TAG};
pub use link::{flatten_links, link_rule};
pub use media::{media_rule, remove_media};
pub use page_break::{mark_page_breaks, page_break_rule, page_comment};
pub use rule::{Filter, Replacement, ReplacementFn, Rule};

use crate::node::Document;

/// Run every rewrite pass in pipeline order
pub fn rewrite(doc: &mut Document) {
    mark_page_breaks(doc);
    remove_media(doc);
    flatten_links(doc);
    normalize_headers(doc);
}
