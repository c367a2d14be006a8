//! Media removal.

use tracing::debug;

use super::{Filter, Replacement, Rule};
use crate::node::Document;
use crate::utilities::TagRole;

pub fn media_rule() -> Rule {
    Rule::new(Filter::role(TagRole::Media), |_| Replacement::Remove)
}

/// Delete every `img`, `video` and `audio` element with its subtree,
/// fallback text included.
pub fn remove_media(doc: &mut Document) {
    let removed = media_rule().apply(doc);
    debug!(removed, "removed media elements");
}
