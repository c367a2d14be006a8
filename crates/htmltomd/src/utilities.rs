//! Tag role table shared by the rewrite passes and the renderer.
//!
//! Lookups take tag names as stored on [`crate::Element`], already lowercase.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// What a tag means to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRole {
    /// `h1`..`h6`, carrying the level
    Heading(u8),
    /// `img`, `video`, `audio`
    Media,
    /// `a`
    Link,
    /// `br`
    LineBreak,
    /// `pre`
    Preformatted,
    /// Elements whose content never reaches the output
    Ignored,
    /// Elements that start and end on their own line
    Block,
    /// Everything else
    Inline,
}

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "canvas", "center",
    "dd", "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure",
    "footer", "form", "frameset", "header", "hgroup", "hr", "html",
    "isindex", "li", "main", "menu", "nav", "noframes", "ol", "output", "p",
    "section", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Elements whose content is never rendered
pub const IGNORED_ELEMENTS: &[&str] = &[
    "head", "title", "script", "style", "noscript", "template",
];

/// Media elements removed with their whole subtree
pub const MEDIA_ELEMENTS: &[&str] = &["img", "video", "audio"];

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

static TAG_ROLES: Lazy<HashMap<&'static str, TagRole>> = Lazy::new(|| {
    let mut roles = HashMap::new();
    for tag in BLOCK_ELEMENTS {
        roles.insert(*tag, TagRole::Block);
    }
    for tag in IGNORED_ELEMENTS {
        roles.insert(*tag, TagRole::Ignored);
    }
    for tag in MEDIA_ELEMENTS {
        roles.insert(*tag, TagRole::Media);
    }
    for (level, tag) in ["h1", "h2", "h3", "h4", "h5", "h6"].into_iter().enumerate() {
        roles.insert(tag, TagRole::Heading(level as u8 + 1));
    }
    roles.insert("a", TagRole::Link);
    roles.insert("br", TagRole::LineBreak);
    roles.insert("pre", TagRole::Preformatted);
    roles
});

/// Look up the role of a tag. Unknown tags are inline.
pub fn role_of(tag: &str) -> TagRole {
    TAG_ROLES.get(tag).copied().unwrap_or(TagRole::Inline)
}

/// Check if a tag is a void element
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Markdown prefix for a heading level. Levels 3 and deeper share `###`.
pub fn heading_prefix(level: u8) -> &'static str {
    match level {
        1 => "#",
        2 => "##",
        _ => "###",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles() {
        assert_eq!(role_of("h2"), TagRole::Heading(2));
        assert_eq!(role_of("video"), TagRole::Media);
        assert_eq!(role_of("a"), TagRole::Link);
        assert_eq!(role_of("script"), TagRole::Ignored);
        assert_eq!(role_of("span"), TagRole::Inline);
        assert_eq!(role_of("custom-tag"), TagRole::Inline);
        assert_eq!(role_of("div"), TagRole::Block);
        assert_eq!(role_of("body"), TagRole::Block);
    }

    #[test]
    fn test_heading_prefix_collapses_deep_levels() {
        assert_eq!(heading_prefix(1), "#");
        assert_eq!(heading_prefix(2), "##");
        for level in 3..=6 {
            assert_eq!(heading_prefix(level), "###");
        }
    }

    #[test]
    fn test_is_void() {
        assert!(is_void("br"));
        assert!(is_void("img"));
        assert!(is_void("hr"));
        assert!(!is_void("div"));
    }
}
