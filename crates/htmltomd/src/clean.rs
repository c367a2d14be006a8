//! Final text cleanup of rendered Markdown.
//!
//! Rules (applied in order, repeated until the text stops changing):
//! 1. Collapse 3+ consecutive newlines down to 2
//! 2. Remove raw page-marker fragments, optionally wrapped in backticks.
//!    The renderer never writes markup, so these only come from text that
//!    spelled out marker markup literally.
//! 3. Trim the whole text
//!
//! Page-marker comments (`<!-- Página N -->`) are a different token shape and
//! are never touched.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::PAGE_MARKER_CLASS;

/// Clean rendered Markdown. Pure, total and idempotent.
pub fn clean_markdown(markdown: &str) -> String {
    let mut current = clean_pass(markdown);
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_pass(input: &str) -> String {
    let s = collapse_blank_lines(input);
    let s = strip_marker_fragments(&s);
    let s = collapse_blank_lines(&s);
    s.trim().to_string()
}

// ── Rule 1: Collapse blank lines ─────────────────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").into_owned()
}

// ── Rule 2: Remove page-marker fragments ─────────────────────────────────────

/// Opening tag with a class attribute, optionally preceded by a backtick.
/// Group 1 is the tag name (anything up to whitespace, as html5ever reads
/// it), group 2 or 3 the class value.
static RE_OPENING_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"`?<([^\s/<>!?]+)\s(?:[^>]*?\s)?class\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*>"#,
    )
    .unwrap()
});

fn strip_marker_fragments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(caps) = RE_OPENING_TAG.captures(rest) {
        let Some(whole) = caps.get(0) else { break };
        let tag = &caps[1];
        let class = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());

        let is_marker = class.split_whitespace().any(|t| t == PAGE_MARKER_CLASS);
        let closing = if is_marker {
            find_closing_tag(&rest[whole.end()..], tag)
        } else {
            None
        };

        match closing {
            Some(close_end) => {
                out.push_str(&rest[..whole.start()]);
                let mut end = whole.end() + close_end;
                if rest[end..].starts_with('`') {
                    end += 1;
                }
                rest = &rest[end..];
            }
            None => {
                out.push_str(&rest[..whole.end()]);
                rest = &rest[whole.end()..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Byte offset just past the first `</tag>` on the current line
fn find_closing_tag(after: &str, tag: &str) -> Option<usize> {
    let line = after.split('\n').next().unwrap_or_default();
    let needle = format!("</{}>", tag.to_ascii_lowercase());
    line.to_ascii_lowercase()
        .find(&needle)
        .map(|start| start + needle.len())
}
