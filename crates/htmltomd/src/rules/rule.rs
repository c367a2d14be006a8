//! Rule and Filter types for tree rewrites.

use crate::node::{Document, Element, Node};
use crate::utilities::TagRole;

/// Type alias for replacement functions
pub type ReplacementFn = Box<dyn Fn(&Element) -> Replacement + Send + Sync>;

/// A filter determines which elements a rule applies to
pub enum Filter {
    /// Match any element with this role
    Role(TagRole),
    /// Match using a predicate function
    Predicate(Box<dyn Fn(&Element) -> bool + Send + Sync>),
}

impl Filter {
    /// Create a filter for a single role
    pub fn role(role: TagRole) -> Self {
        Filter::Role(role)
    }

    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Element) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter matches an element
    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Filter::Role(role) => element.role() == *role,
            Filter::Predicate(f) => f(element),
        }
    }
}

/// What to do with a matched element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Leave the element (and keep visiting its children)
    Keep,
    /// Insert a node right before the element, then keep visiting it
    InsertBefore(Node),
    /// Drop the element and its subtree
    Remove,
    /// Put this node where the element was
    ReplaceWith(Node),
}

/// A rule rewrites every element its filter matches
pub struct Rule {
    /// Filter to determine which elements this rule applies to
    pub filter: Filter,
    /// Replacement function deciding the rewrite
    pub replacement: ReplacementFn,
}

impl Rule {
    /// Create a new rule
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&Element) -> Replacement + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(replacement),
        }
    }

    /// Apply this rule's replacement
    pub fn replace(&self, element: &Element) -> Replacement {
        (self.replacement)(element)
    }

    /// Rewrite the whole document in document order and return how many
    /// elements were matched.
    ///
    /// The root element itself is never replaced. Each element's children
    /// are taken out and rebuilt into it as the walk passes through, so the
    /// walk keeps its own stack of open elements instead of recursing.
    pub fn apply(&self, doc: &mut Document) -> usize {
        let mut root = std::mem::replace(doc.root_mut(), Element::new("html"));
        let children = std::mem::take(&mut root.children);
        let mut stack = vec![(root, children.into_iter())];
        let mut matched = 0;

        loop {
            let Some((parent, pending)) = stack.last_mut() else {
                break;
            };
            let Some(node) = pending.next() else {
                if let Some((done, _)) = stack.pop() {
                    match stack.last_mut() {
                        Some((parent, _)) => parent.add_child(Node::Element(done)),
                        None => *doc.root_mut() = done,
                    }
                }
                continue;
            };

            let mut element = match node {
                Node::Element(element) => element,
                other => {
                    parent.add_child(other);
                    continue;
                }
            };

            let replacement = if self.filter.matches(&element) {
                matched += 1;
                self.replace(&element)
            } else {
                Replacement::Keep
            };

            match replacement {
                Replacement::Keep => {}
                Replacement::InsertBefore(node) => parent.add_child(node),
                Replacement::Remove => continue,
                Replacement::ReplaceWith(node) => {
                    parent.add_child(node);
                    continue;
                }
            }

            let children = std::mem::take(&mut element.children);
            stack.push((element, children.into_iter()));
        }

        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(children: Vec<Node>) -> Document {
        let mut root = Element::new("html");
        for child in children {
            root.add_child(child);
        }
        Document::new(root)
    }

    #[test]
    fn test_filter_matches() {
        let img = Element::new("img");
        let span = Element::new("span");

        assert!(Filter::role(TagRole::Media).matches(&img));
        assert!(!Filter::role(TagRole::Media).matches(&span));
        assert!(!Filter::role(TagRole::Link).matches(&img));
        assert!(Filter::predicate(|e| e.tag_name() == "span").matches(&span));
    }

    #[test]
    fn test_remove_reaches_nested_elements() {
        let mut p = Element::new("p");
        p.add_child(Node::text("a"));
        p.add_child(Node::element("img"));
        p.add_child(Node::text("b"));
        let mut doc = doc_with(vec![Node::Element(p), Node::element("img")]);

        let rule = Rule::new(Filter::role(TagRole::Media), |_| Replacement::Remove);
        assert_eq!(rule.apply(&mut doc), 2);
        assert_eq!(doc.count_elements(|e| e.tag_name() == "img"), 0);
        assert_eq!(doc.root().text_content(), "ab");
    }

    #[test]
    fn test_insert_before_keeps_position_and_visits_children() {
        let mut outer = Element::new("div");
        outer.set_attr("class", "mark");
        let mut inner = Element::new("span");
        inner.set_attr("class", "mark");
        outer.add_child(Node::Element(inner));
        let mut doc = doc_with(vec![Node::text("x"), Node::Element(outer)]);

        let rule = Rule::new(Filter::predicate(|e| e.has_class("mark")), |e| {
            Replacement::InsertBefore(Node::comment(e.tag_name()))
        });
        assert_eq!(rule.apply(&mut doc), 2);

        let root = doc.root();
        assert_eq!(root.children[1], Node::comment("div"));
        let div = root.children[2].as_element().unwrap();
        assert_eq!(div.children[0], Node::comment("span"));
    }

    #[test]
    fn test_replace_with_does_not_revisit_replacement() {
        let mut doc = doc_with(vec![Node::element("a"), Node::text("tail")]);

        let rule = Rule::new(Filter::role(TagRole::Link), |_| {
            Replacement::ReplaceWith(Node::element("a"))
        });
        assert_eq!(rule.apply(&mut doc), 1);
        assert_eq!(doc.root().children.len(), 2);
    }

    #[test]
    fn test_apply_handles_deep_nesting() {
        let mut inner = Element::new("span");
        inner.add_child(Node::element("img"));
        for _ in 0..100_000 {
            let mut outer = Element::new("span");
            outer.add_child(Node::Element(inner));
            inner = outer;
        }
        let mut doc = doc_with(vec![Node::Element(inner), Node::text("tail")]);

        let rule = Rule::new(Filter::role(TagRole::Media), |_| Replacement::Remove);
        assert_eq!(rule.apply(&mut doc), 1);
        assert_eq!(doc.count_elements(|e| e.tag_name() == "img"), 0);
        assert_eq!(doc.depth(), 100_002);
        assert_eq!(doc.root().text_content(), "tail");
    }
}
