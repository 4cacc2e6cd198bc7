//! Meta-description extraction.
//!
//! Accumulates prose text up to a fixed character budget; overflow is
//! dropped and replaced with an ellipsis. Non-prose containers (a `div`
//! without the `paragraph` marker class) are skipped whole, so tables of
//! contents and widget scaffolding never pollute the description.

use crate::context::RenderContext;
use crate::node::{Element, Node, ROOT_TAG};
use crate::tags::{self, TagKind};

const ELLIPSIS: char = '…';

/// Class marking a `div` as prose for description purposes.
const PROSE_CLASS: &str = "paragraph";

/// Length-bounded text accumulator.
///
/// The limit counts characters, ellipsis included; once reached, further
/// pushes are dropped.
#[derive(Debug)]
pub struct MetaDescription {
    buf: String,
    chars: usize,
    limit: usize,
    truncated: bool,
}

impl MetaDescription {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            buf: String::new(),
            chars: 0,
            limit,
            truncated: false,
        }
    }

    /// Append text, keeping the character budget.
    ///
    /// Only the part that does not fit decides truncation: dropping
    /// trailing whitespace alone is not an overflow.
    pub fn push_text(&mut self, text: &str) {
        let mut chars = text.chars();
        while self.chars < self.limit {
            let Some(c) = chars.next() else {
                return;
            };
            self.buf.push(c);
            self.chars += 1;
        }
        if !chars.as_str().trim().is_empty() {
            self.truncated = true;
        }
    }

    /// Append a word separator unless one is already pending.
    pub fn push_separator(&mut self) {
        if !self.buf.is_empty() && !self.buf.ends_with(' ') {
            self.push_text(" ");
        }
    }

    /// Whether the budget has been exhausted (descent can stop early).
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.chars >= self.limit && self.truncated
    }

    /// Final description, with the overflow marker when content was dropped.
    #[must_use]
    pub fn finish(mut self) -> String {
        if self.truncated && self.limit > 0 {
            // Make room for the marker inside the budget.
            while self.chars >= self.limit {
                self.buf.pop();
                self.chars -= 1;
            }
            let trimmed = self.buf.trim_end();
            self.buf.truncate(trimmed.len());
            self.buf.push(ELLIPSIS);
        } else {
            // A trailing block separator is noise.
            let trimmed = self.buf.trim_end();
            self.buf.truncate(trimmed.len());
        }
        self.buf
    }
}

/// Extract a length-bounded description from a tree.
#[must_use]
pub fn render_meta_description(tree: &Node, ctx: &RenderContext<'_>) -> String {
    let mut out = MetaDescription::new(ctx.settings.meta_description_length);
    tree.write_meta_description(&mut out, ctx);
    out.finish()
}

impl Node {
    /// Accumulate this node's prose into a description buffer.
    pub fn write_meta_description(&self, out: &mut MetaDescription, ctx: &RenderContext<'_>) {
        if out.is_full() {
            return;
        }
        match self {
            Node::Text(text) => out.push_text(&text.content),
            Node::Element(element) => write_element(element, out, ctx),
            // Modules never contribute to the description.
            Node::Module(_) => {}
            Node::IfModule(cond) => {
                if ctx.helper.check_condition(&cond.condition) {
                    for child in &cond.children {
                        child.write_meta_description(out, ctx);
                    }
                }
            }
        }
    }
}

fn write_element(element: &Element, out: &mut MetaDescription, ctx: &RenderContext<'_>) {
    let tag = element.tag();
    if tag == "div" && !is_prose_div(element) {
        // Non-prose container: skipped whole, children included.
        return;
    }
    if tag != ROOT_TAG {
        if let Some(spec) = tags::tag_spec(tag) {
            match spec.kind {
                TagKind::Break => {
                    out.push_separator();
                    return;
                }
                TagKind::Rule | TagKind::Image => return,
                _ => {}
            }
        }
    }
    for child in &element.children {
        child.write_meta_description(out, ctx);
    }
    if is_block_boundary(tag) {
        out.push_separator();
    }
}

fn is_prose_div(element: &Element) -> bool {
    element
        .options()
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == PROSE_CLASS))
}

fn is_block_boundary(tag: &str) -> bool {
    matches!(
        tag,
        "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "li" | "td" | "th" | "tr" | "quote"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{PageHelper, RenderSettings};
    use crate::error::ModuleError;
    use crate::node::ModuleParams;
    use pretty_assertions::assert_eq;

    struct TestHelper;

    impl PageHelper for TestHelper {
        fn absolute_url(&self, href: &str) -> String {
            href.to_owned()
        }

        fn check_condition(&self, condition: &str) -> bool {
            condition == "always"
        }

        fn run_module(
            &self,
            _writer: &mut crate::HtmlWriter,
            name: &str,
            _parameters: &ModuleParams,
        ) -> Result<(), ModuleError> {
            Err(ModuleError::Unknown(name.to_owned()))
        }
    }

    fn render_with_limit(tree: &Node, limit: usize) -> String {
        let helper = TestHelper;
        let mut ctx = RenderContext::new(&helper, RenderSettings::default(), tree);
        ctx.settings.meta_description_length = limit;
        render_meta_description(tree, &ctx)
    }

    fn el(tag: &str, children: Vec<Node>) -> Node {
        Node::element(tag, children, 0, 0)
    }

    fn el_opt(tag: &str, options: &str, children: Vec<Node>) -> Node {
        Node::Element(
            crate::Element::new(tag)
                .with_attribute("options", options)
                .with_children(children),
        )
    }

    fn txt(s: &str) -> Node {
        Node::text(s, 0, 0)
    }

    #[test]
    fn test_short_content_passes_through() {
        let tree = Node::root(vec![el("b", vec![txt("Bold")]), txt(" & more")]);
        assert_eq!(render_with_limit(&tree, 255), "Bold & more");
    }

    #[test]
    fn test_bound_enforced_with_ellipsis() {
        let tree = Node::root(vec![txt("abcdefghij")]);
        let description = render_with_limit(&tree, 5);
        assert_eq!(description, "abcd…");
        assert!(description.chars().count() <= 5);
    }

    #[test]
    fn test_exact_fit_has_no_ellipsis() {
        let tree = Node::root(vec![txt("abcde")]);
        assert_eq!(render_with_limit(&tree, 5), "abcde");
    }

    #[test]
    fn test_bound_counts_chars_not_bytes() {
        let tree = Node::root(vec![txt("ééééé and more")]);
        let description = render_with_limit(&tree, 6);
        assert_eq!(description.chars().count(), 6);
        assert!(description.ends_with('…'));
    }

    #[test]
    fn test_non_prose_div_skipped() {
        let tree = Node::root(vec![
            el_opt("div", "toc", vec![txt("1. Contents 2. More")]),
            el_opt("div", "paragraph", vec![txt("Actual prose.")]),
        ]);
        assert_eq!(render_with_limit(&tree, 255), "Actual prose.");
    }

    #[test]
    fn test_bare_div_skipped() {
        let tree = Node::root(vec![
            el("div", vec![txt("widget junk")]),
            txt("prose"),
        ]);
        assert_eq!(render_with_limit(&tree, 255), "prose");
    }

    #[test]
    fn test_block_boundaries_separate_words() {
        let tree = Node::root(vec![
            el("h2", vec![txt("Title")]),
            el_opt("div", "paragraph", vec![txt("Body")]),
        ]);
        assert_eq!(render_with_limit(&tree, 255), "Title Body");
    }

    #[test]
    fn test_br_is_a_separator() {
        let tree = Node::root(vec![txt("one"), el("br", vec![]), txt("two")]);
        assert_eq!(render_with_limit(&tree, 255), "one two");
    }

    #[test]
    fn test_module_contributes_nothing() {
        let tree = Node::root(vec![
            Node::module("gallery", ModuleParams::new()),
            txt("text"),
        ]);
        assert_eq!(render_with_limit(&tree, 255), "text");
    }

    #[test]
    fn test_if_module_gates_description() {
        let tree = Node::root(vec![
            Node::if_module("never", vec![txt("hidden")]),
            Node::if_module("always", vec![txt("shown")]),
        ]);
        assert_eq!(render_with_limit(&tree, 255), "shown");
    }

    #[test]
    fn test_trailing_space_trimmed_before_ellipsis() {
        let tree = Node::root(vec![txt("one two three")]);
        let description = render_with_limit(&tree, 5);
        assert_eq!(description, "one…");
    }

    #[test]
    fn test_whitespace_only_overflow_is_not_truncation() {
        // Only trailing whitespace falls outside the budget.
        let tree = Node::root(vec![txt("abcde ")]);
        assert_eq!(render_with_limit(&tree, 5), "abcde");
    }

    #[test]
    fn test_node_chunking_does_not_change_result() {
        let whole = Node::root(vec![txt("abcde ")]);
        let split = Node::root(vec![txt("abcde"), txt(" ")]);
        assert_eq!(render_with_limit(&whole, 5), render_with_limit(&split, 5));
    }

    #[test]
    fn test_void_tags_contribute_no_children_text() {
        let mut img = crate::Element::new("img");
        img.children = vec![txt("smuggled")];
        let tree = Node::root(vec![txt("a"), Node::Element(img), txt("b")]);
        assert_eq!(render_with_limit(&tree, 255), "ab");
    }
}
