//! Table-of-contents projection.
//!
//! A tree-to-tree transform producing the node list a heading outline is
//! built from. Anchors and line breaks are elided entirely — their
//! children are flattened into the parent position — so the outline
//! carries no inline links or breaks. The projection is a deep copy; the
//! source tree is never touched.

use crate::context::RenderContext;
use crate::node::Node;
use crate::tags::{self, TagKind};

impl Node {
    /// Project this node for a TOC: a possibly empty, possibly
    /// multi-element sequence of fresh nodes.
    ///
    /// Conditional subtrees are evaluated here like in every other render
    /// target; a false condition contributes nothing.
    #[must_use]
    pub fn clone_for_toc(&self, ctx: &RenderContext<'_>) -> Vec<Node> {
        match self {
            Node::Text(_) | Node::Module(_) => vec![self.clone()],
            Node::Element(element) => {
                let projected: Vec<Node> = element
                    .children
                    .iter()
                    .flat_map(|child| child.clone_for_toc(ctx))
                    .collect();
                if is_toc_excluded(element.tag()) {
                    // Elide the element, keep its text-bearing descendants.
                    return projected;
                }
                let mut copy = element.clone();
                copy.children = projected;
                vec![Node::Element(copy)]
            }
            Node::IfModule(cond) => {
                if ctx.helper.check_condition(&cond.condition) {
                    cond.children
                        .iter()
                        .flat_map(|child| child.clone_for_toc(ctx))
                        .collect()
                } else {
                    Vec::new()
                }
            }
        }
    }
}

/// Whether a tag is on the TOC blacklist (the whole anchor family and
/// line breaks).
fn is_toc_excluded(tag: &str) -> bool {
    tags::tag_spec(tag).is_some_and(|spec| {
        matches!(spec.kind, TagKind::Anchor { .. } | TagKind::Break)
    })
}
