//! Plain-text rendering.
//!
//! No tags in the output. A handful of tags contribute structural text:
//! anchors append their resolved absolute URL in parentheses, `div` and
//! `br` emit a newline, `hr` emits a literal separator line.

use crate::context::RenderContext;
use crate::html::anchor_target;
use crate::node::{Element, Node, ROOT_TAG};
use crate::tags::{self, TagKind};

const RULE_LINE: &str = "\n----------\n";

/// Render a tree to plain text.
#[must_use]
pub fn render_text(tree: &Node, ctx: &RenderContext<'_>) -> String {
    let mut out = String::new();
    tree.write_text(&mut out, ctx);
    out
}

impl Node {
    /// Append this node's plain-text rendering to `out`.
    pub fn write_text(&self, out: &mut String, ctx: &RenderContext<'_>) {
        match self {
            Node::Text(text) => out.push_str(&text.content),
            Node::Element(element) => write_element(element, out, ctx),
            // Modules render no synchronous text of their own.
            Node::Module(_) => {}
            Node::IfModule(cond) => {
                if ctx.helper.check_condition(&cond.condition) {
                    for child in &cond.children {
                        child.write_text(out, ctx);
                    }
                }
            }
        }
    }
}

fn write_element(element: &Element, out: &mut String, ctx: &RenderContext<'_>) {
    let write_children = |out: &mut String| {
        for child in &element.children {
            child.write_text(out, ctx);
        }
    };
    if element.tag() == ROOT_TAG {
        write_children(out);
        return;
    }
    let Some(spec) = tags::tag_spec(element.tag()) else {
        write_children(out);
        return;
    };
    match spec.kind {
        TagKind::Anchor { href_prefix } => {
            let target = anchor_target(element, href_prefix);
            let url = ctx.helper.absolute_url(&target);
            let before = out.len();
            write_children(out);
            if out.len() == before {
                // Fallback text, same as the HTML target.
                out.push_str(element.options().unwrap_or(&target).trim());
            }
            out.push_str(&format!(" ({url})"));
        }
        TagKind::Break => out.push('\n'),
        TagKind::Rule => out.push_str(RULE_LINE),
        // Void: anything under it is a construction bug, never emitted.
        TagKind::Image => {}
        TagKind::Plain if element.tag() == "div" => {
            write_children(out);
            out.push('\n');
        }
        TagKind::ListItem => {
            out.push('\n');
            write_children(out);
        }
        _ => write_children(out),
    }
}
