//! Deterministic diagnostic dump.
//!
//! Every control character, line break and tag boundary is visible in the
//! output, which makes the dump usable both for debugging a parse and for
//! exact-match assertions in tests.

use std::fmt::Write;

use crate::node::Node;

impl Node {
    /// Whitespace-explicit textual dump of the tree.
    ///
    /// One node per line, two-space indent per depth. Text content is
    /// rendered with `escape_debug`, so `"a\nb"` shows the `\n`. Module
    /// parameters are emitted in key order.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        match self {
            Node::Text(text) => {
                writeln!(
                    out,
                    "text {}..{} \"{}\"",
                    text.char_start,
                    text.char_end,
                    text.content.escape_debug()
                )
                .unwrap();
            }
            Node::Element(element) => {
                write!(
                    out,
                    "element {} {}..{}",
                    element.tag(),
                    element.char_start,
                    element.char_end
                )
                .unwrap();
                for (name, value) in &element.attributes {
                    write!(out, " {name}=\"{}\"", value.escape_debug()).unwrap();
                }
                out.push('\n');
                for child in &element.children {
                    child.dump_into(out, depth + 1);
                }
            }
            Node::Module(module) => {
                write!(out, "module {}", module.name).unwrap();
                for (key, value) in module.parameters.sorted_entries() {
                    write!(out, " {key}=\"{}\"", value.escape_debug()).unwrap();
                }
                out.push('\n');
            }
            Node::IfModule(cond) => {
                writeln!(out, "if {}", cond.condition).unwrap();
                for child in &cond.children {
                    child.dump_into(out, depth + 1);
                }
            }
        }
    }
}
