//! The scanner.
//!
//! A single forward pass over the input with an explicit open-tag stack.
//! Tag recognition is driven by the shared table in [`tagmark_ast::tags`];
//! anything the table does not know, and any bracket sequence that fails to
//! form a well-shaped token, is emitted as literal text. Closing tags only
//! close the innermost open tag; a mismatched closer falls through to text
//! rather than reordering the stack.

use tagmark_ast::tags::{Dialect, TagKind, TagSpec, tag_spec_in};
use tagmark_ast::{Element, ModuleParams, ModuleRegistry, Node, OPTIONS_ATTRIBUTE, ROOT_TAG};

use crate::dialect::ForumCapabilities;

/// Parse wiki markup into a tree rooted at a synthetic `_root` element.
///
/// `modules` decides which `[[name|...]]` invocations are recognized;
/// payloads naming anything else stay literal text. Never fails: malformed
/// input degrades to text and unbalanced tags are closed at end of input.
#[must_use]
pub fn parse_wiki(input: &str, modules: &dyn ModuleRegistry) -> Node {
    Scanner::new(input, Dialect::Wiki, Some(modules)).run()
}

/// Parse a forum post into a tree rooted at a synthetic `_root` element.
///
/// With BBCode disabled in `capabilities` the input is not scanned at all
/// and the root carries one literal text node.
#[must_use]
pub fn parse_forum(input: &str, capabilities: ForumCapabilities) -> Node {
    if capabilities.enable_bbcode {
        return Scanner::new(input, Dialect::Forum, None).run();
    }
    let chars = input.chars().count();
    let children = if input.is_empty() {
        Vec::new()
    } else {
        vec![Node::text(input, 0, chars)]
    };
    Node::Element(
        Element::new(ROOT_TAG)
            .with_children(children)
            .with_span(0, chars),
    )
}

/// Wiki shorthand that parses to a `toc` module invocation.
const TOC_SHORTHAND: &str = "%%TOC%%";

enum FrameKind {
    Root,
    Element {
        spec: &'static TagSpec,
        options: Option<String>,
    },
    If {
        condition: String,
    },
}

struct Frame {
    kind: FrameKind,
    children: Vec<Node>,
    char_start: usize,
}

struct Scanner<'a> {
    input: &'a str,
    dialect: Dialect,
    modules: Option<&'a dyn ModuleRegistry>,
    /// Byte position of the scan head.
    pos: usize,
    /// Char position of the scan head; spans are char offsets.
    chars: usize,
    /// Start of the pending literal run, bytes and chars.
    run_start: usize,
    run_char_start: usize,
    stack: Vec<Frame>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, dialect: Dialect, modules: Option<&'a dyn ModuleRegistry>) -> Self {
        Self {
            input,
            dialect,
            modules,
            pos: 0,
            chars: 0,
            run_start: 0,
            run_char_start: 0,
            stack: vec![Frame {
                kind: FrameKind::Root,
                children: Vec::new(),
                char_start: 0,
            }],
        }
    }

    fn run(mut self) -> Node {
        while self.pos < self.input.len() {
            let rest = &self.input[self.pos..];
            if self.dialect == Dialect::Wiki {
                if rest.starts_with(TOC_SHORTHAND) {
                    self.flush_text();
                    self.append(Node::module("toc", ModuleParams::new()));
                    self.consume(TOC_SHORTHAND.len());
                    continue;
                }
                if rest.starts_with("[[") && self.try_module() {
                    continue;
                }
            }
            if rest.starts_with('[') && self.try_tag() {
                continue;
            }
            self.bump_literal();
        }
        self.flush_text();
        while self.stack.len() > 1 {
            let top = self.stack.last().expect("stack is non-empty");
            tracing::debug!(
                tag = frame_name(&top.kind),
                "unbalanced tag still open at end of input, closing implicitly"
            );
            self.pop_frame(self.chars);
        }
        let root = self.stack.pop().expect("root frame");
        Node::Element(
            Element::new(ROOT_TAG)
                .with_children(root.children)
                .with_span(0, self.chars),
        )
    }

    /// Try to consume a `[[name|key=value|...]]` module invocation.
    ///
    /// The payload must fit on one line, contain no `[`, and name a module
    /// the registry knows. Anything else leaves the head untouched so the
    /// brackets scan as literal text.
    fn try_module(&mut self) -> bool {
        let Some(registry) = self.modules else {
            return false;
        };
        let rest = &self.input[self.pos..];
        let Some(end) = rest[2..].find("]]") else {
            return false;
        };
        let payload = &rest[2..2 + end];
        if payload.contains('\n') || payload.contains('[') {
            return false;
        }
        let (name, parameters) = ModuleParams::parse(payload);
        if name.is_empty() || !registry.is_module(&name) {
            return false;
        }
        self.flush_text();
        self.append(Node::module(name, parameters));
        self.consume(2 + end + 2);
        true
    }

    /// Try to consume a `[name=options]` opener or `[/name]` closer.
    ///
    /// Returns `false` on any mismatch (unknown tag, closer that does not
    /// match the innermost open tag, newline before `]`), leaving the head
    /// untouched.
    fn try_tag(&mut self) -> bool {
        let rest = &self.input[self.pos..];
        let bytes = rest.as_bytes();
        let closing = bytes.get(1) == Some(&b'/');
        let name_start = if closing { 2 } else { 1 };
        let mut i = name_start;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        if i == name_start {
            return false;
        }
        let name = normalize_name(&rest[name_start..i]);
        let mut options: Option<&str> = None;
        if !closing && bytes.get(i) == Some(&b'=') {
            let value_start = i + 1;
            let mut j = value_start;
            while j < bytes.len() && bytes[j] != b']' && bytes[j] != b'\n' {
                j += 1;
            }
            if bytes.get(j) != Some(&b']') {
                return false;
            }
            options = Some(&rest[value_start..j]);
            i = j;
        }
        if bytes.get(i) != Some(&b']') {
            return false;
        }
        let token_len = i + 1;

        if closing {
            let top = self.stack.last().expect("stack is non-empty");
            let matches_top = match &top.kind {
                FrameKind::Element { spec, .. } => spec.name == name,
                FrameKind::If { .. } => name == "if",
                FrameKind::Root => false,
            };
            if !matches_top {
                return false;
            }
            self.flush_text();
            self.consume(token_len);
            self.pop_frame(self.chars);
            return true;
        }

        let Some(spec) = tag_spec_in(&name, self.dialect) else {
            return false;
        };
        self.flush_text();
        let char_start = self.chars;
        let options = options.map(str::to_owned);
        self.consume(token_len);

        if matches!(spec.kind, TagKind::If) {
            self.stack.push(Frame {
                kind: FrameKind::If {
                    condition: options.unwrap_or_default().trim().to_owned(),
                },
                children: Vec::new(),
                char_start,
            });
        } else if spec.parses_empty() {
            let mut element = Element::new(spec.name).with_span(char_start, self.chars);
            if let Some(options) = options {
                element = element.with_attribute(OPTIONS_ATTRIBUTE, options);
            }
            self.append(Node::Element(element));
        } else if spec.suppresses_parsing() {
            self.consume_literal_block(spec, options, char_start);
        } else {
            self.stack.push(Frame {
                kind: FrameKind::Element { spec, options },
                children: Vec::new(),
                char_start,
            });
        }
        true
    }

    /// Consume everything up to this tag's own closer as one literal text
    /// child. Without a closer the rest of the input is taken.
    fn consume_literal_block(
        &mut self,
        spec: &'static TagSpec,
        options: Option<String>,
        char_start: usize,
    ) {
        let body = &self.input[self.pos..];
        let (content_len, closer_len) = find_closer(body, spec.name).unwrap_or_else(|| {
            tracing::debug!(
                tag = spec.name,
                "literal block has no closing tag, taking rest of input"
            );
            (body.len(), 0)
        });
        let content = &self.input[self.pos..self.pos + content_len];
        let content_char_start = self.chars;
        self.consume(content_len);
        let content_char_end = self.chars;
        self.consume(closer_len);

        let mut element = Element::new(spec.name).with_span(char_start, self.chars);
        if let Some(options) = options {
            element = element.with_attribute(OPTIONS_ATTRIBUTE, options);
        }
        if !content.is_empty() {
            element = element.with_children(vec![Node::text(
                content,
                content_char_start,
                content_char_end,
            )]);
        }
        self.append(Node::Element(element));
    }

    /// Close the innermost frame, attaching its node to the new top.
    fn pop_frame(&mut self, char_end: usize) {
        let frame = self.stack.pop().expect("caller checked a non-root frame");
        let node = match frame.kind {
            FrameKind::Root => unreachable!("root frame is never popped here"),
            FrameKind::Element { spec, options } => {
                let mut element = Element::new(spec.name)
                    .with_children(frame.children)
                    .with_span(frame.char_start, char_end);
                if let Some(options) = options {
                    element = element.with_attribute(OPTIONS_ATTRIBUTE, options);
                }
                Node::Element(element)
            }
            FrameKind::If { condition } => Node::if_module(condition, frame.children),
        };
        self.append(node);
    }

    fn append(&mut self, node: Node) {
        self.stack
            .last_mut()
            .expect("stack is non-empty")
            .children
            .push(node);
    }

    /// Emit the pending literal run, if any, as a text node.
    fn flush_text(&mut self) {
        if self.run_start < self.pos {
            let content = &self.input[self.run_start..self.pos];
            self.append(Node::text(content, self.run_char_start, self.chars));
        }
        self.run_start = self.pos;
        self.run_char_start = self.chars;
    }

    /// Advance past consumed token bytes, restarting the literal run.
    fn consume(&mut self, len: usize) {
        self.chars += self.input[self.pos..self.pos + len].chars().count();
        self.pos += len;
        self.run_start = self.pos;
        self.run_char_start = self.chars;
    }

    /// Advance one char, extending the pending literal run.
    fn bump_literal(&mut self) {
        let c = self.input[self.pos..]
            .chars()
            .next()
            .expect("head is in bounds");
        self.pos += c.len_utf8();
        self.chars += 1;
    }
}

fn frame_name(kind: &FrameKind) -> &'static str {
    match kind {
        FrameKind::Root => ROOT_TAG,
        FrameKind::Element { spec, .. } => spec.name,
        FrameKind::If { .. } => "if",
    }
}

/// Chars allowed in a tag name token. `:` admits BBCode uid suffixes
/// (`[quote:1a2b]`), `*` the list-item marker.
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b':' || b == b'*'
}

/// Canonical table name for a raw tag token: lowercased, uid suffix
/// stripped, `*` mapped to the `li` marker.
fn normalize_name(raw: &str) -> String {
    let base = raw.split(':').next().unwrap_or(raw);
    if base == "*" {
        "li".to_owned()
    } else {
        base.to_ascii_lowercase()
    }
}

/// Find `[/name]` (case-insensitive, uid suffix tolerated) in `body`.
/// Returns the byte offset and the closer's byte length.
fn find_closer(body: &str, name: &str) -> Option<(usize, usize)> {
    let bytes = body.as_bytes();
    let needle = name.as_bytes();
    let mut i = 0;
    while i + needle.len() + 3 <= bytes.len() {
        if bytes[i] == b'['
            && bytes[i + 1] == b'/'
            && bytes[i + 2..i + 2 + needle.len()].eq_ignore_ascii_case(needle)
        {
            let mut j = i + 2 + needle.len();
            while j < bytes.len() && is_name_byte(bytes[j]) {
                j += 1;
            }
            if bytes.get(j) == Some(&b']') {
                return Some((i, j + 1 - i));
            }
        }
        i += 1;
    }
    None
}
