//! The closed node model.

use std::collections::HashMap;

use tagmark_writer::{is_valid_tag_name, is_void_tag};

/// Tag of the synthetic root element every parsed tree hangs from.
///
/// The root is never emitted to any output target; only its children render.
pub const ROOT_TAG: &str = "_root";

/// Attribute key the parser stores a tag's raw `=options` payload under.
pub const OPTIONS_ATTRIBUTE: &str = "options";

/// A node in a parsed markup tree.
///
/// The set of variants is closed; every variant knows how to render itself
/// into each of the four output targets (HTML, plain text, meta
/// description, TOC projection). `Clone` is a deep copy for this shape —
/// mutating a clone never affects the original tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text run.
    Text(TextNode),
    /// Tagged element with ordered attributes and children.
    Element(Element),
    /// Named, parameterized extension point rendered by an external callback.
    Module(ModuleNode),
    /// Subtree gated behind a named condition, evaluated at render time.
    IfModule(IfModuleNode),
}

/// Literal text with its source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub content: String,
    pub char_start: usize,
    pub char_end: usize,
}

/// Tagged element.
///
/// The tag name is validated at construction and kept private so it cannot
/// be swapped for something outside the allow-list after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    /// Ordered attribute list. The parser stores the raw option payload
    /// under the `options` key; renderers interpret it per tag.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    pub char_start: usize,
    pub char_end: usize,
}

/// Module invocation: `[[name|key=value|key2=value2]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNode {
    pub name: String,
    pub parameters: ModuleParams,
}

/// Conditional subtree: `[if=condition]...[/if]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfModuleNode {
    pub condition: String,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element.
    ///
    /// # Panics
    ///
    /// Panics when `tag` is not `_root`, does not match `^[a-z0-9]+$`, or
    /// names foreign content (`script`/`style`). User input never reaches
    /// this constructor with an invalid name — the parser only builds
    /// allow-listed tags — so a violation is a bug in the caller.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        assert!(
            tag == ROOT_TAG || is_valid_tag_name(&tag),
            "invalid element tag {tag:?}"
        );
        assert!(
            tag != "script" && tag != "style",
            "foreign content tag {tag:?} cannot be an element"
        );
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
            char_start: 0,
            char_end: 0,
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Append an attribute, preserving order.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Set the children.
    ///
    /// # Panics
    ///
    /// Panics when the tag is void and `children` is non-empty.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        assert!(
            children.is_empty() || !is_void_tag(&self.tag),
            "void tag {:?} cannot have children",
            self.tag
        );
        self.children = children;
        self
    }

    /// Set the source span.
    #[must_use]
    pub fn with_span(mut self, char_start: usize, char_end: usize) -> Self {
        self.char_start = char_start;
        self.char_end = char_end;
        self
    }

    /// Append a child.
    ///
    /// # Panics
    ///
    /// Panics when the tag is void.
    pub fn push_child(&mut self, child: Node) {
        assert!(
            !is_void_tag(&self.tag),
            "void tag {:?} cannot have children",
            self.tag
        );
        self.children.push(child);
    }

    /// The raw `=options` payload captured by the parser, if any.
    #[must_use]
    pub fn options(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == OPTIONS_ATTRIBUTE)
            .map(|(_, value)| value.as_str())
    }

    /// First value of a named attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated descendant text, same rules as [`Node::inner_text`].
    #[must_use]
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_inner_text(&mut out);
        }
        out
    }
}

/// Case-insensitive module parameter map.
///
/// Parsed from the `name|key=value|key2=value2` syntax; duplicate keys keep
/// the last occurrence. Archived content relies on both behaviors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleParams {
    map: HashMap<String, String>,
}

impl ModuleParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `name|key=value|...` payload into the module name and its
    /// parameters. A segment without `=` becomes a key with an empty value.
    #[must_use]
    pub fn parse(payload: &str) -> (String, Self) {
        let mut segments = payload.split('|');
        let name = segments.next().unwrap_or_default().trim().to_lowercase();
        let mut params = Self::new();
        for segment in segments {
            if segment.is_empty() {
                continue;
            }
            match segment.split_once('=') {
                Some((key, value)) => params.insert(key, value),
                None => params.insert(segment, ""),
            }
        }
        (name, params)
    }

    /// Insert a parameter; the key is lowercased and an existing value is
    /// replaced (last occurrence wins).
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.map.insert(key.trim().to_lowercase(), value.into());
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(&key.to_lowercase()).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Entries in key order, for deterministic output.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .map
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable_by_key(|(k, _)| *k);
        entries
    }
}

impl Node {
    /// Literal text node.
    #[must_use]
    pub fn text(content: impl Into<String>, char_start: usize, char_end: usize) -> Self {
        Self::Text(TextNode {
            content: content.into(),
            char_start,
            char_end,
        })
    }

    /// Element node; panics on contract violations, see [`Element::new`].
    #[must_use]
    pub fn element(
        tag: impl Into<String>,
        children: Vec<Node>,
        char_start: usize,
        char_end: usize,
    ) -> Self {
        Self::Element(
            Element::new(tag)
                .with_children(children)
                .with_span(char_start, char_end),
        )
    }

    /// Synthetic root element wrapping a parsed document.
    #[must_use]
    pub fn root(children: Vec<Node>) -> Self {
        Self::Element(Element::new(ROOT_TAG).with_children(children))
    }

    /// Module invocation node.
    #[must_use]
    pub fn module(name: impl Into<String>, parameters: ModuleParams) -> Self {
        Self::Module(ModuleNode {
            name: name.into(),
            parameters,
        })
    }

    /// Conditional subtree node.
    #[must_use]
    pub fn if_module(condition: impl Into<String>, children: Vec<Node>) -> Self {
        Self::IfModule(IfModuleNode {
            condition: condition.into(),
            children,
        })
    }

    /// Concatenated descendant text.
    ///
    /// Synchronous and side-effect free: module renderers are never
    /// invoked. A `Module` contributes nothing, except the link-like
    /// [`LINK_MODULE`](crate::LINK_MODULE) which yields its display text or
    /// href parameter. `IfModule` children are included without evaluating
    /// the condition (no helper is available here).
    #[must_use]
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        self.collect_inner_text(&mut out);
        out
    }

    fn collect_inner_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&text.content),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_inner_text(out);
                }
            }
            Node::Module(module) => {
                if module.name == crate::LINK_MODULE {
                    if let Some(text) = module
                        .parameters
                        .get("text")
                        .or_else(|| module.parameters.get("href"))
                    {
                        out.push_str(text);
                    }
                }
            }
            Node::IfModule(cond) => {
                for child in &cond.children {
                    child.collect_inner_text(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_element_valid_tags() {
        assert_eq!(Element::new("b").tag(), "b");
        assert_eq!(Element::new("h1").tag(), "h1");
        assert_eq!(Element::new(ROOT_TAG).tag(), "_root");
    }

    #[test]
    #[should_panic(expected = "invalid element tag")]
    fn test_element_rejects_uppercase() {
        let _ = Element::new("DIV");
    }

    #[test]
    #[should_panic(expected = "invalid element tag")]
    fn test_element_rejects_empty() {
        let _ = Element::new("");
    }

    #[test]
    #[should_panic(expected = "foreign content tag")]
    fn test_element_rejects_script() {
        let _ = Element::new("script");
    }

    #[test]
    #[should_panic(expected = "foreign content tag")]
    fn test_element_rejects_style() {
        let _ = Element::new("style");
    }

    #[test]
    #[should_panic(expected = "cannot have children")]
    fn test_void_rejects_children_at_construction() {
        let _ = Element::new("br").with_children(vec![Node::text("x", 0, 1)]);
    }

    #[test]
    #[should_panic(expected = "cannot have children")]
    fn test_void_rejects_push_child() {
        let mut img = Element::new("img");
        img.push_child(Node::text("x", 0, 1));
    }

    #[test]
    fn test_options_lookup() {
        let e = Element::new("img").with_attribute("options", "x.png,40x30");
        assert_eq!(e.options(), Some("x.png,40x30"));
        assert_eq!(Element::new("img").options(), None);
    }

    #[test]
    fn test_module_params_parse() {
        let (name, params) = ModuleParams::parse("gallery|user=ten|count=5");
        assert_eq!(name, "gallery");
        assert_eq!(params.get("user"), Some("ten"));
        assert_eq!(params.get("count"), Some("5"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_module_params_case_insensitive() {
        let (_, params) = ModuleParams::parse("m|User=ten");
        assert_eq!(params.get("USER"), Some("ten"));
        assert_eq!(params.get("user"), Some("ten"));
    }

    #[test]
    fn test_module_params_duplicate_keeps_last() {
        let (_, params) = ModuleParams::parse("m|key=first|key=second");
        assert_eq!(params.get("key"), Some("second"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_module_params_valueless_segment() {
        let (_, params) = ModuleParams::parse("m|flag");
        assert_eq!(params.get("flag"), Some(""));
    }

    #[test]
    fn test_module_params_name_lowercased() {
        let (name, _) = ModuleParams::parse("Gallery|x=1");
        assert_eq!(name, "gallery");
    }

    #[test]
    fn test_clone_is_deep() {
        let tree = Node::root(vec![Node::element(
            "b",
            vec![Node::text("bold", 3, 7)],
            0,
            11,
        )]);
        let mut copy = tree.clone();
        if let Node::Element(root) = &mut copy {
            if let Node::Element(b) = &mut root.children[0] {
                b.children.clear();
                b.attributes.push(("options".to_owned(), "x".to_owned()));
            }
        }
        // The original is untouched.
        if let Node::Element(root) = &tree {
            let Node::Element(b) = &root.children[0] else {
                panic!("expected element");
            };
            assert_eq!(b.children.len(), 1);
            assert!(b.attributes.is_empty());
        }
        assert_ne!(tree, copy);
    }

    #[test]
    fn test_inner_text() {
        let tree = Node::root(vec![
            Node::element("b", vec![Node::text("Bold", 0, 0)], 0, 0),
            Node::text(" & more", 0, 0),
        ]);
        assert_eq!(tree.inner_text(), "Bold & more");
    }

    #[test]
    fn test_element_inner_text() {
        let element = Element::new("td").with_children(vec![
            Node::element("b", vec![Node::text("Pa", 0, 0)], 0, 0),
            Node::text("ss", 0, 0),
        ]);
        assert_eq!(element.inner_text(), "Pass");
    }

    #[test]
    fn test_inner_text_skips_modules() {
        let (name, params) = ModuleParams::parse("gallery|user=ten");
        let tree = Node::root(vec![Node::module(name, params)]);
        assert_eq!(tree.inner_text(), "");
    }

    #[test]
    fn test_inner_text_link_module() {
        let (name, params) = ModuleParams::parse("link|href=/wiki/home|text=Home");
        let tree = Node::root(vec![Node::module(name, params)]);
        assert_eq!(tree.inner_text(), "Home");

        let (name, params) = ModuleParams::parse("link|href=/wiki/home");
        let tree = Node::root(vec![Node::module(name, params)]);
        assert_eq!(tree.inner_text(), "/wiki/home");
    }
}
