//! Per-render context and the collaborator traits the engine consumes.

use std::collections::HashMap;

use tagmark_writer::HtmlWriter;

use crate::error::ModuleError;
use crate::node::{ModuleParams, Node};

/// Reserved module that registers a per-render style filter instead of
/// rendering visible output.
pub const SETTABLE_ATTRIBUTES_MODULE: &str = "settableattributes";

/// The one link-like pseudo-module whose `inner_text` is non-empty.
pub const LINK_MODULE: &str = "link";

/// External behavior injected into a render pass.
///
/// The engine treats all of this as opaque: URL resolution policy,
/// condition evaluation, and module business logic live with the caller.
pub trait PageHelper {
    /// Resolve a relative-or-absolute href to an absolute URL.
    fn absolute_url(&self, href: &str) -> String;

    /// Evaluate an [`IfModule`](crate::Node::IfModule) condition.
    fn check_condition(&self, condition: &str) -> bool;

    /// Render a named module into the writer.
    ///
    /// Returning an error never fails the render: the engine emits a
    /// visibly-marked error block instead.
    fn run_module(
        &self,
        writer: &mut HtmlWriter,
        name: &str,
        parameters: &ModuleParams,
    ) -> Result<(), ModuleError>;
}

/// Parse-time registry of recognized module names.
pub trait ModuleRegistry {
    fn is_module(&self, name: &str) -> bool;
}

/// Fixed per-render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderSettings {
    /// Character budget for the meta description, ellipsis included.
    pub meta_description_length: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            meta_description_length: 255,
        }
    }
}

/// Style filter registered by the `settableattributes` module.
///
/// Maps a table cell's text content (trimmed, lowercased) to a CSS
/// declaration injected as the cell's `style` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleFilter {
    styles: HashMap<String, String>,
}

impl StyleFilter {
    /// Build a filter from module parameters: each key is a cell text,
    /// each value the CSS to apply.
    #[must_use]
    pub fn from_params(parameters: &ModuleParams) -> Self {
        let mut styles = HashMap::new();
        for (key, value) in parameters.sorted_entries() {
            styles.insert(key.to_owned(), value.to_owned());
        }
        Self { styles }
    }

    /// Style for a cell with the given text content, if any.
    #[must_use]
    pub fn style_for(&self, cell_text: &str) -> Option<&str> {
        self.styles
            .get(&cell_text.trim().to_lowercase())
            .map(String::as_str)
    }
}

/// Walk a tree and collect every style filter a render of it would use.
///
/// This is the first pass of the two-pass design: filters become part of
/// the immutable [`RenderContext`] before any rendering starts, so no node
/// mutates shared state while the tree renders. Conditional subtrees are
/// honored through `check_condition`.
#[must_use]
pub fn collect_style_filters(tree: &Node, helper: &dyn PageHelper) -> Vec<StyleFilter> {
    let mut filters = Vec::new();
    collect_into(tree, helper, &mut filters);
    filters
}

fn collect_into(node: &Node, helper: &dyn PageHelper, filters: &mut Vec<StyleFilter>) {
    match node {
        Node::Text(_) => {}
        Node::Element(element) => {
            for child in &element.children {
                collect_into(child, helper, filters);
            }
        }
        Node::Module(module) => {
            if module.name == SETTABLE_ATTRIBUTES_MODULE {
                filters.push(StyleFilter::from_params(&module.parameters));
            }
        }
        Node::IfModule(cond) => {
            if helper.check_condition(&cond.condition) {
                for child in &cond.children {
                    collect_into(child, helper, filters);
                }
            }
        }
    }
}

/// Immutable state threaded through one render pass.
///
/// Constructed fresh per render invocation and discarded afterward; never
/// shared across renders.
pub struct RenderContext<'a> {
    pub helper: &'a dyn PageHelper,
    pub settings: RenderSettings,
    style_filters: Vec<StyleFilter>,
}

impl<'a> RenderContext<'a> {
    /// Build a context for rendering `tree`, collecting its style filters
    /// up front.
    #[must_use]
    pub fn new(helper: &'a dyn PageHelper, settings: RenderSettings, tree: &Node) -> Self {
        Self {
            helper,
            settings,
            style_filters: collect_style_filters(tree, helper),
        }
    }

    /// Context with default settings and no style filters; enough for
    /// trees that carry no `settableattributes` module.
    #[must_use]
    pub fn bare(helper: &'a dyn PageHelper) -> Self {
        Self {
            helper,
            settings: RenderSettings::default(),
            style_filters: Vec::new(),
        }
    }

    /// Style to inject on a `td` whose content renders as `cell_text`.
    ///
    /// The first registered filter with a match wins.
    #[must_use]
    pub fn cell_style(&self, cell_text: &str) -> Option<&str> {
        self.style_filters
            .iter()
            .find_map(|filter| filter.style_for(cell_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FixedHelper {
        truthy: &'static str,
    }

    impl PageHelper for FixedHelper {
        fn absolute_url(&self, href: &str) -> String {
            format!("https://example.org{href}")
        }

        fn check_condition(&self, condition: &str) -> bool {
            condition == self.truthy
        }

        fn run_module(
            &self,
            _writer: &mut HtmlWriter,
            name: &str,
            _parameters: &ModuleParams,
        ) -> Result<(), ModuleError> {
            Err(ModuleError::Unknown(name.to_owned()))
        }
    }

    fn settable(params: &str) -> Node {
        let (name, params) = ModuleParams::parse(&format!("{SETTABLE_ATTRIBUTES_MODULE}|{params}"));
        Node::module(name, params)
    }

    #[test]
    fn test_style_filter_lookup() {
        let (_, params) = ModuleParams::parse("m|yes=background: green|no=background: red");
        let filter = StyleFilter::from_params(&params);
        assert_eq!(filter.style_for("yes"), Some("background: green"));
        assert_eq!(filter.style_for("  YES "), Some("background: green"));
        assert_eq!(filter.style_for("maybe"), None);
    }

    #[test]
    fn test_collect_filters() {
        let helper = FixedHelper { truthy: "" };
        let tree = Node::root(vec![
            Node::text("x", 0, 1),
            settable("ok=color: green"),
            Node::element("div", vec![settable("bad=color: red")], 0, 0),
        ]);
        let filters = collect_style_filters(&tree, &helper);
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].style_for("ok"), Some("color: green"));
        assert_eq!(filters[1].style_for("bad"), Some("color: red"));
    }

    #[test]
    fn test_collect_honors_conditions() {
        let helper = FixedHelper { truthy: "editor" };
        let tree = Node::root(vec![
            Node::if_module("editor", vec![settable("a=x")]),
            Node::if_module("admin", vec![settable("b=y")]),
        ]);
        let ctx = RenderContext::new(&helper, RenderSettings::default(), &tree);
        assert_eq!(ctx.cell_style("a"), Some("x"));
        assert_eq!(ctx.cell_style("b"), None);
    }

    #[test]
    fn test_first_matching_filter_wins() {
        let helper = FixedHelper { truthy: "" };
        let tree = Node::root(vec![settable("cell=first"), settable("cell=second")]);
        let ctx = RenderContext::new(&helper, RenderSettings::default(), &tree);
        assert_eq!(ctx.cell_style("cell"), Some("first"));
    }

    #[test]
    fn test_default_settings() {
        assert_eq!(RenderSettings::default().meta_description_length, 255);
    }
}
