//! Markup AST and multi-target render protocol.
//!
//! A parsed document is a tree of [`Node`] values rooted at a synthetic
//! `_root` element. The same immutable tree renders to four independent
//! targets:
//!
//! - sanitized HTML ([`render_html`]), written through the stack-disciplined
//!   [`tagmark_writer::HtmlWriter`] so no unescaped user input can leak
//! - plain text ([`render_text`])
//! - a length-bounded meta description ([`render_meta_description`])
//! - a filtered table-of-contents projection ([`Node::clone_for_toc`])
//!
//! Tag semantics live in one place, the static [`tags`] table; the parser's
//! known-tag set and every renderer consult it, so adding a tag is additive.
//!
//! External behavior (URL resolution, condition checks, module rendering) is
//! injected through the [`PageHelper`] trait; the engine implements no
//! module's business logic itself.
//!
//! # Example
//!
//! ```
//! use tagmark_ast::{Node, RenderContext, RenderSettings, render_html};
//! # use tagmark_ast::{HtmlWriter, ModuleError, ModuleParams, PageHelper};
//! # struct NoHelper;
//! # impl PageHelper for NoHelper {
//! #     fn absolute_url(&self, href: &str) -> String { href.to_owned() }
//! #     fn check_condition(&self, _: &str) -> bool { false }
//! #     fn run_module(
//! #         &self,
//! #         _: &mut HtmlWriter,
//! #         name: &str,
//! #         _: &ModuleParams,
//! #     ) -> Result<(), ModuleError> {
//! #         Err(ModuleError::Unknown(name.to_owned()))
//! #     }
//! # }
//!
//! let tree = Node::root(vec![
//!     Node::element("b", vec![Node::text("Bold", 3, 7)], 0, 11),
//!     Node::text(" & more", 11, 18),
//! ]);
//! let helper = NoHelper;
//! let ctx = RenderContext::new(&helper, RenderSettings::default(), &tree);
//! assert_eq!(render_html(&tree, &ctx).unwrap(), "<b>Bold</b> &amp; more");
//! ```

mod context;
mod dump;
mod error;
mod html;
mod meta;
mod node;
pub mod tags;
mod text;
mod toc;

pub use context::{
    LINK_MODULE, ModuleRegistry, PageHelper, RenderContext, RenderSettings,
    SETTABLE_ATTRIBUTES_MODULE, StyleFilter, collect_style_filters,
};
pub use error::{ModuleError, RenderError};
pub use html::render_html;
pub use meta::{MetaDescription, render_meta_description};
pub use node::{
    Element, IfModuleNode, ModuleNode, ModuleParams, Node, OPTIONS_ATTRIBUTE, ROOT_TAG, TextNode,
};
pub use text::render_text;

// Re-exported so helpers can be implemented against this crate alone.
pub use tagmark_writer::HtmlWriter;
