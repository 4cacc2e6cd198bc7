//! HTML rendering.
//!
//! The primary, security-critical render target. All output goes through
//! [`HtmlWriter`], so escaping and structural invariants (balanced tags,
//! void tags without children, allow-listed names) hold for every node —
//! including anything an injected module renderer writes.

use tagmark_writer::{HtmlWriter, WriterError, is_void_tag};

use crate::context::{RenderContext, SETTABLE_ATTRIBUTES_MODULE};
use crate::error::{ModuleError, RenderError};
use crate::node::{Element, ModuleNode, Node, ROOT_TAG};
use crate::tags::{self, TagKind};

/// Render a tree to an HTML fragment.
pub fn render_html(tree: &Node, ctx: &RenderContext<'_>) -> Result<String, RenderError> {
    let mut writer = HtmlWriter::new();
    tree.write_html(&mut writer, ctx)?;
    Ok(writer.finish()?)
}

impl Node {
    /// Write this node's HTML into an open writer.
    pub fn write_html(
        &self,
        writer: &mut HtmlWriter,
        ctx: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        match self {
            Node::Text(text) => write_text_run(&text.content, writer),
            Node::Element(element) => write_element(element, writer, ctx),
            Node::Module(module) => write_module(module, writer, ctx),
            Node::IfModule(cond) => {
                if ctx.helper.check_condition(&cond.condition) {
                    write_children(&cond.children, writer, ctx)?;
                }
                Ok(())
            }
        }
    }
}

fn write_children(
    children: &[Node],
    writer: &mut HtmlWriter,
    ctx: &RenderContext<'_>,
) -> Result<(), RenderError> {
    for child in children {
        child.write_html(writer, ctx)?;
    }
    Ok(())
}

/// Escaped text with newlines as `<br>`.
fn write_text_run(content: &str, writer: &mut HtmlWriter) -> Result<(), RenderError> {
    for (i, line) in content.split('\n').enumerate() {
        if i > 0 {
            writer.open("br")?;
            writer.close("br")?;
        }
        if !line.is_empty() {
            writer.text(line)?;
        }
    }
    Ok(())
}

fn write_element(
    element: &Element,
    writer: &mut HtmlWriter,
    ctx: &RenderContext<'_>,
) -> Result<(), RenderError> {
    let tag = element.tag();
    if tag == ROOT_TAG {
        return write_children(&element.children, writer, ctx);
    }
    // Construction already rejects this; a hand-assembled tree that slipped
    // past it still must not render.
    if is_void_tag(tag) && !element.children.is_empty() {
        return Err(WriterError::VoidChildren(tag.to_owned()).into());
    }
    let Some(spec) = tags::tag_spec(tag) else {
        // Hand-built tree with a valid but untabled tag: pass it through.
        writer.open(tag)?;
        write_children(&element.children, writer, ctx)?;
        writer.close(tag)?;
        return Ok(());
    };
    match spec.kind {
        TagKind::Plain => {
            writer.open(tag)?;
            if tag == "div" {
                if let Some(classes) = element.options() {
                    for class in classes.split_whitespace() {
                        writer.class(class)?;
                    }
                }
            }
            if tag == "td" {
                if let Some(style) = ctx.cell_style(&element.inner_text()) {
                    writer.attribute("style", style)?;
                }
            }
            write_children(&element.children, writer, ctx)?;
            writer.close(tag)?;
        }
        TagKind::Classed { html_tag, class } => {
            writer.open(html_tag)?;
            writer.class(class)?;
            write_children(&element.children, writer, ctx)?;
            writer.close(html_tag)?;
        }
        TagKind::Quote => write_quote(element, writer, ctx)?,
        TagKind::Code => write_code(element, writer, ctx)?,
        TagKind::Image => write_image(element, writer, ctx)?,
        TagKind::Anchor { href_prefix } => write_anchor(element, href_prefix, writer, ctx)?,
        TagKind::List => write_list(element, writer, ctx)?,
        TagKind::ListItem => {
            // A marker outside a list (hand-built tree) renders as a plain item.
            writer.open("li")?;
            write_children(&element.children, writer, ctx)?;
            writer.close("li")?;
        }
        TagKind::Break => {
            writer.open("br")?;
            writer.close("br")?;
        }
        TagKind::Rule => {
            writer.open("hr")?;
            writer.close("hr")?;
        }
        TagKind::NoParse | TagKind::If => {
            // noparse children are literal text; an `if` element never
            // comes out of the parser (it builds IfModule nodes).
            write_children(&element.children, writer, ctx)?;
        }
    }
    Ok(())
}

fn write_quote(
    element: &Element,
    writer: &mut HtmlWriter,
    ctx: &RenderContext<'_>,
) -> Result<(), RenderError> {
    writer.open("div")?;
    writer.class("quotecontainer")?;
    if let Some(who) = element.options().map(str::trim).filter(|s| !s.is_empty()) {
        writer.open("cite")?;
        writer.text(who)?;
        writer.close("cite")?;
    }
    writer.open("blockquote")?;
    write_children(&element.children, writer, ctx)?;
    writer.close("blockquote")?;
    writer.close("div")?;
    Ok(())
}

fn write_code(
    element: &Element,
    writer: &mut HtmlWriter,
    ctx: &RenderContext<'_>,
) -> Result<(), RenderError> {
    let option = element.options().unwrap_or("").trim();
    // `filename|language` gets a download link; a bare option is a language.
    let (filename, language) = match option.split_once('|') {
        Some((file, lang)) if !file.trim().is_empty() => {
            (Some(file.trim()), non_empty(lang.trim()))
        }
        _ => (None, non_empty(option)),
    };
    if let Some(filename) = filename {
        writer.open("div")?;
        writer.class("codecontainer")?;
        writer.open("a")?;
        writer.class("codedownload")?;
        writer.attribute("href", &ctx.helper.absolute_url(&format!("/files/{filename}")))?;
        writer.text(filename)?;
        writer.close("a")?;
    }
    writer.open("pre")?;
    writer.open("code")?;
    if let Some(language) = language {
        writer.class(&format!("language-{language}"))?;
    }
    // Literal content: escaped, but newlines stay newlines inside pre.
    for child in &element.children {
        match child {
            Node::Text(text) => writer.text(&text.content)?,
            other => other.write_html(writer, ctx)?,
        }
    }
    writer.close("code")?;
    writer.close("pre")?;
    if filename.is_some() {
        writer.close("div")?;
    }
    Ok(())
}

fn write_image(
    element: &Element,
    writer: &mut HtmlWriter,
    ctx: &RenderContext<'_>,
) -> Result<(), RenderError> {
    let option = element.options().unwrap_or("").trim();
    if option.is_empty() {
        // No source at all: nothing to show, and nothing to fail over.
        return Ok(());
    }
    let (src, size) = match option.split_once(',') {
        Some((src, size)) => (src.trim(), parse_size(size)),
        None => (option, None),
    };
    writer.open("img")?;
    writer.attribute("src", &ctx.helper.absolute_url(src))?;
    if let Some((width, height)) = size {
        writer.attribute("width", &width.to_string())?;
        writer.attribute("height", &height.to_string())?;
    }
    writer.close("img")?;
    Ok(())
}

/// Parse a `WxH` size pair; a malformed size is ignored, not an error.
fn parse_size(size: &str) -> Option<(u32, u32)> {
    let (width, height) = size.trim().split_once(['x', 'X'])?;
    Some((width.trim().parse().ok()?, height.trim().parse().ok()?))
}

/// The unresolved link target of an anchor-family element: the option
/// payload (or, failing that, the child text), behind the tag's href
/// prefix when it has one.
pub(crate) fn anchor_target(element: &Element, href_prefix: Option<&str>) -> String {
    let option = element.options().unwrap_or("").trim();
    let id = if option.is_empty() {
        element.inner_text().trim().to_owned()
    } else {
        option.to_owned()
    };
    match href_prefix {
        Some(prefix) => format!("{prefix}{id}"),
        None => id,
    }
}

fn write_anchor(
    element: &Element,
    href_prefix: Option<&str>,
    writer: &mut HtmlWriter,
    ctx: &RenderContext<'_>,
) -> Result<(), RenderError> {
    let option = element.options().unwrap_or("").trim();
    let target = anchor_target(element, href_prefix);
    writer.open("a")?;
    writer.attribute("href", &ctx.helper.absolute_url(&target))?;
    if element.children.is_empty() {
        // Fallback link text when the tag had no body.
        writer.text(if option.is_empty() { &target } else { option })?;
    } else {
        write_children(&element.children, writer, ctx)?;
    }
    writer.close("a")?;
    Ok(())
}

fn write_list(
    element: &Element,
    writer: &mut HtmlWriter,
    ctx: &RenderContext<'_>,
) -> Result<(), RenderError> {
    let list_tag = if element.options().map(str::trim) == Some("1") {
        "ol"
    } else {
        "ul"
    };
    writer.open(list_tag)?;
    let mut item_open = false;
    for child in &element.children {
        // `*` markers arrive as empty `li` elements; each one closes the
        // previous item and opens the next.
        if let Node::Element(el) = child {
            if el.tag() == "li" && el.children.is_empty() {
                if item_open {
                    writer.close("li")?;
                }
                writer.open("li")?;
                item_open = true;
                continue;
            }
        }
        if !item_open {
            // Whitespace between the list opener and the first marker.
            if let Node::Text(text) = child {
                if text.content.trim().is_empty() {
                    continue;
                }
            }
        }
        child.write_html(writer, ctx)?;
    }
    if item_open {
        writer.close("li")?;
    }
    writer.close(list_tag)?;
    Ok(())
}

fn write_module(
    module: &ModuleNode,
    writer: &mut HtmlWriter,
    ctx: &RenderContext<'_>,
) -> Result<(), RenderError> {
    if module.name == SETTABLE_ATTRIBUTES_MODULE {
        // Consumed by the style-filter collection pass; renders nothing.
        return Ok(());
    }
    match ctx
        .helper
        .run_module(writer, &module.name, &module.parameters)
    {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::warn!(module = %module.name, error = %err, "Module render failed");
            let message = match err {
                ModuleError::Unknown(_) => format!("No such module: {}", module.name),
                _ => format!("Module failed: {}", module.name),
            };
            writer.open("div")?;
            writer.class("error")?;
            writer.text(&message)?;
            writer.close("div")?;
            Ok(())
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}
