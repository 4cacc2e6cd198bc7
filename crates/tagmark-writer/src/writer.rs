//! The streaming tag writer.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::WriterError;
use crate::escape::{escape_attribute, escape_text};

static TAG_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9]+$").unwrap());
static ATTRIBUTE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*$").unwrap());

/// HTML void elements: never have children, never get a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Tags whose content is foreign: raw text, no nested tags, no escaping.
const FOREIGN_TAGS: &[&str] = &["script", "style"];

/// Whether `tag` is an HTML void element.
#[must_use]
pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// Whether `tag` is on the `^[a-z0-9]+$` tag-name allow-list.
#[must_use]
pub fn is_valid_tag_name(tag: &str) -> bool {
    TAG_NAME.is_match(tag)
}

struct OpenTag {
    name: String,
    /// Whether the `>` of the opening tag has been written.
    finalized: bool,
    void: bool,
    foreign: bool,
    classes: Vec<String>,
    rels: Vec<String>,
}

/// Streaming HTML emitter with a strict open/close stack.
///
/// The `>` of an opening tag is deferred until an attribute list is final
/// (the next content write, child tag, or close), so `class` and `rel`
/// values accumulated across multiple calls merge into a single
/// deduplicated, space-joined attribute.
///
/// See the crate docs for the invariants; every violation returns a
/// [`WriterError`].
#[derive(Default)]
pub struct HtmlWriter {
    out: String,
    stack: Vec<OpenTag>,
}

impl HtmlWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(1024),
            stack: Vec::new(),
        }
    }

    /// Open a tag. The name must match the allow-list; `script` and
    /// `style` must go through [`open_foreign`](Self::open_foreign).
    pub fn open(&mut self, tag: &str) -> Result<(), WriterError> {
        if !is_valid_tag_name(tag) || FOREIGN_TAGS.contains(&tag) {
            return Err(WriterError::InvalidTagName(tag.to_owned()));
        }
        self.push_tag(tag, false)
    }

    /// Open a foreign-content tag (`script` or `style`).
    ///
    /// Until the matching close, text is written raw and child tags are
    /// refused. Text that contains this element's own closing tag is
    /// rejected outright.
    pub fn open_foreign(&mut self, tag: &str) -> Result<(), WriterError> {
        if !FOREIGN_TAGS.contains(&tag) {
            return Err(WriterError::InvalidTagName(tag.to_owned()));
        }
        self.push_tag(tag, true)
    }

    fn push_tag(&mut self, tag: &str, foreign: bool) -> Result<(), WriterError> {
        if let Some(top) = self.stack.last() {
            if top.foreign {
                return Err(WriterError::ForeignChild {
                    parent: top.name.clone(),
                    child: tag.to_owned(),
                });
            }
            if top.void {
                return Err(WriterError::VoidChildren(top.name.clone()));
            }
        }
        self.finalize_top();
        self.out.push('<');
        self.out.push_str(tag);
        self.stack.push(OpenTag {
            name: tag.to_owned(),
            finalized: false,
            void: is_void_tag(tag),
            foreign,
            classes: Vec::new(),
            rels: Vec::new(),
        });
        Ok(())
    }

    /// Write an attribute on the innermost open tag.
    ///
    /// Must be called before any content finalizes the opening tag.
    /// `class` and `rel` are routed through the merging accumulators.
    pub fn attribute(&mut self, name: &str, value: &str) -> Result<(), WriterError> {
        if !ATTRIBUTE_NAME.is_match(name) {
            return Err(WriterError::InvalidAttributeName(name.to_owned()));
        }
        match name {
            "class" => return self.class(value),
            "rel" => return self.rel(value),
            _ => {}
        }
        if !matches!(self.stack.last(), Some(top) if !top.finalized) {
            return Err(WriterError::AttributeOutsideTag {
                name: name.to_owned(),
            });
        }
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.out.push_str(&escape_attribute(value));
        self.out.push('"');
        Ok(())
    }

    /// Add a class to the innermost open tag; duplicates are dropped when
    /// the merged `class` attribute is written.
    pub fn class(&mut self, class: &str) -> Result<(), WriterError> {
        let top = self.writable_top("class")?;
        top.classes.push(class.to_owned());
        Ok(())
    }

    /// Add a link relation, merged like [`class`](Self::class).
    pub fn rel(&mut self, rel: &str) -> Result<(), WriterError> {
        let top = self.writable_top("rel")?;
        top.rels.push(rel.to_owned());
        Ok(())
    }

    fn writable_top(&mut self, attr: &str) -> Result<&mut OpenTag, WriterError> {
        match self.stack.last_mut() {
            Some(top) if !top.finalized => Ok(top),
            _ => Err(WriterError::AttributeOutsideTag {
                name: attr.to_owned(),
            }),
        }
    }

    /// Write text content.
    ///
    /// Escaped in normal context; written raw inside foreign content, where
    /// a premature closing tag in the text is refused instead.
    pub fn text(&mut self, text: &str) -> Result<(), WriterError> {
        if let Some(top) = self.stack.last() {
            if top.void {
                return Err(WriterError::VoidChildren(top.name.clone()));
            }
            if top.foreign {
                let closer = format!("</{}", top.name);
                if text.to_ascii_lowercase().contains(&closer) {
                    return Err(WriterError::ForeignClose {
                        tag: top.name.clone(),
                    });
                }
                self.finalize_top();
                self.out.push_str(text);
                return Ok(());
            }
        }
        self.finalize_top();
        self.out.push_str(&escape_text(text));
        Ok(())
    }

    /// Close the innermost open tag, which must be `tag`.
    ///
    /// Void tags emit no closing tag but still require the close call.
    pub fn close(&mut self, tag: &str) -> Result<(), WriterError> {
        match self.stack.last() {
            None => return Err(WriterError::NothingOpen(tag.to_owned())),
            Some(top) if top.name != tag => {
                return Err(WriterError::TagMismatch {
                    found: tag.to_owned(),
                    open: top.name.clone(),
                });
            }
            Some(_) => {}
        }
        self.finalize_top();
        let top = self.stack.pop().expect("checked above");
        if !top.void {
            self.out.push_str("</");
            self.out.push_str(&top.name);
            self.out.push('>');
        }
        Ok(())
    }

    /// Finish writing and return the output.
    ///
    /// Fails if any tag is still open.
    pub fn finish(mut self) -> Result<String, WriterError> {
        if let Some(top) = self.stack.last() {
            return Err(WriterError::UnclosedTags {
                count: self.stack.len(),
                innermost: top.name.clone(),
            });
        }
        self.finalize_top();
        Ok(self.out)
    }

    /// Write the deferred `>` of the innermost opening tag, merging any
    /// accumulated `class`/`rel` lists first.
    fn finalize_top(&mut self) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if top.finalized {
            return;
        }
        top.finalized = true;
        let classes = std::mem::take(&mut top.classes);
        let rels = std::mem::take(&mut top.rels);
        Self::merged_attribute(&mut self.out, "class", &classes);
        Self::merged_attribute(&mut self.out, "rel", &rels);
        self.out.push('>');
    }

    fn merged_attribute(out: &mut String, name: &str, values: &[String]) {
        if values.is_empty() {
            return;
        }
        let mut seen: Vec<&str> = Vec::with_capacity(values.len());
        for value in values {
            if !seen.contains(&value.as_str()) {
                seen.push(value);
            }
        }
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(&seen.join(" ")));
        out.push('"');
    }
}
