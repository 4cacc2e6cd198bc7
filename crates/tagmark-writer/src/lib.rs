//! Stack-disciplined streaming HTML writer.
//!
//! This crate provides [`HtmlWriter`], a low-level emitter used wherever
//! markup is assembled directly rather than through an AST. It guarantees:
//!
//! - balanced tags (closing anything but the innermost open tag is an error)
//! - allow-listed tag and attribute names
//! - escaping of every text and attribute value write
//! - no children under void tags (`br`, `img`, `hr`, ...)
//! - merged, deduplicated `class`/`rel` attribute lists
//!
//! Violating any of these is a [`WriterError`] — a bug in the caller, not a
//! property of user content. User content itself can never make the writer
//! emit unescaped output.
//!
//! # Example
//!
//! ```
//! use tagmark_writer::HtmlWriter;
//!
//! let mut w = HtmlWriter::new();
//! w.open("div")?;
//! w.class("quote")?;
//! w.class("quote")?; // deduplicated
//! w.text("a < b")?;
//! w.close("div")?;
//! assert_eq!(w.finish()?, r#"<div class="quote">a &lt; b</div>"#);
//! # Ok::<(), tagmark_writer::WriterError>(())
//! ```

mod error;
mod escape;
mod writer;

pub use error::WriterError;
pub use escape::{escape_attribute, escape_text};
pub use writer::{HtmlWriter, is_valid_tag_name, is_void_tag};
