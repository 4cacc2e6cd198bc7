//! Fail-open parser for tag-based markup.
//!
//! Turns raw wiki or forum markup into a [`tagmark_ast::Node`] tree. The
//! guiding policy is that parsing never fails: anything that does not match
//! a known tag — an unrecognized name, a mismatched closer, an unterminated
//! bracket — falls through to literal text, and tags still open at end of
//! input are closed implicitly. Archived user content must always render
//! as *something*.
//!
//! # Example
//!
//! ```
//! use tagmark_parser::{ForumCapabilities, parse_forum};
//!
//! let tree = parse_forum("[b]Bold[/b] & more", ForumCapabilities::bbcode());
//! assert_eq!(tree.inner_text(), "Bold & more");
//! ```

mod dialect;
mod parser;

pub use dialect::ForumCapabilities;
pub use parser::{parse_forum, parse_wiki};
