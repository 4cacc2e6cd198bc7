//! Error types for the streaming writer.

/// Contract violation while emitting HTML.
///
/// Every variant indicates a bug in the calling code, never a property of
/// user-supplied content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriterError {
    /// Tag name outside the `^[a-z0-9]+$` allow-list, or a foreign tag
    /// (`script`/`style`) passed to a non-foreign open.
    #[error("invalid tag name {0:?}")]
    InvalidTagName(String),

    /// Attribute name outside the `^[a-z][a-z0-9-]*$` allow-list.
    #[error("invalid attribute name {0:?}")]
    InvalidAttributeName(String),

    /// Close was called with no tag open.
    #[error("no open tag to close {0:?}")]
    NothingOpen(String),

    /// Close was called for a tag that is not the innermost open one.
    #[error("closing {found:?} but innermost open tag is {open:?}")]
    TagMismatch { found: String, open: String },

    /// Content or a child tag was written under a void tag.
    #[error("void tag {0:?} cannot have children")]
    VoidChildren(String),

    /// An attribute was written with no open tag, or after the opening tag
    /// was already finalized by content.
    #[error("attribute {name:?} written outside an open tag start")]
    AttributeOutsideTag { name: String },

    /// A child tag was opened inside foreign content.
    #[error("cannot open {child:?} inside foreign content {parent:?}")]
    ForeignChild { parent: String, child: String },

    /// Foreign text contained what looks like the closing tag of its own
    /// container, which would break out of the foreign region.
    #[error("foreign content for {tag:?} contains its own closing tag")]
    ForeignClose { tag: String },

    /// `finish` was called with tags still open.
    #[error("{count} tag(s) left open at finish, innermost {innermost:?}")]
    UnclosedTags { count: usize, innermost: String },
}
