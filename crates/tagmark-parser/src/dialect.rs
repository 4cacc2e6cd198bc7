//! Forum capability flags.

/// Per-post capability flags for the forum dialect.
///
/// With BBCode disabled the input is not parsed at all and becomes a
/// single literal text node. `enable_html` is carried for interface
/// parity with the capability model upstream; the engine's tag set never
/// includes raw HTML pass-through, so it does not change the tree shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForumCapabilities {
    pub enable_bbcode: bool,
    pub enable_html: bool,
}

impl ForumCapabilities {
    #[must_use]
    pub fn new(enable_bbcode: bool, enable_html: bool) -> Self {
        Self {
            enable_bbcode,
            enable_html,
        }
    }

    /// The common case: BBCode on, HTML off.
    #[must_use]
    pub fn bbcode() -> Self {
        Self::new(true, false)
    }
}
