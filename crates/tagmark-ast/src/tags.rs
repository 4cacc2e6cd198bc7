//! The static tag table.
//!
//! One entry per recognized tag: its rendering strategy, dialect
//! membership, and parse behavior. The parser's known-tag set and all four
//! renderers consult this table, so adding a tag means adding a row here
//! rather than editing a switch in every renderer.

/// Markup dialect a document was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Wiki-page markup (sections, modules, conditionals).
    Wiki,
    /// BBCode-style forum markup.
    Forum,
}

/// Rendering strategy for a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// Same-named HTML element; option payload ignored (except `div`,
    /// whose option is its class list).
    Plain,
    /// Fixed HTML element carrying a fixed class.
    Classed {
        html_tag: &'static str,
        class: &'static str,
    },
    /// `quotecontainer` div wrapping an optional `cite` and a blockquote.
    Quote,
    /// `pre`/`code` block; option is `language` or `filename|language`
    /// (the latter also emits a download anchor).
    Code,
    /// Void `img`; option is `src` or `src,WxH`.
    Image,
    /// Anchor. `href_prefix` of `None` means the option payload (or child
    /// text) is the href itself; otherwise the option is an identifier
    /// appended to the prefix.
    Anchor { href_prefix: Option<&'static str> },
    /// `ul` (or `ol` when the option is `1`); items come from marker tags.
    List,
    /// List-item marker `*`: no closing tag, closed at the next sibling
    /// marker by the renderer.
    ListItem,
    /// Void line break.
    Break,
    /// Void horizontal rule.
    Rule,
    /// Children are literal text; nested tag recognition is suppressed.
    NoParse,
    /// Parses to an [`IfModule`](crate::Node::IfModule) node, not an element.
    If,
}

/// One row of the tag table.
#[derive(Debug, Clone, Copy)]
pub struct TagSpec {
    pub name: &'static str,
    pub kind: TagKind,
    pub wiki: bool,
    pub forum: bool,
}

impl TagSpec {
    /// Whether this tag exists in the given dialect.
    #[must_use]
    pub fn in_dialect(&self, dialect: Dialect) -> bool {
        match dialect {
            Dialect::Wiki => self.wiki,
            Dialect::Forum => self.forum,
        }
    }

    /// Whether nested tag recognition is suppressed in this tag's subtree.
    #[must_use]
    pub fn suppresses_parsing(&self) -> bool {
        matches!(self.kind, TagKind::NoParse | TagKind::Code)
    }

    /// Whether the parser appends this tag without pushing it on the open
    /// stack (void elements and list-item markers take no closing tag).
    #[must_use]
    pub fn parses_empty(&self) -> bool {
        matches!(
            self.kind,
            TagKind::Break | TagKind::Rule | TagKind::Image | TagKind::ListItem
        )
    }
}

#[rustfmt::skip]
static TAG_TABLE: &[TagSpec] = &[
    TagSpec { name: "b",          kind: TagKind::Plain,                                  wiki: true,  forum: true },
    TagSpec { name: "i",          kind: TagKind::Plain,                                  wiki: true,  forum: true },
    TagSpec { name: "u",          kind: TagKind::Plain,                                  wiki: true,  forum: true },
    TagSpec { name: "s",          kind: TagKind::Plain,                                  wiki: true,  forum: true },
    TagSpec { name: "sub",        kind: TagKind::Plain,                                  wiki: true,  forum: true },
    TagSpec { name: "sup",        kind: TagKind::Plain,                                  wiki: true,  forum: true },
    TagSpec { name: "h1",         kind: TagKind::Plain,                                  wiki: true,  forum: false },
    TagSpec { name: "h2",         kind: TagKind::Plain,                                  wiki: true,  forum: false },
    TagSpec { name: "h3",         kind: TagKind::Plain,                                  wiki: true,  forum: false },
    TagSpec { name: "h4",         kind: TagKind::Plain,                                  wiki: true,  forum: false },
    TagSpec { name: "h5",         kind: TagKind::Plain,                                  wiki: true,  forum: false },
    TagSpec { name: "h6",         kind: TagKind::Plain,                                  wiki: true,  forum: false },
    TagSpec { name: "div",        kind: TagKind::Plain,                                  wiki: true,  forum: false },
    TagSpec { name: "table",      kind: TagKind::Plain,                                  wiki: true,  forum: false },
    TagSpec { name: "tr",         kind: TagKind::Plain,                                  wiki: true,  forum: false },
    TagSpec { name: "td",         kind: TagKind::Plain,                                  wiki: true,  forum: false },
    TagSpec { name: "th",         kind: TagKind::Plain,                                  wiki: true,  forum: false },
    TagSpec { name: "spoiler",    kind: TagKind::Classed { html_tag: "span", class: "spoiler" }, wiki: false, forum: true },
    TagSpec { name: "quote",      kind: TagKind::Quote,                                  wiki: true,  forum: true },
    TagSpec { name: "code",       kind: TagKind::Code,                                   wiki: true,  forum: true },
    TagSpec { name: "img",        kind: TagKind::Image,                                  wiki: true,  forum: true },
    TagSpec { name: "a",          kind: TagKind::Anchor { href_prefix: None },           wiki: true,  forum: false },
    TagSpec { name: "url",        kind: TagKind::Anchor { href_prefix: None },           wiki: true,  forum: true },
    TagSpec { name: "post",       kind: TagKind::Anchor { href_prefix: Some("/forums/posts/") }, wiki: false, forum: true },
    TagSpec { name: "movie",      kind: TagKind::Anchor { href_prefix: Some("/movies/") },       wiki: false, forum: true },
    TagSpec { name: "submission", kind: TagKind::Anchor { href_prefix: Some("/submissions/") },  wiki: false, forum: true },
    TagSpec { name: "userfile",   kind: TagKind::Anchor { href_prefix: Some("/userfiles/") },    wiki: false, forum: true },
    TagSpec { name: "wiki",       kind: TagKind::Anchor { href_prefix: Some("/wiki/") },         wiki: true,  forum: true },
    TagSpec { name: "list",       kind: TagKind::List,                                   wiki: true,  forum: true },
    TagSpec { name: "li",         kind: TagKind::ListItem,                               wiki: true,  forum: true },
    TagSpec { name: "br",         kind: TagKind::Break,                                  wiki: true,  forum: true },
    TagSpec { name: "hr",         kind: TagKind::Rule,                                   wiki: true,  forum: false },
    TagSpec { name: "noparse",    kind: TagKind::NoParse,                                wiki: true,  forum: true },
    TagSpec { name: "if",         kind: TagKind::If,                                     wiki: true,  forum: false },
];

/// Look up a tag by its (lowercased) name.
#[must_use]
pub fn tag_spec(name: &str) -> Option<&'static TagSpec> {
    TAG_TABLE.iter().find(|spec| spec.name == name)
}

/// Look up a tag, restricted to one dialect's allow-list.
#[must_use]
pub fn tag_spec_in(name: &str, dialect: Dialect) -> Option<&'static TagSpec> {
    tag_spec(name).filter(|spec| spec.in_dialect(dialect))
}
