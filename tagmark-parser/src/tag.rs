//! The contract every tag implementation satisfies.
use std::fmt;

use tagmark_core::{Html, RenderOptions};

use crate::{NodeRef, ValidationContext, canonical};

/// Capability flags driving how the parser builds nodes of a tag.
///
/// Start from [`TagFlags::inline()`] or [`TagFlags::block()`] and refine:
///
/// ```
/// use tagmark_parser::TagFlags;
///
/// const CODE: TagFlags = TagFlags::block().verbatim().swallow_trailing_newline();
/// assert!(!CODE.parse_embedded);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct TagFlags {
    /// Can appear within running text.
    pub inline: bool,
    /// Has no closing tag and no children.
    pub standalone: bool,
    /// Opening the same tag again closes the previous one.
    pub same_tag_closes: bool,
    /// An unescaped line break closes the tag.
    pub newline_closes: bool,
    /// Opening this (block) tag closes the inline tags it would nest in.
    pub close_inlines: bool,
    /// Content is parsed for nested tags. When false it is kept verbatim.
    pub parse_embedded: bool,
    /// One trailing line break of the content is dropped on close.
    pub swallow_trailing_newline: bool,
    /// Runs of inline children are wrapped in paragraphs.
    pub make_paragraphs_here: bool,
}

impl TagFlags {
    #[must_use]
    pub const fn inline() -> Self {
        Self {
            inline: true,
            standalone: false,
            same_tag_closes: false,
            newline_closes: false,
            close_inlines: false,
            parse_embedded: true,
            swallow_trailing_newline: false,
            make_paragraphs_here: false,
        }
    }

    #[must_use]
    pub const fn block() -> Self {
        Self {
            inline: false,
            close_inlines: true,
            ..Self::inline()
        }
    }

    #[must_use]
    pub const fn standalone(mut self) -> Self {
        self.standalone = true;
        self
    }

    #[must_use]
    pub const fn verbatim(mut self) -> Self {
        self.parse_embedded = false;
        self
    }

    #[must_use]
    pub const fn same_tag_closes(mut self) -> Self {
        self.same_tag_closes = true;
        self
    }

    #[must_use]
    pub const fn newline_closes(mut self) -> Self {
        self.newline_closes = true;
        self
    }

    #[must_use]
    pub const fn keep_inlines(mut self) -> Self {
        self.close_inlines = false;
        self
    }

    #[must_use]
    pub const fn swallow_trailing_newline(mut self) -> Self {
        self.swallow_trailing_newline = true;
        self
    }

    #[must_use]
    pub const fn make_paragraphs_here(mut self) -> Self {
        self.make_paragraphs_here = true;
        self
    }
}

/// Name, aliases and flags of a tag. Immutable once registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDefinition {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub flags: TagFlags,
}

impl TagDefinition {
    #[must_use]
    pub const fn new(name: &'static str, flags: TagFlags) -> Self {
        Self {
            name,
            aliases: &[],
            flags,
        }
    }

    #[must_use]
    pub const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Canonical name followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

/// A tag implementation.
///
/// The parser only looks at [`Tag::definition`]. The sanitizer calls
/// [`Tag::pre_process`] on every node, then [`Tag::validate`] on every node.
/// Renderers call one of the `render_*` hooks per node, children first, with
/// the concatenated output of the children as `inner`.
///
/// Hooks must not fail: a node whose attributes are invalid reports the
/// problem from [`Tag::validate`] and renders a degraded form.
pub trait Tag: fmt::Debug + Send + Sync {
    fn definition(&self) -> &TagDefinition;

    /// Document-wide bookkeeping that later validation depends on, such as
    /// registering identifiers.
    fn pre_process(&self, _ctx: &mut ValidationContext<'_>) {}

    /// Check and normalize the node's attributes and content.
    fn validate(&self, _ctx: &mut ValidationContext<'_>) {}

    fn render_html(&self, node: NodeRef<'_>, inner: Html, options: &RenderOptions) -> Html;

    fn render_text(&self, node: NodeRef<'_>, inner: String, options: &RenderOptions) -> String;

    /// Re-serialize the node as markup.
    fn render_canonical(&self, node: NodeRef<'_>, inner: String) -> String {
        canonical::element(node, &inner)
    }
}
