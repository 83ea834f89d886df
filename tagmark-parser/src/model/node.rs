use std::{fmt, sync::Arc};

use serde::Serialize;

use crate::{
    Document, Tag, TagDefinition, TagFlags, ValidationError,
    model::{Attributes, Span},
};

/// Stable index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root of every document.
    pub const ROOT: Self = Self(0);

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What produced a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    /// A registered tag.
    Element,
    Text,
    Newline,
    /// Synthesized around runs of inline content.
    Paragraph,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) tag: Arc<dyn Tag>,
    pub(crate) name: String,
    pub(crate) attributes: Attributes,
    pub(crate) content: String,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) span: Span,
    pub(crate) error: Option<ValidationError>,
    /// Position in the parent's child list.
    pub(crate) index: usize,
    /// Position among the siblings sharing this node's tag.
    pub(crate) ordinal: usize,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, tag: Arc<dyn Tag>, name: &str, span: Span) -> Self {
        Self {
            kind,
            tag,
            name: name.to_string(),
            attributes: Attributes::new(),
            content: String::new(),
            children: Vec::new(),
            parent: None,
            span,
            error: None,
            index: 0,
            ordinal: 0,
        }
    }
}

/// Read-only handle on a node and the document that owns it.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    document: &'a Document,
    id: NodeId,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(document: &'a Document, id: NodeId, node: &'a Node) -> Self {
        Self { document, id, node }
    }

    #[must_use]
    pub fn id(self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn kind(self) -> NodeKind {
        self.node.kind
    }

    #[must_use]
    pub fn tag(self) -> &'a dyn Tag {
        self.node.tag.as_ref()
    }

    #[must_use]
    pub fn definition(self) -> &'a TagDefinition {
        self.node.tag.definition()
    }

    #[must_use]
    pub fn flags(self) -> TagFlags {
        self.definition().flags
    }

    /// The tag name as it was spelled in the source (canonical name or alias).
    #[must_use]
    pub fn name(self) -> &'a str {
        &self.node.name
    }

    #[must_use]
    pub fn attributes(self) -> &'a Attributes {
        &self.node.attributes
    }

    #[must_use]
    pub fn attribute(self, key: &str) -> Option<&'a str> {
        self.node.attributes.get(key)
    }

    /// The `[name=value]` shorthand value, or else the attribute `key`.
    #[must_use]
    pub fn attribute_or_name(self, key: &str) -> Option<&'a str> {
        self.attribute(self.name()).or_else(|| self.attribute(key))
    }

    /// Raw content of a verbatim node or a text leaf.
    #[must_use]
    pub fn content(self) -> &'a str {
        &self.node.content
    }

    #[must_use]
    pub fn error(self) -> Option<&'a ValidationError> {
        self.node.error.as_ref()
    }

    #[must_use]
    pub fn span(self) -> Span {
        self.node.span
    }

    #[must_use]
    pub fn child_ids(self) -> &'a [NodeId] {
        &self.node.children
    }

    pub fn children(self) -> impl DoubleEndedIterator<Item = NodeRef<'a>> {
        let document = self.document;
        self.node
            .children
            .iter()
            .filter_map(move |&id| document.get(id))
    }

    #[must_use]
    pub fn parent(self) -> Option<NodeRef<'a>> {
        self.node.parent.and_then(|id| self.document.get(id))
    }

    /// Position among the siblings that share this node's tag, from `0`.
    ///
    /// `[*]` items of a list count `0, 1, 2...` whatever text or line
    /// breaks sit between them.
    #[must_use]
    pub fn ordinal(self) -> usize {
        self.node.ordinal
    }

    /// The sibling right before this node.
    #[must_use]
    pub fn previous_sibling(self) -> Option<NodeRef<'a>> {
        let index = self.node.index.checked_sub(1)?;
        let parent = self.document.node(self.node.parent?)?;
        parent
            .children
            .get(index)
            .and_then(|&id| self.document.get(id))
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(self) -> impl Iterator<Item = NodeRef<'a>> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// The raw text under this node: its own content followed by the text,
    /// line breaks and verbatim content of every descendant, in order.
    #[must_use]
    pub fn text_content(self) -> String {
        let mut text = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node.kind() {
                NodeKind::Newline => text.push('\n'),
                NodeKind::Root | NodeKind::Element | NodeKind::Text | NodeKind::Paragraph => {
                    text.push_str(node.content());
                }
            }
            stack.extend(node.children().rev());
        }
        text
    }

    #[must_use]
    pub fn document(self) -> &'a Document {
        self.document
    }

    /// Whether runs of inline children of this node are wrapped in paragraphs.
    #[must_use]
    pub fn makes_paragraphs(self) -> bool {
        match self.kind() {
            NodeKind::Root => self.document.paragraphs,
            NodeKind::Element => self.flags().make_paragraphs_here,
            NodeKind::Text | NodeKind::Newline | NodeKind::Paragraph => false,
        }
    }

    /// Whether this node is a block-level node.
    #[must_use]
    pub fn is_block(self) -> bool {
        !self.flags().inline
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.node.name)
            .field("kind", &self.node.kind)
            .finish_non_exhaustive()
    }
}
