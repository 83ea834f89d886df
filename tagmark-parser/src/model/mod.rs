//! The tree produced by the parser.
//!
//! Nodes live in an arena owned by [`Document`] and refer to each other by
//! [`NodeId`]. The root is always [`NodeId::ROOT`].
use std::{collections::BTreeMap, sync::Arc};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use url::Url;

use crate::{Options, ParseIssue, internal};

mod attributes;
mod location;
mod node;

pub use attributes::Attributes;
pub use location::Span;
pub(crate) use node::Node;
pub use node::{NodeId, NodeKind, NodeRef};

/// A parsed document.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) root: Node,
    pub(crate) nodes: Vec<Node>,
    pub(crate) issues: Vec<ParseIssue>,
    pub(crate) known_ids: FxHashSet<String>,
    pub(crate) relative_url_base: Option<Url>,
    pub(crate) paragraphs: bool,
}

impl Document {
    pub(crate) fn new(input_len: usize, options: &Options) -> Self {
        Self {
            root: Node::new(
                NodeKind::Root,
                Arc::clone(&internal::ROOT),
                internal::ROOT_NAME,
                Span::new(0, input_len),
            ),
            nodes: Vec::new(),
            issues: Vec::new(),
            known_ids: FxHashSet::default(),
            relative_url_base: options.relative_url_base.clone(),
            paragraphs: options.paragraphs,
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, NodeId::ROOT, &self.root)
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.node(id).map(|node| NodeRef::new(self, id, node))
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() + 1
    }

    /// Structural problems the parser recovered from.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    #[must_use]
    pub fn relative_url_base(&self) -> Option<&Url> {
        self.relative_url_base.as_ref()
    }

    /// Whether an identifier was registered during the last sanitize run.
    #[must_use]
    pub fn is_known_id(&self, id: &str) -> bool {
        self.known_ids.contains(id)
    }

    /// All nodes in document order (depth-first, pre-order), root first.
    pub fn traverse(&self) -> impl Iterator<Item = NodeRef<'_>> {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().rev());
            Some(node)
        })
    }

    /// Structural projection of the whole tree.
    #[must_use]
    pub fn shape(&self) -> Shape {
        Shape::of(self.root())
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        match id.0 {
            0 => Some(&self.root),
            n => self.nodes.get(n - 1),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        match id.0 {
            0 => Some(&mut self.root),
            n => self.nodes.get_mut(n - 1),
        }
    }

    /// Record every node's position in its parent and among the siblings
    /// sharing its tag. Runs once the tree is final.
    pub(crate) fn index_siblings(&mut self) {
        let mut counts: FxHashMap<&'static str, usize> = FxHashMap::default();
        for parent in 0..self.node_count() {
            let Some(children) = self.node(NodeId(parent)).map(|node| node.children.clone()) else {
                continue;
            };
            counts.clear();
            for (index, id) in children.into_iter().enumerate() {
                if let Some(child) = self.node_mut(id) {
                    let count = counts.entry(child.tag.definition().name).or_default();
                    child.index = index;
                    child.ordinal = *count;
                    *count += 1;
                }
            }
        }
    }

    /// Add `node` to the arena without linking it into a child list.
    pub(crate) fn insert_detached(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() + 1);
        self.nodes.push(node);
        id
    }

    /// Add `node` to the arena as the last child of `parent`.
    pub(crate) fn append(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        node.parent = Some(parent);
        let id = self.insert_detached(node);
        if let Some(parent) = self.node_mut(parent) {
            parent.children.push(id);
        }
        id
    }
}

/// A comparable, serializable view of a subtree.
///
/// Two documents with equal shapes render identically. Attributes are
/// sorted, so attribute order never affects equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shape {
    /// Canonical tag name.
    pub tag: &'static str,
    /// Tag name as spelled in the source.
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Shape>,
}

impl Shape {
    #[must_use]
    pub fn of(node: NodeRef<'_>) -> Self {
        Self {
            tag: node.definition().name,
            name: node.name().to_string(),
            attributes: node
                .attributes()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            content: node.content().to_string(),
            error: node.error().map(ToString::to_string),
            children: node.children().map(Shape::of).collect(),
        }
    }
}
