//! The validation pass.
use rustc_hash::FxHashSet;
use url::Url;

use crate::{Attributes, Diagnostic, Document, NodeId, NodeRef, TagFlags, ValidationError};

/// One entry of a breadcrumb: an ancestor of the node being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ancestor {
    pub id: NodeId,
    /// Canonical tag name.
    pub tag: &'static str,
}

/// Changes a hook made to its node, applied once the hook returns.
#[derive(Debug, Default)]
struct Edits {
    attributes: Option<Attributes>,
    content: Option<String>,
    error: Option<ValidationError>,
}

/// What a tag hook sees of the document while validating one node.
///
/// The whole document can be read through [`node`](Self::node). Only the
/// node's own attributes, content and error annotation can be changed.
pub struct ValidationContext<'a> {
    node: NodeRef<'a>,
    breadcrumb: &'a [Ancestor],
    known_ids: &'a mut FxHashSet<String>,
    diagnostics: &'a mut Vec<Diagnostic>,
    edits: Edits,
}

impl<'a> ValidationContext<'a> {
    /// The node as it was before this hook ran.
    #[must_use]
    pub fn node(&self) -> NodeRef<'a> {
        self.node
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    /// Tag name as spelled in the source.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.node.name()
    }

    #[must_use]
    pub fn flags(&self) -> TagFlags {
        self.node.flags()
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        self.edits
            .attributes
            .as_ref()
            .unwrap_or_else(|| self.node.attributes())
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        let node = self.node;
        self.edits
            .attributes
            .get_or_insert_with(|| node.attributes().clone())
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes().get(key)
    }

    /// The `[name=value]` shorthand value, or else the attribute `key`.
    #[must_use]
    pub fn attribute_or_name(&self, key: &str) -> Option<&str> {
        let attributes = self.attributes();
        attributes
            .get(self.node.name())
            .or_else(|| attributes.get(key))
    }

    /// Replace whichever of the shorthand or `key` attribute is present.
    pub fn set_attribute_or_name(&mut self, key: &str, value: impl Into<String>) {
        let name = self.node.name();
        let attributes = self.attributes_mut();
        if attributes.contains_key(name) {
            attributes.insert(name, value);
        } else {
            attributes.insert(key, value);
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        self.edits
            .content
            .as_deref()
            .unwrap_or_else(|| self.node.content())
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.edits.content = Some(content.into());
    }

    /// Ancestors from the root down to the parent.
    #[must_use]
    pub fn breadcrumb(&self) -> &[Ancestor] {
        self.breadcrumb
    }

    /// Whether any ancestor has the canonical tag name `tag`.
    #[must_use]
    pub fn is_inside(&self, tag: &str) -> bool {
        self.breadcrumb.iter().any(|ancestor| ancestor.tag == tag)
    }

    /// Register a document-wide identifier. Returns `false` if it was
    /// already taken.
    pub fn register_id(&mut self, id: &str) -> bool {
        self.known_ids.insert(id.to_string())
    }

    #[must_use]
    pub fn is_known_id(&self, id: &str) -> bool {
        self.known_ids.contains(id)
    }

    #[must_use]
    pub fn relative_url_base(&self) -> Option<&'a Url> {
        self.node.document().relative_url_base()
    }

    /// Record a problem with this node.
    ///
    /// Every problem is returned by [`Document::sanitize`]; only the first
    /// one is kept on the node.
    pub fn report(&mut self, error: ValidationError) {
        let tag = self.node.definition().name;
        tracing::debug!(node = %self.node.id(), tag, %error, "validation error");
        self.diagnostics.push(Diagnostic {
            node: self.node.id(),
            tag,
            error: error.clone(),
        });
        if !self.has_error() {
            self.edits.error = Some(error);
        }
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        self.node.error().is_some() || self.edits.error.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
enum Pass {
    PreProcess,
    Validate,
}

impl Document {
    /// Validate and normalize every node in place.
    ///
    /// Runs each tag's [`Tag::pre_process`](crate::Tag::pre_process) hook
    /// over the whole tree, then each [`Tag::validate`](crate::Tag::validate)
    /// hook, parents before children. Never changes the shape of the tree.
    /// Running it again yields the same document and the same diagnostics.
    #[tracing::instrument(skip_all, fields(nodes = self.node_count()))]
    pub fn sanitize(&mut self) -> Vec<Diagnostic> {
        let mut known_ids = std::mem::take(&mut self.known_ids);
        known_ids.clear();
        let order: Vec<NodeId> = self.traverse().map(NodeRef::id).collect();

        let mut diagnostics = Vec::new();
        for pass in [Pass::PreProcess, Pass::Validate] {
            for &id in &order {
                self.run_hook(id, pass, &mut known_ids, &mut diagnostics);
            }
        }
        self.known_ids = known_ids;
        if !diagnostics.is_empty() {
            tracing::debug!(count = diagnostics.len(), "sanitize reported problems");
        }
        diagnostics
    }

    fn run_hook(
        &mut self,
        id: NodeId,
        pass: Pass,
        known_ids: &mut FxHashSet<String>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let Some(node) = self.get(id) else {
            return;
        };
        let mut breadcrumb: Vec<Ancestor> = node
            .ancestors()
            .map(|ancestor| Ancestor {
                id: ancestor.id(),
                tag: ancestor.definition().name,
            })
            .collect();
        breadcrumb.reverse();

        let mut ctx = ValidationContext {
            node,
            breadcrumb: &breadcrumb,
            known_ids,
            diagnostics,
            edits: Edits::default(),
        };
        match pass {
            Pass::PreProcess => node.tag().pre_process(&mut ctx),
            Pass::Validate => node.tag().validate(&mut ctx),
        }
        let edits = ctx.edits;

        let Some(node) = self.node_mut(id) else {
            return;
        };
        if let Some(attributes) = edits.attributes {
            node.attributes = attributes;
        }
        if let Some(content) = edits.content {
            node.content = content;
        }
        if node.error.is_none() {
            node.error = edits.error;
        }
    }
}
