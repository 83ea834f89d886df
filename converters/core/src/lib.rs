//! Rendering parsed tagmark documents.
//!
//! - [`render`] - generic post-order walk over a [`Document`]
//! - [`Format`] - what differs between output formats: [`HtmlFormat`],
//!   [`TextFormat`] and [`CanonicalFormat`]
//! - [`Backend`] - format selection at runtime, see [`render_with`]
//!
//! Nodes carrying a validation error still render; each tag decides how
//! it degrades.
use tagmark_core::RenderOptions;
use tagmark_parser::{Document, NodeRef};

mod backend;
mod format;

pub use backend::{Backend, UnknownBackend};
pub use format::{CanonicalFormat, Format, HtmlFormat, TextFormat};

struct Frame<'a, O> {
    node: NodeRef<'a>,
    next_child: usize,
    inner: O,
}

impl<'a, O> Frame<'a, O> {
    fn new<F: Format<Output = O>>(node: NodeRef<'a>) -> Self {
        Self {
            node,
            next_child: 0,
            inner: F::empty(),
        }
    }
}

/// Render `document` in format `F`.
///
/// Children are rendered before their parent, and each parent's hook
/// receives the concatenated output of its children. The walk keeps an
/// explicit stack, so nesting depth is only bounded by the parser limits.
#[tracing::instrument(skip_all, fields(nodes = document.node_count(), format = std::any::type_name::<F>()))]
#[must_use]
pub fn render<F: Format>(document: &Document, options: &RenderOptions) -> String {
    let mut stack = vec![Frame::new::<F>(document.root())];
    while let Some(frame) = stack.last_mut() {
        if let Some(&child) = frame.node.child_ids().get(frame.next_child) {
            frame.next_child += 1;
            if let Some(child) = document.get(child) {
                stack.push(Frame::new::<F>(child));
            }
            continue;
        }

        let Some(Frame { node, inner, .. }) = stack.pop() else {
            break;
        };
        let rendered = F::render_node(node, inner, options);
        match stack.last_mut() {
            Some(parent) => F::append(&mut parent.inner, rendered),
            None => return F::finish(rendered),
        }
    }
    String::new()
}

/// Render `document` in the format picked by `backend`.
#[must_use]
pub fn render_with(backend: Backend, document: &Document, options: &RenderOptions) -> String {
    match backend {
        Backend::Html => render::<HtmlFormat>(document, options),
        Backend::Text => render::<TextFormat>(document, options),
        Backend::Canonical => render::<CanonicalFormat>(document, options),
    }
}
