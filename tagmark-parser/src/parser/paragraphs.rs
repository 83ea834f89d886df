//! Wrapping runs of inline children in synthetic paragraph nodes.
use std::sync::Arc;

use crate::{
    Document, Error, Limit,
    internal::{PARAGRAPH, PARAGRAPH_NAME},
    model::{Node, NodeId, NodeKind, Span},
};

fn is_block(document: &Document, id: NodeId) -> bool {
    document
        .node(id)
        .is_some_and(|node| !node.tag.definition().flags.inline)
}

fn is_newline(document: &Document, id: NodeId) -> bool {
    document
        .node(id)
        .is_some_and(|node| node.kind == NodeKind::Newline)
}

/// Line breaks and whitespace-only text: never the edge of a paragraph.
fn is_filler(document: &Document, id: NodeId) -> bool {
    document.node(id).is_some_and(|node| match node.kind {
        NodeKind::Newline => true,
        NodeKind::Text => node.content.trim().is_empty(),
        NodeKind::Root | NodeKind::Element | NodeKind::Paragraph => false,
    })
}

/// Wrap every run of non-block children of `parent` that sits between
/// block children and blank lines into a paragraph.
pub(crate) fn wrap(document: &mut Document, parent: NodeId, max_nodes: usize) -> Result<(), Error> {
    let Some(children) = document
        .node_mut(parent)
        .map(|node| std::mem::take(&mut node.children))
    else {
        return Ok(());
    };

    let mut wrapped = Vec::with_capacity(children.len());
    let mut run = Vec::new();
    let mut index = 0;
    while let Some(&id) = children.get(index) {
        if is_block(document, id) {
            close_run(document, parent, &mut run, &mut wrapped, max_nodes)?;
            wrapped.push(id);
            index += 1;
            continue;
        }
        if is_newline(document, id) {
            let blank = children
                .get(index..)
                .unwrap_or_default()
                .iter()
                .take_while(|&&id| is_filler(document, id))
                .copied()
                .collect::<Vec<_>>();
            let line_breaks = blank.iter().filter(|&&id| is_newline(document, id)).count();
            if line_breaks >= 2 {
                close_run(document, parent, &mut run, &mut wrapped, max_nodes)?;
                index += blank.len();
                wrapped.extend(blank);
                continue;
            }
        }
        run.push(id);
        index += 1;
    }
    close_run(document, parent, &mut run, &mut wrapped, max_nodes)?;

    if let Some(node) = document.node_mut(parent) {
        node.children = wrapped;
    }
    Ok(())
}

fn close_run(
    document: &mut Document,
    parent: NodeId,
    run: &mut Vec<NodeId>,
    wrapped: &mut Vec<NodeId>,
    max_nodes: usize,
) -> Result<(), Error> {
    let mut run = std::mem::take(run);
    let first = run.iter().position(|&id| !is_filler(document, id));
    let last = run.iter().rposition(|&id| !is_filler(document, id));
    let (Some(first), Some(last)) = (first, last) else {
        wrapped.extend(run);
        return Ok(());
    };

    let trailing = run.split_off(last + 1);
    let body = run.split_off(first);
    wrapped.extend(run);

    let span = body
        .iter()
        .filter_map(|&id| document.node(id).map(|node| node.span))
        .reduce(Span::merge)
        .unwrap_or_default();
    if document.node_count() >= max_nodes {
        return Err(Error::ResourceLimitExceeded {
            limit: Limit::Nodes,
            maximum: max_nodes,
            position: span.start,
        });
    }

    let mut paragraph = Node::new(
        NodeKind::Paragraph,
        Arc::clone(&PARAGRAPH),
        PARAGRAPH_NAME,
        span,
    );
    paragraph.parent = Some(parent);
    paragraph.children.clone_from(&body);
    let paragraph = document.insert_detached(paragraph);
    for id in body {
        if let Some(node) = document.node_mut(id) {
            node.parent = Some(paragraph);
        }
    }
    wrapped.push(paragraph);
    wrapped.extend(trailing);
    Ok(())
}
