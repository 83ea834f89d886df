//! The stack machine turning tokens into a [`Document`].
use std::sync::Arc;

use crate::{
    Document, Error, Limit, Options, ParseIssue, Registry, Tag, TagFlags,
    internal::{NEWLINE, NEWLINE_NAME, TEXT, TEXT_NAME},
    model::{Node, NodeId, NodeKind, Span},
    parser::{
        paragraphs,
        scanner::{self, CloseTag, OpenTag, TagToken},
    },
};

/// An element on the open stack.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    id: NodeId,
    canonical: &'static str,
    flags: TagFlags,
}

/// Text and line breaks not yet attached to the tree.
///
/// Keeping them pending lets a closing tag drop one trailing line break
/// without ever creating (and then orphaning) a node.
#[derive(Debug)]
enum Pending {
    Text { text: String, span: Span },
    Newline(Span),
}

pub(crate) struct TreeBuilder<'a> {
    input: &'a str,
    registry: &'a Registry,
    options: &'a Options,
    document: Document,
    stack: Vec<OpenNode>,
    pending: Vec<Pending>,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(input: &'a str, registry: &'a Registry, options: &'a Options) -> Self {
        Self {
            input,
            registry,
            options,
            document: Document::new(input.len(), options),
            stack: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub(crate) fn build(mut self) -> Result<Document, Error> {
        let input = self.input;
        let mut pos = 0;
        while let Some(rest) = input.get(pos..).filter(|rest| !rest.is_empty()) {
            let Some(offset) = rest.find(['[', '\\', '\n']) else {
                self.push_text(rest, Span::new(pos, input.len()));
                break;
            };
            let at = pos + offset;
            if offset > 0 {
                self.push_text(rest.get(..offset).unwrap_or_default(), Span::new(pos, at));
            }
            pos = match rest.get(offset..).and_then(|special| special.chars().next()) {
                Some('\n') => {
                    self.line_break(at)?;
                    at + 1
                }
                Some('\\') => self.escape(at),
                _ => self.tag(at)?,
            };
        }

        let end = input.len();
        while !self.stack.is_empty() {
            self.close_top(end, true)?;
        }
        self.flush()?;
        self.finalize(NodeId::ROOT, end)?;
        self.document.index_siblings();
        Ok(self.document)
    }

    /// `\[`, `\]`, `\\` and a backslash before a line break are escapes. Any
    /// other backslash is literal.
    fn escape(&mut self, at: usize) -> usize {
        let escaped = self
            .input
            .get(at + 1..)
            .and_then(|rest| rest.chars().next())
            .filter(|c| matches!(c, '[' | ']' | '\\' | '\n'));
        match escaped {
            Some(c) => {
                let end = at + 1 + c.len_utf8();
                self.push_text(c.encode_utf8(&mut [0; 4]), Span::new(at, end));
                end
            }
            None => {
                self.push_text("\\", Span::new(at, at + 1));
                at + 1
            }
        }
    }

    /// Handle the `[` at `at`. Returns where scanning resumes.
    fn tag(&mut self, at: usize) -> Result<usize, Error> {
        match scanner::scan_tag(self.input, at) {
            Some(TagToken::Open(open)) => {
                if let Some(tag) = self.registry.resolve(open.name) {
                    let tag = Arc::clone(tag);
                    return self.open(&tag, open, at);
                }
            }
            Some(TagToken::Close(close)) => {
                if let Some(tag) = self.registry.resolve(close.name) {
                    let canonical = tag.definition().name;
                    return self.close(canonical, &close, at);
                }
            }
            None => {}
        }
        self.push_text("[", Span::new(at, at + 1));
        Ok(at + 1)
    }

    fn open(&mut self, tag: &Arc<dyn Tag>, open: OpenTag<'_>, at: usize) -> Result<usize, Error> {
        let definition = tag.definition();
        let flags = definition.flags;

        if self.top_closes_on(definition.name) {
            tracing::trace!(tag = definition.name, "same tag closes the open one");
            self.close_top(at, false)?;
        } else if !flags.inline && flags.close_inlines {
            while self.stack.last().is_some_and(|top| top.flags.inline) {
                tracing::trace!(tag = definition.name, "block tag closes an open inline tag");
                self.close_top(at, false)?;
            }
            if self.top_closes_on(definition.name) {
                self.close_top(at, false)?;
            }
        }
        self.flush()?;

        let standalone = flags.standalone || open.self_closing;
        let verbatim = !flags.parse_embedded && !standalone;
        if !standalone && !verbatim && self.stack.len() >= self.options.max_depth {
            return Err(self.limit_exceeded(Limit::Depth, at));
        }
        self.check_node_limit(at)?;

        let mut node = Node::new(
            NodeKind::Element,
            Arc::clone(tag),
            open.name,
            Span::new(at, open.end),
        );
        node.attributes = open.attributes;
        let parent = self.top();
        let id = self.document.append(parent, node);

        if standalone {
            return Ok(open.end);
        }
        if verbatim {
            return Ok(self.verbatim(id, definition.name, flags, open.end));
        }
        self.stack.push(OpenNode {
            id,
            canonical: definition.name,
            flags,
        });
        Ok(open.end)
    }

    /// Capture raw content up to the matching closing tag.
    fn verbatim(&mut self, id: NodeId, canonical: &str, flags: TagFlags, from: usize) -> usize {
        let len = self.input.len();
        let (content_end, end) =
            scanner::find_verbatim_end(self.input, from, self.registry, canonical)
                .unwrap_or((len, len));
        if content_end == len {
            self.report_unterminated(id, len);
        }

        let mut content = self
            .input
            .get(from..content_end)
            .unwrap_or_default()
            .to_string();
        if flags.swallow_trailing_newline && content.ends_with('\n') && !content.ends_with("\n\n") {
            content.pop();
        }
        if let Some(node) = self.document.node_mut(id) {
            node.content = content;
            node.span.end = end;
        }
        end
    }

    fn close(&mut self, canonical: &str, close: &CloseTag<'_>, at: usize) -> Result<usize, Error> {
        let span = Span::new(at, close.end);
        let Some(index) = self
            .stack
            .iter()
            .rposition(|open| open.canonical == canonical)
        else {
            let issue = ParseIssue::UnmatchedClose {
                name: close.name.to_string(),
                span,
            };
            tracing::warn!(%issue, "keeping unmatched closing tag as text");
            self.document.issues.push(issue);
            let input = self.input;
            let literal = input.get(at..close.end).unwrap_or_default();
            self.push_text(literal, span);
            return Ok(close.end);
        };

        while self.stack.len() > index + 1 {
            self.close_top(at, true)?;
        }
        self.close_top(close.end, false)?;
        Ok(close.end)
    }

    /// An unescaped line break closes everything up to the outermost open
    /// tag that ends at end of line. The line break then belongs outside.
    fn line_break(&mut self, at: usize) -> Result<(), Error> {
        if let Some(index) = self
            .stack
            .iter()
            .position(|open| open.flags.newline_closes)
        {
            while self.stack.len() > index {
                self.close_top(at, true)?;
            }
        }
        self.pending.push(Pending::Newline(Span::new(at, at + 1)));
        Ok(())
    }

    /// Pop and finalize the innermost open tag.
    ///
    /// `implicit` is set when the tag is closed by anything but its own
    /// closing tag; that is reported unless the tag is meant to close that way.
    fn close_top(&mut self, end: usize, implicit: bool) -> Result<(), Error> {
        let Some(&open) = self.stack.last() else {
            return Ok(());
        };
        if open.flags.swallow_trailing_newline {
            self.swallow_trailing_newline();
        }
        self.flush()?;
        self.stack.pop();
        self.finalize(open.id, end)?;

        if implicit && !(open.flags.same_tag_closes || open.flags.newline_closes) {
            self.report_unterminated(open.id, end);
        } else {
            tracing::debug!(tag = open.canonical, "closed");
        }
        Ok(())
    }

    fn report_unterminated(&mut self, id: NodeId, end: usize) {
        let Some(node) = self.document.node(id) else {
            return;
        };
        let issue = ParseIssue::Unterminated {
            name: node.name.clone(),
            span: Span::new(node.span.start, end),
        };
        tracing::warn!(%issue, "closing tag implicitly");
        self.document.issues.push(issue);
    }

    fn swallow_trailing_newline(&mut self) {
        let trailing = self
            .pending
            .iter()
            .rev()
            .take_while(|item| matches!(item, Pending::Newline(_)))
            .count();
        if trailing != 1 {
            return;
        }
        let follows_newline = self.pending.len() == 1
            && self
                .document
                .node(self.top())
                .and_then(|node| node.children.last())
                .and_then(|&last| self.document.node(last))
                .is_some_and(|last| last.kind == NodeKind::Newline);
        if !follows_newline {
            self.pending.pop();
        }
    }

    fn finalize(&mut self, id: NodeId, end: usize) -> Result<(), Error> {
        if let Some(node) = self.document.node_mut(id) {
            node.span.end = end;
        }
        let makes_paragraphs = self
            .document
            .get(id)
            .is_some_and(crate::NodeRef::makes_paragraphs);
        if makes_paragraphs {
            paragraphs::wrap(&mut self.document, id, self.options.max_nodes)?;
        }
        Ok(())
    }

    fn push_text(&mut self, text: &str, span: Span) {
        if let Some(Pending::Text {
            text: pending,
            span: pending_span,
        }) = self.pending.last_mut()
        {
            pending.push_str(text);
            *pending_span = pending_span.merge(span);
            return;
        }
        self.pending.push(Pending::Text {
            text: text.to_string(),
            span,
        });
    }

    /// Attach pending text and line breaks to the innermost open node.
    fn flush(&mut self) -> Result<(), Error> {
        let parent = self.top();
        for item in std::mem::take(&mut self.pending) {
            match item {
                Pending::Text { text, span } => {
                    if self.merge_into_last_text(parent, &text, span) {
                        continue;
                    }
                    self.check_node_limit(span.start)?;
                    let mut node = Node::new(NodeKind::Text, Arc::clone(&TEXT), TEXT_NAME, span);
                    node.content = text;
                    self.document.append(parent, node);
                }
                Pending::Newline(span) => {
                    self.check_node_limit(span.start)?;
                    let node = Node::new(
                        NodeKind::Newline,
                        Arc::clone(&NEWLINE),
                        NEWLINE_NAME,
                        span,
                    );
                    self.document.append(parent, node);
                }
            }
        }
        Ok(())
    }

    fn merge_into_last_text(&mut self, parent: NodeId, text: &str, span: Span) -> bool {
        let Some(last) = self
            .document
            .node(parent)
            .and_then(|node| node.children.last().copied())
        else {
            return false;
        };
        match self.document.node_mut(last) {
            Some(node) if node.kind == NodeKind::Text => {
                node.content.push_str(text);
                node.span = node.span.merge(span);
                true
            }
            _ => false,
        }
    }

    fn top(&self) -> NodeId {
        self.stack.last().map_or(NodeId::ROOT, |open| open.id)
    }

    fn top_closes_on(&self, canonical: &str) -> bool {
        self.stack
            .last()
            .is_some_and(|top| top.flags.same_tag_closes && top.canonical == canonical)
    }

    fn check_node_limit(&self, position: usize) -> Result<(), Error> {
        if self.document.node_count() >= self.options.max_nodes {
            return Err(self.limit_exceeded(Limit::Nodes, position));
        }
        Ok(())
    }

    fn limit_exceeded(&self, limit: Limit, position: usize) -> Error {
        let maximum = match limit {
            Limit::Depth => self.options.max_depth,
            Limit::Nodes => self.options.max_nodes,
        };
        tracing::debug!(%limit, maximum, position, "aborting parse");
        Error::ResourceLimitExceeded {
            limit,
            maximum,
            position,
        }
    }
}
