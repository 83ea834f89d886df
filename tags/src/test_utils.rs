#![allow(clippy::unwrap_used)]
use std::sync::Arc;

use tagmark_converters_core::{CanonicalFormat, HtmlFormat, TextFormat, render};
use tagmark_core::RenderOptions;
use tagmark_parser::{Diagnostic, Document, Options, Registry, parse};

use crate::{PlainHighlighter, build_registry};

/// The standard tags with plain highlighting, so output is stable across features.
pub(crate) fn registry() -> Registry {
    build_registry(Arc::new(PlainHighlighter)).unwrap()
}

pub(crate) fn sanitized(input: &str) -> (Document, Vec<Diagnostic>) {
    let mut document = parse(input, &registry(), &Options::default()).unwrap();
    let diagnostics = document.sanitize();
    (document, diagnostics)
}

pub(crate) fn render_html(document: &Document) -> String {
    render::<HtmlFormat>(document, &RenderOptions::default())
}

pub(crate) fn render_text(document: &Document) -> String {
    render::<TextFormat>(document, &RenderOptions::default())
}

pub(crate) fn render_canonical(document: &Document) -> String {
    render::<CanonicalFormat>(document, &RenderOptions::default())
}
