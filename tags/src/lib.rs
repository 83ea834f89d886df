//! The standard tag library for tagmark.
//!
//! - [`standard_tags`] / [`build_registry`] - every tag below, sharing one
//!   [`Highlighter`]
//! - [`default_registry`] - a process-wide registry built once on first use
//! - [`convert`], [`to_html`], [`to_text`] and [`to_canonical`] - parse,
//!   sanitize and render in one call
//!
//! ```
//! let rendered = tagmark_tags::to_html("[b]bold[/b] [url]www.example.com[/url]")?;
//! assert_eq!(
//!     rendered.output,
//!     r#"<strong>bold</strong> <a href="http://www.example.com/" rel="nofollow">http://www.example.com/</a>"#
//! );
//! assert!(rendered.diagnostics.is_empty());
//! # Ok::<(), tagmark_parser::Error>(())
//! ```
use std::sync::{Arc, LazyLock};

use tagmark_converters_core::render_with;
use tagmark_core::RenderOptions;
use tagmark_parser::{Diagnostic, Error, Options, ParseIssue, Registry, Tag, parse};

mod acronym;
mod code;
mod formatting;
pub mod highlight;
mod links;
mod media;
mod structure;
#[cfg(test)]
mod test_utils;

pub use acronym::Acronym;
pub use code::{CodeBlock, FIXED_LANGUAGES};
pub use formatting::{LineBreak, NoParse, Wrapper};
pub use highlight::{Highlighter, PlainHighlighter};
pub use links::{Anchor, Email, GoTo, Link};
pub use media::{Image, Youtube};
pub use structure::{HorizontalRule, List, ListItem, Quote};
pub use tagmark_converters_core::Backend;

/// Every standard tag. Code blocks highlight with `highlighter`.
#[must_use]
pub fn standard_tags(highlighter: Arc<dyn Highlighter>) -> Vec<Arc<dyn Tag>> {
    let mut tags: Vec<Arc<dyn Tag>> = vec![
        Arc::new(formatting::BOLD),
        Arc::new(formatting::ITALIC),
        Arc::new(formatting::UNDERLINE),
        Arc::new(formatting::STRIKE),
        Arc::new(formatting::SUBSCRIPT),
        Arc::new(formatting::SUPERSCRIPT),
        Arc::new(NoParse),
        Arc::new(LineBreak),
        Arc::new(Acronym),
        Arc::new(Link),
        Arc::new(Email),
        Arc::new(Anchor),
        Arc::new(GoTo),
        Arc::new(Image),
        Arc::new(Youtube),
        Arc::new(Quote),
        Arc::new(List),
        Arc::new(ListItem),
        Arc::new(HorizontalRule),
        Arc::new(structure::COLLAPSE),
        Arc::new(structure::COLLAPSE2),
    ];
    tags.extend(
        structure::HEADINGS
            .iter()
            .map(|heading| Arc::new(*heading) as Arc<dyn Tag>),
    );
    tags.extend(FIXED_LANGUAGES.iter().copied().map(|language| {
        Arc::new(CodeBlock::fixed(language, Arc::clone(&highlighter))) as Arc<dyn Tag>
    }));
    tags.push(Arc::new(CodeBlock::new(highlighter)));
    tags
}

/// A registry holding [`standard_tags`].
///
/// # Errors
///
/// Fails only if two standard tags share a name.
pub fn build_registry(highlighter: Arc<dyn Highlighter>) -> Result<Registry, Error> {
    Registry::with_tags(standard_tags(highlighter))
}

/// `SyntectHighlighter` when the `highlighting` feature is enabled and its
/// assets load, [`PlainHighlighter`] otherwise.
#[must_use]
pub fn default_highlighter() -> Arc<dyn Highlighter> {
    #[cfg(feature = "highlighting")]
    {
        match highlight::SyntectHighlighter::new() {
            Ok(highlighter) => return Arc::new(highlighter),
            Err(error) => {
                tracing::warn!(%error, "syntax highlighting unavailable, using plain code blocks");
            }
        }
    }
    Arc::new(PlainHighlighter)
}

static DEFAULT_REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    build_registry(default_highlighter()).unwrap_or_else(|error| {
        tracing::error!(%error, "failed to build the standard tag registry");
        Registry::default()
    })
});

/// The standard registry with [`default_highlighter`], built on first use.
#[must_use]
pub fn default_registry() -> &'static Registry {
    &DEFAULT_REGISTRY
}

/// Output of a whole-pipeline conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub output: String,
    /// Structural problems the parser recovered from.
    pub issues: Vec<ParseIssue>,
    /// Problems found while sanitizing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse, sanitize and render `input`.
///
/// # Errors
///
/// Returns an error if `input` exceeds the parser limits in `options`.
#[tracing::instrument(skip_all, fields(len = input.len(), %backend))]
pub fn convert(
    input: &str,
    backend: Backend,
    registry: &Registry,
    options: &Options,
    render_options: &RenderOptions,
) -> Result<Rendered, Error> {
    let mut document = parse(input, registry, options)?;
    let diagnostics = document.sanitize();
    let output = render_with(backend, &document, render_options);
    Ok(Rendered {
        output,
        issues: document.issues().to_vec(),
        diagnostics,
    })
}

/// [`convert`] to HTML with the default registry and options.
///
/// # Errors
///
/// Returns an error if `input` exceeds the default parser limits.
pub fn to_html(input: &str) -> Result<Rendered, Error> {
    convert(
        input,
        Backend::Html,
        default_registry(),
        &Options::default(),
        &RenderOptions::default(),
    )
}

/// [`convert`] to plain text with the default registry and options.
///
/// # Errors
///
/// Returns an error if `input` exceeds the default parser limits.
pub fn to_text(input: &str) -> Result<Rendered, Error> {
    convert(
        input,
        Backend::Text,
        default_registry(),
        &Options::default(),
        &RenderOptions::default(),
    )
}

/// [`convert`] to canonical markup with the default registry and options.
///
/// # Errors
///
/// Returns an error if `input` exceeds the default parser limits.
pub fn to_canonical(input: &str) -> Result<Rendered, Error> {
    convert(
        input,
        Backend::Canonical,
        default_registry(),
        &Options::default(),
        &RenderOptions::default(),
    )
}
