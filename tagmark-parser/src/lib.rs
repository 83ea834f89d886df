//! Bracket-tag markup: tag registry, parser, document tree and validation.
//!
//! Markup such as `[b]bold[/b] and [url=https://example.com]a link[/url]` is
//! parsed against a [`Registry`] of [`Tag`] implementations into a
//! [`Document`]. The parser never fails on malformed markup: unknown or
//! broken tags stay as text and structural problems are recorded as
//! [`ParseIssue`]s. It only fails when an input exceeds the configured
//! [`Options`] limits.
//!
//! [`Document::sanitize`] then runs every tag's validation hooks, which
//! normalize attributes and annotate invalid nodes. Rendering lives in
//! `tagmark-converters-core`.
//!
//! ```
//! use std::sync::Arc;
//! use tagmark_parser::{
//!     NodeRef, Options, Registry, Tag, TagDefinition, TagFlags, parse,
//!     tagmark_core::{Html, RenderOptions},
//! };
//!
//! #[derive(Debug)]
//! struct Bold;
//!
//! impl Tag for Bold {
//!     fn definition(&self) -> &TagDefinition {
//!         const DEFINITION: TagDefinition = TagDefinition::new("b", TagFlags::inline());
//!         &DEFINITION
//!     }
//!
//!     fn render_html(&self, _node: NodeRef<'_>, inner: Html, _options: &RenderOptions) -> Html {
//!         let mut html = Html::from_static("<strong>");
//!         html.push_html(&inner);
//!         html.push_static("</strong>");
//!         html
//!     }
//!
//!     fn render_text(&self, _node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
//!         inner
//!     }
//! }
//!
//! let registry = Registry::with_tags([Arc::new(Bold) as Arc<dyn Tag>]).unwrap();
//! let mut document = parse("[B]hi[/b]", &registry, &Options::default()).unwrap();
//! assert!(document.sanitize().is_empty());
//! assert_eq!(document.root().children().next().unwrap().name(), "B");
//! ```
pub mod canonical;
mod error;
mod internal;
mod model;
mod options;
mod parser;
#[cfg(test)]
mod proptests;
mod registry;
mod sanitize;
mod tag;
#[cfg(test)]
mod test_utils;

pub use error::{Diagnostic, Error, Limit, ParseIssue, ValidationError};
pub use model::{Attributes, Document, NodeId, NodeKind, NodeRef, Shape, Span};
pub use options::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, Options, OptionsBuilder};
pub use parser::parse;
pub use registry::Registry;
pub use sanitize::{Ancestor, ValidationContext};
pub use tag::{Tag, TagDefinition, TagFlags};

pub use tagmark_core;
