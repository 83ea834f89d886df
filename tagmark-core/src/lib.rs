//! Shared building blocks for the tagmark crates.
//!
//! Everything in here is consumed by tag implementations while they validate
//! or render a node:
//!
//! - [`Html`] - an HTML fragment that can only be grown with escaped text or
//!   markup literals
//! - [`escape_html`] / [`unescape_html`] - entity escaping primitives
//! - [`sanitize_url`] - scheme allow-list and relative URL resolution
//! - [`slugify`] - identifier generation for anchors and figure ids
//! - [`RenderOptions`] - options shared by every output format

mod html;
mod options;
mod sanitize;
mod slug;

pub use html::{Html, escape_html, unescape_html};
pub use options::{RenderOptions, RenderOptionsBuilder};
pub use sanitize::{UrlError, UrlPolicy, sanitize_url};
pub use slug::slugify;

/// Re-exported so tag implementations and callers agree on one `Url` type.
pub use url::Url;
