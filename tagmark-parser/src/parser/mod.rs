use std::borrow::Cow;

use crate::{Document, Error, Options, Registry};

mod paragraphs;
mod scanner;
mod tree_builder;

use tree_builder::TreeBuilder;

/// Parse bracket-tag markup into a [`Document`].
///
/// Unknown tags and malformed tokens are kept as text. Structural problems
/// the parser recovers from (tags left open, stray closing tags) are listed in
/// [`Document::issues`].
///
/// # Example
///
/// ```
/// use tagmark_parser::{Options, Registry, parse};
///
/// let document = parse("[nope]plain[/nope]", &Registry::new(), &Options::default()).unwrap();
/// assert_eq!(document.root().children().count(), 1);
/// ```
///
/// # Errors
///
/// Returns [`Error::ResourceLimitExceeded`] when the input nests deeper than
/// [`Options::max_depth`] or produces more than [`Options::max_nodes`] nodes.
/// No partial tree is returned.
#[tracing::instrument(skip_all, fields(input_len = input.len()))]
pub fn parse(input: &str, registry: &Registry, options: &Options) -> Result<Document, Error> {
    let input = normalize_line_endings(input);
    let document = TreeBuilder::new(&input, registry, options).build()?;
    tracing::debug!(
        nodes = document.node_count(),
        issues = document.issues().len(),
        "parsed document"
    );
    Ok(document)
}

fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if input.contains('\r') {
        Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(input)
    }
}
