//! The per-format half of rendering.
use tagmark_core::{Html, RenderOptions};
use tagmark_parser::NodeRef;

/// How one output format renders a node and joins sibling output.
///
/// The walk in [`render`](crate::render) is the same for every format; a
/// format only says which [`Tag`](tagmark_parser::Tag) hook to call, how to
/// concatenate results and how to turn the root's output into a string.
pub trait Format {
    type Output;

    fn empty() -> Self::Output;

    fn append(output: &mut Self::Output, part: Self::Output);

    /// Render `node` around the already rendered output of its children.
    fn render_node(node: NodeRef<'_>, inner: Self::Output, options: &RenderOptions)
    -> Self::Output;

    fn finish(output: Self::Output) -> String;
}

/// Escaped HTML fragments, built through [`Html`].
#[derive(Debug, Clone, Copy)]
pub struct HtmlFormat;

impl Format for HtmlFormat {
    type Output = Html;

    fn empty() -> Html {
        Html::new()
    }

    fn append(output: &mut Html, part: Html) {
        output.push_html(&part);
    }

    fn render_node(node: NodeRef<'_>, inner: Html, options: &RenderOptions) -> Html {
        node.tag().render_html(node, inner, options)
    }

    fn finish(output: Html) -> String {
        output.into_string()
    }
}

/// Plain text.
#[derive(Debug, Clone, Copy)]
pub struct TextFormat;

impl Format for TextFormat {
    type Output = String;

    fn empty() -> String {
        String::new()
    }

    fn append(output: &mut String, part: String) {
        output.push_str(&part);
    }

    fn render_node(node: NodeRef<'_>, inner: String, options: &RenderOptions) -> String {
        node.tag().render_text(node, inner, options)
    }

    fn finish(output: String) -> String {
        output
    }
}

/// Markup that reparses to the same tree.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalFormat;

impl Format for CanonicalFormat {
    type Output = String;

    fn empty() -> String {
        String::new()
    }

    fn append(output: &mut String, part: String) {
        output.push_str(&part);
    }

    fn render_node(node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
        node.tag().render_canonical(node, inner)
    }

    fn finish(output: String) -> String {
        output
    }
}
