//! Node kinds the parser creates on its own. They are never registered.
use std::sync::{Arc, LazyLock};

use tagmark_core::{Html, RenderOptions};

use crate::{NodeRef, Tag, TagDefinition, TagFlags, canonical};

pub(crate) const ROOT_NAME: &str = "root";
pub(crate) const TEXT_NAME: &str = "text";
pub(crate) const NEWLINE_NAME: &str = "newline";
pub(crate) const PARAGRAPH_NAME: &str = "paragraph";

pub(crate) static ROOT: LazyLock<Arc<dyn Tag>> = LazyLock::new(|| Arc::new(Root));
pub(crate) static TEXT: LazyLock<Arc<dyn Tag>> = LazyLock::new(|| Arc::new(Text));
pub(crate) static NEWLINE: LazyLock<Arc<dyn Tag>> = LazyLock::new(|| Arc::new(Newline));
pub(crate) static PARAGRAPH: LazyLock<Arc<dyn Tag>> = LazyLock::new(|| Arc::new(Paragraph));

#[derive(Debug)]
struct Root;

impl Tag for Root {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition = TagDefinition::new(ROOT_NAME, TagFlags::block());
        &DEFINITION
    }

    fn render_html(&self, _node: NodeRef<'_>, inner: Html, _options: &RenderOptions) -> Html {
        inner
    }

    fn render_text(&self, _node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
        inner
    }

    fn render_canonical(&self, _node: NodeRef<'_>, inner: String) -> String {
        inner
    }
}

#[derive(Debug)]
struct Text;

impl Tag for Text {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition = TagDefinition::new(TEXT_NAME, TagFlags::inline());
        &DEFINITION
    }

    fn render_html(&self, node: NodeRef<'_>, _inner: Html, _options: &RenderOptions) -> Html {
        Html::escape(node.content())
    }

    fn render_text(&self, node: NodeRef<'_>, _inner: String, _options: &RenderOptions) -> String {
        node.content().to_string()
    }

    fn render_canonical(&self, node: NodeRef<'_>, _inner: String) -> String {
        canonical::escape_text(node.content())
    }
}

/// A line break in running text.
///
/// Inside paragraphs and plain containers it is a visible `<br>`. Directly
/// under a node that builds paragraphs, or right after a block, it only
/// separates blocks.
#[derive(Debug)]
struct Newline;

impl Tag for Newline {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition = TagDefinition::new(NEWLINE_NAME, TagFlags::inline());
        &DEFINITION
    }

    fn render_html(&self, node: NodeRef<'_>, _inner: Html, _options: &RenderOptions) -> Html {
        if node.parent().is_some_and(NodeRef::makes_paragraphs)
            || node.previous_sibling().is_some_and(NodeRef::is_block)
        {
            Html::from_static("\n")
        } else {
            Html::from_static("<br>\n")
        }
    }

    fn render_text(&self, _node: NodeRef<'_>, _inner: String, _options: &RenderOptions) -> String {
        "\n".to_string()
    }

    fn render_canonical(&self, _node: NodeRef<'_>, _inner: String) -> String {
        "\n".to_string()
    }
}

#[derive(Debug)]
struct Paragraph;

impl Tag for Paragraph {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition = TagDefinition::new(PARAGRAPH_NAME, TagFlags::block());
        &DEFINITION
    }

    fn render_html(&self, _node: NodeRef<'_>, inner: Html, _options: &RenderOptions) -> Html {
        let mut html = Html::from_static("<p>");
        html.push_html(&inner);
        html.push_static("</p>\n");
        html
    }

    fn render_text(&self, _node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
        inner
    }

    fn render_canonical(&self, _node: NodeRef<'_>, inner: String) -> String {
        inner
    }
}
