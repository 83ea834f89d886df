//! Inline text formatting.
use tagmark_core::{Html, RenderOptions};
use tagmark_parser::{NodeRef, Tag, TagDefinition, TagFlags};

/// A tag rendered as fixed markup around its content.
#[derive(Debug, Clone, Copy)]
pub struct Wrapper {
    definition: TagDefinition,
    open: &'static str,
    close: &'static str,
}

impl Wrapper {
    #[must_use]
    pub const fn new(definition: TagDefinition, open: &'static str, close: &'static str) -> Self {
        Self {
            definition,
            open,
            close,
        }
    }
}

impl Tag for Wrapper {
    fn definition(&self) -> &TagDefinition {
        &self.definition
    }

    fn render_html(&self, _node: NodeRef<'_>, inner: Html, _options: &RenderOptions) -> Html {
        let mut html = Html::from_static(self.open);
        html.push_html(&inner);
        html.push_static(self.close);
        html
    }

    fn render_text(&self, _node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
        inner
    }
}

pub const BOLD: Wrapper = Wrapper::new(
    TagDefinition::new("b", TagFlags::inline()).with_aliases(&["bold", "strong"]),
    "<strong>",
    "</strong>",
);

pub const ITALIC: Wrapper = Wrapper::new(
    TagDefinition::new("i", TagFlags::inline()).with_aliases(&["italic", "em"]),
    "<em>",
    "</em>",
);

pub const UNDERLINE: Wrapper = Wrapper::new(
    TagDefinition::new("u", TagFlags::inline()).with_aliases(&["underline", "ins"]),
    "<ins>",
    "</ins>",
);

pub const STRIKE: Wrapper = Wrapper::new(
    TagDefinition::new("s", TagFlags::inline()).with_aliases(&["strike", "del"]),
    "<del>",
    "</del>",
);

pub const SUBSCRIPT: Wrapper =
    Wrapper::new(TagDefinition::new("sub", TagFlags::inline()), "<sub>", "</sub>");

pub const SUPERSCRIPT: Wrapper =
    Wrapper::new(TagDefinition::new("sup", TagFlags::inline()), "<sup>", "</sup>");

/// `[noparse]` keeps its content as literal text.
#[derive(Debug)]
pub struct NoParse;

impl Tag for NoParse {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition = TagDefinition::new("noparse", TagFlags::inline().verbatim());
        &DEFINITION
    }

    fn render_html(&self, node: NodeRef<'_>, _inner: Html, _options: &RenderOptions) -> Html {
        Html::escape(node.content())
    }

    fn render_text(&self, node: NodeRef<'_>, _inner: String, _options: &RenderOptions) -> String {
        node.content().to_string()
    }
}

/// `[br]`, a forced line break.
#[derive(Debug)]
pub struct LineBreak;

impl Tag for LineBreak {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition = TagDefinition::new("br", TagFlags::inline().standalone());
        &DEFINITION
    }

    fn render_html(&self, _node: NodeRef<'_>, _inner: Html, _options: &RenderOptions) -> Html {
        Html::from_static("<br>\n")
    }

    fn render_text(&self, _node: NodeRef<'_>, _inner: String, _options: &RenderOptions) -> String {
        "\n".to_string()
    }
}
