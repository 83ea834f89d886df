use std::sync::Arc;

use tagmark_core::{Html, RenderOptions};

use crate::{Document, NodeKind, NodeRef, Registry, Tag, TagDefinition, TagFlags};

/// A tag that renders as `<name>inner</name>`.
#[derive(Debug)]
pub(crate) struct TestTag(pub(crate) TagDefinition);

impl Tag for TestTag {
    fn definition(&self) -> &TagDefinition {
        &self.0
    }

    fn render_html(&self, node: NodeRef<'_>, inner: Html, _options: &RenderOptions) -> Html {
        let name = node.definition().name;
        let mut html = Html::from_trusted(format!("<{name}>"));
        if node.flags().parse_embedded {
            html.push_html(&inner);
        } else {
            html.push_text(node.content());
        }
        if !node.flags().standalone {
            html.push_html(&Html::from_trusted(format!("</{name}>")));
        }
        html
    }

    fn render_text(&self, node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
        if node.flags().parse_embedded {
            inner
        } else {
            node.content().to_string()
        }
    }
}

pub(crate) fn definitions() -> Vec<TagDefinition> {
    vec![
        TagDefinition::new("b", TagFlags::inline()).with_aliases(&["bold", "strong"]),
        TagDefinition::new("i", TagFlags::inline()).with_aliases(&["em"]),
        TagDefinition::new("url", TagFlags::inline()),
        TagDefinition::new(
            "quote",
            TagFlags::block()
                .swallow_trailing_newline()
                .make_paragraphs_here(),
        ),
        TagDefinition::new("list", TagFlags::block()),
        TagDefinition::new("*", TagFlags::block().same_tag_closes()).with_aliases(&["li"]),
        TagDefinition::new("h1", TagFlags::block().newline_closes()),
        TagDefinition::new(
            "code",
            TagFlags::block().verbatim().swallow_trailing_newline(),
        ),
        TagDefinition::new("noparse", TagFlags::inline().verbatim()),
        TagDefinition::new("hr", TagFlags::block().standalone()),
        TagDefinition::new("br", TagFlags::inline().standalone()),
    ]
}

/// Registry covering every flag combination the parser distinguishes.
pub(crate) fn registry() -> Registry {
    Registry::with_tags(
        definitions()
            .into_iter()
            .map(|definition| Arc::new(TestTag(definition)) as Arc<dyn Tag>),
    )
    .unwrap_or_default()
}

/// One-line summary of the root's children, e.g. `b(text("x")) newline`.
pub(crate) fn summarize(document: &Document) -> String {
    document
        .root()
        .children()
        .map(summarize_node)
        .collect::<Vec<_>>()
        .join(" ")
}

fn summarize_node(node: NodeRef<'_>) -> String {
    match node.kind() {
        NodeKind::Text => format!("text({:?})", node.content()),
        NodeKind::Newline => "newline".to_string(),
        NodeKind::Root | NodeKind::Element | NodeKind::Paragraph => {
            let name = if node.kind() == NodeKind::Paragraph {
                "paragraph"
            } else {
                node.name()
            };
            let children = node.children().map(summarize_node).collect::<Vec<_>>();
            if children.is_empty() {
                name.to_string()
            } else {
                format!("{name}({})", children.join(" "))
            }
        }
    }
}
