use tagmark_core::{Html, RenderOptions, unescape_html};
use tagmark_parser::{NodeRef, Tag, TagDefinition, TagFlags};

/// `[acronym title="..."]ASAP[/acronym]` or `[acronym=...]`.
#[derive(Debug)]
pub struct Acronym;

fn title(node: NodeRef<'_>) -> String {
    node.attribute_or_name("title")
        .map(|title| unescape_html(title.trim()))
        .unwrap_or_default()
}

impl Tag for Acronym {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition =
            TagDefinition::new("acronym", TagFlags::inline()).with_aliases(&["abbr"]);
        &DEFINITION
    }

    fn render_html(&self, node: NodeRef<'_>, inner: Html, _options: &RenderOptions) -> Html {
        let title = title(node);
        if title.is_empty() {
            return inner;
        }
        let mut html = Html::from_static("<abbr");
        html.push_attr("title", &title);
        html.push_static(">");
        html.push_html(&inner);
        html.push_static("</abbr>");
        html
    }

    fn render_text(&self, node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
        let title = title(node);
        if title.is_empty() {
            inner
        } else {
            format!("{inner} ({title})")
        }
    }
}
