//! Block structure: quotes, lists, headings, rules and collapsible sections.
use tagmark_core::{Html, RenderOptions, unescape_html};
use tagmark_parser::{NodeRef, Tag, TagDefinition, TagFlags};

use crate::formatting::Wrapper;

/// `[quote]` or `[quote=author]`. Content is split into paragraphs.
#[derive(Debug)]
pub struct Quote;

fn author(node: NodeRef<'_>) -> String {
    node.attribute_or_name("author")
        .map(|author| unescape_html(author.trim()))
        .unwrap_or_default()
}

impl Tag for Quote {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition = TagDefinition::new(
            "quote",
            TagFlags::block()
                .make_paragraphs_here()
                .swallow_trailing_newline(),
        );
        &DEFINITION
    }

    fn render_html(&self, node: NodeRef<'_>, inner: Html, _options: &RenderOptions) -> Html {
        let mut html = Html::from_static("<blockquote>");
        html.push_html(&inner);
        let author = author(node);
        if !author.is_empty() {
            html.push_static("<footer><cite>");
            html.push_text(&author);
            html.push_static("</cite></footer>");
        }
        html.push_static("</blockquote>\n");
        html
    }

    fn render_text(&self, node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
        let mut lines: Vec<String> = inner
            .trim_matches('\n')
            .lines()
            .map(|line| format!("> {line}").trim_end().to_string())
            .collect();
        let author = author(node);
        if !author.is_empty() {
            lines.push(format!("> -- {author}"));
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// `[list]`, or `[list=1]` for a numbered list.
#[derive(Debug)]
pub struct List;

fn is_ordered(list: NodeRef<'_>) -> bool {
    list.attribute_or_name("type")
        .is_some_and(|kind| matches!(kind.trim(), "1" | "ordered" | "ol"))
}

impl Tag for List {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition =
            TagDefinition::new("list", TagFlags::block().make_paragraphs_here());
        &DEFINITION
    }

    fn render_html(&self, node: NodeRef<'_>, inner: Html, _options: &RenderOptions) -> Html {
        let (open, close) = if is_ordered(node) {
            ("<ol>", "</ol>\n")
        } else {
            ("<ul>", "</ul>\n")
        };
        let mut html = Html::from_static(open);
        html.push_html(&inner);
        html.push_static(close);
        html
    }

    fn render_text(&self, _node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
        inner
    }
}

/// `[*]` list item. The next item or the end of the list closes it.
#[derive(Debug)]
pub struct ListItem;

impl Tag for ListItem {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition = TagDefinition::new(
            "*",
            TagFlags::block()
                .same_tag_closes()
                .swallow_trailing_newline(),
        )
        .with_aliases(&["li"]);
        &DEFINITION
    }

    fn render_html(&self, _node: NodeRef<'_>, inner: Html, _options: &RenderOptions) -> Html {
        let mut html = Html::from_static("<li>");
        html.push_html(&inner);
        html.push_static("</li>\n");
        html
    }

    fn render_text(&self, node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
        let bullet = if node.parent().is_some_and(is_ordered) {
            format!("{}.", node.ordinal() + 1)
        } else {
            "-".to_string()
        };
        format!("{bullet} {}\n", inner.trim())
    }
}

macro_rules! heading {
    ($name:literal) => {
        Wrapper::new(
            TagDefinition::new($name, TagFlags::block().newline_closes()),
            concat!("<", $name, ">"),
            concat!("</", $name, ">"),
        )
    };
}

/// `[h1]` to `[h6]`. A heading ends at the end of its line.
pub const HEADINGS: [Wrapper; 6] = [
    heading!("h1"),
    heading!("h2"),
    heading!("h3"),
    heading!("h4"),
    heading!("h5"),
    heading!("h6"),
];

/// `[hr]`
#[derive(Debug)]
pub struct HorizontalRule;

impl Tag for HorizontalRule {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition = TagDefinition::new("hr", TagFlags::block().standalone());
        &DEFINITION
    }

    fn render_html(&self, _node: NodeRef<'_>, _inner: Html, _options: &RenderOptions) -> Html {
        Html::from_static("<hr>\n")
    }

    fn render_text(&self, _node: NodeRef<'_>, _inner: String, _options: &RenderOptions) -> String {
        "----------\n".to_string()
    }
}

pub const COLLAPSE: Wrapper = Wrapper::new(
    TagDefinition::new("collapse", TagFlags::block()),
    "<div class=\"collapse\">",
    "</div>\n",
);

pub const COLLAPSE2: Wrapper = Wrapper::new(
    TagDefinition::new("collapse2", TagFlags::block()),
    "<div class=\"collapse2\">",
    "</div>\n",
);

#[cfg(test)]
mod tests {
    use crate::test_utils::{render_canonical, render_html, render_text, sanitized};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quote_with_author_and_paragraphs() {
        let (document, _) = sanitized("[quote=Ada]first\n\nsecond[/quote]");
        assert_eq!(
            render_html(&document),
            "<blockquote><p>first</p>\n\n\n<p>second</p>\n<footer><cite>Ada</cite></footer></blockquote>\n"
        );
        assert_eq!(render_text(&document), "> first\n>\n> second\n> -- Ada\n");
    }

    #[test]
    fn test_unordered_list() {
        let input = "[list]\n[*]one\n[*]two [b]bold[/b]\n[/list]";
        let (document, diagnostics) = sanitized(input);
        assert!(diagnostics.is_empty());
        assert!(document.issues().is_empty());
        assert_eq!(
            render_html(&document),
            "<ul>\n<li>one</li>\n<li>two <strong>bold</strong></li>\n</ul>\n"
        );
        assert_eq!(render_text(&document), "\n- one\n- two bold\n");
        assert_eq!(render_canonical(&document), "[list]\n[*]one[/*][*]two [b]bold[/b][/*][/list]");
    }

    #[test]
    fn test_ordered_list_text() {
        let (document, _) = sanitized("[list=1][li]a[li]b[/list]");
        assert_eq!(render_html(&document), "<ol><li>a</li>\n<li>b</li>\n</ol>\n");
        assert_eq!(render_text(&document), "1. a\n2. b\n");
    }

    #[test]
    fn test_long_ordered_list_numbers_every_item() {
        let count = 20_000;
        let input = format!("[list=1]{}[/list]", "[*]x".repeat(count));
        let (document, diagnostics) = sanitized(&input);
        assert!(diagnostics.is_empty());
        let text = render_text(&document);
        assert_eq!(text.lines().count(), count);
        assert!(text.starts_with("1. x\n2. x\n3. x\n"));
        assert!(text.ends_with(&format!("{}. x\n{count}. x\n", count - 1)));
    }

    #[test]
    fn test_ordered_list_skips_text_between_items() {
        let (document, _) = sanitized("[list=1]intro [*]a[*]b[/list]");
        assert_eq!(render_text(&document), "intro 1. a\n2. b\n");
    }

    #[test]
    fn test_heading_ends_at_line_break() {
        let (document, _) = sanitized("[h2]Title\nbody");
        assert!(document.issues().is_empty());
        assert_eq!(render_html(&document), "<h2>Title</h2>\nbody");
        assert_eq!(render_text(&document), "Title\nbody");
    }

    #[test]
    fn test_line_break_after_block_is_not_a_br() {
        let (document, _) = sanitized("[collapse]a[/collapse]\nb\nc[hr]\nd");
        assert_eq!(
            render_html(&document),
            "<div class=\"collapse\">a</div>\n\nb<br>\nc<hr>\n\nd"
        );
    }

    #[test]
    fn test_rule_and_collapse() {
        let (document, _) = sanitized("[collapse]a[hr]b[/collapse][collapse2]c[/collapse2]");
        assert_eq!(
            render_html(&document),
            "<div class=\"collapse\">a<hr>\nb</div>\n<div class=\"collapse2\">c</div>\n"
        );
        assert_eq!(render_text(&document), "a----------\nbc");
    }
}
