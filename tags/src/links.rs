//! Hyperlinks: `[url]`, `[email]`, `[anchor]` and `[goto]`.
use tagmark_core::{Html, RenderOptions, UrlError, UrlPolicy, sanitize_url, slugify, unescape_html};
use tagmark_parser::{NodeRef, Tag, TagDefinition, TagFlags, ValidationContext, ValidationError};

const MAILTO: UrlPolicy<'static> = UrlPolicy {
    allowed_schemes: &["mailto"],
    default_scheme: "mailto",
    base: None,
    force_remove_scheme: true,
    fix_non_local_urls: false,
};

/// A link target, and whether it was written as the link text.
struct Target {
    url: Result<String, UrlError>,
    in_content: bool,
}

impl Target {
    fn of(node: NodeRef<'_>, attribute: Option<&str>, policy: &UrlPolicy<'_>) -> Self {
        match attribute {
            Some(value) => Self {
                url: sanitize_url(value, policy),
                in_content: false,
            },
            None => Self {
                url: sanitize_url(&node.text_content(), policy),
                in_content: true,
            },
        }
    }
}

/// `[url=target]text[/url]`, `[url href=target]text[/url]` or `[url]target[/url]`.
///
/// `title` sets the link title, a bare `nofollow` flag adds `rel="nofollow"`.
#[derive(Debug)]
pub struct Link;

impl Link {
    fn target(node: NodeRef<'_>) -> Target {
        let policy = UrlPolicy::default().with_base(node.document().relative_url_base());
        let attribute = node
            .attribute_or_name("href")
            .filter(|value| !value.trim().is_empty());
        Target::of(node, attribute, &policy)
    }
}

impl Tag for Link {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition =
            TagDefinition::new("url", TagFlags::inline()).with_aliases(&["link"]);
        &DEFINITION
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) {
        if let Err(error) = Self::target(ctx.node()).url {
            ctx.report(error.into());
        }
    }

    fn render_html(&self, node: NodeRef<'_>, inner: Html, options: &RenderOptions) -> Html {
        let Target { url, in_content } = Self::target(node);
        let Ok(url) = url else {
            return inner;
        };
        let mut html = Html::from_static("<a");
        html.push_attr("href", &url);
        if options.force_rel_nofollow() || node.attributes().contains_key("nofollow") {
            html.push_attr("rel", "nofollow");
        }
        let title = node.attribute("title").map(unescape_html).unwrap_or_default();
        if !title.is_empty() {
            html.push_attr("title", &title);
        }
        html.push_static(">");
        if in_content {
            html.push_text(&url);
        } else {
            html.push_html(&inner);
        }
        html.push_static("</a>");
        html
    }

    fn render_text(&self, node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
        match Self::target(node) {
            Target { url: Ok(url), in_content: true } => url,
            Target { url: Ok(url), in_content: false } => format!("{inner} ({url})"),
            Target { url: Err(_), .. } => inner,
        }
    }
}

/// `[email]user@example.com[/email]` or `[email=user@example.com]text[/email]`.
#[derive(Debug)]
pub struct Email;

impl Email {
    fn target(node: NodeRef<'_>) -> Target {
        Target::of(node, node.attribute(node.name()), &MAILTO)
    }
}

impl Tag for Email {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition = TagDefinition::new("email", TagFlags::inline());
        &DEFINITION
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) {
        if let Err(error) = Self::target(ctx.node()).url {
            ctx.report(error.into());
        }
    }

    fn render_html(&self, node: NodeRef<'_>, inner: Html, options: &RenderOptions) -> Html {
        let Target { url, in_content } = Self::target(node);
        let Ok(address) = url else {
            return inner;
        };
        let mut html = Html::from_static("<a");
        html.push_attr("href", &format!("mailto:{address}"));
        if options.force_rel_nofollow() {
            html.push_attr("rel", "nofollow");
        }
        html.push_static(">");
        if in_content {
            html.push_text(&address);
        } else {
            html.push_html(&inner);
        }
        html.push_static("</a>");
        html
    }

    fn render_text(&self, node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
        match Self::target(node) {
            Target { url: Ok(address), in_content: true } => format!("<{address}>"),
            Target { url: Ok(address), in_content: false } => format!("{inner} (<{address}>)"),
            Target { url: Err(_), .. } => inner,
        }
    }
}

/// `[anchor]Section title[/anchor]`: a link target whose id is the slug of
/// its text. Ids are unique per document.
#[derive(Debug)]
pub struct Anchor;

fn anchor_id(node: NodeRef<'_>) -> String {
    slugify(&node.text_content())
}

impl Tag for Anchor {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition = TagDefinition::new("anchor", TagFlags::inline());
        &DEFINITION
    }

    fn pre_process(&self, ctx: &mut ValidationContext<'_>) {
        let id = anchor_id(ctx.node());
        if id.is_empty() {
            ctx.report(ValidationError::Missing("anchor id"));
        } else if !ctx.register_id(&id) {
            ctx.report(ValidationError::DuplicateId(id));
        }
    }

    fn render_html(&self, node: NodeRef<'_>, inner: Html, _options: &RenderOptions) -> Html {
        let id = anchor_id(node);
        if id.is_empty() {
            return inner;
        }
        let mut html = Html::from_static("<a");
        html.push_attr("id", &id);
        html.push_static("></a>");
        html
    }

    fn render_text(&self, node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
        let id = anchor_id(node);
        if id.is_empty() {
            inner
        } else {
            format!("[#{id}]")
        }
    }
}

/// `[goto=id]text[/goto]`: a link to an `[anchor]` of the same document.
#[derive(Debug)]
pub struct GoTo;

fn goto_target(node: NodeRef<'_>) -> String {
    node.attribute_or_name("id").map(slugify).unwrap_or_default()
}

impl Tag for GoTo {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition = TagDefinition::new("goto", TagFlags::inline());
        &DEFINITION
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) {
        let id = goto_target(ctx.node());
        if id.is_empty() {
            ctx.report(ValidationError::Missing("anchor id"));
        } else if !ctx.is_known_id(&id) {
            ctx.report(ValidationError::UnknownAnchor(id));
        }
    }

    fn render_html(&self, node: NodeRef<'_>, inner: Html, _options: &RenderOptions) -> Html {
        let id = goto_target(node);
        if id.is_empty() {
            return inner;
        }
        let mut html = Html::from_static("<a");
        html.push_attr("href", &format!("#{id}"));
        html.push_static(">");
        html.push_html(&inner);
        html.push_static("</a>");
        html
    }

    fn render_text(&self, node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
        let id = goto_target(node);
        if id.is_empty() {
            inner
        } else {
            format!("{inner} (#{id})")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{render_html, render_text, sanitized};
    use pretty_assertions::assert_eq;
    use tagmark_parser::{Options, parse};
    use url::Url;

    #[rstest::rstest]
    #[case(
        "[url=https://example.com/]site[/url]",
        r#"<a href="https://example.com/" rel="nofollow">site</a>"#,
        "site (https://example.com/)"
    )]
    #[case(
        "[link]www.example.com[/link]",
        r#"<a href="http://www.example.com/" rel="nofollow">http://www.example.com/</a>"#,
        "http://www.example.com/"
    )]
    #[case(
        "[url href=\"https://example.com/?a=1&b=2\" title=\"R&amp;D\"][b]x[/b][/url]",
        r#"<a href="https://example.com/?a=1&amp;b=2" rel="nofollow" title="R&amp;D"><strong>x</strong></a>"#,
        "x (https://example.com/?a=1&b=2)"
    )]
    #[case("[url=javascript:alert(1)]click[/url]", "click", "click")]
    fn test_url(#[case] input: &str, #[case] html: &str, #[case] text: &str) {
        let (document, _) = sanitized(input);
        assert_eq!(render_html(&document), html);
        assert_eq!(render_text(&document), text);
    }

    #[test]
    fn test_url_rel_nofollow() {
        let (document, _) = sanitized("[url=https://a.example/ nofollow]a[/url][url=https://b.example/]b[/url]");
        let options = RenderOptions::builder().force_rel_nofollow(false).build();
        assert_eq!(
            tagmark_converters_core::render::<tagmark_converters_core::HtmlFormat>(&document, &options),
            r#"<a href="https://a.example/" rel="nofollow">a</a><a href="https://b.example/">b</a>"#
        );
    }

    #[test]
    fn test_url_errors() {
        let (_, diagnostics) = sanitized("[url]ftp://example.com/[/url][url][/url]");
        let errors: Vec<_> = diagnostics.into_iter().map(|d| d.error).collect();
        assert_eq!(
            errors,
            vec![
                ValidationError::RejectedUrl(UrlError::DisallowedScheme("ftp".to_string())),
                ValidationError::RejectedUrl(UrlError::Empty),
            ]
        );
    }

    #[test]
    fn test_url_relative_base() {
        let registry = crate::test_utils::registry();
        let options = Options::builder()
            .with_relative_url_base(Url::parse("https://example.com/docs/").unwrap())
            .build();
        let mut document = parse("[url=page.html]p[/url]", &registry, &options).unwrap();
        assert!(document.sanitize().is_empty());
        assert_eq!(
            render_html(&document),
            r#"<a href="https://example.com/docs/page.html" rel="nofollow">p</a>"#
        );
    }

    #[rstest::rstest]
    #[case(
        "[email]john@example.com[/email]",
        r#"<a href="mailto:john@example.com" rel="nofollow">john@example.com</a>"#,
        "<john@example.com>"
    )]
    #[case(
        "[email=\"mailto:john@example.com\"]John[/email]",
        r#"<a href="mailto:john@example.com" rel="nofollow">John</a>"#,
        "John (<john@example.com>)"
    )]
    fn test_email(#[case] input: &str, #[case] html: &str, #[case] text: &str) {
        let (document, diagnostics) = sanitized(input);
        assert!(diagnostics.is_empty());
        assert_eq!(render_html(&document), html);
        assert_eq!(render_text(&document), text);
    }

    #[test]
    fn test_email_rejects_other_schemes() {
        let (document, diagnostics) = sanitized("[email=http://example.com]x[/email]");
        assert_eq!(
            diagnostics[0].error,
            ValidationError::RejectedUrl(UrlError::DisallowedScheme("http".to_string()))
        );
        assert_eq!(render_html(&document), "x");
    }

    #[test]
    fn test_anchor_and_goto() {
        let (document, diagnostics) =
            sanitized("[goto=intro]up[/goto] [anchor]Intro[/anchor] [goto id=nowhere]x[/goto]");
        assert_eq!(
            diagnostics.into_iter().map(|d| d.error).collect::<Vec<_>>(),
            vec![ValidationError::UnknownAnchor("nowhere".to_string())]
        );
        assert_eq!(
            render_html(&document),
            r##"<a href="#intro">up</a> <a id="intro"></a> <a href="#nowhere">x</a>"##
        );
        assert_eq!(render_text(&document), "up (#intro) [#intro] x (#nowhere)");
    }

    #[test]
    fn test_anchor_errors() {
        let (_, diagnostics) = sanitized("[anchor]A b[/anchor][anchor]a  B[/anchor][anchor]!![/anchor]");
        assert_eq!(
            diagnostics.into_iter().map(|d| d.error).collect::<Vec<_>>(),
            vec![
                ValidationError::DuplicateId("a-b".to_string()),
                ValidationError::Missing("anchor id"),
            ]
        );
    }

    #[test]
    fn test_goto_without_id() {
        let (document, diagnostics) = sanitized("[goto]x[/goto]");
        assert_eq!(diagnostics[0].error, ValidationError::Missing("anchor id"));
        assert_eq!(render_html(&document), "x");
    }
}
