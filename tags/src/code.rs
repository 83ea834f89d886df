//! `[code]` blocks and their fixed-language variants (`[python]`, `[cpp]`...).
//!
//! Content is kept verbatim. Leading and trailing blank lines are dropped at
//! render time, interior lines are kept as written with tabs expanded.
//!
//! Attributes:
//!
//! - `language` (or `[code=lang]`): lexer name, `text` when absent or unknown
//! - `hl_lines`: comma separated line numbers to emphasize
//! - `linenostart`: number of the first line, `1` by default
//! - `filename`, `src`: caption text and source link
//! - `id`: figure identifier, also used as line anchor prefix
use std::sync::Arc;

use tagmark_core::{Html, RenderOptions, UrlError, UrlPolicy, sanitize_url, slugify, unescape_html};
use tagmark_parser::{NodeRef, Tag, TagDefinition, TagFlags, ValidationContext, ValidationError};

use crate::highlight::{HighlightOptions, Highlighter, PlainHighlighter};

const FLAGS: TagFlags = TagFlags::block().verbatim().swallow_trailing_newline();
const DEFAULT_LANGUAGE: &str = "text";
const TAB: &str = "    ";

const LANGUAGE: &str = "language";
const HL_LINES: &str = "hl_lines";
const LINENOSTART: &str = "linenostart";
const FILENAME: &str = "filename";
const SRC: &str = "src";
const ID: &str = "id";

/// Languages that get a tag of their own.
pub const FIXED_LANGUAGES: &[&str] = &["python", "cpp", "java", "html", "php"];

#[derive(Debug)]
pub struct CodeBlock {
    definition: TagDefinition,
    fixed_language: Option<&'static str>,
    highlighter: Arc<dyn Highlighter>,
}

impl CodeBlock {
    /// `[code]`, language picked by attribute.
    #[must_use]
    pub fn new(highlighter: Arc<dyn Highlighter>) -> Self {
        Self {
            definition: TagDefinition::new("code", FLAGS),
            fixed_language: None,
            highlighter,
        }
    }

    /// A tag named after `language` that always highlights as `language`.
    #[must_use]
    pub fn fixed(language: &'static str, highlighter: Arc<dyn Highlighter>) -> Self {
        Self {
            definition: TagDefinition::new(language, FLAGS),
            fixed_language: Some(language),
            highlighter,
        }
    }

    fn language(&self, node: NodeRef<'_>) -> Option<String> {
        if let Some(language) = self.fixed_language {
            return Some(language.to_string());
        }
        node.attribute_or_name(LANGUAGE)
            .map(|language| unescape_html(language.trim()))
            .filter(|language| !language.is_empty())
    }

    fn lexer(&self, node: NodeRef<'_>) -> String {
        match self.language(node) {
            Some(language) if self.highlighter.supports_language(&language) => language,
            Some(language) => {
                tracing::warn!(%language, "unknown language, highlighting as plain text");
                DEFAULT_LANGUAGE.to_string()
            }
            None => DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Split a `hl_lines` value into accepted line numbers and one error per
/// rejected token.
fn parse_highlight_lines(value: &str) -> (Vec<usize>, Vec<ValidationError>) {
    let mut lines = Vec::new();
    let mut errors = Vec::new();
    for token in value.split(',').map(str::trim).filter(|token| !token.is_empty()) {
        match token.parse::<i64>() {
            Ok(number) => match usize::try_from(number) {
                Ok(number) if number > 0 => lines.push(number),
                Ok(_) | Err(_) => errors.push(ValidationError::NotPositive {
                    attribute: HL_LINES,
                    value: token.to_string(),
                }),
            },
            Err(_) => errors.push(ValidationError::NotANumber {
                attribute: HL_LINES,
                value: token.to_string(),
            }),
        }
    }
    (lines, errors)
}

fn highlight_lines(node: NodeRef<'_>) -> Vec<usize> {
    node.attribute(HL_LINES)
        .map(|value| parse_highlight_lines(value).0)
        .unwrap_or_default()
}

fn start_line(node: NodeRef<'_>) -> Result<usize, ValidationError> {
    let Some(value) = node.attribute(LINENOSTART).map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(1);
    };
    match value.parse::<i64>() {
        Ok(number) => usize::try_from(number).map_err(|_| ValidationError::NotPositive {
            attribute: LINENOSTART,
            value: value.to_string(),
        }),
        Err(_) => Err(ValidationError::NotANumber {
            attribute: LINENOSTART,
            value: value.to_string(),
        }),
    }
}

fn filename(node: NodeRef<'_>) -> Option<String> {
    node.attribute(FILENAME)
        .map(|name| unescape_html(name.trim()))
        .filter(|name| !name.is_empty())
}

fn source_link(node: NodeRef<'_>) -> Option<Result<String, UrlError>> {
    let src = node.attribute(SRC).map(str::trim).filter(|src| !src.is_empty())?;
    let policy = UrlPolicy::default().with_base(node.document().relative_url_base());
    Some(sanitize_url(src, &policy))
}

fn figure_id(node: NodeRef<'_>) -> Option<String> {
    node.attribute(ID)
        .map(slugify)
        .filter(|id| !id.is_empty())
}

/// Content lines without leading and trailing blank lines, tabs expanded.
fn cleaned_lines(content: &str) -> Vec<String> {
    let lines: Vec<&str> = content.lines().collect();
    let first = lines.iter().position(|line| !line.trim().is_empty());
    let last = lines.iter().rposition(|line| !line.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines
            .get(first..=last)
            .unwrap_or_default()
            .iter()
            .map(|line| line.replace('\t', TAB))
            .collect(),
        _ => Vec::new(),
    }
}

impl Tag for CodeBlock {
    fn definition(&self) -> &TagDefinition {
        &self.definition
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) {
        let node = ctx.node();
        if let Some(value) = node.attribute(HL_LINES) {
            for error in parse_highlight_lines(value).1 {
                ctx.report(error);
            }
        }
        if let Err(error) = start_line(node) {
            ctx.report(error);
        }
        if let Some(language) = self.language(node) {
            if !self.highlighter.supports_language(&language) {
                ctx.report(ValidationError::UnknownLanguage(language));
            }
        }
        if let Some(Err(error)) = source_link(node) {
            ctx.report(error.into());
        }
    }

    fn render_html(&self, node: NodeRef<'_>, _inner: Html, options: &RenderOptions) -> Html {
        let source = cleaned_lines(node.content()).join("\n");
        let language = self.lexer(node);
        let highlight_lines = highlight_lines(node);
        let figure_id = figure_id(node);
        let highlight_options = HighlightOptions {
            line_numbers: options.line_numbers(),
            start_line: start_line(node).unwrap_or(1),
            highlight_lines: &highlight_lines,
            anchor: figure_id.as_deref(),
        };
        let code = self
            .highlighter
            .highlight(&source, &language, &highlight_options)
            .unwrap_or_else(|error| {
                tracing::warn!(%error, %language, "highlighter failed, rendering plain code");
                PlainHighlighter::render(&source, &highlight_options)
            });

        let mut table = Html::from_static("<div class=\"codetable\">\n    ");
        table.push_html(&code);
        table.push_static("\n</div>");

        let filename = filename(node);
        let src = source_link(node).and_then(Result::ok);
        if filename.is_some() || src.is_some() {
            let mut caption = Html::from_static("Source : ");
            caption.push_text(filename.as_deref().or(src.as_deref()).unwrap_or_default());
            if let Some(src) = &src {
                let mut link = Html::from_static("<a");
                link.push_attr("href", src);
                if options.force_rel_nofollow() {
                    link.push_attr("rel", "nofollow");
                }
                link.push_attr("target", "_blank");
                link.push_static(">");
                link.push_html(&caption);
                link.push_static(" <i class=\"fa fa-link\" aria-hidden=\"true\"></i></a>");
                caption = link;
            }

            let mut html = Html::from_static("<div class=\"panel panel-default\"");
            if let Some(id) = &figure_id {
                html.push_attr("id", id);
            }
            html.push_static(">\n    <div class=\"panel-body\">\n        ");
            html.push_html(&table);
            html.push_static("\n    </div>\n    <div class=\"panel-footer\">\n        ");
            html.push_html(&caption);
            html.push_static("\n    </div>\n</div>");
            return html;
        }

        match figure_id {
            Some(id) => {
                let mut html = Html::from_static("<a");
                html.push_attr("id", &id);
                html.push_static("></a>\n");
                html.push_html(&table);
                html
            }
            None => table,
        }
    }

    fn render_text(&self, node: NodeRef<'_>, _inner: String, _options: &RenderOptions) -> String {
        let start = start_line(node).unwrap_or(1);
        let highlight_lines = highlight_lines(node);
        let mut lines: Vec<String> = cleaned_lines(node.content())
            .into_iter()
            .enumerate()
            .map(|(index, line)| {
                let number = start + index;
                let prefix = if highlight_lines.contains(&number) {
                    format!("{number}>")
                } else {
                    format!("{number}.")
                };
                format!("{prefix:<4} {line}")
            })
            .collect();

        let figure = figure_id(node)
            .map(|id| format!(" [#{id}]"))
            .unwrap_or_default();
        let src = source_link(node).and_then(Result::ok);
        match (filename(node), src) {
            (Some(filename), Some(src)) => lines.push(format!("Source : {filename} ({src}){figure}")),
            (Some(filename), None) => lines.push(format!("Source : {filename}{figure}")),
            (None, Some(src)) => lines.push(format!("Source : {src}{figure}")),
            (None, None) => {}
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{render_html, render_text, sanitized};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_highlight_lines_keep_valid_numbers() {
        let (lines, errors) = parse_highlight_lines("2, -1,x,,4");
        assert_eq!(lines, vec![2, 4]);
        assert_eq!(
            errors,
            vec![
                ValidationError::NotPositive {
                    attribute: HL_LINES,
                    value: "-1".to_string(),
                },
                ValidationError::NotANumber {
                    attribute: HL_LINES,
                    value: "x".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_cleaned_lines_trim_blank_lines_only() {
        assert_eq!(
            cleaned_lines("\n  \nfirst\n\n    indented\n\t\n\n"),
            vec!["first", "", "    indented"]
        );
        assert!(cleaned_lines(" \n\n").is_empty());
    }

    #[test]
    fn test_invalid_highlight_lines_still_highlight_valid_ones() {
        let (document, diagnostics) =
            sanitized("[code hl_lines=\"2,-1,x\"]\nfirst\nsecond\nthird\n[/code]");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            render_text(&document),
            "1.   first\n2>   second\n3.   third\n"
        );
        let html = render_html(&document);
        assert!(html.contains("<span class=\"hll\">second\n</span>"));
        assert!(!html.contains("<span class=\"hll\">first"));
    }

    #[test]
    fn test_start_line_and_tabs() {
        let (document, diagnostics) = sanitized("[code linenostart=9]a\n\tb[/code]");
        assert!(diagnostics.is_empty());
        assert_eq!(render_text(&document), "9.   a\n10.      b\n");
    }

    #[rstest::rstest]
    #[case("[code linenostart=-2]x[/code]", ValidationError::NotPositive { attribute: LINENOSTART, value: "-2".to_string() })]
    #[case("[code linenostart=two]x[/code]", ValidationError::NotANumber { attribute: LINENOSTART, value: "two".to_string() })]
    #[case("[code=klingon]x[/code]", ValidationError::UnknownLanguage("klingon".to_string()))]
    #[case("[code src=\"javascript:alert(1)\"]x[/code]", ValidationError::RejectedUrl(UrlError::DisallowedScheme("javascript".to_string())))]
    fn test_validation_errors(#[case] input: &str, #[case] expected: ValidationError) {
        let (_, diagnostics) = sanitized(input);
        let errors: Vec<_> = diagnostics.into_iter().map(|d| d.error).collect();
        assert_eq!(errors, vec![expected]);
    }

    #[test]
    fn test_unknown_language_renders_plain() {
        let (document, _) = sanitized("[code language=klingon]<x>[/code]");
        assert_eq!(
            render_html(&document),
            concat!(
                "<div class=\"codetable\">\n    ",
                r#"<table class="highlighttable"><tr><td class="linenos"><div class="linenodiv"><pre>1</pre></div></td>"#,
                r#"<td class="code"><div class="highlight"><pre>&lt;x&gt;"#,
                "\n</pre></div></td></tr></table>\n</div>",
            )
        );
    }

    #[test]
    fn test_caption_with_source_link() {
        let (document, diagnostics) = sanitized(
            "[python filename=\"a&amp;b.py\" src=\"https://example.com/a.py\" id=\"Fig 1\"]x = 1[/python]",
        );
        assert!(diagnostics.is_empty());
        let html = render_html(&document);
        assert!(html.starts_with("<div class=\"panel panel-default\" id=\"fig-1\">"));
        assert!(html.contains(
            "<a href=\"https://example.com/a.py\" rel=\"nofollow\" target=\"_blank\">Source : a&amp;b.py <i class=\"fa fa-link\" aria-hidden=\"true\"></i></a>"
        ));
        assert!(html.contains("<a id=\"fig-1-1\"></a>x = 1"));
        assert_eq!(
            render_text(&document),
            "1.   x = 1\nSource : a&b.py (https://example.com/a.py) [#fig-1]\n"
        );
    }

    #[test]
    fn test_figure_id_without_caption() {
        let (document, _) = sanitized("[code id=intro]x[/code]");
        assert!(render_html(&document).starts_with("<a id=\"intro\"></a>\n<div class=\"codetable\">"));
        assert_eq!(render_text(&document), "1.   x\n");
    }

    #[test]
    fn test_content_is_verbatim() {
        let (document, _) = sanitized("[code][b]not bold[/b][/code]");
        assert!(render_html(&document).contains("[b]not bold[/b]"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_highlighter_failure_falls_back_to_plain() {
        #[derive(Debug)]
        struct Broken;

        impl Highlighter for Broken {
            fn supports_language(&self, _language: &str) -> bool {
                true
            }

            fn highlight(
                &self,
                _source: &str,
                _language: &str,
                _options: &HighlightOptions<'_>,
            ) -> Result<Html, crate::highlight::HighlightError> {
                Err(crate::highlight::HighlightError::Backend("boom".to_string()))
            }
        }

        let registry =
            tagmark_parser::Registry::with_tags([Arc::new(CodeBlock::new(Arc::new(Broken))) as Arc<dyn Tag>])
                .unwrap();
        let document =
            tagmark_parser::parse("[code]a<b[/code]", &registry, &tagmark_parser::Options::default())
                .unwrap();
        let html = render_html(&document);
        assert!(html.contains("a&lt;b"));
        assert!(logs_contain("highlighter failed"));
    }
}
