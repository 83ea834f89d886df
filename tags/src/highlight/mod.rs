//! Syntax highlighting for code blocks.
//!
//! A [`Highlighter`] turns source code into an [`Html`] fragment laid out as
//! a line-numbered table. [`PlainHighlighter`] is always available and only
//! escapes; `SyntectHighlighter` colors tokens and needs the `highlighting`
//! feature.
use std::fmt;

use tagmark_core::Html;

#[cfg(feature = "highlighting")]
mod syntax;

#[cfg(feature = "highlighting")]
pub use syntax::SyntectHighlighter;

/// Why a highlighter could not render a block.
#[non_exhaustive]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("highlighter failed: {0}")]
    Backend(String),
}

/// How a block is laid out.
#[derive(Debug, Clone, Copy)]
pub struct HighlightOptions<'a> {
    /// Render a line number column.
    pub line_numbers: bool,
    /// Number of the first line.
    pub start_line: usize,
    /// Line numbers, as displayed, to emphasize.
    pub highlight_lines: &'a [usize],
    /// Prefix of per-line anchors (`{anchor}-{number}`).
    pub anchor: Option<&'a str>,
}

impl Default for HighlightOptions<'_> {
    fn default() -> Self {
        Self {
            line_numbers: true,
            start_line: 1,
            highlight_lines: &[],
            anchor: None,
        }
    }
}

/// A syntax highlighting strategy.
pub trait Highlighter: fmt::Debug + Send + Sync {
    /// Whether `language` names a lexer this highlighter knows.
    fn supports_language(&self, language: &str) -> bool;

    /// Render `source` as an HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns [`HighlightError`] when the language is not supported or the
    /// underlying highlighter fails.
    fn highlight(
        &self,
        source: &str,
        language: &str,
        options: &HighlightOptions<'_>,
    ) -> Result<Html, HighlightError>;
}

const PLAIN_LANGUAGES: &[&str] = &[
    "text", "plain", "bash", "sh", "shell", "c", "cpp", "c++", "csharp", "cs", "css", "diff",
    "go", "html", "xml", "java", "javascript", "js", "json", "kotlin", "lua", "markdown", "md",
    "php", "python", "py", "ruby", "rb", "rust", "rs", "sql", "toml", "typescript", "ts", "yaml",
    "yml",
];

/// Escapes source lines without coloring them.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl PlainHighlighter {
    /// Lay out `source` without any token coloring. Never fails.
    #[must_use]
    pub fn render(source: &str, options: &HighlightOptions<'_>) -> Html {
        layout(source.lines().map(Html::escape), options)
    }
}

impl Highlighter for PlainHighlighter {
    fn supports_language(&self, language: &str) -> bool {
        PLAIN_LANGUAGES
            .iter()
            .any(|known| known.eq_ignore_ascii_case(language))
    }

    fn highlight(
        &self,
        source: &str,
        language: &str,
        options: &HighlightOptions<'_>,
    ) -> Result<Html, HighlightError> {
        if !self.supports_language(language) {
            return Err(HighlightError::UnsupportedLanguage(language.to_string()));
        }
        Ok(Self::render(source, options))
    }
}

/// Build the line number column and the code column from rendered lines.
pub(crate) fn layout(lines: impl IntoIterator<Item = Html>, options: &HighlightOptions<'_>) -> Html {
    let mut numbers = Html::new();
    let mut code = Html::new();

    for (index, line) in lines.into_iter().enumerate() {
        let number = options.start_line + index;
        if index > 0 {
            numbers.push_static("\n");
        }
        if let Some(anchor) = options.anchor {
            let target = format!("{anchor}-{number}");
            numbers.push_static("<a");
            numbers.push_attr("href", &format!("#{target}"));
            numbers.push_static(">");
            numbers.push_number(number);
            numbers.push_static("</a>");
            code.push_static("<a");
            code.push_attr("id", &target);
            code.push_static("></a>");
        } else {
            numbers.push_number(number);
        }

        let emphasized = options.highlight_lines.contains(&number);
        if emphasized {
            code.push_static("<span class=\"hll\">");
        }
        code.push_html(&line);
        code.push_static("\n");
        if emphasized {
            code.push_static("</span>");
        }
    }

    let mut html = Html::new();
    if options.line_numbers {
        html.push_static(
            "<table class=\"highlighttable\"><tr><td class=\"linenos\"><div class=\"linenodiv\"><pre>",
        );
        html.push_html(&numbers);
        html.push_static("</pre></div></td><td class=\"code\">");
    }
    html.push_static("<div class=\"highlight\"><pre>");
    html.push_html(&code);
    html.push_static("</pre></div>");
    if options.line_numbers {
        html.push_static("</td></tr></table>");
    }
    html
}
