//! Token coloring with syntect. Styles are emitted inline.
use syntect::{
    easy::HighlightLines,
    highlighting::{Theme, ThemeSet},
    html::{IncludeBackground, styled_line_to_highlighted_html},
    parsing::{SyntaxReference, SyntaxSet},
};
use tagmark_core::Html;

use super::{HighlightError, HighlightOptions, Highlighter, layout};

const CODE_HIGHLIGHT_THEME: &str = "InspiredGitHub";

/// Highlights with syntect's bundled syntaxes and the `InspiredGitHub` theme.
#[derive(Debug)]
pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl SyntectHighlighter {
    /// Load the bundled syntaxes and theme.
    ///
    /// # Errors
    ///
    /// Returns [`HighlightError::Backend`] if the theme is not bundled.
    pub fn new() -> Result<Self, HighlightError> {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes.themes.remove(CODE_HIGHLIGHT_THEME).ok_or_else(|| {
            HighlightError::Backend(format!("theme not found: {CODE_HIGHLIGHT_THEME}"))
        })?;
        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_nonewlines(),
            theme,
        })
    }

    fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        if language.eq_ignore_ascii_case("text") {
            return Some(self.syntax_set.find_syntax_plain_text());
        }
        self.syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_extension(language))
    }
}

impl Highlighter for SyntectHighlighter {
    fn supports_language(&self, language: &str) -> bool {
        self.find_syntax(language).is_some()
    }

    fn highlight(
        &self,
        source: &str,
        language: &str,
        options: &HighlightOptions<'_>,
    ) -> Result<Html, HighlightError> {
        let syntax = self
            .find_syntax(language)
            .ok_or_else(|| HighlightError::UnsupportedLanguage(language.to_string()))?;
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        let mut lines = Vec::new();
        for line in source.lines() {
            let regions = highlighter
                .highlight_line(line, &self.syntax_set)
                .map_err(|e| HighlightError::Backend(e.to_string()))?;
            let html = styled_line_to_highlighted_html(&regions, IncludeBackground::No)
                .map_err(|e| HighlightError::Backend(e.to_string()))?;
            lines.push(Html::from_trusted(html));
        }
        Ok(layout(lines, options))
    }
}
