//! Escaped HTML fragments.
//!
//! Tag implementations never return bare strings from their HTML hooks. They
//! return an [`Html`] value, and the only ways to grow one are:
//!
//! - [`Html::push_text`] / [`Html::escape`] - untrusted text, always escaped
//! - [`Html::push_attr`] - an attribute whose value is escaped
//! - [`Html::push_static`] / [`Html::from_static`] - markup literals from source code
//! - [`Html::from_trusted`] - markup produced by a generator such as a syntax highlighter
//!
//! That keeps attacker controlled input from reaching the output buffer without
//! going through [`escape_html`].

use std::fmt;

/// Named entities understood by [`unescape_html`].
const NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{00A0}'),
];

/// Longest entity body we try to decode (`#x10FFFF` is 8 characters).
const MAX_ENTITY_LEN: usize = 8;

/// An HTML fragment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Html(String);

impl Html {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fragment from untrusted text.
    #[must_use]
    pub fn escape(text: &str) -> Self {
        Self(escape_html(text))
    }

    /// Build a fragment from a markup literal.
    #[must_use]
    pub fn from_static(markup: &'static str) -> Self {
        Self(markup.to_string())
    }

    /// Wrap markup generated by code that escapes its own input.
    ///
    /// Only generators (syntax highlighters, tests) should call this: the
    /// argument is emitted as-is.
    #[must_use]
    pub fn from_trusted(markup: String) -> Self {
        Self(markup)
    }

    pub fn push_static(&mut self, markup: &'static str) {
        self.0.push_str(markup);
    }

    pub fn push_text(&mut self, text: &str) {
        push_escaped(&mut self.0, text);
    }

    pub fn push_html(&mut self, html: &Html) {
        self.0.push_str(&html.0);
    }

    /// Append ` name="value"` with the value escaped.
    pub fn push_attr(&mut self, name: &'static str, value: &str) {
        self.0.push(' ');
        self.0.push_str(name);
        self.0.push_str("=\"");
        push_escaped(&mut self.0, value);
        self.0.push('"');
    }

    /// Append a number; digits never need escaping.
    pub fn push_number(&mut self, number: usize) {
        self.0.push_str(&number.to_string());
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
}

/// HTML-escape special characters.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

/// Decode named (`&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`) and
/// numeric (`&#39;`, `&#x27;`) entities.
///
/// Anything that is not a well-formed, semicolon-terminated entity is left
/// untouched.
#[must_use]
pub fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        let (before, after) = rest.split_at(amp);
        out.push_str(before);

        let body = after.get(1..).unwrap_or_default();
        let decoded = body
            .char_indices()
            .take(MAX_ENTITY_LEN + 1)
            .find(|&(_, c)| c == ';')
            .and_then(|(end, _)| {
                let entity = body.get(..end)?;
                decode_entity(entity).map(|c| (c, end))
            });

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = body.get(end + 1..).unwrap_or_default();
            }
            None => {
                out.push('&');
                rest = body;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(numeric) = entity.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    NAMED_ENTITIES
        .iter()
        .find(|(name, _)| *name == entity)
        .map(|&(_, c)| c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[rstest::rstest]
    #[case("&lt;test&gt;", "<test>")]
    #[case("&quot;quoted&quot;", "\"quoted\"")]
    #[case("&#39;&#x27;&#X27;", "'''")]
    #[case("fish &amp; chips", "fish & chips")]
    #[case("a &unknown; b", "a &unknown; b")]
    #[case("dangling &", "dangling &")]
    #[case("no semicolon &amp here", "no semicolon &amp here")]
    #[case("&#xZZ;", "&#xZZ;")]
    #[case("&#1114112;", "&#1114112;")]
    #[case("caf&#233;", "café")]
    fn test_unescape_html(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(unescape_html(input), expected);
    }

    #[test]
    fn test_escape_then_unescape_is_identity() {
        let text = r#"<script>alert("x & y")</script>"#;
        assert_eq!(unescape_html(&escape_html(text)), text);
    }

    #[test]
    fn test_html_builder_escapes_untrusted_parts() {
        let mut html = Html::from_static("<abbr");
        html.push_attr("title", "\"><script>");
        html.push_static(">");
        html.push_text("<b>");
        html.push_static("</abbr>");
        assert_eq!(
            html.as_str(),
            "<abbr title=\"&quot;&gt;&lt;script&gt;\">&lt;b&gt;</abbr>"
        );
    }

    #[test]
    fn test_push_number() {
        let mut html = Html::new();
        html.push_number(560);
        assert_eq!(html.to_string(), "560");
    }
}
