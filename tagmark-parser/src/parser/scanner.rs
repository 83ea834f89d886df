//! Recognizes single tag tokens: `[name attrs]`, `[name attrs/]` and `[/name]`.
use crate::{Attributes, Registry, registry::is_name_char};

#[derive(Debug, PartialEq)]
pub(crate) struct OpenTag<'a> {
    pub(crate) name: &'a str,
    pub(crate) attributes: Attributes,
    pub(crate) self_closing: bool,
    /// Offset just past the closing `]`.
    pub(crate) end: usize,
}

#[derive(Debug, PartialEq)]
pub(crate) struct CloseTag<'a> {
    pub(crate) name: &'a str,
    pub(crate) end: usize,
}

#[derive(Debug, PartialEq)]
pub(crate) enum TagToken<'a> {
    Open(OpenTag<'a>),
    Close(CloseTag<'a>),
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        self.input.get(self.pos..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !predicate(c)).unwrap_or(rest.len());
        self.pos += len;
        rest.get(..len).unwrap_or_default()
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    /// `"quoted value"` or a bare value ending at whitespace or `]`.
    fn value(&mut self) -> Option<String> {
        if self.eat('"') {
            let value = self.take_while(|c| c != '"');
            return self.eat('"').then(|| value.to_string());
        }
        let value = self.take_while(|c| !c.is_whitespace() && !matches!(c, ']' | '"' | '['));
        match self.peek() {
            Some('"' | '[') => None,
            _ => Some(value.to_string()),
        }
    }
}

/// Scan the tag token starting at `start`, which must point at a `[`.
///
/// Returns `None` when the text there is not a well-formed token.
pub(crate) fn scan_tag(input: &str, start: usize) -> Option<TagToken<'_>> {
    let mut cursor = Cursor { input, pos: start };
    if !cursor.eat('[') {
        return None;
    }

    if cursor.eat('/') {
        let name = cursor.take_while(is_name_char);
        if name.is_empty() {
            return None;
        }
        cursor.skip_whitespace();
        return cursor
            .eat(']')
            .then_some(TagToken::Close(CloseTag {
                name,
                end: cursor.pos,
            }));
    }

    let name = cursor.take_while(is_name_char);
    if name.is_empty() {
        return None;
    }
    let mut attributes = Attributes::new();
    if cursor.eat('=') {
        let value = cursor.value()?;
        attributes.insert(name, value);
    }

    loop {
        cursor.skip_whitespace();
        match cursor.peek()? {
            ']' => {
                cursor.eat(']');
                return Some(TagToken::Open(OpenTag {
                    name,
                    attributes,
                    self_closing: false,
                    end: cursor.pos,
                }));
            }
            '/' => {
                cursor.eat('/');
                if !cursor.eat(']') {
                    return None;
                }
                return Some(TagToken::Open(OpenTag {
                    name,
                    attributes,
                    self_closing: true,
                    end: cursor.pos,
                }));
            }
            c if is_name_char(c) => {
                let key = cursor.take_while(is_name_char);
                let value = if cursor.eat('=') {
                    cursor.value()?
                } else {
                    String::new()
                };
                attributes.insert(key, value);
            }
            _ => return None,
        }
    }
}

/// Find the close token ending a verbatim region of the tag named `canonical`.
///
/// Returns the offsets of the token's `[` and of the byte after its `]`.
pub(crate) fn find_verbatim_end(
    input: &str,
    from: usize,
    registry: &Registry,
    canonical: &str,
) -> Option<(usize, usize)> {
    let mut pos = from;
    while let Some(offset) = input.get(pos..).and_then(|rest| rest.find("[/")) {
        let start = pos + offset;
        if let Some(TagToken::Close(close)) = scan_tag(input, start) {
            let same_tag = registry
                .resolve(close.name)
                .is_some_and(|tag| tag.definition().name == canonical);
            if same_tag {
                return Some((start, close.end));
            }
        }
        pos = start + 2;
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::test_utils::registry;
    use pretty_assertions::assert_eq;

    fn open(input: &str) -> OpenTag<'_> {
        match scan_tag(input, 0) {
            Some(TagToken::Open(open)) => open,
            other => panic!("expected an open tag, got {other:?}"),
        }
    }

    fn attributes(open: &OpenTag<'_>) -> Vec<(String, String)> {
        open.attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_plain_open_and_close() {
        let tag = open("[b]rest");
        assert_eq!(tag.name, "b");
        assert!(!tag.self_closing);
        assert_eq!(tag.end, 3);

        assert_eq!(
            scan_tag("[/b]", 0),
            Some(TagToken::Close(CloseTag { name: "b", end: 4 }))
        );
        assert_eq!(
            scan_tag("[/B ]", 0),
            Some(TagToken::Close(CloseTag { name: "B", end: 5 }))
        );
    }

    #[test]
    fn test_shorthand_and_attributes() {
        let tag = open(r#"[URL=http://example.com/?a=b Title="Some &quot;title&quot;" nofollow]"#);
        assert_eq!(tag.name, "URL");
        assert_eq!(
            attributes(&tag),
            vec![
                ("url".to_string(), "http://example.com/?a=b".to_string()),
                ("title".to_string(), "Some &quot;title&quot;".to_string()),
                ("nofollow".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_quoted_value_keeps_brackets() {
        let tag = open(r#"[quote="[admin] says"]"#);
        assert_eq!(tag.attributes.get("quote"), Some("[admin] says"));
    }

    #[test]
    fn test_self_closing() {
        assert!(open("[br/]").self_closing);
        assert!(open("[img src=a.png /]").self_closing);
        let tag = open("[url=http://x/]");
        assert!(!tag.self_closing);
        assert_eq!(tag.attributes.get("url"), Some("http://x/"));
    }

    #[test]
    fn test_last_attribute_wins() {
        let tag = open("[img width=1 WIDTH=2]");
        assert_eq!(tag.attributes.get("width"), Some("2"));
        assert_eq!(tag.attributes.len(), 1);
    }

    #[rstest::rstest]
    #[case("[]")]
    #[case("[/]")]
    #[case("[ b]")]
    #[case("[b")]
    #[case("[b x=\"unterminated]")]
    #[case("[b x=a\"b]")]
    #[case("[b x=[y]]")]
    #[case("[b / ]")]
    #[case("[/b")]
    #[case("[b =x]")]
    fn test_malformed(#[case] input: &str) {
        assert_eq!(scan_tag(input, 0), None);
    }

    #[test]
    fn test_find_verbatim_end() {
        let registry = registry();
        let input = "[code]a [/b] [/noparse] [/CODE] tail";
        let (start, end) = find_verbatim_end(input, 6, &registry, "code").unwrap();
        assert_eq!(input.get(start..end), Some("[/CODE]"));
        assert_eq!(find_verbatim_end("[code]never closed", 6, &registry, "code"), None);
    }
}
