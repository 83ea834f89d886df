//! Canonical markup serialization.
//!
//! Output reparses to the same tree: tag names are written as spelled in
//! the source, the `[name=value]` shorthand comes first, other attributes
//! follow in insertion order, and every value is double quoted.
use crate::NodeRef;

/// Escape text so that it reparses as the same text.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '[' | ']' | '\n') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn push_quoted(out: &mut String, value: &str) {
    out.push('"');
    out.push_str(&value.replace('"', "&quot;"));
    out.push('"');
}

/// `[name=value key="value" flag]`
#[must_use]
pub fn open_tag(node: NodeRef<'_>) -> String {
    let name = node.name();
    let own_key = name.to_lowercase();
    let mut out = format!("[{name}");

    if let Some(value) = node.attributes().get(&own_key) {
        out.push('=');
        push_quoted(&mut out, value);
    }
    for (key, value) in node.attributes().iter().filter(|(key, _)| *key != own_key) {
        out.push(' ');
        out.push_str(key);
        if !value.is_empty() {
            out.push('=');
            push_quoted(&mut out, value);
        }
    }
    out.push(']');
    out
}

#[must_use]
pub fn close_tag(node: NodeRef<'_>) -> String {
    format!("[/{}]", node.name())
}

/// Serialize a registered tag around its rendered children.
#[must_use]
pub fn element(node: NodeRef<'_>, inner: &str) -> String {
    let mut out = open_tag(node);
    let flags = node.flags();
    if flags.standalone {
        return out;
    }
    if flags.parse_embedded {
        out.push_str(inner);
    } else {
        out.push_str(node.content());
    }
    out.push_str(&close_tag(node));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text(r"a [b] c\d"), r"a \[b\] c\\d");
        assert_eq!(escape_text("line\nbreak"), "line\\\nbreak");
    }
}
