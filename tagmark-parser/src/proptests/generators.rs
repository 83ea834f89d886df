#![allow(clippy::expect_used)]
use proptest::prelude::*;

/// Any string at all, multi-byte characters included.
pub fn any_document_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(".*").expect("Failed to create any string strategy")
}

/// Printable ASCII with line breaks, heavy on the characters the parser
/// treats specially.
pub fn ascii_document() -> impl Strategy<Value = String> {
    prop::string::string_regex(r#"[a-z \n\\\[\]=/"*]{0,200}"#)
        .expect("Failed to create ASCII string strategy")
}

/// Markup built from tag-like fragments, balanced or not.
pub fn structured_document() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("[b]".to_string()),
            Just("[/b]".to_string()),
            Just("[STRONG]".to_string()),
            Just("[i]".to_string()),
            Just("[/i]".to_string()),
            Just("[url=http://example.com]".to_string()),
            Just("[url href=\"a b\" title=x]".to_string()),
            Just("[/url]".to_string()),
            Just("[quote]".to_string()),
            Just("[quote=\"someone\"]".to_string()),
            Just("[/quote]".to_string()),
            Just("[list]".to_string()),
            Just("[/list]".to_string()),
            Just("[*]".to_string()),
            Just("[li]".to_string()),
            Just("[/*]".to_string()),
            Just("[h1]".to_string()),
            Just("[/h1]".to_string()),
            Just("[code]".to_string()),
            Just("[/code]".to_string()),
            Just("[noparse]".to_string()),
            Just("[/noparse]".to_string()),
            Just("[hr]".to_string()),
            Just("[br/]".to_string()),
            Just("[b/]".to_string()),
            Just("[b x=]".to_string()),
            Just("[b=]".to_string()),
            Just("\n".to_string()),
            Just("\n\n".to_string()),
            Just("\\".to_string()),
            Just("\\[".to_string()),
            Just("[unknown]".to_string()),
            Just("[".to_string()),
            Just("]".to_string()),
            prop::string::string_regex(r"[a-zA-Z0-9 .,!?]{1,12}")
                .expect("Failed to create text chunk"),
        ],
        0..40,
    )
    .prop_map(|chunks| chunks.concat())
}

/// Deeply nested inline tags.
pub fn nested_document() -> impl Strategy<Value = String> {
    (0usize..200, prop::bool::ANY).prop_map(|(depth, close)| {
        let mut input = "[b]".repeat(depth);
        input.push('x');
        if close {
            input.push_str(&"[/b]".repeat(depth));
        }
        input
    })
}
