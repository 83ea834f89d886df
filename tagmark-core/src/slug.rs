/// Turn free text into an identifier usable as an HTML `id`.
///
/// Letters and digits are lowercased, underscores are kept, runs of
/// whitespace and hyphens collapse into a single `-`, and everything else is
/// dropped. Leading and trailing separators are trimmed.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
    }
    slug
}
