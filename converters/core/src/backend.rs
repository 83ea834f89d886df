//! Output format selection by name.

use std::str::FromStr;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Escaped HTML fragments.
    #[default]
    Html,
    /// Plain text.
    Text,
    /// Markup that reparses to the same tree.
    Canonical,
}

/// A backend name that is none of `html`, `text` or `canonical`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid backend: '{0}', expected: html, text, canonical")]
pub struct UnknownBackend(pub String);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            "canonical" | "markup" => Ok(Self::Canonical),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Html => write!(f, "html"),
            Self::Text => write!(f, "text"),
            Self::Canonical => write!(f, "canonical"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(Backend::from_str("html").unwrap(), Backend::Html);
        assert_eq!(Backend::from_str("HTML").unwrap(), Backend::Html);
        assert_eq!(Backend::from_str("text").unwrap(), Backend::Text);
        assert_eq!(Backend::from_str("txt").unwrap(), Backend::Text);
        assert_eq!(Backend::from_str("Canonical").unwrap(), Backend::Canonical);
        assert_eq!(
            Backend::from_str("pdf").unwrap_err().to_string(),
            "invalid backend: 'pdf', expected: html, text, canonical"
        );
    }

    #[test]
    fn test_display_round_trips() {
        for backend in [Backend::Html, Backend::Text, Backend::Canonical] {
            assert_eq!(backend.to_string().parse::<Backend>().unwrap(), backend);
        }
    }

    #[test]
    fn test_default() {
        assert_eq!(Backend::default(), Backend::Html);
    }
}
