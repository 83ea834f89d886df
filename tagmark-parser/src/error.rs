use std::fmt;

use serde::Serialize;
use tagmark_core::UrlError;

use crate::model::{NodeId, Span};

/// Fatal errors: registry misconfiguration and parser resource limits.
#[non_exhaustive]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("tag name already registered: {0}")]
    DuplicateTag(String),

    #[error("invalid tag name: {0:?}")]
    InvalidTagName(String),

    #[error("{limit} limit exceeded (maximum {maximum}), position: byte {position}")]
    ResourceLimitExceeded {
        limit: Limit,
        maximum: usize,
        position: usize,
    },
}

impl Error {
    /// Get advice for this error if available.
    #[must_use]
    pub fn advice(&self) -> Option<&'static str> {
        match self {
            Self::DuplicateTag(_) => {
                Some("Tag names and aliases are case-insensitive and must be unique in a registry")
            }
            Self::InvalidTagName(_) => Some(
                "Tag names must be non-empty and cannot contain whitespace, '[', ']', '=', '/' or '\"'",
            ),
            Self::ResourceLimitExceeded { .. } => Some(
                "Raise the limit with `Options::builder().with_max_depth(..)` or `.with_max_nodes(..)` if the input is trusted",
            ),
        }
    }
}

/// Which parser bound was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Limit {
    Depth,
    Nodes,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Depth => write!(f, "nesting depth"),
            Self::Nodes => write!(f, "node count"),
        }
    }
}

/// A structural problem the parser recovered from.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseIssue {
    /// The tag was still open at end of input, or was closed by an outer
    /// closing tag.
    #[error("unterminated [{name}] tag, {span}")]
    Unterminated { name: String, span: Span },

    /// A closing tag of a known tag matched no open tag; it was kept as text.
    #[error("closing [/{name}] tag does not match any open tag, {span}")]
    UnmatchedClose { name: String, span: Span },
}

impl ParseIssue {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Unterminated { span, .. } | Self::UnmatchedClose { span, .. } => *span,
        }
    }
}

/// A per-node semantic problem found while sanitizing.
#[non_exhaustive]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{attribute}: not a number: {value:?}")]
    NotANumber {
        attribute: &'static str,
        value: String,
    },

    #[error("{attribute}: must be a positive number, got {value}")]
    NotPositive {
        attribute: &'static str,
        value: String,
    },

    #[error("missing {0}")]
    Missing(&'static str),

    #[error("rejected URL: {0}")]
    RejectedUrl(#[from] UrlError),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("unknown anchor: {0}")]
    UnknownAnchor(String),

    #[error("duplicate identifier: {0}")]
    DuplicateId(String),

    #[error("not a supported video URL: {0}")]
    InvalidVideoUrl(String),
}

/// One validation problem, as returned by [`Document::sanitize`](crate::Document::sanitize).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub node: NodeId,
    /// Canonical name of the node's tag.
    pub tag: &'static str,
    pub error: ValidationError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} (node {})", self.tag, self.error, self.node)
    }
}
