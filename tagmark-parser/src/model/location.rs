use std::fmt;

use serde::Serialize;

/// A byte range in the parsed input.
///
/// Offsets refer to the input after line endings were normalized to `\n`.
#[derive(Debug, Default, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub fn merge(self, other: Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bytes {}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge() {
        let merged = Span::new(4, 9).merge(Span::new(1, 6));
        assert_eq!(merged, Span::new(1, 9));
        assert_eq!(merged.len(), 8);
    }

    #[test]
    fn test_display() {
        assert_eq!(Span::new(3, 7).to_string(), "bytes 3..7");
    }
}
