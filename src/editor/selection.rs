use std::ops::Range;

/// A range of the buffer expressed as char offsets.
///
/// `start <= end` always holds. An empty selection (`start == end`) is a
/// plain cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Selection {
    /// Create a selection, normalizing so `start <= end`.
    pub const fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A zero-width selection at `offset`.
    pub const fn cursor(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Clamp both ends to a text of `len` chars.
    #[must_use]
    pub fn clamp(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

impl From<Range<usize>> for Selection {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_reversed_offsets() {
        let sel = Selection::new(7, 2);
        assert_eq!(sel, Selection { start: 2, end: 7 });
        assert_eq!(sel.len(), 5);
    }

    #[test]
    fn test_cursor_is_empty() {
        assert!(Selection::cursor(4).is_empty());
        assert!(!Selection::new(4, 5).is_empty());
    }

    #[test]
    fn test_clamp_limits_both_ends() {
        let sel = Selection::new(3, 40).clamp(10);
        assert_eq!(sel, Selection::new(3, 10));
        let sel = Selection::new(20, 40).clamp(10);
        assert!(sel.is_empty());
    }
}
