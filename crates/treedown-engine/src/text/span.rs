/// A byte range `[start, end)` into the document rope.
///
/// Block text is stored as spans rather than copied strings, so slicing the
/// rope with any stored span reproduces the exact source bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    /// Length in bytes; zero when the range is inverted.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Moves the start forward by `n` bytes, clamped to the end.
    ///
    /// Used when a container marker (quote `>`, list bullet, centered `->`)
    /// is stripped from the front of a stored line.
    #[must_use]
    pub fn advance(self, n: usize) -> Span {
        Span {
            start: (self.start + n).min(self.end),
            end: self.end,
        }
    }

    /// Moves the end backward by `n` bytes, clamped to the start.
    #[must_use]
    pub fn retreat_end(self, n: usize) -> Span {
        Span {
            start: self.start,
            end: self.end.saturating_sub(n).max(self.start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_and_empty() {
        let sp = Span { start: 4, end: 9 };
        assert_eq!(sp.len(), 5);
        assert!(!sp.is_empty());
        assert!(Span { start: 3, end: 3 }.is_empty());
    }

    #[test]
    fn advance_clamps_to_end() {
        let sp = Span { start: 0, end: 5 };
        assert_eq!(sp.advance(2), Span { start: 2, end: 5 });
        assert_eq!(sp.advance(9), Span { start: 5, end: 5 });
    }

    #[test]
    fn retreat_end_clamps_to_start() {
        let sp = Span { start: 3, end: 8 };
        assert_eq!(sp.retreat_end(2), Span { start: 3, end: 6 });
        assert_eq!(sp.retreat_end(9), Span { start: 3, end: 3 });
    }
}
