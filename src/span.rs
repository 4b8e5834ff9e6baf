//! Span enumeration around a token.
//!
//! For token `i` and span length `n` there are exactly `n` windows of
//! length `n` that contain `i`:
//!
//! ```text
//! tokens:   w0  w1  w2  w3  w4        i = 2, n = 3
//! rank 0:   [w0  w1  w2]
//! rank 1:       [w1  w2  w3]
//! rank 2:           [w2  w3  w4]      <- anchor (last rank)
//! ```
//!
//! All `n` windows are always produced, even when some run past either end
//! of the sentence, so that a window's rank does not depend on where the
//! token sits. Such windows have no context text and never match.

use std::ops::Range;

/// Longest span length used for features.
pub const MAX_SPAN_LEN: usize = 3;

/// Span lengths in feature order.
pub const SPAN_LENGTHS: [usize; MAX_SPAN_LEN] = [1, 2, 3];

/// Half-open token window `[start, end)`; `start` may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    /// First token index (inclusive).
    pub start: isize,
    /// Last token index (exclusive).
    pub end: isize,
}

impl Window {
    /// Create a window.
    #[must_use]
    pub const fn new(start: isize, end: isize) -> Self {
        Self { start, end }
    }

    /// Number of token positions covered, in or out of range.
    #[must_use]
    pub const fn len(&self) -> usize {
        if self.end > self.start {
            (self.end - self.start) as usize
        } else {
            0
        }
    }

    /// Whether the window is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a token index falls inside.
    #[must_use]
    pub fn contains(&self, token: usize) -> bool {
        let token = token as isize;
        self.start <= token && token < self.end
    }

    /// Token range, if the whole window lies inside a sentence of
    /// `sentence_len` tokens.
    #[must_use]
    pub fn in_bounds(&self, sentence_len: usize) -> Option<Range<usize>> {
        if self.start < 0 || self.end < self.start || self.end as usize > sentence_len {
            return None;
        }
        Some(self.start as usize..self.end as usize)
    }

    /// Space-joined tokens of the window, or `None` when it is out of
    /// range or empty.
    #[must_use]
    pub fn context<S: AsRef<str>>(&self, tokens: &[S]) -> Option<String> {
        let range = self.in_bounds(tokens.len())?;
        if range.is_empty() {
            return None;
        }
        let words: Vec<&str> = tokens[range].iter().map(|t| t.as_ref()).collect();
        Some(words.join(" "))
    }
}

/// The `n` windows of length `n` containing `token` in a sentence of
/// `sentence_length` tokens, by increasing start.
///
/// Windows are not clipped to the sentence; see [`Window::context`]. A
/// token outside the sentence has no windows.
#[must_use]
pub fn spans_containing(token: usize, sentence_length: usize, n: usize) -> Vec<Window> {
    if token >= sentence_length {
        return Vec::new();
    }
    let token = token as isize;
    let n = n as isize;
    (0..n)
        .map(|rank| Window::new(token + 1 - n + rank, token + 1 + rank))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence() -> Vec<String> {
        ["the", "new", "york", "times"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn unigram_is_the_token_itself() {
        for i in 0..4 {
            let windows = spans_containing(i, 4, 1);
            assert_eq!(windows, vec![Window::new(i as isize, i as isize + 1)]);
        }
    }

    #[test]
    fn windows_contain_token_in_start_order() {
        let windows = spans_containing(2, 4, 3);
        assert_eq!(
            windows,
            vec![Window::new(0, 3), Window::new(1, 4), Window::new(2, 5)]
        );
        assert!(windows.iter().all(|w| w.contains(2) && w.len() == 3));
    }

    #[test]
    fn boundary_windows_are_still_generated() {
        let windows = spans_containing(0, 4, 3);
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0], Window::new(-2, 1));
        assert_eq!(windows[0].context(&sentence()), None);
        assert_eq!(windows[1].context(&sentence()), None);
        assert_eq!(windows[2].context(&sentence()).as_deref(), Some("the new york"));
    }

    #[test]
    fn window_past_the_end_has_no_context() {
        let windows = spans_containing(3, 4, 2);
        assert_eq!(windows[0].context(&sentence()).as_deref(), Some("york times"));
        assert_eq!(windows[1], Window::new(3, 5));
        assert_eq!(windows[1].context(&sentence()), None);
    }

    #[test]
    fn short_sentence_never_yields_longer_context() {
        let tokens = vec!["solo"];
        for n in 2..=MAX_SPAN_LEN {
            for w in spans_containing(0, tokens.len(), n) {
                assert_eq!(w.context(&tokens), None);
            }
        }
    }

    #[test]
    fn token_outside_sentence_has_no_windows() {
        assert!(spans_containing(4, 4, 2).is_empty());
        assert!(spans_containing(0, 0, 1).is_empty());
        assert_eq!(spans_containing(3, 4, 3).len(), 3);
    }

    #[test]
    fn in_bounds_range() {
        assert_eq!(Window::new(1, 3).in_bounds(4), Some(1..3));
        assert_eq!(Window::new(-1, 1).in_bounds(4), None);
        assert_eq!(Window::new(3, 5).in_bounds(4), None);
    }
}
