//! Source locations attached to AST nodes and diagnostics.
//!
//! # Examples
//!
//! ```
//! use tern_syntax::span::Span;
//!
//! let head = Span::new(0, 5, 1, 1, 1, 6);
//! let arg = Span::new(6, 10, 1, 7, 1, 11);
//! let app = Span::merge(head, arg);
//!
//! assert_eq!(app.start, 0);
//! assert_eq!(app.end, 10);
//! assert_eq!(app.to_string(), "1:1");
//! ```

use std::fmt;

/// A region of source text.
///
/// Offsets are 0-indexed bytes with an exclusive end. Lines and columns are
/// 1-indexed; columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the span start
    pub start: usize,

    /// Byte offset one past the span end
    pub end: usize,

    /// Line of the span start
    pub start_line: usize,

    /// Column of the span start
    pub start_col: usize,

    /// Line of the span end
    pub end_line: usize,

    /// Column of the span end
    pub end_col: usize,
}

impl Span {
    /// Span used for nodes synthesized by the checker itself.
    pub const SYNTHETIC: Span = Span::new(0, 0, 0, 0, 0, 0);

    /// Creates a span from byte offsets and line/column positions.
    #[must_use]
    pub const fn new(
        start: usize,
        end: usize,
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self {
            start,
            end,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Covers `left` through `right`.
    #[must_use]
    pub const fn merge(left: Span, right: Span) -> Self {
        Self {
            start: left.start,
            end: right.end,
            start_line: left.start_line,
            start_col: left.start_col,
            end_line: right.end_line,
            end_col: right.end_col,
        }
    }

    /// Zero-length span at one position.
    #[must_use]
    pub const fn point(offset: usize, line: usize, col: usize) -> Self {
        Self::new(offset, offset, line, col, line, col)
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for zero-length spans.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Start position.
    #[must_use]
    pub const fn start_pos(&self) -> LineCol {
        LineCol::new(self.start_line, self.start_col)
    }

    /// End position.
    #[must_use]
    pub const fn end_pos(&self) -> LineCol {
        LineCol::new(self.end_line, self.end_col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineCol {
    /// Line (1-indexed)
    pub line: usize,

    /// Column in bytes (1-indexed)
    pub col: usize,
}

impl LineCol {
    /// Creates a position.
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Anything that knows where it came from.
pub trait Spanned {
    /// Returns the source span of this item.
    fn span(&self) -> Span;
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl<T: Spanned> Spanned for Box<T> {
    fn span(&self) -> Span {
        (**self).span()
    }
}
