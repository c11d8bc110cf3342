//! Patterns.
//!
//! The parser cannot tell a capture from a nullary constructor, so both
//! arrive as [`Pattern::Bind`]; the checker resolves the name against the
//! constructor table.

use crate::ast::{Literal, Type};
use crate::span::{Span, Spanned};
use tern_mem::Symbol;

/// A pattern in a match case, lambda case or annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// `_`
    Wildcard {
        /// Source location
        span: Span,
    },

    /// `true`, `3i8`, `"abc"`
    Literal {
        /// The literal
        value: Literal,
        /// Source location
        span: Span,
    },

    /// `x`, or a nullary constructor such as `None`
    Bind {
        /// Name
        name: Symbol,
        /// Source location
        span: Span,
    },

    /// `()`, `(p)` (grouping only) or `(p1, p2)`
    Tuple {
        /// Elements
        elements: Vec<Pattern>,
        /// Source location
        span: Span,
    },

    /// Constructor applied to sub-patterns: `Some x`, `Pair a b`
    Ctor {
        /// Constructor name
        name: Symbol,
        /// One sub-pattern per field
        args: Vec<Pattern>,
        /// Source location
        span: Span,
    },

    /// `(p : t)`
    Annotated {
        /// Inner pattern
        pattern: Box<Pattern>,
        /// Annotation
        ty: Type,
        /// Source location
        span: Span,
    },

    /// `p1 | p2 | ...`
    Or {
        /// Alternatives, at least two
        alternatives: Vec<Pattern>,
        /// Source location
        span: Span,
    },
}

impl Spanned for Pattern {
    fn span(&self) -> Span {
        match self {
            Self::Wildcard { span }
            | Self::Literal { span, .. }
            | Self::Bind { span, .. }
            | Self::Tuple { span, .. }
            | Self::Ctor { span, .. }
            | Self::Annotated { span, .. }
            | Self::Or { span, .. } => *span,
        }
    }
}
