//! Type expressions.

use crate::span::{Span, Spanned};
use tern_mem::Symbol;

/// A type as written in annotations, aliases and data declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Type constructor, alias or builtin: `bool`, `i8`, `option`
    Name {
        /// Name
        name: Symbol,
        /// Source location
        span: Span,
    },

    /// Type variable: `'a`
    Var {
        /// Variable name
        name: Symbol,
        /// Source location
        span: Span,
    },

    /// Application: `option bool`, `'f 'a`
    App {
        /// Applied type
        head: Box<Type>,
        /// Arguments, in order
        args: Vec<Type>,
        /// Source location
        span: Span,
    },

    /// Function type: `'a -> 'b`
    Arrow {
        /// Parameter
        param: Box<Type>,
        /// Result
        result: Box<Type>,
        /// Source location
        span: Span,
    },

    /// Parenthesised group: `()`, `(t)` (grouping only) or `(t1, t2)`
    Tuple {
        /// Elements
        elements: Vec<Type>,
        /// Source location
        span: Span,
    },

    /// Explicit quantifier: `forall 'a 'b. body`
    Forall {
        /// Quantified variables
        params: Vec<Symbol>,
        /// Body
        body: Box<Type>,
        /// Source location
        span: Span,
    },

    /// Inferred type: `_`
    Hole {
        /// Source location
        span: Span,
    },
}

impl Spanned for Type {
    fn span(&self) -> Span {
        match self {
            Self::Name { span, .. }
            | Self::Var { span, .. }
            | Self::App { span, .. }
            | Self::Arrow { span, .. }
            | Self::Tuple { span, .. }
            | Self::Forall { span, .. }
            | Self::Hole { span } => *span,
        }
    }
}
