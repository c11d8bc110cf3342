//! Expressions.
//!
//! Nested nodes are boxed and owned; the checker walks them once and
//! produces a separate typed tree.

use crate::ast::{Literal, Pattern, Type};
use crate::span::{Span, Spanned};
use tern_mem::Symbol;

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Literal
    Literal {
        /// The literal
        value: Literal,
        /// Source location
        span: Span,
    },

    /// Variable or constructor reference
    Ident {
        /// Name
        name: Symbol,
        /// Source location
        span: Span,
    },

    /// Application `f x`; multi-argument calls are curried
    App {
        /// Function
        func: Box<Expr>,
        /// Argument
        arg: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// `()`, `(e)` (grouping only) or `(e1, e2)`
    Tuple {
        /// Elements
        elements: Vec<Expr>,
        /// Source location
        span: Span,
    },

    /// `\p1 -> e1 | p2 -> e2`
    Lambda {
        /// Cases tried in order against the argument
        cases: Vec<MatchCase>,
        /// Source location
        span: Span,
    },

    /// `let x = e1 and y = e2 in body`, or `let rec ...`
    Let {
        /// Whether the bindings see each other
        rec: bool,
        /// The binding group
        bindings: Vec<Binding>,
        /// Scope of the bindings
        body: Box<Expr>,
        /// Source location
        span: Span,
    },

    /// `match e with p1 -> e1 | ...`
    Match {
        /// Scrutinee
        scrutinee: Box<Expr>,
        /// Cases tried in order
        cases: Vec<MatchCase>,
        /// Source location
        span: Span,
    },

    /// `(e : t)`
    Annotated {
        /// Inner expression
        expr: Box<Expr>,
        /// Annotation
        ty: Type,
        /// Source location
        span: Span,
    },
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Self::Literal { span, .. }
            | Self::Ident { span, .. }
            | Self::App { span, .. }
            | Self::Tuple { span, .. }
            | Self::Lambda { span, .. }
            | Self::Let { span, .. }
            | Self::Match { span, .. }
            | Self::Annotated { span, .. } => *span,
        }
    }
}

/// One `name [: type] = value` in a let group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    /// Bound name
    pub name: Symbol,
    /// Optional type annotation
    pub annotation: Option<Type>,
    /// Initializer
    pub value: Expr,
    /// Source location
    pub span: Span,
}

/// One `pattern -> body` case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchCase {
    /// Pattern
    pub pattern: Pattern,
    /// Body
    pub body: Expr,
    /// Source location
    pub span: Span,
}

impl Spanned for Binding {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for MatchCase {
    fn span(&self) -> Span {
        self.span
    }
}
