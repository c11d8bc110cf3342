//! Top-level units.
//!
//! Each [`Decl`] is checked as a unit: it is either accepted as a whole or
//! rejected with nothing it declared left visible.

use crate::ast::{Binding, Expr, Type};
use crate::span::{Span, Spanned};
use tern_mem::Symbol;

/// A top-level unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Decl {
    /// `data t1 ... and t2 ...`: mutually recursive algebraic types
    Data {
        /// The group
        types: Vec<DataDecl>,
        /// Source location
        span: Span,
    },

    /// `type name params = body`
    Alias {
        /// Alias name
        name: Symbol,
        /// Parameters
        params: Vec<Symbol>,
        /// Aliased type
        body: Type,
        /// Source location
        span: Span,
    },

    /// `let [rec] x = e and ...`
    Let {
        /// Whether the bindings see each other
        rec: bool,
        /// The binding group
        bindings: Vec<Binding>,
        /// Source location
        span: Span,
    },

    /// A bare expression
    Expr {
        /// The expression
        expr: Expr,
        /// Source location
        span: Span,
    },
}

impl Spanned for Decl {
    fn span(&self) -> Span {
        match self {
            Self::Data { span, .. }
            | Self::Alias { span, .. }
            | Self::Let { span, .. }
            | Self::Expr { span, .. } => *span,
        }
    }
}

/// One algebraic data type in a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataDecl {
    /// Type name
    pub name: Symbol,
    /// Quantified parameters
    pub params: Vec<Symbol>,
    /// Cases, in declaration order
    pub cases: Vec<CaseDecl>,
    /// Source location
    pub span: Span,
}

/// One case `Name field1 field2 ...` of a data type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaseDecl {
    /// Constructor name
    pub name: Symbol,
    /// Field types
    pub fields: Vec<Type>,
    /// Source location
    pub span: Span,
}
