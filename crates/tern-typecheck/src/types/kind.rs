//! Kinds.
//!
//! `*` is the kind of types that have values; `k1 -> k2` is the kind of
//! type functions such as `option`. Kind variables are solved by the kind
//! checker during one declaration and default to `*` when it finishes.

use std::fmt;

/// Kind of a type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Types with values
    Star,
    /// Type functions
    Arrow(Box<Kind>, Box<Kind>),
    /// Inference variable, local to one kind checking pass
    Var(u32),
}

impl Kind {
    /// `k1 -> k2`
    #[must_use]
    pub fn arrow(param: Kind, result: Kind) -> Self {
        Kind::Arrow(Box::new(param), Box::new(result))
    }

    /// `p1 -> ... -> pn -> result`
    #[must_use]
    pub fn function(params: impl DoubleEndedIterator<Item = Kind>, result: Kind) -> Self {
        params.rev().fold(result, |acc, p| Kind::arrow(p, acc))
    }

    /// Kind of a data type with `n` parameters of kind `*`.
    #[must_use]
    pub fn of_arity(n: usize) -> Self {
        Self::function((0..n).map(|_| Kind::Star), Kind::Star)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Star => write!(f, "*"),
            Kind::Var(n) => write!(f, "?k{n}"),
            Kind::Arrow(param, result) => {
                if matches!(**param, Kind::Arrow(..)) {
                    write!(f, "({param}) -> {result}")
                } else {
                    write!(f, "{param} -> {result}")
                }
            }
        }
    }
}
