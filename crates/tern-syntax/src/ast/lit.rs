//! Literals.
//!
//! Integer literals arrive base-agnostic: the lexer has already turned
//! `0xff`, `0o377` and `255` into the same magnitude. Width suffixes are
//! kept as written (`7i8` has width `Some(8)`, `7` has `None`), and string
//! bodies are the raw text between the delimiters with escapes still in
//! place. Range checks and escape decoding happen in the checker, which
//! reports them as invalid literals.

use std::fmt;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    /// `true` or `false`
    Bool(bool),

    /// Integer literal with an optional `iN` suffix
    Int {
        /// Magnitude, independent of the base it was written in
        magnitude: u128,
        /// Bit width from the suffix
        width: Option<u32>,
    },

    /// String literal, raw body without the delimiters
    Str(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int {
                magnitude,
                width: Some(width),
            } => write!(f, "{magnitude}i{width}"),
            Self::Int {
                magnitude,
                width: None,
            } => write!(f, "{magnitude}"),
            Self::Str(raw) => write!(f, "\"{raw}\""),
        }
    }
}
