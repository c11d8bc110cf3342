//! Symbol type for interned strings.
//!
//! # Examples
//!
//! ```
//! use tern_mem::Symbol;
//!
//! let a = Symbol::new(7);
//! assert_eq!(a, Symbol::new(7));
//! assert_eq!(a.as_u32(), 7);
//! ```

use std::fmt;

/// A handle to a string owned by a [`crate::StringInterner`].
///
/// Equality is identity of the interned string, so comparing two names is a
/// single `u32` comparison. A symbol is only meaningful together with the
/// interner that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Creates a symbol from a raw id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw id.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// The raw id as an index.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for Symbol {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_roundtrip() {
        let sym = Symbol::new(42);
        assert_eq!(sym.as_u32(), 42);
        assert_eq!(sym.as_usize(), 42);
        assert_eq!(Symbol::from(42), sym);
    }

    #[test]
    fn test_symbol_ordering_and_hash() {
        use std::collections::HashSet;

        assert!(Symbol::new(1) < Symbol::new(2));
        let set: HashSet<Symbol> = [Symbol::new(1), Symbol::new(1), Symbol::new(3)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(Symbol::new(9).to_string(), "#9");
    }
}
