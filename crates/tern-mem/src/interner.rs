//! String interning with ID-based references.
//!
//! The interner is owned by a checking session. The external parser interns
//! identifiers through it, and the checker resolves them back when it renders
//! diagnostics. The checker also needs names that can never collide with a
//! source identifier (scrutinee temporaries, eta-expansion parameters); those
//! are minted by [`StringInterner::fresh`] with a `%` prefix, which the
//! surface lexer does not accept in identifiers.
//!
//! # Examples
//!
//! ```
//! use tern_mem::StringInterner;
//!
//! let mut interner = StringInterner::new();
//! let x = interner.intern("x");
//! assert_eq!(interner.intern("x"), x);
//! assert_eq!(interner.resolve(x), Some("x"));
//!
//! let tmp = interner.fresh("m");
//! assert!(interner.resolve(tmp).unwrap().starts_with('%'));
//! ```

use crate::symbol::Symbol;

#[cfg(feature = "symbols")]
use hashbrown::HashMap;

#[cfg(not(feature = "symbols"))]
use std::collections::HashMap;

/// Built-in type names, interned first so they have stable ids.
const PRELUDE: &[&str] = &["bool", "string", "true", "false"];

/// Bidirectional string table.
#[derive(Debug, Clone)]
pub struct StringInterner {
    /// Symbol id -> string
    strings: Vec<Box<str>>,

    /// String -> symbol id
    symbols: HashMap<Box<str>, Symbol>,

    /// Counter for [`StringInterner::fresh`]
    next_fresh: u32,
}

impl StringInterner {
    /// Creates an interner with the prelude names pre-interned.
    #[must_use]
    pub fn new() -> Self {
        let mut interner = Self {
            strings: Vec::new(),
            symbols: HashMap::new(),
            next_fresh: 0,
        };
        for name in PRELUDE {
            interner.intern(name);
        }
        interner
    }

    /// Interns `s`, returning the existing symbol if it was seen before.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.symbols.get(s) {
            return sym;
        }

        let sym = Symbol::new(self.strings.len() as u32);
        let owned: Box<str> = s.into();
        self.strings.push(owned.clone());
        self.symbols.insert(owned, sym);
        sym
    }

    /// Mints a name no source program can spell: `%{prefix}{n}`.
    pub fn fresh(&mut self, prefix: &str) -> Symbol {
        let name = format!("%{prefix}{}", self.next_fresh);
        self.next_fresh += 1;
        self.intern(&name)
    }

    /// Looks up an already interned string without inserting it.
    #[must_use]
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.symbols.get(s).copied()
    }

    /// Resolves a symbol. `None` if it came from another interner.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> Option<&str> {
        self.strings.get(sym.as_usize()).map(|s| &**s)
    }

    /// Resolves a symbol for display, falling back to its raw id.
    #[must_use]
    pub fn display(&self, sym: Symbol) -> String {
        match self.resolve(sym) {
            Some(s) => s.to_string(),
            None => sym.to_string(),
        }
    }

    /// Returns true for names minted by [`StringInterner::fresh`].
    #[must_use]
    pub fn is_fresh(&self, sym: Symbol) -> bool {
        self.resolve(sym).is_some_and(|s| s.starts_with('%'))
    }

    /// Number of interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Always false after construction (the prelude is interned).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
