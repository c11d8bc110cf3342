//! Pattern model, coverage and match compilation.
//!
//! - [`ctor_set`]: what head constructors a type has
//! - [`usefulness`]: redundancy and exhaustiveness checks
//! - [`compile`]: decision trees for code generation
//!
//! Patterns here are checked patterns: constructors are resolved to their
//! template and case, literals are decoded, and captures are plain names.
//! They carry no types; the column types travel beside them.

pub mod compile;
pub mod ctor_set;
pub mod usefulness;

pub use compile::MatchCompiler;
pub use ctor_set::CtorSet;
pub use usefulness::{is_useful, witness};

use crate::types::TemplateId;
use std::fmt;
use tern_mem::{StringInterner, Symbol};

/// A checked pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pat {
    /// `_` or a capture
    Wild {
        /// Captured name
        capture: Option<Symbol>,
    },
    /// `true` / `false`
    Bool(bool),
    /// Integer literal
    Int {
        /// Bit width
        width: u32,
        /// Two's-complement value
        value: i128,
    },
    /// String literal, decoded
    Str(Vec<u8>),
    /// Tuple of zero or at least two patterns
    Tuple(Vec<Pat>),
    /// Constructor with one sub-pattern per field
    Ctor {
        /// Constructor name
        name: Symbol,
        /// Data type
        template: TemplateId,
        /// Case index
        case: usize,
        /// Field patterns
        args: Vec<Pat>,
    },
    /// Alternatives binding the same names
    Or(Vec<Pat>),
}

/// Head constructor of a pattern, as seen by coverage and compilation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ctor {
    /// Boolean literal
    Bool(bool),
    /// Integer literal value
    Int(i128),
    /// String literal bytes
    Str(Vec<u8>),
    /// The tuple constructor of the given arity
    Tuple(usize),
    /// Data constructor, by case index
    Variant(usize),
}

impl Pat {
    /// `_`
    #[must_use]
    pub const fn wild() -> Self {
        Pat::Wild { capture: None }
    }

    /// A capture of `name`.
    #[must_use]
    pub const fn bind(name: Symbol) -> Self {
        Pat::Wild {
            capture: Some(name),
        }
    }

    /// `n` wildcards.
    #[must_use]
    pub fn wilds(n: usize) -> Vec<Pat> {
        (0..n).map(|_| Pat::wild()).collect()
    }

    /// Whether this matches everything without looking at the value.
    #[must_use]
    pub fn is_wild(&self) -> bool {
        matches!(self, Pat::Wild { .. })
    }

    /// Head constructor. `None` for wildcards and or-patterns.
    #[must_use]
    pub fn head(&self) -> Option<Ctor> {
        match self {
            Pat::Wild { .. } | Pat::Or(_) => None,
            Pat::Bool(b) => Some(Ctor::Bool(*b)),
            Pat::Int { value, .. } => Some(Ctor::Int(*value)),
            Pat::Str(bytes) => Some(Ctor::Str(bytes.clone())),
            Pat::Tuple(elems) => Some(Ctor::Tuple(elems.len())),
            Pat::Ctor { case, .. } => Some(Ctor::Variant(*case)),
        }
    }

    /// Sub-patterns below the head constructor.
    #[must_use]
    pub fn into_fields(self) -> Vec<Pat> {
        match self {
            Pat::Tuple(elems) => elems,
            Pat::Ctor { args, .. } => args,
            _ => Vec::new(),
        }
    }

    /// The same head constructor over new sub-patterns.
    #[must_use]
    pub fn with_fields(self, fields: Vec<Pat>) -> Pat {
        match self {
            Pat::Tuple(_) => Pat::Tuple(fields),
            Pat::Ctor {
                name,
                template,
                case,
                ..
            } => Pat::Ctor {
                name,
                template,
                case,
                args: fields,
            },
            other => other,
        }
    }

    /// Names captured, in order of appearance. For or-patterns, those of
    /// the first alternative.
    #[must_use]
    pub fn captures(&self) -> Vec<Symbol> {
        let mut names = Vec::new();
        let mut stack = vec![self];
        while let Some(pat) = stack.pop() {
            match pat {
                Pat::Wild {
                    capture: Some(name),
                } => names.push(*name),
                Pat::Tuple(elems) | Pat::Ctor { args: elems, .. } => {
                    stack.extend(elems.iter().rev());
                }
                Pat::Or(alts) => stack.extend(alts.first()),
                _ => {}
            }
        }
        names
    }

    /// Renders the pattern with source names.
    #[must_use]
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> DisplayPat<'a> {
        DisplayPat {
            pat: self,
            interner,
        }
    }
}

/// Display wrapper returned by [`Pat::display`].
pub struct DisplayPat<'a> {
    pat: &'a Pat,
    interner: &'a StringInterner,
}

impl DisplayPat<'_> {
    fn format(&self, pat: &Pat, atom: bool, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match pat {
            Pat::Wild { capture: None } => write!(f, "_"),
            Pat::Wild {
                capture: Some(name),
            } => write!(f, "{}", self.interner.display(*name)),
            Pat::Bool(b) => write!(f, "{b}"),
            Pat::Int { value, .. } => write!(f, "{value}"),
            Pat::Str(bytes) => write!(f, "\"{}\"", bytes.escape_ascii()),
            Pat::Tuple(elems) => {
                write!(f, "(")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.format(elem, false, f)?;
                }
                write!(f, ")")
            }
            Pat::Ctor { name, args, .. } => {
                let parens = atom && !args.is_empty();
                if parens {
                    write!(f, "(")?;
                }
                write!(f, "{}", self.interner.display(*name))?;
                for arg in args {
                    write!(f, " ")?;
                    self.format(arg, true, f)?;
                }
                if parens {
                    write!(f, ")")?;
                }
                Ok(())
            }
            Pat::Or(alts) => {
                if atom {
                    write!(f, "(")?;
                }
                for (i, alt) in alts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    self.format(alt, true, f)?;
                }
                if atom {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for DisplayPat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format(self.pat, false, f)
    }
}
