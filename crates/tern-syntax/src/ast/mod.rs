//! Surface syntax consumed by the checker.
//!
//! Trees are produced by the external parser. Identifiers are interned
//! [`Symbol`](tern_mem::Symbol)s and every node carries its [`Span`](crate::Span).
//!
//! # Modules
//!
//! - [`lit`] - Literals as the lexer delivers them
//! - [`ty`] - Type expressions
//! - [`pat`] - Patterns
//! - [`expr`] - Expressions, bindings and match cases
//! - [`decl`] - Top-level units

pub mod decl;
pub mod expr;
pub mod lit;
pub mod pat;
pub mod ty;

pub use decl::{CaseDecl, DataDecl, Decl};
pub use expr::{Binding, Expr, MatchCase};
pub use lit::Literal;
pub use pat::Pattern;
pub use ty::Type;
