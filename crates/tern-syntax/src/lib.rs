//! `tern` syntax: spans, diagnostics and the surface AST.
//!
//! The lexer and parser live outside this workspace. They produce the trees
//! defined in [`ast`] and intern identifiers through a shared
//! [`tern_mem::StringInterner`]; the checker consumes those trees.
//!
//! # Modules
//!
//! - [`span`] - Source location tracking
//! - [`ast`] - Surface types, patterns, expressions and declarations
//! - [`diagnostic`] - Non-fatal diagnostics and their rendering
//!
//! # Examples
//!
//! ```
//! use tern_syntax::span::{Span, Spanned};
//! use tern_syntax::ast::{Expr, Literal};
//!
//! let span = Span::new(0, 4, 1, 1, 1, 5);
//! let expr = Expr::Literal { value: Literal::Bool(true), span };
//! assert_eq!(expr.span(), span);
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod diagnostic;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticLevel, DiagnosticNote, Emitter};
pub use span::{LineCol, Span, Spanned};
