//! `tern` type checker.
//!
//! The semantic core of a small functional language:
//!
//! - a Hindley-Milner checker with let-polymorphism, explicit quantifiers
//!   and scope-escape detection ([`infer`], [`check`])
//! - a kind checker that elaborates surface types and registers aliases and
//!   algebraic data types ([`check::kind`], [`check::decl`])
//! - a usefulness/exhaustiveness checker over constructor sets
//!   ([`pattern::usefulness`], [`pattern::ctor_set`])
//! - a decision-tree match compiler ([`pattern::compile`], [`lower`])
//! - a validator for `let rec` initializers ([`check::recursion`])
//!
//! Everything runs through a [`Context`], which owns the state of one
//! checking session. Each top-level [`Decl`](tern_syntax::ast::Decl) is
//! checked as a unit: on failure every registration the unit made is rolled
//! back.
//!
//! ```
//! use tern_syntax::ast::{Decl, Expr, Literal};
//! use tern_syntax::Span;
//! use tern_typecheck::Context;
//!
//! let mut ctx = Context::new();
//! let span = Span::new(0, 4, 1, 1, 1, 5);
//! let decl = Decl::Expr {
//!     expr: Expr::Literal { value: Literal::Bool(true), span },
//!     span,
//! };
//! let typed = ctx.check_decl(&decl).unwrap();
//! assert_eq!(ctx.display_ty(typed.expr().unwrap().ty()), "bool");
//! ```

#![warn(missing_docs)]

pub mod check;
pub mod config;
pub mod context;
pub mod error;
pub mod infer;
pub mod lower;
pub mod pattern;
pub mod tast;
pub mod types;

pub use config::CheckerOptions;
pub use context::{Scheme, Subst, TypeEnv, TypeRegistry};
pub use error::{ErrorKind, NameKind, Result, TypeError};
pub use infer::Context;
pub use pattern::{Ctor, CtorSet, Pat};
pub use tast::{TBinding, TCase, TDecl, TExpr, TLit};
pub use types::{Kind, Template, TemplateId, Ty, TyVar};
