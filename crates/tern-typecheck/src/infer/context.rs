//! Type checking context.
//!
//! A [`Context`] owns everything one checking session needs: the interner
//! shared with the parser, the substitution, the type registry, the value
//! environment and the warnings collected so far. Top-level units go
//! through [`Context::check_decl`], which makes each unit all-or-nothing.

use crate::check::{check_alias, check_bindings, check_data, infer};
use crate::config::CheckerOptions;
use crate::context::{Scheme, Subst, TypeEnv, TypeRegistry};
use crate::error::{Result, TypeError};
use crate::infer::{Unifier, UnifyError};
use crate::lower::lower_matches;
use crate::pattern::MatchCompiler;
use crate::tast::{TCase, TDecl, TExpr};
use crate::types::Ty;
use crate::types::display::DisplayTy;
use tern_log::{debug, warn};
use tern_mem::{StringInterner, Symbol};
use tern_syntax::ast::Decl;
use tern_syntax::{Diagnostic, Span, Spanned};

/// Main type checking context.
pub struct Context {
    /// String interner (shared with the parser)
    pub interner: StringInterner,

    /// Type variable cells
    pub subst: Subst,

    /// Types, templates and constructors
    pub registry: TypeRegistry,

    /// Value bindings
    pub env: TypeEnv,

    /// Session options
    pub options: CheckerOptions,

    diagnostics: Vec<Diagnostic>,
}

impl Context {
    /// A context with default options and a fresh interner.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(CheckerOptions::default())
    }

    /// A context with a fresh interner.
    #[must_use]
    pub fn with_options(options: CheckerOptions) -> Self {
        Self::with_interner(StringInterner::new(), options)
    }

    /// A context over the interner the parser used.
    #[must_use]
    pub fn with_interner(mut interner: StringInterner, options: CheckerOptions) -> Self {
        if let Some(level) = options.log_level {
            tern_log::set_level(level);
        }
        let registry = TypeRegistry::new(&mut interner);
        Self {
            interner,
            subst: Subst::new(),
            registry,
            env: TypeEnv::new(),
            options,
            diagnostics: Vec::new(),
        }
    }

    /// Intern a string.
    pub fn intern(&mut self, s: &str) -> Symbol {
        self.interner.intern(s)
    }

    /// Source text of a symbol.
    #[must_use]
    pub fn name(&self, sym: Symbol) -> String {
        self.interner.display(sym)
    }

    /// A fresh flexible type variable.
    pub fn fresh_var(&mut self) -> Ty {
        self.subst.fresh_var()
    }

    /// Renders `ty` as it is currently known.
    #[must_use]
    pub fn display_ty(&self, ty: &Ty) -> String {
        DisplayTy::new(ty, &self.interner, &self.registry, &self.subst).to_string()
    }

    /// Top-level scheme of `name`.
    #[must_use]
    pub fn lookup_value(&self, name: &str) -> Option<&Scheme> {
        self.interner
            .get(name)
            .and_then(|sym| self.env.lookup(sym))
    }

    /// Unifies the type the context requires with the type found.
    ///
    /// # Errors
    ///
    /// `Mismatch` for incompatible types and distinct rigid variables,
    /// `InfiniteType` for occurs-check failures and `ScopeEscape` when a
    /// rigid variable meets a concrete type. Both full types are reported.
    pub fn unify(&mut self, expected: &Ty, found: &Ty, span: Span) -> Result<()> {
        let result = Unifier::new(&mut self.subst).unify(expected, found);
        result.map_err(|err| match err {
            UnifyError::Mismatch { .. } | UnifyError::RigidRigid { .. } => TypeError::Mismatch {
                expected: self.display_ty(expected),
                found: self.display_ty(found),
                span,
            },
            UnifyError::Occurs { var, ty } => TypeError::InfiniteType {
                var: self.display_ty(&Ty::Var(var)),
                ty: self.display_ty(&ty),
                span,
            },
            UnifyError::RigidConcrete { var, ty } => TypeError::ScopeEscape {
                var: self.display_ty(&Ty::Var(var)),
                ty: Some(self.display_ty(&ty)),
                span,
            },
        })
    }

    /// Records a warning.
    pub fn warn(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Warnings collected so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drains the collected warnings.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Checks one top-level unit.
    ///
    /// On success the unit's types are fully resolved and its value
    /// bindings enter the global environment. On failure every type,
    /// constructor and variable solution the unit produced is rolled back.
    /// Warnings are kept either way.
    ///
    /// # Errors
    ///
    /// The first error raised while checking the unit.
    pub fn check_decl(&mut self, decl: &Decl) -> Result<TDecl> {
        let registry = self.registry.checkpoint();
        let subst = self.subst.snapshot();
        let depth = self.env.depth();
        debug!("checking unit at {}", decl.span());

        match self.check_unit(decl) {
            Ok(mut typed) => {
                typed.zonk(&self.subst);
                for binding in typed.bindings() {
                    self.env.bind_global(binding.name, binding.scheme.clone());
                }
                self.registry.commit(registry);
                self.subst.commit(subst);
                Ok(typed)
            }
            Err(err) => {
                self.registry.rollback(registry);
                self.subst.rollback_to(subst);
                self.env.truncate(depth);
                debug!("rolled back unit at {}: {err}", decl.span());
                Err(err)
            }
        }
    }

    fn check_unit(&mut self, decl: &Decl) -> Result<TDecl> {
        match decl {
            Decl::Data { types, .. } => Ok(TDecl::Data {
                templates: check_data(self, types)?,
            }),
            Decl::Alias {
                name,
                params,
                body,
                span,
            } => {
                check_alias(self, *name, params, body, *span)?;
                Ok(TDecl::Alias { name: *name })
            }
            Decl::Let { rec, bindings, .. } => Ok(TDecl::Let {
                rec: *rec,
                bindings: check_bindings(self, *rec, bindings)?,
            }),
            Decl::Expr { expr, .. } => Ok(TDecl::Expr(infer(self, expr)?)),
        }
    }

    /// Compiles one generic match into a decision tree.
    pub fn compile_match(&mut self, scrutinee: TExpr, cases: Vec<TCase>, ty: Ty) -> TExpr {
        MatchCompiler::new(&mut self.interner, &self.subst, &self.registry)
            .compile(scrutinee, cases, ty)
    }

    /// Rewrites every generic match in `expr` into a decision tree.
    pub fn lower(&mut self, expr: TExpr) -> TExpr {
        let mut compiler = MatchCompiler::new(&mut self.interner, &self.subst, &self.registry);
        lower_matches(&mut compiler, expr)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tern_syntax::ast::{Binding, CaseDecl, DataDecl, Expr, Literal, Type};

    fn span() -> Span {
        Span::new(0, 0, 0, 0, 0, 0)
    }

    fn bool_lit(b: bool) -> Expr {
        Expr::Literal {
            value: Literal::Bool(b),
            span: span(),
        }
    }

    #[test]
    fn test_unify_reports_full_types() {
        let mut ctx = Context::new();
        let b = ctx.registry.bool_ty();
        let s = ctx.registry.string_ty();
        let err = ctx
            .unify(&Ty::arrow(b.clone(), b.clone()), &Ty::arrow(b, s), span())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "type mismatch: expected bool -> bool, found bool -> string"
        );
    }

    #[test]
    fn test_rigid_meets_concrete() {
        let mut ctx = Context::new();
        let a = ctx.intern("a");
        let rigid = Ty::Var(ctx.subst.fresh_grounded(a));
        let b = ctx.registry.bool_ty();
        let err = ctx.unify(&rigid, &b, span()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ScopeEscape);
        assert_eq!(err.to_string(), "type variable 'a is rigid and cannot be bool");
    }

    #[test]
    fn test_let_unit_binds_globally() {
        let mut ctx = Context::new();
        let decl = Decl::Let {
            rec: false,
            bindings: vec![Binding {
                name: ctx.intern("yes"),
                annotation: None,
                value: bool_lit(true),
                span: span(),
            }],
            span: span(),
        };
        let typed = ctx.check_decl(&decl).unwrap();
        assert_eq!(typed.bindings().len(), 1);
        let scheme = ctx.lookup_value("yes").unwrap().clone();
        assert!(scheme.is_mono());
        assert_eq!(ctx.display_ty(&scheme.ty), "bool");
    }

    #[test]
    fn test_failed_unit_rolls_back() {
        let mut ctx = Context::new();
        let cells = ctx.subst.len();
        // data t = A | B nope
        let decl = Decl::Data {
            types: vec![DataDecl {
                name: ctx.intern("t"),
                params: vec![],
                cases: vec![
                    CaseDecl {
                        name: ctx.intern("A"),
                        fields: vec![],
                        span: span(),
                    },
                    CaseDecl {
                        name: ctx.intern("B"),
                        fields: vec![Type::Name {
                            name: ctx.intern("nope"),
                            span: span(),
                        }],
                        span: span(),
                    },
                ],
                span: span(),
            }],
            span: span(),
        };
        let err = ctx.check_decl(&decl).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndeclaredName);

        let t = ctx.intern("t");
        let a = ctx.intern("A");
        assert!(ctx.registry.lookup_type(t).is_none());
        assert!(ctx.registry.lookup_ctor(a).is_none());
        assert_eq!(ctx.subst.len(), cells);
    }

    #[test]
    fn test_failed_let_binds_nothing() {
        let mut ctx = Context::new();
        let decl = Decl::Let {
            rec: false,
            bindings: vec![
                Binding {
                    name: ctx.intern("ok"),
                    annotation: None,
                    value: bool_lit(true),
                    span: span(),
                },
                Binding {
                    name: ctx.intern("bad"),
                    annotation: None,
                    value: Expr::Ident {
                        name: ctx.intern("missing"),
                        span: span(),
                    },
                    span: span(),
                },
            ],
            span: span(),
        };
        assert!(ctx.check_decl(&decl).is_err());
        assert!(ctx.lookup_value("ok").is_none());
        assert_eq!(ctx.env.depth(), 1);
    }

    #[test]
    fn test_expression_unit_is_zonked() {
        let mut ctx = Context::new();
        let decl = Decl::Expr {
            expr: Expr::Tuple {
                elements: vec![bool_lit(true), bool_lit(false)],
                span: span(),
            },
            span: span(),
        };
        let typed = ctx.check_decl(&decl).unwrap();
        let expr = typed.expr().unwrap();
        assert_eq!(ctx.display_ty(expr.ty()), "(bool, bool)");
        assert!(ctx.take_diagnostics().is_empty());
    }
}
