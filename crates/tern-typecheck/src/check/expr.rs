//! Expression checking.
//!
//! Every expression is inferred bottom-up into a [`TExpr`] carrying its
//! type; [`check`] is inference followed by unification with the type the
//! context requires.
//!
//! # Binding groups
//!
//! `let` and `let rec` groups follow the usual Hindley-Milner recipe:
//!
//! 1. every binding gets a placeholder: its annotation, or a fresh variable
//! 2. right-hand sides are checked against their placeholders; in a
//!    `let rec` group the placeholders are in scope, monomorphically
//! 3. the monomorphic set is taken from the environment without the group
//! 4. annotation quantifiers that ended up in that set have escaped
//! 5. each type is generalized over what is free in it but not in the set
//! 6. `let rec` initializers are validated last
//!
//! A top-level quantifier in an annotation is opened with rigid variables,
//! so the right-hand side must really be that polymorphic.

use crate::context::{CtorInfo, Scheme, TypeEnv};
use crate::error::{NameKind, Result, TypeError};
use crate::infer::Context;
use crate::pattern::{Pat, is_useful, witness};
use crate::tast::{TBinding, TCase, TExpr};
use crate::types::{Ty, TyVar};
use fxhash::{FxHashMap, FxHashSet};
use tern_log::trace;
use tern_mem::Symbol;
use tern_syntax::ast::{Binding, Expr, MatchCase, Pattern};
use tern_syntax::{DiagnosticBuilder, DiagnosticLevel, Span, Spanned};

use super::kind::elaborate_annotation;
use super::lit::check_lit;
use super::pat::check_pattern;
use super::recursion;

/// Checks `expr` against `expected`.
///
/// # Errors
///
/// Any error from [`infer`], or a unification failure.
pub fn check(ctx: &mut Context, expr: &Expr, expected: &Ty) -> Result<TExpr> {
    let typed = infer(ctx, expr)?;
    ctx.unify(expected, typed.ty(), expr.span())?;
    Ok(typed)
}

/// Infers the type of `expr`.
///
/// # Errors
///
/// Unknown names, malformed constructor uses, unification failures, scope
/// escapes and illegal recursive bindings.
pub fn infer(ctx: &mut Context, expr: &Expr) -> Result<TExpr> {
    match expr {
        Expr::Literal { value, span } => {
            let (value, ty) = check_lit(ctx, value, *span)?;
            Ok(TExpr::Lit { value, ty })
        }

        Expr::Ident { name, span } => {
            if let Some(info) = ctx.registry.lookup_ctor(*name).cloned() {
                return Ok(ctor_value(ctx, &info));
            }
            let Some(scheme) = ctx.env.lookup(*name).cloned() else {
                return Err(TypeError::UndeclaredName {
                    what: NameKind::Value,
                    name: ctx.name(*name),
                    span: *span,
                });
            };
            let ty = scheme.instantiate(&mut ctx.subst);
            let ty = open_flexible(ctx, &ty);
            Ok(TExpr::var(*name, ty))
        }

        Expr::App { func, arg, span } => {
            if let Expr::Ident { name, .. } = func.as_ref()
                && let Some(info) = ctx.registry.lookup_ctor(*name).cloned()
            {
                return apply_ctor(ctx, &info, arg, *span);
            }

            let func = infer(ctx, func)?;
            let func_ty = open_flexible(ctx, func.ty());
            let arg = infer(ctx, arg)?;
            let result = ctx.fresh_var();
            ctx.unify(&func_ty, &Ty::arrow(arg.ty().clone(), result.clone()), *span)?;
            Ok(TExpr::App {
                func: Box::new(func),
                arg: Box::new(arg),
                ty: result,
            })
        }

        Expr::Tuple { elements, .. } => {
            if let [inner] = elements.as_slice() {
                return infer(ctx, inner);
            }
            let elems = elements
                .iter()
                .map(|e| infer(ctx, e))
                .collect::<Result<Vec<_>>>()?;
            let ty = Ty::Tuple(elems.iter().map(|e| e.ty().clone()).collect());
            Ok(TExpr::Tuple { elems, ty })
        }

        Expr::Lambda { cases, span } => infer_lambda(ctx, cases, *span),

        Expr::Let {
            rec,
            bindings,
            body,
            ..
        } => {
            let bindings = check_bindings(ctx, *rec, bindings)?;
            ctx.env.push_scope();
            for binding in &bindings {
                ctx.env.bind(binding.name, binding.scheme.clone());
            }
            let body = infer(ctx, body);
            ctx.env.pop_scope();
            let body = body?;
            let ty = body.ty().clone();
            Ok(TExpr::Let {
                rec: *rec,
                bindings,
                body: Box::new(body),
                ty,
            })
        }

        Expr::Match {
            scrutinee,
            cases,
            span,
        } => {
            let scrutinee = infer(ctx, scrutinee)?;
            let result = ctx.fresh_var();
            let scrutinee_ty = scrutinee.ty().clone();
            let cases = check_cases(ctx, cases, &scrutinee_ty, &result, *span)?;
            Ok(TExpr::Match {
                scrutinee: Box::new(scrutinee),
                cases,
                ty: result,
            })
        }

        Expr::Annotated {
            expr: inner,
            ty,
            span,
        } => {
            let annotation = elaborate_annotation(ctx, ty)?;
            let Ty::Forall(vars, body) = ctx.subst.shallow(&annotation) else {
                return check(ctx, inner, &annotation);
            };

            let (rigid, rigid_body) = open_rigid(ctx, &vars, &body);
            let mut typed = check(ctx, inner, &rigid_body)?;
            let env_vars = ctx.env.free_vars(&ctx.subst);
            check_escape(ctx, &rigid, &env_vars, *span)?;

            *typed.ty_mut() = open_flexible(ctx, &Ty::Forall(vars, body));
            Ok(typed)
        }
    }
}

/// Replaces a top-level quantifier with fresh flexible variables.
fn open_flexible(ctx: &mut Context, ty: &Ty) -> Ty {
    match ctx.subst.shallow(ty) {
        Ty::Forall(vars, body) => {
            let map: FxHashMap<TyVar, Ty> = vars.iter().map(|&v| (v, ctx.fresh_var())).collect();
            ctx.subst.zonk(&body).substitute(&map)
        }
        other => other,
    }
}

/// Replaces the quantified `vars` of `body` with fresh rigid variables.
fn open_rigid(ctx: &mut Context, vars: &[TyVar], body: &Ty) -> (Vec<TyVar>, Ty) {
    let mut rigid = Vec::with_capacity(vars.len());
    let mut map = FxHashMap::default();
    for &var in vars {
        let fresh = match ctx.subst.grounded_name(var) {
            Some(name) => ctx.subst.fresh_grounded(name),
            None => ctx.subst.fresh_skolem(),
        };
        rigid.push(fresh);
        map.insert(var, Ty::Var(fresh));
    }
    (rigid, ctx.subst.zonk(body).substitute(&map))
}

fn check_escape(
    ctx: &Context,
    rigid: &[TyVar],
    mono: &FxHashSet<TyVar>,
    span: Span,
) -> Result<()> {
    match rigid.iter().find(|v| mono.contains(v)) {
        Some(&var) => Err(TypeError::ScopeEscape {
            var: ctx.display_ty(&Ty::Var(var)),
            ty: None,
            span,
        }),
        None => Ok(()),
    }
}

/// Instantiated field type (fields tupled) and result type of a
/// constructor.
fn ctor_signature(ctx: &mut Context, info: &CtorInfo) -> (Ty, Ty) {
    let arity = ctx.registry.template(info.template).params.len();
    let args: Vec<Ty> = (0..arity).map(|_| ctx.subst.fresh_var()).collect();
    let fields = ctx
        .registry
        .template(info.template)
        .instantiate_fields(info.case, &args)
        .unwrap_or_default();
    let result = Ty::Nominal {
        template: info.template,
        args,
    };
    (Ty::tuple(fields), result)
}

/// A constructor used as a value. Constructors with fields become
/// functions.
fn ctor_value(ctx: &mut Context, info: &CtorInfo) -> TExpr {
    let (field_ty, result) = ctor_signature(ctx, info);
    if info.arity == 0 {
        return TExpr::Ctor {
            name: info.name,
            template: info.template,
            case: info.case,
            arg: None,
            ty: result,
        };
    }

    let param = ctx.interner.fresh("c");
    TExpr::Lambda {
        param,
        param_ty: field_ty.clone(),
        body: Box::new(TExpr::Ctor {
            name: info.name,
            template: info.template,
            case: info.case,
            arg: Some(Box::new(TExpr::var(param, field_ty.clone()))),
            ty: result.clone(),
        }),
        ty: Ty::arrow(field_ty, result),
    }
}

fn apply_ctor(ctx: &mut Context, info: &CtorInfo, arg: &Expr, span: Span) -> Result<TExpr> {
    let given = match arg {
        Expr::Tuple { elements, .. } if elements.len() != 1 => elements.len(),
        _ => 1,
    };
    let tuple_mismatch = info.arity > 1 && matches!(arg, Expr::Tuple { .. }) && given != info.arity;
    if info.arity == 0 || tuple_mismatch {
        return Err(TypeError::MalformedConstructor {
            name: ctx.name(info.name),
            expected: info.arity,
            found: given,
            span,
        });
    }

    let (field_ty, result) = ctor_signature(ctx, info);
    let arg = check(ctx, arg, &field_ty)?;
    Ok(TExpr::Ctor {
        name: info.name,
        template: info.template,
        case: info.case,
        arg: Some(Box::new(arg)),
        ty: result,
    })
}

fn infer_lambda(ctx: &mut Context, cases: &[MatchCase], span: Span) -> Result<TExpr> {
    let param_ty = ctx.fresh_var();
    let result = ctx.fresh_var();
    let ty = Ty::arrow(param_ty.clone(), result.clone());

    let simple = match cases {
        [case] => match &case.pattern {
            Pattern::Wildcard { .. } => Some((ctx.interner.fresh("a"), case)),
            Pattern::Bind { name, .. } if ctx.registry.lookup_ctor(*name).is_none() => {
                Some((*name, case))
            }
            _ => None,
        },
        _ => None,
    };

    if let Some((param, case)) = simple {
        ctx.env.push_scope();
        ctx.env.bind(param, Scheme::mono(param_ty.clone()));
        let body = check(ctx, &case.body, &result);
        ctx.env.pop_scope();
        return Ok(TExpr::Lambda {
            param,
            param_ty,
            body: Box::new(body?),
            ty,
        });
    }

    let param = ctx.interner.fresh("a");
    let cases = check_cases(ctx, cases, &param_ty, &result, span)?;
    Ok(TExpr::Lambda {
        param,
        param_ty: param_ty.clone(),
        body: Box::new(TExpr::Match {
            scrutinee: Box::new(TExpr::var(param, param_ty)),
            cases,
            ty: result,
        }),
        ty,
    })
}

/// Checks the cases of a match on a `scrutinee`-typed value, then reports
/// useless cases and missing values as warnings.
///
/// # Errors
///
/// Pattern errors, and unification failures between patterns and the
/// scrutinee or between bodies and `result`.
pub fn check_cases(
    ctx: &mut Context,
    cases: &[MatchCase],
    scrutinee: &Ty,
    result: &Ty,
    span: Span,
) -> Result<Vec<TCase>> {
    let mut typed = Vec::with_capacity(cases.len());
    for case in cases {
        let mut captures = Vec::new();
        let (pat, pat_ty) = check_pattern(ctx, &case.pattern, &mut captures)?;
        ctx.unify(scrutinee, &pat_ty, case.pattern.span())?;

        ctx.env.push_scope();
        for (name, ty) in captures {
            ctx.env.bind(name, Scheme::mono(ty));
        }
        let body = check(ctx, &case.body, result);
        ctx.env.pop_scope();
        typed.push(TCase { pat, body: body? });
    }

    report_coverage(ctx, &typed, cases, scrutinee, span);
    Ok(typed)
}

fn report_coverage(
    ctx: &mut Context,
    typed: &[TCase],
    cases: &[MatchCase],
    scrutinee: &Ty,
    span: Span,
) {
    let mut previous: Vec<Pat> = Vec::with_capacity(typed.len());
    for (case, surface) in typed.iter().zip(cases) {
        if ctx.options.warn_useless
            && !is_useful(&previous, &case.pat, scrutinee, &ctx.subst, &ctx.registry)
        {
            let message = format!("useless match case `{}`", case.pat.display(&ctx.interner));
            let diagnostic =
                DiagnosticBuilder::new(DiagnosticLevel::Warning, message, surface.span)
                    .code("W0001")
                    .note("every value it matches is matched by an earlier case", span)
                    .build();
            ctx.warn(diagnostic);
        }
        previous.push(case.pat.clone());
    }

    if ctx.options.warn_non_exhaustive
        && let Some(missing) = witness(&previous, scrutinee, &ctx.subst, &ctx.registry)
    {
        let note = format!("`{}` is not matched", missing.display(&ctx.interner));
        let diagnostic = DiagnosticBuilder::new(
            DiagnosticLevel::Warning,
            "non-exhaustive match".to_string(),
            span,
        )
        .code("W0002")
        .note(note, span)
        .build();
        ctx.warn(diagnostic);
    }
}

/// Checks a `let` or `let rec` group and generalizes its bindings.
///
/// The bindings are not added to the environment; the caller scopes them.
///
/// # Errors
///
/// `DuplicateName` for a name bound twice in the group, `ScopeEscape` for
/// annotation quantifiers that cannot be generalized, errors from the
/// right-hand sides, and `IllegalRecursiveBinding` from the validator.
pub fn check_bindings(ctx: &mut Context, rec: bool, bindings: &[Binding]) -> Result<Vec<TBinding>> {
    let mut names: FxHashSet<Symbol> = FxHashSet::default();
    for binding in bindings {
        if !names.insert(binding.name) {
            return Err(TypeError::DuplicateName {
                what: NameKind::Value,
                name: ctx.name(binding.name),
                span: binding.span,
            });
        }
    }

    let outer = ctx.env.depth();
    let mut placeholders: Vec<(Ty, Vec<TyVar>)> = Vec::with_capacity(bindings.len());
    for binding in bindings {
        let placeholder = match &binding.annotation {
            Some(annotation) => match elaborate_annotation(ctx, annotation)? {
                Ty::Forall(vars, body) => {
                    let (rigid, body) = open_rigid(ctx, &vars, &body);
                    (body, rigid)
                }
                ty => (ty, Vec::new()),
            },
            None => (ctx.fresh_var(), Vec::new()),
        };
        placeholders.push(placeholder);
    }

    if rec {
        ctx.env.push_scope();
        for (binding, (ty, _)) in bindings.iter().zip(&placeholders) {
            ctx.env.bind(binding.name, Scheme::mono(ty.clone()));
        }
    }

    let mut exprs = Vec::with_capacity(bindings.len());
    for (binding, (ty, _)) in bindings.iter().zip(&placeholders) {
        match check(ctx, &binding.value, ty) {
            Ok(expr) => exprs.push(expr),
            Err(err) => {
                ctx.env.truncate(outer);
                return Err(err);
            }
        }
    }

    let mono = if rec {
        let mono = ctx.env.free_vars_below(outer, &ctx.subst);
        ctx.env.truncate(outer);
        mono
    } else {
        ctx.env.free_vars(&ctx.subst)
    };

    let mut typed = Vec::with_capacity(bindings.len());
    for ((binding, (ty, rigid)), expr) in bindings.iter().zip(placeholders).zip(exprs) {
        check_escape(ctx, &rigid, &mono, binding.span)?;
        let scheme = TypeEnv::generalize(&ty, &mono, &ctx.subst);
        trace!(
            "generalized {} : {} over {} variable(s)",
            ctx.name(binding.name),
            ctx.display_ty(&scheme.ty),
            scheme.vars.len()
        );
        typed.push(TBinding {
            name: binding.name,
            scheme,
            expr,
        });
    }

    if rec {
        let spans: Vec<Span> = bindings.iter().map(|b| b.span).collect();
        recursion::validate(&typed, &spans, &ctx.interner)?;
    }
    Ok(typed)
}
