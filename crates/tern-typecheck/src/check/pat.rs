//! Pattern checking.
//!
//! Produces a checked [`Pat`] and the type of the values it matches, and
//! records every capture with its type. Constructor names are resolved
//! here, so a bare name that is a registered constructor becomes a nullary
//! constructor pattern rather than a capture.

use crate::error::{NameKind, Result, TypeError};
use crate::infer::Context;
use crate::pattern::Pat;
use crate::tast::TLit;
use crate::types::Ty;
use tern_mem::Symbol;
use tern_syntax::ast::Pattern;
use tern_syntax::{Span, Spanned};

use super::kind::elaborate_annotation;
use super::lit::check_lit;

/// Checks `pat`, appending its captures to `captures`.
///
/// # Errors
///
/// `DuplicateName` for a name captured twice, `UndeclaredName` for unknown
/// constructors and for or-alternatives that capture different names,
/// `MalformedConstructor` for wrong field counts, plus unification and
/// literal errors.
pub fn check_pattern(
    ctx: &mut Context,
    pat: &Pattern,
    captures: &mut Vec<(Symbol, Ty)>,
) -> Result<(Pat, Ty)> {
    match pat {
        Pattern::Wildcard { .. } => Ok((Pat::wild(), ctx.fresh_var())),

        Pattern::Literal { value, span } => {
            let (lit, ty) = check_lit(ctx, value, *span)?;
            let pat = match lit {
                TLit::Bool(b) => Pat::Bool(b),
                TLit::Int { width, value } => Pat::Int { width, value },
                TLit::Str(bytes) => Pat::Str(bytes),
            };
            Ok((pat, ty))
        }

        Pattern::Bind { name, span } => {
            if ctx.registry.lookup_ctor(*name).is_some() {
                return check_ctor(ctx, *name, &[], *span, captures);
            }
            let ty = ctx.fresh_var();
            add_capture(ctx, captures, *name, ty.clone(), *span)?;
            Ok((Pat::bind(*name), ty))
        }

        Pattern::Tuple { elements, .. } => {
            if let [inner] = elements.as_slice() {
                return check_pattern(ctx, inner, captures);
            }
            let mut pats = Vec::with_capacity(elements.len());
            let mut tys = Vec::with_capacity(elements.len());
            for element in elements {
                let (p, t) = check_pattern(ctx, element, captures)?;
                pats.push(p);
                tys.push(t);
            }
            Ok((Pat::Tuple(pats), Ty::Tuple(tys)))
        }

        Pattern::Ctor { name, args, span } => check_ctor(ctx, *name, args, *span, captures),

        Pattern::Annotated { pattern, ty, span } => {
            let (pat, found) = check_pattern(ctx, pattern, captures)?;
            let expected = elaborate_annotation(ctx, ty)?;
            ctx.unify(&expected, &found, *span)?;
            Ok((pat, expected))
        }

        Pattern::Or { alternatives, span } => check_or(ctx, alternatives, *span, captures),
    }
}

fn add_capture(
    ctx: &Context,
    captures: &mut Vec<(Symbol, Ty)>,
    name: Symbol,
    ty: Ty,
    span: Span,
) -> Result<()> {
    if captures.iter().any(|(n, _)| *n == name) {
        return Err(TypeError::DuplicateName {
            what: NameKind::Capture,
            name: ctx.name(name),
            span,
        });
    }
    captures.push((name, ty));
    Ok(())
}

fn check_ctor(
    ctx: &mut Context,
    name: Symbol,
    args: &[Pattern],
    span: Span,
    captures: &mut Vec<(Symbol, Ty)>,
) -> Result<(Pat, Ty)> {
    let Some(info) = ctx.registry.lookup_ctor(name).cloned() else {
        return Err(TypeError::UndeclaredName {
            what: NameKind::Constructor,
            name: ctx.name(name),
            span,
        });
    };

    let arity = ctx.registry.template(info.template).params.len();
    let type_args: Vec<Ty> = (0..arity).map(|_| ctx.subst.fresh_var()).collect();
    let fields = ctx
        .registry
        .template(info.template)
        .instantiate_fields(info.case, &type_args)
        .unwrap_or_default();

    // `Pair (a, b)` and `Pair _` both address a multi-field constructor
    let args: Vec<Pattern> = match args {
        [Pattern::Tuple { elements, .. }] if fields.len() > 1 && elements.len() == fields.len() => {
            elements.clone()
        }
        [Pattern::Wildcard { span }] if fields.len() > 1 => fields
            .iter()
            .map(|_| Pattern::Wildcard { span: *span })
            .collect(),
        _ => args.to_vec(),
    };
    if args.len() != fields.len() {
        return Err(TypeError::MalformedConstructor {
            name: ctx.name(name),
            expected: fields.len(),
            found: args.len(),
            span,
        });
    }

    let mut sub_pats = Vec::with_capacity(args.len());
    for (arg, field) in args.iter().zip(&fields) {
        let (p, t) = check_pattern(ctx, arg, captures)?;
        ctx.unify(field, &t, arg.span())?;
        sub_pats.push(p);
    }

    let pat = Pat::Ctor {
        name,
        template: info.template,
        case: info.case,
        args: sub_pats,
    };
    let ty = Ty::Nominal {
        template: info.template,
        args: type_args,
    };
    Ok((pat, ty))
}

fn check_or(
    ctx: &mut Context,
    alternatives: &[Pattern],
    span: Span,
    captures: &mut Vec<(Symbol, Ty)>,
) -> Result<(Pat, Ty)> {
    let Some((first, rest)) = alternatives.split_first() else {
        return Ok((Pat::Or(Vec::new()), ctx.fresh_var()));
    };

    let mut shared = Vec::new();
    let (first_pat, ty) = check_pattern(ctx, first, &mut shared)?;
    let mut pats = vec![first_pat];

    for alt in rest {
        let mut own = Vec::new();
        let (pat, alt_ty) = check_pattern(ctx, alt, &mut own)?;
        ctx.unify(&ty, &alt_ty, alt.span())?;

        if let Some((missing, _)) = shared
            .iter()
            .find(|(n, _)| !own.iter().any(|(m, _)| m == n))
            .or_else(|| own.iter().find(|(n, _)| !shared.iter().any(|(m, _)| m == n)))
        {
            return Err(TypeError::UndeclaredName {
                what: NameKind::Capture,
                name: ctx.name(*missing),
                span: alt.span(),
            });
        }
        for (name, own_ty) in &own {
            if let Some((_, shared_ty)) = shared.iter().find(|(n, _)| n == name) {
                ctx.unify(shared_ty, own_ty, alt.span())?;
            }
        }
        pats.push(pat);
    }

    for (name, capture_ty) in shared {
        add_capture(ctx, captures, name, capture_ty, span)?;
    }
    if pats.len() == 1 {
        return Ok((pats.remove(0), ty));
    }
    Ok((Pat::Or(pats), ty))
}
