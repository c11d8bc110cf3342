//! Kind checking and type elaboration.
//!
//! Turns surface [`Type`]s into [`Ty`]s while checking that type
//! constructors are applied to arguments of the right kind. Kinds are
//! inferred: every parameter and free variable starts as a kind variable,
//! and whatever is still unsolved at the end of a declaration defaults to
//! `*`.
//!
//! Two flavours of elaboration exist:
//!
//! - **declarations** (data fields, alias bodies): only the declared
//!   parameters are in scope, and an unknown type variable is an error. An
//!   alias is not in scope in its own body, so aliases cannot recurse.
//! - **annotations** (bindings, patterns, ascriptions): an unknown type
//!   variable introduces a fresh flexible variable, shared by every
//!   occurrence of that name in the annotation.

use crate::context::TypeDef;
use crate::error::{NameKind, Result, TypeError};
use crate::infer::Context;
use crate::types::{Kind, Ty, TyVar};
use fxhash::{FxHashMap, FxHashSet};
use tern_mem::Symbol;
use tern_syntax::ast::Type;
use tern_syntax::{Span, Spanned};

/// Kind inference state plus the type variables in scope.
#[derive(Debug, Clone, Default)]
pub struct KindChecker {
    /// Kind variable solutions
    kinds: Vec<Option<Kind>>,
    /// Rigid variables in scope, innermost last
    scope: Vec<(Symbol, TyVar, Kind)>,
    /// Variables introduced on first use, when that is allowed
    free: Option<FxHashMap<Symbol, (TyVar, Kind)>>,
}

impl KindChecker {
    /// Checker for declaration bodies: unknown type variables are errors.
    #[must_use]
    pub fn for_declaration() -> Self {
        Self::default()
    }

    /// Checker for annotations: unknown type variables are introduced.
    #[must_use]
    pub fn for_annotation() -> Self {
        Self {
            free: Some(FxHashMap::default()),
            ..Self::default()
        }
    }

    /// A fresh kind variable.
    pub fn fresh_kind(&mut self) -> Kind {
        self.kinds.push(None);
        Kind::Var(self.kinds.len() as u32 - 1)
    }

    /// Brings a rigid variable into scope under `name`.
    pub fn push_var(&mut self, name: Symbol, var: TyVar, kind: Kind) {
        self.scope.push((name, var, kind));
    }

    /// Removes every variable from scope.
    pub fn clear_scope(&mut self) {
        self.scope.clear();
    }

    fn shallow(&self, kind: &Kind) -> Kind {
        let mut current = kind.clone();
        while let Kind::Var(n) = current {
            match self.kinds.get(n as usize) {
                Some(Some(solved)) => current = solved.clone(),
                _ => break,
            }
        }
        current
    }

    /// Fully resolves `kind`, leaving unsolved variables in place.
    #[must_use]
    pub fn resolve(&self, kind: &Kind) -> Kind {
        match self.shallow(kind) {
            Kind::Arrow(param, result) => Kind::arrow(self.resolve(&param), self.resolve(&result)),
            other => other,
        }
    }

    /// Fully resolves `kind`, defaulting unsolved variables to `*`.
    #[must_use]
    pub fn default_kind(&self, kind: &Kind) -> Kind {
        match self.shallow(kind) {
            Kind::Arrow(param, result) => {
                Kind::arrow(self.default_kind(&param), self.default_kind(&result))
            }
            _ => Kind::Star,
        }
    }

    fn occurs(&self, var: u32, kind: &Kind) -> bool {
        match self.shallow(kind) {
            Kind::Var(n) => n == var,
            Kind::Arrow(param, result) => self.occurs(var, &param) || self.occurs(var, &result),
            Kind::Star => false,
        }
    }

    /// Unifies two kinds. Returns false if they cannot be made equal.
    pub fn unify(&mut self, left: &Kind, right: &Kind) -> bool {
        let mut pending = vec![(left.clone(), right.clone())];
        while let Some((a, b)) = pending.pop() {
            match (self.shallow(&a), self.shallow(&b)) {
                (Kind::Star, Kind::Star) => {}
                (Kind::Var(x), Kind::Var(y)) if x == y => {}
                (Kind::Var(x), k) | (k, Kind::Var(x)) => {
                    if self.occurs(x, &k) {
                        return false;
                    }
                    self.kinds[x as usize] = Some(k);
                }
                (Kind::Arrow(p1, r1), Kind::Arrow(p2, r2)) => {
                    pending.push((*p1, *p2));
                    pending.push((*r1, *r2));
                }
                _ => return false,
            }
        }
        true
    }

    fn expect(&mut self, expected: &Kind, found: &Kind, span: Span) -> Result<()> {
        if self.unify(expected, found) {
            Ok(())
        } else {
            Err(TypeError::KindMismatch {
                expected: self.resolve(expected).to_string(),
                found: self.resolve(found).to_string(),
                span,
            })
        }
    }

    /// Elaborates a type that must have kind `*`.
    ///
    /// # Errors
    ///
    /// See [`KindChecker::elaborate`].
    pub fn elaborate_star(&mut self, ctx: &mut Context, ty: &Type) -> Result<Ty> {
        let (elaborated, kind) = self.elaborate(ctx, ty)?;
        self.expect(&Kind::Star, &kind, ty.span())?;
        Ok(elaborated)
    }

    /// Elaborates a type, returning it with its kind.
    ///
    /// # Errors
    ///
    /// `UndeclaredName` for unknown types and (in declarations) unknown type
    /// variables, `DuplicateName` for a repeated quantifier, and
    /// `KindMismatch` for ill-kinded applications.
    pub fn elaborate(&mut self, ctx: &mut Context, ty: &Type) -> Result<(Ty, Kind)> {
        match ty {
            Type::Name { name, span } => self.lookup_type(ctx, *name, *span),

            Type::Var { name, span } => {
                if let Some((_, var, kind)) = self.scope.iter().rev().find(|(n, ..)| n == name) {
                    return Ok((Ty::Var(*var), kind.clone()));
                }
                if let Some(free) = self.free.as_mut() {
                    let kinds = &mut self.kinds;
                    let (var, kind) = free.entry(*name).or_insert_with(|| {
                        kinds.push(None);
                        (
                            ctx.subst.fresh_unifiable(),
                            Kind::Var(kinds.len() as u32 - 1),
                        )
                    });
                    return Ok((Ty::Var(*var), kind.clone()));
                }
                Err(TypeError::UndeclaredName {
                    what: NameKind::TypeVar,
                    name: ctx.name(*name),
                    span: *span,
                })
            }

            Type::App { head, args, span } => {
                let (head_ty, head_kind) = self.elaborate(ctx, head)?;
                let mut arg_tys = Vec::with_capacity(args.len());
                let mut arg_kinds = Vec::with_capacity(args.len());
                for arg in args {
                    let (arg_ty, arg_kind) = self.elaborate(ctx, arg)?;
                    arg_tys.push(arg_ty);
                    arg_kinds.push(arg_kind);
                }
                let result = self.fresh_kind();
                let expected = Kind::function(arg_kinds.into_iter(), result.clone());
                self.expect(&expected, &head_kind, *span)?;
                Ok((Ty::apply(head_ty, arg_tys), result))
            }

            Type::Arrow { param, result, .. } => {
                let param = self.elaborate_star(ctx, param)?;
                let result = self.elaborate_star(ctx, result)?;
                Ok((Ty::arrow(param, result), Kind::Star))
            }

            Type::Tuple { elements, .. } => {
                if let [inner] = elements.as_slice() {
                    return self.elaborate(ctx, inner);
                }
                let elems = elements
                    .iter()
                    .map(|e| self.elaborate_star(ctx, e))
                    .collect::<Result<Vec<_>>>()?;
                Ok((Ty::Tuple(elems), Kind::Star))
            }

            Type::Forall { params, body, span } => {
                let mut seen = FxHashSet::default();
                for param in params {
                    if !seen.insert(*param) {
                        return Err(TypeError::DuplicateName {
                            what: NameKind::TypeVar,
                            name: ctx.name(*param),
                            span: *span,
                        });
                    }
                }

                let depth = self.scope.len();
                let mut vars = Vec::with_capacity(params.len());
                for param in params {
                    let var = ctx.subst.fresh_grounded(*param);
                    let kind = self.fresh_kind();
                    self.push_var(*param, var, kind);
                    vars.push(var);
                }
                let body = self.elaborate_star(ctx, body);
                self.scope.truncate(depth);
                let body = body?;

                if vars.is_empty() {
                    Ok((body, Kind::Star))
                } else {
                    Ok((Ty::Forall(vars, Box::new(body)), Kind::Star))
                }
            }

            Type::Hole { .. } => {
                let kind = self.fresh_kind();
                Ok((ctx.subst.fresh_var(), kind))
            }
        }
    }

    fn lookup_type(&mut self, ctx: &mut Context, name: Symbol, span: Span) -> Result<(Ty, Kind)> {
        match ctx.registry.lookup_type(name).cloned() {
            Some(TypeDef::Data(id)) => {
                let template = ctx.registry.template(id);
                if template.params.is_empty() {
                    Ok((Ty::nominal(id), Kind::Star))
                } else {
                    let lambda = Ty::Forall(template.param_vars(), Box::new(template.self_ty(id)));
                    Ok((lambda, template.kind()))
                }
            }
            Some(TypeDef::Alias { ty, kind }) => Ok((ty, kind)),
            None => match int_width(&ctx.name(name)) {
                Some(width) => Ok((ctx.registry.int_ty(width, &mut ctx.interner), Kind::Star)),
                None => Err(TypeError::UndeclaredName {
                    what: NameKind::Type,
                    name: ctx.name(name),
                    span,
                }),
            },
        }
    }
}

/// Width of an integer type name `i1` ..= `i128`.
fn int_width(name: &str) -> Option<u32> {
    let digits = name.strip_prefix('i')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0')
    {
        return None;
    }
    digits
        .parse::<u32>()
        .ok()
        .filter(|w| (1..=crate::config::MAX_INT_WIDTH).contains(w))
}

/// Elaborates a binding, pattern or ascription annotation.
///
/// # Errors
///
/// See [`KindChecker::elaborate`].
pub fn elaborate_annotation(ctx: &mut Context, ty: &Type) -> Result<Ty> {
    KindChecker::for_annotation().elaborate_star(ctx, ty)
}
