//! Core type representation for type checking.
//!
//! `Ty` is the checker's view of a type, distinct from
//! [`tern_syntax::ast::Type`], which is what the programmer wrote. Type
//! variables are indices into the session's [`Subst`](crate::Subst);
//! whether a variable is rigid or flexible, and what it is bound to, lives
//! there and not in the type.

use crate::types::template::TemplateId;
use fxhash::FxHashMap;
use std::fmt;

/// A type variable: an index into the substitution arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TyVar(pub u32);

impl TyVar {
    /// Index into the substitution arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TyVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// A type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    /// Type variable (rigid or flexible, see [`Subst`](crate::Subst))
    Var(TyVar),

    /// Function type `param -> result`
    Arrow(Box<Ty>, Box<Ty>),

    /// Tuple of arity 0 or at least 2; singleton tuples are never built
    Tuple(Vec<Ty>),

    /// Instance of a data type, bool, string or bounded integer
    Nominal {
        /// Shared definition
        template: TemplateId,
        /// One argument per template parameter
        args: Vec<Ty>,
    },

    /// Quantifier over rigid variables.
    ///
    /// Also serves as a type-level function: applying a `Forall` to as many
    /// arguments as it has parameters substitutes them into the body.
    Forall(Vec<TyVar>, Box<Ty>),

    /// Application whose head is not yet known to be a type function,
    /// e.g. `'f bool`
    App(Box<Ty>, Vec<Ty>),
}

impl Ty {
    /// The empty tuple.
    #[must_use]
    pub fn unit() -> Self {
        Ty::Tuple(Vec::new())
    }

    /// `param -> result`
    #[must_use]
    pub fn arrow(param: Ty, result: Ty) -> Self {
        Ty::Arrow(Box::new(param), Box::new(result))
    }

    /// Tuple of `elems`, collapsing a single element to itself.
    #[must_use]
    pub fn tuple(mut elems: Vec<Ty>) -> Self {
        if elems.len() == 1 {
            elems.remove(0)
        } else {
            Ty::Tuple(elems)
        }
    }

    /// Nominal type with no arguments.
    #[must_use]
    pub fn nominal(template: TemplateId) -> Self {
        Ty::Nominal {
            template,
            args: Vec::new(),
        }
    }

    /// The variable, if this is one.
    #[must_use]
    pub fn as_var(&self) -> Option<TyVar> {
        match self {
            Ty::Var(v) => Some(*v),
            _ => None,
        }
    }

    /// Replaces variables according to `map`.
    ///
    /// This is the substitution used to instantiate schemes, apply type
    /// functions and expand aliases. Variables quantified by an inner
    /// `Forall` are not replaced. No substitution state is consulted, so
    /// callers pass fully resolved types when they need to see through
    /// bound variables.
    #[must_use]
    pub fn substitute(&self, map: &FxHashMap<TyVar, Ty>) -> Ty {
        if map.is_empty() {
            return self.clone();
        }
        match self {
            Ty::Var(v) => map.get(v).cloned().unwrap_or(Ty::Var(*v)),
            Ty::Arrow(param, result) => Ty::arrow(param.substitute(map), result.substitute(map)),
            Ty::Tuple(elems) => Ty::Tuple(elems.iter().map(|t| t.substitute(map)).collect()),
            Ty::Nominal { template, args } => Ty::Nominal {
                template: *template,
                args: args.iter().map(|t| t.substitute(map)).collect(),
            },
            Ty::Forall(params, body) => {
                if params.iter().any(|p| map.contains_key(p)) {
                    let inner: FxHashMap<TyVar, Ty> = map
                        .iter()
                        .filter(|(v, _)| !params.contains(v))
                        .map(|(v, t)| (*v, t.clone()))
                        .collect();
                    Ty::Forall(params.clone(), Box::new(body.substitute(&inner)))
                } else {
                    Ty::Forall(params.clone(), Box::new(body.substitute(map)))
                }
            }
            Ty::App(head, args) => Ty::App(
                Box::new(head.substitute(map)),
                args.iter().map(|t| t.substitute(map)).collect(),
            ),
        }
    }

    /// Applies a type function to arguments.
    ///
    /// A `Forall` head consumes as many arguments as it can: an exact match
    /// yields the substituted body, fewer arguments yield a smaller
    /// `Forall`, and extra arguments are applied to the result. Any other
    /// head produces an [`Ty::App`].
    #[must_use]
    pub fn apply(head: Ty, mut args: Vec<Ty>) -> Ty {
        if args.is_empty() {
            return head;
        }
        match head {
            Ty::Forall(params, body) => {
                let taken = params.len().min(args.len());
                let rest_args = args.split_off(taken);
                let map: FxHashMap<TyVar, Ty> =
                    params[..taken].iter().copied().zip(args).collect();
                let body = body.substitute(&map);
                let reduced = if taken < params.len() {
                    Ty::Forall(params[taken..].to_vec(), Box::new(body))
                } else {
                    body
                };
                Ty::apply(reduced, rest_args)
            }
            Ty::App(inner, mut first) => {
                first.extend(args);
                Ty::App(inner, first)
            }
            other => Ty::App(Box::new(other), args),
        }
    }

    /// Immediate sub-terms, in order.
    #[must_use]
    pub fn children(&self) -> Vec<&Ty> {
        match self {
            Ty::Var(_) => Vec::new(),
            Ty::Arrow(param, result) => vec![&**param, &**result],
            Ty::Tuple(elems) | Ty::Nominal { args: elems, .. } => elems.iter().collect(),
            Ty::Forall(_, body) => vec![&**body],
            Ty::App(head, args) => std::iter::once(&**head).chain(args.iter()).collect(),
        }
    }
}
