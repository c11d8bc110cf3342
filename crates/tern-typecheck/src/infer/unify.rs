//! Unification algorithm with occurs check.
//!
//! Unification makes two types equal by solving flexible variables. It works
//! off an explicit stack of pending pairs, so deeply nested types do not
//! grow the call stack.
//!
//! Unification is not transactional: pairs solved before a failure stay
//! solved. Callers that need atomicity take a
//! [`SubstSnapshot`](crate::context::SubstSnapshot) first.
//!
//! Errors here are structural and carry unresolved types. The checker
//! [`Context`](crate::Context) turns them into [`TypeError`](crate::TypeError)s,
//! since it has what is needed to print types.

use crate::context::Subst;
use crate::types::{Ty, TyVar};
use fxhash::FxHashMap;

/// Why two types could not be unified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnifyError {
    /// Different constructors, arities or templates
    Mismatch {
        /// Left operand at the point of failure
        left: Ty,
        /// Right operand at the point of failure
        right: Ty,
    },
    /// A flexible variable would contain itself
    Occurs {
        /// The variable
        var: TyVar,
        /// The type it would be bound to
        ty: Ty,
    },
    /// A rigid variable met a concrete type
    RigidConcrete {
        /// The rigid variable
        var: TyVar,
        /// The concrete type
        ty: Ty,
    },
    /// Two distinct rigid variables met
    RigidRigid {
        /// Left variable
        left: TyVar,
        /// Right variable
        right: TyVar,
    },
}

/// Unification over a borrowed substitution.
pub struct Unifier<'s> {
    subst: &'s mut Subst,
}

impl<'s> Unifier<'s> {
    /// Create a unifier.
    pub fn new(subst: &'s mut Subst) -> Self {
        Self { subst }
    }

    /// Unify two types.
    ///
    /// # Errors
    ///
    /// Returns the first pair of sub-terms that could not be made equal.
    pub fn unify(&mut self, left: &Ty, right: &Ty) -> Result<(), UnifyError> {
        let mut pending = vec![(left.clone(), right.clone())];

        while let Some((a, b)) = pending.pop() {
            let a = self.subst.shallow(&a);
            let b = self.subst.shallow(&b);

            match (a, b) {
                (Ty::Var(x), Ty::Var(y)) => self.unify_vars(x, y)?,
                (Ty::Var(x), t) | (t, Ty::Var(x)) => self.unify_var(x, t)?,

                (Ty::Arrow(p1, r1), Ty::Arrow(p2, r2)) => {
                    pending.push((*r1, *r2));
                    pending.push((*p1, *p2));
                }

                (Ty::Tuple(e1), Ty::Tuple(e2)) if e1.len() == e2.len() => {
                    pending.extend(e1.into_iter().zip(e2).rev());
                }

                (
                    Ty::Nominal {
                        template: t1,
                        args: a1,
                    },
                    Ty::Nominal {
                        template: t2,
                        args: a2,
                    },
                ) if t1 == t2 && a1.len() == a2.len() => {
                    pending.extend(a1.into_iter().zip(a2).rev());
                }

                (Ty::Forall(ps, b1), Ty::Forall(qs, b2)) if ps.len() == qs.len() => {
                    let skolems: Vec<Ty> = ps.iter().map(|_| Ty::Var(self.subst.fresh_skolem())).collect();
                    let left_map: FxHashMap<TyVar, Ty> =
                        ps.iter().copied().zip(skolems.iter().cloned()).collect();
                    let right_map: FxHashMap<TyVar, Ty> =
                        qs.iter().copied().zip(skolems).collect();
                    let b1 = self.subst.zonk(&b1).substitute(&left_map);
                    let b2 = self.subst.zonk(&b2).substitute(&right_map);
                    pending.push((b1, b2));
                }

                (Ty::App(h1, a1), Ty::App(h2, a2)) => {
                    let (lhead, largs, rhead, rargs) = split_apps(*h1, a1, *h2, a2);
                    pending.extend(largs.into_iter().zip(rargs).rev());
                    pending.push((lhead, rhead));
                }

                (Ty::App(head, args), t) => match eta_expand(self.subst, &t, args.len()) {
                    Some((lambda, comps)) => {
                        pending.extend(args.into_iter().zip(comps).rev());
                        pending.push((*head, lambda));
                    }
                    None => {
                        return Err(UnifyError::Mismatch {
                            left: Ty::App(head, args),
                            right: t,
                        });
                    }
                },

                (t, Ty::App(head, args)) => match eta_expand(self.subst, &t, args.len()) {
                    Some((lambda, comps)) => {
                        pending.extend(comps.into_iter().zip(args).rev());
                        pending.push((lambda, *head));
                    }
                    None => {
                        return Err(UnifyError::Mismatch {
                            left: t,
                            right: Ty::App(head, args),
                        });
                    }
                },

                (left, right) => return Err(UnifyError::Mismatch { left, right }),
            }
        }

        Ok(())
    }

    fn unify_vars(&mut self, x: TyVar, y: TyVar) -> Result<(), UnifyError> {
        let x = self.subst.find(x);
        let y = self.subst.find(y);
        if x == y {
            return Ok(());
        }

        match (self.subst.is_grounded(x), self.subst.is_grounded(y)) {
            (false, _) => self.subst.link(x, y),
            (true, false) => self.subst.link(y, x),
            (true, true) => return Err(UnifyError::RigidRigid { left: x, right: y }),
        }
        Ok(())
    }

    fn unify_var(&mut self, var: TyVar, ty: Ty) -> Result<(), UnifyError> {
        let var = self.subst.find(var);
        if self.subst.is_grounded(var) {
            return Err(UnifyError::RigidConcrete { var, ty });
        }
        if self.subst.occurs(var, &ty) {
            return Err(UnifyError::Occurs { var, ty });
        }
        self.subst.bind(var, ty);
        Ok(())
    }
}

/// Lines two applications up so that both sides have the same number of
/// arguments, folding the excess leading arguments of the longer one into
/// its head.
fn split_apps(h1: Ty, mut a1: Vec<Ty>, h2: Ty, mut a2: Vec<Ty>) -> (Ty, Vec<Ty>, Ty, Vec<Ty>) {
    use std::cmp::Ordering;

    match a1.len().cmp(&a2.len()) {
        Ordering::Equal => (h1, a1, h2, a2),
        Ordering::Greater => {
            let tail = a1.split_off(a1.len() - a2.len());
            (Ty::App(Box::new(h1), a1), tail, h2, a2)
        }
        Ordering::Less => {
            let tail = a2.split_off(a2.len() - a1.len());
            (h1, a1, Ty::App(Box::new(h2), a2), tail)
        }
    }
}

/// Reads a saturated type as a type function applied to its last `n`
/// components.
///
/// `(a, b, c)` with `n = 2` becomes `forall p q. (a, p, q)` applied to
/// `[b, c]`. Returns `None` for types without that many components.
fn eta_expand(subst: &mut Subst, ty: &Ty, n: usize) -> Option<(Ty, Vec<Ty>)> {
    let comps: Vec<Ty> = match ty {
        Ty::Nominal { args, .. } => args.clone(),
        Ty::Tuple(elems) => elems.clone(),
        Ty::Arrow(param, result) => vec![(**param).clone(), (**result).clone()],
        _ => return None,
    };
    if n == 0 || n > comps.len() {
        return None;
    }

    let keep = comps.len() - n;
    let params: Vec<TyVar> = (0..n).map(|_| subst.fresh_skolem()).collect();
    let mut body_comps: Vec<Ty> = comps[..keep].to_vec();
    body_comps.extend(params.iter().map(|p| Ty::Var(*p)));

    let body = match ty {
        Ty::Nominal { template, .. } => Ty::Nominal {
            template: *template,
            args: body_comps,
        },
        Ty::Tuple(_) => Ty::Tuple(body_comps),
        _ => {
            let mut parts = body_comps.into_iter();
            match (parts.next(), parts.next()) {
                (Some(param), Some(result)) => Ty::arrow(param, result),
                _ => return None,
            }
        }
    };

    Some((Ty::Forall(params, Box::new(body)), comps[keep..].to_vec()))
}
