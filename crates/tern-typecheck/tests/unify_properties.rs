//! Property tests for unification.
//!
//! Types are generated as shapes over a small pool of variables and then
//! built against a fresh substitution, so the same shape always yields the
//! same variables.

use proptest::prelude::*;
use tern_mem::StringInterner;
use tern_typecheck::infer::{Unifier, UnifyError};
use tern_typecheck::{Subst, Ty, TyVar, TypeRegistry};

const POOL: usize = 4;

#[derive(Debug, Clone)]
enum Shape {
    Var(usize),
    Bool,
    Str,
    Arrow(Box<Shape>, Box<Shape>),
    Tuple(Vec<Shape>),
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        (0..POOL).prop_map(Shape::Var),
        Just(Shape::Bool),
        Just(Shape::Str),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Shape::Arrow(Box::new(a), Box::new(b))),
            prop::collection::vec(inner, 2..4).prop_map(Shape::Tuple),
        ]
    })
}

struct Env {
    subst: Subst,
    registry: TypeRegistry,
    vars: Vec<TyVar>,
}

impl Env {
    fn new() -> Self {
        let mut interner = StringInterner::new();
        let registry = TypeRegistry::new(&mut interner);
        let mut subst = Subst::new();
        let vars = (0..POOL).map(|_| subst.fresh_unifiable()).collect();
        Self {
            subst,
            registry,
            vars,
        }
    }

    fn build(&self, shape: &Shape) -> Ty {
        match shape {
            Shape::Var(i) => Ty::Var(self.vars[*i]),
            Shape::Bool => self.registry.bool_ty(),
            Shape::Str => self.registry.string_ty(),
            Shape::Arrow(a, b) => Ty::arrow(self.build(a), self.build(b)),
            Shape::Tuple(elems) => Ty::Tuple(elems.iter().map(|e| self.build(e)).collect()),
        }
    }

    fn unify(&mut self, left: &Ty, right: &Ty) -> Result<(), UnifyError> {
        Unifier::new(&mut self.subst).unify(left, right)
    }
}

/// Wraps `ty` in `depth` layers of alternating constructors.
fn wrap(env: &Env, ty: Ty, depth: usize) -> Ty {
    (0..depth).fold(ty, |inner, layer| {
        if layer % 2 == 0 {
            Ty::Tuple(vec![env.registry.bool_ty(), inner])
        } else {
            Ty::arrow(inner, env.registry.string_ty())
        }
    })
}

proptest! {
    #[test]
    fn unify_is_reflexive(s in shape()) {
        let mut env = Env::new();
        let ty = env.build(&s);
        prop_assert!(env.unify(&ty, &ty).is_ok());
        prop_assert_eq!(env.subst.zonk(&ty), env.build(&s));
    }

    #[test]
    fn unify_is_order_independent(a in shape(), b in shape()) {
        let mut forward = Env::new();
        let (fa, fb) = (forward.build(&a), forward.build(&b));
        let forward_ok = forward.unify(&fa, &fb).is_ok();

        let mut backward = Env::new();
        let (ba, bb) = (backward.build(&a), backward.build(&b));
        let backward_ok = backward.unify(&bb, &ba).is_ok();

        prop_assert_eq!(forward_ok, backward_ok);
        if forward_ok {
            prop_assert_eq!(forward.subst.zonk(&fa), forward.subst.zonk(&fb));
            prop_assert_eq!(backward.subst.zonk(&ba), backward.subst.zonk(&bb));
        }
    }

    #[test]
    fn unified_types_stay_equal(a in shape(), b in shape(), c in shape()) {
        let mut env = Env::new();
        let (ta, tb, tc) = (env.build(&a), env.build(&b), env.build(&c));
        if env.unify(&ta, &tb).is_ok() && env.unify(&tb, &tc).is_ok() {
            prop_assert_eq!(env.subst.zonk(&ta), env.subst.zonk(&tc));
        }
    }

    #[test]
    fn occurs_check_at_any_depth(depth in 1usize..8, var in 0..POOL) {
        let mut env = Env::new();
        let v = Ty::Var(env.vars[var]);
        let wrapped = wrap(&env, v.clone(), depth);
        let left = matches!(env.unify(&v, &wrapped), Err(UnifyError::Occurs { .. }));
        prop_assert!(left);

        let mut env = Env::new();
        let v = Ty::Var(env.vars[var]);
        let wrapped = wrap(&env, v.clone(), depth);
        let right = matches!(env.unify(&wrapped, &v), Err(UnifyError::Occurs { .. }));
        prop_assert!(right);
    }
}

#[test]
fn test_failed_unification_rolls_back_with_snapshot() {
    let mut env = Env::new();
    let a = Ty::Var(env.vars[0]);
    let b = env.registry.bool_ty();
    let s = env.registry.string_ty();

    let snapshot = env.subst.snapshot();
    let left = Ty::Tuple(vec![a.clone(), b.clone()]);
    let right = Ty::Tuple(vec![s, a.clone()]);
    assert!(env.unify(&left, &right).is_err());
    env.subst.rollback_to(snapshot);

    assert!(env.subst.is_unbound(env.vars[0]));
    assert!(env.unify(&a, &b).is_ok());
    assert_eq!(env.subst.zonk(&a), b);
}
