//! Type environment for lexical scoping.
//!
//! The environment maps value names to type schemes and is organized as a
//! stack of scopes: the bottom scope holds top-level bindings, and each
//! `let`, lambda case and match case pushes one while its body is checked.
//!
//! # Example
//!
//! ```
//! use tern_mem::Symbol;
//! use tern_typecheck::{Scheme, Ty, TypeEnv};
//!
//! let x = Symbol::new(10);
//! let mut env = TypeEnv::new();
//! env.bind(x, Scheme::mono(Ty::unit()));
//!
//! env.push_scope();
//! env.bind(x, Scheme::mono(Ty::Tuple(vec![Ty::unit(), Ty::unit()])));
//! assert_eq!(env.lookup(x).unwrap().ty.clone(), Ty::Tuple(vec![Ty::unit(), Ty::unit()]));
//!
//! env.pop_scope();
//! assert_eq!(env.lookup(x).unwrap().ty.clone(), Ty::unit());
//! ```

use crate::context::subst::Subst;
use crate::types::{Ty, TyVar};
use fxhash::{FxHashMap, FxHashSet};
use tern_mem::Symbol;

/// Type scheme: a type with universally quantified variables.
///
/// - `forall ?0. ?0 -> ?0` is the identity function type
/// - `bool -> bool` is monomorphic (no quantified variables)
///
/// Quantified variables may be flexible (generalized by inference) or rigid
/// (from an annotation); instantiation replaces both with fresh flexible
/// variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    /// Universally quantified type variables.
    pub vars: Vec<TyVar>,

    /// The type itself (may contain references to `vars`).
    pub ty: Ty,
}

impl Scheme {
    /// Create a monomorphic type scheme (no quantified variables).
    #[must_use]
    pub fn mono(ty: Ty) -> Self {
        Self {
            vars: Vec::new(),
            ty,
        }
    }

    /// Create a polymorphic type scheme.
    #[must_use]
    pub fn poly(vars: Vec<TyVar>, ty: Ty) -> Self {
        Self { vars, ty }
    }

    /// Whether nothing is quantified.
    #[must_use]
    pub fn is_mono(&self) -> bool {
        self.vars.is_empty()
    }

    /// Instantiate this scheme with fresh type variables.
    ///
    /// The type is resolved first, so variables that were solved after the
    /// scheme was built are seen through.
    pub fn instantiate(&self, subst: &mut Subst) -> Ty {
        let ty = subst.zonk(&self.ty);
        if self.vars.is_empty() {
            return ty;
        }
        let mapping: FxHashMap<TyVar, Ty> = self
            .vars
            .iter()
            .map(|&v| (v, subst.fresh_var()))
            .collect();
        ty.substitute(&mapping)
    }

    /// Variables free in the scheme: those in `ty` that are not quantified.
    #[must_use]
    pub fn free_vars(&self, subst: &Subst) -> Vec<TyVar> {
        let mut vars = subst.free_vars(&self.ty);
        vars.retain(|v| !self.vars.contains(v));
        vars
    }

    /// Resolves the body of the scheme.
    pub fn zonk(&mut self, subst: &Subst) {
        self.ty = subst.zonk(&self.ty);
    }
}

/// Type environment mapping symbols to type schemes.
#[derive(Debug, Clone)]
pub struct TypeEnv {
    /// Stack of scopes; index 0 is the top level.
    scopes: Vec<FxHashMap<Symbol, Scheme>>,
}

impl TypeEnv {
    /// Create an environment with an empty top-level scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![FxHashMap::default()],
        }
    }

    /// Enter a new scope.
    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Leave the innermost scope. The top-level scope is never removed.
    pub fn pop_scope(&mut self) -> Option<FxHashMap<Symbol, Scheme>> {
        if self.scopes.len() > 1 {
            self.scopes.pop()
        } else {
            None
        }
    }

    /// Number of scopes, including the top level.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Drop scopes until `depth` remain.
    pub fn truncate(&mut self, depth: usize) {
        self.scopes.truncate(depth.max(1));
    }

    /// Bind `name` in the innermost scope.
    pub fn bind(&mut self, name: Symbol, scheme: Scheme) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, scheme);
        }
    }

    /// Bind `name` in the top-level scope.
    pub fn bind_global(&mut self, name: Symbol, scheme: Scheme) {
        self.scopes[0].insert(name, scheme);
    }

    /// Look `name` up, innermost scope first.
    #[must_use]
    pub fn lookup(&self, name: Symbol) -> Option<&Scheme> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&name))
    }

    /// Top-level bindings.
    pub fn globals(&self) -> impl Iterator<Item = (&Symbol, &Scheme)> {
        self.scopes[0].iter()
    }

    /// Free variables of the whole environment.
    #[must_use]
    pub fn free_vars(&self, subst: &Subst) -> FxHashSet<TyVar> {
        self.free_vars_below(self.scopes.len(), subst)
    }

    /// Free variables of the `depth` outermost scopes.
    ///
    /// Used to compute the monomorphic set of a recursive group while the
    /// group's own placeholders sit in the scope above `depth`.
    #[must_use]
    pub fn free_vars_below(&self, depth: usize, subst: &Subst) -> FxHashSet<TyVar> {
        self.scopes
            .iter()
            .take(depth)
            .flat_map(|scope| scope.values())
            .flat_map(|scheme| scheme.free_vars(subst))
            .collect()
    }

    /// Generalize `ty` over its free variables that are not in `mono`.
    #[must_use]
    pub fn generalize(ty: &Ty, mono: &FxHashSet<TyVar>, subst: &Subst) -> Scheme {
        let ty = subst.zonk(ty);
        let vars = subst
            .free_vars(&ty)
            .into_iter()
            .filter(|v| !mono.contains(v))
            .collect();
        Scheme::poly(vars, ty)
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoping() {
        let x = Symbol::new(1);
        let y = Symbol::new(2);
        let mut env = TypeEnv::new();
        env.bind(x, Scheme::mono(Ty::unit()));

        env.push_scope();
        env.bind(y, Scheme::mono(Ty::unit()));
        assert!(env.lookup(x).is_some());
        assert!(env.lookup(y).is_some());
        assert_eq!(env.depth(), 2);

        env.pop_scope();
        assert!(env.lookup(y).is_none());
        assert!(env.pop_scope().is_none());
    }

    #[test]
    fn test_truncate_keeps_top_level() {
        let mut env = TypeEnv::new();
        env.push_scope();
        env.push_scope();
        env.truncate(0);
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn test_instantiate_is_fresh() {
        let mut subst = Subst::new();
        let a = subst.fresh_unifiable();
        let scheme = Scheme::poly(vec![a], Ty::arrow(Ty::Var(a), Ty::Var(a)));

        let first = scheme.instantiate(&mut subst);
        let second = scheme.instantiate(&mut subst);
        assert_ne!(first, second);
        match first {
            Ty::Arrow(param, result) => assert_eq!(param, result),
            other => panic!("expected an arrow, got {other:?}"),
        }
    }

    #[test]
    fn test_generalize_respects_mono_set() {
        let mut subst = Subst::new();
        let a = subst.fresh_unifiable();
        let b = subst.fresh_unifiable();

        let mut env = TypeEnv::new();
        env.bind(Symbol::new(1), Scheme::mono(Ty::Var(a)));
        let mono = env.free_vars(&subst);

        let scheme = TypeEnv::generalize(&Ty::arrow(Ty::Var(a), Ty::Var(b)), &mono, &subst);
        assert_eq!(scheme.vars, vec![b]);
    }

    #[test]
    fn test_free_vars_below_skips_inner_scopes() {
        let mut subst = Subst::new();
        let a = subst.fresh_unifiable();
        let mut env = TypeEnv::new();
        env.push_scope();
        env.bind(Symbol::new(1), Scheme::mono(Ty::Var(a)));

        assert!(env.free_vars(&subst).contains(&a));
        assert!(env.free_vars_below(1, &subst).is_empty());
    }
}
