//! Validation of `let rec` initializers.
//!
//! A recursive group is only well-founded if every initializer that refers
//! to the group can be built before the group's values exist. An
//! initializer is accepted when it does not mention the group at all, or
//! when it is *constructive* (lambdas, literals and variables, wrapped in
//! tuples, constructors and nested lets) and does not simply alias another
//! member of the group.
//!
//! ```text
//! let rec f = \() -> g () and g = \() -> f ()   accepted
//! let rec ones = Cons (1, ones)                 accepted
//! let rec x = x                                 immediately linked
//! let rec y = f y                               not constructive
//! ```

use crate::error::{RecursionViolation, Result, TypeError};
use crate::tast::{TBinding, TExpr};
use fxhash::{FxHashMap, FxHashSet};
use tern_mem::{StringInterner, Symbol};
use tern_syntax::Span;

/// Checks every initializer of a recursive group.
///
/// `spans[i]` locates `bindings[i]` for error reporting.
///
/// # Errors
///
/// [`TypeError::IllegalRecursiveBinding`] for the first offending binding.
pub fn validate(bindings: &[TBinding], spans: &[Span], interner: &StringInterner) -> Result<()> {
    let group: FxHashSet<Symbol> = bindings.iter().map(|b| b.name).collect();

    for (index, binding) in bindings.iter().enumerate() {
        if !mentions(&binding.expr, &group, &mut Vec::new()) {
            continue;
        }
        let reason = if !is_constructive(&binding.expr, &group) {
            RecursionViolation::NotConstructive
        } else if linked_member(&binding.expr, &group).is_some() {
            RecursionViolation::ImmediatelyLinked
        } else {
            continue;
        };
        return Err(TypeError::IllegalRecursiveBinding {
            name: interner.display(binding.name),
            reason,
            span: spans.get(index).copied().unwrap_or_default(),
        });
    }
    Ok(())
}

/// Whether `expr` refers to a member of `group` that is not shadowed.
fn mentions(expr: &TExpr, group: &FxHashSet<Symbol>, shadowed: &mut Vec<Symbol>) -> bool {
    match expr {
        TExpr::Var { name, .. } => group.contains(name) && !shadowed.contains(name),
        TExpr::Lit { .. } | TExpr::MatchFailure { .. } => false,
        TExpr::Tuple { elems, .. } => elems.iter().any(|e| mentions(e, group, shadowed)),
        TExpr::Ctor { arg, .. } => arg.as_deref().is_some_and(|a| mentions(a, group, shadowed)),
        TExpr::App { func, arg, .. } => {
            mentions(func, group, shadowed) || mentions(arg, group, shadowed)
        }
        TExpr::Lambda { param, body, .. } => {
            shadowed.push(*param);
            let found = mentions(body, group, shadowed);
            shadowed.pop();
            found
        }
        TExpr::Let {
            rec,
            bindings,
            body,
            ..
        } => {
            let depth = shadowed.len();
            if *rec {
                shadowed.extend(bindings.iter().map(|b| b.name));
            }
            let mut found = bindings
                .iter()
                .any(|b| mentions(&b.expr, group, shadowed));
            if !*rec {
                shadowed.extend(bindings.iter().map(|b| b.name));
            }
            found = found || mentions(body, group, shadowed);
            shadowed.truncate(depth);
            found
        }
        TExpr::Match {
            scrutinee, cases, ..
        } => {
            mentions(scrutinee, group, shadowed)
                || cases.iter().any(|case| {
                    let depth = shadowed.len();
                    shadowed.extend(case.pat.captures());
                    let found = mentions(&case.body, group, shadowed);
                    shadowed.truncate(depth);
                    found
                })
        }
    }
}

/// Whether `expr` can be allocated without evaluating any member of the
/// group.
fn is_constructive(expr: &TExpr, group: &FxHashSet<Symbol>) -> bool {
    match expr {
        TExpr::Lambda { .. } | TExpr::Var { .. } | TExpr::Lit { .. } => true,
        TExpr::Tuple { elems, .. } => elems.iter().all(|e| is_constructive(e, group)),
        TExpr::Ctor { arg, .. } => arg.as_deref().is_none_or(|a| is_constructive(a, group)),
        TExpr::Let { bindings, body, .. } => {
            bindings.iter().all(|b| {
                !mentions(&b.expr, group, &mut Vec::new()) || is_constructive(&b.expr, group)
            }) && is_constructive(body, group)
        }
        TExpr::App { .. } | TExpr::Match { .. } | TExpr::MatchFailure { .. } => false,
    }
}

/// The group member `expr` evaluates to directly, following let-bound
/// aliases.
fn linked_member(expr: &TExpr, group: &FxHashSet<Symbol>) -> Option<Symbol> {
    let mut aliases: FxHashMap<Symbol, &TExpr> = FxHashMap::default();
    let mut visited = FxHashSet::default();
    let mut current = expr;
    loop {
        match current {
            TExpr::Var { name, .. } => match aliases.get(name) {
                Some(&next) => {
                    if !visited.insert(*name) {
                        return None;
                    }
                    current = next;
                }
                None => return group.contains(name).then_some(*name),
            },
            TExpr::Let { bindings, body, .. } => {
                for binding in bindings {
                    aliases.insert(binding.name, &binding.expr);
                }
                current = body;
            }
            _ => return None,
        }
    }
}
