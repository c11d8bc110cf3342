//! Match lowering.
//!
//! Rewrites every generic [`TExpr::Match`] in a typed tree into the decision
//! tree built by [`MatchCompiler`]. Pattern lambdas were already checked as
//! a lambda over a match on their parameter, so they are covered too.
//!
//! Children are lowered before their parent, so the shallow matches the
//! compiler emits are never compiled a second time.

use crate::pattern::MatchCompiler;
use crate::tast::{TBinding, TCase, TExpr};

/// Lowers every match in `expr`.
pub fn lower_matches(compiler: &mut MatchCompiler<'_>, expr: TExpr) -> TExpr {
    match expr {
        TExpr::Var { .. } | TExpr::Lit { .. } | TExpr::MatchFailure { .. } => expr,

        TExpr::Tuple { elems, ty } => TExpr::Tuple {
            elems: elems
                .into_iter()
                .map(|e| lower_matches(compiler, e))
                .collect(),
            ty,
        },

        TExpr::Ctor {
            name,
            template,
            case,
            arg,
            ty,
        } => TExpr::Ctor {
            name,
            template,
            case,
            arg: arg.map(|a| Box::new(lower_matches(compiler, *a))),
            ty,
        },

        TExpr::Lambda {
            param,
            param_ty,
            body,
            ty,
        } => TExpr::Lambda {
            param,
            param_ty,
            body: Box::new(lower_matches(compiler, *body)),
            ty,
        },

        TExpr::App { func, arg, ty } => TExpr::App {
            func: Box::new(lower_matches(compiler, *func)),
            arg: Box::new(lower_matches(compiler, *arg)),
            ty,
        },

        TExpr::Let {
            rec,
            bindings,
            body,
            ty,
        } => TExpr::Let {
            rec,
            bindings: bindings
                .into_iter()
                .map(|b| TBinding {
                    name: b.name,
                    scheme: b.scheme,
                    expr: lower_matches(compiler, b.expr),
                })
                .collect(),
            body: Box::new(lower_matches(compiler, *body)),
            ty,
        },

        TExpr::Match {
            scrutinee,
            cases,
            ty,
        } => {
            let scrutinee = lower_matches(compiler, *scrutinee);
            let cases = cases
                .into_iter()
                .map(|case| TCase {
                    pat: case.pat,
                    body: lower_matches(compiler, case.body),
                })
                .collect();
            compiler.compile(scrutinee, cases, ty)
        }
    }
}
