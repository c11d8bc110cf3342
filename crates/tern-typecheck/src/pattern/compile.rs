//! Decision-tree match compilation.
//!
//! A generic match is turned into nested *shallow* matches: each one tests
//! a single source expression against constructor heads whose fields are
//! bound to fresh variables, plus a wildcard default when the heads seen do
//! not span the type. The tree is built on an explicit task stack.
//!
//! Captures are collected per row as the row is specialized, so when a row
//! is selected its action is wrapped in one final match that binds every
//! name it needs, whatever path led there.
//!
//! ```text
//! match e with None -> 0 | Some x -> x
//!
//! let %m = e in
//! match %m with
//! | None -> 0
//! | Some %f0 -> match %f0 with x -> x
//! ```

use crate::context::{Scheme, Subst, TypeRegistry};
use crate::pattern::{Ctor, CtorSet, Pat};
use crate::tast::{TBinding, TCase, TExpr};
use crate::types::Ty;
use fxhash::FxHashSet;
use tern_log::trace;
use tern_mem::{StringInterner, Symbol};

#[derive(Debug, Clone)]
struct Row {
    pats: Vec<Pat>,
    /// Captures made so far along this row's path
    bindings: Vec<(Symbol, TExpr)>,
    action: usize,
}

#[derive(Debug, Clone)]
struct Problem {
    /// One source expression per column
    sources: Vec<TExpr>,
    rows: Vec<Row>,
}

enum Task {
    Compile(Problem),
    /// Pops one subtree per case and assembles the shallow match
    Switch { scrutinee: TExpr, pats: Vec<Pat> },
}

/// Compiles generic matches into decision trees.
pub struct MatchCompiler<'a> {
    interner: &'a mut StringInterner,
    subst: &'a Subst,
    registry: &'a TypeRegistry,
}

impl<'a> MatchCompiler<'a> {
    /// Creates a compiler over the session's tables.
    pub fn new(
        interner: &'a mut StringInterner,
        subst: &'a Subst,
        registry: &'a TypeRegistry,
    ) -> Self {
        Self {
            interner,
            subst,
            registry,
        }
    }

    /// Compiles `match scrutinee with cases` of result type `ty`.
    ///
    /// The scrutinee is evaluated once, into a `%m` temporary. Values no
    /// case matches reach [`TExpr::MatchFailure`].
    pub fn compile(&mut self, scrutinee: TExpr, cases: Vec<TCase>, ty: Ty) -> TExpr {
        let scrutinee_ty = self.subst.zonk(scrutinee.ty());
        let temp = self.interner.fresh("m");
        let source = TExpr::var(temp, scrutinee_ty.clone());

        let (pats, actions): (Vec<Pat>, Vec<TExpr>) =
            cases.into_iter().map(|case| (case.pat, case.body)).unzip();
        let rows = pats
            .into_iter()
            .enumerate()
            .map(|(action, pat)| Row {
                pats: vec![pat],
                bindings: Vec::new(),
                action,
            })
            .collect();
        trace!("compiling match with {} case(s)", actions.len());

        let tree = self.build(
            Problem {
                sources: vec![source],
                rows,
            },
            &actions,
            &ty,
        );

        TExpr::Let {
            rec: false,
            bindings: vec![TBinding {
                name: temp,
                scheme: Scheme::mono(scrutinee_ty),
                expr: scrutinee,
            }],
            body: Box::new(tree),
            ty,
        }
    }

    fn build(&mut self, root: Problem, actions: &[TExpr], ty: &Ty) -> TExpr {
        let mut tasks = vec![Task::Compile(root)];
        let mut done: Vec<TExpr> = Vec::new();

        while let Some(task) = tasks.pop() {
            match task {
                Task::Switch { scrutinee, pats } => {
                    let bodies = done.split_off(done.len().saturating_sub(pats.len()));
                    let cases = pats
                        .into_iter()
                        .zip(bodies)
                        .map(|(pat, body)| TCase { pat, body })
                        .collect();
                    done.push(TExpr::Match {
                        scrutinee: Box::new(scrutinee),
                        cases,
                        ty: ty.clone(),
                    });
                }
                Task::Compile(problem) => self.step(problem, actions, ty, &mut tasks, &mut done),
            }
        }

        done.pop()
            .unwrap_or_else(|| TExpr::MatchFailure { ty: ty.clone() })
    }

    fn step(
        &mut self,
        mut problem: Problem,
        actions: &[TExpr],
        ty: &Ty,
        tasks: &mut Vec<Task>,
        done: &mut Vec<TExpr>,
    ) {
        let Some(first) = problem.rows.first() else {
            done.push(TExpr::MatchFailure { ty: ty.clone() });
            return;
        };

        let Some(col) = first.pats.iter().position(|p| !p.is_wild()) else {
            let row = problem.rows.swap_remove(0);
            done.push(self.leaf(row, &problem.sources, actions, ty));
            return;
        };

        if problem.rows.iter().any(|row| matches!(row.pats[col], Pat::Or(_))) {
            problem.rows = expand_column(problem.rows, col);
            tasks.push(Task::Compile(problem));
            return;
        }

        let source = problem.sources[col].clone();
        let col_ty = source.ty().clone();
        let set = CtorSet::of(&col_ty, self.subst, self.registry);

        let mut seen = FxHashSet::default();
        let heads: Vec<Ctor> = problem
            .rows
            .iter()
            .filter_map(|row| row.pats[col].head())
            .filter(|c| seen.insert(c.clone()))
            .collect();

        let mut pats = Vec::with_capacity(heads.len() + 1);
        let mut subproblems = Vec::with_capacity(heads.len() + 1);

        for ctor in &heads {
            let field_tys = set.field_types(ctor, self.registry);
            let fields: Vec<TExpr> = field_tys
                .into_iter()
                .map(|fty| TExpr::var(self.interner.fresh("f"), fty))
                .collect();
            let binders = fields
                .iter()
                .map(|f| match f {
                    TExpr::Var { name, .. } => Pat::bind(*name),
                    _ => Pat::wild(),
                })
                .collect();
            pats.push(set.pattern(ctor, self.registry).with_fields(binders));
            subproblems.push(specialize(&problem, col, ctor, fields));
        }

        if set.is_open() || !set.is_spanned_by(&heads, self.registry) {
            pats.push(Pat::wild());
            subproblems.push(default(&problem, col));
        }

        tasks.push(Task::Switch {
            scrutinee: source,
            pats,
        });
        tasks.extend(subproblems.into_iter().rev().map(Task::Compile));
    }

    /// The action of `row`, with every capture along its path bound by one
    /// final dispatch.
    fn leaf(&mut self, row: Row, sources: &[TExpr], actions: &[TExpr], ty: &Ty) -> TExpr {
        let mut bindings = row.bindings;
        for (pat, source) in row.pats.iter().zip(sources) {
            if let Pat::Wild {
                capture: Some(name),
            } = pat
            {
                bindings.push((*name, source.clone()));
            }
        }

        let body = actions
            .get(row.action)
            .cloned()
            .unwrap_or_else(|| TExpr::MatchFailure { ty: ty.clone() });

        match bindings.len() {
            0 => body,
            1 => {
                let (name, source) = bindings.remove(0);
                TExpr::Match {
                    scrutinee: Box::new(source),
                    cases: vec![TCase {
                        pat: Pat::bind(name),
                        body,
                    }],
                    ty: ty.clone(),
                }
            }
            _ => {
                let (names, sources): (Vec<Symbol>, Vec<TExpr>) = bindings.into_iter().unzip();
                let tuple_ty = Ty::Tuple(sources.iter().map(|s| s.ty().clone()).collect());
                TExpr::Match {
                    scrutinee: Box::new(TExpr::Tuple {
                        elems: sources,
                        ty: tuple_ty,
                    }),
                    cases: vec![TCase {
                        pat: Pat::Tuple(names.into_iter().map(Pat::bind).collect()),
                        body,
                    }],
                    ty: ty.clone(),
                }
            }
        }
    }
}

/// Replaces rows with an or-pattern in column `col` by one row per
/// alternative.
fn expand_column(rows: Vec<Row>, col: usize) -> Vec<Row> {
    let mut out = Vec::with_capacity(rows.len());
    let mut pending: Vec<Row> = rows.into_iter().rev().collect();
    while let Some(mut row) = pending.pop() {
        if matches!(row.pats[col], Pat::Or(_)) {
            let Pat::Or(alts) = std::mem::replace(&mut row.pats[col], Pat::wild()) else {
                continue;
            };
            for alt in alts.into_iter().rev() {
                let mut alt_row = row.clone();
                alt_row.pats[col] = alt;
                pending.push(alt_row);
            }
        } else {
            out.push(row);
        }
    }
    out
}

/// Records the capture, if any, of a wildcard in column `col`.
fn capture(row: &mut Row, col: usize, source: &TExpr) {
    if let Pat::Wild {
        capture: Some(name),
    } = row.pats[col]
    {
        row.bindings.push((name, source.clone()));
    }
}

/// `items` with position `col` replaced by `with`.
fn splice_at<T: Clone>(items: &[T], col: usize, with: Vec<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len() + with.len());
    out.extend_from_slice(&items[..col]);
    out.extend(with);
    out.extend_from_slice(&items[col + 1..]);
    out
}

/// Rows that match `ctor` in column `col`, its fields spliced in at `col`.
fn specialize(problem: &Problem, col: usize, ctor: &Ctor, fields: Vec<TExpr>) -> Problem {
    let arity = fields.len();
    let source = &problem.sources[col];

    let sources = splice_at(&problem.sources, col, fields);

    let rows = problem
        .rows
        .iter()
        .filter_map(|row| {
            let pat = &row.pats[col];
            let sub = if pat.is_wild() {
                Pat::wilds(arity)
            } else if pat.head().as_ref() == Some(ctor) {
                pat.clone().into_fields()
            } else {
                return None;
            };
            let mut row = row.clone();
            capture(&mut row, col, source);
            row.pats = splice_at(&row.pats, col, sub);
            Some(row)
        })
        .collect();

    Problem { sources, rows }
}

/// Rows with a wildcard in column `col`, without that column.
fn default(problem: &Problem, col: usize) -> Problem {
    let source = &problem.sources[col];
    let mut sources = problem.sources.clone();
    sources.remove(col);

    let rows = problem
        .rows
        .iter()
        .filter(|row| row.pats[col].is_wild())
        .map(|row| {
            let mut row = row.clone();
            capture(&mut row, col, source);
            row.pats.remove(col);
            row
        })
        .collect();

    Problem { sources, rows }
}
