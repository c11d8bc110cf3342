//! Usefulness and exhaustiveness.
//!
//! Both questions reduce to one: is a query row covered by a matrix of
//! earlier rows? A case is useless when the rows before it cover it; a
//! match is exhaustive when its rows cover a row of wildcards.
//!
//! The reduction splits a problem into sub-problems that must *all* be
//! covered, so it runs on a worklist and stops at the first uncovered one.
//! Each problem remembers the specializations that led to it, and that
//! trail is what turns an uncovered sub-problem back into an example value
//! for the warning.

use crate::context::{Subst, TypeRegistry};
use crate::pattern::{Ctor, CtorSet, Pat};
use crate::types::Ty;
use fxhash::FxHashSet;
use std::rc::Rc;

/// How a sub-problem was derived from its parent.
#[derive(Debug)]
enum Frame {
    /// The first column was specialized to a constructor with `arity` fields
    Wrap { head: Pat, arity: usize },
    /// The first column was dropped; `missing` is a value the rows skip
    Default { missing: Pat },
}

#[derive(Debug)]
struct Trail {
    frame: Frame,
    parent: Option<Rc<Trail>>,
}

struct Problem {
    rows: Vec<Vec<Pat>>,
    query: Vec<Pat>,
    tys: Vec<Ty>,
    trail: Option<Rc<Trail>>,
}

impl Problem {
    fn derive(&self, frame: Frame, rows: Vec<Vec<Pat>>, query: Vec<Pat>, tys: Vec<Ty>) -> Self {
        Problem {
            rows,
            query,
            tys,
            trail: Some(Rc::new(Trail {
                frame,
                parent: self.trail.clone(),
            })),
        }
    }

    /// Rebuilds the value this problem's query stands for at the root.
    fn witness(&self) -> Vec<Pat> {
        let mut values: Vec<Pat> = self.query.iter().map(strip_or).collect();
        let mut trail = self.trail.as_deref();
        while let Some(link) = trail {
            match &link.frame {
                Frame::Wrap { head, arity } => {
                    let rest = values.split_off((*arity).min(values.len()));
                    let wrapped = head.clone().with_fields(values);
                    values = std::iter::once(wrapped).chain(rest).collect();
                }
                Frame::Default { missing } => values.insert(0, missing.clone()),
            }
            trail = link.parent.as_deref();
        }
        values
    }
}

fn strip_or(pat: &Pat) -> Pat {
    match pat {
        Pat::Or(alts) => alts.first().map_or_else(Pat::wild, strip_or),
        other => other.clone(),
    }
}

/// Rows with or-patterns at their head replaced by one row per alternative.
fn expand_heads(rows: Vec<Vec<Pat>>) -> Vec<Vec<Pat>> {
    let mut out = Vec::with_capacity(rows.len());
    let mut pending: Vec<Vec<Pat>> = rows.into_iter().rev().collect();
    while let Some(mut row) = pending.pop() {
        if let Some(Pat::Or(_)) = row.first() {
            let Pat::Or(alts) = row.remove(0) else {
                continue;
            };
            for alt in alts.into_iter().rev() {
                let mut expanded = Vec::with_capacity(row.len() + 1);
                expanded.push(alt);
                expanded.extend(row.iter().cloned());
                pending.push(expanded);
            }
        } else {
            out.push(row);
        }
    }
    out
}

/// Distinct head constructors of the first column, in order of appearance.
fn head_ctors(rows: &[Vec<Pat>]) -> Vec<Ctor> {
    let mut seen = FxHashSet::default();
    rows.iter()
        .filter_map(|row| row.first().and_then(Pat::head))
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

/// Rows that match `ctor` in the first column, with its fields exposed.
fn specialize(rows: &[Vec<Pat>], ctor: &Ctor, arity: usize) -> Vec<Vec<Pat>> {
    rows.iter()
        .filter_map(|row| {
            let (head, tail) = row.split_first()?;
            let fields = match head {
                Pat::Wild { .. } => Pat::wilds(arity),
                other if other.head().as_ref() == Some(ctor) => other.clone().into_fields(),
                _ => return None,
            };
            Some(fields.into_iter().chain(tail.iter().cloned()).collect())
        })
        .collect()
}

/// Rows with a wildcard in the first column, without that column.
fn default_rows(rows: &[Vec<Pat>]) -> Vec<Vec<Pat>> {
    rows.iter()
        .filter(|row| row.first().is_some_and(Pat::is_wild))
        .map(|row| row[1..].to_vec())
        .collect()
}

/// Returns the first uncovered sub-problem's witness, or `None` when
/// `rows` cover `query`.
fn uncovered(
    rows: Vec<Vec<Pat>>,
    query: Vec<Pat>,
    tys: Vec<Ty>,
    subst: &Subst,
    registry: &TypeRegistry,
) -> Option<Vec<Pat>> {
    let mut work = vec![Problem {
        rows,
        query,
        tys,
        trail: None,
    }];

    while let Some(problem) = work.pop() {
        if problem.rows.is_empty() {
            return Some(problem.witness());
        }
        let Some((head, tail)) = problem.query.split_first() else {
            continue;
        };
        let rows = expand_heads(problem.rows.clone());
        let col_ty = problem.tys.first().cloned().unwrap_or_else(Ty::unit);
        let tail_tys = problem.tys.get(1..).unwrap_or_default().to_vec();

        match head {
            Pat::Or(alts) => {
                for alt in alts.iter().rev() {
                    let mut query = Vec::with_capacity(problem.query.len());
                    query.push(alt.clone());
                    query.extend(tail.iter().cloned());
                    work.push(Problem {
                        rows: rows.clone(),
                        query,
                        tys: problem.tys.clone(),
                        trail: problem.trail.clone(),
                    });
                }
            }

            Pat::Wild { .. } => {
                let set = CtorSet::of(&col_ty, subst, registry);
                let seen = head_ctors(&rows);
                if set.is_open() || !set.is_spanned_by(&seen, registry) {
                    let missing = set
                        .missing(&seen, registry)
                        .map_or_else(Pat::wild, |c| set.pattern(&c, registry));
                    let next = problem.derive(
                        Frame::Default { missing },
                        default_rows(&rows),
                        tail.to_vec(),
                        tail_tys,
                    );
                    work.push(next);
                } else {
                    for ctor in seen.iter().rev() {
                        let arity = set.arity(ctor, registry);
                        let mut tys = set.field_types(ctor, registry);
                        tys.extend(tail_tys.iter().cloned());
                        let query = Pat::wilds(arity).into_iter().chain(tail.iter().cloned()).collect();
                        let next = problem.derive(
                            Frame::Wrap {
                                head: set.pattern(ctor, registry),
                                arity,
                            },
                            specialize(&rows, ctor, arity),
                            query,
                            tys,
                        );
                        work.push(next);
                    }
                }
            }

            concrete => {
                let Some(ctor) = concrete.head() else {
                    continue;
                };
                let set = CtorSet::of(&col_ty, subst, registry);
                let arity = set.arity(&ctor, registry);
                let mut tys = set.field_types(&ctor, registry);
                tys.extend(tail_tys);
                let query = concrete
                    .clone()
                    .into_fields()
                    .into_iter()
                    .chain(tail.iter().cloned())
                    .collect();
                let next = problem.derive(
                    Frame::Wrap {
                        head: set.pattern(&ctor, registry),
                        arity,
                    },
                    specialize(&rows, &ctor, arity),
                    query,
                    tys,
                );
                work.push(next);
            }
        }
    }

    None
}

/// Whether `row` matches some value of type `ty` that none of `previous`
/// match.
#[must_use]
pub fn is_useful(
    previous: &[Pat],
    row: &Pat,
    ty: &Ty,
    subst: &Subst,
    registry: &TypeRegistry,
) -> bool {
    let rows = previous.iter().map(|p| vec![p.clone()]).collect();
    uncovered(rows, vec![row.clone()], vec![ty.clone()], subst, registry).is_some()
}

/// A value of type `ty` that none of `rows` match, or `None` if the rows
/// are exhaustive.
#[must_use]
pub fn witness(rows: &[Pat], ty: &Ty, subst: &Subst, registry: &TypeRegistry) -> Option<Pat> {
    let matrix = rows.iter().map(|p| vec![p.clone()]).collect();
    uncovered(matrix, vec![Pat::wild()], vec![ty.clone()], subst, registry)
        .and_then(|mut values| values.pop())
}
