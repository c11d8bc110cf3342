//! Substitutions for type unification.
//!
//! Type variables are indices into an arena of cells. A cell is
//!
//! - `Unbound`: a flexible variable nobody has constrained yet,
//! - `Grounded`: a rigid variable, bound to itself; it never changes,
//! - `Link`: an alias of another variable (union-find parent pointer),
//! - `Bound`: solved to a type.
//!
//! Each cell is written at most once by unification (from `Unbound` to
//! `Link` or `Bound`). Path compression also rewrites `Link` targets, which
//! does not change what the variable means.
//!
//! Writes made while a [`SubstSnapshot`] is open are journaled, so a failed
//! top-level unit can put every cell it touched back the way it found it.
//!
//! # Example
//!
//! ```
//! use tern_typecheck::{Subst, Ty};
//!
//! let mut subst = Subst::new();
//! let a = subst.fresh_unifiable();
//! let snap = subst.snapshot();
//! subst.bind(a, Ty::unit());
//! assert_eq!(subst.zonk(&Ty::Var(a)), Ty::unit());
//!
//! subst.rollback_to(snap);
//! assert_eq!(subst.zonk(&Ty::Var(a)), Ty::Var(a));
//! ```

use crate::types::{TemplateId, Ty, TyVar};
use fxhash::FxHashSet;
use tern_mem::Symbol;

/// State of one type variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Flexible, unconstrained
    Unbound,
    /// Rigid; carries the quantifier name when it has one
    Grounded(Option<Symbol>),
    /// Alias of another variable
    Link(TyVar),
    /// Solved
    Bound(Ty),
}

/// Position in a substitution's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstSnapshot {
    cells: usize,
    journal: usize,
}

/// Arena of type variable cells with union-find lookup.
#[derive(Debug, Clone, Default)]
pub struct Subst {
    cells: Vec<Cell>,

    /// Previous contents of cells written while a snapshot is open.
    journal: Vec<(TyVar, Cell)>,

    /// Number of open snapshots.
    open: usize,
}

impl Subst {
    /// Create a new empty substitution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of variables created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no variable has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn push(&mut self, cell: Cell) -> TyVar {
        let var = TyVar(self.cells.len() as u32);
        self.cells.push(cell);
        var
    }

    /// Allocate a flexible variable.
    pub fn fresh_unifiable(&mut self) -> TyVar {
        self.push(Cell::Unbound)
    }

    /// Allocate a flexible variable and wrap it in a type.
    pub fn fresh_var(&mut self) -> Ty {
        Ty::Var(self.fresh_unifiable())
    }

    /// Allocate a rigid variable named after the quantifier that introduced it.
    pub fn fresh_grounded(&mut self, name: Symbol) -> TyVar {
        self.push(Cell::Grounded(Some(name)))
    }

    /// Allocate a rigid variable with no source name.
    pub fn fresh_skolem(&mut self) -> TyVar {
        self.push(Cell::Grounded(None))
    }

    /// The raw cell of `var`, without following links.
    #[must_use]
    pub fn cell(&self, var: TyVar) -> &Cell {
        &self.cells[var.index()]
    }

    fn write(&mut self, var: TyVar, cell: Cell) {
        let old = std::mem::replace(&mut self.cells[var.index()], cell);
        if self.open > 0 {
            self.journal.push((var, old));
        }
    }

    /// Representative of `var`, without compressing the path.
    #[must_use]
    pub fn root(&self, var: TyVar) -> TyVar {
        let mut current = var;
        while let Cell::Link(next) = self.cells[current.index()] {
            current = next;
        }
        current
    }

    /// Representative of `var`, pointing every link on the way at it.
    pub fn find(&mut self, var: TyVar) -> TyVar {
        let root = self.root(var);
        let mut current = var;
        while let Cell::Link(next) = self.cells[current.index()] {
            if next != root {
                self.write(current, Cell::Link(root));
            }
            current = next;
        }
        root
    }

    /// Whether `var` resolves to a rigid variable.
    #[must_use]
    pub fn is_grounded(&self, var: TyVar) -> bool {
        matches!(self.cells[self.root(var).index()], Cell::Grounded(_))
    }

    /// Whether `var` resolves to an unconstrained flexible variable.
    #[must_use]
    pub fn is_unbound(&self, var: TyVar) -> bool {
        matches!(self.cells[self.root(var).index()], Cell::Unbound)
    }

    /// Source name of the rigid variable `var` resolves to.
    #[must_use]
    pub fn grounded_name(&self, var: TyVar) -> Option<Symbol> {
        match self.cells[self.root(var).index()] {
            Cell::Grounded(name) => name,
            _ => None,
        }
    }

    /// Makes the unbound root `from` an alias of `to`.
    pub fn link(&mut self, from: TyVar, to: TyVar) {
        debug_assert!(matches!(self.cells[from.index()], Cell::Unbound));
        self.write(from, Cell::Link(to));
    }

    /// Solves the unbound root `var` to `ty`.
    ///
    /// No occurs check is done here; see [`Subst::occurs`].
    pub fn bind(&mut self, var: TyVar, ty: Ty) {
        debug_assert!(matches!(self.cells[var.index()], Cell::Unbound));
        self.write(var, Cell::Bound(ty));
    }

    /// Head-normal form of `ty`.
    ///
    /// Bound variables are replaced by their solutions until the head is a
    /// constructor or an unsolved variable (returned as its root), and
    /// applications whose head turns out to be a `Forall` are reduced.
    /// Sub-terms are left alone.
    #[must_use]
    pub fn shallow(&self, ty: &Ty) -> Ty {
        let mut current = ty.clone();
        loop {
            match current {
                Ty::Var(var) => {
                    let root = self.root(var);
                    match &self.cells[root.index()] {
                        Cell::Bound(solved) => current = solved.clone(),
                        _ => return Ty::Var(root),
                    }
                }
                Ty::App(head, args) => match self.shallow(&head) {
                    lambda @ Ty::Forall(..) => current = Ty::apply(lambda, args),
                    Ty::App(inner, mut first) => {
                        first.extend(args);
                        return Ty::App(inner, first);
                    }
                    other => return Ty::App(Box::new(other), args),
                },
                other => return other,
            }
        }
    }

    /// Fully resolves `ty`: no bound variable remains anywhere in the result.
    #[must_use]
    pub fn zonk(&self, ty: &Ty) -> Ty {
        enum Step {
            Visit(Ty),
            Arrow,
            Tuple(usize),
            Nominal(TemplateId, usize),
            Forall(Vec<TyVar>),
            App(usize),
        }

        let mut steps = vec![Step::Visit(ty.clone())];
        let mut done: Vec<Ty> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(t) => match self.shallow(&t) {
                    Ty::Var(v) => done.push(Ty::Var(v)),
                    Ty::Arrow(param, result) => {
                        steps.push(Step::Arrow);
                        steps.push(Step::Visit(*result));
                        steps.push(Step::Visit(*param));
                    }
                    Ty::Tuple(elems) => {
                        steps.push(Step::Tuple(elems.len()));
                        steps.extend(elems.into_iter().rev().map(Step::Visit));
                    }
                    Ty::Nominal { template, args } => {
                        steps.push(Step::Nominal(template, args.len()));
                        steps.extend(args.into_iter().rev().map(Step::Visit));
                    }
                    Ty::Forall(params, body) => {
                        steps.push(Step::Forall(params));
                        steps.push(Step::Visit(*body));
                    }
                    Ty::App(head, args) => {
                        steps.push(Step::App(args.len()));
                        steps.extend(args.into_iter().rev().map(Step::Visit));
                        steps.push(Step::Visit(*head));
                    }
                },
                Step::Arrow => {
                    let result = done.pop();
                    let param = done.pop();
                    if let (Some(param), Some(result)) = (param, result) {
                        done.push(Ty::arrow(param, result));
                    }
                }
                Step::Tuple(n) => {
                    let elems = done.split_off(done.len() - n);
                    done.push(Ty::Tuple(elems));
                }
                Step::Nominal(template, n) => {
                    let args = done.split_off(done.len() - n);
                    done.push(Ty::Nominal { template, args });
                }
                Step::Forall(params) => {
                    if let Some(body) = done.pop() {
                        done.push(Ty::Forall(params, Box::new(body)));
                    }
                }
                Step::App(n) => {
                    let args = done.split_off(done.len() - n);
                    if let Some(head) = done.pop() {
                        done.push(Ty::apply(head, args));
                    }
                }
            }
        }

        done.pop().unwrap_or_else(|| ty.clone())
    }

    /// Whether the variable `var` occurs anywhere inside `ty`.
    #[must_use]
    pub fn occurs(&self, var: TyVar, ty: &Ty) -> bool {
        let var = self.root(var);
        let mut stack = vec![ty.clone()];
        while let Some(t) = stack.pop() {
            match self.shallow(&t) {
                Ty::Var(v) => {
                    if v == var {
                        return true;
                    }
                }
                other => stack.extend(other.children().into_iter().cloned()),
            }
        }
        false
    }

    /// Unsolved variables of `ty` (flexible and rigid), in order of first
    /// occurrence. Variables bound by a `Forall` inside `ty` are excluded.
    #[must_use]
    pub fn free_vars(&self, ty: &Ty) -> Vec<TyVar> {
        let mut seen = FxHashSet::default();
        let mut quantified = FxHashSet::default();
        let mut found = Vec::new();
        let mut stack = vec![ty.clone()];

        while let Some(t) = stack.pop() {
            match self.shallow(&t) {
                Ty::Var(v) => {
                    if seen.insert(v) {
                        found.push(v);
                    }
                }
                other => {
                    if let Ty::Forall(params, _) = &other {
                        quantified.extend(params.iter().map(|p| self.root(*p)));
                    }
                    stack.extend(other.children().into_iter().rev().cloned());
                }
            }
        }

        found.retain(|v| !quantified.contains(v));
        found
    }

    /// Starts journaling writes.
    pub fn snapshot(&mut self) -> SubstSnapshot {
        self.open += 1;
        SubstSnapshot {
            cells: self.cells.len(),
            journal: self.journal.len(),
        }
    }

    /// Undoes every write and allocation made since `snapshot`.
    pub fn rollback_to(&mut self, snapshot: SubstSnapshot) {
        while self.journal.len() > snapshot.journal {
            if let Some((var, old)) = self.journal.pop() {
                if var.index() < self.cells.len() {
                    self.cells[var.index()] = old;
                }
            }
        }
        self.cells.truncate(snapshot.cells);
        self.close();
    }

    /// Keeps everything done since `snapshot`.
    pub fn commit(&mut self, snapshot: SubstSnapshot) {
        debug_assert!(self.journal.len() >= snapshot.journal);
        self.close();
    }

    fn close(&mut self) {
        self.open = self.open.saturating_sub(1);
        if self.open == 0 {
            self.journal.clear();
        }
    }
}
