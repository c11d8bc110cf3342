//! Typed AST.
//!
//! This is what the checker hands to later passes. Every node carries its
//! type, fully resolved once the unit it belongs to has been checked.
//! Matches come in two shapes: the generic form produced by the checker,
//! whose cases may hold nested patterns, and the shallow form produced by
//! [`lower`](crate::lower), whose cases test one constructor and bind its
//! fields to variables.

use crate::context::{Scheme, Subst};
use crate::pattern::Pat;
use crate::types::{TemplateId, Ty};
use tern_mem::Symbol;

/// A checked literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TLit {
    /// Boolean
    Bool(bool),
    /// Integer of the given width, as its two's-complement value
    Int {
        /// Bit width
        width: u32,
        /// Value
        value: i128,
    },
    /// String, escapes decoded
    Str(Vec<u8>),
}

/// A typed expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TExpr {
    /// Variable reference
    Var {
        /// Name
        name: Symbol,
        /// Type at this use
        ty: Ty,
    },

    /// Literal
    Lit {
        /// Value
        value: TLit,
        /// `bool`, `string` or an integer type
        ty: Ty,
    },

    /// Tuple of zero or at least two elements
    Tuple {
        /// Elements
        elems: Vec<TExpr>,
        /// Tuple type
        ty: Ty,
    },

    /// Constructor application. Multi-field constructors take a tuple.
    Ctor {
        /// Constructor name
        name: Symbol,
        /// Data type
        template: TemplateId,
        /// Case index
        case: usize,
        /// Field value, absent for nullary constructors
        arg: Option<Box<TExpr>>,
        /// The data type instance
        ty: Ty,
    },

    /// Single-parameter function
    Lambda {
        /// Parameter name
        param: Symbol,
        /// Parameter type
        param_ty: Ty,
        /// Body
        body: Box<TExpr>,
        /// Function type
        ty: Ty,
    },

    /// Application
    App {
        /// Function
        func: Box<TExpr>,
        /// Argument
        arg: Box<TExpr>,
        /// Result type
        ty: Ty,
    },

    /// `let` or `let rec` group
    Let {
        /// Whether the bindings see each other
        rec: bool,
        /// Bindings
        bindings: Vec<TBinding>,
        /// Scope of the bindings
        body: Box<TExpr>,
        /// Type of the body
        ty: Ty,
    },

    /// Match, tried case by case
    Match {
        /// Scrutinee
        scrutinee: Box<TExpr>,
        /// Cases in order
        cases: Vec<TCase>,
        /// Result type
        ty: Ty,
    },

    /// Reached when no case of a non-exhaustive match applies
    MatchFailure {
        /// Result type of the enclosing match
        ty: Ty,
    },
}

/// One binding of a `let` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TBinding {
    /// Bound name
    pub name: Symbol,
    /// Generalized scheme
    pub scheme: Scheme,
    /// Initializer
    pub expr: TExpr,
}

/// One case of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TCase {
    /// Pattern
    pub pat: Pat,
    /// Body
    pub body: TExpr,
}

/// A checked top-level unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TDecl {
    /// Data group; the templates it registered
    Data {
        /// Templates in declaration order
        templates: Vec<TemplateId>,
    },
    /// Type alias
    Alias {
        /// Alias name
        name: Symbol,
    },
    /// Top-level let group
    Let {
        /// Whether the bindings see each other
        rec: bool,
        /// Bindings, now in the global environment
        bindings: Vec<TBinding>,
    },
    /// Bare expression
    Expr(TExpr),
}

impl TDecl {
    /// The expression of an expression unit.
    #[must_use]
    pub fn expr(&self) -> Option<&TExpr> {
        match self {
            TDecl::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    /// The bindings of a let unit.
    #[must_use]
    pub fn bindings(&self) -> &[TBinding] {
        match self {
            TDecl::Let { bindings, .. } => bindings,
            _ => &[],
        }
    }

    pub(crate) fn zonk(&mut self, subst: &Subst) {
        match self {
            TDecl::Let { bindings, .. } => {
                for binding in bindings {
                    binding.zonk(subst);
                }
            }
            TDecl::Expr(expr) => expr.zonk(subst),
            TDecl::Data { .. } | TDecl::Alias { .. } => {}
        }
    }
}

impl TExpr {
    /// Type of the node.
    #[must_use]
    pub fn ty(&self) -> &Ty {
        match self {
            TExpr::Var { ty, .. }
            | TExpr::Lit { ty, .. }
            | TExpr::Tuple { ty, .. }
            | TExpr::Ctor { ty, .. }
            | TExpr::Lambda { ty, .. }
            | TExpr::App { ty, .. }
            | TExpr::Let { ty, .. }
            | TExpr::Match { ty, .. }
            | TExpr::MatchFailure { ty } => ty,
        }
    }

    pub(crate) fn ty_mut(&mut self) -> &mut Ty {
        match self {
            TExpr::Var { ty, .. }
            | TExpr::Lit { ty, .. }
            | TExpr::Tuple { ty, .. }
            | TExpr::Ctor { ty, .. }
            | TExpr::Lambda { ty, .. }
            | TExpr::App { ty, .. }
            | TExpr::Let { ty, .. }
            | TExpr::Match { ty, .. }
            | TExpr::MatchFailure { ty } => ty,
        }
    }

    /// Variable reference.
    #[must_use]
    pub fn var(name: Symbol, ty: Ty) -> Self {
        TExpr::Var { name, ty }
    }

    /// Resolves every type in the tree.
    pub fn zonk(&mut self, subst: &Subst) {
        let mut stack: Vec<&mut TExpr> = vec![self];
        while let Some(expr) = stack.pop() {
            let ty = subst.zonk(expr.ty());
            *expr.ty_mut() = ty;

            match expr {
                TExpr::Var { .. } | TExpr::Lit { .. } | TExpr::MatchFailure { .. } => {}
                TExpr::Tuple { elems, .. } => stack.extend(elems.iter_mut()),
                TExpr::Ctor { arg, .. } => {
                    if let Some(arg) = arg {
                        stack.push(arg);
                    }
                }
                TExpr::Lambda { param_ty, body, .. } => {
                    *param_ty = subst.zonk(param_ty);
                    stack.push(body);
                }
                TExpr::App { func, arg, .. } => {
                    stack.push(func);
                    stack.push(arg);
                }
                TExpr::Let { bindings, body, .. } => {
                    for binding in bindings.iter_mut() {
                        binding.scheme.zonk(subst);
                        stack.push(&mut binding.expr);
                    }
                    stack.push(body);
                }
                TExpr::Match {
                    scrutinee, cases, ..
                } => {
                    stack.push(scrutinee);
                    stack.extend(cases.iter_mut().map(|case| &mut case.body));
                }
            }
        }
    }
}

impl TBinding {
    fn zonk(&mut self, subst: &Subst) {
        self.scheme.zonk(subst);
        self.expr.zonk(subst);
    }
}
