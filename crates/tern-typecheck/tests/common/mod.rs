// Common test utilities for integration tests
//
// AST builders that intern through a checking session, and a small
// evaluator for typed trees, used to compare generic matches with the
// decision trees they compile to.

#![allow(dead_code)]

use tern_mem::Symbol;
use tern_syntax::Span;
use tern_syntax::ast::{
    Binding, CaseDecl, DataDecl, Decl, Expr, Literal, MatchCase, Pattern, Type,
};
use tern_typecheck::{Context, Pat, Result, TDecl, TExpr, TLit, TemplateId, Ty};

pub fn span() -> Span {
    Span::new(0, 0, 0, 0, 0, 0)
}

/// A checking session plus builders for the surface AST.
pub struct Session {
    pub ctx: Context,
}

impl Session {
    pub fn new() -> Self {
        Self {
            ctx: Context::new(),
        }
    }

    pub fn sym(&mut self, s: &str) -> Symbol {
        self.ctx.intern(s)
    }

    // Types

    pub fn ty(&mut self, name: &str) -> Type {
        Type::Name {
            name: self.sym(name),
            span: span(),
        }
    }

    pub fn ty_var(&mut self, name: &str) -> Type {
        Type::Var {
            name: self.sym(name),
            span: span(),
        }
    }

    pub fn ty_app(&mut self, head: &str, args: Vec<Type>) -> Type {
        Type::App {
            head: Box::new(self.ty(head)),
            args,
            span: span(),
        }
    }

    // Patterns

    pub fn p_bind(&mut self, name: &str) -> Pattern {
        Pattern::Bind {
            name: self.sym(name),
            span: span(),
        }
    }

    pub fn p_ctor(&mut self, name: &str, args: Vec<Pattern>) -> Pattern {
        Pattern::Ctor {
            name: self.sym(name),
            args,
            span: span(),
        }
    }

    // Expressions

    pub fn var(&mut self, name: &str) -> Expr {
        Expr::Ident {
            name: self.sym(name),
            span: span(),
        }
    }

    pub fn call(&mut self, func: &str, arg: Expr) -> Expr {
        let func = self.var(func);
        app(func, arg)
    }

    pub fn lambda(&mut self, param: &str, body: Expr) -> Expr {
        let pattern = self.p_bind(param);
        lambda_cases(vec![(pattern, body)])
    }

    pub fn binding(&mut self, name: &str, value: Expr) -> Binding {
        Binding {
            name: self.sym(name),
            annotation: None,
            value,
            span: span(),
        }
    }

    pub fn let_in(&mut self, rec: bool, bindings: Vec<(&str, Expr)>, body: Expr) -> Expr {
        let bindings = bindings
            .into_iter()
            .map(|(name, value)| self.binding(name, value))
            .collect();
        Expr::Let {
            rec,
            bindings,
            body: Box::new(body),
            span: span(),
        }
    }

    // Declarations

    pub fn data(&mut self, name: &str, params: &[&str], cases: Vec<(&str, Vec<Type>)>) -> DataDecl {
        DataDecl {
            name: self.sym(name),
            params: params.iter().map(|p| self.sym(p)).collect(),
            cases: cases
                .into_iter()
                .map(|(case, fields)| CaseDecl {
                    name: self.sym(case),
                    fields,
                    span: span(),
                })
                .collect(),
            span: span(),
        }
    }

    /// Declares a data group, panicking on failure.
    pub fn declare(&mut self, group: Vec<DataDecl>) -> Vec<TemplateId> {
        let decl = Decl::Data {
            types: group,
            span: span(),
        };
        match self.ctx.check_decl(&decl) {
            Ok(TDecl::Data { templates }) => templates,
            Ok(other) => panic!("unexpected unit: {other:?}"),
            Err(err) => panic!("data declaration failed: {err}"),
        }
    }

    /// `data option a = None | Some a`
    pub fn declare_option(&mut self) -> TemplateId {
        let a = self.ty_var("a");
        let decl = self.data("option", &["a"], vec![("None", vec![]), ("Some", vec![a])]);
        self.declare(vec![decl])[0]
    }

    /// `data color = Red | Green | Blue`
    pub fn declare_color(&mut self) -> TemplateId {
        let decl = self.data(
            "color",
            &[],
            vec![("Red", vec![]), ("Green", vec![]), ("Blue", vec![])],
        );
        self.declare(vec![decl])[0]
    }

    pub fn check_expr(&mut self, expr: Expr) -> Result<TExpr> {
        let decl = Decl::Expr { expr, span: span() };
        match self.ctx.check_decl(&decl)? {
            TDecl::Expr(expr) => Ok(expr),
            other => panic!("unexpected unit: {other:?}"),
        }
    }

    pub fn check_let(&mut self, rec: bool, bindings: Vec<(&str, Expr)>) -> Result<TDecl> {
        let bindings = bindings
            .into_iter()
            .map(|(name, value)| self.binding(name, value))
            .collect();
        let decl = Decl::Let {
            rec,
            bindings,
            span: span(),
        };
        self.ctx.check_decl(&decl)
    }

    /// Codes of the warnings emitted since the last call.
    pub fn warning_codes(&mut self) -> Vec<String> {
        self.ctx
            .take_diagnostics()
            .into_iter()
            .filter_map(|d| d.code)
            .collect()
    }

    pub fn display(&self, ty: &Ty) -> String {
        self.ctx.display_ty(ty)
    }
}

pub fn bool_lit(b: bool) -> Expr {
    Expr::Literal {
        value: Literal::Bool(b),
        span: span(),
    }
}

pub fn int_lit(n: u128) -> Expr {
    Expr::Literal {
        value: Literal::Int {
            magnitude: n,
            width: None,
        },
        span: span(),
    }
}

pub fn app(func: Expr, arg: Expr) -> Expr {
    Expr::App {
        func: Box::new(func),
        arg: Box::new(arg),
        span: span(),
    }
}

pub fn tuple(elements: Vec<Expr>) -> Expr {
    Expr::Tuple {
        elements,
        span: span(),
    }
}

pub fn unit() -> Expr {
    tuple(Vec::new())
}

pub fn lambda_cases(cases: Vec<(Pattern, Expr)>) -> Expr {
    Expr::Lambda {
        cases: match_cases(cases),
        span: span(),
    }
}

pub fn match_on(scrutinee: Expr, cases: Vec<(Pattern, Expr)>) -> Expr {
    Expr::Match {
        scrutinee: Box::new(scrutinee),
        cases: match_cases(cases),
        span: span(),
    }
}

fn match_cases(cases: Vec<(Pattern, Expr)>) -> Vec<MatchCase> {
    cases
        .into_iter()
        .map(|(pattern, body)| MatchCase {
            pattern,
            body,
            span: span(),
        })
        .collect()
}

pub fn wild() -> Pattern {
    Pattern::Wildcard { span: span() }
}

pub fn p_bool(b: bool) -> Pattern {
    Pattern::Literal {
        value: Literal::Bool(b),
        span: span(),
    }
}

pub fn p_int(n: u128) -> Pattern {
    Pattern::Literal {
        value: Literal::Int {
            magnitude: n,
            width: None,
        },
        span: span(),
    }
}

pub fn p_tuple(elements: Vec<Pattern>) -> Pattern {
    Pattern::Tuple {
        elements,
        span: span(),
    }
}

pub fn p_or(alternatives: Vec<Pattern>) -> Pattern {
    Pattern::Or {
        alternatives,
        span: span(),
    }
}

// Evaluation

/// Runtime values of typed trees.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i128),
    Str(Vec<u8>),
    Tuple(Vec<Value>),
    Ctor { case: usize, arg: Option<Box<Value>> },
    Closure {
        param: Symbol,
        body: Box<TExpr>,
        env: Vec<(Symbol, Value)>,
    },
}

/// Evaluates `expr`. `None` means a match failed.
pub fn eval(expr: &TExpr, env: &[(Symbol, Value)]) -> Option<Value> {
    match expr {
        TExpr::Var { name, .. } => env
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone()),
        TExpr::Lit { value, .. } => Some(match value {
            TLit::Bool(b) => Value::Bool(*b),
            TLit::Int { value, .. } => Value::Int(*value),
            TLit::Str(bytes) => Value::Str(bytes.clone()),
        }),
        TExpr::Tuple { elems, .. } => elems
            .iter()
            .map(|e| eval(e, env))
            .collect::<Option<Vec<_>>>()
            .map(Value::Tuple),
        TExpr::Ctor { case, arg, .. } => {
            let arg = match arg {
                Some(a) => Some(Box::new(eval(a, env)?)),
                None => None,
            };
            Some(Value::Ctor { case: *case, arg })
        }
        TExpr::Lambda { param, body, .. } => Some(Value::Closure {
            param: *param,
            body: body.clone(),
            env: env.to_vec(),
        }),
        TExpr::App { func, arg, .. } => {
            let Value::Closure {
                param,
                body,
                env: mut closure_env,
            } = eval(func, env)?
            else {
                panic!("applied a non-function");
            };
            closure_env.push((param, eval(arg, env)?));
            eval(&body, &closure_env)
        }
        TExpr::Let {
            rec,
            bindings,
            body,
            ..
        } => {
            assert!(!rec, "the evaluator does not support let rec");
            let mut inner = env.to_vec();
            for binding in bindings {
                let value = eval(&binding.expr, env)?;
                inner.push((binding.name, value));
            }
            eval(body, &inner)
        }
        TExpr::Match {
            scrutinee, cases, ..
        } => {
            let value = eval(scrutinee, env)?;
            for case in cases {
                let mut binds = Vec::new();
                if matches(&case.pat, &value, &mut binds) {
                    let mut inner = env.to_vec();
                    inner.extend(binds);
                    return eval(&case.body, &inner);
                }
            }
            None
        }
        TExpr::MatchFailure { .. } => None,
    }
}

/// Whether `pat` matches `value`, collecting captures.
pub fn matches(pat: &Pat, value: &Value, binds: &mut Vec<(Symbol, Value)>) -> bool {
    match (pat, value) {
        (Pat::Wild { capture }, _) => {
            if let Some(name) = capture {
                binds.push((*name, value.clone()));
            }
            true
        }
        (Pat::Bool(p), Value::Bool(v)) => p == v,
        (Pat::Int { value: p, .. }, Value::Int(v)) => p == v,
        (Pat::Str(p), Value::Str(v)) => p == v,
        (Pat::Tuple(pats), Value::Tuple(vals)) => {
            pats.len() == vals.len() && pats.iter().zip(vals).all(|(p, v)| matches(p, v, binds))
        }
        (Pat::Ctor { case, args, .. }, Value::Ctor { case: vcase, arg }) => {
            if case != vcase {
                return false;
            }
            match (args.as_slice(), arg) {
                ([], None) => true,
                ([single], Some(v)) => matches(single, v, binds),
                (many, Some(v)) => match &**v {
                    Value::Tuple(vals) => {
                        many.len() == vals.len()
                            && many.iter().zip(vals).all(|(p, v)| matches(p, v, binds))
                    }
                    _ => false,
                },
                _ => false,
            }
        }
        (Pat::Or(alts), _) => alts.iter().any(|alt| {
            let mut trial = Vec::new();
            let hit = matches(alt, value, &mut trial);
            if hit {
                binds.extend(trial);
            }
            hit
        }),
        _ => false,
    }
}

/// Whether every match in `expr` is shallow: one constructor per case,
/// fields bound to plain variables.
pub fn is_lowered(expr: &TExpr) -> bool {
    match expr {
        TExpr::Match {
            scrutinee, cases, ..
        } => {
            let shallow = cases.iter().all(|case| match &case.pat {
                Pat::Tuple(ps) | Pat::Ctor { args: ps, .. } => ps.iter().all(Pat::is_wild),
                Pat::Or(_) => false,
                _ => true,
            });
            shallow && is_lowered(scrutinee) && cases.iter().all(|c| is_lowered(&c.body))
        }
        TExpr::Let { bindings, body, .. } => {
            bindings.iter().all(|b| is_lowered(&b.expr)) && is_lowered(body)
        }
        TExpr::Lambda { body, .. } => is_lowered(body),
        TExpr::App { func, arg, .. } => is_lowered(func) && is_lowered(arg),
        TExpr::Tuple { elems, .. } => elems.iter().all(is_lowered),
        TExpr::Ctor { arg, .. } => arg.as_deref().is_none_or(is_lowered),
        TExpr::Var { .. } | TExpr::Lit { .. } | TExpr::MatchFailure { .. } => true,
    }
}
