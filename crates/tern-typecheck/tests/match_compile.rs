//! Integration tests for match compilation.
//!
//! Every test checks a program, lowers its matches into decision trees and
//! evaluates both forms: they must agree on every input, including the
//! inputs no case matches.

mod common;

use common::*;
use tern_syntax::ast::{Expr, Pattern};
use tern_typecheck::TExpr;

/// Checks `expr`, then returns its value before and after lowering.
fn run_both(s: &mut Session, expr: Expr) -> (Option<Value>, Option<Value>) {
    let typed = s.check_expr(expr).unwrap();
    let lowered = s.ctx.lower(typed.clone());
    assert!(is_lowered(&lowered), "lowering left a nested pattern");
    (eval(&typed, &[]), eval(&lowered, &[]))
}

/// `None` or `Some n`.
fn option(s: &mut Session, value: Option<u128>) -> Expr {
    match value {
        Some(n) => s.call("Some", int_lit(n)),
        None => s.var("None"),
    }
}

fn declare_pair(s: &mut Session) {
    let a = s.ty_var("a");
    let b = s.ty_var("b");
    let decl = s.data("pair", &["a", "b"], vec![("Pair", vec![a, b])]);
    s.declare(vec![decl]);
}

#[test]
fn test_option_match_evaluates() {
    let mut s = Session::new();
    s.declare_option();

    let scrutinee = option(&mut s, Some(3));
    let none = s.p_ctor("None", vec![]);
    let some = s.p_bind("x");
    let some = s.p_ctor("Some", vec![some]);
    let x = s.var("x");
    let expr = match_on(scrutinee, vec![(none, int_lit(0)), (some, x)]);

    let (generic, lowered) = run_both(&mut s, expr);
    assert_eq!(generic, Some(Value::Int(3)));
    assert_eq!(lowered, generic);
}

#[test]
fn test_scrutinee_is_bound_once() {
    let mut s = Session::new();
    s.declare_option();

    let scrutinee = option(&mut s, None);
    let none = s.p_ctor("None", vec![]);
    let expr = match_on(scrutinee, vec![(none, bool_lit(true)), (wild(), bool_lit(false))]);
    let typed = s.check_expr(expr).unwrap();
    let lowered = s.ctx.lower(typed);

    let TExpr::Let { rec, bindings, body, .. } = lowered else {
        panic!("expected the scrutinee temporary");
    };
    assert!(!rec);
    assert_eq!(bindings.len(), 1);
    assert!(s.ctx.name(bindings[0].name).starts_with('%'));
    assert!(matches!(*body, TExpr::Match { .. }));
}

#[test]
fn test_nested_constructors_agree_on_every_input() {
    let mut s = Session::new();
    s.declare_option();
    declare_pair(&mut s);

    let inputs = [None, Some(1), Some(2)];
    for left in inputs {
        for right in inputs {
            let l = option(&mut s, left);
            let r = option(&mut s, right);
            let scrutinee = s.call("Pair", tuple(vec![l, r]));

            // Pair (None, None) -> 0
            // Pair (Some x, None) | Pair (None, Some x) -> x
            // Pair (Some 1, Some y) -> y
            let cases = {
                let nn = {
                    let (a, b) = (s.p_ctor("None", vec![]), s.p_ctor("None", vec![]));
                    s.p_ctor("Pair", vec![a, b])
                };
                let one_side = {
                    let x = s.p_bind("x");
                    let some_x = s.p_ctor("Some", vec![x]);
                    let none = s.p_ctor("None", vec![]);
                    let left_only = s.p_ctor("Pair", vec![some_x, none]);
                    let x = s.p_bind("x");
                    let some_x = s.p_ctor("Some", vec![x]);
                    let none = s.p_ctor("None", vec![]);
                    let right_only = s.p_ctor("Pair", vec![none, some_x]);
                    p_or(vec![left_only, right_only])
                };
                let both = {
                    let one = s.p_ctor("Some", vec![p_int(1)]);
                    let y = s.p_bind("y");
                    let some_y = s.p_ctor("Some", vec![y]);
                    s.p_ctor("Pair", vec![one, some_y])
                };
                let (x, y) = (s.var("x"), s.var("y"));
                vec![(nn, int_lit(0)), (one_side, x), (both, y)]
            };
            let expr = match_on(scrutinee, cases);

            let (generic, lowered) = run_both(&mut s, expr);
            assert_eq!(generic, lowered, "inputs {left:?} {right:?}");

            let expected = match (left, right) {
                (None, None) => Some(0),
                (Some(x), None) | (None, Some(x)) => Some(x as i128),
                (Some(1), Some(y)) => Some(y as i128),
                (Some(_), Some(_)) => None,
            };
            assert_eq!(generic, expected.map(Value::Int), "inputs {left:?} {right:?}");
        }
    }
}

#[test]
fn test_tuple_or_patterns_agree() {
    let mut s = Session::new();
    for a in [false, true] {
        for b in [false, true] {
            let scrutinee = tuple(vec![bool_lit(a), bool_lit(b)]);
            let any_true: Pattern = p_or(vec![
                p_tuple(vec![p_bool(true), wild()]),
                p_tuple(vec![wild(), p_bool(true)]),
            ]);
            let expr = match_on(scrutinee, vec![(any_true, int_lit(1)), (wild(), int_lit(0))]);

            let (generic, lowered) = run_both(&mut s, expr);
            assert_eq!(generic, Some(Value::Int(i128::from(a || b))));
            assert_eq!(lowered, generic);
        }
    }
}

#[test]
fn test_integer_switch_has_default() {
    let mut s = Session::new();
    for n in 0..4u128 {
        let n_pat = s.p_bind("n");
        let n_var = s.var("n");
        let expr = match_on(
            int_lit(n),
            vec![
                (p_int(0), int_lit(10)),
                (p_int(2), int_lit(20)),
                (n_pat, n_var),
            ],
        );
        let (generic, lowered) = run_both(&mut s, expr);
        let expected = match n {
            0 => 10,
            2 => 20,
            other => other as i128,
        };
        assert_eq!(generic, Some(Value::Int(expected)));
        assert_eq!(lowered, generic);
    }
}

#[test]
fn test_unmatched_value_reaches_match_failure() {
    let mut s = Session::new();
    s.declare_color();

    let scrutinee = s.var("Blue");
    let red = s.p_ctor("Red", vec![]);
    let green = s.p_ctor("Green", vec![]);
    let expr = match_on(scrutinee, vec![(red, int_lit(0)), (green, int_lit(1))]);

    let (generic, lowered) = run_both(&mut s, expr);
    assert_eq!(generic, None);
    assert_eq!(lowered, None);
    assert_eq!(s.warning_codes(), vec!["W0002".to_string()]);
}

#[test]
fn test_pattern_lambda_is_lowered() {
    let mut s = Session::new();
    s.declare_option();

    // (\None -> false | Some b -> b) (Some true)
    let none = s.p_ctor("None", vec![]);
    let b = s.p_bind("b");
    let some = s.p_ctor("Some", vec![b]);
    let b_var = s.var("b");
    let func = lambda_cases(vec![(none, bool_lit(false)), (some, b_var)]);
    let arg = s.call("Some", bool_lit(true));

    let (generic, lowered) = run_both(&mut s, app(func, arg));
    assert_eq!(generic, Some(Value::Bool(true)));
    assert_eq!(lowered, generic);
}
