//! Integration tests for coverage warnings.
//!
//! Matches are checked end to end through `Context::check_decl`; the
//! warnings are read back by code (`W0001` useless case, `W0002`
//! non-exhaustive match).

mod common;

use common::*;
use tern_syntax::ast::{Expr, Pattern};
use tern_typecheck::pattern::{is_useful, witness};
use tern_typecheck::{CheckerOptions, Context, Pat, Ty};

/// `\v -> match v with cases`, so the scrutinee type comes from the
/// patterns alone.
fn match_param(s: &mut Session, cases: Vec<(Pattern, Expr)>) -> Expr {
    let v = s.var("v");
    let body = match_on(v, cases);
    s.lambda("v", body)
}

fn declare_pair(s: &mut Session) {
    let a = s.ty_var("a");
    let b = s.ty_var("b");
    let decl = s.data("pair", &["a", "b"], vec![("Pair", vec![a, b])]);
    s.declare(vec![decl]);
}

/// `Pair (l, r) -> i` rows; `true` stands for `Some _`, `false` for `None`.
fn option_pairs(s: &mut Session, combos: &[(bool, bool)]) -> Vec<(Pattern, Expr)> {
    let side = |s: &mut Session, some: bool| {
        if some {
            s.p_ctor("Some", vec![wild()])
        } else {
            s.p_ctor("None", vec![])
        }
    };
    combos
        .iter()
        .enumerate()
        .map(|(i, &(left, right))| {
            let (l, r) = (side(s, left), side(s, right));
            (s.p_ctor("Pair", vec![l, r]), int_lit(i as u128))
        })
        .collect()
}

#[test]
fn test_bool_match_is_exhaustive() {
    let mut s = Session::new();
    let expr = match_on(
        bool_lit(true),
        vec![(p_bool(true), int_lit(1)), (p_bool(false), int_lit(2))],
    );
    s.check_expr(expr).unwrap();
    assert!(s.warning_codes().is_empty());
}

#[test]
fn test_missing_bool_case() {
    let mut s = Session::new();
    let expr = match_on(bool_lit(true), vec![(p_bool(true), int_lit(1))]);
    s.check_expr(expr).unwrap();

    let diagnostics = s.ctx.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some("W0002"));
    assert_eq!(diagnostics[0].notes[0].message, "`false` is not matched");
}

#[test]
fn test_case_after_wildcard_is_useless() {
    let mut s = Session::new();
    let expr = match_on(
        bool_lit(true),
        vec![(wild(), int_lit(1)), (p_bool(true), int_lit(2))],
    );
    s.check_expr(expr).unwrap();
    assert_eq!(s.warning_codes(), vec!["W0001".to_string()]);
}

#[test]
fn test_enum_coverage() {
    let mut s = Session::new();
    s.declare_color();

    let all = vec![
        (s.p_ctor("Red", vec![]), int_lit(0)),
        (s.p_ctor("Green", vec![]), int_lit(1)),
        (s.p_ctor("Blue", vec![]), int_lit(2)),
    ];
    let expr = match_param(&mut s, all);
    s.check_expr(expr).unwrap();
    assert!(s.warning_codes().is_empty());

    let partial = vec![
        (s.p_bind("Red"), int_lit(0)),
        (s.p_bind("Green"), int_lit(1)),
    ];
    let expr = match_param(&mut s, partial);
    s.check_expr(expr).unwrap();
    let diagnostics = s.ctx.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].notes[0].message, "`Blue` is not matched");

    let redundant = vec![
        (s.p_ctor("Red", vec![]), int_lit(0)),
        (s.p_ctor("Green", vec![]), int_lit(1)),
        (s.p_ctor("Blue", vec![]), int_lit(2)),
        (wild(), int_lit(3)),
    ];
    let expr = match_param(&mut s, redundant);
    s.check_expr(expr).unwrap();
    assert_eq!(s.warning_codes(), vec!["W0001".to_string()]);
}

#[test]
fn test_tuple_of_wildcards_is_exhaustive() {
    let mut s = Session::new();
    let scrutinee = tuple(vec![bool_lit(true), bool_lit(false)]);
    let expr = match_on(scrutinee, vec![(p_tuple(vec![wild(), wild()]), int_lit(0))]);
    s.check_expr(expr).unwrap();
    assert!(s.warning_codes().is_empty());
}

#[test]
fn test_nested_options_need_every_combination() {
    let mut s = Session::new();
    s.declare_option();
    declare_pair(&mut s);

    let three = option_pairs(&mut s, &[(false, false), (false, true), (true, false)]);
    let expr = match_param(&mut s, three);
    s.check_expr(expr).unwrap();
    let diagnostics = s.ctx.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some("W0002"));
    assert!(diagnostics[0].notes[0].message.starts_with("`Pair (Some"));

    let four = option_pairs(
        &mut s,
        &[(false, false), (false, true), (true, false), (true, true)],
    );
    let expr = match_param(&mut s, four);
    s.check_expr(expr).unwrap();
    assert!(s.warning_codes().is_empty());
}

#[test]
fn test_integer_literals_need_a_default() {
    let mut s = Session::new();
    let expr = match_on(
        int_lit(1),
        vec![(p_int(0), bool_lit(true)), (p_int(1), bool_lit(false))],
    );
    s.check_expr(expr).unwrap();
    let diagnostics = s.ctx.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].notes[0].message, "`-2147483648` is not matched");

    let expr = match_on(
        int_lit(1),
        vec![(p_int(0), bool_lit(true)), (wild(), bool_lit(false))],
    );
    s.check_expr(expr).unwrap();
    assert!(s.warning_codes().is_empty());
}

#[test]
fn test_warnings_can_be_disabled() {
    let mut s = Session {
        ctx: Context::with_options(
            CheckerOptions::new()
                .warn_useless(false)
                .warn_non_exhaustive(false),
        ),
    };
    let expr = match_on(
        bool_lit(true),
        vec![(wild(), int_lit(1)), (p_bool(true), int_lit(2))],
    );
    s.check_expr(expr).unwrap();
    let expr = match_on(bool_lit(true), vec![(p_bool(true), int_lit(1))]);
    s.check_expr(expr).unwrap();
    assert!(s.warning_codes().is_empty());
}

#[test]
fn test_usefulness_queries() {
    let mut s = Session::new();
    let color = s.declare_color();
    let ty = Ty::nominal(color);
    let red = s.ctx.intern("Red");
    let green = s.ctx.intern("Green");
    let ctor = |name, case| Pat::Ctor {
        name,
        template: color,
        case,
        args: Vec::new(),
    };

    let rows = vec![ctor(red, 0), ctor(green, 1)];
    let ctx = &s.ctx;
    assert!(!is_useful(&rows, &ctor(red, 0), &ty, &ctx.subst, &ctx.registry));
    assert!(is_useful(&rows, &Pat::wild(), &ty, &ctx.subst, &ctx.registry));

    let missing = witness(&rows, &ty, &ctx.subst, &ctx.registry).unwrap();
    assert!(matches!(missing, Pat::Ctor { case: 2, .. }));
    assert_eq!(missing.display(&ctx.interner).to_string(), "Blue");

    let all = vec![Pat::Or(vec![ctor(red, 0), ctor(green, 1)]), Pat::wild()];
    assert!(witness(&all, &ty, &ctx.subst, &ctx.registry).is_none());
}
