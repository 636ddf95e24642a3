use super::*;
use crate::core::{Pat, Value};

#[test]
fn inlines_trivial_let_binding() {
    let env = Environment::empty();
    let expr = Expr::Let {
        decl: Box::new(Decl::Val { pat: Pat::Id(Id::plain("x")), exp: Expr::Lit(Value::Int(1)) }),
        body: Box::new(Expr::Apply {
            func: Box::new(Expr::Id(Id::plain("f"))),
            arg: Box::new(Expr::Id(Id::plain("x"))),
        }),
    };
    let result = inline_pass(&expr, &env);
    assert_eq!(
        result,
        Expr::Apply { func: Box::new(Expr::Id(Id::plain("f"))), arg: Box::new(Expr::Lit(Value::Int(1))) }
    );
}

#[test]
fn inlines_single_use_non_trivial_binding() {
    let env = Environment::empty();
    let rhs = Expr::Apply {
        func: Box::new(Expr::Id(Id::plain("g"))),
        arg: Box::new(Expr::Id(Id::plain("y"))),
    };
    let expr = Expr::Let {
        decl: Box::new(Decl::Val { pat: Pat::Id(Id::plain("x")), exp: rhs.clone() }),
        body: Box::new(Expr::Id(Id::plain("x"))),
    };
    let result = inline_pass(&expr, &env);
    assert_eq!(result, rhs);
}

#[test]
fn preserves_let_when_used_more_than_once_and_not_trivial() {
    let env = Environment::empty();
    let rhs = Expr::Apply {
        func: Box::new(Expr::Id(Id::plain("g"))),
        arg: Box::new(Expr::Id(Id::plain("y"))),
    };
    let expr = Expr::Let {
        decl: Box::new(Decl::Val { pat: Pat::Id(Id::plain("x")), exp: rhs }),
        body: Box::new(Expr::Tuple(vec![Expr::Id(Id::plain("x")), Expr::Id(Id::plain("x"))])),
    };
    let result = inline_pass(&expr, &env);
    assert!(matches!(result, Expr::Let { .. }), "expected let preserved, got {result:?}");
}

#[test]
fn substitute_does_not_cross_shadowing_binder() {
    let value = Expr::Lit(Value::Int(9));
    let shadowed_fn =
        Expr::Fn { pat: Pat::Id(Id::plain("x")), body: Box::new(Expr::Id(Id::plain("x"))) };
    let result = substitute("x", &value, &shadowed_fn);
    assert_eq!(result, shadowed_fn, "inner `x` is bound by the lambda's own parameter");
}

#[test]
fn beta_reduces_an_immediately_applied_lambda() {
    let env = Environment::empty();
    let expr = Expr::Apply {
        func: Box::new(Expr::Fn {
            pat: Pat::Id(Id::plain("e")),
            body: Box::new(Expr::RecordSelector {
                field: "name".to_string(),
                arg: Box::new(Expr::Id(Id::plain("e"))),
            }),
        }),
        arg: Box::new(Expr::Id(Id::plain("e0"))),
    };
    let result = inline_pass(&expr, &env);
    assert_eq!(
        result,
        Expr::RecordSelector { field: "name".to_string(), arg: Box::new(Expr::Id(Id::plain("e0"))) }
    );
}

#[test]
fn leaves_redex_in_place_when_param_used_more_than_once_and_arg_not_trivial() {
    let env = Environment::empty();
    let arg = Expr::Apply { func: Box::new(Expr::Id(Id::plain("g"))), arg: Box::new(Expr::Id(Id::plain("y"))) };
    let expr = Expr::Apply {
        func: Box::new(Expr::Fn {
            pat: Pat::Id(Id::plain("e")),
            body: Box::new(Expr::Tuple(vec![Expr::Id(Id::plain("e")), Expr::Id(Id::plain("e"))])),
        }),
        arg: Box::new(arg),
    };
    let result = inline_pass(&expr, &env);
    assert!(matches!(result, Expr::Apply { .. }), "expected redex preserved, got {result:?}");
}

#[test]
fn count_uses_counts_free_occurrences() {
    let expr = Expr::Tuple(vec![Expr::Id(Id::plain("x")), Expr::Id(Id::plain("x")), Expr::Id(Id::plain("y"))]);
    assert_eq!(count_uses("x", &expr), 2);
    assert_eq!(count_uses("y", &expr), 1);
    assert_eq!(count_uses("z", &expr), 0);
}
