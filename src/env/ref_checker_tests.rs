use super::*;
use crate::core::{Direction, Expr, FromExpr, Id, Pat, Step, Value};
use crate::env::binding::Binding;

#[test]
fn bound_identifier_passes() {
    let env = Environment::empty().bind(Binding::val(Id::plain("x")));
    let expr = Expr::Id(Id::plain("x"));
    assert!(check_refs(&env, &expr).is_ok());
}

#[test]
fn unbound_identifier_fails() {
    let env = Environment::empty();
    let expr = Expr::Id(Id::plain("missing"));
    let err = check_refs(&env, &expr).unwrap_err();
    assert_eq!(err.name, "missing");
}

#[test]
fn fn_binds_its_parameter_in_body() {
    let env = Environment::empty();
    let expr = Expr::Fn { pat: Pat::Id(Id::plain("x")), body: Box::new(Expr::Id(Id::plain("x"))) };
    assert!(check_refs(&env, &expr).is_ok());
}

#[test]
fn from_scan_binds_for_later_steps_but_not_where_before_it() {
    let from = FromExpr::new(vec![
        Step::Scan { pat: Pat::Id(Id::plain("e")), exp: Expr::Lit(Value::Unit) },
        Step::Where(Expr::Id(Id::plain("e"))),
        Step::Yield(Expr::Id(Id::plain("e"))),
    ]);
    let env = Environment::empty();
    assert!(check_refs(&env, &Expr::From(from)).is_ok());
}

#[test]
fn from_where_referencing_unbound_name_fails() {
    let from = FromExpr::new(vec![
        Step::Scan { pat: Pat::Id(Id::plain("e")), exp: Expr::Lit(Value::Unit) },
        Step::Where(Expr::Id(Id::plain("nope"))),
    ]);
    let env = Environment::empty();
    let err = check_refs(&env, &Expr::From(from)).unwrap_err();
    assert_eq!(err.name, "nope");
}

#[test]
fn order_step_direction_does_not_affect_binding() {
    let from = FromExpr::new(vec![
        Step::Scan { pat: Pat::Id(Id::plain("e")), exp: Expr::Lit(Value::Unit) },
        Step::Order(vec![(Expr::Id(Id::plain("e")), Direction::Descending)]),
    ]);
    assert!(check_refs(&Environment::empty(), &Expr::From(from)).is_ok());
}
