use super::*;
use crate::core::{Id, PrimType, Value};

fn int_ty() -> Type {
    Type::Prim(PrimType::Int)
}

fn eq_call(a: Expr, b: Expr) -> Expr {
    Expr::call2("=", a, b)
}

#[test]
fn detects_unbounded_inside_from() {
    let from = FromExpr::new(vec![Step::Scan { pat: Pat::Id(Id::plain("x")), exp: Expr::Unbounded(int_ty()) }]);
    assert!(contains_unbounded(&Expr::From(from)));
    assert!(!contains_unbounded(&Expr::Lit(Value::Int(1))));
}

#[test]
fn elaborates_scan_bound_by_trailing_equality_where() {
    let from = FromExpr::new(vec![
        Step::Scan { pat: Pat::Id(Id::plain("x")), exp: Expr::Unbounded(int_ty()) },
        Step::Where(eq_call(Expr::Id(Id::plain("x")), Expr::Lit(Value::Int(42)))),
        Step::Yield(Expr::Id(Id::plain("x"))),
    ]);
    let (result, still_unbounded) = elaborate(&Expr::From(from), 4);
    assert!(!still_unbounded);

    let Expr::From(from) = result else { panic!("expected From") };
    assert_eq!(from.steps.len(), 2, "the bounding where should be removed");
    match &from.steps[0] {
        Step::Scan { exp: Expr::Apply { func, arg }, .. } => {
            assert_eq!(**func, Expr::Id(Id::plain("single")));
            assert_eq!(**arg, Expr::Lit(Value::Int(42)));
        }
        other => panic!("expected scan bound to `single 42`, got {other:?}"),
    }
    assert!(matches!(&from.steps[1], Step::Yield(_)));
}

#[test]
fn elaborates_reversed_equality_bound() {
    let from = FromExpr::new(vec![
        Step::Scan { pat: Pat::Id(Id::plain("x")), exp: Expr::Unbounded(int_ty()) },
        Step::Where(eq_call(Expr::Lit(Value::Int(7)), Expr::Id(Id::plain("x")))),
    ]);
    let (result, still_unbounded) = elaborate(&Expr::From(from), 4);
    assert!(!still_unbounded);
    let Expr::From(from) = result else { panic!("expected From") };
    assert_eq!(from.steps.len(), 1);
}

#[test]
fn leaves_unbounded_scan_with_no_matching_where() {
    let from = FromExpr::new(vec![
        Step::Scan { pat: Pat::Id(Id::plain("x")), exp: Expr::Unbounded(int_ty()) },
        Step::Where(Expr::Id(Id::plain("flag"))),
    ]);
    let (result, still_unbounded) = elaborate(&Expr::From(from), 4);
    assert!(still_unbounded);
    let Expr::From(from) = result else { panic!("expected From") };
    assert_eq!(from.steps.len(), 2, "no rewrite should have happened");
}

#[test]
fn bounded_expression_is_unaffected() {
    let from = FromExpr::new(vec![Step::Scan { pat: Pat::Id(Id::plain("e")), exp: Expr::Id(Id::plain("emps")) }]);
    let (result, still_unbounded) = elaborate(&Expr::From(from.clone()), 4);
    assert!(!still_unbounded);
    assert_eq!(result, Expr::From(from));
}

#[test]
fn elaborate_decl_reports_unbounded_flag() {
    let from = FromExpr::new(vec![Step::Scan { pat: Pat::Id(Id::plain("x")), exp: Expr::Unbounded(int_ty()) }]);
    let decl = Decl::Val { pat: Pat::Id(Id::plain("it")), exp: Expr::From(from) };
    let (_, still_unbounded) = elaborate_decl(&decl, 4);
    assert!(still_unbounded);
}
