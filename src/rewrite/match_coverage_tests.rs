use super::*;
use crate::core::{Ctor, DataType, Id};
use crate::diagnostics::Severity;

fn bool_ty() -> Type {
    Type::Prim(PrimType::Bool)
}

fn option_ty() -> Type {
    Type::Data(DataType {
        name: "option".to_string(),
        ctors: vec![
            Ctor { name: "NONE".to_string(), arg: None },
            Ctor { name: "SOME".to_string(), arg: Some(Box::new(Type::Prim(PrimType::Int))) },
        ],
        is_collection: false,
    })
}

#[test]
fn wildcard_subsumes_everything() {
    assert!(subsumes(&Pat::Wildcard, &Pat::Lit(Value::Bool(true))));
    assert!(subsumes(&Pat::Id(Id::plain("x")), &Pat::Wildcard));
}

#[test]
fn literal_only_subsumes_equal_literal() {
    assert!(subsumes(&Pat::Lit(Value::Int(1)), &Pat::Lit(Value::Int(1))));
    assert!(!subsumes(&Pat::Lit(Value::Int(1)), &Pat::Lit(Value::Int(2))));
}

#[test]
fn redundant_indices_flags_pattern_after_catch_all() {
    let pats = vec![Pat::Wildcard, Pat::Lit(Value::Bool(true))];
    assert_eq!(redundant_indices(&pats), vec![1]);
}

#[test]
fn redundant_indices_empty_when_no_subsumption() {
    let pats = vec![Pat::Lit(Value::Bool(true)), Pat::Lit(Value::Bool(false))];
    assert!(redundant_indices(&pats).is_empty());
}

#[test]
fn bool_exhaustive_requires_both_literals() {
    assert!(!is_exhaustive(&bool_ty(), &[Pat::Lit(Value::Bool(true))]));
    assert!(is_exhaustive(&bool_ty(), &[Pat::Lit(Value::Bool(true)), Pat::Lit(Value::Bool(false))]));
}

#[test]
fn datatype_exhaustive_requires_every_ctor() {
    let pats = vec![Pat::Con { name: "NONE".to_string(), arg: None }];
    assert!(!is_exhaustive(&option_ty(), &pats));
    let pats2 = vec![
        Pat::Con { name: "NONE".to_string(), arg: None },
        Pat::Con { name: "SOME".to_string(), arg: Some(Box::new(Pat::Wildcard)) },
    ];
    assert!(is_exhaustive(&option_ty(), &pats2));
}

#[test]
fn check_match_combines_redundant_and_nonexhaustive() {
    let mut diagnostics = Diagnostics::new();
    let arms = vec![
        (Pat::Lit(Value::Bool(true)), Expr::Lit(Value::Unit)),
        (Pat::Lit(Value::Bool(true)), Expr::Lit(Value::Unit)),
    ];
    check_match(&bool_ty(), &arms, &mut diagnostics);
    assert_eq!(diagnostics.error_count(), 1);
    let msg = diagnostics.iter().next().unwrap();
    assert_eq!(msg.severity, Severity::Error);
    assert_eq!(msg.message, "match redundant and nonexhaustive");
}

#[test]
fn check_match_warns_on_nonexhaustive_only() {
    let mut diagnostics = Diagnostics::new();
    let arms = vec![(Pat::Lit(Value::Bool(true)), Expr::Lit(Value::Unit))];
    check_match(&bool_ty(), &arms, &mut diagnostics);
    assert_eq!(diagnostics.error_count(), 0);
    let msg = diagnostics.iter().next().unwrap();
    assert_eq!(msg.severity, Severity::Warning);
}
