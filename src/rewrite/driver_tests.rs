use super::*;
use crate::core::{FromExpr, PrimType, Step, Type, Value};
use crate::tracer::{NoopTracer, RecordingTracer};

#[test]
fn skip_pattern_recorded_for_non_id_top_level_pattern() {
    let decl = Decl::Val {
        pat: Pat::Tuple(vec![Pat::Id(Id::plain("x")), Pat::Id(Id::plain("y"))]),
        exp: Expr::Lit(Value::Int(1)),
    };
    let output = run(&decl, &Config::default(), &mut NoopTracer);
    let (id, original) = output.skip_pattern.expect("expected a skip pattern");
    assert_eq!(id.name, "it");
    assert!(matches!(original, Pat::Tuple(_)));
    assert!(matches!(&output.decl, Decl::Val { pat: Pat::Id(i), .. } if i.name == "it"));
}

#[test]
fn simple_id_pattern_has_no_skip_entry() {
    let decl = Decl::Val { pat: Pat::Id(Id::plain("x")), exp: Expr::Lit(Value::Int(1)) };
    let output = run(&decl, &Config::default(), &mut NoopTracer);
    assert!(output.skip_pattern.is_none());
}

#[test]
fn inline_pass_count_zero_runs_once_without_relationalizing() {
    let decl = Decl::Val {
        pat: Pat::Id(Id::plain("it")),
        exp: Expr::Let {
            decl: Box::new(Decl::Val { pat: Pat::Id(Id::plain("x")), exp: Expr::Lit(Value::Int(5)) }),
            body: Box::new(Expr::Id(Id::plain("x"))),
        },
    };
    let config = Config { inline_pass_count: 0, ..Config::default() };
    let output = run(&decl, &config, &mut NoopTracer);
    assert_eq!(output.decl, Decl::Val { pat: Pat::Id(Id::plain("it")), exp: Expr::Lit(Value::Int(5)) });
}

#[test]
fn fixed_point_stops_early_when_unchanged() {
    let decl = Decl::Val { pat: Pat::Id(Id::plain("it")), exp: Expr::Lit(Value::Int(1)) };
    let config = Config { inline_pass_count: 10, ..Config::default() };
    let mut tracer = RecordingTracer::default();
    run(&decl, &config, &mut tracer);
    // pass 0, pass 1, then exactly one iteration (pass 2) before the
    // identity check breaks the loop, then the final pass (-1).
    let passes: Vec<i32> = tracer.passes.iter().map(|(p, _)| *p).collect();
    assert_eq!(passes, vec![0, 1, 2, -1]);
}

#[test]
fn needs_unwrap_true_for_top_level_from() {
    let from = FromExpr::new(vec![Step::Scan { pat: Pat::Id(Id::plain("e")), exp: Expr::Id(Id::plain("emps")) }]);
    let decl = Decl::Val { pat: Pat::Id(Id::plain("it")), exp: Expr::From(from) };
    let output = run(&decl, &Config::default(), &mut NoopTracer);
    assert!(output.needs_unwrap);
}

#[test]
fn needs_unwrap_false_for_non_from() {
    let decl = Decl::Val { pat: Pat::Id(Id::plain("it")), exp: Expr::Lit(Value::Int(1)) };
    let output = run(&decl, &Config::default(), &mut NoopTracer);
    assert!(!output.needs_unwrap);
}

#[test]
fn match_coverage_reports_nonexhaustive_warning() {
    let decl = Decl::Val {
        pat: Pat::Id(Id::plain("it")),
        exp: Expr::Match {
            scrutinee: Box::new(Expr::Lit(Value::Bool(true))),
            scrutinee_ty: Type::Prim(PrimType::Bool),
            arms: vec![(Pat::Lit(Value::Bool(true)), Expr::Lit(Value::Unit))],
        },
    };
    let output = run(&decl, &Config::default(), &mut NoopTracer);
    assert_eq!(output.diagnostics.error_count(), 0);
    assert!(!output.diagnostics.is_empty());
}

#[test]
fn match_coverage_disabled_reports_nothing() {
    let decl = Decl::Val {
        pat: Pat::Id(Id::plain("it")),
        exp: Expr::Match {
            scrutinee: Box::new(Expr::Lit(Value::Bool(true))),
            scrutinee_ty: Type::Prim(PrimType::Bool),
            arms: vec![(Pat::Lit(Value::Bool(true)), Expr::Lit(Value::Unit))],
        },
    };
    let config = Config { match_coverage_enabled: false, ..Config::default() };
    let output = run(&decl, &config, &mut NoopTracer);
    assert!(output.diagnostics.is_empty());
}
