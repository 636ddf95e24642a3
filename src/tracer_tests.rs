use super::*;
use crate::core::{Expr, Id, Pat, Value as CoreValue};

fn sample_decl() -> Decl {
    Decl::Val { pat: Pat::Id(Id::plain("it")), exp: Expr::Lit(CoreValue::Unit) }
}

#[test]
fn noop_tracer_never_suppresses() {
    let mut tracer = NoopTracer;
    assert!(!tracer.on_exception(Some("boom")));
    assert!(!tracer.on_type_exception("bad type"));
    assert!(!tracer.handle_compile_exception(None));
}

#[test]
fn recording_tracer_accumulates_passes() {
    let mut tracer = RecordingTracer::default();
    tracer.on_core(0, &sample_decl());
    tracer.on_core(-1, &sample_decl());
    assert_eq!(tracer.passes.len(), 2);
    assert_eq!(tracer.passes[0].0, 0);
    assert_eq!(tracer.passes[1].0, -1);
}

#[test]
fn recording_tracer_accumulates_warnings() {
    let mut tracer = RecordingTracer::default();
    let mut diagnostics = Diagnostics::new();
    diagnostics.push(crate::diagnostics::Severity::Warning, "nonexhaustive".to_string());
    tracer.on_warnings(&diagnostics);
    assert_eq!(tracer.warnings.len(), 1);
}
