//! Sink for intermediate compilation artefacts (spec.md §6 `Tracer`).
//!
//! Grounded on `plotnik-lib::engine::trace::Tracer`: a required-methods
//! trait with a `NoopTracer` that the compiler uses when no one is
//! watching, so call sites pay no cost for unused instrumentation.

use crate::core::{Decl, Value};
use crate::diagnostics::Diagnostics;
use crate::lower::builder::RelNode;

/// Observes a declaration as it moves through the rewrite driver and
/// query lowering.
///
/// - `on_core` fires at pass `0` (initial core), `1` (immediately before
///   inlining begins), every pass `>= 2` (after each inliner iteration),
///   and `-1` (final rewritten form) — spec.md §6.
/// - `on_exception`/`on_type_exception`/`handle_compile_exception` return
///   whether the caller should suppress the failure and continue.
pub trait Tracer {
    fn on_core(&mut self, pass: i32, decl: &Decl);
    fn on_plan(&mut self, plan: &RelNode);
    fn on_result(&mut self, value: &Value);
    fn on_warnings(&mut self, diagnostics: &Diagnostics);
    fn on_exception(&mut self, message: Option<&str>) -> bool;
    fn on_type_exception(&mut self, message: &str) -> bool;
    fn handle_compile_exception(&mut self, message: Option<&str>) -> bool;
}

/// A `Tracer` that discards every event and never suppresses a failure.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn on_core(&mut self, _pass: i32, _decl: &Decl) {}
    #[inline(always)]
    fn on_plan(&mut self, _plan: &RelNode) {}
    #[inline(always)]
    fn on_result(&mut self, _value: &Value) {}
    #[inline(always)]
    fn on_warnings(&mut self, _diagnostics: &Diagnostics) {}
    #[inline(always)]
    fn on_exception(&mut self, _message: Option<&str>) -> bool {
        false
    }
    #[inline(always)]
    fn on_type_exception(&mut self, _message: &str) -> bool {
        false
    }
    #[inline(always)]
    fn handle_compile_exception(&mut self, _message: Option<&str>) -> bool {
        false
    }
}

/// A `Tracer` that records every `on_core` snapshot, for tests and
/// debugging — analogous to `plotnik-lib`'s `PrintTracer`, minus the
/// formatting: callers inspect `passes` directly rather than printing.
#[derive(Default)]
pub struct RecordingTracer {
    pub passes: Vec<(i32, Decl)>,
    pub warnings: Vec<Diagnostics>,
}

impl Tracer for RecordingTracer {
    fn on_core(&mut self, pass: i32, decl: &Decl) {
        self.passes.push((pass, decl.clone()));
    }
    fn on_plan(&mut self, _plan: &RelNode) {}
    fn on_result(&mut self, _value: &Value) {}
    fn on_warnings(&mut self, diagnostics: &Diagnostics) {
        self.warnings.push(diagnostics.clone());
    }
    fn on_exception(&mut self, _message: Option<&str>) -> bool {
        false
    }
    fn on_type_exception(&mut self, _message: &str) -> bool {
        false
    }
    fn handle_compile_exception(&mut self, _message: Option<&str>) -> bool {
        false
    }
}

#[cfg(test)]
#[path = "tracer_tests.rs"]
mod tests;
