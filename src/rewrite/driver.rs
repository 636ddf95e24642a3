//! C6: the rewrite driver — the fixed-point loop over the inliner,
//! the relationalizer (C5), and unbounded-extent elaboration, plus
//! match-coverage checking and the final skip-pattern/unwrap bookkeeping
//! (spec.md §4.5).
//!
//! Grounded on `plotnik-compiler::compile::compiler::Compiler::compile`'s
//! multi-pass builder orchestration, generalized from a single compile
//! pass to an iterate-to-fixed-point loop (the shape
//! `datafusion`'s `OptimizerRule` fixed-point runner uses for its own
//! rewrite passes).

use crate::config::Config;
use crate::core::{Decl, Expr, Id, Pat};
use crate::diagnostics::Diagnostics;
use crate::env::visitor::{walk_expr, EnvSink};
use crate::env::Environment;
use crate::tracer::Tracer;

use super::inliner::inline_pass;
use super::match_coverage::check_match;
use super::relationalizer::relationalize;
use super::unbounded::elaborate_decl;

/// The result of running the driver on one declaration.
pub struct DriverOutput {
    pub decl: Decl,
    /// Present when the original top-level pattern was not a simple id:
    /// `decl` has been upgraded to bind the synthetic name `it`, and this
    /// holds `(it, original_pattern)` so the printer can destructure `it`
    /// back into the user's pattern instead of printing it literally
    /// (spec.md §4.5 step 4).
    pub skip_pattern: Option<(Id, Pat)>,
    /// Whether this declaration's printed value must be fully
    /// materialized even if its underlying representation is a relation
    /// handle (spec.md §4.5 step 5) — true when the top-level expression
    /// is a `from`.
    pub needs_unwrap: bool,
    pub diagnostics: Diagnostics,
    /// Whether any unbounded pattern remains after elaboration.
    pub still_unbounded: bool,
}

/// Run the rewrite driver on `decl` under `config`, reporting progress
/// through `tracer`.
pub fn run(decl: &Decl, config: &Config, tracer: &mut dyn Tracer) -> DriverOutput {
    let mut diagnostics = Diagnostics::new();

    if config.match_coverage_enabled {
        check_matches(decl, &mut diagnostics);
        if !diagnostics.is_empty() {
            tracer.on_warnings(&diagnostics);
        }
    }

    tracer.on_core(0, decl);

    let (mut current, skip_pattern) = apply_skip_pattern(decl.clone());

    tracer.on_core(1, &current);

    if config.inline_pass_count == 0 {
        current = map_exprs(&current, |e| inline_pass(e, &Environment::empty()));
    } else {
        for pass in 0..config.inline_pass_count {
            let before = current.clone();
            current = map_exprs(&current, |e| inline_pass(e, &Environment::empty()));
            if config.relationalize {
                current = map_exprs(&current, |e| relationalize(e, &mut crate::env::NameGenerator::new()));
            }
            tracer.on_core(2 + pass as i32, &current);
            if current == before {
                break;
            }
        }
    }

    let (current, still_unbounded) = elaborate_decl(&current, config.inline_pass_count);

    tracer.on_core(-1, &current);

    let needs_unwrap = decl_is_from(&current);

    DriverOutput { decl: current, skip_pattern, needs_unwrap, diagnostics, still_unbounded }
}

/// If `decl`'s top-level `val` pattern is not a simple id, upgrade it to
/// bind `it` instead, returning the original pattern as the skip entry.
fn apply_skip_pattern(decl: Decl) -> (Decl, Option<(Id, Pat)>) {
    match decl {
        Decl::Val { pat: Pat::Id(id), exp } => (Decl::Val { pat: Pat::Id(id), exp }, None),
        Decl::Val { pat, exp } => {
            let it = Id::plain("it");
            (Decl::Val { pat: Pat::Id(it.clone()), exp }, Some((it, pat)))
        }
        other => (other, None),
    }
}

fn check_matches(decl: &Decl, diagnostics: &mut Diagnostics) {
    match decl {
        Decl::Val { exp, .. } => check_matches_expr(exp, diagnostics),
        Decl::Fun { body, .. } => check_matches_expr(body, diagnostics),
        Decl::Datatype(_) => {}
        Decl::Sequence(decls) => decls.iter().for_each(|d| check_matches(d, diagnostics)),
    }
}

struct MatchCoverageSink<'a> {
    diagnostics: &'a mut Diagnostics,
}

impl EnvSink for MatchCoverageSink<'_> {
    fn on_expr(&mut self, _env: &Environment, expr: &Expr) {
        if let Expr::Match { scrutinee_ty, arms, .. } = expr {
            check_match(scrutinee_ty, arms, self.diagnostics);
        }
    }
}

fn check_matches_expr(expr: &Expr, diagnostics: &mut Diagnostics) {
    let mut sink = MatchCoverageSink { diagnostics };
    walk_expr(&Environment::empty(), expr, &mut sink);
}

/// Apply `f` to every expression a declaration directly carries
/// (`Val`'s rhs, `Fun`'s body, every `Sequence` member), leaving
/// `Datatype` untouched — the same shape as `unbounded::elaborate_decl`.
fn map_exprs(decl: &Decl, f: impl Fn(&Expr) -> Expr + Copy) -> Decl {
    match decl {
        Decl::Val { pat, exp } => Decl::Val { pat: pat.clone(), exp: f(exp) },
        Decl::Fun { name, pat, body } => Decl::Fun { name: name.clone(), pat: pat.clone(), body: f(body) },
        Decl::Datatype(dt) => Decl::Datatype(dt.clone()),
        Decl::Sequence(decls) => Decl::Sequence(decls.iter().map(|d| map_exprs(d, f)).collect()),
    }
}

fn decl_is_from(decl: &Decl) -> bool {
    match decl {
        Decl::Val { exp, .. } | Decl::Fun { body: exp, .. } => matches!(exp, Expr::From(_)),
        Decl::Datatype(_) => false,
        Decl::Sequence(decls) => decls.last().is_some_and(decl_is_from),
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
