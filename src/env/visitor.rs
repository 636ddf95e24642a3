//! A traversal harness that keeps an [`Environment`] synchronised while
//! walking the core AST (C2).
//!
//! Grounded on `plotnik-compiler::analyze::refs`'s traversal shape (walk
//! the tree, recurse into children), generalized from CST-node iteration
//! to core-AST recursion and extended to thread a scope.

use super::binding::Binding;
use super::environment::Environment;
use crate::core::{Decl, Expr, FromExpr, Pat, Step};

/// Receives `(env, expr)` for every expression node visited, with `env`
/// already extended by whatever bindings that node's ancestors
/// introduced.
pub trait EnvSink {
    fn on_expr(&mut self, env: &Environment, expr: &Expr);
}

/// Bindings (type-only; no folded value) for every name a pattern
/// introduces, in pattern order.
fn pattern_bindings(pat: &Pat) -> Vec<Binding> {
    crate::core::pat::pat_ids(pat).into_iter().map(Binding::val).collect()
}

/// Walk `expr` under `env`, calling `sink` at every node and extending the
/// environment for every construct that introduces bindings: function
/// abstractions, `let`/`local`, `match` arms, and `from`'s `scan`/`group`
/// steps.
pub fn walk_expr(env: &Environment, expr: &Expr, sink: &mut dyn EnvSink) {
    sink.on_expr(env, expr);
    match expr {
        Expr::Lit(_) | Expr::Id(_) | Expr::Unbounded(_) => {}
        Expr::Tuple(items) => items.iter().for_each(|e| walk_expr(env, e, sink)),
        Expr::Record(fields) => fields.iter().for_each(|(_, e)| walk_expr(env, e, sink)),
        Expr::RecordSelector { arg, .. } => walk_expr(env, arg, sink),
        Expr::Fn { pat, body } => {
            let child = env.bind_all(pattern_bindings(pat));
            walk_expr(&child, body, sink);
        }
        Expr::Apply { func, arg } => {
            walk_expr(env, func, sink);
            walk_expr(env, arg, sink);
        }
        Expr::Let { decl, body } => {
            let child = walk_decl(env, decl, sink);
            walk_expr(&child, body, sink);
        }
        Expr::Local { decl, body } => {
            let child = walk_decl(env, decl, sink);
            walk_expr(&child, body, sink);
        }
        Expr::Match { scrutinee, arms, .. } => {
            walk_expr(env, scrutinee, sink);
            for (pat, arm_body) in arms {
                let child = env.bind_all(pattern_bindings(pat));
                walk_expr(&child, arm_body, sink);
            }
        }
        Expr::From(from) => walk_from(env, from, sink),
    }
}

fn walk_from(env: &Environment, from: &FromExpr, sink: &mut dyn EnvSink) {
    let mut cur = env.clone();
    for step in &from.steps {
        match step {
            Step::Scan { pat, exp } => {
                walk_expr(&cur, exp, sink);
                cur = cur.bind_all(pattern_bindings(pat));
            }
            Step::Where(e) => walk_expr(&cur, e, sink),
            Step::Order(items) => items.iter().for_each(|(e, _)| walk_expr(&cur, e, sink)),
            Step::Group { keys, aggs } => {
                keys.iter().for_each(|(_, e)| walk_expr(&cur, e, sink));
                for agg in aggs {
                    if let Some(arg) = &agg.arg {
                        walk_expr(&cur, arg, sink);
                    }
                }
                let group_bindings = keys
                    .iter()
                    .map(|(name, _)| Binding::val(crate::core::Id::plain(name.clone())))
                    .chain(aggs.iter().map(|agg| Binding::val(crate::core::Id::plain(agg.name.clone()))));
                cur = cur.bind_all(group_bindings);
            }
            Step::Yield(e) => walk_expr(&cur, e, sink),
        }
    }
}

fn walk_decl(env: &Environment, decl: &Decl, sink: &mut dyn EnvSink) -> Environment {
    match decl {
        Decl::Val { pat, exp } => {
            walk_expr(env, exp, sink);
            env.bind_all(pattern_bindings(pat))
        }
        Decl::Fun { name, pat, body } => {
            // Recursive: the function's own name is visible in its body.
            let with_self = env.bind(Binding::val(name.clone()));
            let with_arg = with_self.bind_all(pattern_bindings(pat));
            walk_expr(&with_arg, body, sink);
            with_self
        }
        Decl::Datatype(dt) => {
            let ctor_bindings = dt.ctors.iter().map(|c| Binding::val(crate::core::Id::plain(c.name.clone())));
            env.bind_all(ctor_bindings)
        }
        Decl::Sequence(decls) => {
            let mut cur = env.clone();
            for d in decls {
                cur = walk_decl(&cur, d, sink);
            }
            cur
        }
    }
}
