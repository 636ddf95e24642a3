//! The inliner half of C6's "analyze -> inline -> relationalize" loop
//! (spec.md §4.5 step 2).
//!
//! Grounded on `rewrite::relationalizer`'s bottom-up structural rewrite
//! shape, plus `env::Environment::distance` (spec.md §4.1) as the
//! profitability signal spec.md §4.5 alludes to ("analyze" decides
//! whether inlining a binding is worthwhile): a `let`-bound name used at
//! most once in its body, or bound to a trivially cheap expression
//! (a literal or another identifier), is always worth substituting
//! directly; anything else is left in place rather than risk duplicating
//! an expensive computation.

use crate::core::{Decl, Expr, FromExpr, Id, Step};
use crate::env::Environment;

/// Is `exp` cheap enough to inline regardless of use count?
fn is_trivial(exp: &Expr) -> bool {
    matches!(exp, Expr::Lit(_) | Expr::Id(_))
}

/// Count occurrences of `name` as a free identifier reference in `expr`.
fn count_uses(name: &str, expr: &Expr) -> usize {
    match expr {
        Expr::Id(id) => usize::from(id.name == name),
        Expr::Lit(_) | Expr::Unbounded(_) => 0,
        Expr::Tuple(items) => items.iter().map(|e| count_uses(name, e)).sum(),
        Expr::Record(fields) => fields.iter().map(|(_, e)| count_uses(name, e)).sum(),
        Expr::RecordSelector { arg, .. } => count_uses(name, arg),
        Expr::Fn { body, .. } => count_uses(name, body),
        Expr::Apply { func, arg } => count_uses(name, func) + count_uses(name, arg),
        Expr::Let { body, .. } | Expr::Local { body, .. } => count_uses(name, body),
        Expr::Match { scrutinee, arms, .. } => {
            count_uses(name, scrutinee) + arms.iter().map(|(_, e)| count_uses(name, e)).sum::<usize>()
        }
        Expr::From(from) => from.steps.iter().map(|s| step_uses(name, s)).sum(),
    }
}

fn step_uses(name: &str, step: &Step) -> usize {
    match step {
        Step::Scan { exp, .. } | Step::Where(exp) => count_uses(name, exp),
        Step::Order(items) => items.iter().map(|(e, _)| count_uses(name, e)).sum(),
        Step::Group { keys, aggs } => {
            keys.iter().map(|(_, e)| count_uses(name, e)).sum::<usize>()
                + aggs.iter().filter_map(|a| a.arg.as_ref()).map(|e| count_uses(name, e)).sum::<usize>()
        }
        Step::Yield(e) => count_uses(name, e),
    }
}

/// Substitute every free occurrence of `name` with `value` in `expr`.
fn substitute(name: &str, value: &Expr, expr: &Expr) -> Expr {
    match expr {
        Expr::Id(id) if id.name == name => value.clone(),
        Expr::Id(_) | Expr::Lit(_) | Expr::Unbounded(_) => expr.clone(),
        Expr::Tuple(items) => Expr::Tuple(items.iter().map(|e| substitute(name, value, e)).collect()),
        Expr::Record(fields) => {
            Expr::Record(fields.iter().map(|(n, e)| (n.clone(), substitute(name, value, e))).collect())
        }
        Expr::RecordSelector { field, arg } => {
            Expr::RecordSelector { field: field.clone(), arg: Box::new(substitute(name, value, arg)) }
        }
        Expr::Fn { pat, body } => {
            if shadows(pat, name) {
                expr.clone()
            } else {
                Expr::Fn { pat: pat.clone(), body: Box::new(substitute(name, value, body)) }
            }
        }
        Expr::Apply { func, arg } => Expr::Apply {
            func: Box::new(substitute(name, value, func)),
            arg: Box::new(substitute(name, value, arg)),
        },
        Expr::Let { decl, body } => {
            Expr::Let { decl: decl.clone(), body: Box::new(substitute(name, value, body)) }
        }
        Expr::Local { decl, body } => {
            Expr::Local { decl: decl.clone(), body: Box::new(substitute(name, value, body)) }
        }
        Expr::Match { scrutinee, scrutinee_ty, arms } => Expr::Match {
            scrutinee: Box::new(substitute(name, value, scrutinee)),
            scrutinee_ty: scrutinee_ty.clone(),
            arms: arms
                .iter()
                .map(|(p, e)| {
                    if shadows(p, name) {
                        (p.clone(), e.clone())
                    } else {
                        (p.clone(), substitute(name, value, e))
                    }
                })
                .collect(),
        },
        Expr::From(from) => Expr::From(substitute_from(name, value, from)),
    }
}

fn shadows(pat: &crate::core::Pat, name: &str) -> bool {
    crate::core::pat::pat_ids(pat).iter().any(|id| id.name == name)
}

fn substitute_from(name: &str, value: &Expr, from: &FromExpr) -> FromExpr {
    let mut steps = Vec::with_capacity(from.steps.len());
    let mut shadowed = false;
    for step in &from.steps {
        if shadowed {
            steps.push(step.clone());
            continue;
        }
        match step {
            Step::Scan { pat, exp } => {
                steps.push(Step::Scan { pat: pat.clone(), exp: substitute(name, value, exp) });
                if shadows(pat, name) {
                    shadowed = true;
                }
            }
            Step::Where(e) => steps.push(Step::Where(substitute(name, value, e))),
            Step::Order(items) => steps.push(Step::Order(
                items.iter().map(|(e, d)| (substitute(name, value, e), *d)).collect(),
            )),
            Step::Group { keys, aggs } => {
                steps.push(Step::Group {
                    keys: keys.iter().map(|(n, e)| (n.clone(), substitute(name, value, e))).collect(),
                    aggs: aggs
                        .iter()
                        .map(|a| crate::core::AggCall {
                            name: a.name.clone(),
                            op: a.op.clone(),
                            arg: a.arg.as_ref().map(|e| substitute(name, value, e)),
                        })
                        .collect(),
                });
            }
            Step::Yield(e) => steps.push(Step::Yield(substitute(name, value, e))),
        }
    }
    FromExpr::new(steps)
}

/// One bottom-up inlining pass over `expr`. A `let id = rhs in body` is
/// collapsed to `substitute(id, rhs, body)` when `rhs` is trivial or
/// `id` occurs at most once in `body`; otherwise the `let` is preserved
/// (inlining it would duplicate work).
pub fn inline_pass(expr: &Expr, env: &Environment) -> Expr {
    match expr {
        Expr::Lit(_) | Expr::Id(_) | Expr::Unbounded(_) => expr.clone(),
        Expr::Tuple(items) => Expr::Tuple(items.iter().map(|e| inline_pass(e, env)).collect()),
        Expr::Record(fields) => {
            Expr::Record(fields.iter().map(|(n, e)| (n.clone(), inline_pass(e, env))).collect())
        }
        Expr::RecordSelector { field, arg } => {
            Expr::RecordSelector { field: field.clone(), arg: Box::new(inline_pass(arg, env)) }
        }
        Expr::Fn { pat, body } => Expr::Fn { pat: pat.clone(), body: Box::new(inline_pass(body, env)) },
        Expr::Apply { func, arg } => inline_redex(inline_pass(func, env), inline_pass(arg, env)),
        Expr::Let { decl, body } => inline_let(decl, body, env),
        Expr::Local { decl, body } => {
            Expr::Local { decl: decl.clone(), body: Box::new(inline_pass(body, env)) }
        }
        Expr::Match { scrutinee, scrutinee_ty, arms } => Expr::Match {
            scrutinee: Box::new(inline_pass(scrutinee, env)),
            scrutinee_ty: scrutinee_ty.clone(),
            arms: arms.iter().map(|(p, e)| (p.clone(), inline_pass(e, env))).collect(),
        },
        Expr::From(from) => Expr::From(FromExpr::new(
            from.steps.iter().map(|s| inline_step(s, env)).collect(),
        )),
    }
}

fn inline_step(step: &Step, env: &Environment) -> Step {
    match step {
        Step::Scan { pat, exp } => Step::Scan { pat: pat.clone(), exp: inline_pass(exp, env) },
        Step::Where(e) => Step::Where(inline_pass(e, env)),
        Step::Order(items) => Step::Order(items.iter().map(|(e, d)| (inline_pass(e, env), *d)).collect()),
        Step::Group { keys, aggs } => Step::Group {
            keys: keys.iter().map(|(n, e)| (n.clone(), inline_pass(e, env))).collect(),
            aggs: aggs
                .iter()
                .map(|a| crate::core::AggCall {
                    name: a.name.clone(),
                    op: a.op.clone(),
                    arg: a.arg.as_ref().map(|e| inline_pass(e, env)),
                })
                .collect(),
        },
        Step::Yield(e) => Step::Yield(inline_pass(e, env)),
    }
}

/// An immediately-applied lambda `(fn x => body) arg` is a `let x = arg
/// in body` by another name (the `(map f xs)` rewrite of the
/// relationalizer produces exactly this shape, `f e`, and never
/// beta-reduces it itself). Collapse it under the same cost heuristic
/// `inline_let` uses; otherwise leave the application as-is.
fn inline_redex(func: Expr, arg: Expr) -> Expr {
    if let Expr::Fn { pat: crate::core::Pat::Id(id), body } = &func {
        let uses = count_uses(&id.name, body);
        if is_trivial(&arg) || uses <= 1 {
            return substitute(&id.name, &arg, body);
        }
    }
    Expr::Apply { func: Box::new(func), arg: Box::new(arg) }
}

fn inline_let(decl: &Decl, body: &Expr, env: &Environment) -> Expr {
    let body = inline_pass(body, env);
    if let Decl::Val { pat: crate::core::Pat::Id(id), exp } = decl {
        let rhs = inline_pass(exp, env);
        let uses = count_uses(&id.name, &body);
        if is_trivial(&rhs) || uses <= 1 {
            return substitute(&id.name, &rhs, &body);
        }
        return Expr::Let {
            decl: Box::new(Decl::Val { pat: crate::core::Pat::Id(id.clone()), exp: rhs }),
            body: Box::new(body),
        };
    }
    Expr::Let { decl: Box::new(decl.clone()), body: Box::new(body) }
}

/// A name reference's distance from the top of `env`, used by the driver
/// only for diagnostics/tracing of how "deep" an inlined reference was
/// (spec.md §4.5's "analyze" step; the actual inline-or-not decision
/// above is use-count/triviality based, per `DESIGN.md`).
pub fn inline_distance(env: &Environment, id: &Id) -> usize {
    env.distance(id)
}

#[cfg(test)]
#[path = "inliner_tests.rs"]
mod tests;
