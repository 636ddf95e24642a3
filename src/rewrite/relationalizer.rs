//! C5: rewrites `map`/`filter` primitive calls into `from` comprehensions
//! and flattens nested `from` expressions.
//!
//! Grounded on `plotnik-compiler::compile::compiler`'s shape of a
//! structural, AST-to-AST rewrite driven by pattern match on `Expr`
//! variants.

use crate::core::{Expr, FromExpr, Pat, Step};
use crate::env::NameGenerator;

/// Rewrite every `map`/`filter` call and flatten every nested `from` in
/// `expr`, bottom-up.
pub fn relationalize(expr: &Expr, gen: &mut NameGenerator) -> Expr {
    let rewritten = relationalize_children(expr, gen);
    rewrite_top(rewritten, gen)
}

fn relationalize_children(expr: &Expr, gen: &mut NameGenerator) -> Expr {
    match expr {
        Expr::Lit(_) | Expr::Id(_) | Expr::Unbounded(_) => expr.clone(),
        Expr::Tuple(items) => Expr::Tuple(items.iter().map(|e| relationalize(e, gen)).collect()),
        Expr::Record(fields) => {
            Expr::Record(fields.iter().map(|(n, e)| (n.clone(), relationalize(e, gen))).collect())
        }
        Expr::RecordSelector { field, arg } => {
            Expr::RecordSelector { field: field.clone(), arg: Box::new(relationalize(arg, gen)) }
        }
        Expr::Fn { pat, body } => Expr::Fn { pat: pat.clone(), body: Box::new(relationalize(body, gen)) },
        Expr::Apply { func, arg } => {
            Expr::Apply { func: Box::new(relationalize(func, gen)), arg: Box::new(relationalize(arg, gen)) }
        }
        Expr::Let { decl, body } => Expr::Let { decl: decl.clone(), body: Box::new(relationalize(body, gen)) },
        Expr::Local { decl, body } => Expr::Local { decl: decl.clone(), body: Box::new(relationalize(body, gen)) },
        Expr::Match { scrutinee, scrutinee_ty, arms } => Expr::Match {
            scrutinee: Box::new(relationalize(scrutinee, gen)),
            scrutinee_ty: scrutinee_ty.clone(),
            arms: arms.iter().map(|(p, e)| (p.clone(), relationalize(e, gen))).collect(),
        },
        Expr::From(from) => Expr::From(FromExpr::new(
            from.steps
                .iter()
                .map(|s| relationalize_step(s, gen))
                .collect(),
        )),
    }
}

fn relationalize_step(step: &Step, gen: &mut NameGenerator) -> Step {
    match step {
        Step::Scan { pat, exp } => Step::Scan { pat: pat.clone(), exp: relationalize(exp, gen) },
        Step::Where(e) => Step::Where(relationalize(e, gen)),
        Step::Order(items) => {
            Step::Order(items.iter().map(|(e, d)| (relationalize(e, gen), *d)).collect())
        }
        Step::Group { keys, aggs } => Step::Group {
            keys: keys.iter().map(|(n, e)| (n.clone(), relationalize(e, gen))).collect(),
            aggs: aggs
                .iter()
                .map(|a| crate::core::AggCall {
                    name: a.name.clone(),
                    op: a.op.clone(),
                    arg: a.arg.as_ref().map(|e| relationalize(e, gen)),
                })
                .collect(),
        },
        Step::Yield(e) => Step::Yield(relationalize(e, gen)),
    }
}

/// The record of currently-live bindings introduced by `steps`'s scans
/// and groups so far — the "implicit yield" of spec.md §3, used both when
/// a `from` has no explicit `yield` and as the body of a rewritten
/// `map`/`filter` call.
pub fn implicit_yield(steps: &[Step]) -> Expr {
    let mut live = Vec::new();
    for step in steps {
        match step {
            Step::Scan { pat, .. } => {
                if let Some(name) = crate::core::pat::simple_name(pat) {
                    live.push(name.to_string());
                }
            }
            Step::Group { keys, aggs } => {
                live.clear();
                live.extend(keys.iter().map(|(n, _)| n.clone()));
                live.extend(aggs.iter().map(|a| a.name.clone()));
            }
            Step::Where(_) | Step::Order(_) | Step::Yield(_) => {}
        }
    }
    match live.as_slice() {
        [] => Expr::Lit(crate::core::Value::Unit),
        [only] => Expr::Id(crate::core::Id::plain(only.clone())),
        many => {
            let mut names: Vec<String> = many.to_vec();
            names.sort();
            Expr::Record(names.into_iter().map(|n| (n.clone(), Expr::Id(crate::core::Id::plain(n)))).collect())
        }
    }
}

/// Turn `xs` into a `from` whose first step scans a fresh id bound to
/// `xs`, unless `xs` is already a `from` (in which case its own steps are
/// reused directly — the "lifting" of spec.md §4.4).
fn lift_to_from(xs: &Expr, gen: &mut NameGenerator) -> FromExpr {
    if let Expr::From(from) = xs {
        from.clone()
    } else {
        let id = gen.fresh("e");
        FromExpr::new(vec![Step::Scan { pat: Pat::Id(id), exp: xs.clone() }])
    }
}

fn rewrite_top(expr: Expr, gen: &mut NameGenerator) -> Expr {
    if let Some((f, xs)) = expr.as_call2("map") {
        let mut from = lift_to_from(xs, gen);
        let body = implicit_yield(&from.steps);
        from.steps.push(Step::Yield(Expr::Apply { func: Box::new(f.clone()), arg: Box::new(body) }));
        return Expr::From(flatten(from, gen));
    }
    if let Some((f, xs)) = expr.as_call2("filter") {
        let mut from = lift_to_from(xs, gen);
        let body = implicit_yield(&from.steps);
        from.steps.push(Step::Where(Expr::Apply { func: Box::new(f.clone()), arg: Box::new(body) }));
        return Expr::From(flatten(from, gen));
    }
    if let Expr::From(from) = &expr {
        return Expr::From(flatten(from.clone(), gen));
    }
    expr
}

/// Flatten every `scan e in (from … yield E) …` into a single flat `from`,
/// repeatedly until no nested-`from` scan remains (spec.md §4.4).
fn flatten(from: FromExpr, gen: &mut NameGenerator) -> FromExpr {
    let mut steps = from.steps;
    loop {
        let nested_at = steps.iter().position(|s| matches!(s, Step::Scan { exp: Expr::From(_), .. }));
        let Some(idx) = nested_at else { break };
        let Step::Scan { pat, exp } = steps.remove(idx) else { unreachable!() };
        let Expr::From(inner) = exp else { unreachable!() };

        let mut inner_steps = inner.steps;
        let e_expr = match inner_steps.last() {
            Some(Step::Yield(_)) => {
                let Some(Step::Yield(e)) = inner_steps.pop() else { unreachable!() };
                e
            }
            _ if inner_steps.is_empty() => Expr::Lit(crate::core::Value::Unit),
            _ => implicit_yield(&inner_steps),
        };
        let field_name = crate::core::pat::simple_name(&pat).unwrap_or("it").to_string();
        inner_steps.push(Step::Yield(Expr::Record(vec![(field_name, e_expr)])));

        let rest = steps.split_off(idx);
        steps.extend(inner_steps);
        steps.extend(rest);
    }
    let _ = gen; // reserved for future fresh-name needs during flattening
    FromExpr::new(steps)
}

#[cfg(test)]
#[path = "relationalizer_tests.rs"]
mod tests;
