//! C6 step 3: unbounded-extent elaboration (`SuchThat`) — spec.md §4.5.
//!
//! A `from` scan whose source is [`Expr::Unbounded`] stands for "every
//! value of the pattern's type", which has no finite representation until
//! a companion equality `where` pins it down. Elaboration looks, among the
//! steps following such a scan, for `where id = bound` (or `where bound =
//! id`) and rewrites the scan's source to the singleton `single bound`,
//! dropping the now-redundant `where`.
//!
//! Grounded on `rewrite::relationalizer`'s shape: a bottom-up structural
//! rewrite plus a loop to a fixed point, mirroring `flatten`'s
//! repeat-until-no-match form.

use crate::core::{Decl, Expr, FromExpr, Pat, Step};

/// Does `expr` contain an unresolved [`Expr::Unbounded`] anywhere?
pub fn contains_unbounded(expr: &Expr) -> bool {
    match expr {
        Expr::Unbounded(_) => true,
        Expr::Lit(_) | Expr::Id(_) => false,
        Expr::Tuple(items) => items.iter().any(contains_unbounded),
        Expr::Record(fields) => fields.iter().any(|(_, e)| contains_unbounded(e)),
        Expr::RecordSelector { arg, .. } => contains_unbounded(arg),
        Expr::Fn { body, .. } => contains_unbounded(body),
        Expr::Apply { func, arg } => contains_unbounded(func) || contains_unbounded(arg),
        Expr::Let { body, .. } | Expr::Local { body, .. } => contains_unbounded(body),
        Expr::Match { scrutinee, arms, .. } => {
            contains_unbounded(scrutinee) || arms.iter().any(|(_, e)| contains_unbounded(e))
        }
        Expr::From(from) => from.steps.iter().any(step_contains_unbounded),
    }
}

fn step_contains_unbounded(step: &Step) -> bool {
    match step {
        Step::Scan { exp, .. } | Step::Where(exp) => contains_unbounded(exp),
        Step::Order(items) => items.iter().any(|(e, _)| contains_unbounded(e)),
        Step::Group { keys, aggs } => {
            keys.iter().any(|(_, e)| contains_unbounded(e))
                || aggs.iter().any(|a| a.arg.as_ref().is_some_and(contains_unbounded))
        }
        Step::Yield(e) => contains_unbounded(e),
    }
}

/// If `where` tests `id` for equality against some bounding expression,
/// return that bound. Recognises both `id = bound` and `bound = id`
/// (the builtin `=` is applied curried, as elsewhere in this crate).
fn equality_bound<'a>(where_expr: &'a Expr, id_name: &str) -> Option<&'a Expr> {
    let (lhs, rhs) = where_expr.as_call2("=")?;
    match (lhs, rhs) {
        (Expr::Id(l), _) if l.name == id_name => Some(rhs),
        (_, Expr::Id(r)) if r.name == id_name => Some(lhs),
        _ => None,
    }
}

/// One pass of `SuchThat` elaboration over a single `from`: resolve every
/// unbounded scan that has a matching equality `where` among its
/// successors. Returns whether any step changed.
fn elaborate_from(from: &mut FromExpr, changed: &mut bool) {
    let mut i = 0;
    while i < from.steps.len() {
        let is_unbounded_scan = matches!(
            &from.steps[i],
            Step::Scan { exp: Expr::Unbounded(_), .. }
        );
        if !is_unbounded_scan {
            i += 1;
            continue;
        }
        let Step::Scan { pat, .. } = &from.steps[i] else { unreachable!() };
        let Some(id_name) = crate::core::pat::simple_name(pat).map(str::to_string) else {
            i += 1;
            continue;
        };
        let found = from.steps[i + 1..]
            .iter()
            .position(|s| matches!(s, Step::Where(w) if equality_bound(w, &id_name).is_some()));
        let Some(offset) = found else {
            i += 1;
            continue;
        };
        let where_idx = i + 1 + offset;
        let Step::Where(where_expr) = from.steps.remove(where_idx) else { unreachable!() };
        let bound = equality_bound(&where_expr, &id_name).expect("matched above").clone();
        let Step::Scan { exp, .. } = &mut from.steps[i] else { unreachable!() };
        *exp = Expr::Apply {
            func: Box::new(Expr::Id(crate::core::Id::plain("single"))),
            arg: Box::new(bound),
        };
        *changed = true;
        i += 1;
    }
}

/// Recursively elaborate every nested `from` reachable from `expr`,
/// bottom-up, one pass. Returns the rewritten expression and whether
/// anything changed.
fn elaborate_expr(expr: &Expr, changed: &mut bool) -> Expr {
    match expr {
        Expr::Lit(_) | Expr::Id(_) | Expr::Unbounded(_) => expr.clone(),
        Expr::Tuple(items) => Expr::Tuple(items.iter().map(|e| elaborate_expr(e, changed)).collect()),
        Expr::Record(fields) => {
            Expr::Record(fields.iter().map(|(n, e)| (n.clone(), elaborate_expr(e, changed))).collect())
        }
        Expr::RecordSelector { field, arg } => {
            Expr::RecordSelector { field: field.clone(), arg: Box::new(elaborate_expr(arg, changed)) }
        }
        Expr::Fn { pat, body } => Expr::Fn { pat: pat.clone(), body: Box::new(elaborate_expr(body, changed)) },
        Expr::Apply { func, arg } => Expr::Apply {
            func: Box::new(elaborate_expr(func, changed)),
            arg: Box::new(elaborate_expr(arg, changed)),
        },
        Expr::Let { decl, body } => Expr::Let { decl: decl.clone(), body: Box::new(elaborate_expr(body, changed)) },
        Expr::Local { decl, body } => {
            Expr::Local { decl: decl.clone(), body: Box::new(elaborate_expr(body, changed)) }
        }
        Expr::Match { scrutinee, scrutinee_ty, arms } => Expr::Match {
            scrutinee: Box::new(elaborate_expr(scrutinee, changed)),
            scrutinee_ty: scrutinee_ty.clone(),
            arms: arms.iter().map(|(p, e)| (p.clone(), elaborate_expr(e, changed))).collect(),
        },
        Expr::From(from) => {
            let mut from = FromExpr::new(
                from.steps
                    .iter()
                    .map(|s| elaborate_step(s, changed))
                    .collect(),
            );
            elaborate_from(&mut from, changed);
            Expr::From(from)
        }
    }
}

fn elaborate_step(step: &Step, changed: &mut bool) -> Step {
    match step {
        Step::Scan { pat, exp } => Step::Scan { pat: pat.clone(), exp: elaborate_expr(exp, changed) },
        Step::Where(e) => Step::Where(elaborate_expr(e, changed)),
        Step::Order(items) => {
            Step::Order(items.iter().map(|(e, d)| (elaborate_expr(e, changed), *d)).collect())
        }
        Step::Group { keys, aggs } => Step::Group {
            keys: keys.iter().map(|(n, e)| (n.clone(), elaborate_expr(e, changed))).collect(),
            aggs: aggs
                .iter()
                .map(|a| crate::core::AggCall {
                    name: a.name.clone(),
                    op: a.op.clone(),
                    arg: a.arg.as_ref().map(|e| elaborate_expr(e, changed)),
                })
                .collect(),
        },
        Step::Yield(e) => Step::Yield(elaborate_expr(e, changed)),
    }
}

/// Run `SuchThat` elaboration on `expr` to a fixed point, bounded by
/// `max_passes` (the driver's `inlinePassCount`). Returns the elaborated
/// expression and whether any unbounded pattern remains — the monotone
/// "may contain unbounded" flag of spec.md §4.5 step 3, used by the
/// driver to skip this stage on later inline passes once it goes false.
pub fn elaborate(expr: &Expr, max_passes: u32) -> (Expr, bool) {
    let mut current = expr.clone();
    for _ in 0..max_passes.max(1) {
        if !contains_unbounded(&current) {
            return (current, false);
        }
        let mut changed = false;
        current = elaborate_expr(&current, &mut changed);
        if !changed {
            break;
        }
    }
    let still_unbounded = contains_unbounded(&current);
    (current, still_unbounded)
}

/// Elaborate the body of a top-level declaration. `Decl::Datatype` and
/// empty sequences pass through unchanged; `Val`/`Fun`/`Sequence` recurse
/// into every bound expression.
pub fn elaborate_decl(decl: &Decl, max_passes: u32) -> (Decl, bool) {
    match decl {
        Decl::Val { pat, exp } => {
            let (exp, unbounded) = elaborate(exp, max_passes);
            (Decl::Val { pat: pat.clone(), exp }, unbounded)
        }
        Decl::Fun { name, pat, body } => {
            let (body, unbounded) = elaborate(body, max_passes);
            (Decl::Fun { name: name.clone(), pat: pat.clone(), body }, unbounded)
        }
        Decl::Datatype(dt) => (Decl::Datatype(dt.clone()), false),
        Decl::Sequence(decls) => {
            let mut any_unbounded = false;
            let elaborated = decls
                .iter()
                .map(|d| {
                    let (d, unbounded) = elaborate_decl(d, max_passes);
                    any_unbounded |= unbounded;
                    d
                })
                .collect();
            (Decl::Sequence(elaborated), any_unbounded)
        }
    }
}

#[cfg(test)]
#[path = "unbounded_tests.rs"]
mod tests;
