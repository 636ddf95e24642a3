//! Redundancy and exhaustiveness checking for `case`/`match` arms
//! (spec.md §4.5 step 1, testable property 6).

use crate::core::{Expr, Pat, PrimType, Type, Value};
use crate::diagnostics::{Diagnostics, Severity};

/// Does pattern `a`, appearing earlier, already cover every value `b`
/// would match — making `b` unreachable?
fn subsumes(a: &Pat, b: &Pat) -> bool {
    match a {
        Pat::Wildcard | Pat::Id(_) => true,
        Pat::Lit(va) => matches!(b, Pat::Lit(vb) if va == vb),
        Pat::Tuple(pa) => match b {
            Pat::Tuple(pb) if pa.len() == pb.len() => pa.iter().zip(pb).all(|(x, y)| subsumes(x, y)),
            _ => false,
        },
        Pat::Record(fa) => match b {
            Pat::Record(fb) => fa.len() == fb.len()
                && fa.iter().all(|(name, pat_a)| {
                    fb.iter().find(|(n, _)| n == name).is_some_and(|(_, pat_b)| subsumes(pat_a, pat_b))
                }),
            _ => false,
        },
        Pat::Con { name: na, arg: aa } => match b {
            Pat::Con { name: nb, arg: ab } if na == nb => match (aa, ab) {
                (None, None) => true,
                (Some(x), Some(y)) => subsumes(x, y),
                _ => false,
            },
            _ => false,
        },
    }
}

/// Patterns found redundant: each subsumed by some earlier pattern in the
/// same arm list (returned indices are into `pats`).
pub fn redundant_indices(pats: &[Pat]) -> Vec<usize> {
    let mut redundant = Vec::new();
    for (i, p) in pats.iter().enumerate() {
        if pats[..i].iter().any(|earlier| subsumes(earlier, p)) {
            redundant.push(i);
        }
    }
    redundant
}

/// Conservative exhaustiveness check against the scrutinee type.
///
/// A catch-all pattern (`_`/an id) always makes the set exhaustive.
/// Otherwise: for `bool` both literals must appear; for a datatype every
/// constructor name must be covered (argument sub-patterns are not
/// recursively checked — deliberately coarse, matching the scope of
/// `SPEC_FULL.md`'s match-coverage ambition). Any other scrutinee type is
/// treated as exhaustive (there is no bounded value set to enumerate).
pub fn is_exhaustive(ty: &Type, pats: &[Pat]) -> bool {
    if pats.iter().any(|p| matches!(p, Pat::Wildcard | Pat::Id(_))) {
        return true;
    }
    match ty {
        Type::Prim(PrimType::Bool) => {
            let has = |v: bool| pats.iter().any(|p| matches!(p, Pat::Lit(Value::Bool(b)) if *b == v));
            has(true) && has(false)
        }
        Type::Data(dt) => dt.ctors.iter().all(|c| {
            pats.iter().any(|p| matches!(p, Pat::Con { name, .. } if *name == c.name))
        }),
        _ => true,
    }
}

/// Check every `match` node reachable from `expr`'s scrutinee type `ty`
/// (the type supplied by the external type checker for each scrutinee),
/// reporting redundant-match errors and non-exhaustive-match warnings —
/// combined into one message when an arm list is both.
///
/// This walks only the top-level `match` passed in; callers invoke it for
/// every `Match` node found during the rewrite driver's own traversal.
pub fn check_match(ty: &Type, arms: &[(Pat, Expr)], diagnostics: &mut Diagnostics) {
    let pats: Vec<Pat> = arms.iter().map(|(p, _)| p.clone()).collect();
    let redundant = redundant_indices(&pats);
    let exhaustive = is_exhaustive(ty, &pats);

    match (!redundant.is_empty(), !exhaustive) {
        (true, true) => diagnostics.push(Severity::Error, "match redundant and nonexhaustive".to_string()),
        (true, false) => diagnostics.push(Severity::Error, "match has redundant pattern(s)".to_string()),
        (false, true) => diagnostics.push(Severity::Warning, "match is nonexhaustive".to_string()),
        (false, false) => {}
    }
}

#[cfg(test)]
#[path = "match_coverage_tests.rs"]
mod tests;
