//! Core patterns: the left-hand side of `val`/`fun`/`match`/`from`-scan
//! bindings.

use super::ident::Id;
use super::value::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum Pat {
    Id(Id),
    Wildcard,
    Lit(Value),
    Tuple(Vec<Pat>),
    Record(Vec<(String, Pat)>),
    Con { name: String, arg: Option<Box<Pat>> },
}

/// All identifiers a pattern binds, in left-to-right order.
///
/// Used by [`crate::env::ref_checker`] and by the relationalizer to know
/// which names a `scan`/`group` step introduces.
pub fn pat_ids(pat: &Pat) -> Vec<Id> {
    let mut out = Vec::new();
    collect_ids(pat, &mut out);
    out
}

fn collect_ids(pat: &Pat, out: &mut Vec<Id>) {
    match pat {
        Pat::Id(id) => out.push(id.clone()),
        Pat::Wildcard | Pat::Lit(_) => {}
        Pat::Tuple(pats) => pats.iter().for_each(|p| collect_ids(p, out)),
        Pat::Record(fields) => fields.iter().for_each(|(_, p)| collect_ids(p, out)),
        Pat::Con { arg, .. } => {
            if let Some(arg) = arg {
                collect_ids(arg, out);
            }
        }
    }
}

/// The single bound name of a simple `id` pattern, if it is one.
///
/// Several lowering steps (the `from`-source alias, the single-field
/// record wrap when flattening a nested `from`) only make sense for this
/// simple shape; anything else falls back to interpreter code.
pub fn simple_name(pat: &Pat) -> Option<&str> {
    match pat {
        Pat::Id(id) => Some(&id.name),
        _ => None,
    }
}
