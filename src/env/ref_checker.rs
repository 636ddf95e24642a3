//! C3: asserts that every `Id` node resolves in its enclosing environment.

use super::environment::Environment;
use super::visitor::{walk_expr, EnvSink};
use crate::core::Expr;

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
#[error("unbound identifier: {name}")]
pub struct RefError {
    pub name: String,
}

struct Checker {
    error: Option<RefError>,
}

impl EnvSink for Checker {
    fn on_expr(&mut self, env: &Environment, expr: &Expr) {
        if self.error.is_some() {
            return;
        }
        if let Expr::Id(id) = expr {
            if env.get_opt(&id.name).is_none() {
                self.error = Some(RefError { name: id.name.clone() });
            }
        }
    }
}

/// Check that every identifier reference in `expr` resolves under `env`.
/// Returns the first unbound reference found, in traversal order.
pub fn check_refs(env: &Environment, expr: &Expr) -> Result<(), RefError> {
    let mut checker = Checker { error: None };
    walk_expr(env, expr, &mut checker);
    match checker.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "ref_checker_tests.rs"]
mod tests;
