//! Hybrid compilation core: an immutable lexical environment (C1-C4), a
//! core-to-core rewrite pipeline (C5/C6), query-to-relational lowering
//! through an external builder contract (C7/C8), and a type-directed
//! output-equivalence matcher (C9).
//!
//! Mirrors `plotnik-compiler`'s crate root: a flat module list, a
//! `thiserror`-derived `Error`, and a `Result` alias. [`compile`] plays
//! the role that crate's `Query`/`QueryBuilder` facade plays there,
//! gluing the rewrite driver to query lowering in one call.

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod env;
pub mod lower;
pub mod matcher;
pub mod rewrite;
pub mod tracer;

pub use config::Config;
pub use diagnostics::{Diagnostic, Diagnostics, DiagnosticsPrinter, Severity};
pub use env::{check_refs, Environment, RefError};
pub use rewrite::{run, DriverOutput};
pub use tracer::{NoopTracer, RecordingTracer, Tracer};

use core::{Decl, Expr, Id, Pat};
use lower::builder::RelNode;
use lower::RelBuilder;

/// Errors that can abort a compilation (spec.md §7's fatal kinds; C7's
/// "unsupported lowering" is deliberately not one of these — it falls
/// back to the interpreter instead of failing the declaration).
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    RefUnbound(#[from] RefError),

    #[error("match coverage error: {} diagnostics", .0.error_count())]
    MatchCoverage(Diagnostics),

    #[error("builder rejected the plan: {0}")]
    BuilderRejection(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// What [`compile`] hands back for one declaration: its rewritten core
/// form plus, when C7 succeeded, the relational plan C8 assembled for it.
pub struct CompileOutput {
    pub decl: Decl,
    /// `None` when lowering was disabled, or the declaration's top-level
    /// expression isn't a shape C7 recognizes — not an error.
    pub plan: Option<RelNode>,
    pub skip_pattern: Option<(Id, Pat)>,
    pub needs_unwrap: bool,
    pub diagnostics: Diagnostics,
}

/// Run the rewrite driver (C6) on `decl`, then, when `config.hybrid` is
/// set, offer its rewritten form to `builder` for relational lowering
/// (C7). Fails the declaration on an unbound reference or a fatal
/// match-coverage diagnostic; a lowering C7 declines is left for the
/// interpreter rather than treated as an error.
pub fn compile(
    env: &Environment,
    decl: &Decl,
    config: &Config,
    builder: &mut dyn RelBuilder,
    tracer: &mut dyn Tracer,
) -> Result<CompileOutput> {
    check_refs_decl(env, decl)?;

    let output = run(decl, config, tracer);
    if output.diagnostics.has_errors() {
        return Err(Error::MatchCoverage(output.diagnostics));
    }

    let plan = if config.hybrid {
        match lowerable_expr(&output.decl) {
            Some(exp) if lower::try_lower(env, builder, exp) => {
                let node = builder.build();
                tracer.on_plan(&node);
                Some(node)
            }
            _ => None,
        }
    } else {
        None
    };

    Ok(CompileOutput {
        decl: output.decl,
        plan,
        skip_pattern: output.skip_pattern,
        needs_unwrap: output.needs_unwrap,
        diagnostics: output.diagnostics,
    })
}

fn check_refs_decl(env: &Environment, decl: &Decl) -> Result<()> {
    match decl {
        Decl::Val { exp, .. } | Decl::Fun { body: exp, .. } => Ok(check_refs(env, exp)?),
        Decl::Datatype(_) => Ok(()),
        Decl::Sequence(decls) => decls.iter().try_for_each(|d| check_refs_decl(env, d)),
    }
}

fn lowerable_expr(decl: &Decl) -> Option<&Expr> {
    match decl {
        Decl::Val { exp, .. } | Decl::Fun { body: exp, .. } => Some(exp),
        Decl::Datatype(_) => None,
        Decl::Sequence(decls) => decls.last().and_then(lowerable_expr),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
