//! Compilation configuration (`propMap`, spec.md §6).

use serde::{Deserialize, Serialize};

/// Tuning knobs the rewrite driver and query lowering read before a
/// declaration is compiled. Mirrors Morel's `propMap`: a handful of
/// booleans plus the inliner's iteration budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Enable relational lowering (C7/C8). When `false`, declarations are
    /// left as interpreter-evaluable core and never offered to a
    /// `RelBuilder`.
    pub hybrid: bool,
    /// Inliner iterations the rewrite driver runs per declaration (also
    /// reused as the pass budget for `SuchThat` elaboration, spec.md
    /// §4.5 step 3). `0` means "run a single limited inliner pass and
    /// stop" (spec.md §4.5 step 2).
    pub inline_pass_count: u32,
    /// Enable the relationalizer (C5): `map`/`filter` rewriting and
    /// nested-`from` flattening.
    pub relationalize: bool,
    /// Enable match redundancy/exhaustiveness checking (C6 step 1).
    pub match_coverage_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config { hybrid: false, inline_pass_count: 3, relationalize: true, match_coverage_enabled: true }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
