//! Collected warnings/errors produced during rewriting (spec.md §7).
//!
//! Grounded on `plotnik-compiler::diagnostics`'s `Diagnostics`/`Severity`
//! shape: a flat, ordered list of messages with a severity, rendered on
//! demand with `annotate-snippets` rather than printed eagerly.

use annotate_snippets::{Level, Renderer, Snippet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// An ordered collection of diagnostics accumulated over one compilation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, message: String) {
        self.items.push(Diagnostic { severity, message });
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.severity == Severity::Error).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}

/// Renders diagnostics against a source snippet, for a session/CLI host
/// to print. The compiler itself never prints; it only collects.
pub struct DiagnosticsPrinter<'a> {
    pub source: &'a str,
    pub origin: &'a str,
}

impl<'a> DiagnosticsPrinter<'a> {
    pub fn new(source: &'a str, origin: &'a str) -> Self {
        DiagnosticsPrinter { source, origin }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let level = match diagnostic.severity {
            Severity::Warning => Level::WARNING,
            Severity::Error => Level::ERROR,
        };
        let snippet = Snippet::source(self.source).path(self.origin);
        let group = level.primary_title(&diagnostic.message).element(snippet);
        format!("{}", Renderer::styled().render(&[group]))
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
