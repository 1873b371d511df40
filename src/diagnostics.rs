//! Diagnostics for soft requirement violations
//!
//! A few contract entries are soft: a missing value is reported and the
//! build continues. Reports go through a [`DiagnosticSink`] so that nothing
//! in the codec writes to program output by itself.

use std::sync::Mutex;

/// One soft-requirement report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Element the report is about, e.g. `HANDICAP`
    pub element: String,
    /// Source attribute name, e.g. `breast`
    pub attribute: String,
    pub message: String,
}

impl Diagnostic {
    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        Diagnostic {
            element: element.to_string(),
            attribute: attribute.to_string(),
            message: format!("{} {} attribute is required", element, attribute),
        }
    }
}

/// Receiver for soft-requirement reports
pub trait DiagnosticSink {
    fn warn(&self, diagnostic: &Diagnostic);
}

/// Default sink: forwards every report to `tracing::warn!`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, diagnostic: &Diagnostic) {
        tracing::warn!(
            element = %diagnostic.element,
            attribute = %diagnostic.attribute,
            "{}",
            diagnostic.message
        );
    }
}

/// Sink that keeps every report in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the reports received so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Report messages only
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics().into_iter().map(|d| d.message).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn warn(&self, diagnostic: &Diagnostic) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push(diagnostic.clone());
    }
}
