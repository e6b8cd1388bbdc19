//! Diagnostics reporting.
//!
//! The core never aborts a compilation by itself: it classifies problems
//! as warnings or errors and hands them to a [`DiagnosticSink`].  The
//! surrounding compiler decides what is fatal.

use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Source line, when known.
    pub line: Option<i32>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(line: Option<i32>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            line,
            message: message.into(),
        }
    }

    pub fn error(line: Option<i32>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            line,
            message: message.into(),
        }
    }
}

/// Receives diagnostics.  Implementations must tolerate being shared
/// between parses.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Sink that keeps every diagnostic and logs it through `tracing`.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.entries
            .lock()
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Take all collected diagnostics, leaving the log empty.
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn report(&self, diagnostic: Diagnostic) {
        let line = diagnostic.line.unwrap_or_default();
        match diagnostic.severity {
            Severity::Warning => tracing::warn!(line, "{}", diagnostic.message),
            Severity::Error => tracing::error!(line, "{}", diagnostic.message),
        }
        self.entries.lock().push(diagnostic);
    }
}
