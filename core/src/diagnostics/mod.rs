//! Diagnostics sink shared by every compiler pass.
//!
//! Passes never print. Unresolved names, unification failures and evaluation
//! errors are handed to a [`Reporter`], and the embedder decides what to do
//! with them.

use core::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Log,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

pub trait Reporter {
    fn log(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn log(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Forwards diagnostics as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn log(&self, message: &str) {
        tracing::debug!(target: "logic::diagnostics", "{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "logic::diagnostics", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "logic::diagnostics", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "logic::diagnostics", "{message}");
    }
}

/// Keeps every diagnostic in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, severity: Severity, message: &str) {
        self.diagnostics.borrow_mut().push(Diagnostic {
            severity,
            message: message.to_string(),
        });
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|diagnostic| diagnostic.severity == severity)
            .map(|diagnostic| diagnostic.message.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|diagnostic| diagnostic.severity == Severity::Error)
    }

    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

impl Reporter for CollectingReporter {
    fn log(&self, message: &str) {
        self.push(Severity::Log, message);
    }

    fn info(&self, message: &str) {
        self.push(Severity::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(Severity::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collecting_reporter_filters_by_severity() {
        let reporter = CollectingReporter::new();
        reporter.warn("unused");
        reporter.error("boom");
        reporter.info("fyi");

        assert_eq!(reporter.errors(), vec!["boom".to_string()]);
        assert_eq!(reporter.warnings(), vec!["unused".to_string()]);
        assert!(reporter.has_errors());
        assert_eq!(reporter.diagnostics().len(), 3);

        reporter.clear();
        assert!(!reporter.has_errors());
    }

    #[test]
    fn reporters_are_object_safe() {
        let reporters: [&dyn Reporter; 2] = [&SilentReporter, &TracingReporter];
        for reporter in reporters {
            reporter.error("ignored");
        }
    }
}
