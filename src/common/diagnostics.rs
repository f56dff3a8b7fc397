//! Conversion diagnostics.
//!
//! Converters never abort on recoverable problems. An unmappable character,
//! a malformed table, or an unreadable configuration file degrades in place
//! and leaves a [`Diagnostic`] behind; the full list travels on the final
//! [`crate::convert::ConverterResult`] so callers can decide what to show.

use serde::Serialize;
use std::fmt;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - output is usable but differs from the source document
    Warning,
    /// Error - a document part could not be converted
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Human-readable message
    pub message: String,
    /// Where in the document the problem was found, e.g. an element path
    /// or a style name
    pub location: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            location: None,
        }
    }

    /// Add location information
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)?;
        if let Some(ref location) = self.location {
            write!(f, "\n  --> {location}")?;
        }
        Ok(())
    }
}

/// Collector for the diagnostics of one conversion run
#[derive(Debug, Default, Clone, Serialize)]
pub struct Diagnostics {
    /// All diagnostics in the order they were raised
    pub entries: Vec<Diagnostic>,
    /// Number of errors
    pub errors: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of info messages
    pub infos: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.entries.push(diag);
    }

    /// Add an info-level message
    pub fn info(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::new(DiagnosticLevel::Info, message));
    }

    /// Add a warning-level message
    pub fn warning(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::new(DiagnosticLevel::Warning, message));
    }

    /// Add an error-level message
    pub fn error(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::new(DiagnosticLevel::Error, message));
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Check if there are any issues at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge another collector into this one, preserving order
    pub fn extend(&mut self, other: Diagnostics) {
        for diag in other.entries {
            self.add(diag);
        }
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.errors > 0 {
            parts.push(format!(
                "{} error{}",
                self.errors,
                if self.errors == 1 { "" } else { "s" }
            ));
        }
        if self.warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                self.warnings,
                if self.warnings == 1 { "" } else { "s" }
            ));
        }
        if self.infos > 0 {
            parts.push(format!(
                "{} note{}",
                self.infos,
                if self.infos == 1 { "" } else { "s" }
            ));
        }
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_level() {
        let mut diags = Diagnostics::new();
        diags.error("broken table");
        diags.warning("character dropped");
        diags.warning("style not found");
        diags.info("language 'vo' passed through");

        assert_eq!(diags.errors, 1);
        assert_eq!(diags.warnings, 2);
        assert_eq!(diags.infos, 1);
        assert!(diags.has_errors());
        assert!(!diags.is_empty());
    }

    #[test]
    fn test_summary_format() {
        let mut diags = Diagnostics::new();
        diags.error("test");
        diags.warning("test");

        let summary = diags.summary();
        assert!(summary.contains("1 error"));
        assert!(summary.contains("1 warning"));

        assert_eq!(Diagnostics::new().summary(), "no issues found");
    }

    #[test]
    fn test_display_with_location() {
        let diag = Diagnostic::new(DiagnosticLevel::Warning, "character U+1F600 dropped")
            .with_location("text:p[14]");
        let rendered = diag.to_string();
        assert!(rendered.starts_with("warning: "));
        assert!(rendered.contains("--> text:p[14]"));
    }

    #[test]
    fn test_extend_preserves_order_and_counts() {
        let mut first = Diagnostics::new();
        first.info("a");
        let mut second = Diagnostics::new();
        second.error("b");

        first.extend(second);
        assert_eq!(first.entries.len(), 2);
        assert_eq!(first.entries[1].message, "b");
        assert_eq!(first.errors, 1);
    }
}
