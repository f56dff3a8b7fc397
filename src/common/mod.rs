//! Common types, traits, and utilities shared across output formats.
//!
//! This module provides the unified error type, the diagnostics collector,
//! and length handling used by the document model and every converter.

// Submodule declarations
pub mod diagnostics;
pub mod error;
pub mod unit;

// Re-exports for convenience
pub use diagnostics::{Diagnostic, DiagnosticLevel, Diagnostics};
pub use error::{Error, Result};
pub use unit::{Length, LengthUnit};
