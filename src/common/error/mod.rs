//! Unified error types for the Longan library.
//!
//! This module provides a single error type shared by the document model,
//! the configuration layer, and every converter, presenting a consistent
//! API to users.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result};
