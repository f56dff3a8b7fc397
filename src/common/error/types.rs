//! Unified error types for the Longan library.
//!
//! Only conditions that abort a conversion are expressed as [`Error`].
//! Anything recoverable (an unmappable character, a malformed sub-structure,
//! a bad configuration file) degrades in place and is reported through
//! [`crate::common::diagnostics`] instead.
use thiserror::Error;

/// Main error type for Longan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Document part not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported feature
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Feature disabled at compile time
    #[error("Feature '{0}' is disabled. Enable it with --features {0}")]
    FeatureDisabled(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for Longan operations.
pub type Result<T> = std::result::Result<T, Error>;
