//! OpenDocument text document model.
//!
//! The converters never touch XML directly; they walk the element tree,
//! query the style registry, and read the metadata this module provides.

/// XML element classes
pub mod element;
/// Style definitions and the style registry
pub mod style;
/// Document metadata
pub mod meta;
/// Bibliography marks
pub mod bibmark;
/// The text document
pub mod document;

/// Re-export the main APIs
pub use bibmark::{BibField, BibMark, EntryType};
pub use document::TextDocument;
pub use element::{Element, Node};
pub use meta::DocumentMeta;
pub use style::{ListStyle, Style, StyleFamily, StyleRegistry};
