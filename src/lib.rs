//! Longan - OpenDocument text to LaTeX, BibTeX and XHTML conversion
//!
//! This library converts flat-XML OpenDocument text (the `.fodt` format
//! every major office suite can export) into publication-quality LaTeX,
//! BibTeX databases, and XHTML or EPUB page sets.
//!
//! # Features
//!
//! - **LaTeX output**: headings, lists, tables, footnotes, hyperlinks,
//!   images and formulas, with character-level transliteration into the
//!   7-bit encodings classic TeX engines expect
//! - **BibTeX output**: bibliography marks extracted into a `.bib`
//!   database, or inlined as a `thebibliography` environment
//! - **XHTML/EPUB output**: one or more pages with CSS styling, split at
//!   a configurable heading level, ready for EPUB packaging
//! - **Configurable**: an option map layered from built-in profiles,
//!   configuration files, and command-line overrides
//! - **Diagnostics as data**: recoverable problems degrade to visible
//!   placeholders and are reported in an end-of-run list, never a panic
//!
//! # Example - Converting to LaTeX
//!
//! ```no_run
//! use longan::latex::LatexConverter;
//! use longan::convert::Converter;
//! use longan::office::TextDocument;
//!
//! # fn main() -> longan::Result<()> {
//! let document = TextDocument::open("thesis.fodt")?;
//! let mut converter = LatexConverter::new();
//! converter.apply_option("backend", "pdftex")?;
//!
//! let result = converter.convert(&document, "thesis")?;
//! result.write_all("out".as_ref())?;
//!
//! for diagnostic in &result.diagnostics().entries {
//!     eprintln!("{diagnostic}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Choosing a format at runtime
//!
//! ```no_run
//! use longan::convert::{make_converter, OutputFormat};
//! use longan::office::TextDocument;
//!
//! # fn main() -> longan::Result<()> {
//! let document = TextDocument::open("manual.fodt")?;
//! let mut converter = make_converter(OutputFormat::Epub)?;
//! converter.apply_option("split_level", "1")?;
//! let result = converter.convert(&document, "manual")?;
//! result.write_all("book".as_ref())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Inspecting a document
//!
//! ```no_run
//! use longan::office::TextDocument;
//!
//! # fn main() -> longan::Result<()> {
//! let document = TextDocument::open("report.fodt")?;
//! if let Some(title) = &document.meta().title {
//!     println!("Title: {title}");
//! }
//! println!("Language: {}", document.language());
//! # Ok(())
//! # }
//! ```

/// Shared error type, diagnostics collector, and length handling
pub mod common;

/// Configuration options, built-in profiles, and complex option tables
pub mod config;

/// Converter trait, output format selection, and the result model
pub mod convert;

/// Document model: flat-XML parsing, styles, metadata, bibliography marks
pub mod office;

/// Handoff of produced LaTeX masters to an installed TeX toolchain
pub mod postprocess;

/// LaTeX output: document assembly and character transliteration
#[cfg(feature = "latex")]
pub mod latex;

/// BibTeX database output
#[cfg(feature = "bibtex")]
pub mod bibtex;

/// XHTML 1.1 and EPUB content document output
#[cfg(feature = "xhtml")]
pub mod xhtml;

// Re-export commonly used types for convenience
pub use common::{Diagnostic, DiagnosticLevel, Diagnostics, Error, Result};
pub use config::Config;
pub use convert::{make_converter, Converter, ConverterResult, OutputFormat, OutputFile};
pub use office::TextDocument;
