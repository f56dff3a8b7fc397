//! Converter construction and the shared converter interface.
//!
//! Every output format implements [`Converter`]; [`make_converter`] picks
//! the right one for an [`OutputFormat`]. Formats compiled out via cargo
//! features surface as [`Error::FeatureDisabled`](crate::common::Error)
//! at construction time.
//!
//! # Examples
//!
//! ```rust,no_run
//! use longan::convert::{make_converter, OutputFormat};
//! use longan::office::TextDocument;
//!
//! # fn main() -> Result<(), longan::common::Error> {
//! let doc = TextDocument::open("thesis.fodt")?;
//! let mut converter = make_converter(OutputFormat::Latex)?;
//! converter.apply_option("ConfigURL", "*clean")?;
//! let result = converter.convert(&doc, "thesis")?;
//! result.write_all("out".as_ref())?;
//! # Ok(())
//! # }
//! ```

mod result;

pub use result::{ContentEntry, ConverterResult, OutputFile};

use crate::common::{Error, Result};
use crate::config::Config;
use crate::office::TextDocument;
use std::fs;

/// The supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// LaTeX source
    Latex,
    /// BibTeX database extracted from bibliography marks
    Bibtex,
    /// XHTML 1.1
    Xhtml,
    /// XHTML content documents for EPUB 3 packaging
    Epub,
}

impl OutputFormat {
    /// Parse a format name as given on a command line
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "latex" | "tex" => Some(Self::Latex),
            "bibtex" | "bib" => Some(Self::Bibtex),
            "xhtml" | "html" => Some(Self::Xhtml),
            "epub" => Some(Self::Epub),
            _ => None,
        }
    }

    /// The canonical format name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latex => "latex",
            Self::Bibtex => "bibtex",
            Self::Xhtml => "xhtml",
            Self::Epub => "epub",
        }
    }

    /// The file extension for master documents of this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Latex => "tex",
            Self::Bibtex => "bib",
            Self::Xhtml => "html",
            Self::Epub => "xhtml",
        }
    }

    /// The MIME type for master documents of this format
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Latex => "application/x-latex",
            Self::Bibtex => "application/x-bibtex",
            Self::Xhtml | Self::Epub => "application/xhtml+xml",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interface shared by all output format converters.
///
/// A converter is configured first (via [`read_config`](Self::read_config)
/// or repeated [`apply_option`](Self::apply_option) calls) and then run on
/// one or more documents.
pub trait Converter {
    /// The active configuration
    fn config(&self) -> &Config;

    /// The active configuration, for modification
    fn config_mut(&mut self) -> &mut Config;

    /// Read a configuration file, layering it over the current one
    ///
    /// # Errors
    ///
    /// Returns an error for malformed configuration XML; the previous
    /// configuration stays in effect.
    fn read_config(&mut self, bytes: &[u8]) -> Result<()> {
        self.config_mut().read(bytes)
    }

    /// Replace the built-in output template.
    ///
    /// Only meaningful for formats with a document skeleton (XHTML).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] for formats without templates.
    fn read_template(&mut self, _bytes: &[u8]) -> Result<()> {
        Err(Error::Unsupported(
            "This output format does not use templates".to_string(),
        ))
    }

    /// Apply a single option.
    ///
    /// Two keys are intercepted rather than stored: `ConfigURL` loads a
    /// configuration file (or a `*name` built-in) and `TemplateURL` loads
    /// a template file. Everything else goes into the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when an intercepted file cannot be read or parsed.
    fn apply_option(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "ConfigURL" => {
                if let Some(builtin) = value.strip_prefix('*') {
                    self.config_mut().read_builtin(&format!("*{builtin}"))
                } else {
                    let bytes = fs::read(value)?;
                    self.read_config(&bytes)
                }
            },
            "TemplateURL" => {
                let bytes = fs::read(value)?;
                self.read_template(&bytes)
            },
            _ => {
                self.config_mut().set(key, value);
                Ok(())
            },
        }
    }

    /// Apply a sequence of options in order
    ///
    /// # Errors
    ///
    /// Stops at the first option that fails to apply.
    fn apply_options(&mut self, options: &[(String, String)]) -> Result<()> {
        for (key, value) in options {
            self.apply_option(key, value)?;
        }
        Ok(())
    }

    /// Convert a document. `name` is the base name for generated files,
    /// without an extension.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures that prevent any output at all;
    /// recoverable problems are reported through the result diagnostics.
    fn convert(&mut self, document: &TextDocument, name: &str) -> Result<ConverterResult>;

    /// Parse flat ODF XML bytes and convert them
    ///
    /// # Errors
    ///
    /// Returns an error when the bytes are not a flat ODF text document,
    /// or when the conversion itself fails.
    fn convert_bytes(&mut self, bytes: &[u8], name: &str) -> Result<ConverterResult> {
        let document = TextDocument::from_flat_xml(bytes)?;
        self.convert(&document, name)
    }
}

/// Create a converter for an output format.
///
/// # Errors
///
/// Returns [`Error::FeatureDisabled`] when the format was compiled out.
///
/// # Examples
///
/// ```rust,no_run
/// use longan::convert::{make_converter, OutputFormat};
///
/// # fn main() -> Result<(), longan::common::Error> {
/// let converter = make_converter(OutputFormat::Xhtml)?;
/// # Ok(())
/// # }
/// ```
pub fn make_converter(format: OutputFormat) -> Result<Box<dyn Converter>> {
    match format {
        OutputFormat::Latex => {
            #[cfg(feature = "latex")]
            {
                Ok(Box::new(crate::latex::LatexConverter::new()))
            }
            #[cfg(not(feature = "latex"))]
            {
                Err(Error::FeatureDisabled("latex".to_string()))
            }
        },
        OutputFormat::Bibtex => {
            #[cfg(feature = "bibtex")]
            {
                Ok(Box::new(crate::bibtex::BibtexConverter::new()))
            }
            #[cfg(not(feature = "bibtex"))]
            {
                Err(Error::FeatureDisabled("bibtex".to_string()))
            }
        },
        OutputFormat::Xhtml => {
            #[cfg(feature = "xhtml")]
            {
                Ok(Box::new(crate::xhtml::XhtmlConverter::new()))
            }
            #[cfg(not(feature = "xhtml"))]
            {
                Err(Error::FeatureDisabled("xhtml".to_string()))
            }
        },
        OutputFormat::Epub => {
            #[cfg(feature = "xhtml")]
            {
                Ok(Box::new(crate::xhtml::XhtmlConverter::epub()))
            }
            #[cfg(not(feature = "xhtml"))]
            {
                Err(Error::FeatureDisabled("xhtml".to_string()))
            }
        },
    }
}

/// Sniff the file extension and MIME type of raw image bytes.
///
/// Falls back to PNG when the signature is unknown; the bytes are
/// written out either way.
pub(crate) fn image_kind(bytes: &[u8]) -> (&'static str, &'static str) {
    if bytes.starts_with(b"\x89PNG") {
        ("png", "image/png")
    } else if bytes.starts_with(b"\xFF\xD8\xFF") {
        ("jpg", "image/jpeg")
    } else if bytes.starts_with(b"GIF8") {
        ("gif", "image/gif")
    } else if bytes.starts_with(b"<svg") || bytes.starts_with(b"<?xml") {
        ("svg", "image/svg+xml")
    } else {
        ("png", "image/png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::parse("latex"), Some(OutputFormat::Latex));
        assert_eq!(OutputFormat::parse("tex"), Some(OutputFormat::Latex));
        assert_eq!(OutputFormat::parse("bibtex"), Some(OutputFormat::Bibtex));
        assert_eq!(OutputFormat::parse("xhtml"), Some(OutputFormat::Xhtml));
        assert_eq!(OutputFormat::parse("epub"), Some(OutputFormat::Epub));
        assert_eq!(OutputFormat::parse("pdf"), None);
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(OutputFormat::Latex.extension(), "tex");
        assert_eq!(OutputFormat::Bibtex.mime(), "application/x-bibtex");
        assert_eq!(OutputFormat::Xhtml.to_string(), "xhtml");
    }

    #[test]
    fn test_image_signatures() {
        assert_eq!(image_kind(b"\x89PNG\r\n").0, "png");
        assert_eq!(image_kind(b"\xFF\xD8\xFF\xE0").0, "jpg");
        assert_eq!(image_kind(b"GIF89a").0, "gif");
        assert_eq!(image_kind(b"garbage").0, "png");
    }

    #[cfg(feature = "latex")]
    #[test]
    fn test_option_application() {
        let mut converter = make_converter(OutputFormat::Latex).unwrap();
        converter.apply_option("backend", "xetex").unwrap();
        converter.apply_option("ConfigURL", "*clean").unwrap();
        assert_eq!(converter.config().option("backend"), Some("generic"));
        assert!(converter.apply_option("ConfigURL", "*missing").is_err());
    }
}
