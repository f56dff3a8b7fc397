//! OpenDocument text document structure and API.

use crate::common::{Error, Result};
use crate::office::element::Element;
use crate::office::meta::DocumentMeta;
use crate::office::style::{StyleFamily, StyleRegistry};
use std::path::Path;

/// MIME type of OpenDocument text
pub const MIMETYPE_TEXT: &str = "application/vnd.oasis.opendocument.text";
/// MIME type of flat-XML OpenDocument text
pub const MIMETYPE_TEXT_FLAT: &str = "application/vnd.oasis.opendocument.text-flat-xml";

/// An OpenDocument text document.
///
/// This struct holds the parsed content tree, the style registry, and the
/// metadata of one document and provides the queries the converters need.
/// Documents are immutable after loading.
///
/// The loader reads flat-XML documents (`.fodt`, or a single exported
/// `content.xml` with embedded styles); packaged `.odt` archives are the
/// concern of whatever produced the bytes.
///
/// # Examples
///
/// ```no_run
/// use longan::office::TextDocument;
///
/// # fn main() -> longan::Result<()> {
/// let doc = TextDocument::open("document.fodt")?;
/// if let Some(title) = &doc.meta().title {
///     println!("Title: {}", title);
/// }
/// println!("Language: {}", doc.language());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TextDocument {
    /// The `office:text` content element
    content: Element,
    /// Registry of all styles in the document
    styles: StyleRegistry,
    /// Parsed `office:meta` metadata
    meta: DocumentMeta,
}

impl TextDocument {
    /// Open a flat-XML text document from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the XML is malformed,
    /// or the document is not a text document.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_flat_xml(&bytes)
    }

    /// Create a document from flat-XML bytes.
    ///
    /// The root element must be `office:document` (or, for a bare content
    /// stream, `office:document-content`). Styles are collected from
    /// `office:styles`, `office:automatic-styles` and `office:master-styles`;
    /// metadata from `office:meta`.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed, the declared MIME type is
    /// not a text document, or no `office:text` body is present.
    pub fn from_flat_xml(bytes: &[u8]) -> Result<Self> {
        let root = Element::from_bytes(bytes)?;

        if let Some(mimetype) = root.attribute("office:mimetype") {
            if mimetype != MIMETYPE_TEXT && mimetype != MIMETYPE_TEXT_FLAT {
                return Err(Error::InvalidFormat(format!(
                    "Not a text document: {mimetype}"
                )));
            }
        }

        let mut styles = StyleRegistry::new();
        for container in ["office:styles", "office:automatic-styles", "office:master-styles"] {
            if let Some(element) = root.find_descendant(container) {
                styles.load_from(element);
            }
        }

        let meta = root
            .find_descendant("office:meta")
            .map(DocumentMeta::from_element)
            .unwrap_or_default();

        let content = root
            .find_descendant("office:text")
            .cloned()
            .ok_or_else(|| Error::ComponentNotFound("office:text".to_string()))?;

        Ok(Self {
            content,
            styles,
            meta,
        })
    }

    /// Assemble a document from already materialized parts.
    ///
    /// `content` is expected to be an `office:text` element; the converters
    /// walk its children without looking at the tag itself.
    pub fn from_parts(content: Element, styles: StyleRegistry, meta: DocumentMeta) -> Self {
        Self {
            content,
            styles,
            meta,
        }
    }

    /// The `office:text` content element
    pub fn content(&self) -> &Element {
        &self.content
    }

    /// The style registry
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// The document metadata
    pub fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    /// The document default language.
    ///
    /// Taken from the default paragraph style, with `dc:language` as the
    /// fallback and `en` as the last resort.
    pub fn language(&self) -> String {
        self.default_text_property("fo:language")
            .map(|s| s.to_string())
            .or_else(|| self.meta.language_code().map(|s| s.to_string()))
            .unwrap_or_else(|| "en".to_string())
    }

    /// The document default country, possibly empty
    pub fn country(&self) -> String {
        self.default_text_property("fo:country")
            .filter(|&c| c != "none")
            .map(|s| s.to_string())
            .or_else(|| self.meta.country_code().map(|s| s.to_string()))
            .unwrap_or_default()
    }

    fn default_text_property(&self, attr: &str) -> Option<&str> {
        self.styles
            .default_style(StyleFamily::Paragraph)
            .and_then(|s| s.text_property(attr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = br#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
      <office:meta>
        <dc:title>Sample</dc:title>
        <dc:language>fr-CA</dc:language>
      </office:meta>
      <office:styles>
        <style:default-style style:family="paragraph">
          <style:text-properties fo:language="de" fo:country="DE"/>
        </style:default-style>
        <style:style style:name="Heading_20_1" style:family="paragraph" style:default-outline-level="1"/>
      </office:styles>
      <office:body>
        <office:text>
          <text:h text:outline-level="1">Title</text:h>
          <text:p>Body text.</text:p>
        </office:text>
      </office:body>
    </office:document>"#;

    #[test]
    fn test_from_flat_xml() {
        let doc = TextDocument::from_flat_xml(SAMPLE).unwrap();
        assert_eq!(doc.meta().title.as_deref(), Some("Sample"));
        assert_eq!(doc.content().child_elements().count(), 2);
        assert!(doc
            .styles()
            .style(StyleFamily::Paragraph, "Heading_20_1")
            .is_some());
    }

    #[test]
    fn test_language_prefers_default_style() {
        let doc = TextDocument::from_flat_xml(SAMPLE).unwrap();
        assert_eq!(doc.language(), "de");
        assert_eq!(doc.country(), "DE");
    }

    #[test]
    fn test_language_falls_back_to_meta_then_en() {
        let xml = br#"<office:document>
          <office:meta><dc:language>fr-CA</dc:language></office:meta>
          <office:body><office:text/></office:body>
        </office:document>"#;
        let doc = TextDocument::from_flat_xml(xml).unwrap();
        assert_eq!(doc.language(), "fr");
        assert_eq!(doc.country(), "CA");

        let bare = br#"<office:document><office:body><office:text/></office:body></office:document>"#;
        let doc = TextDocument::from_flat_xml(bare).unwrap();
        assert_eq!(doc.language(), "en");
        assert_eq!(doc.country(), "");
    }

    #[test]
    fn test_rejects_wrong_mimetype() {
        let xml = br#"<office:document office:mimetype="application/vnd.oasis.opendocument.spreadsheet">
          <office:body><office:spreadsheet/></office:body>
        </office:document>"#;
        assert!(matches!(
            TextDocument::from_flat_xml(xml),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_missing_body_is_component_not_found() {
        let xml = br#"<office:document office:mimetype="application/vnd.oasis.opendocument.text"/>"#;
        assert!(matches!(
            TextDocument::from_flat_xml(xml),
            Err(Error::ComponentNotFound(_))
        ));
    }
}
