//! BibTeX output.
//!
//! The bibliography of an OpenDocument text lives in its
//! `text:bibliography-mark` elements. This module collects them into a
//! BibTeX database, either standalone through [`BibtexConverter`] or as
//! the companion `.bib` file of a LaTeX conversion.
//!
//! BibTeX predates Unicode, so field values are written through the
//! eight-bit character engine with its default seven-bit setup; anything
//! outside ASCII comes out as the equivalent LaTeX macros.

use crate::common::Result;
use crate::config::Config;
use crate::convert::{Converter, ConverterResult, OutputFile};
use crate::latex::i18n::{ClassicI18n, I18n};
use crate::latex::{util, Context};
use crate::office::bibmark::BibMark;
use crate::office::element::Element;
use crate::office::TextDocument;
use indexmap::IndexMap;

/// A BibTeX database under construction.
///
/// Entries keep their insertion order. Two marks with the same
/// identifier describe the same work; the first one read wins and later
/// ones are ignored, matching how citations resolve.
#[derive(Debug, Default)]
pub struct BibtexDocument {
    entries: IndexMap<String, BibMark>,
}

impl BibtexDocument {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mark. Returns `false` when an entry with the same
    /// identifier is already present.
    pub fn add(&mut self, mark: &BibMark) -> bool {
        let key = util::safe_key(mark.identifier());
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, mark.clone());
        true
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entry has been added
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the database as BibTeX source.
    ///
    /// Fields are written in a fixed order so the same document always
    /// produces the same file.
    pub fn write(&self) -> String {
        let mut i18n = ClassicI18n::new(&Config::new());
        let ctx = Context::root("en", "");

        let mut out = String::new();
        for (key, mark) in &self.entries {
            out.push_str(&format!("@{}{{{},\n", mark.entry_type().as_bibtex(), key));
            for (field, value) in mark.fields() {
                let escaped = i18n.convert(value, &ctx);
                out.push_str(&format!("    {} = {{{}}},\n", field.as_bibtex(), escaped));
            }
            out.push_str("}\n\n");
        }
        out
    }
}

/// Extracts the bibliography of an OpenDocument text as a BibTeX file.
///
/// # Examples
///
/// ```rust,no_run
/// use longan::bibtex::BibtexConverter;
/// use longan::convert::Converter;
/// use longan::office::TextDocument;
///
/// # fn main() -> longan::Result<()> {
/// let doc = TextDocument::open("thesis.fodt")?;
/// let result = BibtexConverter::new().convert(&doc, "thesis")?;
/// result.write_all("out".as_ref())?;
/// # Ok(())
/// # }
/// ```
pub struct BibtexConverter {
    config: Config,
}

impl BibtexConverter {
    /// Create a converter with the default configuration
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }
}

impl Default for BibtexConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for BibtexConverter {
    fn config(&self) -> &Config {
        &self.config
    }

    fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    fn convert(&mut self, document: &TextDocument, name: &str) -> Result<ConverterResult> {
        let mut database = BibtexDocument::new();
        let mut dropped = 0usize;
        let mut duplicates = 0usize;
        collect_marks(document.content(), &mut database, &mut dropped, &mut duplicates);

        let mut result = ConverterResult::new();
        result.add_master(OutputFile::new(
            format!("{name}.bib"),
            "application/x-bibtex",
            true,
            database.write().into_bytes(),
        ));

        let diagnostics = result.diagnostics_mut();
        if database.is_empty() {
            diagnostics.warning("The document holds no bibliography marks");
        }
        if dropped > 0 {
            diagnostics.warning(format!(
                "{dropped} bibliography marks without an identifier were dropped"
            ));
        }
        if duplicates > 0 {
            diagnostics.info(format!(
                "{duplicates} repeated citations were merged into their first occurrence"
            ));
        }
        Ok(result)
    }
}

fn collect_marks(
    element: &Element,
    database: &mut BibtexDocument,
    dropped: &mut usize,
    duplicates: &mut usize,
) {
    for child in element.child_elements() {
        if child.tag() == "text:bibliography-mark" {
            match BibMark::from_element(child) {
                Some(mark) => {
                    if !database.add(&mark) {
                        *duplicates += 1;
                    }
                },
                None => *dropped += 1,
            }
        } else {
            collect_marks(child, database, dropped, duplicates);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::office::bibmark::{BibField, EntryType};

    fn mark(id: &str) -> BibMark {
        BibMark::new(id, EntryType::Article)
    }

    #[test]
    fn test_record_format() {
        let mut m = BibMark::new("smith2020", EntryType::Article);
        m.set_field(BibField::Author, "Smith, J.");
        m.set_field(BibField::Title, "On Things");
        m.set_field(BibField::Year, "2020");

        let mut db = BibtexDocument::new();
        db.add(&m);
        let text = db.write();
        assert_eq!(
            text,
            "@ARTICLE{smith2020,\n    AUTHOR = {Smith, J.},\n    TITLE = {On Things},\n    YEAR = {2020},\n}\n\n"
        );
    }

    #[test]
    fn test_field_order_is_fixed() {
        let mut m = BibMark::new("k", EntryType::Book);
        m.set_field(BibField::Year, "1984");
        m.set_field(BibField::Author, "Knuth");
        m.set_field(BibField::Publisher, "AW");

        let mut db = BibtexDocument::new();
        db.add(&m);
        let text = db.write();
        let author = text.find("AUTHOR").unwrap();
        let year = text.find("YEAR").unwrap();
        let publisher = text.find("PUBLISHER").unwrap();
        assert!(author < year && year < publisher);
    }

    #[test]
    fn test_first_entry_wins() {
        let mut first = mark("dup");
        first.set_field(BibField::Title, "Original");
        let mut second = mark("dup");
        second.set_field(BibField::Title, "Impostor");

        let mut db = BibtexDocument::new();
        assert!(db.add(&first));
        assert!(!db.add(&second));
        assert_eq!(db.len(), 1);
        let text = db.write();
        assert!(text.contains("Original"));
        assert!(!text.contains("Impostor"));
    }

    #[test]
    fn test_values_are_seven_bit() {
        let mut m = mark("m1");
        m.set_field(BibField::Author, "Müller, K.");
        m.set_field(BibField::Title, "50% effort");

        let mut db = BibtexDocument::new();
        db.add(&m);
        let text = db.write();
        assert!(text.contains("M\\\"uller, K."));
        assert!(text.contains("50\\% effort"));
        assert!(text.is_ascii());
    }

    #[test]
    fn test_identifier_sanitized() {
        let m = mark("täg one");
        let mut db = BibtexDocument::new();
        db.add(&m);
        assert!(db.write().contains("@ARTICLE{t-g-one,"));
    }

    #[test]
    fn test_misc_fallback_type() {
        let m = BibMark::new("w", EntryType::Www);
        let mut db = BibtexDocument::new();
        db.add(&m);
        assert!(db.write().contains("@MISC{w,"));
    }

    #[test]
    fn test_converter_end_to_end() {
        let xml = br#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
          <office:body><office:text>
            <text:p>Cite
              <text:bibliography-mark text:identifier="a" text:bibliography-type="article"
                text:title="First" text:year="2001">[1]</text:bibliography-mark>
              then
              <text:bibliography-mark text:identifier="b" text:bibliography-type="book"
                text:title="Second">[2]</text:bibliography-mark>
              and
              <text:bibliography-mark text:identifier="a" text:title="Shadow">[1]</text:bibliography-mark>
            </text:p>
          </office:text></office:body>
        </office:document>"#;
        let doc = TextDocument::from_flat_xml(xml).unwrap();
        let result = BibtexConverter::new().convert(&doc, "refs").unwrap();

        let master = result.master().unwrap();
        assert_eq!(master.name(), "refs.bib");
        assert_eq!(master.mime(), "application/x-bibtex");
        let text = String::from_utf8(master.bytes().to_vec()).unwrap();

        let a = text.find("@ARTICLE{a,").unwrap();
        let b = text.find("@BOOK{b,").unwrap();
        assert!(a < b);
        assert!(text.contains("TITLE = {First}"));
        assert!(!text.contains("Shadow"));
        assert_eq!(result.diagnostics().infos, 1);
    }

    #[test]
    fn test_empty_document_warns() {
        let xml = br#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
          <office:body><office:text><text:p>No citations here.</text:p></office:text></office:body>
        </office:document>"#;
        let doc = TextDocument::from_flat_xml(xml).unwrap();
        let result = BibtexConverter::new().convert(&doc, "refs").unwrap();
        assert!(result.master().unwrap().bytes().is_empty());
        assert_eq!(result.diagnostics().warnings, 1);
    }
}
