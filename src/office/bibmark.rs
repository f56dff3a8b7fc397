//! Bibliography marks (`text:bibliography-mark`).
//!
//! A bibliography mark carries one cited work as a bag of attributes.
//! Both the entry types and the field names are closed vocabularies;
//! every variant maps explicitly to its ODF attribute and its BibTeX
//! name so a vocabulary change cannot pass silently.

use crate::office::element::Element;
use std::collections::HashMap;

/// Bibliography entry types of the ODF vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Article,
    Book,
    Booklet,
    Conference,
    Custom1,
    Custom2,
    Custom3,
    Custom4,
    Custom5,
    Email,
    InBook,
    InCollection,
    InProceedings,
    Journal,
    Manual,
    MastersThesis,
    Misc,
    PhdThesis,
    Proceedings,
    TechReport,
    Unpublished,
    Www,
}

impl EntryType {
    /// Parse from the `text:bibliography-type` attribute value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "article" => Some(Self::Article),
            "book" => Some(Self::Book),
            "booklet" => Some(Self::Booklet),
            "conference" => Some(Self::Conference),
            "custom1" => Some(Self::Custom1),
            "custom2" => Some(Self::Custom2),
            "custom3" => Some(Self::Custom3),
            "custom4" => Some(Self::Custom4),
            "custom5" => Some(Self::Custom5),
            "email" => Some(Self::Email),
            "inbook" => Some(Self::InBook),
            "incollection" => Some(Self::InCollection),
            "inproceedings" => Some(Self::InProceedings),
            "journal" => Some(Self::Journal),
            "manual" => Some(Self::Manual),
            "mastersthesis" => Some(Self::MastersThesis),
            "misc" => Some(Self::Misc),
            "phdthesis" => Some(Self::PhdThesis),
            "proceedings" => Some(Self::Proceedings),
            "techreport" => Some(Self::TechReport),
            "unpublished" => Some(Self::Unpublished),
            "www" => Some(Self::Www),
            _ => None,
        }
    }

    /// The ODF attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::Booklet => "booklet",
            Self::Conference => "conference",
            Self::Custom1 => "custom1",
            Self::Custom2 => "custom2",
            Self::Custom3 => "custom3",
            Self::Custom4 => "custom4",
            Self::Custom5 => "custom5",
            Self::Email => "email",
            Self::InBook => "inbook",
            Self::InCollection => "incollection",
            Self::InProceedings => "inproceedings",
            Self::Journal => "journal",
            Self::Manual => "manual",
            Self::MastersThesis => "mastersthesis",
            Self::Misc => "misc",
            Self::PhdThesis => "phdthesis",
            Self::Proceedings => "proceedings",
            Self::TechReport => "techreport",
            Self::Unpublished => "unpublished",
            Self::Www => "www",
        }
    }

    /// The BibTeX entry name. Types BibTeX has no counterpart for
    /// (the custom slots, email, journal, www) become `MISC`.
    pub fn as_bibtex(&self) -> &'static str {
        match self {
            Self::Article => "ARTICLE",
            Self::Book => "BOOK",
            Self::Booklet => "BOOKLET",
            Self::Conference => "CONFERENCE",
            Self::Custom1
            | Self::Custom2
            | Self::Custom3
            | Self::Custom4
            | Self::Custom5
            | Self::Email
            | Self::Journal
            | Self::Www
            | Self::Misc => "MISC",
            Self::InBook => "INBOOK",
            Self::InCollection => "INCOLLECTION",
            Self::InProceedings => "INPROCEEDINGS",
            Self::Manual => "MANUAL",
            Self::MastersThesis => "MASTERSTHESIS",
            Self::PhdThesis => "PHDTHESIS",
            Self::Proceedings => "PROCEEDINGS",
            Self::TechReport => "TECHREPORT",
            Self::Unpublished => "UNPUBLISHED",
        }
    }
}

/// Bibliography fields, in the order BibTeX records are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BibField {
    Author,
    Title,
    Year,
    Month,
    Journal,
    Volume,
    Number,
    Pages,
    Publisher,
    Address,
    Edition,
    Editor,
    Booktitle,
    Chapter,
    Series,
    Howpublished,
    Institution,
    Organizations,
    School,
    Note,
    Annote,
    Url,
    Custom1,
    Custom2,
    Custom3,
    Custom4,
    Custom5,
    Isbn,
    ReportType,
}

impl BibField {
    /// All fields in emission order
    pub const ALL: [BibField; 29] = [
        Self::Author,
        Self::Title,
        Self::Year,
        Self::Month,
        Self::Journal,
        Self::Volume,
        Self::Number,
        Self::Pages,
        Self::Publisher,
        Self::Address,
        Self::Edition,
        Self::Editor,
        Self::Booktitle,
        Self::Chapter,
        Self::Series,
        Self::Howpublished,
        Self::Institution,
        Self::Organizations,
        Self::School,
        Self::Note,
        Self::Annote,
        Self::Url,
        Self::Custom1,
        Self::Custom2,
        Self::Custom3,
        Self::Custom4,
        Self::Custom5,
        Self::Isbn,
        Self::ReportType,
    ];

    /// The ODF attribute holding this field
    pub fn as_attribute(&self) -> &'static str {
        match self {
            Self::Author => "text:author",
            Self::Title => "text:title",
            Self::Year => "text:year",
            Self::Month => "text:month",
            Self::Journal => "text:journal",
            Self::Volume => "text:volume",
            Self::Number => "text:number",
            Self::Pages => "text:pages",
            Self::Publisher => "text:publisher",
            Self::Address => "text:address",
            Self::Edition => "text:edition",
            Self::Editor => "text:editor",
            Self::Booktitle => "text:booktitle",
            Self::Chapter => "text:chapter",
            Self::Series => "text:series",
            Self::Howpublished => "text:howpublished",
            Self::Institution => "text:institution",
            Self::Organizations => "text:organizations",
            Self::School => "text:school",
            Self::Note => "text:note",
            Self::Annote => "text:annote",
            Self::Url => "text:url",
            Self::Custom1 => "text:custom1",
            Self::Custom2 => "text:custom2",
            Self::Custom3 => "text:custom3",
            Self::Custom4 => "text:custom4",
            Self::Custom5 => "text:custom5",
            Self::Isbn => "text:isbn",
            Self::ReportType => "text:report-type",
        }
    }

    /// The BibTeX field name
    pub fn as_bibtex(&self) -> &'static str {
        match self {
            Self::Author => "AUTHOR",
            Self::Title => "TITLE",
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Journal => "JOURNAL",
            Self::Volume => "VOLUME",
            Self::Number => "NUMBER",
            Self::Pages => "PAGES",
            Self::Publisher => "PUBLISHER",
            Self::Address => "ADDRESS",
            Self::Edition => "EDITION",
            Self::Editor => "EDITOR",
            Self::Booktitle => "BOOKTITLE",
            Self::Chapter => "CHAPTER",
            Self::Series => "SERIES",
            Self::Howpublished => "HOWPUBLISHED",
            Self::Institution => "INSTITUTION",
            Self::Organizations => "ORGANIZATION",
            Self::School => "SCHOOL",
            Self::Note => "NOTE",
            Self::Annote => "ANNOTE",
            Self::Url => "URL",
            Self::Custom1 => "CUSTOM1",
            Self::Custom2 => "CUSTOM2",
            Self::Custom3 => "CUSTOM3",
            Self::Custom4 => "CUSTOM4",
            Self::Custom5 => "CUSTOM5",
            Self::Isbn => "ISBN",
            Self::ReportType => "TYPE",
        }
    }
}

/// One cited work, as read from a `text:bibliography-mark`
#[derive(Debug, Clone)]
pub struct BibMark {
    identifier: String,
    entry_type: EntryType,
    fields: HashMap<BibField, String>,
}

impl BibMark {
    /// Create an empty mark
    pub fn new(identifier: &str, entry_type: EntryType) -> Self {
        Self {
            identifier: identifier.to_string(),
            entry_type,
            fields: HashMap::new(),
        }
    }

    /// Read a mark from its element. Returns `None` when the identifier
    /// is missing; an unknown entry type degrades to `misc`.
    pub fn from_element(element: &Element) -> Option<Self> {
        let identifier = element.attribute("text:identifier")?.trim();
        if identifier.is_empty() {
            return None;
        }
        let entry_type = element
            .attribute("text:bibliography-type")
            .and_then(EntryType::parse)
            .unwrap_or(EntryType::Misc);

        let mut mark = Self::new(identifier, entry_type);
        for field in BibField::ALL {
            if let Some(value) = element.attribute(field.as_attribute()) {
                if !value.is_empty() {
                    mark.fields.insert(field, value.to_string());
                }
            }
        }
        Some(mark)
    }

    /// Get the citation identifier
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Get the entry type
    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    /// Get a field value
    pub fn field(&self, field: BibField) -> Option<&str> {
        self.fields.get(&field).map(|s| s.as_str())
    }

    /// Set a field value
    pub fn set_field(&mut self, field: BibField, value: &str) {
        self.fields.insert(field, value.to_string());
    }

    /// Populated fields in emission order
    pub fn fields(&self) -> impl Iterator<Item = (BibField, &str)> {
        BibField::ALL
            .iter()
            .filter_map(|f| self.fields.get(f).map(|v| (*f, v.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_element() {
        let element = Element::new("text:bibliography-mark")
            .with_attribute("text:identifier", "smith2020")
            .with_attribute("text:bibliography-type", "article")
            .with_attribute("text:author", "Smith, J.")
            .with_attribute("text:title", "On Things")
            .with_attribute("text:year", "2020");
        let mark = BibMark::from_element(&element).unwrap();

        assert_eq!(mark.identifier(), "smith2020");
        assert_eq!(mark.entry_type(), EntryType::Article);
        assert_eq!(mark.field(BibField::Author), Some("Smith, J."));
        assert_eq!(mark.field(BibField::Publisher), None);
    }

    #[test]
    fn test_missing_identifier_rejected() {
        let element = Element::new("text:bibliography-mark")
            .with_attribute("text:bibliography-type", "book");
        assert!(BibMark::from_element(&element).is_none());

        let blank = Element::new("text:bibliography-mark")
            .with_attribute("text:identifier", "  ");
        assert!(BibMark::from_element(&blank).is_none());
    }

    #[test]
    fn test_unknown_type_degrades_to_misc() {
        let element = Element::new("text:bibliography-mark")
            .with_attribute("text:identifier", "x")
            .with_attribute("text:bibliography-type", "novel");
        let mark = BibMark::from_element(&element).unwrap();
        assert_eq!(mark.entry_type(), EntryType::Misc);
    }

    #[test]
    fn test_fields_iterate_in_emission_order() {
        let mut mark = BibMark::new("k", EntryType::Book);
        mark.set_field(BibField::Year, "1999");
        mark.set_field(BibField::Author, "A");
        mark.set_field(BibField::Title, "T");

        let order: Vec<BibField> = mark.fields().map(|(f, _)| f).collect();
        assert_eq!(order, vec![BibField::Author, BibField::Title, BibField::Year]);
    }

    #[test]
    fn test_vocabulary_mappings() {
        assert_eq!(EntryType::TechReport.as_bibtex(), "TECHREPORT");
        assert_eq!(EntryType::Www.as_bibtex(), "MISC");
        assert_eq!(EntryType::parse("phdthesis"), Some(EntryType::PhdThesis));
        assert_eq!(EntryType::parse("thesis"), None);

        assert_eq!(BibField::Organizations.as_bibtex(), "ORGANIZATION");
        assert_eq!(BibField::ReportType.as_attribute(), "text:report-type");
        assert_eq!(BibField::ALL.len(), 29);
    }
}
