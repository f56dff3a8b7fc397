//! Document metadata from `office:meta`.
//!
//! Covers the Dublin Core and `meta:*` properties a text document
//! carries: title, subject, keywords, authors, language, and dates.

use crate::office::element::Element;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Document metadata structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Document title (`dc:title`)
    pub title: Option<String>,
    /// Document subject (`dc:subject`)
    pub subject: Option<String>,
    /// Document description (`dc:description`)
    pub description: Option<String>,
    /// Keywords (`meta:keyword`, one entry per element)
    pub keywords: Vec<String>,
    /// Original author (`meta:initial-creator`)
    pub initial_creator: Option<String>,
    /// Last author (`dc:creator`)
    pub creator: Option<String>,
    /// Document language (`dc:language`), e.g. `en-US`
    pub language: Option<String>,
    /// Creation date (`meta:creation-date`)
    pub created: Option<NaiveDateTime>,
    /// Last modification date (`dc:date`)
    pub date: Option<NaiveDateTime>,
    /// Producing application (`meta:generator`)
    pub generator: Option<String>,
    /// User-defined properties (`meta:user-defined`), in document order
    pub user_defined: Vec<(String, String)>,
}

impl DocumentMeta {
    /// Parse metadata from an `office:meta` element
    pub fn from_element(meta: &Element) -> Self {
        let mut result = Self::default();
        for child in meta.child_elements() {
            let text = child.plain_text();
            match child.tag() {
                "dc:title" => result.title = non_empty(text),
                "dc:subject" => result.subject = non_empty(text),
                "dc:description" => result.description = non_empty(text),
                "dc:creator" => result.creator = non_empty(text),
                "dc:language" => result.language = non_empty(text),
                "dc:date" => result.date = parse_odf_datetime(&text),
                "meta:initial-creator" => result.initial_creator = non_empty(text),
                "meta:creation-date" => result.created = parse_odf_datetime(&text),
                "meta:generator" => result.generator = non_empty(text),
                "meta:keyword" => {
                    if let Some(keyword) = non_empty(text) {
                        result.keywords.push(keyword);
                    }
                },
                "meta:user-defined" => {
                    if let Some(name) = child.attribute("meta:name") {
                        result.user_defined.push((name.to_string(), text));
                    }
                },
                _ => {},
            }
        }
        result
    }

    /// The author to show in output: the original author when known,
    /// otherwise the last one
    pub fn author(&self) -> Option<&str> {
        self.initial_creator
            .as_deref()
            .or(self.creator.as_deref())
    }

    /// Check if the metadata contains any actual data
    pub fn has_data(&self) -> bool {
        self.title.is_some()
            || self.subject.is_some()
            || self.description.is_some()
            || !self.keywords.is_empty()
            || self.initial_creator.is_some()
            || self.creator.is_some()
            || self.language.is_some()
            || self.created.is_some()
            || self.date.is_some()
            || self.generator.is_some()
            || !self.user_defined.is_empty()
    }

    /// Language part of `dc:language`, e.g. `en` from `en-US`
    pub fn language_code(&self) -> Option<&str> {
        self.language
            .as_deref()
            .map(|l| l.split('-').next().unwrap_or(l))
    }

    /// Country part of `dc:language`, e.g. `US` from `en-US`
    pub fn country_code(&self) -> Option<&str> {
        self.language.as_deref().and_then(|l| l.split('-').nth(1))
    }
}

/// Parse the date formats ODF producers emit: full ISO 8601 with or
/// without timezone, with or without fractional seconds, or a bare date.
pub fn parse_odf_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_element() {
        let xml = br#"<office:meta>
            <dc:title>Annual Report</dc:title>
            <dc:creator>B. Editor</dc:creator>
            <meta:initial-creator>A. Writer</meta:initial-creator>
            <dc:language>de-AT</dc:language>
            <dc:date>2019-03-27T14:05:33</dc:date>
            <meta:keyword>finance</meta:keyword>
            <meta:keyword>2019</meta:keyword>
            <meta:user-defined meta:name="Department">Sales</meta:user-defined>
        </office:meta>"#;
        let meta = DocumentMeta::from_element(&Element::from_bytes(xml).unwrap());

        assert_eq!(meta.title.as_deref(), Some("Annual Report"));
        assert_eq!(meta.author(), Some("A. Writer"));
        assert_eq!(meta.language_code(), Some("de"));
        assert_eq!(meta.country_code(), Some("AT"));
        assert_eq!(meta.keywords, vec!["finance", "2019"]);
        assert_eq!(
            meta.user_defined,
            vec![("Department".to_string(), "Sales".to_string())]
        );
        assert_eq!(meta.date.unwrap().format("%Y-%m-%d").to_string(), "2019-03-27");
        assert!(meta.has_data());
    }

    #[test]
    fn test_empty_meta_has_no_data() {
        let meta = DocumentMeta::from_element(&Element::new("office:meta"));
        assert!(!meta.has_data());
        assert_eq!(meta.author(), None);
    }

    #[test]
    fn test_datetime_variants() {
        assert!(parse_odf_datetime("2020-05-14T12:30:00").is_some());
        assert!(parse_odf_datetime("2020-05-14T12:30:00.123456").is_some());
        assert!(parse_odf_datetime("2020-05-14T12:30:00Z").is_some());
        assert!(parse_odf_datetime("2020-05-14T12:30:00+02:00").is_some());
        assert!(parse_odf_datetime("2020-05-14").is_some());
        assert!(parse_odf_datetime("yesterday").is_none());
        assert!(parse_odf_datetime("").is_none());
    }
}
