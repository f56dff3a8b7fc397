//! Conversion configuration.
//!
//! A [`Config`] is a flat key/value store plus a handful of complex
//! tables (heading maps, style maps, string replacements). Unknown keys
//! are stored and written back untouched, so configuration files from
//! newer or older versions keep working.
//!
//! Configuration files are small XML documents:
//!
//! ```xml
//! <config>
//!   <option name="backend" value="pdftex"/>
//!   <heading-map level="1" name="section"/>
//!   <style-map name="Preformatted_20_Text" family="paragraph"
//!              before="\begin{quote}" after="\end{quote}" line-break="true"/>
//!   <string-replace input="(C)" latex-code="\copyright{}" fontencs="any"/>
//! </config>
//! ```
//!
//! A few built-in configurations ship with the library and are addressed
//! by a leading asterisk: `*default`, `*clean`, `*pdfprint`.

use crate::common::{Error, Result};
use crate::office::Element;
use indexmap::IndexMap;
use std::collections::HashMap;

/// LaTeX backend to target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// No backend specific code
    #[default]
    Generic,
    /// pdfTeX (pdf output)
    Pdftex,
    /// DVI with dvips in mind
    Dvips,
    /// XeTeX (native Unicode, fontspec)
    Xetex,
}

impl Backend {
    /// Parse from an option value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "generic" => Some(Self::Generic),
            "pdftex" => Some(Self::Pdftex),
            "dvips" => Some(Self::Dvips),
            "xetex" => Some(Self::Xetex),
            _ => None,
        }
    }

    /// Convert to the option value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Pdftex => "pdftex",
            Self::Dvips => "dvips",
            Self::Xetex => "xetex",
        }
    }
}

/// 8-bit input encoding for the generated LaTeX source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputEncoding {
    /// Plain ASCII, everything else via macros
    #[default]
    Ascii,
    /// ISO 8859-1
    Latin1,
    /// ISO 8859-2
    Latin2,
    /// Windows-1250 (Central European)
    Cp1250,
    /// Windows-1251 (Cyrillic)
    Cp1251,
    /// KOI8-R (Cyrillic)
    Koi8R,
    /// UTF-8
    Utf8,
}

impl InputEncoding {
    /// Parse from an option value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ascii" => Some(Self::Ascii),
            "latin1" => Some(Self::Latin1),
            "latin2" => Some(Self::Latin2),
            "cp1250" => Some(Self::Cp1250),
            "cp1251" => Some(Self::Cp1251),
            "koi8-r" => Some(Self::Koi8R),
            "utf8" => Some(Self::Utf8),
            _ => None,
        }
    }

    /// Convert to the option value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Latin1 => "latin1",
            Self::Latin2 => "latin2",
            Self::Cp1250 => "cp1250",
            Self::Cp1251 => "cp1251",
            Self::Koi8R => "koi8-r",
            Self::Utf8 => "utf8",
        }
    }

    /// The inputenc package option for this encoding
    pub fn latex_name(&self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Latin1 => "latin1",
            Self::Latin2 => "latin2",
            Self::Cp1250 => "cp1250",
            Self::Cp1251 => "cp1251",
            Self::Koi8R => "koi8-r",
            Self::Utf8 => "utf8",
        }
    }
}

/// Script support level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptSupport {
    /// Western scripts only
    #[default]
    Western,
    /// Complex text layout scripts
    Ctl,
}

impl ScriptSupport {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "western" => Some(Self::Western),
            "ctl" => Some(Self::Ctl),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Western => "western",
            Self::Ctl => "ctl",
        }
    }
}

/// How much source formatting to carry into the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Formatting {
    /// Structure only, no character or paragraph formatting
    IgnoreAll,
    /// Bold, italic, and the other basic character switches
    #[default]
    ConvertBasic,
    /// Also font size, alignment, and language switches
    ConvertMost,
    /// Everything the target can express
    ConvertAll,
}

impl Formatting {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ignore_all" => Some(Self::IgnoreAll),
            "convert_basic" => Some(Self::ConvertBasic),
            "convert_most" => Some(Self::ConvertMost),
            "convert_all" => Some(Self::ConvertAll),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IgnoreAll => "ignore_all",
            Self::ConvertBasic => "convert_basic",
            Self::ConvertMost => "convert_most",
            Self::ConvertAll => "convert_all",
        }
    }
}

/// How lengths from the source are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    /// Keep the unit the document uses
    #[default]
    Original,
    /// Rewrite every length as points
    Pt,
}

impl Units {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "original" => Some(Self::Original),
            "pt" => Some(Self::Pt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Pt => "pt",
        }
    }
}

/// What to do with annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Notes {
    /// Drop them
    Ignore,
    /// Emit as LaTeX comments
    #[default]
    Comment,
    /// Emit as `\marginpar`
    Marginpar,
}

impl Notes {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ignore" => Some(Self::Ignore),
            "comment" => Some(Self::Comment),
            "marginpar" => Some(Self::Marginpar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Comment => "comment",
            Self::Marginpar => "marginpar",
        }
    }
}

/// One style mapping entry from a `style-map` element
#[derive(Debug, Clone, Default)]
pub struct StyleMapEntry {
    /// Code emitted before the content
    pub before: String,
    /// Code emitted after the content
    pub after: String,
    /// Whether to put the content on its own lines
    pub line_break: bool,
}

/// Named table of complex-option entries, in file order
pub type ComplexTable = IndexMap<String, HashMap<String, String>>;

const COMPLEX_KINDS: [(&str, &str); 3] = [
    ("heading-map", "level"),
    ("style-map", "name"),
    ("string-replace", "input"),
];

/// Conversion configuration store
#[derive(Debug, Clone, Default)]
pub struct Config {
    options: HashMap<String, String>,
    complex: HashMap<String, ComplexTable>,
}

impl Config {
    /// Create an empty configuration (all options at their defaults)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a simple option. Every key is accepted.
    pub fn set(&mut self, key: &str, value: &str) {
        self.options.insert(key.to_string(), value.to_string());
    }

    /// Get a simple option as stored
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(|s| s.as_str())
    }

    fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.option(key).unwrap_or(default)
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.option(key) {
            Some("true") => true,
            Some("false") => false,
            _ => default,
        }
    }

    fn get_u8(&self, key: &str, default: u8) -> u8 {
        self.option(key)
            .and_then(|s| s.parse().ok())
            .unwrap_or(default)
    }

    // Typed accessors. Values are parsed on every read; an unparsable
    // stored value falls back to the default.

    /// The LaTeX backend
    pub fn backend(&self) -> Backend {
        self.option("backend")
            .and_then(Backend::parse)
            .unwrap_or_default()
    }

    /// The input encoding. Locked to UTF-8 under the XeTeX backend,
    /// whatever the stored option says.
    pub fn inputencoding(&self) -> InputEncoding {
        if self.backend() == Backend::Xetex {
            return InputEncoding::Utf8;
        }
        self.option("inputencoding")
            .and_then(InputEncoding::parse)
            .unwrap_or_default()
    }

    /// Script support. Locked to complex text layout under XeTeX.
    pub fn script(&self) -> ScriptSupport {
        if self.backend() == Backend::Xetex {
            return ScriptSupport::Ctl;
        }
        self.option("script")
            .and_then(ScriptSupport::parse)
            .unwrap_or_default()
    }

    /// Formatting conversion level
    pub fn formatting(&self) -> Formatting {
        self.option("formatting")
            .and_then(Formatting::parse)
            .unwrap_or_default()
    }

    /// Annotation handling
    pub fn notes(&self) -> Notes {
        self.option("notes")
            .and_then(Notes::parse)
            .unwrap_or_default()
    }

    /// The document class for LaTeX output
    pub fn documentclass(&self) -> &str {
        self.get_str("documentclass", "article")
    }

    /// Global options for the document class, comma separated
    pub fn global_options(&self) -> &str {
        self.get_str("global_options", "")
    }

    /// Whether to track languages and emit babel/polyglossia support
    pub fn multilingual(&self) -> bool {
        self.get_bool("multilingual", true)
    }

    /// Whether Greek letters outside Greek text are treated as math
    pub fn greek_math(&self) -> bool {
        self.get_bool("greek_math", true)
    }

    pub fn use_hyperref(&self) -> bool {
        self.get_bool("use_hyperref", true)
    }

    pub fn use_color(&self) -> bool {
        self.get_bool("use_color", false)
    }

    pub fn use_amsmath(&self) -> bool {
        self.get_bool("use_amsmath", false)
    }

    pub fn use_amssymb(&self) -> bool {
        self.get_bool("use_amssymb", false)
    }

    pub fn use_eurosym(&self) -> bool {
        self.get_bool("use_eurosym", false)
    }

    pub fn use_wasysym(&self) -> bool {
        self.get_bool("use_wasysym", false)
    }

    /// Whether citations go to an external BibTeX database
    pub fn use_bibtex(&self) -> bool {
        self.get_bool("use_bibtex", false)
    }

    /// BibTeX style for `\bibliographystyle`
    pub fn bibtex_style(&self) -> &str {
        self.get_str("bibtex_style", "plain")
    }

    /// Whether to skip the preamble and produce a fragment
    pub fn no_preamble(&self) -> bool {
        self.get_bool("no_preamble", false)
    }

    /// Whether long lines are soft wrapped
    pub fn wrap_lines(&self) -> bool {
        self.get_bool("wrap_lines", true)
    }

    /// Wrap column for soft wrapping
    pub fn wrap_lines_after(&self) -> usize {
        self.option("wrap_lines_after")
            .and_then(|s| s.parse().ok())
            .unwrap_or(96)
    }

    /// Heading level at which XHTML output is split into files (0 = off)
    pub fn split_level(&self) -> u8 {
        self.get_u8("split_level", 0).min(6)
    }

    /// Extra preamble code inserted verbatim
    pub fn custom_preamble(&self) -> &str {
        self.get_str("custom_preamble", "")
    }

    /// Document image to use as the EPUB cover
    pub fn cover_image(&self) -> &str {
        self.get_str("cover_image", "")
    }

    /// How lengths are written out
    pub fn units(&self) -> Units {
        self.option("units").and_then(Units::parse).unwrap_or_default()
    }

    pub fn debug(&self) -> bool {
        self.get_bool("debug", false)
    }

    // Complex options

    /// Raw access to a complex table
    pub fn complex(&self, kind: &str) -> Option<&ComplexTable> {
        self.complex.get(kind)
    }

    /// Add or replace a complex entry
    pub fn set_complex_entry(&mut self, kind: &str, key: &str, attrs: HashMap<String, String>) {
        self.complex
            .entry(kind.to_string())
            .or_default()
            .insert(key.to_string(), attrs);
    }

    /// The sectioning command name mapped to a heading level, if any
    pub fn heading_name(&self, level: u8) -> Option<&str> {
        self.complex
            .get("heading-map")?
            .get(&level.to_string())?
            .get("name")
            .map(|s| s.as_str())
    }

    /// The deepest heading level with a mapping (0 when no map is set)
    pub fn heading_max_level(&self) -> u8 {
        self.complex
            .get("heading-map")
            .map(|table| {
                table
                    .keys()
                    .filter_map(|k| k.parse::<u8>().ok())
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    /// The style mapping for a style, if one is configured.
    ///
    /// Style maps are keyed by style name; the `family` attribute of the
    /// entry must match too.
    pub fn style_map(&self, family: &str, name: &str) -> Option<StyleMapEntry> {
        let entry = self.complex.get("style-map")?.get(name)?;
        if entry.get("family").map(|s| s.as_str()) != Some(family) {
            return None;
        }
        Some(StyleMapEntry {
            before: entry.get("before").cloned().unwrap_or_default(),
            after: entry.get("after").cloned().unwrap_or_default(),
            line_break: entry.get("line-break").map(|s| s == "true").unwrap_or(false),
        })
    }

    /// All string replacement entries: (input, latex-code, fontencs)
    pub fn string_replace_entries(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.complex
            .get("string-replace")
            .into_iter()
            .flatten()
            .map(|(input, attrs)| {
                (
                    input.as_str(),
                    attrs.get("latex-code").map(|s| s.as_str()).unwrap_or(""),
                    attrs.get("fontencs").map(|s| s.as_str()).unwrap_or("any"),
                )
            })
    }

    /// Read a configuration file, layering it over the current state.
    ///
    /// Simple and complex entries present in the file replace entries of
    /// the same key; everything else is kept.
    ///
    /// # Errors
    ///
    /// Returns an error when the XML is malformed or the root element is
    /// not `config`. The configuration is unchanged in that case.
    pub fn read(&mut self, bytes: &[u8]) -> Result<()> {
        let root = Element::from_bytes(bytes)?;
        if root.tag() != "config" {
            return Err(Error::Config(format!(
                "Expected a config root element, found {}",
                root.tag()
            )));
        }

        for child in root.child_elements() {
            if child.tag() == "option" {
                if let (Some(name), Some(value)) =
                    (child.attribute("name"), child.attribute("value"))
                {
                    self.set(name, value);
                }
                continue;
            }
            for (kind, key_attr) in COMPLEX_KINDS {
                if child.tag() == kind {
                    if let Some(key) = child.attribute(key_attr) {
                        self.set_complex_entry(kind, key, child.attributes().clone());
                    }
                    break;
                }
            }
            // Anything else is tolerated and dropped
        }
        Ok(())
    }

    /// Load one of the built-in configurations by its `*name`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for unknown names.
    pub fn read_builtin(&mut self, name: &str) -> Result<()> {
        let bytes = match name {
            "*default" => BUILTIN_DEFAULT,
            "*clean" => BUILTIN_CLEAN,
            "*pdfprint" => BUILTIN_PDFPRINT,
            _ => {
                return Err(Error::Config(format!(
                    "Unknown built-in configuration '{name}'"
                )));
            },
        };
        self.read(bytes.as_bytes())
    }

    /// Serialize the configuration as XML
    pub fn write(&self) -> String {
        let mut root = Element::new("config");

        let mut keys: Vec<&String> = self.options.keys().collect();
        keys.sort();
        for key in keys {
            root.add_child(
                Element::new("option")
                    .with_attribute("name", key)
                    .with_attribute("value", &self.options[key]),
            );
        }

        for (kind, _) in COMPLEX_KINDS {
            if let Some(table) = self.complex.get(kind) {
                for attrs in table.values() {
                    let mut element = Element::new(kind);
                    let mut attr_keys: Vec<&String> = attrs.keys().collect();
                    attr_keys.sort();
                    for key in attr_keys {
                        element.set_attribute(key, &attrs[key]);
                    }
                    root.add_child(element);
                }
            }
        }

        root.to_xml_string()
    }
}

const BUILTIN_DEFAULT: &str = r#"<config>
  <option name="backend" value="generic"/>
  <option name="inputencoding" value="ascii"/>
  <option name="formatting" value="convert_basic"/>
  <option name="use_hyperref" value="true"/>
</config>"#;

const BUILTIN_CLEAN: &str = r#"<config>
  <option name="backend" value="generic"/>
  <option name="formatting" value="ignore_all"/>
  <option name="use_hyperref" value="false"/>
  <option name="use_color" value="false"/>
  <option name="notes" value="ignore"/>
</config>"#;

const BUILTIN_PDFPRINT: &str = r#"<config>
  <option name="backend" value="pdftex"/>
  <option name="formatting" value="convert_most"/>
  <option name="use_hyperref" value="true"/>
  <option name="use_color" value="true"/>
</config>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.backend(), Backend::Generic);
        assert_eq!(config.inputencoding(), InputEncoding::Ascii);
        assert_eq!(config.formatting(), Formatting::ConvertBasic);
        assert_eq!(config.notes(), Notes::Comment);
        assert_eq!(config.documentclass(), "article");
        assert!(config.multilingual());
        assert!(config.greek_math());
        assert!(!config.use_bibtex());
        assert_eq!(config.split_level(), 0);
        assert_eq!(config.wrap_lines_after(), 96);
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let mut config = Config::new();
        config
            .read(br#"<config><option name="frobnicate" value="7"/><future-table x="1"/></config>"#)
            .unwrap();
        assert_eq!(config.option("frobnicate"), Some("7"));
        let written = config.write();
        assert!(written.contains("frobnicate"));
    }

    #[test]
    fn test_layering_overrides_matching_keys() {
        let mut config = Config::new();
        config
            .read(br#"<config><option name="backend" value="dvips"/><option name="debug" value="true"/></config>"#)
            .unwrap();
        config
            .read(br#"<config><option name="backend" value="pdftex"/></config>"#)
            .unwrap();
        assert_eq!(config.backend(), Backend::Pdftex);
        assert!(config.debug());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let mut config = Config::new();
        assert!(config.read(b"<config><option").is_err());
        assert!(config.read(b"<options/>").is_err());
    }

    #[test]
    fn test_xetex_locks_encoding_and_script() {
        let mut config = Config::new();
        config.set("backend", "xetex");
        config.set("inputencoding", "latin1");
        config.set("script", "western");
        assert_eq!(config.inputencoding(), InputEncoding::Utf8);
        assert_eq!(config.script(), ScriptSupport::Ctl);

        config.set("backend", "pdftex");
        assert_eq!(config.inputencoding(), InputEncoding::Latin1);
        assert_eq!(config.script(), ScriptSupport::Western);
    }

    #[test]
    fn test_builtins() {
        let mut config = Config::new();
        config.read_builtin("*pdfprint").unwrap();
        assert_eq!(config.backend(), Backend::Pdftex);
        assert!(config.use_color());

        assert!(config.read_builtin("*nonsense").is_err());
    }

    #[test]
    fn test_heading_map() {
        let mut config = Config::new();
        config
            .read(
                br#"<config>
                  <heading-map level="1" name="chapter"/>
                  <heading-map level="2" name="section"/>
                </config>"#,
            )
            .unwrap();
        assert_eq!(config.heading_name(1), Some("chapter"));
        assert_eq!(config.heading_name(2), Some("section"));
        assert_eq!(config.heading_name(3), None);
        assert_eq!(config.heading_max_level(), 2);
    }

    #[test]
    fn test_style_map_checks_family() {
        let mut config = Config::new();
        config
            .read(
                br#"<config>
                  <style-map name="Quotations" family="paragraph"
                             before="\begin{quote}" after="\end{quote}" line-break="true"/>
                </config>"#,
            )
            .unwrap();
        let entry = config.style_map("paragraph", "Quotations").unwrap();
        assert_eq!(entry.before, r"\begin{quote}");
        assert!(entry.line_break);
        assert!(config.style_map("text", "Quotations").is_none());
    }

    #[test]
    fn test_string_replace_round_trip() {
        let mut config = Config::new();
        config
            .read(
                br#"<config>
                  <string-replace input="--" latex-code="--" fontencs="any"/>
                  <string-replace input="..." latex-code="\dots{}"/>
                </config>"#,
            )
            .unwrap();
        let entries: Vec<_> = config.string_replace_entries().collect();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&("...", "\\dots{}", "any")));

        let written = config.write();
        let mut reread = Config::new();
        reread.read(written.as_bytes()).unwrap();
        assert_eq!(reread.string_replace_entries().count(), 2);
    }
}
