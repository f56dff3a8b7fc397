//! Text conversion for LaTeX output.
//!
//! Everything character-level lives here: escaping TeX specials, turning
//! Unicode into macros, font encoding zones, inline math spans for symbols
//! and the babel/polyglossia language machinery. The engine is chosen per
//! conversion from the configured backend:
//!
//! - [`ClassicI18n`] for pdfTeX and friends, built on inputenc/fontenc
//! - [`UnicodeI18n`] for XeTeX, built on fontspec/polyglossia

mod catalog;
pub mod classic;
pub mod table;
mod trie;
pub mod unicode;

pub use classic::ClassicI18n;
pub use table::{CharClass, FontEncs};
pub use unicode::UnicodeI18n;

use crate::common::Diagnostics;
use crate::config::{Backend, Config};
use crate::latex::context::Context;
use crate::latex::portion::LatexDocumentPortion;
use phf::phf_map;

/// Character and language conversion for one LaTeX export.
///
/// An engine is stateful: it accumulates the character repertoire, the
/// languages and the special symbol fonts seen during conversion, and
/// afterwards writes the matching preamble declarations.
pub trait I18n {
    /// Convert a text run to LaTeX
    fn convert(&mut self, text: &str, ctx: &Context) -> String;

    /// Activate the symbol table for a font name. Returns false when the
    /// font has no special table; the caller must not pop in that case.
    fn push_special_table(&mut self, name: &str) -> bool;

    /// Deactivate the most recently pushed symbol table
    fn pop_special_table(&mut self);

    /// Record the main document language
    fn set_document_language(&mut self, lang: &str, country: &str);

    /// Resolve a language switch to a package-level language name,
    /// recording it for the preamble. None means no switch is possible.
    fn language_command(&mut self, lang: &str, country: &str) -> Option<String>;

    /// Append the preamble declarations implied by everything converted
    /// so far
    fn append_declarations(&mut self, pack: &mut LatexDocumentPortion);

    /// All languages recorded through [`I18n::language_command`]
    fn languages(&self) -> Vec<String>;

    /// True when Cyrillic text was seen
    fn uses_cyrillic(&self) -> bool;

    /// True when Greek text was seen
    fn uses_greek(&self) -> bool;

    /// True when polytonic Greek text was seen
    fn uses_polytonic(&self) -> bool;

    /// Drain the diagnostics raised during conversion
    fn take_diagnostics(&mut self) -> Diagnostics;
}

/// Create the text conversion engine for a configuration
pub fn make_i18n(config: &Config) -> Box<dyn I18n> {
    match config.backend() {
        Backend::Xetex => Box::new(UnicodeI18n::new(config)),
        _ => Box::new(ClassicI18n::new(config)),
    }
}

// Babel option names for ODF language codes. Country-qualified entries
// take precedence over the bare language code.
static BABEL_LANGUAGES: phf::Map<&'static str, &'static str> = phf_map! {
    "en" => "english",
    "en-US" => "american",
    "en-GB" => "british",
    "en-CA" => "canadian",
    "en-AU" => "australian",
    "en-NZ" => "newzealand",
    "de" => "ngerman",
    "de-AT" => "naustrian",
    "fr" => "french",
    "fr-CA" => "canadien",
    "it" => "italian",
    "es" => "spanish",
    "pt" => "portuguese",
    "pt-BR" => "brazilian",
    "nl" => "dutch",
    "da" => "danish",
    "sv" => "swedish",
    "fi" => "finnish",
    "is" => "icelandic",
    "no" => "norsk",
    "nb" => "norsk",
    "nn" => "nynorsk",
    "ru" => "russian",
    "uk" => "ukrainian",
    "bg" => "bulgarian",
    "cs" => "czech",
    "sk" => "slovak",
    "pl" => "polish",
    "sl" => "slovene",
    "hr" => "croatian",
    "sr" => "serbian",
    "hu" => "magyar",
    "ro" => "romanian",
    "el" => "greek",
    "tr" => "turkish",
    "ca" => "catalan",
    "et" => "estonian",
    "lt" => "lithuanian",
    "lv" => "latvian",
    "ga" => "irish",
    "cy" => "welsh",
    "eu" => "basque",
    "gl" => "galician",
    "sq" => "albanian",
    "af" => "afrikaans",
    "la" => "latin",
    "eo" => "esperanto",
};

// Polyglossia language names. Polyglossia takes plain language names and
// handles variants itself, so no country-qualified entries are needed
// beyond Brazilian Portuguese.
static POLYGLOSSIA_LANGUAGES: phf::Map<&'static str, &'static str> = phf_map! {
    "en" => "english",
    "de" => "german",
    "fr" => "french",
    "it" => "italian",
    "es" => "spanish",
    "pt" => "portuguese",
    "nl" => "dutch",
    "da" => "danish",
    "sv" => "swedish",
    "fi" => "finnish",
    "is" => "icelandic",
    "no" => "norwegian",
    "nb" => "norwegian",
    "nn" => "norwegian",
    "ru" => "russian",
    "uk" => "ukrainian",
    "bg" => "bulgarian",
    "cs" => "czech",
    "sk" => "slovak",
    "pl" => "polish",
    "sl" => "slovenian",
    "hr" => "croatian",
    "sr" => "serbian",
    "hu" => "hungarian",
    "ro" => "romanian",
    "el" => "greek",
    "tr" => "turkish",
    "ca" => "catalan",
    "et" => "estonian",
    "lt" => "lithuanian",
    "lv" => "latvian",
    "ga" => "irish",
    "cy" => "welsh",
    "eu" => "basque",
    "gl" => "galician",
    "sq" => "albanian",
    "af" => "afrikaans",
    "ar" => "arabic",
    "he" => "hebrew",
    "hi" => "hindi",
    "th" => "thai",
    "la" => "latin",
    "eo" => "esperanto",
};

/// Babel option for an ODF language/country pair
pub(crate) fn babel_language(lang: &str, country: &str) -> Option<&'static str> {
    let lang = lang.to_ascii_lowercase();
    if !country.is_empty() {
        let qualified = format!("{}-{}", lang, country.to_ascii_uppercase());
        if let Some(&name) = BABEL_LANGUAGES.get(qualified.as_str()) {
            return Some(name);
        }
    }
    BABEL_LANGUAGES.get(lang.as_str()).copied()
}

/// Polyglossia language name for an ODF language code
pub(crate) fn polyglossia_language(lang: &str) -> Option<&'static str> {
    POLYGLOSSIA_LANGUAGES.get(lang.to_ascii_lowercase().as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_babel_country_precedence() {
        assert_eq!(babel_language("en", "US"), Some("american"));
        assert_eq!(babel_language("en", "GB"), Some("british"));
        assert_eq!(babel_language("en", "ZA"), Some("english"));
        assert_eq!(babel_language("en", ""), Some("english"));
        assert_eq!(babel_language("de", "AT"), Some("naustrian"));
        assert_eq!(babel_language("de", "DE"), Some("ngerman"));
    }

    #[test]
    fn test_babel_unknown_language() {
        assert_eq!(babel_language("vo", ""), None);
        assert_eq!(babel_language("", ""), None);
    }

    #[test]
    fn test_polyglossia_lookup() {
        assert_eq!(polyglossia_language("de"), Some("german"));
        assert_eq!(polyglossia_language("AR"), Some("arabic"));
        assert_eq!(polyglossia_language("vo"), None);
    }

    #[test]
    fn test_factory_picks_engine_by_backend() {
        let mut config = Config::new();
        let mut i18n = make_i18n(&config);
        let ctx = Context::root("en", "US");
        assert_eq!(i18n.convert("é", &ctx), "\\'e");

        config.set("backend", "xetex");
        let mut i18n = make_i18n(&config);
        assert_eq!(i18n.convert("é", &ctx), "é");
    }
}
