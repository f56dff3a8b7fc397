//! Unicode LaTeX text conversion.
//!
//! The XeTeX engine keeps text in UTF-8: only TeX's own special
//! characters are escaped, non-ASCII text passes through literally, and
//! language support is declared through fontspec and polyglossia.

use super::table::{table_set_for, CharClass, FontEncs, TableKey, TableSet, UnicodeTable};
use super::trie::ReplacementTrie;
use super::{polyglossia_language, I18n};
use crate::common::Diagnostics;
use crate::config::{Config, InputEncoding};
use crate::latex::context::Context;
use crate::latex::portion::LatexDocumentPortion;
use indexmap::IndexSet;
use std::sync::Arc;

/// Text conversion engine for the XeTeX backend
pub struct UnicodeI18n {
    tables: Arc<TableSet>,
    stack: Vec<Arc<UnicodeTable>>,
    trie: ReplacementTrie,
    use_amsmath: bool,
    use_amssymb: bool,
    use_eurosym: bool,
    use_wasysym: bool,
    default_language: Option<String>,
    languages: IndexSet<String>,
    used_cyrillic: bool,
    used_greek: bool,
    used_polytonic: bool,
    diagnostics: Diagnostics,
}

impl UnicodeI18n {
    /// Create an engine for one conversion under the given configuration
    pub fn new(config: &Config) -> Self {
        let key = TableKey {
            encoding: InputEncoding::Utf8,
            multilingual: true,
            use_amsmath: config.use_amsmath(),
            use_amssymb: config.use_amssymb(),
            use_eurosym: config.use_eurosym(),
            use_wasysym: config.use_wasysym(),
        };
        let tables = table_set_for(&key);

        let mut trie = ReplacementTrie::new();
        for (input, code, fontencs) in config.string_replace_entries() {
            trie.put(input, code, FontEncs::parse(fontencs));
        }

        Self {
            tables,
            stack: Vec::new(),
            trie,
            use_amsmath: config.use_amsmath(),
            use_amssymb: config.use_amssymb(),
            use_eurosym: config.use_eurosym(),
            use_wasysym: config.use_wasysym(),
            default_language: None,
            languages: IndexSet::new(),
            used_cyrillic: false,
            used_greek: false,
            used_polytonic: false,
            diagnostics: Diagnostics::new(),
        }
    }

    fn table(&self) -> Arc<UnicodeTable> {
        match self.stack.last() {
            Some(table) => Arc::clone(table),
            None => Arc::clone(self.tables.root()),
        }
    }

    fn note_script(&mut self, c: char) {
        match c as u32 {
            0x0370..=0x03FF => self.used_greek = true,
            0x0400..=0x04FF => self.used_cyrillic = true,
            0x1F00..=0x1FFF => {
                self.used_greek = true;
                self.used_polytonic = true;
            },
            _ => {},
        }
    }

    fn resolve_language(&mut self, lang: &str) -> Option<String> {
        if lang.is_empty() {
            return None;
        }
        match polyglossia_language(lang) {
            Some(name) => Some(name.to_string()),
            None => {
                self.diagnostics.info(format!(
                    "No polyglossia name known for language '{lang}', passing it through"
                ));
                Some(lang.to_string())
            },
        }
    }
}

impl I18n for UnicodeI18n {
    fn convert(&mut self, text: &str, ctx: &Context) -> String {
        let table = self.table();
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len() + text.len() / 8);
        let mut math_span = false;
        let mut prev_protect: Option<char> = None;

        let mut i = 0;
        while i < chars.len() {
            if let Some(found) = self.trie.get(&chars, i, chars.len()) {
                let output = found.output.to_string();
                let len = found.len;
                if math_span {
                    out.push('$');
                    math_span = false;
                }
                out.push_str(&output);
                prev_protect = None;
                i += len;
                continue;
            }

            let c = chars[i];
            self.note_script(c);

            if ctx.math_mode {
                if let Some(math) = table.math_char(c) {
                    out.push_str(math);
                } else if c.is_ascii() {
                    if let Some(text_repr) = table.text_char(c) {
                        out.push_str(text_repr);
                    }
                } else {
                    out.push(c);
                }
                i += 1;
                continue;
            }

            // Mapped characters: ASCII always, everything while a special
            // font table is active, plus a few layout characters
            let mapped = c.is_ascii() || !self.stack.is_empty();
            if mapped {
                if table.char_type(c) == CharClass::Ignored {
                    i += 1;
                    continue;
                }
                if !table.has_text_char(c) && table.has_math_char(c) {
                    if !math_span {
                        out.push('$');
                        math_span = true;
                    }
                    if let Some(math) = table.math_char(c) {
                        out.push_str(math);
                    }
                    prev_protect = None;
                    i += 1;
                    continue;
                }
                if math_span {
                    out.push('$');
                    math_span = false;
                }
                if let Some(text_repr) = table.text_char(c) {
                    let protect = table.protect_char(c);
                    if protect.is_some() && (i == 0 || protect == prev_protect) {
                        out.push_str("{}");
                    }
                    out.push_str(text_repr);
                    prev_protect = protect;
                } else {
                    out.push(c);
                    prev_protect = None;
                }
                i += 1;
                continue;
            }

            if math_span {
                out.push('$');
                math_span = false;
            }
            match c {
                '\u{00A0}' => out.push('~'),
                '\u{00AD}' => out.push_str("\\-"),
                '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' => {},
                _ => out.push(c),
            }
            prev_protect = None;
            i += 1;
        }

        if math_span {
            out.push('$');
        }
        out
    }

    fn push_special_table(&mut self, name: &str) -> bool {
        match self.tables.special(name) {
            Some(table) => {
                self.stack.push(Arc::clone(table));
                true
            },
            None => false,
        }
    }

    fn pop_special_table(&mut self) {
        self.stack.pop();
    }

    fn set_document_language(&mut self, lang: &str, _country: &str) {
        if let Some(name) = self.resolve_language(lang) {
            self.default_language = Some(name);
        }
    }

    fn language_command(&mut self, lang: &str, _country: &str) -> Option<String> {
        let name = self.resolve_language(lang)?;
        self.languages.insert(name.clone());
        Some(name)
    }

    fn append_declarations(&mut self, pack: &mut LatexDocumentPortion) {
        pack.append("\\usepackage{fontspec}").nl();
        pack.append("\\usepackage{polyglossia}").nl();
        if let Some(default) = &self.default_language {
            pack.append(&format!("\\setdefaultlanguage{{{default}}}"));
            pack.nl();
        }
        for language in &self.languages {
            if Some(language) != self.default_language.as_ref() {
                pack.append(&format!("\\setotherlanguage{{{language}}}"));
                pack.nl();
            }
        }
        for (used, package) in [
            (self.use_amsmath, "amsmath"),
            (self.use_amssymb, "amssymb"),
            (self.use_eurosym, "eurosym"),
            (self.use_wasysym, "wasysym"),
        ] {
            if used {
                pack.append(&format!("\\usepackage{{{package}}}"));
                pack.nl();
            }
        }
    }

    fn languages(&self) -> Vec<String> {
        self.languages.iter().cloned().collect()
    }

    fn uses_cyrillic(&self) -> bool {
        self.used_cyrillic
    }

    fn uses_greek(&self) -> bool {
        self.used_greek
    }

    fn uses_polytonic(&self) -> bool {
        self.used_polytonic
    }

    fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> UnicodeI18n {
        let mut config = Config::new();
        config.set("backend", "xetex");
        UnicodeI18n::new(&config)
    }

    fn text_ctx() -> Context {
        Context::root("en", "US")
    }

    #[test]
    fn test_non_ascii_passes_through() {
        let mut i18n = engine();
        assert_eq!(i18n.convert("Привет, κόσμος", &text_ctx()), "Привет, κόσμος");
        assert!(i18n.uses_cyrillic());
        assert!(i18n.uses_greek());
    }

    #[test]
    fn test_specials_still_escaped() {
        let mut i18n = engine();
        assert_eq!(i18n.convert("100% #1 {x}", &text_ctx()), "100\\% \\#1 \\{x\\}");
    }

    #[test]
    fn test_ligature_protection_still_applies() {
        let mut i18n = engine();
        assert_eq!(i18n.convert("--", &text_ctx()), "{}-{}-");
    }

    #[test]
    fn test_nbsp_and_soft_hyphen() {
        let mut i18n = engine();
        assert_eq!(
            i18n.convert("a\u{00A0}b\u{00AD}c", &text_ctx()),
            "a~b\\-c"
        );
    }

    #[test]
    fn test_math_mode_still_uses_macros() {
        let mut ctx = text_ctx();
        ctx.math_mode = true;
        let mut i18n = engine();
        assert_eq!(i18n.convert("α≤β", &ctx), "\\alpha \\leq \\beta ");
    }

    #[test]
    fn test_symbol_font_table() {
        let mut i18n = engine();
        assert!(i18n.push_special_table("Symbol"));
        assert_eq!(i18n.convert("a", &text_ctx()), "$\\alpha $");
        i18n.pop_special_table();
    }

    #[test]
    fn test_declarations() {
        let mut i18n = engine();
        i18n.set_document_language("ru", "RU");
        i18n.language_command("en", "US");
        let mut pack = LatexDocumentPortion::new();
        i18n.append_declarations(&mut pack);
        let written = pack.write(None);
        assert!(written.contains("\\usepackage{fontspec}"));
        assert!(written.contains("\\usepackage{polyglossia}"));
        assert!(written.contains("\\setdefaultlanguage{russian}"));
        assert!(written.contains("\\setotherlanguage{english}"));
        assert!(!written.contains("inputenc"));
        assert!(!written.contains("fontenc"));
    }
}
