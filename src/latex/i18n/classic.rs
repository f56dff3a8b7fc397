//! 8-bit LaTeX text conversion.
//!
//! The classic engine targets pdfTeX and friends: characters outside the
//! input encoding become macros, Cyrillic and Greek text is wrapped in
//! font encoding zones, and language support is declared through babel.

use super::table::{table_set_for, CharClass, FontEncs, TableKey, TableSet, UnicodeTable};
use super::trie::ReplacementTrie;
use super::{babel_language, I18n};
use crate::common::Diagnostics;
use crate::config::{Config, InputEncoding};
use crate::latex::context::Context;
use crate::latex::portion::LatexDocumentPortion;
use indexmap::IndexSet;
use std::sync::Arc;

/// Zone and span state local to one run
#[derive(Debug)]
struct RunState {
    zone: FontEncs,
    zone_open: bool,
    math_span: bool,
    prev_protect: Option<char>,
}

/// Text conversion engine for the 8-bit backends
pub struct ClassicI18n {
    tables: Arc<TableSet>,
    stack: Vec<Arc<UnicodeTable>>,
    trie: ReplacementTrie,
    encoding: InputEncoding,
    base_zone: FontEncs,
    greek_math: bool,
    multilingual: bool,
    use_amsmath: bool,
    use_amssymb: bool,
    use_eurosym: bool,
    use_wasysym: bool,
    default_language: Option<String>,
    languages: IndexSet<String>,
    used_zones: FontEncs,
    used_textcomp: bool,
    used_cyrillic: bool,
    used_greek: bool,
    used_polytonic: bool,
    diagnostics: Diagnostics,
}

impl ClassicI18n {
    /// Create an engine for one conversion under the given configuration
    pub fn new(config: &Config) -> Self {
        let encoding = config.inputencoding();
        let key = TableKey {
            encoding,
            multilingual: config.multilingual(),
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

        let base_zone = match encoding {
            InputEncoding::Cp1251 | InputEncoding::Koi8R => FontEncs::T2A,
            _ => FontEncs::T1,
        };

        Self {
            tables,
            stack: Vec::new(),
            trie,
            encoding,
            base_zone,
            greek_math: config.greek_math(),
            multilingual: config.multilingual(),
            use_amsmath: config.use_amsmath(),
            use_amssymb: config.use_amssymb(),
            use_eurosym: config.use_eurosym(),
            use_wasysym: config.use_wasysym(),
            default_language: None,
            languages: IndexSet::new(),
            used_zones: FontEncs::empty(),
            used_textcomp: false,
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

    /// Make the current zone compatible with `fontencs`, opening or
    /// closing wrappers as needed
    fn ensure_zone(&mut self, out: &mut String, state: &mut RunState, fontencs: FontEncs) {
        let zones = fontencs & FontEncs::ZONES;
        if zones.is_empty() {
            if fontencs.contains(FontEncs::TS1) {
                self.used_textcomp = true;
            }
            return;
        }
        if zones.contains(state.zone) {
            self.used_zones |= state.zone;
            return;
        }
        if state.zone_open {
            out.push('}');
            state.zone_open = false;
        }
        let zone = if zones.contains(self.base_zone) {
            self.base_zone
        } else {
            pick_zone(zones)
        };
        state.zone = zone;
        if zone != self.base_zone {
            out.push_str("{\\fontencoding{");
            out.push_str(zone.zone_name().unwrap_or("T1"));
            out.push_str("}\\selectfont ");
            state.zone_open = true;
        }
        self.used_zones |= zone;
    }

    fn placeholder(&mut self, out: &mut String, c: char) {
        out.push_str(&format!("[U+{:04X}]", c as u32));
        self.diagnostics.warning(format!(
            "No LaTeX representation for character U+{:04X}, emitted a placeholder",
            c as u32
        ));
    }
}

fn pick_zone(zones: FontEncs) -> FontEncs {
    for zone in [FontEncs::T2A, FontEncs::LGR, FontEncs::T1, FontEncs::OT1] {
        if zones.contains(zone) {
            return zone;
        }
    }
    FontEncs::T1
}

fn close_math_span(out: &mut String, state: &mut RunState) {
    if state.math_span {
        out.push('$');
        state.math_span = false;
    }
}

impl I18n for ClassicI18n {
    fn convert(&mut self, text: &str, ctx: &Context) -> String {
        let table = self.table();
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len() + text.len() / 4);
        let mut state = RunState {
            zone: self.base_zone,
            zone_open: false,
            math_span: false,
            prev_protect: None,
        };

        let mut i = 0;
        while i < chars.len() {
            if let Some(found) = self.trie.get(&chars, i, chars.len()) {
                let output = found.output.to_string();
                let fontencs = found.fontencs;
                let len = found.len;
                close_math_span(&mut out, &mut state);
                self.ensure_zone(&mut out, &mut state, fontencs);
                out.push_str(&output);
                state.prev_protect = None;
                i += len;
                continue;
            }

            let c = chars[i];
            self.note_script(c);
            match table.char_type(c) {
                CharClass::Ignored => {
                    i += 1;
                    continue;
                },
                CharClass::Combining => {
                    self.diagnostics.warning(format!(
                        "Dropped combining mark U+{:04X} with no base character",
                        c as u32
                    ));
                    i += 1;
                    continue;
                },
                _ => {},
            }

            if ctx.math_mode {
                if let Some(math) = table.math_char(c) {
                    out.push_str(math);
                } else if let Some(text_repr) = table.text_char(c) {
                    out.push_str("\\text{");
                    out.push_str(text_repr);
                    out.push('}');
                } else {
                    self.placeholder(&mut out, c);
                }
                i += 1;
                continue;
            }

            let fontencs = table.fontencs(c);
            let zones = fontencs & FontEncs::ZONES;
            let greek_span =
                self.greek_math && zones == FontEncs::LGR && table.has_math_char(c);
            let math_only = !table.has_text_char(c) && table.has_math_char(c);
            if greek_span || math_only {
                if !state.math_span {
                    out.push('$');
                    state.math_span = true;
                }
                if let Some(math) = table.math_char(c) {
                    out.push_str(math);
                }
                state.prev_protect = None;
                i += 1;
                continue;
            }
            close_math_span(&mut out, &mut state);

            let Some(text_repr) = table.text_char(c) else {
                self.placeholder(&mut out, c);
                state.prev_protect = None;
                i += 1;
                continue;
            };

            // Fuse a following combining mark onto this base character
            let mut repr = text_repr.to_string();
            let mut effective = fontencs;
            let mut consumed = 1;
            if let Some(&next) = chars.get(i + 1) {
                if table.char_type(next) == CharClass::Combining {
                    consumed = 2;
                    let fused = match table.text_char(next) {
                        Some(prefix) => {
                            let overlap = effective & table.fontencs(next);
                            if overlap.is_empty() {
                                None
                            } else {
                                Some((format!("{prefix}{{{repr}}}"), overlap))
                            }
                        },
                        None => None,
                    };
                    match fused {
                        Some((fused_repr, overlap)) => {
                            repr = fused_repr;
                            effective = overlap;
                        },
                        None => self.diagnostics.warning(format!(
                            "Dropped combining mark U+{:04X}, no valid encoding with its base",
                            next as u32
                        )),
                    }
                }
            }

            self.ensure_zone(&mut out, &mut state, effective);

            let protect = table.protect_char(c);
            if protect.is_some() && (i == 0 || protect == state.prev_protect) {
                out.push_str("{}");
            }
            out.push_str(&repr);
            state.prev_protect = protect;
            i += consumed;
        }

        close_math_span(&mut out, &mut state);
        if state.zone_open {
            out.push('}');
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

    fn set_document_language(&mut self, lang: &str, country: &str) {
        if let Some(name) = self.resolve_language(lang, country) {
            self.default_language = Some(name);
        }
    }

    fn language_command(&mut self, lang: &str, country: &str) -> Option<String> {
        if !self.multilingual {
            return None;
        }
        let name = self.resolve_language(lang, country)?;
        self.languages.insert(name.clone());
        Some(name)
    }

    fn append_declarations(&mut self, pack: &mut LatexDocumentPortion) {
        if self.encoding != InputEncoding::Ascii {
            pack.append(&format!(
                "\\usepackage[{}]{{inputenc}}",
                self.encoding.latex_name()
            ));
            pack.nl();
        }

        if !self.used_zones.is_empty() {
            let mut options: Vec<&str> = Vec::new();
            for zone in [FontEncs::T2A, FontEncs::LGR, FontEncs::OT1, FontEncs::T1] {
                if zone != self.base_zone && self.used_zones.contains(zone) {
                    if let Some(name) = zone.zone_name() {
                        options.push(name);
                    }
                }
            }
            if let Some(base) = self.base_zone.zone_name() {
                options.push(base);
            }
            pack.append(&format!("\\usepackage[{}]{{fontenc}}", options.join(",")));
            pack.nl();
        }

        if self.multilingual {
            let mut options: Vec<String> = Vec::new();
            for language in &self.languages {
                if Some(language) != self.default_language.as_ref() {
                    options.push(self.babel_option(language));
                }
            }
            if let Some(default) = &self.default_language {
                options.push(self.babel_option(default));
            }
            if !options.is_empty() {
                pack.append(&format!("\\usepackage[{}]{{babel}}", options.join(",")));
                pack.nl();
            }
        }

        for (used, package) in [
            (self.use_amsmath, "amsmath"),
            (self.use_amssymb, "amssymb"),
            (self.use_eurosym, "eurosym"),
            (self.use_wasysym, "wasysym"),
            (self.used_textcomp, "textcomp"),
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

impl ClassicI18n {
    fn resolve_language(&mut self, lang: &str, country: &str) -> Option<String> {
        if lang.is_empty() {
            return None;
        }
        match babel_language(lang, country) {
            Some(name) => Some(name.to_string()),
            None => {
                self.diagnostics.info(format!(
                    "No babel name known for language '{lang}', passing it through"
                ));
                Some(lang.to_string())
            },
        }
    }

    /// The babel option for a language, upgrading Greek to polytonic
    /// when polytonic text was seen
    fn babel_option(&self, language: &str) -> String {
        if language == "greek" && self.used_polytonic {
            "polutonikogreek".to_string()
        } else {
            language.to_string()
        }
    }
}
