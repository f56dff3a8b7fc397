//! Unicode symbol tables.
//!
//! A [`UnicodeTable`] answers, per character, how to write it in LaTeX:
//! a text representation, a math representation, the font encodings the
//! text representation is valid in, and a character class. Tables are
//! layered copy-on-write so the legacy-font tables (Symbol, Dingbats)
//! can shadow byte ranges of the root table without copying it.

use bitflags::bitflags;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::InputEncoding;

/// Classification of a character for the conversion loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharClass {
    /// Ordinary character with at least one representation
    Normal,
    /// Combining mark, fuses with the preceding base character
    Combining,
    /// Dropped without a trace (zero-width marks and the like)
    Ignored,
    /// Nothing known, converted to a placeholder
    #[default]
    Unknown,
}

bitflags! {
    /// Font encodings a text representation is valid in
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FontEncs: u8 {
        /// Classic TeX text encoding
        const OT1 = 0x01;
        /// Cork encoding, the western default
        const T1 = 0x02;
        /// Cyrillic encoding
        const T2A = 0x04;
        /// Greek encoding
        const LGR = 0x08;
        /// Text companion symbols (textcomp)
        const TS1 = 0x10;
    }
}

impl FontEncs {
    /// Valid in every encoding
    pub const ANY: Self = Self::all();

    /// The encodings that participate in zone switching. TS1 symbols
    /// work through the textcomp package without a zone.
    pub const ZONES: Self = Self::OT1.union(Self::T1).union(Self::T2A).union(Self::LGR);

    /// The encodings that render Latin letters as Latin letters. LGR
    /// maps the Latin positions to Greek glyphs, so letters must not
    /// claim it.
    pub const LATIN: Self = Self::OT1.union(Self::T1).union(Self::T2A);

    /// Parse a space separated encoding list as used in configuration
    /// files. `any` or an empty string mean all encodings; unknown
    /// tokens are skipped.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("any") {
            return Self::ANY;
        }
        let mut encs = Self::empty();
        for token in s.split_ascii_whitespace() {
            match token.to_ascii_lowercase().as_str() {
                "ot1" => encs |= Self::OT1,
                "t1" => encs |= Self::T1,
                "t2a" => encs |= Self::T2A,
                "lgr" => encs |= Self::LGR,
                "ts1" => encs |= Self::TS1,
                _ => {},
            }
        }
        if encs.is_empty() { Self::ANY } else { encs }
    }

    /// The fontenc option name for a zone encoding
    pub fn zone_name(&self) -> Option<&'static str> {
        match *self {
            Self::OT1 => Some("OT1"),
            Self::T1 => Some("T1"),
            Self::T2A => Some("T2A"),
            Self::LGR => Some("LGR"),
            _ => None,
        }
    }
}

impl Default for FontEncs {
    fn default() -> Self {
        Self::empty()
    }
}

/// Everything the table knows about one character
#[derive(Debug, Clone, Default)]
pub struct UnicodeCharacter {
    pub class: CharClass,
    /// Math mode representation
    pub math: Option<Box<str>>,
    /// Text mode representation
    pub text: Option<Box<str>>,
    /// Encodings the text representation is valid in
    pub fontencs: FontEncs,
    /// Ligature protection token; equal neighbouring tokens get `{}`
    /// inserted between them
    pub protect: Option<char>,
}

const ROW_LEN: usize = 256;
const ROW_COUNT: usize = 256;

#[derive(Debug, Clone)]
struct Row([UnicodeCharacter; ROW_LEN]);

impl Default for Row {
    fn default() -> Self {
        Self(std::array::from_fn(|_| UnicodeCharacter::default()))
    }
}

/// Character lookup table for the Basic Multilingual Plane.
///
/// Two level indexing by high and low byte of the code point; code
/// points above U+FFFF always answer [`CharClass::Unknown`]. Cloning a
/// table is cheap: rows are shared and only copied when written, so a
/// clone can be modified freely without the original seeing it.
#[derive(Debug, Clone)]
pub struct UnicodeTable {
    rows: Vec<Option<Arc<Row>>>,
}

impl Default for UnicodeTable {
    fn default() -> Self {
        Self {
            rows: vec![None; ROW_COUNT],
        }
    }
}

impl UnicodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, c: char) -> Option<&UnicodeCharacter> {
        let cp = c as u32;
        if cp > 0xFFFF {
            return None;
        }
        let row = self.rows[(cp >> 8) as usize].as_ref()?;
        Some(&row.0[(cp & 0xFF) as usize])
    }

    /// Write an entry, copying the affected row if it is shared
    pub fn set(&mut self, c: char, character: UnicodeCharacter) {
        let cp = c as u32;
        if cp > 0xFFFF {
            return;
        }
        let slot = &mut self.rows[(cp >> 8) as usize];
        let row = Arc::make_mut(slot.get_or_insert_with(Default::default));
        row.0[(cp & 0xFF) as usize] = character;
    }

    /// The class of a character
    pub fn char_type(&self, c: char) -> CharClass {
        self.entry(c).map(|e| e.class).unwrap_or_default()
    }

    /// Whether a text representation exists
    pub fn has_text_char(&self, c: char) -> bool {
        self.entry(c).is_some_and(|e| e.text.is_some())
    }

    /// The text representation
    pub fn text_char(&self, c: char) -> Option<&str> {
        self.entry(c).and_then(|e| e.text.as_deref())
    }

    /// Whether a math representation exists
    pub fn has_math_char(&self, c: char) -> bool {
        self.entry(c).is_some_and(|e| e.math.is_some())
    }

    /// The math representation
    pub fn math_char(&self, c: char) -> Option<&str> {
        self.entry(c).and_then(|e| e.math.as_deref())
    }

    /// The encodings the text representation is valid in; empty for
    /// unknown characters
    pub fn fontencs(&self, c: char) -> FontEncs {
        self.entry(c).map(|e| e.fontencs).unwrap_or_default()
    }

    /// The ligature protection token, if the character carries one
    pub fn protect_char(&self, c: char) -> Option<char> {
        self.entry(c).and_then(|e| e.protect)
    }
}

/// Incremental construction of a [`UnicodeTable`]
#[derive(Debug, Default)]
pub struct TableBuilder {
    table: UnicodeTable,
}

impl TableBuilder {
    /// Start from an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a copy-on-write clone of an existing table
    pub fn layered_on(table: &UnicodeTable) -> Self {
        Self {
            table: table.clone(),
        }
    }

    /// Register printable ASCII as itself. Letters are limited to the
    /// Latin-rendering encodings; entries set later override.
    pub fn ascii_identity(&mut self) -> &mut Self {
        for cp in 0x20u32..0x7F {
            let c = char::from_u32(cp).unwrap_or(' ');
            let fontencs = if c.is_ascii_alphabetic() {
                FontEncs::LATIN
            } else {
                FontEncs::ANY
            };
            self.table.set(
                c,
                UnicodeCharacter {
                    class: CharClass::Normal,
                    math: None,
                    text: Some(c.to_string().into_boxed_str()),
                    fontencs,
                    protect: None,
                },
            );
        }
        self
    }

    /// Apply a batch of catalog definitions
    pub fn apply(&mut self, defs: &[super::catalog::SymbolDef]) -> &mut Self {
        for def in defs {
            self.table.set(def.cp, def.to_character());
        }
        self
    }

    /// Let a set of characters through as themselves, keeping any known
    /// class, math form, and encodings
    pub fn passthrough(&mut self, chars: impl Iterator<Item = char>) -> &mut Self {
        for c in chars {
            let mut entry = self
                .table
                .entry(c)
                .cloned()
                .unwrap_or_default();
            if entry.class == CharClass::Unknown {
                entry.class = CharClass::Normal;
            }
            if entry.fontencs.is_empty() {
                entry.fontencs = FontEncs::ANY;
            }
            entry.text = Some(c.to_string().into_boxed_str());
            self.table.set(c, entry);
        }
        self
    }

    /// Clear a code point range back to unknown
    pub fn clear_range(&mut self, range: std::ops::RangeInclusive<u32>) -> &mut Self {
        for cp in range {
            if let Some(c) = char::from_u32(cp) {
                self.table.set(c, UnicodeCharacter::default());
            }
        }
        self
    }

    pub fn build(self) -> UnicodeTable {
        self.table
    }
}

/// Everything that decides table contents.
///
/// Used as the memoization key: two conversions with equal keys share
/// the same built tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableKey {
    pub encoding: InputEncoding,
    pub multilingual: bool,
    pub use_amsmath: bool,
    pub use_amssymb: bool,
    pub use_eurosym: bool,
    pub use_wasysym: bool,
}

/// The root table plus the legacy-font special tables derived from it
#[derive(Debug)]
pub struct TableSet {
    root: Arc<UnicodeTable>,
    specials: HashMap<String, Arc<UnicodeTable>>,
}

impl TableSet {
    pub(crate) fn new(root: UnicodeTable, specials: HashMap<String, Arc<UnicodeTable>>) -> Self {
        Self {
            root: Arc::new(root),
            specials,
        }
    }

    /// The document wide table
    pub fn root(&self) -> &Arc<UnicodeTable> {
        &self.root
    }

    /// A legacy-font table by font name, case insensitive
    pub fn special(&self, name: &str) -> Option<&Arc<UnicodeTable>> {
        self.specials.get(&name.to_ascii_lowercase())
    }
}

static TABLE_CACHE: Lazy<Mutex<HashMap<TableKey, Arc<TableSet>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// The table set for a configuration, built once per distinct key for
/// the lifetime of the process
pub fn table_set_for(key: &TableKey) -> Arc<TableSet> {
    let mut cache = TABLE_CACHE.lock();
    if let Some(set) = cache.get(key) {
        return Arc::clone(set);
    }
    let set = Arc::new(super::catalog::build_table_set(key));
    cache.insert(key.clone(), Arc::clone(&set));
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_by_default() {
        let table = UnicodeTable::new();
        assert_eq!(table.char_type('x'), CharClass::Unknown);
        assert!(!table.has_text_char('x'));
        assert!(table.text_char('x').is_none());
        assert_eq!(table.fontencs('x'), FontEncs::empty());
    }

    #[test]
    fn test_astral_code_points_are_unknown() {
        let mut table = UnicodeTable::new();
        table.set('\u{1D49C}', UnicodeCharacter {
            class: CharClass::Normal,
            text: Some("A".into()),
            fontencs: FontEncs::ANY,
            ..Default::default()
        });
        assert_eq!(table.char_type('\u{1D49C}'), CharClass::Unknown);
        assert!(!table.has_text_char('\u{1D49C}'));
    }

    #[test]
    fn test_clone_is_copy_on_write() {
        let mut root = UnicodeTable::new();
        root.set('a', UnicodeCharacter {
            class: CharClass::Normal,
            text: Some("a".into()),
            fontencs: FontEncs::ANY,
            ..Default::default()
        });

        let mut child = root.clone();
        child.set('a', UnicodeCharacter {
            class: CharClass::Normal,
            text: Some("\\alpha ".into()),
            fontencs: FontEncs::ANY,
            ..Default::default()
        });

        assert_eq!(root.text_char('a'), Some("a"));
        assert_eq!(child.text_char('a'), Some("\\alpha "));
    }

    #[test]
    fn test_fontencs_parse() {
        assert_eq!(FontEncs::parse("any"), FontEncs::ANY);
        assert_eq!(FontEncs::parse(""), FontEncs::ANY);
        assert_eq!(FontEncs::parse("t1 ot1"), FontEncs::T1 | FontEncs::OT1);
        assert_eq!(FontEncs::parse("T2A"), FontEncs::T2A);
        assert_eq!(FontEncs::parse("bogus"), FontEncs::ANY);
    }

    #[test]
    fn test_text_char_implies_fontencs() {
        let key = TableKey {
            encoding: InputEncoding::Ascii,
            multilingual: true,
            use_amsmath: true,
            use_amssymb: true,
            use_eurosym: true,
            use_wasysym: true,
        };
        let set = table_set_for(&key);
        let table = set.root();
        for cp in 0x20u32..0x2500 {
            if let Some(c) = char::from_u32(cp) {
                if table.has_text_char(c) {
                    assert!(!table.text_char(c).unwrap().is_empty(), "U+{cp:04X}");
                    assert!(!table.fontencs(c).is_empty(), "U+{cp:04X}");
                }
            }
        }
    }

    #[test]
    fn test_table_set_memoization() {
        let key = TableKey {
            encoding: InputEncoding::Latin1,
            multilingual: false,
            use_amsmath: false,
            use_amssymb: false,
            use_eurosym: false,
            use_wasysym: false,
        };
        let a = table_set_for(&key);
        let b = table_set_for(&key);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
