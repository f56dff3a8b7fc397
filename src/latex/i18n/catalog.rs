//! Declarative symbol catalog.
//!
//! Everything the conversion knows about individual characters lives in
//! the tables below: LaTeX representations, valid font encodings,
//! ligature protection, combining behavior. [`build_table_set`]
//! assembles a [`TableSet`] from them for one configuration.

use super::table::{
    CharClass, FontEncs, TableBuilder, TableKey, TableSet, UnicodeCharacter, UnicodeTable,
};
use crate::config::InputEncoding;
use std::collections::HashMap;
use std::sync::Arc;

/// One catalog entry
#[derive(Debug, Clone, Copy)]
pub struct SymbolDef {
    pub cp: char,
    pub class: CharClass,
    pub math: Option<&'static str>,
    pub text: Option<&'static str>,
    pub fontencs: FontEncs,
    pub protect: Option<char>,
}

impl SymbolDef {
    pub(crate) fn to_character(&self) -> UnicodeCharacter {
        UnicodeCharacter {
            class: self.class,
            math: self.math.map(Into::into),
            text: self.text.map(Into::into),
            fontencs: self.fontencs,
            protect: self.protect,
        }
    }
}

const ANY: FontEncs = FontEncs::ANY;
const OT1: FontEncs = FontEncs::OT1;
const T1: FontEncs = FontEncs::T1;
const T2A: FontEncs = FontEncs::T2A;
const LGR: FontEncs = FontEncs::LGR;
const TS1: FontEncs = FontEncs::TS1;
const WEST: FontEncs = FontEncs::OT1.union(FontEncs::T1);
const QUOT: FontEncs = FontEncs::T1.union(FontEncs::T2A);

/// Text representation only
const fn t(cp: char, text: &'static str, fontencs: FontEncs) -> SymbolDef {
    SymbolDef {
        cp,
        class: CharClass::Normal,
        math: None,
        text: Some(text),
        fontencs,
        protect: None,
    }
}

/// Text representation with a ligature protection token
const fn tp(cp: char, text: &'static str, fontencs: FontEncs, protect: char) -> SymbolDef {
    SymbolDef {
        cp,
        class: CharClass::Normal,
        math: None,
        text: Some(text),
        fontencs,
        protect: Some(protect),
    }
}

/// Math representation only
const fn m(cp: char, math: &'static str) -> SymbolDef {
    SymbolDef {
        cp,
        class: CharClass::Normal,
        math: Some(math),
        text: None,
        fontencs: FontEncs::empty(),
        protect: None,
    }
}

/// Both representations
const fn tm(cp: char, text: &'static str, fontencs: FontEncs, math: &'static str) -> SymbolDef {
    SymbolDef {
        cp,
        class: CharClass::Normal,
        math: Some(math),
        text: Some(text),
        fontencs,
        protect: None,
    }
}

/// Combining mark; `text` is the accent command prefix
const fn cmb(cp: char, text: &'static str, fontencs: FontEncs) -> SymbolDef {
    SymbolDef {
        cp,
        class: CharClass::Combining,
        math: None,
        text: Some(text),
        fontencs,
        protect: None,
    }
}

/// Dropped silently
const fn ign(cp: char) -> SymbolDef {
    SymbolDef {
        cp,
        class: CharClass::Ignored,
        math: None,
        text: None,
        fontencs: FontEncs::ANY,
        protect: None,
    }
}

/// TeX special characters and the ASCII ligature starters. These
/// override the identity mapping of printable ASCII.
pub const ASCII_SPECIALS: &[SymbolDef] = &[
    t('#', "\\#", ANY),
    tm('$', "\\$", ANY, "\\$"),
    t('%', "\\%", ANY),
    tm('&', "\\&", ANY, "\\&"),
    tm('\\', "\\textbackslash{}", ANY, "\\backslash "),
    t('^', "\\textasciicircum{}", ANY),
    tm('_', "\\_", ANY, "\\_"),
    tm('{', "\\{", ANY, "\\{"),
    tm('}', "\\}", ANY, "\\}"),
    t('~', "\\textasciitilde{}", ANY),
    tm('<', "\\textless{}", ANY, "<"),
    tm('>', "\\textgreater{}", ANY, ">"),
    tm('|', "\\textbar{}", ANY, "|"),
    t('"', "\\textquotedbl{}", ANY),
    tp('-', "-", ANY, '-'),
    tp('\'', "'", ANY, '\''),
    tp('`', "`", ANY, '`'),
];

/// Combining marks, fused onto the preceding base character
pub const COMBINING: &[SymbolDef] = &[
    cmb('\u{0300}', "\\`", ANY),
    cmb('\u{0301}', "\\'", ANY),
    cmb('\u{0302}', "\\^", ANY),
    cmb('\u{0303}', "\\~", ANY),
    cmb('\u{0304}', "\\=", ANY),
    cmb('\u{0306}', "\\u", ANY),
    cmb('\u{0307}', "\\.", ANY),
    cmb('\u{0308}', "\\\"", ANY),
    cmb('\u{030A}', "\\r", ANY),
    cmb('\u{030B}', "\\H", T1),
    cmb('\u{030C}', "\\v", ANY),
    cmb('\u{0327}', "\\c", ANY),
    cmb('\u{0328}', "\\k", T1),
];

/// Latin-1 supplement, U+00A0 to U+00FF
pub const LATIN1: &[SymbolDef] = &[
    t('\u{00A0}', "~", ANY),
    t('¡', "\\textexclamdown{}", WEST),
    t('¢', "\\textcent{}", TS1),
    t('£', "\\pounds{}", ANY),
    t('¤', "\\textcurrency{}", TS1),
    t('¥', "\\textyen{}", TS1),
    t('¦', "\\textbrokenbar{}", TS1),
    t('§', "\\S{}", ANY),
    t('¨', "\\textasciidieresis{}", TS1),
    t('©', "\\textcopyright{}", ANY),
    t('ª', "\\textordfeminine{}", ANY),
    t('«', "\\guillemotleft{}", QUOT),
    tm('¬', "\\textlnot{}", TS1, "\\neg "),
    t('\u{00AD}', "\\-", ANY),
    t('®', "\\textregistered{}", ANY),
    t('¯', "\\textasciimacron{}", TS1),
    tm('°', "\\textdegree{}", TS1, "^{\\circ}"),
    tm('±', "\\textpm{}", TS1, "\\pm "),
    tm('²', "\\texttwosuperior{}", TS1, "^{2}"),
    tm('³', "\\textthreesuperior{}", TS1, "^{3}"),
    t('´', "\\textasciiacute{}", TS1),
    tm('µ', "\\textmu{}", TS1, "\\mu "),
    t('¶', "\\P{}", ANY),
    tm('·', "\\textperiodcentered{}", ANY, "\\cdot "),
    t('¸', "\\c{}", ANY),
    tm('¹', "\\textonesuperior{}", TS1, "^{1}"),
    t('º', "\\textordmasculine{}", ANY),
    t('»', "\\guillemotright{}", QUOT),
    tm('¼', "\\textonequarter{}", TS1, "\\frac{1}{4}"),
    tm('½', "\\textonehalf{}", TS1, "\\frac{1}{2}"),
    tm('¾', "\\textthreequarters{}", TS1, "\\frac{3}{4}"),
    t('¿', "\\textquestiondown{}", WEST),
    t('À', "\\`A", WEST),
    t('Á', "\\'A", WEST),
    t('Â', "\\^A", WEST),
    t('Ã', "\\~A", WEST),
    t('Ä', "\\\"A", WEST),
    t('Å', "\\r{A}", WEST),
    t('Æ', "\\AE{}", WEST),
    t('Ç', "\\c{C}", WEST),
    t('È', "\\`E", WEST),
    t('É', "\\'E", WEST),
    t('Ê', "\\^E", WEST),
    t('Ë', "\\\"E", WEST),
    t('Ì', "\\`I", WEST),
    t('Í', "\\'I", WEST),
    t('Î', "\\^I", WEST),
    t('Ï', "\\\"I", WEST),
    t('Ð', "\\DH{}", T1),
    t('Ñ', "\\~N", WEST),
    t('Ò', "\\`O", WEST),
    t('Ó', "\\'O", WEST),
    t('Ô', "\\^O", WEST),
    t('Õ', "\\~O", WEST),
    t('Ö', "\\\"O", WEST),
    tm('×', "\\texttimes{}", TS1, "\\times "),
    t('Ø', "\\O{}", WEST),
    t('Ù', "\\`U", WEST),
    t('Ú', "\\'U", WEST),
    t('Û', "\\^U", WEST),
    t('Ü', "\\\"U", WEST),
    t('Ý', "\\'Y", WEST),
    t('Þ', "\\TH{}", T1),
    t('ß', "\\ss{}", WEST),
    t('à', "\\`a", WEST),
    t('á', "\\'a", WEST),
    t('â', "\\^a", WEST),
    t('ã', "\\~a", WEST),
    t('ä', "\\\"a", WEST),
    t('å', "\\r{a}", WEST),
    t('æ', "\\ae{}", WEST),
    t('ç', "\\c{c}", WEST),
    t('è', "\\`e", WEST),
    t('é', "\\'e", WEST),
    t('ê', "\\^e", WEST),
    t('ë', "\\\"e", WEST),
    t('ì', "\\`{\\i}", WEST),
    t('í', "\\'{\\i}", WEST),
    t('î', "\\^{\\i}", WEST),
    t('ï', "\\\"{\\i}", WEST),
    t('ð', "\\dh{}", T1),
    t('ñ', "\\~n", WEST),
    t('ò', "\\`o", WEST),
    t('ó', "\\'o", WEST),
    t('ô', "\\^o", WEST),
    t('õ', "\\~o", WEST),
    t('ö', "\\\"o", WEST),
    tm('÷', "\\textdiv{}", TS1, "\\div "),
    t('ø', "\\o{}", WEST),
    t('ù', "\\`u", WEST),
    t('ú', "\\'u", WEST),
    t('û', "\\^u", WEST),
    t('ü', "\\\"u", WEST),
    t('ý', "\\'y", WEST),
    t('þ', "\\th{}", T1),
    t('ÿ', "\\\"y", WEST),
];

/// Latin Extended-A, the characters the 8-bit Central European
/// encodings can carry
pub const LATIN_EXT: &[SymbolDef] = &[
    t('Ā', "\\=A", WEST),
    t('ā', "\\=a", WEST),
    t('Ă', "\\u{A}", WEST),
    t('ă', "\\u{a}", WEST),
    t('Ą', "\\k{A}", T1),
    t('ą', "\\k{a}", T1),
    t('Ć', "\\'C", WEST),
    t('ć', "\\'c", WEST),
    t('Č', "\\v{C}", WEST),
    t('č', "\\v{c}", WEST),
    t('Ď', "\\v{D}", WEST),
    t('ď', "\\v{d}", WEST),
    t('Đ', "\\DJ{}", T1),
    t('đ', "\\dj{}", T1),
    t('Ē', "\\=E", WEST),
    t('ē', "\\=e", WEST),
    t('Ė', "\\.E", WEST),
    t('ė', "\\.e", WEST),
    t('Ę', "\\k{E}", T1),
    t('ę', "\\k{e}", T1),
    t('Ě', "\\v{E}", WEST),
    t('ě', "\\v{e}", WEST),
    t('Ğ', "\\u{G}", WEST),
    t('ğ', "\\u{g}", WEST),
    t('Ģ', "\\c{G}", WEST),
    t('ģ', "\\c{g}", WEST),
    t('Ī', "\\={\\i}", WEST),
    t('ī', "\\={\\i}", WEST),
    t('İ', "\\.I", WEST),
    t('ı', "\\i{}", WEST),
    t('Ķ', "\\c{K}", WEST),
    t('ķ', "\\c{k}", WEST),
    t('Ĺ', "\\'L", WEST),
    t('ĺ', "\\'l", WEST),
    t('Ļ', "\\c{L}", WEST),
    t('ļ', "\\c{l}", WEST),
    t('Ľ', "\\v{L}", WEST),
    t('ľ', "\\v{l}", WEST),
    t('Ł', "\\L{}", WEST),
    t('ł', "\\l{}", WEST),
    t('Ń', "\\'N", WEST),
    t('ń', "\\'n", WEST),
    t('Ņ', "\\c{N}", WEST),
    t('ņ', "\\c{n}", WEST),
    t('Ň', "\\v{N}", WEST),
    t('ň', "\\v{n}", WEST),
    t('Ő', "\\H{O}", T1),
    t('ő', "\\H{o}", T1),
    t('Œ', "\\OE{}", WEST),
    t('œ', "\\oe{}", WEST),
    t('Ŕ', "\\'R", WEST),
    t('ŕ', "\\'r", WEST),
    t('Ř', "\\v{R}", WEST),
    t('ř', "\\v{r}", WEST),
    t('Ś', "\\'S", WEST),
    t('ś', "\\'s", WEST),
    t('Ş', "\\c{S}", WEST),
    t('ş', "\\c{s}", WEST),
    t('Š', "\\v{S}", WEST),
    t('š', "\\v{s}", WEST),
    t('Ţ', "\\c{T}", WEST),
    t('ţ', "\\c{t}", WEST),
    t('Ť', "\\v{T}", WEST),
    t('ť', "\\v{t}", WEST),
    t('Ū', "\\=U", WEST),
    t('ū', "\\=u", WEST),
    t('Ů', "\\r{U}", WEST),
    t('ů', "\\r{u}", WEST),
    t('Ű', "\\H{U}", T1),
    t('ű', "\\H{u}", T1),
    t('Ų', "\\k{U}", T1),
    t('ų', "\\k{u}", T1),
    t('Ÿ', "\\\"Y", WEST),
    t('Ź', "\\'Z", WEST),
    t('ź', "\\'z", WEST),
    t('Ż', "\\.Z", WEST),
    t('ż', "\\.z", WEST),
    t('Ž', "\\v{Z}", WEST),
    t('ž', "\\v{z}", WEST),
];

/// General punctuation and the core math symbols every LaTeX knows
pub const PUNCT: &[SymbolDef] = &[
    tp('\u{2010}', "-", ANY, '-'),
    t('\u{2011}', "\\mbox{-}", ANY),
    tp('–', "--", ANY, '-'),
    tp('—', "---", ANY, '-'),
    tp('―', "---", ANY, '-'),
    tp('\u{2018}', "`", ANY, '`'),
    tp('\u{2019}', "'", ANY, '\''),
    t('\u{201A}', "\\quotesinglbase{}", QUOT),
    tp('\u{201C}', "``", ANY, '`'),
    tp('\u{201D}', "''", ANY, '\''),
    t('\u{201E}', "\\quotedblbase{}", QUOT),
    t('‹', "\\guilsinglleft{}", T1),
    t('›', "\\guilsinglright{}", T1),
    tm('…', "\\dots{}", ANY, "\\dots "),
    t('•', "\\textbullet{}", ANY),
    tm('†', "\\dag{}", ANY, "\\dagger "),
    tm('‡', "\\ddag{}", ANY, "\\ddagger "),
    t('‰', "\\textperthousand{}", TS1),
    m('′', "'"),
    m('″', "''"),
    t('\u{2002}', "\\ ", ANY),
    t('\u{2003}', "\\quad{}", ANY),
    t('\u{2009}', "\\,", ANY),
    t('\u{202F}', "~", ANY),
    ign('\u{200B}'),
    ign('\u{200C}'),
    ign('\u{200D}'),
    ign('\u{200E}'),
    ign('\u{200F}'),
    ign('\u{2060}'),
    ign('\u{FEFF}'),
    t('€', "\\texteuro{}", TS1),
    t('™', "\\texttrademark{}", ANY),
    t('№', "\\textnumero{}", TS1),
    t('℃', "\\textcelsius{}", TS1),
    m('ℓ', "\\ell "),
    m('\u{2126}', "\\Omega "),
    tm('\u{2212}', "-", ANY, "-"),
    m('←', "\\leftarrow "),
    m('↑', "\\uparrow "),
    m('→', "\\rightarrow "),
    m('↓', "\\downarrow "),
    m('↔', "\\leftrightarrow "),
    m('⇐', "\\Leftarrow "),
    m('⇑', "\\Uparrow "),
    m('⇒', "\\Rightarrow "),
    m('⇓', "\\Downarrow "),
    m('⇔', "\\Leftrightarrow "),
    m('∀', "\\forall "),
    m('∂', "\\partial "),
    m('∃', "\\exists "),
    m('∅', "\\emptyset "),
    m('∇', "\\nabla "),
    m('∈', "\\in "),
    m('∉', "\\notin "),
    m('∋', "\\ni "),
    m('∏', "\\prod "),
    m('∑', "\\sum "),
    m('∓', "\\mp "),
    m('∗', "\\ast "),
    m('∘', "\\circ "),
    m('√', "\\surd "),
    m('∝', "\\propto "),
    m('∞', "\\infty "),
    m('∠', "\\angle "),
    m('∣', "\\mid "),
    m('∥', "\\parallel "),
    m('∧', "\\wedge "),
    m('∨', "\\vee "),
    m('∩', "\\cap "),
    m('∪', "\\cup "),
    m('∫', "\\int "),
    m('∮', "\\oint "),
    m('∼', "\\sim "),
    m('≅', "\\cong "),
    m('≈', "\\approx "),
    m('≍', "\\asymp "),
    m('≠', "\\neq "),
    m('≡', "\\equiv "),
    m('≤', "\\leq "),
    m('≥', "\\geq "),
    m('≪', "\\ll "),
    m('≫', "\\gg "),
    m('⊂', "\\subset "),
    m('⊃', "\\supset "),
    m('⊆', "\\subseteq "),
    m('⊇', "\\supseteq "),
    m('⊕', "\\oplus "),
    m('⊖', "\\ominus "),
    m('⊗', "\\otimes "),
    m('⊘', "\\oslash "),
    m('⊙', "\\odot "),
    m('⊢', "\\vdash "),
    m('⊣', "\\dashv "),
    m('⊥', "\\perp "),
    m('⋅', "\\cdot "),
    m('⌈', "\\lceil "),
    m('⌉', "\\rceil "),
    m('⌊', "\\lfloor "),
    m('⌋', "\\rfloor "),
    m('\u{2329}', "\\langle "),
    m('\u{232A}', "\\rangle "),
    m('\u{27E8}', "\\langle "),
    m('\u{27E9}', "\\rangle "),
];

/// Cyrillic letters as T2A macros
pub const CYRILLIC: &[SymbolDef] = &[
    t('Ё', "\\CYRYO{}", T2A),
    t('Ђ', "\\CYRDJE{}", T2A),
    t('Є', "\\CYRIE{}", T2A),
    t('Ѕ', "\\CYRDZE{}", T2A),
    t('І', "\\CYRII{}", T2A),
    t('Ї', "\\CYRYI{}", T2A),
    t('Ј', "\\CYRJE{}", T2A),
    t('Љ', "\\CYRLJE{}", T2A),
    t('Њ', "\\CYRNJE{}", T2A),
    t('Ћ', "\\CYRTSHE{}", T2A),
    t('Ў', "\\CYRUSHRT{}", T2A),
    t('Џ', "\\CYRDZHE{}", T2A),
    t('А', "\\CYRA{}", T2A),
    t('Б', "\\CYRB{}", T2A),
    t('В', "\\CYRV{}", T2A),
    t('Г', "\\CYRG{}", T2A),
    t('Д', "\\CYRD{}", T2A),
    t('Е', "\\CYRE{}", T2A),
    t('Ж', "\\CYRZH{}", T2A),
    t('З', "\\CYRZ{}", T2A),
    t('И', "\\CYRI{}", T2A),
    t('Й', "\\CYRISHRT{}", T2A),
    t('К', "\\CYRK{}", T2A),
    t('Л', "\\CYRL{}", T2A),
    t('М', "\\CYRM{}", T2A),
    t('Н', "\\CYRN{}", T2A),
    t('О', "\\CYRO{}", T2A),
    t('П', "\\CYRP{}", T2A),
    t('Р', "\\CYRR{}", T2A),
    t('С', "\\CYRS{}", T2A),
    t('Т', "\\CYRT{}", T2A),
    t('У', "\\CYRU{}", T2A),
    t('Ф', "\\CYRF{}", T2A),
    t('Х', "\\CYRH{}", T2A),
    t('Ц', "\\CYRC{}", T2A),
    t('Ч', "\\CYRCH{}", T2A),
    t('Ш', "\\CYRSH{}", T2A),
    t('Щ', "\\CYRSHCH{}", T2A),
    t('Ъ', "\\CYRHRDSN{}", T2A),
    t('Ы', "\\CYRERY{}", T2A),
    t('Ь', "\\CYRSFTSN{}", T2A),
    t('Э', "\\CYREREV{}", T2A),
    t('Ю', "\\CYRYU{}", T2A),
    t('Я', "\\CYRYA{}", T2A),
    t('а', "\\cyra{}", T2A),
    t('б', "\\cyrb{}", T2A),
    t('в', "\\cyrv{}", T2A),
    t('г', "\\cyrg{}", T2A),
    t('д', "\\cyrd{}", T2A),
    t('е', "\\cyre{}", T2A),
    t('ж', "\\cyrzh{}", T2A),
    t('з', "\\cyrz{}", T2A),
    t('и', "\\cyri{}", T2A),
    t('й', "\\cyrishrt{}", T2A),
    t('к', "\\cyrk{}", T2A),
    t('л', "\\cyrl{}", T2A),
    t('м', "\\cyrm{}", T2A),
    t('н', "\\cyrn{}", T2A),
    t('о', "\\cyro{}", T2A),
    t('п', "\\cyrp{}", T2A),
    t('р', "\\cyrr{}", T2A),
    t('с', "\\cyrs{}", T2A),
    t('т', "\\cyrt{}", T2A),
    t('у', "\\cyru{}", T2A),
    t('ф', "\\cyrf{}", T2A),
    t('х', "\\cyrh{}", T2A),
    t('ц', "\\cyrc{}", T2A),
    t('ч', "\\cyrch{}", T2A),
    t('ш', "\\cyrsh{}", T2A),
    t('щ', "\\cyrshch{}", T2A),
    t('ъ', "\\cyrhrdsn{}", T2A),
    t('ы', "\\cyrery{}", T2A),
    t('ь', "\\cyrsftsn{}", T2A),
    t('э', "\\cyrerev{}", T2A),
    t('ю', "\\cyryu{}", T2A),
    t('я', "\\cyrya{}", T2A),
    t('ё', "\\cyryo{}", T2A),
    t('ђ', "\\cyrdje{}", T2A),
    t('є', "\\cyrie{}", T2A),
    t('ѕ', "\\cyrdze{}", T2A),
    t('і', "\\cyrii{}", T2A),
    t('ї', "\\cyryi{}", T2A),
    t('ј', "\\cyrje{}", T2A),
    t('љ', "\\cyrlje{}", T2A),
    t('њ', "\\cyrnje{}", T2A),
    t('ћ', "\\cyrtshe{}", T2A),
    t('ў', "\\cyrushrt{}", T2A),
    t('џ', "\\cyrdzhe{}", T2A),
    t('Ґ', "\\CYRGUP{}", T2A),
    t('ґ', "\\cyrgup{}", T2A),
];

/// Greek letters: LGR transliteration for text, standard macros for math
pub const GREEK: &[SymbolDef] = &[
    t('Ά', "'A", LGR),
    t('Έ', "'E", LGR),
    t('Ή', "'H", LGR),
    t('Ί', "'I", LGR),
    t('Ό', "'O", LGR),
    t('Ύ', "'U", LGR),
    t('Ώ', "'W", LGR),
    tm('Α', "A", LGR, "A"),
    tm('Β', "B", LGR, "B"),
    tm('Γ', "G", LGR, "\\Gamma "),
    tm('Δ', "D", LGR, "\\Delta "),
    tm('Ε', "E", LGR, "E"),
    tm('Ζ', "Z", LGR, "Z"),
    tm('Η', "H", LGR, "H"),
    tm('Θ', "J", LGR, "\\Theta "),
    tm('Ι', "I", LGR, "I"),
    tm('Κ', "K", LGR, "K"),
    tm('Λ', "L", LGR, "\\Lambda "),
    tm('Μ', "M", LGR, "M"),
    tm('Ν', "N", LGR, "N"),
    tm('Ξ', "X", LGR, "\\Xi "),
    tm('Ο', "O", LGR, "O"),
    tm('Π', "P", LGR, "\\Pi "),
    tm('Ρ', "R", LGR, "P"),
    tm('Σ', "S", LGR, "\\Sigma "),
    tm('Τ', "T", LGR, "T"),
    tm('Υ', "U", LGR, "\\Upsilon "),
    tm('Φ', "F", LGR, "\\Phi "),
    tm('Χ', "Q", LGR, "X"),
    tm('Ψ', "Y", LGR, "\\Psi "),
    tm('Ω', "W", LGR, "\\Omega "),
    t('ΐ', "\"'i", LGR),
    t('ά', "'a", LGR),
    t('έ', "'e", LGR),
    t('ή', "'h", LGR),
    t('ί', "'i", LGR),
    tm('α', "a", LGR, "\\alpha "),
    tm('β', "b", LGR, "\\beta "),
    tm('γ', "g", LGR, "\\gamma "),
    tm('δ', "d", LGR, "\\delta "),
    tm('ε', "e", LGR, "\\varepsilon "),
    tm('ζ', "z", LGR, "\\zeta "),
    tm('η', "h", LGR, "\\eta "),
    tm('θ', "j", LGR, "\\theta "),
    tm('ι', "i", LGR, "\\iota "),
    tm('κ', "k", LGR, "\\kappa "),
    tm('λ', "l", LGR, "\\lambda "),
    tm('μ', "m", LGR, "\\mu "),
    tm('ν', "n", LGR, "\\nu "),
    tm('ξ', "x", LGR, "\\xi "),
    tm('ο', "o", LGR, "o"),
    tm('π', "p", LGR, "\\pi "),
    tm('ρ', "r", LGR, "\\rho "),
    tm('ς', "c", LGR, "\\varsigma "),
    tm('σ', "s", LGR, "\\sigma "),
    tm('τ', "t", LGR, "\\tau "),
    tm('υ', "u", LGR, "\\upsilon "),
    tm('φ', "f", LGR, "\\varphi "),
    tm('χ', "q", LGR, "\\chi "),
    tm('ψ', "y", LGR, "\\psi "),
    tm('ω', "w", LGR, "\\omega "),
    t('ϊ', "\"i", LGR),
    t('ϋ', "\"u", LGR),
    t('ό', "'o", LGR),
    t('ύ', "'u", LGR),
    t('ώ', "'w", LGR),
    m('ϑ', "\\vartheta "),
    m('ϕ', "\\phi "),
    m('ϖ', "\\varpi "),
    t('ἀ', ">a", LGR),
    t('ἁ', "<a", LGR),
    t('ἐ', ">e", LGR),
    t('ἑ', "<e", LGR),
    t('ἠ', ">h", LGR),
    t('ἡ', "<h", LGR),
    t('ἰ', ">i", LGR),
    t('ἱ', "<i", LGR),
    t('ὀ', ">o", LGR),
    t('ὁ', "<o", LGR),
    t('ὐ', ">u", LGR),
    t('ὑ', "<u", LGR),
    t('ὠ', ">w", LGR),
    t('ὡ', "<w", LGR),
    t('ᾶ', "~a", LGR),
    t('ῆ', "~h", LGR),
    t('ῖ', "~i", LGR),
    t('ῦ', "~u", LGR),
    t('ῶ', "~w", LGR),
];

/// Registered with the amsmath package
pub const AMSMATH: &[SymbolDef] = &[
    m('∬', "\\iint "),
    m('∭', "\\iiint "),
    m('⋮', "\\vdots "),
    m('⋯', "\\cdots "),
    m('⋱', "\\ddots "),
    m('⟸', "\\impliedby "),
    m('⟹', "\\implies "),
    m('⟺', "\\iff "),
];

/// Registered with the amssymb package
pub const AMSSYMB: &[SymbolDef] = &[
    m('ℂ', "\\mathbb{C}"),
    m('ℍ', "\\mathbb{H}"),
    m('ℕ', "\\mathbb{N}"),
    m('ℚ', "\\mathbb{Q}"),
    m('ℝ', "\\mathbb{R}"),
    m('ℤ', "\\mathbb{Z}"),
    m('∅', "\\varnothing "),
    m('∴', "\\therefore "),
    m('∵', "\\because "),
    m('≦', "\\leqq "),
    m('≧', "\\geqq "),
    m('≰', "\\nleq "),
    m('≱', "\\ngeq "),
    m('⊀', "\\nprec "),
    m('⊈', "\\nsubseteq "),
    m('∤', "\\nmid "),
    m('□', "\\square "),
    m('■', "\\blacksquare "),
    m('◊', "\\lozenge "),
    m('✓', "\\checkmark "),
];

/// Registered with the eurosym package
pub const EUROSYM: &[SymbolDef] = &[t('€', "\\euro{}", ANY)];

/// Registered with the wasysym package
pub const WASYSYM: &[SymbolDef] = &[
    t('♀', "\\female{}", ANY),
    t('♂', "\\male{}", ANY),
    t('☺', "\\smiley{}", ANY),
    t('☹', "\\frownie{}", ANY),
    t('☎', "\\phone{}", ANY),
];

/// Adobe Symbol font, keyed by the byte positions documents use when a
/// run is set in that font
pub const SYMBOL_FONT: &[SymbolDef] = &[
    t(' ', " ", ANY),
    m('!', "!"),
    m('"', "\\forall "),
    m('$', "\\exists "),
    m('\'', "\\ni "),
    m('(', "("),
    m(')', ")"),
    m('*', "\\ast "),
    m('+', "+"),
    m(',', ","),
    m('-', "-"),
    m('.', "."),
    m('/', "/"),
    m('0', "0"),
    m('1', "1"),
    m('2', "2"),
    m('3', "3"),
    m('4', "4"),
    m('5', "5"),
    m('6', "6"),
    m('7', "7"),
    m('8', "8"),
    m('9', "9"),
    m(':', ":"),
    m(';', ";"),
    m('<', "<"),
    m('=', "="),
    m('>', ">"),
    m('?', "?"),
    m('@', "\\cong "),
    tm('A', "A", LGR, "A"),
    tm('B', "B", LGR, "B"),
    tm('C', "Q", LGR, "X"),
    tm('D', "D", LGR, "\\Delta "),
    tm('E', "E", LGR, "E"),
    tm('F', "F", LGR, "\\Phi "),
    tm('G', "G", LGR, "\\Gamma "),
    tm('H', "H", LGR, "H"),
    tm('I', "I", LGR, "I"),
    m('J', "\\vartheta "),
    tm('K', "K", LGR, "K"),
    tm('L', "L", LGR, "\\Lambda "),
    tm('M', "M", LGR, "M"),
    tm('N', "N", LGR, "N"),
    tm('O', "O", LGR, "O"),
    tm('P', "P", LGR, "\\Pi "),
    tm('Q', "J", LGR, "\\Theta "),
    tm('R', "R", LGR, "P"),
    tm('S', "S", LGR, "\\Sigma "),
    tm('T', "T", LGR, "T"),
    tm('U', "U", LGR, "\\Upsilon "),
    m('V', "\\varsigma "),
    tm('W', "W", LGR, "\\Omega "),
    tm('X', "X", LGR, "\\Xi "),
    tm('Y', "Y", LGR, "\\Psi "),
    tm('Z', "Z", LGR, "Z"),
    m('\\', "\\therefore "),
    m('^', "\\perp "),
    tm('a', "a", LGR, "\\alpha "),
    tm('b', "b", LGR, "\\beta "),
    tm('c', "q", LGR, "\\chi "),
    tm('d', "d", LGR, "\\delta "),
    tm('e', "e", LGR, "\\varepsilon "),
    tm('f', "f", LGR, "\\varphi "),
    tm('g', "g", LGR, "\\gamma "),
    tm('h', "h", LGR, "\\eta "),
    tm('i', "i", LGR, "\\iota "),
    m('j', "\\phi "),
    tm('k', "k", LGR, "\\kappa "),
    tm('l', "l", LGR, "\\lambda "),
    tm('m', "m", LGR, "\\mu "),
    tm('n', "n", LGR, "\\nu "),
    tm('o', "o", LGR, "o"),
    tm('p', "p", LGR, "\\pi "),
    tm('q', "j", LGR, "\\theta "),
    tm('r', "r", LGR, "\\rho "),
    tm('s', "s", LGR, "\\sigma "),
    tm('t', "t", LGR, "\\tau "),
    tm('u', "u", LGR, "\\upsilon "),
    m('v', "\\varpi "),
    tm('w', "w", LGR, "\\omega "),
    tm('x', "x", LGR, "\\xi "),
    tm('y', "y", LGR, "\\psi "),
    tm('z', "z", LGR, "\\zeta "),
    m('\u{00A3}', "\\leq "),
    m('\u{00A5}', "\\infty "),
    m('\u{00AB}', "\\leftrightarrow "),
    m('\u{00AC}', "\\leftarrow "),
    m('\u{00AD}', "\\uparrow "),
    m('\u{00AE}', "\\rightarrow "),
    m('\u{00AF}', "\\downarrow "),
    m('\u{00B1}', "\\pm "),
    m('\u{00B3}', "\\geq "),
    m('\u{00B4}', "\\times "),
    m('\u{00B5}', "\\propto "),
    m('\u{00B6}', "\\partial "),
    m('\u{00B9}', "\\neq "),
    m('\u{00BA}', "\\equiv "),
    m('\u{00BB}', "\\approx "),
    m('\u{00C5}', "\\oplus "),
    m('\u{00C7}', "\\cap "),
    m('\u{00C8}', "\\cup "),
    m('\u{00C9}', "\\supset "),
    m('\u{00CA}', "\\supseteq "),
    m('\u{00CC}', "\\subset "),
    m('\u{00CD}', "\\subseteq "),
    m('\u{00CE}', "\\in "),
    m('\u{00CF}', "\\notin "),
    m('\u{00D1}', "\\nabla "),
    m('\u{00D6}', "\\surd "),
    m('\u{00D9}', "\\wedge "),
    m('\u{00DA}', "\\vee "),
    m('\u{00DB}', "\\Leftrightarrow "),
    m('\u{00DC}', "\\Leftarrow "),
    m('\u{00DD}', "\\Uparrow "),
    m('\u{00DE}', "\\Rightarrow "),
    m('\u{00DF}', "\\Downarrow "),
];

/// ITC Zapf Dingbats, the slots worth mapping
pub const DINGBATS_FONT: &[SymbolDef] = &[
    t(' ', " ", ANY),
    m('4', "\\surd "),
    m('5', "\\times "),
    m('6', "\\times "),
    m('7', "\\times "),
    m('8', "\\times "),
    m('H', "\\star "),
    t('l', "\\textbullet{}", ANY),
    t('m', "\\textopenbullet{}", TS1),
    t('n', "\\rule{1ex}{1ex}", ANY),
    m('u', "\\diamond "),
];

const LATIN2_CHARS: &str = "ĄŁĽŚŠŞŤŹŽŻąłľśšşťźžżŔÁÂĂÄĹĆÇČÉĘËĚÍÎĎĐŃŇÓÔŐÖ×ŘŮÚŰÜÝŢßŕáâăäĺćçčéęëěíîďđńňóôőö÷řůúűüýţ";
const CP1250_EXTRA: &str = "‚„…†‡‰‹›\u{2018}\u{2019}\u{201C}\u{201D}•–—™€«»§©®°±´µ¶·¸";
const CP1251_EXTRA: &str = "ЁёЂђЃѓЄєЅѕІіЇїЈјЉљЊњЋћЌќЎўЏџҐґ‚„…†‡‰‹›\u{2018}\u{2019}\u{201C}\u{201D}•–—™€№«»§©®°±µ¶·";
const UTF8_PUNCT: &str = "–—\u{2018}\u{2019}\u{201C}\u{201D}‚„…•†‡‰‹›«»§©®°±µ¶·×÷¡¿€™№";

fn range_chars(from: u32, to: u32) -> impl Iterator<Item = char> {
    (from..=to).filter_map(char::from_u32)
}

/// The characters an input encoding lets through as themselves
fn passthrough_repertoire(key: &TableKey) -> Vec<char> {
    let mut chars: Vec<char> = Vec::new();
    match key.encoding {
        InputEncoding::Ascii => {},
        InputEncoding::Latin1 => {
            chars.extend(range_chars(0xA1, 0xFF).filter(|c| *c != '\u{00AD}'));
        },
        InputEncoding::Latin2 => {
            chars.extend(LATIN2_CHARS.chars());
        },
        InputEncoding::Cp1250 => {
            chars.extend(LATIN2_CHARS.chars());
            chars.extend(CP1250_EXTRA.chars());
        },
        InputEncoding::Cp1251 => {
            chars.extend(range_chars(0x0410, 0x044F));
            chars.extend(CP1251_EXTRA.chars());
        },
        InputEncoding::Koi8R => {
            chars.extend(range_chars(0x0410, 0x044F));
            chars.push('Ё');
            chars.push('ё');
        },
        InputEncoding::Utf8 => {
            chars.extend(range_chars(0xA1, 0xFF).filter(|c| *c != '\u{00AD}'));
            chars.extend(LATIN2_CHARS.chars());
            chars.extend(UTF8_PUNCT.chars());
            if key.multilingual {
                chars.extend(range_chars(0x0401, 0x045F));
                chars.extend(range_chars(0x0386, 0x03CE));
            }
        },
    }
    chars
}

/// Build the table set for one configuration
pub fn build_table_set(key: &TableKey) -> TableSet {
    let cyrillic_encoding = matches!(
        key.encoding,
        InputEncoding::Cp1251 | InputEncoding::Koi8R
    );

    let mut builder = TableBuilder::new();
    builder
        .ascii_identity()
        .apply(ASCII_SPECIALS)
        .apply(COMBINING)
        .apply(LATIN1)
        .apply(LATIN_EXT)
        .apply(PUNCT);
    if key.multilingual || cyrillic_encoding {
        builder.apply(CYRILLIC);
    }
    if key.multilingual {
        builder.apply(GREEK);
    }
    builder.passthrough(passthrough_repertoire(key).into_iter());
    if key.use_amsmath {
        builder.apply(AMSMATH);
    }
    if key.use_amssymb {
        builder.apply(AMSSYMB);
    }
    if key.use_eurosym {
        builder.apply(EUROSYM);
    }
    if key.use_wasysym {
        builder.apply(WASYSYM);
    }
    let root = builder.build();

    let mut specials = HashMap::new();
    specials.insert("symbol".to_string(), build_special(&root, SYMBOL_FONT));
    let dingbats = build_special(&root, DINGBATS_FONT);
    specials.insert("zapfdingbats".to_string(), Arc::clone(&dingbats));
    specials.insert("dingbats".to_string(), dingbats);
    TableSet::new(root, specials)
}

/// A legacy-font table: the byte range is cleared and remapped, the rest
/// of the plane shows through from the root
fn build_special(root: &UnicodeTable, defs: &[SymbolDef]) -> Arc<UnicodeTable> {
    let mut builder = TableBuilder::layered_on(root);
    builder.clear_range(0x20..=0xFF).apply(defs);
    Arc::new(builder.build())
}
