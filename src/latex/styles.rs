//! Style to LaTeX mapping.
//!
//! Formatting attributes resolved through the style registry become
//! [`BeforeAfter`] wrappers. How much survives is governed by the
//! `formatting` option: `ignore_all` drops everything, `convert_basic`
//! keeps the basic toggles, `convert_most` adds sizes, colors, languages
//! and alignment from named styles, and `convert_all` honors the same for
//! hard (automatic style) formatting too. An explicit `style-map` entry
//! always wins over derived formatting.

use crate::common::unit::Length;
use crate::config::{Backend, Config, Formatting};
use crate::latex::context::Context;
use crate::latex::i18n::I18n;
use crate::latex::util::BeforeAfter;
use crate::office::style::{StyleFamily, StyleRegistry};

const ARTICLE_HEADINGS: [&str; 5] = [
    "section",
    "subsection",
    "subsubsection",
    "paragraph",
    "subparagraph",
];

/// The sectioning command wrapper for a heading outline level.
///
/// Without a `heading-map` the article defaults apply, with levels past
/// five clamped to `subparagraph`. With a map, unmapped levels fall back
/// to the nearest shallower mapped level.
pub fn heading_format(config: &Config, level: u8) -> BeforeAfter {
    let level = level.max(1);
    let max = config.heading_max_level();
    let name = if max == 0 {
        ARTICLE_HEADINGS[(level.min(5) - 1) as usize]
    } else {
        let mut found = None;
        for candidate in (1..=level.min(max)).rev() {
            if let Some(name) = config.heading_name(candidate) {
                found = Some(name);
                break;
            }
        }
        found.unwrap_or(ARTICLE_HEADINGS[(level.min(5) - 1) as usize])
    };
    BeforeAfter::with(&format!("\\{name}{{"), "}")
}

/// The LaTeX list environment for a list level
pub fn list_environment(ordered: bool) -> &'static str {
    if ordered {
        "enumerate"
    } else {
        "itemize"
    }
}

/// Character formatting for a styled run.
///
/// Returns the wrapper and the context for the children, with the
/// formatting state the wrapper establishes already applied. Attributes
/// already active in the parent context are not wrapped again.
pub fn character_format(
    config: &Config,
    registry: &StyleRegistry,
    family: StyleFamily,
    style_name: &str,
    ctx: &Context,
    i18n: &mut dyn I18n,
) -> (BeforeAfter, Context) {
    let mut ba = BeforeAfter::new();
    let mut child = ctx.clone();
    if style_name.is_empty() {
        return (ba, child);
    }

    if family == StyleFamily::Text {
        if let Some(entry) = config.style_map("text", style_name) {
            ba.add(&entry.before, &entry.after);
            return (ba, child);
        }
    }

    let formatting = config.formatting();
    if formatting == Formatting::IgnoreAll {
        return (ba, child);
    }

    let prop = |attr: &str| registry.property(family, style_name, attr, true);

    if prop("fo:font-weight") == Some("bold") && !ctx.bold {
        ba.add("\\textbf{", "}");
        child.bold = true;
    }
    if matches!(prop("fo:font-style"), Some("italic" | "oblique")) && !ctx.italic {
        ba.add("\\textit{", "}");
        child.italic = true;
    }
    if prop("fo:font-variant") == Some("small-caps") && !ctx.small_caps {
        ba.add("\\textsc{", "}");
        child.small_caps = true;
    }
    if let Some(font) = prop("style:font-name") {
        child.font_name = font.to_string();
        if is_fixed_pitch(font) && !ctx.fixed_pitch {
            ba.add("\\texttt{", "}");
            child.fixed_pitch = true;
        }
    }
    if let Some(position) = prop("style:text-position") {
        if position.starts_with("super") {
            ba.add("\\textsuperscript{", "}");
        } else if position.starts_with("sub") {
            ba.add("\\textsubscript{", "}");
        }
    }

    if extended_formatting(config, registry, family, style_name) {
        if let Some(size) = prop("fo:font-size") {
            if let Some(command) = font_size_command(size) {
                if child.font_size.as_deref() != Some(command) {
                    ba.add(&format!("{{{command} "), "}");
                    child.font_size = Some(command.to_string());
                }
            }
        }
        if config.use_color() {
            if let Some(hex) = prop("fo:color").and_then(|c| c.strip_prefix('#')) {
                ba.add(
                    &format!("\\textcolor[HTML]{{{}}}{{", hex.to_ascii_uppercase()),
                    "}",
                );
            }
        }

        let lang = prop("fo:language").unwrap_or("").to_string();
        let country = prop("fo:country").unwrap_or("").to_string();
        let switched =
            !lang.is_empty() && (lang != ctx.lang || (!country.is_empty() && country != ctx.country));
        if switched {
            if let Some(name) = i18n.language_command(&lang, &country) {
                match config.backend() {
                    Backend::Xetex => ba.add(&format!("\\text{name}{{"), "}"),
                    _ => ba.add(&format!("\\foreignlanguage{{{name}}}{{"), "}"),
                }
                child.lang = lang;
                child.country = country;
            }
        }
    }

    (ba, child)
}

/// Block-level wrapper for a paragraph style.
///
/// Returns the wrapper and whether it should sit on its own lines.
pub fn paragraph_block(
    config: &Config,
    registry: &StyleRegistry,
    style_name: &str,
    ctx: &Context,
) -> (BeforeAfter, bool) {
    if let Some(entry) = config.style_map("paragraph", style_name) {
        let mut ba = BeforeAfter::new();
        ba.add(&entry.before, &entry.after);
        return (ba, entry.line_break);
    }

    let mut ba = BeforeAfter::new();
    if !ctx.in_table
        && !ctx.in_footnote
        && extended_formatting(config, registry, StyleFamily::Paragraph, style_name)
    {
        match registry.property(StyleFamily::Paragraph, style_name, "fo:text-align", true) {
            Some("center") => ba.add("\\begin{center}", "\\end{center}"),
            Some("end" | "right") => ba.add("\\begin{flushright}", "\\end{flushright}"),
            _ => {},
        }
    }
    let line_break = !ba.is_empty();
    (ba, line_break)
}

/// Whether a page break is requested before the paragraph or heading
pub fn page_break_before(registry: &StyleRegistry, style_name: &str) -> bool {
    registry
        .property(StyleFamily::Paragraph, style_name, "fo:break-before", false)
        == Some("page")
}

// Extended formatting applies from convert_most on, but hard formatting
// (automatic styles) only from convert_all
fn extended_formatting(
    config: &Config,
    registry: &StyleRegistry,
    family: StyleFamily,
    style_name: &str,
) -> bool {
    match config.formatting() {
        Formatting::IgnoreAll | Formatting::ConvertBasic => false,
        Formatting::ConvertMost => registry
            .style(family, style_name)
            .map(|s| !s.is_automatic())
            .unwrap_or(false),
        Formatting::ConvertAll => true,
    }
}

fn is_fixed_pitch(font_name: &str) -> bool {
    let name = font_name.to_ascii_lowercase();
    name.contains("mono") || name.contains("courier") || name.contains("consol")
}

// Absolute point sizes snapped to the standard size commands. Body sizes
// map to no command at all.
fn font_size_command(size: &str) -> Option<&'static str> {
    let pt = size.parse::<Length>().ok()?.to_points();
    let command = match pt {
        pt if pt >= 24.0 => "\\Huge",
        pt if pt >= 20.0 => "\\huge",
        pt if pt >= 17.0 => "\\LARGE",
        pt if pt >= 14.5 => "\\Large",
        pt if pt >= 12.5 => "\\large",
        pt if pt > 9.5 => return None,
        pt if pt > 8.5 => "\\small",
        pt if pt > 7.0 => "\\footnotesize",
        pt if pt > 5.5 => "\\scriptsize",
        _ => "\\tiny",
    };
    Some(command)
}
