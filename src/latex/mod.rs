//! LaTeX output.
//!
//! The converter walks the document content tree once, translating each
//! construct into LaTeX in the order it appears. Character level work is
//! delegated to the [`i18n`] engines, formatting to [`styles`], and the
//! output is assembled out of [`LatexDocumentPortion`]s so the preamble
//! can be written last, after the walk has discovered which packages the
//! document actually needs.

pub mod context;
pub mod i18n;
pub mod portion;
pub mod styles;
pub mod util;

pub use context::Context;
pub use portion::LatexDocumentPortion;
pub use util::BeforeAfter;

use crate::common::Diagnostics;
use crate::common::LengthUnit;
use crate::common::Result;
use crate::config::{Config, Notes, Units};
use crate::convert::{ContentEntry, Converter, ConverterResult, OutputFile};
use crate::office::bibmark::{BibField, BibMark};
use crate::office::element::{Element, Node};
use crate::office::style::StyleFamily;
use crate::office::TextDocument;
use base64::Engine as _;
use i18n::I18n;
use indexmap::IndexMap;

/// Converts OpenDocument text to LaTeX.
///
/// # Examples
///
/// ```rust,no_run
/// use longan::latex::LatexConverter;
/// use longan::convert::Converter;
/// use longan::office::TextDocument;
///
/// # fn main() -> longan::Result<()> {
/// let doc = TextDocument::open("report.fodt")?;
/// let mut converter = LatexConverter::new();
/// converter.apply_option("backend", "pdftex")?;
/// let result = converter.convert(&doc, "report")?;
/// result.write_all("out".as_ref())?;
/// # Ok(())
/// # }
/// ```
pub struct LatexConverter {
    config: Config,
}

impl LatexConverter {
    /// Create a converter with the default configuration
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }
}

impl Default for LatexConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for LatexConverter {
    fn config(&self) -> &Config {
        &self.config
    }

    fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    fn convert(&mut self, document: &TextDocument, name: &str) -> Result<ConverterResult> {
        let mut walker = Walker::new(&self.config, document, name);
        let body = walker.walk_body();
        walker.assemble(body)
    }
}

/// Per-document conversion state
struct Walker<'a> {
    config: &'a Config,
    doc: &'a TextDocument,
    name: &'a str,
    i18n: Box<dyn I18n>,
    diagnostics: Diagnostics,
    bib_marks: IndexMap<String, BibMark>,
    images: Vec<OutputFile>,
    outline: Vec<ContentEntry>,
    image_count: usize,
    has_math: bool,
    uses_graphics: bool,
    deep_list_reported: bool,
}

impl<'a> Walker<'a> {
    fn new(config: &'a Config, doc: &'a TextDocument, name: &'a str) -> Self {
        let mut i18n = i18n::make_i18n(config);
        i18n.set_document_language(&doc.language(), &doc.country());
        Self {
            config,
            doc,
            name,
            i18n,
            diagnostics: Diagnostics::new(),
            bib_marks: IndexMap::new(),
            images: Vec::new(),
            outline: Vec::new(),
            image_count: 0,
            has_math: false,
            uses_graphics: false,
            deep_list_reported: false,
        }
    }

    fn master_name(&self) -> String {
        format!("{}.tex", self.name)
    }

    fn walk_body(&mut self) -> LatexDocumentPortion {
        let ctx = Context::root(&self.doc.language(), &self.doc.country());
        let mut out = LatexDocumentPortion::new();
        let doc = self.doc;
        for child in doc.content().child_elements() {
            self.block_element(child, &ctx, &mut out);
        }
        out
    }

    fn block_element(&mut self, element: &Element, ctx: &Context, out: &mut LatexDocumentPortion) {
        match element.tag() {
            "text:h" => self.heading(element, ctx, out),
            "text:p" => self.paragraph(element, ctx, out),
            "text:list" => self.list(element, ctx, out),
            "table:table" => self.table(element, ctx, out),
            "text:section" => {
                let mut child_ctx = ctx.clone();
                child_ctx.in_section = true;
                for child in element.child_elements() {
                    self.block_element(child, &child_ctx, out);
                }
            },
            "text:table-of-content" => {
                out.append("\\tableofcontents").nl().nl();
            },
            // The generated bibliography index; records are re-emitted
            // from the marks at the end of the document
            "text:bibliography" => {},
            "draw:frame" => self.frame(element, ctx, out),
            "text:soft-page-break" => {},
            // Declaration blocks at the top of the body carry no content
            tag if tag.ends_with("-decls") => {},
            "office:forms" | "text:tracked-changes" => {},
            tag => {
                self.diagnostics
                    .info(format!("Unsupported element '{tag}' was skipped"));
            },
        }
    }

    fn heading(&mut self, element: &Element, ctx: &Context, out: &mut LatexDocumentPortion) {
        let level = element
            .int_attribute("text:outline-level")
            .unwrap_or(1)
            .clamp(1, 10) as u8;
        let style_name = element.attribute("text:style-name").unwrap_or("").to_string();

        if styles::page_break_before(self.doc.styles(), &style_name) {
            out.append("\\clearpage").nl();
        }

        let ba = styles::heading_format(self.config, level);
        let mut child_ctx = ctx.clone();
        child_ctx.no_footnotes = true;

        let mut inline = LatexDocumentPortion::new();
        self.inline_content(element, &child_ctx, &mut inline);

        out.append(ba.before());
        out.append_portion(inline);
        out.append(ba.after());
        out.nl().nl();

        self.outline
            .push(ContentEntry::new(element.plain_text(), level, self.master_name(), ""));
    }

    fn paragraph(&mut self, element: &Element, ctx: &Context, out: &mut LatexDocumentPortion) {
        let style_name = element.attribute("text:style-name").unwrap_or("").to_string();

        if !ctx.in_table && styles::page_break_before(self.doc.styles(), &style_name) {
            out.append("\\clearpage").nl();
        }

        let (block, block_lines) =
            styles::paragraph_block(self.config, self.doc.styles(), &style_name, ctx);
        let (char_ba, child_ctx) = styles::character_format(
            self.config,
            self.doc.styles(),
            StyleFamily::Paragraph,
            &style_name,
            ctx,
            self.i18n.as_mut(),
        );

        let mut inline = LatexDocumentPortion::new();
        self.inline_content(element, &child_ctx, &mut inline);

        if inline.is_empty() {
            out.nl();
            return;
        }

        if !block.is_empty() {
            out.append(block.before());
            if block_lines {
                out.nl();
            }
        }
        out.append(char_ba.before());
        out.append_portion(inline);
        out.append(char_ba.after());
        if !block.is_empty() {
            if block_lines {
                out.nl();
            }
            out.append(block.after());
        }

        if ctx.in_table || ctx.in_footnote {
            out.nl();
        } else {
            out.nl().nl();
        }
    }

    fn list(&mut self, element: &Element, ctx: &Context, out: &mut LatexDocumentPortion) {
        let level = ctx.list_level + 1;

        // LaTeX allows four levels of list nesting; anything deeper is
        // flattened into the innermost environment
        if level > 4 || ctx.ignore_lists {
            if !self.deep_list_reported {
                self.diagnostics
                    .warning("List nesting deeper than four levels was flattened");
                self.deep_list_reported = true;
            }
            let mut child_ctx = ctx.clone();
            child_ctx.ignore_lists = true;
            for item in element.child_elements() {
                for child in item.child_elements() {
                    self.block_element(child, &child_ctx, out);
                }
            }
            return;
        }

        let style_name = element
            .attribute("text:style-name")
            .unwrap_or(&ctx.list_style);
        let ordered = self
            .doc
            .styles()
            .list_style(style_name)
            .map(|s| s.is_ordered(level))
            .unwrap_or(false);
        let environment = styles::list_environment(ordered);

        let mut child_ctx = ctx.clone();
        child_ctx.in_list = true;
        child_ctx.list_level = level;
        child_ctx.list_style = style_name.to_string();

        out.append(&format!("\\begin{{{environment}}}")).nl();
        for item in element.child_elements() {
            if !matches!(item.tag(), "text:list-item" | "text:list-header") {
                continue;
            }
            out.append("\\item ");
            for child in item.child_elements() {
                self.block_element(child, &child_ctx, out);
            }
        }
        out.append(&format!("\\end{{{environment}}}")).nl().nl();
    }

    fn table(&mut self, element: &Element, ctx: &Context, out: &mut LatexDocumentPortion) {
        let mut columns = 0usize;
        count_columns(element, &mut columns);

        let mut rows: Vec<(&Element, bool)> = Vec::new();
        collect_rows(element, false, &mut rows);

        if columns == 0 {
            columns = rows
                .iter()
                .map(|(row, _)| row.child_elements().count())
                .max()
                .unwrap_or(0);
        }
        if columns == 0 || rows.is_empty() {
            return;
        }

        let mut child_ctx = ctx.clone();
        child_ctx.in_table = true;

        out.append(&format!("\\begin{{tabular}}{{{}}}", "l".repeat(columns)))
            .nl();
        out.append("\\hline").nl();

        let mut last_was_header = false;
        for (row, header) in &rows {
            if last_was_header && !header {
                out.append("\\hline").nl();
            }
            last_was_header = *header;

            let mut first = true;
            for cell in row.child_elements() {
                match cell.tag() {
                    "table:table-cell" => {},
                    // Covered by a preceding column span
                    "table:covered-table-cell" => continue,
                    _ => continue,
                }
                if !first {
                    out.append(" & ");
                }
                first = false;

                let span = cell
                    .int_attribute("table:number-columns-spanned")
                    .unwrap_or(1)
                    .max(1);
                let mut content = LatexDocumentPortion::new();
                self.cell_content(cell, &child_ctx, &mut content);
                if span > 1 {
                    out.append(&format!("\\multicolumn{{{span}}}{{l}}{{"));
                    out.append_portion(content);
                    out.append("}");
                } else {
                    out.append_portion(content);
                }
            }
            out.append("\\\\").nl();
        }

        out.append("\\hline").nl();
        out.append("\\end{tabular}").nl().nl();
    }

    // Paragraphs within one cell are joined with spaces; tabular `l`
    // columns have no line breaking to offer
    fn cell_content(&mut self, cell: &Element, ctx: &Context, out: &mut LatexDocumentPortion) {
        let mut first = true;
        for child in cell.child_elements() {
            match child.tag() {
                "text:p" | "text:h" => {
                    if !first {
                        out.append(" ");
                    }
                    first = false;
                    self.inline_content(child, ctx, out);
                },
                "text:list" => {
                    for item in child.child_elements() {
                        for block in item.child_elements() {
                            if block.tag() == "text:p" {
                                if !first {
                                    out.append(" ");
                                }
                                first = false;
                                self.inline_content(block, ctx, out);
                            }
                        }
                    }
                },
                _ => {},
            }
        }
    }

    fn inline_content(&mut self, element: &Element, ctx: &Context, out: &mut LatexDocumentPortion) {
        for node in element.children() {
            match node {
                Node::Text(text) => {
                    let converted = self.i18n.convert(text, ctx);
                    out.append(&converted);
                },
                Node::Element(child) => self.inline_element(child, ctx, out),
            }
        }
    }

    fn inline_element(&mut self, element: &Element, ctx: &Context, out: &mut LatexDocumentPortion) {
        match element.tag() {
            "text:span" => self.span(element, ctx, out),
            "text:a" => self.hyperlink(element, ctx, out),
            "text:note" => self.note(element, ctx, out),
            "office:annotation" => self.annotation(element, ctx, out),
            "draw:frame" => self.frame(element, ctx, out),
            "draw:object" | "math:math" => self.formula(element, ctx, out),
            "text:line-break" => {
                out.append("\\\\").nl();
            },
            "text:tab" => {
                out.append("\\quad ");
            },
            "text:s" => {
                let count = element.int_attribute("text:c").unwrap_or(1).max(1) as usize;
                out.append(&" ".repeat(count));
            },
            "text:bookmark" | "text:bookmark-start" => {
                if let Some(bookmark) = element.attribute("text:name") {
                    out.append(&format!("\\label{{{}}}", util::safe_key(bookmark)));
                }
            },
            "text:bibliography-mark" => self.bibliography_mark(element, out),
            // References keep their display text only
            "text:sequence"
            | "text:sequence-ref"
            | "text:reference-ref"
            | "text:bookmark-ref"
            | "text:note-ref" => {
                let converted = self.i18n.convert(&element.plain_text(), ctx);
                out.append(&converted);
            },
            "text:bookmark-end"
            | "text:reference-mark"
            | "text:reference-mark-start"
            | "text:reference-mark-end"
            | "text:soft-page-break" => {},
            // Unknown inline markup is transparent so its text survives
            _ => self.inline_content(element, ctx, out),
        }
    }

    fn span(&mut self, element: &Element, ctx: &Context, out: &mut LatexDocumentPortion) {
        let style_name = element.attribute("text:style-name").unwrap_or("").to_string();
        let (ba, child_ctx) = styles::character_format(
            self.config,
            self.doc.styles(),
            StyleFamily::Text,
            &style_name,
            ctx,
            self.i18n.as_mut(),
        );

        let pushed = child_ctx.font_name != ctx.font_name
            && self.i18n.push_special_table(&child_ctx.font_name);

        out.append(ba.before());
        self.inline_content(element, &child_ctx, out);
        out.append(ba.after());

        if pushed {
            self.i18n.pop_special_table();
        }
    }

    fn hyperlink(&mut self, element: &Element, ctx: &Context, out: &mut LatexDocumentPortion) {
        let href = element.attribute("xlink:href").unwrap_or("").to_string();
        if href.is_empty() || !self.config.use_hyperref() {
            self.inline_content(element, ctx, out);
            return;
        }

        if let Some(target) = href.strip_prefix('#') {
            out.append(&format!("\\hyperref[{}]{{", util::safe_key(target)));
            self.inline_content(element, ctx, out);
            out.append("}");
        } else {
            out.append(&format!("\\href{{{}}}{{", latex_url(&href)));
            self.inline_content(element, ctx, out);
            out.append("}");
        }
    }

    fn note(&mut self, element: &Element, ctx: &Context, out: &mut LatexDocumentPortion) {
        if ctx.no_footnotes {
            self.diagnostics
                .info("A note inside a heading was dropped");
            return;
        }
        let Some(body) = element.first_child("text:note-body") else {
            return;
        };

        let mut child_ctx = ctx.clone();
        child_ctx.in_footnote = true;
        child_ctx.no_footnotes = true;

        out.append("\\footnote{");
        let mut first = true;
        for paragraph in body.child_elements() {
            if !first {
                out.append(" ");
            }
            first = false;
            self.inline_content(paragraph, &child_ctx, out);
        }
        out.append("}");
    }

    fn annotation(&mut self, element: &Element, ctx: &Context, out: &mut LatexDocumentPortion) {
        let mut text = String::new();
        for child in element.child_elements() {
            if child.tag() == "text:p" {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(&child.plain_text());
            }
        }
        if text.is_empty() {
            return;
        }

        match self.config.notes() {
            Notes::Ignore => {},
            Notes::Comment => {
                out.nl();
                for line in text.lines() {
                    out.append_raw(&format!("% {line}"));
                    out.nl();
                }
            },
            Notes::Marginpar => {
                let mut child_ctx = ctx.clone();
                child_ctx.no_footnotes = true;
                let converted = self.i18n.convert(&text, &child_ctx);
                out.append(&format!("\\marginpar{{\\footnotesize {converted}}}"));
            },
        }
    }

    fn bibliography_mark(&mut self, element: &Element, out: &mut LatexDocumentPortion) {
        let Some(mark) = BibMark::from_element(element) else {
            self.diagnostics
                .warning("A bibliography mark without an identifier was dropped");
            return;
        };
        let key = util::safe_key(mark.identifier());
        out.append(&format!("\\cite{{{key}}}"));
        self.bib_marks.entry(key).or_insert(mark);
    }

    fn formula(&mut self, element: &Element, ctx: &Context, out: &mut LatexDocumentPortion) {
        // StarMath annotations carry the formula source; the MathML tree
        // itself still yields its character content
        let source = element
            .find_descendant("math:annotation")
            .map(|a| a.plain_text())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                element
                    .find_descendant("math:math")
                    .map(|m| m.plain_text())
                    .filter(|s| !s.trim().is_empty())
            });

        match source {
            Some(text) => {
                let mut math_ctx = ctx.clone();
                math_ctx.math_mode = true;
                let converted = self.i18n.convert(text.trim(), &math_ctx);
                self.has_math = true;
                if ctx.math_mode {
                    out.append(&converted);
                } else {
                    out.append("$");
                    out.append(&converted);
                    out.append("$");
                }
            },
            None => {
                self.diagnostics
                    .warning("An embedded object could not be converted");
                out.append("[Object]");
            },
        }
    }

    fn frame(&mut self, element: &Element, ctx: &Context, out: &mut LatexDocumentPortion) {
        if let Some(image) = element.first_child("draw:image") {
            self.image(element, image, out);
            return;
        }
        if let Some(object) = element.first_child("draw:object") {
            self.formula(object, ctx, out);
            return;
        }
        if let Some(text_box) = element.first_child("draw:text-box") {
            let mut child_ctx = ctx.clone();
            child_ctx.in_frame = true;
            for child in text_box.child_elements() {
                self.block_element(child, &child_ctx, out);
            }
        }
    }

    fn image(&mut self, frame: &Element, image: &Element, out: &mut LatexDocumentPortion) {
        self.uses_graphics = true;
        let width = frame
            .attribute("svg:width")
            .and_then(|w| w.parse::<crate::common::Length>().ok());
        let options = match width {
            Some(length) => {
                let value = match self.config.units() {
                    Units::Pt => length.to_unit(LengthUnit::Point).to_string(),
                    Units::Original => length.as_latex(),
                };
                format!("[width={value}]")
            },
            None => String::new(),
        };

        if let Some(data) = image.first_child("office:binary-data") {
            let encoded: String = data
                .plain_text()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            match base64::engine::general_purpose::STANDARD.decode(encoded.as_bytes()) {
                Ok(bytes) => {
                    self.image_count += 1;
                    let (extension, mime) = crate::convert::image_kind(&bytes);
                    let file_name = format!("{}-img{}.{}", self.name, self.image_count, extension);
                    self.images
                        .push(OutputFile::new(file_name.clone(), mime, false, bytes));
                    out.append(&format!("\\includegraphics{options}{{{file_name}}}"));
                },
                Err(_) => {
                    self.diagnostics
                        .warning("Embedded image data could not be decoded");
                },
            }
            return;
        }

        if let Some(href) = image.attribute("xlink:href") {
            // A linked image stays a link; the file is expected next to
            // the output
            self.diagnostics.info(format!(
                "Linked image '{href}' was referenced, not copied"
            ));
            out.append(&format!("\\includegraphics{options}{{{href}}}"));
        }
    }

    fn assemble(mut self, body: LatexDocumentPortion) -> Result<ConverterResult> {
        let mut master = LatexDocumentPortion::new();

        if !self.config.no_preamble() {
            let class = self.config.documentclass();
            let options = self.config.global_options();
            if options.is_empty() {
                master.append(&format!("\\documentclass{{{class}}}"));
            } else {
                master.append(&format!("\\documentclass[{options}]{{{class}}}"));
            }
            master.nl();

            self.i18n.append_declarations(&mut master);
            if self.uses_graphics {
                master.append("\\usepackage{graphicx}").nl();
            }
            if self.config.use_color() {
                master.append("\\usepackage{xcolor}").nl();
            }
            if self.config.use_hyperref() {
                master.append("\\usepackage{hyperref}").nl();
            }
            let custom = self.config.custom_preamble();
            if !custom.is_empty() {
                for line in custom.lines() {
                    master.append_raw(line);
                    master.nl();
                }
            }

            let title = self.doc.meta().title.clone();
            if let Some(title) = &title {
                let ctx = Context::root(&self.doc.language(), &self.doc.country());
                let converted = self.i18n.convert(title, &ctx);
                master.append(&format!("\\title{{{converted}}}")).nl();
                let author = self.doc.meta().author().unwrap_or("").to_string();
                let converted = self.i18n.convert(&author, &ctx);
                master.append(&format!("\\author{{{converted}}}")).nl();
                let date = self
                    .doc
                    .meta()
                    .date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                master.append(&format!("\\date{{{date}}}")).nl();
            }

            master.append("\\begin{document}").nl();
            if title.is_some() {
                master.append("\\maketitle").nl().nl();
            }
        }

        master.append_portion(body);

        let mut bib_file = None;
        if !self.bib_marks.is_empty() {
            bib_file = self.bibliography(&mut master);
        }

        if !self.config.no_preamble() {
            master.append("\\end{document}").nl();
        }

        let wrap = if self.config.wrap_lines() {
            Some(self.config.wrap_lines_after())
        } else {
            None
        };
        let rendered = master.write(wrap);

        let mut result = ConverterResult::new();
        let master_file = OutputFile::new(
            self.master_name(),
            "application/x-latex",
            true,
            rendered.into_bytes(),
        )
        .with_math(self.has_math);
        result.add_master(master_file);

        if let Some(bib) = bib_file {
            let index = result.add(bib);
            result.set_bibliography(index);
        }
        for image in self.images {
            result.add(image);
        }
        for entry in self.outline {
            result.add_content(entry);
        }

        let mut diagnostics = self.diagnostics;
        diagnostics.extend(self.i18n.take_diagnostics());
        result.diagnostics_mut().extend(diagnostics);
        Ok(result)
    }

    /// Write the bibliography block, returning the external database
    /// when one is produced
    fn bibliography(&mut self, master: &mut LatexDocumentPortion) -> Option<OutputFile> {
        #[cfg(feature = "bibtex")]
        if self.config.use_bibtex() {
            let mut database = crate::bibtex::BibtexDocument::new();
            for mark in self.bib_marks.values() {
                database.add(mark);
            }
            master
                .append(&format!(
                    "\\bibliographystyle{{{}}}",
                    self.config.bibtex_style()
                ))
                .nl();
            master.append(&format!("\\bibliography{{{}}}", self.name)).nl();
            return Some(OutputFile::new(
                format!("{}.bib", self.name),
                "application/x-bibtex",
                false,
                database.write().into_bytes(),
            ));
        }

        let ctx = Context::root(&self.doc.language(), &self.doc.country());
        master.append("\\begin{thebibliography}{99}").nl();
        for mark in self.bib_marks.values() {
            let key = util::safe_key(mark.identifier());
            master.append(&format!("\\bibitem{{{key}}} "));
            let text = bibliography_item_text(mark);
            let converted = self.i18n.convert(&text, &ctx);
            master.append(&converted);
            master.nl();
        }
        master.append("\\end{thebibliography}").nl();
        None
    }
}

fn count_columns(element: &Element, columns: &mut usize) {
    for child in element.child_elements() {
        match child.tag() {
            "table:table-column" => {
                *columns += child
                    .int_attribute("table:number-columns-repeated")
                    .unwrap_or(1)
                    .max(1) as usize;
            },
            "table:table-columns" | "table:table-column-group" => {
                count_columns(child, columns);
            },
            _ => {},
        }
    }
}

fn collect_rows<'e>(element: &'e Element, header: bool, rows: &mut Vec<(&'e Element, bool)>) {
    for child in element.child_elements() {
        match child.tag() {
            "table:table-row" => rows.push((child, header)),
            "table:table-header-rows" | "table:table-rows" | "table:table-row-group" => {
                collect_rows(child, header || child.tag() == "table:table-header-rows", rows);
            },
            _ => {},
        }
    }
}

fn latex_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '%' => out.push_str("\\%"),
            '#' => out.push_str("\\#"),
            '{' | '}' | '\\' => {},
            _ => out.push(c),
        }
    }
    out
}

fn bibliography_item_text(mark: &BibMark) -> String {
    let mut parts: Vec<String> = Vec::new();
    for field in [
        BibField::Author,
        BibField::Title,
        BibField::Journal,
        BibField::Booktitle,
        BibField::Publisher,
        BibField::Year,
    ] {
        if let Some(value) = mark.field(field) {
            parts.push(value.to_string());
        }
    }
    if parts.is_empty() {
        mark.identifier().to_string()
    } else {
        format!("{}.", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert_xml(xml: &[u8], adjust: impl Fn(&mut Config)) -> ConverterResult {
        let doc = TextDocument::from_flat_xml(xml).unwrap();
        let mut converter = LatexConverter::new();
        adjust(converter.config_mut());
        converter.convert(&doc, "test").unwrap()
    }

    fn master_text(result: &ConverterResult) -> String {
        let master = result.master().unwrap();
        String::from_utf8(master.bytes().to_vec()).unwrap()
    }

    fn wrap_body(body: &str) -> Vec<u8> {
        format!(
            r#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
              <office:body><office:text>{body}</office:text></office:body>
            </office:document>"#
        )
        .into_bytes()
    }

    #[test]
    fn test_minimal_document() {
        let result = convert_xml(&wrap_body("<text:p>Hello, world!</text:p>"), |_| {});
        let tex = master_text(&result);
        assert!(tex.starts_with("\\documentclass{article}"));
        assert!(tex.contains("\\begin{document}"));
        assert!(tex.contains("Hello, world!"));
        assert!(tex.ends_with("\\end{document}\n"));
        assert_eq!(result.files().len(), 1);
    }

    #[test]
    fn test_heading_and_outline() {
        let result = convert_xml(
            &wrap_body(
                r#"<text:h text:outline-level="1">Intro</text:h>
                   <text:h text:outline-level="2">Detail</text:h>"#,
            ),
            |_| {},
        );
        let tex = master_text(&result);
        assert!(tex.contains("\\section{Intro}"));
        assert!(tex.contains("\\subsection{Detail}"));
        assert_eq!(result.content().len(), 2);
        assert_eq!(result.content()[0].title, "Intro");
        assert_eq!(result.content()[1].level, 2);
    }

    #[test]
    fn test_fragment_without_preamble() {
        let result = convert_xml(&wrap_body("<text:p>Fragment</text:p>"), |c| {
            c.set("no_preamble", "true");
        });
        let tex = master_text(&result);
        assert!(!tex.contains("\\documentclass"));
        assert!(!tex.contains("\\end{document}"));
        assert!(tex.contains("Fragment"));
    }

    #[test]
    fn test_nested_lists() {
        let body = r#"<text:list>
            <text:list-item><text:p>one</text:p></text:list-item>
            <text:list-item>
              <text:p>two</text:p>
              <text:list>
                <text:list-item><text:p>deep</text:p></text:list-item>
              </text:list>
            </text:list-item>
          </text:list>"#;
        let result = convert_xml(&wrap_body(body), |_| {});
        let tex = master_text(&result);
        assert_eq!(tex.matches("\\begin{itemize}").count(), 2);
        assert_eq!(tex.matches("\\end{itemize}").count(), 2);
        assert_eq!(tex.matches("\\item ").count(), 3);
    }

    #[test]
    fn test_ordered_list_from_style() {
        let xml = r#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
              <office:automatic-styles>
                <text:list-style style:name="L1">
                  <text:list-level-style-number text:level="1" style:num-format="1"/>
                </text:list-style>
              </office:automatic-styles>
              <office:body><office:text>
                <text:list text:style-name="L1">
                  <text:list-item><text:p>first</text:p></text:list-item>
                </text:list>
              </office:text></office:body>
            </office:document>"#;
        let result = convert_xml(xml.as_bytes(), |_| {});
        let tex = master_text(&result);
        assert!(tex.contains("\\begin{enumerate}"));
    }

    #[test]
    fn test_nested_list_inherits_style() {
        let xml = r#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
              <office:automatic-styles>
                <text:list-style style:name="L1">
                  <text:list-level-style-number text:level="1" style:num-format="1"/>
                  <text:list-level-style-number text:level="2" style:num-format="a"/>
                </text:list-style>
              </office:automatic-styles>
              <office:body><office:text>
                <text:list text:style-name="L1">
                  <text:list-item>
                    <text:p>outer</text:p>
                    <text:list>
                      <text:list-item><text:p>inner</text:p></text:list-item>
                    </text:list>
                  </text:list-item>
                </text:list>
              </office:text></office:body>
            </office:document>"#;
        let result = convert_xml(xml.as_bytes(), |_| {});
        let tex = master_text(&result);
        assert_eq!(tex.matches("\\begin{enumerate}").count(), 2);
        assert!(!tex.contains("\\begin{itemize}"));
    }

    #[test]
    fn test_table_shape() {
        let body = r#"<table:table>
            <table:table-column table:number-columns-repeated="2"/>
            <table:table-row>
              <table:table-cell><text:p>a</text:p></table:table-cell>
              <table:table-cell><text:p>b</text:p></table:table-cell>
            </table:table-row>
            <table:table-row>
              <table:table-cell><text:p>c</text:p></table:table-cell>
              <table:table-cell><text:p>d</text:p></table:table-cell>
            </table:table-row>
          </table:table>"#;
        let result = convert_xml(&wrap_body(body), |_| {});
        let tex = master_text(&result);
        assert!(tex.contains("\\begin{tabular}{ll}"));
        assert!(tex.contains("a & b\\\\"));
        assert!(tex.contains("c & d\\\\"));
        assert!(tex.contains("\\end{tabular}"));
    }

    #[test]
    fn test_column_span() {
        let body = r#"<table:table>
            <table:table-column table:number-columns-repeated="2"/>
            <table:table-row>
              <table:table-cell table:number-columns-spanned="2"><text:p>wide</text:p></table:table-cell>
              <table:covered-table-cell/>
            </table:table-row>
          </table:table>"#;
        let result = convert_xml(&wrap_body(body), |_| {});
        let tex = master_text(&result);
        assert!(tex.contains("\\multicolumn{2}{l}{wide}"));
    }

    #[test]
    fn test_hyperlink() {
        let body = r#"<text:p>See <text:a xlink:href="https://example.org/a%20b">this</text:a>.</text:p>"#;
        let result = convert_xml(&wrap_body(body), |_| {});
        let tex = master_text(&result);
        assert!(tex.contains("\\href{https://example.org/a\\%20b}{this}"));
        assert!(tex.contains("\\usepackage{hyperref}"));

        let result = convert_xml(&wrap_body(body), |c| c.set("use_hyperref", "false"));
        let tex = master_text(&result);
        assert!(tex.contains("See this."));
        assert!(!tex.contains("\\href"));
    }

    #[test]
    fn test_footnote() {
        let body = r#"<text:p>Claim<text:note text:note-class="footnote">
            <text:note-citation>1</text:note-citation>
            <text:note-body><text:p>Evidence</text:p></text:note-body>
          </text:note>.</text:p>"#;
        let result = convert_xml(&wrap_body(body), |_| {});
        let tex = master_text(&result);
        assert!(tex.contains("Claim\\footnote{Evidence}."));
    }

    #[test]
    fn test_footnote_dropped_in_heading() {
        let body = r#"<text:h text:outline-level="1">T<text:note text:note-class="footnote">
            <text:note-body><text:p>x</text:p></text:note-body>
          </text:note></text:h>"#;
        let result = convert_xml(&wrap_body(body), |_| {});
        let tex = master_text(&result);
        assert!(tex.contains("\\section{T}"));
        assert!(!tex.contains("\\footnote"));
        assert_eq!(result.diagnostics().infos, 1);
    }

    #[test]
    fn test_annotation_modes() {
        let body = r#"<text:p>x<office:annotation>
            <dc:creator>R</dc:creator><text:p>fix this</text:p>
          </office:annotation>y</text:p>"#;

        let result = convert_xml(&wrap_body(body), |_| {});
        assert!(master_text(&result).contains("% fix this"));

        let result = convert_xml(&wrap_body(body), |c| c.set("notes", "marginpar"));
        assert!(master_text(&result).contains("\\marginpar{\\footnotesize fix this}"));

        let result = convert_xml(&wrap_body(body), |c| c.set("notes", "ignore"));
        let tex = master_text(&result);
        assert!(!tex.contains("fix this"));
        assert!(tex.contains("xy"));
    }

    #[test]
    fn test_citation_and_inline_bibliography() {
        let body = r#"<text:p>As shown
            <text:bibliography-mark text:identifier="knuth84" text:bibliography-type="book"
              text:author="Knuth, D." text:title="The TeXbook" text:year="1984">[1]</text:bibliography-mark>
            and again
            <text:bibliography-mark text:identifier="knuth84" text:title="Other"/>.</text:p>"#;
        let result = convert_xml(&wrap_body(body), |_| {});
        let tex = master_text(&result);
        assert_eq!(tex.matches("\\cite{knuth84}").count(), 2);
        assert!(tex.contains("\\begin{thebibliography}{99}"));
        // First mark wins
        assert!(tex.contains("\\bibitem{knuth84} Knuth, D., The TeXbook, 1984."));
        assert!(!tex.contains("Other"));
    }

    #[cfg(feature = "bibtex")]
    #[test]
    fn test_external_bibliography() {
        let body = r#"<text:p><text:bibliography-mark text:identifier="a1"
            text:bibliography-type="article" text:title="T"/>x</text:p>"#;
        let result = convert_xml(&wrap_body(body), |c| c.set("use_bibtex", "true"));
        let tex = master_text(&result);
        assert!(tex.contains("\\bibliographystyle{plain}"));
        assert!(tex.contains("\\bibliography{test}"));
        assert!(!tex.contains("thebibliography"));

        let bib = result.bibliography().unwrap();
        assert_eq!(bib.name(), "test.bib");
        let bib_text = String::from_utf8(bib.bytes().to_vec()).unwrap();
        assert!(bib_text.contains("@ARTICLE{a1,"));
    }

    #[test]
    fn test_embedded_image() {
        // A 1x1 PNG
        let body = r#"<text:p><draw:frame svg:width="2cm"><draw:image>
            <office:binary-data>iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR4nGNg
            YGAAAAAEAAH2FzhVAAAAAElFTkSuQmCC</office:binary-data>
          </draw:image></draw:frame></text:p>"#;
        let result = convert_xml(&wrap_body(body), |_| {});
        let tex = master_text(&result);
        assert!(tex.contains("\\includegraphics[width=2cm]{test-img1.png}"));
        assert!(tex.contains("\\usepackage{graphicx}"));
        assert_eq!(result.files().len(), 2);
        assert_eq!(result.files()[1].name(), "test-img1.png");
        assert!(result.files()[1].bytes().starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_units_option_rewrites_widths() {
        let body = r#"<text:p><draw:frame svg:width="1in"><draw:image>
            <office:binary-data>iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR4nGNg
            YGAAAAAEAAH2FzhVAAAAAElFTkSuQmCC</office:binary-data>
          </draw:image></draw:frame></text:p>"#;

        let result = convert_xml(&wrap_body(body), |_| {});
        assert!(master_text(&result).contains("[width=1in]"));

        let result = convert_xml(&wrap_body(body), |config| {
            config.set("units", "pt");
        });
        assert!(master_text(&result).contains("[width=72pt]"));
    }

    #[test]
    fn test_formula_from_annotation() {
        let body = r#"<text:p>Euler: <draw:frame><draw:object>
            <math:math><math:semantics>
              <math:annotation math:encoding="StarMath 5.0">E = mc2</math:annotation>
            </math:semantics></math:math>
          </draw:object></draw:frame></text:p>"#;
        let result = convert_xml(&wrap_body(body), |_| {});
        let tex = master_text(&result);
        assert!(tex.contains("Euler: $E = mc2$"));
        assert!(result.master().unwrap().contains_math());
    }

    #[test]
    fn test_title_block_from_meta() {
        let xml = br#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
          <office:meta><dc:title>My Thesis</dc:title><dc:creator>A. Writer</dc:creator></office:meta>
          <office:body><office:text><text:p>Body</text:p></office:text></office:body>
        </office:document>"#;
        let result = convert_xml(xml, |_| {});
        let tex = master_text(&result);
        assert!(tex.contains("\\title{My Thesis}"));
        assert!(tex.contains("\\author{A. Writer}"));
        assert!(tex.contains("\\maketitle"));
    }

    #[test]
    fn test_bookmarks_and_internal_links() {
        let body = r##"<text:p><text:bookmark text:name="sec one"/>Here.
            <text:a xlink:href="#sec one">back</text:a></text:p>"##;
        let result = convert_xml(&wrap_body(body), |_| {});
        let tex = master_text(&result);
        assert!(tex.contains("\\label{sec-one}"));
        assert!(tex.contains("\\hyperref[sec-one]{back}"));
    }

    #[test]
    fn test_line_break_tab_and_spaces() {
        let body =
            r#"<text:p>a<text:line-break/>b<text:tab/>c<text:s text:c="3"/>d</text:p>"#;
        let result = convert_xml(&wrap_body(body), |_| {});
        let tex = master_text(&result);
        assert!(tex.contains("a\\\\\nb\\quad c   d"));
    }

    #[test]
    fn test_page_break_before() {
        let xml = br#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
          <office:automatic-styles>
            <style:style style:name="P1" style:family="paragraph">
              <style:paragraph-properties fo:break-before="page"/>
            </style:style>
          </office:automatic-styles>
          <office:body><office:text>
            <text:p>first page</text:p>
            <text:p text:style-name="P1">second page</text:p>
          </office:text></office:body>
        </office:document>"#;
        let result = convert_xml(xml, |_| {});
        let tex = master_text(&result);
        assert!(tex.contains("\\clearpage\nsecond page"));
    }

    #[test]
    fn test_cyrillic_paragraph_end_to_end() {
        let result = convert_xml(&wrap_body("<text:p>Да</text:p>"), |_| {});
        let tex = master_text(&result);
        assert!(tex.contains("{\\fontencoding{T2A}\\selectfont \\CYRD{}\\cyra{}}"));
        assert!(tex.contains("\\usepackage[T2A,T1]{fontenc}"));
    }

    #[test]
    fn test_xetex_backend_passthrough() {
        let result = convert_xml(&wrap_body("<text:p>Да</text:p>"), |c| {
            c.set("backend", "xetex");
        });
        let tex = master_text(&result);
        assert!(tex.contains("Да"));
        assert!(tex.contains("\\usepackage{fontspec}"));
        assert!(!tex.contains("fontenc"));
    }
}
