//! XHTML and EPUB content output.
//!
//! The converter renders the document as one or more XHTML pages. The
//! plain flavor targets XHTML 1.1; the EPUB flavor produces XHTML5
//! content documents with `epub:` semantics, ready to be packaged into
//! a container by the caller. Both walk the same structures: character
//! data passes through unchanged (the output is UTF-8), formatting
//! becomes CSS classes or inline styles, and footnotes collect into a
//! back-linked section at the end of each page.

pub mod dom;

use crate::common::{Diagnostics, Error, Result};
use crate::config::{Config, Formatting, Notes};
use crate::convert::{image_kind, ContentEntry, Converter, ConverterResult, OutputFile};
use crate::office::element::{Element, Node};
use crate::office::style::{StyleFamily, StyleRegistry};
use crate::office::TextDocument;
use base64::Engine as _;
use dom::{Doctype, XhtmlDocument};

// Replaced by the body markup when a custom template is in use
const CONTENT_MARK: &str = "<!-- content -->";
const TITLE_MARK: &str = "<!-- title -->";

/// Converts OpenDocument text to XHTML pages.
///
/// # Examples
///
/// ```rust,no_run
/// use longan::xhtml::XhtmlConverter;
/// use longan::convert::Converter;
/// use longan::office::TextDocument;
///
/// # fn main() -> longan::Result<()> {
/// let doc = TextDocument::open("manual.fodt")?;
/// let mut converter = XhtmlConverter::new();
/// converter.apply_option("split_level", "1")?;
/// let result = converter.convert(&doc, "manual")?;
/// result.write_all("site".as_ref())?;
/// # Ok(())
/// # }
/// ```
pub struct XhtmlConverter {
    config: Config,
    epub: bool,
    template: Option<String>,
}

impl XhtmlConverter {
    /// Create a converter producing XHTML 1.1
    pub fn new() -> Self {
        Self {
            config: Config::new(),
            epub: false,
            template: None,
        }
    }

    /// Create a converter producing EPUB content documents
    pub fn epub() -> Self {
        Self {
            epub: true,
            ..Self::new()
        }
    }
}

impl Default for XhtmlConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for XhtmlConverter {
    fn config(&self) -> &Config {
        &self.config
    }

    fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    fn read_template(&mut self, bytes: &[u8]) -> Result<()> {
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|_| Error::InvalidFormat("template is not valid UTF-8".to_string()))?;
        self.template = Some(text);
        Ok(())
    }

    fn convert(&mut self, document: &TextDocument, name: &str) -> Result<ConverterResult> {
        let mut walker = PageWalker::new(&self.config, document, name, self.epub);
        walker.walk();
        walker.assemble(self.template.as_deref())
    }
}

/// Flags that travel down the tree walk
#[derive(Clone, Default)]
struct State {
    no_footnotes: bool,
    list_level: u8,
    list_style: String,
}

struct PageWalker<'a> {
    config: &'a Config,
    doc: &'a TextDocument,
    name: &'a str,
    epub: bool,
    doctype: Doctype,
    lang: String,
    diagnostics: Diagnostics,
    pages: Vec<XhtmlDocument>,
    page: XhtmlDocument,
    page_math: Vec<bool>,
    has_math: bool,
    outline: Vec<ContentEntry>,
    notes: Vec<(usize, &'a Element)>,
    note_count: usize,
    heading_count: usize,
    images: Vec<OutputFile>,
    image_count: usize,
    bib_part: Option<usize>,
    template_warned: bool,
}

impl<'a> PageWalker<'a> {
    fn new(config: &'a Config, doc: &'a TextDocument, name: &'a str, epub: bool) -> Self {
        let doctype = if epub { Doctype::Epub3 } else { Doctype::Xhtml11 };
        let language = doc.language();
        let country = doc.country();
        let lang = if country.is_empty() {
            language
        } else {
            format!("{language}-{country}")
        };

        let mut walker = Self {
            config,
            doc,
            name,
            epub,
            doctype,
            lang,
            diagnostics: Diagnostics::new(),
            pages: Vec::new(),
            page: XhtmlDocument::new(doctype),
            page_math: Vec::new(),
            has_math: false,
            outline: Vec::new(),
            notes: Vec::new(),
            note_count: 0,
            heading_count: 0,
            images: Vec::new(),
            image_count: 0,
            bib_part: None,
            template_warned: false,
        };
        walker.page = walker.fresh_page();
        walker
    }

    fn fresh_page(&self) -> XhtmlDocument {
        let mut page = XhtmlDocument::new(self.doctype);
        page.set_title(self.doc.meta().title.as_deref().unwrap_or(self.name));
        page.set_lang(&self.lang);
        page.set_stylesheet("styles.css");
        page
    }

    fn part_name(&self, index: usize) -> String {
        if index == 0 {
            format!("{}.xhtml", self.name)
        } else {
            format!("{}{}.xhtml", self.name, index)
        }
    }

    fn toc_name(&self) -> String {
        format!("{}-toc.xhtml", self.name)
    }

    fn walk(&mut self) {
        self.title_block();
        let doc = self.doc;
        let state = State::default();
        for child in doc.content().child_elements() {
            self.block(child, &state);
        }
        self.finish_part();
    }

    // The plain flavor puts the title block at the top of the first
    // page; the EPUB flavor gets a separate title page instead
    fn title_block(&mut self) {
        if self.epub {
            return;
        }
        let meta = self.doc.meta();
        let Some(title) = meta.title.clone() else {
            return;
        };
        self.page.open("div").attr("class", "title-page");
        self.page.open("h1").attr("class", "title").text(&title).close();
        if let Some(author) = meta.author() {
            let author = author.to_string();
            self.page
                .open("p")
                .attr("class", "author")
                .text(&author)
                .close();
        }
        self.page.close();
    }

    fn block(&mut self, element: &'a Element, state: &State) {
        match element.tag() {
            "text:h" => self.heading(element, state),
            "text:p" => self.paragraph(element, state),
            "text:list" => self.list(element, state),
            "table:table" => self.table(element, state),
            "text:section" => {
                for child in element.child_elements() {
                    self.block(child, state);
                }
            },
            // The contents page is regenerated from the outline
            "text:table-of-content" => {},
            "text:bibliography" => {
                self.bib_part = Some(self.pages.len());
                if let Some(body) = element.first_child("text:index-body") {
                    for child in body.child_elements() {
                        self.block(child, state);
                    }
                }
            },
            "draw:frame" => self.frame(element, state),
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

    fn heading(&mut self, element: &'a Element, state: &State) {
        let level = element
            .int_attribute("text:outline-level")
            .unwrap_or(1)
            .clamp(1, 10) as u8;
        let split = self.config.split_level();
        if split > 0 && level <= split && !self.page.is_empty() {
            self.finish_part();
        }

        self.heading_count += 1;
        let anchor = format!("h{}", self.heading_count);
        let tag = format!("h{}", level.min(6));
        let style_name = element.attribute("text:style-name").unwrap_or("").to_string();
        let deco = self.decorations(StyleFamily::Paragraph, &style_name);

        self.page.open(&tag).attr("id", &anchor);
        apply_decorations(&mut self.page, &deco);
        let mut child = state.clone();
        child.no_footnotes = true;
        self.inline_children(element, &child);
        self.page.close();

        self.outline.push(ContentEntry::new(
            element.plain_text(),
            level,
            self.part_name(self.pages.len()),
            anchor,
        ));
    }

    fn paragraph(&mut self, element: &'a Element, state: &State) {
        let style_name = element.attribute("text:style-name").unwrap_or("").to_string();
        let deco = self.decorations(StyleFamily::Paragraph, &style_name);
        self.page.open("p");
        apply_decorations(&mut self.page, &deco);
        self.inline_children(element, state);
        self.page.close();
    }

    fn list(&mut self, element: &'a Element, state: &State) {
        let level = state.list_level + 1;
        let style_name = element
            .attribute("text:style-name")
            .unwrap_or(state.list_style.as_str())
            .to_string();
        let ordered = self
            .doc
            .styles()
            .list_style(&style_name)
            .map(|s| s.is_ordered(level))
            .unwrap_or(false);

        let mut child = state.clone();
        child.list_level = level;
        child.list_style = style_name;

        self.page.open(if ordered { "ol" } else { "ul" });
        for item in element.child_elements() {
            if !matches!(item.tag(), "text:list-item" | "text:list-header") {
                continue;
            }
            self.page.open("li");
            for block in item.child_elements() {
                self.block(block, &child);
            }
            self.page.close();
        }
        self.page.close();
    }

    fn table(&mut self, element: &'a Element, state: &State) {
        self.page.open("table");
        self.collect_rows(element, state);
        self.page.close();
    }

    fn collect_rows(&mut self, element: &'a Element, state: &State) {
        for child in element.child_elements() {
            match child.tag() {
                "table:table-row" => {
                    self.page.open("tr");
                    for cell in child.child_elements() {
                        if cell.tag() != "table:table-cell" {
                            continue;
                        }
                        self.page.open("td");
                        let span = cell
                            .int_attribute("table:number-columns-spanned")
                            .unwrap_or(1);
                        if span > 1 {
                            self.page.attr("colspan", &span.to_string());
                        }
                        for block in cell.child_elements() {
                            self.block(block, state);
                        }
                        self.page.close();
                    }
                    self.page.close();
                },
                "table:table-header-rows" | "table:table-rows" | "table:table-row-group" => {
                    self.collect_rows(child, state);
                },
                _ => {},
            }
        }
    }

    fn inline_children(&mut self, element: &'a Element, state: &State) {
        for node in element.children() {
            match node {
                Node::Text(text) => {
                    self.page.text(text);
                },
                Node::Element(child) => self.inline(child, state),
            }
        }
    }

    fn inline(&mut self, element: &'a Element, state: &State) {
        match element.tag() {
            "text:span" => self.span(element, state),
            "text:a" => self.hyperlink(element, state),
            "text:note" => self.note(element, state),
            "office:annotation" => self.annotation(element),
            "draw:frame" => self.frame(element, state),
            "draw:object" | "math:math" => self.formula(element),
            "text:line-break" => {
                self.page.open("br").close();
            },
            "text:tab" => {
                self.page.text("\u{00A0}\u{00A0}\u{00A0}\u{00A0}");
            },
            "text:s" => {
                let count = element.int_attribute("text:c").unwrap_or(1).max(1) as usize;
                self.page.text(&"\u{00A0}".repeat(count));
            },
            "text:bookmark" | "text:bookmark-start" => {
                if let Some(bookmark) = element.attribute("text:name") {
                    self.page.open("a").attr("id", &css_name(bookmark)).close();
                }
            },
            // The formatted citation text the office suite generated
            "text:bibliography-mark" => self.inline_children(element, state),
            "text:sequence"
            | "text:sequence-ref"
            | "text:reference-ref"
            | "text:bookmark-ref"
            | "text:note-ref" => {
                self.page.text(&element.plain_text());
            },
            "text:bookmark-end"
            | "text:reference-mark"
            | "text:reference-mark-start"
            | "text:reference-mark-end"
            | "text:soft-page-break" => {},
            _ => self.inline_children(element, state),
        }
    }

    fn span(&mut self, element: &'a Element, state: &State) {
        let style_name = element.attribute("text:style-name").unwrap_or("").to_string();
        let deco = self.decorations(StyleFamily::Text, &style_name);

        if deco.sub {
            self.page.open("sub");
        } else if deco.sup {
            self.page.open("sup");
        }
        let wrapped = deco.class.is_some() || deco.css.is_some() || deco.lang.is_some();
        if wrapped {
            self.page.open("span");
            apply_decorations(&mut self.page, &deco);
        }
        self.inline_children(element, state);
        if wrapped {
            self.page.close();
        }
        if deco.sub || deco.sup {
            self.page.close();
        }
    }

    fn hyperlink(&mut self, element: &'a Element, state: &State) {
        let href = element.attribute("xlink:href").unwrap_or("").to_string();
        if href.is_empty() {
            self.inline_children(element, state);
            return;
        }
        let href = match href.strip_prefix('#') {
            Some(target) => format!("#{}", css_name(target)),
            None => href,
        };
        self.page.open("a").attr("href", &href);
        self.inline_children(element, state);
        self.page.close();
    }

    fn note(&mut self, element: &'a Element, state: &State) {
        if state.no_footnotes {
            self.diagnostics.info("A note inside a heading was dropped");
            return;
        }
        let Some(body) = element.first_child("text:note-body") else {
            return;
        };

        self.note_count += 1;
        let n = self.note_count;
        self.page
            .open("a")
            .attr("class", "footnote-ref")
            .attr("id", &format!("ftnref{n}"))
            .attr("href", &format!("#ftn{n}"));
        if self.epub {
            self.page.attr("epub:type", "noteref");
        }
        self.page.open("sup").text(&format!("[{n}]")).close();
        self.page.close();
        self.notes.push((n, body));
    }

    fn annotation(&mut self, element: &'a Element) {
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
                self.page.comment(&text);
            },
            Notes::Marginpar => {
                self.page
                    .open("span")
                    .attr("class", "annotation")
                    .text(&text)
                    .close();
            },
        }
    }

    fn frame(&mut self, element: &'a Element, state: &State) {
        if let Some(image) = element.first_child("draw:image") {
            self.image(element, image);
            return;
        }
        if let Some(object) = element.first_child("draw:object") {
            self.formula(object);
            return;
        }
        if let Some(text_box) = element.first_child("draw:text-box") {
            self.page.open("div").attr("class", "frame");
            for child in text_box.child_elements() {
                self.block(child, state);
            }
            self.page.close();
        }
    }

    fn image(&mut self, frame: &'a Element, image: &'a Element) {
        let alt = frame.attribute("draw:name").unwrap_or("").to_string();
        let width = frame
            .attribute("svg:width")
            .and_then(|w| w.parse::<crate::common::Length>().ok())
            .map(|l| format!("width: {}", l.as_css()));

        if let Some(data) = image.first_child("office:binary-data") {
            let encoded: String = data
                .plain_text()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            match base64::engine::general_purpose::STANDARD.decode(encoded.as_bytes()) {
                Ok(bytes) => {
                    self.image_count += 1;
                    let (extension, mime) = image_kind(&bytes);
                    let file_name = format!("{}-img{}.{}", self.name, self.image_count, extension);
                    self.images
                        .push(OutputFile::new(file_name.clone(), mime, false, bytes));
                    self.img_tag(&file_name, &alt, width.as_deref());
                },
                Err(_) => {
                    self.diagnostics
                        .warning("Embedded image data could not be decoded");
                },
            }
            return;
        }

        if let Some(href) = image.attribute("xlink:href") {
            let href = href.to_string();
            self.diagnostics.info(format!(
                "Linked image '{href}' was referenced, not copied"
            ));
            self.img_tag(&href, &alt, width.as_deref());
        }
    }

    fn img_tag(&mut self, src: &str, alt: &str, width: Option<&str>) {
        self.page.open("img").attr("src", src).attr("alt", alt);
        if let Some(width) = width {
            self.page.attr("style", width);
        }
        self.page.close();
    }

    fn formula(&mut self, element: &'a Element) {
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
                self.has_math = true;
                self.page
                    .open("span")
                    .attr("class", "formula")
                    .text(text.trim())
                    .close();
            },
            None => {
                self.diagnostics
                    .warning("An embedded object could not be converted");
                self.page.text("[Object]");
            },
        }
    }

    fn finish_part(&mut self) {
        self.flush_notes();
        if self.page.is_empty() && !self.pages.is_empty() {
            self.has_math = false;
            return;
        }
        let fresh = self.fresh_page();
        let page = std::mem::replace(&mut self.page, fresh);
        self.pages.push(page);
        self.page_math.push(self.has_math);
        self.has_math = false;
    }

    fn flush_notes(&mut self) {
        if self.notes.is_empty() {
            return;
        }
        self.page.open("hr").close();
        self.page.open("div").attr("class", "footnotes");
        if self.epub {
            self.page.attr("epub:type", "footnotes");
        }
        let state = State {
            no_footnotes: true,
            ..State::default()
        };
        let notes = std::mem::take(&mut self.notes);
        for (n, body) in notes {
            self.page.open("p").attr("class", "footnote");
            self.page
                .open("a")
                .attr("class", "footnote-anchor")
                .attr("id", &format!("ftn{n}"))
                .attr("href", &format!("#ftnref{n}"))
                .text(&format!("[{n}]"))
                .close();
            for paragraph in body.child_elements() {
                self.page.text(" ");
                self.inline_children(paragraph, &state);
            }
            self.page.close();
        }
        self.page.close();
    }

    /// Inline style, class, and language for one styled element
    fn decorations(&self, family: StyleFamily, style_name: &str) -> Decorations {
        let mut deco = Decorations::default();
        if style_name.is_empty() || self.config.formatting() == Formatting::IgnoreAll {
            return deco;
        }
        let registry = self.doc.styles();
        let Some(style) = registry.style(family, style_name) else {
            return deco;
        };

        if let Some(position) = registry.property(family, style_name, "style:text-position", true) {
            if position.starts_with("sub") {
                deco.sub = true;
            } else if position.starts_with("super") {
                deco.sup = true;
            }
        }

        if style.is_automatic() {
            let decls = css_declarations(self.config, registry, family, style_name);
            if !decls.is_empty() {
                let css: Vec<String> =
                    decls.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                deco.css = Some(css.join("; "));
            }
        } else {
            deco.class = Some(css_name(style_name));
        }

        if self.config.formatting() >= Formatting::ConvertMost {
            if let Some(language) = registry.property(family, style_name, "fo:language", true) {
                if language != "none" {
                    let lang = match registry.property(family, style_name, "fo:country", true) {
                        Some(country) if country != "none" => format!("{language}-{country}"),
                        _ => language.to_string(),
                    };
                    deco.lang = Some(lang);
                }
            }
        }
        deco
    }

    fn assemble(mut self, template: Option<&str>) -> Result<ConverterResult> {
        let mut result = ConverterResult::new();
        let parts = self.pages.len();
        let split = parts > 1;
        let toc_name = self.toc_name();

        // Reading order: cover, title page, contents, then the parts
        let mut cover_page = self.cover_page();
        let mut title_page = self.title_page();
        let mut toc_page = if split { Some(self.toc_page()) } else { None };

        if let Some(page) = &mut cover_page {
            let bytes = self.render(page, template).into_bytes();
            let index = result.add_master(OutputFile::new(
                format!("{}-cover.xhtml", self.name),
                "application/xhtml+xml",
                true,
                bytes,
            ));
            result.set_cover(index);
        }
        if let Some(page) = &mut title_page {
            let bytes = self.render(page, template).into_bytes();
            let index = result.add_master(OutputFile::new(
                format!("{}-title.xhtml", self.name),
                "application/xhtml+xml",
                true,
                bytes,
            ));
            result.set_title_page(index);
        }
        if let Some(page) = &mut toc_page {
            let bytes = self.render(page, template).into_bytes();
            let index = result.add_master(OutputFile::new(
                toc_name.clone(),
                "application/xhtml+xml",
                true,
                bytes,
            ));
            result.set_toc(index);
        }

        let mut part_indices = Vec::with_capacity(parts);
        let pages = std::mem::take(&mut self.pages);
        for (i, mut page) in pages.into_iter().enumerate() {
            if split {
                self.navigation(&mut page, i, parts, &toc_name);
            }
            let bytes = self.render(&mut page, template).into_bytes();
            let index = result.add_master(
                OutputFile::new(
                    self.part_name(i),
                    "application/xhtml+xml",
                    true,
                    bytes,
                )
                .with_math(self.page_math[i]),
            );
            part_indices.push(index);
        }

        if let Some(part) = self.bib_part {
            if let Some(&index) = part_indices.get(part) {
                result.set_bibliography(index);
            }
        }

        result.add(OutputFile::new(
            "styles.css".to_string(),
            "text/css",
            false,
            generate_css(self.config, self.doc.styles()).into_bytes(),
        ));
        for image in self.images {
            result.add(image);
        }
        for entry in self.outline {
            result.add_content(entry);
        }
        result.diagnostics_mut().extend(self.diagnostics);
        Ok(result)
    }

    fn cover_page(&self) -> Option<XhtmlDocument> {
        let cover = self.config.cover_image();
        if cover.is_empty() {
            return None;
        }
        let cover = cover.to_string();
        let mut page = self.fresh_page();
        page.open("div").attr("class", "cover");
        page.open("img").attr("src", &cover).attr("alt", "").close();
        page.close();
        Some(page)
    }

    fn title_page(&self) -> Option<XhtmlDocument> {
        if !self.epub {
            return None;
        }
        let meta = self.doc.meta();
        let title = meta.title.clone()?;
        let mut page = self.fresh_page();
        page.open("div").attr("class", "title-page");
        page.open("h1").attr("class", "title").text(&title).close();
        if let Some(author) = meta.author() {
            let author = author.to_string();
            page.open("p").attr("class", "author").text(&author).close();
        }
        page.close();
        Some(page)
    }

    fn toc_page(&self) -> XhtmlDocument {
        let mut page = self.fresh_page();
        let heading = self
            .doc
            .meta()
            .title
            .clone()
            .unwrap_or_else(|| "Contents".to_string());
        page.open("h1").text(&heading).close();
        page.open("ul").attr("class", "toc");
        if self.epub {
            page.attr("epub:type", "toc");
        }
        for entry in &self.outline {
            page.open("li").attr("class", &format!("toc{}", entry.level));
            page.open("a").attr("href", &entry.href());
            page.text(&entry.title);
            page.close().close();
        }
        page.close();
        page
    }

    fn navigation(&self, page: &mut XhtmlDocument, index: usize, parts: usize, toc_name: &str) {
        page.open("div").attr("class", "navigation");
        if index > 0 {
            page.open("a")
                .attr("href", &self.part_name(index - 1))
                .text("previous")
                .close();
            page.text(" ");
        }
        page.open("a").attr("href", toc_name).text("contents").close();
        if index + 1 < parts {
            page.text(" ");
            page.open("a")
                .attr("href", &self.part_name(index + 1))
                .text("next")
                .close();
        }
        page.close();
    }

    fn render(&mut self, page: &mut XhtmlDocument, template: Option<&str>) -> String {
        match template {
            Some(template) if template.contains(CONTENT_MARK) => {
                let title = self.doc.meta().title.clone().unwrap_or_default();
                template
                    .replace(CONTENT_MARK, &page.write_body())
                    .replace(TITLE_MARK, &dom::escape_xml(&title))
            },
            Some(_) => {
                if !self.template_warned {
                    self.diagnostics.warning(format!(
                        "The template has no '{CONTENT_MARK}' marker; using the built-in page"
                    ));
                    self.template_warned = true;
                }
                page.write()
            },
            None => page.write(),
        }
    }
}

#[derive(Default)]
struct Decorations {
    class: Option<String>,
    css: Option<String>,
    lang: Option<String>,
    sub: bool,
    sup: bool,
}

fn apply_decorations(page: &mut XhtmlDocument, deco: &Decorations) {
    if let Some(class) = &deco.class {
        page.attr("class", class);
    }
    if let Some(css) = &deco.css {
        page.attr("style", css);
    }
    if let Some(lang) = &deco.lang {
        page.attr("xml:lang", lang);
    }
}

/// CSS declarations for one style, honoring the formatting level
fn css_declarations(
    config: &Config,
    registry: &StyleRegistry,
    family: StyleFamily,
    name: &str,
) -> Vec<(&'static str, String)> {
    let formatting = config.formatting();
    if formatting == Formatting::IgnoreAll {
        return Vec::new();
    }
    let prop = |attr: &str| registry.property(family, name, attr, true);
    let mut decls: Vec<(&'static str, String)> = Vec::new();

    if let Some(weight) = prop("fo:font-weight") {
        decls.push(("font-weight", weight.to_string()));
    }
    if let Some(style) = prop("fo:font-style") {
        decls.push(("font-style", style.to_string()));
    }
    if prop("fo:font-variant") == Some("small-caps") {
        decls.push(("font-variant", "small-caps".to_string()));
    }
    if prop("style:text-underline-style").is_some_and(|u| u != "none") {
        decls.push(("text-decoration", "underline".to_string()));
    }
    if prop("style:font-name").is_some_and(is_fixed_pitch) {
        decls.push(("font-family", "monospace".to_string()));
    }

    if formatting >= Formatting::ConvertMost {
        if let Some(size) = prop("fo:font-size") {
            decls.push(("font-size", size.to_string()));
        }
        if let Some(align) = prop("fo:text-align") {
            let align = match align {
                "start" => "left",
                "end" => "right",
                other => other,
            };
            decls.push(("text-align", align.to_string()));
        }
        if config.use_color() {
            if let Some(color) = prop("fo:color") {
                decls.push(("color", color.to_string()));
            }
        }
    }
    decls
}

fn is_fixed_pitch(font_name: &str) -> bool {
    let name = font_name.to_lowercase();
    name.contains("mono") || name.contains("courier") || name.contains("consol")
}

/// A stylesheet with base rules plus one rule per named style
fn generate_css(config: &Config, registry: &StyleRegistry) -> String {
    let mut out = String::from(
        "body {\n  margin: 2em;\n}\n\
         .footnotes {\n  font-size: smaller;\n}\n\
         .navigation {\n  margin-top: 2em;\n}\n\
         .formula {\n  font-style: italic;\n}\n",
    );
    for family in [StyleFamily::Paragraph, StyleFamily::Text] {
        for style in registry.family_styles(family) {
            if style.is_automatic() {
                continue;
            }
            let decls = css_declarations(config, registry, family, style.name());
            if decls.is_empty() {
                continue;
            }
            out.push_str(&format!(".{} {{\n", css_name(style.name())));
            for (key, value) in decls {
                out.push_str(&format!("  {key}: {value};\n"));
            }
            out.push_str("}\n");
        }
    }
    out
}

// Class names and fragment identifiers share the same safe alphabet
fn css_name(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        cleaned
    } else {
        format!("s{cleaned}")
    }
}
