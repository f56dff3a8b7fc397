//! End-to-end LaTeX conversion tests.
//!
//! These drive the public API the way the command line does: parse a
//! flat ODF document, convert, and check the produced file set.

#![cfg(feature = "latex")]

use longan::convert::{make_converter, Converter, OutputFormat};
use longan::latex::LatexConverter;
use longan::office::TextDocument;

const ARTICLE: &[u8] = br#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
  <office:meta>
    <dc:title>A Field Guide to Conversion</dc:title>
    <dc:creator>R. Harden</dc:creator>
    <dc:date>2024-03-07T09:30:00</dc:date>
  </office:meta>
  <office:styles>
    <style:default-style style:family="paragraph">
      <style:text-properties fo:language="en" fo:country="US"/>
    </style:default-style>
  </office:styles>
  <office:automatic-styles>
    <style:style style:name="T1" style:family="text">
      <style:text-properties fo:font-weight="bold"/>
    </style:style>
  </office:automatic-styles>
  <office:body><office:text>
    <text:h text:outline-level="1">Scope</text:h>
    <text:p>The field is <text:span text:style-name="T1">wide</text:span><text:note text:note-class="footnote"><text:note-citation>1</text:note-citation><text:note-body><text:p>Wider than it looks.</text:p></text:note-body></text:note> and the literature deep <text:bibliography-mark text:identifier="hart1968" text:bibliography-type="book" text:author="Hart, H." text:title="Rules for Compositors" text:year="1968">[Hart 1968]</text:bibliography-mark>.</text:p>
    <text:h text:outline-level="2">Method</text:h>
    <text:list>
      <text:list-item><text:p>collect documents</text:p></text:list-item>
      <text:list-item><text:p>convert them</text:p></text:list-item>
    </text:list>
    <table:table>
      <table:table-column table:number-columns-repeated="2"/>
      <table:table-row>
        <table:table-cell><text:p>input</text:p></table:table-cell>
        <table:table-cell><text:p>output</text:p></table:table-cell>
      </table:table-row>
    </table:table>
    <text:p>See <text:a xlink:href="https://example.org/guide">the guide</text:a>.</text:p>
  </office:text></office:body>
</office:document>"#;

fn convert(xml: &[u8], adjust: impl Fn(&mut dyn Converter)) -> longan::ConverterResult {
    let document = TextDocument::from_flat_xml(xml).expect("parse document");
    let mut converter = LatexConverter::new();
    adjust(&mut converter);
    converter.convert(&document, "guide").expect("convert")
}

fn master_text(result: &longan::ConverterResult) -> String {
    let master = result.master().expect("master file");
    String::from_utf8(master.bytes().to_vec()).expect("utf-8 master")
}

fn position(tex: &str, needle: &str) -> usize {
    tex.find(needle)
        .unwrap_or_else(|| panic!("missing '{needle}' in:\n{tex}"))
}

#[test]
fn test_article_end_to_end() {
    let result = convert(ARTICLE, |_| {});
    let master = result.master().expect("master file");
    assert_eq!(master.name(), "guide.tex");
    assert_eq!(master.mime(), "application/x-latex");
    assert!(master.is_master());

    let tex = master_text(&result);
    let landmarks = [
        "\\documentclass{article}",
        "\\usepackage{hyperref}",
        "\\title{A Field Guide to Conversion}",
        "\\author{R. Harden}",
        "\\date{2024-03-07}",
        "\\begin{document}",
        "\\maketitle",
        "\\section{Scope}",
        "\\subsection{Method}",
        "\\begin{thebibliography}{99}",
        "\\end{document}",
    ];
    let mut last = 0;
    for landmark in landmarks {
        let at = position(&tex, landmark);
        assert!(at >= last, "'{landmark}' out of order");
        last = at;
    }

    assert!(tex.contains("\\textbf{wide}"));
    assert!(tex.contains("\\footnote{Wider than it looks.}"));
    assert!(tex.contains("\\cite{hart1968}"));
    assert!(tex.contains("\\bibitem{hart1968} Hart, H., Rules for Compositors, 1968."));
    assert!(tex.contains("\\href{https://example.org/guide}{the guide}"));
    assert_eq!(tex.matches("\\item ").count(), 2);
    assert!(tex.contains("\\begin{tabular}{ll}"));

    assert_eq!(result.content().len(), 2);
    assert_eq!(result.content()[0].title, "Scope");
    assert_eq!(result.content()[1].title, "Method");

    assert!(tex.is_ascii());
    assert!(result.diagnostics().is_empty());
}

#[test]
fn test_config_file_layering() {
    let document = TextDocument::from_flat_xml(ARTICLE).expect("parse document");
    let mut converter = LatexConverter::new();
    converter
        .read_config(
            br#"<config>
              <option name="documentclass" value="book"/>
              <option name="global_options" value="11pt"/>
              <option name="zz_unknown_key" value="ignored"/>
            </config>"#,
        )
        .expect("read config");
    converter.apply_option("documentclass", "memoir").expect("apply option");

    let result = converter.convert(&document, "guide").expect("convert");
    let tex = master_text(&result);
    assert!(tex.starts_with("\\documentclass[11pt]{memoir}"));
}

#[test]
fn test_builtin_clean_profile_drops_formatting() {
    let plain = convert(ARTICLE, |c| {
        c.apply_option("ConfigURL", "*clean").expect("builtin config");
    });
    assert!(!master_text(&plain).contains("\\textbf{"));

    let formatted = convert(ARTICLE, |_| {});
    assert!(master_text(&formatted).contains("\\textbf{wide}"));
}

#[test]
fn test_line_wrapping() {
    let sentence = "A moderately long sentence keeps repeating itself for this check. ".repeat(12);
    let xml = format!(
        r#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
          <office:body><office:text><text:p>{sentence}</text:p></office:text></office:body>
        </office:document>"#
    );

    let wrapped = convert(xml.as_bytes(), |_| {});
    let tex = master_text(&wrapped);
    assert!(tex.lines().all(|line| line.len() <= 96));

    let unwrapped = convert(xml.as_bytes(), |c| {
        c.config_mut().set("wrap_lines", "false");
    });
    let tex = master_text(&unwrapped);
    assert!(tex.lines().any(|line| line.len() > 96));
}

#[test]
fn test_multilingual_classic_backend() {
    let xml = r#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
      <office:styles>
        <style:default-style style:family="paragraph">
          <style:text-properties fo:language="en" fo:country="US"/>
        </style:default-style>
      </office:styles>
      <office:automatic-styles>
        <style:style style:name="T1" style:family="text">
          <style:text-properties fo:language="ru" fo:country="RU"/>
        </style:style>
      </office:automatic-styles>
      <office:body><office:text>
        <text:p>He said <text:span text:style-name="T1">Привет</text:span> and left.</text:p>
      </office:text></office:body>
    </office:document>"#;

    let result = convert(xml.as_bytes(), |c| {
        c.config_mut().set("formatting", "convert_most");
    });
    let tex = master_text(&result);
    assert!(tex.contains("\\usepackage[T2A,T1]{fontenc}"));
    assert!(tex.contains("\\usepackage[russian,american]{babel}"));
    assert!(tex.contains("\\foreignlanguage{russian}{"));
    assert!(tex.is_ascii());
}

#[test]
fn test_accented_text_stays_ascii() {
    let xml = r#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
      <office:body><office:text>
        <text:p>café</text:p>
      </office:text></office:body>
    </office:document>"#;

    let result = convert(xml.as_bytes(), |_| {});
    let tex = master_text(&result);
    assert!(tex.contains("caf\\'e"));
    assert!(tex.contains("\\usepackage[T1]{fontenc}"));
    assert!(!tex.contains("inputenc"));
    assert!(tex.is_ascii());
}

#[test]
fn test_unsupported_content_degrades_to_placeholder() {
    let xml = br#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
      <office:body><office:text>
        <text:p>before</text:p>
        <text:p><draw:frame><draw:object><math:math/></draw:object></draw:frame></text:p>
        <text:alphabetical-index/>
        <text:p>after</text:p>
      </office:text></office:body>
    </office:document>"#;

    let result = convert(xml, |_| {});
    let tex = master_text(&result);
    assert!(tex.contains("before"));
    assert!(tex.contains("[Object]"));
    assert!(tex.contains("after"));
    assert!(result.diagnostics().warnings >= 1);
    assert!(result.diagnostics().infos >= 1);
}

#[test]
fn test_external_bibliography_role() {
    let result = convert(ARTICLE, |c| {
        c.config_mut().set("use_bibtex", "true");
    });
    let tex = master_text(&result);
    assert!(tex.contains("\\bibliographystyle{plain}"));
    assert!(tex.contains("\\bibliography{guide}"));
    assert!(!tex.contains("\\begin{thebibliography}"));

    let bib = result.bibliography().expect("bibliography role");
    assert_eq!(bib.name(), "guide.bib");
    assert_eq!(bib.mime(), "application/x-bibtex");
    let text = String::from_utf8(bib.bytes().to_vec()).expect("utf-8 bib");
    assert!(text.starts_with("@BOOK{hart1968,"));
}

#[test]
fn test_format_factory_and_disk_round_trip() {
    let image = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR4nGNgYGAAAAAEAAH2FzhVAAAAAElFTkSuQmCC";
    let xml = format!(
        r#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
          <office:body><office:text>
            <text:p>With a figure:</text:p>
            <text:p><draw:frame svg:width="2cm"><draw:image>
              <office:binary-data>{image}</office:binary-data>
            </draw:image></draw:frame></text:p>
          </office:text></office:body>
        </office:document>"#
    );
    let document = TextDocument::from_flat_xml(xml.as_bytes()).expect("parse document");

    let mut converter = make_converter(OutputFormat::Latex).expect("factory");
    let result = converter.convert(&document, "figure").expect("convert");

    let dir = tempfile::tempdir().expect("temp dir");
    let paths = result.write_all(dir.path()).expect("write all");
    assert_eq!(paths.len(), 2);
    assert!(paths[0].ends_with("figure.tex"));
    assert!(paths[1].ends_with("figure-img1.png"));

    let tex = std::fs::read_to_string(&paths[0]).expect("read tex");
    assert!(tex.contains("\\includegraphics[width=2cm]{figure-img1.png}"));
    let png = std::fs::read(&paths[1]).expect("read png");
    assert!(png.starts_with(b"\x89PNG"));
}
