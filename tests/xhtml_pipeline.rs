//! End-to-end XHTML and EPUB conversion tests.

#![cfg(feature = "xhtml")]

use longan::convert::Converter;
use longan::office::TextDocument;
use longan::xhtml::XhtmlConverter;
use longan::ConverterResult;

const BOOK: &[u8] = br#"<office:document office:mimetype="application/vnd.oasis.opendocument.text">
  <office:meta>
    <dc:title>Collected Instructions</dc:title>
    <dc:creator>M. Assembler</dc:creator>
  </office:meta>
  <office:styles>
    <style:style style:name="Warning" style:family="text">
      <style:text-properties fo:font-weight="bold"/>
    </style:style>
  </office:styles>
  <office:body><office:text>
    <text:h text:outline-level="1">Unpacking</text:h>
    <text:p>Check the crate for damage<text:note text:note-class="footnote"><text:note-citation>1</text:note-citation><text:note-body><text:p>Photograph anything broken.</text:p></text:note-body></text:note> before signing.</text:p>
    <text:h text:outline-level="1">Assembly</text:h>
    <text:p><text:span text:style-name="Warning">Never</text:span> force a joint.</text:p>
    <text:list>
      <text:list-item><text:p>sort the parts</text:p></text:list-item>
      <text:list-item><text:p>follow the order</text:p></text:list-item>
    </text:list>
    <text:h text:outline-level="1">Care</text:h>
    <text:p>Wipe with a damp cloth; see <text:a xlink:href="https://example.org/care">the care page</text:a>.</text:p>
  </office:text></office:body>
</office:document>"#;

fn convert_split(xml: &[u8]) -> ConverterResult {
    let document = TextDocument::from_flat_xml(xml).expect("parse document");
    let mut converter = XhtmlConverter::new();
    converter.apply_option("split_level", "1").expect("option");
    converter.convert(&document, "crate").expect("convert")
}

fn file_text(result: &ConverterResult, name: &str) -> String {
    let file = result
        .files()
        .iter()
        .find(|f| f.name() == name)
        .unwrap_or_else(|| panic!("no file named {name}"));
    String::from_utf8(file.bytes().to_vec()).expect("utf-8 page")
}

/// Parse one document with the same machinery the loader uses and fail
/// on anything quick-xml rejects, including mismatched end tags.
fn assert_well_formed(name: &str, text: &str) {
    let mut reader = quick_xml::Reader::from_reader(text.as_bytes());
    let mut buf = Vec::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(_)) => depth += 1,
            Ok(quick_xml::events::Event::End(_)) => {
                depth = depth.checked_sub(1).unwrap_or_else(|| {
                    panic!("{name}: end tag without start");
                });
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Ok(_) => {},
            Err(e) => panic!("{name} is not well-formed: {e}"),
        }
        buf.clear();
    }
    assert_eq!(depth, 0, "{name}: unclosed elements");
}

// The title block lands before the first heading, so a split document
// leads with a front page holding it.
#[test]
fn test_split_book_file_set() {
    let result = convert_split(BOOK);

    let names: Vec<&str> = result.files().iter().map(|f| f.name()).collect();
    assert_eq!(
        names,
        [
            "crate-toc.xhtml",
            "crate.xhtml",
            "crate1.xhtml",
            "crate2.xhtml",
            "crate3.xhtml",
            "styles.css"
        ]
    );

    for file in result.files() {
        if file.mime() == "application/xhtml+xml" {
            assert!(file.is_master());
        }
    }
    assert_eq!(result.toc().expect("toc role").name(), "crate-toc.xhtml");

    let front = file_text(&result, "crate.xhtml");
    assert!(front.contains("<h1 class=\"title\">Collected Instructions</h1>"));
    assert!(!front.contains("Unpacking"));
}

#[test]
fn test_outline_targets_resolve() {
    let result = convert_split(BOOK);
    assert_eq!(result.content().len(), 3);

    for entry in result.content() {
        let page = file_text(&result, &entry.file);
        assert!(
            page.contains(&format!("id=\"{}\"", entry.target)),
            "target {} missing from {}",
            entry.target,
            entry.file
        );
    }
    assert_eq!(result.content()[0].title, "Unpacking");
    assert_eq!(result.content()[0].file, "crate1.xhtml");
    assert_eq!(result.content()[2].file, "crate3.xhtml");
}

#[test]
fn test_navigation_chain() {
    let result = convert_split(BOOK);

    let front = file_text(&result, "crate.xhtml");
    let first = file_text(&result, "crate1.xhtml");
    let middle = file_text(&result, "crate2.xhtml");
    let last = file_text(&result, "crate3.xhtml");

    assert!(front.contains("<a href=\"crate1.xhtml\">next</a>"));
    assert!(!front.contains(">previous</a>"));
    assert!(first.contains("<a href=\"crate.xhtml\">previous</a>"));
    assert!(middle.contains("<a href=\"crate1.xhtml\">previous</a>"));
    assert!(middle.contains("<a href=\"crate3.xhtml\">next</a>"));
    assert!(last.contains("<a href=\"crate2.xhtml\">previous</a>"));
    assert!(!last.contains(">next</a>"));
    for page in [&front, &first, &middle, &last] {
        assert!(page.contains("<a href=\"crate-toc.xhtml\">contents</a>"));
    }
}

#[test]
fn test_every_page_is_well_formed() {
    let result = convert_split(BOOK);
    for file in result.files() {
        if file.mime() != "application/xhtml+xml" {
            continue;
        }
        let text = String::from_utf8(file.bytes().to_vec()).expect("utf-8 page");
        assert_well_formed(file.name(), &text);
    }
}

#[test]
fn test_footnote_stays_in_its_part() {
    let result = convert_split(BOOK);
    let unpacking = file_text(&result, "crate1.xhtml");
    let assembly = file_text(&result, "crate2.xhtml");

    assert!(unpacking.contains("class=\"footnotes\""));
    assert!(unpacking.contains("Photograph anything broken."));
    assert!(!assembly.contains("class=\"footnotes\""));
}

#[test]
fn test_epub_reading_order_and_roles() {
    let document = TextDocument::from_flat_xml(BOOK).expect("parse document");
    let mut converter = XhtmlConverter::epub();
    converter.apply_option("split_level", "1").expect("option");
    converter.apply_option("cover_image", "cover.png").expect("option");
    let result = converter.convert(&document, "crate").expect("convert");

    let names: Vec<&str> = result.files().iter().map(|f| f.name()).collect();
    assert_eq!(
        names,
        [
            "crate-cover.xhtml",
            "crate-title.xhtml",
            "crate-toc.xhtml",
            "crate.xhtml",
            "crate1.xhtml",
            "crate2.xhtml",
            "styles.css"
        ]
    );

    assert_eq!(result.cover().expect("cover").name(), "crate-cover.xhtml");
    assert_eq!(result.title_page().expect("title").name(), "crate-title.xhtml");
    assert_eq!(result.toc().expect("toc").name(), "crate-toc.xhtml");

    let title = file_text(&result, "crate-title.xhtml");
    assert!(title.contains("<h1 class=\"title\">Collected Instructions</h1>"));
    assert!(title.contains("<p class=\"author\">M. Assembler</p>"));

    let first = file_text(&result, "crate.xhtml");
    assert!(first.contains("<!DOCTYPE html>"));
    assert!(first.contains("xmlns:epub=\"http://www.idpf.org/2007/ops\""));
}

#[test]
fn test_stylesheet_carries_named_styles() {
    let result = convert_split(BOOK);
    let css = file_text(&result, "styles.css");
    assert!(css.contains("body {"));
    assert!(css.contains(".Warning {\n  font-weight: bold;\n}"));

    let assembly = file_text(&result, "crate2.xhtml");
    assert!(assembly.contains("<span class=\"Warning\">Never</span>"));
}

#[test]
fn test_disk_round_trip() {
    let result = convert_split(BOOK);
    let dir = tempfile::tempdir().expect("temp dir");
    let paths = result.write_all(dir.path()).expect("write all");
    assert_eq!(paths.len(), result.files().len());
    for path in &paths {
        let metadata = std::fs::metadata(path).expect("written file");
        assert!(metadata.len() > 0);
    }
}
