//! XHTML node tree construction and serialization.
//!
//! The converter builds each output page through a small cursor API:
//! [`open`](XhtmlDocument::open) starts an element, [`attr`]
//! (XhtmlDocument::attr) decorates the innermost open element,
//! [`text`](XhtmlDocument::text) appends character data and
//! [`close`](XhtmlDocument::close) finishes the innermost element.
//! Serialization always produces well-formed XML; text and attribute
//! values are escaped on the way out, never on the way in.

use std::fmt::Write as _;

/// One node of the page body
#[derive(Debug, Clone, PartialEq)]
pub enum XNode {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
        children: Vec<XNode>,
    },
    Text(String),
    Comment(String),
}

/// The document type a page is serialized as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Doctype {
    /// XHTML 1.1 with the W3C public identifier
    Xhtml11,
    /// XHTML5 with the EPUB namespace on the root element
    Epub3,
}

/// One output page under construction.
pub struct XhtmlDocument {
    doctype: Doctype,
    title: String,
    lang: String,
    stylesheet: Option<String>,
    body: Vec<XNode>,
    stack: Vec<XNode>,
}

// Elements serialized without a closing tag
const VOID: [&str; 5] = ["br", "hr", "img", "link", "meta"];

// Elements that start on their own line
const BLOCK: [&str; 18] = [
    "blockquote",
    "div",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hr",
    "li",
    "nav",
    "ol",
    "p",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

impl XhtmlDocument {
    /// Create an empty page
    pub fn new(doctype: Doctype) -> Self {
        Self {
            doctype,
            title: String::new(),
            lang: String::new(),
            stylesheet: None,
            body: Vec::new(),
            stack: Vec::new(),
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn set_lang(&mut self, lang: &str) {
        self.lang = lang.to_string();
    }

    /// Link an external stylesheet from the page head
    pub fn set_stylesheet(&mut self, href: &str) {
        self.stylesheet = Some(href.to_string());
    }

    /// Start an element as a child of the innermost open element
    pub fn open(&mut self, name: &str) -> &mut Self {
        self.stack.push(XNode::Element {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        });
        self
    }

    /// Set an attribute on the innermost open element
    pub fn attr(&mut self, name: &str, value: &str) -> &mut Self {
        if let Some(XNode::Element { attrs, .. }) = self.stack.last_mut() {
            attrs.push((name.to_string(), value.to_string()));
        }
        self
    }

    /// Append character data to the innermost open element
    pub fn text(&mut self, s: &str) -> &mut Self {
        if s.is_empty() {
            return self;
        }
        let node = XNode::Text(s.to_string());
        match self.stack.last_mut() {
            Some(XNode::Element { children, .. }) => children.push(node),
            _ => self.body.push(node),
        }
        self
    }

    /// Append a comment to the innermost open element
    pub fn comment(&mut self, s: &str) -> &mut Self {
        let node = XNode::Comment(s.to_string());
        match self.stack.last_mut() {
            Some(XNode::Element { children, .. }) => children.push(node),
            _ => self.body.push(node),
        }
        self
    }

    /// Finish the innermost open element
    pub fn close(&mut self) -> &mut Self {
        if let Some(node) = self.stack.pop() {
            match self.stack.last_mut() {
                Some(XNode::Element { children, .. }) => children.push(node),
                _ => self.body.push(node),
            }
        }
        self
    }

    /// Finish every element still open
    pub fn close_all(&mut self) {
        while !self.stack.is_empty() {
            self.close();
        }
    }

    /// True when nothing has been written to the body yet
    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && self.stack.is_empty()
    }

    /// Render the body markup alone, without the page skeleton
    pub fn write_body(&mut self) -> String {
        self.close_all();
        let mut out = String::new();
        for node in &self.body {
            render(node, &mut out);
        }
        out
    }

    /// Render the complete page
    pub fn write(&mut self) -> String {
        let body = self.write_body();
        let mut out = String::new();
        let lang_attr = if self.lang.is_empty() {
            String::new()
        } else {
            format!(" xml:lang=\"{}\"", escape_xml(&self.lang))
        };

        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        match self.doctype {
            Doctype::Xhtml11 => {
                out.push_str(
                    "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.1//EN\" \
                     \"http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd\">\n",
                );
                let _ = writeln!(
                    out,
                    "<html xmlns=\"http://www.w3.org/1999/xhtml\"{lang_attr}>"
                );
                out.push_str("<head>\n");
                out.push_str(
                    "<meta http-equiv=\"Content-Type\" \
                     content=\"application/xhtml+xml; charset=utf-8\"/>\n",
                );
            },
            Doctype::Epub3 => {
                out.push_str("<!DOCTYPE html>\n");
                let _ = writeln!(
                    out,
                    "<html xmlns=\"http://www.w3.org/1999/xhtml\" \
                     xmlns:epub=\"http://www.idpf.org/2007/ops\"{lang_attr}>"
                );
                out.push_str("<head>\n");
                out.push_str("<meta charset=\"utf-8\"/>\n");
            },
        }
        let _ = writeln!(out, "<title>{}</title>", escape_xml(&self.title));
        if let Some(href) = &self.stylesheet {
            let _ = writeln!(
                out,
                "<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\"/>",
                escape_xml(href)
            );
        }
        out.push_str("</head>\n<body>");
        out.push_str(&body);
        out.push_str("\n</body>\n</html>\n");
        out
    }
}

fn render(node: &XNode, out: &mut String) {
    match node {
        XNode::Text(text) => out.push_str(&escape_xml(text)),
        // A comment may not contain a double hyphen
        XNode::Comment(text) => {
            let _ = write!(out, "<!-- {} -->", text.replace("--", "- -"));
        },
        XNode::Element {
            name,
            attrs,
            children,
        } => {
            let block = BLOCK.contains(&name.as_str());
            if block {
                out.push('\n');
            }
            out.push('<');
            out.push_str(name);
            for (key, value) in attrs {
                let _ = write!(out, " {}=\"{}\"", key, escape_xml(value));
            }
            if VOID.contains(&name.as_str()) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            let had_block_child = children.iter().any(|c| {
                matches!(c, XNode::Element { name, .. } if BLOCK.contains(&name.as_str()))
            });
            for child in children {
                render(child, out);
            }
            if had_block_child {
                out.push('\n');
            }
            let _ = write!(out, "</{name}>");
        },
    }
}

/// Escape special XML characters
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
