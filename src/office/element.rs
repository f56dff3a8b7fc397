//! Element tree for OpenDocument XML content.
//!
//! This module provides the fundamental Element type the converters walk.
//! Children are kept in document order as a mixed sequence of text and
//! element nodes: `a<text:span>b</text:span>c` must stay distinguishable
//! from `<text:span>ab</text:span>c`.

use crate::common::{Error, Result};
use quick_xml::escape::{escape, unescape};
use quick_xml::events::Event;
use smallvec::SmallVec;
use std::collections::HashMap;

/// One child of an [`Element`], in document order
#[derive(Debug, Clone)]
pub enum Node {
    /// Character data
    Text(String),
    /// Nested element
    Element(Element),
}

impl Node {
    /// The contained element, if this node is one
    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// The contained text, if this node is character data
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(t) => Some(t),
            Node::Element(_) => None,
        }
    }
}

/// XML element with qualified tag name, attributes, and ordered children
#[derive(Debug, Clone)]
pub struct Element {
    tag_name: String,
    attributes: HashMap<String, String>,
    pub(crate) children: Vec<Node>,
}

impl Element {
    /// Create a new element with the given qualified tag name, e.g. `text:p`
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style text child
    pub fn with_text(mut self, text: &str) -> Self {
        self.add_text(text);
        self
    }

    /// Builder-style element child
    pub fn with_child(mut self, child: Element) -> Self {
        self.add_child(child);
        self
    }

    /// Get the qualified tag name of this element
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag_name
    }

    /// Get the local name (without namespace prefix)
    #[inline]
    pub fn local_name(&self) -> &str {
        match self.tag_name.split_once(':') {
            Some((_, local)) => local,
            None => &self.tag_name,
        }
    }

    /// Get attribute value by qualified name
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Set attribute value
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Check if element has attribute
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Get the attributes of this element
    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Get boolean attribute value
    pub fn bool_attribute(&self, name: &str) -> Option<bool> {
        self.attribute(name).and_then(|s| match s {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        })
    }

    /// Get integer attribute value
    pub fn int_attribute(&self, name: &str) -> Option<i64> {
        self.attribute(name).and_then(|s| s.parse().ok())
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Add character data, merging with a trailing text node
    pub fn add_text(&mut self, text: &str) {
        if let Some(Node::Text(existing)) = self.children.last_mut() {
            existing.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    /// All children in document order
    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Element children in document order, skipping character data
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First child element with the given qualified tag name
    pub fn first_child(&self, tag_name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.tag_name == tag_name)
    }

    /// First element with the given tag name in this subtree, depth first
    pub fn find_descendant(&self, tag_name: &str) -> Option<&Element> {
        if self.tag_name == tag_name {
            return Some(self);
        }
        self.child_elements()
            .find_map(|child| child.find_descendant(tag_name))
    }

    /// Whether this element has no children at all
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Get text recursively from this element and all children
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Create an element tree from XML bytes.
    ///
    /// Comments, processing instructions and the XML declaration are
    /// skipped; entity references in text and attribute values are
    /// resolved.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = quick_xml::Reader::from_reader(bytes);
        let mut buf = Vec::with_capacity(1024);
        let mut stack: SmallVec<[Element; 16]> = SmallVec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let element = Self::element_from_start(e)?;
                    stack.push(element);
                },
                Ok(Event::Empty(ref e)) => {
                    let element = Self::element_from_start(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.add_child(element),
                        // A document consisting of a single empty tag
                        None => return Ok(element),
                    }
                },
                Ok(Event::Text(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = std::str::from_utf8(t.as_ref())?;
                        let text = unescape(raw)?;
                        current.add_text(&text);
                    }
                },
                Ok(Event::CData(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = std::str::from_utf8(t.as_ref())?;
                        current.add_text(text);
                    }
                },
                Ok(Event::End(_)) => {
                    if let Some(element) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.add_child(element);
                        } else {
                            // This is the root element
                            return Ok(element);
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(format!("XML parsing error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Err(Error::InvalidFormat("No root element found".to_string()))
    }

    fn element_from_start(e: &quick_xml::events::BytesStart<'_>) -> Result<Element> {
        let tag_name = std::str::from_utf8(e.name().as_ref())?.to_string();
        let mut element = Element::new(&tag_name);
        for attr_result in e.attributes() {
            let attr = attr_result?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?;
            element.set_attribute(&key, &value);
        }
        Ok(element)
    }

    /// Serialize element to XML string
    pub fn to_xml_string(&self) -> String {
        let mut xml = String::new();
        self.write_xml(&mut xml);
        xml
    }

    fn write_xml(&self, output: &mut String) {
        output.push('<');
        output.push_str(&self.tag_name);

        // Attributes in sorted order so serialization is reproducible
        let mut keys: Vec<&String> = self.attributes.keys().collect();
        keys.sort();
        for key in keys {
            output.push(' ');
            output.push_str(key);
            output.push_str("=\"");
            output.push_str(&escape(self.attributes[key].as_str()));
            output.push('"');
        }

        if self.children.is_empty() {
            output.push_str("/>");
            return;
        }

        output.push('>');
        for child in &self.children {
            match child {
                Node::Text(t) => output.push_str(&escape(t.as_str())),
                Node::Element(e) => e.write_xml(output),
            }
        }
        output.push_str("</");
        output.push_str(&self.tag_name);
        output.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_mixed_content_order() {
        let xml = b"<text:p>one <text:span text:style-name=\"T1\">two</text:span> three</text:p>";
        let p = Element::from_bytes(xml).unwrap();

        assert_eq!(p.tag(), "text:p");
        assert_eq!(p.children().len(), 3);
        assert_eq!(p.children()[0].as_text(), Some("one "));
        let span = p.children()[1].as_element().unwrap();
        assert_eq!(span.tag(), "text:span");
        assert_eq!(span.attribute("text:style-name"), Some("T1"));
        assert_eq!(p.children()[2].as_text(), Some(" three"));
        assert_eq!(p.plain_text(), "one two three");
    }

    #[test]
    fn test_parse_resolves_entities() {
        let xml = "<text:p>Fish &amp; Chips &lt;here&gt; \u{2014} now</text:p>".as_bytes();
        let p = Element::from_bytes(xml).unwrap();
        assert_eq!(p.plain_text(), "Fish & Chips <here> \u{2014} now");
    }

    #[test]
    fn test_parse_numeric_entities() {
        let xml = b"<text:p>&#x2014;&#65;</text:p>";
        let p = Element::from_bytes(xml).unwrap();
        assert_eq!(p.plain_text(), "\u{2014}A");
    }

    #[test]
    fn test_empty_element_and_lookup() {
        let xml = b"<office:text><text:p/><text:h text:outline-level=\"2\">T</text:h></office:text>";
        let root = Element::from_bytes(xml).unwrap();

        assert_eq!(root.child_elements().count(), 2);
        assert!(root.first_child("text:p").unwrap().is_empty());
        let h = root.first_child("text:h").unwrap();
        assert_eq!(h.int_attribute("text:outline-level"), Some(2));
        assert_eq!(h.local_name(), "h");
    }

    #[test]
    fn test_find_descendant() {
        let xml = b"<office:document><office:body><office:text><text:p>x</text:p></office:text></office:body></office:document>";
        let root = Element::from_bytes(xml).unwrap();
        let text = root.find_descendant("office:text").unwrap();
        assert_eq!(text.child_elements().count(), 1);
        assert!(root.find_descendant("office:spreadsheet").is_none());
    }

    #[test]
    fn test_bool_attribute() {
        let e = Element::new("config:item")
            .with_attribute("a", "true")
            .with_attribute("b", "0")
            .with_attribute("c", "yes");
        assert_eq!(e.bool_attribute("a"), Some(true));
        assert_eq!(e.bool_attribute("b"), Some(false));
        assert_eq!(e.bool_attribute("c"), None);
        assert_eq!(e.bool_attribute("missing"), None);
    }

    #[test]
    fn test_serialize_escapes_and_round_trips() {
        let p = Element::new("text:p")
            .with_attribute("text:style-name", "a\"b")
            .with_text("x < y & z");
        let xml = p.to_xml_string();
        assert!(xml.contains("&quot;") || xml.contains("a\"b") == false);
        assert!(xml.contains("x &lt; y &amp; z"));

        let back = Element::from_bytes(xml.as_bytes()).unwrap();
        assert_eq!(back.attribute("text:style-name"), Some("a\"b"));
        assert_eq!(back.plain_text(), "x < y & z");
    }

    #[test]
    fn test_add_text_merges_runs() {
        let mut p = Element::new("text:p");
        p.add_text("a");
        p.add_text("b");
        p.add_child(Element::new("text:line-break"));
        p.add_text("c");
        assert_eq!(p.children().len(), 3);
        assert_eq!(p.children()[0].as_text(), Some("ab"));
    }
}
