//! Style elements for OpenDocument documents.
//!
//! This module provides support for ODF style definitions, including
//! parsing, inheritance, and property resolution. Styles live in
//! per-family namespaces; a query can resolve through the parent chain
//! and the family default style, or look at the named style alone.

use crate::office::element::Element;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Style family types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleFamily {
    /// Paragraph styles
    Paragraph,
    /// Text/character styles
    Text,
    /// List styles
    List,
    /// Table styles
    Table,
    /// Table column styles
    TableColumn,
    /// Table row styles
    TableRow,
    /// Table cell styles
    TableCell,
    /// Section styles
    Section,
    /// Graphic styles
    Graphic,
    /// Page layout styles
    PageLayout,
}

impl StyleFamily {
    /// Parse style family from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paragraph" => Some(Self::Paragraph),
            "text" => Some(Self::Text),
            "list" => Some(Self::List),
            "table" => Some(Self::Table),
            "table-column" => Some(Self::TableColumn),
            "table-row" => Some(Self::TableRow),
            "table-cell" => Some(Self::TableCell),
            "section" => Some(Self::Section),
            "graphic" => Some(Self::Graphic),
            "page-layout" => Some(Self::PageLayout),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Text => "text",
            Self::List => "list",
            Self::Table => "table",
            Self::TableColumn => "table-column",
            Self::TableRow => "table-row",
            Self::TableCell => "table-cell",
            Self::Section => "section",
            Self::Graphic => "graphic",
            Self::PageLayout => "page-layout",
        }
    }
}

/// A style definition with its formatting properties.
///
/// Properties keep the ODF attribute names they were declared with
/// (`fo:font-weight`, `fo:text-align`, ...) partitioned by the property
/// child element they came from.
#[derive(Debug, Clone, Default)]
pub struct Style {
    name: String,
    display_name: Option<String>,
    family: Option<StyleFamily>,
    parent: Option<String>,
    next_style: Option<String>,
    master_page: Option<String>,
    outline_level: Option<u8>,
    list_style_name: Option<String>,
    /// True for styles from `office:automatic-styles` (hard formatting)
    automatic: bool,
    text_props: HashMap<String, String>,
    par_props: HashMap<String, String>,
    other_props: HashMap<String, String>,
}

impl Style {
    /// Create an empty style with a name and family
    pub fn new(name: &str, family: StyleFamily) -> Self {
        Self {
            name: name.to_string(),
            family: Some(family),
            ..Self::default()
        }
    }

    /// Builder-style text property setter
    pub fn with_text_property(mut self, attr: &str, value: &str) -> Self {
        self.text_props.insert(attr.to_string(), value.to_string());
        self
    }

    /// Builder-style paragraph property setter
    pub fn with_paragraph_property(mut self, attr: &str, value: &str) -> Self {
        self.par_props.insert(attr.to_string(), value.to_string());
        self
    }

    /// Builder-style parent setter
    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    /// Create style from a `style:style` or `style:default-style` element
    pub fn from_element(element: &Element) -> Self {
        let mut style = Self {
            name: element.attribute("style:name").unwrap_or("").to_string(),
            display_name: element
                .attribute("style:display-name")
                .map(|s| s.to_string()),
            family: element.attribute("style:family").and_then(StyleFamily::parse),
            parent: element
                .attribute("style:parent-style-name")
                .map(|s| s.to_string()),
            next_style: element
                .attribute("style:next-style-name")
                .map(|s| s.to_string()),
            master_page: element
                .attribute("style:master-page-name")
                .map(|s| s.to_string()),
            outline_level: element
                .int_attribute("style:default-outline-level")
                .map(|l| l.clamp(0, 10) as u8),
            list_style_name: element
                .attribute("style:list-style-name")
                .map(|s| s.to_string()),
            ..Self::default()
        };

        for child in element.child_elements() {
            let target = match child.tag() {
                "style:text-properties" => &mut style.text_props,
                "style:paragraph-properties" => &mut style.par_props,
                _ if child.local_name().ends_with("-properties") => &mut style.other_props,
                _ => continue,
            };
            for (key, value) in child.attributes() {
                target.insert(key.clone(), value.clone());
            }
        }

        style
    }

    /// Get the style name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the user-visible name, falling back to the internal name
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Get the style family
    pub fn family(&self) -> Option<StyleFamily> {
        self.family
    }

    /// Get the parent style name
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Get the next-style name (applied to following paragraphs)
    pub fn next_style(&self) -> Option<&str> {
        self.next_style.as_deref()
    }

    /// Get the master page this style starts
    pub fn master_page(&self) -> Option<&str> {
        self.master_page.as_deref()
    }

    /// Get the default outline level for headings using this style
    pub fn outline_level(&self) -> Option<u8> {
        self.outline_level
    }

    /// Get the attached list style name
    pub fn list_style_name(&self) -> Option<&str> {
        self.list_style_name.as_deref()
    }

    /// Whether this style came from `office:automatic-styles`
    pub fn is_automatic(&self) -> bool {
        self.automatic
    }

    /// Look up a property on this style alone, without inheritance.
    ///
    /// Text properties shadow paragraph properties of the same name,
    /// which shadow everything else.
    pub fn property(&self, attr: &str) -> Option<&str> {
        self.text_props
            .get(attr)
            .or_else(|| self.par_props.get(attr))
            .or_else(|| self.other_props.get(attr))
            .map(|s| s.as_str())
    }

    /// Look up a text property on this style alone
    pub fn text_property(&self, attr: &str) -> Option<&str> {
        self.text_props.get(attr).map(|s| s.as_str())
    }

    /// Look up a paragraph property on this style alone
    pub fn paragraph_property(&self, attr: &str) -> Option<&str> {
        self.par_props.get(attr).map(|s| s.as_str())
    }
}

/// One level of a list style
#[derive(Debug, Clone, Default)]
pub struct ListLevel {
    /// True for numbered levels (`text:list-level-style-number`)
    pub ordered: bool,
    /// Attributes of the level element (`style:num-format`, ...)
    pub attrs: HashMap<String, String>,
}

/// A list style (`text:list-style`) with its per-level definitions
#[derive(Debug, Clone, Default)]
pub struct ListStyle {
    name: String,
    levels: HashMap<u8, ListLevel>,
}

impl ListStyle {
    /// Create list style from a `text:list-style` element
    pub fn from_element(element: &Element) -> Self {
        let mut style = Self {
            name: element.attribute("style:name").unwrap_or("").to_string(),
            levels: HashMap::new(),
        };
        for child in element.child_elements() {
            let ordered = match child.tag() {
                "text:list-level-style-number" => true,
                "text:list-level-style-bullet" | "text:list-level-style-image" => false,
                _ => continue,
            };
            let Some(level) = child.int_attribute("text:level") else {
                continue;
            };
            if !(1..=10).contains(&level) {
                continue;
            }
            style.levels.insert(
                level as u8,
                ListLevel {
                    ordered,
                    attrs: child.attributes().clone(),
                },
            );
        }
        style
    }

    /// Get the list style name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the definition for a list level (1-based)
    pub fn level(&self, level: u8) -> Option<&ListLevel> {
        self.levels.get(&level)
    }

    /// Whether the given level is numbered
    pub fn is_ordered(&self, level: u8) -> bool {
        self.levels.get(&level).map(|l| l.ordered).unwrap_or(false)
    }
}

/// Style registry for managing document styles
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    families: HashMap<StyleFamily, HashMap<String, Style>>,
    defaults: HashMap<StyleFamily, Style>,
    list_styles: HashMap<String, ListStyle>,
}

impl StyleRegistry {
    /// Create a new style registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a style to the registry
    pub fn add_style(&mut self, style: Style) {
        if let Some(family) = style.family() {
            if !style.name().is_empty() {
                self.families
                    .entry(family)
                    .or_default()
                    .insert(style.name().to_string(), style);
            }
        }
    }

    /// Add a family default style
    pub fn add_default_style(&mut self, style: Style) {
        if let Some(family) = style.family() {
            self.defaults.insert(family, style);
        }
    }

    /// Add a list style
    pub fn add_list_style(&mut self, style: ListStyle) {
        if !style.name().is_empty() {
            self.list_styles.insert(style.name().to_string(), style);
        }
    }

    /// Get a style by family and name
    pub fn style(&self, family: StyleFamily, name: &str) -> Option<&Style> {
        self.families.get(&family).and_then(|m| m.get(name))
    }

    /// Get the default style of a family
    pub fn default_style(&self, family: StyleFamily) -> Option<&Style> {
        self.defaults.get(&family)
    }

    /// Get a list style by name
    pub fn list_style(&self, name: &str) -> Option<&ListStyle> {
        self.list_styles.get(name)
    }

    /// Number of named styles in a family
    pub fn family_len(&self, family: StyleFamily) -> usize {
        self.families.get(&family).map(|m| m.len()).unwrap_or(0)
    }

    /// Iterate the named styles of a family
    pub fn family_styles(&self, family: StyleFamily) -> impl Iterator<Item = &Style> {
        self.families.get(&family).into_iter().flatten().map(|(_, s)| s)
    }

    /// Resolve a user-visible style name to the internal name
    pub fn internal_name<'a>(&'a self, family: StyleFamily, display_name: &'a str) -> &'a str {
        self.families
            .get(&family)
            .and_then(|m| {
                m.values()
                    .find(|s| s.display_name() == display_name)
                    .map(|s| s.name())
            })
            .unwrap_or(display_name)
    }

    /// Look up a property for a style.
    ///
    /// With `inherit` set, the parent chain is walked and the family
    /// default style is consulted last; otherwise only the named style
    /// is examined. Parent cycles terminate the walk.
    pub fn property(
        &self,
        family: StyleFamily,
        style_name: &str,
        attr: &str,
        inherit: bool,
    ) -> Option<&str> {
        if !inherit {
            return self.style(family, style_name).and_then(|s| s.property(attr));
        }

        let mut visited: SmallVec<[&str; 8]> = SmallVec::new();
        let mut current = Some(style_name);
        while let Some(name) = current {
            if visited.contains(&name) {
                break;
            }
            let Some(style) = self.style(family, name) else {
                break;
            };
            if let Some(value) = style.property(attr) {
                return Some(value);
            }
            visited.push(name);
            current = style.parent();
        }

        self.default_style(family).and_then(|s| s.property(attr))
    }

    /// Load all styles found under a `office:styles`,
    /// `office:automatic-styles` or `office:master-styles` element
    pub fn load_from(&mut self, container: &Element) {
        let automatic = container.tag() == "office:automatic-styles";
        for child in container.child_elements() {
            match child.tag() {
                "style:style" | "style:page-layout" => {
                    let mut style = Style::from_element(child);
                    if child.tag() == "style:page-layout" {
                        style.family = Some(StyleFamily::PageLayout);
                    }
                    style.automatic = automatic;
                    self.add_style(style);
                },
                "style:default-style" => {
                    self.add_default_style(Style::from_element(child));
                },
                "text:list-style" => {
                    self.add_list_style(ListStyle::from_element(child));
                },
                _ => {},
            }
        }
    }
}
