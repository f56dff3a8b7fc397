//! Conversion context passed down the document tree.

/// State that travels with the tree walk.
///
/// The context is a plain value. A walker clones it before descending
/// into any child that may change nesting or formatting, mutates only
/// the clone, and throws the clone away when the child is done. The
/// parent's context is never touched; there is no undo mechanism and no
/// stack.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Inside a table cell
    pub in_table: bool,
    /// Inside a table simple enough for `tabular`
    pub in_simple_table: bool,
    /// Inside a list item
    pub in_list: bool,
    /// Current list nesting depth, 0 outside lists
    pub list_level: u8,
    /// List style carried down from the outermost list, nested
    /// `text:list` elements usually omit their own
    pub list_style: String,
    /// Inside a footnote or endnote body
    pub in_footnote: bool,
    /// Inside a caption
    pub in_caption: bool,
    /// Inside a figure float
    pub in_figure_float: bool,
    /// Inside a table float
    pub in_table_float: bool,
    /// Inside a drawing frame
    pub in_frame: bool,
    /// Inside a text section
    pub in_section: bool,
    /// Inside verbatim content, escaping off
    pub in_verbatim: bool,
    /// Inside math, representations switch to math form
    pub math_mode: bool,
    /// Footnotes are not allowed here, degrade them
    pub no_footnotes: bool,
    /// Lists are not allowed here, flatten them
    pub ignore_lists: bool,
    /// Font name of the surrounding run, empty when default
    pub font_name: String,
    pub bold: bool,
    pub italic: bool,
    pub fixed_pitch: bool,
    pub small_caps: bool,
    /// Font size of the surrounding run, when explicitly set
    pub font_size: Option<String>,
    /// Current language code
    pub lang: String,
    /// Current country code, may be empty
    pub country: String,
}

impl Context {
    /// Create a root context for a document with the given default
    /// language and country
    pub fn root(lang: &str, country: &str) -> Self {
        Self {
            lang: lang.to_string(),
            country: country.to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_is_independent() {
        let mut parent = Context::root("en", "US");
        let mut child = parent.clone();
        child.in_table = true;
        child.list_level = 2;
        child.lang = "de".to_string();
        assert!(!parent.in_table);
        assert_eq!(parent.list_level, 0);
        assert_eq!(parent.lang, "en");
        parent.bold = true;
        assert!(!child.bold);
    }
}
