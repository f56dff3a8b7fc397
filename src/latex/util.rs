//! Small building blocks for LaTeX code generation.

/// A pair of code fragments surrounding some content.
///
/// Style conversion produces these: the `before` part is written, then
/// the content, then the `after` part. Two composition directions exist
/// and they are not interchangeable. [`add`](Self::add) puts the new
/// fragment pair innermost, [`enclose`](Self::enclose) puts it outermost.
/// Either way the result closes groups in the reverse order it opened
/// them.
///
/// # Examples
///
/// ```rust
/// use longan::latex::BeforeAfter;
///
/// let mut ba = BeforeAfter::new();
/// ba.add("\\textbf{", "}");
/// ba.add("\\textit{", "}");
/// assert_eq!(ba.before(), "\\textbf{\\textit{");
/// assert_eq!(ba.after(), "}}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeforeAfter {
    before: String,
    after: String,
}

impl BeforeAfter {
    /// Create an empty pair
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pair from two fragments
    pub fn with(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }

    /// Add a fragment pair inside the current one.
    ///
    /// The new `before` goes after everything opened so far, the new
    /// `after` closes before everything opened so far.
    pub fn add(&mut self, before: &str, after: &str) {
        self.before.push_str(before);
        self.after.insert_str(0, after);
    }

    /// Add a fragment pair around the current one.
    ///
    /// The new `before` opens before everything so far, the new `after`
    /// closes after everything so far.
    pub fn enclose(&mut self, before: &str, after: &str) {
        self.before.insert_str(0, before);
        self.after.push_str(after);
    }

    /// Add an innermost plain group
    pub fn add_group(&mut self) {
        self.add("{", "}");
    }

    /// The opening code
    pub fn before(&self) -> &str {
        &self.before
    }

    /// The closing code
    pub fn after(&self) -> &str {
        &self.after
    }

    /// True when both fragments are empty
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }
}

/// Make a string safe for use as a label, citation key or option value.
///
/// TeX reads these inside `\label`, `\cite` and friends without any
/// escaping, so everything outside a small safe set becomes a hyphen.
pub fn safe_key(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_nests_inward() {
        let mut ba = BeforeAfter::new();
        ba.add("\\textbf{", "}");
        ba.add("\\textit{", "}");
        assert_eq!(ba.before(), "\\textbf{\\textit{");
        assert_eq!(ba.after(), "}}");
    }

    #[test]
    fn test_enclose_wraps_outward() {
        let mut ba = BeforeAfter::with("\\textit{", "}");
        ba.enclose("\\begin{center}\n", "\n\\end{center}");
        assert_eq!(ba.before(), "\\begin{center}\n\\textit{");
        assert_eq!(ba.after(), "}\n\\end{center}");
    }

    #[test]
    fn test_mixed_composition_pairs_correctly() {
        let mut ba = BeforeAfter::new();
        ba.add("A", "a");
        ba.enclose("B", "b");
        ba.add("C", "c");
        assert_eq!(ba.before(), "BAC");
        assert_eq!(ba.after(), "cab");
    }

    #[test]
    fn test_add_group() {
        let mut ba = BeforeAfter::with("\\small", "");
        ba.enclose("{", "}");
        assert_eq!(ba.before(), "{\\small");
        assert_eq!(ba.after(), "}");
        assert!(!ba.is_empty());
        assert!(BeforeAfter::new().is_empty());
    }

    #[test]
    fn test_safe_key() {
        assert_eq!(safe_key("smith2020"), "smith2020");
        assert_eq!(safe_key("a b&c"), "a-b-c");
        assert_eq!(safe_key("x_1.2:3"), "x_1.2:3");
        assert_eq!(safe_key("Ünïcode"), "-n-code");
    }
}
