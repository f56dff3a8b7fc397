//! Assembly of LaTeX output from independently built pieces.

/// A buildable portion of a LaTeX document.
///
/// A portion is an ordered sequence of text runs, line breaks, and
/// nested portions. Nesting makes out-of-order assembly possible: the
/// body is walked first while it records what it needs, then the
/// preamble is built last and the pieces are joined in document order.
///
/// # Examples
///
/// ```rust
/// use longan::latex::LatexDocumentPortion;
///
/// let mut body = LatexDocumentPortion::new();
/// body.append("Hello.").nl();
///
/// let mut doc = LatexDocumentPortion::new();
/// doc.append("\\documentclass{article}").nl();
/// doc.append("\\begin{document}").nl();
/// doc.append_portion(body);
/// doc.append("\\end{document}").nl();
/// assert!(doc.write(None).contains("Hello."));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LatexDocumentPortion {
    nodes: Vec<PortionNode>,
}

#[derive(Debug, Clone)]
enum PortionNode {
    Text(String),
    /// Text exempt from soft wrapping (verbatim content)
    Raw(String),
    Newline,
    Nested(LatexDocumentPortion),
}

impl LatexDocumentPortion {
    /// Create an empty portion
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text. Consecutive appends merge into one run.
    pub fn append(&mut self, text: &str) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        if let Some(PortionNode::Text(last)) = self.nodes.last_mut() {
            last.push_str(text);
        } else {
            self.nodes.push(PortionNode::Text(text.to_string()));
        }
        self
    }

    /// Append text that must come out byte-for-byte, exempt from soft
    /// wrapping. Embedded newlines are preserved.
    pub fn append_raw(&mut self, text: &str) -> &mut Self {
        if !text.is_empty() {
            self.nodes.push(PortionNode::Raw(text.to_string()));
        }
        self
    }

    /// Append a line break
    pub fn nl(&mut self) -> &mut Self {
        self.nodes.push(PortionNode::Newline);
        self
    }

    /// Append a nested portion in place
    pub fn append_portion(&mut self, portion: LatexDocumentPortion) -> &mut Self {
        self.nodes.push(PortionNode::Nested(portion));
        self
    }

    /// True when the portion renders to nothing
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|node| match node {
            PortionNode::Text(s) | PortionNode::Raw(s) => s.is_empty(),
            PortionNode::Newline => false,
            PortionNode::Nested(p) => p.is_empty(),
        })
    }

    /// Render the portion. `wrap` soft-wraps long lines at spaces when
    /// set; lines holding comments or raw content are never wrapped
    /// behind the comment sign.
    pub fn write(&self, wrap: Option<usize>) -> String {
        let mut lines: Vec<Line> = Vec::new();
        let mut current = Line::default();
        self.flatten(&mut lines, &mut current);
        lines.push(current);

        let mut out = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            match wrap {
                Some(col) if !line.raw => wrap_line(&line.text, col, &mut out),
                _ => out.push_str(&line.text),
            }
        }
        out
    }

    fn flatten(&self, lines: &mut Vec<Line>, current: &mut Line) {
        for node in &self.nodes {
            match node {
                PortionNode::Text(s) => current.text.push_str(s),
                PortionNode::Raw(s) => {
                    let mut parts = s.split('\n');
                    if let Some(first) = parts.next() {
                        current.text.push_str(first);
                        current.raw = true;
                    }
                    for part in parts {
                        lines.push(std::mem::take(current));
                        current.text.push_str(part);
                        current.raw = true;
                    }
                },
                PortionNode::Newline => {
                    lines.push(std::mem::take(current));
                },
                PortionNode::Nested(portion) => portion.flatten(lines, current),
            }
        }
    }
}

#[derive(Debug, Default, Clone)]
struct Line {
    text: String,
    raw: bool,
}

/// Soft-wrap one logical line at spaces, writing into `out`.
///
/// Break points must come before any unescaped comment sign; the rest of
/// a comment line stays intact whatever its length.
fn wrap_line(line: &str, col: usize, out: &mut String) {
    let mut rest = line;
    loop {
        let limit = comment_start(rest);
        let mut break_at = None;
        for (count, (pos, ch)) in rest.char_indices().enumerate() {
            if count > col {
                break;
            }
            if limit.is_some_and(|l| pos >= l) {
                break;
            }
            if ch == ' ' && count > 0 {
                break_at = Some(pos);
            }
        }
        let fits = rest.chars().count() <= col;
        match break_at {
            Some(pos) if !fits => {
                out.push_str(&rest[..pos]);
                out.push('\n');
                rest = &rest[pos + 1..];
            },
            _ => {
                out.push_str(rest);
                return;
            },
        }
    }
}

/// Byte position of the first unescaped `%`, if any
fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut from = 0;
    while let Some(i) = memchr::memchr(b'%', &bytes[from..]) {
        let pos = from + i;
        if pos == 0 || bytes[pos - 1] != b'\\' {
            return Some(pos);
        }
        from = pos + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_order_assembly() {
        let mut inner = LatexDocumentPortion::new();
        inner.append("\\usepackage{amsmath}").nl();

        let mut doc = LatexDocumentPortion::new();
        doc.append("\\documentclass{article}").nl();
        doc.append_portion(inner);
        doc.append("\\begin{document}").nl();

        assert_eq!(
            doc.write(None),
            "\\documentclass{article}\n\\usepackage{amsmath}\n\\begin{document}\n"
        );
    }

    #[test]
    fn test_append_merges_runs() {
        let mut p = LatexDocumentPortion::new();
        p.append("one ").append("two");
        assert_eq!(p.write(None), "one two");
    }

    #[test]
    fn test_wrap_breaks_at_spaces() {
        let mut p = LatexDocumentPortion::new();
        p.append("aaa bbb ccc ddd");
        assert_eq!(p.write(Some(7)), "aaa bbb\nccc ddd");
    }

    #[test]
    fn test_wrap_leaves_long_words_alone() {
        let mut p = LatexDocumentPortion::new();
        p.append("abcdefghij");
        assert_eq!(p.write(Some(4)), "abcdefghij");
    }

    #[test]
    fn test_wrap_never_splits_behind_comment_sign() {
        let mut p = LatexDocumentPortion::new();
        p.append("text % a rather long comment with many words in it");
        assert_eq!(
            p.write(Some(10)),
            "text\n% a rather long comment with many words in it"
        );
    }

    #[test]
    fn test_escaped_percent_is_not_a_comment() {
        assert_eq!(comment_start("50\\% done"), None);
        assert_eq!(comment_start("a % b"), Some(2));
        assert_eq!(comment_start("\\% % x"), Some(3));
    }

    #[test]
    fn test_raw_content_is_never_wrapped() {
        let mut p = LatexDocumentPortion::new();
        p.append("\\begin{verbatim}").nl();
        p.append_raw("one very long verbatim line that would otherwise wrap\nshort");
        p.nl();
        p.append("\\end{verbatim}");
        let written = p.write(Some(10));
        assert!(written.contains("one very long verbatim line that would otherwise wrap\nshort"));
    }

    #[test]
    fn test_is_empty() {
        let mut p = LatexDocumentPortion::new();
        assert!(p.is_empty());
        let nested = LatexDocumentPortion::new();
        p.append_portion(nested);
        assert!(p.is_empty());
        p.append("x");
        assert!(!p.is_empty());
    }
}
