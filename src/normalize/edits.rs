//! Byte-range edits over source text.
//!
//! Normalizers never re-print a whole tree; they collect edits for the nodes
//! they drop and splice them into the original text, so everything outside
//! those nodes keeps its layout.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

#[derive(Debug, Default)]
pub(crate) struct EditSet {
    edits: Vec<Edit>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply all edits. Where ranges overlap the earliest, widest edit wins.
    pub fn apply(mut self, source: &str) -> String {
        self.edits.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.end.cmp(&a.end)));

        let mut out = String::with_capacity(source.len());
        let mut cursor = 0;
        for edit in self.edits {
            if edit.start < cursor {
                continue;
            }
            out.push_str(&source[cursor..edit.start]);
            out.push_str(&edit.replacement);
            cursor = edit.end;
        }
        out.push_str(&source[cursor..]);
        out
    }
}

/// Offset of the first byte of the line containing `pos`.
pub(crate) fn line_start(source: &str, pos: usize) -> usize {
    source[..pos].rfind('\n').map(|idx| idx + 1).unwrap_or(0)
}

/// Offset of the `\n` ending the line containing `pos` (or the end of input).
pub(crate) fn line_end(source: &str, pos: usize) -> usize {
    source[pos..].find('\n').map(|idx| pos + idx).unwrap_or(source.len())
}

/// Offset just past the line break ending the line containing `pos`.
fn next_line_start(source: &str, pos: usize) -> usize {
    let end = line_end(source, pos);
    if end < source.len() {
        end + 1
    } else {
        end
    }
}

/// Node range with any trailing line break trimmed off.
pub(crate) fn trim_node_end(source: &str, start: usize, end: usize) -> usize {
    start + source[start..end].trim_end_matches(['\n', '\r']).len()
}

/// Remove a comment spanning `start..end`.
///
/// A comment alone on its line(s) takes the line with it; a trailing comment
/// takes the whitespace in front of it; an inline comment becomes one space.
pub(crate) fn comment_edit(source: &str, start: usize, end: usize) -> Edit {
    let end = trim_node_end(source, start, end);
    let first_line = line_start(source, start);
    let before = &source[first_line..start];
    let after = &source[end..line_end(source, end)];

    if after.trim().is_empty() {
        if before.trim().is_empty() {
            return Edit {
                start: first_line,
                end: next_line_start(source, end),
                replacement: String::new(),
            };
        }
        let trailing_ws = before.len() - before.trim_end().len();
        return Edit { start: start - trailing_ws, end, replacement: String::new() };
    }

    Edit { start, end, replacement: " ".to_string() }
}

/// Whether `start..end` is the only code on its line(s), allowing a trailing
/// comment introduced by `comment_marker`.
pub(crate) fn occupies_whole_lines(
    source: &str,
    start: usize,
    end: usize,
    comment_marker: &str,
) -> bool {
    let before = &source[line_start(source, start)..start];
    let after = source[end..line_end(source, end)].trim();
    before.trim().is_empty() && (after.is_empty() || after.starts_with(comment_marker))
}

/// Delete the full lines covering `start..end`, including the final line break.
pub(crate) fn delete_lines(source: &str, start: usize, end: usize) -> Edit {
    Edit {
        start: line_start(source, start),
        end: next_line_start(source, end),
        replacement: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_one(source: &str, edit: Edit) -> String {
        let mut edits = EditSet::new();
        edits.push(edit);
        edits.apply(source)
    }

    #[test]
    fn line_helpers() {
        let src = "ab\ncd\nef";
        assert_eq!(line_start(src, 4), 3);
        assert_eq!(line_end(src, 4), 5);
        assert_eq!(line_end(src, 7), 8);
        assert_eq!(line_start(src, 0), 0);
    }

    #[test]
    fn whole_line_comment_is_dropped_with_its_newline() {
        let src = "a = 1\n    # note\nb = 2\n";
        let start = src.find('#').unwrap();
        let end = start + "# note".len();
        assert_eq!(apply_one(src, comment_edit(src, start, end)), "a = 1\nb = 2\n");
    }

    #[test]
    fn trailing_comment_takes_leading_whitespace() {
        let src = "a = 1   # note\n";
        let start = src.find('#').unwrap();
        assert_eq!(apply_one(src, comment_edit(src, start, src.len() - 1)), "a = 1\n");
    }

    #[test]
    fn inline_comment_becomes_a_space() {
        let src = "return/* why */value;";
        let start = src.find("/*").unwrap();
        let end = src.find("*/").unwrap() + 2;
        assert_eq!(apply_one(src, comment_edit(src, start, end)), "return value;");
    }

    #[test]
    fn comment_node_including_newline_is_trimmed() {
        let src = "// head\nfn main() {}\n";
        assert_eq!(apply_one(src, comment_edit(src, 0, 8)), "fn main() {}\n");
    }

    #[test]
    fn overlapping_edits_keep_the_widest() {
        let src = "0123456789";
        let mut edits = EditSet::new();
        edits.push(Edit { start: 2, end: 4, replacement: "x".into() });
        edits.push(Edit { start: 2, end: 8, replacement: "Y".into() });
        edits.push(Edit { start: 5, end: 6, replacement: "z".into() });
        assert_eq!(edits.apply(src), "01Y89");
    }

    #[test]
    fn whole_line_detection_allows_trailing_comment() {
        let src = "def f():\n    \"doc\"  # hi\n    return 1\n";
        let start = src.find('"').unwrap();
        let end = start + 5;
        assert!(occupies_whole_lines(src, start, end, "#"));
        assert!(!occupies_whole_lines("x = 1; \"doc\"", 7, 12, "#"));
        assert_eq!(
            apply_one(src, delete_lines(src, start, end)),
            "def f():\n    return 1\n"
        );
    }
}
