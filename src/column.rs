//! Tab-aware column arithmetic
//!
//! All alignment comparisons work on expanded columns: each tab advances to
//! the next multiple of the tab width, every other character counts one.

/// Expanded width of the first `raw_column` characters of `line`.
///
/// Positions past the end of the line count one column each, so a token
/// reported beyond a truncated line still gets a stable column.
pub fn expanded_column(line: &str, raw_column: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut width = 0;
    let mut seen = 0;
    for ch in line.chars().take(raw_column) {
        width = advance(width, ch, tab_width);
        seen += 1;
    }
    width + (raw_column - seen)
}

/// Expanded width of the leading spaces and tabs of `line`
pub fn indentation_width(line: &str, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .fold(0, |width, ch| advance(width, ch, tab_width))
}

fn advance(width: usize, ch: char, tab_width: usize) -> usize {
    if ch == '\t' {
        (width / tab_width + 1) * tab_width
    } else {
        width + 1
    }
}

/// `line` with every tab replaced by the spaces it expands to
pub fn expand_tabs(line: &str, tab_width: usize) -> String {
    let tab_width = tab_width.max(1);
    let mut out = String::with_capacity(line.len());
    let mut width = 0;
    for ch in line.chars() {
        let next = advance(width, ch, tab_width);
        if ch == '\t' {
            out.extend(std::iter::repeat(' ').take(next - width));
        } else {
            out.push(ch);
        }
        width = next;
    }
    out
}

/// Whitespace string that indents to `width` using spaces only
pub fn indent_string(width: usize) -> String {
    " ".repeat(width)
}

/// Source text split into lines, with the tab width used to read it
#[derive(Debug, Clone)]
pub struct SourceText {
    text: String,
    /// Byte offset where each line starts
    line_starts: Vec<usize>,
    tab_width: usize,
}

impl SourceText {
    pub fn new(text: impl Into<String>, tab_width: usize) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            text,
            line_starts,
            tab_width: tab_width.max(1),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Content of a 1-based line without its terminator; empty when out of range
    pub fn line(&self, line: usize) -> &str {
        let Some(&start) = line.checked_sub(1).and_then(|i| self.line_starts.get(i)) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        self.text[start..end].trim_end_matches('\r')
    }

    /// All lines, for diagnostics context
    pub fn lines(&self) -> Vec<&str> {
        (1..=self.line_count()).map(|n| self.line(n)).collect()
    }

    /// Expanded column of a token at (`line`, `raw_column`)
    pub fn column_of(&self, line: usize, raw_column: usize) -> usize {
        expanded_column(self.line(line), raw_column, self.tab_width)
    }

    /// Leading indentation width of a 1-based line
    pub fn indentation(&self, line: usize) -> usize {
        indentation_width(self.line(line), self.tab_width)
    }

    /// Byte offset of the character at (`line`, `raw_column`), clamped to the
    /// end of the line
    pub fn offset(&self, line: usize, raw_column: usize) -> Option<usize> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let content = self.line(line);
        let within = content
            .char_indices()
            .nth(raw_column)
            .map(|(i, _)| i)
            .unwrap_or(content.len());
        Some(start + within)
    }

    /// Byte offset where the line (1-based) starts
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line.checked_sub(1)?).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_are_identity() {
        let line = "        x";
        for k in 0..=8 {
            assert_eq!(expanded_column(line, k, 4), k);
        }
    }

    #[test]
    fn test_expand_tabs() {
        assert_eq!(expand_tabs("\tx", 4), "    x");
        assert_eq!(expand_tabs("ab\tx", 4), "ab  x");
        assert_eq!(expand_tabs("no tabs", 8), "no tabs");
    }

    #[test]
    fn test_leading_tab() {
        assert_eq!(expanded_column("\tx", 1, 4), 4);
        assert_eq!(expanded_column("\tx", 1, 8), 8);
        assert_eq!(expanded_column("\tx", 2, 4), 5);
    }

    #[test]
    fn test_mixed_tabs_round_up() {
        // two spaces then a tab lands on the next stop
        assert_eq!(expanded_column("  \tx", 3, 4), 4);
        assert_eq!(expanded_column("     \tx", 6, 4), 8);
        assert_eq!(indentation_width("  \t  x", 4), 6);
    }

    #[test]
    fn test_past_end_of_line() {
        assert_eq!(expanded_column("ab", 5, 4), 5);
        assert_eq!(expanded_column("\t", 3, 4), 6);
    }

    #[test]
    fn test_recomputation_is_stable() {
        let line = "\t  \tfoo(bar)";
        let first = expanded_column(line, 7, 4);
        assert_eq!(expanded_column(line, 7, 4), first);
        assert_eq!(first, 11);
    }

    #[test]
    fn test_indentation_stops_at_content() {
        assert_eq!(indentation_width("    return x;", 4), 4);
        assert_eq!(indentation_width("\t\treturn", 4), 8);
        assert_eq!(indentation_width("", 4), 0);
        assert_eq!(indentation_width("x   ", 4), 0);
    }

    #[test]
    fn test_source_text_lines() {
        let src = SourceText::new("a\r\n\tb\nc", 4);
        assert_eq!(src.line_count(), 3);
        assert_eq!(src.line(1), "a");
        assert_eq!(src.line(2), "\tb");
        assert_eq!(src.line(3), "c");
        assert_eq!(src.line(0), "");
        assert_eq!(src.line(9), "");
        assert_eq!(src.indentation(2), 4);
        assert_eq!(src.column_of(2, 1), 4);
    }

    #[test]
    fn test_source_text_offsets() {
        let src = SourceText::new("ab\n  cd\n", 4);
        assert_eq!(src.offset(1, 1), Some(1));
        assert_eq!(src.offset(2, 2), Some(5));
        assert_eq!(src.offset(2, 40), Some(7));
        assert_eq!(src.line_start(2), Some(3));
        assert_eq!(src.offset(0, 0), None);
    }
}
