use std::ops::Range;

use crate::text::{RawLine, Span};

/// Signature of a code fence line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FenceSig {
    /// Fence character, backtick or tilde.
    pub ch: u8,
    /// Length of the fence run.
    pub len: usize,
    /// Trimmed info string, if any.
    pub info: Option<String>,
}

/// What an HTML opener introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HtmlKind {
    Style,
    Other,
}

/// Classification of a single line: local facts only, no context.
///
/// Phase 1 of compilation. The builder re-derives these facts on stripped
/// content while descending into containers, so every probe works on
/// whatever margin the current recursion level sees.
#[derive(Debug, Clone)]
pub(crate) struct LineClass {
    /// Content span in the rope, terminator excluded.
    pub span: Span,
    /// Content text. Scaffold: mirrors `span`, could go zero-copy later.
    pub text: String,
    /// Leading whitespace width; a tab counts as 4.
    pub indent: usize,
    pub is_blank: bool,
}

/// Classifies raw lines for the build phase.
pub(crate) struct LineClassifier;

impl LineClassifier {
    pub(crate) fn classify(&self, raw: &RawLine) -> LineClass {
        let trimmed = raw.text.trim_end_matches(['\r', '\n']);
        LineClass::new(
            Span {
                start: raw.span.start,
                end: raw.span.start + trimmed.len(),
            },
            trimmed.to_string(),
        )
    }
}

impl LineClass {
    pub(crate) fn new(span: Span, text: String) -> Self {
        let mut indent = 0usize;
        for c in text.chars() {
            match c {
                ' ' => indent += 1,
                '\t' => indent += 4,
                _ => break,
            }
        }
        let is_blank = text.trim().is_empty();
        Self {
            span,
            text,
            indent,
            is_blank,
        }
    }

    /// Drops the first `n` bytes, reclassifying the remainder.
    pub(crate) fn strip(&self, n: usize) -> LineClass {
        LineClass::new(self.span.advance(n), self.text[n..].to_string())
    }

    /// Strips up to `cols` of leading whitespace (tab = 4), reclassifying.
    pub(crate) fn dedent(&self, cols: usize) -> LineClass {
        let mut bytes = 0usize;
        let mut width = 0usize;
        for c in self.text.chars() {
            if width >= cols || (c != ' ' && c != '\t') {
                break;
            }
            width += if c == '\t' { 4 } else { 1 };
            bytes += c.len_utf8();
        }
        self.strip(bytes)
    }

    fn lead(&self) -> usize {
        self.text.len() - self.text.trim_start_matches(' ').len()
    }

    /// Byte offset past a `>` marker and one optional space, for quote
    /// lines at the margin.
    pub(crate) fn quote_offset(&self) -> Option<usize> {
        let b = self.text.as_bytes();
        let mut i = self.lead();
        if i >= 4 || i >= b.len() || b[i] != b'>' {
            return None;
        }
        i += 1;
        if i < b.len() && b[i] == b' ' {
            i += 1;
        }
        Some(i)
    }

    /// ATX heading: level and the title's byte range within the text.
    pub(crate) fn atx_heading(&self) -> Option<(u8, Range<usize>)> {
        if self.indent >= 4 {
            return None;
        }
        let lead = self.lead();
        let t = &self.text[lead..];
        let hashes = t.bytes().take_while(|&b| b == b'#').count();
        if hashes == 0 || hashes > 6 {
            return None;
        }
        let rest = &t[hashes..];
        if !(rest.is_empty() || rest.starts_with(' ')) {
            return None;
        }
        let title = rest.trim_start_matches(' ');
        let start = self.text.len() - title.len();
        let mut title = title.trim_end_matches(' ');
        // Optional closing hash run, only when detached from the title.
        let stripped = title.trim_end_matches('#');
        if stripped.len() != title.len() && (stripped.is_empty() || stripped.ends_with(' ')) {
            title = stripped.trim_end_matches(' ');
        }
        Some((hashes as u8, start..start + title.len()))
    }

    /// Setext underline: `=` runs make level 1, `-` runs level 2.
    pub(crate) fn setext_underline(&self) -> Option<u8> {
        if self.indent >= 4 || self.is_blank {
            return None;
        }
        let t = self.text.trim();
        if t.bytes().all(|b| b == b'=') {
            Some(1)
        } else if t.bytes().all(|b| b == b'-') {
            Some(2)
        } else {
            None
        }
    }

    /// Thematic break: three or more of the same `-`/`*`/`_`, spaces allowed.
    pub(crate) fn is_rule(&self) -> bool {
        if self.indent >= 4 || self.is_blank {
            return false;
        }
        let mut chars = self.text.chars().filter(|c| !c.is_whitespace());
        let Some(first) = chars.next() else {
            return false;
        };
        if !matches!(first, '-' | '*' | '_') {
            return false;
        }
        let mut count = 1;
        for c in chars {
            if c != first {
                return false;
            }
            count += 1;
        }
        count >= 3
    }

    /// Bullet marker: byte offset of the item content after `-`/`*`/`+`.
    pub(crate) fn bullet_offset(&self) -> Option<usize> {
        let b = self.text.as_bytes();
        let i = self.lead();
        if i >= 4 || i >= b.len() || !matches!(b[i], b'-' | b'*' | b'+') {
            return None;
        }
        let mut j = i + 1;
        if j == b.len() {
            return Some(j); // bare marker, empty item
        }
        if b[j] != b' ' {
            return None;
        }
        while j < b.len() && b[j] == b' ' {
            j += 1;
        }
        Some(j)
    }

    /// Numbered marker: byte offset of the item content after `N.` or `N)`.
    pub(crate) fn number_offset(&self) -> Option<usize> {
        let b = self.text.as_bytes();
        let i = self.lead();
        if i >= 4 {
            return None;
        }
        let mut j = i;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j == i || j - i > 9 {
            return None;
        }
        if j >= b.len() || !matches!(b[j], b'.' | b')') {
            return None;
        }
        j += 1;
        if j == b.len() {
            return Some(j);
        }
        if b[j] != b' ' {
            return None;
        }
        while j < b.len() && b[j] == b' ' {
            j += 1;
        }
        Some(j)
    }

    /// Code fence opener signature.
    pub(crate) fn fence(&self) -> Option<FenceSig> {
        if self.indent >= 4 {
            return None;
        }
        let t = self.text.trim_start_matches(' ');
        let ch = *t.as_bytes().first()?;
        if ch != b'`' && ch != b'~' {
            return None;
        }
        let len = t.bytes().take_while(|&b| b == ch).count();
        if len < 3 {
            return None;
        }
        let info = t[len..].trim();
        Some(FenceSig {
            ch,
            len,
            info: (!info.is_empty()).then(|| info.to_string()),
        })
    }

    /// Whether this line closes a fence opened with `open`.
    pub(crate) fn closes_fence(&self, open: &FenceSig) -> bool {
        match self.fence() {
            Some(sig) => sig.ch == open.ch && sig.len >= open.len && sig.info.is_none(),
            None => false,
        }
    }

    pub(crate) fn is_indented_code(&self) -> bool {
        !self.is_blank && self.indent >= 4
    }

    /// Block-level HTML opener, distinguishing `<style>`.
    pub(crate) fn html_opener(&self) -> Option<HtmlKind> {
        if self.indent >= 4 {
            return None;
        }
        let t = self.text.trim_start_matches(' ');
        let b = t.as_bytes();
        if b.first() != Some(&b'<') {
            return None;
        }
        match b.get(1) {
            Some(c) if c.is_ascii_alphabetic() || matches!(c, b'!' | b'/' | b'?') => {
                if t[1..].to_ascii_lowercase().starts_with("style") {
                    Some(HtmlKind::Style)
                } else {
                    Some(HtmlKind::Other)
                }
            }
            _ => None,
        }
    }

    pub(crate) fn is_table_row(&self) -> bool {
        !self.is_blank && self.indent < 4 && self.text.contains('|')
    }

    /// Table delimiter row: only pipes, dashes, colons, and spaces.
    pub(crate) fn is_table_delimiter(&self) -> bool {
        self.is_table_row()
            && self.text.contains('-')
            && self
                .text
                .trim()
                .bytes()
                .all(|b| matches!(b, b'-' | b':' | b'|' | b' '))
    }

    /// Definition term `=term=`: the term's byte range within the text.
    pub(crate) fn definition_term(&self) -> Option<Range<usize>> {
        if self.indent >= 4 {
            return None;
        }
        let t = self.text.trim();
        if t.len() < 3 || !t.starts_with('=') || !t.ends_with('=') {
            return None;
        }
        let inner = &t[1..t.len() - 1];
        if inner.trim().is_empty() || inner.bytes().all(|b| b == b'=') {
            return None; // underline, not a term
        }
        let start = self.lead() + 1;
        Some(start..start + inner.len())
    }

    pub(crate) fn centered_open(&self) -> bool {
        self.text.trim_start().starts_with("->")
    }

    pub(crate) fn centered_close(&self) -> bool {
        self.text.trim_end().ends_with("<-")
    }

    /// Div-quote class line `%class%`: the trimmed class name.
    pub(crate) fn div_class(&self) -> Option<&str> {
        let t = self.text.trim();
        if t.len() < 3 || !t.starts_with('%') || !t.ends_with('%') {
            return None;
        }
        let inner = t[1..t.len() - 1].trim();
        (!inner.is_empty() && !inner.contains('%')).then_some(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn line(text: &str) -> LineClass {
        LineClass::new(
            Span {
                start: 0,
                end: text.len(),
            },
            text.to_string(),
        )
    }

    #[test]
    fn classifier_strips_terminators_only() {
        let raw = RawLine {
            span: Span { start: 10, end: 17 },
            text: "  two\r\n".to_string(),
        };
        let c = LineClassifier.classify(&raw);
        assert_eq!(c.text, "  two");
        assert_eq!(c.span, Span { start: 10, end: 15 });
        assert_eq!(c.indent, 2);
        assert!(!c.is_blank);
    }

    #[test]
    fn tabs_widen_the_indent() {
        assert_eq!(line("\tcode").indent, 4);
        assert_eq!(line("  \tx").indent, 6);
    }

    #[test]
    fn strip_and_dedent_keep_spans_aligned() {
        let c = line("> quoted");
        let inner = c.strip(2);
        assert_eq!(inner.text, "quoted");
        assert_eq!(inner.span, Span { start: 2, end: 8 });

        let c = line("      deep");
        let d = c.dedent(4);
        assert_eq!(d.text, "  deep");
        assert_eq!(d.indent, 2);
    }

    #[rstest]
    #[case("> hello", Some(2))]
    #[case(">hello", Some(1))]
    #[case("   > deep", Some(5))]
    #[case(">", Some(1))]
    #[case("plain", None)]
    #[case("    > code margin", None)]
    fn quote_offsets(#[case] text: &str, #[case] expected: Option<usize>) {
        assert_eq!(line(text).quote_offset(), expected);
    }

    #[rstest]
    #[case("# Title", Some((1, "Title")))]
    #[case("### Deep ###", Some((3, "Deep")))]
    #[case("######   ", Some((6, "")))]
    #[case("#hash", None)]
    #[case("####### seven", None)]
    #[case("    # indented", None)]
    #[case("# Trailing#", Some((1, "Trailing#")))]
    fn atx_headings(#[case] text: &str, #[case] expected: Option<(u8, &str)>) {
        let c = line(text);
        let got = c.atx_heading().map(|(level, r)| (level, &c.text[r]));
        assert_eq!(got, expected);
    }

    #[rstest]
    #[case("====", Some(1))]
    #[case("=", Some(1))]
    #[case("----", Some(2))]
    #[case("- - -", None)]
    #[case("==x", None)]
    fn setext_underlines(#[case] text: &str, #[case] expected: Option<u8>) {
        assert_eq!(line(text).setext_underline(), expected);
    }

    #[rstest]
    #[case("---", true)]
    #[case("***", true)]
    #[case("- - -", true)]
    #[case("___", true)]
    #[case("--", false)]
    #[case("-*-", false)]
    #[case("    ---", false)]
    fn rules(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(line(text).is_rule(), expected);
    }

    #[rstest]
    #[case("- item", Some(2))]
    #[case("*  wide", Some(3))]
    #[case("+ plus", Some(2))]
    #[case("-", Some(1))]
    #[case("-x", None)]
    #[case("word", None)]
    fn bullets(#[case] text: &str, #[case] expected: Option<usize>) {
        assert_eq!(line(text).bullet_offset(), expected);
    }

    #[rstest]
    #[case("1. one", Some(3))]
    #[case("10) ten", Some(4))]
    #[case("3.", Some(2))]
    #[case("7x", None)]
    #[case("1234567890. long", None)]
    fn numbers(#[case] text: &str, #[case] expected: Option<usize>) {
        assert_eq!(line(text).number_offset(), expected);
    }

    #[test]
    fn fences_carry_their_info_string() {
        let sig = line("```rust ignore").fence().unwrap();
        assert_eq!(sig.ch, b'`');
        assert_eq!(sig.len, 3);
        assert_eq!(sig.info.as_deref(), Some("rust ignore"));

        let plain = line("~~~~").fence().unwrap();
        assert_eq!(plain.ch, b'~');
        assert_eq!(plain.len, 4);
        assert_eq!(plain.info, None);

        assert!(line("``").fence().is_none());
    }

    #[test]
    fn fence_closing_needs_same_char_and_length() {
        let open = line("```rust").fence().unwrap();
        assert!(line("```").closes_fence(&open));
        assert!(line("````").closes_fence(&open));
        assert!(!line("~~~").closes_fence(&open));
        assert!(!line("``` tail").closes_fence(&open));
    }

    #[test]
    fn html_openers() {
        assert_eq!(line("<div>").html_opener(), Some(HtmlKind::Other));
        assert_eq!(line("<!-- note -->").html_opener(), Some(HtmlKind::Other));
        assert_eq!(line("</p>").html_opener(), Some(HtmlKind::Other));
        assert_eq!(line("<style type=\"text/css\">").html_opener(), Some(HtmlKind::Style));
        assert_eq!(line("<STYLE>").html_opener(), Some(HtmlKind::Style));
        assert_eq!(line("< spaced").html_opener(), None);
        assert_eq!(line("plain").html_opener(), None);
    }

    #[test]
    fn table_rows_and_delimiters() {
        assert!(line("| a | b |").is_table_row());
        assert!(line("|---|:--:|").is_table_delimiter());
        assert!(line("--- | ---").is_table_delimiter());
        assert!(!line("| a | b |").is_table_delimiter());
        assert!(!line("plain").is_table_row());
    }

    #[test]
    fn definition_terms() {
        let c = line("=term=");
        assert_eq!(c.definition_term().map(|r| &c.text[r]), Some("term"));
        assert_eq!(line("====").definition_term(), None);
        assert_eq!(line("=x").definition_term(), None);
        // Code margin wins, same as every other opener.
        assert_eq!(line("    =term=").definition_term(), None);
        assert_eq!(line("\t=term=").definition_term(), None);
    }

    #[test]
    fn centered_markers() {
        assert!(line("->centered<-").centered_open());
        assert!(line("->centered<-").centered_close());
        assert!(line("-> open only").centered_open());
        assert!(!line("plain").centered_open());
    }

    #[test]
    fn div_classes() {
        assert_eq!(line("%note%").div_class(), Some("note"));
        assert_eq!(line("  %wide box%  ").div_class(), Some("wide box"));
        assert_eq!(line("%%").div_class(), None);
        assert_eq!(line("50% done").div_class(), None);
    }
}
