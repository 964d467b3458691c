use xi_rope::Rope;

use super::span::Span;

/// One raw line of the document with its byte span.
#[derive(Debug, Clone)]
pub struct RawLine {
    /// Byte span of this line in the rope (includes the terminator if present).
    pub span: Span,
    /// The line text as a string. Scaffold: could go zero-copy later.
    pub text: String,
}

/// Returns an iterator over the document's lines with their byte spans.
///
/// Uses `lines_raw` so terminators stay part of each line, which keeps the
/// span arithmetic exact; the compiler strips them when classifying.
pub fn raw_lines(rope: &Rope) -> impl Iterator<Item = RawLine> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        offset += line.len();
        RawLine {
            span: Span { start, end: offset },
            text: line.into_owned(),
        }
    })
}
