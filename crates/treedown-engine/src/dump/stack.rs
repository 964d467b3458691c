use std::fmt::{self, Write};

/// Connector glyph state for one nesting depth.
///
/// A branch glyph (`Tee`/`End`) fires once when the branch is drawn inline,
/// then downgrades to its continuation form; `Last` fires once at the start
/// of a continuation row, then blanks. This one-shot downgrade is what keeps
/// multi-row branch art aligned without redrawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Connector {
    /// `+` more siblings follow below.
    Tee,
    /// `|` vertical continuation under a fired `Tee`.
    Bar,
    /// `-` sole or final child group.
    End,
    /// `` ` `` terminal marker under the last sibling.
    Last,
    /// ` ` spent column.
    Blank,
}

impl Connector {
    pub(crate) fn glyph(self) -> char {
        match self {
            Connector::Tee => '+',
            Connector::Bar => '|',
            Connector::End => '-',
            Connector::Last => '`',
            Connector::Blank => ' ',
        }
    }

    /// Connector for a freshly pushed child frame.
    pub(crate) fn fork(more_siblings: bool) -> Self {
        if more_siblings {
            Connector::Tee
        } else {
            Connector::End
        }
    }

    fn is_branch(self) -> bool {
        matches!(self, Connector::Tee | Connector::End)
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    indent: usize,
    connector: Connector,
}

/// The per-dump stack of `(indent, connector)` frames, one per nesting level.
#[derive(Debug, Default)]
pub(crate) struct PrefixStack {
    frames: Vec<Frame>,
}

impl PrefixStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, indent: usize, connector: Connector) {
        self.frames.push(Frame { indent, connector });
    }

    pub(crate) fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "pop on empty prefix stack");
        self.frames.pop();
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Replaces the top connector with `to` if it is still an unfired
    /// `Tee` or a `Bar`. Marks "this is the last sibling" before rendering.
    pub(crate) fn retag_top(&mut self, to: Connector) {
        if let Some(top) = self.frames.last_mut() {
            if matches!(top.connector, Connector::Tee | Connector::Bar) {
                top.connector = to;
            }
        }
    }

    /// Writes the line prefix for the node about to be described and returns
    /// the number of bytes written.
    ///
    /// An unfired branch on top means we are continuing the current output
    /// row right after the parent's tag: draw `--` plus the branch glyph and
    /// downgrade it (`End` to `Blank`, `Tee` to `Bar`). Otherwise we are at
    /// the start of a fresh row: draw the whole left margin, one frame per
    /// level, blanking any terminal marker after its single appearance. Both
    /// cases finish with the two-dash continuation marker.
    pub(crate) fn render<W: Write>(&mut self, out: &mut W) -> Result<usize, fmt::Error> {
        let Some(&Frame { connector: top, .. }) = self.frames.last() else {
            return Ok(0);
        };
        let mut written = 0;
        if top.is_branch() {
            write!(out, "--{}", top.glyph())?;
            written += 3;
            if let Some(frame) = self.frames.last_mut() {
                frame.connector = if top == Connector::End {
                    Connector::Blank
                } else {
                    Connector::Bar
                };
            }
        } else {
            for (i, frame) in self.frames.iter_mut().enumerate() {
                if i > 0 {
                    out.write_str("  ")?;
                    written += 2;
                }
                let width = frame.indent + 3;
                write!(out, "{:>width$}", frame.connector.glyph())?;
                written += width;
                if frame.connector == Connector::Last {
                    frame.connector = Connector::Blank;
                }
            }
        }
        out.write_str("--")?;
        written += 2;
        Ok(written)
    }
}
