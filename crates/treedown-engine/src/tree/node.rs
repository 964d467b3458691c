use bitflags::bitflags;

use crate::text::Span;
use crate::tree::BlockId;

/// The kind of a compiled block.
///
/// `Whitespace` never survives compilation (blank runs separate blocks and
/// are dropped) and `Unknown` is never produced by the compiler at all; both
/// exist so the dump stays total over any tree it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Blank separator run.
    Whitespace,
    /// Indented or fenced code.
    Code,
    /// Block quote, possibly promoted to a classed div.
    Quote,
    /// Ordinary paragraph of inline markup.
    Markup,
    /// Raw block-level HTML.
    Html,
    /// Definition list (`=term=` groups).
    DefinitionList,
    /// Bullet list.
    BulletList,
    /// Numbered list.
    NumberedList,
    /// One list item; its content lives in its children.
    ListItem,
    /// Heading, either ATX or setext.
    Heading { level: u8 },
    /// Horizontal rule.
    Rule,
    /// Pipe table.
    Table,
    /// Verbatim source passthrough.
    Source,
    /// A `<style>` block.
    Style,
    /// Anything a future compiler stage fails to classify.
    Unknown,
}

/// Block alignment annotation.
///
/// Only `Center` carries a visible keyword; `Paragraph` marks loose-list
/// paragraphs for downstream renderers but is silent in dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Implicit,
    Paragraph,
    Center,
}

impl Alignment {
    /// The keyword shown in a block's summary tag, if any.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Alignment::Implicit | Alignment::Paragraph => None,
            Alignment::Center => Some("center"),
        }
    }
}

bitflags! {
    /// Per-block feature flags, rendered as lowercase hex in summary tags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockFlags: u32 {
        /// List separated by blank lines; its item paragraphs get
        /// [`Alignment::Paragraph`].
        const LOOSE = 1 << 0;
        /// Code block delimited by a fence rather than indentation.
        const FENCED = 1 << 1;
        /// Heading from a setext underline rather than `#` marks.
        const SETEXT = 1 << 2;
        /// Quote promoted to a classed div via `%class%`.
        const DIV = 1 << 3;
    }
}

/// One block in the compiled tree.
///
/// Tree shape lives in the arena indices: a node owns its first child, and
/// each child owns the link to its next sibling.
#[derive(Debug, Clone)]
pub struct BlockNode {
    pub kind: BlockKind,
    /// Optional label: div-quote class, fence info string, heading anchor.
    pub ident: Option<String>,
    pub flags: BlockFlags,
    pub align: Alignment,
    /// Text lines as spans into the rope, container prefixes and line
    /// terminators excluded.
    pub(crate) text: Vec<Span>,
    pub(crate) first_child: Option<BlockId>,
    pub(crate) next: Option<BlockId>,
}

impl BlockNode {
    pub(crate) fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            ident: None,
            flags: BlockFlags::empty(),
            align: Alignment::Implicit,
            text: Vec::new(),
            first_child: None,
            next: None,
        }
    }

    /// Number of text lines this block carries directly.
    pub fn line_count(&self) -> usize {
        self.text.len()
    }

    pub fn first_child(&self) -> Option<BlockId> {
        self.first_child
    }

    pub fn next_sibling(&self) -> Option<BlockId> {
        self.next
    }
}
