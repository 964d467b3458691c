//! Markdown block compilation.
//!
//! Two phases: [`classify`] reduces each raw line to local facts, then
//! [`builder`] assembles those lines into the linked block tree that the
//! dump walker renders. Inline content is never parsed; blocks keep spans
//! back into the source buffer instead.

mod builder;
mod classify;

use tracing::debug;
use xi_rope::Rope;

use crate::text::raw_lines;
use crate::tree::{Alignment, BlockArena, BlockId, BlockKind, BlockNode, BlockTree};

use builder::TreeBuilder;
use classify::{LineClass, LineClassifier};

/// Container recursion cap. Marker lines past this depth read as text.
pub(crate) const MAX_NESTING: usize = 32;

bitflags::bitflags! {
    /// Dialect switches for compilation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CompileFlags: u32 {
        /// Pipe tables with a delimiter row.
        const TABLES = 1 << 0;
        /// Backtick and tilde code fences.
        const FENCED_CODE = 1 << 1;
        /// `%class%` lines naming a quote as a styled div.
        const DIV_QUOTES = 1 << 2;
        /// `=term=` definition lists.
        const DEFINITION_LISTS = 1 << 3;
        /// Heading anchors derived from titles.
        const ANCHORS = 1 << 4;
        /// Treat the whole input as one preformatted block.
        const PLAIN_SOURCE = 1 << 5;
    }
}

impl CompileFlags {
    /// The default dialect.
    pub const STANDARD: Self = Self::TABLES
        .union(Self::FENCED_CODE)
        .union(Self::DIV_QUOTES);
}

/// Compiles `buffer` into a block tree under the given dialect.
pub(crate) fn compile(buffer: &Rope, flags: CompileFlags) -> BlockTree {
    let classifier = LineClassifier;
    let lines: Vec<LineClass> = raw_lines(buffer)
        .map(|raw| classifier.classify(&raw))
        .collect();
    debug!(lines = lines.len(), ?flags, "classified input");

    let mut arena = BlockArena::new();
    let first = if flags.contains(CompileFlags::PLAIN_SOURCE) {
        plain_source(&mut arena, &lines)
    } else {
        TreeBuilder::new(&mut arena, flags).build(&lines, 0, Alignment::Implicit)
    };
    debug!(blocks = arena.len(), "compiled block tree");
    BlockTree::new(arena, first)
}

/// Whole-input preformatted block, markup untouched.
fn plain_source(arena: &mut BlockArena, lines: &[LineClass]) -> Option<BlockId> {
    if lines.is_empty() {
        return None;
    }
    let mut node = BlockNode::new(BlockKind::Source);
    node.text = lines.iter().map(|l| l.span).collect();
    Some(arena.alloc(node))
}
