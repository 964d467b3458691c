//! # Tree dump
//!
//! Renders a compiled [`BlockTree`](crate::tree::BlockTree) as an ASCII
//! diagram, one line per block, in the style of a directory-tree listing:
//!
//! ```text
//! DOC--+--[markup, 1 line]-----[item]
//!      `--[hr]
//! ```
//!
//! - **`stack`**: the per-dump frame stack and prefix renderer
//! - **`label`**: block-kind labels for summary tags
//! - **`walk`**: the recursive sibling-chain walker
//!
//! The prefix machinery is the delicate part: each nesting level holds an
//! indent width and a connector glyph that downgrades after its first
//! appearance, so branches draw exactly once and continuation rows stay
//! aligned under them.

mod label;
mod stack;
mod walk;

use std::fmt::Write;

use tracing::debug;
use xi_rope::Rope;

use crate::tree::BlockTree;

use walk::TreeWalker;

/// Failure modes of a dump.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    /// Compilation produced no blocks; nothing is written in this case,
    /// not even the title.
    #[error("document compiled to an empty tree")]
    EmptyTree,
    /// The output sink refused a write.
    #[error("write failed: {0}")]
    Write(#[from] std::fmt::Error),
}

/// Writes the ASCII dump of `tree` to `out` under the given title.
pub(crate) fn write_tree<W: Write>(
    tree: &BlockTree,
    buffer: &Rope,
    out: &mut W,
    title: &str,
) -> Result<(), DumpError> {
    let Some(first) = tree.first() else {
        return Err(DumpError::EmptyTree);
    };
    debug!("dumping {} blocks under {title:?}", tree.arena().len());
    let mut walker = TreeWalker::new(tree.arena(), buffer, out);
    walker.run(first, title)?;
    Ok(())
}
