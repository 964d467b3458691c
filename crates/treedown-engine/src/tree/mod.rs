//! # Block tree
//!
//! The compiled shape of a document: typed blocks in an arena, stitched
//! together by first-child/next-sibling indices.
//!
//! - **`arena`**: [`BlockArena`] storage and [`BlockId`] handles
//! - **`node`**: [`BlockNode`] plus its kind, flags, and alignment types
//!
//! The dump walks this structure read-only; only the compiler creates or
//! links nodes.

pub mod arena;
pub mod node;

pub use arena::{BlockArena, BlockId};
pub use node::{Alignment, BlockFlags, BlockKind, BlockNode};

/// A compiled document tree: the arena plus the head of the root chain.
///
/// `first` is `None` when compilation produced no blocks (empty or
/// whitespace-only input); dumping such a tree is the one failure case.
#[derive(Debug, Default)]
pub struct BlockTree {
    arena: BlockArena,
    first: Option<BlockId>,
}

impl BlockTree {
    pub(crate) fn new(arena: BlockArena, first: Option<BlockId>) -> Self {
        Self { arena, first }
    }

    pub fn arena(&self) -> &BlockArena {
        &self.arena
    }

    /// Head of the top-level sibling chain.
    pub fn first(&self) -> Option<BlockId> {
        self.first
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }
}
