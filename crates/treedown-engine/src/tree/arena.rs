use super::node::BlockNode;

/// Index of a block in its [`BlockArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(usize);

/// Flat storage for the block tree.
///
/// Nodes are allocated in compilation order and never removed; ids are only
/// ever minted by [`BlockArena::alloc`], so plain indexing is safe.
#[derive(Debug, Default)]
pub struct BlockArena {
    nodes: Vec<BlockNode>,
}

impl BlockArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn alloc(&mut self, node: BlockNode) -> BlockId {
        let id = BlockId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: BlockId) -> &BlockNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: BlockId) -> &mut BlockNode {
        &mut self.nodes[id.0]
    }

    /// Links `next` as the sibling after `prev`.
    pub(crate) fn link_next(&mut self, prev: BlockId, next: BlockId) {
        self.nodes[prev.0].next = Some(next);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
