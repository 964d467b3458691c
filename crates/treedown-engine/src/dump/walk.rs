use std::fmt::{self, Write};

use xi_rope::Rope;

use crate::tree::{BlockArena, BlockId, BlockKind, BlockNode};

use super::label::label;
use super::stack::{Connector, PrefixStack};

/// Recursive sibling-chain walker.
///
/// Owns the prefix stack for one dump invocation; the arena and rope are
/// read-only throughout.
pub(crate) struct TreeWalker<'a, W: Write> {
    arena: &'a BlockArena,
    #[cfg_attr(not(feature = "line-excerpts"), allow(dead_code))]
    buffer: &'a Rope,
    out: &'a mut W,
    stack: PrefixStack,
}

impl<'a, W: Write> TreeWalker<'a, W> {
    pub(crate) fn new(arena: &'a BlockArena, buffer: &'a Rope, out: &'a mut W) -> Self {
        Self {
            arena,
            buffer,
            out,
            stack: PrefixStack::new(),
        }
    }

    /// Writes the title, seeds the root frame, and walks the root chain.
    pub(crate) fn run(&mut self, first: BlockId, title: &str) -> fmt::Result {
        self.out.write_str(title)?;
        let more = self.arena.node(first).next_sibling().is_some();
        self.stack.push(title.len(), Connector::fork(more));
        self.walk(first)?;
        self.stack.pop();
        Ok(())
    }

    fn walk(&mut self, first: BlockId) -> fmt::Result {
        let mut cur = Some(first);
        while let Some(id) = cur {
            let node = self.arena.node(id);
            let first_child = node.first_child();
            let next = node.next_sibling();
            let tag = self.tag_for(node);

            if next.is_none() {
                self.stack.retag_top(Connector::Last);
            }
            self.stack.render(self.out)?;
            self.out.write_str(&tag)?;

            match first_child {
                Some(child) => {
                    // The child frame indents by the tag width just written,
                    // so its branch lands two dashes past the tag.
                    let more = self.arena.node(child).next_sibling().is_some();
                    self.stack.push(tag.len(), Connector::fork(more));
                    self.walk(child)?;
                    self.stack.pop();
                }
                None => self.out.write_char('\n')?,
            }
            cur = next;
        }
        Ok(())
    }

    /// Builds the bracketed summary tag for one node.
    fn tag_for(&self, node: &BlockNode) -> String {
        let mut tag = String::new();
        match node.kind {
            BlockKind::Heading { level } => tag.push_str(&format!("[h{level}")),
            kind => tag.push_str(&format!("[{}", label(kind))),
        }
        if let Some(ident) = &node.ident {
            tag.push_str(&format!(" {ident}"));
        }
        if !node.flags.is_empty() {
            tag.push_str(&format!(" {:x}", node.flags.bits()));
        }
        if let Some(keyword) = node.align.keyword() {
            tag.push_str(&format!(", <{keyword}>"));
        }
        let count = node.line_count();
        if count > 0 {
            tag.push_str(&format!(
                ", {} line{}",
                count,
                if count == 1 { "" } else { "s" }
            ));
        }
        #[cfg(feature = "line-excerpts")]
        if let Some(first) = node.text.first() {
            if !first.is_empty() {
                let excerpt = crate::text::slice::slice_to_string(self.buffer, *first);
                tag.push_str(&format!(" <{excerpt}>"));
            }
        }
        tag.push(']');
        tag
    }
}
