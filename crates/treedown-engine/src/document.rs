use std::fmt;

use anyhow::Context;
use xi_rope::Rope;

use crate::compile::{self, CompileFlags};
use crate::dump::{self, DumpError};
use crate::tree::BlockTree;

/// A markdown source buffer plus its most recent compilation.
///
/// The buffer is immutable once constructed, so a compiled tree stays
/// valid until someone asks for a different dialect; `compile` is a no-op
/// when the flags match the cached tree.
#[derive(Debug)]
pub struct Document {
    buffer: Rope,
    compiled: Option<(CompileFlags, BlockTree)>,
}

impl Document {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            compiled: None,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes).context("document is not valid UTF-8")?;
        Ok(Self::new(text))
    }

    /// The source text, reassembled from the rope.
    #[must_use]
    pub fn text(&self) -> String {
        String::from(&self.buffer)
    }

    /// Compiles the buffer under `flags`, reusing the cached tree when the
    /// dialect is unchanged.
    pub fn compile(&mut self, flags: CompileFlags) {
        let fresh = matches!(&self.compiled, Some((cached, _)) if *cached == flags);
        if !fresh {
            self.compiled = Some((flags, compile::compile(&self.buffer, flags)));
        }
    }

    /// The tree from the most recent [`compile`](Self::compile), if any.
    #[must_use]
    pub fn tree(&self) -> Option<&BlockTree> {
        self.compiled.as_ref().map(|(_, tree)| tree)
    }

    /// Compiles and writes the tree dump to `out`, headed by `title`.
    ///
    /// Nothing is written when compilation produces no blocks; the title
    /// only ever appears in front of an actual tree.
    pub fn dump<W: fmt::Write>(
        &mut self,
        out: &mut W,
        flags: CompileFlags,
        title: &str,
    ) -> Result<(), DumpError> {
        self.compile(flags);
        match self.tree() {
            Some(tree) => dump::write_tree(tree, &self.buffer, out, title),
            None => Err(DumpError::EmptyTree),
        }
    }

    pub fn dump_to_string(
        &mut self,
        flags: CompileFlags,
        title: &str,
    ) -> Result<String, DumpError> {
        let mut out = String::new();
        self.dump(&mut out, flags, title)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_bytes_rejects_invalid_utf8() {
        assert!(Document::from_bytes(b"ok").is_ok());
        assert!(Document::from_bytes(&[0x66, 0xff, 0x66]).is_err());
    }

    #[test]
    fn text_round_trips_the_buffer() {
        let doc = Document::new("plain text\n");
        assert_eq!(doc.text(), "plain text\n");
    }

    #[cfg(not(feature = "line-excerpts"))]
    #[test]
    fn single_paragraph_dumps_as_a_sole_leaf() {
        let mut doc = Document::new("just one paragraph\n");
        let out = doc
            .dump_to_string(CompileFlags::STANDARD, "T")
            .unwrap();
        assert_eq!(out, "T-----[markup, 1 line]\n");
    }

    #[test]
    fn empty_document_refuses_to_dump() {
        let mut doc = Document::new("");
        let err = doc
            .dump_to_string(CompileFlags::STANDARD, "unseen")
            .unwrap_err();
        assert!(matches!(err, DumpError::EmptyTree));
    }

    #[test]
    fn dumps_are_repeatable() {
        let mut doc = Document::new("# h\n\ntext\n");
        let first = doc.dump_to_string(CompileFlags::STANDARD, "doc").unwrap();
        let second = doc.dump_to_string(CompileFlags::STANDARD, "doc").unwrap();
        assert_eq!(first, second);
    }

    #[cfg(not(feature = "line-excerpts"))]
    #[test]
    fn changing_flags_recompiles() {
        let mut doc = Document::new("```\ncode\n```\n");
        let fenced = doc.dump_to_string(CompileFlags::STANDARD, "d").unwrap();
        assert_eq!(fenced, "d-----[code 2, 1 line]\n");
        let plain = doc
            .dump_to_string(CompileFlags::STANDARD - CompileFlags::FENCED_CODE, "d")
            .unwrap();
        assert_eq!(plain, "d-----[markup, 3 lines]\n");
    }

    #[test]
    fn tree_is_absent_until_compiled() {
        let mut doc = Document::new("text\n");
        assert!(doc.tree().is_none());
        doc.compile(CompileFlags::STANDARD);
        assert!(doc.tree().is_some());
    }
}
