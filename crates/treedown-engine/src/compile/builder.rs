use std::ops::Range;

use crate::compile::classify::{FenceSig, HtmlKind, LineClass};
use crate::compile::{CompileFlags, MAX_NESTING};
use crate::text::Span;
use crate::tree::{Alignment, BlockArena, BlockFlags, BlockId, BlockKind, BlockNode};

/// Phase 2 of compilation: turns classified lines into linked block nodes.
///
/// Containers (quotes, lists, definition lists) strip their markers and
/// recurse on the inner lines, so each level of `build` only ever sees
/// content at its own margin. Recursion depth is capped at [`MAX_NESTING`];
/// past the cap, container markers read as plain text.
pub(crate) struct TreeBuilder<'a> {
    arena: &'a mut BlockArena,
    flags: CompileFlags,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(arena: &'a mut BlockArena, flags: CompileFlags) -> Self {
        Self { arena, flags }
    }

    /// Builds a sibling chain from `lines`, returning the first block.
    pub(crate) fn build(
        &mut self,
        lines: &[LineClass],
        depth: usize,
        para_align: Alignment,
    ) -> Option<BlockId> {
        let mut first = None;
        let mut prev: Option<BlockId> = None;
        let mut i = 0;
        while i < lines.len() {
            if lines[i].is_blank {
                i += 1;
                continue;
            }
            let (id, next) = self.take_block(lines, i, depth, para_align);
            debug_assert!(next > i, "block consumed no lines");
            match prev {
                Some(p) => self.arena.link_next(p, id),
                None => first = Some(id),
            }
            prev = Some(id);
            i = next;
        }
        first
    }

    /// Dispatches on the shape of the line at `i`. First match wins.
    fn take_block(
        &mut self,
        lines: &[LineClass],
        i: usize,
        depth: usize,
        para_align: Alignment,
    ) -> (BlockId, usize) {
        let line = &lines[i];
        let nestable = depth < MAX_NESTING;
        if self.flags.contains(CompileFlags::FENCED_CODE) {
            if let Some(sig) = line.fence() {
                return self.take_fenced(lines, i, sig);
            }
        }
        if line.is_rule() {
            return (self.arena.alloc(BlockNode::new(BlockKind::Rule)), i + 1);
        }
        if let Some((level, title)) = line.atx_heading() {
            return self.take_atx(line, i, level, title);
        }
        if nestable && line.quote_offset().is_some() {
            return self.take_quote(lines, i, depth, para_align);
        }
        if nestable && line.bullet_offset().is_some() {
            return self.take_list(lines, i, depth, BlockKind::BulletList, para_align);
        }
        if nestable && line.number_offset().is_some() {
            return self.take_list(lines, i, depth, BlockKind::NumberedList, para_align);
        }
        if nestable
            && self.flags.contains(CompileFlags::DEFINITION_LISTS)
            && line.definition_term().is_some()
        {
            return self.take_definition(lines, i, depth);
        }
        if let Some(kind) = line.html_opener() {
            return self.take_html(lines, i, kind);
        }
        if self.flags.contains(CompileFlags::TABLES)
            && line.is_table_row()
            && lines.get(i + 1).is_some_and(LineClass::is_table_delimiter)
        {
            return self.take_table(lines, i);
        }
        if line.is_indented_code() {
            return self.take_indented_code(lines, i);
        }
        self.take_paragraph(lines, i, para_align)
    }

    fn take_fenced(&mut self, lines: &[LineClass], i: usize, sig: FenceSig) -> (BlockId, usize) {
        let mut j = i + 1;
        while j < lines.len() && !lines[j].closes_fence(&sig) {
            j += 1;
        }
        let mut node = BlockNode::new(BlockKind::Code);
        node.flags |= BlockFlags::FENCED;
        node.ident = sig.info;
        node.text = lines[i + 1..j].iter().map(|l| l.span).collect();
        // Unclosed fences run to the end of input.
        let next = if j < lines.len() { j + 1 } else { j };
        (self.arena.alloc(node), next)
    }

    fn take_atx(
        &mut self,
        line: &LineClass,
        i: usize,
        level: u8,
        title: Range<usize>,
    ) -> (BlockId, usize) {
        let mut node = BlockNode::new(BlockKind::Heading { level });
        if !title.is_empty() {
            node.text = vec![Span {
                start: line.span.start + title.start,
                end: line.span.start + title.end,
            }];
            if self.flags.contains(CompileFlags::ANCHORS) {
                node.ident = slug(&line.text[title]);
            }
        }
        (self.arena.alloc(node), i + 1)
    }

    /// Quote run: everything up to the next blank line belongs to the
    /// quote, marker or not (lazy continuation).
    fn take_quote(
        &mut self,
        lines: &[LineClass],
        i: usize,
        depth: usize,
        para_align: Alignment,
    ) -> (BlockId, usize) {
        let mut j = i;
        let mut inner = Vec::new();
        while j < lines.len() && !lines[j].is_blank {
            let line = &lines[j];
            inner.push(match line.quote_offset() {
                Some(off) => line.strip(off),
                None => line.clone(),
            });
            j += 1;
        }
        let mut node = BlockNode::new(BlockKind::Quote);
        if self.flags.contains(CompileFlags::DIV_QUOTES) {
            let class = inner.first().and_then(|l| l.div_class().map(str::to_string));
            if let Some(class) = class {
                node.ident = Some(class);
                node.flags |= BlockFlags::DIV;
                inner.remove(0);
            }
        }
        let id = self.arena.alloc(node);
        let children = self.build(&inner, depth + 1, para_align);
        self.arena.node_mut(id).first_child = children;
        (id, j)
    }

    fn take_list(
        &mut self,
        lines: &[LineClass],
        i: usize,
        depth: usize,
        kind: BlockKind,
        para_align: Alignment,
    ) -> (BlockId, usize) {
        let probe = match kind {
            BlockKind::NumberedList => LineClass::number_offset,
            _ => LineClass::bullet_offset,
        };
        let other = match kind {
            BlockKind::NumberedList => LineClass::bullet_offset,
            _ => LineClass::number_offset,
        };

        let mut items: Vec<Vec<LineClass>> = Vec::new();
        let mut cur: Option<Vec<LineClass>> = None;
        let mut item_indent = 0usize;
        let mut loose = false;
        let mut pending_blank = false;
        let mut j = i;
        while j < lines.len() {
            let line = &lines[j];
            if line.is_blank {
                if let Some(body) = cur.as_mut() {
                    pending_blank = true;
                    body.push(line.clone());
                }
                j += 1;
                continue;
            }
            // Lines indented to the item's content column stay inside the
            // item, nested markers included.
            if let Some(body) = cur.as_mut().filter(|_| line.indent >= item_indent) {
                if pending_blank {
                    loose = true;
                    pending_blank = false;
                }
                body.push(line.dedent(item_indent));
                j += 1;
                continue;
            }
            if let Some(off) = probe(line) {
                if pending_blank {
                    loose = true;
                    pending_blank = false;
                }
                flush_item(&mut items, &mut cur);
                item_indent = off;
                cur = Some(vec![line.strip(off)]);
                j += 1;
                continue;
            }
            // Unindented text directly under an item continues it; anything
            // structural ends the region.
            let plain = !line.is_rule()
                && line.atx_heading().is_none()
                && line.quote_offset().is_none()
                && line.fence().is_none()
                && other(line).is_none();
            if let Some(body) = cur.as_mut().filter(|_| !pending_blank && plain) {
                body.push(line.dedent(item_indent));
                j += 1;
                continue;
            }
            break;
        }
        flush_item(&mut items, &mut cur);

        let mut node = BlockNode::new(kind);
        if loose {
            node.flags |= BlockFlags::LOOSE;
        }
        let list_id = self.arena.alloc(node);
        let body_align = if loose { Alignment::Paragraph } else { para_align };
        let mut first_item = None;
        let mut prev: Option<BlockId> = None;
        for body in &items {
            let item_id = self.arena.alloc(BlockNode::new(BlockKind::ListItem));
            let children = self.build(body, depth + 1, body_align);
            self.arena.node_mut(item_id).first_child = children;
            match prev {
                Some(p) => self.arena.link_next(p, item_id),
                None => first_item = Some(item_id),
            }
            prev = Some(item_id);
        }
        self.arena.node_mut(list_id).first_child = first_item;
        (list_id, j)
    }

    /// `=term=` items with four-space indented bodies.
    fn take_definition(&mut self, lines: &[LineClass], i: usize, depth: usize) -> (BlockId, usize) {
        let mut terms: Vec<(Span, Vec<LineClass>)> = Vec::new();
        let mut j = i;
        while j < lines.len() {
            let line = &lines[j];
            if line.is_blank {
                if let Some((_, body)) = terms.last_mut() {
                    if !body.is_empty() {
                        body.push(line.clone());
                    }
                }
                j += 1;
                continue;
            }
            if let Some(range) = line.definition_term() {
                terms.push((
                    Span {
                        start: line.span.start + range.start,
                        end: line.span.start + range.end,
                    },
                    Vec::new(),
                ));
                j += 1;
                continue;
            }
            if line.indent >= 4 && terms.last().is_some() {
                if let Some((_, body)) = terms.last_mut() {
                    body.push(line.dedent(4));
                }
                j += 1;
                continue;
            }
            break;
        }

        let dl_id = self.arena.alloc(BlockNode::new(BlockKind::DefinitionList));
        let mut first_item = None;
        let mut prev: Option<BlockId> = None;
        for (term, mut body) in terms {
            while body.last().is_some_and(|l| l.is_blank) {
                body.pop();
            }
            let mut item = BlockNode::new(BlockKind::ListItem);
            item.text = vec![term];
            let item_id = self.arena.alloc(item);
            let children = self.build(&body, depth + 1, Alignment::Implicit);
            self.arena.node_mut(item_id).first_child = children;
            match prev {
                Some(p) => self.arena.link_next(p, item_id),
                None => first_item = Some(item_id),
            }
            prev = Some(item_id);
        }
        self.arena.node_mut(dl_id).first_child = first_item;
        (dl_id, j)
    }

    fn take_html(&mut self, lines: &[LineClass], i: usize, kind: HtmlKind) -> (BlockId, usize) {
        match kind {
            HtmlKind::Style => {
                let mut j = i;
                while j < lines.len() && !lines[j].text.to_ascii_lowercase().contains("</style>") {
                    j += 1;
                }
                let end = (j + 1).min(lines.len());
                let mut node = BlockNode::new(BlockKind::Style);
                node.text = lines[i..end].iter().map(|l| l.span).collect();
                (self.arena.alloc(node), end)
            }
            HtmlKind::Other => {
                let mut j = i;
                while j < lines.len() && !lines[j].is_blank {
                    j += 1;
                }
                let mut node = BlockNode::new(BlockKind::Html);
                node.text = lines[i..j].iter().map(|l| l.span).collect();
                (self.arena.alloc(node), j)
            }
        }
    }

    fn take_table(&mut self, lines: &[LineClass], i: usize) -> (BlockId, usize) {
        let mut j = i;
        while j < lines.len() && lines[j].is_table_row() {
            j += 1;
        }
        let mut node = BlockNode::new(BlockKind::Table);
        node.text = lines[i..j].iter().map(|l| l.span).collect();
        (self.arena.alloc(node), j)
    }

    fn take_indented_code(&mut self, lines: &[LineClass], i: usize) -> (BlockId, usize) {
        let mut j = i;
        let mut end = i;
        while j < lines.len() && (lines[j].is_blank || lines[j].indent >= 4) {
            if !lines[j].is_blank {
                end = j + 1;
            }
            j += 1;
        }
        let mut node = BlockNode::new(BlockKind::Code);
        node.text = lines[i..end].iter().map(|l| l.dedent(4).span).collect();
        (self.arena.alloc(node), end)
    }

    /// Paragraph run. A setext underline converts the run into a heading;
    /// `->`/`<-` fences center it.
    fn take_paragraph(
        &mut self,
        lines: &[LineClass],
        i: usize,
        para_align: Alignment,
    ) -> (BlockId, usize) {
        let mut j = i + 1;
        while j < lines.len() {
            let line = &lines[j];
            if line.is_blank {
                break;
            }
            if let Some(level) = line.setext_underline() {
                let mut node = BlockNode::new(BlockKind::Heading { level });
                node.flags |= BlockFlags::SETEXT;
                node.text = lines[i..j].iter().map(|l| l.span).collect();
                if self.flags.contains(CompileFlags::ANCHORS) {
                    node.ident = slug(lines[i].text.trim());
                }
                return (self.arena.alloc(node), j + 1);
            }
            if self.interrupts(line) {
                break;
            }
            j += 1;
        }

        let mut node = BlockNode::new(BlockKind::Markup);
        let mut spans: Vec<Span> = lines[i..j].iter().map(|l| l.span).collect();
        let first = &lines[i];
        let last = &lines[j - 1];
        if first.centered_open() && last.centered_close() {
            node.align = Alignment::Center;
            let lead = first.text.len() - first.text.trim_start().len();
            let trail = last.text.len() - last.text.trim_end().len();
            let k = spans.len() - 1;
            spans[0] = spans[0].advance(lead + 2);
            spans[k] = spans[k].retreat_end(trail + 2);
        } else {
            node.align = para_align;
        }
        node.text = spans;
        (self.arena.alloc(node), j)
    }

    fn interrupts(&self, line: &LineClass) -> bool {
        line.is_rule()
            || line.atx_heading().is_some()
            || line.quote_offset().is_some()
            || line.bullet_offset().is_some()
            || line.number_offset().is_some()
            || (self.flags.contains(CompileFlags::FENCED_CODE) && line.fence().is_some())
    }
}

/// Trims trailing blanks and banks the finished item body, if one is open.
fn flush_item(items: &mut Vec<Vec<LineClass>>, cur: &mut Option<Vec<LineClass>>) {
    if let Some(mut body) = cur.take() {
        while body.last().is_some_and(|l| l.is_blank) {
            body.pop();
        }
        items.push(body);
    }
}

/// Heading anchor: lowercased alphanumerics, runs of anything else
/// collapsed to single dashes.
fn slug(title: &str) -> Option<String> {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    (!out.is_empty()).then_some(out)
}
