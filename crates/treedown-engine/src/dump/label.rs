use crate::tree::BlockKind;

/// Short label for a block kind as shown in summary tags.
///
/// Total over every kind; the sentinel keeps a dump running over trees
/// containing kinds this module does not know how to describe. Headings get
/// their `h<level>` form from the walker instead of this label.
pub(crate) fn label(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Whitespace => "whitespace",
        BlockKind::Code => "code",
        BlockKind::Quote => "quote",
        BlockKind::Markup => "markup",
        BlockKind::Html => "html",
        BlockKind::DefinitionList => "dl",
        BlockKind::BulletList => "ul",
        BlockKind::NumberedList => "ol",
        BlockKind::ListItem => "item",
        BlockKind::Heading { .. } => "header",
        BlockKind::Rule => "hr",
        BlockKind::Table => "table",
        BlockKind::Source => "source",
        BlockKind::Style => "style",
        BlockKind::Unknown => "mystery node!",
    }
}
