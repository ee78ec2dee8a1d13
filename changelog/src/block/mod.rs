use std::fmt;
use std::ops::Range;

use crate::document::InlineNode;

/// A top-level Markdown block together with the source text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    /// Source text, widened to whole lines. Rendering writes it back verbatim.
    pub source: String,
    /// Byte span of `source` in the parsed input.
    pub span: Range<usize>,
}

/// What kind of block this is. Only headings carry parsed content; every
/// other kind is an opaque payload passed through by the filters.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// Heading level: 1 = `#`, 2 = `##` (a version section), up to 6.
    Heading {
        level: u8,
        content: Vec<InlineNode>,
    },
    Paragraph,
    List {
        /// First item number for ordered lists, `None` for bullet lists.
        start: Option<u64>,
    },
    CodeBlock {
        language: Option<String>,
    },
    BlockQuote,
    Table,
    ThematicBreak,
    Html,
    /// One or more blank lines between blocks.
    Blank,
    /// Source that yields no block of its own, e.g. link reference definitions.
    Raw,
}

impl Block {
    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            BlockKind::Heading { level, .. } => Some(level),
            _ => None,
        }
    }

    pub fn is_heading(&self, level: u8) -> bool {
        self.heading_level() == Some(level)
    }

    /// Text of a heading's first inline child.
    ///
    /// Empty when the block is not a heading, the heading has no content, or
    /// its first child is not plain text (a link, emphasis, code span...).
    pub fn lead_text(&self) -> &str {
        match &self.kind {
            BlockKind::Heading { content, .. } => content
                .first()
                .and_then(InlineNode::as_text)
                .unwrap_or(""),
            _ => "",
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
