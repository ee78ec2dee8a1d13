use std::fmt;

use crate::block::Block;

/// A parsed changelog: the ordered top-level blocks of a Markdown file.
///
/// Documents are never edited in place. Filters consume one and build a new
/// one from (a subset of) its blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Document { blocks }
    }

    pub fn empty() -> Self {
        Document { blocks: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Headings of the given level, in document order.
    pub fn headings(&self, level: u8) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(move |b| b.is_heading(level))
    }
}

impl FromIterator<Block> for Document {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Document {
            blocks: iter.into_iter().collect(),
        }
    }
}

/// Writes the blocks back out exactly as they appeared in the source.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            write!(f, "{}", block)?;
        }
        Ok(())
    }
}

/// Inline elements that appear within a heading.
/// Inline types nest freely within one another.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineNode {
    Text(String),
    Strong(Vec<InlineNode>),
    Emphasis(Vec<InlineNode>),
    Strikethrough(Vec<InlineNode>),
    CodeSpan(String),
    Link {
        dest: String,
        title: String,
        content: Vec<InlineNode>,
    },
    Image {
        dest: String,
        title: String,
        alt: Vec<InlineNode>,
    },
    Html(String),
    SoftBreak,
    HardBreak,
}

impl InlineNode {
    /// The node's own text, if it is a plain text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            InlineNode::Text(s) => Some(s),
            _ => None,
        }
    }
}
