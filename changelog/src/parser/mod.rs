mod structural;

use tracing::debug;

use crate::document::Document;

/// Parser entry point.
pub struct Parser {
    source: String,
}

impl Parser {
    pub fn new(source: String) -> Self {
        Parser { source }
    }

    /// Parse the source Markdown into its top-level blocks.
    ///
    /// Parsing never fails: whatever CommonMark makes of malformed input
    /// (an unterminated fence runs to the end of the file, for instance) is
    /// what the document contains. The blocks' sources always concatenate back
    /// to the input.
    pub fn parse(&self) -> Document {
        let blocks = structural::parse_blocks(&self.source);
        debug!(blocks = blocks.len(), bytes = self.source.len(), "parsed changelog");
        Document::new(blocks)
    }
}
