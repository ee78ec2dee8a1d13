use std::io::Write;

use changelog::Document;

/// Write the document back out as Markdown.
///
/// Each block is written with the exact source it was parsed from, so
/// anything the filters kept is byte-identical to the input.
pub fn render<W: Write>(document: &Document, out: &mut W) -> std::io::Result<()> {
    for block in &document.blocks {
        out.write_all(block.source.as_bytes())?;
    }
    Ok(())
}
