pub mod block;
pub mod document;
pub mod parser;
pub mod section;

pub use block::{Block, BlockKind};
pub use document::{Document, InlineNode};
pub use parser::Parser;
pub use section::{Section, Sections, VERSION_HEADING_LEVEL};
