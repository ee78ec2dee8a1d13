use crate::block::Block;
use crate::document::Document;

/// Heading level that opens a new version section.
pub const VERSION_HEADING_LEVEL: u8 = 2;

/// A version section: a level-2 heading and every block up to the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: Block,
    pub body: Vec<Block>,
}

impl Section {
    /// The heading's trimmed lead text, e.g. `v1.2.3 (2024-01-15)`.
    pub fn title(&self) -> &str {
        self.heading.lead_text().trim()
    }

    /// The section's blocks in source order, optionally without the heading.
    pub fn into_blocks(self, with_heading: bool) -> impl Iterator<Item = Block> {
        with_heading
            .then_some(self.heading)
            .into_iter()
            .chain(self.body)
    }
}

/// A document split at its level-2 headings.
///
/// `partition` and `into_document` are inverses: no block is dropped,
/// duplicated or reordered by the round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    /// Blocks before the first version heading (title, intro text).
    pub preamble: Vec<Block>,
    pub sections: Vec<Section>,
}

impl Sections {
    pub fn partition(document: Document) -> Self {
        let mut preamble = Vec::new();
        let mut sections: Vec<Section> = Vec::new();

        for block in document.blocks {
            if block.is_heading(VERSION_HEADING_LEVEL) {
                sections.push(Section {
                    heading: block,
                    body: Vec::new(),
                });
            } else if let Some(current) = sections.last_mut() {
                current.body.push(block);
            } else {
                preamble.push(block);
            }
        }

        Sections { preamble, sections }
    }

    pub fn into_document(self) -> Document {
        let mut blocks = self.preamble;
        blocks.extend(
            self.sections
                .into_iter()
                .flat_map(|section| section.into_blocks(true)),
        );
        Document::new(blocks)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;
    use crate::parser::Parser;

    const CHANGELOG: &str = "\
# Changelog

Intro.

## v2.0.0 (2024-03-01)

- Big change

## v1.0.0 (2023-01-01)

### Added

- First release
";

    fn parse(source: &str) -> Document {
        Parser::new(source.to_string()).parse()
    }

    #[test]
    fn splits_at_level_two_headings() {
        let sections = Sections::partition(parse(CHANGELOG));

        assert_eq!(sections.len(), 2);
        assert_eq!(sections.sections[0].title(), "v2.0.0 (2024-03-01)");
        assert_eq!(sections.sections[1].title(), "v1.0.0 (2023-01-01)");
        assert!(sections.preamble[0].is_heading(1));
    }

    #[test]
    fn deeper_headings_stay_in_the_body() {
        let sections = Sections::partition(parse(CHANGELOG));
        let body = &sections.sections[1].body;

        assert!(body.iter().any(|b| b.is_heading(3)));
        assert!(matches!(body.last().map(|b| &b.kind), Some(BlockKind::List { start: None })));
    }

    #[test]
    fn round_trip_keeps_every_block() {
        let document = parse(CHANGELOG);
        let rebuilt = Sections::partition(document.clone()).into_document();

        assert_eq!(rebuilt, document);
        assert_eq!(rebuilt.to_string(), CHANGELOG);
    }

    #[test]
    fn no_version_headings_is_all_preamble() {
        let sections = Sections::partition(parse("# Title\n\nJust text.\n"));

        assert!(sections.is_empty());
        assert_eq!(sections.preamble.len(), 3);
    }

    #[test]
    fn into_blocks_can_drop_the_heading() {
        let mut sections = Sections::partition(parse(CHANGELOG));
        let section = sections.sections.remove(0);
        let blocks: Vec<Block> = section.into_blocks(false).collect();

        assert!(blocks.iter().all(|b| !b.is_heading(VERSION_HEADING_LEVEL)));
        assert_eq!(
            blocks.iter().map(|b| b.source.as_str()).collect::<String>(),
            "\n- Big change\n\n"
        );
    }
}
