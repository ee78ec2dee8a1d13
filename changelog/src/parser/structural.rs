use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser as CmarkParser, Tag, TagEnd};

use crate::block::{Block, BlockKind};
use crate::document::InlineNode;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Split Markdown source text into top-level blocks.
///
/// Every byte of `source` ends up in exactly one block, in order.
pub fn parse_blocks(source: &str) -> Vec<Block> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let parser = CmarkParser::new_ext(source, options);
    let events: Vec<(Event<'_>, Range<usize>)> = parser.into_offset_iter().collect();

    let mut state = ParseState::new(source);
    state.process_events(&events);
    state.finalize()
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

struct ParseState<'a> {
    source: &'a str,
    /// Byte offset up to which the source has been assigned to blocks.
    cursor: usize,
    blocks: Vec<Block>,
}

impl<'a> ParseState<'a> {
    fn new(source: &'a str) -> Self {
        ParseState {
            source,
            cursor: 0,
            blocks: Vec::new(),
        }
    }

    fn process_events(&mut self, events: &[(Event<'_>, Range<usize>)]) {
        let mut i = 0;

        while i < events.len() {
            let (ref ev, ref range) = events[i];

            let kind = match ev {
                Event::Start(Tag::Heading { level, .. }) => {
                    i += 1;
                    let content =
                        collect_inlines(events, &mut i, &|e| matches!(e, TagEnd::Heading(_)));
                    BlockKind::Heading {
                        level: heading_level_to_u8(level),
                        content,
                    }
                }

                // Any other container: classify it and skip its contents
                Event::Start(tag) => {
                    let kind = container_kind(tag);
                    i += 1;
                    skip_to_matching_end(events, &mut i);
                    kind
                }

                Event::Rule => {
                    i += 1;
                    BlockKind::ThematicBreak
                }

                _ => {
                    i += 1;
                    BlockKind::Raw
                }
            };

            self.push_block(kind, range.clone());
        }
    }

    /// Record a block for `range`, widened to whole lines.
    fn push_block(&mut self, kind: BlockKind, range: Range<usize>) {
        let start = line_start(self.source, range.start).max(self.cursor);
        let end = line_end(self.source, range.end.max(start));

        self.flush_gap(start);
        self.blocks.push(Block {
            kind,
            source: self.source[start..end].to_string(),
            span: start..end,
        });
        self.cursor = end;
    }

    /// Turn unclaimed source before `until` into a Blank or Raw block.
    fn flush_gap(&mut self, until: usize) {
        if until <= self.cursor {
            return;
        }

        let text = &self.source[self.cursor..until];
        let kind = if text.trim().is_empty() {
            BlockKind::Blank
        } else {
            BlockKind::Raw
        };
        self.blocks.push(Block {
            kind,
            source: text.to_string(),
            span: self.cursor..until,
        });
        self.cursor = until;
    }

    fn finalize(mut self) -> Vec<Block> {
        self.flush_gap(self.source.len());
        self.blocks
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn heading_level_to_u8(level: &HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn container_kind(tag: &Tag<'_>) -> BlockKind {
    match tag {
        Tag::Paragraph => BlockKind::Paragraph,
        Tag::List(start) => BlockKind::List { start: *start },
        Tag::CodeBlock(kind) => {
            let language = match kind {
                CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
                CodeBlockKind::Indented => None,
            };
            BlockKind::CodeBlock { language }
        }
        Tag::BlockQuote(_) => BlockKind::BlockQuote,
        Tag::Table(_) => BlockKind::Table,
        Tag::HtmlBlock => BlockKind::Html,
        _ => BlockKind::Raw,
    }
}

/// Advance past the End event matching an already consumed Start.
fn skip_to_matching_end(events: &[(Event<'_>, Range<usize>)], i: &mut usize) {
    let mut depth = 1u32;

    while *i < events.len() {
        let (ref ev, _) = events[*i];
        *i += 1;
        match ev {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
    }
}

/// Collect inline nodes until a matching End tag.
fn collect_inlines(
    events: &[(Event<'_>, Range<usize>)],
    i: &mut usize,
    is_end: &dyn Fn(&TagEnd) -> bool,
) -> Vec<InlineNode> {
    let mut inlines = Vec::new();

    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::End(tag_end) if is_end(tag_end) => {
                *i += 1;
                break;
            }
            Event::Text(s) => {
                push_text(&mut inlines, s);
                *i += 1;
            }
            Event::Code(s) => {
                inlines.push(InlineNode::CodeSpan(s.to_string()));
                *i += 1;
            }
            Event::InlineHtml(s) | Event::Html(s) => {
                inlines.push(InlineNode::Html(s.to_string()));
                *i += 1;
            }
            Event::SoftBreak => {
                inlines.push(InlineNode::SoftBreak);
                *i += 1;
            }
            Event::HardBreak => {
                inlines.push(InlineNode::HardBreak);
                *i += 1;
            }
            Event::Start(Tag::Strong) => {
                *i += 1;
                let children = collect_inlines(events, i, &|e| matches!(e, TagEnd::Strong));
                inlines.push(InlineNode::Strong(children));
            }
            Event::Start(Tag::Emphasis) => {
                *i += 1;
                let children = collect_inlines(events, i, &|e| matches!(e, TagEnd::Emphasis));
                inlines.push(InlineNode::Emphasis(children));
            }
            Event::Start(Tag::Strikethrough) => {
                *i += 1;
                let children = collect_inlines(events, i, &|e| matches!(e, TagEnd::Strikethrough));
                inlines.push(InlineNode::Strikethrough(children));
            }
            Event::Start(Tag::Link { dest_url, title, .. }) => {
                let dest = dest_url.to_string();
                let title = title.to_string();
                *i += 1;
                let content = collect_inlines(events, i, &|e| matches!(e, TagEnd::Link));
                inlines.push(InlineNode::Link { dest, title, content });
            }
            Event::Start(Tag::Image { dest_url, title, .. }) => {
                let dest = dest_url.to_string();
                let title = title.to_string();
                *i += 1;
                let alt = collect_inlines(events, i, &|e| matches!(e, TagEnd::Image));
                inlines.push(InlineNode::Image { dest, title, alt });
            }
            _ => {
                *i += 1;
            }
        }
    }

    inlines
}

/// CommonMark may split one run of text into several events (around escapes,
/// for instance); keep it as a single node.
fn push_text(inlines: &mut Vec<InlineNode>, text: &str) {
    if let Some(InlineNode::Text(prev)) = inlines.last_mut() {
        prev.push_str(text);
    } else {
        inlines.push(InlineNode::Text(text.to_string()));
    }
}

/// Offset of the start of the line containing `pos`.
fn line_start(source: &str, pos: usize) -> usize {
    source[..pos].rfind('\n').map(|p| p + 1).unwrap_or(0)
}

/// Offset just past the line break ending the line that `pos` falls on.
/// A `pos` already at the start of a line is returned unchanged.
fn line_end(source: &str, pos: usize) -> usize {
    if pos == 0 || source.as_bytes()[pos - 1] == b'\n' {
        return pos;
    }
    source[pos..]
        .find('\n')
        .map(|p| pos + p + 1)
        .unwrap_or(source.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_bounds() {
        let source = "ab\ncd\n";
        assert_eq!(line_start(source, 4), 3);
        assert_eq!(line_start(source, 1), 0);
        assert_eq!(line_end(source, 1), 3);
        assert_eq!(line_end(source, 3), 3);
        assert_eq!(line_end(source, 6), 6);
        assert_eq!(line_end("abc", 2), 3);
    }

    #[test]
    fn every_byte_is_assigned_once() {
        let source = "# T\n\npara\nlazy\n\n- a\n\n  - nested\n\n[x]: /y\n\n\n";
        let blocks = parse_blocks(source);

        let mut expected_start = 0;
        for block in &blocks {
            assert_eq!(block.span.start, expected_start);
            assert_eq!(&source[block.span.clone()], block.source);
            expected_start = block.span.end;
        }
        assert_eq!(expected_start, source.len());
    }
}
