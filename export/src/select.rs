use std::num::NonZeroUsize;

use changelog::{Document, Sections};
use tracing::debug;

/// Keep the sections whose heading starts with `version`.
///
/// This is a plain string prefix match on the trimmed heading text, so `1.2`
/// selects `1.2.3` and `1.2.10` alike; every matching section is kept, in
/// document order. Blocks before the first version heading are dropped.
/// Headings are only kept when `keep_heading` is set. No match gives an
/// empty document.
pub fn pick(document: Document, version: &str, keep_heading: bool) -> Document {
    let sections = Sections::partition(document);
    let total = sections.len();

    let picked: Vec<_> = sections
        .sections
        .into_iter()
        .filter(|section| section.title().starts_with(version))
        .collect();
    debug!(version, picked = picked.len(), total, "picked version sections");

    picked
        .into_iter()
        .flat_map(|section| section.into_blocks(keep_heading))
        .collect()
}

/// Keep everything up to (not including) the `count + 1`th version heading.
pub fn limit(document: Document, count: NonZeroUsize) -> Document {
    let mut sections = Sections::partition(document);
    if sections.len() > count.get() {
        debug!(kept = count.get(), dropped = sections.len() - count.get(), "limiting versions");
        sections.sections.truncate(count.get());
    }
    sections.into_document()
}

#[cfg(test)]
mod tests {
    use super::*;
    use changelog::Parser;

    const CHANGELOG: &str = "\
# Changelog

## 2.0.0

Two.

## 1.5.0

- One point five

## 1.0.0

One.
";

    fn parse(source: &str) -> Document {
        Parser::new(source.to_string()).parse()
    }

    fn nonzero(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn pick_drops_the_heading_by_default() {
        let picked = pick(parse(CHANGELOG), "1.5.0", false);
        assert_eq!(picked.to_string(), "\n- One point five\n\n");
    }

    #[test]
    fn pick_can_keep_the_heading() {
        let picked = pick(parse(CHANGELOG), "1.5.0", true);
        assert_eq!(picked.to_string(), "## 1.5.0\n\n- One point five\n\n");
    }

    #[test]
    fn pick_without_match_is_empty() {
        assert!(pick(parse(CHANGELOG), "9.9.9", true).is_empty());
    }

    #[test]
    fn pick_matches_prefixes() {
        let source = "## 1.2.10\na\n## 1.3.0\nb\n## 1.2.3\nc\n";
        let picked = pick(parse(source), "1.2", true);
        assert_eq!(picked.to_string(), "## 1.2.10\na\n## 1.2.3\nc\n");
    }

    #[test]
    fn pick_ignores_surrounding_whitespace_in_heading() {
        let picked = pick(parse("##    1.0.0   \nbody\n"), "1.0.0", false);
        assert_eq!(picked.to_string(), "body\n");
    }

    #[test]
    fn limit_keeps_leading_sections() {
        let limited = limit(parse(CHANGELOG), nonzero(2));
        assert_eq!(
            limited.to_string(),
            "# Changelog\n\n## 2.0.0\n\nTwo.\n\n## 1.5.0\n\n- One point five\n\n"
        );
    }

    #[test]
    fn limit_larger_than_section_count_is_noop() {
        let document = parse(CHANGELOG);
        assert_eq!(limit(document.clone(), nonzero(10)), document);
    }

    #[test]
    fn limit_after_headingless_pick_is_noop() {
        let picked = pick(parse(CHANGELOG), "1", false);
        let limited = limit(picked.clone(), nonzero(1));
        assert_eq!(limited, picked);
    }
}
